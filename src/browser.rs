//! # URL Opening
//!
//! Opening a link is a capability handed to each session, not something
//! the session does itself. The production opener hands the URL to the
//! platform's URL handler on the host running the server; tests swap in a
//! recorder.
//!
//! Opening is fire-and-forget: success means the helper process was
//! started, nothing more. Sessions only ever hear about successes.

use std::fmt;
use std::process::Stdio;

use async_trait::async_trait;
use log::debug;
use tokio::process::Command;

#[derive(Debug)]
pub enum OpenError {
    /// No known URL handler for this platform.
    Unsupported(String),
    /// The handler process could not be started.
    Spawn(std::io::Error),
    /// URL opening is turned off in the config.
    Disabled,
}

impl fmt::Display for OpenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpenError::Unsupported(os) => write!(f, "unsupported platform: {os}"),
            OpenError::Spawn(e) => write!(f, "failed to start URL handler: {e}"),
            OpenError::Disabled => write!(f, "URL opening is disabled"),
        }
    }
}

impl std::error::Error for OpenError {}

#[async_trait]
pub trait UrlOpener: Send + Sync {
    /// Starts opening `url`. Returns once the attempt has been dispatched.
    async fn open(&self, url: &str) -> Result<(), OpenError>;
}

/// Opens URLs with `xdg-open`, `open` or `rundll32`, depending on the OS.
pub struct SystemOpener;

/// Program and leading arguments for the platform URL handler.
fn handler_command(os: &str) -> Option<(&'static str, &'static [&'static str])> {
    match os {
        "linux" | "freebsd" | "openbsd" | "netbsd" => Some(("xdg-open", &[])),
        "macos" => Some(("open", &[])),
        "windows" => Some(("rundll32", &["url.dll,FileProtocolHandler"])),
        _ => None,
    }
}

#[async_trait]
impl UrlOpener for SystemOpener {
    async fn open(&self, url: &str) -> Result<(), OpenError> {
        let os = std::env::consts::OS;
        let (program, args) =
            handler_command(os).ok_or_else(|| OpenError::Unsupported(os.to_string()))?;

        // The child is not awaited; tokio reaps it in the background.
        let child = Command::new(program)
            .args(args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(OpenError::Spawn)?;
        debug!("Started {} (pid {:?}) for {}", program, child.id(), url);
        Ok(())
    }
}

/// Used when `open_urls = false`. Every request fails, silently from the
/// session's point of view.
pub struct DisabledOpener;

#[async_trait]
impl UrlOpener for DisabledOpener {
    async fn open(&self, _url: &str) -> Result<(), OpenError> {
        Err(OpenError::Disabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_command_per_platform() {
        assert_eq!(handler_command("linux").map(|c| c.0), Some("xdg-open"));
        assert_eq!(handler_command("macos").map(|c| c.0), Some("open"));
        let (program, args) = handler_command("windows").unwrap();
        assert_eq!(program, "rundll32");
        assert_eq!(args, &["url.dll,FileProtocolHandler"]);
        assert!(handler_command("plan9").is_none());
    }

    #[tokio::test]
    async fn test_disabled_opener_fails() {
        let result = DisabledOpener.open("https://example.com").await;
        assert!(matches!(result, Err(OpenError::Disabled)));
    }

    #[test]
    fn test_error_display() {
        let err = OpenError::Unsupported("plan9".to_string());
        assert_eq!(err.to_string(), "unsupported platform: plan9");
    }
}
