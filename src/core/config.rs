//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.sshfolio/config.toml`. If missing on first run, a
//! commented-out default is generated so operators can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::content::{Content, ContentError};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct FolioConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub session: SessionConfig,
    /// Path to a standalone profile file. Wins over the inline `[profile]`.
    pub profile_file: Option<String>,
    pub profile: Option<Content>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    pub listen_addr: Option<String>,
    pub key_path: Option<String>,
    pub log_file: Option<String>,
    pub inactivity_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    pub welcome_delay_ms: Option<u64>,
    pub open_urls: Option<bool>,
}

/// Values given on the command line. `None` means "not specified".
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub listen_addr: Option<String>,
    pub key_path: Option<String>,
    pub log_file: Option<String>,
    pub profile_file: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:2222";
pub const DEFAULT_LOG_FILE: &str = "sshfolio_connections.log";
pub const DEFAULT_INACTIVITY_TIMEOUT_SECS: u64 = 3600;
pub const DEFAULT_WELCOME_DELAY_MS: u64 = 2000;
pub const MIN_WELCOME_DELAY_MS: u64 = 2000;
pub const MAX_WELCOME_DELAY_MS: u64 = 3000;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub listen_addr: String,
    pub key_path: Option<PathBuf>,
    /// `None` disables file logging.
    pub log_file: Option<PathBuf>,
    pub inactivity_timeout: Duration,
    pub welcome_delay: Duration,
    pub open_urls: bool,
    pub content: Content,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    /// An explicitly requested config file does not exist.
    MissingFile(PathBuf),
    Content(ContentError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
            ConfigError::MissingFile(p) => write!(f, "config file not found: {}", p.display()),
            ConfigError::Content(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ContentError> for ConfigError {
    fn from(e: ContentError) -> Self {
        ConfigError::Content(e)
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.sshfolio/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".sshfolio").join("config.toml"))
}

/// Load config from `explicit` if given, else from `~/.sshfolio/config.toml`.
///
/// If the default file doesn't exist, generates a commented-out default and
/// returns `FolioConfig::default()`. An explicit path that doesn't exist is
/// an error. Malformed files return `ConfigError::Parse`.
pub fn load_config(explicit: Option<&Path>) -> Result<FolioConfig, ConfigError> {
    let path = match explicit {
        Some(p) => {
            if !p.exists() {
                return Err(ConfigError::MissingFile(p.to_path_buf()));
            }
            p.to_path_buf()
        }
        None => match config_path() {
            Some(p) => p,
            None => {
                warn!("Could not determine home directory, using default config");
                return Ok(FolioConfig::default());
            }
        },
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(FolioConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config = parse_config(&contents)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config.server);
    Ok(config)
}

pub fn parse_config(contents: &str) -> Result<FolioConfig, ConfigError> {
    toml::from_str(contents).map_err(ConfigError::Parse)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r##"# sshfolio configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# profile_file = "profile.toml"            # Or --profile; wins over [profile]

# [server]
# listen_addr = "0.0.0.0:2222"            # Or SSHFOLIO_ADDR / --addr
# key_path = "/etc/sshfolio/host_ed25519"  # Or SSHFOLIO_KEY / --key; ephemeral key if unset
# log_file = "sshfolio_connections.log"    # Or SSHFOLIO_LOG / --log; "" = stdout only
# inactivity_timeout_secs = 3600

# [session]
# welcome_delay_ms = 2000                  # Clamped to 2000..=3000
# open_urls = true                         # Open selected links with the host's URL handler

# [profile]
# title = "your name"
#
# [[profile.sections]]
# title = "about"
# lines = ["hello there.", "github: https://github.com/you"]
#
# [profile.theme]
# primary = "#5f87ff"
# accent = "#ff6ac1"
# text = "#abb2bf"
# subtle = "#565c64"
# links = "#61afef"
# selection = "#c678dd"
"##;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: FolioConfig, cli: &CliOverrides) -> Result<ResolvedConfig, ConfigError> {
    // Listen address: CLI → env → config → default
    let listen_addr = cli
        .listen_addr
        .clone()
        .or_else(|| std::env::var("SSHFOLIO_ADDR").ok())
        .or_else(|| config.server.listen_addr.clone())
        .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());

    // Host key: CLI → env → config → none (ephemeral)
    let key_path = cli
        .key_path
        .clone()
        .or_else(|| std::env::var("SSHFOLIO_KEY").ok())
        .or_else(|| config.server.key_path.clone())
        .filter(|p| !p.is_empty())
        .map(PathBuf::from);

    // Log file: CLI → env → config → default; empty disables file logging
    let log_file = cli
        .log_file
        .clone()
        .or_else(|| std::env::var("SSHFOLIO_LOG").ok())
        .or_else(|| config.server.log_file.clone())
        .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());
    let log_file = resolve_log_path(&log_file);

    // Profile: CLI file → config file → inline table → built-in default
    let content = match cli.profile_file.as_ref().or(config.profile_file.as_ref()) {
        Some(file) => {
            info!("Loading profile from {}", file);
            Content::from_file(Path::new(file))?
        }
        None => match config.profile {
            Some(profile) => {
                profile.validate()?;
                profile
            }
            None => Content::default(),
        },
    };

    Ok(ResolvedConfig {
        listen_addr,
        key_path,
        log_file,
        inactivity_timeout: Duration::from_secs(
            config
                .server
                .inactivity_timeout_secs
                .unwrap_or(DEFAULT_INACTIVITY_TIMEOUT_SECS),
        ),
        welcome_delay: Duration::from_millis(welcome_delay_ms(config.session.welcome_delay_ms)),
        open_urls: config.session.open_urls.unwrap_or(true),
        content,
    })
}

/// The welcome screen stays up between two and three seconds; configured
/// values outside that window are clamped.
fn welcome_delay_ms(configured: Option<u64>) -> u64 {
    let Some(ms) = configured else {
        return DEFAULT_WELCOME_DELAY_MS;
    };
    let clamped = ms.clamp(MIN_WELCOME_DELAY_MS, MAX_WELCOME_DELAY_MS);
    if clamped != ms {
        warn!(
            "welcome_delay_ms = {} is outside {}..={}, using {}",
            ms, MIN_WELCOME_DELAY_MS, MAX_WELCOME_DELAY_MS, clamped
        );
    }
    clamped
}

/// Resolves where the connection log goes.
///
/// A bare file name lands next to the executable, a relative path with
/// directories is taken from the working directory, and an empty string
/// turns file logging off.
pub fn resolve_log_path(raw: &str) -> Option<PathBuf> {
    if raw.is_empty() {
        return None;
    }
    let path = PathBuf::from(raw);
    if path.is_absolute() {
        return Some(path);
    }
    if !raw.contains('/') && !raw.contains('\\') {
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                return Some(dir.join(raw));
            }
        }
        return Some(path);
    }
    match std::env::current_dir() {
        Ok(cwd) => Some(cwd.join(path)),
        Err(_) => Some(path),
    }
}
