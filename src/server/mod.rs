//! # SSH Server
//!
//! Transport adapter around russh. Accepts any user, negotiates a PTY per
//! session channel, and runs one [`run_session`](crate::tui::run_session)
//! task per shell request. The profile content and URL opener are built
//! once at startup and shared read-only by every connection.

mod handler;
mod writer;

use std::fmt;
use std::io;
use std::net::{SocketAddr, TcpListener};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};
use russh::MethodSet;
use russh::server::{Config, Server};
use russh_keys::key::KeyPair;

use crate::browser::{DisabledOpener, SystemOpener, UrlOpener};
use crate::core::config::ResolvedConfig;
use crate::core::content::Content;
use crate::tui::SessionOptions;

pub use handler::ConnectionHandler;

#[derive(Debug)]
pub enum ServerError {
    /// The listen address is taken by another process.
    AddrInUse(String),
    HostKey(String),
    Config(String),
    Io(io::Error),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::AddrInUse(addr) => write!(f, "address {addr} is already in use"),
            ServerError::HostKey(msg) => write!(f, "host key error: {msg}"),
            ServerError::Config(msg) => write!(f, "invalid server config: {msg}"),
            ServerError::Io(e) => write!(f, "server I/O error: {e}"),
        }
    }
}

impl std::error::Error for ServerError {}

impl From<io::Error> for ServerError {
    fn from(e: io::Error) -> Self {
        ServerError::Io(e)
    }
}

/// Read-only state every connection shares.
pub struct SessionShared {
    pub content: Arc<Content>,
    pub opener: Arc<dyn UrlOpener>,
    pub options: SessionOptions,
}

#[derive(Clone)]
pub struct FolioServer {
    shared: Arc<SessionShared>,
}

impl FolioServer {
    pub fn new(shared: SessionShared) -> Self {
        Self {
            shared: Arc::new(shared),
        }
    }
}

impl Server for FolioServer {
    type Handler = ConnectionHandler;

    fn new_client(&mut self, peer: Option<SocketAddr>) -> ConnectionHandler {
        ConnectionHandler::new(Arc::clone(&self.shared), peer)
    }

    fn handle_session_error(&mut self, error: russh::Error) {
        warn!("Session error: {}", error);
    }
}

/// Fails early with a readable error when the address is taken.
pub fn check_port(addr: &str) -> Result<(), ServerError> {
    match TcpListener::bind(addr) {
        Ok(listener) => {
            drop(listener);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::AddrInUse => {
            warn!(
                "Port already in use on {}. Stop the other process or pass --addr.",
                addr
            );
            Err(ServerError::AddrInUse(addr.to_string()))
        }
        Err(e) => Err(ServerError::Io(e)),
    }
}

/// Loads the configured host key, or generates a throwaway Ed25519 key.
pub fn load_host_key(path: Option<&Path>) -> Result<KeyPair, ServerError> {
    match path {
        Some(path) => {
            info!("Loading host key from {}", path.display());
            russh_keys::load_secret_key(path, None)
                .map_err(|e| ServerError::HostKey(format!("{}: {}", path.display(), e)))
        }
        None => {
            warn!("No host key configured; generating an ephemeral Ed25519 key");
            KeyPair::generate_ed25519()
                .ok_or_else(|| ServerError::HostKey("failed to generate Ed25519 key".to_string()))
        }
    }
}

pub fn ssh_config(key: KeyPair, inactivity_timeout: Duration) -> Config {
    Config {
        inactivity_timeout: Some(inactivity_timeout),
        auth_rejection_time: Duration::from_secs(1),
        auth_rejection_time_initial: Some(Duration::from_secs(0)),
        methods: MethodSet::NONE | MethodSet::PUBLICKEY,
        keys: vec![key],
        ..Default::default()
    }
}

/// Serves the profile until the listener fails.
pub async fn run(config: ResolvedConfig) -> Result<(), ServerError> {
    if config.listen_addr.is_empty() {
        return Err(ServerError::Config("listen address is empty".to_string()));
    }
    check_port(&config.listen_addr)?;

    let key = load_host_key(config.key_path.as_deref())?;
    let ssh_config = Arc::new(ssh_config(key, config.inactivity_timeout));

    let opener: Arc<dyn UrlOpener> = if config.open_urls {
        Arc::new(SystemOpener)
    } else {
        info!("URL opening disabled");
        Arc::new(DisabledOpener)
    };
    let mut server = FolioServer::new(SessionShared {
        content: Arc::new(config.content),
        opener,
        options: SessionOptions {
            welcome_delay: config.welcome_delay,
        },
    });

    info!("Starting SSH server on {}", config.listen_addr);
    server
        .run_on_address(ssh_config, config.listen_addr.as_str())
        .await?;
    Ok(())
}
