//! sshfolio library exports for the binary and integration tests

pub mod browser;
pub mod core;
pub mod logging;
pub mod server;
pub mod tui;

#[cfg(test)]
pub mod test_support;
