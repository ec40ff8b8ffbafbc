use clap::Parser;
use log::info;
use std::path::PathBuf;

use sshfolio::core::config::{self, CliOverrides};
use sshfolio::logging;
use sshfolio::server;
use sshfolio::tui::styles::Palette;

#[derive(Parser)]
#[command(name = "sshfolio", about = "A personal profile served over SSH")]
struct Args {
    /// Address to listen on, e.g. 0.0.0.0:2222
    #[arg(long)]
    addr: Option<String>,

    /// OpenSSH private key used as the host key
    #[arg(long)]
    key: Option<String>,

    /// Connection log file; an empty value disables file logging
    #[arg(long)]
    log: Option<String>,

    /// Config file (default: ~/.sshfolio/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Profile content file (TOML)
    #[arg(long)]
    profile: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Before config loading, so its warnings reach the terminal.
    let log_file = logging::init();

    let file_config = config::load_config(args.config.as_deref())?;
    let cli = CliOverrides {
        listen_addr: args.addr,
        key_path: args.key,
        log_file: args.log,
        profile_file: args.profile,
    };
    let resolved = config::resolve(file_config, &cli)?;

    logging::attach_file(&log_file, resolved.log_file.as_deref());

    // Bad theme colors fail here, not on the first connection.
    Palette::from_theme(&resolved.content.theme)?;
    info!(
        "sshfolio starting up: profile \"{}\" with {} sections",
        resolved.content.title,
        resolved.content.section_count()
    );

    server::run(resolved).await?;
    Ok(())
}
