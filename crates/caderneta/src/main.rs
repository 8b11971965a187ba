//! Caderneta - terminal client for the homeschooling records API.
//!
//! Registers children, manages learning goals, logs activities, downloads
//! generated PDF reports, and requests simulated AI progress analyses against
//! a remote backend.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

mod api;
mod config;
mod controller;
mod shell;
mod state;
mod types;
mod view;

use api::ApiClient;
use config::ApiConfig;
use controller::Controller;
use shell::Shell;

#[derive(Parser, Debug)]
#[command(name = "caderneta")]
#[command(about = "Cliente de terminal para registros de homeschooling")]
#[command(version)]
struct Args {
    /// Base URL of the records API (overrides CADERNETA_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Directory where generated reports are saved
    #[arg(short, long, default_value = "downloads")]
    output: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level))
        .add_directive("hyper=warn".parse().unwrap())
        .add_directive("reqwest=warn".parse().unwrap());

    fmt().with_env_filter(filter).with_target(false).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(&args.log_level);

    let config = ApiConfig::resolve(args.api_url)?;
    let api = ApiClient::new(config.base_url);
    let controller = Controller::new(api);

    let mut shell = Shell::new(controller, args.output);
    shell.run().await
}
