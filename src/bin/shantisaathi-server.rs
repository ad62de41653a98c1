// ABOUTME: ShantiSaathi HTTP server binary
// ABOUTME: Loads environment configuration, builds the model provider and serves the chat API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ShantiSaathi Contributors

//! # ShantiSaathi API Server Binary
//!
//! Starts the chat relay. A missing credential for the selected cloud
//! provider is fatal at startup.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use shantisaathi_server::{
    config::environment::ServerConfig, llm::ChatProvider, logging, resources::ServerResources,
    server,
};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "shantisaathi-server")]
#[command(about = "ShantiSaathi - multilingual mental-wellness chat API")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    port: Option<u16>,

    /// Override bind host
    #[arg(long)]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env().inspect_err(|e| {
        error!("Configuration error: {e:#}");
    })?;
    if let Some(port) = args.port {
        config.http_port = port;
    }
    if let Some(host) = args.host {
        config.host = host;
    }

    let provider = ChatProvider::from_config(&config.llm)?;
    info!("Starting ShantiSaathi API ({})", config.environment);

    let resources = Arc::new(ServerResources::new(config, Arc::new(provider)));

    if let Err(e) = server::run(resources).await {
        error!("Server error: {e:#}");
        return Err(e);
    }
    Ok(())
}
