// ABOUTME: Server info commands for shantisaathi-cli
// ABOUTME: Health check and language catalogue listing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ShantiSaathi Contributors

use anyhow::Result;
use shantisaathi_server::client::ChatClient;
use tracing::error;

use crate::helpers::display::{display_health, display_languages};

/// Query and print `/health`
pub async fn health(client: &ChatClient) -> Result<()> {
    match client.health().await {
        Ok(info) => {
            display_health(client.base_url(), &info);
            Ok(())
        }
        Err(e) => {
            error!("Health check failed: {e}");
            Err(e.into())
        }
    }
}

/// Query and print the language catalogue
pub async fn languages(client: &ChatClient) -> Result<()> {
    let languages = client.languages().await?;
    display_languages(&languages);
    Ok(())
}
