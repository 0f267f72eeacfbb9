// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Asynchronous application command processing.
//!
//! This module implements the command pattern used to offload potentially
//! blocking work, such as fetching the catalog, from the event loop thread.
//! It provides a dedicated worker loop that executes [`AppCommand`] requests
//! and broadcasts the results back to the application via [`AppEvent`]s.

use anyhow::Result;
use std::{
    sync::mpsc::{Receiver, Sender},
    thread,
};
use tracing::{info, warn};

use crate::{actions::events::AppEvent, catalog, config::AppConfig};

#[derive(Debug)]
pub(crate) enum AppCommand {
    LoadCatalog,
}

/// Spawns a background thread to process application commands.
///
/// # Arguments
///
/// * `config` - The application configuration.
/// * `command_rx` - The receiving end of the command channel.
/// * `event_tx` - The sending end of the channel for broadcasting results.
pub(crate) fn spawn_command_worker(
    config: &AppConfig,
    command_rx: Receiver<AppCommand>,
    event_tx: Sender<AppEvent>,
) {
    let config = config.clone();

    thread::spawn(move || {
        while let Ok(request) = command_rx.recv() {
            if let Err(e) = handle_command(&config, request, &event_tx) {
                warn!(error = ?e, "Command failed");
                let _ = event_tx.send(AppEvent::Error(format!("{e:#}")));
            }
        }
    });
}

/// Executes a single command and sends the result back through the
/// application event channel.
fn handle_command(config: &AppConfig, command: AppCommand, event_tx: &Sender<AppEvent>) -> Result<()> {
    match command {
        AppCommand::LoadCatalog => {
            let albums = catalog::load_catalog(&config.catalog_url)?;
            info!(albums = albums.len(), source = %config.catalog_url, "Catalog loaded");
            event_tx.send(AppEvent::CatalogLoaded(albums))?;
        }
    }

    Ok(())
}
