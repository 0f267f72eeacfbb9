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

//! # Album Player.
//!
//! A console music player for an online album catalog.
//!
//! The listener picks an album from the catalog and plays its tracks; the
//! player moves through the album under shuffle and repeat rules, reports
//! every track start to the tracking service, and remembers which albums the
//! listener has purchased.
//!
//! It uses an event-driven architecture where:
//!
//! * The **Main Thread** owns all application state and runs the event loop.
//! * **Background Workers** fetch the catalog, post play events and drive
//!   the audio engine, reporting back through channels.
//! * An **Input Thread** forwards console lines to the event loop.
//!
//! ## Architecture
//!
//! Communication between the event loop and the workers is handled via
//! `std::sync::mpsc` channels. The playback controller is only ever touched
//! from the main thread.

mod actions;
mod catalog;
mod commander;
mod config;
mod controller;
mod db;
mod entitlement;
mod logging;
mod model;
mod player;
mod queue;
mod render;
mod reporter;

use anyhow::{Context, Result};
use std::{
    io::{self, BufRead},
    sync::mpsc::{self, Receiver, Sender},
    thread,
};
use tracing::{info, warn};

use crate::{
    actions::{
        commands::AppCommand,
        events::{AppEvent, process_events},
    },
    config::AppConfig,
    controller::PlaybackController,
    db::SqliteStore,
    entitlement::{EntitlementGate, PurchaseStore},
    model::Album,
    player::{AudioBackend, MpvBackend},
};

/// Which albums numbered commands refer to.
#[derive(Clone, Copy, Debug, PartialEq)]
enum CatalogView {
    All,
    Purchased,
}

/// Application state.
struct App<B: AudioBackend, S: PurchaseStore> {
    pub config: AppConfig,

    pub event_tx: Sender<AppEvent>,
    pub event_rx: Receiver<AppEvent>,

    pub command_tx: Sender<AppCommand>,

    pub controller: PlaybackController<B>,
    pub entitlements: EntitlementGate<S>,

    pub catalog: Vec<Album>,
    pub view: CatalogView,
}

impl<B: AudioBackend, S: PurchaseStore> App<B, S> {
    pub fn new(
        config: AppConfig,
        event_tx: Sender<AppEvent>,
        event_rx: Receiver<AppEvent>,
        command_tx: Sender<AppCommand>,
        controller: PlaybackController<B>,
        entitlements: EntitlementGate<S>,
    ) -> Self {
        Self {
            config,
            event_tx,
            event_rx,
            command_tx,
            controller,
            entitlements,
            catalog: vec![],
            view: CatalogView::All,
        }
    }

    /// The albums in the current view, in catalog order.
    pub fn visible_albums(&self) -> Vec<Album> {
        match self.view {
            CatalogView::All => self.catalog.clone(),
            CatalogView::Purchased => self.entitlements.list_purchased(&self.catalog),
        }
    }
}

/// Creates the application state backed by `libmpv` and the local database.
fn build_app(config: AppConfig, command_tx: Sender<AppCommand>) -> Result<App<MpvBackend, SqliteStore>> {
    let (event_tx, event_rx) = mpsc::channel();

    let backend = MpvBackend::new(event_tx.clone(), config.progress_interval());
    let reporter = reporter::spawn_reporter_worker(&config.report_url)?;
    let controller = PlaybackController::new(backend, reporter, config.default_volume);

    let conn = db::init_db(&config.database_file).context("Failed to initialise database")?;
    let entitlements =
        EntitlementGate::new(SqliteStore::new(conn), &config.user).context("Failed to load purchases")?;

    Ok(App::new(config, event_tx, event_rx, command_tx, controller, entitlements))
}

/// The entry point of the application.
///
/// Sets up logging and the communication channels, initializes the
/// application state, runs the event loop and stores the last volume used.
fn main() -> Result<()> {
    let mut config = config::load_config();

    let _log_guard = match logging::init_logging(&config.log_dir) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: Failed to initialize logging: {e:#}");
            None
        }
    };

    info!(user = %config.user, "Starting");

    let (command_tx, command_rx) = mpsc::channel();

    let mut app = build_app(config.clone(), command_tx).context("Failed to initialise application")?;
    info!(purchases = app.entitlements.purchased_count(), "Application ready");

    let res = run(&mut app, command_rx);

    config.default_volume = app.controller.state().volume;
    if let Err(e) = config::save_config(&config) {
        warn!(error = %e, "Failed to save configuration");
    }

    res.context("Application error occurred")
}

/// Starts the application's background workers and enters the main event loop.
///
/// This function spawns:
/// * A command worker to process asynchronous [`AppCommand`]s.
/// * An input thread forwarding console lines.
/// * A tick thread to trigger periodic status refreshes, unless disabled.
///
/// # Errors
///
/// Returns an error if the event processing loop encounters an unrecoverable
/// application error.
fn run<B: AudioBackend, S: PurchaseStore>(app: &mut App<B, S>, command_rx: Receiver<AppCommand>) -> Result<()> {
    let command_event_tx = app.event_tx.clone();
    actions::commands::spawn_command_worker(&app.config, command_rx, command_event_tx);

    // End of input quits, as if the user typed it.
    let input_tx = app.event_tx.clone();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if input_tx.send(AppEvent::Input(line)).is_err() {
                return;
            }
        }
        let _ = input_tx.send(AppEvent::ExitApplication);
    });

    if let Some(interval) = app.config.status_interval() {
        let tick_tx = app.event_tx.clone();
        thread::spawn(move || {
            while tick_tx.send(AppEvent::Tick).is_ok() {
                thread::sleep(interval);
            }
        });
    }

    println!("{}", commander::HELP);

    // Initial trigger to populate the album list from the catalog
    app.command_tx.send(AppCommand::LoadCatalog)?;

    process_events(app, &mut io::stdout())
}
