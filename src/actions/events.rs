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

//! Application event distribution and orchestration.
//!
//! This module defines the central event-handling logic for the application,
//! bridging console input, background worker updates (catalog, audio
//! handles) and the playback controller.
//!
//! # Architecture
//!
//! The system follows a reactive event-loop pattern:
//!
//! 1. **Capture**: Events are received via the [`AppEvent`] enum through a
//!    channel fed by the input thread and the background workers.
//! 2. **Process**: [`handle_event`] updates the [`App`] state and drives the
//!    playback controller and entitlement gate.
//! 3. **Report**: Any text produced while processing is written to the
//!    console before the next event is taken.

use std::io::Write;

use anyhow::Result;
use tracing::{debug, warn};

use crate::{
    App, CatalogView,
    actions::commands::AppCommand,
    commander::{self, ConsoleCommand, HELP},
    controller::{PlaybackController, PlaybackError, PlaybackPhase},
    entitlement::{PurchaseResult, PurchaseStore},
    model::Album,
    player::{AudioBackend, PlayerEvent},
    render,
};

#[derive(Debug)]
pub(crate) enum AppEvent {
    Input(String),

    CatalogLoaded(Vec<Album>),

    Player(PlayerEvent),

    /// Periodic status refresh.
    Tick,

    ExitApplication,

    Error(String),
}

/// Runs the main application loop, writing any output to `out`.
///
/// This function loops until an [`AppEvent::ExitApplication`] event is
/// received or the event channel is closed.
pub(crate) fn process_events<B: AudioBackend, S: PurchaseStore>(
    app: &mut App<B, S>,
    out: &mut impl Write,
) -> Result<()> {
    while let Ok(event) = app.event_rx.recv() {
        if matches!(event, AppEvent::ExitApplication) {
            debug!("Exit requested");
            break;
        }

        for line in handle_event(app, event)? {
            writeln!(out, "{line}")?;
        }
        out.flush()?;
    }

    Ok(())
}

/// Applies a single event, returning the lines to show the user.
///
/// # Errors
///
/// Only fails when a channel to a background worker is broken, problems
/// with playback or purchases are reported as output instead.
pub(crate) fn handle_event<B: AudioBackend, S: PurchaseStore>(
    app: &mut App<B, S>,
    event: AppEvent,
) -> Result<Vec<String>> {
    match event {
        AppEvent::Input(line) => match commander::parse(&line) {
            Ok(Some(command)) => run_command(app, command),
            Ok(None) => Ok(vec![]),
            Err(e) => Ok(vec![e.to_string()]),
        },

        AppEvent::CatalogLoaded(albums) => {
            app.catalog = albums;
            app.view = CatalogView::All;
            Ok(vec![
                format!("{} albums in the catalog.", app.catalog.len()),
                render::album_list(&app.catalog, &app.entitlements),
            ])
        }

        AppEvent::Player(event) => Ok(on_player_event(app, event)),

        AppEvent::Tick if app.controller.phase() == PlaybackPhase::LoadedPlaying => {
            Ok(vec![status(app)])
        }
        AppEvent::Tick => Ok(vec![]),

        AppEvent::Error(message) => Ok(vec![format!("Error: {message}")]),

        AppEvent::ExitApplication => Ok(vec![]),
    }
}

fn run_command<B: AudioBackend, S: PurchaseStore>(
    app: &mut App<B, S>,
    command: ConsoleCommand,
) -> Result<Vec<String>> {
    let output = match command {
        ConsoleCommand::Albums => vec![render::album_list(&app.visible_albums(), &app.entitlements)],

        ConsoleCommand::ShowPurchased => {
            let purchased = app.entitlements.list_purchased(&app.catalog);
            if purchased.is_empty() {
                app.view = CatalogView::All;
                vec!["You haven't purchased any albums.".to_string()]
            } else {
                app.view = CatalogView::Purchased;
                vec![render::album_list(&purchased, &app.entitlements)]
            }
        }

        ConsoleCommand::ShowAll => {
            app.view = CatalogView::All;
            vec![render::album_list(&app.catalog, &app.entitlements)]
        }

        ConsoleCommand::Select(n) => {
            let albums = app.visible_albums();
            match albums.get(n) {
                None => vec![no_such_album(n)],
                Some(album) if app.config.require_purchase && !app.entitlements.is_purchased(&album.id) => {
                    vec![format!("You need to purchase {} before playing it.", album.name)]
                }
                Some(album) => {
                    let tracks = render::track_list(album, None);
                    app.controller.select_album(album.clone());
                    vec![tracks]
                }
            }
        }

        ConsoleCommand::Play(n) => playback(app, |c| c.load_and_play(n)),
        ConsoleCommand::TogglePause => playback(app, |c| c.toggle_play_pause()),
        ConsoleCommand::Next => playback(app, |c| c.next()),
        ConsoleCommand::Previous => playback(app, |c| c.previous()),
        ConsoleCommand::Volume(volume) => playback(app, |c| c.set_volume(volume)),
        ConsoleCommand::Seek(position) => playback(app, |c| c.seek(position)),

        ConsoleCommand::Shuffle(flag) => {
            let shuffle = flag.unwrap_or(!app.controller.state().shuffle);
            app.controller.set_shuffle(shuffle);
            vec![format!("Shuffle {}", on_off(shuffle))]
        }
        ConsoleCommand::Repeat(flag) => {
            let repeat = flag.unwrap_or(!app.controller.state().repeat);
            app.controller.set_repeat(repeat);
            vec![format!("Repeat {}", on_off(repeat))]
        }

        ConsoleCommand::Buy(n) => {
            let albums = app.visible_albums();
            match albums.get(n) {
                None => vec![no_such_album(n)],
                Some(album) => match app.entitlements.purchase(album) {
                    Ok(PurchaseResult::Purchased) => vec![format!("You have purchased {}!", album.name)],
                    Ok(PurchaseResult::AlreadyOwned) => {
                        vec![format!("You have already purchased {}!", album.name)]
                    }
                    Err(e) => vec![format!("Purchase of {} did not go through: {e}", album.name)],
                },
            }
        }

        ConsoleCommand::Status => vec![status(app)],

        ConsoleCommand::Reload => {
            app.command_tx.send(AppCommand::LoadCatalog)?;
            vec!["Reloading catalog...".to_string()]
        }

        ConsoleCommand::Help => vec![HELP.to_string()],

        ConsoleCommand::Quit => {
            app.event_tx.send(AppEvent::ExitApplication)?;
            vec![]
        }
    };

    Ok(output)
}

/// Runs a controller operation and reports the resulting state or error.
fn playback<B: AudioBackend, S: PurchaseStore>(
    app: &mut App<B, S>,
    operation: impl FnOnce(&mut PlaybackController<B>) -> Result<(), PlaybackError>,
) -> Vec<String> {
    match operation(&mut app.controller) {
        Ok(()) => vec![status(app)],
        Err(e) => {
            warn!(error = %e, "Playback command failed");
            vec![format!("Error: {e}")]
        }
    }
}

/// Feeds a handle event to the controller; only track changes are shown.
fn on_player_event<B: AudioBackend, S: PurchaseStore>(app: &mut App<B, S>, event: PlayerEvent) -> Vec<String> {
    let generation = app.controller.state().generation;

    match app.controller.handle_player_event(event) {
        Ok(()) if app.controller.state().generation != generation => vec![status(app)],
        Ok(()) => vec![],
        Err(e) => vec![format!("Error: {e}"), status(app)],
    }
}

fn status<B: AudioBackend, S: PurchaseStore>(app: &App<B, S>) -> String {
    render::status_line(app.controller.state(), app.controller.phase())
}

fn no_such_album(n: usize) -> String {
    format!("There is no album {}, type 'albums' to list them.", n + 1)
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}
