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

//! Play event telemetry.
//!
//! Every track start is reported to the tracking endpoint. Reports are handed
//! to a background worker over a channel and posted once; a failed post is
//! logged and dropped. Nothing in here can fail back into playback.

use std::{
    sync::mpsc::{self, Receiver, Sender},
    thread,
    time::Duration,
};

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::Serialize;
use tracing::{debug, info, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct PlayEvent {
    #[serde(rename = "albumId")]
    pub(crate) album_id: String,
    #[serde(rename = "trackName")]
    pub(crate) track_name: String,
}

/// Fire-and-forget sender of play events.
#[derive(Clone)]
pub(crate) struct PlayEventReporter {
    event_tx: Sender<PlayEvent>,
}

impl PlayEventReporter {
    pub(crate) fn new(event_tx: Sender<PlayEvent>) -> Self {
        Self { event_tx }
    }

    /// Queues a "track started" event. Never blocks and never fails.
    pub(crate) fn report(&self, album_id: &str, track_name: &str) {
        let event = PlayEvent {
            album_id: album_id.to_string(),
            track_name: track_name.to_string(),
        };

        if self.event_tx.send(event).is_err() {
            warn!(album_id, track_name, "Play event reporter is not running, event dropped");
        }
    }
}

/// Spawns the background worker that posts play events to `endpoint`.
///
/// An empty endpoint disables reporting; events are then only logged.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be created.
pub(crate) fn spawn_reporter_worker(endpoint: &str) -> Result<PlayEventReporter> {
    let (event_tx, event_rx) = mpsc::channel();

    let client = Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(format!("dreamplayer/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to create play event HTTP client")?;

    let endpoint = endpoint.trim().to_string();
    thread::spawn(move || reporter_worker(&client, &endpoint, event_rx));

    Ok(PlayEventReporter::new(event_tx))
}

fn reporter_worker(client: &Client, endpoint: &str, event_rx: Receiver<PlayEvent>) {
    while let Ok(event) = event_rx.recv() {
        if endpoint.is_empty() {
            debug!(album_id = %event.album_id, track = %event.track_name, "Play event (reporting disabled)");
            continue;
        }

        match post_play_event(client, endpoint, &event) {
            Ok(()) => info!(album_id = %event.album_id, track = %event.track_name, "Track play recorded"),
            Err(e) => warn!(
                album_id = %event.album_id,
                track = %event.track_name,
                error = ?e,
                "Failed to record track play"
            ),
        }
    }
}

/// Posts a single play event. There is no retry.
fn post_play_event(client: &Client, endpoint: &str, event: &PlayEvent) -> Result<()> {
    client
        .post(endpoint)
        .json(event)
        .send()
        .context("Play event request failed")?
        .error_for_status()
        .context("Play event rejected")?;

    Ok(())
}
