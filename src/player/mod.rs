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

//! Audio resource handles.
//!
//! An [`AudioHandle`] wraps exactly one live media resource and its playback
//! controls. Handles are produced by an [`AudioBackend`] and tagged with the
//! generation the playback controller assigned when it asked for them; every
//! event a handle emits carries that generation so superseded handles can be
//! recognised and ignored.
//!
//! The production backend, [`MpvBackend`], runs one `libmpv` context per
//! handle on its own worker thread. Dropping or disposing the handle closes
//! the command channel, which ends the worker and releases the context.

mod commands;
#[cfg(test)]
pub(crate) mod testing;

use std::{path::Path, sync::mpsc, time::Duration};

use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::{actions::events::AppEvent, player::commands::AudioPlayerCommand};

/// Something a live handle reports back to the application.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum PlayerEventKind {
    /// Playback position as a fraction of the media duration.
    Progress(f64),
    /// End of media was reached. Sent at most once per handle.
    Completed,
    /// The media could not be decoded after the handle was created.
    Failed(String),
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PlayerEvent {
    pub(crate) generation: u64,
    pub(crate) kind: PlayerEventKind,
}

#[derive(Debug, Error)]
pub(crate) enum PlayerError {
    #[error("failed to load {url}: {reason}")]
    ResourceLoad { url: String, reason: String },

    #[error("audio resource has already been released")]
    Disposed,

    #[error("audio worker is no longer running")]
    Disconnected,
}

/// Controls for a single live media resource.
pub(crate) trait AudioHandle {
    fn play(&mut self) -> Result<(), PlayerError>;

    fn pause(&mut self) -> Result<(), PlayerError>;

    /// Moves the playback position to `fraction` of the media duration.
    fn seek(&mut self, fraction: f64) -> Result<(), PlayerError>;

    /// Sets the output gain, `0.0` to `1.0`.
    fn set_volume(&mut self, volume: f64) -> Result<(), PlayerError>;

    /// Stops playback and releases the resource. Safe to call repeatedly.
    fn dispose(&mut self);
}

/// Creates audio handles.
pub(crate) trait AudioBackend {
    /// Acquires a resource for `url`, initially paused, whose events are
    /// tagged with `generation`.
    fn open(&self, url: &str, generation: u64) -> Result<Box<dyn AudioHandle>, PlayerError>;
}

/// Audio backend driving `libmpv`.
pub(crate) struct MpvBackend {
    event_tx: mpsc::Sender<AppEvent>,
    progress_interval: Duration,
}

impl MpvBackend {
    /// # Arguments
    ///
    /// * `event_tx` - The application event channel that handle events are
    ///   sent to.
    /// * `progress_interval` - The minimum time between two progress events
    ///   from the same handle.
    pub(crate) fn new(event_tx: mpsc::Sender<AppEvent>, progress_interval: Duration) -> Self {
        Self {
            event_tx,
            progress_interval,
        }
    }
}

impl AudioBackend for MpvBackend {
    fn open(&self, url: &str, generation: u64) -> Result<Box<dyn AudioHandle>, PlayerError> {
        let load_error = |reason: String| PlayerError::ResourceLoad {
            url: url.to_string(),
            reason,
        };

        check_media_location(url).map_err(load_error)?;

        let (command_tx, command_rx) = mpsc::channel::<AudioPlayerCommand>();

        commands::spawn_player_worker(
            url.to_string(),
            generation,
            self.progress_interval,
            command_rx,
            self.event_tx.clone(),
        )
        .map_err(load_error)?;

        debug!(generation, url, "Audio resource acquired");

        Ok(Box::new(MpvHandle {
            generation,
            command_tx: Some(command_tx),
        }))
    }
}

/// A handle to one `libmpv` worker.
struct MpvHandle {
    generation: u64,
    command_tx: Option<mpsc::Sender<AudioPlayerCommand>>,
}

impl MpvHandle {
    fn send(&self, command: AudioPlayerCommand) -> Result<(), PlayerError> {
        let command_tx = self.command_tx.as_ref().ok_or(PlayerError::Disposed)?;
        command_tx
            .send(command)
            .map_err(|_| PlayerError::Disconnected)
    }
}

impl AudioHandle for MpvHandle {
    fn play(&mut self) -> Result<(), PlayerError> {
        self.send(AudioPlayerCommand::Play)
    }

    fn pause(&mut self) -> Result<(), PlayerError> {
        self.send(AudioPlayerCommand::Pause)
    }

    fn seek(&mut self, fraction: f64) -> Result<(), PlayerError> {
        self.send(AudioPlayerCommand::Seek(fraction))
    }

    fn set_volume(&mut self, volume: f64) -> Result<(), PlayerError> {
        self.send(AudioPlayerCommand::SetVolume(volume))
    }

    fn dispose(&mut self) {
        if let Some(command_tx) = self.command_tx.take() {
            // The worker may already be gone, dropping the sender is what
            // releases the resource either way.
            let _ = command_tx.send(AudioPlayerCommand::Stop);
            debug!(generation = self.generation, "Audio resource released");
        }
    }
}

impl Drop for MpvHandle {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Rejects media locations that can never be opened.
///
/// Remote media must be an `http`, `https` or `file` URL, anything else must
/// name an existing local file.
fn check_media_location(location: &str) -> Result<(), String> {
    if location.trim().is_empty() {
        return Err("empty media location".to_string());
    }

    match Url::parse(location) {
        Ok(url) => match url.scheme() {
            "http" | "https" | "file" => Ok(()),
            scheme => Err(format!("unsupported scheme '{scheme}'")),
        },
        Err(_) if Path::new(location).is_file() => Ok(()),
        Err(e) => Err(format!("malformed media location: {e}")),
    }
}
