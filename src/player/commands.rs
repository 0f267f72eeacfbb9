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

//! MPV-backed audio resource worker.
//!
//! Each audio handle owns one worker thread running its own `libmpv` context.
//! The worker bridges the handle's command channel and the MPV property
//! observation system:
//!
//! 1. **Command Channel**: Receives [`AudioPlayerCommand`]s from the handle.
//!    When the channel closes the worker ends and the context is dropped.
//! 2. **Event Channel**: Sends generation-tagged [`PlayerEvent`]s to the
//!    application event loop.

use std::{
    sync::mpsc::{self, Receiver, Sender, TryRecvError},
    thread,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use mpv::Format;
use tracing::{debug, warn};

use crate::{
    actions::events::AppEvent,
    player::{PlayerEvent, PlayerEventKind},
};

#[derive(Debug)]
pub(crate) enum AudioPlayerCommand {
    Play,
    Pause,
    Seek(f64),
    SetVolume(f64),
    Stop,
}

#[derive(Debug, PartialEq)]
enum Flow {
    Continue,
    Stop,
}

/// Per-resource bookkeeping kept by the worker loop.
struct WorkerState {
    generation: u64,
    progress_interval: Duration,
    duration: Option<f64>,
    last_progress: Option<Instant>,
    file_loaded: bool,
    pending_seek: Option<f64>,
    finished: bool,
}

/// Spawns the worker thread for one audio resource.
///
/// The call waits until the worker has created its MPV context and issued
/// the load command, so that failures to acquire the resource are reported
/// to the caller instead of being lost on the worker thread.
///
/// # Arguments
///
/// * `url` - The media to load.
/// * `generation` - The tag attached to every event this worker sends.
/// * `progress_interval` - Minimum time between two progress events.
/// * `command_rx` - The receiving end of the handle's command channel.
/// * `event_tx` - The channel used to broadcast playback events.
///
/// # Errors
///
/// Returns a description of the failure if the worker could not acquire the
/// resource.
pub(crate) fn spawn_player_worker(
    url: String,
    generation: u64,
    progress_interval: Duration,
    command_rx: Receiver<AudioPlayerCommand>,
    event_tx: Sender<AppEvent>,
) -> Result<(), String> {
    let (ready_tx, ready_rx) = mpsc::sync_channel::<Result<(), String>>(1);

    thread::spawn(move || {
        let mut handler = match open_media(&url) {
            Ok(handler) => handler,
            Err(e) => {
                let _ = ready_tx.send(Err(format!("{e:#}")));
                return;
            }
        };
        let _ = ready_tx.send(Ok(()));

        let mut state = WorkerState {
            generation,
            progress_interval,
            duration: None,
            last_progress: None,
            file_loaded: false,
            pending_seek: None,
            finished: false,
        };

        if let Err(e) = audio_player_worker(&mut handler, &mut state, &command_rx, &event_tx) {
            warn!(generation, error = %e, "Audio worker failed");
            let _ = event_tx.send(AppEvent::Player(PlayerEvent {
                generation,
                kind: PlayerEventKind::Failed(e.to_string()),
            }));
        }

        debug!(generation, "Audio worker finished");
    });

    ready_rx
        .recv()
        .unwrap_or_else(|_| Err("audio worker exited during start-up".to_string()))
}

/// Creates a paused MPV context and loads `url` into it.
fn open_media(url: &str) -> Result<mpv::MpvHandler> {
    let mut builder = mpv::MpvHandlerBuilder::new().context("Failed to create MPV builder")?;
    builder
        .set_option("vo", "null")
        .context("Failed to set no video output")?;
    // Playback only starts once the controller has applied volume and seek.
    builder
        .set_option("pause", "yes")
        .context("Failed to start paused")?;
    let mut handler = builder.build().context("Failed to build MPV handler")?;

    handler
        .observe_property::<f64>("duration", 0)
        .context("Failed to observe duration")?;
    handler
        .observe_property::<f64>("time-pos", 0)
        .context("Failed to observe time-pos")?;

    handler
        .command(&["loadfile", url, "replace"])
        .context(format!("Failed to load file: {}", url))?;

    Ok(handler)
}

/// The execution loop for one audio resource.
///
/// Alternates between draining handle commands and polling MPV events until
/// the handle is disposed.
fn audio_player_worker(
    handler: &mut mpv::MpvHandler,
    state: &mut WorkerState,
    command_rx: &Receiver<AudioPlayerCommand>,
    event_tx: &Sender<AppEvent>,
) -> Result<()> {
    loop {
        if process_commands(handler, state, command_rx)? == Flow::Stop {
            return Ok(());
        }
        if process_mpv_events(handler, state, event_tx)? == Flow::Stop {
            return Ok(());
        }
    }
}

/// Drains and executes all pending commands from the handle.
fn process_commands(
    handler: &mut mpv::MpvHandler,
    state: &mut WorkerState,
    command_rx: &Receiver<AudioPlayerCommand>,
) -> Result<Flow> {
    loop {
        let command = match command_rx.try_recv() {
            Ok(command) => command,
            Err(TryRecvError::Empty) => return Ok(Flow::Continue),
            Err(TryRecvError::Disconnected) => return Ok(Flow::Stop),
        };

        match command {
            AudioPlayerCommand::Play => handler.set_property("pause", false)?,
            AudioPlayerCommand::Pause => handler.set_property("pause", true)?,
            AudioPlayerCommand::Seek(fraction) => {
                if state.file_loaded {
                    seek_to(handler, fraction)?;
                } else {
                    state.pending_seek = Some(fraction);
                }
            }
            AudioPlayerCommand::SetVolume(volume) => {
                handler.set_property("volume", (volume * 100.0).clamp(0.0, 100.0))?
            }
            AudioPlayerCommand::Stop => {
                handler.command(&["stop"])?;
                return Ok(Flow::Stop);
            }
        }
    }
}

fn seek_to(handler: &mut mpv::MpvHandler, fraction: f64) -> Result<()> {
    let percent = (fraction * 100.0).clamp(0.0, 100.0).to_string();
    handler
        .command(&["seek", &percent, "absolute-percent"])
        .context("Failed to seek")?;
    Ok(())
}

/// Polls for an MPV event and translates it into a [`PlayerEvent`].
///
/// This function waits for up to 50ms for an event from the MPV context.
/// Progress is rate limited to one event per `progress_interval`, completion
/// is sent once.
fn process_mpv_events(
    handler: &mut mpv::MpvHandler,
    state: &mut WorkerState,
    event_tx: &Sender<AppEvent>,
) -> Result<Flow> {
    let Some(mpv_event) = handler.wait_event(0.05) else {
        return Ok(Flow::Continue);
    };

    let mut just_loaded = false;

    let kind = match mpv_event {
        mpv::Event::FileLoaded => {
            state.file_loaded = true;
            just_loaded = true;
            None
        }
        mpv::Event::PropertyChange { name, change, .. } => match (name, change) {
            ("duration", Format::Double(duration)) => {
                state.duration = Some(duration);
                None
            }
            ("time-pos", Format::Double(seconds)) if seconds >= 0.0 => progress(state, seconds),
            _ => None,
        },
        mpv::Event::EndFile(Ok(reason)) if !state.finished => match reason {
            mpv::EndFileReason::MPV_END_FILE_REASON_EOF => {
                state.finished = true;
                Some(PlayerEventKind::Completed)
            }
            mpv::EndFileReason::MPV_END_FILE_REASON_ERROR => {
                state.finished = true;
                Some(PlayerEventKind::Failed("media could not be decoded".to_string()))
            }
            _ => None,
        },
        _ => None,
    };

    if just_loaded {
        if let Some(fraction) = state.pending_seek.take() {
            seek_to(handler, fraction)?;
        }
    }

    if let Some(kind) = kind {
        let event = AppEvent::Player(PlayerEvent {
            generation: state.generation,
            kind,
        });
        if event_tx.send(event).is_err() {
            // The application has shut down.
            return Ok(Flow::Stop);
        }
    }

    Ok(Flow::Continue)
}

fn progress(state: &mut WorkerState, seconds: f64) -> Option<PlayerEventKind> {
    let duration = state.duration.filter(|d| *d > 0.0)?;

    let now = Instant::now();
    if let Some(last) = state.last_progress {
        if now.duration_since(last) < state.progress_interval {
            return None;
        }
    }
    state.last_progress = Some(now);

    Some(PlayerEventKind::Progress((seconds / duration).clamp(0.0, 1.0)))
}
