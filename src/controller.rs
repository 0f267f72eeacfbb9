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

//! Playback and queue control.
//!
//! The [`PlaybackController`] owns the playback state and the single live
//! [`AudioHandle`]. Every operation runs to completion on the caller's
//! thread; the only asynchronous inputs are player events, which arrive
//! through [`PlaybackController::handle_player_event`] and are checked
//! against the current generation before they are allowed to touch state.
//!
//! # Generations
//!
//! Each time the live handle is retired the generation counter is bumped.
//! Handles tag their events with the generation they were created under, so
//! a late "completed" from a track that has already been replaced is simply
//! dropped.

use std::ops::Range;

use thiserror::Error;
use tracing::{debug, info, trace, warn};

use crate::{
    model::{Album, Track},
    player::{AudioBackend, AudioHandle, PlayerError, PlayerEvent, PlayerEventKind},
    queue::{self, QueueMode, Transition},
    reporter::PlayEventReporter,
};

#[derive(Debug, Error)]
pub(crate) enum PlaybackError {
    #[error("no album selected")]
    NoAlbum,

    #[error("track {index} is out of range, the album has {len} tracks")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("{0} is not between 0 and 1")]
    InvalidFraction(f64),

    #[error(transparent)]
    Player(#[from] PlayerError),
}

/// Observable playback state.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PlaybackState {
    pub(crate) album: Option<Album>,
    pub(crate) current_index: usize,
    pub(crate) is_playing: bool,
    pub(crate) volume: f64,
    pub(crate) progress: f64,
    pub(crate) shuffle: bool,
    pub(crate) repeat: bool,
    pub(crate) generation: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PlaybackPhase {
    Idle,
    LoadedPaused,
    LoadedPlaying,
    Exhausted,
}

pub(crate) struct PlaybackController<B: AudioBackend> {
    backend: B,
    reporter: PlayEventReporter,
    handle: Option<Box<dyn AudioHandle>>,
    state: PlaybackState,
    exhausted: bool,
    pending_seek: Option<f64>,
    draw: fn(Range<usize>) -> usize,
}

impl<B: AudioBackend> PlaybackController<B> {
    /// Creates an idle controller.
    ///
    /// # Arguments
    ///
    /// * `backend` - Creates the audio handles.
    /// * `reporter` - Receives a play event for every track start.
    /// * `volume` - The initial volume, clamped to `0.0..=1.0`.
    pub(crate) fn new(backend: B, reporter: PlayEventReporter, volume: f64) -> Self {
        let volume = if volume.is_finite() { volume.clamp(0.0, 1.0) } else { 1.0 };

        Self {
            backend,
            reporter,
            handle: None,
            state: PlaybackState {
                album: None,
                current_index: 0,
                is_playing: false,
                volume,
                progress: 0.0,
                shuffle: false,
                repeat: false,
                generation: 0,
            },
            exhausted: false,
            pending_seek: None,
            draw: queue::random_index,
        }
    }

    pub(crate) fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub(crate) fn phase(&self) -> PlaybackPhase {
        if self.state.album.is_none() {
            PlaybackPhase::Idle
        } else if self.exhausted {
            PlaybackPhase::Exhausted
        } else if self.state.is_playing {
            PlaybackPhase::LoadedPlaying
        } else {
            PlaybackPhase::LoadedPaused
        }
    }

    pub(crate) fn current_track(&self) -> Option<&Track> {
        self.state
            .album
            .as_ref()
            .and_then(|album| album.track(self.state.current_index))
    }

    /// Makes `album` the active album, positioned on its first track.
    ///
    /// Any current playback is stopped. Nothing starts playing.
    pub(crate) fn select_album(&mut self, album: Album) {
        self.retire_handle();

        info!(album_id = %album.id, album = %album.name, tracks = album.len(), "Album selected");

        self.state.album = Some(album);
        self.state.current_index = 0;
        self.state.is_playing = false;
        self.state.progress = 0.0;
        self.exhausted = false;
    }

    /// Replaces the live handle with a new one playing track `index`.
    ///
    /// # Errors
    ///
    /// * [`PlaybackError::NoAlbum`] or [`PlaybackError::IndexOutOfRange`] if
    ///   there is no such track, nothing changes.
    /// * [`PlaybackError::Player`] if the media cannot be acquired. The old
    ///   handle has been released by then, playback is stopped and the
    ///   current index is left on the last track that loaded.
    pub(crate) fn load_and_play(&mut self, index: usize) -> Result<(), PlaybackError> {
        let album = self.state.album.as_ref().ok_or(PlaybackError::NoAlbum)?;
        let track = album
            .track(index)
            .ok_or(PlaybackError::IndexOutOfRange {
                index,
                len: album.len(),
            })?
            .clone();
        let album_id = album.id.clone();

        self.retire_handle();
        let generation = self.state.generation;
        let seek = self.pending_seek;

        let started = self
            .backend
            .open(&track.media_url, generation)
            .and_then(|mut handle| match start(handle.as_mut(), self.state.volume, seek) {
                Ok(()) => Ok(handle),
                Err(e) => {
                    handle.dispose();
                    Err(e)
                }
            });

        let handle = match started {
            Ok(handle) => handle,
            Err(e) => {
                warn!(index, url = %track.media_url, error = %e, "Failed to start track");
                self.state.is_playing = false;
                return Err(e.into());
            }
        };

        self.handle = Some(handle);
        self.pending_seek = None;
        self.state.current_index = index;
        self.state.is_playing = true;
        self.state.progress = seek.unwrap_or(0.0);
        self.exhausted = false;

        info!(album_id = %album_id, index, track = %track.name, generation, "Track started");

        self.reporter.report(&album_id, &track.name);

        Ok(())
    }

    /// Pauses or resumes the live handle, does nothing without one.
    pub(crate) fn toggle_play_pause(&mut self) -> Result<(), PlaybackError> {
        let Some(handle) = self.handle.as_mut() else {
            return Ok(());
        };

        if self.state.is_playing {
            handle.pause()?;
        } else {
            handle.play()?;
        }
        self.state.is_playing = !self.state.is_playing;

        debug!(is_playing = self.state.is_playing, "Playback toggled");

        Ok(())
    }

    pub(crate) fn next(&mut self) -> Result<(), PlaybackError> {
        let Some(album) = self.state.album.as_ref() else {
            return Ok(());
        };

        let transition = queue::next(album.len(), self.state.current_index, self.mode(), self.draw);
        self.apply(transition)
    }

    pub(crate) fn previous(&mut self) -> Result<(), PlaybackError> {
        if self.state.album.is_none() {
            return Ok(());
        }

        self.apply(queue::previous(self.state.current_index))
    }

    pub(crate) fn set_shuffle(&mut self, shuffle: bool) {
        self.state.shuffle = shuffle;
    }

    pub(crate) fn set_repeat(&mut self, repeat: bool) {
        self.state.repeat = repeat;
    }

    /// Sets the volume now if a handle is live, otherwise for the next one.
    pub(crate) fn set_volume(&mut self, volume: f64) -> Result<(), PlaybackError> {
        let volume = fraction(volume)?;

        self.state.volume = volume;
        if let Some(handle) = self.handle.as_mut() {
            handle.set_volume(volume)?;
        }

        Ok(())
    }

    /// Seeks the live handle, or remembers the position for the next one.
    pub(crate) fn seek(&mut self, position: f64) -> Result<(), PlaybackError> {
        let position = fraction(position)?;

        self.state.progress = position;
        match self.handle.as_mut() {
            Some(handle) => handle.seek(position)?,
            None => self.pending_seek = Some(position),
        }

        Ok(())
    }

    /// Applies an event from an audio handle.
    ///
    /// Events from any generation but the current one are dropped. On
    /// completion the shuffle and repeat flags are read as they are now, not
    /// as they were when the track started.
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::Player`] when the live media failed to decode,
    /// or when starting the following track fails.
    pub(crate) fn handle_player_event(&mut self, event: PlayerEvent) -> Result<(), PlaybackError> {
        if event.generation != self.state.generation || self.handle.is_none() {
            trace!(
                event_generation = event.generation,
                generation = self.state.generation,
                "Discarding stale player event"
            );
            return Ok(());
        }

        match event.kind {
            PlayerEventKind::Progress(progress) => {
                self.state.progress = progress.clamp(0.0, 1.0);
                Ok(())
            }
            PlayerEventKind::Completed => {
                debug!(index = self.state.current_index, "Track completed");
                self.state.progress = 1.0;
                self.next()
            }
            PlayerEventKind::Failed(reason) => {
                let url = self
                    .current_track()
                    .map(|track| track.media_url.clone())
                    .unwrap_or_default();

                warn!(index = self.state.current_index, url = %url, reason = %reason, "Playback failed");

                self.retire_handle();
                self.state.is_playing = false;

                Err(PlayerError::ResourceLoad { url, reason }.into())
            }
        }
    }

    fn mode(&self) -> QueueMode {
        QueueMode {
            shuffle: self.state.shuffle,
            repeat: self.state.repeat,
        }
    }

    fn apply(&mut self, transition: Transition) -> Result<(), PlaybackError> {
        debug!(?transition, index = self.state.current_index, "Queue transition");

        match transition {
            Transition::Replay(index) | Transition::Jump(index) | Transition::Advance(index) => {
                self.load_and_play(index)
            }
            Transition::Exhausted => {
                self.retire_handle();
                self.state.is_playing = false;
                self.exhausted = true;
                info!(index = self.state.current_index, "Queue exhausted");
                Ok(())
            }
            Transition::NoOp => Ok(()),
        }
    }

    /// Releases the live handle, if any, and invalidates its events.
    fn retire_handle(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.dispose();
        }
        self.state.generation += 1;
    }
}

impl<B: AudioBackend> Drop for PlaybackController<B> {
    fn drop(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.dispose();
        }
    }
}

fn start(handle: &mut dyn AudioHandle, volume: f64, seek: Option<f64>) -> Result<(), PlayerError> {
    handle.set_volume(volume)?;
    if let Some(position) = seek {
        handle.seek(position)?;
    }
    handle.play()
}

fn fraction(value: f64) -> Result<f64, PlaybackError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(PlaybackError::InvalidFraction(value))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::{self, Receiver};

    use super::*;
    use crate::{model::fixtures::album, player::testing::FakeBackend, reporter::PlayEvent};

    fn controller() -> (PlaybackController<FakeBackend>, FakeBackend, Receiver<PlayEvent>) {
        let backend = FakeBackend::default();
        let (event_tx, event_rx) = mpsc::channel();
        let controller =
            PlaybackController::new(backend.clone(), PlayEventReporter::new(event_tx), 1.0);
        (controller, backend, event_rx)
    }

    fn completed(controller: &PlaybackController<FakeBackend>) -> PlayerEvent {
        PlayerEvent {
            generation: controller.state().generation,
            kind: PlayerEventKind::Completed,
        }
    }

    #[test]
    fn starts_idle() {
        let (controller, backend, _) = controller();

        assert_eq!(controller.phase(), PlaybackPhase::Idle);
        assert_eq!(controller.state().volume, 1.0);
        assert_eq!(backend.opened(), 0);
    }

    #[test]
    fn sequential_navigation_runs_to_exhaustion() {
        let (mut controller, backend, _) = controller();
        controller.select_album(album("a", 3));
        controller.load_and_play(0).unwrap();

        controller.next().unwrap();
        assert_eq!(controller.state().current_index, 1);
        controller.next().unwrap();
        assert_eq!(controller.state().current_index, 2);
        controller.next().unwrap();

        assert_eq!(controller.state().current_index, 2);
        assert!(!controller.state().is_playing);
        assert_eq!(controller.phase(), PlaybackPhase::Exhausted);
        assert_eq!(backend.opened(), 3);
        assert_eq!(backend.last().borrow().disposed, 1);
    }

    #[test]
    fn natural_completion_on_last_track_exhausts() {
        let (mut controller, backend, _) = controller();
        controller.select_album(album("a", 3));
        controller.load_and_play(2).unwrap();

        controller.handle_player_event(completed(&controller)).unwrap();

        assert_eq!(controller.phase(), PlaybackPhase::Exhausted);
        assert_eq!(controller.state().current_index, 2);
        assert!(!controller.state().is_playing);
        assert_eq!(backend.opened(), 1);
    }

    #[test]
    fn completion_advances_to_next_track() {
        let (mut controller, backend, _) = controller();
        controller.select_album(album("a", 3));
        controller.load_and_play(0).unwrap();

        controller.handle_player_event(completed(&controller)).unwrap();

        assert_eq!(controller.state().current_index, 1);
        assert!(controller.state().is_playing);
        assert_eq!(backend.last().borrow().url, "https://media.example/a/1.mp3");
        assert!(backend.last().borrow().playing);
    }

    #[test]
    fn exhausted_queue_restarts_with_previous() {
        let (mut controller, _, _) = controller();
        controller.select_album(album("a", 2));
        controller.load_and_play(1).unwrap();
        controller.handle_player_event(completed(&controller)).unwrap();
        assert_eq!(controller.phase(), PlaybackPhase::Exhausted);

        controller.previous().unwrap();

        assert_eq!(controller.phase(), PlaybackPhase::LoadedPlaying);
        assert_eq!(controller.state().current_index, 0);
    }

    #[test]
    fn repeat_wins_over_shuffle_on_completion() {
        let (mut controller, backend, _) = controller();
        controller.select_album(album("a", 3));
        controller.set_shuffle(true);
        controller.set_repeat(true);
        controller.load_and_play(1).unwrap();

        for _ in 0..20 {
            controller.handle_player_event(completed(&controller)).unwrap();
            assert_eq!(controller.state().current_index, 1);
        }

        assert_eq!(backend.opened(), 21);
    }

    #[test]
    fn shuffle_draws_uniformly_over_album() {
        let (mut controller, _, _) = controller();
        controller.select_album(album("a", 3));
        controller.set_shuffle(true);
        controller.load_and_play(0).unwrap();

        let mut counts = [0usize; 3];
        for _ in 0..1000 {
            controller.handle_player_event(completed(&controller)).unwrap();
            let index = controller.state().current_index;
            assert!(index < 3);
            counts[index] += 1;
        }

        // Expected 333 each, the bounds are more than five standard
        // deviations away.
        for count in counts {
            assert!((250..=420).contains(&count), "counts {counts:?}");
        }
    }

    #[test]
    fn shuffle_may_replay_the_same_index() {
        let (mut controller, _, _) = controller();
        controller.draw = |_| 2;
        controller.select_album(album("a", 3));
        controller.set_shuffle(true);
        controller.load_and_play(2).unwrap();

        controller.next().unwrap();

        assert_eq!(controller.state().current_index, 2);
        assert!(controller.state().is_playing);
    }

    #[test]
    fn stale_completion_is_ignored() {
        let (mut controller, backend, _) = controller();
        controller.select_album(album("a", 3));
        controller.load_and_play(0).unwrap();
        let first_generation = backend.handle(0).borrow().generation;
        controller.load_and_play(1).unwrap();

        controller
            .handle_player_event(PlayerEvent {
                generation: first_generation,
                kind: PlayerEventKind::Completed,
            })
            .unwrap();

        assert_eq!(controller.state().current_index, 1);
        assert_eq!(backend.opened(), 2);
        assert_eq!(backend.handle(0).borrow().disposed, 1);
        assert_eq!(backend.handle(1).borrow().disposed, 0);
    }

    #[test]
    fn stale_progress_is_ignored() {
        let (mut controller, _, _) = controller();
        controller.select_album(album("a", 3));
        controller.load_and_play(0).unwrap();
        let old = controller.state().generation;
        controller.load_and_play(1).unwrap();

        controller
            .handle_player_event(PlayerEvent {
                generation: old,
                kind: PlayerEventKind::Progress(0.9),
            })
            .unwrap();
        assert_eq!(controller.state().progress, 0.0);

        controller
            .handle_player_event(PlayerEvent {
                generation: controller.state().generation,
                kind: PlayerEventKind::Progress(0.4),
            })
            .unwrap();
        assert_eq!(controller.state().progress, 0.4);
    }

    #[test]
    fn previous_at_first_track_is_a_no_op() {
        let (mut controller, backend, _) = controller();
        controller.select_album(album("a", 3));
        controller.load_and_play(0).unwrap();
        let before = controller.state().clone();

        controller.previous().unwrap();

        assert_eq!(controller.state(), &before);
        assert_eq!(backend.opened(), 1);
        assert_eq!(backend.handle(0).borrow().disposed, 0);
    }

    #[test]
    fn previous_ignores_shuffle_and_repeat() {
        let (mut controller, _, _) = controller();
        controller.select_album(album("a", 3));
        controller.set_shuffle(true);
        controller.set_repeat(true);
        controller.load_and_play(2).unwrap();

        controller.previous().unwrap();

        assert_eq!(controller.state().current_index, 1);
    }

    #[test]
    fn volume_set_while_idle_applies_to_next_handle() {
        let (mut controller, backend, _) = controller();
        controller.set_volume(0.3).unwrap();
        controller.select_album(album("a", 2));

        controller.load_and_play(0).unwrap();

        assert_eq!(backend.handle(0).borrow().volume, Some(0.3));
    }

    #[test]
    fn volume_is_forwarded_to_live_handle() {
        let (mut controller, backend, _) = controller();
        controller.select_album(album("a", 2));
        controller.load_and_play(0).unwrap();

        controller.set_volume(0.5).unwrap();

        assert_eq!(backend.handle(0).borrow().volume, Some(0.5));
        assert!(matches!(
            controller.set_volume(1.5),
            Err(PlaybackError::InvalidFraction(_))
        ));
        assert_eq!(controller.state().volume, 0.5);
    }

    #[test]
    fn seek_while_idle_applies_to_next_handle_only() {
        let (mut controller, backend, _) = controller();
        controller.seek(0.25).unwrap();
        controller.select_album(album("a", 2));

        controller.load_and_play(0).unwrap();
        assert_eq!(backend.handle(0).borrow().seek, Some(0.25));
        assert_eq!(controller.state().progress, 0.25);

        controller.load_and_play(1).unwrap();
        assert_eq!(backend.handle(1).borrow().seek, None);
        assert_eq!(controller.state().progress, 0.0);
    }

    #[test]
    fn seek_is_forwarded_to_live_handle() {
        let (mut controller, backend, _) = controller();
        controller.select_album(album("a", 2));
        controller.load_and_play(0).unwrap();

        controller.seek(0.75).unwrap();

        assert_eq!(backend.handle(0).borrow().seek, Some(0.75));
        assert_eq!(controller.state().progress, 0.75);
        assert!(controller.seek(f64::NAN).is_err());
    }

    #[test]
    fn flags_are_read_at_completion_time() {
        let (mut controller, backend, _) = controller();
        controller.select_album(album("a", 3));
        controller.load_and_play(0).unwrap();

        controller.set_repeat(true);
        controller.handle_player_event(completed(&controller)).unwrap();
        assert_eq!(controller.state().current_index, 0);

        controller.set_repeat(false);
        controller.handle_player_event(completed(&controller)).unwrap();
        assert_eq!(controller.state().current_index, 1);
        assert_eq!(backend.opened(), 3);
    }

    #[test]
    fn toggle_without_handle_does_nothing() {
        let (mut controller, _, _) = controller();
        controller.select_album(album("a", 1));

        controller.toggle_play_pause().unwrap();

        assert!(!controller.state().is_playing);
        assert_eq!(controller.phase(), PlaybackPhase::LoadedPaused);
    }

    #[test]
    fn toggle_pauses_and_resumes() {
        let (mut controller, backend, _) = controller();
        controller.select_album(album("a", 1));
        controller.load_and_play(0).unwrap();

        controller.toggle_play_pause().unwrap();
        assert_eq!(controller.phase(), PlaybackPhase::LoadedPaused);
        assert!(!backend.handle(0).borrow().playing);

        controller.toggle_play_pause().unwrap();
        assert_eq!(controller.phase(), PlaybackPhase::LoadedPlaying);
        assert!(backend.handle(0).borrow().playing);
    }

    #[test]
    fn selecting_album_stops_playback_without_autoplay() {
        let (mut controller, backend, _) = controller();
        controller.select_album(album("a", 3));
        controller.load_and_play(2).unwrap();

        controller.select_album(album("b", 2));

        assert_eq!(controller.state().current_index, 0);
        assert!(!controller.state().is_playing);
        assert_eq!(backend.handle(0).borrow().disposed, 1);
        assert_eq!(backend.opened(), 1);
        assert_eq!(controller.state().album.as_ref().unwrap().id, "b");
    }

    #[test]
    fn every_track_start_is_reported() {
        let (mut controller, _, events) = controller();
        controller.select_album(album("a", 3));

        controller.load_and_play(0).unwrap();
        controller.next().unwrap();

        let reported: Vec<PlayEvent> = events.try_iter().collect();
        assert_eq!(
            reported,
            vec![
                PlayEvent {
                    album_id: "a".to_string(),
                    track_name: "a-t0".to_string(),
                },
                PlayEvent {
                    album_id: "a".to_string(),
                    track_name: "a-t1".to_string(),
                },
            ]
        );
    }

    #[test]
    fn reporting_failure_does_not_affect_playback() {
        let backend = FakeBackend::default();
        let (event_tx, event_rx) = mpsc::channel();
        drop(event_rx);
        let mut controller =
            PlaybackController::new(backend.clone(), PlayEventReporter::new(event_tx), 1.0);
        controller.select_album(album("a", 2));

        controller.load_and_play(0).unwrap();

        assert!(controller.state().is_playing);
    }

    #[test]
    fn load_requires_album_and_valid_index() {
        let (mut controller, backend, _) = controller();

        assert!(matches!(controller.load_and_play(0), Err(PlaybackError::NoAlbum)));

        controller.select_album(album("a", 2));
        assert!(matches!(
            controller.load_and_play(2),
            Err(PlaybackError::IndexOutOfRange { index: 2, len: 2 })
        ));
        assert_eq!(backend.opened(), 0);
    }

    #[test]
    fn seek_while_idle_survives_a_failed_load() {
        let (mut controller, backend, _) = controller();
        controller.seek(0.6).unwrap();
        controller.select_album(album("a", 2));
        backend
            .broken_urls
            .borrow_mut()
            .insert("https://media.example/a/0.mp3".to_string());

        assert!(controller.load_and_play(0).is_err());
        controller.load_and_play(1).unwrap();

        assert_eq!(backend.opened(), 1);
        assert_eq!(backend.handle(0).borrow().seek, Some(0.6));
        assert_eq!(controller.state().progress, 0.6);
    }

    #[test]
    fn load_failure_keeps_last_good_index() {
        let (mut controller, backend, events) = controller();
        controller.select_album(album("a", 3));
        controller.load_and_play(0).unwrap();
        backend
            .broken_urls
            .borrow_mut()
            .insert("https://media.example/a/1.mp3".to_string());

        let result = controller.next();

        assert!(matches!(
            result,
            Err(PlaybackError::Player(PlayerError::ResourceLoad { .. }))
        ));
        assert_eq!(controller.state().current_index, 0);
        assert!(!controller.state().is_playing);
        assert_eq!(backend.handle(0).borrow().disposed, 1);
        assert_eq!(events.try_iter().count(), 1);

        // The old generation is gone too.
        controller
            .handle_player_event(PlayerEvent {
                generation: backend.handle(0).borrow().generation,
                kind: PlayerEventKind::Completed,
            })
            .unwrap();
        assert_eq!(backend.opened(), 1);
    }

    #[test]
    fn decode_failure_event_stops_playback() {
        let (mut controller, backend, _) = controller();
        controller.select_album(album("a", 2));
        controller.load_and_play(1).unwrap();

        let result = controller.handle_player_event(PlayerEvent {
            generation: controller.state().generation,
            kind: PlayerEventKind::Failed("bad data".to_string()),
        });

        assert!(matches!(
            result,
            Err(PlaybackError::Player(PlayerError::ResourceLoad { .. }))
        ));
        assert!(!controller.state().is_playing);
        assert_eq!(controller.state().current_index, 1);
        assert_eq!(backend.handle(0).borrow().disposed, 1);
    }

    #[test]
    fn generation_increases_with_every_load() {
        let (mut controller, backend, _) = controller();
        controller.select_album(album("a", 3));

        controller.load_and_play(0).unwrap();
        controller.load_and_play(0).unwrap();
        controller.load_and_play(2).unwrap();

        let generations: Vec<u64> = (0..3).map(|n| backend.handle(n).borrow().generation).collect();
        assert!(generations.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(controller.state().generation, generations[2]);
    }

    #[test]
    fn dropping_controller_releases_handle() {
        let (mut controller, backend, _) = controller();
        controller.select_album(album("a", 1));
        controller.load_and_play(0).unwrap();

        drop(controller);

        assert_eq!(backend.handle(0).borrow().disposed, 1);
    }
}
