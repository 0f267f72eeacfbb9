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

//! Console text for the player.
//!
//! Everything here builds plain strings from read-only views of the
//! application state; the event loop decides where they are printed.

mod icons;

use crate::{
    controller::{PlaybackPhase, PlaybackState},
    entitlement::{EntitlementGate, PurchaseStore},
    model::Album,
};

use icons::{ICON_PAUSE, ICON_PLAY, ICON_REPEAT, ICON_SHUFFLE, ICON_STOP, PURCHASED};

const PROGRESS_WIDTH: usize = 20;

/// Numbered album list, purchased albums are marked.
pub(crate) fn album_list<S: PurchaseStore>(albums: &[Album], entitlements: &EntitlementGate<S>) -> String {
    if albums.is_empty() {
        return "No albums.".to_string();
    }

    albums
        .iter()
        .enumerate()
        .map(|(i, album)| {
            let mark = if entitlements.is_purchased(&album.id) { PURCHASED } else { " " };
            let year = album.year.as_deref().map(|y| format!(" ({y})")).unwrap_or_default();
            format!("{:>3}. {} {}{} - {}", i + 1, mark, album.name, year, album.artists.join(", "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Album details followed by its numbered tracks, `current` is highlighted.
pub(crate) fn track_list(album: &Album, current: Option<usize>) -> String {
    let mut lines = vec![format!("{} - {}", album.name, album.artists.join(", "))];

    if let Some(band) = album.band_composition.as_deref().filter(|b| !b.is_empty()) {
        lines.push(format!("Band composition: {band}"));
    }
    if let Some(year) = album.year.as_deref() {
        lines.push(format!("Album year: {year}"));
    }

    for (i, track) in album.tracks.iter().enumerate() {
        let marker = if current == Some(i) { ICON_PLAY } else { " " };
        let label = if track.label.is_empty() {
            String::new()
        } else {
            format!(" [{}]", track.label)
        };
        lines.push(format!("{marker} {:>3}. {}{}", i + 1, track.name, label));
    }

    lines.join("\n")
}

/// One-line summary of the playback state.
pub(crate) fn status_line(state: &PlaybackState, phase: PlaybackPhase) -> String {
    let Some(album) = state.album.as_ref() else {
        return format!("{ICON_STOP} No album selected");
    };

    let icon = match phase {
        PlaybackPhase::LoadedPlaying => ICON_PLAY,
        PlaybackPhase::LoadedPaused => ICON_PAUSE,
        PlaybackPhase::Idle | PlaybackPhase::Exhausted => ICON_STOP,
    };

    let track = album
        .track(state.current_index)
        .map(|track| track.name.as_str())
        .unwrap_or("-");

    let mut line = format!(
        "{icon} {}/{} {track} from {} {} vol {}%",
        state.current_index + 1,
        album.len(),
        album.name,
        progress_bar(state.progress),
        (state.volume * 100.0).round() as u32
    );
    if state.shuffle {
        line.push(' ');
        line.push_str(ICON_SHUFFLE);
    }
    if state.repeat {
        line.push(' ');
        line.push_str(ICON_REPEAT);
    }
    if phase == PlaybackPhase::Exhausted {
        line.push_str(" (end of album)");
    }

    line
}

fn progress_bar(progress: f64) -> String {
    let filled = (progress.clamp(0.0, 1.0) * PROGRESS_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(PROGRESS_WIDTH - filled))
}
