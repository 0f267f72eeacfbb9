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

//! Queue navigation policy.
//!
//! Deciding what plays next is kept free of any state: the functions here
//! look at the length of the track list, the current position and the mode
//! flags, and return a [`Transition`] for the playback controller to act on.
//!
//! Shuffle is a uniform redraw over the whole album on every transition.
//! Drawing the same index twice in a row is allowed, it is not a
//! permutation of the album.

use std::ops::Range;

/// Mode flags that influence the next transition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct QueueMode {
    pub(crate) shuffle: bool,
    pub(crate) repeat: bool,
}

/// The outcome of a navigation decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Transition {
    /// Play the same index again.
    Replay(usize),
    /// Play a randomly drawn index.
    Jump(usize),
    /// Play an adjacent index.
    Advance(usize),
    /// There is nothing after the current track.
    Exhausted,
    /// Nothing to do.
    NoOp,
}

/// Decides the transition after the track at `current` ends or is skipped.
///
/// Repeat takes priority over shuffle. `draw` is asked for an index in the
/// given range when shuffling, normally [`random_index`].
pub(crate) fn next(
    len: usize,
    current: usize,
    mode: QueueMode,
    draw: impl FnOnce(Range<usize>) -> usize,
) -> Transition {
    if len == 0 {
        return Transition::Exhausted;
    }

    if mode.repeat {
        Transition::Replay(current)
    } else if mode.shuffle {
        Transition::Jump(draw(0..len))
    } else if current + 1 < len {
        Transition::Advance(current + 1)
    } else {
        Transition::Exhausted
    }
}

/// Decides the transition for a step backwards, ignoring the mode flags.
pub(crate) fn previous(current: usize) -> Transition {
    if current > 0 {
        Transition::Advance(current - 1)
    } else {
        Transition::NoOp
    }
}

pub(crate) fn random_index(range: Range<usize>) -> usize {
    rand::random_range(range)
}
