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

//! Console command parsing.
//!
//! This module turns a line typed on the console into a [`ConsoleCommand`].
//! Album and track numbers are entered as they are listed, starting at one,
//! and converted to zero-based positions here. Volume and seek positions are
//! entered as percentages.

use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum ConsoleCommand {
    Albums,
    ShowPurchased,
    ShowAll,
    Select(usize),
    Play(usize),
    TogglePause,
    Next,
    Previous,
    Shuffle(Option<bool>),
    Repeat(Option<bool>),
    Volume(f64),
    Seek(f64),
    Buy(usize),
    Status,
    Reload,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub(crate) enum CommandError {
    #[error("unknown command '{0}', type 'help' for a list of commands")]
    Unknown(String),

    #[error("'{0}' needs {1}")]
    MissingArgument(&'static str, &'static str),

    #[error("'{0}' is not a valid {1}")]
    InvalidArgument(String, &'static str),
}

pub(crate) const HELP: &str = "\
albums            list albums in the current view
purchased         show purchased albums only
all               show the whole catalog
select N          select album N
play N            play track N of the selected album
p                 play/pause
n                 next track
b                 previous track
shuffle [on|off]  toggle or set shuffle
repeat [on|off]   toggle or set repeat
v N               volume, 0 to 100
seek N            seek to N percent of the track
buy N             purchase album N
status            show what is playing
reload            fetch the catalog again
q                 quit";

/// Parses one console line. Blank lines yield `None`.
pub(crate) fn parse(line: &str) -> Result<Option<ConsoleCommand>, CommandError> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    let command = match parts.as_slice() {
        [] => return Ok(None),

        ["albums" | "ls"] => ConsoleCommand::Albums,
        ["purchased"] => ConsoleCommand::ShowPurchased,
        ["all"] => ConsoleCommand::ShowAll,

        ["select" | "s", n] => ConsoleCommand::Select(position(n)?),
        ["select" | "s"] => return Err(CommandError::MissingArgument("select", "an album number")),

        ["play", n] => ConsoleCommand::Play(position(n)?),
        ["play"] => return Err(CommandError::MissingArgument("play", "a track number")),

        ["p"] => ConsoleCommand::TogglePause,
        ["n"] => ConsoleCommand::Next,
        ["b"] => ConsoleCommand::Previous,

        ["shuffle"] => ConsoleCommand::Shuffle(None),
        ["shuffle", flag] => ConsoleCommand::Shuffle(Some(switch(flag)?)),
        ["repeat"] => ConsoleCommand::Repeat(None),
        ["repeat", flag] => ConsoleCommand::Repeat(Some(switch(flag)?)),

        ["v", n] => ConsoleCommand::Volume(percent(n)?),
        ["v"] => return Err(CommandError::MissingArgument("v", "a volume")),
        ["seek", n] => ConsoleCommand::Seek(percent(n)?),
        ["seek"] => return Err(CommandError::MissingArgument("seek", "a position")),

        ["buy", n] => ConsoleCommand::Buy(position(n)?),
        ["buy"] => return Err(CommandError::MissingArgument("buy", "an album number")),

        ["status"] => ConsoleCommand::Status,
        ["reload"] => ConsoleCommand::Reload,
        ["help" | "?"] => ConsoleCommand::Help,
        ["q" | "quit"] => ConsoleCommand::Quit,

        [cmd, ..] => return Err(CommandError::Unknown(cmd.to_string())),
    };

    Ok(Some(command))
}

// One-based list number to zero-based position.
fn position(arg: &str) -> Result<usize, CommandError> {
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(CommandError::InvalidArgument(arg.to_string(), "number")),
    }
}

fn percent(arg: &str) -> Result<f64, CommandError> {
    match arg.trim_end_matches('%').parse::<u32>() {
        Ok(n) if n <= 100 => Ok(f64::from(n) / 100.0),
        _ => Err(CommandError::InvalidArgument(arg.to_string(), "percentage")),
    }
}

fn switch(arg: &str) -> Result<bool, CommandError> {
    match arg {
        "on" => Ok(true),
        "off" => Ok(false),
        _ => Err(CommandError::InvalidArgument(arg.to_string(), "switch, use on or off")),
    }
}
