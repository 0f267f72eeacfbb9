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

//! Domain models and core data structures.
//!
//! This module defines the catalog entities, albums and their tracks, as they
//! are delivered by the catalog service. Track order inside an album is the
//! canonical playback order, so a queue position is simply an index into
//! [`Album::tracks`].

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Track {
    #[serde(rename = "trackName")]
    pub(crate) name: String,
    #[serde(rename = "trackUrl")]
    pub(crate) media_url: String,
    #[serde(rename = "trackLabel", default)]
    pub(crate) label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Album {
    #[serde(rename = "albumId")]
    pub(crate) id: String,
    #[serde(rename = "albumName")]
    pub(crate) name: String,
    #[serde(rename = "albumArtUrl", default)]
    pub(crate) art_url: String,
    #[serde(default)]
    pub(crate) tracks: Vec<Track>,
    #[serde(rename = "albumYear", default, deserialize_with = "year_from_any")]
    pub(crate) year: Option<String>,
    #[serde(default)]
    pub(crate) genre: Option<String>,
    #[serde(default)]
    pub(crate) artists: Vec<String>,
    #[serde(rename = "bandComposition", default)]
    pub(crate) band_composition: Option<String>,
}

impl Album {
    pub(crate) fn track(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub(crate) fn len(&self) -> usize {
        self.tracks.len()
    }
}

/// The response body of the catalog service.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Catalog {
    pub(crate) albums: Vec<Album>,
}

// The catalog service has been seen to send the year both as a number and as
// a string.
fn year_from_any<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Year {
        Number(i64),
        Text(String),
    }

    Ok(match Option::<Year>::deserialize(deserializer)? {
        Some(Year::Number(year)) => Some(year.to_string()),
        Some(Year::Text(year)) if !year.trim().is_empty() => Some(year),
        _ => None,
    })
}
