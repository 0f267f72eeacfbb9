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

//! Catalog loading.
//!
//! The catalog is the ordered list of albums offered to the listener. It is
//! read from the catalog service over HTTP, or from a local JSON file with
//! the same layout, and treated as already validated from then on.

use std::{fs, time::Duration};

use anyhow::{Context, Result, bail};
use reqwest::blocking::Client;

use crate::model::{Album, Catalog};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Loads the catalog from `location`.
///
/// # Errors
///
/// Returns an error if no location is configured, the catalog cannot be
/// fetched or read, or its contents are not a valid catalog.
pub(crate) fn load_catalog(location: &str) -> Result<Vec<Album>> {
    let location = location.trim();
    if location.is_empty() {
        bail!("No catalog configured, set catalog_url in the configuration file");
    }

    let body = if location.starts_with("http://") || location.starts_with("https://") {
        fetch(location)?
    } else {
        fs::read_to_string(location).context(format!("Failed to read catalog file: {}", location))?
    };

    parse_catalog(&body)
}

fn fetch(url: &str) -> Result<String> {
    let client = Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("Failed to create catalog HTTP client")?;

    client
        .get(url)
        .send()
        .context(format!("Failed to fetch catalog: {}", url))?
        .error_for_status()
        .context("Catalog service returned an error")?
        .text()
        .context("Failed to read catalog response")
}

pub(crate) fn parse_catalog(body: &str) -> Result<Vec<Album>> {
    let catalog: Catalog = serde_json::from_str(body).context("Malformed catalog")?;
    Ok(catalog.albums)
}
