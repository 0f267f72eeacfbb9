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

//! Album entitlement.
//!
//! The [`EntitlementGate`] keeps the set of albums the current user has
//! purchased. The set lives in memory and in a [`PurchaseStore`]; a purchase
//! is written to the store first and only applied in memory once the store
//! has accepted it, so the two never disagree.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::model::Album;

const PURCHASE_KEY_PREFIX: &str = "purchasedAlbums";

/// The set of purchased album identifiers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct PurchaseRecord {
    album_ids: BTreeSet<String>,
}

impl PurchaseRecord {
    pub(crate) fn contains(&self, album_id: &str) -> bool {
        self.album_ids.contains(album_id)
    }

    pub(crate) fn insert(&mut self, album_id: &str) -> bool {
        self.album_ids.insert(album_id.to_string())
    }

    pub(crate) fn len(&self) -> usize {
        self.album_ids.len()
    }
}

#[derive(Debug, Error)]
pub(crate) enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("invalid purchase record: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("{0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub(crate) enum EntitlementError {
    #[error("purchase was not recorded: {0}")]
    Persistence(#[from] StoreError),
}

/// Narrow key-value interface to wherever purchases are persisted.
pub(crate) trait PurchaseStore {
    fn get(&self, key: &str) -> Result<Option<PurchaseRecord>, StoreError>;

    fn set(&mut self, key: &str, record: &PurchaseRecord) -> Result<(), StoreError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PurchaseResult {
    AlreadyOwned,
    Purchased,
}

pub(crate) struct EntitlementGate<S: PurchaseStore> {
    store: S,
    key: String,
    purchased: PurchaseRecord,
}

impl<S: PurchaseStore> EntitlementGate<S> {
    /// Loads the purchase record of `user` from `store`.
    ///
    /// # Errors
    ///
    /// Returns [`EntitlementError::Persistence`] if the record exists but
    /// cannot be read.
    pub(crate) fn new(store: S, user: &str) -> Result<Self, EntitlementError> {
        let key = format!("{PURCHASE_KEY_PREFIX}:{user}");
        let purchased = store.get(&key)?.unwrap_or_default();

        debug!(key, count = purchased.len(), "Purchase record loaded");

        Ok(Self {
            store,
            key,
            purchased,
        })
    }

    pub(crate) fn is_purchased(&self, album_id: &str) -> bool {
        self.purchased.contains(album_id)
    }

    /// Records the purchase of `album`.
    ///
    /// Purchasing an album that is already owned changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`EntitlementError::Persistence`] if the store rejects the
    /// write, in which case the album is not considered purchased.
    pub(crate) fn purchase(&mut self, album: &Album) -> Result<PurchaseResult, EntitlementError> {
        if self.is_purchased(&album.id) {
            return Ok(PurchaseResult::AlreadyOwned);
        }

        let mut updated = self.purchased.clone();
        updated.insert(&album.id);

        if let Err(e) = self.store.set(&self.key, &updated) {
            warn!(album_id = %album.id, error = %e, "Failed to persist purchase");
            return Err(e.into());
        }

        self.purchased = updated;
        info!(album_id = %album.id, album = %album.name, "Album purchased");

        Ok(PurchaseResult::Purchased)
    }

    /// Returns the purchased albums of `catalog`, in catalog order.
    pub(crate) fn list_purchased(&self, catalog: &[Album]) -> Vec<Album> {
        catalog
            .iter()
            .filter(|album| self.is_purchased(&album.id))
            .cloned()
            .collect()
    }

    pub(crate) fn purchased_count(&self) -> usize {
        self.purchased.len()
    }
}
