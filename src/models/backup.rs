// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory backup document: collection name -> exported data.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

/// Exported collections in the order they were backed up.
///
/// Serializes as a JSON object whose keys keep insertion order, independent
/// of how `serde_json::Map` is configured.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackupDocument {
    entries: Vec<(String, Value)>,
}

impl BackupDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the export result for `collection`.
    ///
    /// A second insert under the same name replaces the earlier value in
    /// place, so keys stay unique.
    pub fn insert(&mut self, collection: impl Into<String>, data: Value) {
        let collection = collection.into();
        match self.entries.iter_mut().find(|(name, _)| *name == collection) {
            Some(entry) => entry.1 = data,
            None => self.entries.push((collection, data)),
        }
    }

    pub fn get(&self, collection: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| name == collection)
            .map(|(_, data)| data)
    }

    /// Collection names in backup order.
    pub fn collections(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pretty-printed JSON with two-space indentation.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Serialize for BackupDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, data) in &self.entries {
            map.serialize_entry(name, data)?;
        }
        map.end()
    }
}
