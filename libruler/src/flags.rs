// Copyright 2025 the libRuler Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Namespaced extension data attached to rulers and segments.
//!
//! Values live at `flags.<scope>.<key>`. The scope is normally the name of
//! the extension that owns the data. Dots inside `key` address nested
//! objects, so `set_flag("terrain", "cost.multiplier", 2)` stores
//! `{"terrain": {"cost": {"multiplier": 2}}}`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, RulerError};

/// A JSON object of per-extension values.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Flags(Map<String, Value>);

impl Flags {
    /// Create an empty flag store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no flags are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The whole store as a JSON object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Value stored at `scope.key`, if any.
    pub fn get_flag(&self, scope: &str, key: &str) -> Option<&Value> {
        let mut value = self.0.get(scope)?;
        for part in key.split('.') {
            value = value.as_object()?.get(part)?;
        }
        Some(value)
    }

    /// Store `value` at `scope.key`, creating intermediate objects.
    ///
    /// Setting `null` removes the flag.
    pub fn set_flag(&mut self, scope: &str, key: &str, value: Value) -> Result<()> {
        if value.is_null() {
            return self.unset_flag(scope, key).map(drop);
        }
        let invalid = || RulerError::InvalidFlagPath {
            scope: scope.to_owned(),
            key: key.to_owned(),
        };
        if scope.is_empty() || key.split('.').any(str::is_empty) {
            return Err(invalid());
        }
        let mut map = &mut self.0;
        let mut parts = core::iter::once(scope).chain(key.split('.')).peekable();
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                map.insert(part.to_owned(), value);
                return Ok(());
            }
            map = map
                .entry(part)
                .or_insert_with(|| Value::Object(Map::new()))
                .as_object_mut()
                .ok_or_else(invalid)?;
        }
        Ok(())
    }

    /// Remove the value at `scope.key`, returning it.
    ///
    /// Empty parent objects are left in place.
    pub fn unset_flag(&mut self, scope: &str, key: &str) -> Result<Option<Value>> {
        if scope.is_empty() || key.split('.').any(str::is_empty) {
            return Err(RulerError::InvalidFlagPath {
                scope: scope.to_owned(),
                key: key.to_owned(),
            });
        }
        let (parents, last) = match key.rsplit_once('.') {
            Some((parents, last)) => (Some(parents), last),
            None => (None, key),
        };
        let Some(mut map) = self.0.get_mut(scope).and_then(Value::as_object_mut) else {
            return Ok(None);
        };
        for part in parents.into_iter().flat_map(|p| p.split('.')) {
            match map.get_mut(part).and_then(Value::as_object_mut) {
                Some(next) => map = next,
                None => return Ok(None),
            }
        }
        Ok(map.remove(last))
    }
}
