// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use wasmtime::{Engine, Instance, Store};

use super::{DEFAULT_ENTRY_POINT, ImportTable, RuntimeBridge, call_entry_point};
use crate::error::BridgeError;

/// A bridge for self-contained modules: supplies no imports and calls a single export.
#[derive(Debug, Clone)]
pub struct EntryPointBridge {
    entry_point: String,
}

impl EntryPointBridge {
    pub fn new(entry_point: impl Into<String>) -> Self {
        Self {
            entry_point: entry_point.into(),
        }
    }
}

impl Default for EntryPointBridge {
    fn default() -> Self {
        Self::new(DEFAULT_ENTRY_POINT)
    }
}

impl RuntimeBridge for EntryPointBridge {
    type State = ();

    fn import_table(&mut self, engine: &Engine) -> Result<ImportTable<()>, BridgeError> {
        Ok(ImportTable::empty(engine, ()))
    }

    fn run(self, store: &mut Store<()>, instance: &Instance) -> Result<(), BridgeError> {
        call_entry_point(store, instance, &self.entry_point)
    }
}
