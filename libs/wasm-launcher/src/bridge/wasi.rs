// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use wasi_common::{
    I32Exit, WasiCtx,
    sync::{WasiCtxBuilder, add_to_linker},
};
use wasmtime::{Engine, Instance, Linker, Store};

use super::{DEFAULT_ENTRY_POINT, ImportTable, RuntimeBridge, call_entry_point};
use crate::error::BridgeError;

/// A bridge for modules compiled against WASI preview 1.
///
/// The module sees the process's stdio and the arguments given here (the first one is
/// conventionally the program name).
#[derive(Debug, Clone)]
pub struct WasiBridge {
    entry_point: String,
    args: Vec<String>,
}

impl WasiBridge {
    pub fn new(entry_point: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            entry_point: entry_point.into(),
            args,
        }
    }
}

impl Default for WasiBridge {
    fn default() -> Self {
        Self::new(DEFAULT_ENTRY_POINT, vec![])
    }
}

impl RuntimeBridge for WasiBridge {
    type State = WasiCtx;

    fn import_table(&mut self, engine: &Engine) -> Result<ImportTable<WasiCtx>, BridgeError> {
        let mut linker = Linker::new(engine);
        add_to_linker(&mut linker, |ctx: &mut WasiCtx| ctx)
            .map_err(|e| BridgeError::Linker(e.to_string()))?;

        let wasi = WasiCtxBuilder::new()
            .inherit_stdio()
            .args(&self.args)?
            .build();

        Ok(ImportTable {
            linker,
            store: Store::new(engine, wasi),
        })
    }

    fn run(self, store: &mut Store<WasiCtx>, instance: &Instance) -> Result<(), BridgeError> {
        match call_entry_point(store, instance, &self.entry_point) {
            Err(BridgeError::Trap(error)) => match error.downcast_ref::<I32Exit>() {
                // `proc_exit(0)` unwinds through the host, but it is a normal completion
                Some(I32Exit(0)) => Ok(()),
                Some(I32Exit(code)) => Err(BridgeError::Exit(*code)),
                None => Err(BridgeError::Trap(error)),
            },
            result => result,
        }
    }
}
