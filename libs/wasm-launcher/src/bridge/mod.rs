// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod entry_point;
mod wasi;

pub use entry_point::EntryPointBridge;
pub use wasi::WasiBridge;

use wasmtime::{Engine, Instance, Linker, Store};

use crate::error::BridgeError;

/// Export invoked by the bundled bridges unless configured otherwise.
pub const DEFAULT_ENTRY_POINT: &str = "_start";

/// Host-provided imports for one module instance.
///
/// The store owns the bridge's host state; the linker resolves the module's imports against it.
pub struct ImportTable<T: 'static> {
    pub linker: Linker<T>,
    pub store: Store<T>,
}

impl<T: 'static> ImportTable<T> {
    /// An import table that satisfies modules with no imports.
    pub fn empty(engine: &Engine, state: T) -> Self {
        Self {
            linker: Linker::new(engine),
            store: Store::new(engine, state),
        }
    }
}

/// The host side of a launched module.
///
/// A bridge is created for exactly one launch. Its import table is built before the module is
/// fetched, and `run` is called at most once, with the instance created from that import table.
pub trait RuntimeBridge: Send + 'static {
    type State: Send + 'static;

    fn import_table(&mut self, engine: &Engine) -> Result<ImportTable<Self::State>, BridgeError>;

    /// Transfer control to the module. May not return for long-running modules.
    fn run(self, store: &mut Store<Self::State>, instance: &Instance) -> Result<(), BridgeError>;
}

/// Creates a fresh [`RuntimeBridge`] for every launch.
pub trait BridgeFactory: Send + Sync + 'static {
    type Bridge: RuntimeBridge;

    fn create(&self) -> Self::Bridge;
}

impl<F, B> BridgeFactory for F
where
    F: Fn() -> B + Send + Sync + 'static,
    B: RuntimeBridge,
{
    type Bridge = B;

    fn create(&self) -> B {
        self()
    }
}

/// Call an exported `() -> ()` function.
pub(crate) fn call_entry_point<T: 'static>(
    store: &mut Store<T>,
    instance: &Instance,
    entry_point: &str,
) -> Result<(), BridgeError> {
    let func = instance
        .get_export(&mut *store, entry_point)
        .ok_or_else(|| BridgeError::EntryPointNotFound(entry_point.to_string()))?
        .into_func()
        .ok_or_else(|| BridgeError::InvalidEntryPoint(entry_point.to_string()))?
        .typed::<(), ()>(&*store)
        .map_err(|_| BridgeError::InvalidEntryPoint(entry_point.to_string()))?;

    func.call(&mut *store, ())?;
    Ok(())
}
