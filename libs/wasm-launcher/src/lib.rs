// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Fetch, compile, instantiate and run a WebAssembly module.
//!
//! The host side of a module (its imports and the way its entry point is invoked) is supplied by a
//! [`RuntimeBridge`], created fresh for every launch by a [`BridgeFactory`].

mod bridge;
mod error;
mod fetch;
mod launcher;
mod location;

#[cfg(test)]
mod test_support;

pub use bridge::{
    BridgeFactory, DEFAULT_ENTRY_POINT, EntryPointBridge, ImportTable, RuntimeBridge, WasiBridge,
};
pub use error::{BridgeError, LaunchError, LocationError, RetrievalError};
pub use fetch::{DefaultFetcher, ModuleFetcher};
pub use launcher::{LaunchHandle, LaunchOutcome, ModuleLauncher};
pub use location::ModuleLocation;
