// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use thiserror::Error;

/// Failure of a single launch, one variant per pipeline stage.
#[derive(Error, Debug)]
pub enum LaunchError {
    // The bridge could not build its import table (nothing has been fetched yet)
    #[error("Failed to prepare the runtime bridge: {0}")]
    Bridge(#[source] BridgeError),

    #[error("Failed to retrieve module: {0}")]
    Retrieval(#[source] RetrievalError),

    #[error("Failed to compile module: {0}")]
    Compilation(#[source] wasmtime::Error),

    // Missing or mismatched imports, or a trap in the module's start function
    #[error("Failed to instantiate module: {0}")]
    Instantiation(#[source] wasmtime::Error),

    // The module faulted after control was transferred to it
    #[error("Module execution failed: {0}")]
    ExecutionFault(#[source] BridgeError),

    #[error("Launch task did not complete: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("No tokio runtime to launch on: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}

impl LaunchError {
    pub fn stage(&self) -> &'static str {
        match self {
            LaunchError::Bridge(_) => "bridge",
            LaunchError::Retrieval(_) => "retrieval",
            LaunchError::Compilation(_) => "compilation",
            LaunchError::Instantiation(_) => "instantiation",
            LaunchError::ExecutionFault(_) => "execution",
            LaunchError::Join(_) => "join",
            LaunchError::NoRuntime(_) => "runtime",
        }
    }
}

#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("Module '{0}' not found")]
    NotFound(String),

    #[error("Fetching '{location}' returned status {status}")]
    Status { location: String, status: u16 },

    #[error("Failed to read '{location}': {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Failed to locate entry point '{0}'")]
    EntryPointNotFound(String),

    #[error("Failed to convert '{0}' to a WASM function taking and returning nothing")]
    InvalidEntryPoint(String),

    #[error("{0}")]
    Linker(String),

    #[error("{0}")]
    StringArrayError(#[from] wasi_common::StringArrayError),

    #[error("Module exited with status {0}")]
    Exit(i32),

    #[error("{0}")]
    Trap(#[from] wasmtime::Error),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LocationError {
    #[error("Module location must not be empty")]
    Empty,

    #[error("Invalid module URL '{0}': {1}")]
    InvalidUrl(String, url::ParseError),

    #[error("File URL '{0}' does not denote a local path")]
    InvalidFileUrl(String),
}
