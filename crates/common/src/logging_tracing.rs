// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! # Tracing configuration setup.
//!
//! The launcher and the server are instrumented with Rust's `tracing` framework.
//!
//! Calling the `init` function will initialize a global tracing subscriber based on the values of
//! the `LAUNCH_LOG` environment variable which follows the same conventions as `RUST_LOG`. This
//! will provide console logging. For example, to see every stage of each launch:
//!
//! ```shell
//! $ LAUNCH_LOG=wasm_launcher=debug wasm-launch run app.wasm
//! ```

use thiserror::Error;
use tracing_subscriber::{EnvFilter, filter::LevelFilter, prelude::*};

use crate::env_const::LAUNCH_LOG;

/// Initialize the tracing subscriber.
///
/// Creates a compact `tracing_subscriber::fmt` layer writing to stderr, filtered by `LAUNCH_LOG`
/// (default: `warn`).
pub fn init() -> Result<(), TracingError> {
    // Modules own stdout, so diagnostics go to stderr
    let fmt_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(std::io::stderr);
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .with_env_var(LAUNCH_LOG)
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

#[derive(Error, Debug)]
pub enum TracingError {
    #[error("Failed to install the tracing subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}
