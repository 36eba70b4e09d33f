// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use clap::{Arg, ArgAction, ArgMatches, Command};
use common::env_const::{LAUNCH_ENTRY_POINT, LAUNCH_WASI, get_entry_point, wasi_enabled};
use launch_env::{Environment, MapEnvironment};
use tracing::info;
use wasm_launcher::{EntryPointBridge, ModuleLauncher, ModuleLocation, WasiBridge};

use super::command::{CommandDefinition, get, get_required};

pub struct RunCommandDefinition {}

#[async_trait]
impl CommandDefinition for RunCommandDefinition {
    fn command(&self) -> Command {
        Command::new("run")
            .about("Launch a WebAssembly module")
            .arg(
                Arg::new("location")
                    .help("Path or URL of the module")
                    .long_help("A file path, a file:// URL, or an http(s):// URL of the module to launch.")
                    .required(true),
            )
            .arg(
                Arg::new("entry")
                    .help("Export to invoke once the module is instantiated")
                    .long_help(
                        "The exported function to call. Defaults to `LAUNCH_ENTRY_POINT` or `_start`.",
                    )
                    .long("entry")
                    .required(false)
                    .num_args(1),
            )
            .arg(
                Arg::new("no-wasi")
                    .help("Do not supply WASI imports to the module")
                    .long("no-wasi")
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("args")
                    .help("Arguments passed to the module (WASI only)")
                    .num_args(0..)
                    .last(true),
            )
    }

    async fn execute(&self, matches: &ArgMatches, env: Arc<dyn Environment>) -> Result<()> {
        let location: String = get_required(matches, "location")?;
        let location: ModuleLocation = location.parse()?;

        let env = command_env(matches, env);
        let entry_point = get_entry_point(env.as_ref());

        let outcome = if wasi_enabled(env.as_ref())? {
            let module_args: Vec<String> = std::iter::once(location.to_string())
                .chain(
                    matches
                        .get_many::<String>("args")
                        .into_iter()
                        .flatten()
                        .cloned(),
                )
                .collect();

            ModuleLauncher::with_defaults(move || {
                WasiBridge::new(entry_point.clone(), module_args.clone())
            })
            .launch_and_wait(location)
            .await
        } else {
            ModuleLauncher::with_defaults(move || EntryPointBridge::new(entry_point.clone()))
                .launch_and_wait(location)
                .await
        };

        // Waited on here, so a failure is reported once, by `main`
        let outcome = outcome?;
        info!(location = %outcome.location, "Module finished");

        Ok(())
    }
}

/// Layer the command line flags over the given environment.
fn command_env(matches: &ArgMatches, env: Arc<dyn Environment>) -> Arc<dyn Environment> {
    let mut command_env = MapEnvironment::layered_over(env);

    if let Some(entry_point) = get::<String>(matches, "entry") {
        command_env.set(LAUNCH_ENTRY_POINT, entry_point);
    }
    if matches.get_flag("no-wasi") {
        command_env.set(LAUNCH_WASI, "false");
    }

    Arc::new(command_env)
}
