// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use tokio::{runtime::Handle, task::JoinHandle};
use tracing::{Instrument, debug, error, info_span, instrument};
use wasmtime::{Engine, Module};

use crate::{
    bridge::{BridgeFactory, ImportTable, RuntimeBridge},
    error::LaunchError,
    fetch::{DefaultFetcher, ModuleFetcher},
    location::ModuleLocation,
};

/// Launches WebAssembly modules.
///
/// Every launch runs the same pipeline, each stage starting only once the previous one has
/// finished:
///
/// create bridge -> build import table -> fetch -> compile -> instantiate -> run
///
/// Launches are independent of each other: each one gets its own bridge, store and instance, and
/// nothing is cached between them (launching the same location twice fetches and compiles it
/// twice). The engine, fetcher and bridge factory are shared and immutable.
pub struct ModuleLauncher<B: BridgeFactory> {
    inner: Arc<LauncherInner<B>>,
}

struct LauncherInner<B> {
    engine: Engine,
    fetcher: Arc<dyn ModuleFetcher>,
    bridge_factory: B,
}

/// A launch in progress.
///
/// Dropping the handle does not stop the launch; failures of a launch whose handle was dropped are
/// still logged.
#[derive(Debug)]
pub struct LaunchHandle {
    location: ModuleLocation,
    handle: JoinHandle<Result<LaunchOutcome, LaunchError>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOutcome {
    pub location: ModuleLocation,
}

impl<B: BridgeFactory> Clone for ModuleLauncher<B> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<B: BridgeFactory> ModuleLauncher<B> {
    pub fn new(engine: Engine, fetcher: Arc<dyn ModuleFetcher>, bridge_factory: B) -> Self {
        Self {
            inner: Arc::new(LauncherInner {
                engine,
                fetcher,
                bridge_factory,
            }),
        }
    }

    pub fn with_defaults(bridge_factory: B) -> Self {
        Self::new(
            Engine::default(),
            Arc::new(DefaultFetcher::default()),
            bridge_factory,
        )
    }

    /// Start a launch on the current tokio runtime and return immediately.
    ///
    /// Fails with [`LaunchError::NoRuntime`] when called outside a runtime; use
    /// [`ModuleLauncher::launch_on`] to pick the runtime explicitly.
    pub fn launch(&self, location: ModuleLocation) -> Result<LaunchHandle, LaunchError> {
        let runtime = Handle::try_current()?;
        Ok(self.launch_on(&runtime, location))
    }

    /// Start a launch on the given runtime and return immediately.
    pub fn launch_on(&self, runtime: &Handle, location: ModuleLocation) -> LaunchHandle {
        let launcher = self.clone();
        let span = info_span!("launch", location = %location);

        let handle = runtime.spawn(
            {
                let location = location.clone();
                async move {
                    let result = launcher.launch_and_wait(location).await;
                    if let Err(error) = &result {
                        error!(stage = error.stage(), "{error}");
                    }
                    result
                }
            }
            .instrument(span),
        );

        LaunchHandle { location, handle }
    }

    /// Run the launch pipeline on the current task and wait for the module's entry point to
    /// return.
    #[instrument(skip_all, fields(location = %location))]
    pub async fn launch_and_wait(
        &self,
        location: ModuleLocation,
    ) -> Result<LaunchOutcome, LaunchError> {
        let mut bridge = self.inner.bridge_factory.create();
        let ImportTable { linker, mut store } = bridge
            .import_table(&self.inner.engine)
            .map_err(LaunchError::Bridge)?;
        debug!("Import table ready");

        let bytes = self
            .inner
            .fetcher
            .fetch(&location)
            .await
            .map_err(LaunchError::Retrieval)?;

        let engine = self.inner.engine.clone();
        let span = tracing::Span::current();

        // The entry point may never return: compile, instantiate and run off the async workers
        tokio::task::spawn_blocking(move || {
            let _guard = span.enter();

            let module = Module::from_binary(&engine, &bytes).map_err(LaunchError::Compilation)?;
            debug!("Module compiled");

            let instance = linker
                .instantiate(&mut store, &module)
                .map_err(LaunchError::Instantiation)?;
            debug!("Module instantiated");

            bridge
                .run(&mut store, &instance)
                .map_err(LaunchError::ExecutionFault)
        })
        .await??;

        debug!("Module entry point returned");
        Ok(LaunchOutcome { location })
    }
}

impl LaunchHandle {
    pub fn location(&self) -> &ModuleLocation {
        &self.location
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the launch to finish and report how it went.
    pub async fn wait(self) -> Result<LaunchOutcome, LaunchError> {
        self.handle.await?
    }
}
