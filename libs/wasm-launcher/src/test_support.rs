// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use wasmtime::{Engine, Instance, Store};

use crate::{
    bridge::{BridgeFactory, DEFAULT_ENTRY_POINT, ImportTable, RuntimeBridge, call_entry_point},
    error::{BridgeError, RetrievalError},
    fetch::ModuleFetcher,
    location::ModuleLocation,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    BridgeCreated(usize),
    ImportTableBuilt(usize),
    Fetched(String),
    FetchFailed(String),
    Run(usize),
}

/// Events from all the collaborators of a launcher, in the order they happened.
#[derive(Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<Event>>>,
    next_bridge_id: Arc<AtomicUsize>,
}

impl EventLog {
    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }

    pub fn snapshot(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn run_count(&self) -> usize {
        self.snapshot()
            .iter()
            .filter(|event| matches!(event, Event::Run(_)))
            .count()
    }
}

pub fn module_bytes(wat: &str) -> Vec<u8> {
    wat::parse_str(wat).unwrap()
}

/// Serves modules from memory, keyed by the location's display form.
pub struct MapFetcher {
    modules: HashMap<String, Vec<u8>>,
    events: EventLog,
}

impl MapFetcher {
    pub fn new(events: &EventLog) -> Self {
        Self {
            modules: HashMap::new(),
            events: events.clone(),
        }
    }

    pub fn with(mut self, location: &str, bytes: Vec<u8>) -> Self {
        self.modules.insert(location.to_string(), bytes);
        self
    }
}

#[async_trait]
impl ModuleFetcher for MapFetcher {
    async fn fetch(&self, location: &ModuleLocation) -> Result<Vec<u8>, RetrievalError> {
        let key = location.to_string();
        match self.modules.get(&key) {
            Some(bytes) => {
                self.events.push(Event::Fetched(key));
                Ok(bytes.clone())
            }
            None => {
                self.events.push(Event::FetchFailed(key.clone()));
                Err(RetrievalError::NotFound(key))
            }
        }
    }
}

/// A zero-import bridge that records what the launcher does with it.
pub struct RecordingBridge {
    id: usize,
    events: EventLog,
    fail_import_table: bool,
}

impl RecordingBridge {
    pub fn new(events: EventLog) -> Self {
        let id = events.next_bridge_id.fetch_add(1, Ordering::SeqCst);
        events.push(Event::BridgeCreated(id));
        Self {
            id,
            events,
            fail_import_table: false,
        }
    }

    pub fn failing(events: EventLog) -> Self {
        Self {
            fail_import_table: true,
            ..Self::new(events)
        }
    }
}

impl RuntimeBridge for RecordingBridge {
    type State = ();

    fn import_table(&mut self, engine: &Engine) -> Result<ImportTable<()>, BridgeError> {
        if self.fail_import_table {
            return Err(BridgeError::Linker("import table unavailable".to_string()));
        }
        self.events.push(Event::ImportTableBuilt(self.id));
        Ok(ImportTable::empty(engine, ()))
    }

    fn run(self, store: &mut Store<()>, instance: &Instance) -> Result<(), BridgeError> {
        self.events.push(Event::Run(self.id));
        call_entry_point(store, instance, DEFAULT_ENTRY_POINT)
    }
}

pub struct RecordingFactory {
    events: EventLog,
}

impl RecordingFactory {
    pub fn new(events: &EventLog) -> Self {
        Self {
            events: events.clone(),
        }
    }
}

impl BridgeFactory for RecordingFactory {
    type Bridge = RecordingBridge;

    fn create(&self) -> RecordingBridge {
        RecordingBridge::new(self.events.clone())
    }
}
