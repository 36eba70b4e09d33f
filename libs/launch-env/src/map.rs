// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{collections::BTreeMap, sync::Arc};

use crate::Environment;

/// Configuration held in memory.
///
/// Used by tests in place of the process environment, and by the CLI to layer command line flags
/// over it: a key missing here is looked up in the base environment, if any.
#[derive(Clone, Default)]
pub struct MapEnvironment {
    overrides: BTreeMap<String, String>,
    base: Option<Arc<dyn Environment>>,
}

impl MapEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layered_over(base: Arc<dyn Environment>) -> Self {
        Self {
            overrides: BTreeMap::new(),
            base: Some(base),
        }
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.overrides.insert(key.to_string(), value.into());
    }
}

impl Environment for MapEnvironment {
    fn get(&self, key: &str) -> Option<String> {
        match self.overrides.get(key) {
            Some(value) => Some(value.clone()),
            None => self.base.as_deref().and_then(|base| base.get(key)),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnvironment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(pairs: I) -> Self {
        Self {
            overrides: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
            base: None,
        }
    }
}

impl<const N: usize> From<[(&str, &str); N]> for MapEnvironment {
    fn from(pairs: [(&str, &str); N]) -> Self {
        pairs.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_shadow_the_base() {
        let base = Arc::new(MapEnvironment::from([
            ("SERVER_ADDRESS", "127.0.0.1:1"),
            ("LAUNCH_LOG", "debug"),
        ]));

        let mut env = MapEnvironment::layered_over(base);
        env.set("SERVER_ADDRESS", "127.0.0.1:2");

        assert_eq!(env.get("SERVER_ADDRESS").as_deref(), Some("127.0.0.1:2"));
        assert_eq!(env.get("LAUNCH_LOG").as_deref(), Some("debug"));
        assert_eq!(env.get("LAUNCH_ENTRY_POINT"), None);
    }

    #[test]
    fn collects_owned_pairs() {
        let env: MapEnvironment = vec![("LAUNCH_WASI".to_string(), "false".to_string())]
            .into_iter()
            .collect();

        assert!(!env.enabled("LAUNCH_WASI", true).unwrap());
    }
}
