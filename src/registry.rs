//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Evx.
//! The Evx project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! Registry mapping helper names to their builders.
//!
//! Names are resolved once, while operator declarations are loaded; the
//! resulting terms carry no reference back to the registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::config::EvOperatorSpec;
use crate::errors::{EvError, Result};
use crate::kvdb::EvKvdbManager;
use crate::operator::{EvHelperBuilder, EvTerm};
use crate::operators::ip::parse_ip_factory;
use crate::operators::kvdb::kvdb_decode_bitmask_factory;
use crate::parameter::EvDefinitions;
use crate::schema::EvSchema;

#[derive(Default)]
pub struct EvHelperRegistry {
    inner: HashMap<String, EvHelperBuilder>,
}

impl EvHelperRegistry {
    #[allow(non_snake_case)]
    pub fn new() -> Self {
        EvHelperRegistry {
            inner: HashMap::new(),
        }
    }

    /// Registry pre-loaded with the bundled helpers.
    pub fn with_defaults(
        kvdb: Arc<dyn EvKvdbManager>,
        scope: &str,
        schema: Arc<dyn EvSchema>,
    ) -> Self {
        let mut registry = Self::new();
        registry.register(
            "kvdb_decode_bitmask",
            kvdb_decode_bitmask_factory(kvdb, scope, Arc::clone(&schema)),
        );
        registry.register("parse_ip", parse_ip_factory(schema));
        registry
    }

    #[allow(non_snake_case)]
    pub fn register(&mut self, name: &str, builder: EvHelperBuilder) {
        self.inner.insert(name.to_string(), builder);
    }

    pub fn get(&self, name: &str) -> Result<EvHelperBuilder> {
        self.inner
            .get(name)
            .cloned()
            .ok_or_else(|| EvError::UnknownHelper(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    /// Registered helper names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn build(&self, spec: &EvOperatorSpec, definitions: &EvDefinitions) -> Result<EvTerm> {
        let builder = self.get(&spec.helper)?;
        match builder(&spec.destination, &spec.helper, &spec.parameters, definitions) {
            Ok(term) => {
                log::debug!(
                    "helper.build: term compiled - term={}, destination={}",
                    term.name(),
                    spec.destination
                );
                Ok(term)
            }
            Err(err) => {
                log::warn!(
                    "helper.build.rejected: declaration refused - helper={}, destination={}, error={}",
                    spec.helper,
                    spec.destination,
                    err
                );
                Err(err)
            }
        }
    }

    /// Builds every declaration, stopping at the first rejection.
    pub fn build_all(
        &self,
        specs: &[EvOperatorSpec],
        definitions: &EvDefinitions,
    ) -> Result<Vec<EvTerm>> {
        specs
            .iter()
            .map(|spec| self.build(spec, definitions))
            .collect()
    }
}

impl fmt::Debug for EvHelperRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvHelperRegistry")
            .field("helpers", &self.names())
            .finish()
    }
}
