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

//! Schema oracle consulted by helper builders before they commit to writing a
//! destination field.

use std::collections::HashMap;

use crate::errors::{EvError, Result};
use crate::event::{EvFieldPath, EvJsonType};

/// Answers whether a field is already declared with a type.
pub trait EvSchema: Send + Sync {
    fn has_field(&self, path: &EvFieldPath) -> bool;

    /// Declared JSON type of a field, `None` when untyped.
    fn field_type(&self, path: &EvFieldPath) -> Option<EvJsonType>;
}

/// Schema that declares nothing; every field is untyped.
#[derive(Clone, Copy, Debug, Default)]
pub struct EvNoSchema;

impl EvSchema for EvNoSchema {
    fn has_field(&self, _path: &EvFieldPath) -> bool {
        false
    }

    fn field_type(&self, _path: &EvFieldPath) -> Option<EvJsonType> {
        None
    }
}

/// Fixed in-memory schema keyed by pointer path.
#[derive(Clone, Debug, Default)]
pub struct EvStaticSchema {
    fields: HashMap<String, EvJsonType>,
}

impl EvStaticSchema {
    #[allow(non_snake_case)]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, path: &str, kind: EvJsonType) -> Result<Self> {
        let path = EvFieldPath::parse(path)?;
        self.fields.insert(path.pointer(), kind);
        Ok(self)
    }
}

impl EvSchema for EvStaticSchema {
    fn has_field(&self, path: &EvFieldPath) -> bool {
        self.fields.contains_key(&path.pointer())
    }

    fn field_type(&self, path: &EvFieldPath) -> Option<EvJsonType> {
        self.fields.get(&path.pointer()).copied()
    }
}

/// Fails unless `destination` is untyped or declared as `expected`.
pub fn assert_destination_type(
    schema: &dyn EvSchema,
    helper: &str,
    destination: &EvFieldPath,
    expected: EvJsonType,
) -> Result<()> {
    if !schema.has_field(destination) {
        return Ok(());
    }
    match schema.field_type(destination) {
        Some(kind) if kind == expected => Ok(()),
        Some(kind) => Err(EvError::schema(format!(
            "helper '{helper}' writes {expected} but '{destination}' is declared as {kind}"
        ))),
        None => Ok(()),
    }
}
