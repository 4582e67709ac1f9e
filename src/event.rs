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

//! # Evx Event Module
//!
//! Events are JSON documents addressed by slash-rooted field paths such as
//! `/source/ip`. Helpers never own an event beyond one evaluation call; they
//! read and write it through [`EvFieldPath`] accessors only.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{EvError, Result};

/// Kind of a JSON value, used wherever a homogeneous type must be enforced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvJsonType {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl EvJsonType {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => EvJsonType::Null,
            Value::Bool(_) => EvJsonType::Bool,
            Value::Number(_) => EvJsonType::Number,
            Value::String(_) => EvJsonType::String,
            Value::Array(_) => EvJsonType::Array,
            Value::Object(_) => EvJsonType::Object,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EvJsonType::Null => "null",
            EvJsonType::Bool => "bool",
            EvJsonType::Number => "number",
            EvJsonType::String => "string",
            EvJsonType::Array => "array",
            EvJsonType::Object => "object",
        }
    }
}

impl fmt::Display for EvJsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Path to a field inside an event document.
///
/// Two spellings are accepted:
/// - pointer form, `/a/b`, with `~1` for `/` and `~0` for `~` inside a segment
/// - dotted form, `a.b`, as written after the `$` of a field reference
///
/// Both parse to the same segments and always render in pointer form.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EvFieldPath {
    segments: Vec<String>,
}

impl EvFieldPath {
    #[allow(non_snake_case)]
    pub fn parse(path: &str) -> Result<Self> {
        let segments: Vec<String> = if let Some(pointer) = path.strip_prefix('/') {
            pointer
                .split('/')
                .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
                .collect()
        } else {
            path.split('.').map(|segment| segment.to_string()).collect()
        };

        if path.is_empty() || segments.iter().any(|segment| segment.is_empty()) {
            return Err(EvError::validation(format!(
                "invalid field path '{path}': empty segment"
            )));
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// JSON pointer rendering, usable with [`Value::pointer`].
    pub fn pointer(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            out.push('/');
            out.push_str(&segment.replace('~', "~0").replace('/', "~1"));
        }
        out
    }

    /// Dotted rendering, the spelling used after `$` in a reference.
    pub fn dotted(&self) -> String {
        self.segments.join(".")
    }
}

impl fmt::Display for EvFieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pointer())
    }
}

/// Structured event processed by compiled terms.
///
/// The document root is always an object. `from_value` with any other JSON
/// value yields an empty event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvEvent {
    document: Value,
}

impl EvEvent {
    #[allow(non_snake_case)]
    pub fn new() -> Self {
        EvEvent {
            document: Value::Object(Map::new()),
        }
    }

    pub fn from_value(document: Value) -> Self {
        match document {
            Value::Object(_) => EvEvent { document },
            _ => Self::new(),
        }
    }

    /// Parses a JSON object text into an event.
    pub fn parse(text: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(text)?;
        if !document.is_object() {
            return Err(EvError::validation("event document must be a JSON object"));
        }
        Ok(EvEvent { document })
    }

    pub fn get(&self, path: &EvFieldPath) -> Option<&Value> {
        let mut current = &self.document;
        for segment in path.segments() {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    pub fn get_str(&self, path: &EvFieldPath) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    pub fn get_array(&self, path: &EvFieldPath) -> Option<&Vec<Value>> {
        self.get(path).and_then(Value::as_array)
    }

    pub fn exists(&self, path: &EvFieldPath) -> bool {
        self.get(path).is_some()
    }

    /// Writes `value` at `path`, creating missing intermediate objects.
    ///
    /// Returns `false` and leaves the event untouched when an intermediate
    /// segment already holds a non-object value.
    pub fn set(&mut self, path: &EvFieldPath, value: Value) -> bool {
        let Some((last, parents)) = path.segments().split_last() else {
            return false;
        };

        // Checked before mutating so a refused write never leaves partial objects.
        let mut probe = &self.document;
        for segment in parents {
            match probe {
                Value::Object(map) => match map.get(segment) {
                    Some(next @ Value::Object(_)) => probe = next,
                    Some(_) => return false,
                    None => break,
                },
                _ => return false,
            }
        }

        let mut current = match &mut self.document {
            Value::Object(map) => map,
            _ => return false,
        };
        for segment in parents {
            let entry = current
                .entry(segment.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            current = match entry {
                Value::Object(map) => map,
                _ => return false,
            };
        }
        current.insert(last.clone(), value);
        true
    }

    pub fn remove(&mut self, path: &EvFieldPath) -> Option<Value> {
        let (last, parents) = path.segments().split_last()?;
        let mut current = &mut self.document;
        for segment in parents {
            current = current.as_object_mut()?.get_mut(segment)?;
        }
        current.as_object_mut()?.remove(last)
    }

    pub fn as_value(&self) -> &Value {
        &self.document
    }

    pub fn into_value(self) -> Value {
        self.document
    }
}

impl Default for EvEvent {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EvEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.document)
    }
}
