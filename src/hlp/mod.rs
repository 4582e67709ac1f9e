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

//! # Evx HLP Module
//!
//! Literal parsers recognise a well-known token shape at the start of an
//! input and report the typed value together with how many bytes they
//! consumed. Every parser is bounded by a set of stop tokens: a match only
//! counts when it is followed by one of them or by the end of the input.
//!
//! Parsers are built once from `(params, stop_tokens, options)` and are pure
//! functions afterwards. They hold no state between calls, so a single
//! [`EvParser`] can be cloned into any number of threads.
//!
//! ## Bundled Parsers
//!
//! - `ip`: IPv4 dotted quad or IPv6 literal, see [`ip::get_ip_parser`]

pub mod ip;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{EvError, Result};

pub use ip::get_ip_parser;

/// Static configuration shared by every parser.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvParserParams {
    /// Name reported in diagnostics.
    #[serde(default)]
    pub name: String,
    /// Field the parsed value is meant for, if any.
    #[serde(default)]
    pub target: String,
}

/// Successful match.
#[derive(Clone, Debug, PartialEq)]
pub struct EvParsed {
    pub value: Value,
    /// Bytes consumed, stop token excluded.
    pub consumed: usize,
}

/// Failed match; the caller's cursor does not move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvParseFailure {
    pub parser: String,
    pub message: String,
}

impl fmt::Display for EvParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.parser, self.message)
    }
}

pub type EvParseResult = std::result::Result<EvParsed, EvParseFailure>;

pub type EvParserFn = dyn Fn(&str) -> EvParseResult + Send + Sync;

/// Compiled literal parser.
#[derive(Clone)]
pub struct EvParser {
    name: String,
    func: Arc<EvParserFn>,
}

impl EvParser {
    #[allow(non_snake_case)]
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&str) -> EvParseResult + Send + Sync + 'static,
    {
        EvParser {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parse(&self, input: &str) -> EvParseResult {
        (self.func)(input)
    }
}

impl fmt::Debug for EvParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvParser").field("name", &self.name).finish()
    }
}

/// Signature every parser builder follows.
pub type EvParserBuilder = fn(EvParserParams, Vec<String>, Vec<String>) -> Result<EvParser>;

pub fn require_stop_tokens(parser: &str, stop_tokens: &[String]) -> Result<()> {
    if stop_tokens.is_empty() {
        return Err(EvError::parser(parser, "at least one stop token is required"));
    }
    Ok(())
}

pub fn reject_options(parser: &str, options: &[String]) -> Result<()> {
    if !options.is_empty() {
        return Err(EvError::parser(
            parser,
            format!("accepts no options, got {}", options.len()),
        ));
    }
    Ok(())
}

/// Whether `rest` (the input after a candidate match) ends the match.
///
/// End of input always does. A non-empty stop token does when `rest` starts
/// with it; the empty stop token only stands for end of input.
pub fn at_stop(rest: &str, stop_tokens: &[String]) -> bool {
    rest.is_empty()
        || stop_tokens
            .iter()
            .any(|token| !token.is_empty() && rest.starts_with(token.as_str()))
}

/// Registry mapping parser names to their builders.
#[derive(Debug, Default)]
pub struct EvParserRegistry {
    inner: HashMap<String, EvParserBuilder>,
}

impl EvParserRegistry {
    #[allow(non_snake_case)]
    pub fn new() -> Self {
        EvParserRegistry {
            inner: HashMap::new(),
        }
    }

    /// Registry pre-loaded with the bundled parsers.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("ip", get_ip_parser as EvParserBuilder);
        registry
    }

    pub fn register(&mut self, name: &str, builder: EvParserBuilder) {
        self.inner.insert(name.to_string(), builder);
    }

    pub fn get(&self, name: &str) -> Result<EvParserBuilder> {
        self.inner
            .get(name)
            .copied()
            .ok_or_else(|| EvError::parser(name, "unknown parser"))
    }

    pub fn build(
        &self,
        name: &str,
        params: EvParserParams,
        stop_tokens: Vec<String>,
        options: Vec<String>,
    ) -> Result<EvParser> {
        let builder = self.get(name)?;
        builder(params, stop_tokens, options)
    }
}
