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

//! # Evx Core Library
//!
//! Field-transformation core of a log/event normalization engine. Declarative
//! helper operators are compiled once into terms, then evaluated against
//! events to write structured, typed fields.
//!
//! ## Module Overview
//!
//! - **errors**: Build-time error enum and `Result` alias
//! - **event**: JSON event document and field paths
//! - **parameter**: Helper parameters, references and definitions
//! - **schema**: Destination type declarations consulted at build time
//! - **kvdb**: Key-value store boundary and an in-memory store
//! - **operator**: Terms, outcomes and the helper builder signature
//! - **operators**: Bundled helpers (`kvdb_decode_bitmask`, `parse_ip`)
//! - **hlp**: Literal parsers bounded by stop tokens (`ip`)
//! - **registry**: Helper name to builder lookup
//! - **config**: JSON/YAML operator configuration
//! - **runtime**: Batch and chained evaluation
//!
//! ## Feature Flags
//!
//! - `parallel` (default): Evaluates batches on the Rayon thread pool
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use evx::{EvDefinitions, EvEvent, EvHelperRegistry, EvMemoryKvdb, EvNoSchema, EvOperatorSpec};
//!
//! let kvdb = Arc::new(EvMemoryKvdb::new());
//! kvdb.put("perms", "access", r#"{"0": "read", "1": "write"}"#).unwrap();
//!
//! let registry = EvHelperRegistry::with_defaults(kvdb, "scope", Arc::new(EvNoSchema));
//! let spec = EvOperatorSpec::parse_expression("/access", "kvdb_decode_bitmask(perms, access, $mask)").unwrap();
//! let term = registry.build(&spec, &EvDefinitions::new()).unwrap();
//!
//! let outcome = term.evaluate(EvEvent::parse(r#"{"mask": "0x3"}"#).unwrap());
//! assert!(outcome.success());
//! ```
//!
//! ## Error Handling
//!
//! Building returns `Result<EvTerm, EvError>`. Evaluation never errors: it
//! returns an `EvOutcome` whose failure arm keeps the event untouched and
//! carries a trace.

#![allow(non_snake_case)]

pub mod config;
pub mod errors;
pub mod event;
pub mod hlp;
pub mod kvdb;
pub mod operator;
pub mod operators;
pub mod parameter;
pub mod registry;
pub mod runtime;
pub mod schema;

pub use config::{EvEngineConfig, EvOperatorSpec};
pub use errors::{EvError, Result};
pub use event::{EvEvent, EvFieldPath, EvJsonType};
pub use hlp::{get_ip_parser, EvParseFailure, EvParsed, EvParser, EvParserParams, EvParserRegistry};
pub use kvdb::{EvKvdbHandler, EvKvdbManager, EvMemoryKvdb};
pub use operator::{EvHelperBuilder, EvOutcome, EvTerm};
pub use operators::ip::parse_ip_factory;
pub use operators::kvdb::{kvdb_decode_bitmask_factory, EvDecodeTable};
pub use parameter::{EvDefinitions, EvParameter};
pub use registry::EvHelperRegistry;
pub use runtime::{evaluate_batch, evaluate_chain, execute_term, EvBatchReport};
pub use schema::{EvNoSchema, EvSchema, EvStaticSchema};
