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

//! # Evx Operator Tests - IP Helper
//!
//! Tests for the `parse_ip` helper, which validates a whole field with the
//! HLP IP parser.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test parse_ip
//! ```

use std::sync::Arc;

use evx::{
    parse_ip_factory, EvDefinitions, EvError, EvEvent, EvHelperBuilder, EvJsonType, EvNoSchema,
    EvStaticSchema, EvTerm,
};
use serde_json::json;

fn builder() -> EvHelperBuilder {
    parse_ip_factory(Arc::new(EvNoSchema))
}

fn term() -> EvTerm {
    builder()("/source/ip", "parse_ip", &["$raw.src".to_string()], &EvDefinitions::new()).unwrap()
}

/// Tests copying valid IPv4 and IPv6 literals.
#[test]
fn test_parse_ip_copies_literals() {
    let term = term();
    for ip in ["192.168.0.1", "2001:DB8::1", "::ffff:0:0.0.0.0"] {
        let outcome = term.evaluate(EvEvent::from_value(json!({"raw": {"src": ip}})));
        assert!(outcome.success(), "{ip}: {:?}", outcome.trace());
        assert_eq!(outcome.payload().as_value()["source"]["ip"], json!(ip));
    }
}

/// Tests that the literal must span the whole field.
#[test]
fn test_parse_ip_rejects_trailing_text() {
    let term = term();
    for text in ["192.168.0.1:8080", "10.0.0.1 ", "127.1", "host"] {
        let event = EvEvent::from_value(json!({"raw": {"src": text}}));
        let outcome = term.evaluate(event.clone());
        assert!(outcome.failure(), "{text} accepted");
        assert_eq!(outcome.payload(), &event);
    }
}

/// Tests missing and non-string source fields.
#[test]
fn test_parse_ip_bad_source() {
    let term = term();
    for doc in [json!({}), json!({"raw": {"src": 10}})] {
        let outcome = term.evaluate(EvEvent::from_value(doc));
        assert!(outcome.failure());
        assert!(outcome.trace().unwrap().contains("raw.src"));
    }
}

/// Tests build-time parameter and schema checks.
#[test]
fn test_parse_ip_build_checks() {
    let defs = EvDefinitions::new();
    let b = builder();
    assert!(matches!(b("/ip", "parse_ip", &[], &defs), Err(EvError::Arity { .. })));
    assert!(matches!(
        b("/ip", "parse_ip", &["literal".to_string()], &defs),
        Err(EvError::Parameter { .. })
    ));

    let schema = EvStaticSchema::new().with_field("/ip", EvJsonType::Number).unwrap();
    let typed = parse_ip_factory(Arc::new(schema));
    assert!(matches!(
        typed("/ip", "parse_ip", &["$src".to_string()], &defs),
        Err(EvError::Schema { .. })
    ));
}
