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

//! # Evx Core Tests - Runtime
//!
//! End-to-end tests: configuration files are loaded, compiled through the
//! helper registry and evaluated over batches of events.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test runtime
//! ```

use std::fs;
use std::sync::Arc;

use evx::{
    evaluate_batch, evaluate_chain, EvBatchReport, EvEngineConfig, EvError, EvEvent,
    EvHelperRegistry, EvMemoryKvdb, EvNoSchema, EvOperatorSpec,
};
use serde_json::json;
use tempfile::tempdir;

const YAML_CONFIG: &str = r#"
scope: test_scope
definitions:
  perms_db: windows
operators:
  - destination: /file/access
    helper: kvdb_decode_bitmask
    parameters: [$perms_db, access_mask, $raw.mask]
  - /source/ip: parse_ip($raw.src)
"#;

fn store() -> Arc<EvMemoryKvdb> {
    let kvdb = Arc::new(EvMemoryKvdb::new());
    kvdb.put("windows", "access_mask", r#"{"0": "read", "1": "write", "2": "execute"}"#)
        .unwrap();
    kvdb
}

fn registry(config: &EvEngineConfig) -> EvHelperRegistry {
    EvHelperRegistry::with_defaults(store(), &config.scope, Arc::new(EvNoSchema))
}

/// Tests loading a YAML file and building all of its operators.
#[test]
fn test_yaml_config_builds_terms() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("decoders.yml");
    fs::write(&path, YAML_CONFIG).unwrap();

    let config = EvEngineConfig::from_path(&path).unwrap();
    assert_eq!(config.scope, "test_scope");
    assert_eq!(config.operators.len(), 2);

    let terms = registry(&config)
        .build_all(&config.operators, &config.definitions)
        .unwrap();
    let names: Vec<&str> = terms.iter().map(|term| term.name()).collect();
    assert_eq!(
        names,
        vec![
            "helper.kvdb_decode_bitmask[/file/access, $perms_db, access_mask, $raw.mask]",
            "helper.parse_ip[/source/ip, $raw.src]",
        ]
    );

    let event = EvEvent::from_value(json!({"raw": {"mask": "0x5", "src": "10.1.2.3"}}));
    let outcome = evaluate_chain(&terms, event);
    assert!(outcome.success(), "{:?}", outcome.trace());
    assert_eq!(
        outcome.payload().as_value(),
        &json!({
            "raw": {"mask": "0x5", "src": "10.1.2.3"},
            "file": {"access": ["read", "execute"]},
            "source": {"ip": "10.1.2.3"}
        })
    );
}

/// Tests loading a JSON file.
#[test]
fn test_json_config_from_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("decoders.json");
    fs::write(
        &path,
        r#"{"operators": [{"/ip": "parse_ip($src)"}]}"#,
    )
    .unwrap();

    let config = EvEngineConfig::from_path(&path).unwrap();
    assert_eq!(config.scope, "default");
    assert_eq!(
        config.operators,
        vec![EvOperatorSpec::new("/ip", "parse_ip", vec!["$src".to_string()])]
    );
}

/// Tests that a missing file surfaces as an I/O error.
#[test]
fn test_missing_config_file() {
    let dir = tempdir().unwrap();
    let err = EvEngineConfig::from_path(dir.path().join("absent.yml")).unwrap_err();
    assert!(matches!(err, EvError::Io(_)));
}

/// Tests that one bad operator fails the whole build.
#[test]
fn test_build_all_stops_at_rejection() {
    let config = EvEngineConfig::from_yaml_str(
        r#"
operators:
  - /ip: parse_ip($src)
  - /flags: kvdb_decode_bitmask(windows, missing_key, $mask)
  - /other: unknown_helper($x)
"#,
    )
    .unwrap();
    let err = registry(&config)
        .build_all(&config.operators, &config.definitions)
        .unwrap_err();
    assert!(matches!(err, EvError::Kvdb { .. }));
}

/// Tests batch evaluation and the accepted/dead-letter split.
#[test]
fn test_batch_report() {
    let config = EvEngineConfig::new();
    let spec = EvOperatorSpec::parse_expression("/flags", "kvdb_decode_bitmask(windows, access_mask, $mask)")
        .unwrap();
    let term = registry(&config).build(&spec, &config.definitions).unwrap();

    let masks = ["0x1", "0x8", "0x6", "bad", "0x0", "0x3"];
    let events: Vec<EvEvent> = masks
        .iter()
        .map(|mask| EvEvent::from_value(json!({ "mask": mask })))
        .collect();

    let outcomes = evaluate_batch(&term, events);
    let flags: Vec<bool> = outcomes.iter().map(|outcome| outcome.success()).collect();
    assert_eq!(flags, vec![true, false, true, false, false, true]);

    let report = EvBatchReport::from_outcomes(outcomes);
    assert_eq!(report.accepted_count(), 3);
    assert_eq!(report.rejected_count(), 3);
    assert_eq!(report.accepted[1].as_value()["flags"], json!(["write", "execute"]));
    for (event, trace) in &report.dead_letter {
        assert!(event.as_value().get("flags").is_none());
        assert!(trace.starts_with(term.name()));
    }
}
