// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error report tests for runtime-api-protocol.

use std::fmt;

use runtime_api_protocol::{DEFAULT_ERROR_MESSAGE, DEFAULT_ERROR_TYPE, ErrorReport};

#[derive(Debug)]
struct ConfigError {
    key: &'static str,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missing setting {}", self.key)
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug)]
struct StartupError {
    source: ConfigError,
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "startup failed")
    }
}

impl std::error::Error for StartupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

#[derive(Debug)]
struct Silent;

impl fmt::Display for Silent {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Ok(())
    }
}

impl std::error::Error for Silent {}

#[derive(Debug)]
struct Exploding;

impl fmt::Display for Exploding {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        panic!("display is broken")
    }
}

impl std::error::Error for Exploding {}

// ============================================================================
// Bare type reports
// ============================================================================

#[test]
fn test_type_only_report_body() {
    let report = ErrorReport::from_type("Function.ConfigError");
    assert_eq!(
        String::from_utf8(report.to_json()).unwrap(),
        r#"{"errorMessage":"Function.ConfigError","errorType":"Function.ConfigError","stackTrace":[]}"#
    );
}

#[test]
fn test_blank_type_falls_back_to_default() {
    let report = ErrorReport::from_type("  ");
    assert_eq!(report.error_type, DEFAULT_ERROR_TYPE);
    assert_eq!(report.error_message, DEFAULT_ERROR_TYPE);
}

// ============================================================================
// Fault reports
// ============================================================================

#[test]
fn test_type_is_derived_from_rust_type() {
    let report = ErrorReport::from_error(&ConfigError { key: "TABLE" }, None);
    assert_eq!(report.error_type, "ConfigError");
    assert_eq!(report.error_message, "missing setting TABLE");
    assert!(report.stack_trace.is_empty());
    assert!(report.cause.is_none());
}

#[test]
fn test_explicit_type_overrides_classification() {
    let report = ErrorReport::from_error(&ConfigError { key: "TABLE" }, Some("Function.Config"));
    assert_eq!(report.error_type, "Function.Config");
    assert_eq!(report.error_message, "missing setting TABLE");
}

#[test]
fn test_blank_explicit_type_keeps_classification() {
    for blank in ["", "   "] {
        let report = ErrorReport::from_error(&ConfigError { key: "TABLE" }, Some(blank));
        assert_eq!(report.error_type, "ConfigError", "override {:?}", blank);
    }
}

#[test]
fn test_trait_object_gets_default_type() {
    let boxed: Box<dyn std::error::Error + Send + Sync> = Box::new(ConfigError { key: "A" });
    let report = ErrorReport::from_error(boxed.as_ref(), None);
    assert_eq!(report.error_type, DEFAULT_ERROR_TYPE);
    assert_eq!(report.error_message, "missing setting A");
}

#[test]
fn test_source_chain_becomes_cause() {
    let err = StartupError {
        source: ConfigError { key: "PORT" },
    };
    let report = ErrorReport::from_error(&err, None);

    assert_eq!(report.error_type, "StartupError");
    let cause = report.cause.as_ref().unwrap();
    assert_eq!(cause.error_message, "missing setting PORT");
    assert!(cause.cause.is_none());

    let json: serde_json::Value = serde_json::from_slice(&report.to_json()).unwrap();
    assert_eq!(json["cause"]["errorMessage"], "missing setting PORT");
}

#[test]
fn test_empty_display_degrades_to_default_message() {
    let report = ErrorReport::from_error(&Silent, None);
    assert_eq!(report.error_message, DEFAULT_ERROR_MESSAGE);
    assert_eq!(report.error_type, "Silent");
}

#[test]
fn test_panicking_display_degrades_to_default_message() {
    let report = ErrorReport::from_error(&Exploding, Some("Function.Crash"));
    assert_eq!(report.error_message, DEFAULT_ERROR_MESSAGE);
    assert_eq!(report.error_type, "Function.Crash");
    assert!(report.stack_trace.is_empty());
}

#[test]
fn test_stack_trace_frames_keep_order() {
    let report = ErrorReport::from_error(&ConfigError { key: "K" }, None)
        .with_stack_trace(["at handler", "at main"]);
    assert_eq!(report.stack_trace, vec!["at handler", "at main"]);

    let json: serde_json::Value = serde_json::from_slice(&report.to_json()).unwrap();
    assert_eq!(json["stackTrace"][0], "at handler");
    assert_eq!(json["stackTrace"][1], "at main");
    assert!(json.get("cause").is_none());
}
