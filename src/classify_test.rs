use std::sync::Arc;

use pretty_assertions::assert_eq;

use crate::Opts;
use crate::classify::{Outcome, classify};
use crate::col::{Column, ColumnSchema};
use crate::constant::ErrorCode;
use crate::protocol::envelope::MalformedReason;
use crate::protocol::primitive::{write_string_varint, write_varint};
use crate::protocol::response::{Headers, RawResponse, TransportStatus};
use crate::types::{ResolutionErrorKind, TypeNode, TypeRegistry};

/// Build the column header of a success body
fn header(columns: &[(&str, &str)]) -> Vec<u8> {
    let mut out = Vec::new();
    write_varint(&mut out, columns.len() as u64);
    for (name, _) in columns {
        write_string_varint(&mut out, name);
    }
    for (_, ty) in columns {
        write_string_varint(&mut out, ty);
    }
    out
}

fn ok_response(body: Vec<u8>) -> RawResponse {
    RawResponse::new(TransportStatus::from_http(200), Headers::new(), body)
}

fn failed_response(body: &[u8]) -> RawResponse {
    RawResponse::new(TransportStatus::from_http(500), Headers::new(), body)
}

#[test]
fn test_server_failure() {
    let response = failed_response(b"Code: 47. DB::Exception: Unknown identifier: A");
    let classified = classify(response, &Opts::default());

    let Outcome::ServerFailure(err) = classified.outcome else {
        panic!("expected server failure");
    };
    assert_eq!(err.code, ErrorCode::UNKNOWN_IDENTIFIER);
    assert_eq!(err.message, "DB::Exception: Unknown identifier: A");
    assert!(classified.rows.is_empty());
}

#[test]
fn test_server_failure_carries_query_id() {
    let headers: Headers = [("X-ClickHouse-Query-Id", "q-1")].into_iter().collect();
    let response = RawResponse::new(
        TransportStatus::failed(None),
        headers,
        b"Code: 62. DB::Exception: Syntax error".to_vec(),
    );
    let classified = classify(response, &Opts::default());

    assert_eq!(classified.query_id.as_deref(), Some("q-1"));
    let Outcome::ServerFailure(err) = classified.outcome else {
        panic!("expected server failure");
    };
    assert_eq!(err.query_id.as_deref(), Some("q-1"));
}

#[test]
fn test_failure_without_envelope_is_malformed() {
    let response = failed_response(b"<html><body>502 Bad Gateway</body></html>");
    let classified = classify(response, &Opts::default());

    let Outcome::MalformedEnvelope(malformed) = classified.outcome else {
        panic!("expected malformed envelope");
    };
    assert_eq!(malformed.reason, MalformedReason::MissingMarker);
    assert_eq!(malformed.status, Some(500));
    assert_eq!(malformed.raw, "<html><body>502 Bad Gateway</body></html>");
}

#[test]
fn test_proxy_page_quoting_a_status_code_is_malformed() {
    let response = RawResponse::new(
        TransportStatus::from_http(502),
        Headers::new(),
        "<html><h1>Bad Gateway</h1><p>Status Code: 502 upstream unavailable</p></html>",
    );
    let classified = classify(response, &Opts::default());

    let Outcome::MalformedEnvelope(malformed) = classified.outcome else {
        panic!("expected malformed envelope");
    };
    assert_eq!(malformed.reason, MalformedReason::MissingPeriod);
    assert_eq!(malformed.status, Some(502));
}

#[test]
fn test_failure_never_succeeds_even_with_valid_header() {
    // A body that would parse as a valid column header
    let body = header(&[("x", "UInt64")]);
    let response = RawResponse::new(TransportStatus::failed(Some(500)), Headers::new(), body);
    let classified = classify(response, &Opts::default());
    assert!(!classified.outcome.is_success());
    assert!(matches!(
        classified.outcome,
        Outcome::MalformedEnvelope(_)
    ));
}

#[test]
fn test_failure_empty_body() {
    let classified = classify(failed_response(b""), &Opts::default());
    assert!(matches!(
        classified.outcome,
        Outcome::MalformedEnvelope(ref m) if m.reason == MalformedReason::MissingMarker
    ));
}

#[test]
fn test_malformed_records_header_code_only_for_diagnostics() {
    let headers: Headers = [("X-ClickHouse-Exception-Code", "241")].into_iter().collect();
    let response = RawResponse::new(
        TransportStatus::from_http(500),
        headers,
        b"connection reset".to_vec(),
    );
    let classified = classify(response, &Opts::default());

    let Outcome::MalformedEnvelope(malformed) = classified.outcome else {
        panic!("expected malformed envelope");
    };
    assert_eq!(malformed.header_code, Some(241));
}

#[test]
fn test_malformed_snippet_is_truncated() {
    let body = vec![b'x'; 5000];
    let opts = Opts {
        error_snippet_len: 16,
        ..Default::default()
    };
    let classified = classify(failed_response(&body), &opts);

    let Outcome::MalformedEnvelope(malformed) = classified.outcome else {
        panic!("expected malformed envelope");
    };
    assert_eq!(malformed.raw.len(), 16);
}

#[test]
fn test_success_resolves_all_columns() {
    let mut body = header(&[
        ("id", "UInt64"),
        ("name", "Nullable(String)"),
        ("tags", "Array(LowCardinality(String))"),
    ]);
    body.extend_from_slice(&[0xDE, 0xAD]);
    let classified = classify(ok_response(body), &Opts::default());

    let Outcome::Success(schema) = classified.outcome else {
        panic!("expected success");
    };
    assert_eq!(schema.len(), 3);
    assert_eq!(
        schema.get(0),
        Some(&Column::new("id", TypeNode::base("UInt64")))
    );
    assert_eq!(
        schema.get(1),
        Some(&Column::new(
            "name",
            TypeNode::nullable(TypeNode::base("String"))
        ))
    );
    assert_eq!(
        schema.get(2).map(|c| c.ty.to_string()),
        Some("Array(LowCardinality(String))".to_string())
    );
    assert_eq!(classified.rows, vec![0xDEu8, 0xAD]);
}

#[test]
fn test_success_with_empty_body() {
    let classified = classify(ok_response(Vec::new()), &Opts::default());
    assert_eq!(classified.outcome, Outcome::Success(ColumnSchema::default()));
    assert!(classified.rows.is_empty());
}

#[test]
fn test_one_bad_column_fails_whole_response() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let body = header(&[("x", "UInt64"), ("y", "Interval")]);
    let classified = classify(ok_response(body), &Opts::default());

    let Outcome::TypeResolutionFailure(err) = classified.outcome else {
        panic!("expected type resolution failure");
    };
    assert_eq!(err.kind, ResolutionErrorKind::UnknownType);
    assert_eq!(err.token, "Interval");
    assert_eq!(err.offset, 0);
    assert_eq!(err.column.as_deref(), Some("y"));
    assert!(classified.rows.is_empty());
}

#[test]
fn test_success_status_with_error_text_is_not_a_server_failure() {
    // Resolution failures are client-side, whatever the body looks like
    let body = header(&[("c", "Code")]);
    let classified = classify(ok_response(body), &Opts::default());
    assert!(matches!(
        classified.outcome,
        Outcome::TypeResolutionFailure(_)
    ));
}

#[test]
fn test_truncated_metadata() {
    let mut body = header(&[("x", "UInt64"), ("y", "String")]);
    body.truncate(body.len() - 3);
    let classified = classify(ok_response(body), &Opts::default());
    assert!(matches!(
        classified.outcome,
        Outcome::MalformedEnvelope(ref m) if m.reason == MalformedReason::TruncatedMetadata
    ));
}

#[test]
fn test_invalid_utf8_metadata() {
    let body = vec![0x01, 0x02, 0xC3, 0x28, 0x06];
    let classified = classify(ok_response(body), &Opts::default());
    assert!(matches!(
        classified.outcome,
        Outcome::MalformedEnvelope(ref m) if m.reason == MalformedReason::InvalidUtf8
    ));
}

#[test]
fn test_too_many_columns() {
    let mut body = Vec::new();
    write_varint(&mut body, 1_000_000);
    let classified = classify(ok_response(body), &Opts::default());
    assert!(matches!(
        classified.outcome,
        Outcome::MalformedEnvelope(ref m)
            if m.reason == MalformedReason::TooManyColumns { count: 1_000_000, limit: 65536 }
    ));
}

#[test]
fn test_custom_registry_is_used() {
    let opts = Opts {
        registry: Arc::new(TypeRegistry::builder().base("Interval").build()),
        ..Default::default()
    };
    let body = header(&[("y", "Interval")]);
    let classified = classify(ok_response(body), &opts);
    assert!(classified.outcome.is_success());
}

#[test]
fn test_outcome_into_result() {
    let classified = classify(
        failed_response(b"Code: 60. DB::Exception: Table default.t doesn't exist"),
        &Opts::default(),
    );
    let err = classified.outcome.into_result().unwrap_err();
    assert_eq!(err.server_code(), Some(ErrorCode::UNKNOWN_TABLE));
}
