use crate::constant::ErrorCode;
use crate::protocol::envelope::{MalformedEnvelope, MalformedReason, parse_error_envelope};

#[test]
fn test_parse_unknown_identifier() {
    let body = b"Code: 47. DB::Exception: Unknown identifier: A";
    let err = parse_error_envelope(body).expect("Failed to parse");

    assert_eq!(err.code, 47);
    assert_eq!(err.code, ErrorCode::UNKNOWN_IDENTIFIER);
    assert_eq!(err.message, "DB::Exception: Unknown identifier: A");
    assert_eq!(err.raw, "Code: 47. DB::Exception: Unknown identifier: A");
    assert_eq!(err.code_name(), Some("UNKNOWN_IDENTIFIER"));
    assert!(err.query_id.is_none());
}

#[test]
fn test_parse_multi_digit_codes() {
    for code in [0u64, 6, 60, 241, 516, 1002, 999_999, u64::MAX] {
        let body = format!("Code: {code}. DB::Exception: something went wrong");
        let err = parse_error_envelope(body.as_bytes()).expect("Failed to parse");
        assert_eq!(err.code, code);
    }
}

#[test]
fn test_parse_marker_not_at_start() {
    // Exception text streamed after partial output
    let body = b"1\n2\nCode: 241. DB::Exception: Memory limit exceeded";
    let err = parse_error_envelope(body).expect("Failed to parse");
    assert_eq!(err.code, ErrorCode::MEMORY_LIMIT_EXCEEDED);
    assert_eq!(err.message, "DB::Exception: Memory limit exceeded");
}

#[test]
fn test_parse_only_first_marker_counts() {
    let body = b"Code: 62. DB::Exception: Syntax error. Code: 47. nested";
    let err = parse_error_envelope(body).expect("Failed to parse");
    assert_eq!(err.code, 62);
    assert_eq!(err.message, "DB::Exception: Syntax error. Code: 47. nested");
}

#[test]
fn test_parse_code_without_period() {
    let body = b"Code: 81 DB::Exception: Database foo doesn't exist";
    let err = parse_error_envelope(body).unwrap_err();
    assert_eq!(err.reason, MalformedReason::MissingPeriod);
    assert_eq!(err.raw, "Code: 81 DB::Exception: Database foo doesn't exist");

    // an HTTP status quoted by a proxy is not an engine code
    let body = b"<p>Status Code: 502 upstream unavailable</p>";
    let err = parse_error_envelope(body).unwrap_err();
    assert_eq!(err.reason, MalformedReason::MissingPeriod);

    let body = b"Code: 81";
    let err = parse_error_envelope(body).unwrap_err();
    assert_eq!(err.reason, MalformedReason::MissingPeriod);
}

#[test]
fn test_parse_empty_message() {
    let err = parse_error_envelope(b"Code: 81.").expect("Failed to parse");
    assert_eq!(err.code, 81);
    assert_eq!(err.message, "");
}

#[test]
fn test_parse_missing_marker() {
    let body = b"<html>502 Bad Gateway</html>";
    let err = parse_error_envelope(body).unwrap_err();
    assert_eq!(err.reason, MalformedReason::MissingMarker);
    assert_eq!(err.raw, "<html>502 Bad Gateway</html>");
}

#[test]
fn test_parse_marker_without_digits() {
    let body = b"Code: unknown. DB::Exception: ???";
    // marker present, but no digits after it
    let err = parse_error_envelope(body).unwrap_err();
    assert_eq!(err.reason, MalformedReason::MissingCode);
    assert_eq!(err.raw, "Code: unknown. DB::Exception: ???");
}

#[test]
fn test_parse_code_overflow() {
    let body = b"Code: 99999999999999999999999. DB::Exception: huge";
    let err = parse_error_envelope(body).unwrap_err();
    assert_eq!(err.reason, MalformedReason::CodeOverflow);
}

#[test]
fn test_parse_non_utf8_body() {
    let mut body = b"Code: 6. Cannot parse: ".to_vec();
    body.extend_from_slice(&[0xFF, 0xFE]);
    let err = parse_error_envelope(&body).expect("Failed to parse");
    assert_eq!(err.code, ErrorCode::CANNOT_PARSE_TEXT);
    assert!(err.message.starts_with("Cannot parse: "));
}

#[test]
fn test_truncate_raw_respects_char_boundary() {
    let envelope = MalformedEnvelope::new(MalformedReason::MissingMarker, "ab\u{e9}cd".as_bytes());
    // 'é' occupies bytes 2..4
    let truncated = envelope.truncate_raw(3);
    assert_eq!(truncated.raw, "ab");
}

#[test]
fn test_server_error_display() {
    let err = parse_error_envelope(b"Code: 60. DB::Exception: Table t doesn't exist").unwrap();
    assert_eq!(err.to_string(), "Code: 60. DB::Exception: Table t doesn't exist");
}
