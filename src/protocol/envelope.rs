use crate::constant::{ENVELOPE_MARKER, ErrorCode};

/// Error reported by the engine
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Code: {}. {}", self.code, self.message)]
pub struct ServerError {
    pub code: u64,
    pub message: String,
    /// Entire error body as received
    pub raw: String,
    pub query_id: Option<String>,
}

impl ServerError {
    /// Symbolic name of the code, e.g. `UNKNOWN_IDENTIFIER` for 47
    pub fn code_name(&self) -> Option<&'static str> {
        ErrorCode::name(self.code)
    }
}

/// Why a response body could not be interpreted
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedReason {
    #[error("error body does not contain the `Code: ` marker")]
    MissingMarker,

    #[error("no digits follow the `Code: ` marker")]
    MissingCode,

    #[error("error code does not fit in 64 bits")]
    CodeOverflow,

    #[error("error code is not followed by `.`")]
    MissingPeriod,

    #[error("column metadata is truncated")]
    TruncatedMetadata,

    #[error("column metadata is not well-formed")]
    InvalidMetadata,

    #[error("column metadata is not valid UTF-8")]
    InvalidUtf8,

    #[error("column count {count} exceeds the limit of {limit}")]
    TooManyColumns { count: u64, limit: usize },
}

/// A response whose body does not have the shape its status promises
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason} (raw: {raw:?})")]
pub struct MalformedEnvelope {
    pub reason: MalformedReason,
    /// Body text, possibly truncated
    pub raw: String,
    pub status: Option<u16>,
    /// Code from the exception header, never promoted to a server error code
    pub header_code: Option<u64>,
}

impl MalformedEnvelope {
    pub fn new(reason: MalformedReason, body: &[u8]) -> Self {
        Self {
            reason,
            raw: String::from_utf8_lossy(body).into_owned(),
            status: None,
            header_code: None,
        }
    }

    /// Keep at most `limit` bytes of the raw text, cut at a char boundary
    pub fn truncate_raw(mut self, limit: usize) -> Self {
        if self.raw.len() > limit {
            let mut end = limit;
            while !self.raw.is_char_boundary(end) {
                end -= 1;
            }
            self.raw.truncate(end);
        }
        self
    }
}

/// Extract `(code, message)` from an error body
///
/// Layout: `... Code: <digits>. <free text>`. Only the first marker is interpreted;
/// everything after the code is kept as the message without further parsing.
pub fn parse_error_envelope(body: &[u8]) -> Result<ServerError, MalformedEnvelope> {
    let text = String::from_utf8_lossy(body);
    let Some(pos) = text.find(ENVELOPE_MARKER) else {
        return Err(MalformedEnvelope::new(MalformedReason::MissingMarker, body));
    };

    let after = &text[pos + ENVELOPE_MARKER.len()..];
    let digits = after.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return Err(MalformedEnvelope::new(MalformedReason::MissingCode, body));
    }

    let mut code = 0u64;
    for b in after[..digits].bytes() {
        code = match code
            .checked_mul(10)
            .and_then(|c| c.checked_add(u64::from(b - b'0')))
        {
            Some(c) => c,
            None => return Err(MalformedEnvelope::new(MalformedReason::CodeOverflow, body)),
        };
    }

    let Some(message) = after[digits..].strip_prefix('.') else {
        return Err(MalformedEnvelope::new(MalformedReason::MissingPeriod, body));
    };
    let message = message.trim_start();

    Ok(ServerError {
        code,
        message: message.to_string(),
        raw: text.into_owned(),
        query_id: None,
    })
}
