/// Literal that precedes the numeric code in an error body
pub const ENVELOPE_MARKER: &str = "Code: ";

/// Response header carrying the query id assigned by the server
pub const HEADER_QUERY_ID: &str = "X-ClickHouse-Query-Id";

/// Response header carrying the exception code on failed queries
pub const HEADER_EXCEPTION_CODE: &str = "X-ClickHouse-Exception-Code";

/// Default bound on the depth of a type descriptor
pub const DEFAULT_MAX_TYPE_DEPTH: usize = 32;

/// Hard cap on any configured type depth
pub const MAX_TYPE_DEPTH_LIMIT: usize = 256;

/// Default bound on the number of columns announced by a response
pub const DEFAULT_MAX_COLUMNS: usize = 65536;

/// Default number of body bytes kept for diagnostics on malformed responses
pub const DEFAULT_ERROR_SNIPPET_LEN: usize = 1024;

/// Well-known server error codes
///
/// Only a subset of the engine's codes; unknown codes are still carried verbatim.
pub struct ErrorCode;

impl ErrorCode {
    pub const CANNOT_PARSE_TEXT: u64 = 6;
    pub const NO_SUCH_COLUMN_IN_TABLE: u64 = 16;
    pub const BAD_ARGUMENTS: u64 = 36;
    pub const ILLEGAL_TYPE_OF_ARGUMENT: u64 = 43;
    pub const UNKNOWN_FUNCTION: u64 = 46;
    pub const UNKNOWN_IDENTIFIER: u64 = 47;
    pub const UNKNOWN_TYPE: u64 = 50;
    pub const TYPE_MISMATCH: u64 = 53;
    pub const UNKNOWN_TABLE: u64 = 60;
    pub const SYNTAX_ERROR: u64 = 62;
    pub const UNKNOWN_DATABASE: u64 = 81;
    pub const UNKNOWN_SETTING: u64 = 115;
    pub const TIMEOUT_EXCEEDED: u64 = 159;
    pub const READONLY: u64 = 164;
    pub const TOO_MANY_SIMULTANEOUS_QUERIES: u64 = 202;
    pub const MEMORY_LIMIT_EXCEEDED: u64 = 241;
    pub const QUERY_WAS_CANCELLED: u64 = 394;
    pub const ACCESS_DENIED: u64 = 497;
    pub const AUTHENTICATION_FAILED: u64 = 516;

    /// Symbolic name of a known code
    pub fn name(code: u64) -> Option<&'static str> {
        match code {
            Self::CANNOT_PARSE_TEXT => Some("CANNOT_PARSE_TEXT"),
            Self::NO_SUCH_COLUMN_IN_TABLE => Some("NO_SUCH_COLUMN_IN_TABLE"),
            Self::BAD_ARGUMENTS => Some("BAD_ARGUMENTS"),
            Self::ILLEGAL_TYPE_OF_ARGUMENT => Some("ILLEGAL_TYPE_OF_ARGUMENT"),
            Self::UNKNOWN_FUNCTION => Some("UNKNOWN_FUNCTION"),
            Self::UNKNOWN_IDENTIFIER => Some("UNKNOWN_IDENTIFIER"),
            Self::UNKNOWN_TYPE => Some("UNKNOWN_TYPE"),
            Self::TYPE_MISMATCH => Some("TYPE_MISMATCH"),
            Self::UNKNOWN_TABLE => Some("UNKNOWN_TABLE"),
            Self::SYNTAX_ERROR => Some("SYNTAX_ERROR"),
            Self::UNKNOWN_DATABASE => Some("UNKNOWN_DATABASE"),
            Self::UNKNOWN_SETTING => Some("UNKNOWN_SETTING"),
            Self::TIMEOUT_EXCEEDED => Some("TIMEOUT_EXCEEDED"),
            Self::READONLY => Some("READONLY"),
            Self::TOO_MANY_SIMULTANEOUS_QUERIES => Some("TOO_MANY_SIMULTANEOUS_QUERIES"),
            Self::MEMORY_LIMIT_EXCEEDED => Some("MEMORY_LIMIT_EXCEEDED"),
            Self::QUERY_WAS_CANCELLED => Some("QUERY_WAS_CANCELLED"),
            Self::ACCESS_DENIED => Some("ACCESS_DENIED"),
            Self::AUTHENTICATION_FAILED => Some("AUTHENTICATION_FAILED"),
            _ => None,
        }
    }
}
