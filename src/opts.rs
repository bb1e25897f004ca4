use std::sync::Arc;

use smart_default::SmartDefault;

use crate::constant::{
    DEFAULT_ERROR_SNIPPET_LEN, DEFAULT_MAX_COLUMNS, DEFAULT_MAX_TYPE_DEPTH, MAX_TYPE_DEPTH_LIMIT,
};
use crate::error::Error;
use crate::types::{GLOBAL_TYPE_REGISTRY, TypeRegistry};

/// Limits and lookup tables used while classifying a response
///
/// ```rs
/// let mut opts1 = Opts::default();
/// opts1.max_type_depth = 16;
///
/// let opts2 = Opts::try_from("clickhouse://localhost:8123/default?max_columns=1000")?;
/// ```
#[derive(Debug, Clone, SmartDefault)]
pub struct Opts {
    /// Maximum depth of a column type descriptor (`UInt8` is 1, `Array(UInt8)` is 2)
    ///
    /// Values above `MAX_TYPE_DEPTH_LIMIT` are capped.
    #[default(DEFAULT_MAX_TYPE_DEPTH)]
    pub max_type_depth: usize,

    /// Maximum number of columns a response may announce
    #[default(DEFAULT_MAX_COLUMNS)]
    pub max_columns: usize,

    /// Number of body bytes kept in `MalformedEnvelope::raw`
    #[default(DEFAULT_ERROR_SNIPPET_LEN)]
    pub error_snippet_len: usize,

    /// Known type constructors. Shared by every classification; never mutated.
    #[default(Arc::clone(&GLOBAL_TYPE_REGISTRY))]
    pub registry: Arc<TypeRegistry>,
}

fn parse_limit(key: &str, value: &str) -> Result<usize, Error> {
    match value.parse::<usize>() {
        Ok(0) => Err(Error::BadConfigError(format!("{key} must be positive"))),
        Ok(n) => Ok(n),
        Err(e) => Err(Error::BadConfigError(format!(
            "Invalid value '{value}' for {key}: {e}"
        ))),
    }
}

impl TryFrom<&str> for Opts {
    type Error = Error;

    fn try_from(url: &str) -> Result<Self, Self::Error> {
        let parsed = url::Url::parse(url)
            .map_err(|e| Error::BadConfigError(format!("Failed to parse ClickHouse URL: {}", e)))?;

        if !matches!(parsed.scheme(), "clickhouse" | "http" | "https") {
            return Err(Error::BadConfigError(format!(
                "Invalid URL scheme '{}', expected 'clickhouse', 'http' or 'https'",
                parsed.scheme()
            )));
        }

        let mut opts = Self::default();
        for (key, value) in parsed.query_pairs() {
            match key.as_ref() {
                "max_type_depth" => {
                    opts.max_type_depth = parse_limit(&key, &value)?.min(MAX_TYPE_DEPTH_LIMIT)
                }
                "max_columns" => opts.max_columns = parse_limit(&key, &value)?,
                "error_snippet_len" => opts.error_snippet_len = parse_limit(&key, &value)?,
                // Connection parameters belong to the transport
                _ => {}
            }
        }

        Ok(opts)
    }
}
