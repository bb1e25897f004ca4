use tracing::{debug, warn};

use crate::Opts;
use crate::col::{Column, ColumnSchema};
use crate::constant::{HEADER_EXCEPTION_CODE, HEADER_QUERY_ID};
use crate::error::{Error, Result};
use crate::protocol::envelope::{MalformedEnvelope, MalformedReason, ServerError, parse_error_envelope};
use crate::protocol::primitive::{read_str_varint, read_varint};
use crate::protocol::response::RawResponse;
use crate::types::{TypeResolutionError, resolve};

/// Result of interpreting one response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(ColumnSchema),
    ServerFailure(ServerError),
    TypeResolutionFailure(TypeResolutionError),
    MalformedEnvelope(MalformedEnvelope),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Convert failure variants into the matching [`Error`] variant
    pub fn into_result(self) -> Result<ColumnSchema> {
        match self {
            Outcome::Success(schema) => Ok(schema),
            Outcome::ServerFailure(err) => Err(Error::ServerError(err)),
            Outcome::TypeResolutionFailure(err) => Err(Error::TypeResolution(err)),
            Outcome::MalformedEnvelope(err) => Err(Error::MalformedEnvelope(err)),
        }
    }
}

/// An [`Outcome`] together with what the result binder needs from the body
#[derive(Debug, Clone)]
pub struct ClassifiedResponse {
    pub outcome: Outcome,
    /// Row data following the column header; empty unless the outcome is a success
    pub rows: Vec<u8>,
    pub query_id: Option<String>,
}

/// Decide between success and failure and interpret the body accordingly
///
/// Runs to completion without I/O. A failing status never yields [`Outcome::Success`],
/// and a single unresolvable column fails the whole response.
#[tracing::instrument(skip_all)]
pub fn classify(response: RawResponse, opts: &Opts) -> ClassifiedResponse {
    let RawResponse {
        status,
        headers,
        mut body,
    } = response;
    let query_id = headers.get(HEADER_QUERY_ID).map(ToString::to_string);

    if !status.success {
        let outcome = match parse_error_envelope(&body) {
            Ok(mut err) => {
                debug!(code = err.code, "server rejected query");
                err.query_id = query_id.clone();
                Outcome::ServerFailure(err)
            }
            Err(mut malformed) => {
                malformed.status = status.code;
                malformed.header_code = headers
                    .get(HEADER_EXCEPTION_CODE)
                    .and_then(|code| code.trim().parse().ok());
                warn!(reason = %malformed.reason, status = ?status.code, "malformed error response");
                Outcome::MalformedEnvelope(malformed.truncate_raw(opts.error_snippet_len))
            }
        };
        return ClassifiedResponse {
            outcome,
            rows: Vec::new(),
            query_id,
        };
    }

    let (outcome, header_len) = match read_schema(&body, opts) {
        Ok((schema, header_len)) => {
            debug!(columns = schema.len(), "resolved result schema");
            (Outcome::Success(schema), header_len)
        }
        Err(outcome) => (outcome, body.len()),
    };

    let rows = if outcome.is_success() {
        body.split_off(header_len)
    } else {
        Vec::new()
    };

    ClassifiedResponse {
        outcome,
        rows,
        query_id,
    }
}

fn metadata_reason(err: Error) -> MalformedReason {
    match err {
        Error::UnexpectedEof => MalformedReason::TruncatedMetadata,
        Error::InvalidUtf8(_) => MalformedReason::InvalidUtf8,
        _ => MalformedReason::InvalidMetadata,
    }
}

fn malformed(reason: MalformedReason, body: &[u8], opts: &Opts) -> Outcome {
    warn!(%reason, "malformed column metadata");
    Outcome::MalformedEnvelope(MalformedEnvelope::new(reason, body).truncate_raw(opts.error_snippet_len))
}

/// Read the column header `count, names..., types...` and resolve every type
///
/// Returns the schema and the number of header bytes consumed. An empty body
/// is a statement without a result set.
fn read_schema(body: &[u8], opts: &Opts) -> std::result::Result<(ColumnSchema, usize), Outcome> {
    if body.is_empty() {
        return Ok((ColumnSchema::default(), 0));
    }

    let (count, mut data) =
        read_varint(body).map_err(|e| malformed(metadata_reason(e), body, opts))?;
    let count = match usize::try_from(count) {
        Ok(count) if count <= opts.max_columns => count,
        _ => {
            return Err(malformed(
                MalformedReason::TooManyColumns {
                    count,
                    limit: opts.max_columns,
                },
                body,
                opts,
            ));
        }
    };

    let mut names = Vec::with_capacity(count);
    for _ in 0..count {
        let (name, rest) =
            read_str_varint(data).map_err(|e| malformed(metadata_reason(e), body, opts))?;
        names.push(name);
        data = rest;
    }

    let mut descriptors = Vec::with_capacity(count);
    for _ in 0..count {
        let (descriptor, rest) =
            read_str_varint(data).map_err(|e| malformed(metadata_reason(e), body, opts))?;
        descriptors.push(descriptor);
        data = rest;
    }

    let mut columns = Vec::with_capacity(count);
    for (name, descriptor) in names.into_iter().zip(descriptors) {
        match resolve(descriptor, &opts.registry, opts.max_type_depth) {
            Ok(ty) => columns.push(Column::new(name, ty)),
            Err(err) => {
                let err = err.with_column(name);
                warn!(error = %err, "unsupported column type");
                return Err(Outcome::TypeResolutionFailure(err));
            }
        }
    }

    Ok((ColumnSchema::new(columns), body.len() - data.len()))
}
