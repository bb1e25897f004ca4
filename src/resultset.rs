use crate::Opts;
use crate::classify::{ClassifiedResponse, classify};
use crate::col::ColumnSchema;
use crate::error::Result;
use crate::protocol::response::RawResponse;
use crate::row::{RowDecoder, Rows};

/// A successfully classified response, ready for row iteration
#[derive(Debug, Clone)]
pub struct ResultSet {
    schema: ColumnSchema,
    rows: Vec<u8>,
    query_id: Option<String>,
}

impl ResultSet {
    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    pub fn query_id(&self) -> Option<&str> {
        self.query_id.as_deref()
    }

    /// Raw row section following the column header
    pub fn row_bytes(&self) -> &[u8] {
        &self.rows
    }

    /// Iterate rows using `decoder`
    pub fn rows<D: RowDecoder>(&self, decoder: D) -> Rows<'_, D> {
        Rows::new(&self.schema, &self.rows, decoder)
    }
}

/// Turn a classified response into a [`ResultSet`]
///
/// Failure outcomes are returned as errors unchanged; their bodies are never decoded.
pub fn bind(classified: ClassifiedResponse) -> Result<ResultSet> {
    let ClassifiedResponse {
        outcome,
        rows,
        query_id,
    } = classified;

    let schema = outcome.into_result()?;
    Ok(ResultSet {
        schema,
        rows,
        query_id,
    })
}

/// Classify `response` and bind the result in one step
pub fn bind_response(response: RawResponse, opts: &Opts) -> Result<ResultSet> {
    bind(classify(response, opts))
}
