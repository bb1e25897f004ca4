use auto_impl::auto_impl;

use crate::col::ColumnSchema;
use crate::error::{Error, Result, eyre};

/// Trait for decoding a single row from the row section of a response
///
/// Implemented by the materialization layer; the schema is always fully resolved.
#[auto_impl(&mut, Box)]
pub trait RowDecoder {
    /// The output type produced by decoding a row
    type Row;

    /// Decode one row from the front of `data`
    ///
    /// # Returns
    /// * `Ok((row, rest))` - The decoded row and the bytes after it
    /// * `Err(Error)` - Decoding failed
    fn decode_row<'buf>(
        &mut self,
        schema: &ColumnSchema,
        data: &'buf [u8],
    ) -> Result<(Self::Row, &'buf [u8])>;
}

/// Iterator over the rows of a [`ResultSet`](crate::resultset::ResultSet)
///
/// Stops after the first error.
pub struct Rows<'a, D> {
    schema: &'a ColumnSchema,
    data: &'a [u8],
    decoder: D,
    failed: bool,
}

impl<'a, D: RowDecoder> Rows<'a, D> {
    pub(crate) fn new(schema: &'a ColumnSchema, data: &'a [u8], decoder: D) -> Self {
        Self {
            schema,
            data,
            decoder,
            failed: false,
        }
    }
}

impl<D: RowDecoder> Iterator for Rows<'_, D> {
    type Item = Result<D::Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.data.is_empty() {
            return None;
        }

        match self.decoder.decode_row(self.schema, self.data) {
            Ok((row, rest)) if rest.len() < self.data.len() => {
                self.data = rest;
                Some(Ok(row))
            }
            Ok(_) => {
                self.failed = true;
                Some(Err(Error::LibraryBug(eyre!(
                    "row decoder consumed no bytes ({} remaining)",
                    self.data.len()
                ))))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}
