pub mod envelope;
pub mod primitive;
pub mod response;

pub use envelope::{MalformedEnvelope, MalformedReason, ServerError};
pub use response::{Headers, RawResponse, TransportStatus};

#[cfg(test)]
mod envelope_test;
