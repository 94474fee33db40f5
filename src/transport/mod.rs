//! The request transport: the seam between the pipeline and the network.

pub mod error;
pub mod http;
pub mod retry;

use crate::query::request::GraphQlRequest;
use crate::transport::error::TransportError;
use std::future::Future;

/// The body of a successful (200 OK) response.
pub type RawResponse = String;

/// Executes GraphQL requests against the traffic service.
///
/// [`http::HttpTransport`] is the network implementation; anything else implementing this
/// trait (a recorded fixture, a test double) can drive the pipeline instead.
pub trait Transport {
    fn execute(
        &self,
        request: &GraphQlRequest,
    ) -> impl Future<Output = Result<RawResponse, TransportError>> + Send;
}
