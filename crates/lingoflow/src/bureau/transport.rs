//! Seams to the excluded transport and rendering layers.

use super::error::{RenderError, TransportError};
use super::types::{BatchRequest, BureauResponse};

/// Blocking client for the bureau's order service.
///
/// The production implementation (SOAP behind the configured endpoint)
/// lives outside this crate; tests substitute a scripted stub.
pub trait BureauTransport: Send + Sync {
    fn send_batch(&self, request: &BatchRequest) -> Result<BureauResponse, TransportError>;
}

/// Renders a content item into the payload submitted for one language.
pub trait PayloadRenderer: Send + Sync {
    fn render(&self, content_ref: &str, language: &str) -> Result<String, RenderError>;
}
