//! Batch descriptors exchanged with the translation bureau.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::request::RequestId;

/// Operation the bureau should perform for a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderAction {
    Create,
    Update,
    Delete,
}

/// One language's rendered payload within a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItem {
    pub language: String,
    pub payload: String,
}

/// The descriptor handed to the transport: one identifier, one requested
/// delivery date, one payload per target language.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRequest {
    pub request_id: RequestId,
    pub action: OrderAction,
    pub requested_date: NaiveDate,
    pub items: Vec<BatchItem>,
}

/// The bureau's verdict on one batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BureauResponse {
    pub success: bool,
    /// Identifier echoed back by the bureau on acceptance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<RequestId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl BureauResponse {
    pub fn success(request_id: RequestId) -> Self {
        Self {
            success: true,
            request_id: Some(request_id),
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn failure(errors: Vec<String>) -> Self {
        Self {
            success: false,
            request_id: None,
            warnings: Vec::new(),
            errors,
        }
    }
}
