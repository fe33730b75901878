use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a remote Elevate batch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchId(String);

impl BatchId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BatchId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Response of the remote batch-creation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedBatch {
    pub elevate_batch_id: BatchId,
}

/// A gift payload that already carries a payment authorization token.
///
/// The batch manager never inspects it; it is handed to the remote
/// add-to-batch call exactly as the caller built it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenizedGift {
    pub payment_method_token: String,
    pub payment_method_type: String,
    pub amount: Decimal,
    pub currency_code: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// A gift whose authorization lives in an Elevate batch.
///
/// Only the two identifying fields are read by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizedGift {
    pub elevate_batch_id: BatchId,
    pub elevate_id: String,
}

/// Payload of the remote remove-from-batch call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItemRef {
    pub elevate_batch_id: BatchId,
    pub id: String,
}

impl From<&AuthorizedGift> for BatchItemRef {
    fn from(gift: &AuthorizedGift) -> Self {
        Self {
            elevate_batch_id: gift.elevate_batch_id.clone(),
            id: gift.elevate_id.clone(),
        }
    }
}
