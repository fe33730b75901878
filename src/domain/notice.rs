use super::gateway::{CatalogError, CatalogState};
use crate::config::Labels;
use crate::error::ElevateError;
use serde::Serialize;

const TIMEOUT_KEYWORD: &str = "timed out";

/// A user-facing error notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub message: String,
    pub details: Option<String>,
}

impl Notice {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: None,
        }
    }
}

/// Picks the message to show for a settings failure.
///
/// First match wins: saved gateway not found, no gateways, catalog timeout,
/// the supplied error, then the generic connectivity message with the
/// catalog's error messages as details.
pub fn classify(
    saved_gateway_not_found: bool,
    catalog: &CatalogState,
    error: Option<&ElevateError>,
    labels: &Labels,
) -> Notice {
    if saved_gateway_not_found {
        return Notice::new(&labels.gateway_not_valid);
    }

    let errors: &[CatalogError] = match catalog {
        CatalogState::NotLoaded | CatalogState::Unreachable | CatalogState::Empty => {
            return Notice::new(&labels.gateways_not_found);
        }
        CatalogState::Rejected(errors) => errors.as_slice(),
        CatalogState::Loaded(_) => &[],
    };

    if errors
        .iter()
        .any(|e| e.message().to_lowercase().contains(TIMEOUT_KEYWORD))
    {
        return Notice::new(&labels.connection_timeout);
    }

    if let Some(error) = error {
        return Notice::new(error.to_string());
    }

    let details = errors
        .iter()
        .map(|e| e.message())
        .collect::<Vec<_>>()
        .join("\n ");

    Notice {
        message: labels.unable_to_connect.clone(),
        details: (!details.is_empty()).then_some(details),
    }
}
