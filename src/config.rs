use crate::error::{ElevateError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// User-facing strings. Every field falls back to its English default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Labels {
    /// Label of the synthetic "use the default" gateway option.
    pub gateway_default: String,
    pub gateway_not_valid: String,
    pub gateways_not_found: String,
    pub connection_timeout: String,
    pub unable_to_connect: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            gateway_default: "Default Gateway".to_string(),
            gateway_not_valid: "The previously selected payment gateway is no longer valid. \
                                Select a different gateway."
                .to_string(),
            gateways_not_found: "No payment gateways were found for this organization."
                .to_string(),
            connection_timeout: "The connection to the payment service timed out. Try again later."
                .to_string(),
            unable_to_connect: "Unable to connect to the payment service.".to_string(),
        }
    }
}

impl Labels {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let labels: Labels = serde_json::from_slice(&bytes)?;
        if labels.gateway_default.trim().is_empty() {
            return Err(ElevateError::Configuration(
                "gatewayDefault label must not be blank".to_string(),
            ));
        }
        Ok(labels)
    }
}

/// Where the gateway settings are being edited from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParentContext {
    /// A gift entry form template.
    #[default]
    Form,
    /// The gateway management admin page.
    #[serde(rename = "MANAGEMENT")]
    GatewayManagement,
}

/// Context supplied by the host when it creates a coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WidgetContext {
    pub parent: ParentContext,
    /// Record id of the template being edited, if any.
    pub template_id: Option<String>,
}

impl WidgetContext {
    pub fn form(template_id: impl Into<String>) -> Self {
        Self {
            parent: ParentContext::Form,
            template_id: Some(template_id.into()),
        }
    }

    pub fn management() -> Self {
        Self {
            parent: ParentContext::GatewayManagement,
            template_id: None,
        }
    }

    pub fn with_template(mut self, template_id: impl Into<String>) -> Self {
        self.template_id = Some(template_id.into());
        self
    }
}
