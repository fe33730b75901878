use super::settings::WidgetMode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Plaintext identifier of a payment gateway.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GatewayId(String);

impl GatewayId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GatewayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GatewayId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A catalog entry. `id == None` is the synthetic org/template default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gateway {
    pub id: Option<GatewayId>,
    pub gateway_name: String,
    #[serde(rename = "isACHEnabled")]
    pub is_ach_enabled: bool,
    pub is_credit_card_enabled: bool,
}

impl Gateway {
    /// The entry standing for "use the template/org default".
    pub fn default_entry(label: &str) -> Self {
        Self {
            id: None,
            gateway_name: label.to_string(),
            is_ach_enabled: true,
            is_credit_card_enabled: true,
        }
    }
}

/// One choice in the gateway picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayOption {
    pub label: String,
    pub value: Option<GatewayId>,
}

/// One entry of an error-flagged catalog response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CatalogError {
    Message(String),
    Detailed { message: String },
}

impl CatalogError {
    pub fn message(&self) -> &str {
        match self {
            CatalogError::Message(message) => message,
            CatalogError::Detailed { message } => message,
        }
    }
}

/// Raw payload of the remote catalog call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CatalogResponse {
    Gateways(Vec<Gateway>),
    Errors { errors: Vec<CatalogError> },
}

/// Immutable view of a successfully fetched catalog.
///
/// Built once per load and replaced wholesale, never patched in place.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayCatalog {
    gateways: HashMap<Option<GatewayId>, Gateway>,
    options: Vec<GatewayOption>,
}

impl GatewayCatalog {
    /// Indexes `gateways` by id and builds the picker options sorted by label.
    ///
    /// Equal labels keep their fetch order. Outside management mode the
    /// synthetic default entry is added to the index and placed first.
    pub fn build(gateways: Vec<Gateway>, mode: WidgetMode, default_label: &str) -> Self {
        let mut options: Vec<GatewayOption> = gateways
            .iter()
            .map(|gateway| GatewayOption {
                label: gateway.gateway_name.clone(),
                value: gateway.id.clone(),
            })
            .collect();
        options.sort_by(|a, b| a.label.cmp(&b.label));

        let mut index: HashMap<Option<GatewayId>, Gateway> = gateways
            .into_iter()
            .map(|gateway| (gateway.id.clone(), gateway))
            .collect();

        if mode != WidgetMode::GatewayManagement {
            index.insert(None, Gateway::default_entry(default_label));
            options.insert(
                0,
                GatewayOption {
                    label: default_label.to_string(),
                    value: None,
                },
            );
        }

        Self {
            gateways: index,
            options,
        }
    }

    pub fn get(&self, id: Option<&GatewayId>) -> Option<&Gateway> {
        self.gateways.get(&id.cloned())
    }

    pub fn contains(&self, id: Option<&GatewayId>) -> bool {
        self.get(id).is_some()
    }

    pub fn options(&self) -> &[GatewayOption] {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.gateways.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gateways.is_empty()
    }
}

/// Where the coordinator stands with respect to the remote catalog.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CatalogState {
    /// Never fetched, or dropped by a reset.
    #[default]
    NotLoaded,
    /// The fetch itself failed.
    Unreachable,
    /// The service answered with no gateways.
    Empty,
    /// The service answered with an error payload.
    Rejected(Vec<CatalogError>),
    Loaded(GatewayCatalog),
}

impl CatalogState {
    pub fn catalog(&self) -> Option<&GatewayCatalog> {
        match self {
            CatalogState::Loaded(catalog) => Some(catalog),
            _ => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, CatalogState::Loaded(_))
    }
}
