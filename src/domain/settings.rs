use super::gateway::{Gateway, GatewayId};
use crate::config::ParentContext;
use serde::{Deserialize, Serialize};

/// The value persisted with a form template and attached to submitted gifts.
///
/// `unique_key` is ciphertext produced by the gateway cipher, or `None` when
/// gateway assignment is disabled or the default gateway is selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElevateSettings {
    pub unique_key: Option<String>,
    #[serde(rename = "isACHEnabled")]
    pub is_ach_enabled: bool,
    pub is_credit_card_enabled: bool,
}

/// Org-level gateway assignment configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentSettings {
    pub gateway_assignment_enabled: bool,
    #[serde(default)]
    pub default_template_id: Option<String>,
    #[serde(default)]
    pub default_gateway_id: Option<GatewayId>,
}

/// Operating mode, fixed for the lifetime of a coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WidgetMode {
    /// Gateway assignment disabled: only payment method toggles.
    PaymentMethod,
    /// Administrative context: gateway choice only, reported unencrypted.
    GatewayManagement,
    /// Gateway and payment methods, persisted together.
    Combined,
}

impl WidgetMode {
    pub fn resolve(parent: ParentContext, gateway_assignment_enabled: bool) -> Self {
        match parent {
            ParentContext::GatewayManagement => WidgetMode::GatewayManagement,
            ParentContext::Form if !gateway_assignment_enabled => WidgetMode::PaymentMethod,
            ParentContext::Form => WidgetMode::Combined,
        }
    }

    pub fn shows_gateways(self) -> bool {
        self != WidgetMode::PaymentMethod
    }

    pub fn shows_payment_methods(self) -> bool {
        self != WidgetMode::GatewayManagement
    }

    pub fn shows_expand_controls(self) -> bool {
        self != WidgetMode::GatewayManagement
    }
}

/// Enabled/disabled flags for the two payment methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethods {
    pub ach_enabled: bool,
    pub ach_disabled: bool,
    pub credit_card_enabled: bool,
    pub credit_card_disabled: bool,
}

impl Default for PaymentMethods {
    fn default() -> Self {
        Self {
            ach_enabled: true,
            ach_disabled: false,
            credit_card_enabled: true,
            credit_card_disabled: false,
        }
    }
}

impl PaymentMethods {
    /// Adopts the persisted enabled flags.
    pub fn from_settings(settings: &ElevateSettings) -> Self {
        Self {
            ach_enabled: settings.is_ach_enabled,
            credit_card_enabled: settings.is_credit_card_enabled,
            ..Self::default()
        }
    }

    /// Applies the gateway's capability ceiling.
    ///
    /// A capability the gateway lacks is marked disabled and its enabled flag
    /// forced off; an available capability keeps its current enabled flag.
    pub fn gate(&mut self, gateway: &Gateway) {
        self.ach_disabled = !gateway.is_ach_enabled;
        if self.ach_disabled {
            self.ach_enabled = false;
        }

        self.credit_card_disabled = !gateway.is_credit_card_enabled;
        if self.credit_card_disabled {
            self.credit_card_enabled = false;
        }
    }

    pub fn set_ach(&mut self, enabled: bool) {
        self.ach_enabled = enabled && !self.ach_disabled;
    }

    pub fn set_credit_card(&mut self, enabled: bool) {
        self.credit_card_enabled = enabled && !self.credit_card_disabled;
    }

    pub fn to_settings(self, unique_key: Option<String>) -> ElevateSettings {
        ElevateSettings {
            unique_key,
            is_ach_enabled: self.ach_enabled,
            is_credit_card_enabled: self.credit_card_enabled,
        }
    }
}
