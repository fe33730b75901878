#![allow(dead_code)]

use elevate_payments::application::gateway_settings::{
    CoordinatorPorts, GatewaySettingsCoordinator,
};
use elevate_payments::config::{Labels, WidgetContext};
use elevate_payments::domain::batch::TokenizedGift;
use elevate_payments::domain::events::{EventReceiver, SettingsEvent, event_channel};
use elevate_payments::domain::gateway::{Gateway, GatewayId};
use elevate_payments::domain::settings::{AssignmentSettings, ElevateSettings};
use elevate_payments::infrastructure::in_memory::{InMemoryElevateService, InMemorySettingsStore};
use elevate_payments::infrastructure::notifier::CollectingNotifier;
use rust_decimal_macros::dec;

pub struct Harness {
    pub coordinator: GatewaySettingsCoordinator,
    pub events: EventReceiver,
    pub notifier: CollectingNotifier,
}

impl Harness {
    /// Everything published so far, oldest first.
    pub fn drain(&mut self) -> Vec<SettingsEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }

    pub fn messages(&self) -> Vec<String> {
        self.notifier
            .notices()
            .into_iter()
            .map(|notice| notice.message)
            .collect()
    }
}

pub async fn connect(
    service: &InMemoryElevateService,
    store: InMemorySettingsStore,
    context: WidgetContext,
) -> Harness {
    let (events, receiver) = event_channel();
    let notifier = CollectingNotifier::new();
    let ports = CoordinatorPorts {
        directory: Box::new(service.clone()),
        cipher: Box::new(service.clone()),
        settings: Box::new(store),
        notifier: Box::new(notifier.clone()),
        events,
    };
    let coordinator = GatewaySettingsCoordinator::connect(ports, context, Labels::default()).await;
    Harness {
        coordinator,
        events: receiver,
        notifier,
    }
}

pub fn gateway(id: &str, name: &str, ach: bool, credit_card: bool) -> Gateway {
    Gateway {
        id: Some(GatewayId::new(id)),
        gateway_name: name.to_string(),
        is_ach_enabled: ach,
        is_credit_card_enabled: credit_card,
    }
}

pub fn assignment_enabled(default_gateway_id: Option<&str>) -> AssignmentSettings {
    AssignmentSettings {
        gateway_assignment_enabled: true,
        default_template_id: Some("T0".to_string()),
        default_gateway_id: default_gateway_id.map(GatewayId::new),
    }
}

/// Saved settings as the reverse cipher would have produced them.
pub fn saved(gateway_id: Option<&str>, ach: bool, credit_card: bool) -> ElevateSettings {
    ElevateSettings {
        unique_key: gateway_id.map(|id| id.chars().rev().collect()),
        is_ach_enabled: ach,
        is_credit_card_enabled: credit_card,
    }
}

pub fn store_with(template_id: &str, settings: ElevateSettings) -> InMemorySettingsStore {
    InMemorySettingsStore::with_settings([(template_id.to_string(), settings)].into())
}

pub fn tokenized_gift(token: &str) -> TokenizedGift {
    TokenizedGift {
        payment_method_token: token.to_string(),
        payment_method_type: "CARD".to_string(),
        amount: dec!(20.00),
        currency_code: "USD".to_string(),
        first_name: Some("Grace".to_string()),
        last_name: Some("Hopper".to_string()),
    }
}
