use crate::config::{Labels, WidgetContext};
use crate::domain::events::{ControlSignal, EventSender, SettingsEvent};
use crate::domain::gateway::{
    CatalogResponse, CatalogState, GatewayCatalog, GatewayId, GatewayOption,
};
use crate::domain::notice::classify;
use crate::domain::ports::{GatewayCipherBox, GatewayDirectoryBox, NotifierBox, SettingsStoreBox};
use crate::domain::settings::{AssignmentSettings, ElevateSettings, PaymentMethods, WidgetMode};
use crate::error::{ElevateError, Result};
use tracing::{debug, info, warn};

/// External collaborators of a [`GatewaySettingsCoordinator`].
pub struct CoordinatorPorts {
    pub directory: GatewayDirectoryBox,
    pub cipher: GatewayCipherBox,
    pub settings: SettingsStoreBox,
    pub notifier: NotifierBox,
    pub events: EventSender,
}

/// Gateway and payment method selection for one form template.
///
/// Created through [`GatewaySettingsCoordinator::connect`], which fetches the
/// assignment settings, fixes the [`WidgetMode`] and loads the catalog. The
/// previously saved selection is restored the first time the settings are
/// displayed. Every user change is published on the event channel.
///
/// Remote failures never escape: they are turned into a notice for the user
/// and the coordinator carries on with default values.
pub struct GatewaySettingsCoordinator {
    ports: CoordinatorPorts,
    context: WidgetContext,
    labels: Labels,
    mode: WidgetMode,
    assignment: Option<AssignmentSettings>,
    catalog: CatalogState,
    selected_gateway: Option<GatewayId>,
    methods: PaymentMethods,
    first_display: bool,
    saved_gateway_not_found: bool,
    expanded: bool,
    loading: bool,
    default_template: bool,
    gateway_selection_disabled: bool,
}

impl GatewaySettingsCoordinator {
    /// Runs the initialization sequence and returns a ready coordinator.
    pub async fn connect(ports: CoordinatorPorts, context: WidgetContext, labels: Labels) -> Self {
        let fetched = ports.directory.fetch_assignment_settings().await;
        let gateway_assignment_enabled = fetched
            .as_ref()
            .is_ok_and(|assignment| assignment.gateway_assignment_enabled);
        let mode = WidgetMode::resolve(context.parent, gateway_assignment_enabled);
        info!(?mode, "Resolved gateway settings mode");

        let mut coordinator = Self {
            ports,
            context,
            labels,
            mode,
            assignment: None,
            catalog: CatalogState::NotLoaded,
            selected_gateway: None,
            methods: PaymentMethods::default(),
            first_display: true,
            saved_gateway_not_found: false,
            expanded: false,
            loading: true,
            default_template: false,
            gateway_selection_disabled: false,
        };

        match fetched {
            Ok(assignment) => coordinator.assignment = Some(assignment),
            Err(e) => {
                warn!(error = %e, "Could not fetch gateway assignment settings");
                coordinator.first_display = false;
                coordinator.report(Some(&e));
            }
        }

        if mode == WidgetMode::GatewayManagement {
            coordinator.gateway_selection_disabled = true;
        } else {
            coordinator.default_template = coordinator.is_template_default();
        }

        if mode.shows_gateways() {
            coordinator.load_catalog().await;
        } else {
            coordinator.loading = false;
        }

        if mode == WidgetMode::GatewayManagement {
            coordinator.toggle_expanded().await;
        }

        coordinator
    }

    /// Fetches the gateway catalog unless one has already been fetched.
    pub async fn load_catalog(&mut self) {
        if !matches!(self.catalog, CatalogState::NotLoaded) {
            return;
        }

        let state = match self.ports.directory.fetch_gateway_catalog().await {
            Ok(CatalogResponse::Gateways(gateways)) if gateways.is_empty() => CatalogState::Empty,
            Ok(CatalogResponse::Gateways(gateways)) => CatalogState::Loaded(GatewayCatalog::build(
                gateways,
                self.mode,
                &self.labels.gateway_default,
            )),
            Ok(CatalogResponse::Errors { errors }) => CatalogState::Rejected(errors),
            Err(e) => {
                warn!(error = %e, "Could not fetch gateway catalog");
                self.catalog = CatalogState::Unreachable;
                self.first_display = false;
                self.loading = false;
                self.report(Some(&e));
                return;
            }
        };

        self.catalog = state;
        self.loading = false;
        match self.catalog.catalog() {
            Some(catalog) => debug!(gateways = catalog.len(), "Loaded gateway catalog"),
            None => {
                warn!(catalog = ?self.catalog, "Gateway catalog unusable");
                self.first_display = false;
                self.report(None);
            }
        }
    }

    /// Shows or hides the settings. The first showing restores saved settings.
    pub async fn toggle_expanded(&mut self) {
        if self.expanded {
            self.expanded = false;
        } else {
            self.restore_saved_settings().await;
            self.expanded = true;
        }
    }

    /// User picked a gateway. `None` selects the default gateway.
    ///
    /// Payment method choices do not survive a gateway change: both are
    /// re-enabled, then capped by what the new gateway supports.
    pub async fn select_gateway(&mut self, gateway: Option<GatewayId>) -> Result<()> {
        if self.gateway_selection_disabled {
            return Err(ElevateError::SelectionDisabled);
        }
        if !self.catalog_contains(gateway.as_ref()) {
            return Err(ElevateError::UnknownGateway(
                gateway.map_or_else(|| "default".to_string(), |id| id.to_string()),
            ));
        }

        self.selected_gateway = gateway;
        self.methods = PaymentMethods::default();
        self.apply_capabilities();
        self.publish_settings().await;
        Ok(())
    }

    pub async fn set_ach_enabled(&mut self, enabled: bool) {
        self.methods.set_ach(enabled);
        self.publish_settings().await;
    }

    pub async fn set_credit_card_enabled(&mut self, enabled: bool) {
        self.methods.set_credit_card(enabled);
        self.publish_settings().await;
    }

    pub fn apply_signal(&mut self, signal: ControlSignal) {
        self.gateway_selection_disabled = match signal {
            ControlSignal::EnableGatewaySelection => false,
            ControlSignal::DisableGatewaySelection => true,
        };
    }

    /// Drops the catalog and selection; `load_catalog` fetches again afterwards.
    pub fn reset_to_defaults(&mut self) {
        self.catalog = CatalogState::NotLoaded;
        self.selected_gateway = None;
        self.methods = PaymentMethods::default();
        self.saved_gateway_not_found = false;
        self.loading = self.mode.shows_gateways();
    }

    /// Tells the host to stop attaching settings to gifts.
    pub fn disconnect(self) {
        self.publish(SettingsEvent::SettingsChanged(None));
    }

    pub fn mode(&self) -> WidgetMode {
        self.mode
    }

    pub fn selected_gateway(&self) -> Option<&GatewayId> {
        self.selected_gateway.as_ref()
    }

    pub fn payment_methods(&self) -> PaymentMethods {
        self.methods
    }

    pub fn gateway_options(&self) -> &[GatewayOption] {
        match self.catalog.catalog() {
            Some(catalog) => catalog.options(),
            None => &[],
        }
    }

    pub fn catalog(&self) -> &CatalogState {
        &self.catalog
    }

    pub fn assignment(&self) -> Option<&AssignmentSettings> {
        self.assignment.as_ref()
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_default_template(&self) -> bool {
        self.default_template
    }

    pub fn is_gateway_selection_disabled(&self) -> bool {
        self.gateway_selection_disabled
    }

    pub fn saved_gateway_not_found(&self) -> bool {
        self.saved_gateway_not_found
    }

    async fn restore_saved_settings(&mut self) {
        if !self.first_display {
            return;
        }
        self.first_display = false;

        let saved = self.load_saved_settings().await;
        match self.mode {
            WidgetMode::PaymentMethod => {
                if let Some(settings) = saved {
                    self.methods = PaymentMethods::from_settings(&settings);
                }
            }
            WidgetMode::Combined => match saved {
                Some(settings) => self.select_saved_gateway(&settings).await,
                None => self.select_default_gateway(),
            },
            WidgetMode::GatewayManagement => {
                self.select_managed_gateway(saved).await;
                self.publish(SettingsEvent::SelectedGatewayChanged(
                    self.selected_gateway.clone(),
                ));
            }
        }
    }

    async fn load_saved_settings(&self) -> Option<ElevateSettings> {
        let template_id = self.context.template_id.as_deref()?;
        match self.ports.settings.load(template_id).await {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, template_id, "Could not load saved Elevate settings");
                self.report(Some(&e));
                None
            }
        }
    }

    fn select_default_gateway(&mut self) {
        self.selected_gateway = None;
        self.methods = PaymentMethods::default();
        self.apply_capabilities();
    }

    async fn select_saved_gateway(&mut self, settings: &ElevateSettings) {
        let saved_id = match &settings.unique_key {
            None => None,
            Some(ciphertext) => match self.ports.cipher.decrypt(ciphertext).await {
                Ok(gateway_id) => Some(gateway_id),
                Err(e) => {
                    warn!(error = %e, "Could not decrypt saved gateway");
                    self.report(Some(&e));
                    self.select_default_gateway();
                    return;
                }
            },
        };

        if self.catalog_contains(saved_id.as_ref()) {
            self.selected_gateway = saved_id;
            self.methods = PaymentMethods::from_settings(settings);
            self.apply_capabilities();
        } else {
            warn!(gateway = ?saved_id, "Saved gateway is not in the catalog");
            self.saved_gateway_not_found = true;
            self.report(None);
            self.select_default_gateway();
        }
    }

    async fn select_managed_gateway(&mut self, saved: Option<ElevateSettings>) {
        let saved_id = match saved.and_then(|settings| settings.unique_key) {
            None => None,
            Some(ciphertext) => match self.ports.cipher.decrypt(&ciphertext).await {
                Ok(gateway_id) => Some(gateway_id),
                Err(e) => {
                    warn!(error = %e, "Could not decrypt saved gateway");
                    self.report(Some(&e));
                    None
                }
            },
        };
        let saved_id = match saved_id {
            Some(id) if !self.catalog_contains(Some(&id)) => {
                warn!(gateway = %id, "Saved gateway is not in the catalog");
                self.saved_gateway_not_found = true;
                self.report(None);
                None
            }
            saved_id => saved_id,
        };
        let default_id = self
            .assignment
            .as_ref()
            .and_then(|assignment| assignment.default_gateway_id.clone());

        self.methods = PaymentMethods::default();
        match saved_id.or(default_id) {
            Some(id) if self.catalog_contains(Some(&id)) => {
                self.selected_gateway = Some(id);
                self.apply_capabilities();
            }
            Some(id) => {
                warn!(gateway = %id, "Default gateway is not in the catalog");
                self.selected_gateway = None;
                if !self.saved_gateway_not_found {
                    self.saved_gateway_not_found = true;
                    self.report(None);
                }
            }
            None => self.selected_gateway = None,
        }
    }

    fn apply_capabilities(&mut self) {
        if let Some(gateway) = self
            .catalog
            .catalog()
            .and_then(|catalog| catalog.get(self.selected_gateway.as_ref()))
        {
            self.methods.gate(gateway);
        }
    }

    async fn publish_settings(&self) {
        let event = match self.mode {
            WidgetMode::GatewayManagement => {
                SettingsEvent::SelectedGatewayChanged(self.selected_gateway.clone())
            }
            WidgetMode::PaymentMethod => {
                SettingsEvent::SettingsChanged(Some(self.methods.to_settings(None)))
            }
            WidgetMode::Combined => {
                let unique_key = match &self.selected_gateway {
                    None => None,
                    Some(gateway_id) => match self.ports.cipher.encrypt(gateway_id).await {
                        Ok(ciphertext) => Some(ciphertext),
                        Err(e) => {
                            warn!(error = %e, gateway = %gateway_id, "Could not encrypt gateway");
                            self.report(Some(&e));
                            return;
                        }
                    },
                };
                SettingsEvent::SettingsChanged(Some(self.methods.to_settings(unique_key)))
            }
        };
        self.publish(event);
    }

    fn publish(&self, event: SettingsEvent) {
        if self.ports.events.send(event).is_err() {
            debug!("No listener for settings events");
        }
    }

    fn report(&self, error: Option<&ElevateError>) {
        let notice = classify(
            self.saved_gateway_not_found,
            &self.catalog,
            error,
            &self.labels,
        );
        self.ports.notifier.notify(&notice);
    }

    fn catalog_contains(&self, gateway: Option<&GatewayId>) -> bool {
        self.catalog
            .catalog()
            .is_some_and(|catalog| catalog.contains(gateway))
    }

    fn is_template_default(&self) -> bool {
        match (&self.assignment, &self.context.template_id) {
            (Some(assignment), Some(template_id)) => {
                assignment.default_template_id.as_deref() == Some(template_id.as_str())
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::event_channel;
    use crate::domain::gateway::Gateway;
    use crate::infrastructure::in_memory::{InMemoryElevateService, InMemorySettingsStore};
    use crate::infrastructure::notifier::CollectingNotifier;

    fn gateway(id: &str, name: &str, ach: bool) -> Gateway {
        Gateway {
            id: Some(GatewayId::new(id)),
            gateway_name: name.to_string(),
            is_ach_enabled: ach,
            is_credit_card_enabled: true,
        }
    }

    async fn connect(
        service: &InMemoryElevateService,
        context: WidgetContext,
    ) -> (
        GatewaySettingsCoordinator,
        crate::domain::events::EventReceiver,
        CollectingNotifier,
    ) {
        let (events, receiver) = event_channel();
        let notifier = CollectingNotifier::new();
        let ports = CoordinatorPorts {
            directory: Box::new(service.clone()),
            cipher: Box::new(service.clone()),
            settings: Box::new(InMemorySettingsStore::new()),
            notifier: Box::new(notifier.clone()),
            events,
        };
        let coordinator =
            GatewaySettingsCoordinator::connect(ports, context, Labels::default()).await;
        (coordinator, receiver, notifier)
    }

    #[tokio::test]
    async fn test_default_template_flag() {
        let service = InMemoryElevateService::new()
            .with_assignment(AssignmentSettings {
                gateway_assignment_enabled: true,
                default_template_id: Some("T0".to_string()),
                default_gateway_id: None,
            })
            .with_gateways(vec![gateway("G1", "Adyen", true)]);

        let (coordinator, _, _) = connect(&service, WidgetContext::form("T0")).await;
        assert!(coordinator.is_default_template());
        assert!(!coordinator.is_loading());

        let (coordinator, _, _) = connect(&service, WidgetContext::form("T1")).await;
        assert!(!coordinator.is_default_template());
    }

    #[tokio::test]
    async fn test_user_selection_resets_then_gates_methods() {
        let service = InMemoryElevateService::new()
            .with_assignment(AssignmentSettings {
                gateway_assignment_enabled: true,
                ..AssignmentSettings::default()
            })
            .with_gateways(vec![gateway("G1", "Adyen", false), gateway("G2", "Stripe", true)]);
        let (mut coordinator, mut events, _) = connect(&service, WidgetContext::form("T1")).await;
        coordinator.toggle_expanded().await;

        coordinator.set_credit_card_enabled(false).await;
        coordinator
            .select_gateway(Some(GatewayId::new("G2")))
            .await
            .unwrap();
        let methods = coordinator.payment_methods();
        assert!(methods.ach_enabled);
        assert!(methods.credit_card_enabled);

        coordinator
            .select_gateway(Some(GatewayId::new("G1")))
            .await
            .unwrap();
        let methods = coordinator.payment_methods();
        assert!(!methods.ach_enabled);
        assert!(methods.ach_disabled);

        let mut last = None;
        while let Ok(event) = events.try_recv() {
            last = Some(event);
        }
        assert_eq!(
            last,
            Some(SettingsEvent::SettingsChanged(Some(ElevateSettings {
                unique_key: Some("1G".to_string()),
                is_ach_enabled: false,
                is_credit_card_enabled: true,
            })))
        );
    }

    #[tokio::test]
    async fn test_unknown_gateway_rejected() {
        let service = InMemoryElevateService::new()
            .with_assignment(AssignmentSettings {
                gateway_assignment_enabled: true,
                ..AssignmentSettings::default()
            })
            .with_gateways(vec![gateway("G1", "Adyen", true)]);
        let (mut coordinator, _, _) = connect(&service, WidgetContext::form("T1")).await;

        let result = coordinator.select_gateway(Some(GatewayId::new("G9"))).await;
        assert!(matches!(result, Err(ElevateError::UnknownGateway(id)) if id == "G9"));
    }

    #[tokio::test]
    async fn test_disconnect_clears_settings() {
        let service = InMemoryElevateService::new();
        let (coordinator, mut events, _) = connect(&service, WidgetContext::form("T1")).await;

        coordinator.disconnect();
        assert_eq!(events.try_recv().unwrap(), SettingsEvent::SettingsChanged(None));
    }

    #[tokio::test]
    async fn test_reset_allows_catalog_reload() {
        let service = InMemoryElevateService::new()
            .with_assignment(AssignmentSettings {
                gateway_assignment_enabled: true,
                ..AssignmentSettings::default()
            })
            .with_gateways(vec![gateway("G1", "Adyen", true)]);
        let (mut coordinator, _, _) = connect(&service, WidgetContext::form("T1")).await;

        coordinator.load_catalog().await;
        assert_eq!(service.calls().await.catalog_fetches, 1);

        coordinator.reset_to_defaults();
        assert!(coordinator.gateway_options().is_empty());
        assert!(coordinator.is_loading());
        assert!(!coordinator.catalog().is_loaded());
        coordinator.load_catalog().await;
        assert_eq!(service.calls().await.catalog_fetches, 2);
        assert_eq!(coordinator.gateway_options().len(), 2);
        assert!(!coordinator.is_loading());
        assert!(coordinator.catalog().is_loaded());
    }

    #[tokio::test]
    async fn test_reset_clears_stale_gateway_flag() {
        let service = InMemoryElevateService::new()
            .with_assignment(AssignmentSettings {
                gateway_assignment_enabled: true,
                ..AssignmentSettings::default()
            })
            .with_gateways(vec![gateway("G1", "Adyen", true)]);
        let (events, _receiver) = event_channel();
        let notifier = CollectingNotifier::new();
        let stale = ElevateSettings {
            unique_key: Some("9G".to_string()),
            is_ach_enabled: true,
            is_credit_card_enabled: true,
        };
        let ports = CoordinatorPorts {
            directory: Box::new(service.clone()),
            cipher: Box::new(service.clone()),
            settings: Box::new(InMemorySettingsStore::with_settings(
                [("T1".to_string(), stale)].into(),
            )),
            notifier: Box::new(notifier.clone()),
            events,
        };
        let mut coordinator =
            GatewaySettingsCoordinator::connect(ports, WidgetContext::form("T1"), Labels::default())
                .await;
        coordinator.toggle_expanded().await;
        assert!(coordinator.saved_gateway_not_found());

        coordinator.reset_to_defaults();
        assert!(!coordinator.saved_gateway_not_found());
        assert!(coordinator.is_loading());
        assert_eq!(notifier.notices().len(), 1);
    }

    #[tokio::test]
    async fn test_assignment_kept_after_connect() {
        let service = InMemoryElevateService::new().with_assignment(AssignmentSettings {
            gateway_assignment_enabled: true,
            default_template_id: Some("T0".to_string()),
            default_gateway_id: Some(GatewayId::new("G1")),
        });
        let (coordinator, _, _) = connect(&service, WidgetContext::form("T1")).await;
        let assignment = coordinator.assignment().unwrap();
        assert_eq!(assignment.default_gateway_id, Some(GatewayId::new("G1")));

        let service = InMemoryElevateService::new().without_assignment();
        let (coordinator, _, _) = connect(&service, WidgetContext::form("T1")).await;
        assert!(coordinator.assignment().is_none());
    }
}
