use super::gateway::GatewayId;
use super::settings::ElevateSettings;
use serde::Serialize;
use tokio::sync::mpsc;

/// Events published to the host form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "camelCase")]
pub enum SettingsEvent {
    /// New settings to attach to submitted gifts; `None` when the widget goes away.
    SettingsChanged(Option<ElevateSettings>),
    /// Management mode reports the raw selection instead of settings.
    SelectedGatewayChanged(Option<GatewayId>),
}

/// External toggles consumed in management mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSignal {
    EnableGatewaySelection,
    DisableGatewaySelection,
}

pub type EventSender = mpsc::UnboundedSender<SettingsEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<SettingsEvent>;

pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}
