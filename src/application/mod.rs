//! Application layer: the stateful components the host form drives.
//!
//! `ElevateBatch` owns the remote batch tokenized gifts are added to.
//! `GatewaySettingsCoordinator` resolves the gateway settings of a form
//! template and publishes every change over a `tokio` channel.

pub mod batch;
pub mod gateway_settings;
