use super::batch::{AuthorizedGift, BatchId, BatchItemRef, CreatedBatch, TokenizedGift};
use super::gateway::{CatalogResponse, GatewayId};
use super::notice::Notice;
use super::settings::{AssignmentSettings, ElevateSettings};
use crate::error::Result;
use async_trait::async_trait;

/// Remote batch endpoints of the Elevate service.
#[async_trait]
pub trait ElevateBatchApi: Send + Sync {
    /// Every call yields a new batch.
    async fn create_batch(&self) -> Result<CreatedBatch>;
    async fn add_to_batch(&self, gift: &TokenizedGift, batch_id: &BatchId)
    -> Result<AuthorizedGift>;
    async fn remove_from_batch(&self, item: &BatchItemRef) -> Result<()>;
}

/// Remote gateway configuration lookups.
#[async_trait]
pub trait GatewayDirectory: Send + Sync {
    async fn fetch_assignment_settings(&self) -> Result<AssignmentSettings>;
    async fn fetch_gateway_catalog(&self) -> Result<CatalogResponse>;
}

/// Opaque encryption of gateway ids. `decrypt(encrypt(id)) == id`.
#[async_trait]
pub trait GatewayCipher: Send + Sync {
    async fn encrypt(&self, gateway_id: &GatewayId) -> Result<String>;
    async fn decrypt(&self, ciphertext: &str) -> Result<GatewayId>;
}

/// Durable home of the settings attached to each form template.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn load(&self, template_id: &str) -> Result<Option<ElevateSettings>>;
    async fn save(&self, template_id: &str, settings: ElevateSettings) -> Result<()>;
}

/// Displays user-facing error notices.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &Notice);
}

pub type BatchApiBox = Box<dyn ElevateBatchApi>;
pub type GatewayDirectoryBox = Box<dyn GatewayDirectory>;
pub type GatewayCipherBox = Box<dyn GatewayCipher>;
pub type SettingsStoreBox = Box<dyn SettingsStore>;
pub type NotifierBox = Box<dyn Notifier>;
