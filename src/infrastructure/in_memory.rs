use crate::domain::batch::{AuthorizedGift, BatchId, BatchItemRef, CreatedBatch, TokenizedGift};
use crate::domain::gateway::{CatalogResponse, Gateway, GatewayId};
use crate::domain::ports::{ElevateBatchApi, GatewayCipher, GatewayDirectory, SettingsStore};
use crate::domain::settings::{AssignmentSettings, ElevateSettings};
use crate::error::{ElevateError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Number of calls each remote operation received.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub creates: usize,
    pub adds: usize,
    pub removes: usize,
    pub assignment_fetches: usize,
    pub catalog_fetches: usize,
    pub encryptions: usize,
    pub decryptions: usize,
}

#[derive(Debug, Default)]
struct ServiceState {
    next_batch: u64,
    next_item: u64,
    open_batches: HashSet<BatchId>,
    items: HashMap<BatchId, Vec<String>>,
    removed: Vec<BatchItemRef>,
    fail_next_creates: usize,
    fail_next_adds: usize,
    calls: CallCounts,
}

/// Description of a simulated Elevate service, loadable from JSON.
///
/// A missing `assignment` or `catalog` makes the matching fetch fail.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceFixture {
    #[serde(default)]
    pub assignment: Option<AssignmentSettings>,
    #[serde(default)]
    pub catalog: Option<CatalogResponse>,
    /// Saved settings keyed by template id.
    #[serde(default)]
    pub saved_settings: HashMap<String, ElevateSettings>,
    #[serde(default)]
    pub fail_next_creates: usize,
    #[serde(default)]
    pub fail_next_adds: usize,
}

impl ServiceFixture {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// A thread-safe, in-process stand-in for the Elevate service.
///
/// Implements every remote port. The cipher reverses the gateway id, which
/// satisfies the round-trip contract without any key material. Clones share
/// state, so a test can keep a handle and inspect call counts.
#[derive(Clone)]
pub struct InMemoryElevateService {
    assignment: Option<AssignmentSettings>,
    catalog: Option<CatalogResponse>,
    state: Arc<RwLock<ServiceState>>,
}

impl Default for InMemoryElevateService {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryElevateService {
    /// Gateway assignment disabled, empty catalog, no failures.
    pub fn new() -> Self {
        Self {
            assignment: Some(AssignmentSettings::default()),
            catalog: Some(CatalogResponse::Gateways(Vec::new())),
            state: Arc::new(RwLock::new(ServiceState::default())),
        }
    }

    pub fn from_fixture(fixture: &ServiceFixture) -> Self {
        let state = ServiceState {
            fail_next_creates: fixture.fail_next_creates,
            fail_next_adds: fixture.fail_next_adds,
            ..ServiceState::default()
        };
        Self {
            assignment: fixture.assignment.clone(),
            catalog: fixture.catalog.clone(),
            state: Arc::new(RwLock::new(state)),
        }
    }

    pub fn with_assignment(mut self, assignment: AssignmentSettings) -> Self {
        self.assignment = Some(assignment);
        self
    }

    /// Makes the assignment settings fetch fail.
    pub fn without_assignment(mut self) -> Self {
        self.assignment = None;
        self
    }

    pub fn with_gateways(self, gateways: Vec<Gateway>) -> Self {
        self.with_catalog(CatalogResponse::Gateways(gateways))
    }

    pub fn with_catalog(mut self, catalog: CatalogResponse) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Makes the catalog fetch fail.
    pub fn without_catalog(mut self) -> Self {
        self.catalog = None;
        self
    }

    pub async fn fail_next_creates(&self, count: usize) {
        self.state.write().await.fail_next_creates = count;
    }

    pub async fn fail_next_adds(&self, count: usize) {
        self.state.write().await.fail_next_adds = count;
    }

    /// Simulates a batch closed or expired on the server.
    pub async fn close_batch(&self, batch_id: &BatchId) {
        self.state.write().await.open_batches.remove(batch_id);
    }

    pub async fn calls(&self) -> CallCounts {
        self.state.read().await.calls
    }

    pub async fn removed(&self) -> Vec<BatchItemRef> {
        self.state.read().await.removed.clone()
    }

    pub async fn items(&self, batch_id: &BatchId) -> Vec<String> {
        self.state
            .read()
            .await
            .items
            .get(batch_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl ElevateBatchApi for InMemoryElevateService {
    async fn create_batch(&self) -> Result<CreatedBatch> {
        let mut state = self.state.write().await;
        state.calls.creates += 1;
        if state.fail_next_creates > 0 {
            state.fail_next_creates -= 1;
            return Err(ElevateError::remote("create_batch", "service unavailable"));
        }

        state.next_batch += 1;
        let batch_id = BatchId::new(format!("batch-{}", state.next_batch));
        state.open_batches.insert(batch_id.clone());
        Ok(CreatedBatch {
            elevate_batch_id: batch_id,
        })
    }

    async fn add_to_batch(
        &self,
        _gift: &TokenizedGift,
        batch_id: &BatchId,
    ) -> Result<AuthorizedGift> {
        let mut state = self.state.write().await;
        state.calls.adds += 1;
        if state.fail_next_adds > 0 {
            state.fail_next_adds -= 1;
            return Err(ElevateError::remote("add_to_batch", "service unavailable"));
        }
        if !state.open_batches.contains(batch_id) {
            return Err(ElevateError::remote(
                "add_to_batch",
                format!("batch {} is closed or unknown", batch_id),
            ));
        }

        state.next_item += 1;
        let elevate_id = format!("auth-{}", state.next_item);
        state
            .items
            .entry(batch_id.clone())
            .or_default()
            .push(elevate_id.clone());
        Ok(AuthorizedGift {
            elevate_batch_id: batch_id.clone(),
            elevate_id,
        })
    }

    async fn remove_from_batch(&self, item: &BatchItemRef) -> Result<()> {
        let mut state = self.state.write().await;
        state.calls.removes += 1;

        let items = state.items.get_mut(&item.elevate_batch_id).ok_or_else(|| {
            ElevateError::remote(
                "remove_from_batch",
                format!("batch {} is unknown", item.elevate_batch_id),
            )
        })?;
        let position = items.iter().position(|id| *id == item.id).ok_or_else(|| {
            ElevateError::remote(
                "remove_from_batch",
                format!("authorization {} is not in the batch", item.id),
            )
        })?;
        items.remove(position);
        state.removed.push(item.clone());
        Ok(())
    }
}

#[async_trait]
impl GatewayDirectory for InMemoryElevateService {
    async fn fetch_assignment_settings(&self) -> Result<AssignmentSettings> {
        self.state.write().await.calls.assignment_fetches += 1;
        self.assignment.clone().ok_or_else(|| {
            ElevateError::remote("fetch_assignment_settings", "service unavailable")
        })
    }

    async fn fetch_gateway_catalog(&self) -> Result<CatalogResponse> {
        self.state.write().await.calls.catalog_fetches += 1;
        self.catalog
            .clone()
            .ok_or_else(|| ElevateError::remote("fetch_gateway_catalog", "service unavailable"))
    }
}

#[async_trait]
impl GatewayCipher for InMemoryElevateService {
    async fn encrypt(&self, gateway_id: &GatewayId) -> Result<String> {
        self.state.write().await.calls.encryptions += 1;
        Ok(gateway_id.as_str().chars().rev().collect())
    }

    async fn decrypt(&self, ciphertext: &str) -> Result<GatewayId> {
        self.state.write().await.calls.decryptions += 1;
        Ok(GatewayId::new(ciphertext.chars().rev().collect::<String>()))
    }
}

/// A thread-safe in-memory store for template settings.
#[derive(Default, Clone)]
pub struct InMemorySettingsStore {
    settings: Arc<RwLock<HashMap<String, ElevateSettings>>>,
}

impl InMemorySettingsStore {
    /// Creates a new, empty settings store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: HashMap<String, ElevateSettings>) -> Self {
        Self {
            settings: Arc::new(RwLock::new(settings)),
        }
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn load(&self, template_id: &str) -> Result<Option<ElevateSettings>> {
        let settings = self.settings.read().await;
        Ok(settings.get(template_id).cloned())
    }

    async fn save(&self, template_id: &str, settings: ElevateSettings) -> Result<()> {
        let mut all = self.settings.write().await;
        all.insert(template_id.to_string(), settings);
        Ok(())
    }
}
