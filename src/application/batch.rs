use crate::domain::batch::{AuthorizedGift, BatchId, BatchItemRef, TokenizedGift};
use crate::domain::ports::BatchApiBox;
use crate::error::Result;
use tracing::{info, warn};

/// Owns the Elevate batch that tokenized gifts of one editing session go into.
///
/// The batch is created lazily on the first `add`. A failed add is retried
/// once against a freshly created batch, whatever the cause of the failure:
/// batches can be closed or expire server-side between two gifts.
pub struct ElevateBatch {
    api: BatchApiBox,
    elevate_batch_id: Option<BatchId>,
}

impl ElevateBatch {
    pub fn new(api: BatchApiBox) -> Self {
        Self {
            api,
            elevate_batch_id: None,
        }
    }

    /// The batch currently receiving gifts.
    pub fn batch_id(&self) -> Option<&BatchId> {
        self.elevate_batch_id.as_ref()
    }

    /// Creates a new remote batch and makes it current.
    pub async fn create(&mut self) -> Result<BatchId> {
        let created = self.api.create_batch().await?;
        info!(batch_id = %created.elevate_batch_id, "Created Elevate batch");
        self.elevate_batch_id = Some(created.elevate_batch_id.clone());
        Ok(created.elevate_batch_id)
    }

    /// Adds a tokenized gift to the current batch.
    ///
    /// At most two creates and two adds reach the service per call; the
    /// second failure is returned as is.
    pub async fn add(&mut self, gift: &TokenizedGift) -> Result<AuthorizedGift> {
        match self.perform_add(gift).await {
            Ok(authorized) => Ok(authorized),
            Err(e) => {
                warn!(
                    error = %e,
                    batch_id = ?self.elevate_batch_id,
                    "Add to Elevate batch failed, retrying with a new batch"
                );
                self.create().await?;
                self.perform_add(gift).await
            }
        }
    }

    /// Removes an authorization from the batch it was added to.
    pub async fn remove(&self, gift: &AuthorizedGift) -> Result<()> {
        let item = BatchItemRef::from(gift);
        self.api.remove_from_batch(&item).await?;
        info!(
            batch_id = %item.elevate_batch_id,
            elevate_id = %item.id,
            "Removed authorization from Elevate batch"
        );
        Ok(())
    }

    async fn perform_add(&mut self, gift: &TokenizedGift) -> Result<AuthorizedGift> {
        let batch_id = match &self.elevate_batch_id {
            Some(batch_id) => batch_id.clone(),
            None => self.create().await?,
        };

        self.api.add_to_batch(gift, &batch_id).await
    }
}
