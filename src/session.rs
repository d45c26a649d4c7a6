//! Single-slot session state: the last upload and the last generation outcome.
//!
//! Each new upload or regeneration starts a new epoch and takes over the
//! slot. A generation still running from an older epoch is not waited on;
//! when it finishes its outcome is returned to its caller but never
//! written back, so a stuck request cannot hold the page hostage.

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::CaptionError;
use crate::image::ImageUpload;
use crate::parser::CaptionSet;
use crate::CaptionMaker;

/// Outcome of the most recent generation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Generation {
    Ready(CaptionSet),
    Failed { message: String },
}

#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub upload: Option<ImageUpload>,
    pub generation: Option<Generation>,
    /// A generation for the current epoch is still running.
    pub busy: bool,
}

#[derive(Default)]
struct Slot {
    snapshot: Snapshot,
    epoch: u64,
}

#[derive(Default)]
pub struct Session {
    slot: RwLock<Slot>,
}

impl Session {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.slot.read().await.snapshot.clone()
    }

    /// Replace the current image and generate captions for it.
    ///
    /// If the image cannot be stored the slot still moves to the new image,
    /// with the store error recorded as its outcome.
    pub async fn upload(
        &self,
        maker: &CaptionMaker,
        upload: ImageUpload,
    ) -> Result<CaptionSet, CaptionError> {
        if let Err(e) = maker.store().save(&upload).await {
            let mut slot = self.slot.write().await;
            slot.epoch += 1;
            slot.snapshot = Snapshot {
                upload: Some(upload),
                generation: Some(Generation::Failed {
                    message: e.to_string(),
                }),
                busy: false,
            };
            return Err(e);
        }

        let epoch = {
            let mut slot = self.slot.write().await;
            slot.epoch += 1;
            slot.snapshot = Snapshot {
                upload: Some(upload.clone()),
                generation: None,
                busy: true,
            };
            slot.epoch
        };

        self.generate(maker, &upload, epoch).await
    }

    /// Generate again for the current image, replacing the previous result.
    pub async fn regenerate(&self, maker: &CaptionMaker) -> Result<CaptionSet, CaptionError> {
        let (upload, epoch) = {
            let mut slot = self.slot.write().await;
            let upload = slot
                .snapshot
                .upload
                .clone()
                .ok_or_else(|| CaptionError::InvalidUpload("no image uploaded yet".to_string()))?;
            slot.epoch += 1;
            slot.snapshot.busy = true;
            (upload, slot.epoch)
        };

        self.generate(maker, &upload, epoch).await
    }

    async fn generate(
        &self,
        maker: &CaptionMaker,
        upload: &ImageUpload,
        epoch: u64,
    ) -> Result<CaptionSet, CaptionError> {
        let outcome = maker.generate(upload).await;

        let mut slot = self.slot.write().await;
        if slot.epoch != epoch {
            tracing::debug!(
                epoch,
                current = slot.epoch,
                file = %upload.file_name,
                "discarding superseded caption result"
            );
            return outcome;
        }

        slot.snapshot.generation = Some(match &outcome {
            Ok(set) => Generation::Ready(set.clone()),
            Err(e) => Generation::Failed {
                message: e.to_string(),
            },
        });
        slot.snapshot.busy = false;
        outcome
    }
}
