//! Request coordination: cache lookup, single-flight recomputation, and
//! engine exclusivity
//!
//! One `process` call per request. The OCR engine is the only resource that
//! must not be invoked concurrently (loaded model state is not known to be
//! re-entrant), so analysis runs on a blocking task holding the engine
//! mutex for exactly the duration of the call. Identical requests arriving
//! before the first has persisted its entry share one computation through a
//! per-key in-flight cell instead of each running the engine.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use axum::body::Bytes;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info};

use crate::encoding;
use crate::errors::{AppError, CacheError};
use crate::ocr::OcrEngine;

use super::key::ContentKey;
use super::storage::OcrCacheStorage;

type InFlightMap = HashMap<String, Arc<OnceCell<Bytes>>>;

/// Coordinates one OCR request end to end: derive key, consult the store,
/// on miss run the engine and write through.
#[derive(Clone)]
pub struct OcrCacheService {
    storage: OcrCacheStorage,
    engine: Arc<StdMutex<Box<dyn OcrEngine>>>,
    in_flight: Arc<Mutex<InFlightMap>>,
}

impl OcrCacheService {
    pub fn new(storage: OcrCacheStorage, engine: Box<dyn OcrEngine>) -> Self {
        Self {
            storage,
            engine: Arc::new(StdMutex::new(engine)),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Process one submitted image, returning the canonical JSON bytes.
    ///
    /// Exactly one outcome per call: the encoded result, or an error the
    /// web layer maps to a status code.
    pub async fn process(&self, image: Bytes) -> Result<Bytes, AppError> {
        let key = ContentKey::derive(&image);

        if self.storage.exists(&key).await {
            match self.storage.read(&key).await {
                Ok(stored) => {
                    info!("Cache hit for {key}");
                    // Entries are written by our own canonical encoder, so
                    // stored bytes are returned verbatim
                    return Ok(Bytes::from(stored));
                }
                Err(CacheError::NotFound { .. }) => {
                    // Entry vanished between exists and read (external
                    // purge); recompute instead of failing the request
                    debug!("Cache entry for {key} disappeared before read, recomputing");
                }
                Err(e) => return Err(e.into()),
            }
        }

        self.compute_deduplicated(key, image).await
    }

    /// Miss path with per-key single-flight: concurrent requests for the
    /// same key await one shared computation.
    async fn compute_deduplicated(
        &self,
        key: ContentKey,
        image: Bytes,
    ) -> Result<Bytes, AppError> {
        let cell = {
            let mut in_flight = self.in_flight.lock().await;
            in_flight
                .entry(key.as_str().to_string())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .clone()
        };

        cell.get_or_try_init(|| self.compute_and_store(&key, image))
            .await
            .cloned()
    }

    /// Run the engine, encode, and persist. Spawned as its own task so a
    /// caller disconnecting mid-analysis does not abort cache population.
    async fn compute_and_store(&self, key: &ContentKey, image: Bytes) -> Result<Bytes, AppError> {
        debug!("Cache miss for {key}, running OCR");

        let engine = Arc::clone(&self.engine);
        let storage = self.storage.clone();
        let in_flight = Arc::clone(&self.in_flight);
        let key = key.clone();

        let task = tokio::spawn(async move {
            let outcome = async {
                let result = tokio::task::spawn_blocking(move || {
                    let mut engine = engine
                        .lock()
                        .map_err(|_| AppError::internal("OCR engine mutex poisoned"))?;
                    engine.analyze(&image).map_err(AppError::from)
                })
                .await
                .map_err(|e| AppError::internal(format!("OCR task failed: {e}")))??;

                let encoded = encoding::encode(&result)?;
                storage.write(&key, &encoded).await?;
                info!(
                    "Cached OCR result for {key} ({} blocks, {} bytes)",
                    result.blocks.len(),
                    encoded.len()
                );
                Ok::<_, AppError>(Bytes::from(encoded))
            }
            .await;

            // The marker is cleared here rather than by the requester so an
            // abandoned request cannot leak its key in the in-flight map:
            // this task runs to completion even if every caller disconnects
            in_flight.lock().await.remove(key.as_str());

            outcome
        });

        task.await
            .map_err(|e| AppError::internal(format!("OCR task panicked: {e}")))?
    }
}
