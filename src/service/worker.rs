//! # Service Worker - Bounded Conceal / Reveal Workers
//!
//! The service is responsible for ONE thing: running vault operations off the
//! async runtime without letting more than `pool_size` key derivations run
//! concurrently.
//!
//! ## Resource Model
//!
//! ```text
//! caller -> acquire permit -> spawn_blocking(vault op) -> release permit
//! ```
//!
//! The permit moves into the blocking task, so it is released when the work
//! finishes even if the awaiting future was dropped. Key material is wiped by
//! the vault itself on every exit path.

use std::sync::Arc;
use std::time::Instant;

use log::{debug, info, warn};
use tokio::sync::Semaphore;

use crate::crypto::Password;
use crate::error::{Result, VaultError};
use crate::vault::Vault;

/// Number of CPU cores, falling back to 1 when it cannot be determined.
pub fn default_pool_size() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Async, concurrency-bounded wrapper around a [`Vault`].
#[derive(Clone)]
pub struct StegoService {
    vault: Arc<Vault>,
    permits: Arc<Semaphore>,
    pool_size: usize,
}

impl StegoService {
    /// Create a service running at most `pool_size` operations at once.
    ///
    /// A `pool_size` of 0 means one worker per CPU core.
    ///
    /// # Example
    /// ```ignore
    /// let service = StegoService::new(Vault::new(), 4);
    /// let png = service.conceal(1, image_bytes, "hi".into(), Password::new("pw")).await?;
    /// ```
    pub fn new(vault: Vault, pool_size: usize) -> Self {
        let pool_size = if pool_size == 0 {
            default_pool_size()
        } else {
            pool_size
        };

        Self {
            vault: Arc::new(vault),
            permits: Arc::new(Semaphore::new(pool_size)),
            pool_size,
        }
    }

    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// Operations that could start right now without waiting.
    pub fn idle_workers(&self) -> usize {
        self.permits.available_permits()
    }

    /// Conceal `message` in `image_data`, returning PNG bytes.
    pub async fn conceal(
        &self,
        request_id: u64,
        image_data: Vec<u8>,
        message: String,
        password: Password,
    ) -> Result<Vec<u8>> {
        info!(
            "📷 Conceal request #{}: {} byte carrier, {} byte message",
            request_id,
            image_data.len(),
            message.len()
        );

        let vault = Arc::clone(&self.vault);
        let result = self
            .run_blocking(move || vault.conceal(&image_data, &message, &password))
            .await;

        match &result {
            Ok(png) => info!("✅ Conceal request #{} produced {} bytes", request_id, png.len()),
            Err(e) => warn!("❌ Conceal request #{} failed: {}", request_id, e),
        }

        result
    }

    /// Reveal the message hidden in `image_data`.
    pub async fn reveal(&self, request_id: u64, image_data: Vec<u8>, password: Password) -> Result<String> {
        info!(
            "🔍 Reveal request #{}: {} byte carrier",
            request_id,
            image_data.len()
        );

        let vault = Arc::clone(&self.vault);
        let result = self
            .run_blocking(move || vault.reveal(&image_data, &password))
            .await;

        match &result {
            Ok(_) => info!("✅ Reveal request #{} succeeded", request_id),
            Err(e) => warn!("❌ Reveal request #{} failed: {}", request_id, e.kind().as_str()),
        }

        result
    }

    async fn run_blocking<T, F>(&self, work: F) -> Result<T>
    where
        F: FnOnce() -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|e| VaultError::Internal(format!("worker pool closed: {}", e)))?;

        let started = Instant::now();
        let outcome = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            work()
        })
        .await
        .map_err(|e| VaultError::Internal(format!("worker task failed: {}", e)))?;

        debug!("Blocking vault operation took {:?}", started.elapsed());
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_pool_size_uses_cores() {
        let service = StegoService::new(Vault::new(), 0);
        assert_eq!(service.pool_size(), default_pool_size());
        assert!(service.pool_size() >= 1);
    }

    #[tokio::test]
    async fn test_permits_are_returned_after_failure() {
        let service = StegoService::new(Vault::new(), 2);
        let result = service
            .reveal(1, b"not an image".to_vec(), Password::new("pw"))
            .await;
        assert!(matches!(result, Err(VaultError::InvalidImage(_))));
        assert_eq!(service.idle_workers(), 2);
    }
}
