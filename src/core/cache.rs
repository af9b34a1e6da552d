//! # AppDescriptorCache: lazily fetched application descriptor.
//!
//! Holds at most one [`PlatformApp`], keyed by the app id fixed at construction.
//!
//! ```text
//! get_descriptor()
//!   ├─ Present(app) ──► return app                       (no network)
//!   └─ Absent ──► read_app(app_id)
//!                   ├─ Ok(app) ──► Present(app) ──► return app
//!                   └─ Err(e)  ──► log, stay Absent ──► return None
//! ```
//!
//! ## Rules
//! - A failure is never cached: the next call fetches again
//! - Once `Present`, the descriptor is never replaced or invalidated
//! - [`FetchMode::Uncoordinated`]: concurrent misses each fetch; the first result stored wins
//! - [`FetchMode::SingleFlight`]: concurrent misses share the in-flight fetch and its outcome

use std::sync::Arc;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error};

use crate::platform::PlatformRef;
use crate::platform::dto::PlatformApp;
use crate::policies::FetchMode;

type PendingFetch = Shared<BoxFuture<'static, Option<Arc<PlatformApp>>>>;

/// Cache cell of the descriptor.
#[derive(Debug, Clone)]
enum DescriptorState {
    Absent,
    Present(Arc<PlatformApp>),
}

/// Lazily fetched, never invalidated app descriptor.
pub struct AppDescriptorCache {
    app_id: String,
    platform: PlatformRef,
    mode: FetchMode,
    state: RwLock<DescriptorState>,
    in_flight: Mutex<Option<PendingFetch>>,
}

impl AppDescriptorCache {
    pub fn new(platform: PlatformRef, app_id: impl Into<String>, mode: FetchMode) -> Self {
        Self {
            app_id: app_id.into(),
            platform,
            mode,
            state: RwLock::new(DescriptorState::Absent),
            in_flight: Mutex::new(None),
        }
    }

    /// App id the descriptor is keyed by.
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Returns the descriptor, fetching it on a miss.
    ///
    /// `None` means the fetch failed (already logged); a later call retries.
    pub async fn get_descriptor(&self) -> Option<Arc<PlatformApp>> {
        if let Some(app) = self.cached().await {
            return Some(app);
        }
        match self.mode {
            FetchMode::Uncoordinated => {
                let app = fetch_descriptor(self.platform.clone(), self.app_id.clone()).await?;
                Some(self.store(app).await)
            }
            FetchMode::SingleFlight => self.fetch_shared().await,
        }
    }

    /// Snapshot of the cached descriptor, without fetching.
    pub async fn cached(&self) -> Option<Arc<PlatformApp>> {
        match &*self.state.read().await {
            DescriptorState::Present(app) => Some(Arc::clone(app)),
            DescriptorState::Absent => None,
        }
    }

    /// Stores `app` unless a descriptor is already present; returns the kept one.
    async fn store(&self, app: Arc<PlatformApp>) -> Arc<PlatformApp> {
        let mut state = self.state.write().await;
        match &*state {
            DescriptorState::Present(kept) => Arc::clone(kept),
            DescriptorState::Absent => {
                *state = DescriptorState::Present(Arc::clone(&app));
                app
            }
        }
    }

    async fn fetch_shared(&self) -> Option<Arc<PlatformApp>> {
        let pending = {
            let mut slot = self.in_flight.lock().await;
            if let Some(app) = self.cached().await {
                return Some(app);
            }
            match slot.as_ref() {
                Some(pending) => pending.clone(),
                None => {
                    let pending =
                        fetch_descriptor(self.platform.clone(), self.app_id.clone())
                            .boxed()
                            .shared();
                    *slot = Some(pending.clone());
                    pending
                }
            }
        };

        let outcome = match pending.clone().await {
            Some(app) => Some(self.store(app).await),
            None => None,
        };

        let mut slot = self.in_flight.lock().await;
        if slot.as_ref().is_some_and(|p| p.ptr_eq(&pending)) {
            *slot = None;
        }
        outcome
    }
}

async fn fetch_descriptor(platform: PlatformRef, app_id: String) -> Option<Arc<PlatformApp>> {
    match platform.read_app(&app_id).await {
        Ok(app) => {
            debug!(app_id = %app_id, "app descriptor loaded");
            Some(Arc::new(app))
        }
        Err(e) => {
            error!(app_id = %app_id, error = %e, label = e.as_label(), "failed to load app descriptor");
            None
        }
    }
}
