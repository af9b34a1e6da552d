//! # AuthBootstrap: credential acquisition loop.
//!
//! Acquires platform credentials with the fixed client id/secret pair, retrying
//! forever at a fixed interval, and emits `sermas.ready` exactly once.
//!
//! ## Architecture
//! ```text
//! Session::start() ──► AuthBootstrap::run(token)
//!
//! state: → Bootstrapping
//! loop {
//!   ├─► attempt += 1
//!   ├─► platform.load_token(client_id, client_secret)   (cancellable)
//!   │       │
//!   │       ├─ Ok  ──► state: → Ready
//!   │       │          publish ForwardedEvent::Ready
//!   │       │          return Ready { attempts }
//!   │       │
//!   │       └─ Err ──► log error
//!   │                  sleep(retry.next(attempt))        (cancellable)
//!   │                  continue
//!   └─ exit: token cancelled ──► return Cancelled
//! }
//! ```
//!
//! ## Rules
//! - Attempts run **sequentially**: the retry timer is armed only after the
//!   previous attempt settled, so attempts never overlap and timers never pile up
//! - Failures are **never** returned to the caller; they are logged at error level
//! - No attempt ceiling and no backoff growth
//! - Cancellation is observed during the attempt and during the retry sleep

use std::sync::Arc;

use tokio::{select, time};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::core::state::{ConnectionState, StateCell};
use crate::events::{Bus, ForwardedEvent};
use crate::platform::PlatformRef;
use crate::policies::RetryPolicy;

/// Client credentials used by the bootstrap.
#[derive(Clone)]
pub(crate) struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Why [`AuthBootstrap::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BootstrapExit {
    /// Credentials acquired after `attempts` attempts (1 = first try).
    Ready { attempts: u32 },
    /// The cancellation token fired before any attempt succeeded.
    Cancelled,
}

/// Drives the connection from `Bootstrapping` to `Ready`.
pub(crate) struct AuthBootstrap {
    platform: PlatformRef,
    credentials: Credentials,
    retry: RetryPolicy,
    state: Arc<StateCell>,
    bus: Bus,
}

impl AuthBootstrap {
    pub(crate) fn new(
        platform: PlatformRef,
        credentials: Credentials,
        retry: RetryPolicy,
        state: Arc<StateCell>,
        bus: Bus,
    ) -> Self {
        Self {
            platform,
            credentials,
            retry,
            state,
            bus,
        }
    }

    /// Runs attempts until one succeeds or `token` is cancelled.
    ///
    /// On success the state becomes `Ready` and a single [`ForwardedEvent::Ready`]
    /// is published before returning. Registration of remote listeners is left to
    /// the caller, which only does so on [`BootstrapExit::Ready`].
    pub(crate) async fn run(self, token: CancellationToken) -> BootstrapExit {
        self.state.advance(ConnectionState::Bootstrapping);
        let mut attempt: u32 = 0;

        loop {
            if token.is_cancelled() {
                break;
            }
            attempt = attempt.saturating_add(1);
            debug!(attempt, client_id = %self.credentials.client_id, "loading platform token");

            let res = select! {
                res = self.platform.load_token(&self.credentials.client_id, &self.credentials.client_secret) => res,
                _ = token.cancelled() => { break; }
            };

            match res {
                Ok(()) => {
                    if self.state.advance(ConnectionState::Ready) {
                        self.bus.publish(ForwardedEvent::Ready);
                        info!(attempt, "platform session ready");
                    }
                    return BootstrapExit::Ready { attempts: attempt };
                }
                Err(e) => {
                    let delay = self.retry.next(attempt);
                    error!(
                        attempt,
                        error = %e,
                        label = e.as_label(),
                        retry_in = ?delay,
                        "failed to load platform token"
                    );

                    let sleep = time::sleep(delay);
                    tokio::pin!(sleep);
                    select! {
                        _ = &mut sleep => {}
                        _ = token.cancelled() => { break; }
                    }
                }
            }
        }

        debug!(attempt, "bootstrap cancelled");
        BootstrapExit::Cancelled
    }
}
