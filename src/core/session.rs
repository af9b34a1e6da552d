//! # Session: owns the platform connection lifecycle.
//!
//! The [`Session`] wires the bus, the bootstrap, the subscription registry, the
//! descriptor cache and the host's subscribers around one [`Platform`](crate::Platform).
//!
//! ## High-level architecture
//! ```text
//! Session::start()
//!   ├─► state: Uninitialized → Bootstrapping   (second start() is a no-op)
//!   ├─► spawn subscriber listener: Bus.subscribe() ─► SubscriberSet::emit(&ev)
//!   ├─► spawn descriptor prefetch (best-effort, independent of auth)
//!   └─► spawn bootstrap task:
//!         AuthBootstrap::run(token)
//!           ├─ Ready     ─► SubscriptionRegistry::register_all()  (until cancelled)
//!           └─ Cancelled ─► exit
//!
//! Remote occurrences (after Ready):
//!   Platform ── listener ──► EventFanout ──► Bus ──┬──► host receivers
//!                                                  └──► subscriber listener
//!
//! Session::shutdown()
//!   ├─► token.cancel()      → bootstrap loop, pending registrations and
//!   │                         subscriber listener stop
//!   ├─► join spawned tasks
//!   └─► registry.release_all()
//! ```
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use sermas_link::{Channel, Config, LogWriter, PlatformRef, Session, Subscribe};
//!
//! async fn run(platform: PlatformRef) {
//!     let session = Session::builder(Config::default(), platform)
//!         .with_subscribers(vec![Arc::new(LogWriter::new()) as Arc<dyn Subscribe>])
//!         .build();
//!
//!     let mut tools = session.subscribe_channel(Channel::Tool);
//!     session.start();
//!     session.ready().await;
//!
//!     while let Ok(ev) = tools.recv().await {
//!         println!("{ev:?}");
//!     }
//!     session.shutdown().await;
//! }
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::core::bootstrap::{AuthBootstrap, BootstrapExit, Credentials};
use crate::core::cache::AppDescriptorCache;
use crate::core::registry::{RemoteStream, SubscriptionRegistry};
use crate::core::state::{ConnectionState, StateCell};
use crate::events::{Bus, Channel, ChannelReceiver, ForwardedEvent};
use crate::platform::PlatformRef;
use crate::subscribers::{Subscribe, SubscriberSet};

/// Connection lifecycle manager for one local process.
pub struct Session {
    pub(crate) cfg: Config,
    pub(crate) platform: PlatformRef,
    pub(crate) bus: Bus,
    pub(crate) state: Arc<StateCell>,
    pub(crate) registry: Arc<SubscriptionRegistry>,
    pub(crate) cache: Arc<AppDescriptorCache>,
    pub(crate) token: CancellationToken,
    subscribers: Mutex<Vec<Arc<dyn Subscribe>>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl Session {
    /// Starts building a session.
    pub fn builder(cfg: Config, platform: PlatformRef) -> super::SessionBuilder {
        super::SessionBuilder::new(cfg, platform)
    }

    pub(crate) fn new_internal(
        cfg: Config,
        platform: PlatformRef,
        subscribers: Vec<Arc<dyn Subscribe>>,
        token: CancellationToken,
    ) -> Self {
        let bus = Bus::new(cfg.bus_capacity_clamped());
        let registry = Arc::new(SubscriptionRegistry::new(platform.clone(), bus.clone()));
        let cache = Arc::new(AppDescriptorCache::new(
            platform.clone(),
            cfg.app_id.clone(),
            cfg.descriptor_fetch,
        ));

        Self {
            cfg,
            platform,
            bus,
            state: Arc::new(StateCell::new()),
            registry,
            cache,
            token,
            subscribers: Mutex::new(subscribers),
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Starts the bootstrap in the background and returns immediately.
    ///
    /// Must be called from within a tokio runtime. Returns `false` (and does
    /// nothing) if the session was already started: readiness fires once per session.
    pub fn start(&self) -> bool {
        if !self.state.advance(ConnectionState::Bootstrapping) {
            warn!("session already started");
            return false;
        }
        info!(base_url = %self.cfg.base_url, app_id = %self.cfg.app_id, "starting platform session");

        self.spawn_subscriber_listener();

        if self.cfg.prefetch_descriptor {
            let cache = Arc::clone(&self.cache);
            let token = self.token.clone();
            self.track(tokio::spawn(async move {
                tokio::select! {
                    _ = token.cancelled() => {}
                    _ = cache.get_descriptor() => {}
                }
            }));
        }

        let bootstrap = AuthBootstrap::new(
            self.platform.clone(),
            Credentials {
                client_id: self.cfg.client_id.clone(),
                client_secret: self.cfg.client_secret.clone(),
            },
            self.cfg.retry,
            Arc::clone(&self.state),
            self.bus.clone(),
        );
        let registry = Arc::clone(&self.registry);
        let token = self.token.clone();
        self.track(tokio::spawn(async move {
            match bootstrap.run(token.clone()).await {
                BootstrapExit::Ready { attempts } => {
                    debug!(attempts, "registering remote listeners");
                    tokio::select! {
                        _ = token.cancelled() => {
                            debug!("registration interrupted by shutdown");
                        }
                        _ = registry.register_all() => {}
                    }
                }
                BootstrapExit::Cancelled => {}
            }
        }));
        true
    }

    /// Subscribes host subscribers to the bus through a [`SubscriberSet`].
    fn spawn_subscriber_listener(&self) {
        let subs = std::mem::take(
            &mut *self
                .subscribers
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        if subs.is_empty() {
            return;
        }

        let set = SubscriberSet::new(subs);
        let mut rx = self.bus.subscribe();
        let token = self.token.clone();

        self.track(tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    msg = rx.recv() => match msg {
                        Ok(ev) => set.emit(&ev),
                        Err(RecvError::Closed) => break,
                        Err(RecvError::Lagged(skipped)) => {
                            warn!(skipped, "subscriber listener lagged");
                        }
                    }
                }
            }
            set.shutdown().await;
        }));
    }

    fn track(&self, handle: JoinHandle<()>) {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(handle);
    }

    /// Current connection state (non-blocking snapshot).
    pub fn state(&self) -> ConnectionState {
        self.state.snapshot()
    }

    /// Receiver of connection state transitions.
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    /// Waits until the connection is `Ready`.
    ///
    /// Returns immediately if it already is. Never resolves while credentials keep failing.
    pub async fn ready(&self) {
        let mut rx = self.state.subscribe();
        let _ = rx.wait_for(|s| s.is_ready()).await;
    }

    /// Receiver of every forwarded event.
    pub fn subscribe(&self) -> broadcast::Receiver<ForwardedEvent> {
        self.bus.subscribe()
    }

    /// Receiver of one channel's forwarded events.
    pub fn subscribe_channel(&self, channel: Channel) -> ChannelReceiver {
        self.bus.subscribe_channel(channel)
    }

    /// The local bus.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Remote streams currently subscribed.
    pub async fn active_streams(&self) -> Vec<RemoteStream> {
        self.registry.active_streams().await
    }

    /// Detaches every remote listener; returns how many were released.
    pub async fn release_subscriptions(&self) -> usize {
        self.registry.release_all().await
    }

    /// Token cancelling the bootstrap loop and the subscriber listener.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Stops background work and releases every remote listener.
    ///
    /// Returns the number of released subscriptions.
    pub async fn shutdown(&self) -> usize {
        self.token.cancel();

        let tasks = std::mem::take(&mut *self.tasks.lock().unwrap_or_else(PoisonError::into_inner));
        for handle in tasks {
            if let Err(e) = handle.await {
                warn!(error = %e, "session task ended abnormally");
            }
        }

        let released = self.registry.release_all().await;
        info!(released, "platform session shut down");
        released
    }
}
