//! # sermas-link
//!
//! **sermas-link** keeps one local process connected to a remote SERMAS
//! platform. It authenticates with retry, subscribes to the platform's remote
//! event streams, republishes their payloads on a local broadcast bus, caches
//! the application descriptor and offers pass-through platform calls that never
//! raise.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!                 ┌────────────────────────────────────────────┐
//!                 │   Platform (remote client, host-supplied)  │
//!                 └──┬──────────────┬──────────────────┬───────┘
//!        load_token  │   on_* listeners                │ read_app / proxy calls
//!                    ▼              ▼                  ▼
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │  Session                                                             │
//! │  - AuthBootstrap (fixed-interval retry, cancellable)                 │
//! │  - StateCell (Uninitialized → Bootstrapping → Ready, forward-only)   │
//! │  - SubscriptionRegistry (5 remote streams, teardowns)                │
//! │  - EventFanout (remote payload → ForwardedEvent)                     │
//! │  - AppDescriptorCache (lazy, never invalidated)                      │
//! └───────────────────────────────┬──────────────────────────────────────┘
//!                                 ▼
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                    Bus (broadcast channel)                           │
//! │                 (capacity: Config::bus_capacity)                     │
//! └──────────┬─────────────────────────────────────────┬─────────────────┘
//!            ▼                                         ▼
//!   host receivers                            subscriber listener
//!   (subscribe / subscribe_channel)                    │
//!                                               SubscriberSet
//!                                            (per-sub queues)
//!                                          ┌─────────┼─────────┐
//!                                          ▼         ▼         ▼
//!                                        sub1      sub2      subN
//! ```
//!
//! ### Lifecycle
//! ```text
//! Session::start()
//!
//! loop {
//!   ├─► attempt += 1
//!   ├─► load_token(client_id, client_secret)  (cancellable)
//!   │       ├─ Ok  ──► state = Ready, publish `sermas.ready` (once), exit loop
//!   │       └─ Err ──► log error, sleep(retry.interval) (cancellable), continue
//!   └─ exit on cancellation
//! }
//!
//! Ready ──► register 5 remote streams concurrently ──► keep the teardowns
//! ```
//!
//! ## Features
//! | Area              | Description                                                | Key types / traits                          |
//! |-------------------|------------------------------------------------------------|---------------------------------------------|
//! | **Session**       | Start, readiness, shutdown of one platform connection.     | [`Session`], [`SessionBuilder`]             |
//! | **Events**        | Local channels and the broadcast bus.                      | [`Channel`], [`ForwardedEvent`], [`Bus`]    |
//! | **Subscribers**   | Queue-isolated local handlers.                             | [`Subscribe`], [`LogWriter`]                |
//! | **Platform**      | The remote client contract and its payloads.               | [`Platform`], [`dto`]                       |
//! | **Policies**      | Retry interval and descriptor fetch coordination.          | [`RetryPolicy`], [`FetchMode`]              |
//! | **Errors**        | Typed errors with stable labels.                           | [`PlatformError`], [`ConfigError`]          |
//! | **Configuration** | Settings with environment overrides.                       | [`Config`]                                  |
//!
//! ## Example
//! ```no_run
//! use sermas_link::{Channel, Config, PlatformRef, Session};
//!
//! async fn serve(platform: PlatformRef) -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = Config::from_env()?;
//!     let session = Session::builder(cfg, platform).build();
//!
//!     let mut sessions = session.subscribe_channel(Channel::Session);
//!     session.start();
//!     session.ready().await;
//!
//!     if let Some(app) = session.get_app().await {
//!         println!("connected to {}", app.name);
//!     }
//!     tokio::spawn(async move {
//!         while let Ok(ev) = sessions.recv().await {
//!             println!("{ev:?}");
//!         }
//!     });
//!
//!     tokio::signal::ctrl_c().await?;
//!     session.shutdown().await;
//!     Ok(())
//! }
//! ```

mod config;
mod core;
mod error;
mod events;
mod platform;
mod policies;
mod subscribers;

// ---- Public re-exports ----

pub use config::Config;
pub use core::{
    AppDescriptorCache, ConnectionState, EventFanout, RemoteStream, Session, SessionBuilder,
    SubscriptionRegistry,
};
pub use error::{ConfigError, PlatformError, UnknownChannel};
pub use events::{Bus, Channel, ChannelReceiver, ForwardedEvent};
pub use platform::{Listener, Platform, PlatformRef, Teardown, dto};
pub use policies::{FetchMode, RetryPolicy};
pub use subscribers::{LogWriter, Subscribe, SubscriberSet};
