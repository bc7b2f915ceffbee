//! Session-resilient, cache-coherent gateway to an Alfen wallbox.
//!
//! Sits between `alfen-api` and the CLI:
//!
//! - **[`Charger`]**: Facade exposing typed readings (status, power,
//!   energy, per-phase values) and writes (current limit, enable/disable,
//!   phase switching), plus a best-effort [`shutdown()`](Charger::shutdown).
//!
//! - **[`PropertyCache`]**: TTL-bounded, single-flight cache so that any
//!   number of concurrent readings cost at most one device request per
//!   window.
//!
//! - **[`PropertySnapshot`]**: One immutable bulk fetch with typed
//!   lookups.
//!
//! - **[`map_status`]**: Raw connector state code to [`ChargeStatus`].

pub mod cache;
pub mod charger;
pub mod config;
pub mod error;
pub mod ids;
pub mod model;
pub mod snapshot;
pub mod status;

// ── Primary re-exports ──────────────────────────────────────────────
pub use cache::PropertyCache;
pub use charger::{Charger, MAX_CURRENT, SWITCH_OFF_CURRENT};
pub use config::{ChargerConfig, DEFAULT_CACHE_TTL, TlsVerification};
pub use error::CoreError;
pub use model::{DeviceInfo, Diagnosis, PhaseValues};
pub use snapshot::PropertySnapshot;
pub use status::{ChargeStatus, map_status};

pub use alfen_api::PropertyValue;
