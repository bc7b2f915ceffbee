// ── Charger gateway ──
//
// The facade callers use. Reads go through the property cache, writes go
// straight to the device through the session manager and leave the cache
// alone: a reading taken right after a write may still show the old value
// until the TTL runs out.

use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use alfen_api::transport::{TlsMode, TransportConfig};
use alfen_api::{AlfenClient, Credentials, PropertyValue};
use tracing::{debug, info, warn};

use crate::cache::PropertyCache;
use crate::config::{ChargerConfig, TlsVerification};
use crate::error::CoreError;
use crate::ids;
use crate::model::{DeviceInfo, Diagnosis, PhaseValues};
use crate::snapshot::PropertySnapshot;
use crate::status::{ChargeStatus, map_status};

/// Current limit written to "disable" charging. The device has no on/off
/// switch; at or below this limit it stops charging.
pub const SWITCH_OFF_CURRENT: i64 = 5;
/// Current limit written to "enable" charging, and restored on shutdown.
pub const MAX_CURRENT: i64 = 16;

const STATUS_ON: &str = "1";

/// Gateway to a single wallbox.
///
/// Cheaply cloneable via `Arc<ChargerInner>`.
#[derive(Clone)]
pub struct Charger {
    inner: Arc<ChargerInner>,
}

struct ChargerInner {
    client: Arc<AlfenClient>,
    cache: PropertyCache,
}

impl Charger {
    /// Build the client from `config` and log in.
    pub async fn connect(config: ChargerConfig) -> Result<Self, CoreError> {
        let transport = build_transport(&config);
        let client = AlfenClient::new(
            config.url.clone(),
            Credentials::admin(config.password.clone()),
            &transport,
        )?;

        let charger = Self::from_client(client, config.cache_ttl, config.tracked);
        charger.inner.client.login().await?;

        info!(url = %config.url, "connected to wallbox");
        Ok(charger)
    }

    /// Wrap an existing client. Does not log in.
    pub fn from_client(client: AlfenClient, cache_ttl: Duration, tracked: Vec<String>) -> Self {
        let client = Arc::new(client);
        let ids: Arc<[String]> = tracked.into();

        let fetch_client = Arc::clone(&client);
        let cache = PropertyCache::new(cache_ttl, move || {
            let client = Arc::clone(&fetch_client);
            let ids = Arc::clone(&ids);
            async move { Ok(client.get_properties(&ids[..]).await?) }
        });

        Self {
            inner: Arc::new(ChargerInner { client, cache }),
        }
    }

    /// The underlying device client.
    pub fn client(&self) -> &AlfenClient {
        &self.inner.client
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Current property snapshot, at most one TTL old.
    pub async fn snapshot(&self) -> Result<Arc<PropertySnapshot>, CoreError> {
        self.inner.cache.get_snapshot().await
    }

    pub async fn read_property(&self, id: &str) -> Result<PropertyValue, CoreError> {
        Ok(self.snapshot().await?.get(id)?.clone())
    }

    pub async fn read_number(&self, id: &str) -> Result<f64, CoreError> {
        self.snapshot().await?.number(id)
    }

    pub async fn read_string(&self, id: &str) -> Result<String, CoreError> {
        self.snapshot().await?.string(id)
    }

    pub async fn status(&self) -> Result<ChargeStatus, CoreError> {
        map_status(self.read_number(ids::STATE).await?)
    }

    /// Charging is enabled while the current limit is above the cutoff.
    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    pub async fn is_enabled(&self) -> Result<bool, CoreError> {
        Ok(self.max_current().await? > SWITCH_OFF_CURRENT as f64)
    }

    pub async fn max_current(&self) -> Result<f64, CoreError> {
        self.read_number(ids::MAX_STATION_CURRENT).await
    }

    /// Phases the connector may currently use.
    pub async fn phases(&self) -> Result<i64, CoreError> {
        self.snapshot()
            .await?
            .integer(ids::CONNECTOR_MAX_ALLOWED_PHASES)
    }

    /// Total active power in W.
    pub async fn current_power(&self) -> Result<f64, CoreError> {
        self.read_number(ids::ACTIVE_POWER_TOTAL).await
    }

    /// Meter reading in kWh.
    pub async fn total_energy(&self) -> Result<f64, CoreError> {
        Ok(self.read_number(ids::METER_READING).await? / 1000.0)
    }

    /// Per-phase currents in A.
    pub async fn currents(&self) -> Result<PhaseValues, CoreError> {
        let snap = self.snapshot().await?;
        Ok(PhaseValues {
            l1: snap.number(ids::CURRENT_L1)?,
            l2: snap.number(ids::CURRENT_L2)?,
            l3: snap.number(ids::CURRENT_L3)?,
        })
    }

    /// Per-phase voltages in V.
    pub async fn voltages(&self) -> Result<PhaseValues, CoreError> {
        let snap = self.snapshot().await?;
        Ok(PhaseValues {
            l1: snap.number(ids::VOLTAGE_L1)?,
            l2: snap.number(ids::VOLTAGE_L2)?,
            l3: snap.number(ids::VOLTAGE_L3)?,
        })
    }

    /// Device identity. Never cached.
    pub async fn info(&self) -> Result<DeviceInfo, CoreError> {
        Ok(self.inner.client.get_info().await?.into())
    }

    /// Identity plus boot counters. Counters that cannot be read are left out.
    pub async fn diagnose(&self) -> Result<Diagnosis, CoreError> {
        let info = self.info().await?;
        let snap = self.snapshot().await.ok();

        Ok(Diagnosis {
            info,
            bootups: snap.as_ref().and_then(|s| s.integer(ids::BOOTUPS).ok()),
            boot_reason: snap.as_ref().and_then(|s| s.string(ids::BOOT_REASON).ok()),
            uptime: snap.as_ref().and_then(|s| s.integer(ids::UPTIME).ok()),
        })
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Write one property. Bypasses and does not invalidate the cache.
    pub async fn write_property(&self, id: &str, value: impl Display) -> Result<(), CoreError> {
        Ok(self
            .inner
            .client
            .set_property(id, &value.to_string())
            .await?)
    }

    pub async fn set_max_current(&self, current: i64) -> Result<(), CoreError> {
        self.write_property(ids::MAX_STATION_CURRENT, current).await
    }

    /// Enable or disable charging by moving the current limit.
    pub async fn enable(&self, enable: bool) -> Result<(), CoreError> {
        let current = if enable { MAX_CURRENT } else { SWITCH_OFF_CURRENT };
        self.set_max_current(current).await
    }

    /// Switch between 1- and 3-phase charging.
    ///
    /// Enables phase switching first, then writes the phase count. If the
    /// second write fails the device keeps phase switching enabled with
    /// the old count; nothing is rolled back.
    pub async fn set_phases(&self, phases: u8) -> Result<(), CoreError> {
        self.write_property(ids::LOAD_BALANCING_ENABLE_PHASE_SWITCHING, STATUS_ON)
            .await?;
        self.write_property(ids::INSTALLATION_MAX_ALLOWED_PHASES, phases)
            .await
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Restore 3-phase charging at full current and log out.
    ///
    /// Every step is attempted; failures are logged, never returned, so
    /// this can run any number of times.
    pub async fn shutdown(&self) {
        debug!("resetting charger to 3p");
        if let Err(e) = self.set_phases(3).await {
            warn!(error = %e, "failed to reset phases during shutdown");
        }

        debug!("resetting charger current to {MAX_CURRENT}A");
        if let Err(e) = self.set_max_current(MAX_CURRENT).await {
            warn!(error = %e, "failed to reset current during shutdown");
        }

        if let Err(e) = self.inner.client.logout().await {
            warn!(error = %e, "logout failed (non-fatal)");
        }
    }
}

fn build_transport(config: &ChargerConfig) -> TransportConfig {
    let tls = match &config.tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    };

    TransportConfig::default()
        .with_tls(tls)
        .with_timeout(config.timeout)
        .with_cookie_jar()
}
