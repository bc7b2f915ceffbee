// ── Domain types returned by the gateway ──

use alfen_api::Info;
use serde::Serialize;

/// Identity of the wallbox, read from `/api/info` on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub identity: String,
    pub model: String,
    pub firmware: String,
    pub object_id: String,
    pub device_type: String,
    pub scn_network: String,
    /// Timestamp of the last configuration change, as reported.
    pub last_config: i64,
}

impl From<Info> for DeviceInfo {
    fn from(info: Info) -> Self {
        Self {
            identity: info.identity,
            model: info.model,
            firmware: info.fw_version,
            object_id: info.object_id,
            device_type: info.device_type,
            scn_network: info.scn_network,
            last_config: info.last_config,
        }
    }
}

/// One value per phase, L1 to L3.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhaseValues {
    pub l1: f64,
    pub l2: f64,
    pub l3: f64,
}

/// Device identity plus the boot counters that help when a box misbehaves.
///
/// Counter fields are `None` when the device did not report them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnosis {
    pub info: DeviceInfo,
    pub bootups: Option<i64>,
    pub boot_reason: Option<String>,
    pub uptime: Option<i64>,
}
