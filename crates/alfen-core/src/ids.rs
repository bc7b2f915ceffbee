//! Wallbox property identifiers.
//!
//! Ids follow the device's `<object>_<index>` scheme, hex digits in upper
//! case. Only the ids the gateway reads or writes are listed.

pub const BOOTUPS: &str = "2056_0";
pub const BOOT_REASON: &str = "2057_0";
pub const UPTIME: &str = "2060_0";
pub const MAX_STATION_CURRENT: &str = "2062_0";
pub const VOLTAGE_L1: &str = "2221_3";
pub const VOLTAGE_L2: &str = "2221_4";
pub const VOLTAGE_L3: &str = "2221_5";
pub const ACTIVE_POWER_TOTAL: &str = "2221_16";
pub const METER_READING: &str = "2221_22";
pub const CURRENT_L1: &str = "2221_A";
pub const CURRENT_L2: &str = "2221_B";
pub const CURRENT_L3: &str = "2221_C";
pub const STATE: &str = "2501_2";
pub const CONNECTOR_MAX_ALLOWED_PHASES: &str = "312E_0";

/// Write-only: `"1"` enables load-balancing phase switching.
pub const LOAD_BALANCING_ENABLE_PHASE_SWITCHING: &str = "2185_0";
/// Write-only: phase count the installation may use.
pub const INSTALLATION_MAX_ALLOWED_PHASES: &str = "2189_0";

/// Ids fetched in one request on every cache refresh.
pub const TRACKED: &[&str] = &[
    BOOTUPS,
    BOOT_REASON,
    UPTIME,
    MAX_STATION_CURRENT,
    VOLTAGE_L1,
    VOLTAGE_L2,
    VOLTAGE_L3,
    ACTIVE_POWER_TOTAL,
    METER_READING,
    CURRENT_L1,
    CURRENT_L2,
    CURRENT_L3,
    STATE,
    CONNECTOR_MAX_ALLOWED_PHASES,
];
