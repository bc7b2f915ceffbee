// ── Charge status mapping ──
//
// The device reports its connector state as a numeric code in `2501_2`.
// Codes outside the table are an error, never a guessed category.

use serde::Serialize;
use strum::{Display, EnumString};
use tracing::trace;

use crate::error::CoreError;
use crate::snapshot::as_integer;

/// Raw connector state codes reported by the wallbox.
pub mod code {
    pub const AVAILABLE: i64 = 4;
    pub const CABLE_CONNECTED: i64 = 7;
    pub const EV_CONNECTED: i64 = 8;
    pub const PREPARING_CHARGING: i64 = 9;
    pub const WAIT_VEHICLE_CHARGING: i64 = 10;
    pub const CHARGING_NORMAL: i64 = 11;
    pub const FINISH_WAIT_VEHICLE: i64 = 16;
    pub const FINISH_WAIT_DISCONNECT: i64 = 17;
    pub const ERROR_CHARGING: i64 = 21;
    pub const ERROR_TOO_MANY_RESTARTS: i64 = 26;
    pub const INOPERATIVE: i64 = 34;
    pub const LOAD_BALANCING_FORCED_OFF: i64 = 36;
}

/// High-level state of the charging process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChargeStatus {
    /// No vehicle plugged in.
    NoVehicle,
    /// Vehicle connected, not drawing current.
    Connected,
    Charging,
    /// Fault or out of service.
    Error,
}

/// Translate a raw state code into a [`ChargeStatus`].
pub fn map_status(raw: f64) -> Result<ChargeStatus, CoreError> {
    let status = as_integer(raw)
        .and_then(category)
        .ok_or(CoreError::UnhandledStatus { code: raw })?;

    trace!(code = raw, %status, "mapped status");
    Ok(status)
}

fn category(code: i64) -> Option<ChargeStatus> {
    use code::{
        AVAILABLE, CABLE_CONNECTED, CHARGING_NORMAL, ERROR_CHARGING, ERROR_TOO_MANY_RESTARTS,
        EV_CONNECTED, FINISH_WAIT_DISCONNECT, FINISH_WAIT_VEHICLE, INOPERATIVE,
        LOAD_BALANCING_FORCED_OFF, PREPARING_CHARGING, WAIT_VEHICLE_CHARGING,
    };

    match code {
        AVAILABLE => Some(ChargeStatus::NoVehicle),
        CABLE_CONNECTED
        | EV_CONNECTED
        | PREPARING_CHARGING
        | WAIT_VEHICLE_CHARGING
        | FINISH_WAIT_VEHICLE
        | FINISH_WAIT_DISCONNECT
        | LOAD_BALANCING_FORCED_OFF => Some(ChargeStatus::Connected),
        CHARGING_NORMAL => Some(ChargeStatus::Charging),
        ERROR_CHARGING | ERROR_TOO_MANY_RESTARTS | INOPERATIVE => Some(ChargeStatus::Error),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charging_code_maps_to_charging() {
        assert_eq!(map_status(11.0), Ok(ChargeStatus::Charging));
    }

    #[test]
    fn available_maps_to_no_vehicle() {
        assert_eq!(map_status(4.0), Ok(ChargeStatus::NoVehicle));
    }

    #[test]
    fn connected_codes() {
        for raw in [7.0, 8.0, 9.0, 10.0, 16.0, 17.0, 36.0] {
            assert_eq!(map_status(raw), Ok(ChargeStatus::Connected), "code {raw}");
        }
    }

    #[test]
    fn error_codes() {
        for raw in [21.0, 26.0, 34.0] {
            assert_eq!(map_status(raw), Ok(ChargeStatus::Error), "code {raw}");
        }
    }

    #[test]
    fn unknown_code_is_not_defaulted() {
        assert_eq!(
            map_status(999.0),
            Err(CoreError::UnhandledStatus { code: 999.0 })
        );
        assert_eq!(
            map_status(0.0),
            Err(CoreError::UnhandledStatus { code: 0.0 })
        );
    }

    #[test]
    fn fractional_code_is_unhandled() {
        assert!(matches!(
            map_status(11.5),
            Err(CoreError::UnhandledStatus { .. })
        ));
        assert!(map_status(f64::NAN).is_err());
    }

    #[test]
    fn status_names() {
        assert_eq!(ChargeStatus::NoVehicle.to_string(), "no_vehicle");
        assert_eq!("charging".parse::<ChargeStatus>().ok(), Some(ChargeStatus::Charging));
    }
}
