// ── Property snapshot and decoder ──
//
// One bulk `/api/prop` response, frozen. Lookups scan in wire order and
// return the first match; coercion helpers turn a type mismatch into a
// descriptive error instead of a panic.

use alfen_api::{Properties, Property, PropertyValue};
use tokio::time::Instant;
use tracing::trace;

use crate::error::CoreError;

/// Immutable result of a single property fetch.
#[derive(Debug, Clone)]
pub struct PropertySnapshot {
    pub version: i64,
    pub offset: i64,
    pub total: i64,
    pub properties: Vec<Property>,
    /// When the fetch completed. Drives cache expiry.
    pub fetched_at: Instant,
}

impl PropertySnapshot {
    pub fn new(props: Properties, fetched_at: Instant) -> Self {
        Self {
            version: props.version,
            offset: props.offset,
            total: props.total,
            properties: props.properties,
            fetched_at,
        }
    }

    /// Raw value of `id` as delivered by the device.
    pub fn get(&self, id: &str) -> Result<&PropertyValue, CoreError> {
        self.properties
            .iter()
            .find(|p| p.id == id)
            .map(|p| &p.value)
            .ok_or_else(|| CoreError::PropertyNotFound {
                id: id.to_owned(),
                available: self.describe(),
            })
    }

    pub fn number(&self, id: &str) -> Result<f64, CoreError> {
        let value = self.get(id)?;
        trace!(id, %value, "decoding number");
        value.as_number().ok_or_else(|| mismatch(id, "number", value))
    }

    /// Number that must be whole, e.g. a count or a phase setting.
    pub fn integer(&self, id: &str) -> Result<i64, CoreError> {
        let value = self.get(id)?;
        value
            .as_number()
            .and_then(as_integer)
            .ok_or_else(|| mismatch(id, "integer", value))
    }

    pub fn string(&self, id: &str) -> Result<String, CoreError> {
        let value = self.get(id)?;
        value
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| mismatch(id, "string", value))
    }

    pub fn boolean(&self, id: &str) -> Result<bool, CoreError> {
        let value = self.get(id)?;
        value.as_bool().ok_or_else(|| mismatch(id, "boolean", value))
    }

    /// `id=value` list of every property, for diagnostics.
    fn describe(&self) -> String {
        self.properties
            .iter()
            .map(|p| format!("{}={}", p.id, p.value))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// `Some(n)` if `raw` is a whole number within `i64` range.
#[allow(
    clippy::cast_possible_truncation,
    clippy::as_conversions,
    clippy::float_cmp
)]
pub(crate) fn as_integer(raw: f64) -> Option<i64> {
    if !raw.is_finite() || raw.fract() != 0.0 || raw.abs() > 1e15 {
        return None;
    }
    Some(raw as i64)
}

fn mismatch(id: &str, expected: &'static str, found: &PropertyValue) -> CoreError {
    CoreError::TypeMismatch {
        id: id.to_owned(),
        expected,
        found: found.kind(),
    }
}
