// Wire models for the wallbox property API.
//
// `/api/prop` returns a page of `{id, access, type, len, cat, value}`
// records whose `value` is a JSON number, string, or boolean depending on
// the property, occasionally `null`. `/api/info` returns a flat identity record with
// PascalCase field names.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single property value as delivered by the device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Number(f64),
    String(String),
    Boolean(bool),
    /// `null` or missing; only this property is unreadable, not the page.
    #[default]
    Null,
}

impl PropertyValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Short name of the variant, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Boolean(_) => "boolean",
            Self::Null => "null",
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Null => f.write_str("null"),
        }
    }
}

/// One entry of the `/api/prop` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    #[serde(default)]
    pub access: i64,
    #[serde(rename = "type", default)]
    pub kind: i64,
    #[serde(default)]
    pub len: i64,
    #[serde(default)]
    pub cat: String,
    #[serde(default)]
    pub value: PropertyValue,
}

/// A page of properties returned by `GET /api/prop?ids=...`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    pub version: i64,
    #[serde(default)]
    pub offset: i64,
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub properties: Vec<Property>,
}

/// Body entry of `POST /api/prop`. The value is always sent as a string.
#[derive(Debug, Clone, Serialize)]
pub struct PropertyWrite {
    pub id: String,
    pub value: String,
}

/// Build the `{"<id>": {"id": "<id>", "value": "<value>"}}` write body.
pub fn property_write_body(id: &str, value: &str) -> BTreeMap<String, PropertyWrite> {
    BTreeMap::from([(
        id.to_owned(),
        PropertyWrite {
            id: id.to_owned(),
            value: value.to_owned(),
        },
    )])
}

/// Device identity returned by `GET /api/info`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Info {
    #[serde(rename = "Identity", default)]
    pub identity: String,
    #[serde(rename = "SCNNetwork", default)]
    pub scn_network: String,
    #[serde(rename = "FWVersion", default)]
    pub fw_version: String,
    #[serde(rename = "LastConfig", default)]
    pub last_config: i64,
    #[serde(rename = "Model", default)]
    pub model: String,
    #[serde(rename = "ObjectId", default)]
    pub object_id: String,
    #[serde(rename = "Type", default)]
    pub device_type: String,
}
