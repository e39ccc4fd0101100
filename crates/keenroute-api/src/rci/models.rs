// RCI wire types
//
// Route records as the NDMS RCI API sends and accepts them. Firmware versions
// disagree on scalar types (the same field arrives as a string on one build
// and a number or boolean on another), so every scalar goes through one of
// the tolerant `Flex*` decoders below. They never fail on type drift; they
// fall back to "", false or 0 instead.

use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

// ── Flexible scalars ─────────────────────────────────────────────────

/// A string field that may arrive as a string, number, boolean, or null.
///
/// Non-null values are rendered to text and trimmed; null becomes `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlexString(String);

impl FlexString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => Self::default(),
            Value::String(s) => Self::new(s.as_str()),
            // Integral floats render without a fraction: 24.0 is "24"
            Value::Number(n) => match n.as_f64() {
                Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => {
                    Self(format!("{f:.0}"))
                }
                _ => Self::new(n.to_string()),
            },
            other => Self::new(other.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for FlexString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

impl Serialize for FlexString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// A boolean field that may arrive as a bool, number, string, or null.
///
/// `true`/`1`/`yes` (any case) and non-zero numbers are true; everything
/// else, including unrecognized text, is false.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlexBool(bool);

impl FlexBool {
    pub fn new(value: bool) -> Self {
        Self(value)
    }

    pub fn get(self) -> bool {
        self.0
    }

    fn from_value(value: &Value) -> Self {
        match value {
            Value::Bool(b) => Self(*b),
            Value::Number(n) => Self(n.as_f64().is_some_and(|f| f != 0.0)),
            Value::String(s) => Self(parse_bool_text(s)),
            _ => Self(false),
        }
    }
}

fn parse_bool_text(raw: &str) -> bool {
    let text = raw.trim();
    match text.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => true,
        "false" | "0" | "no" | "" => false,
        _ => text.parse::<f64>().is_ok_and(|f| f != 0.0),
    }
}

impl<'de> Deserialize<'de> for FlexBool {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

impl Serialize for FlexBool {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(self.0)
    }
}

/// An integer field that may arrive as an integer, an integral float,
/// either of those quoted, or null. Anything else decodes as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlexInt(i64);

impl FlexInt {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn get(self) -> i64 {
        self.0
    }

    fn from_value(value: &Value) -> Self {
        match value {
            Value::Number(n) => Self(n.as_i64().or_else(|| n.as_f64().and_then(integral)).unwrap_or(0)),
            Value::String(s) => Self(parse_int_text(s)),
            _ => Self(0),
        }
    }
}

fn parse_int_text(raw: &str) -> i64 {
    let text = raw.trim();
    text.parse::<i64>()
        .ok()
        .or_else(|| text.parse::<f64>().ok().and_then(integral))
        .unwrap_or(0)
}

#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
fn integral(f: f64) -> Option<i64> {
    // Range check keeps the cast exact.
    (f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15).then_some(f as i64)
}

impl<'de> Deserialize<'de> for FlexInt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

impl Serialize for FlexInt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.0)
    }
}

// ── Route record ─────────────────────────────────────────────────────

/// One static route as exchanged with `rci/ip/route`.
///
/// The destination comes in one of three shapes: `host` (address or CIDR),
/// or `network`/`ip` combined with `mask`, `prefix` or `prefixlen`.
/// Every field is optional; unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<FlexString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<FlexString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<FlexString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<FlexString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<FlexInt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefixlen: Option<FlexInt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<FlexString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<FlexString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<FlexString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto: Option<FlexBool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reject: Option<FlexBool>,
    /// Delete directive. Only ever sent, never received.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no: Option<bool>,
}

fn text(field: Option<&FlexString>) -> &str {
    field.map_or("", FlexString::as_str)
}

impl RouteRecord {
    pub fn host(&self) -> &str {
        text(self.host.as_ref())
    }

    pub fn network(&self) -> &str {
        text(self.network.as_ref())
    }

    pub fn ip(&self) -> &str {
        text(self.ip.as_ref())
    }

    pub fn mask(&self) -> &str {
        text(self.mask.as_ref())
    }

    pub fn prefix(&self) -> i64 {
        self.prefix.map_or(0, FlexInt::get)
    }

    pub fn prefixlen(&self) -> i64 {
        self.prefixlen.map_or(0, FlexInt::get)
    }

    pub fn comment(&self) -> &str {
        text(self.comment.as_ref())
    }

    pub fn gateway(&self) -> &str {
        text(self.gateway.as_ref())
    }

    pub fn interface(&self) -> &str {
        text(self.interface.as_ref())
    }

    pub fn auto(&self) -> bool {
        self.auto.is_some_and(FlexBool::get)
    }

    pub fn reject(&self) -> bool {
        self.reject.is_some_and(FlexBool::get)
    }

    /// Turn this record into a delete directive for the same route.
    pub fn into_delete(mut self) -> Self {
        self.no = Some(true);
        self
    }
}

// ── Batch request ────────────────────────────────────────────────────

/// `{"ip": {"route": <record>}}`
#[derive(Serialize)]
struct RouteEnvelope<'a> {
    ip: RouteWrapper<'a>,
}

#[derive(Serialize)]
struct RouteWrapper<'a> {
    route: &'a RouteRecord,
}

/// `{"system": {"configuration": {"save": true}}}`
#[derive(Serialize)]
struct SaveConfig {
    system: SystemConfig,
}

#[derive(Serialize)]
struct SystemConfig {
    configuration: ConfigSave,
}

#[derive(Serialize)]
struct ConfigSave {
    save: bool,
}

const SAVE_CONFIG: SaveConfig = SaveConfig {
    system: SystemConfig {
        configuration: ConfigSave { save: true },
    },
};

/// A `POST rci/` body: route mutations followed by exactly one persist
/// directive.
///
/// The save directive is not stored; serialization always emits it as the
/// final array element, so a batch can never reach the router without it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RciBatch {
    routes: Vec<RouteRecord>,
}

impl RciBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of route mutations (the save directive is not counted).
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl FromIterator<RouteRecord> for RciBatch {
    fn from_iter<I: IntoIterator<Item = RouteRecord>>(iter: I) -> Self {
        Self {
            routes: iter.into_iter().collect(),
        }
    }
}

impl Serialize for RciBatch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.routes.len() + 1))?;
        for route in &self.routes {
            seq.serialize_element(&RouteEnvelope {
                ip: RouteWrapper { route },
            })?;
        }
        seq.serialize_element(&SAVE_CONFIG)?;
        seq.end()
    }
}
