//! Epoch-millisecond timestamps.
//!
//! Older documents carry float milliseconds (`1718000000000.0`); both
//! integers and floats are read back as whole milliseconds.

use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Number;

pub type Millis = i64;

pub fn now_millis() -> Millis {
    Utc::now().timestamp_millis()
}

fn number_to_millis(n: &Number) -> Option<Millis> {
    n.as_i64()
        .or_else(|| n.as_u64().and_then(|v| i64::try_from(v).ok()))
        .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
}

/// serde adapter for `Option<Millis>` fields.
pub mod millis_opt {
    use super::*;

    pub fn serialize<S>(value: &Option<Millis>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Millis>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<Number>::deserialize(deserializer)?;
        raw.map(|n| {
            number_to_millis(&n)
                .ok_or_else(|| <D::Error as serde::de::Error>::custom(format!("timestamp out of range: {n}")))
        })
        .transpose()
    }
}
