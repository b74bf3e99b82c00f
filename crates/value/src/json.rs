//! Conversions between [`Value`] and `serde_json::Value`.
//!
//! JSON has no maps or sets, so the conversion to JSON is lossy for those:
//! a map becomes an array of `[key, value]` pairs and a set becomes an array
//! of its members, both in insertion order.

use serde_json::{Map, Number};

use crate::types::{Object, Value};

/// Largest integer an `f64` represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(arr) => Value::Array(arr.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect::<Object>())
            }
        }
    }
}

/// Integral numbers in the safe range encode as JSON integers so that
/// `json!(1)` and `Value::from(1).to_json()` compare equal.
fn number_to_json(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        return serde_json::Value::Number(Number::from(n as i64));
    }
    Number::from_f64(n)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}

impl Value {
    /// Encodes this value as JSON. Non-finite numbers become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => number_to_json(*n),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(arr) => serde_json::Value::Array(arr.iter().map(Value::to_json).collect()),
            Value::Object(obj) => {
                let mut out = Map::new();
                for (k, v) in obj {
                    out.insert(k.clone(), v.to_json());
                }
                serde_json::Value::Object(out)
            }
            Value::Map(map) => serde_json::Value::Array(
                map.iter()
                    .map(|(k, v)| serde_json::Value::Array(vec![k.to_json(), v.to_json()]))
                    .collect(),
            ),
            Value::Set(set) => serde_json::Value::Array(set.iter().map(Value::to_json).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ValueMap, ValueSet};
    use serde_json::json;

    #[test]
    fn test_from_json_nested() {
        let val = Value::from(json!({"a": 1, "b": [true, null, "x"], "c": {"d": 1.5}}));
        assert_eq!(val["a"], Value::Number(1.0));
        assert_eq!(val["b"][0], Value::Bool(true));
        assert_eq!(val["b"][1], Value::Null);
        assert_eq!(val["c"]["d"], Value::Number(1.5));
    }

    #[test]
    fn test_integers_encode_as_integers() {
        assert_eq!(Value::from(1).to_json(), json!(1));
        assert_eq!(Value::from(-7).to_json(), json!(-7));
        assert_eq!(Value::from(1.5).to_json(), json!(1.5));
        assert_eq!(Value::from(f64::NAN).to_json(), json!(null));
    }

    #[test]
    fn test_collections_encode_as_arrays() {
        let map: ValueMap = [(Value::from("one"), Value::from(1))].into_iter().collect();
        let set: ValueSet = [Value::from(1), Value::from(2)].into_iter().collect();
        assert_eq!(Value::Map(map).to_json(), json!([["one", 1]]));
        assert_eq!(Value::Set(set).to_json(), json!([1, 2]));
    }

    #[test]
    fn test_object_key_order_preserved() {
        let val = Value::from(json!({"z": 1, "a": 2}));
        let keys: Vec<_> = val.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a"]);
        assert_eq!(val.to_json().to_string(), r#"{"z":1,"a":2}"#);
    }
}
