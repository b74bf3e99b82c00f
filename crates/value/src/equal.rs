use crate::types::Value;

/// Key equality for map keys and set members.
///
/// Like `==` except that `NaN` equals `NaN`; `0.0` and `-0.0` are equal.
/// Containers compare structurally.
///
/// # Examples
///
/// ```
/// use carnac_value::{same_value_zero, Value};
///
/// assert!(same_value_zero(&Value::from(f64::NAN), &Value::from(f64::NAN)));
/// assert!(same_value_zero(&Value::from(0.0), &Value::from(-0.0)));
/// assert!(!same_value_zero(&Value::from(1), &Value::from("1")));
/// ```
pub fn same_value_zero(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x == y || (x.is_nan() && y.is_nan()),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| same_value_zero(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| same_value_zero(x, y)))
        }
        _ => a == b,
    }
}
