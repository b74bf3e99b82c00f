use std::cmp::Ordering;

use crate::types::Value;

fn rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
        Value::Map(_) => 6,
        Value::Set(_) => 7,
    }
}

/// Total order over values, used when sorting without a comparator.
///
/// Values of different types order by type: null, booleans, numbers,
/// strings, sequences, objects, maps, sets. Numbers use IEEE total ordering,
/// strings and sequences are lexicographic, and the remaining containers
/// order by size.
///
/// # Examples
///
/// ```
/// use std::cmp::Ordering;
/// use carnac_value::{total_cmp, Value};
///
/// assert_eq!(total_cmp(&Value::from(2), &Value::from(10)), Ordering::Less);
/// assert_eq!(total_cmp(&Value::from("b"), &Value::from("a")), Ordering::Greater);
/// assert_eq!(total_cmp(&Value::Null, &Value::from(false)), Ordering::Less);
/// ```
pub fn total_cmp(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => x.total_cmp(y),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(xs), Value::Array(ys)) => {
            for (x, y) in xs.iter().zip(ys) {
                match total_cmp(x, y) {
                    Ordering::Equal => continue,
                    other => return other,
                }
            }
            xs.len().cmp(&ys.len())
        }
        (Value::Object(xs), Value::Object(ys)) => xs.len().cmp(&ys.len()),
        (Value::Map(xs), Value::Map(ys)) => xs.len().cmp(&ys.len()),
        (Value::Set(xs), Value::Set(ys)) => xs.len().cmp(&ys.len()),
        _ => rank(a).cmp(&rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_are_numeric() {
        let mut vals: Vec<Value> = [10, 2, 33, 1].into_iter().map(Value::from).collect();
        vals.sort_by(total_cmp);
        assert_eq!(vals, [1, 2, 10, 33].into_iter().map(Value::from).collect::<Vec<_>>());
    }

    #[test]
    fn test_mixed_types_order_by_rank() {
        let mut vals = vec![Value::from("a"), Value::from(1), Value::Null, Value::from(true)];
        vals.sort_by(total_cmp);
        assert_eq!(vals, vec![Value::Null, Value::from(true), Value::from(1), Value::from("a")]);
    }

    #[test]
    fn test_sequences_lexicographic() {
        let a = Value::Array(vec![Value::from(1), Value::from(2)]);
        let b = Value::Array(vec![Value::from(1), Value::from(3)]);
        let c = Value::Array(vec![Value::from(1)]);
        assert_eq!(total_cmp(&a, &b), Ordering::Less);
        assert_eq!(total_cmp(&c, &a), Ordering::Less);
    }
}
