//! carnac-value - the state tree value model.
//!
//! A state tree is an [`Object`] whose values are primitives, nested objects,
//! or one of three collection kinds: ordered sequences, key-value maps and
//! unique sets. Maps and sets preserve insertion order and compare their
//! keys/members by value.
//!
//! # Example
//!
//! ```
//! use carnac_value::{CollectionKind, Value, ValueMap, ValueSet};
//! use serde_json::json;
//!
//! let mut state = Value::from(json!({"arr": [1, 2], "foo": {"bar": "baz"}}));
//! let obj = state.as_object_mut().unwrap();
//! obj.insert("map".into(), Value::Map(ValueMap::new()));
//! obj.insert("set".into(), Value::Set(ValueSet::from_iter([Value::from(1)])));
//!
//! assert_eq!(state.collection_kind(), Some(CollectionKind::PlainMapping));
//! assert_eq!(state["arr"].collection_kind(), Some(CollectionKind::Sequence));
//! assert_eq!(state["set"].collection_kind(), Some(CollectionKind::Set));
//! assert_eq!(state["foo"]["bar"].collection_kind(), None);
//! ```

pub mod cmp;
pub mod equal;
pub mod json;
pub mod map;
pub mod set;
pub mod types;

pub use cmp::total_cmp;
pub use equal::same_value_zero;
pub use map::ValueMap;
pub use set::ValueSet;
pub use types::{CollectionKind, Object, Value};
