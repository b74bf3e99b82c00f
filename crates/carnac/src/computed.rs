//! Computed properties and actions.
//!
//! Getters receive a [`ComputedContext`] giving read access to the state and
//! to sibling computed properties. Setters receive the state mutably. Actions
//! receive the store itself plus their arguments.

use std::fmt;
use std::rc::Rc;

use carnac_value::{Object, Value};
use indexmap::IndexMap;

use crate::store::Store;

pub(crate) type Getter = Rc<dyn Fn(&ComputedContext<'_>) -> Value>;
pub(crate) type Setter = Rc<dyn Fn(&mut Object, Value)>;
pub(crate) type Action = Rc<dyn Fn(&mut Store, &[Value]) -> Value>;

/// A derived value, optionally writable.
#[derive(Clone)]
pub struct ComputedProperty {
    getter: Getter,
    setter: Option<Setter>,
}

impl ComputedProperty {
    pub fn new<G>(getter: G) -> Self
    where
        G: Fn(&ComputedContext<'_>) -> Value + 'static,
    {
        Self {
            getter: Rc::new(getter),
            setter: None,
        }
    }

    pub fn writable<G, S>(getter: G, setter: S) -> Self
    where
        G: Fn(&ComputedContext<'_>) -> Value + 'static,
        S: Fn(&mut Object, Value) + 'static,
    {
        Self {
            getter: Rc::new(getter),
            setter: Some(Rc::new(setter)),
        }
    }

    pub fn is_writable(&self) -> bool {
        self.setter.is_some()
    }

    pub(crate) fn get(&self, cx: &ComputedContext<'_>) -> Value {
        (self.getter)(cx)
    }

    pub(crate) fn setter(&self) -> Option<Setter> {
        self.setter.clone()
    }
}

impl fmt::Debug for ComputedProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComputedProperty")
            .field("writable", &self.is_writable())
            .finish()
    }
}

/// What a computed getter can see.
pub struct ComputedContext<'a> {
    state: &'a Object,
    computed: &'a IndexMap<String, ComputedProperty>,
}

impl<'a> ComputedContext<'a> {
    pub(crate) fn new(state: &'a Object, computed: &'a IndexMap<String, ComputedProperty>) -> Self {
        Self { state, computed }
    }

    pub fn state(&self) -> &'a Object {
        self.state
    }

    /// Evaluates a sibling computed property.
    pub fn computed(&self, name: &str) -> Option<Value> {
        self.computed.get(name).map(|prop| prop.get(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_getter_reads_siblings() {
        let state = match Value::from(json!({"first": "super", "last": "man"})) {
            Value::Object(obj) => obj,
            _ => unreachable!(),
        };
        let mut computed = IndexMap::new();
        computed.insert(
            "full_name".to_string(),
            ComputedProperty::new(|cx| {
                let s = cx.state();
                Value::from(format!(
                    "{} {}",
                    s["first"].as_str().unwrap_or_default(),
                    s["last"].as_str().unwrap_or_default()
                ))
            }),
        );
        computed.insert(
            "greeting".to_string(),
            ComputedProperty::new(|cx| {
                let name = cx.computed("full_name").unwrap_or_default();
                Value::from(format!("greetings {}", name.as_str().unwrap_or_default()))
            }),
        );
        let cx = ComputedContext::new(&state, &computed);
        assert_eq!(cx.computed("greeting"), Some(Value::from("greetings super man")));
        assert_eq!(cx.computed("missing"), None);
    }
}
