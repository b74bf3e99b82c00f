//! Store façade: owns the state tree and routes every change through the
//! engines and the notification bus.
//!
//! - `patch*` apply a [`Patch`] and raise a `patch` event.
//! - `perform*` apply a [`Mutator`] and raise a `perform` event.
//! - `set_computed` runs a computed setter and raises a `computed` event.
//! - `update`, `reset` and `raw_changed` raise `raw` for direct mutation.
//! - `batch` aggregates everything raised inside its scope into one event.
//!
//! The mutation flag is raised before an engine runs and cleared after its
//! event has been dispatched, so a raw-change detector watching the state
//! stays quiet for engine-mediated changes.

use std::cell::Cell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use carnac_pointer::{format_pointer, resolve, resolve_mut, validate_path, Path};
use carnac_value::{Object, Value};
use indexmap::IndexMap;

use crate::bus::{NotificationBus, SubscriberRegistry, Unsubscribe};
use crate::codec::{decode_mutator, decode_object_mutator, decode_patch};
use crate::computed::{Action, ComputedContext, ComputedProperty};
use crate::error::StoreError;
use crate::events::{BatchEvent, IntoEventFields, StoreEvent};
use crate::mutator::{MutationResult, Mutator};
use crate::patch::{apply_patch, Patch};
use crate::perform::{perform_mutation, perform_object_mutation};

// ── Mutation flag ─────────────────────────────────────────────────────────

/// Shared "mutation in progress" flag.
///
/// Clones observe the same flag, so an external change detector can hold one
/// and skip its own raw signal while the store is mutating. A detector that
/// must exist before the store does creates the flag and hands it to
/// [`StoreBuilder::mutation_flag`].
#[derive(Debug, Clone, Default)]
pub struct MutationFlag(Rc<Cell<usize>>);

impl MutationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_set(&self) -> bool {
        self.0.get() > 0
    }

    fn raise(&self) -> FlagGuard {
        self.0.set(self.0.get() + 1);
        FlagGuard(self.clone())
    }
}

/// Lowers the flag on drop, including when a subscriber panics.
struct FlagGuard(MutationFlag);

impl Drop for FlagGuard {
    fn drop(&mut self) {
        let depth = &self.0 .0;
        depth.set(depth.get().saturating_sub(1));
    }
}

// ── Store ─────────────────────────────────────────────────────────────────

/// Outcome of [`Store::perform`].
#[derive(Debug, Clone, PartialEq)]
pub struct Performed {
    pub return_values: MutationResult,
    pub inverse: Mutator,
}

type StateFactory = Rc<dyn Fn() -> Object>;

pub struct Store {
    id: String,
    state: Object,
    factory: StateFactory,
    bus: NotificationBus,
    mutating: MutationFlag,
    computed: IndexMap<String, ComputedProperty>,
    actions: IndexMap<String, Action>,
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("computed", &self.computed.keys().collect::<Vec<_>>())
            .field("actions", &self.actions.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn value_at<'a>(root: &'a Object, path: &[String]) -> Result<&'a Value, StoreError> {
    validate_path(path)?;
    let Some((first, rest)) = path.split_first() else {
        return Err(StoreError::NotAnObject(String::new()));
    };
    root.get(first)
        .and_then(|child| resolve(child, rest).ok())
        .ok_or_else(|| StoreError::TargetNotFound(format_pointer(path)))
}

fn value_at_mut<'a>(root: &'a mut Object, path: &[String]) -> Result<&'a mut Value, StoreError> {
    validate_path(path)?;
    let Some((first, rest)) = path.split_first() else {
        return Err(StoreError::NotAnObject(String::new()));
    };
    root.get_mut(first)
        .and_then(|child| resolve_mut(child, rest).ok())
        .ok_or_else(|| StoreError::TargetNotFound(format_pointer(path)))
}

fn object_at_mut<'a>(root: &'a mut Object, path: &[String]) -> Result<&'a mut Object, StoreError> {
    if path.is_empty() {
        return Ok(root);
    }
    match value_at_mut(root, path)? {
        Value::Object(obj) => Ok(obj),
        _ => Err(StoreError::NotAnObject(format_pointer(path))),
    }
}

impl Store {
    pub fn builder(id: impl Into<String>) -> StoreBuilder {
        StoreBuilder::new(id)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> &Object {
        &self.state
    }

    /// Handle to the flag raised while an engine mutates the state.
    pub fn mutation_flag(&self) -> MutationFlag {
        self.mutating.clone()
    }

    // ── Patch ─────────────────────────────────────────────────────────────

    /// Patches the root state and returns the inverse patch.
    pub fn patch(&mut self, patch: Patch) -> Patch {
        let _flag = self.mutating.raise();
        let old_values = apply_patch(&mut self.state, &patch);
        self.emit(StoreEvent::Patch {
            target: Path::new(),
            patch,
            old_values: old_values.clone(),
        });
        old_values
    }

    /// Patches the object at `target`.
    ///
    /// # Errors
    ///
    /// `TargetNotFound` or `NotAnObject` when `target` does not address an
    /// object. Nothing is applied or notified in that case.
    pub fn patch_at(&mut self, target: &[String], patch: Patch) -> Result<Patch, StoreError> {
        let obj = object_at_mut(&mut self.state, target)?;
        let _flag = self.mutating.raise();
        let old_values = apply_patch(obj, &patch);
        self.emit(StoreEvent::Patch {
            target: target.to_vec(),
            patch,
            old_values: old_values.clone(),
        });
        Ok(old_values)
    }

    /// Decodes a JSON patch and applies it to the root state.
    pub fn patch_json(&mut self, patch: &serde_json::Value) -> Result<Patch, StoreError> {
        let patch = decode_patch(patch)?;
        Ok(self.patch(patch))
    }

    // ── Perform ───────────────────────────────────────────────────────────

    /// Applies `mutator` to the root state.
    pub fn perform(&mut self, mutator: Mutator) -> Performed {
        let _flag = self.mutating.raise();
        let (return_values, inverse) = perform_object_mutation(&mut self.state, &mutator);
        self.emit(StoreEvent::Perform {
            target: Path::new(),
            mutation: mutator,
            inverse: inverse.clone(),
        });
        Performed {
            return_values,
            inverse,
        }
    }

    /// Applies `mutator` to the value at `target`.
    pub fn perform_at(&mut self, target: &[String], mutator: Mutator) -> Result<Performed, StoreError> {
        if target.is_empty() {
            return Ok(self.perform(mutator));
        }
        let value = value_at_mut(&mut self.state, target)?;
        let _flag = self.mutating.raise();
        let (return_values, inverse) = perform_mutation(value, &mutator);
        self.emit(StoreEvent::Perform {
            target: target.to_vec(),
            mutation: mutator,
            inverse: inverse.clone(),
        });
        Ok(Performed {
            return_values,
            inverse,
        })
    }

    /// Decodes a JSON descriptor against the root state and performs it.
    ///
    /// ```
    /// use carnac::{encode_mutator, Store};
    /// use carnac_value::Value;
    /// use serde_json::json;
    ///
    /// let mut store = Store::builder("demo")
    ///     .state(|| [("arr".to_string(), Value::Array(vec![]))].into_iter().collect())
    ///     .build();
    /// let done = store.perform_json(&json!({"arr": {"push": [1, 2]}})).unwrap();
    /// assert_eq!(encode_mutator(&done.inverse), json!({"arr": {"splice": [0, 2]}}));
    /// ```
    pub fn perform_json(&mut self, descriptor: &serde_json::Value) -> Result<Performed, StoreError> {
        let mutator = decode_object_mutator(&self.state, descriptor)?;
        Ok(self.perform(mutator))
    }

    pub fn perform_json_at(
        &mut self,
        target: &[String],
        descriptor: &serde_json::Value,
    ) -> Result<Performed, StoreError> {
        let mutator = if target.is_empty() {
            decode_object_mutator(&self.state, descriptor)?
        } else {
            decode_mutator(value_at(&self.state, target)?, descriptor)?
        };
        self.perform_at(target, mutator)
    }

    // ── Notification ──────────────────────────────────────────────────────

    pub fn subscribe<F>(&self, callback: F) -> Unsubscribe
    where
        F: Fn(&StoreEvent, &Object) + 'static,
    {
        self.bus.subscribe(callback)
    }

    pub fn subscribers(&self) -> SubscriberRegistry {
        self.bus.registry()
    }

    /// Raises a caller-declared event.
    pub fn notify(&mut self, event: StoreEvent) {
        self.emit(event);
    }

    fn emit(&mut self, event: StoreEvent) {
        self.bus.notify(event, &self.state);
    }

    /// Runs `scope` with notifications collected, then raises one batch
    /// event carrying them in order.
    ///
    /// `scope` may return [`EventFields`](crate::EventFields) to retag the
    /// batch event or add data to it.
    ///
    /// If `scope` panics, its collector is closed and its events are dropped
    /// before the panic resumes.
    pub fn batch<F, R>(&mut self, scope: F)
    where
        F: FnOnce(&mut Store) -> R,
        R: IntoEventFields,
    {
        self.bus.push_collector();
        let fields = match panic::catch_unwind(AssertUnwindSafe(|| scope(self))) {
            Ok(fields) => fields.into_event_fields(),
            Err(payload) => {
                self.bus.pop_collector();
                panic::resume_unwind(payload);
            }
        };
        let events = self.bus.pop_collector().unwrap_or_default();
        let mut event = BatchEvent::new(events);
        if let Some(fields) = fields {
            event.merge(fields);
        }
        self.emit(StoreEvent::Batch(event));
    }

    pub fn batch_depth(&self) -> usize {
        self.bus.batch_depth()
    }

    // ── Raw changes ───────────────────────────────────────────────────────

    /// Signals a change made outside the engines.
    ///
    /// Engines hold the store exclusively while the mutation flag is up, so
    /// this never overlaps an engine call. Detectors that observe the state
    /// from outside check [`MutationFlag::is_set`] instead.
    pub fn raw_changed(&mut self) {
        self.emit(StoreEvent::Raw);
    }

    /// Mutates the state directly and signals `raw`.
    pub fn update<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut Object) -> R,
    {
        let out = f(&mut self.state);
        self.raw_changed();
        out
    }

    /// Rebuilds the state from the factory.
    pub fn reset(&mut self) {
        self.state = (self.factory)();
        self.raw_changed();
    }

    // ── Computed & actions ────────────────────────────────────────────────

    pub fn computed(&self, name: &str) -> Result<Value, StoreError> {
        let prop = self
            .computed
            .get(name)
            .ok_or_else(|| StoreError::UnknownComputed(name.to_string()))?;
        Ok(prop.get(&ComputedContext::new(&self.state, &self.computed)))
    }

    /// Writes a writable computed property and raises a `computed` event.
    pub fn set_computed(&mut self, name: &str, value: impl Into<Value>) -> Result<(), StoreError> {
        let setter = self
            .computed
            .get(name)
            .ok_or_else(|| StoreError::UnknownComputed(name.to_string()))?
            .setter()
            .ok_or_else(|| StoreError::ReadOnlyComputed(name.to_string()))?;
        let value = value.into();
        let old_value = self.computed(name)?;
        let _flag = self.mutating.raise();
        setter(&mut self.state, value.clone());
        self.emit(StoreEvent::Computed {
            name: name.to_string(),
            value,
            old_value,
        });
        Ok(())
    }

    /// Runs a named action with the store and `args`.
    pub fn dispatch(&mut self, name: &str, args: &[Value]) -> Result<Value, StoreError> {
        let action = self
            .actions
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::UnknownAction(name.to_string()))?;
        Ok(action(self, args))
    }
}

// ── Builder ───────────────────────────────────────────────────────────────

/// Configures a [`Store`].
pub struct StoreBuilder {
    id: String,
    factory: StateFactory,
    mutating: MutationFlag,
    computed: IndexMap<String, ComputedProperty>,
    actions: IndexMap<String, Action>,
}

impl StoreBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            factory: Rc::new(Object::new),
            mutating: MutationFlag::new(),
            computed: IndexMap::new(),
            actions: IndexMap::new(),
        }
    }

    /// Sets the state factory, called on build and on every reset.
    pub fn state<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Object + 'static,
    {
        self.factory = Rc::new(factory);
        self
    }

    /// Shares `flag` with the store instead of creating a fresh one.
    pub fn mutation_flag(mut self, flag: MutationFlag) -> Self {
        self.mutating = flag;
        self
    }

    pub fn computed<G>(mut self, name: impl Into<String>, getter: G) -> Self
    where
        G: Fn(&ComputedContext<'_>) -> Value + 'static,
    {
        self.computed.insert(name.into(), ComputedProperty::new(getter));
        self
    }

    pub fn writable_computed<G, S>(mut self, name: impl Into<String>, getter: G, setter: S) -> Self
    where
        G: Fn(&ComputedContext<'_>) -> Value + 'static,
        S: Fn(&mut Object, Value) + 'static,
    {
        self.computed
            .insert(name.into(), ComputedProperty::writable(getter, setter));
        self
    }

    pub fn action<F>(mut self, name: impl Into<String>, action: F) -> Self
    where
        F: Fn(&mut Store, &[Value]) -> Value + 'static,
    {
        self.actions.insert(name.into(), Rc::new(action));
        self
    }

    pub fn build(self) -> Store {
        Store {
            id: self.id,
            state: (self.factory)(),
            factory: self.factory,
            bus: NotificationBus::new(),
            mutating: self.mutating,
            computed: self.computed,
            actions: self.actions,
        }
    }
}
