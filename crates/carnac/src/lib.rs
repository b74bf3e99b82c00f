//! carnac - mutation, inverse and change-notification core for a structured
//! state container.
//!
//! - [`apply_patch`] assigns a [`Patch`] into a state tree and returns the
//!   inverse patch of prior values.
//! - [`perform_mutation`] applies a [`Mutator`] to nested sequences, maps and
//!   sets, returning the operations' results and an inverse mutator.
//! - [`NotificationBus`] dispatches [`StoreEvent`]s to subscribers in order
//!   and aggregates nested batches into composite events.
//! - [`Store`] owns a state tree and wires all three together.
//!
//! Misuse (unknown operations, operations that do not fit their target,
//! closing a batch that was never opened) is reported through `tracing`
//! warnings and never fails the call.
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use carnac::{Patch, Store};
//! use carnac_value::Value;
//! use serde_json::json;
//!
//! let mut store = Store::builder("demo")
//!     .state(|| [("a".to_string(), Value::from(1))].into_iter().collect())
//!     .build();
//!
//! let kinds = Rc::new(RefCell::new(Vec::new()));
//! let sink = kinds.clone();
//! store.subscribe(move |evt, _| sink.borrow_mut().push(evt.to_json()));
//!
//! store.batch(|s| {
//!     s.patch(Patch::new().set("a", 2));
//! });
//!
//! assert_eq!(
//!     kinds.borrow()[0],
//!     json!({"type": "batch", "events": [{
//!         "type": "patch",
//!         "target": "",
//!         "patch": {"a": 2},
//!         "oldValues": {"a": 1},
//!     }]})
//! );
//! ```

pub mod bus;
pub mod codec;
pub mod computed;
pub mod error;
pub mod events;
pub mod mutator;
pub mod patch;
pub mod perform;
pub mod store;

pub use bus::{NotificationBus, SubscriberRegistry, Unsubscribe};
pub use codec::{decode_mutator, decode_patch, encode_mutator, encode_patch, CodecError};
pub use computed::{ComputedContext, ComputedProperty};
pub use error::StoreError;
pub use events::{BatchEvent, EventFields, IntoEventFields, StoreEvent};
pub use mutator::{Comparator, MutationResult, Mutator, Op, OpResult};
pub use patch::{apply_patch, Patch, PatchEntry};
pub use perform::{perform_mutation, perform_object_mutation};
pub use store::{MutationFlag, Performed, Store, StoreBuilder};
