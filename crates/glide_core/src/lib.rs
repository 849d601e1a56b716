//! Glide Core Runtime
//!
//! The collaborators an animation needs from its host:
//!
//! - **Clocks**: monotonic millisecond time, real or manual
//! - **Reactor**: a polled event loop with prioritized, cancellable sources
//! - **Property Stores**: typed get/set by name, direct or through a relation
//! - **Event Dispatch**: single-threaded observer notification
//!
//! # Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use glide_core::{PropertyMap, PropertyStore, Value};
//!
//! let slot = Rc::new(RefCell::new(PropertyMap::new().with("padding", 4u32)));
//! let mut label = PropertyMap::new().with("opacity", 1.0f64).with_relation(slot);
//!
//! let padding = label.resolve("padding").unwrap();
//! assert!(padding.is_child());
//! label.set(&padding, Value::UInt(8)).unwrap();
//! assert_eq!(label.get(&padding), Ok(Value::UInt(8)));
//! ```

pub mod clock;
pub mod error;
pub mod events;
pub mod property;
pub mod reactor;
pub mod value;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{PropertyError, ReactorError};
pub use events::{EventDispatcher, ObserverId};
pub use property::{PropertyKind, PropertyMap, PropertyRef, PropertyStore, SharedStore};
pub use reactor::{
    priority, ControlFlow, Iteration, MainLoop, Priority, Reactor, Readiness, Source, SourceId,
};
pub use value::{CustomType, CustomValue, Value, ValueType};
