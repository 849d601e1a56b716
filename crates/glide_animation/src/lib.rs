//! Glide Animation System
//!
//! Frame-rate-adaptive property tweens.
//!
//! # Features
//!
//! - **Adaptive Frame Timing**: frame sources compensate for time spent in the
//!   callback and drop missed frames instead of replaying them
//! - **Easing**: closed set of quad/cubic easing curves
//! - **Tweens**: numeric interpolation, snap-at-completion for other types
//! - **Lifecycle**: start/stop with observer notification
//!
//! # Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use glide_animation::{Animation, Easing};
//! use glide_core::{MainLoop, ManualClock, PropertyMap, Value};
//!
//! let clock = Rc::new(ManualClock::new(0));
//! let main_loop = Rc::new(MainLoop::new(clock.clone()));
//! let target = Rc::new(RefCell::new(PropertyMap::new().with("x", 0i32)));
//!
//! let animation = Animation::builder(target.clone())
//!     .duration_ms(100)
//!     .easing(Easing::EaseOutQuad)
//!     .build(&main_loop)
//!     .unwrap();
//! animation.add_property("x", 40).unwrap();
//! animation.start().unwrap();
//!
//! main_loop.run();
//! assert_eq!(target.borrow().value("x"), Some(&Value::Int(40)));
//! assert!(!animation.is_running());
//! ```

pub mod animation;
pub mod config;
pub mod easing;
pub mod error;
pub mod frame_source;
pub mod tween;

pub use animation::{animate, animate_full, Animation, AnimationBuilder, AnimationEvent};
pub use config::AnimationConfig;
pub use easing::Easing;
pub use error::{AnimationError, Result};
pub use frame_source::{add_frame_source, add_frame_source_full, FrameSource, FrameTimer};
pub use tween::{Interpolation, Tween};
