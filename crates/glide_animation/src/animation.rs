//! Property animations
//!
//! An [`Animation`] drives a set of [`Tween`]s on one target object. While it
//! runs, a frame source on the reactor calls [`Animation::tick`] at the
//! configured frame rate; each tick computes the eased progress, writes every
//! tween's value to the target in registration order, then notifies
//! observers.
//!
//! Lifecycle: `Idle -> Running` on [`start`](Animation::start), back to `Idle`
//! on [`stop`](Animation::stop) or when progress reaches 1.0.
//!
//! Ownership: the caller owns the handle. While running, the frame source
//! holds a second handle and the animation holds a strong reference to its
//! target, so a started animation can be dropped by the caller and still run
//! to completion. Both extra references go away on the transition to `Idle`.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use glide_core::reactor::{ControlFlow, Priority, Reactor, SourceId};
use glide_core::{
    Clock, EventDispatcher, ObserverId, PropertyKind, PropertyRef, PropertyStore, ReactorError,
    SharedStore, Value,
};
use smallvec::SmallVec;

use crate::config::{AnimationConfig, DEFAULT_FRAME_RATE};
use crate::easing::Easing;
use crate::error::{AnimationError, Result};
use crate::frame_source::add_frame_source_full;
use crate::tween::{Interpolation, Tween};

/// Notifications emitted by an animation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationEvent {
    Started,
    /// All property writes for the frame are done
    Tick,
    /// Back to idle. `completed` is false for an explicit `stop()`.
    Stopped { completed: bool },
}

struct State {
    tweens: SmallVec<[Tween; 4]>,
    // Strong target reference, held only while running
    keep_alive: Option<SharedStore>,
    source: Option<SourceId>,
    begin_ms: u64,
    frame_count: u64,
}

struct Inner {
    config: AnimationConfig,
    clock: Rc<dyn Clock>,
    reactor: Weak<dyn Reactor>,
    target: Weak<RefCell<dyn PropertyStore>>,
    state: RefCell<State>,
    observers: EventDispatcher<AnimationEvent>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        if self.config.debug {
            tracing::info!(
                "rendered {} frames in {} msec animation",
                self.state.get_mut().frame_count,
                self.config.duration_ms
            );
        }
    }
}

/// Handle to a property animation
#[derive(Clone)]
pub struct Animation {
    inner: Rc<Inner>,
}

impl Animation {
    /// Create an idle animation of `target` driven by `reactor`
    pub fn new(
        reactor: Rc<dyn Reactor>,
        target: SharedStore,
        config: AnimationConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            inner: Rc::new(Inner {
                config,
                clock: reactor.clock(),
                reactor: Rc::downgrade(&reactor),
                target: Rc::downgrade(&target),
                state: RefCell::new(State {
                    tweens: SmallVec::new(),
                    keep_alive: None,
                    source: None,
                    begin_ms: 0,
                    frame_count: 0,
                }),
                observers: EventDispatcher::new(),
            }),
        })
    }

    pub fn builder(target: SharedStore) -> AnimationBuilder {
        AnimationBuilder::new(target)
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.inner.config
    }

    /// Whether a frame source is registered
    pub fn is_running(&self) -> bool {
        self.inner.state.borrow().source.is_some()
    }

    /// Snapshot of the registered tweens, in write order
    pub fn tweens(&self) -> Vec<Tween> {
        self.inner.state.borrow().tweens.to_vec()
    }

    /// Frames rendered over the animation's lifetime
    pub fn frame_count(&self) -> u64 {
        self.inner.state.borrow().frame_count
    }

    /// Linear progress through the current run, `None` while idle
    pub fn progress(&self) -> Option<f64> {
        let state = self.inner.state.borrow();
        state.source?;
        Some(offset(
            state.begin_ms,
            self.inner.clock.now_ms(),
            self.inner.config.duration_ms,
        ))
    }

    /// Animate `name` to `value`
    ///
    /// The name is looked up on the target first, then on the target's
    /// relation as a child property.
    pub fn add_property(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        self.ensure_idle()?;
        let target = self.target()?;
        let property = target.borrow().resolve(name)?;
        self.push_tween(property, value.into())
    }

    /// Animate an explicitly resolved property to `value`
    ///
    /// The reference must match the property the target actually declares.
    pub fn add_property_ref(&self, property: PropertyRef, value: impl Into<Value>) -> Result<()> {
        self.ensure_idle()?;
        let target = self.target()?;
        let declared = {
            let store = target.borrow();
            match property.kind {
                PropertyKind::Direct => store
                    .find_property(&property.name)
                    .ok_or_else(|| AnimationError::PropertyNotFound(property.name.clone()))?,
                PropertyKind::Child => store.find_child_property(&property.name)?,
            }
        };
        if declared != property.value_type {
            return Err(AnimationError::TypeMismatch {
                name: property.name,
                expected: declared,
                actual: property.value_type,
            });
        }
        self.push_tween(property, value.into())
    }

    /// Capture begin values and arm the frame source
    pub fn start(&self) -> Result<()> {
        if self.is_running() {
            return Err(AnimationError::InvalidState("animation is already running"));
        }
        let target = self.target()?;
        let reactor = self
            .inner
            .reactor
            .upgrade()
            .ok_or(AnimationError::Registration(ReactorError::Gone))?;

        let begins = {
            let state = self.inner.state.borrow();
            let store = target.borrow();
            let begins: SmallVec<[Value; 4]> = state
                .tweens
                .iter()
                .map(|tween| read_begin(&*store, tween.property()))
                .collect::<Result<_>>()?;
            begins
        };

        let begin_ms = self.inner.clock.now_ms();
        let config = self.inner.config;
        let animation = self.clone();
        let source = add_frame_source_full(
            &*reactor,
            config.priority,
            config.frame_rate,
            move || animation.tick(),
        )?;

        {
            let mut state = self.inner.state.borrow_mut();
            for (tween, begin) in state.tweens.iter_mut().zip(begins) {
                tween.set_begin(begin);
            }
            state.begin_ms = begin_ms;
            state.keep_alive = Some(target);
            state.source = Some(source);
            tracing::debug!(
                tweens = state.tweens.len(),
                duration_ms = config.duration_ms,
                frame_rate = config.frame_rate,
                easing = %config.easing,
                "animation started"
            );
        }

        self.inner.observers.emit(&AnimationEvent::Started);
        Ok(())
    }

    /// Cancel the frame source and return to idle. No-op when idle.
    pub fn stop(&self) {
        self.finish(false);
    }

    /// Render one frame
    ///
    /// Called by the frame source. Returns [`ControlFlow::Break`] once the
    /// animation has completed (or is not running).
    pub fn tick(&self) -> ControlFlow {
        let now = self.inner.clock.now_ms();
        let config = &self.inner.config;

        let (run, progress, writes, target) = {
            let mut state = self.inner.state.borrow_mut();
            let (Some(run), Some(target)) = (state.source, state.keep_alive.clone()) else {
                return ControlFlow::Break;
            };
            state.frame_count += 1;

            let progress = offset(state.begin_ms, now, config.duration_ms);
            let alpha = config.easing.apply(progress);
            let writes: SmallVec<[(PropertyRef, Value); 4]> = state
                .tweens
                .iter()
                .filter_map(|t| t.value_at(alpha).map(|v| (t.property().clone(), v)))
                .collect();

            tracing::trace!(progress, alpha, writes = writes.len(), "animation tick");
            (run, progress, writes, target)
        };

        {
            let mut store = target.borrow_mut();
            for (property, value) in writes {
                if let Err(err) = store.set(&property, value) {
                    tracing::warn!(property = %property.name, "skipping property write: {}", err);
                }
            }
        }
        drop(target);

        self.inner.observers.emit(&AnimationEvent::Tick);

        // A handler may have stopped this run, and possibly started another
        if self.inner.state.borrow().source != Some(run) {
            return ControlFlow::Break;
        }
        if progress < 1.0 {
            ControlFlow::Continue
        } else {
            self.finish(true);
            ControlFlow::Break
        }
    }

    /// Register an event handler
    pub fn connect<F>(&self, handler: F) -> ObserverId
    where
        F: FnMut(&AnimationEvent) + 'static,
    {
        self.inner.observers.connect(handler)
    }

    pub fn disconnect(&self, id: ObserverId) -> bool {
        self.inner.observers.disconnect(id)
    }

    /// Run `f` after every frame's property writes
    pub fn on_tick<F>(&self, mut f: F) -> ObserverId
    where
        F: FnMut() + 'static,
    {
        self.connect(move |event| {
            if *event == AnimationEvent::Tick {
                f();
            }
        })
    }

    /// Run `f` once, the first time the animation returns to idle
    ///
    /// `f` receives whether the animation ran to completion.
    pub fn on_finished<F>(&self, f: F) -> ObserverId
    where
        F: FnOnce(bool) + 'static,
    {
        let mut f = Some(f);
        self.connect(move |event| {
            if let AnimationEvent::Stopped { completed } = *event {
                if let Some(f) = f.take() {
                    f(completed);
                }
            }
        })
    }

    fn finish(&self, completed: bool) {
        let (source, keep_alive) = {
            let mut state = self.inner.state.borrow_mut();
            let Some(source) = state.source.take() else {
                return;
            };
            for tween in state.tweens.iter_mut() {
                tween.clear_begin();
            }
            (source, state.keep_alive.take())
        };

        if let Some(reactor) = self.inner.reactor.upgrade() {
            reactor.remove_source(source);
        }
        drop(keep_alive);

        tracing::debug!(completed, "animation stopped");
        self.inner
            .observers
            .emit(&AnimationEvent::Stopped { completed });
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.is_running() {
            return Err(AnimationError::InvalidState(
                "properties cannot be added while running",
            ));
        }
        Ok(())
    }

    fn target(&self) -> Result<SharedStore> {
        self.inner
            .target
            .upgrade()
            .ok_or(AnimationError::InvalidState("animation target has been released"))
    }

    fn push_tween(&self, property: PropertyRef, end: Value) -> Result<()> {
        let interpolation = Interpolation::for_type(property.value_type).ok_or_else(|| {
            AnimationError::UnsupportedPropertyType {
                name: property.name.clone(),
                value_type: property.value_type,
            }
        })?;
        let actual = end.value_type();
        if actual != property.value_type {
            return Err(AnimationError::TypeMismatch {
                name: property.name,
                expected: property.value_type,
                actual,
            });
        }

        tracing::trace!(property = %property.name, child = property.is_child(), "tween added");
        self.inner
            .state
            .borrow_mut()
            .tweens
            .push(Tween::new(property, interpolation, end));
        Ok(())
    }
}

impl fmt::Debug for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("Animation")
            .field("config", &self.inner.config)
            .field("tweens", &state.tweens.len())
            .field("running", &state.source.is_some())
            .field("frame_count", &state.frame_count)
            .finish()
    }
}

/// Linear progress, clamped to `[0, 1]`. A zero duration is complete immediately.
fn offset(begin_ms: u64, now_ms: u64, duration_ms: u32) -> f64 {
    if duration_ms == 0 {
        return 1.0;
    }
    let elapsed = now_ms.saturating_sub(begin_ms) as f64;
    (elapsed / f64::from(duration_ms)).clamp(0.0, 1.0)
}

fn read_begin(store: &dyn PropertyStore, property: &PropertyRef) -> Result<Value> {
    let value = store.get(property)?;
    let actual = value.value_type();
    if actual != property.value_type {
        return Err(AnimationError::TypeMismatch {
            name: property.name.clone(),
            expected: property.value_type,
            actual,
        });
    }
    Ok(value)
}

/// Builder for [`Animation`]
pub struct AnimationBuilder {
    target: SharedStore,
    config: AnimationConfig,
}

impl AnimationBuilder {
    pub fn new(target: SharedStore) -> Self {
        Self {
            target,
            config: AnimationConfig::default(),
        }
    }

    /// Replace every setting at once
    pub fn config(mut self, config: AnimationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn duration_ms(mut self, duration_ms: u32) -> Self {
        self.config.duration_ms = duration_ms;
        self
    }

    pub fn frame_rate(mut self, frame_rate: u32) -> Self {
        self.config.frame_rate = frame_rate;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.config.easing = easing;
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.config.priority = priority;
        self
    }

    /// Log frame statistics when the animation is dropped
    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    pub fn build<R: Reactor + 'static>(self, reactor: &Rc<R>) -> Result<Animation> {
        let reactor: Rc<dyn Reactor> = reactor.clone();
        Animation::new(reactor, self.target, self.config)
    }
}

/// Animate `props` on `target` and start immediately
///
/// Each `(name, value)` pair is resolved like [`Animation::add_property`].
/// Nothing is started if any property fails to register.
pub fn animate<R, I, N, V>(
    reactor: &Rc<R>,
    target: SharedStore,
    easing: Easing,
    duration_ms: u32,
    props: I,
) -> Result<Animation>
where
    R: Reactor + 'static,
    I: IntoIterator<Item = (N, V)>,
    N: AsRef<str>,
    V: Into<Value>,
{
    let config = AnimationConfig {
        easing,
        duration_ms,
        ..AnimationConfig::default()
    };
    animate_with(reactor, target, config, props, None::<fn(bool)>)
}

/// [`animate`] with full configuration and a completion callback
///
/// A `frame_rate` of 0 selects the default rate. `on_finished` runs once when
/// the animation returns to idle.
pub fn animate_full<R, I, N, V, F>(
    reactor: &Rc<R>,
    target: SharedStore,
    config: AnimationConfig,
    props: I,
    on_finished: F,
) -> Result<Animation>
where
    R: Reactor + 'static,
    I: IntoIterator<Item = (N, V)>,
    N: AsRef<str>,
    V: Into<Value>,
    F: FnOnce(bool) + 'static,
{
    animate_with(reactor, target, config, props, Some(on_finished))
}

fn animate_with<R, I, N, V, F>(
    reactor: &Rc<R>,
    target: SharedStore,
    mut config: AnimationConfig,
    props: I,
    on_finished: Option<F>,
) -> Result<Animation>
where
    R: Reactor + 'static,
    I: IntoIterator<Item = (N, V)>,
    N: AsRef<str>,
    V: Into<Value>,
    F: FnOnce(bool) + 'static,
{
    if config.frame_rate == 0 {
        config.frame_rate = DEFAULT_FRAME_RATE;
    }
    let animation = AnimationBuilder::new(target).config(config).build(reactor)?;
    for (name, value) in props {
        animation.add_property(name.as_ref(), value)?;
    }
    if let Some(f) = on_finished {
        animation.on_finished(f);
    }
    animation.start()?;
    Ok(animation)
}
