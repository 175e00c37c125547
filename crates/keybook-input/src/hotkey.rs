//! A single hotkey binding.

use std::{cell::Cell, fmt, rc::Rc, time::Duration};

use keybook_core::{ActionError, KeyState, Source, Timestamp};

use crate::{
    ErrorContext, ErrorHandler, Origin,
    dispatch::invoke,
    timer::RepeatTimer,
};

/// Bound action. Receives the registry's context mutably.
pub type Action<C> = Rc<dyn Fn(&mut C) -> Result<(), ActionError>>;

/// Predicate deciding whether a hotkey may fire right now.
pub type Guard<C> = Rc<dyn Fn(&C) -> bool>;

/// Binding from a [`KeyState`] to an action.
///
/// One-shot hotkeys run once per press. Repeating hotkeys run on press (unless
/// they fired less than one interval ago) and then every interval while the
/// key stays held.
pub struct Hotkey<C, I = std::time::Instant> {
    trigger: KeyState,
    action: Action<C>,
    interval: Option<Duration>,
    guard: Option<Guard<C>>,
    title: Option<Source<String>>,
    last_fired_at: Option<I>,
    timer: Option<RepeatTimer<I>>,
}

impl<C, I: Timestamp> Hotkey<C, I> {
    /// Create a one-shot hotkey.
    pub fn new(
        trigger: KeyState,
        action: impl Fn(&mut C) -> Result<(), ActionError> + 'static,
    ) -> Self {
        Self {
            trigger,
            action: Rc::new(action),
            interval: None,
            guard: None,
            title: None,
            last_fired_at: None,
            timer: None,
        }
    }

    /// Repeat every `interval` while held.
    ///
    /// A zero interval is ignored and the hotkey stays one-shot.
    #[must_use]
    pub fn repeating(mut self, interval: Duration) -> Self {
        if interval.is_zero() {
            tracing::warn!(trigger = %self.trigger, "zero repeat interval ignored");
        } else {
            self.interval = Some(interval);
        }
        self
    }

    /// Only fire while `guard` returns true.
    #[must_use]
    pub fn guard(mut self, guard: impl Fn(&C) -> bool + 'static) -> Self {
        self.guard = Some(Rc::new(guard));
        self
    }

    /// Display title for help listings.
    #[must_use]
    pub fn title(mut self, title: impl Into<Source<String>>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Display title computed each time it is read.
    #[must_use]
    pub fn computed_title(mut self, title: impl Fn() -> String + 'static) -> Self {
        self.title = Some(Source::computed(title));
        self
    }

    /// Key state that triggers this hotkey.
    pub fn trigger(&self) -> &KeyState {
        &self.trigger
    }

    /// Repeat interval. `None` for one-shot hotkeys.
    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    /// True if this hotkey auto-repeats while held.
    pub fn is_repeating(&self) -> bool {
        self.interval.is_some()
    }

    /// Resolved title. `None` if no title was set.
    pub fn resolve_title(&self) -> Option<String> {
        self.title.as_ref().map(Source::resolve)
    }

    /// Title source, for callers that resolve it later.
    pub fn title_source(&self) -> Option<&Source<String>> {
        self.title.as_ref()
    }

    /// When the action last ran. `None` if it never has.
    pub fn last_fired_at(&self) -> Option<I> {
        self.last_fired_at
    }

    /// Armed repeat timer. `None` unless the key is held and repeating.
    pub fn timer(&self) -> Option<&RepeatTimer<I>> {
        self.timer.as_ref()
    }

    /// Closure re-running this hotkey from outside the key path (a menu line).
    ///
    /// The guard still applies and failures are routed to `on_error` with
    /// [`Origin::Menu`]; the closure itself always returns `Ok`. The "key is
    /// held" check is skipped since the trigger key is not what invoked it.
    ///
    /// A call made while the same closure is still running (an action that
    /// re-activates the line it was started from) is reported as a failure
    /// instead of recursing.
    pub fn invoker(
        &self,
        on_error: ErrorHandler,
    ) -> impl Fn(&mut C) -> Result<(), ActionError> + use<C, I>
    where
        C: 'static,
    {
        let action = Rc::clone(&self.action);
        let guard = self.guard.clone();
        let running = Cell::new(false);
        let context = ErrorContext {
            trigger: self.trigger.clone(),
            title: self.resolve_title(),
            origin: Origin::Menu,
        };

        move |ctx: &mut C| {
            if let Some(guard) = &guard
                && !guard(&*ctx)
            {
                return Ok(());
            }
            if running.replace(true) {
                on_error(&ActionError::msg("hotkey re-entered from its own action"), &context);
                return Ok(());
            }
            let result = invoke(action.as_ref(), ctx);
            running.set(false);
            if let Err(error) = result {
                on_error(&error, &context);
            }
            Ok(())
        }
    }

    pub(crate) fn guard_passes(&self, ctx: &C) -> bool {
        self.guard.as_ref().is_none_or(|guard| guard(ctx))
    }

    /// Handle the initial press. Guard has already been checked by the caller.
    pub(crate) fn press(&mut self, ctx: &mut C, now: I, on_error: &ErrorHandler) {
        let Some(interval) = self.interval else {
            self.execute(ctx, now, Origin::Press, on_error);
            return;
        };

        let stale = self.last_fired_at.is_none_or(|last| now - last > interval);
        if stale {
            self.execute(ctx, now, Origin::Press, on_error);
        }
        self.timer = Some(RepeatTimer::start(now, interval));
    }

    /// Fire the repeat timer if due. Skips the action (but keeps the timer on
    /// schedule) when the key is no longer held or the guard fails.
    pub(crate) fn tick(&mut self, ctx: &mut C, now: I, held: bool, on_error: &ErrorHandler) {
        let Some(timer) = self.timer.as_mut() else {
            return;
        };
        if !timer.is_due(now) {
            return;
        }
        timer.advance(now);

        if !held || !self.guard_passes(ctx) {
            tracing::trace!(trigger = %self.trigger, held, "repeat skipped");
            return;
        }
        self.execute(ctx, now, Origin::Repeat, on_error);
    }

    pub(crate) fn cancel_timer(&mut self) {
        if self.timer.take().is_some() {
            tracing::trace!(trigger = %self.trigger, "repeat timer cancelled");
        }
    }

    fn execute(&mut self, ctx: &mut C, now: I, origin: Origin, on_error: &ErrorHandler) {
        self.last_fired_at = Some(now);
        tracing::debug!(trigger = %self.trigger, %origin, "hotkey fired");

        if let Err(error) = invoke(self.action.as_ref(), ctx) {
            let context =
                ErrorContext { trigger: self.trigger.clone(), title: self.resolve_title(), origin };
            on_error(&error, &context);
        }
    }
}

impl<C, I: fmt::Debug> fmt::Debug for Hotkey<C, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hotkey")
            .field("trigger", &self.trigger)
            .field("interval", &self.interval)
            .field("guarded", &self.guard.is_some())
            .field("title", &self.title)
            .field("last_fired_at", &self.last_fired_at)
            .field("timer", &self.timer)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, time::Instant};

    use super::*;

    #[test]
    fn title_sources() {
        let hotkey: Hotkey<(), Instant> =
            Hotkey::new(KeyState::plain('q'), |_| Ok(())).title("Quit");
        assert_eq!(hotkey.resolve_title().as_deref(), Some("Quit"));

        let untitled: Hotkey<(), Instant> = Hotkey::new(KeyState::plain('q'), |_| Ok(()));
        assert_eq!(untitled.resolve_title(), None);
    }

    #[test]
    fn zero_interval_stays_one_shot() {
        let hotkey: Hotkey<(), Instant> =
            Hotkey::new(KeyState::plain('q'), |_| Ok(())).repeating(Duration::ZERO);
        assert!(!hotkey.is_repeating());
    }

    #[test]
    fn invoker_respects_guard_and_isolates_errors() {
        let failures = Rc::new(RefCell::new(Vec::new()));
        let on_error: ErrorHandler = {
            let failures = Rc::clone(&failures);
            Rc::new(move |error: &ActionError, context: &ErrorContext| {
                failures.borrow_mut().push((error.to_string(), context.origin));
            })
        };

        let hotkey = Hotkey::<bool, Instant>::new(KeyState::plain('x'), |_| {
            Err(ActionError::msg("nope"))
        })
        .guard(|open| *open);
        let run = hotkey.invoker(on_error);

        let mut open = false;
        assert!(run(&mut open).is_ok());
        assert!(failures.borrow().is_empty());

        open = true;
        assert!(run(&mut open).is_ok());
        assert_eq!(failures.borrow().as_slice(), [("action failed: nope".to_string(), Origin::Menu)]);
    }

    #[test]
    fn invoker_reports_reentry_instead_of_recursing() {
        /// Context holding the invoker itself, so the action can call it again.
        struct Slot(Option<Rc<dyn Fn(&mut Slot) -> Result<(), ActionError>>>);

        let failures = Rc::new(RefCell::new(Vec::new()));
        let on_error: ErrorHandler = {
            let failures = Rc::clone(&failures);
            Rc::new(move |error: &ActionError, _: &ErrorContext| {
                failures.borrow_mut().push(error.to_string());
            })
        };

        let hotkey = Hotkey::<Slot, Instant>::new(KeyState::plain('x'), |slot: &mut Slot| {
            let again = slot.0.clone().ok_or_else(|| ActionError::msg("empty slot"))?;
            again(slot)
        });
        let run: Rc<dyn Fn(&mut Slot) -> Result<(), ActionError>> =
            Rc::new(hotkey.invoker(on_error));

        let mut slot = Slot(Some(Rc::clone(&run)));
        assert!(run(&mut slot).is_ok());
        assert_eq!(
            failures.borrow().as_slice(),
            ["action failed: hotkey re-entered from its own action"]
        );

        // The flag is cleared afterwards, so a later call reaches the action again.
        assert!(run(&mut slot).is_ok());
        assert_eq!(failures.borrow().len(), 2);
    }

    #[test]
    fn debug_omits_closures() {
        let hotkey: Hotkey<(), Instant> =
            Hotkey::new(KeyState::plain('q'), |_| Ok(())).repeating(Duration::from_millis(50));
        let rendered = format!("{hotkey:?}");
        assert!(rendered.contains("Hotkey"));
        assert!(rendered.contains("guarded: false"));
    }
}
