//! Hotkey registry.
//!
//! [`Keyboard`] owns the set of held keys and the ordered list of bindings.
//! It routes press/release events to bindings and drives their repeat
//! timers. Like every state machine in this workspace it performs no I/O and
//! never reads the clock: time arrives as the `now` parameter.
//!
//! # Dispatch rules
//!
//! - A press of a key that is already held is ignored (OS auto-repeat).
//! - Every binding whose trigger equals the pressed key state and whose guard
//!   passes fires, in registration order, before `press` returns.
//! - If no binding's trigger matched, the unhandled-key hook runs instead.
//! - Release matches on the key alone; modifiers need not match.
//! - Action failures never escape: they go to the injected error handler.

use std::{collections::HashSet, fmt, time::Instant};

use keybook_core::{Key, KeyState, Modifiers, Timestamp};

use crate::{ErrorHandler, Hotkey, log_errors};

/// Hook for key presses that matched no binding (type-ahead search).
pub type UnhandledKey<C, I> = Box<dyn FnMut(&mut C, &KeyState, I)>;

/// Identifies a registered hotkey for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HotkeyId(u64);

/// Registry of hotkey bindings and held keys.
///
/// # Invariants
///
/// - A key state appears in the held set at most once.
/// - A repeat timer exists only while its trigger key is held; release and
///   [`Keyboard::release_all`] drop it.
pub struct Keyboard<C, I = Instant> {
    held: HashSet<KeyState>,
    bindings: Vec<(HotkeyId, Hotkey<C, I>)>,
    next_id: u64,
    on_error: ErrorHandler,
    unhandled: Option<UnhandledKey<C, I>>,
}

impl<C, I: Timestamp> Default for Keyboard<C, I> {
    fn default() -> Self {
        Self::new(log_errors())
    }
}

impl<C, I: Timestamp> Keyboard<C, I> {
    /// Create an empty registry reporting action failures to `on_error`.
    pub fn new(on_error: ErrorHandler) -> Self {
        Self { held: HashSet::new(), bindings: Vec::new(), next_id: 0, on_error, unhandled: None }
    }

    /// Install the hook called for presses that match no binding.
    #[must_use]
    pub fn with_unhandled(mut self, hook: impl FnMut(&mut C, &KeyState, I) + 'static) -> Self {
        self.set_unhandled(hook);
        self
    }

    /// Replace the unhandled-key hook.
    pub fn set_unhandled(&mut self, hook: impl FnMut(&mut C, &KeyState, I) + 'static) {
        self.unhandled = Some(Box::new(hook));
    }

    /// Register a binding. Dispatch and listing follow registration order.
    pub fn add_hotkey(&mut self, hotkey: Hotkey<C, I>) -> HotkeyId {
        let id = HotkeyId(self.next_id);
        self.next_id += 1;
        tracing::debug!(trigger = %hotkey.trigger(), ?id, "hotkey registered");
        self.bindings.push((id, hotkey));
        id
    }

    /// Register several bindings in order.
    pub fn add_hotkeys(&mut self, hotkeys: impl IntoIterator<Item = Hotkey<C, I>>) -> Vec<HotkeyId> {
        hotkeys.into_iter().map(|hotkey| self.add_hotkey(hotkey)).collect()
    }

    /// Deregister a binding, cancelling its repeat timer.
    ///
    /// Returns `None` if `id` is not registered.
    pub fn remove_hotkey(&mut self, id: HotkeyId) -> Option<Hotkey<C, I>> {
        let index = self.bindings.iter().position(|(bound, _)| *bound == id)?;
        let (_, mut hotkey) = self.bindings.remove(index);
        hotkey.cancel_timer();
        tracing::debug!(trigger = %hotkey.trigger(), ?id, "hotkey removed");
        Some(hotkey)
    }

    /// Bindings in registration order.
    pub fn hotkeys(&self) -> impl Iterator<Item = &Hotkey<C, I>> {
        self.bindings.iter().map(|(_, hotkey)| hotkey)
    }

    /// Look up a binding by id.
    pub fn hotkey(&self, id: HotkeyId) -> Option<&Hotkey<C, I>> {
        self.bindings.iter().find(|(bound, _)| *bound == id).map(|(_, hotkey)| hotkey)
    }

    /// Number of registered bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// True if no bindings are registered.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Shared handle to the error handler, for callers re-running hotkeys.
    pub fn on_error(&self) -> ErrorHandler {
        ErrorHandler::clone(&self.on_error)
    }

    /// True if exactly this key state is currently held.
    pub fn is_held(&self, state: &KeyState) -> bool {
        self.held.contains(state)
    }

    /// Currently held key states, in no particular order.
    pub fn held_keys(&self) -> impl Iterator<Item = &KeyState> {
        self.held.iter()
    }

    /// Earliest instant at which a repeat timer is due.
    ///
    /// Hosts sleep until this instant and then call [`Keyboard::tick`].
    pub fn next_deadline(&self) -> Option<I> {
        self.bindings.iter().filter_map(|(_, hotkey)| hotkey.timer()).map(|t| t.next_due()).min()
    }

    /// Handle a key press.
    ///
    /// Returns the normalized key state. A press of an already-held key state
    /// returns immediately without dispatching anything.
    pub fn press(&mut self, ctx: &mut C, key: Key, modifiers: Modifiers, now: I) -> KeyState {
        let state = KeyState::new(key, modifiers);
        if self.held.contains(&state) {
            tracing::trace!(key = %state, "press ignored, key already held");
            return state;
        }

        self.held.insert(state.clone());
        tracing::debug!(key = %state, "key pressed");

        let mut matched = false;
        for (_, hotkey) in &mut self.bindings {
            if *hotkey.trigger() != state {
                continue;
            }
            matched = true;
            if hotkey.guard_passes(ctx) {
                hotkey.press(ctx, now, &self.on_error);
            }
        }

        if !matched && let Some(hook) = self.unhandled.as_mut() {
            hook(ctx, &state, now);
        }

        state
    }

    /// Handle a key release.
    ///
    /// Every held state with this key is released regardless of modifiers,
    /// and the repeat timers of hotkeys triggered by this key are dropped.
    /// Releasing a key that is not held changes nothing.
    pub fn release(&mut self, key: &Key) {
        let before = self.held.len();
        self.held.retain(|state| state.key() != key);
        if self.held.len() == before {
            return;
        }

        tracing::debug!(%key, "key released");
        for (_, hotkey) in &mut self.bindings {
            if hotkey.trigger().key() == key {
                hotkey.cancel_timer();
            }
        }
    }

    /// Release every held key. Idempotent.
    ///
    /// Hosts call this when the window loses focus, since the matching key-up
    /// events will never arrive.
    pub fn release_all(&mut self) {
        if !self.held.is_empty() {
            tracing::debug!(count = self.held.len(), "releasing all keys");
        }
        self.held.clear();
        for (_, hotkey) in &mut self.bindings {
            hotkey.cancel_timer();
        }
    }

    /// Fire every repeat timer that is due at `now`, in registration order.
    pub fn tick(&mut self, ctx: &mut C, now: I) {
        for (_, hotkey) in &mut self.bindings {
            let held = self.held.contains(hotkey.trigger());
            hotkey.tick(ctx, now, held, &self.on_error);
        }
    }
}

impl<C, I: fmt::Debug> fmt::Debug for Keyboard<C, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keyboard")
            .field("held", &self.held)
            .field("bindings", &self.bindings)
            .field("unhandled", &self.unhandled.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc, time::Duration};

    use keybook_core::ActionError;

    use super::*;
    use crate::ErrorContext;

    /// Context recording which actions ran.
    #[derive(Debug, Default)]
    struct Log {
        fired: Vec<&'static str>,
        enabled: bool,
    }

    fn key(c: char) -> Key {
        Key::from(c)
    }

    fn record(name: &'static str) -> impl Fn(&mut Log) -> Result<(), ActionError> {
        move |log: &mut Log| {
            log.fired.push(name);
            Ok(())
        }
    }

    #[test]
    fn press_fires_matching_bindings_in_order() {
        let mut keyboard: Keyboard<Log> = Keyboard::default();
        keyboard.add_hotkey(Hotkey::new(KeyState::plain('p'), record("first")));
        keyboard.add_hotkey(Hotkey::new(KeyState::plain('q'), record("other")));
        keyboard.add_hotkey(Hotkey::new(KeyState::plain('p'), record("second")));

        let mut log = Log::default();
        let state = keyboard.press(&mut log, key('p'), Modifiers::NONE, Instant::now());

        assert_eq!(state, KeyState::plain('p'));
        assert_eq!(log.fired, ["first", "second"]);
    }

    #[test]
    fn modifiers_must_match_on_press() {
        let mut keyboard: Keyboard<Log> = Keyboard::default();
        keyboard.add_hotkey(Hotkey::new(KeyState::new('p', Modifiers::CONTROL), record("ctrl+p")));

        let mut log = Log::default();
        keyboard.press(&mut log, key('p'), Modifiers::NONE, Instant::now());
        assert!(log.fired.is_empty());

        keyboard.release(&key('p'));
        keyboard.press(&mut log, key('p'), Modifiers::CONTROL, Instant::now());
        assert_eq!(log.fired, ["ctrl+p"]);
    }

    #[test]
    fn release_ignores_modifiers() {
        let mut keyboard: Keyboard<Log> = Keyboard::default();
        let mut log = Log::default();

        keyboard.press(&mut log, key('p'), Modifiers::CONTROL, Instant::now());
        assert!(keyboard.is_held(&KeyState::new('p', Modifiers::CONTROL)));

        keyboard.release(&key('p'));
        assert_eq!(keyboard.held_keys().count(), 0);
    }

    #[test]
    fn failed_guard_blocks_firing_but_counts_as_handled() {
        let unhandled = Rc::new(RefCell::new(0));
        let mut keyboard: Keyboard<Log> = Keyboard::default().with_unhandled({
            let unhandled = Rc::clone(&unhandled);
            move |_: &mut Log, _: &KeyState, _: Instant| *unhandled.borrow_mut() += 1
        });
        keyboard.add_hotkey(
            Hotkey::new(KeyState::plain('g'), record("guarded")).guard(|log: &Log| log.enabled),
        );

        let mut log = Log::default();
        keyboard.press(&mut log, key('g'), Modifiers::NONE, Instant::now());
        assert!(log.fired.is_empty());
        assert_eq!(*unhandled.borrow(), 0);

        keyboard.release(&key('g'));
        log.enabled = true;
        keyboard.press(&mut log, key('g'), Modifiers::NONE, Instant::now());
        assert_eq!(log.fired, ["guarded"]);
    }

    #[test]
    fn unhandled_hook_receives_unbound_keys() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut keyboard: Keyboard<Log> = Keyboard::default().with_unhandled({
            let seen = Rc::clone(&seen);
            move |_: &mut Log, state: &KeyState, _: Instant| seen.borrow_mut().push(state.to_string())
        });

        let mut log = Log::default();
        keyboard.press(&mut log, key('a'), Modifiers::SHIFT, Instant::now());
        assert_eq!(seen.borrow().as_slice(), ["shift+a"]);
    }

    #[test]
    fn remove_hotkey_cancels_timer_and_stops_dispatch() {
        let mut keyboard: Keyboard<Log> = Keyboard::default();
        let id = keyboard.add_hotkey(
            Hotkey::new(KeyState::plain('r'), record("repeat")).repeating(Duration::from_millis(100)),
        );

        let t0 = Instant::now();
        let mut log = Log::default();
        keyboard.press(&mut log, key('r'), Modifiers::NONE, t0);
        assert!(keyboard.next_deadline().is_some());

        let removed = keyboard.remove_hotkey(id);
        assert!(removed.is_some_and(|hotkey| hotkey.timer().is_none()));
        assert!(keyboard.next_deadline().is_none());
        assert!(keyboard.remove_hotkey(id).is_none());

        keyboard.tick(&mut log, t0 + Duration::from_millis(500));
        assert_eq!(log.fired, ["repeat"]);
    }

    #[test]
    fn errors_are_routed_with_context() {
        let failures = Rc::new(RefCell::new(Vec::<ErrorContext>::new()));
        let on_error: ErrorHandler = {
            let failures = Rc::clone(&failures);
            Rc::new(move |_: &ActionError, context: &ErrorContext| {
                failures.borrow_mut().push(context.clone());
            })
        };

        let mut keyboard: Keyboard<Log> = Keyboard::new(on_error);
        keyboard.add_hotkey(
            Hotkey::new(KeyState::plain('x'), |_| Err(ActionError::msg("broken"))).title("Explode"),
        );

        let mut log = Log::default();
        keyboard.press(&mut log, key('x'), Modifiers::NONE, Instant::now());

        let failures = failures.borrow();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].trigger, KeyState::plain('x'));
        assert_eq!(failures[0].title.as_deref(), Some("Explode"));
        assert_eq!(failures[0].origin, crate::Origin::Press);
    }

    #[test]
    fn hotkeys_listed_in_registration_order() {
        let mut keyboard: Keyboard<Log> = Keyboard::default();
        keyboard.add_hotkeys([
            Hotkey::new(KeyState::plain('b'), record("b")),
            Hotkey::new(KeyState::plain('a'), record("a")),
            Hotkey::new(KeyState::plain('c'), record("c")),
        ]);

        let order: Vec<String> = keyboard.hotkeys().map(|h| h.trigger().to_string()).collect();
        assert_eq!(order, ["b", "a", "c"]);
        assert_eq!(keyboard.len(), 3);
    }
}
