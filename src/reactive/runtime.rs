use std::cell::RefCell;
use std::collections::HashSet;

thread_local! {
    static RUNTIME: RefCell<Runtime> = RefCell::new(Runtime::new());
}

pub type SignalId = usize;
pub type EffectId = usize;

pub type Callback = Box<dyn FnMut()>;

/// Thread-local bookkeeping for signals and the effects that read them.
///
/// Effect callbacks are taken out of the runtime while they run, so an effect
/// may freely read and write signals without re-borrowing it.
#[derive(Default)]
pub struct Runtime {
    current_effect: Option<EffectId>,
    pending_effects: Vec<EffectId>,
    effect_callbacks: Vec<Option<Callback>>,
    effect_alive: Vec<bool>,
    effect_dependencies: Vec<HashSet<SignalId>>,
    signal_subscribers: Vec<HashSet<EffectId>>,
    flushing: bool,
}

impl Runtime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate_signal(&mut self) -> SignalId {
        self.signal_subscribers.push(HashSet::new());
        self.signal_subscribers.len() - 1
    }

    pub fn allocate_effect(&mut self, callback: Callback) -> EffectId {
        self.effect_callbacks.push(Some(callback));
        self.effect_alive.push(true);
        self.effect_dependencies.push(HashSet::new());
        self.effect_callbacks.len() - 1
    }

    pub fn track_read(&mut self, signal_id: SignalId) {
        if let Some(effect_id) = self.current_effect {
            self.signal_subscribers[signal_id].insert(effect_id);
            self.effect_dependencies[effect_id].insert(signal_id);
        }
    }

    /// Queue every subscriber of `signal_id`. Returns whether a flush should follow.
    pub fn notify_write(&mut self, signal_id: SignalId) -> bool {
        let mut subscribers: Vec<_> = self.signal_subscribers[signal_id].iter().copied().collect();
        subscribers.sort_unstable();
        for effect_id in subscribers {
            if !self.pending_effects.contains(&effect_id) {
                self.pending_effects.push(effect_id);
            }
        }

        !self.flushing
    }

    fn begin_effect(&mut self, effect_id: EffectId) -> Option<(Callback, Option<EffectId>)> {
        if !self.effect_alive.get(effect_id).copied().unwrap_or(false) {
            return None;
        }
        // An effect already running higher up the stack is skipped
        let callback = self.effect_callbacks[effect_id].take()?;

        let old_deps = std::mem::take(&mut self.effect_dependencies[effect_id]);
        for signal_id in old_deps {
            self.signal_subscribers[signal_id].remove(&effect_id);
        }

        let prev_effect = self.current_effect.replace(effect_id);
        Some((callback, prev_effect))
    }

    /// Put the callback back, or hand it out to be dropped if the effect was
    /// disposed while running
    fn end_effect(
        &mut self,
        effect_id: EffectId,
        callback: Callback,
        prev_effect: Option<EffectId>,
    ) -> Option<Callback> {
        self.current_effect = prev_effect;
        if self.effect_alive[effect_id] {
            self.effect_callbacks[effect_id] = Some(callback);
            None
        } else {
            Some(callback)
        }
    }

    fn next_pending(&mut self) -> Option<EffectId> {
        if self.pending_effects.is_empty() {
            None
        } else {
            Some(self.pending_effects.remove(0))
        }
    }

    /// Forget an effect. The caller drops the returned callback outside the
    /// runtime borrow.
    #[must_use]
    pub fn dispose_effect(&mut self, effect_id: EffectId) -> Option<Callback> {
        let deps = std::mem::take(&mut self.effect_dependencies[effect_id]);
        for signal_id in deps {
            self.signal_subscribers[signal_id].remove(&effect_id);
        }
        self.effect_alive[effect_id] = false;
        self.pending_effects.retain(|id| *id != effect_id);
        self.effect_callbacks[effect_id].take()
    }
}

pub fn with_runtime<F, R>(f: F) -> R
where
    F: FnOnce(&mut Runtime) -> R,
{
    RUNTIME.with(|rt| f(&mut rt.borrow_mut()))
}

/// Access the runtime if it is not already borrowed on this thread.
pub fn try_with_runtime<F, R>(f: F) -> Option<R>
where
    F: FnOnce(&mut Runtime) -> R,
{
    RUNTIME.with(|rt| rt.try_borrow_mut().ok().map(|mut runtime| f(&mut runtime)))
}

/// Run one effect with dependency tracking.
pub(crate) fn run_effect(effect_id: EffectId) {
    let Some((mut callback, prev_effect)) = with_runtime(|rt| rt.begin_effect(effect_id)) else {
        return;
    };
    callback();
    let disposed = with_runtime(|rt| rt.end_effect(effect_id, callback, prev_effect));
    drop(disposed);
}

/// Run queued effects until the queue is empty.
pub(crate) fn flush_effects() {
    let start = with_runtime(|rt| {
        if rt.flushing {
            return false;
        }
        rt.flushing = true;
        true
    });
    if !start {
        return;
    }

    while let Some(effect_id) = with_runtime(Runtime::next_pending) {
        run_effect(effect_id);
    }

    with_runtime(|rt| rt.flushing = false);
}
