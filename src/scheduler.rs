// ============================================================================
// Delayed callbacks driven by the stage clock
// ============================================================================

#[derive(Debug)]
struct Scheduled<T> {
    seq: u64,
    due_ms: f64,
    task: T,
}

/// Queue of tasks that become due at a point on the millisecond clock.
///
/// Tasks due at the same time come out in the order they were scheduled.
#[derive(Debug)]
pub struct Scheduler<T> {
    queue: Vec<Scheduled<T>>,
    next_id: u64,
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            queue: Vec::new(),
            next_id: 0,
        }
    }

    pub fn schedule(&mut self, due_ms: f64, task: T) {
        let seq = self.next_id;
        self.next_id += 1;
        self.queue.push(Scheduled { seq, due_ms, task });
    }

    /// Cancel every pending task matching `predicate`, returning how many were dropped
    pub fn cancel_where(&mut self, mut predicate: impl FnMut(&T) -> bool) -> usize {
        let before = self.queue.len();
        self.queue.retain(|scheduled| !predicate(&scheduled.task));
        before - self.queue.len()
    }

    /// Remove and return every task due at or before `now_ms`
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<T> {
        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.queue)
            .into_iter()
            .partition(|scheduled| scheduled.due_ms <= now_ms);
        self.queue = pending;
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|scheduled| scheduled.task).collect()
    }

    pub fn pending(&self) -> impl Iterator<Item = &T> {
        self.queue.iter().map(|scheduled| &scheduled.task)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_due_in_time_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(300.0, "c");
        scheduler.schedule(100.0, "a");
        scheduler.schedule(100.0, "b");
        scheduler.schedule(900.0, "later");

        assert_eq!(scheduler.drain_due(50.0), Vec::<&str>::new());
        assert_eq!(scheduler.drain_due(300.0), vec!["a", "b", "c"]);
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.drain_due(900.0), vec!["later"]);
    }

    #[test]
    fn test_cancel_where() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(10.0, "disc");
        scheduler.schedule(20.0, "shadow");
        scheduler.schedule(30.0, "disc");

        assert_eq!(scheduler.cancel_where(|task| *task == "disc"), 2);
        assert_eq!(scheduler.pending().copied().collect::<Vec<_>>(), vec!["shadow"]);
        assert!(!scheduler.is_empty());
    }
}
