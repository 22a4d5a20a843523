//! Delayed tasks measured in simulation time
//!
//! Overlays and other follow-ups are scheduled a fraction of a second after
//! the event that caused them. Each task carries the generation it was
//! scheduled under; `invalidate` bumps the generation so anything queued
//! before a restart is dropped instead of firing into the new round.

/// A queued task with its due time and generation token
#[derive(Debug, Clone, PartialEq)]
struct Scheduled<T> {
    due: f32,
    generation: u64,
    task: T,
}

#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now: f32,
    generation: u64,
    queue: Vec<Scheduled<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            generation: 0,
            queue: Vec::new(),
        }
    }

    /// Queue `task` to fire `delay` seconds from now under the current generation
    pub fn schedule(&mut self, delay: f32, task: T) {
        self.queue.push(Scheduled {
            due: self.now + delay.max(0.0),
            generation: self.generation,
            task,
        });
    }

    /// Advance time and return due tasks in the order they fell due
    /// (ties keep scheduling order). Stale tasks are discarded.
    pub fn advance(&mut self, dt: f32) -> Vec<T> {
        self.now += dt.max(0.0);
        let generation = self.generation;
        self.queue.retain(|s| s.generation == generation);

        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.queue)
            .into_iter()
            .partition(|s| s.due <= self.now);
        self.queue = pending;

        due.sort_by(|a, b| a.due.total_cmp(&b.due));
        due.into_iter().map(|s| s.task).collect()
    }

    /// Drop everything queued so far
    pub fn invalidate(&mut self) {
        self.generation += 1;
        let dropped = self.queue.len();
        self.queue.clear();
        if dropped > 0 {
            log::debug!("Invalidated {} scheduled task(s)", dropped);
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_after_delay() {
        let mut sched = Scheduler::new();
        sched.schedule(0.2, "victory");
        assert!(sched.advance(0.1).is_empty());
        assert_eq!(sched.advance(0.15), vec!["victory"]);
        assert!(sched.advance(1.0).is_empty());
    }

    #[test]
    fn test_due_order() {
        let mut sched = Scheduler::new();
        sched.schedule(0.5, 1);
        sched.schedule(0.1, 2);
        sched.schedule(0.1, 3);
        assert_eq!(sched.advance(1.0), vec![2, 3, 1]);
    }

    #[test]
    fn test_invalidate_drops_stale() {
        let mut sched = Scheduler::new();
        sched.schedule(0.1, "old");
        sched.invalidate();
        assert_eq!(sched.generation(), 1);
        sched.schedule(0.1, "new");
        assert_eq!(sched.advance(0.2), vec!["new"]);
        assert_eq!(sched.pending(), 0);
    }
}
