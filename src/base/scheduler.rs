use crate::Context;
use derive_more::Display;
use std::cell::RefCell;
use std::fmt;
use tracing::debug;

/// Identifies a pending task. Scheduling a task under a key that is already pending replaces the
/// pending task.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Display)]
#[display(fmt = "{}{}", namespace, id)]
pub struct TimerKey {
    namespace: &'static str,
    id: u32,
}

impl TimerKey {
    pub const fn new(namespace: &'static str, id: u32) -> Self {
        Self { namespace, id }
    }
}

type TimerCallback = Box<dyn FnOnce(Context)>;

struct ScheduledTask {
    context: Context,
    key: TimerKey,
    remaining_ticks: u32,
    callback: TimerCallback,
}

/// Single-shot deferred callbacks, advanced by ticks which the host delivers per context.
#[derive(Default)]
pub struct Scheduler {
    tasks: RefCell<Vec<ScheduledTask>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Default::default()
    }

    /// Runs `callback` after the given number of ticks (at least one).
    pub fn set_timeout(
        &self,
        context: Context,
        key: TimerKey,
        ticks: u32,
        callback: impl FnOnce(Context) + 'static,
    ) {
        let mut tasks = self.tasks.borrow_mut();
        if let Some(i) = Self::position(&tasks, context, key) {
            debug!("Replacing pending timer {key} in {context}");
            tasks.remove(i);
        }
        tasks.push(ScheduledTask {
            context,
            key,
            remaining_ticks: ticks.max(1),
            callback: Box::new(callback),
        });
    }

    /// Returns whether a task was pending.
    pub fn clear_timeout(&self, context: Context, key: TimerKey) -> bool {
        let mut tasks = self.tasks.borrow_mut();
        match Self::position(&tasks, context, key) {
            None => false,
            Some(i) => {
                tasks.remove(i);
                true
            }
        }
    }

    pub fn is_scheduled(&self, context: Context, key: TimerKey) -> bool {
        Self::position(&self.tasks.borrow(), context, key).is_some()
    }

    /// Advances all tasks of the given context by one tick and fires the due ones in the order in
    /// which they were scheduled.
    pub fn tick(&self, context: Context) {
        let due: Vec<ScheduledTask> = {
            let mut tasks = self.tasks.borrow_mut();
            let mut due = Vec::new();
            let mut i = 0;
            while i < tasks.len() {
                let task = &mut tasks[i];
                if task.context == context {
                    task.remaining_ticks -= 1;
                    if task.remaining_ticks == 0 {
                        due.push(tasks.remove(i));
                        continue;
                    }
                }
                i += 1;
            }
            due
        };
        // Callbacks may schedule new tasks, which then wait for a later tick.
        for task in due {
            (task.callback)(task.context);
        }
    }

    fn position(tasks: &[ScheduledTask], context: Context, key: TimerKey) -> Option<usize> {
        tasks
            .iter()
            .position(|t| t.context == context && t.key == key)
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("pending", &self.tasks.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    const CTX: Context = Context::new(1);
    const KEY: TimerKey = TimerKey::new("test", 0);

    #[test]
    fn fires_after_given_ticks() {
        // Given
        let scheduler = Scheduler::new();
        let fired = Rc::new(Cell::new(0));
        {
            let fired = fired.clone();
            scheduler.set_timeout(CTX, KEY, 2, move |_| fired.set(fired.get() + 1));
        }
        // When
        scheduler.tick(CTX);
        // Then
        assert_eq!(fired.get(), 0);
        scheduler.tick(CTX);
        assert_eq!(fired.get(), 1);
        scheduler.tick(CTX);
        assert_eq!(fired.get(), 1);
        assert!(!scheduler.is_scheduled(CTX, KEY));
    }

    #[test]
    fn rescheduling_replaces_instead_of_stacking() {
        // Given
        let scheduler = Scheduler::new();
        let fired = Rc::new(RefCell::new(Vec::new()));
        // When
        for label in ["first", "second"] {
            let fired = fired.clone();
            scheduler.set_timeout(CTX, KEY, 1, move |_| fired.borrow_mut().push(label));
        }
        scheduler.tick(CTX);
        // Then
        assert_eq!(*fired.borrow(), vec!["second"]);
    }

    #[test]
    fn rescheduling_restarts_the_delay() {
        // Given
        let scheduler = Scheduler::new();
        let fired = Rc::new(Cell::new(false));
        let schedule = |fired: Rc<Cell<bool>>| {
            scheduler.set_timeout(CTX, KEY, 2, move |_| fired.set(true));
        };
        schedule(fired.clone());
        scheduler.tick(CTX);
        // When
        schedule(fired.clone());
        scheduler.tick(CTX);
        // Then
        assert!(!fired.get());
        scheduler.tick(CTX);
        assert!(fired.get());
    }

    #[test]
    fn different_keys_and_contexts_do_not_collide() {
        // Given
        let scheduler = Scheduler::new();
        let fired = Rc::new(RefCell::new(Vec::new()));
        for (ctx, key) in [
            (CTX, TimerKey::new("test", 0)),
            (CTX, TimerKey::new("test", 1)),
            (Context::new(2), TimerKey::new("test", 0)),
        ] {
            let fired = fired.clone();
            scheduler.set_timeout(ctx, key, 1, move |c| fired.borrow_mut().push((c, key)));
        }
        // When
        scheduler.tick(CTX);
        // Then
        assert_eq!(
            *fired.borrow(),
            vec![
                (CTX, TimerKey::new("test", 0)),
                (CTX, TimerKey::new("test", 1))
            ]
        );
        assert!(scheduler.is_scheduled(Context::new(2), TimerKey::new("test", 0)));
    }

    #[test]
    fn tasks_scheduled_while_firing_wait_for_next_tick() {
        // Given
        let scheduler = Rc::new(Scheduler::new());
        let fired = Rc::new(Cell::new(0));
        {
            let weak = Rc::downgrade(&scheduler);
            let fired = fired.clone();
            scheduler.set_timeout(CTX, KEY, 1, move |ctx| {
                fired.set(fired.get() + 1);
                if let Some(scheduler) = weak.upgrade() {
                    let fired = fired.clone();
                    scheduler.set_timeout(ctx, KEY, 1, move |_| fired.set(fired.get() + 1));
                }
            });
        }
        // When
        scheduler.tick(CTX);
        // Then
        assert_eq!(fired.get(), 1);
        scheduler.tick(CTX);
        assert_eq!(fired.get(), 2);
    }

    #[test]
    fn clear_timeout_cancels() {
        // Given
        let scheduler = Scheduler::new();
        let fired = Rc::new(Cell::new(false));
        {
            let fired = fired.clone();
            scheduler.set_timeout(CTX, KEY, 1, move |_| fired.set(true));
        }
        // When
        let was_pending = scheduler.clear_timeout(CTX, KEY);
        scheduler.tick(CTX);
        // Then
        assert!(was_pending);
        assert!(!fired.get());
        assert!(!scheduler.clear_timeout(CTX, KEY));
    }
}
