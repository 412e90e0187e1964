use crate::Context;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Priority used by [`StateCell::add_on_change_callback`].
///
/// Callbacks registered with a lower priority run first, so priority 0 can be used to run
/// something before all default-priority callbacks.
pub const DEFAULT_CALLBACK_PRIORITY: i32 = 1;

pub type ChangeCallback<T> = Rc<dyn Fn(Context, &T)>;

struct Registration<T> {
    priority: i32,
    callback: ChangeCallback<T>,
}

/// A value that exists once per [`Context`] and notifies registered callbacks whenever it
/// changes.
///
/// Setting the current value again is a no-op. Callbacks run synchronously within `set`, ordered
/// by priority (ties in registration order), and may themselves set other cells. If a callback
/// sets this very cell to another value, the remaining callbacks only see that newer value.
pub struct StateCell<T> {
    initial_value: T,
    values: RefCell<HashMap<Context, T>>,
    registrations: RefCell<Vec<Registration<T>>>,
}

impl<T: Clone + PartialEq + 'static> StateCell<T> {
    pub fn new(initial_value: T) -> Self {
        Self {
            initial_value,
            values: Default::default(),
            registrations: Default::default(),
        }
    }

    /// Returns the current value for the given context (the initial value if it has never been
    /// set).
    pub fn get(&self, context: Context) -> T {
        self.values
            .borrow()
            .get(&context)
            .cloned()
            .unwrap_or_else(|| self.initial_value.clone())
    }

    /// Sets the value and notifies callbacks. Returns whether the value actually changed.
    pub fn set(&self, context: Context, value: T) -> bool {
        {
            let mut values = self.values.borrow_mut();
            let current = values.get(&context).unwrap_or(&self.initial_value);
            if *current == value {
                return false;
            }
            values.insert(context, value.clone());
        }
        // Callbacks might register further callbacks or set this very cell again, so we must not
        // hold any borrow while invoking them.
        let callbacks: Vec<_> = self
            .registrations
            .borrow()
            .iter()
            .map(|r| r.callback.clone())
            .collect();
        for callback in callbacks {
            callback(context, &value);
            // A nested set already notified all callbacks about the newer value
            if self.get(context) != value {
                break;
            }
        }
        true
    }

    pub fn add_on_change_callback(&self, callback: impl Fn(Context, &T) + 'static) {
        self.add_on_change_callback_with_priority(callback, DEFAULT_CALLBACK_PRIORITY);
    }

    pub fn add_on_change_callback_with_priority(
        &self,
        callback: impl Fn(Context, &T) + 'static,
        priority: i32,
    ) {
        let mut registrations = self.registrations.borrow_mut();
        // Insert after all registrations with the same or a lower priority.
        let index = registrations.partition_point(|r| r.priority <= priority);
        registrations.insert(
            index,
            Registration {
                priority,
                callback: Rc::new(callback),
            },
        );
    }
}

impl StateCell<bool> {
    pub fn toggle(&self, context: Context) {
        let value = self.get(context);
        self.set(context, !value);
    }
}

impl<T: fmt::Debug> fmt::Debug for StateCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateCell")
            .field("initial_value", &self.initial_value)
            .field("values", &self.values.borrow())
            .field("callback_count", &self.registrations.borrow().len())
            .finish()
    }
}
