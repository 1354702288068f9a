//! A single mutable slot whose writes are checked by a validator.
//!
//! [`ValidatedCell`] starts out uninitialized and never invents a default value: reading
//! before the first successful write is an error, and every write is either fully applied
//! or rejected without touching the stored value.
//!
//! Listeners registered with [`ValidatedCell::add_listener`] observe every accepted write.

use std::borrow::Cow;
use std::fmt;

use thiserror::Error;

use super::listeners::{ListenerId, Listeners};

const DEFAULT_MESSAGE: &str = "invalid value passed to set";

/// Error type for [`ValidatedCell`] operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CellError<T> {
    /// The validator rejected `value`; the cell is unchanged.
    #[error("{message} (value: {value:?})")]
    InvalidValue { message: String, value: T },
    /// The cell was read before any value was stored.
    #[error("{name} should be initialized before get")]
    NotInitialized { name: Cow<'static, str> },
}

type Validator<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;
type Message = Box<dyn Fn() -> String + Send + Sync>;
type Listener<T> = dyn Fn(Option<&T>, &T) + Send + Sync;

/// A write-validated, read-after-write slot.
///
/// The `name` given at construction identifies the cell in diagnostics, typically the name
/// of the property it backs.
///
/// The validator should be a pure function of the candidate value. If it closes over
/// external state that later changes, the current value is not re-checked.
///
/// # Examples
///
/// ```rust
/// use validated_collections::generic::validated_cell::{CellError, ValidatedCell};
///
/// let mut port = ValidatedCell::new("port", |p: &u32| *p > 0 && *p <= 65_535)
///     .with_message(|| "port must be in 1..=65535".to_string());
///
/// assert!(matches!(port.get(), Err(CellError::NotInitialized { .. })));
///
/// port.set(8080).unwrap();
/// assert_eq!(port.get(), Ok(&8080));
///
/// let err = port.set(0).unwrap_err();
/// assert_eq!(err.to_string(), "port must be in 1..=65535 (value: 0)");
/// assert_eq!(port.get(), Ok(&8080));
/// ```
pub struct ValidatedCell<T> {
    name: Cow<'static, str>,
    value: Option<T>,
    validator: Option<Validator<T>>,
    message: Option<Message>,
    listeners: Listeners<Listener<T>>,
}

impl<T> ValidatedCell<T> {
    /// Creates an uninitialized cell named `name`, guarded by `validator`.
    pub fn new<V>(name: impl Into<Cow<'static, str>>, validator: V) -> Self
    where
        V: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self::with_validator(name.into(), Some(Box::new(validator)))
    }

    fn with_validator(name: Cow<'static, str>, validator: Option<Validator<T>>) -> Self {
        Self {
            name,
            value: None,
            validator,
            message: None,
            listeners: Listeners::new(),
        }
    }

    /// Creates an uninitialized cell that accepts every value.
    ///
    /// The cell can be overwritten any number of times, but reading it before the first
    /// write still fails.
    ///
    /// ```rust
    /// use validated_collections::generic::validated_cell::ValidatedCell;
    ///
    /// let mut path = ValidatedCell::unvalidated("path");
    /// assert!(path.get().is_err());
    ///
    /// path.set("a.txt").unwrap();
    /// path.set("b.txt").unwrap();
    /// assert_eq!(path.get(), Ok(&"b.txt"));
    /// ```
    pub fn unvalidated(name: impl Into<Cow<'static, str>>) -> Self {
        Self::with_validator(name.into(), None)
    }

    /// Replaces the rejection message producer. It is only called when a write is rejected.
    pub fn with_message<M>(mut self, message: M) -> Self
    where
        M: Fn() -> String + Send + Sync + 'static,
    {
        self.message = Some(Box::new(message));
        self
    }

    /// The identifier used in diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` once a value has been stored.
    pub fn is_initialized(&self) -> bool {
        self.value.is_some()
    }

    /// Stores `value` if the validator accepts it, then notifies every listener with the
    /// previous value (`None` on the first write) and the new one.
    ///
    /// # Errors
    ///
    /// Returns [`CellError::InvalidValue`] carrying the rejected value. The previously held
    /// value, or the uninitialized state, is left exactly as it was.
    pub fn set(&mut self, value: T) -> Result<(), CellError<T>> {
        let accepted = self
            .validator
            .as_ref()
            .map_or(true, |validator| validator(&value));
        if !accepted {
            return Err(CellError::InvalidValue {
                message: self
                    .message
                    .as_ref()
                    .map_or_else(|| DEFAULT_MESSAGE.to_string(), |message| message()),
                value,
            });
        }
        let previous = self.value.replace(value);
        if let Some(current) = &self.value {
            for listener in self.listeners.iter() {
                listener(previous.as_ref(), current);
            }
        }
        Ok(())
    }

    /// Returns the held value.
    ///
    /// # Errors
    ///
    /// Returns [`CellError::NotInitialized`] if nothing has been stored yet.
    pub fn get(&self) -> Result<&T, CellError<T>> {
        self.value.as_ref().ok_or_else(|| CellError::NotInitialized {
            name: self.name.clone(),
        })
    }

    /// Consumes the cell, returning the held value if any.
    pub fn into_inner(self) -> Option<T> {
        self.value
    }

    /// Registers `listener` to be called after every accepted write.
    ///
    /// The listener receives the previous value, or `None` if the cell was uninitialized,
    /// and the value just stored. Rejected writes are never reported.
    ///
    /// ```rust
    /// use std::sync::{Arc, Mutex};
    /// use validated_collections::generic::validated_cell::ValidatedCell;
    ///
    /// let seen = Arc::new(Mutex::new(Vec::new()));
    /// let mut level = ValidatedCell::new("level", |v: &u8| *v <= 10);
    ///
    /// let log = Arc::clone(&seen);
    /// level.add_listener(move |old: Option<&u8>, new: &u8| {
    ///     log.lock().unwrap().push((old.copied(), *new));
    /// });
    ///
    /// level.set(3).unwrap();
    /// level.set(42).unwrap_err();
    /// level.set(7).unwrap();
    /// assert_eq!(*seen.lock().unwrap(), vec![(None, 3), (Some(3), 7)]);
    /// ```
    pub fn add_listener<L>(&mut self, listener: L) -> ListenerId
    where
        L: Fn(Option<&T>, &T) + Send + Sync + 'static,
    {
        self.listeners.add(Box::new(listener))
    }

    /// Unregisters the listener identified by `id`. Returns `false` if it was not registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }
}

impl<T: fmt::Debug> fmt::Debug for ValidatedCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedCell")
            .field("name", &self.name)
            .field("value", &self.value)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::thread;

    fn even_cell() -> ValidatedCell<i32> {
        ValidatedCell::new("even", |v: &i32| v % 2 == 0)
    }

    #[test]
    fn test_get_before_set_fails() {
        let cell = even_cell();
        assert!(!cell.is_initialized());
        assert_eq!(
            cell.get(),
            Err(CellError::NotInitialized {
                name: Cow::Borrowed("even")
            })
        );
    }

    #[test]
    fn test_set_then_get() {
        let mut cell = even_cell();
        cell.set(4).unwrap();
        assert!(cell.is_initialized());
        assert_eq!(cell.get(), Ok(&4));

        cell.set(10).unwrap();
        assert_eq!(cell.get(), Ok(&10));
    }

    #[test]
    fn test_rejected_first_set_leaves_cell_uninitialized() {
        let mut cell = even_cell();
        let err = cell.set(3).unwrap_err();
        assert_eq!(
            err,
            CellError::InvalidValue {
                message: DEFAULT_MESSAGE.to_string(),
                value: 3
            }
        );
        assert!(!cell.is_initialized());
        assert!(cell.get().is_err());
    }

    #[test]
    fn test_rejected_set_keeps_previous_value() {
        let mut cell = even_cell();
        cell.set(2).unwrap();
        cell.set(7).unwrap_err();
        assert_eq!(cell.get(), Ok(&2));
    }

    #[test]
    fn test_custom_message() {
        let mut cell = even_cell().with_message(|| "must be even".to_string());
        let err = cell.set(1).unwrap_err();
        assert_eq!(err.to_string(), "must be even (value: 1)");
    }

    #[test]
    fn test_not_initialized_message_names_cell() {
        let cell: ValidatedCell<String> = ValidatedCell::new(String::from("title"), |_| true);
        assert_eq!(cell.name(), "title");
        assert_eq!(
            cell.get().unwrap_err().to_string(),
            "title should be initialized before get"
        );
    }

    #[test]
    fn test_into_inner() {
        let mut cell = even_cell();
        cell.set(8).unwrap();
        assert_eq!(cell.into_inner(), Some(8));
        assert_eq!(even_cell().into_inner(), None);
    }

    #[test]
    fn test_message_only_computed_on_rejection() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut cell = even_cell().with_message(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            "must be even".to_string()
        });

        cell.set(2).unwrap();
        cell.set(4).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        cell.set(5).unwrap_err();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_listeners_see_accepted_writes_only() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut cell = even_cell();
        let log = Arc::clone(&seen);
        let id = cell.add_listener(move |old, new| log.lock().unwrap().push((old.copied(), *new)));

        cell.set(3).unwrap_err();
        cell.set(2).unwrap();
        cell.set(7).unwrap_err();
        cell.set(6).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![(None, 2), (Some(2), 6)]);

        assert!(cell.remove_listener(id));
        assert!(!cell.remove_listener(id));
        cell.set(8).unwrap();
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_unvalidated_cell_reinitializes() {
        let mut cell = ValidatedCell::unvalidated("scratch");
        assert!(matches!(cell.get(), Err(CellError::NotInitialized { .. })));

        cell.set(-1).unwrap();
        cell.set(3).unwrap();
        assert_eq!(cell.get(), Ok(&3));
    }

    #[test]
    fn test_shared_across_threads() {
        let cell = Arc::new(Mutex::new(even_cell().with_message(|| "odd".to_string())));

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let cell = Arc::clone(&cell);
                thread::spawn(move || {
                    let mut cell = cell.lock().unwrap();
                    cell.set(i * 2).is_ok()
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }

        let cell = cell.lock().unwrap();
        assert!(cell.get().is_ok_and(|v| v % 2 == 0));
    }
}
