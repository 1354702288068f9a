//! Order-preserving sequence whose every insertion is checked before it takes effect.
//!
//! This module provides [`ValidatedSequence`], a wrapper over an owned `Vec` that exposes
//! only validated mutators. Batch operations validate every element they are about to
//! introduce before touching the backing storage, so a single rejected element leaves the
//! sequence exactly as it was.
//!
//! The wrapper does not hand out mutable element references or a mutable slice; doing so
//! would let callers store values the validator never saw.
//!
//! Listeners registered with [`ValidatedSequence::add_listener`] receive a
//! [`SequenceChange`] after every mutation that was applied. Rejected mutations are never
//! reported.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use thiserror::Error;

use super::listeners::{ListenerId, Listeners};

const DEFAULT_MESSAGE: &str = "invalid element attempted to be added to sequence";

/// Error type for [`ValidatedSequence`] operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SequenceError<T> {
    /// The validator rejected `element`, which would have landed at `index`.
    #[error("{message} (index: {index}, value: {element:?})")]
    InvalidElement {
        index: usize,
        element: T,
        message: String,
    },
    /// `index` is not a valid position for the attempted operation.
    #[error("index {index} is out of range for sequence of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

/// A mutation that was applied to a [`ValidatedSequence`].
///
/// `removed` occupied `start..start + removed.len()` before the change, and `added`
/// occupies `start..start + added.len()` after it. A replacement reports both.
#[derive(Debug, PartialEq, Eq)]
pub struct SequenceChange<'a, T> {
    pub start: usize,
    pub removed: &'a [T],
    pub added: &'a [T],
}

impl<T> SequenceChange<'_, T> {
    /// Positions the removed elements held before the change.
    pub fn removed_range(&self) -> Range<usize> {
        self.start..self.start + self.removed.len()
    }

    /// Positions the added elements hold after the change.
    pub fn added_range(&self) -> Range<usize> {
        self.start..self.start + self.added.len()
    }

    /// Returns `true` if elements were both removed and added at `start`.
    pub fn was_replaced(&self) -> bool {
        !self.removed.is_empty() && !self.added.is_empty()
    }
}

type Message<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;
type Listener<T> = dyn Fn(&SequenceChange<'_, T>) + Send + Sync;

enum Validator<T> {
    Element(Arc<dyn Fn(&T) -> bool + Send + Sync>),
    Indexed(Arc<dyn Fn(usize, &T) -> bool + Send + Sync>),
}

impl<T> Validator<T> {
    fn accepts(&self, index: usize, element: &T) -> bool {
        match self {
            Validator::Element(validator) => validator(element),
            Validator::Indexed(validator) => validator(index, element),
        }
    }
}

impl<T> Clone for Validator<T> {
    fn clone(&self) -> Self {
        match self {
            Validator::Element(validator) => Validator::Element(Arc::clone(validator)),
            Validator::Indexed(validator) => Validator::Indexed(Arc::clone(validator)),
        }
    }
}

/// A growable sequence that only accepts elements its validator approves.
///
/// The validator receives the index the element would occupy once the mutation is applied,
/// and the element itself. Validators and message producers are expected to be pure. They
/// must not touch the sequence they guard.
///
/// Removals are not validated. With an index-aware validator, removing an element shifts
/// the ones after it, and they are not re-checked against their new positions. Removals
/// are still reported to listeners.
///
/// # Examples
///
/// ```rust
/// use validated_collections::generic::validated_sequence::{SequenceError, ValidatedSequence};
///
/// let mut names = ValidatedSequence::new(|s: &String| !s.is_empty());
///
/// names.push("alice".to_string()).unwrap();
/// names.push("bob".to_string()).unwrap();
///
/// // One bad element rejects the whole batch.
/// let err = names
///     .extend_validated(vec!["carol".to_string(), String::new()])
///     .unwrap_err();
/// assert!(matches!(err, SequenceError::InvalidElement { index: 3, .. }));
/// assert_eq!(names.as_slice(), &["alice", "bob"]);
/// ```
pub struct ValidatedSequence<T> {
    items: Vec<T>,
    validator: Validator<T>,
    message: Option<Message<T>>,
    listeners: Listeners<Listener<T>>,
}

impl<T> ValidatedSequence<T> {
    /// Creates an empty sequence with a position-independent validator.
    pub fn new<V>(validator: V) -> Self
    where
        V: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self::with_validator(Validator::Element(Arc::new(validator)))
    }

    /// Creates an empty sequence whose validator also sees the target index.
    ///
    /// ```rust
    /// use validated_collections::generic::validated_sequence::ValidatedSequence;
    ///
    /// // Each element must equal its own position.
    /// let mut seq = ValidatedSequence::with_index_validator(|index, value: &usize| *value == index);
    /// seq.extend_validated([0, 1, 2]).unwrap();
    /// assert!(seq.push(7).is_err());
    /// assert!(seq.push(3).is_ok());
    /// ```
    pub fn with_index_validator<V>(validator: V) -> Self
    where
        V: Fn(usize, &T) -> bool + Send + Sync + 'static,
    {
        Self::with_validator(Validator::Indexed(Arc::new(validator)))
    }

    fn with_validator(validator: Validator<T>) -> Self {
        Self {
            items: Vec::new(),
            validator,
            message: None,
            listeners: Listeners::new(),
        }
    }

    /// Creates a sequence holding `elements`, validating each at its position.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::InvalidElement`] for the first rejected element.
    pub fn from_vec<V>(elements: Vec<T>, validator: V) -> Result<Self, SequenceError<T>>
    where
        V: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let mut seq = Self::new(validator);
        seq.replace_all(elements)?;
        Ok(seq)
    }

    /// Creates a sequence holding `elements`, validating each with an index-aware validator.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::InvalidElement`] for the first rejected element.
    ///
    /// ```rust
    /// use validated_collections::generic::validated_sequence::ValidatedSequence;
    ///
    /// let ascending = |index: usize, v: &usize| *v >= index;
    /// let seq = ValidatedSequence::from_vec_indexed(vec![0, 4, 2], ascending).unwrap();
    /// assert_eq!(seq.as_slice(), &[0, 4, 2]);
    ///
    /// assert!(ValidatedSequence::from_vec_indexed(vec![0, 0], ascending).is_err());
    /// ```
    pub fn from_vec_indexed<V>(elements: Vec<T>, validator: V) -> Result<Self, SequenceError<T>>
    where
        V: Fn(usize, &T) -> bool + Send + Sync + 'static,
    {
        let mut seq = Self::with_index_validator(validator);
        seq.replace_all(elements)?;
        Ok(seq)
    }

    /// Replaces the rejection message producer. It is only called for rejected elements.
    pub fn with_message<M>(mut self, message: M) -> Self
    where
        M: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.message = Some(Arc::new(message));
        self
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the sequence holds no elements.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the element at `index`, or `None` if `index >= len`.
    ///
    /// ```rust
    /// use validated_collections::generic::validated_sequence::ValidatedSequence;
    ///
    /// let seq = ValidatedSequence::from_vec(vec![10, 20], |v: &i32| *v > 0).unwrap();
    /// assert_eq!(seq.get(1), Some(&20));
    /// assert_eq!(seq.get(2), None);
    /// ```
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Returns the first element, or `None` if the sequence is empty.
    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    /// Returns the last element, or `None` if the sequence is empty.
    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    /// Returns an iterator over the elements in order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Borrows the elements as a read-only slice.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Consumes the sequence, returning the backing vector without its validator.
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    /// Appends `element`.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::InvalidElement`] if the element is rejected.
    pub fn push(&mut self, element: T) -> Result<(), SequenceError<T>> {
        let index = self.items.len();
        let element = self.check(index, element)?;
        self.items.push(element);
        self.notify(index, &[], 1);
        Ok(())
    }

    /// Inserts `element` at `index`, shifting later elements right.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::IndexOutOfRange`] if `index > len`, or
    /// [`SequenceError::InvalidElement`] if the element is rejected.
    pub fn insert(&mut self, index: usize, element: T) -> Result<(), SequenceError<T>> {
        self.check_insert_index(index)?;
        let element = self.check(index, element)?;
        self.items.insert(index, element);
        self.notify(index, &[], 1);
        Ok(())
    }

    /// Replaces the element at `index`, returning the previous one.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::IndexOutOfRange`] if `index >= len`, or
    /// [`SequenceError::InvalidElement`] if the element is rejected.
    pub fn set(&mut self, index: usize, element: T) -> Result<T, SequenceError<T>> {
        if index >= self.items.len() {
            return Err(SequenceError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        let element = self.check(index, element)?;
        let previous = std::mem::replace(&mut self.items[index], element);
        self.notify(index, std::slice::from_ref(&previous), 1);
        Ok(previous)
    }

    /// Appends every element of `elements`, or none of them.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::InvalidElement`] for the first rejected element; the
    /// sequence is left unmodified.
    pub fn extend_validated<I>(&mut self, elements: I) -> Result<(), SequenceError<T>>
    where
        I: IntoIterator<Item = T>,
    {
        let start = self.items.len();
        let batch = self.check_batch(start, elements.into_iter().collect())?;
        let added = batch.len();
        self.items.extend(batch);
        self.notify(start, &[], added);
        Ok(())
    }

    /// Inserts every element of `elements` starting at `index`, or none of them.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::IndexOutOfRange`] if `index > len`, or
    /// [`SequenceError::InvalidElement`] for the first rejected element. On error the
    /// sequence is left unmodified.
    pub fn insert_all<I>(&mut self, index: usize, elements: I) -> Result<(), SequenceError<T>>
    where
        I: IntoIterator<Item = T>,
    {
        self.check_insert_index(index)?;
        let batch = self.check_batch(index, elements.into_iter().collect())?;
        let added = batch.len();
        self.items.splice(index..index, batch);
        self.notify(index, &[], added);
        Ok(())
    }

    /// Replaces the whole contents with `elements`, or leaves them untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::InvalidElement`] for the first rejected element.
    pub fn replace_all<I>(&mut self, elements: I) -> Result<(), SequenceError<T>>
    where
        I: IntoIterator<Item = T>,
    {
        let batch = self.check_batch(0, elements.into_iter().collect())?;
        self.reset(batch);
        Ok(())
    }

    /// Transforms every element with `f`, applying the results only if all of them pass
    /// validation.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::InvalidElement`] carrying the first rejected transformed
    /// value; the original elements are left in place.
    ///
    /// ```rust
    /// use validated_collections::generic::validated_sequence::ValidatedSequence;
    ///
    /// let mut seq = ValidatedSequence::from_vec(vec![1, 2, 3], |v: &i32| *v < 10).unwrap();
    /// assert!(seq.map_in_place(|v| v * 4).is_err());
    /// assert_eq!(seq.as_slice(), &[1, 2, 3]);
    ///
    /// seq.map_in_place(|v| v * 3).unwrap();
    /// assert_eq!(seq.as_slice(), &[3, 6, 9]);
    /// ```
    pub fn map_in_place<F>(&mut self, f: F) -> Result<(), SequenceError<T>>
    where
        F: FnMut(&T) -> T,
    {
        let mapped = self.items.iter().map(f).collect();
        let batch = self.check_batch(0, mapped)?;
        self.reset(batch);
        Ok(())
    }

    /// Removes and returns the last element.
    pub fn pop(&mut self) -> Option<T> {
        let element = self.items.pop()?;
        self.notify(self.items.len(), std::slice::from_ref(&element), 0);
        Some(element)
    }

    /// Removes and returns the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::IndexOutOfRange`] if `index >= len`.
    pub fn remove(&mut self, index: usize) -> Result<T, SequenceError<T>> {
        if index >= self.items.len() {
            return Err(SequenceError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        let element = self.items.remove(index);
        self.notify(index, std::slice::from_ref(&element), 0);
        Ok(element)
    }

    /// Shortens the sequence to `len` elements, dropping the rest.
    ///
    /// Has no effect if `len` is greater than or equal to the current length.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.items.len() {
            return;
        }
        let tail = self.items.split_off(len);
        self.notify(len, &tail, 0);
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        let removed = std::mem::take(&mut self.items);
        self.notify(0, &removed, 0);
    }

    /// Registers `listener` to be called after every applied mutation.
    ///
    /// ```rust
    /// use std::sync::{Arc, Mutex};
    /// use validated_collections::generic::validated_sequence::ValidatedSequence;
    ///
    /// let ranges = Arc::new(Mutex::new(Vec::new()));
    /// let mut seq = ValidatedSequence::new(|v: &i32| *v >= 0);
    ///
    /// let log = Arc::clone(&ranges);
    /// seq.add_listener(move |change| log.lock().unwrap().push(change.added_range()));
    ///
    /// seq.extend_validated([1, 2, 3]).unwrap();
    /// seq.extend_validated([4, -1]).unwrap_err();
    /// seq.push(5).unwrap();
    /// assert_eq!(*ranges.lock().unwrap(), vec![0..3, 3..4]);
    /// ```
    pub fn add_listener<L>(&mut self, listener: L) -> ListenerId
    where
        L: Fn(&SequenceChange<'_, T>) + Send + Sync + 'static,
    {
        self.listeners.add(Box::new(listener))
    }

    /// Unregisters the listener identified by `id`. Returns `false` if it was not registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    fn reset(&mut self, items: Vec<T>) {
        let removed = std::mem::replace(&mut self.items, items);
        self.notify(0, &removed, self.items.len());
    }

    /// Reports that `removed` was replaced by the `added` elements now at `start`.
    fn notify(&self, start: usize, removed: &[T], added: usize) {
        if removed.is_empty() && added == 0 {
            return;
        }
        let change = SequenceChange {
            start,
            removed,
            added: &self.items[start..start + added],
        };
        for listener in self.listeners.iter() {
            listener(&change);
        }
    }

    fn check(&self, index: usize, element: T) -> Result<T, SequenceError<T>> {
        if self.validator.accepts(index, &element) {
            Ok(element)
        } else {
            Err(SequenceError::InvalidElement {
                index,
                message: self.message_for(&element),
                element,
            })
        }
    }

    fn message_for(&self, element: &T) -> String {
        match &self.message {
            Some(message) => message(element),
            None => DEFAULT_MESSAGE.to_string(),
        }
    }

    /// Validates `batch` as if its first element landed at `start`. Nothing is mutated.
    fn check_batch(&self, start: usize, mut batch: Vec<T>) -> Result<Vec<T>, SequenceError<T>> {
        let rejected = batch
            .iter()
            .enumerate()
            .position(|(offset, element)| !self.validator.accepts(start + offset, element));

        match rejected {
            None => Ok(batch),
            Some(offset) => {
                let element = batch.swap_remove(offset);
                Err(SequenceError::InvalidElement {
                    index: start + offset,
                    message: self.message_for(&element),
                    element,
                })
            }
        }
    }

    fn check_insert_index(&self, index: usize) -> Result<(), SequenceError<T>> {
        if index > self.items.len() {
            return Err(SequenceError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(())
    }
}

/// Clones the elements and shares the validator and message producer. The clone starts
/// with no listeners.
impl<T: Clone> Clone for ValidatedSequence<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            validator: self.validator.clone(),
            message: self.message.clone(),
            listeners: Listeners::new(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ValidatedSequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for ValidatedSequence<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T> AsRef<[T]> for ValidatedSequence<T> {
    fn as_ref(&self) -> &[T] {
        &self.items
    }
}

impl<'a, T> IntoIterator for &'a ValidatedSequence<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for ValidatedSequence<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}
