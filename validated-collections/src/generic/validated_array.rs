//! Fixed-length array with index-aware write validation.

use thiserror::Error;

/// Error type for [`ValidatedArray`] operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArrayError<T> {
    /// The validator rejected `element` for slot `index`; the array is unchanged.
    #[error("{element:?} is not a valid value for index {index}")]
    InvalidElement { index: usize, element: T },
    /// `index` is not less than the array's length.
    #[error("index {index} is out of range for array of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

/// A fixed-length array whose slots can only hold values accepted by `validator(index, value)`.
///
/// The length is fixed at construction. Every initial element is validated, so the
/// validator holds for every slot at all times.
///
/// # Examples
///
/// ```rust
/// use validated_collections::generic::validated_array::ValidatedArray;
///
/// // Slot `i` holds a value no greater than `i`.
/// let mut levels = ValidatedArray::new(4, |_| 0u8, |i, v: &u8| usize::from(*v) <= i).unwrap();
///
/// assert_eq!(levels.set(3, 2), Ok(0));
/// assert!(levels.set(1, 5).is_err());
/// assert_eq!(levels.as_slice(), &[0, 0, 0, 2]);
/// ```
pub struct ValidatedArray<T> {
    items: Box<[T]>,
    validator: Box<dyn Fn(usize, &T) -> bool + Send + Sync>,
}

impl<T> ValidatedArray<T> {
    /// Creates an array of `len` elements produced by `init(index)`.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::InvalidElement`] for the first element `init` produced that the
    /// validator rejects.
    pub fn new<I, V>(len: usize, init: I, validator: V) -> Result<Self, ArrayError<T>>
    where
        I: FnMut(usize) -> T,
        V: Fn(usize, &T) -> bool + Send + Sync + 'static,
    {
        Self::from_vec((0..len).map(init).collect(), validator)
    }

    /// Wraps `elements`, validating each at its index.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::InvalidElement`] for the first rejected element.
    pub fn from_vec<V>(mut elements: Vec<T>, validator: V) -> Result<Self, ArrayError<T>>
    where
        V: Fn(usize, &T) -> bool + Send + Sync + 'static,
    {
        let rejected = elements
            .iter()
            .enumerate()
            .position(|(index, element)| !validator(index, element));

        if let Some(index) = rejected {
            let element = elements.swap_remove(index);
            return Err(ArrayError::InvalidElement { index, element });
        }

        Ok(Self {
            items: elements.into_boxed_slice(),
            validator: Box::new(validator),
        })
    }

    /// Returns the number of slots, fixed at construction.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the array has no slots.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the element at `index`, or `None` if `index >= len`.
    ///
    /// ```rust
    /// use validated_collections::generic::validated_array::ValidatedArray;
    ///
    /// let array = ValidatedArray::from_vec(vec!['a', 'b'], |_, c: &char| c.is_ascii()).unwrap();
    /// assert_eq!(array.get(1), Some(&'b'));
    /// assert_eq!(array.get(2), None);
    /// ```
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Stores `value` at `index`, returning the previous value.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::IndexOutOfRange`] if `index >= len`, or
    /// [`ArrayError::InvalidElement`] if the validator rejects `value` for `index`.
    pub fn set(&mut self, index: usize, value: T) -> Result<T, ArrayError<T>> {
        let len = self.items.len();
        if index >= len {
            return Err(ArrayError::IndexOutOfRange { index, len });
        }
        if !(self.validator)(index, &value) {
            return Err(ArrayError::InvalidElement {
                index,
                element: value,
            });
        }
        Ok(std::mem::replace(&mut self.items[index], value))
    }

    /// Returns an iterator over the elements in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Borrows the elements as a read-only slice.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Copies the elements into an independent vector.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.items.to_vec()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for ValidatedArray<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl<'a, T> IntoIterator for &'a ValidatedArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for ValidatedArray<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}
