//! Closed, totally ordered universes of symbolic values.
//!
//! A [`Universe`] is the set of every value a [`SetCodec`] can reference. Each member is
//! registered with a stable zero-based ordinal when the type is defined, usually through
//! [`declare_universe!`], so nothing is discovered by runtime introspection.
//!
//! [`SetCodec`]: crate::generic::set_codec::SetCodec
//! [`declare_universe!`]: macro@crate::declare_universe

use core::fmt::Debug;

/// A finite, closed set of distinct values with a fixed position for each member.
///
/// Implementors must uphold `Self::MEMBERS[m.ordinal()] == m` for every member `m`, i.e.
/// ordinals are unique and contiguous from `0`. New members may only ever be appended
/// at the end, otherwise previously encoded sets decode to different members.
///
/// # Examples
///
/// ```rust
/// use validated_collections::generic::universe::Universe;
///
/// #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
/// enum Axis {
///     X,
///     Y,
/// }
///
/// impl Universe for Axis {
///     const MEMBERS: &'static [Self] = &[Axis::X, Axis::Y];
///
///     fn ordinal(self) -> usize {
///         self as usize
///     }
/// }
///
/// assert_eq!(Axis::size(), 2);
/// assert_eq!(Axis::from_ordinal(1), Some(Axis::Y));
/// assert_eq!(Axis::from_ordinal(2), None);
/// ```
pub trait Universe: Copy + Ord + Debug + 'static {
    /// Every member of the universe, in ordinal order.
    const MEMBERS: &'static [Self];

    /// The member's stable zero-based position.
    fn ordinal(self) -> usize;

    /// Total number of members.
    fn size() -> usize {
        Self::MEMBERS.len()
    }

    /// Looks a member up by its ordinal.
    fn from_ordinal(ordinal: usize) -> Option<Self> {
        Self::MEMBERS.get(ordinal).copied()
    }
}
