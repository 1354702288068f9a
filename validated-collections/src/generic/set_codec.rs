//! Lossless encoding of a set of [`Universe`] members into a single unsigned integer.
//!
//! Bit `i` of the encoded word is set if and only if the member with ordinal `i` is in the
//! set. The word width `W` is a type parameter (see [`BitWord`]) and must be agreed upon by
//! whoever encodes and whoever later decodes.
//!
//! Encoding is fail-fast: a member whose ordinal does not fit in `W` is rejected with
//! [`CodecError::UniverseTooLarge`] instead of being dropped. Decoding is lenient: bits
//! beyond the decoding universe are ignored, so a value written against a newer universe
//! with extra trailing members still decodes against an older one.

use core::fmt::{self, Debug};
use core::marker::PhantomData;
use std::collections::BTreeSet;

use bytemuck::{Pod, Zeroable};
use num_traits::{PrimInt, Unsigned};
use thiserror::Error;

use crate::generic::universe::Universe;

/// Error type for [`SetCodec`] operations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// A member's ordinal cannot be addressed by the encoding word.
    #[error("member ordinal {ordinal} does not fit in a {width}-bit encoding")]
    UniverseTooLarge { ordinal: usize, width: u32 },
}

/// An unsigned integer usable as the backing word of an encoded set.
pub trait BitWord: PrimInt + Unsigned + Debug {
    /// Number of addressable bits.
    const BITS: u32;
}

macro_rules! impl_bit_word {
    ($($t:ty),+) => {
        $(
            impl BitWord for $t {
                const BITS: u32 = <$t>::BITS;
            }
        )+
    };
}

impl_bit_word!(u8, u16, u32, u64, u128);

/// Encodes and decodes sets of `U` as a `W`-bit integer.
///
/// The codec is zero-sized; it only pins the universe and the width at the type level.
///
/// # Examples
///
/// ```rust
/// use validated_collections::declare_universe;
/// use validated_collections::generic::set_codec::SetCodec;
///
/// declare_universe! {
///     enum Color { Red, Green, Blue }
/// }
///
/// let codec = SetCodec::<Color>::new();
/// let encoded = codec.encode(&[Color::Red, Color::Blue]).unwrap();
/// assert_eq!(encoded, 0b101);
///
/// let decoded = codec.decode(encoded);
/// assert!(decoded.contains(&Color::Red));
/// assert!(decoded.contains(&Color::Blue));
/// assert_eq!(decoded.len(), 2);
/// ```
pub struct SetCodec<U, W = u64> {
    _marker: PhantomData<fn() -> (U, W)>,
}

impl<U, W> Clone for SetCodec<U, W> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<U, W> Copy for SetCodec<U, W> {}

impl<U, W> Default for SetCodec<U, W> {
    fn default() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<U, W> Debug for SetCodec<U, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetCodec")
            .field("universe", &core::any::type_name::<U>())
            .field("word", &core::any::type_name::<W>())
            .finish()
    }
}

impl<U: Universe, W: BitWord> SetCodec<U, W> {
    /// Creates a codec for universe `U` backed by `W`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bits in the encoding word.
    pub fn width(&self) -> u32 {
        W::BITS
    }

    /// Encodes `members` into a single word.
    ///
    /// Duplicate members are harmless. An empty input encodes to `0`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UniverseTooLarge`] for the first member whose ordinal is
    /// `>= W::BITS`. Nothing is returned for the members that did fit.
    pub fn encode<'a, I>(&self, members: I) -> Result<W, CodecError>
    where
        I: IntoIterator<Item = &'a U>,
    {
        members.into_iter().try_fold(W::zero(), |acc, member| {
            let ordinal = member.ordinal();
            if ordinal >= W::BITS as usize {
                return Err(CodecError::UniverseTooLarge {
                    ordinal,
                    width: W::BITS,
                });
            }
            Ok(acc | (W::one() << ordinal))
        })
    }

    /// Decodes `value` into the set of members whose bits are set.
    ///
    /// Bits at positions `>= min(U::size(), W::BITS)` are ignored.
    pub fn decode(&self, value: W) -> BTreeSet<U> {
        self.decode_iter(value).collect()
    }

    /// Like [`decode`](Self::decode), yielding members lazily in ordinal order.
    ///
    /// ```rust
    /// use validated_collections::declare_universe;
    /// use validated_collections::generic::set_codec::SetCodec;
    ///
    /// declare_universe! {
    ///     enum Flag { A, B, C, D }
    /// }
    ///
    /// let codec = SetCodec::<Flag, u8>::new();
    /// let members: Vec<_> = codec.decode_iter(0b1010).collect();
    /// assert_eq!(members, vec![Flag::B, Flag::D]);
    /// ```
    pub fn decode_iter(&self, value: W) -> impl Iterator<Item = U> {
        let unknown = value & !Self::known_mask();
        if unknown != W::zero() {
            tracing::debug!(
                universe = core::any::type_name::<U>(),
                size = U::size(),
                unknown_bits = ?unknown,
                "ignoring encoded bits outside the universe"
            );
        }

        U::MEMBERS
            .iter()
            .take(W::BITS as usize)
            .enumerate()
            .filter(move |(ordinal, _)| value & (W::one() << *ordinal) != W::zero())
            .map(|(_, member)| *member)
    }

    /// Returns `true` if `member` is present in the encoded `value`.
    pub fn contains(&self, value: W, member: U) -> bool {
        let ordinal = member.ordinal();
        ordinal < W::BITS as usize && value & (W::one() << ordinal) != W::zero()
    }

    /// Mask with one bit set for every ordinal the universe can place in `W`.
    fn known_mask() -> W {
        let addressable = U::size().min(W::BITS as usize);
        if addressable == W::BITS as usize {
            W::max_value()
        } else {
            (W::one() << addressable) - W::one()
        }
    }
}

/// Encodes `members` with a default [`SetCodec`].
pub fn encode_set<'a, U, W, I>(members: I) -> Result<W, CodecError>
where
    U: Universe,
    W: BitWord,
    I: IntoIterator<Item = &'a U>,
{
    SetCodec::<U, W>::new().encode(members)
}

/// Decodes `value` with a default [`SetCodec`].
pub fn decode_set<U: Universe, W: BitWord>(value: W) -> BTreeSet<U> {
    SetCodec::<U, W>::new().decode(value)
}

/// The persisted 64-bit form of an encoded set.
///
/// `EncodedSet` is `Pod`, so it can live directly inside zero-copy records and be stored
/// in an integer column without any further framing.
///
/// # Examples
///
/// ```rust
/// use validated_collections::declare_universe;
/// use validated_collections::generic::set_codec::EncodedSet;
///
/// declare_universe! {
///     enum Permission { Read, Write, Execute }
/// }
///
/// let stored = EncodedSet::from_members(&[Permission::Read, Permission::Execute]).unwrap();
/// assert_eq!(stored.bits(), 0b101);
///
/// let bytes = bytemuck::bytes_of(&stored);
/// let loaded: EncodedSet = *bytemuck::from_bytes(bytes);
/// assert!(loaded.contains(Permission::Execute));
/// assert!(!loaded.contains(Permission::Write));
/// ```
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct EncodedSet(u64);

impl EncodedSet {
    /// The encoding of the empty set.
    pub const EMPTY: Self = Self(0);

    /// Encodes `members` into a persisted set.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UniverseTooLarge`] if any ordinal is `>= 64`.
    pub fn from_members<'a, U, I>(members: I) -> Result<Self, CodecError>
    where
        U: Universe,
        I: IntoIterator<Item = &'a U>,
    {
        encode_set::<U, u64, I>(members).map(Self)
    }

    /// Decodes the persisted set against universe `U`.
    pub fn members<U: Universe>(&self) -> BTreeSet<U> {
        decode_set::<U, u64>(self.0)
    }

    /// Returns `true` if `member` is in the set.
    pub fn contains<U: Universe>(&self, member: U) -> bool {
        SetCodec::<U, u64>::new().contains(self.0, member)
    }

    /// The raw encoded bits.
    pub fn bits(&self) -> u64 {
        self.0
    }

    /// Returns `true` if no bit is set.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl From<u64> for EncodedSet {
    fn from(bits: u64) -> Self {
        Self(bits)
    }
}

impl From<EncodedSet> for u64 {
    fn from(set: EncodedSet) -> Self {
        set.0
    }
}
