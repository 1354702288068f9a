//! # Validated Collections
//!
//! Small containers that **check every mutation before applying it**, plus a compact codec
//! that stores a set of enumerated values in a single integer.
//!
//! Every container follows the same rule: a mutation is validated in full and then applied
//! in full, or it is rejected and the container is left exactly as it was.
//!
//! ## Features
//!
//! ### Containers
//!
//! - **[`ValidatedCell<T>`]** – single slot; writes are validated, reads before the first write fail
//! - **[`ValidatedSequence<T>`]** – ordered list; single and batch insertions are all-or-nothing
//! - **[`ValidatedArray<T>`]** – fixed-length array with an index-aware validator
//! - **[`RectangularGrid<T>`]** – `height × width` grid whose rows always have equal length
//!
//! `ValidatedCell` and `ValidatedSequence` also accept change listeners, which are called
//! after a mutation has been validated and applied and never for a rejected one.
//!
//! ### Set Encoding
//!
//! - **[`Universe`]** – closed, ordered set of values with stable ordinals
//! - **[`SetCodec<U, W>`]** – one bit per ordinal in an unsigned word `W`
//! - **[`EncodedSet`]** – `bytemuck`-compatible 64-bit persisted form
//! - **[`declare_universe!`]** – declare an enum and register its members in order
//!
//! ## Cargo Features
//!
//! - `serde` – `Serialize` for the containers and `EncodedSet`, shape-checked `Deserialize`
//!   for `RectangularGrid` and `EncodedSet`
//!
//! ## Quick Examples
//!
//! ### Encoding a set
//!
//! ```rust
//! use validated_collections::{declare_universe, SetCodec};
//!
//! declare_universe! {
//!     pub enum Color { Red, Green, Blue }
//! }
//!
//! let codec = SetCodec::<Color>::new();
//! assert_eq!(codec.encode(&[Color::Red, Color::Blue]), Ok(5));
//! assert_eq!(codec.decode(5).into_iter().collect::<Vec<_>>(), vec![Color::Red, Color::Blue]);
//! ```
//!
//! ### Using ValidatedSequence
//!
//! ```rust
//! use validated_collections::ValidatedSequence;
//!
//! let mut percentages = ValidatedSequence::new(|p: &u8| *p <= 100)
//!     .with_message(|p| format!("{p} is not a percentage"));
//!
//! percentages.extend_validated([10, 50, 90]).unwrap();
//! assert!(percentages.extend_validated([20, 120]).is_err());
//! assert_eq!(percentages.as_slice(), &[10, 50, 90]);
//! ```
//!
//! ### Using ValidatedCell
//!
//! ```rust
//! use validated_collections::ValidatedCell;
//!
//! let mut name = ValidatedCell::new("name", |s: &String| !s.trim().is_empty());
//! assert!(name.get().is_err());
//!
//! name.set("crate".to_string()).unwrap();
//! assert_eq!(name.get().unwrap(), "crate");
//! ```
//!
//! ### Using RectangularGrid
//!
//! ```rust
//! use validated_collections::RectangularGrid;
//!
//! let grid = RectangularGrid::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
//! assert_eq!(grid.to_string(), "[[1, 2], [3, 4]]");
//!
//! assert!(RectangularGrid::from_rows(vec![vec![1, 2], vec![3]]).is_err());
//! ```
//!
//! ## Thread Safety
//!
//! The containers do no internal locking. Validators, message producers and listeners must
//! be `Send + Sync`, so every container is `Send + Sync` whenever `T` is, and shared
//! instances can be wrapped in a `Mutex` or similar. Callbacks run synchronously inside the
//! mutating call and must not mutate the container they guard.
//!
//! [`ValidatedCell<T>`]: generic::validated_cell::ValidatedCell
//! [`ValidatedSequence<T>`]: generic::validated_sequence::ValidatedSequence
//! [`ValidatedArray<T>`]: generic::validated_array::ValidatedArray
//! [`RectangularGrid<T>`]: generic::rectangular_grid::RectangularGrid
//! [`Universe`]: generic::universe::Universe
//! [`SetCodec<U, W>`]: generic::set_codec::SetCodec
//! [`EncodedSet`]: generic::set_codec::EncodedSet
//! [`declare_universe!`]: macro@declare_universe

pub mod generic;
pub mod macros;

pub use generic::listeners::ListenerId;
pub use generic::rectangular_grid::{GridError, RectangularGrid, ShapeError};
pub use generic::set_codec::{decode_set, encode_set, BitWord, CodecError, EncodedSet, SetCodec};
pub use generic::universe::Universe;
pub use generic::validated_array::{ArrayError, ValidatedArray};
pub use generic::validated_cell::{CellError, ValidatedCell};
pub use generic::validated_sequence::{SequenceChange, SequenceError, ValidatedSequence};
