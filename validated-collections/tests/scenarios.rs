use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use std::thread;

use validated_collections::{
    declare_universe, CellError, EncodedSet, GridError, RectangularGrid, SequenceError, SetCodec,
    ShapeError, Universe, ValidatedArray, ValidatedCell, ValidatedSequence,
};

declare_universe! {
    pub enum Color {
        Red,
        Green,
        Blue,
    }
}

declare_universe! {
    /// `Color` after two members were appended.
    pub enum ColorNext {
        Red,
        Green,
        Blue,
        Cyan,
        Magenta,
    }
}

#[test]
fn test_red_blue_scenario() {
    let codec = SetCodec::<Color>::new();
    let encoded = codec.encode(&BTreeSet::from([Color::Red, Color::Blue])).unwrap();
    assert_eq!(encoded, 0b101);
    assert_eq!(codec.decode(encoded), BTreeSet::from([Color::Red, Color::Blue]));
}

#[test]
fn test_stored_set_survives_universe_growth() {
    let stored = EncodedSet::from_members(&[ColorNext::Blue, ColorNext::Cyan]).unwrap();
    let raw: u64 = stored.into();

    // An older reader only knows the first three members.
    let old_view = EncodedSet::from(raw).members::<Color>();
    assert_eq!(old_view, BTreeSet::from([Color::Blue]));

    let new_view = EncodedSet::from(raw).members::<ColorNext>();
    assert_eq!(new_view, BTreeSet::from([ColorNext::Blue, ColorNext::Cyan]));
}

#[test]
fn test_universe_registration() {
    assert_eq!(Color::size(), 3);
    assert_eq!(ColorNext::from_ordinal(4), Some(ColorNext::Magenta));
    for member in ColorNext::MEMBERS {
        assert_eq!(ColorNext::MEMBERS[member.ordinal()], *member);
    }
}

#[test]
fn test_cell_lifecycle() {
    let mut cell = ValidatedCell::new("favorite", |c: &Color| *c != Color::Green);
    assert!(matches!(cell.get(), Err(CellError::NotInitialized { .. })));

    cell.set(Color::Blue).unwrap();
    assert_eq!(cell.get(), Ok(&Color::Blue));

    let err = cell.set(Color::Green).unwrap_err();
    assert!(matches!(err, CellError::InvalidValue { value: Color::Green, .. }));
    assert_eq!(cell.get(), Ok(&Color::Blue));
}

#[test]
fn test_sequence_batch_atomicity() {
    let mut palette = ValidatedSequence::new(|c: &Color| *c != Color::Green);
    palette.extend_validated([Color::Red, Color::Blue]).unwrap();
    let before = palette.clone();

    let err = palette
        .insert_all(1, [Color::Blue, Color::Green, Color::Red])
        .unwrap_err();
    assert_eq!(
        err,
        SequenceError::InvalidElement {
            index: 2,
            element: Color::Green,
            message: "invalid element attempted to be added to sequence".to_string(),
        }
    );
    assert_eq!(palette, before);
    assert_eq!(palette.len(), 2);
}

#[test]
fn test_palette_changes_are_observed() {
    let history = Arc::new(Mutex::new(Vec::new()));
    let mut palette = ValidatedSequence::new(|c: &Color| *c != Color::Green);

    let log = Arc::clone(&history);
    palette.add_listener(move |change| {
        log.lock()
            .unwrap()
            .push((change.removed_range(), change.added.to_vec()));
    });

    palette.extend_validated([Color::Red, Color::Blue]).unwrap();
    palette.push(Color::Green).unwrap_err();
    palette.set(0, Color::Blue).unwrap();

    assert_eq!(
        *history.lock().unwrap(),
        vec![
            (0..0, vec![Color::Red, Color::Blue]),
            (0..1, vec![Color::Blue]),
        ]
    );
}

#[test]
fn test_favorite_color_tracks_previous_value() {
    let transitions = Arc::new(Mutex::new(Vec::new()));
    let mut favorite = ValidatedCell::new("favorite", |c: &Color| *c != Color::Green);

    let log = Arc::clone(&transitions);
    favorite.add_listener(move |old: Option<&Color>, new: &Color| {
        log.lock().unwrap().push((old.copied(), *new));
    });

    favorite.set(Color::Red).unwrap();
    favorite.set(Color::Green).unwrap_err();
    favorite.set(Color::Blue).unwrap();

    assert_eq!(
        *transitions.lock().unwrap(),
        vec![(None, Color::Red), (Some(Color::Red), Color::Blue)]
    );
}

#[test]
fn test_containers_move_between_threads() {
    let cell = Arc::new(Mutex::new(ValidatedCell::new("favorite", |c: &Color| {
        *c != Color::Green
    })));
    let slots = Arc::new(Mutex::new(
        ValidatedArray::new(3, |_| Color::Red, |i, c: &Color| c.ordinal() <= i).unwrap(),
    ));

    let worker = {
        let cell = Arc::clone(&cell);
        let slots = Arc::clone(&slots);
        thread::spawn(move || {
            cell.lock().unwrap().set(Color::Blue).unwrap();
            let mut slots = slots.lock().unwrap();
            slots.set(2, Color::Blue).unwrap();
            slots.set(0, Color::Blue).is_err()
        })
    };
    assert!(worker.join().unwrap());

    assert_eq!(cell.lock().unwrap().get(), Ok(&Color::Blue));
    assert_eq!(
        slots.lock().unwrap().as_slice(),
        &[Color::Red, Color::Red, Color::Blue]
    );
}

#[test]
fn test_grid_shape_invariant() {
    let bad = RectangularGrid::from_rows(vec![vec![0; 3], vec![0; 3], vec![0; 2]]);
    assert!(matches!(
        bad,
        Err(GridError::InvalidShape(ShapeError::RaggedRows { .. }))
    ));

    let good = RectangularGrid::from_rows(vec![vec![0; 3], vec![0; 3], vec![0; 3]]).unwrap();
    assert_eq!((good.width(), good.height()), (3, 3));
}

#[test]
fn test_grid_clone_independence() {
    let grid = RectangularGrid::from_fn(2, 2, |x, y| vec![x, y]).unwrap();
    let mut copy = grid.clone();
    copy.get_mut(0, 1).unwrap().push(9);

    assert_eq!(grid.get(0, 1), Ok(&vec![0, 1]));
    assert_eq!(copy.get(0, 1), Ok(&vec![0, 1, 9]));
}

#[cfg(feature = "serde")]
mod serde_support {
    use super::*;

    #[test]
    fn test_grid_serializes_as_rows() {
        let grid = RectangularGrid::from_flat(2, vec![1, 2, 3, 4]).unwrap();
        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(json, "[[1,2],[3,4]]");

        let back: RectangularGrid<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, grid);
    }

    #[test]
    fn test_ragged_grid_rejected_on_deserialize() {
        let result: Result<RectangularGrid<i32>, _> = serde_json::from_str("[[1,2],[3]]");
        assert!(result.is_err());
    }

    #[test]
    fn test_encoded_set_is_transparent() {
        let stored = EncodedSet::from_members(&[Color::Green]).unwrap();
        assert_eq!(serde_json::to_string(&stored).unwrap(), "2");
        let back: EncodedSet = serde_json::from_str("2").unwrap();
        assert_eq!(back, stored);
    }

    #[test]
    fn test_sequence_serializes_elements() {
        let seq = ValidatedSequence::from_vec(vec![1, 2, 3], |v: &i32| *v > 0).unwrap();
        assert_eq!(serde_json::to_string(&seq).unwrap(), "[1,2,3]");
    }

    #[test]
    fn test_array_serializes_elements() {
        let array = ValidatedArray::new(3, |i| i * 2, |i, v: &usize| *v >= i).unwrap();
        assert_eq!(serde_json::to_string(&array).unwrap(), "[0,2,4]");
    }
}
