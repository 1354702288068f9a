pub mod listeners;
pub mod rectangular_grid;
pub mod set_codec;
pub mod universe;
pub mod validated_array;
pub mod validated_cell;
pub mod validated_sequence;
