//! Mathematical utilities: frequency grids, interpolation, tensors and sidereal time.

pub mod grid;
pub mod interp;
pub mod sidereal;
pub mod tensor;

pub use grid::*;
pub use interp::*;
pub use sidereal::*;
pub use tensor::*;
