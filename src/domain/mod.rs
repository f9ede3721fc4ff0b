//! Pure domain types with minimal dependencies
//!
//! This module contains the drawing model and the analysis data types.
//! Types here should have no rendering or network dependencies so that
//! every other layer can share them.

pub mod geometry;
pub mod intent;
pub mod stroke;

pub use geometry::*;
pub use intent::*;
pub use stroke::*;
