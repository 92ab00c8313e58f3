//! GeoFEST output conversion to legacy VTK.
//!
//! This crate provides:
//! - **GeoFEST readers** for the coordinate, connectivity, kinematics, and
//!   stress output files (whitespace-delimited text records)
//! - **Legacy VTK writer** for the ASCII `UNSTRUCTURED_GRID` format consumed
//!   by downstream visualization tooling
//! - **Conversion pipeline** wiring the four readers to the writer in one
//!   streaming pass per file

pub mod convert;
mod error;
pub mod geofest;
pub mod scan;
pub mod vtk;

pub use convert::{convert, convert_files};
pub use error::{ConvertError, OpenMode, Result};
pub use geofest::{Element, KinematicRecord, Node, StressTensor};
pub use scan::TokenScanner;
pub use vtk::{VtkCellType, VtkWriter};
