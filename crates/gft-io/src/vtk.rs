//! Legacy VTK (ASCII `UNSTRUCTURED_GRID`) writer.
//!
//! Emits the fixed section sequence the downstream visualization tooling
//! expects: header, `POINTS`, `CELLS`/`CELL_TYPES`, `POINT_DATA` vector
//! fields, and a `CELL_DATA` tensor field. Sections stream out record by
//! record; nothing is buffered. Numeric values use the default
//! general-float text rendering, integer counts plain decimal.

use std::io::{self, Write};

/// VTK element type codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VtkCellType {
    Vertex = 1,
    Line = 3,
    Triangle = 5,
    Quad = 9,
    Tetra = 10,
    Hexahedron = 12,
    Wedge = 13,
    Pyramid = 14,
}

/// Streaming writer for one legacy VTK file.
pub struct VtkWriter<W> {
    out: W,
}

impl<W: Write> VtkWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Write the four-line legacy header with the given title.
    pub fn header(&mut self, title: &str) -> io::Result<()> {
        writeln!(self.out, "# vtk DataFile Version 2.0")?;
        writeln!(self.out, "{title}")?;
        writeln!(self.out, "ASCII")?;
        writeln!(self.out, "DATASET UNSTRUCTURED_GRID")?;
        Ok(())
    }

    /// `POINTS n float` section header.
    pub fn begin_points(&mut self, num_points: usize) -> io::Result<()> {
        writeln!(self.out, "POINTS {num_points} float")
    }

    pub fn point(&mut self, coords: [f64; 3]) -> io::Result<()> {
        writeln!(self.out, "{} {} {}", coords[0], coords[1], coords[2])
    }

    /// `CELLS m size` header for `m` tetrahedra (each cell contributes its
    /// vertex count plus four indices to the integer payload).
    pub fn begin_tetra_cells(&mut self, num_cells: usize) -> io::Result<()> {
        writeln!(self.out, "CELLS {} {}", num_cells, num_cells * 5)
    }

    pub fn tetra_cell(&mut self, nodes: [usize; 4]) -> io::Result<()> {
        writeln!(
            self.out,
            "4 {} {} {} {}",
            nodes[0], nodes[1], nodes[2], nodes[3]
        )
    }

    /// `CELL_TYPES` section: one fixed type code per cell.
    pub fn cell_types(&mut self, num_cells: usize, cell_type: VtkCellType) -> io::Result<()> {
        writeln!(self.out, "CELL_TYPES {num_cells}")?;
        for _ in 0..num_cells {
            writeln!(self.out, "{}", cell_type as i32)?;
        }
        Ok(())
    }

    pub fn begin_point_data(&mut self, num_points: usize) -> io::Result<()> {
        writeln!(self.out, "POINT_DATA {num_points}")
    }

    pub fn begin_cell_data(&mut self, num_cells: usize) -> io::Result<()> {
        writeln!(self.out, "CELL_DATA {num_cells}")
    }

    /// `VECTORS name float` field header within a data section.
    pub fn begin_vectors(&mut self, name: &str) -> io::Result<()> {
        writeln!(self.out, "VECTORS {name} float")
    }

    pub fn vector(&mut self, v: [f64; 3]) -> io::Result<()> {
        writeln!(self.out, "{} {} {}", v[0], v[1], v[2])
    }

    /// `TENSORS name float` field header within a data section.
    pub fn begin_tensors(&mut self, name: &str) -> io::Result<()> {
        writeln!(self.out, "TENSORS {name} float")
    }

    /// One full 3x3 tensor: three rows and the separating blank line.
    pub fn tensor(&mut self, rows: [[f64; 3]; 3]) -> io::Result<()> {
        for row in rows {
            writeln!(self.out, "{} {} {}", row[0], row[1], row[2])?;
        }
        writeln!(self.out)
    }

    /// Blank separator line between sections.
    pub fn end_section(&mut self) -> io::Result<()> {
        writeln!(self.out)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
