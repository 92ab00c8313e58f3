//! GeoFEST output record readers.
//!
//! GeoFEST writes its results as four independent whitespace-delimited text
//! files:
//!
//! - coordinate file: node count, then `(nodeId x y z)` per node
//! - connectivity file: element count, then
//!   `(elemId dummy matTag n1 n2 n3 n4)` per element (1-based node indices)
//! - kinematics file: time step, then
//!   `(tag nodeId x y z sx sy sz vx vy vz)` per node
//! - stress file: `(x y z sxx syy szz sxy sxz syz elemId)` per element,
//!   with no leading count
//!
//! Each reader consumes exactly one record and returns `None` when the input
//! ends at a record boundary; a record that ends mid-way fails as short.
//! Records are assumed to be in ascending entity order; the ids they carry
//! are validated as integers but not used for indexing.

use std::io::BufRead;

use crate::error::{ConvertError, Result};
use crate::scan::TokenScanner;

/// A node coordinate record.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: i64,
    pub coords: [f64; 3],
}

/// A tetrahedral element record, connectivity already converted to 0-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub id: i64,
    pub material: i64,
    pub nodes: [usize; 4],
}

/// One per-node kinematics record: displacement plus the raw vector that
/// becomes velocity once divided by the time step.
#[derive(Debug, Clone, PartialEq)]
pub struct KinematicRecord {
    pub displacement: [f64; 3],
    pub raw_velocity: [f64; 3],
}

/// The six independent components of a symmetric per-element stress tensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StressTensor {
    pub xx: f64,
    pub yy: f64,
    pub zz: f64,
    pub xy: f64,
    pub xz: f64,
    pub yz: f64,
}

/// Read the leading entity count of a coordinate or connectivity file.
pub fn read_count<R: BufRead>(scan: &mut TokenScanner<R>, field: &'static str) -> Result<usize> {
    scan.require_count(0, field)
}

/// Read the leading time step of the kinematics file.
pub fn read_time_step<R: BufRead>(scan: &mut TokenScanner<R>) -> Result<f64> {
    scan.require_f64(0, "timestep")
}

impl Node {
    pub fn read<R: BufRead>(scan: &mut TokenScanner<R>, record: usize) -> Result<Option<Self>> {
        let Some(id) = scan.next_i64(record, "nodeId")? else {
            return Ok(None);
        };
        let x = scan.require_f64(record, "x")?;
        let y = scan.require_f64(record, "y")?;
        let z = scan.require_f64(record, "z")?;
        Ok(Some(Node {
            id,
            coords: [x, y, z],
        }))
    }
}

impl Element {
    /// Read one connectivity record, decrementing the four 1-based node
    /// indices and checking each against the mesh node count.
    pub fn read<R: BufRead>(
        scan: &mut TokenScanner<R>,
        record: usize,
        num_nodes: usize,
    ) -> Result<Option<Self>> {
        let Some(id) = scan.next_i64(record, "elemId")? else {
            return Ok(None);
        };
        let _dummy = scan.require_i64(record, "dummy")?;
        let material = scan.require_i64(record, "matTag")?;

        let fields = ["n1", "n2", "n3", "n4"];
        let mut nodes = [0usize; 4];
        for (slot, field) in nodes.iter_mut().zip(fields) {
            let raw = scan.require_i64(record, field)?;
            let index = raw - 1;
            if index < 0 || index as usize >= num_nodes {
                return Err(ConvertError::NodeIndexOutOfRange {
                    file: scan.file().to_string(),
                    record,
                    index,
                    num_nodes,
                });
            }
            *slot = index as usize;
        }

        Ok(Some(Element {
            id,
            material,
            nodes,
        }))
    }
}

impl KinematicRecord {
    pub fn read<R: BufRead>(scan: &mut TokenScanner<R>, record: usize) -> Result<Option<Self>> {
        // Leading tag token; its content is ignored.
        if scan.next_token()?.is_none() {
            return Ok(None);
        }
        let _node = scan.require_i64(record, "nodeId")?;
        // Position triple, re-read here but already emitted by the geometry
        // stage.
        for field in ["x", "y", "z"] {
            scan.require_f64(record, field)?;
        }
        let sx = scan.require_f64(record, "sx")?;
        let sy = scan.require_f64(record, "sy")?;
        let sz = scan.require_f64(record, "sz")?;
        let vx = scan.require_f64(record, "vx")?;
        let vy = scan.require_f64(record, "vy")?;
        let vz = scan.require_f64(record, "vz")?;
        Ok(Some(KinematicRecord {
            displacement: [sx, sy, sz],
            raw_velocity: [vx, vy, vz],
        }))
    }
}

impl StressTensor {
    /// Expand to a full 3x3 matrix by symmetry (yx=xy, zx=xz, zy=yz).
    pub fn to_matrix(self) -> [[f64; 3]; 3] {
        [
            [self.xx, self.xy, self.xz],
            [self.xy, self.yy, self.yz],
            [self.xz, self.yz, self.zz],
        ]
    }

    pub fn read<R: BufRead>(scan: &mut TokenScanner<R>, record: usize) -> Result<Option<Self>> {
        // Position triple; ignored for output.
        let Some(_x) = scan.next_f64(record, "x")? else {
            return Ok(None);
        };
        let _y = scan.require_f64(record, "y")?;
        let _z = scan.require_f64(record, "z")?;
        let xx = scan.require_f64(record, "sxx")?;
        let yy = scan.require_f64(record, "syy")?;
        let zz = scan.require_f64(record, "szz")?;
        let xy = scan.require_f64(record, "sxy")?;
        let xz = scan.require_f64(record, "sxz")?;
        let yz = scan.require_f64(record, "syz")?;
        // Trailing element id; validated but unused.
        let _elem = scan.require_i64(record, "elemId")?;
        Ok(Some(StressTensor {
            xx,
            yy,
            zz,
            xy,
            xz,
            yz,
        }))
    }
}
