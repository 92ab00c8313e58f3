//! GeoFEST-to-VTK conversion pipeline.
//!
//! Four sequential stages, one per input file, each writing its output
//! section before the next stage starts:
//!
//! 1. geometry: node count and coordinates → header + `POINTS`
//! 2. topology: tetrahedral connectivity → `CELLS` + `CELL_TYPES`
//! 3. kinematics: time step, displacement and raw velocity per node →
//!    two `POINT_DATA` vector fields
//! 4. stress: six symmetric components per element → `CELL_DATA` tensors
//!
//! The node and element counts read by stages 1 and 2 bound the loops of
//! stages 3 and 4. The kinematics file is traversed once: displacement
//! lines stream out directly while the raw velocity vectors are held back
//! until the time step division can be applied for the second field.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use gft_model::ConversionSummary;

use crate::error::{ConvertError, OpenMode, Result};
use crate::geofest::{self, Element, KinematicRecord, Node, StressTensor};
use crate::scan::TokenScanner;
use crate::vtk::{VtkCellType, VtkWriter};

/// Title line of the emitted VTK header.
const GRID_TITLE: &str = "FEM Grid Data";

/// Convert the four named GeoFEST output files into one legacy VTK file.
pub fn convert_files(
    coord_path: impl AsRef<Path>,
    ien_path: impl AsRef<Path>,
    disp_path: impl AsRef<Path>,
    stress_path: impl AsRef<Path>,
    out_path: impl AsRef<Path>,
) -> Result<ConversionSummary> {
    let coord = open_input(coord_path.as_ref())?;
    let ien = open_input(ien_path.as_ref())?;
    let disp = open_input(disp_path.as_ref())?;
    let stress = open_input(stress_path.as_ref())?;
    let out = create_output(out_path.as_ref())?;
    convert(coord, ien, disp, stress, BufWriter::new(out))
}

/// Run the pipeline over already-opened inputs.
pub fn convert<C, I, D, S, W>(
    mut coord: TokenScanner<C>,
    mut ien: TokenScanner<I>,
    mut disp: TokenScanner<D>,
    mut stress: TokenScanner<S>,
    out: W,
) -> Result<ConversionSummary>
where
    C: BufRead,
    I: BufRead,
    D: BufRead,
    S: BufRead,
    W: Write,
{
    let mut vtk = VtkWriter::new(out);
    vtk.header(GRID_TITLE)?;

    let num_nodes = geometry_stage(&mut coord, &mut vtk)?;
    let num_elements = topology_stage(&mut ien, &mut vtk, num_nodes)?;
    let time_step = kinematics_stage(&mut disp, &mut vtk, num_nodes)?;
    stress_stage(&mut stress, &mut vtk, num_elements)?;
    vtk.flush()?;

    Ok(ConversionSummary::new(num_nodes, num_elements, time_step))
}

fn geometry_stage<R: BufRead, W: Write>(
    scan: &mut TokenScanner<R>,
    vtk: &mut VtkWriter<W>,
) -> Result<usize> {
    let num_nodes = geofest::read_count(scan, "numNodes")?;
    vtk.begin_points(num_nodes)?;
    for record in 1..=num_nodes {
        match Node::read(scan, record)? {
            Some(node) => vtk.point(node.coords)?,
            None => return Err(count_mismatch(scan, num_nodes, record - 1)),
        }
    }
    vtk.end_section()?;
    Ok(num_nodes)
}

fn topology_stage<R: BufRead, W: Write>(
    scan: &mut TokenScanner<R>,
    vtk: &mut VtkWriter<W>,
    num_nodes: usize,
) -> Result<usize> {
    let num_elements = geofest::read_count(scan, "numElements")?;
    vtk.begin_tetra_cells(num_elements)?;
    for record in 1..=num_elements {
        match Element::read(scan, record, num_nodes)? {
            Some(elem) => vtk.tetra_cell(elem.nodes)?,
            None => return Err(count_mismatch(scan, num_elements, record - 1)),
        }
    }
    vtk.end_section()?;
    vtk.cell_types(num_elements, VtkCellType::Tetra)?;
    vtk.end_section()?;
    Ok(num_elements)
}

fn kinematics_stage<R: BufRead, W: Write>(
    scan: &mut TokenScanner<R>,
    vtk: &mut VtkWriter<W>,
    num_nodes: usize,
) -> Result<f64> {
    let time_step = geofest::read_time_step(scan)?;
    if time_step == 0.0 {
        return Err(ConvertError::ZeroTimeStep);
    }

    vtk.begin_point_data(num_nodes)?;
    vtk.begin_vectors("displacement")?;
    let mut raw_velocities = Vec::with_capacity(num_nodes);
    for record in 1..=num_nodes {
        match KinematicRecord::read(scan, record)? {
            Some(rec) => {
                vtk.vector(rec.displacement)?;
                raw_velocities.push(rec.raw_velocity);
            }
            None => return Err(count_mismatch(scan, num_nodes, record - 1)),
        }
    }
    vtk.end_section()?;

    vtk.begin_vectors("velocity")?;
    for v in raw_velocities {
        vtk.vector([v[0] / time_step, v[1] / time_step, v[2] / time_step])?;
    }
    vtk.end_section()?;

    Ok(time_step)
}

fn stress_stage<R: BufRead, W: Write>(
    scan: &mut TokenScanner<R>,
    vtk: &mut VtkWriter<W>,
    num_elements: usize,
) -> Result<()> {
    vtk.begin_cell_data(num_elements)?;
    vtk.begin_tensors("stress")?;
    for record in 1..=num_elements {
        match StressTensor::read(scan, record)? {
            Some(tensor) => vtk.tensor(tensor.to_matrix())?,
            // The stress file has no leading count of its own; the element
            // count from the connectivity file sets the expectation.
            None => {
                return Err(ConvertError::StressCountMismatch {
                    file: scan.file().to_string(),
                    expected: num_elements,
                    found: record - 1,
                });
            }
        }
    }
    Ok(())
}

fn count_mismatch<R: BufRead>(scan: &TokenScanner<R>, declared: usize, found: usize) -> ConvertError {
    ConvertError::CountMismatch {
        file: scan.file().to_string(),
        declared,
        found,
    }
}

fn open_input(path: &Path) -> Result<TokenScanner<BufReader<File>>> {
    let file = File::open(path).map_err(|source| ConvertError::Open {
        path: path.to_path_buf(),
        mode: OpenMode::Read,
        source,
    })?;
    Ok(TokenScanner::new(
        BufReader::new(file),
        path.display().to_string(),
    ))
}

fn create_output(path: &Path) -> Result<File> {
    File::create(path).map_err(|source| ConvertError::Open {
        path: path.to_path_buf(),
        mode: OpenMode::Write,
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn scanner(src: &str, file: &str) -> TokenScanner<std::io::Cursor<String>> {
        TokenScanner::new(std::io::Cursor::new(src.to_string()), file)
    }

    fn run(coord: &str, ien: &str, disp: &str, stress: &str) -> Result<(ConversionSummary, String)> {
        let mut out = Vec::new();
        let summary = convert(
            scanner(coord, "coord"),
            scanner(ien, "ien"),
            scanner(disp, "disp"),
            scanner(stress, "str"),
            &mut out,
        )?;
        Ok((summary, String::from_utf8(out).expect("output should be UTF-8")))
    }

    #[test]
    fn converts_two_node_mesh_without_cells() {
        let coord = "2\n1 0.0 0.0 0.0\n2 1.0 0.0 0.0\n";
        let disp = "1.0\n\
                    1 1 0 0 0 0.1 0.2 0.3 1.0 2.0 3.0\n\
                    2 2 0 0 0 0.4 0.5 0.6 4.0 5.0 6.0\n";
        let (summary, out) = run(coord, "0\n", disp, "").expect("conversion should succeed");

        assert_eq!(summary.num_nodes, 2);
        assert_eq!(summary.num_elements, 0);
        assert_eq!(summary.time_step, 1.0);
        assert_eq!(
            out,
            "# vtk DataFile Version 2.0\n\
             FEM Grid Data\n\
             ASCII\n\
             DATASET UNSTRUCTURED_GRID\n\
             POINTS 2 float\n\
             0 0 0\n\
             1 0 0\n\
             \n\
             CELLS 0 0\n\
             \n\
             CELL_TYPES 0\n\
             \n\
             POINT_DATA 2\n\
             VECTORS displacement float\n\
             0.1 0.2 0.3\n\
             0.4 0.5 0.6\n\
             \n\
             VECTORS velocity float\n\
             1 2 3\n\
             4 5 6\n\
             \n\
             CELL_DATA 0\n\
             TENSORS stress float\n"
        );
    }

    #[test]
    fn converts_single_tetrahedron_with_stress() {
        let coord = "4\n1 0 0 0\n2 1 0 0\n3 0 1 0\n4 0 0 1\n";
        let ien = "1\n1 0 1 1 2 3 4\n";
        let disp = "2.0\n\
                    n 1 0 0 0 0 0 0 2 4 6\n\
                    n 2 1 0 0 0 0 0 2 4 6\n\
                    n 3 0 1 0 0 0 0 2 4 6\n\
                    n 4 0 0 1 0 0 0 2 4 6\n";
        let stress = "0.25 0.25 0.25 11 22 33 12 13 23 1\n";
        let (summary, out) = run(coord, ien, disp, stress).expect("conversion should succeed");

        assert_eq!(summary.num_elements, 1);
        assert!(out.contains("CELLS 1 5\n4 0 1 2 3\n"));
        assert!(out.contains("CELL_TYPES 1\n10\n"));
        assert!(out.contains("VECTORS velocity float\n1 2 3\n"));
        assert!(out.contains(
            "CELL_DATA 1\nTENSORS stress float\n11 12 13\n12 22 23\n13 23 33\n\n"
        ));
    }

    #[test]
    fn declared_count_shortfall_is_rejected() {
        let coord = "5\n1 0 0 0\n2 1 0 0\n3 0 1 0\n";
        let err = run(coord, "0\n", "1.0\n", "").unwrap_err();
        match err {
            ConvertError::CountMismatch {
                file,
                declared,
                found,
            } => {
                assert_eq!(file, "coord");
                assert_eq!(declared, 5);
                assert_eq!(found, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn zero_time_step_is_rejected_before_kinematics_output() {
        let coord = "1\n1 0 0 0\n";
        let disp = "0.0\n1 1 0 0 0 0 0 0 1 1 1\n";
        let mut out = Vec::new();
        let err = convert(
            scanner(coord, "coord"),
            scanner("0\n", "ien"),
            scanner(disp, "disp"),
            scanner("", "str"),
            &mut out,
        )
        .unwrap_err();
        assert!(matches!(err, ConvertError::ZeroTimeStep));
        let written = String::from_utf8(out).unwrap();
        assert!(!written.contains("POINT_DATA"));
        assert!(written.ends_with("CELL_TYPES 0\n\n"));
    }

    #[test]
    fn short_stress_file_reports_element_count() {
        let coord = "4\n1 0 0 0\n2 1 0 0\n3 0 1 0\n4 0 0 1\n";
        let ien = "1\n1 0 1 1 2 3 4\n";
        let disp = "1.0\n\
                    n 1 0 0 0 0 0 0 1 1 1\n\
                    n 2 1 0 0 0 0 0 1 1 1\n\
                    n 3 0 1 0 0 0 0 1 1 1\n\
                    n 4 0 0 1 0 0 0 1 1 1\n";
        let err = run(coord, ien, disp, "").unwrap_err();
        let msg = err.to_string();
        match err {
            ConvertError::StressCountMismatch {
                file,
                expected,
                found,
            } => {
                assert_eq!(file, "str");
                assert_eq!(expected, 1);
                assert_eq!(found, 0);
            }
            other => panic!("unexpected error: {other}"),
        }
        // The stress file carries no leading count; the message must not
        // claim one was declared there.
        assert!(msg.contains("stress records"));
        assert!(!msg.contains("declared"));
    }

    #[test]
    fn malformed_coordinate_is_rejected() {
        let err = run("1\n1 0.0 oops 0.0\n", "0\n", "1.0\n", "").unwrap_err();
        assert!(matches!(
            err,
            ConvertError::MalformedRecord {
                record: 1,
                field: "y",
                ..
            }
        ));
    }

    #[test]
    fn connectivity_outside_mesh_is_rejected() {
        let coord = "2\n1 0 0 0\n2 1 0 0\n";
        let ien = "1\n1 0 1 1 2 3 4\n";
        let err = run(coord, ien, "1.0\n", "").unwrap_err();
        assert!(matches!(
            err,
            ConvertError::NodeIndexOutOfRange { index: 2, .. }
        ));
    }

    #[test]
    fn repeated_runs_are_byte_identical() {
        let dir = tempfile::tempdir().expect("temp dir should create");
        let coord = dir.path().join("run.coord");
        let ien = dir.path().join("run.ien");
        let disp = dir.path().join("run.disp");
        let stress = dir.path().join("run.str");
        fs::write(&coord, "1\n1 0.5 0.5 0.5\n").unwrap();
        fs::write(&ien, "0\n").unwrap();
        fs::write(&disp, "0.5\nn 1 0 0 0 0.1 0.1 0.1 1 1 1\n").unwrap();
        fs::write(&stress, "").unwrap();

        let out_a = dir.path().join("a.vtk");
        let out_b = dir.path().join("b.vtk");
        convert_files(&coord, &ien, &disp, &stress, &out_a).expect("first run should succeed");
        convert_files(&coord, &ien, &disp, &stress, &out_b).expect("second run should succeed");
        assert_eq!(fs::read(&out_a).unwrap(), fs::read(&out_b).unwrap());
    }

    #[test]
    fn missing_input_reports_path_and_mode() {
        let dir = tempfile::tempdir().expect("temp dir should create");
        let missing = dir.path().join("nope.coord");
        let err = convert_files(
            &missing,
            &missing,
            &missing,
            &missing,
            dir.path().join("out.vtk"),
        )
        .unwrap_err();
        match err {
            ConvertError::Open { path, mode, .. } => {
                assert_eq!(path, missing);
                assert_eq!(mode, OpenMode::Read);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
