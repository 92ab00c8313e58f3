//! Run summary reported after a GeoFEST-to-VTK conversion.

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionSummary {
    /// Node count declared by the coordinate file.
    pub num_nodes: usize,
    /// Element count declared by the connectivity file.
    pub num_elements: usize,
    /// Time step read from the kinematics file, used to normalize velocities.
    pub time_step: f64,
}

impl ConversionSummary {
    pub fn new(num_nodes: usize, num_elements: usize, time_step: f64) -> Self {
        Self {
            num_nodes,
            num_elements,
            time_step,
        }
    }
}
