//! C-scan plane extraction
//!
//! Cuts a 2-D cross-section out of a reconstructed volume along one of
//! the three principal orientations.

use ndarray::{Array2, ArrayView3, Axis};

use crate::error::ProcessError;
use crate::spectrum::linspace;

/// Orientation and parameters of a plane cut.
///
/// Each variant carries exactly the parameters its orientation needs, so
/// a missing scan extent or depth axis is unrepresentable.
#[derive(Debug, Clone, Copy)]
pub enum SliceMode<'a> {
    /// Fix the first spatial axis at the coordinate nearest at or above
    /// `target` [mm]; yields a [second-axis, depth] plane. `y_max` is the
    /// scanning distance covered by the first axis [mm].
    XDepth { target: f64, y_max: f64 },

    /// Fix the second spatial axis; yields a [first-axis, depth] plane.
    YDepth { target: f64, y_max: f64 },

    /// Fix the depth axis; yields a [first-axis, second-axis] plane.
    /// `depth` is the volume's depth axis [mm].
    XY { target: f64, depth: &'a [f64] },
}

/// Result of a plane cut.
#[derive(Debug, Clone)]
pub struct SliceOutcome {
    /// Extracted plane.
    pub plane: Array2<f64>,

    /// Index selected along the fixed axis.
    pub index: usize,

    /// True when `target` fell outside the axis range and the cut fell
    /// back to index 0. Callers must check this before trusting output
    /// near the volume boundary.
    pub out_of_range: bool,
}

/// First index whose axis value is at or above `target` (nearest-ceiling,
/// not nearest-neighbor); index 0 with a flag when the target is outside
/// the covered range.
fn ceiling_index(axis: &[f64], target: f64) -> (usize, bool) {
    if target < axis[0] || target > axis[axis.len() - 1] {
        return (0, true);
    }
    let index = axis.iter().position(|&v| v >= target).unwrap_or(0);
    (index, false)
}

/// Extract a 2-D plane from a C-scan volume.
///
/// # Arguments
/// * `cscan` - Volume indexed [first-spatial, second-spatial, depth]
/// * `mode` - Cut orientation with its parameters
pub fn analyze_cscan(
    cscan: ArrayView3<'_, f64>,
    mode: SliceMode<'_>,
) -> Result<SliceOutcome, ProcessError> {
    let (nx, ny, nd) = cscan.dim();
    if nx == 0 || ny == 0 || nd == 0 {
        return Err(ProcessError::InvalidConfig(
            "C-scan volume has an empty axis".into(),
        ));
    }

    let (axis_index, fixed_axis) = match mode {
        SliceMode::XDepth { target, y_max } => {
            validate_extent(y_max)?;
            (ceiling_index(&linspace(0.0, y_max, nx), target), Axis(0))
        }
        SliceMode::YDepth { target, y_max } => {
            validate_extent(y_max)?;
            (ceiling_index(&linspace(0.0, y_max, ny), target), Axis(1))
        }
        SliceMode::XY { target, depth } => {
            if depth.len() != nd {
                return Err(ProcessError::LengthMismatch {
                    expected: nd,
                    got: depth.len(),
                });
            }
            (ceiling_index(depth, target), Axis(2))
        }
    };

    let (index, out_of_range) = axis_index;
    Ok(SliceOutcome {
        plane: cscan.index_axis(fixed_axis, index).to_owned(),
        index,
        out_of_range,
    })
}

fn validate_extent(y_max: f64) -> Result<(), ProcessError> {
    if y_max <= 0.0 {
        return Err(ProcessError::InvalidConfig(format!(
            "scan extent must be positive, got {} mm",
            y_max
        )));
    }
    Ok(())
}
