//! Chromatic Adaptation Transforms
//!
//! Chromatic adaptation transforms convert colors from one white point to another.
//! The most commonly used method is Bradford, which is the ICC default.
//!
//! References:
//! - ICC.1:2022 Annex E
//! - Lindbloom: http://www.brucelindbloom.com/index.html?Eqn_ChromAdapt.html

use crate::color::{WhitePoint, Xyz};
use crate::math::Matrix3x3;

/// Chromatic adaptation method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChromaticAdaptationMethod {
    /// Bradford adaptation (ICC default, recommended)
    #[default]
    Bradford,
    /// Von Kries adaptation
    VonKries,
    /// XYZ Scaling (simple but less accurate)
    XyzScaling,
    /// No adaptation (identity)
    None,
}

// ============================================================================
// Adaptation matrices (to/from cone response space)
// ============================================================================

/// Bradford matrix: XYZ → LMS (cone response)
const BRADFORD_XYZ_TO_LMS: Matrix3x3 = Matrix3x3::new([
    [0.8951000, 0.2664000, -0.1614000],
    [-0.7502000, 1.7135000, 0.0367000],
    [0.0389000, -0.0685000, 1.0296000],
]);

/// Bradford matrix: LMS → XYZ (inverse)
const BRADFORD_LMS_TO_XYZ: Matrix3x3 = Matrix3x3::new([
    [0.9869929, -0.1470543, 0.1599627],
    [0.4323053, 0.5183603, 0.0492912],
    [-0.0085287, 0.0400428, 0.9684867],
]);

/// Von Kries matrix: XYZ → LMS
const VON_KRIES_XYZ_TO_LMS: Matrix3x3 = Matrix3x3::new([
    [0.4002400, 0.7076000, -0.0808100],
    [-0.2263000, 1.1653200, 0.0457000],
    [0.0000000, 0.0000000, 0.9182200],
]);

/// Von Kries matrix: LMS → XYZ
const VON_KRIES_LMS_TO_XYZ: Matrix3x3 = Matrix3x3::new([
    [1.8599364, -1.1293816, 0.2198974],
    [0.3611914, 0.6388125, -0.0000064],
    [0.0000000, 0.0000000, 1.0890636],
]);

/// Get the XYZ to LMS matrix for a given method
fn xyz_to_lms_matrix(method: ChromaticAdaptationMethod) -> Matrix3x3 {
    match method {
        ChromaticAdaptationMethod::Bradford => BRADFORD_XYZ_TO_LMS,
        ChromaticAdaptationMethod::VonKries => VON_KRIES_XYZ_TO_LMS,
        ChromaticAdaptationMethod::XyzScaling | ChromaticAdaptationMethod::None => {
            Matrix3x3::identity()
        }
    }
}

/// Get the LMS to XYZ matrix for a given method
fn lms_to_xyz_matrix(method: ChromaticAdaptationMethod) -> Matrix3x3 {
    match method {
        ChromaticAdaptationMethod::Bradford => BRADFORD_LMS_TO_XYZ,
        ChromaticAdaptationMethod::VonKries => VON_KRIES_LMS_TO_XYZ,
        ChromaticAdaptationMethod::XyzScaling | ChromaticAdaptationMethod::None => {
            Matrix3x3::identity()
        }
    }
}

/// Compute the chromatic adaptation matrix for converting from one white point to another
///
/// The returned matrix M can be used as: XYZ_dest = M × XYZ_src
///
/// # Arguments
/// * `src_white` - Source white point
/// * `dst_white` - Destination white point
/// * `method` - Adaptation method to use
pub fn adaptation_matrix(
    src_white: &WhitePoint,
    dst_white: &WhitePoint,
    method: ChromaticAdaptationMethod,
) -> Matrix3x3 {
    if method == ChromaticAdaptationMethod::None {
        return Matrix3x3::identity();
    }

    // Get the transformation matrices
    let m_a = xyz_to_lms_matrix(method);
    let m_a_inv = lms_to_xyz_matrix(method);

    // Convert white points to LMS
    let src_lms = m_a.multiply_vec(src_white.xyz.to_array());
    let dst_lms = m_a.multiply_vec(dst_white.xyz.to_array());

    // Build the diagonal scaling matrix
    let scale = if method == ChromaticAdaptationMethod::XyzScaling {
        // For XYZ scaling, use XYZ directly
        Matrix3x3::diagonal(
            dst_white.xyz.x / src_white.xyz.x,
            dst_white.xyz.y / src_white.xyz.y,
            dst_white.xyz.z / src_white.xyz.z,
        )
    } else {
        // For Bradford/Von Kries, scale in LMS space
        Matrix3x3::diagonal(
            if src_lms[0].abs() > 1e-10 {
                dst_lms[0] / src_lms[0]
            } else {
                1.0
            },
            if src_lms[1].abs() > 1e-10 {
                dst_lms[1] / src_lms[1]
            } else {
                1.0
            },
            if src_lms[2].abs() > 1e-10 {
                dst_lms[2] / src_lms[2]
            } else {
                1.0
            },
        )
    };

    if method == ChromaticAdaptationMethod::XyzScaling {
        scale
    } else {
        // M = M_A^-1 × Scale × M_A
        m_a_inv.multiply(&scale.multiply(&m_a))
    }
}

/// Compute the Bradford adaptation matrix (convenience function)
///
/// This is the most commonly used method and is the ICC default.
#[inline]
pub fn bradford_matrix(src_white: &WhitePoint, dst_white: &WhitePoint) -> Matrix3x3 {
    adaptation_matrix(src_white, dst_white, ChromaticAdaptationMethod::Bradford)
}

/// Adapt an XYZ color from one white point to another
///
/// # Arguments
/// * `xyz` - Color to adapt
/// * `src_white` - Source white point
/// * `dst_white` - Destination white point
/// * `method` - Adaptation method to use
#[inline]
pub fn adapt_xyz(
    xyz: Xyz,
    src_white: &WhitePoint,
    dst_white: &WhitePoint,
    method: ChromaticAdaptationMethod,
) -> Xyz {
    let matrix = adaptation_matrix(src_white, dst_white, method);
    Xyz::from_array(matrix.multiply_vec(xyz.to_array()))
}

/// Adapt an XYZ color using Bradford adaptation (convenience function)
#[inline]
pub fn adapt_xyz_bradford(xyz: Xyz, src_white: &WhitePoint, dst_white: &WhitePoint) -> Xyz {
    adapt_xyz(xyz, src_white, dst_white, ChromaticAdaptationMethod::Bradford)
}

/// Build the diagonal scaling matrix absolute colorimetric intent applies on top of the
/// ordinary relative-colorimetric transform: `diag(media_white / pcs_illuminant)`.
///
/// Unlike [`bradford_matrix`], this is a plain per-component ratio, not a cone-response
/// adaptation: absolute colorimetric is defined as "reproduce the media white exactly",
/// so it scales PCS values by how far a profile's actual media white sits from the PCS
/// illuminant (almost always D50) instead of adapting chromaticity.
#[inline]
pub fn absolute_adaptation_matrix(media_white: Xyz, pcs_illuminant: Xyz) -> Matrix3x3 {
    let scale = |w: f64, i: f64| if i.abs() > 1e-12 { w / i } else { 1.0 };
    Matrix3x3::diagonal(
        scale(media_white.x, pcs_illuminant.x),
        scale(media_white.y, pcs_illuminant.y),
        scale(media_white.z, pcs_illuminant.z),
    )
}

/// Pre-computed D65 → D50 Bradford matrix
///
/// This is the most common adaptation in ICC workflows.
pub const D65_TO_D50_BRADFORD: Matrix3x3 = Matrix3x3::new([
    [1.0478112, 0.0228866, -0.0501270],
    [0.0295424, 0.9904844, -0.0170491],
    [-0.0092345, 0.0150436, 0.7521316],
]);

/// Pre-computed D50 → D65 Bradford matrix
pub const D50_TO_D65_BRADFORD: Matrix3x3 = Matrix3x3::new([
    [0.9555766, -0.0230393, 0.0631636],
    [-0.0282895, 1.0099416, 0.0210077],
    [0.0122982, -0.0204830, 1.3299098],
]);
