//! Named-field record format for `DataFormat::ObjectFloat`.
//!
//! Instead of a bare `[f64]` array, an `ObjectFloat` tags its values by the terminal device
//! space (the enum variant itself is the tag) and exposes the field names that space's color
//! model actually uses. Device-channel variants carry both the native `[0, 255]`-style reading
//! (`r`/`c`/`k`/...) and the normalized `[0, 1]` one (`r_f`/`c_f`/`k_f`/...), since callers
//! binding this format to a host language usually want one or the other without re-deriving it.

use crate::profile::ProfileKind;

/// A single color value tagged by its terminal device space.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ObjectFloat {
    /// CIE Lab, connected through a PCS whose white point is always D50 in this crate.
    Lab { l: f64, a: f64, b: f64, white_point: &'static str },
    /// CIE XYZ, same PCS white point as `Lab`.
    Xyz { x: f64, y: f64, z: f64, white_point: &'static str },
    /// RGB device values: `r`/`g`/`b` in `[0, 255]`, `r_f`/`g_f`/`b_f` in `[0, 1]`.
    Rgb {
        r: f64,
        g: f64,
        b: f64,
        r_f: f64,
        g_f: f64,
        b_f: f64,
    },
    /// CMYK device values: `c`/`m`/`y`/`k` in `[0, 255]`, `c_f`/... in `[0, 1]`.
    Cmyk {
        c: f64,
        m: f64,
        y: f64,
        k: f64,
        c_f: f64,
        m_f: f64,
        y_f: f64,
        k_f: f64,
    },
    /// Single-channel gray: `k` in `[0, 255]`, `k_f` in `[0, 1]`.
    Gray { k: f64, k_f: f64 },
    /// Any device space ObjectFloat has no named fields for (Duo, or an unrecognized LUT
    /// space); carried as a plain normalized vector instead of failing outright.
    Device(Vec<f64>),
}

/// PCS white point description this crate's pipelines always bridge through.
pub const PCS_WHITE_POINT: &str = "d50";

impl ObjectFloat {
    /// Wrap a raw pipeline output (Lab in its native range, everything else normalized
    /// `[0, 1]`) into a named-field record per `kind`.
    pub fn from_device_values(kind: ProfileKind, values: &[f64]) -> Self {
        match kind {
            ProfileKind::Lab => ObjectFloat::Lab {
                l: values.first().copied().unwrap_or(0.0),
                a: values.get(1).copied().unwrap_or(0.0),
                b: values.get(2).copied().unwrap_or(0.0),
                white_point: PCS_WHITE_POINT,
            },
            ProfileKind::RgbMatrix | ProfileKind::RgbLut => {
                let r = values.first().copied().unwrap_or(0.0);
                let g = values.get(1).copied().unwrap_or(0.0);
                let b = values.get(2).copied().unwrap_or(0.0);
                ObjectFloat::Rgb {
                    r: r * 255.0,
                    g: g * 255.0,
                    b: b * 255.0,
                    r_f: r,
                    g_f: g,
                    b_f: b,
                }
            }
            ProfileKind::Cmyk => {
                let c = values.first().copied().unwrap_or(0.0);
                let m = values.get(1).copied().unwrap_or(0.0);
                let y = values.get(2).copied().unwrap_or(0.0);
                let k = values.get(3).copied().unwrap_or(0.0);
                ObjectFloat::Cmyk {
                    c: c * 255.0,
                    m: m * 255.0,
                    y: y * 255.0,
                    k: k * 255.0,
                    c_f: c,
                    m_f: m,
                    y_f: y,
                    k_f: k,
                }
            }
            ProfileKind::Gray => {
                let k = values.first().copied().unwrap_or(0.0);
                ObjectFloat::Gray { k: k * 255.0, k_f: k }
            }
            ProfileKind::Duo | ProfileKind::Other => ObjectFloat::Device(values.to_vec()),
        }
    }

    /// Build an XYZ record directly, e.g. for a PCS-side intermediate value.
    pub fn xyz(x: f64, y: f64, z: f64) -> Self {
        ObjectFloat::Xyz {
            x,
            y,
            z,
            white_point: PCS_WHITE_POINT,
        }
    }

    /// Round this record's native-scale fields (R/G/B, C/M/Y/K, L/a/b, X/Y/Z — not the
    /// normalized `_f` fields) to `precision` decimal places. Used by
    /// [`crate::pipeline::CompiledPipeline::transform_object`] to honor
    /// `CompileOptions::precision`.
    pub fn round_native(&self, precision: u32) -> Self {
        let scale = 10f64.powi(precision as i32);
        let round = |v: f64| (v * scale).round() / scale;
        match self {
            ObjectFloat::Lab { l, a, b, white_point } => ObjectFloat::Lab {
                l: round(*l),
                a: round(*a),
                b: round(*b),
                white_point,
            },
            ObjectFloat::Xyz { x, y, z, white_point } => ObjectFloat::Xyz {
                x: round(*x),
                y: round(*y),
                z: round(*z),
                white_point,
            },
            ObjectFloat::Rgb { r, g, b, r_f, g_f, b_f } => ObjectFloat::Rgb {
                r: round(*r),
                g: round(*g),
                b: round(*b),
                r_f: *r_f,
                g_f: *g_f,
                b_f: *b_f,
            },
            ObjectFloat::Cmyk { c, m, y, k, c_f, m_f, y_f, k_f } => ObjectFloat::Cmyk {
                c: round(*c),
                m: round(*m),
                y: round(*y),
                k: round(*k),
                c_f: *c_f,
                m_f: *m_f,
                y_f: *y_f,
                k_f: *k_f,
            },
            ObjectFloat::Gray { k, k_f } => ObjectFloat::Gray { k: round(*k), k_f: *k_f },
            ObjectFloat::Device(values) => ObjectFloat::Device(values.iter().map(|v| round(*v)).collect()),
        }
    }

    /// Flatten back into the raw channel vector the pipeline evaluator expects.
    pub fn to_device_values(&self) -> Vec<f64> {
        match self {
            ObjectFloat::Lab { l, a, b, .. } => vec![*l, *a, *b],
            ObjectFloat::Xyz { x, y, z, .. } => vec![*x, *y, *z],
            ObjectFloat::Rgb { r_f, g_f, b_f, .. } => vec![*r_f, *g_f, *b_f],
            ObjectFloat::Cmyk {
                c_f, m_f, y_f, k_f, ..
            } => vec![*c_f, *m_f, *y_f, *k_f],
            ObjectFloat::Gray { k_f, .. } => vec![*k_f],
            ObjectFloat::Device(values) => values.clone(),
        }
    }
}
