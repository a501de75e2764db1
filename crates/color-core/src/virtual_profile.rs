//! Virtual (synthesized) profiles
//!
//! A handful of well-known RGB working spaces and the two Lab connection spaces
//! are available without loading a file, addressed by a `*`-prefixed name
//! (`"*sRGB"`, `"*AdobeRGB1998"`, ...). This mirrors how color engines commonly let
//! a pipeline chain reference a canonical space without shipping its .icc bytes.
//!
//! [`VirtualProfileId::from_name`] is the one place that maps a string to a profile;
//! callers should match on the enum afterwards rather than re-parsing names downstream.

use crate::color::white_point::WhitePoint;
use crate::icc::header::PROFILE_SIGNATURE;
use crate::math::{bradford_matrix, matrix_from_primaries};
use crate::profile::Profile;

/// A profile that can be synthesized in memory instead of loaded from bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum VirtualProfileId {
    /// IEC 61966-2-1 sRGB.
    SRgb,
    /// Adobe RGB (1998).
    AdobeRgb1998,
    /// Apple RGB (legacy Mac display primaries).
    AppleRgb,
    /// ColorMatch RGB.
    ColorMatchRgb,
    /// ROMM RGB / ProPhoto RGB.
    ProPhotoRgb,
    /// Raw CIELAB values relative to D50, used as a pipeline endpoint.
    LabD50,
    /// Raw CIELAB values relative to D65, used as a pipeline endpoint.
    LabD65,
}

struct RgbSpace {
    name: &'static str,
    primaries: [(f64, f64); 3],
    white: WhitePoint,
    gamma: f64,
    /// sRGB's TRC is its IEC 61966-2-1 piecewise function, not a plain power curve; everything
    /// else here uses a plain gamma.
    is_srgb: bool,
}

impl VirtualProfileId {
    /// Parse a `*`-prefixed virtual profile name.
    ///
    /// Returns `None` both when the name lacks the `*` prefix and when it isn't one of the
    /// known spaces — callers that need to distinguish those two cases should check the
    /// prefix themselves before calling this.
    pub fn from_name(name: &str) -> Option<Self> {
        let body = name.strip_prefix('*')?;
        match body.to_ascii_lowercase().as_str() {
            "srgb" => Some(Self::SRgb),
            "adobergb1998" | "adobergb" => Some(Self::AdobeRgb1998),
            "applergb" => Some(Self::AppleRgb),
            "colormatchrgb" => Some(Self::ColorMatchRgb),
            "prophotorgb" | "rommrgb" => Some(Self::ProPhotoRgb),
            "labd50" | "lab" => Some(Self::LabD50),
            "labd65" => Some(Self::LabD65),
            _ => None,
        }
    }

    fn rgb_space(self) -> Option<RgbSpace> {
        use crate::color::white_point as wp;
        Some(match self {
            Self::SRgb => RgbSpace {
                name: "sRGB",
                primaries: [(0.6400, 0.3300), (0.3000, 0.6000), (0.1500, 0.0600)],
                white: wp::D65,
                gamma: 2.2,
                is_srgb: true,
            },
            Self::AdobeRgb1998 => RgbSpace {
                name: "Adobe RGB (1998)",
                primaries: [(0.6400, 0.3300), (0.2100, 0.7100), (0.1500, 0.0600)],
                white: wp::D65,
                gamma: 2.2,
                is_srgb: false,
            },
            Self::AppleRgb => RgbSpace {
                name: "Apple RGB",
                primaries: [(0.6250, 0.3400), (0.2800, 0.5950), (0.1550, 0.0700)],
                white: wp::D65,
                gamma: 1.8,
                is_srgb: false,
            },
            Self::ColorMatchRgb => RgbSpace {
                name: "ColorMatch RGB",
                primaries: [(0.6300, 0.3400), (0.2950, 0.6050), (0.1500, 0.0750)],
                white: wp::D50,
                gamma: 1.8,
                is_srgb: false,
            },
            Self::ProPhotoRgb => RgbSpace {
                name: "ProPhoto RGB",
                primaries: [(0.7347, 0.2653), (0.1596, 0.8404), (0.0366, 0.0001)],
                white: wp::D50,
                gamma: 1.8,
                is_srgb: false,
            },
            Self::LabD50 | Self::LabD65 => return None,
        })
    }

    /// Synthesize the profile.
    ///
    /// RGB spaces are built as a real matrix/TRC ICC profile (see [`build_matrix_rgb_profile`])
    /// and decoded through the same path as a loaded file. The two Lab spaces have no ICC byte
    /// representation here; they're device-independent connection points the compiler bridges
    /// to/from PCS directly.
    pub fn build(self) -> Profile {
        match self {
            Self::LabD50 => Profile::lab_identity("*LabD50", crate::color::white_point::D50.xyz),
            Self::LabD65 => Profile::lab_identity("*LabD65", crate::color::white_point::D65.xyz),
            _ => {
                let space = self.rgb_space().expect("RGB virtual profiles have a space");
                let bytes = build_matrix_rgb_profile(
                    space.name,
                    space.primaries,
                    space.white,
                    space.gamma,
                    space.is_srgb,
                );
                Profile::from_bytes(format!("*{}", space.name), &bytes)
                    .expect("synthesized virtual profile must decode")
            }
        }
    }
}

/// Synthesize a matrix-shaper profile whose device space is literally PCS XYZ: identity
/// colorant matrix, linear TRCs, D50 white.
///
/// Used by the pipeline compiler to borrow half of [`MatrixShaperPipeline`](crate::pipeline::MatrixShaperPipeline)'s
/// device↔PCS logic when bridging a Lab virtual profile against a real matrix-shaper profile,
/// without needing a separate one-sided transform implementation.
pub(crate) fn identity_pcs_profile() -> Profile {
    let d50 = crate::color::white_point::D50;
    let mut builder = ProfileBuilder::new();
    builder.add_xyz(*b"wtpt", [d50.xyz.x, d50.xyz.y, d50.xyz.z]);
    builder.add_xyz(*b"rXYZ", [1.0, 0.0, 0.0]);
    builder.add_xyz(*b"gXYZ", [0.0, 1.0, 0.0]);
    builder.add_xyz(*b"bXYZ", [0.0, 0.0, 1.0]);
    builder.add_gamma_curve(*b"rTRC", 1.0);
    builder.add_gamma_curve(*b"gTRC", 1.0);
    builder.add_gamma_curve(*b"bTRC", 1.0);
    builder.add_text(*b"desc", "PCS identity bridge");
    builder.add_text(*b"cprt", "no copyright, synthesized in-process");
    let bytes = builder.build(*b"mntr", *b"RGB ", *b"XYZ ");
    Profile::from_bytes("*PcsIdentity", &bytes).expect("identity PCS profile must decode")
}

/// Build a matrix/TRC ICC profile for an RGB working space from its colorimetric definition.
///
/// Colorant tags are stored Bradford-adapted to the PCS illuminant (D50), per ICC.1:2022
/// §6.3.4.2, while the `wtpt` tag records the space's native white point — the same split a
/// real matrix-shaper profile on disk would have.
fn build_matrix_rgb_profile(
    description: &str,
    primaries: [(f64, f64); 3],
    white: WhitePoint,
    gamma: f64,
    is_srgb: bool,
) -> Vec<u8> {
    let native = matrix_from_primaries(primaries, [white.xyz.x, white.xyz.y, white.xyz.z])
        .expect("primaries must be non-degenerate");
    let d50 = crate::color::white_point::D50;
    let adapt = bradford_matrix(&white, &d50);
    let pcs_relative = adapt.multiply(&native);

    let mut builder = ProfileBuilder::new();
    builder.add_xyz(*b"wtpt", [white.xyz.x, white.xyz.y, white.xyz.z]);
    builder.add_xyz(*b"rXYZ", [pcs_relative.m[0][0], pcs_relative.m[1][0], pcs_relative.m[2][0]]);
    builder.add_xyz(*b"gXYZ", [pcs_relative.m[0][1], pcs_relative.m[1][1], pcs_relative.m[2][1]]);
    builder.add_xyz(*b"bXYZ", [pcs_relative.m[0][2], pcs_relative.m[1][2], pcs_relative.m[2][2]]);
    if is_srgb {
        let table = srgb_curve_table();
        builder.add_curve_table(*b"rTRC", &table);
        builder.add_curve_table(*b"gTRC", &table);
        builder.add_curve_table(*b"bTRC", &table);
    } else {
        builder.add_gamma_curve(*b"rTRC", gamma);
        builder.add_gamma_curve(*b"gTRC", gamma);
        builder.add_gamma_curve(*b"bTRC", gamma);
    }
    builder.add_text(*b"desc", description);
    builder.add_text(*b"cprt", "no copyright, synthesized in-process");
    builder.build(*b"mntr", *b"RGB ", *b"XYZ ")
}

/// Minimal ICC tag table + data section writer, used only to synthesize virtual profiles.
struct ProfileBuilder {
    tags: Vec<(u32, Vec<u8>)>,
}

impl ProfileBuilder {
    fn new() -> Self {
        Self { tags: Vec::new() }
    }

    fn add_xyz(&mut self, sig: [u8; 4], xyz: [f64; 3]) {
        let mut body = Vec::with_capacity(20);
        body.extend_from_slice(b"XYZ ");
        body.extend_from_slice(&[0u8; 4]);
        for v in xyz {
            body.extend_from_slice(&s15fixed16(v).to_be_bytes());
        }
        self.tags.push((u32::from_be_bytes(sig), body));
    }

    fn add_gamma_curve(&mut self, sig: [u8; 4], gamma: f64) {
        let mut body = Vec::with_capacity(10);
        body.extend_from_slice(b"curv");
        body.extend_from_slice(&[0u8; 4]);
        body.extend_from_slice(&1u32.to_be_bytes());
        let raw = (gamma * 256.0).round().clamp(0.0, u16::MAX as f64) as u16;
        body.extend_from_slice(&raw.to_be_bytes());
        self.tags.push((u32::from_be_bytes(sig), body));
    }

    /// Write a tabulated `curv` tag (N>1 16-bit sample points), used for curves with no
    /// single-exponent closed form (sRGB's piecewise OETF).
    fn add_curve_table(&mut self, sig: [u8; 4], samples: &[u16]) {
        let mut body = Vec::with_capacity(8 + samples.len() * 2);
        body.extend_from_slice(b"curv");
        body.extend_from_slice(&[0u8; 4]);
        body.extend_from_slice(&(samples.len() as u32).to_be_bytes());
        for &s in samples {
            body.extend_from_slice(&s.to_be_bytes());
        }
        self.tags.push((u32::from_be_bytes(sig), body));
    }

    fn add_text(&mut self, sig: [u8; 4], text: &str) {
        let mut body = Vec::with_capacity(text.len() + 9);
        body.extend_from_slice(b"text");
        body.extend_from_slice(&[0u8; 4]);
        body.extend_from_slice(text.as_bytes());
        body.push(0);
        self.tags.push((u32::from_be_bytes(sig), body));
    }

    fn build(self, device_class: [u8; 4], color_space: [u8; 4], pcs: [u8; 4]) -> Vec<u8> {
        const HEADER_SIZE: usize = 128;
        let table_size = 4 + self.tags.len() * 12;
        let mut offset = HEADER_SIZE + table_size;

        let mut entries = Vec::with_capacity(self.tags.len());
        let mut data_section = Vec::new();
        for (sig, body) in &self.tags {
            let padded = body.len().div_ceil(4) * 4;
            entries.push((*sig, offset as u32, body.len() as u32));
            data_section.extend_from_slice(body);
            data_section.resize(data_section.len() + (padded - body.len()), 0);
            offset += padded;
        }

        let mut out = vec![0u8; HEADER_SIZE];
        out[0..4].copy_from_slice(&(offset as u32).to_be_bytes());
        out[8] = 4;
        out[9] = 0x30; // version 4.3.0
        out[12..16].copy_from_slice(&device_class);
        out[16..20].copy_from_slice(&color_space);
        out[20..24].copy_from_slice(&pcs);
        out[36..40].copy_from_slice(&PROFILE_SIGNATURE.to_be_bytes());
        out[64..68].copy_from_slice(&0u32.to_be_bytes()); // perceptual intent
        let d50 = [0.9642f64, 1.0, 0.8249];
        for (i, v) in d50.iter().enumerate() {
            out[68 + i * 4..72 + i * 4].copy_from_slice(&s15fixed16(*v).to_be_bytes());
        }

        out.extend_from_slice(&(entries.len() as u32).to_be_bytes());
        for (sig, tag_offset, size) in &entries {
            out.extend_from_slice(&sig.to_be_bytes());
            out.extend_from_slice(&tag_offset.to_be_bytes());
            out.extend_from_slice(&size.to_be_bytes());
        }
        out.extend_from_slice(&data_section);
        out
    }
}

fn s15fixed16(v: f64) -> i32 {
    (v * 65536.0).round() as i32
}

/// Sample the sRGB piecewise OETF (IEC 61966-2-1) onto a dense `curv` table, the same way a
/// real sRGB ICC profile on disk represents it (no ICC curve type carries a branching formula
/// directly).
fn srgb_curve_table() -> Vec<u16> {
    const STEPS: usize = 4096;
    (0..STEPS)
        .map(|i| {
            let x = i as f64 / (STEPS - 1) as f64;
            (crate::math::srgb_gamma_decode(x) * 65535.0).round() as u16
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_requires_star_prefix() {
        assert!(VirtualProfileId::from_name("sRGB").is_none());
        assert_eq!(VirtualProfileId::from_name("*sRGB"), Some(VirtualProfileId::SRgb));
        assert_eq!(VirtualProfileId::from_name("*srgb"), Some(VirtualProfileId::SRgb));
    }

    #[test]
    fn from_name_rejects_unknown() {
        assert!(VirtualProfileId::from_name("*NotARealSpace").is_none());
    }

    #[test]
    fn srgb_builds_a_loaded_matrix_profile() {
        let profile = VirtualProfileId::SRgb.build();
        assert!(profile.loaded);
        assert_eq!(profile.kind, crate::profile::ProfileKind::RgbMatrix);
        let white = profile.media_white_point().unwrap();
        assert!((white.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn lab_d50_has_no_icc_bytes_but_is_loaded() {
        let profile = VirtualProfileId::LabD50.build();
        assert!(profile.loaded);
        assert_eq!(profile.kind, crate::profile::ProfileKind::Lab);
    }

    #[test]
    fn identity_pcs_profile_is_a_matrix_shaper_at_d50() {
        let profile = identity_pcs_profile();
        assert!(profile.loaded);
        assert_eq!(profile.kind, crate::profile::ProfileKind::RgbMatrix);
        let white = profile.media_white_point().unwrap();
        assert!((white.y - 1.0).abs() < 1e-6);
    }
}
