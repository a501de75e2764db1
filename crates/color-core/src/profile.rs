//! Profile model
//!
//! Wraps a decoded [`IccProfile`](crate::icc::IccProfile) (or a synthesized virtual
//! profile) behind a stable public handle that the pipeline compiler consumes.

use crate::Result;
use crate::color::Xyz;
use crate::color::white_point::D50;
use crate::icc::{ColorSpace as IccColorSpace, IccProfile, ProfileClass};
use crate::math::absolute_adaptation_matrix;

/// High-level shape of a profile's transform data, used to pick a compiler strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProfileKind {
    /// Single-channel grayscale with a TRC.
    Gray,
    /// RGB profile described by colorant matrix + per-channel TRC.
    RgbMatrix,
    /// RGB profile described by A2B/B2A LUTs.
    RgbLut,
    /// Four-channel CMYK profile (always LUT-based).
    Cmyk,
    /// Device-independent Lab identity, used as a chain endpoint.
    Lab,
    /// Two-channel ("duotone"/duo-ink) device space.
    Duo,
    /// Anything else a LUT can still describe generically.
    Other,
}

/// Profile-specific payload. `LabIdentity` has no backing ICC bytes — it represents
/// a device-independent connection point rather than a loaded file.
#[derive(Debug, Clone)]
enum ProfileData {
    Icc(IccProfile),
    LabIdentity { white: Xyz },
}

/// A color profile: either a successfully decoded ICC profile, a synthesized
/// virtual profile, or a placeholder recording why loading failed.
///
/// A `Profile` that failed to load is still a valid chain link to carry around (so a
/// batch of profile lookups doesn't have to fail all-or-nothing); the pipeline compiler
/// rejects it with `PipelineError::ProfileNotLoaded` only once it's actually referenced.
#[derive(Debug, Clone)]
pub struct Profile {
    data: Option<ProfileData>,
    /// Human-readable name for diagnostics (file name, or `*sRGB`-style virtual name).
    pub name: String,
    /// Whether the profile data is usable.
    pub loaded: bool,
    /// Why loading failed, if it did.
    pub load_error: Option<String>,
    /// Coarse shape used by the pipeline compiler.
    pub kind: ProfileKind,
    /// PCS illuminant recorded in the profile header (ICC.1:2022 requires D50, but this
    /// is read from the file rather than assumed, since absolute colorimetric scaling
    /// depends on it).
    pub pcs_illuminant: Xyz,
    /// `media_white / pcs_illuminant`, applied to PCS values produced from this profile
    /// when the transform's intent is absolute colorimetric.
    pub absolute_adaptation_in: [f64; 3],
    /// `pcs_illuminant / media_white`, the inverse of `absolute_adaptation_in`, applied
    /// to PCS values right before converting back to this profile's device space under
    /// absolute colorimetric intent.
    pub absolute_adaptation_out: [f64; 3],
}

/// Derive the two absolute-colorimetric scaling vectors for a profile from its media
/// white point and the PCS illuminant it was built against.
fn absolute_adaptation_vectors(media_white: Xyz, pcs_illuminant: Xyz) -> ([f64; 3], [f64; 3]) {
    let into = absolute_adaptation_matrix(media_white, pcs_illuminant);
    let out = absolute_adaptation_matrix(pcs_illuminant, media_white);
    (
        [into.m[0][0], into.m[1][1], into.m[2][2]],
        [out.m[0][0], out.m[1][1], out.m[2][2]],
    )
}

impl Profile {
    /// Decode an ICC profile from its binary representation.
    pub fn from_bytes(name: impl Into<String>, data: &[u8]) -> Result<Self> {
        let icc = IccProfile::parse(data)?;
        let kind = classify(&icc);
        let pcs_illuminant = icc.header.illuminant.to_xyz();
        let media_white = icc.media_white_point().unwrap_or(D50.xyz);
        let (absolute_adaptation_in, absolute_adaptation_out) =
            absolute_adaptation_vectors(media_white, pcs_illuminant);
        Ok(Self {
            data: Some(ProfileData::Icc(icc)),
            name: name.into(),
            loaded: true,
            load_error: None,
            kind,
            pcs_illuminant,
            absolute_adaptation_in,
            absolute_adaptation_out,
        })
    }

    /// Construct a placeholder for a profile that failed to load.
    ///
    /// Kept as a `Profile` value (rather than surfacing the error immediately) so callers
    /// can build a profile registry without one bad lookup failing every chain that doesn't
    /// actually reference it.
    pub fn failed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            data: None,
            name: name.into(),
            loaded: false,
            load_error: Some(reason.into()),
            kind: ProfileKind::Other,
            pcs_illuminant: D50.xyz,
            absolute_adaptation_in: [1.0, 1.0, 1.0],
            absolute_adaptation_out: [1.0, 1.0, 1.0],
        }
    }

    pub(crate) fn lab_identity(name: impl Into<String>, white: Xyz) -> Self {
        let (absolute_adaptation_in, absolute_adaptation_out) =
            absolute_adaptation_vectors(white, D50.xyz);
        Self {
            data: Some(ProfileData::LabIdentity { white }),
            name: name.into(),
            loaded: true,
            load_error: None,
            kind: ProfileKind::Lab,
            pcs_illuminant: D50.xyz,
            absolute_adaptation_in,
            absolute_adaptation_out,
        }
    }

    pub(crate) fn icc(&self) -> Option<&IccProfile> {
        match &self.data {
            Some(ProfileData::Icc(icc)) => Some(icc),
            _ => None,
        }
    }

    pub(crate) fn lab_white(&self) -> Option<Xyz> {
        match &self.data {
            Some(ProfileData::LabIdentity { white }) => Some(*white),
            _ => None,
        }
    }

    /// Profile description (`desc` tag), if present.
    pub fn description(&self) -> Option<String> {
        self.icc().and_then(|icc| icc.description())
    }

    /// Copyright notice (`cprt` tag), if present.
    pub fn copyright(&self) -> Option<String> {
        self.icc().and_then(|icc| icc.copyright())
    }

    /// Media white point (`wtpt` tag), if present.
    pub fn media_white_point(&self) -> Option<Xyz> {
        match &self.data {
            Some(ProfileData::Icc(icc)) => icc.media_white_point(),
            Some(ProfileData::LabIdentity { white }) => Some(*white),
            None => None,
        }
    }

    /// Number of device-side channels this profile's color space has.
    pub fn channels(&self) -> usize {
        match &self.data {
            Some(ProfileData::Icc(icc)) => icc.input_channels(),
            Some(ProfileData::LabIdentity { .. }) => 3,
            None => 0,
        }
    }

    /// The ICC device color space, if this is a loaded ICC profile.
    pub fn color_space(&self) -> Option<IccColorSpace> {
        self.icc().map(|icc| icc.header.color_space)
    }

    /// The ICC device class, if this is a loaded ICC profile.
    pub fn device_class(&self) -> Option<ProfileClass> {
        self.icc().map(|icc| icc.header.device_class)
    }
}

fn classify(icc: &IccProfile) -> ProfileKind {
    if icc.is_cmyk() {
        ProfileKind::Cmyk
    } else if icc.header.color_space == IccColorSpace::Gray {
        ProfileKind::Gray
    } else if icc.header.color_space == IccColorSpace::Lab {
        ProfileKind::Lab
    } else if icc.is_matrix_shaper() {
        ProfileKind::RgbMatrix
    } else if icc.is_lut_based() {
        match icc.header.color_space.channels() {
            2 => ProfileKind::Duo,
            3 => ProfileKind::RgbLut,
            _ => ProfileKind::Other,
        }
    } else {
        ProfileKind::Other
    }
}
