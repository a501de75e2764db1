//! Public byte-buffer transform API
//!
//! [`Transform`] wraps a [`CompiledPipeline`] behind the pixel-buffer surface most callers
//! actually touch: pick a source/destination profile, a pixel [`Layout`] on each side, and an
//! intent, then push raw buffers through it.

use crate::object_float::ObjectFloat;
use crate::pipeline::{CompileOptions, CompiledPipeline, RenderIntent, TransformFlags};
use crate::profile::Profile;
use crate::{Error, Result};

/// Pixel layout for a transform's source or destination buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// RGB, 8 bits per channel.
    Rgb8,
    /// RGBA, 8 bits per channel; alpha passes through unmodified.
    Rgba8,
    /// RGB, 16 bits per channel, little-endian.
    Rgb16,
    /// RGBA, 16 bits per channel, little-endian; alpha passes through unmodified.
    Rgba16,
    /// CMYK, 8 bits per channel.
    Cmyk8,
    /// Grayscale, 8 bits per channel.
    Gray8,
}

impl Layout {
    /// Bytes occupied by one pixel in this layout.
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            Layout::Rgb8 => 3,
            Layout::Rgba8 => 4,
            Layout::Rgb16 => 6,
            Layout::Rgba16 => 8,
            Layout::Cmyk8 => 4,
            Layout::Gray8 => 1,
        }
    }

    /// Device channel count this layout carries through the pipeline (excludes alpha).
    fn device_channels(&self) -> usize {
        match self {
            Layout::Rgb8 | Layout::Rgba8 | Layout::Rgb16 | Layout::Rgba16 => 3,
            Layout::Cmyk8 => 4,
            Layout::Gray8 => 1,
        }
    }

    fn has_alpha(&self) -> bool {
        matches!(self, Layout::Rgba8 | Layout::Rgba16)
    }

    fn decode(&self, px: &[u8]) -> (Vec<f64>, Option<[u8; 2]>) {
        match self {
            Layout::Rgb8 | Layout::Cmyk8 | Layout::Gray8 => {
                (px.iter().map(|&b| b as f64 / 255.0).collect(), None)
            }
            Layout::Rgba8 => (
                px[..3].iter().map(|&b| b as f64 / 255.0).collect(),
                Some([px[3], 0]),
            ),
            Layout::Rgb16 => (
                px.chunks_exact(2)
                    .map(|c| u16::from_le_bytes([c[0], c[1]]) as f64 / 65535.0)
                    .collect(),
                None,
            ),
            Layout::Rgba16 => (
                px[..6]
                    .chunks_exact(2)
                    .map(|c| u16::from_le_bytes([c[0], c[1]]) as f64 / 65535.0)
                    .collect(),
                Some([px[6], px[7]]),
            ),
        }
    }

    fn encode(&self, values: &[f64], alpha: Option<[u8; 2]>, dst: &mut [u8]) {
        match self {
            Layout::Rgb8 | Layout::Cmyk8 | Layout::Gray8 => {
                for (v, d) in values.iter().zip(dst.iter_mut()) {
                    *d = (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8;
                }
            }
            Layout::Rgba8 => {
                for (v, d) in values.iter().zip(dst[..3].iter_mut()) {
                    *d = (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8;
                }
                dst[3] = alpha.map(|a| a[0]).unwrap_or(255);
            }
            Layout::Rgb16 => {
                for (v, d) in values.iter().zip(dst.chunks_exact_mut(2)) {
                    d.copy_from_slice(&((v.clamp(0.0, 1.0) * 65535.0 + 0.5) as u16).to_le_bytes());
                }
            }
            Layout::Rgba16 => {
                for (v, d) in values.iter().zip(dst[..6].chunks_exact_mut(2)) {
                    d.copy_from_slice(&((v.clamp(0.0, 1.0) * 65535.0 + 0.5) as u16).to_le_bytes());
                }
                let a = alpha.unwrap_or([255, 255]);
                dst[6] = a[0];
                dst[7] = a[1];
            }
        }
    }
}

/// Options controlling how a [`Transform`] is built.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransformOptions {
    /// Rendering intent used to bridge the source and destination profiles.
    pub intent: RenderIntent,
    /// Enable black point compensation.
    pub black_point_compensation: bool,
    /// Clamp output to the valid `[0, 1]` device range.
    pub clamp_output: bool,
}

/// A compiled color transform between two profiles, bound to fixed pixel layouts.
pub struct Transform {
    compiled: CompiledPipeline,
    src_layout: Layout,
    dst_layout: Layout,
}

impl Transform {
    /// Build a transform from `src_profile`/`src_layout` to `dst_profile`/`dst_layout`.
    pub fn new(
        src_profile: &Profile,
        src_layout: Layout,
        dst_profile: &Profile,
        dst_layout: Layout,
        options: TransformOptions,
    ) -> Result<Self> {
        let mut flags = TransformFlags::new();
        flags.clamp_output = options.clamp_output;
        if options.black_point_compensation {
            flags = flags.with_bpc();
        }

        let compile_options = CompileOptions {
            flags,
            ..CompileOptions::default()
        };
        let compiled = CompiledPipeline::compile(
            &[src_profile.clone(), dst_profile.clone()],
            &[options.intent],
            compile_options,
        )?;

        if compiled.input_channels() != src_layout.device_channels() {
            return Err(Error::BufferSize {
                expected: src_layout.device_channels(),
                actual: compiled.input_channels(),
            });
        }
        if compiled.output_channels() != dst_layout.device_channels() {
            return Err(Error::BufferSize {
                expected: dst_layout.device_channels(),
                actual: compiled.output_channels(),
            });
        }

        Ok(Self {
            compiled,
            src_layout,
            dst_layout,
        })
    }

    /// Transform pixel data from `src` into `dst`, both laid out per the layouts this
    /// transform was built with.
    pub fn transform(&self, src: &[u8], dst: &mut [u8]) -> Result<()> {
        let src_bpp = self.src_layout.bytes_per_pixel();
        let dst_bpp = self.dst_layout.bytes_per_pixel();
        if src.len() % src_bpp != 0 {
            return Err(Error::BufferSize {
                expected: src_bpp,
                actual: src.len(),
            });
        }
        let pixel_count = src.len() / src_bpp;
        if dst.len() < pixel_count * dst_bpp {
            return Err(Error::BufferSize {
                expected: pixel_count * dst_bpp,
                actual: dst.len(),
            });
        }

        for (src_px, dst_px) in src.chunks_exact(src_bpp).zip(dst.chunks_exact_mut(dst_bpp)) {
            let (input, alpha) = self.src_layout.decode(src_px);
            let output = self.compiled.transform(&input)?;
            let alpha = if self.dst_layout.has_alpha() { alpha } else { None };
            self.dst_layout.encode(&output, alpha, dst_px);
        }
        Ok(())
    }

    /// Transform a single color as a named-field [`ObjectFloat`] record rather than raw bytes,
    /// tagged by this transform's source and destination device spaces. Alpha has no place in
    /// this representation and is never touched.
    pub fn transform_object(&self, input: &ObjectFloat) -> Result<ObjectFloat> {
        self.compiled.transform_object(input)
    }

    /// Transform pixel data in place. Only valid when source and destination layouts match.
    pub fn transform_in_place(&self, data: &mut [u8]) -> Result<()> {
        if self.src_layout != self.dst_layout {
            return Err(Error::BufferSize {
                expected: self.src_layout.bytes_per_pixel(),
                actual: self.dst_layout.bytes_per_pixel(),
            });
        }
        let bpp = self.src_layout.bytes_per_pixel();
        for px in data.chunks_exact_mut(bpp) {
            let (input, alpha) = self.src_layout.decode(px);
            let output = self.compiled.transform(&input)?;
            self.dst_layout.encode(&output, alpha, px);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::virtual_profile::VirtualProfileId;

    #[test]
    fn test_layout_bytes_per_pixel() {
        assert_eq!(Layout::Rgb8.bytes_per_pixel(), 3);
        assert_eq!(Layout::Rgba8.bytes_per_pixel(), 4);
        assert_eq!(Layout::Cmyk8.bytes_per_pixel(), 4);
    }

    #[test]
    fn test_transform_identity_profile() {
        let srgb = VirtualProfileId::SRgb.build();
        let transform = Transform::new(
            &srgb,
            Layout::Rgb8,
            &srgb,
            Layout::Rgb8,
            TransformOptions {
                intent: RenderIntent::RelativeColorimetric,
                clamp_output: true,
                ..Default::default()
            },
        )
        .unwrap();

        let src = [255u8, 128, 64];
        let mut dst = [0u8; 3];
        transform.transform(&src, &mut dst).unwrap();
        for (s, d) in src.iter().zip(dst.iter()) {
            assert!((*s as i32 - *d as i32).abs() <= 1);
        }
    }

    #[test]
    fn test_rgba8_preserves_alpha() {
        let srgb = VirtualProfileId::SRgb.build();
        let adobe = VirtualProfileId::AdobeRgb1998.build();
        let transform = Transform::new(
            &srgb,
            Layout::Rgba8,
            &adobe,
            Layout::Rgba8,
            TransformOptions {
                intent: RenderIntent::RelativeColorimetric,
                clamp_output: true,
                ..Default::default()
            },
        )
        .unwrap();

        let src = [10u8, 20, 30, 42];
        let mut dst = [0u8; 4];
        transform.transform(&src, &mut dst).unwrap();
        assert_eq!(dst[3], 42);
    }

    #[test]
    fn test_transform_object_tags_with_destination_device_space() {
        let srgb = VirtualProfileId::SRgb.build();
        let lab = VirtualProfileId::LabD50.build();
        let transform = Transform::new(
            &srgb,
            Layout::Rgb8,
            &lab,
            Layout::Rgb8,
            TransformOptions {
                intent: RenderIntent::RelativeColorimetric,
                clamp_output: true,
                ..Default::default()
            },
        )
        .unwrap();

        let input = ObjectFloat::from_device_values(crate::profile::ProfileKind::RgbMatrix, &[1.0, 1.0, 1.0]);
        let out = transform.transform_object(&input).unwrap();
        match out {
            ObjectFloat::Lab { l, white_point, .. } => {
                assert!(l > 90.0);
                assert_eq!(white_point, "d50");
            }
            other => panic!("expected Lab, got {other:?}"),
        }
    }
}
