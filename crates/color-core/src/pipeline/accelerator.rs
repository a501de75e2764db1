//! Device-space LUT accelerator
//!
//! Precomputes a dense grid over a 3-channel-in, N-channel-out (1..4) [`CompiledPipeline`] so
//! repeated 8-bit pixel transforms become a single tetrahedral lookup instead of re-running the
//! whole chain per pixel. Grid vertices are independent, so the build is parallelized with
//! `rayon`.

use rayon::prelude::*;

use crate::Result;
use crate::math::tetrahedral_interp_n;
use crate::pipeline::CompiledPipeline;
use crate::pipeline::error::PipelineError;

/// A precomputed `grid_size`^3 lookup table over a compiled pipeline's device space.
#[derive(Debug, Clone)]
pub struct DeviceLutAccelerator {
    grid_size: usize,
    output_channels: usize,
    /// Flattened `grid_size^3 * output_channels` samples, row-major in (r, g, b) grid index order.
    samples: Vec<f64>,
}

impl DeviceLutAccelerator {
    /// Build a grid by evaluating `pipeline` at every vertex of a `grid_size`^3 cube.
    ///
    /// The pipeline's first profile must have exactly 3 input channels; its last profile's
    /// output channel count (1..4: gray, RGB, CMYK, ...) becomes this accelerator's
    /// [`output_channels`](Self::output_channels).
    pub fn build(pipeline: &CompiledPipeline, grid_size: usize) -> Result<Self> {
        if pipeline.input_channels() != 3 {
            return Err(PipelineError::AcceleratorRequiresThreeChannelInput {
                input: pipeline.input_channels(),
            }
            .into());
        }
        let output_channels = pipeline.output_channels();
        if !(1..=4).contains(&output_channels) {
            return Err(PipelineError::AcceleratorOutputChannelsOutOfRange {
                output: output_channels,
            }
            .into());
        }

        let n = grid_size.max(2);
        let step = 1.0 / (n - 1) as f64;

        let samples: Vec<f64> = (0..n * n * n)
            .into_par_iter()
            .flat_map_iter(|idx| {
                let r = idx / (n * n);
                let g = (idx / n) % n;
                let b = idx % n;
                let input = [r as f64 * step, g as f64 * step, b as f64 * step];
                let out = pipeline
                    .transform(&input)
                    .unwrap_or_else(|_| vec![0.0; output_channels]);
                (0..output_channels).map(move |c| out.get(c).copied().unwrap_or(0.0))
            })
            .collect();

        Ok(Self {
            grid_size: n,
            output_channels,
            samples,
        })
    }

    /// Grid resolution per axis.
    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Device channel count this accelerator produces per pixel.
    pub fn output_channels(&self) -> usize {
        self.output_channels
    }

    /// Look up a normalized `[0, 1]` RGB input with tetrahedral interpolation.
    pub fn lookup(&self, rgb: [f64; 3]) -> Vec<f64> {
        tetrahedral_interp_n(&self.samples, self.grid_size, self.output_channels, rgb)
    }

    /// Transform a flat buffer of 8-bit pixels, `input_channels`-wide (3 for RGB, 4 for RGBA),
    /// into `output_channels` device bytes per pixel, optionally appending an alpha byte.
    ///
    /// `has_alpha` selects whether `src` carries a 4th (alpha) byte per pixel. `output_alpha`
    /// appends an alpha byte to each output pixel; `preserve_alpha` controls whether that byte
    /// is the source alpha or a flat 255. `length` truncates the number of pixels processed
    /// (useful for partially-filled buffers); pass `usize::MAX` to process the whole buffer.
    pub fn transform8(
        &self,
        src: &[u8],
        dst: &mut [u8],
        has_alpha: bool,
        output_alpha: bool,
        preserve_alpha: bool,
        length: usize,
    ) {
        let src_stride = if has_alpha { 4 } else { 3 };
        let dst_stride = self.output_channels + usize::from(output_alpha);

        let pixel_count = (src.len() / src_stride).min(length);
        for i in 0..pixel_count {
            let s = &src[i * src_stride..i * src_stride + src_stride];
            let d = &mut dst[i * dst_stride..i * dst_stride + dst_stride];
            let rgb = [s[0] as f64 / 255.0, s[1] as f64 / 255.0, s[2] as f64 / 255.0];
            let out = self.lookup(rgb);
            for (c, v) in out.iter().enumerate() {
                d[c] = (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8;
            }
            if output_alpha {
                d[self.output_channels] = if preserve_alpha && has_alpha { s[3] } else { 255 };
            }
        }
    }

    /// Transform a buffer of 8-bit RGB pixels through the cached grid. Requires an accelerator
    /// built from a 3-channel-output pipeline.
    pub fn transform_rgb8(&self, src: &[u8], dst: &mut [u8]) {
        self.transform8(src, dst, false, false, false, usize::MAX);
    }

    /// Transform a buffer of 8-bit RGBA pixels through the cached grid, preserving alpha.
    /// Requires an accelerator built from a 3-channel-output pipeline.
    pub fn transform_rgba8(&self, src: &[u8], dst: &mut [u8]) {
        self.transform8(src, dst, true, true, true, usize::MAX);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{CompileOptions, RenderIntent};
    use crate::virtual_profile::VirtualProfileId;

    #[test]
    fn builds_and_looks_up_a_small_grid() {
        let srgb = VirtualProfileId::SRgb.build();
        let adobe = VirtualProfileId::AdobeRgb1998.build();
        let compiled = CompiledPipeline::compile(
            &[srgb, adobe],
            &[RenderIntent::RelativeColorimetric],
            CompileOptions::default(),
        )
        .unwrap();

        let accel = DeviceLutAccelerator::build(&compiled, 5).unwrap();
        assert_eq!(accel.grid_size(), 5);

        let direct = compiled.transform(&[0.3, 0.6, 0.9]).unwrap();
        let via_grid = accel.lookup([0.3, 0.6, 0.9]);
        for (a, b) in direct.iter().zip(via_grid.iter()) {
            assert!((a - b).abs() < 0.05);
        }
    }

    #[test]
    fn transform_rgb8_round_trips_through_the_grid() {
        let srgb = VirtualProfileId::SRgb.build();
        let adobe = VirtualProfileId::AdobeRgb1998.build();
        let compiled = CompiledPipeline::compile(
            &[srgb, adobe],
            &[RenderIntent::RelativeColorimetric],
            CompileOptions::default(),
        )
        .unwrap();
        let accel = DeviceLutAccelerator::build(&compiled, 17).unwrap();

        let src = [128u8, 64, 200];
        let mut dst = [0u8; 3];
        accel.transform_rgb8(&src, &mut dst);
        assert_ne!(dst, [0, 0, 0]);
    }
}
