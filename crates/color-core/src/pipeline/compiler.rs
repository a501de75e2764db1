//! Pipeline compiler
//!
//! Turns a chain of profiles connected by rendering intents into a single
//! [`CompiledPipeline`] that can be evaluated one color at a time or baked into a
//! [`DeviceLutAccelerator`](crate::pipeline::DeviceLutAccelerator) for fast 8-bit transforms.
//!
//! Interior links are always two loaded ICC profiles, composed with the existing
//! [`Pipeline::from_profiles`]. A Lab virtual profile may only sit at the first or last
//! position of the chain; there it's bridged to/from PCS XYZ by colorimetric math rather than
//! by any ICC tag, and the remaining ICC side of that link borrows
//! [`MatrixShaperPipeline`](crate::pipeline::MatrixShaperPipeline)'s device↔PCS logic through a
//! synthesized identity profile (see [`crate::virtual_profile::identity_pcs_profile`]).

use crate::Result;
use crate::color::{D50, Lab, WhitePoint, Xyz};
use crate::math::{absolute_adaptation_matrix, bradford_matrix};
use crate::pipeline::error::PipelineError;
use crate::pipeline::{Pipeline, RenderIntent, TransformContext, TransformFlags};
use crate::profile::{Profile, ProfileKind};
use crate::virtual_profile::identity_pcs_profile;

/// Numeric format pixel data arrives/leaves in at the public transform boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum DataFormat {
    /// Named-field records (L/a/b, X/Y/Z, R/G/B, C/M/Y/K, ...) tagged by the terminal device
    /// space; see [`crate::object_float::ObjectFloat`].
    #[default]
    ObjectFloat,
    /// Bare array, normalized `[0, 1]` per channel.
    Device,
    /// Clamped `[0, 255]` integers, still carried as `f64` (quantized to the 8-bit grid).
    Int8,
}

/// Options controlling how a chain is compiled and evaluated.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Pixel numeric format at the public transform boundary.
    pub data_format: DataFormat,
    /// Decimal places retained when rounding `Device`/`Int8` output.
    pub precision: Option<u32>,
    /// Round (vs truncate) when packing a float result into an integer-ish format.
    pub round_output: bool,
    /// Enables building a [`DeviceLutAccelerator`](crate::pipeline::DeviceLutAccelerator) for
    /// this pipeline via [`CompiledPipeline::build_accelerator`].
    pub built_lut: bool,
    /// Grid resolution per axis used if an accelerator is built for this pipeline.
    pub accelerator_grid: usize,
    /// Sample count used when inverting a tabular curve that has no closed-form inverse.
    pub inverse_curve_steps: usize,
    /// Flags forwarded to each pairwise stage (black point compensation, clamping, ...).
    pub flags: TransformFlags,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            data_format: DataFormat::default(),
            precision: None,
            round_output: true,
            built_lut: false,
            accelerator_grid: 33,
            inverse_curve_steps: 4096,
            flags: TransformFlags::new(),
        }
    }
}

/// Colorimetric bridge between a Lab virtual profile's device values and PCS XYZ (always D50).
#[derive(Debug, Clone, Copy)]
struct LabBridge {
    white: Xyz,
    /// Whether this link was compiled for absolute colorimetric intent, in which case the
    /// Lab endpoint's own white is reproduced exactly instead of normalized to D50.
    absolute: bool,
}

impl LabBridge {
    fn device_to_pcs(&self, lab: &[f64]) -> [f64; 3] {
        let white = WhitePoint::new("lab-endpoint", self.white.x, self.white.y, self.white.z);
        let xyz = Lab {
            l: lab.first().copied().unwrap_or(0.0),
            a: lab.get(1).copied().unwrap_or(0.0),
            b: lab.get(2).copied().unwrap_or(0.0),
        }
        .to_xyz_with_white(&white);

        let mut xyz = if self.white.approx_eq(&D50.xyz, 1e-6) {
            xyz.to_array()
        } else {
            bradford_matrix(&white, &D50).multiply_vec(xyz.to_array())
        };
        if self.absolute {
            xyz = absolute_adaptation_matrix(self.white, D50.xyz).multiply_vec(xyz);
        }
        xyz
    }

    fn pcs_to_device(&self, xyz: &[f64]) -> Vec<f64> {
        let mut pcs = Xyz::new(
            xyz.first().copied().unwrap_or(0.0),
            xyz.get(1).copied().unwrap_or(0.0),
            xyz.get(2).copied().unwrap_or(0.0),
        );
        if self.absolute {
            pcs = Xyz::from_array(absolute_adaptation_matrix(D50.xyz, self.white).multiply_vec(pcs.to_array()));
        }
        let white = WhitePoint::new("lab-endpoint", self.white.x, self.white.y, self.white.z);
        let native = if self.white.approx_eq(&D50.xyz, 1e-6) {
            pcs
        } else {
            Xyz::from_array(bradford_matrix(&D50, &white).multiply_vec(pcs.to_array()))
        };
        let lab = Lab::from_xyz_with_white(native, &white);
        vec![lab.l, lab.a, lab.b]
    }
}

/// One resolved link between two adjacent positions in a compiled chain.
#[derive(Debug, Clone)]
enum Stage {
    /// Both sides are loaded ICC profiles, composed directly.
    Direct(Pipeline),
    /// Lab device values on the upstream side, device↔PCS on the downstream side.
    LabIn { bridge: LabBridge, to_device: Pipeline },
    /// Mirror of `LabIn`, Lab device values on the downstream side.
    LabOut { from_device: Pipeline, bridge: LabBridge },
    /// Both sides are Lab virtual profiles; bridged directly through PCS XYZ.
    LabToLab { src: LabBridge, dst: LabBridge },
}

impl Stage {
    fn input_channels(&self) -> usize {
        match self {
            Stage::Direct(p) => p.input_channels(),
            Stage::LabIn { .. } | Stage::LabToLab { .. } => 3,
            Stage::LabOut { from_device, .. } => from_device.input_channels(),
        }
    }

    fn output_channels(&self) -> usize {
        match self {
            Stage::Direct(p) => p.output_channels(),
            Stage::LabIn { to_device, .. } => to_device.output_channels(),
            Stage::LabOut { .. } | Stage::LabToLab { .. } => 3,
        }
    }

    fn transform(&self, input: &[f64]) -> Vec<f64> {
        match self {
            Stage::Direct(p) => p.transform_generic(input),
            Stage::LabIn { bridge, to_device } => {
                let xyz = bridge.device_to_pcs(input);
                to_device.transform_generic(&xyz)
            }
            Stage::LabOut { from_device, bridge } => {
                let xyz = from_device.transform_generic(input);
                bridge.pcs_to_device(&xyz)
            }
            Stage::LabToLab { src, dst } => {
                let xyz = src.device_to_pcs(input);
                dst.pcs_to_device(&xyz)
            }
        }
    }
}

/// A profile/intent chain compiled into an executable sequence of transforms.
#[derive(Debug, Clone)]
pub struct CompiledPipeline {
    stages: Vec<Stage>,
    options: CompileOptions,
    input_channels: usize,
    output_channels: usize,
    input_kind: ProfileKind,
    output_kind: ProfileKind,
}

impl CompiledPipeline {
    /// Compile a chain of profiles connected by rendering intents.
    ///
    /// `profiles` and `intents` mirror the spec's alternating profile/intent/profile/.../profile
    /// chain as parallel arrays: `intents[i]` is the rendering intent used to bridge
    /// `profiles[i]` into `profiles[i + 1]`, so `intents.len()` must equal `profiles.len() - 1`.
    pub fn compile(profiles: &[Profile], intents: &[RenderIntent], options: CompileOptions) -> Result<Self> {
        tracing::debug!(
            profiles = profiles.len(),
            names = ?profiles.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
            "compiling pipeline chain"
        );

        if profiles.len() < 2 {
            return Err(PipelineError::ChainTooShort(profiles.len()).into());
        }
        if intents.len() != profiles.len() - 1 {
            return Err(PipelineError::OddChainRequired(profiles.len() + intents.len()).into());
        }

        for (position, profile) in profiles.iter().enumerate() {
            if !profile.loaded {
                return Err(PipelineError::ProfileNotLoaded {
                    position,
                    reason: profile
                        .load_error
                        .clone()
                        .unwrap_or_else(|| "profile not loaded".to_string()),
                }
                .into());
            }
            let is_endpoint = position == 0 || position == profiles.len() - 1;
            if profile.kind == ProfileKind::Lab && !is_endpoint {
                return Err(PipelineError::LabProfileMustBeEndpoint(position).into());
            }
        }

        let mut stages = Vec::with_capacity(profiles.len() - 1);
        for i in 0..profiles.len() - 1 {
            let ctx = TransformContext::new()
                .with_intent(intents[i])
                .with_flags(options.flags)
                .with_inverse_curve_steps(options.inverse_curve_steps);
            stages.push(compile_stage(&profiles[i], &profiles[i + 1], i, &ctx)?);
        }

        let input_channels = profiles[0].channels();
        let output_channels = profiles[profiles.len() - 1].channels();
        let input_kind = profiles[0].kind;
        let output_kind = profiles[profiles.len() - 1].kind;

        Ok(Self {
            stages,
            options,
            input_channels,
            output_channels,
            input_kind,
            output_kind,
        })
    }

    /// Number of channels a caller must supply per input color.
    pub fn input_channels(&self) -> usize {
        self.input_channels
    }

    /// Number of channels this pipeline produces per output color.
    pub fn output_channels(&self) -> usize {
        self.output_channels
    }

    /// Options this pipeline was compiled with.
    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Build a device-LUT accelerator for this pipeline, using `options.accelerator_grid` as
    /// the grid resolution. Requires `options.built_lut` to have been set at compile time.
    pub fn build_accelerator(&self) -> Result<crate::pipeline::DeviceLutAccelerator> {
        if !self.options.built_lut {
            return Err(PipelineError::AcceleratorNotEnabled.into());
        }
        crate::pipeline::DeviceLutAccelerator::build(self, self.options.accelerator_grid)
    }

    /// Transform one color through the whole chain.
    pub fn transform(&self, input: &[f64]) -> Result<Vec<f64>> {
        if input.len() != self.input_channels {
            return Err(crate::pipeline::error::TransformError::InputChannelMismatch {
                expected: self.input_channels,
                actual: input.len(),
            }
            .into());
        }

        let mut current = input.to_vec();
        for stage in &self.stages {
            current = stage.transform(&current);
        }

        if current.len() != self.output_channels {
            return Err(crate::pipeline::error::TransformError::OutputChannelMismatch {
                expected: self.output_channels,
                actual: current.len(),
            }
            .into());
        }
        Ok(self.format_output(current))
    }

    /// Apply `data_format`/`round_output`/`precision` to a raw chain result. `ObjectFloat`'s
    /// per-channel scale varies by device space, so its rounding happens downstream in
    /// [`Self::transform_object`] instead; here it passes through untouched. `Device` and
    /// `Int8` both live on a known `[0, 1]` scale and quantize directly.
    fn format_output(&self, mut values: Vec<f64>) -> Vec<f64> {
        match self.options.data_format {
            DataFormat::Int8 => {
                for v in values.iter_mut() {
                    let scaled = v.clamp(0.0, 1.0) * 255.0;
                    let quantized = if self.options.round_output {
                        scaled.round()
                    } else {
                        scaled.trunc()
                    };
                    *v = quantized / 255.0;
                }
            }
            DataFormat::Device => {
                if self.options.round_output {
                    if let Some(precision) = self.options.precision {
                        let scale = 10f64.powi(precision as i32);
                        for v in values.iter_mut() {
                            *v = (*v * scale).round() / scale;
                        }
                    }
                }
            }
            DataFormat::ObjectFloat => {}
        }
        values
    }

    /// Transform one color, taking and returning `ObjectFloat` named-field records instead of
    /// raw channel arrays. Used when `options.data_format` is `DataFormat::ObjectFloat`.
    ///
    /// When `round_output` is set, the result's native-scale fields (R/G/B, C/M/Y/K, L/a/b, ...)
    /// are rounded to `precision` decimal places, defaulting to whole units (matching an 8-bit
    /// device readout) when `precision` is unset.
    pub fn transform_object(&self, input: &crate::object_float::ObjectFloat) -> Result<crate::object_float::ObjectFloat> {
        let raw = self.transform(&input.to_device_values())?;
        let obj = crate::object_float::ObjectFloat::from_device_values(self.output_kind, &raw);
        Ok(if self.options.round_output {
            obj.round_native(self.options.precision.unwrap_or(0))
        } else {
            obj
        })
    }

    /// Terminal device space of this pipeline's first profile.
    pub fn input_kind(&self) -> ProfileKind {
        self.input_kind
    }

    /// Terminal device space of this pipeline's last profile.
    pub fn output_kind(&self) -> ProfileKind {
        self.output_kind
    }

    /// Transform a flat buffer of colors, `stride`-channels wide, in place through `transform`.
    pub fn transform_buffer(&self, src: &[f64], dst: &mut [f64]) -> Result<()> {
        if src.len() % self.input_channels != 0 {
            return Err(crate::pipeline::error::TransformError::MisalignedBuffer {
                len: src.len(),
                stride: self.input_channels,
            }
            .into());
        }
        let pixel_count = src.len() / self.input_channels;
        if dst.len() < pixel_count * self.output_channels {
            return Err(crate::pipeline::error::TransformError::MisalignedBuffer {
                len: dst.len(),
                stride: self.output_channels,
            }
            .into());
        }

        for (src_px, dst_px) in src
            .chunks_exact(self.input_channels)
            .zip(dst.chunks_exact_mut(self.output_channels))
        {
            let result = self.transform(src_px)?;
            dst_px.copy_from_slice(&result);
        }
        Ok(())
    }
}

fn compile_stage(src: &Profile, dst: &Profile, position: usize, ctx: &TransformContext) -> Result<Stage> {
    match (src.kind == ProfileKind::Lab, dst.kind == ProfileKind::Lab) {
        (false, false) => {
            let pipeline = Pipeline::from_profiles(src.icc().expect("loaded non-Lab profile has ICC data"), dst.icc().expect("loaded non-Lab profile has ICC data"), ctx)
                .map_err(|source| {
                    tracing::warn!(stage = position, src = %src.name, dst = %dst.name, %source, "stage failed to compile");
                    PipelineError::StageCompile { stage: position, source }
                })?;
            Ok(Stage::Direct(pipeline))
        }
        (true, true) => {
            let absolute = ctx.intent == RenderIntent::AbsoluteColorimetric;
            Ok(Stage::LabToLab {
                src: LabBridge {
                    white: src.lab_white().expect("Lab profile carries a white point"),
                    absolute,
                },
                dst: LabBridge {
                    white: dst.lab_white().expect("Lab profile carries a white point"),
                    absolute,
                },
            })
        }
        (true, false) => {
            require_matrix_shaper(dst, position + 1, position)?;
            let identity = identity_pcs_profile();
            let to_device = Pipeline::from_profiles(identity.icc().expect("identity profile has ICC data"), dst.icc().expect("loaded non-Lab profile has ICC data"), ctx)
                .map_err(|source| PipelineError::StageCompile { stage: position, source })?;
            Ok(Stage::LabIn {
                bridge: LabBridge {
                    white: src.lab_white().expect("Lab profile carries a white point"),
                    absolute: ctx.intent == RenderIntent::AbsoluteColorimetric,
                },
                to_device,
            })
        }
        (false, true) => {
            require_matrix_shaper(src, position, position + 1)?;
            let identity = identity_pcs_profile();
            let from_device = Pipeline::from_profiles(src.icc().expect("loaded non-Lab profile has ICC data"), identity.icc().expect("identity profile has ICC data"), ctx)
                .map_err(|source| PipelineError::StageCompile { stage: position, source })?;
            Ok(Stage::LabOut {
                from_device,
                bridge: LabBridge {
                    white: dst.lab_white().expect("Lab profile carries a white point"),
                    absolute: ctx.intent == RenderIntent::AbsoluteColorimetric,
                },
            })
        }
    }
}

fn require_matrix_shaper(profile: &Profile, adjacent_position: usize, lab_position: usize) -> Result<()> {
    if profile.kind == ProfileKind::RgbMatrix {
        Ok(())
    } else {
        Err(PipelineError::LabBridgeRequiresMatrixShaper {
            lab_position,
            adjacent_position,
            adjacent_kind: format!("{:?}", profile.kind),
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::virtual_profile::VirtualProfileId;

    #[test]
    fn compiles_two_rgb_working_spaces() {
        let srgb = VirtualProfileId::SRgb.build();
        let adobe = VirtualProfileId::AdobeRgb1998.build();
        let compiled = CompiledPipeline::compile(
            &[srgb, adobe],
            &[RenderIntent::RelativeColorimetric],
            CompileOptions::default(),
        )
        .unwrap();

        assert_eq!(compiled.input_channels(), 3);
        assert_eq!(compiled.output_channels(), 3);
        let out = compiled.transform(&[0.5, 0.5, 0.5]).unwrap();
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn rejects_a_chain_shorter_than_two() {
        let srgb = VirtualProfileId::SRgb.build();
        let err = CompiledPipeline::compile(&[srgb], &[], CompileOptions::default());
        assert!(err.is_err());
    }

    #[test]
    fn rejects_interior_lab_profile() {
        let srgb = VirtualProfileId::SRgb.build();
        let lab = VirtualProfileId::LabD50.build();
        let adobe = VirtualProfileId::AdobeRgb1998.build();
        let err = CompiledPipeline::compile(
            &[srgb, lab, adobe],
            &[RenderIntent::Perceptual, RenderIntent::Perceptual],
            CompileOptions::default(),
        );
        assert!(matches!(
            err,
            Err(crate::Error::Pipeline(PipelineError::LabProfileMustBeEndpoint(1)))
        ));
    }

    #[test]
    fn bridges_lab_endpoint_against_srgb() {
        let lab = VirtualProfileId::LabD50.build();
        let srgb = VirtualProfileId::SRgb.build();
        let compiled = CompiledPipeline::compile(
            &[lab, srgb],
            &[RenderIntent::RelativeColorimetric],
            CompileOptions::default(),
        )
        .unwrap();

        let out = compiled.transform(&[100.0, 0.0, 0.0]).unwrap();
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn transform_object_tags_output_with_the_terminal_device_space() {
        let srgb = VirtualProfileId::SRgb.build();
        let lab = VirtualProfileId::LabD50.build();
        let compiled = CompiledPipeline::compile(
            &[srgb, lab],
            &[RenderIntent::RelativeColorimetric],
            CompileOptions::default(),
        )
        .unwrap();

        assert_eq!(compiled.input_kind(), ProfileKind::RgbMatrix);
        assert_eq!(compiled.output_kind(), ProfileKind::Lab);

        let input = crate::object_float::ObjectFloat::from_device_values(
            ProfileKind::RgbMatrix,
            &[0.5, 0.5, 0.5],
        );
        let out = compiled.transform_object(&input).unwrap();
        match out {
            crate::object_float::ObjectFloat::Lab { white_point, .. } => {
                assert_eq!(white_point, "d50");
            }
            other => panic!("expected Lab, got {other:?}"),
        }
    }

    #[test]
    fn build_accelerator_requires_built_lut_option() {
        let srgb = VirtualProfileId::SRgb.build();
        let adobe = VirtualProfileId::AdobeRgb1998.build();

        let without = CompiledPipeline::compile(
            &[srgb.clone(), adobe.clone()],
            &[RenderIntent::RelativeColorimetric],
            CompileOptions::default(),
        )
        .unwrap();
        assert!(matches!(
            without.build_accelerator(),
            Err(crate::Error::Pipeline(PipelineError::AcceleratorNotEnabled))
        ));

        let with = CompiledPipeline::compile(
            &[srgb, adobe],
            &[RenderIntent::RelativeColorimetric],
            CompileOptions {
                built_lut: true,
                accelerator_grid: 5,
                ..CompileOptions::default()
            },
        )
        .unwrap();
        let accelerator = with.build_accelerator().unwrap();
        assert_eq!(accelerator.grid_size(), 5);
        assert_eq!(accelerator.output_channels(), 3);
    }
}
