//! Errors raised while compiling or evaluating a transform pipeline.

use thiserror::Error;

/// Errors raised while resolving a profile/intent chain into a `Pipeline`.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum PipelineError {
    /// A chain link referenced a profile handle that never finished loading.
    #[error("profile at chain position {position} failed to load: {reason}")]
    ProfileNotLoaded { position: usize, reason: String },

    /// A virtual profile name was missing the `*` prefix that marks it as virtual.
    #[error("virtual profile names must start with '*', got {0:?}")]
    NotAVirtualName(String),

    /// A virtual profile name wasn't recognized.
    #[error("unknown virtual profile name: {0:?}")]
    UnknownVirtualProfile(String),

    /// A chain had fewer than two profiles, so there's nothing to connect.
    #[error("a pipeline needs at least two profiles, got {0}")]
    ChainTooShort(usize),

    /// The chain didn't alternate profile/intent/profile/intent/.../profile.
    #[error("pipeline chain must have an odd number of links (profile, intent, profile, ...), got {0}")]
    OddChainRequired(usize),

    /// An intent value in the chain was out of the 0..=3 ICC range.
    #[error("rendering intent {0} is out of range (expected 0..=3)")]
    IntentOutOfRange(u32),

    /// Two adjacent profiles in the chain have incompatible channel counts.
    #[error("stage {stage} channel mismatch: upstream produces {upstream} channels, downstream expects {downstream}")]
    ChannelMismatch {
        stage: usize,
        upstream: usize,
        downstream: usize,
    },

    /// A pairwise stage failed to resolve into a `Pipeline` from its two ICC profiles.
    #[error("stage {stage} failed to compile: {source}")]
    StageCompile {
        stage: usize,
        #[source]
        source: crate::icc::IccError,
    },

    /// A Lab virtual profile appeared somewhere other than the first or last chain position.
    #[error("Lab profile at position {0} must be a chain endpoint, not an interior link")]
    LabProfileMustBeEndpoint(usize),

    /// A Lab profile was adjacent to a profile this compiler can't bridge it against.
    ///
    /// Bridging a Lab endpoint reuses the matrix-shaper path through a synthetic identity PCS
    /// profile, so the neighboring profile must itself be a plain matrix/TRC RGB profile.
    #[error(
        "Lab profile at position {lab_position} can only bridge to a matrix-shaper RGB profile, found {adjacent_kind} at position {adjacent_position}"
    )]
    LabBridgeRequiresMatrixShaper {
        lab_position: usize,
        adjacent_position: usize,
        adjacent_kind: String,
    },

    /// The accelerator needs a pipeline whose first profile takes exactly 3 input channels.
    #[error("accelerator requires a 3-channel input pipeline, got {input} in")]
    AcceleratorRequiresThreeChannelInput { input: usize },

    /// The pipeline's output channel count is outside the 1..=4 range the accelerator's grid
    /// storage and tetrahedral interpolation can hold.
    #[error("accelerator output channel count {output} is out of range (expected 1..=4)")]
    AcceleratorOutputChannelsOutOfRange { output: usize },

    /// `CompiledPipeline::build_accelerator` was called without `CompileOptions::built_lut`.
    #[error("accelerator was not enabled for this pipeline (CompileOptions::built_lut is false)")]
    AcceleratorNotEnabled,
}

/// Errors raised while evaluating a compiled pipeline against pixel data.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum TransformError {
    /// The input slice's channel count didn't match what the pipeline expects.
    #[error("input has {actual} channels, pipeline expects {expected}")]
    InputChannelMismatch { expected: usize, actual: usize },

    /// The output slice's channel count didn't match what the pipeline produces.
    #[error("output has {actual} channels, pipeline produces {expected}")]
    OutputChannelMismatch { expected: usize, actual: usize },

    /// Buffer length wasn't a whole multiple of the pixel stride.
    #[error("buffer length {len} is not a multiple of pixel stride {stride}")]
    MisalignedBuffer { len: usize, stride: usize },
}
