//! # color-core
//!
//! ICC profile decoding and color transform pipeline compilation/evaluation.
//!
//! ## Layout
//!
//! - [`icc`] decodes ICC profile bytes into a structured, typed representation.
//! - [`color`] holds the colorimetric value types (XYZ, Lab, RGB, white points) and the math
//!   that relates them.
//! - [`math`] is the shared numeric toolbox: 3x3 matrices, gamma/parametric curves,
//!   chromatic adaptation, LUT interpolation.
//! - [`profile`] wraps a decoded ICC profile (or a synthesized virtual one) behind the handle
//!   the pipeline compiler consumes.
//! - [`virtual_profile`] synthesizes well-known RGB working spaces and the Lab connection
//!   spaces without needing a file on disk.
//! - [`pipeline`] compiles a profile/intent chain into an executable transform and evaluates it.
//! - [`transform`] is the byte-buffer-facing API most callers reach for directly.
//! - [`object_float`] is the named-field record format for `DataFormat::ObjectFloat`.

#![forbid(unsafe_code)]

pub mod color;
pub mod error;
pub mod icc;
pub mod math;
pub mod object_float;
pub mod pipeline;
pub mod profile;
pub mod transform;
pub mod virtual_profile;

pub use error::{Error, Result};
pub use object_float::ObjectFloat;
pub use profile::Profile;
pub use transform::{Layout, Transform, TransformOptions};
