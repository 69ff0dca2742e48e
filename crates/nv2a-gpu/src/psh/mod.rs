//! NV2A pixel shader translation (register combiners → GLSL)
//!
//! The NV2A has no programmable fragment stage. Pixel shading is configured
//! through a set of fixed-function register combiners:
//! - Up to 8 general combiner stages, each with an RGB and an alpha lane
//! - A final combiner computing `a*b + (1-a)*c + d`
//! - 4 texture units whose fetch mode is set per unit
//!
//! This module decodes the combiner words and emits an equivalent GLSL
//! fragment shader.

pub mod types;
pub mod decode;
pub mod text;
pub mod context;
pub mod vars;
pub mod expr;
pub mod combiner;
pub mod assemble;
pub mod translate;

pub use types::*;
pub use decode::*;
pub use context::{ConstantSlot, StageCursor, TranslatorContext};
pub use assemble::{assemble, SamplerBinding, TranslatedShader};
pub use translate::*;
