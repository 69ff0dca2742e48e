//! NV2A GPU emulation
//!
//! Currently provides the pixel shader translator, which turns the
//! register combiner state into GLSL fragment shaders.

pub mod psh;

pub use psh::{
    psh_translate, translate, translate_with_config, try_translate, try_translate_reflect,
    CombinerRegisters, TranslatedShader,
};
