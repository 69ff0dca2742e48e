//! Translation entry points
//!
//! The `try_*` functions report malformed register state as [`PshError`].
//! The plain functions treat it as a fatal emulator bug and panic with the
//! error message, which is what the graphics backend expects.

use super::assemble::{assemble, TranslatedShader};
use super::decode::PshDecoder;
use super::types::*;
use nv2a_core::config::Config;
use nv2a_core::error::{PshError, Result};

/// Translate register state into GLSL, returning source and resource usage
pub fn try_translate_reflect(regs: &CombinerRegisters, config: &Config) -> Result<TranslatedShader> {
    let program = PshDecoder::decode_program(regs);

    tracing::debug!(
        "Translating pixel shader: {} stages, flags {:?}, final combiner {}",
        program.stage_count,
        program.flags,
        if program.final_combiner.enabled { "enabled" } else { "disabled" }
    );
    tracing::trace!(
        "Texture modes {:?}, rect {:?}, inputs {:?}",
        program.tex_modes,
        program.rect_tex,
        program.input_texture
    );

    let shader = assemble(&program, &config.shader)?;

    if config.debug.dump_shaders {
        tracing::debug!("Generated pixel shader:\n{}", shader.source);
    }

    Ok(shader)
}

/// Translate register state into GLSL with the default configuration
pub fn try_translate(regs: &CombinerRegisters) -> Result<String> {
    try_translate_reflect(regs, &Config::default()).map(|shader| shader.source)
}

/// Translate register state into GLSL
///
/// # Panics
///
/// Panics on register state the hardware cannot execute, see [`PshError`].
pub fn translate_with_config(regs: &CombinerRegisters, config: &Config) -> String {
    match try_translate_reflect(regs, config) {
        Ok(shader) => shader.source,
        Err(e) => fatal(e),
    }
}

/// Translate register state into GLSL with the default configuration
///
/// # Panics
///
/// Panics on register state the hardware cannot execute, see [`PshError`].
pub fn translate(regs: &CombinerRegisters) -> String {
    translate_with_config(regs, &Config::default())
}

/// Translate from the raw register list
///
/// Argument order follows the hardware registers: combiner control, shader
/// stage program, other stage input, the per-stage input and output words,
/// the two final combiner words and the rectangle texture flags.
#[allow(clippy::too_many_arguments)]
pub fn psh_translate(
    combiner_control: u32,
    shader_stage_program: u32,
    other_stage_input: u32,
    rgb_inputs: &[u32; MAX_COMBINER_STAGES],
    rgb_outputs: &[u32; MAX_COMBINER_STAGES],
    alpha_inputs: &[u32; MAX_COMBINER_STAGES],
    alpha_outputs: &[u32; MAX_COMBINER_STAGES],
    final_inputs_0: u32,
    final_inputs_1: u32,
    rect_tex: &[bool; TEXTURE_UNITS],
) -> String {
    translate(&CombinerRegisters {
        combiner_control,
        shader_stage_program,
        other_stage_input,
        rgb_inputs: *rgb_inputs,
        rgb_outputs: *rgb_outputs,
        alpha_inputs: *alpha_inputs,
        alpha_outputs: *alpha_outputs,
        final_inputs_0,
        final_inputs_1,
        rect_tex: *rect_tex,
    })
}

fn fatal(e: PshError) -> ! {
    tracing::error!("Pixel shader translation failed: {}", e);
    panic!("Pixel shader translation failed: {}", e);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_translate_reports_error() {
        let regs = CombinerRegisters {
            combiner_control: 9,
            ..Default::default()
        };
        assert_eq!(try_translate(&regs), Err(PshError::TooManyStages(9)));
    }

    #[test]
    #[should_panic(expected = "Too many combiner stages: 9 (max 8)")]
    fn test_translate_panics_with_message() {
        let regs = CombinerRegisters {
            combiner_control: 9,
            ..Default::default()
        };
        translate(&regs);
    }

    #[test]
    fn test_positional_form_matches() {
        let mut regs = CombinerRegisters {
            combiner_control: 1,
            ..Default::default()
        };
        regs.rgb_inputs[0] = 0x0420_0000;
        regs.rgb_outputs[0] = 0x0000_00C0;

        let positional = psh_translate(
            regs.combiner_control,
            regs.shader_stage_program,
            regs.other_stage_input,
            &regs.rgb_inputs,
            &regs.rgb_outputs,
            &regs.alpha_inputs,
            &regs.alpha_outputs,
            regs.final_inputs_0,
            regs.final_inputs_1,
            &regs.rect_tex,
        );
        assert_eq!(positional, translate(&regs));
    }
}
