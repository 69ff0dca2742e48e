//! Register combiner word decoder
//!
//! Turns the packed combiner registers into [`ShaderProgram`] descriptors.
//! Decoding never fails: every bit pattern maps to some descriptor, and
//! reserved values are rejected later when the shader is emitted.

use super::types::*;

/// Register combiner decoder
pub struct PshDecoder;

impl PshDecoder {
    /// Decode a single input byte
    pub fn decode_input(value: u8) -> InputInfo {
        InputInfo {
            reg: value & 0xF,
            chan: PsChannel::from((value >> 4) & 0x1),
            mapping: InputMapping::from((value >> 5) & 0x7),
        }
    }

    /// Decode the four inputs packed into a combiner input word
    ///
    /// The hardware packs D in the low byte and A in the high byte.
    pub fn decode_stage_inputs(value: u32) -> StageInputs {
        StageInputs {
            a: Self::decode_input((value >> 24) as u8),
            b: Self::decode_input((value >> 16) as u8),
            c: Self::decode_input((value >> 8) as u8),
            d: Self::decode_input(value as u8),
        }
    }

    /// Decode a combiner output word
    pub fn decode_stage_output(value: u32) -> CombinerOutput {
        let flags = CombinerOutputFlags::from_bits_truncate((value >> 12) & 0xFF);

        CombinerOutput {
            cd: (value & 0xF) as u8,
            ab: ((value >> 4) & 0xF) as u8,
            muxsum: ((value >> 8) & 0xF) as u8,
            cd_op: if flags.contains(CombinerOutputFlags::CD_DOT_PRODUCT) {
                ProductOp::DotProduct
            } else {
                ProductOp::Multiply
            },
            ab_op: if flags.contains(CombinerOutputFlags::AB_DOT_PRODUCT) {
                ProductOp::DotProduct
            } else {
                ProductOp::Multiply
            },
            muxsum_op: if flags.contains(CombinerOutputFlags::AB_CD_MUX) {
                MuxSumOp::Mux
            } else {
                MuxSumOp::Sum
            },
            mapping: ((flags & CombinerOutputFlags::MAPPING).bits() >> 3) as u8,
            cd_blue_to_alpha: flags.contains(CombinerOutputFlags::CD_BLUE_TO_ALPHA),
            ab_blue_to_alpha: flags.contains(CombinerOutputFlags::AB_BLUE_TO_ALPHA),
        }
    }

    /// Decode the final combiner words
    ///
    /// The second word carries E, F and G in its upper three bytes and the
    /// settings in the low byte. The combiner is disabled when both words
    /// are zero.
    pub fn decode_final_combiner(value0: u32, value1: u32) -> FinalCombiner {
        let enabled = value0 != 0 || value1 != 0;
        if !enabled {
            return FinalCombiner::default();
        }

        let abcd = Self::decode_stage_inputs(value0);
        let efg = Self::decode_stage_inputs(value1);

        FinalCombiner {
            a: abcd.a,
            b: abcd.b,
            c: abcd.c,
            d: abcd.d,
            e: efg.a,
            f: efg.b,
            g: efg.c,
            settings: FinalCombinerSettings::from_bits_truncate(value1 as u8),
            enabled,
        }
    }

    /// Decode the complete combiner register state
    pub fn decode_program(regs: &CombinerRegisters) -> ShaderProgram {
        let stage_count = (regs.combiner_control & 0xFF) as u8;
        let flags = CombinerCountFlags::from_bits_truncate(regs.combiner_control >> 8);

        let stages = (0..(stage_count as usize).min(MAX_COMBINER_STAGES))
            .map(|i| CombinerStage {
                rgb_input: Self::decode_stage_inputs(regs.rgb_inputs[i]),
                rgb_output: Self::decode_stage_output(regs.rgb_outputs[i]),
                alpha_input: Self::decode_stage_inputs(regs.alpha_inputs[i]),
                alpha_output: Self::decode_stage_output(regs.alpha_outputs[i]),
            })
            .collect();

        let mut tex_modes = [0u8; TEXTURE_UNITS];
        for (unit, mode) in tex_modes.iter_mut().enumerate() {
            *mode = ((regs.shader_stage_program >> (unit * 5)) & 0x1F) as u8;
        }

        ShaderProgram {
            stage_count,
            stages,
            final_combiner: Self::decode_final_combiner(regs.final_inputs_0, regs.final_inputs_1),
            flags,
            tex_modes,
            rect_tex: regs.rect_tex,
            input_texture: Self::decode_input_texture(regs.other_stage_input),
        }
    }

    /// Decode which texture unit each dependent texture stage reads
    ///
    /// Unit 0 has no input and unit 1 always reads unit 0.
    pub fn decode_input_texture(other_stage_input: u32) -> [Option<u8>; TEXTURE_UNITS] {
        [
            None,
            Some(0),
            Some(((other_stage_input >> 16) & 0xF) as u8),
            Some(((other_stage_input >> 20) & 0xF) as u8),
        ]
    }
}
