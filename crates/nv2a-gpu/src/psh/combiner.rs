//! General and final combiner code emission
//!
//! Each general combiner lane computes
//!
//! ```text
//! AB  = A*B or dot(A, B)
//! CD  = C*D or dot(C, D)
//! SUM = AB + CD, or mux(AB, CD) on r0.a
//! ```
//!
//! with the output mapping applied to all three results. Statements are
//! emitted in hardware write order (AB, CD, blue-to-alpha copies, SUM)
//! because later statements of a stage may read registers written by
//! earlier ones.

use super::context::{EfProduct, StageCursor, TranslatorContext};
use super::expr::{apply_output_mapping, build_input_expr};
use super::text::Expr;
use super::types::*;
use super::vars::resolve_dest;
use nv2a_core::error::{PshError, Result};

/// Mux condition, selects CD when true
const MUX_CONDITION: &str = "r0.a >= 0.5";

/// One of the two lanes of a general combiner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lane {
    Rgb,
    Alpha,
}

impl Lane {
    /// Write mask used for assignments
    pub fn write_mask(self) -> &'static str {
        match self {
            Lane::Rgb => "rgb",
            Lane::Alpha => "a",
        }
    }

    /// Constructor wrapping assigned values, empty for scalar writes
    pub fn caster(self) -> &'static str {
        match self {
            Lane::Rgb => "vec3",
            Lane::Alpha => "",
        }
    }

    pub fn is_alpha(self) -> bool {
        self == Lane::Alpha
    }
}

fn product(op: ProductOp, lhs: &Expr, rhs: &Expr) -> Expr {
    match op {
        ProductOp::DotProduct => Expr::call2("dot", lhs, rhs),
        ProductOp::Multiply => Expr::binary(lhs, "*", rhs),
    }
}

fn emit_assign(ctx: &mut TranslatorContext, dest: &str, lane: Lane, value: &Expr) {
    ctx.code.line(format_args!(
        "{}.{} = {}({});",
        dest,
        lane.write_mask(),
        lane.caster(),
        value
    ));
}

/// Emit one lane of a general combiner stage
pub fn emit_stage_lane(
    ctx: &mut TranslatorContext,
    input: &StageInputs,
    output: &CombinerOutput,
    lane: Lane,
) -> Result<()> {
    let mapping = OutputMapping::from_raw(output.mapping).ok_or(PshError::InvalidOutputMapping {
        mapping: output.mapping,
        stage: ctx.cursor.index(),
    })?;

    let a = build_input_expr(ctx, &input.a, lane.is_alpha())?;
    let b = build_input_expr(ctx, &input.b, lane.is_alpha())?;
    let c = build_input_expr(ctx, &input.c, lane.is_alpha())?;
    let d = build_input_expr(ctx, &input.d, lane.is_alpha())?;

    let ab = product(output.ab_op, &a, &b);
    let cd = product(output.cd_op, &c, &d);

    let ab_mapped = apply_output_mapping(ab.clone(), mapping);
    let cd_mapped = apply_output_mapping(cd.clone(), mapping);

    let ab_dest = resolve_dest(ctx, output.ab)?;
    let cd_dest = resolve_dest(ctx, output.cd)?;
    let sum_dest = resolve_dest(ctx, output.muxsum)?;

    // A discarded result is never stored
    if let Some(dest) = &ab_dest {
        emit_assign(ctx, dest, lane, &ab_mapped);
    }
    if let Some(dest) = &cd_dest {
        emit_assign(ctx, dest, lane, &cd_mapped);
    }

    if lane == Lane::Rgb {
        if output.ab_blue_to_alpha {
            if let Some(dest) = &ab_dest {
                ctx.code.line(format_args!("{}.a = {}.b;", dest, dest));
            }
        }
        if output.cd_blue_to_alpha {
            if let Some(dest) = &cd_dest {
                ctx.code.line(format_args!("{}.a = {}.b;", dest, dest));
            }
        }
    }

    if let Some(dest) = &sum_dest {
        let sum = match output.muxsum_op {
            MuxSumOp::Sum => Expr::binary(&ab, "+", &cd),
            MuxSumOp::Mux => {
                ctx.add_var_ref("r0");
                Expr::select(MUX_CONDITION, &cd, &ab)
            }
        };
        let sum_mapped = apply_output_mapping(sum, mapping);
        emit_assign(ctx, dest, lane, &sum_mapped);
    }

    Ok(())
}

/// Emit every general combiner stage of a program
pub fn emit_stages(ctx: &mut TranslatorContext, program: &ShaderProgram) -> Result<()> {
    if program.stage_count as usize > MAX_COMBINER_STAGES {
        return Err(PshError::TooManyStages(program.stage_count));
    }

    for (i, stage) in program.stages.iter().enumerate() {
        ctx.cursor = StageCursor::Combiner(i as u8);
        tracing::trace!("Emitting combiner stage {}", i);

        ctx.code.line(format_args!("// Stage {}", i));
        emit_stage_lane(ctx, &stage.rgb_input, &stage.rgb_output, Lane::Rgb)?;
        emit_stage_lane(ctx, &stage.alpha_input, &stage.alpha_output, Lane::Alpha)?;
    }

    Ok(())
}

/// Emit the final combiner
///
/// Does nothing when the final combiner is disabled. E and F are only
/// available to EF product reads while this runs.
pub fn emit_final_combiner(ctx: &mut TranslatorContext, fc: &FinalCombiner) -> Result<()> {
    if !fc.enabled {
        return Ok(());
    }

    ctx.cursor = StageCursor::Final;
    tracing::trace!("Emitting final combiner");
    ctx.code.line_str("// Final Combiner");

    let e = build_input_expr(ctx, &fc.e, false)?;
    let f = build_input_expr(ctx, &fc.f, false)?;
    ctx.ef = Some(EfProduct { e, f });

    let result = emit_final_combiner_body(ctx, fc);
    ctx.ef = None;
    result
}

fn emit_final_combiner_body(ctx: &mut TranslatorContext, fc: &FinalCombiner) -> Result<()> {
    let a = build_input_expr(ctx, &fc.a, false)?;
    let b = build_input_expr(ctx, &fc.b, false)?;
    let c = build_input_expr(ctx, &fc.c, false)?;
    let d = build_input_expr(ctx, &fc.d, false)?;
    // G only feeds alpha
    let g = build_input_expr(ctx, &fc.g, true)?;

    ctx.add_var_ref("r0");
    ctx.code.line(format_args!(
        "r0.rgb = vec3(({} * {}) + ((1.0 - {}) * {}) + {});",
        a, b, a, c, d
    ));
    ctx.code.line(format_args!("r0.a = {};", g));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::psh::decode::PshDecoder;

    fn new_ctx() -> TranslatorContext {
        TranslatorContext::new(CombinerCountFlags::empty())
    }

    fn lane_code(inputs: u32, outputs: u32, lane: Lane) -> (String, Vec<String>) {
        let mut ctx = new_ctx();
        emit_stage_lane(
            &mut ctx,
            &PshDecoder::decode_stage_inputs(inputs),
            &PshDecoder::decode_stage_output(outputs),
            lane,
        )
        .unwrap();
        (ctx.code.into_string(), ctx.var_refs.into_vec())
    }

    #[test]
    fn test_multiply_into_r0() {
        // a = V0, b = ONE, ab -> R0
        let (code, refs) = lane_code(0x0420_0000, 0x0000_00C0, Lane::Rgb);
        assert_eq!(code, "r0.rgb = vec3((v0.rgb * (1.0 - 0.0)));\n");
        assert_eq!(refs, ["r0"]);
    }

    #[test]
    fn test_alpha_lane_has_no_cast() {
        let (code, _) = lane_code(0x0420_0000, 0x0000_00C0, Lane::Alpha);
        assert_eq!(code, "r0.a = ((v0.b * (1.0 - 0.0)));\n");
    }

    #[test]
    fn test_all_discard_emits_nothing() {
        let (code, refs) = lane_code(0x0C0D_0C0D, 0x0000_0000, Lane::Rgb);
        assert!(code.is_empty());
        // Sources are still referenced
        assert_eq!(refs, ["r0", "r1"]);
    }

    #[test]
    fn test_dot_products_and_sum() {
        // a = T0, b = V0, c = T1, d = V1; ab -> R0, cd -> R1, sum -> R0
        // AB dot, CD dot, shift left 1
        let flags = 0x01 | 0x02 | (2 << 3);
        let (code, _) = lane_code(0x0804_0905, 0x0000_0CCD | (flags << 12), Lane::Rgb);
        let lines: Vec<&str> = code.lines().collect();
        assert_eq!(
            lines,
            [
                "r0.rgb = vec3((dot(t0.rgb, v0.rgb) * 2.0));",
                "r1.rgb = vec3((dot(t1.rgb, v1.rgb) * 2.0));",
                "r0.rgb = vec3(((dot(t0.rgb, v0.rgb) + dot(t1.rgb, v1.rgb)) * 2.0));",
            ]
        );
    }

    #[test]
    fn test_mux_selects_cd_on_r0_alpha() {
        // a = V0, b = ONE, c = V1, d = ONE; sum -> R1 as mux
        let (code, refs) = lane_code(0x0420_0520, 0x0000_0D00 | (0x04 << 12), Lane::Rgb);
        assert_eq!(
            code,
            "r1.rgb = vec3(((r0.a >= 0.5) ? (v1.rgb * (1.0 - 0.0)) : (v0.rgb * (1.0 - 0.0))));\n"
        );
        assert_eq!(refs, ["r1", "r0"]);
    }

    #[test]
    fn test_blue_to_alpha_order() {
        // ab -> R0, cd -> R1, both blue to alpha, sum -> V1
        let flags = 0x40 | 0x80;
        let (code, _) = lane_code(0x0420_0520, 0x0000_05CD | (flags << 12), Lane::Rgb);
        let lines: Vec<&str> = code.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("r0.rgb = "));
        assert!(lines[1].starts_with("r1.rgb = "));
        assert_eq!(lines[2], "r0.a = r0.b;");
        assert_eq!(lines[3], "r1.a = r1.b;");
        assert!(lines[4].starts_with("v1.rgb = "));
    }

    #[test]
    fn test_blue_to_alpha_ignored_in_alpha_lane_and_discard() {
        let flags = 0x40 | 0x80;
        let (code, _) = lane_code(0x0420_0520, 0x0000_00C0 | (flags << 12), Lane::Alpha);
        assert!(!code.contains("r0.a = r0.b;"));

        let (code, _) = lane_code(0x0420_0520, 0x0000_00C0 | (flags << 12), Lane::Rgb);
        assert_eq!(code.matches(".a = ").count(), 1);
        assert!(code.contains("r0.a = r0.b;"));
    }

    #[test]
    fn test_invalid_output_mapping() {
        let mut ctx = new_ctx();
        ctx.cursor = StageCursor::Combiner(4);
        let err = emit_stage_lane(
            &mut ctx,
            &StageInputs::default(),
            &PshDecoder::decode_stage_output(5 << 15),
            Lane::Rgb,
        )
        .unwrap_err();
        assert_eq!(err, PshError::InvalidOutputMapping { mapping: 5, stage: 4 });
    }

    #[test]
    fn test_too_many_stages() {
        let program = ShaderProgram {
            stage_count: 9,
            ..Default::default()
        };
        let err = emit_stages(&mut new_ctx(), &program).unwrap_err();
        assert_eq!(err, PshError::TooManyStages(9));
    }

    #[test]
    fn test_final_combiner() {
        // a = T0, b = V0, c = ZERO, d = ZERO; g = V0 alpha
        let fc = PshDecoder::decode_final_combiner(0x0804_0000, 0x0000_1400);
        let mut ctx = new_ctx();
        emit_final_combiner(&mut ctx, &fc).unwrap();

        assert_eq!(
            ctx.code.as_str(),
            "// Final Combiner\n\
             r0.rgb = vec3((t0.rgb * v0.rgb) + ((1.0 - t0.rgb) * 0.0) + 0.0);\n\
             r0.a = v0.a;\n"
        );
        assert_eq!(ctx.var_refs.clone().into_vec(), ["r0"]);
        assert!(ctx.ef.is_none());
        assert_eq!(ctx.cursor, StageCursor::Final);
    }

    #[test]
    fn test_final_combiner_ef_product() {
        // a = EF, b = ONE; e = T0, f = T1, g = R0 alpha
        let fc = PshDecoder::decode_final_combiner(0x0F20_0000, 0x0809_1C00);
        let mut ctx = new_ctx();
        emit_final_combiner(&mut ctx, &fc).unwrap();
        assert!(ctx
            .code
            .as_str()
            .contains("r0.rgb = vec3(((t0.rgb * t1.rgb).rgb * (1.0 - 0.0))"));
        assert!(ctx.code.as_str().contains("r0.a = r0.a;"));
    }

    #[test]
    fn test_final_combiner_g_uses_alpha_lane() {
        // g = V0 rgb, read as blue
        let fc = PshDecoder::decode_final_combiner(0x0420_0000, 0x0000_0400);
        let mut ctx = new_ctx();
        emit_final_combiner(&mut ctx, &fc).unwrap();
        assert!(ctx.code.as_str().ends_with("r0.a = v0.b;\n"));
    }

    #[test]
    fn test_final_combiner_disabled() {
        let mut ctx = new_ctx();
        emit_final_combiner(&mut ctx, &FinalCombiner::default()).unwrap();
        assert!(ctx.code.is_empty());
        assert_eq!(ctx.cursor, StageCursor::Combiner(0));
    }

    #[test]
    fn test_final_combiner_constants_unique() {
        // a = C0, b = C1
        let fc = PshDecoder::decode_final_combiner(0x0102_0000, 0);
        let mut ctx = new_ctx();
        emit_final_combiner(&mut ctx, &fc).unwrap();
        let names: Vec<String> = ctx.const_refs.iter().map(|s| s.name()).collect();
        assert_eq!(names, ["c_8_0", "c_8_1"]);
    }
}
