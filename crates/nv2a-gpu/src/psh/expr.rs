//! Combiner input and output expressions
//!
//! Every composite expression is fully parenthesized so that results can be
//! nested inside each other without precedence surprises.

use super::context::TranslatorContext;
use super::text::Expr;
use super::types::{InputInfo, InputMapping, OutputMapping, PsChannel, PsRegister};
use super::vars::resolve_source;
use nv2a_core::error::Result;

/// Build the expression for one combiner input
///
/// `is_alpha` selects the alpha lane, where the RGB channel reads blue.
pub fn build_input_expr(
    ctx: &mut TranslatorContext,
    input: &InputInfo,
    is_alpha: bool,
) -> Result<Expr> {
    let mut expr = resolve_source(ctx, input.reg)?;

    // An EF product of alpha values is already scalar
    let scalar_ef = input.reg == PsRegister::EfProd as u8 && expr.as_str().contains(".a");

    if !expr.is_zero() && !scalar_ef {
        expr.push_str(match (input.chan, is_alpha) {
            (PsChannel::Rgb, false) => ".rgb",
            (PsChannel::Rgb, true) => ".b",
            (PsChannel::Alpha, _) => ".a",
        });
    }

    Ok(apply_input_mapping(expr, input.mapping))
}

/// Apply an input mapping
pub fn apply_input_mapping(expr: Expr, mapping: InputMapping) -> Expr {
    match mapping {
        InputMapping::UnsignedIdentity | InputMapping::SignedIdentity => expr,
        InputMapping::UnsignedInvert => expr.wrap("(1.0 - ", ")"),
        InputMapping::ExpandNormal => expr.wrap("(2.0 * ", " - 1.0)"),
        InputMapping::ExpandNegate => expr.wrap("(1.0 - 2.0 * ", ")"),
        InputMapping::HalfbiasNormal => expr.wrap("(", " - 0.5)"),
        InputMapping::HalfbiasNegate => expr.wrap("(0.5 - ", ")"),
        InputMapping::SignedNegate => expr.wrap("(-", ")"),
    }
}

/// Apply a combiner output mapping
pub fn apply_output_mapping(expr: Expr, mapping: OutputMapping) -> Expr {
    match mapping {
        OutputMapping::Identity => expr,
        OutputMapping::Bias => expr.wrap("(", " - 0.5)"),
        OutputMapping::ShiftLeft1 => expr.wrap("(", " * 2.0)"),
        OutputMapping::ShiftLeft1Bias => expr.wrap("((", " - 0.5) * 2.0)"),
        OutputMapping::ShiftLeft2 => expr.wrap("(", " * 4.0)"),
        OutputMapping::ShiftRight1 => expr.wrap("(", " / 2.0)"),
    }
}
