//! Register to GLSL variable mapping

use super::context::{ConstantSlot, TranslatorContext};
use super::text::Expr;
use super::types::{CombinerCountFlags, PsRegister};
use nv2a_core::error::{PshError, Result};

/// Placeholder for the fog register
const FOG_PLACEHOLDER: &str = "vec4(1.0)";

fn decode_register(ctx: &TranslatorContext, reg: u8) -> Result<PsRegister> {
    PsRegister::from_raw(reg).ok_or(PshError::InvalidRegister {
        reg,
        stage: ctx.cursor.index(),
    })
}

/// Name of a constant register for the current stage
///
/// C0/C1 are shared with stage 0 unless the matching unique flag is set.
/// The final combiner always gets its own constants.
fn constant(ctx: &mut TranslatorContext, index: u8) -> String {
    let unique_flag = if index == 0 {
        CombinerCountFlags::UNIQUE_C0
    } else {
        CombinerCountFlags::UNIQUE_C1
    };

    let stage = if ctx.flags.contains(unique_flag) || ctx.cursor.is_final() {
        ctx.cursor.index()
    } else {
        0
    };

    let slot = ConstantSlot { stage, index };
    ctx.const_refs.insert(slot);
    slot.name()
}

/// Variable name for a plain readable/writable register
fn named_register(ctx: &mut TranslatorContext, register: PsRegister) -> Option<String> {
    let name = match register {
        PsRegister::C0 => return Some(constant(ctx, 0)),
        PsRegister::C1 => return Some(constant(ctx, 1)),
        PsRegister::V0 => "v0",
        PsRegister::V1 => "v1",
        PsRegister::T0 => "t0",
        PsRegister::T1 => "t1",
        PsRegister::T2 => "t2",
        PsRegister::T3 => "t3",
        PsRegister::R0 => {
            ctx.add_var_ref("r0");
            "r0"
        }
        PsRegister::R1 => {
            ctx.add_var_ref("r1");
            "r1"
        }
        PsRegister::Zero | PsRegister::Fog | PsRegister::V1R0Sum | PsRegister::EfProd => {
            return None
        }
    };
    Some(name.to_string())
}

/// Resolve a register read
pub fn resolve_source(ctx: &mut TranslatorContext, reg: u8) -> Result<Expr> {
    let register = decode_register(ctx, reg)?;

    let expr = match register {
        PsRegister::Zero => Expr::zero(),
        PsRegister::Fog => Expr::new(FOG_PLACEHOLDER),
        PsRegister::V1R0Sum => {
            ctx.add_var_ref("r0");
            Expr::new("(v1 + r0)")
        }
        PsRegister::EfProd => match &ctx.ef {
            Some(ef) => Expr::binary(&ef.e, "*", &ef.f),
            None => {
                return Err(PshError::EfProductOutsideFinalCombiner {
                    stage: ctx.cursor.index(),
                })
            }
        },
        _ => named_register(ctx, register)
            .map(Expr::new)
            .ok_or(PshError::InvalidRegister {
                reg,
                stage: ctx.cursor.index(),
            })?,
    };
    Ok(expr)
}

/// Resolve a register write
///
/// Returns `None` for the discard register, in which case no assignment is
/// emitted.
pub fn resolve_dest(ctx: &mut TranslatorContext, reg: u8) -> Result<Option<String>> {
    let register = decode_register(ctx, reg)?;

    match register {
        PsRegister::Zero => Ok(None),
        PsRegister::Fog | PsRegister::V1R0Sum | PsRegister::EfProd => {
            Err(PshError::InvalidDestination {
                reg,
                stage: ctx.cursor.index(),
            })
        }
        _ => Ok(named_register(ctx, register)),
    }
}
