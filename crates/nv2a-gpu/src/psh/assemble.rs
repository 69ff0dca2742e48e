//! Shader assembly
//!
//! Runs the combiner emitters over a decoded [`ShaderProgram`] and stitches
//! the uniform preamble, local declarations and statements into one GLSL
//! fragment shader.

use super::combiner::{emit_final_combiner, emit_stages};
use super::context::{ConstantSlot, TranslatorContext};
use super::text::ShaderWriter;
use super::types::*;
use nv2a_core::config::ShaderConfig;
use nv2a_core::error::{PshError, Result};

/// Sampler bound to a texture unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SamplerBinding {
    pub unit: usize,
    pub sampler: SamplerType,
}

impl SamplerBinding {
    /// Uniform name of the sampler
    pub fn name(&self) -> String {
        format!("texSamp{}", self.unit)
    }
}

/// Translated shader with the resources it reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedShader {
    /// GLSL source
    pub source: String,
    /// Constant uniforms in declaration order
    pub constants: Vec<ConstantSlot>,
    /// Sampler uniforms in unit order
    pub samplers: Vec<SamplerBinding>,
    /// Temporaries in declaration order
    pub temporaries: Vec<String>,
}

/// How a texture unit produces its `t<n>` value
enum TextureFetch {
    Sampled(SamplerType),
    Passthru,
}

fn texture_fetch(program: &ShaderProgram, unit: usize) -> Result<Option<TextureFetch>> {
    let raw = program.tex_modes[unit];
    let mode = TextureMode::from_raw(raw).ok_or(PshError::InvalidTextureMode { mode: raw, unit })?;

    let fetch = match mode {
        TextureMode::None => return Ok(None),
        TextureMode::Project2D if program.rect_tex[unit] => {
            TextureFetch::Sampled(SamplerType::Sampler2DRect)
        }
        TextureMode::Project2D => TextureFetch::Sampled(SamplerType::Sampler2D),
        TextureMode::Project3D => TextureFetch::Sampled(SamplerType::Sampler3D),
        TextureMode::Cubemap => TextureFetch::Sampled(SamplerType::SamplerCube),
        TextureMode::Passthru => TextureFetch::Passthru,
        _ => return Err(PshError::UnsupportedTextureMode { mode: raw, unit }),
    };
    Ok(Some(fetch))
}

/// Translate a decoded program into GLSL
pub fn assemble(program: &ShaderProgram, config: &ShaderConfig) -> Result<TranslatedShader> {
    let mut preamble = ShaderWriter::new();
    let mut locals = ShaderWriter::new();
    let mut samplers = Vec::new();

    locals.line_str("vec4 v0 = gl_Color;");
    locals.line_str("vec4 v1 = gl_SecondaryColor;");
    locals.line_str("float fog = gl_FogFragCoord;");

    for unit in 0..TEXTURE_UNITS {
        match texture_fetch(program, unit)? {
            None => {}
            Some(TextureFetch::Passthru) => {
                locals.line(format_args!("vec4 t{};", unit));
            }
            Some(TextureFetch::Sampled(sampler)) => {
                let binding = SamplerBinding { unit, sampler };
                locals.line(format_args!(
                    "vec4 t{} = {}({}, gl_TexCoord[{}].{});",
                    unit,
                    sampler.fetch_function(),
                    binding.name(),
                    unit,
                    sampler.coord_swizzle()
                ));
                preamble.line(format_args!("uniform {} {};", sampler.glsl_type(), binding.name()));
                samplers.push(binding);
            }
        }
    }

    let mut ctx = TranslatorContext::new(program.flags);
    emit_stages(&mut ctx, program)?;
    emit_final_combiner(&mut ctx, &program.final_combiner)?;
    // The epilogue always reads r0
    ctx.add_var_ref("r0");

    for name in &ctx.var_refs {
        locals.line(format_args!("vec4 {};", name));
        if name == "r0" {
            if program.texture_active(0) {
                locals.line_str("r0.a = t0.a;");
            } else {
                locals.line_str("r0.a = 1.0;");
            }
        }
    }

    for slot in &ctx.const_refs {
        preamble.line(format_args!("uniform vec4 {};", slot));
    }

    let code = ctx.code.into_string();
    let mut source = String::with_capacity(
        preamble.len() + locals.len() + code.len() + config.output_variable.len() + 32,
    );
    if let Some(version) = config.glsl_version {
        source.push_str(&format!("#version {}\n", version));
    }
    source.push_str(preamble.as_str());
    source.push_str("void main() {\n");
    source.push_str(locals.as_str());
    source.push_str(&code);
    source.push_str(&format!("{} = r0;\n", config.output_variable));
    source.push_str("}\n");

    Ok(TranslatedShader {
        source,
        constants: ctx.const_refs.into_vec(),
        samplers,
        temporaries: ctx.var_refs.into_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn program_with_modes(tex_modes: [u8; TEXTURE_UNITS]) -> ShaderProgram {
        ShaderProgram {
            tex_modes,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_program() {
        let shader = assemble(&ShaderProgram::default(), &ShaderConfig::default()).unwrap();
        assert_eq!(
            shader.source,
            "void main() {\n\
             vec4 v0 = gl_Color;\n\
             vec4 v1 = gl_SecondaryColor;\n\
             float fog = gl_FogFragCoord;\n\
             vec4 r0;\n\
             r0.a = 1.0;\n\
             gl_FragColor = r0;\n\
             }\n"
        );
        assert!(shader.constants.is_empty());
        assert!(shader.samplers.is_empty());
        assert_eq!(shader.temporaries, ["r0"]);
    }

    #[test]
    fn test_epilogue_r0_declared_after_other_temporaries() {
        // a = R1, b = ONE; ab -> R1
        let mut rgb_input = StageInputs::default();
        rgb_input.a.reg = PsRegister::R1 as u8;
        rgb_input.b.mapping = InputMapping::UnsignedInvert;
        let mut rgb_output = CombinerOutput::default();
        rgb_output.ab = PsRegister::R1 as u8;

        let program = ShaderProgram {
            stage_count: 1,
            stages: vec![CombinerStage {
                rgb_input,
                rgb_output,
                ..Default::default()
            }],
            tex_modes: [0x1, 0, 0, 0],
            ..Default::default()
        };
        let shader = assemble(&program, &ShaderConfig::default()).unwrap();
        assert_eq!(shader.temporaries, ["r1", "r0"]);
        assert_eq!(shader.source.matches("vec4 r0;").count(), 1);
        assert!(shader.source.contains("vec4 r1;\nvec4 r0;\nr0.a = t0.a;\n"));
    }

    #[test]
    fn test_texture_units() {
        let mut program = program_with_modes([0x1, 0x2, 0x3, 0x4]);
        program.rect_tex = [true, true, true, true];
        let shader = assemble(&program, &ShaderConfig::default()).unwrap();

        assert!(shader.source.starts_with(
            "uniform sampler2DRect texSamp0;\n\
             uniform sampler3D texSamp1;\n\
             uniform samplerCube texSamp2;\n\
             void main() {\n"
        ));
        assert!(shader
            .source
            .contains("vec4 t0 = texture2DRect(texSamp0, gl_TexCoord[0].xy);\n"));
        assert!(shader
            .source
            .contains("vec4 t1 = texture3D(texSamp1, gl_TexCoord[1].xyz);\n"));
        assert!(shader
            .source
            .contains("vec4 t2 = textureCube(texSamp2, gl_TexCoord[2].xyz);\n"));
        assert!(shader.source.contains("vec4 t3;\n"));
        assert!(!shader.source.contains("texSamp3"));

        let units: Vec<usize> = shader.samplers.iter().map(|s| s.unit).collect();
        assert_eq!(units, [0, 1, 2]);
    }

    #[test]
    fn test_unsupported_texture_modes() {
        let err = assemble(&program_with_modes([0, 0, 0x06, 0]), &ShaderConfig::default())
            .unwrap_err();
        assert_eq!(err, PshError::UnsupportedTextureMode { mode: 0x06, unit: 2 });

        let err = assemble(&program_with_modes([0x13, 0, 0, 0]), &ShaderConfig::default())
            .unwrap_err();
        assert_eq!(err, PshError::InvalidTextureMode { mode: 0x13, unit: 0 });
    }

    #[test]
    fn test_version_and_output_variable() {
        let config = ShaderConfig {
            glsl_version: Some(120),
            output_variable: "fragColor".to_string(),
        };
        let shader = assemble(&ShaderProgram::default(), &config).unwrap();
        assert!(shader.source.starts_with("#version 120\nvoid main() {\n"));
        assert!(shader.source.ends_with("fragColor = r0;\n}\n"));
    }
}
