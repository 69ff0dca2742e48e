//! NV2A register combiner type definitions
//!
//! Describes the decoded form of the combiner control words. Values are kept
//! close to the register encoding: anything that can hold a reserved bit
//! pattern (register ids, output mappings, texture modes) stays a raw integer
//! and is checked when the shader is emitted.

use bitflags::bitflags;

/// Number of general combiner stages
pub const MAX_COMBINER_STAGES: usize = 8;

/// Number of texture units feeding the combiners
pub const TEXTURE_UNITS: usize = 4;

/// Stage index used while the final combiner is emitted
pub const FINAL_COMBINER_STAGE: u8 = 8;

//=============================================================================
// REGISTERS AND INPUT MAPPINGS
//=============================================================================

/// Combiner register ids
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PsRegister {
    /// Reads as zero, discards writes
    Zero = 0x00,
    C0 = 0x01,
    C1 = 0x02,
    Fog = 0x03,
    V0 = 0x04,
    V1 = 0x05,
    T0 = 0x08,
    T1 = 0x09,
    T2 = 0x0A,
    T3 = 0x0B,
    R0 = 0x0C,
    R1 = 0x0D,
    /// V1 + R0, source only
    V1R0Sum = 0x0E,
    /// E * F from the final combiner, source only
    EfProd = 0x0F,
}

impl PsRegister {
    /// Write alias of [`PsRegister::Zero`]
    pub const DISCARD: PsRegister = PsRegister::Zero;

    /// Map a raw 4-bit register id, `None` for the reserved ids 6 and 7
    pub fn from_raw(reg: u8) -> Option<Self> {
        match reg & 0xF {
            0x00 => Some(PsRegister::Zero),
            0x01 => Some(PsRegister::C0),
            0x02 => Some(PsRegister::C1),
            0x03 => Some(PsRegister::Fog),
            0x04 => Some(PsRegister::V0),
            0x05 => Some(PsRegister::V1),
            0x08 => Some(PsRegister::T0),
            0x09 => Some(PsRegister::T1),
            0x0A => Some(PsRegister::T2),
            0x0B => Some(PsRegister::T3),
            0x0C => Some(PsRegister::R0),
            0x0D => Some(PsRegister::R1),
            0x0E => Some(PsRegister::V1R0Sum),
            0x0F => Some(PsRegister::EfProd),
            _ => None,
        }
    }
}

/// Input channel selector
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PsChannel {
    /// RGB in the RGB lane, blue in the alpha lane
    Rgb = 0,
    Alpha = 1,
}

impl PsChannel {
    /// Alpha-lane name of [`PsChannel::Rgb`]
    pub const BLUE: PsChannel = PsChannel::Rgb;
}

impl From<u8> for PsChannel {
    fn from(v: u8) -> Self {
        match v & 0x1 {
            0 => PsChannel::Rgb,
            _ => PsChannel::Alpha,
        }
    }
}

/// Input mapping applied to a combiner input
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputMapping {
    UnsignedIdentity = 0, // max(0,x)
    UnsignedInvert = 1,   // 1 - max(0,x)
    ExpandNormal = 2,     // 2*max(0,x) - 1
    ExpandNegate = 3,     // 1 - 2*max(0,x)
    HalfbiasNormal = 4,   // max(0,x) - 1/2
    HalfbiasNegate = 5,   // 1/2 - max(0,x)
    SignedIdentity = 6,   // x
    SignedNegate = 7,     // -x
}

impl From<u8> for InputMapping {
    fn from(v: u8) -> Self {
        match v & 0x7 {
            0 => InputMapping::UnsignedIdentity,
            1 => InputMapping::UnsignedInvert,
            2 => InputMapping::ExpandNormal,
            3 => InputMapping::ExpandNegate,
            4 => InputMapping::HalfbiasNormal,
            5 => InputMapping::HalfbiasNegate,
            6 => InputMapping::SignedIdentity,
            _ => InputMapping::SignedNegate,
        }
    }
}

/// One decoded combiner input byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputInfo {
    pub reg: u8,                 // bits 0-3
    pub chan: PsChannel,         // bit 4
    pub mapping: InputMapping,   // bits 5-7
}

impl Default for InputInfo {
    fn default() -> Self {
        Self {
            reg: PsRegister::Zero as u8,
            chan: PsChannel::Rgb,
            mapping: InputMapping::UnsignedIdentity,
        }
    }
}

/// The four inputs of one combiner lane
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StageInputs {
    pub a: InputInfo,
    pub b: InputInfo,
    pub c: InputInfo,
    pub d: InputInfo,
}

//=============================================================================
// COMBINER OUTPUTS
//=============================================================================

bitflags! {
    /// Flag bits of a combiner output word (bits 12-19, shifted down)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CombinerOutputFlags: u32 {
        const CD_DOT_PRODUCT = 0x01;
        const AB_DOT_PRODUCT = 0x02;
        const AB_CD_MUX = 0x04;
        const MAPPING = 0x38;
        const CD_BLUE_TO_ALPHA = 0x40;
        const AB_BLUE_TO_ALPHA = 0x80;
    }
}

/// Output mapping applied to a combiner result
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputMapping {
    Identity = 0,       // y = x
    Bias = 1,           // y = x - 0.5
    ShiftLeft1 = 2,     // y = x*2
    ShiftLeft1Bias = 3, // y = (x - 0.5)*2
    ShiftLeft2 = 4,     // y = x*4
    ShiftRight1 = 6,    // y = x/2
}

impl OutputMapping {
    /// Map a raw 3-bit mapping code, `None` for the reserved codes 5 and 7
    pub fn from_raw(code: u8) -> Option<Self> {
        match code {
            0 => Some(OutputMapping::Identity),
            1 => Some(OutputMapping::Bias),
            2 => Some(OutputMapping::ShiftLeft1),
            3 => Some(OutputMapping::ShiftLeft1Bias),
            4 => Some(OutputMapping::ShiftLeft2),
            6 => Some(OutputMapping::ShiftRight1),
            _ => None,
        }
    }
}

/// Operation producing the AB or CD output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProductOp {
    #[default]
    Multiply,
    DotProduct,
}

/// Operation producing the third output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MuxSumOp {
    /// AB + CD
    #[default]
    Sum,
    /// CD if r0.a >= 0.5, else AB
    Mux,
}

/// One decoded combiner output word
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CombinerOutput {
    pub cd: u8,                 // bits 0-3
    pub ab: u8,                 // bits 4-7
    pub muxsum: u8,             // bits 8-11
    pub cd_op: ProductOp,       // flag bit 0
    pub ab_op: ProductOp,       // flag bit 1
    pub muxsum_op: MuxSumOp,    // flag bit 2
    pub mapping: u8,            // flag bits 3-5
    pub cd_blue_to_alpha: bool, // flag bit 6
    pub ab_blue_to_alpha: bool, // flag bit 7
}

/// One general combiner stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CombinerStage {
    pub rgb_input: StageInputs,
    pub rgb_output: CombinerOutput,
    pub alpha_input: StageInputs,
    pub alpha_output: CombinerOutput,
}

//=============================================================================
// FINAL COMBINER
//=============================================================================

bitflags! {
    /// Final combiner settings byte
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FinalCombinerSettings: u8 {
        /// V1+R0 sum clamped to [0,1]
        const CLAMP_SUM = 0x80;
        /// Unsigned invert mapping on V1
        const COMPLEMENT_V1 = 0x40;
        /// Unsigned invert mapping on R0
        const COMPLEMENT_R0 = 0x20;
    }
}

/// Decoded final combiner
///
/// Computes `a*b + (1-a)*c + d` for RGB and `g` for alpha.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FinalCombiner {
    pub a: InputInfo,
    pub b: InputInfo,
    pub c: InputInfo,
    pub d: InputInfo,
    pub e: InputInfo,
    pub f: InputInfo,
    pub g: InputInfo,
    pub settings: FinalCombinerSettings,
    /// Set when either final combiner word is non-zero
    pub enabled: bool,
}

//=============================================================================
// PROGRAM
//=============================================================================

bitflags! {
    /// Combiner count flags (combiner control bits 8 and up, shifted down)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CombinerCountFlags: u32 {
        /// Mux on the MSB of r0.a rather than the LSB
        const MUX_MSB = 0x001;
        /// C0 is a separate constant in every stage
        const UNIQUE_C0 = 0x010;
        /// C1 is a separate constant in every stage
        const UNIQUE_C1 = 0x100;
    }
}

/// Texture stage modes
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureMode {
    None = 0x00,
    Project2D = 0x01,
    Project3D = 0x02,
    Cubemap = 0x03,
    Passthru = 0x04,
    ClipPlane = 0x05,
    BumpEnvMap = 0x06,
    BumpEnvMapLum = 0x07,
    Brdf = 0x08,
    DotSt = 0x09,
    DotZw = 0x0A,
    DotReflectDiffuse = 0x0B,
    DotReflectSpecular = 0x0C,
    DotStr3D = 0x0D,
    DotStrCube = 0x0E,
    DependentAr = 0x0F,
    DependentGb = 0x10,
    DotProduct = 0x11,
    DotReflectSpecularConst = 0x12,
}

impl TextureMode {
    /// Map a raw 5-bit mode, `None` for the reserved values 0x13-0x1f
    pub fn from_raw(mode: u8) -> Option<Self> {
        let all = [
            TextureMode::None,
            TextureMode::Project2D,
            TextureMode::Project3D,
            TextureMode::Cubemap,
            TextureMode::Passthru,
            TextureMode::ClipPlane,
            TextureMode::BumpEnvMap,
            TextureMode::BumpEnvMapLum,
            TextureMode::Brdf,
            TextureMode::DotSt,
            TextureMode::DotZw,
            TextureMode::DotReflectDiffuse,
            TextureMode::DotReflectSpecular,
            TextureMode::DotStr3D,
            TextureMode::DotStrCube,
            TextureMode::DependentAr,
            TextureMode::DependentGb,
            TextureMode::DotProduct,
            TextureMode::DotReflectSpecularConst,
        ];
        all.get(mode as usize).copied()
    }
}

/// GLSL sampler used for a texture unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SamplerType {
    Sampler2D,
    Sampler2DRect,
    Sampler3D,
    SamplerCube,
}

impl SamplerType {
    /// GLSL type name
    pub fn glsl_type(self) -> &'static str {
        match self {
            SamplerType::Sampler2D => "sampler2D",
            SamplerType::Sampler2DRect => "sampler2DRect",
            SamplerType::Sampler3D => "sampler3D",
            SamplerType::SamplerCube => "samplerCube",
        }
    }

    /// GLSL fetch function
    pub fn fetch_function(self) -> &'static str {
        match self {
            SamplerType::Sampler2D => "texture2D",
            SamplerType::Sampler2DRect => "texture2DRect",
            SamplerType::Sampler3D => "texture3D",
            SamplerType::SamplerCube => "textureCube",
        }
    }

    /// Texture coordinate components consumed by the fetch
    pub fn coord_swizzle(self) -> &'static str {
        match self {
            SamplerType::Sampler2D | SamplerType::Sampler2DRect => "xy",
            SamplerType::Sampler3D | SamplerType::SamplerCube => "xyz",
        }
    }
}

/// Decoded pixel shader
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderProgram {
    /// Stage count as written by the guest
    pub stage_count: u8,
    /// Decoded stages, at most [`MAX_COMBINER_STAGES`]
    pub stages: Vec<CombinerStage>,
    pub final_combiner: FinalCombiner,
    pub flags: CombinerCountFlags,
    /// Raw 5-bit texture mode per unit
    pub tex_modes: [u8; TEXTURE_UNITS],
    pub rect_tex: [bool; TEXTURE_UNITS],
    /// Texture unit read by dependent texture modes
    pub input_texture: [Option<u8>; TEXTURE_UNITS],
}

impl ShaderProgram {
    /// Whether a texture unit produces a `t<n>` value
    pub fn texture_active(&self, unit: usize) -> bool {
        self.tex_modes[unit] != TextureMode::None as u8
    }
}

/// Raw combiner register state, the full input of one translation
///
/// Every field affects the generated text, so this is also the key callers
/// should cache translated shaders under.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CombinerRegisters {
    /// Stage count (bits 0-7) and combiner count flags (bits 8 and up)
    pub combiner_control: u32,
    /// Texture mode per unit, 5 bits each
    pub shader_stage_program: u32,
    /// Dependent texture inputs for units 2 and 3
    pub other_stage_input: u32,
    pub rgb_inputs: [u32; MAX_COMBINER_STAGES],
    pub rgb_outputs: [u32; MAX_COMBINER_STAGES],
    pub alpha_inputs: [u32; MAX_COMBINER_STAGES],
    pub alpha_outputs: [u32; MAX_COMBINER_STAGES],
    pub final_inputs_0: u32,
    pub final_inputs_1: u32,
    /// Texture units bound to rectangle textures
    pub rect_tex: [bool; TEXTURE_UNITS],
}
