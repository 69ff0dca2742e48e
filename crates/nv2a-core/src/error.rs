//! Error types for the NV2A pixel shader translator

use thiserror::Error;

/// Main error type for the translator crates
#[derive(Error, Debug)]
pub enum Nv2aError {
    #[error("Pixel shader error: {0}")]
    Psh(#[from] PshError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),
}

/// Register combiner translation errors
///
/// Every variant describes a combiner configuration the hardware cannot
/// express. The `stage` fields use 0..=7 for combiner stages and 8 for the
/// final combiner.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PshError {
    #[error("Invalid register 0x{reg:x} in stage {stage}")]
    InvalidRegister { reg: u8, stage: u8 },

    #[error("Register 0x{reg:x} cannot be written (stage {stage})")]
    InvalidDestination { reg: u8, stage: u8 },

    #[error("EF product referenced outside the final combiner (stage {stage})")]
    EfProductOutsideFinalCombiner { stage: u8 },

    #[error("Invalid output mapping 0x{mapping:x} in stage {stage}")]
    InvalidOutputMapping { mapping: u8, stage: u8 },

    #[error("Too many combiner stages: {0} (max 8)")]
    TooManyStages(u8),

    #[error("Unsupported texture mode 0x{mode:02x} on unit {unit}")]
    UnsupportedTextureMode { mode: u8, unit: usize },

    #[error("Invalid texture mode 0x{mode:02x} on unit {unit}")]
    InvalidTextureMode { mode: u8, unit: usize },
}

/// Result type alias for translator operations
pub type Result<T> = std::result::Result<T, PshError>;
