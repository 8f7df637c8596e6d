use thiserror::Error;

/// Structural faults in a parameter bundle. Any of these is fatal at startup.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BundleError {
    #[error("hidden layer is empty")]
    EmptyHidden,
    #[error("input weight row {row} has {cols} columns, expected 3")]
    InputColumns { row: usize, cols: usize },
    #[error("{what} has length {len}, expected hidden width {hidden}")]
    HiddenWidth {
        what: &'static str,
        len: usize,
        hidden: usize,
    },
    #[error("{what} has {len} channels, expected 3")]
    ChannelBounds { what: &'static str, len: usize },
    #[error("input range inverted on channel {channel}: min {min} > max {max}")]
    InvertedInputRange { channel: usize, min: f64, max: f64 },
    #[error("output range inverted: min {min} > max {max}")]
    InvertedOutputRange { min: f64, max: f64 },
    #[error("non-finite coefficient in {0}")]
    NonFinite(&'static str),
    #[error("{what} range is too wide: {max} - {min} overflows")]
    UnboundedRange {
        what: &'static str,
        min: f64,
        max: f64,
    },
}

/// Per-request estimation failures. The boundary turns these into empty/null results.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SocError {
    #[error(
        "channel lengths differ: current={current} voltage={voltage} temperature={temperature}"
    )]
    InputShapeMismatch {
        current: usize,
        voltage: usize,
        temperature: usize,
    },
    #[error("drive cycle has no samples")]
    EmptyInput,
    #[error("estimate is not finite")]
    NonFinite,
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing parameter bundle")]
    MissingBundle,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
