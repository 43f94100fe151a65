use thiserror::Error;

/// Invalid user input. Everything here is detected before any external tool
/// is invoked, so a failed run never leaves partial work behind.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid target position {begin}..{end}: end must be greater than begin, both non-negative")]
    InvalidTargetRegion { begin: i64, end: i64 },

    #[error("Invalid product size range {min}..{max}: min must be positive and strictly smaller than max")]
    InvalidSizeRange { min: i64, max: i64 },

    #[error("Insert of {insert} bases cannot fit into the minimal product size of {min}")]
    InsertTooLarge { insert: i64, min: i64 },

    #[error("No target position given: pass --pos or set target_begin/target_end in the config")]
    MissingTargetRegion,

    #[error("No product size range given: pass --size or set product_size_min/product_size_max in the config")]
    MissingSizeRange,

    #[error("No sequence with id prefix '{0}' found in the FASTA file")]
    SequenceNotFound(String),

    #[error("Can't read primer file: {0}")]
    MissingPrimerFile(String),

    #[error("Can't read config file: {0}")]
    FileReadError(String),

    #[error("Error parsing config file: {0}")]
    ParseError(String),
}

/// Failures of the pipeline itself once the configuration has been accepted.
/// None of these are retried; a run is a one-shot batch job.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("{tool} failed: {message}")]
    ToolFailed { tool: String, message: String },

    #[error("Malformed design engine output line: {0}")]
    MalformedEngineOutput(String),

    #[error("Malformed alignment record: {0}")]
    MalformedAlignment(String),

    #[error("Alignment references primer pair ({0}) absent from the registry")]
    UnknownPair(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
