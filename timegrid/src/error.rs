#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    MalformedInput(#[from] MalformedInput),
    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),

    #[error("wrong vec len {actual}, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("empty grid")]
    EmptyGrid,
    #[error("can't convert float")]
    FloatConversion,
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("index {index} out of range for {len} points")]
    OutOfRange { index: usize, len: usize },
    #[error("unsupported configs")]
    UnsupportedConfigs,
}

/// failures of the trajectory text format
#[derive(thiserror::Error, Debug)]
pub enum MalformedInput {
    #[error("can't read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: field {field} is not a number: {text:?}")]
    Number {
        line: usize,
        field: usize,
        text: String,
    },
}
