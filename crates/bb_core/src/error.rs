use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    /// Zero denominator or a derived probability outside [0, 1].
    #[error("Invalid statline: {0}")]
    InvalidStatline(String),

    /// Lineup without a pitcher or without exactly nine batters.
    #[error("Missing lineup data: {0}")]
    MissingLineupData(String),

    #[error("Lineup exchange error at line {line}: {message}")]
    Exchange { line: usize, message: String },

    /// A random source returned an index outside the category range.
    #[error("Random source drew index {index} from {categories} categories")]
    InvalidDraw { index: usize, categories: usize },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Unsupported schema version: found {found}, expected {expected}")]
    UnsupportedSchema { found: u8, expected: u8 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SimError {
    /// Errors caused by the statistical input rather than by the caller's
    /// environment. Callers that run many matchups may skip these.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            SimError::InvalidStatline(_)
                | SimError::MissingLineupData(_)
                | SimError::Exchange { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
