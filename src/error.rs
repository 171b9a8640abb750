use crate::units::Pt;
use thiserror::Error;

/// All errors that a generation call can produce. Every variant is fatal for the
/// call that raised it: no partially rendered document is ever returned.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// A section or block in the document spec is missing a required field or
    /// has the wrong shape. Detected before any layout happens.
    #[error("invalid document spec: {0}")]
    InputValidation(String),

    /// The font collaborator could not be loaded, embedded or queried
    #[error("font error: {0}")]
    FontEmbedding(String),

    /// An atomic unit of content is taller than a whole page's usable height
    #[error("content unit of height {height} exceeds the usable page height of {available}")]
    LayoutOverflow { height: Pt, available: Pt },

    /// The title and subtitle don't fit on the cover page
    #[error("cover content of height {height} exceeds the {available} left on the cover page")]
    CoverOverflow { height: Pt, available: Pt },

    /// Rendering would produce more pages than the configured ceiling
    #[error("document exceeds the maximum of {limit} pages")]
    PageLimitExceeded { limit: usize },

    /// The document spec carries more text than the configured ceiling
    #[error("document spec has {actual} characters of content, more than the limit of {limit}")]
    ContentTooLarge { actual: usize, limit: usize },

    /// A draw was attempted after the layout engine finished
    #[error("layout engine has already finished; no further content can be drawn")]
    LayoutFinished,

    #[error(transparent)]
    /// An I/O error occurred while writing the document
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsingError(#[from] owned_ttf_parser::FaceParsingError),

    #[error(transparent)]
    /// The document spec or layout config was not valid JSON
    Json(#[from] serde_json::Error),
}

impl DocumentError {
    /// A short, stable name for the category of error, used in logs and in the
    /// transport's error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            DocumentError::InputValidation(_) | DocumentError::Json(_) => "InputValidationError",
            DocumentError::FontEmbedding(_) | DocumentError::FaceParsingError(_) => {
                "FontEmbeddingError"
            }
            DocumentError::LayoutOverflow { .. } | DocumentError::CoverOverflow { .. } => {
                "LayoutOverflowError"
            }
            DocumentError::PageLimitExceeded { .. } | DocumentError::ContentTooLarge { .. } => {
                "ResourceLimitError"
            }
            DocumentError::LayoutFinished => "LayoutProtocolError",
            DocumentError::Io(_) => "IoError",
        }
    }
}

pub type Result<T, E = DocumentError> = std::result::Result<T, E>;
