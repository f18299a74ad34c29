use crate::error::AppError;
use image::DynamicImage;

/// Tesseract OCR engine mode. Fixed for every invocation.
pub const ENGINE_MODE: u8 = 3;

/// Page segmentation mode: the layout assumption handed to the OCR
/// engine. Values are the engine's own; only the modes the UI offers
/// are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSegMode {
    /// Fully automatic page segmentation
    #[default]
    Auto,
    /// Single column of text of variable sizes
    SingleColumn,
    /// Single uniform block of text
    SingleBlock,
    /// Sparse text, no particular order
    SparseText,
    /// Sparse text with orientation and script detection
    SparseTextOsd,
}

impl PageSegMode {
    /// Parse from the mode number posted by the UI dropdown.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            3 => Some(Self::Auto),
            4 => Some(Self::SingleColumn),
            6 => Some(Self::SingleBlock),
            11 => Some(Self::SparseText),
            12 => Some(Self::SparseTextOsd),
            _ => None,
        }
    }

    /// The engine's numeric value for this mode.
    pub fn as_number(&self) -> u8 {
        match self {
            Self::Auto => 3,
            Self::SingleColumn => 4,
            Self::SingleBlock => 6,
            Self::SparseText => 11,
            Self::SparseTextOsd => 12,
        }
    }

    /// All accepted modes, in the order the UI offers them.
    pub fn all() -> [Self; 5] {
        [
            Self::Auto,
            Self::SingleColumn,
            Self::SingleBlock,
            Self::SparseText,
            Self::SparseTextOsd,
        ]
    }
}

/// Seam for text recognition, so the HTTP layer can run against a
/// substitute engine in tests.
pub trait TextRecognizer: Send + Sync {
    /// Returns the engine identifier (e.g., "tesseract")
    fn name(&self) -> &'static str;

    /// Recognize text in `image` using the given page segmentation
    /// mode. One synchronous call, no retries.
    fn recognize(&self, image: &DynamicImage, mode: PageSegMode) -> Result<String, AppError>;
}
