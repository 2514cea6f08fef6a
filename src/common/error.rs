use thiserror::Error;

// Error
//------------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq, Copy, Clone)]
pub enum QRError {
    // Encoding
    #[error("Invalid character for the requested encoding mode")]
    InvalidChar,

    // Capacity
    #[error("Data too long for the requested version and error correction level")]
    DataTooLong,

    // Config
    #[error("Invalid version, expected 1 to 40")]
    InvalidVersion,
    #[error("Invalid error correction level, expected one of L, M, Q, H")]
    InvalidECLevel,
    #[error("Invalid masking pattern, expected 0 to 7")]
    InvalidMaskingPattern,
    #[error("Invalid box size, expected a positive size that fits the canvas")]
    InvalidBoxSize,
    #[error("Invalid color, expected #rrggbb, #rgb, black or white")]
    InvalidColor,
    #[error("Invalid output format, expected png or svg")]
    InvalidFormat,

    // Render
    #[error("Failed to encode the image")]
    ImageEncoding,
}

/// Coarse classification of [`QRError`] variants.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum ErrorKind {
    /// Input cannot be represented in the requested mode.
    Encoding,
    /// Payload exceeds the symbol capacity.
    Capacity,
    /// Invalid builder or render configuration.
    Config,
    /// Image encoder failure.
    Render,
}

impl QRError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidChar => ErrorKind::Encoding,
            Self::DataTooLong => ErrorKind::Capacity,
            Self::InvalidVersion
            | Self::InvalidECLevel
            | Self::InvalidMaskingPattern
            | Self::InvalidBoxSize
            | Self::InvalidColor
            | Self::InvalidFormat => ErrorKind::Config,
            Self::ImageEncoding => ErrorKind::Render,
        }
    }
}

pub type QRResult<T> = Result<T, QRError>;
