use hidapi::HidError;

pub type MinideckResult<T> = Result<T, MinideckError>;

#[derive(thiserror::Error)]
pub enum MinideckError {
    #[error("failed to find device")]
    DeviceNotFound,
    #[error("invalid key index {_0}, must be 0-5")]
    InvalidKeyIndex(u8),
    #[error("invalid brightness {_0}, must be 0-100")]
    InvalidBrightness(u8),
    #[error("invalid image size {_0}, must be exactly 15552 bytes of 72x72 rgb")]
    InvalidImageSize(usize),
    #[error("{_0}")]
    Hid(#[from] HidError),
}

impl std::fmt::Debug for MinideckError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}
