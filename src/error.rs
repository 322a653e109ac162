use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config deserialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0} must be finite and greater than zero")]
    InvalidConfig(&'static str),

    #[error("Invalid overlay asset: {width}x{height} has no area")]
    EmptyOverlay { width: u32, height: u32 },

    #[error("Invalid view mapping: {0}")]
    InvalidMapping(String),

    #[error(
        "Overlay image is {actual_width}x{actual_height} but the asset was built for {width}x{height}"
    )]
    OverlayMismatch {
        width: u32,
        height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("Overlay transform is not invertible")]
    SingularTransform,
}

pub type Result<T> = std::result::Result<T, Error>;
