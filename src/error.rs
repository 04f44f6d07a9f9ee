#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("response body is empty")]
    EmptyBody,

    #[error("response body is not a JSON object (first byte 0x{first_byte:02X})")]
    NotADocument { first_byte: u8 },

    #[error("status document missing {path}")]
    MissingField { path: &'static str },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
