#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::dbg_macro,
        clippy::print_stdout,
        clippy::print_stderr,
        clippy::panic,
    )
)]

pub mod classification;
pub mod error;
pub mod layers;
pub mod types;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use classification::adapters::{LayerClassifier, adapter_for};
pub use classification::{Classifier, Diagnosis, ErrorCode};
pub use error::Error;
pub use layers::apdu::StatusWord;
pub use layers::http::{
    HTTP_STATUS_CODES, StatusCodeData, decode_status_code_data, parse_status_code_data,
};
pub use layers::lpa::{ES10B_ERROR_REASON_UNDEFINED, LPA_REASON_CODES};
pub use layers::{Layer, PRECEDENCE};
pub use types::{DownloadFailure, HttpResponse, TransportError};

/// Reduces a failed download to a single classification, or `None` when the
/// failure should be presented generically.
pub fn classify_download_failure(failure: &DownloadFailure) -> Option<ErrorCode> {
    Classifier::classify(failure)
}
