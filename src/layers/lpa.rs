use crate::classification::ErrorCode;

/// Reason reported when the card did not say why the download failed.
pub const ES10B_ERROR_REASON_UNDEFINED: &str = "ES10B_ERROR_REASON_UNDEFINED";

/// ES10b error reasons that have a user-facing classification.
pub const LPA_REASON_CODES: &[(&str, ErrorCode)] = &[
    (
        "ES10B_ERROR_REASON_UNSUPPORTED_CRT_VALUES",
        ErrorCode::UnsupportedProfile,
    ),
    (
        "ES10B_ERROR_REASON_UNSUPPORTED_REMOTE_OPERATION_TYPE",
        ErrorCode::UnsupportedProfile,
    ),
    (
        "ES10B_ERROR_REASON_UNSUPPORTED_PROFILE_CLASS",
        ErrorCode::UnsupportedProfile,
    ),
    (
        "ES10B_ERROR_REASON_INSTALL_FAILED_DUE_TO_ICCID_ALREADY_EXISTS_ON_EUICC",
        ErrorCode::ICCIDAlready,
    ),
    (
        "ES10B_ERROR_REASON_INSTALL_FAILED_DUE_TO_INSUFFICIENT_MEMORY_FOR_PROFILE",
        ErrorCode::InsufficientMemory,
    ),
    (
        "ES10B_ERROR_REASON_INSTALL_FAILED_DUE_TO_INTERRUPTION",
        ErrorCode::CardInternalError,
    ),
    (
        "ES10B_ERROR_REASON_INSTALL_FAILED_DUE_TO_PE_PROCESSING_ERROR",
        ErrorCode::CardInternalError,
    ),
];

pub fn classify_reason(reason: &str) -> Option<ErrorCode> {
    LPA_REASON_CODES
        .iter()
        .find(|(token, _)| *token == reason)
        .map(|(_, code)| *code)
}
