pub mod adapters;

use serde::Serialize;

use crate::classification::adapters::adapter_for;
use crate::layers::{Layer, PRECEDENCE};
use crate::types::DownloadFailure;

/// User-actionable reason a profile download failed.
///
/// Each code carries a title message key and, for most codes, a key for a
/// suggested next step. Keys are resolved to localized text by the UI.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::AsRefStr,
    strum_macros::EnumIter,
)]
pub enum ErrorCode {
    ICCIDAlready,
    InsufficientMemory,
    UnsupportedProfile,
    CardInternalError,
    EIDMismatch,
    UnreleasedProfile,
    MatchingIDRefused,
    ProfileRetriesExceeded,
    ConfirmationCodeMissing,
    ConfirmationCodeRefused,
    ConfirmationCodeRetriesExceeded,
    ProfileExpired,
    UnknownHost,
    NetworkUnreachable,
    TLSError,
}

const SUGGEST_PROFILE_INSTALLED: &str = "download_wizard_error_suggest_profile_installed";
const SUGGEST_INSUFFICIENT_MEMORY: &str = "download_wizard_error_suggest_insufficient_memory";
const SUGGEST_CONTACT_REISSUE: &str = "download_wizard_error_suggest_contact_reissue";
const SUGGEST_CONTACT_CARRIER: &str = "download_wizard_error_suggest_contact_carrier";
const SUGGEST_NETWORK_UNREACHABLE: &str = "download_wizard_error_suggest_network_unreachable";

impl ErrorCode {
    pub fn title_key(self) -> &'static str {
        match self {
            Self::ICCIDAlready => "download_wizard_error_iccid_already",
            Self::InsufficientMemory => "download_wizard_error_insufficient_memory",
            Self::UnsupportedProfile => "download_wizard_error_unsupported_profile",
            Self::CardInternalError => "download_wizard_error_card_internal_error",
            Self::EIDMismatch => "download_wizard_error_eid_mismatch",
            Self::UnreleasedProfile => "download_wizard_error_profile_unreleased",
            Self::MatchingIDRefused => "download_wizard_error_matching_id_refused",
            Self::ProfileRetriesExceeded => "download_wizard_error_profile_retries_exceeded",
            Self::ConfirmationCodeMissing => "download_wizard_error_confirmation_code_missing",
            Self::ConfirmationCodeRefused => "download_wizard_error_confirmation_code_refused",
            Self::ConfirmationCodeRetriesExceeded => {
                "download_wizard_error_confirmation_code_retries_exceeded"
            }
            Self::ProfileExpired => "download_wizard_error_profile_expired",
            Self::UnknownHost => "download_wizard_error_unknown_hostname",
            Self::NetworkUnreachable => "download_wizard_error_network_unreachable",
            Self::TLSError => "download_wizard_error_tls_certificate",
        }
    }

    pub fn suggest_key(self) -> Option<&'static str> {
        match self {
            Self::ICCIDAlready => Some(SUGGEST_PROFILE_INSTALLED),
            Self::InsufficientMemory => Some(SUGGEST_INSUFFICIENT_MEMORY),
            Self::EIDMismatch | Self::UnreleasedProfile => Some(SUGGEST_CONTACT_REISSUE),
            Self::MatchingIDRefused
            | Self::ProfileRetriesExceeded
            | Self::ConfirmationCodeMissing
            | Self::ConfirmationCodeRefused
            | Self::ConfirmationCodeRetriesExceeded
            | Self::ProfileExpired => Some(SUGGEST_CONTACT_CARRIER),
            Self::NetworkUnreachable => Some(SUGGEST_NETWORK_UNREACHABLE),
            Self::UnsupportedProfile
            | Self::CardInternalError
            | Self::UnknownHost
            | Self::TLSError => None,
        }
    }
}

/// Outcome of classifying a [`DownloadFailure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Diagnosis {
    /// Layer that decided the outcome; `None` when no layer had a signal.
    pub layer: Option<Layer>,
    /// `None` means the failure should be shown generically.
    pub code: Option<ErrorCode>,
}

pub struct Classifier;

impl Classifier {
    /// Walks [`PRECEDENCE`] and lets the first layer with a signal decide.
    ///
    /// Layers are never combined: a specific but unmapped LPA reason ends the
    /// walk with no code even if the HTTP or card layers would classify.
    pub fn diagnose(failure: &DownloadFailure) -> Diagnosis {
        for layer in PRECEDENCE {
            let adapter = adapter_for(layer);
            if !adapter.applies(failure) {
                continue;
            }
            let code = adapter.classify(failure);
            tracing::trace!(layer = %layer, code = ?code, "download failure classified");
            return Diagnosis {
                layer: Some(layer),
                code,
            };
        }
        tracing::trace!("download failure carries no signal on any layer");
        Diagnosis {
            layer: None,
            code: None,
        }
    }

    pub fn classify(failure: &DownloadFailure) -> Option<ErrorCode> {
        Self::diagnose(failure).code
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;
    use crate::layers::lpa::ES10B_ERROR_REASON_UNDEFINED;
    use crate::types::{HttpResponse, TransportError};

    fn lcg_next(state: &mut u64) -> u64 {
        *state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1);
        *state
    }

    fn status_body(subject: &str, reason: &str) -> Vec<u8> {
        format!(
            r#"{{"header":{{"functionExecutionStatus":{{"statusCodeData":{{"subjectCode":"{subject}","reasonCode":"{reason}"}}}}}}}}"#
        )
        .into_bytes()
    }

    fn random_http(state: &mut u64) -> Option<HttpResponse> {
        match lcg_next(state) % 4 {
            0 => None,
            1 => Some(HttpResponse {
                status_code: 200,
                body: status_body("8.2.6", "3.8"),
            }),
            2 => Some(HttpResponse {
                status_code: 500,
                body: b"Internal Server Error".to_vec(),
            }),
            _ => Some(HttpResponse {
                status_code: 200,
                body: vec![0x30, 0x03, 0x02, 0x01, 0x00],
            }),
        }
    }

    fn random_exception(state: &mut u64) -> Option<TransportError> {
        match lcg_next(state) % 5 {
            0 => None,
            1 => Some(TransportError::UnknownHost { host: None }),
            2 => Some(TransportError::Tls { message: None }),
            3 => Some(TransportError::Timeout),
            _ => Some(TransportError::Socket {
                message: Some("Broken pipe".to_string()),
            }),
        }
    }

    fn random_apdu(state: &mut u64) -> Option<Vec<u8>> {
        match lcg_next(state) % 3 {
            0 => None,
            1 => Some(vec![0x90, 0x00]),
            _ => Some(vec![0x6F, 0x00]),
        }
    }

    fn random_failure(state: &mut u64, lpa_error_reason: &str) -> DownloadFailure {
        DownloadFailure {
            lpa_error_reason: lpa_error_reason.to_string(),
            last_http_response: random_http(state),
            last_http_exception: random_exception(state),
            last_apdu_response: random_apdu(state),
        }
    }

    #[test]
    fn error_code_names_roundtrip() {
        for code in ErrorCode::iter() {
            assert_eq!(code.to_string().parse::<ErrorCode>().ok(), Some(code));
            assert_eq!(code.as_ref(), code.to_string());
        }
        assert_eq!(ErrorCode::TLSError.to_string(), "TLSError");
        assert_eq!("Unknown".parse::<ErrorCode>().ok(), None);
    }

    #[test]
    fn every_code_has_a_distinct_title_key() {
        let keys: Vec<&str> = ErrorCode::iter().map(ErrorCode::title_key).collect();
        for (i, key) in keys.iter().enumerate() {
            assert!(key.starts_with("download_wizard_error_"));
            assert!(!keys[i + 1..].contains(key), "duplicate title key {key}");
        }
    }

    #[test]
    fn suggestion_keys_follow_the_failure_domain() {
        assert_eq!(
            ErrorCode::ICCIDAlready.suggest_key(),
            Some("download_wizard_error_suggest_profile_installed")
        );
        assert_eq!(
            ErrorCode::EIDMismatch.suggest_key(),
            ErrorCode::UnreleasedProfile.suggest_key()
        );
        assert_eq!(
            ErrorCode::ProfileExpired.suggest_key(),
            Some("download_wizard_error_suggest_contact_carrier")
        );
        for code in [
            ErrorCode::UnsupportedProfile,
            ErrorCode::CardInternalError,
            ErrorCode::UnknownHost,
            ErrorCode::TLSError,
        ] {
            assert_eq!(code.suggest_key(), None, "{code}");
        }
    }

    #[test]
    fn empty_failure_has_no_layer() {
        assert_eq!(
            Classifier::diagnose(&DownloadFailure::undefined()),
            Diagnosis {
                layer: None,
                code: None
            }
        );
    }

    #[test]
    fn unmapped_lpa_reason_does_not_fall_through() {
        let failure = DownloadFailure {
            lpa_error_reason: "ES10B_ERROR_REASON_NOT_IN_TABLE".to_string(),
            last_http_response: Some(HttpResponse {
                status_code: 200,
                body: status_body("8.2.6", "3.8"),
            }),
            last_http_exception: Some(TransportError::UnknownHost { host: None }),
            last_apdu_response: Some(vec![0x6F, 0x00]),
        };
        assert_eq!(
            Classifier::diagnose(&failure),
            Diagnosis {
                layer: Some(Layer::LpaReason),
                code: None
            }
        );
    }

    #[test]
    fn non_200_response_defers_to_transport() {
        let failure = DownloadFailure {
            last_http_response: Some(HttpResponse {
                status_code: 404,
                body: status_body("8.2.6", "3.8"),
            }),
            last_http_exception: Some(TransportError::Tls { message: None }),
            ..DownloadFailure::undefined()
        };
        assert_eq!(
            Classifier::diagnose(&failure),
            Diagnosis {
                layer: Some(Layer::Transport),
                code: Some(ErrorCode::TLSError)
            }
        );
    }

    #[test]
    fn undecodable_200_body_stops_the_walk() {
        let failure = DownloadFailure {
            last_http_response: Some(HttpResponse {
                status_code: 200,
                body: b"not json".to_vec(),
            }),
            last_http_exception: Some(TransportError::Timeout),
            last_apdu_response: Some(vec![0x6F, 0x00]),
            ..DownloadFailure::undefined()
        };
        assert_eq!(
            Classifier::diagnose(&failure),
            Diagnosis {
                layer: Some(Layer::HttpStatus),
                code: None
            }
        );
    }

    #[test]
    fn unmapped_socket_failure_does_not_reach_the_card_layer() {
        let failure = DownloadFailure {
            last_http_exception: Some(TransportError::Socket {
                message: Some("Software caused connection abort".to_string()),
            }),
            last_apdu_response: Some(vec![0x6A, 0x80]),
            ..DownloadFailure::undefined()
        };
        assert_eq!(
            Classifier::diagnose(&failure).layer,
            Some(Layer::Transport)
        );
        assert_eq!(Classifier::classify(&failure), None);
    }

    #[test]
    fn recognized_lpa_reason_wins_for_randomized_failures() {
        let mut seed = 0x00E5_1A11_u64;
        for (reason, expected) in crate::layers::lpa::LPA_REASON_CODES {
            for _ in 0..2_000 {
                let failure = random_failure(&mut seed, reason);
                assert_eq!(Classifier::classify(&failure), Some(*expected), "{failure:?}");
            }
        }
    }

    #[test]
    fn unrecognized_lpa_reason_is_absent_for_randomized_failures() {
        let mut seed = 0x0BAD_CAFE_u64;
        for reason in ["ES10B_ERROR_REASON_FUTURE", "", "undefined"] {
            for _ in 0..2_000 {
                let failure = random_failure(&mut seed, reason);
                assert_eq!(Classifier::classify(&failure), None, "{failure:?}");
            }
        }
    }

    #[test]
    fn sentinel_reason_defers_to_later_layers_for_randomized_failures() {
        let mut seed = 0x5EED_u64;
        for _ in 0..10_000 {
            let failure = random_failure(&mut seed, ES10B_ERROR_REASON_UNDEFINED);
            let diagnosis = Classifier::diagnose(&failure);
            let expected_layer = if failure
                .last_http_response
                .as_ref()
                .is_some_and(HttpResponse::is_ok)
            {
                Some(Layer::HttpStatus)
            } else if failure.last_http_exception.is_some() {
                Some(Layer::Transport)
            } else if failure.last_apdu_response.is_some() {
                Some(Layer::Apdu)
            } else {
                None
            };
            assert_eq!(diagnosis.layer, expected_layer, "{failure:?}");
        }
    }
}
