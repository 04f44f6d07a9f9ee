//! SM-DP+ status documents.
//!
//! A failed ES9+ call may still come back as HTTP 200 with the failure
//! reported in `header.functionExecutionStatus.statusCodeData`. The body comes
//! from a remote server and is decoded defensively: anything unexpected is
//! reported as an [`Error`] and callers treat it as "no classification".

use crate::classification::ErrorCode;
use crate::error::Error;
use crate::types::HttpResponse;

/// `(subjectCode, reasonCode)` pair identifying the failed stage and cause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCodeData {
    pub subject_code: String,
    pub reason_code: String,
}

impl StatusCodeData {
    pub fn classify(&self) -> Option<ErrorCode> {
        classify_status_codes(&self.subject_code, &self.reason_code)
    }
}

/// Keyed by `(subjectCode, reasonCode)`.
pub const HTTP_STATUS_CODES: &[((&str, &str), ErrorCode)] = &[
    // AuthenticateClient
    (("8.1", "4.8"), ErrorCode::InsufficientMemory),
    (("8.1.1", "3.8"), ErrorCode::EIDMismatch),
    (("8.2", "1.2"), ErrorCode::UnreleasedProfile),
    (("8.2.6", "3.8"), ErrorCode::MatchingIDRefused),
    (("8.8.5", "6.4"), ErrorCode::ProfileRetriesExceeded),
    // GetBoundProfilePackage
    (("8.2.7", "2.2"), ErrorCode::ConfirmationCodeMissing),
    (("8.2.7", "3.8"), ErrorCode::ConfirmationCodeRefused),
    (("8.2.7", "6.4"), ErrorCode::ConfirmationCodeRetriesExceeded),
    // AuthenticateClient, GetBoundProfilePackage
    (("8.8.5", "4.10"), ErrorCode::ProfileExpired),
];

pub fn classify_status_codes(subject_code: &str, reason_code: &str) -> Option<ErrorCode> {
    HTTP_STATUS_CODES
        .iter()
        .find(|((subject, reason), _)| *subject == subject_code && *reason == reason_code)
        .map(|(_, code)| *code)
}

/// Extracts the status code pair from a response body.
pub fn parse_status_code_data(body: &[u8]) -> Result<StatusCodeData, Error> {
    let first_byte = *body.first().ok_or(Error::EmptyBody)?;
    if first_byte != b'{' {
        return Err(Error::NotADocument { first_byte });
    }

    // Invalid UTF-8 is replaced and bytes after the first value are ignored,
    // e.g. a trailing NUL copied from a native buffer.
    let text = String::from_utf8_lossy(body);
    let document = serde_json::Deserializer::from_str(&text)
        .into_iter::<serde_json::Value>()
        .next()
        .ok_or(Error::EmptyBody)??;
    let status_code_data = document
        .get("header")
        .and_then(|v| v.as_object())
        .ok_or(Error::MissingField { path: "header" })?
        .get("functionExecutionStatus")
        .and_then(|v| v.as_object())
        .ok_or(Error::MissingField {
            path: "header.functionExecutionStatus",
        })?
        .get("statusCodeData")
        .and_then(|v| v.as_object())
        .ok_or(Error::MissingField {
            path: "header.functionExecutionStatus.statusCodeData",
        })?;

    let subject_code = status_code_data
        .get("subjectCode")
        .and_then(code_text)
        .ok_or(Error::MissingField {
            path: "statusCodeData.subjectCode",
        })?;
    let reason_code = status_code_data
        .get("reasonCode")
        .and_then(code_text)
        .ok_or(Error::MissingField {
            path: "statusCodeData.reasonCode",
        })?;

    Ok(StatusCodeData {
        subject_code,
        reason_code,
    })
}

/// Servers occasionally send codes as bare numbers (`4.8`); those are read by
/// their JSON text.
fn code_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        serde_json::Value::Null | serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
            None
        }
    }
}

/// Like [`parse_status_code_data`], but never fails: malformed bodies are logged
/// and reported as absent.
pub fn decode_status_code_data(body: &[u8]) -> Option<StatusCodeData> {
    match parse_status_code_data(body) {
        Ok(data) => Some(data),
        Err(err) => {
            tracing::debug!(error = %err, body_len = body.len(), "ignoring undecodable status document");
            None
        }
    }
}

pub fn classify_response(response: &HttpResponse) -> Option<ErrorCode> {
    let data = decode_status_code_data(&response.body)?;
    let code = data.classify();
    if code.is_none() {
        tracing::debug!(
            subject_code = %data.subject_code,
            reason_code = %data.reason_code,
            "status code pair has no classification"
        );
    }
    code
}

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    clippy::panic,
    reason = "test code uses unwrap/panic for concise assertions"
)]
mod tests {
    use super::*;

    fn document(subject: &str, reason: &str) -> Vec<u8> {
        serde_json::json!({
            "header": {
                "functionExecutionStatus": {
                    "status": "Failed",
                    "statusCodeData": {
                        "subjectCode": subject,
                        "reasonCode": reason,
                        "message": "refused"
                    }
                }
            }
        })
        .to_string()
        .into_bytes()
    }

    #[test]
    fn extracts_nested_status_codes() {
        let data = parse_status_code_data(&document("8.2.6", "3.8")).unwrap();
        assert_eq!(data.subject_code, "8.2.6");
        assert_eq!(data.reason_code, "3.8");
        assert_eq!(data.classify(), Some(ErrorCode::MatchingIDRefused));
    }

    #[test]
    fn non_object_bodies_are_rejected_before_parsing() {
        assert!(matches!(
            parse_status_code_data(b"<html>Bad Gateway</html>"),
            Err(Error::NotADocument { first_byte: b'<' })
        ));
        assert!(matches!(
            parse_status_code_data(&[0x30, 0x82, 0x01, 0x00]),
            Err(Error::NotADocument { first_byte: 0x30 })
        ));
        assert!(matches!(
            parse_status_code_data(b"[]"),
            Err(Error::NotADocument { .. })
        ));
        assert!(matches!(parse_status_code_data(b""), Err(Error::EmptyBody)));
    }

    #[test]
    fn truncated_json_is_a_parse_error() {
        assert!(matches!(
            parse_status_code_data(b"{\"header\":{"),
            Err(Error::Json(_))
        ));
        assert_eq!(decode_status_code_data(b"{\"header\":{"), None);
    }

    #[test]
    fn missing_levels_are_reported_by_path() {
        let cases: &[(&str, &str)] = &[
            ("{}", "header"),
            (r#"{"header":"x"}"#, "header"),
            (r#"{"header":{}}"#, "header.functionExecutionStatus"),
            (
                r#"{"header":{"functionExecutionStatus":{"status":"Executed-Success"}}}"#,
                "header.functionExecutionStatus.statusCodeData",
            ),
            (
                r#"{"header":{"functionExecutionStatus":{"statusCodeData":{"reasonCode":"3.8"}}}}"#,
                "statusCodeData.subjectCode",
            ),
            (
                r#"{"header":{"functionExecutionStatus":{"statusCodeData":{"subjectCode":"8.1","reasonCode":null}}}}"#,
                "statusCodeData.reasonCode",
            ),
        ];
        for (body, expected) in cases {
            match parse_status_code_data(body.as_bytes()) {
                Err(Error::MissingField { path }) => assert_eq!(path, *expected, "{body}"),
                other => panic!("expected MissingField for {body}, got {other:?}"),
            }
            assert_eq!(decode_status_code_data(body.as_bytes()), None);
        }
    }

    #[test]
    fn invalid_utf8_outside_the_codes_is_tolerated() {
        let mut body = br#"{"header":{"functionExecutionStatus":{"statusCodeData":{"subjectCode":"8.2.6","reasonCode":"3.8","message":"refus"#.to_vec();
        body.extend_from_slice(b"\xE9\"}}}}");
        let response = HttpResponse {
            status_code: 200,
            body,
        };
        assert_eq!(
            classify_response(&response),
            Some(ErrorCode::MatchingIDRefused)
        );
    }

    #[test]
    fn bytes_after_the_document_are_ignored() {
        let mut body = document("8.2.6", "3.8");
        body.push(0x00);
        assert_eq!(
            decode_status_code_data(&body).and_then(|d| d.classify()),
            Some(ErrorCode::MatchingIDRefused)
        );
        let mut body = document("8.8.5", "4.10");
        body.extend_from_slice(b"\r\n--boundary--");
        assert_eq!(
            decode_status_code_data(&body).and_then(|d| d.classify()),
            Some(ErrorCode::ProfileExpired)
        );
    }

    #[test]
    fn numeric_codes_are_read_by_their_json_text() {
        let body = br#"{"header":{"functionExecutionStatus":{"statusCodeData":{"subjectCode":"8.1","reasonCode":4.8}}}}"#;
        let data = parse_status_code_data(body).unwrap();
        assert_eq!(data.reason_code, "4.8");
        let response = HttpResponse {
            status_code: 200,
            body: body.to_vec(),
        };
        assert_eq!(
            classify_response(&response),
            Some(ErrorCode::InsufficientMemory)
        );
    }

    #[test]
    fn unmapped_pairs_classify_to_none() {
        assert_eq!(classify_status_codes("8.2.6", "3.9"), None);
        assert_eq!(classify_status_codes("3.8", "8.2.6"), None);
        let response = HttpResponse {
            status_code: 200,
            body: document("1.1", "1.1"),
        };
        assert_eq!(classify_response(&response), None);
    }

    #[test]
    fn confirmation_code_failures_share_a_subject() {
        assert_eq!(
            classify_status_codes("8.2.7", "2.2"),
            Some(ErrorCode::ConfirmationCodeMissing)
        );
        assert_eq!(
            classify_status_codes("8.2.7", "3.8"),
            Some(ErrorCode::ConfirmationCodeRefused)
        );
        assert_eq!(
            classify_status_codes("8.2.7", "6.4"),
            Some(ErrorCode::ConfirmationCodeRetriesExceeded)
        );
    }
}
