use crate::classification::ErrorCode;
use crate::types::TransportError;

const CONNECTION_RESET: &str = "connection reset";

pub fn classify_exception(err: &TransportError) -> Option<ErrorCode> {
    match err {
        TransportError::Tls { .. } => Some(ErrorCode::TLSError),
        TransportError::UnknownHost { .. } => Some(ErrorCode::UnknownHost),
        TransportError::NoRouteToHost
        | TransportError::PortUnreachable
        | TransportError::Timeout => Some(ErrorCode::NetworkUnreachable),
        TransportError::Socket { message } => {
            // Matches on OS-provided text, so it only works for English
            // messages. Other socket failures are not classified.
            let reset = message
                .as_deref()
                .is_some_and(|m| m.to_lowercase().contains(CONNECTION_RESET));
            if reset {
                Some(ErrorCode::NetworkUnreachable)
            } else {
                tracing::debug!(message = ?message, "socket failure has no classification");
                None
            }
        }
        TransportError::Other { .. } => None,
    }
}
