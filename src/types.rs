use crate::layers::lpa::ES10B_ERROR_REASON_UNDEFINED;

/// Terminal state of a failed profile download, as handed over by the
/// download state machine. Each field is the last signal seen on one layer.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadFailure {
    /// ES10b error-reason token reported by the LPA stack.
    /// [`ES10B_ERROR_REASON_UNDEFINED`] when the card gave no specific reason.
    #[serde(default = "undefined_reason", deserialize_with = "deserialize_reason")]
    pub lpa_error_reason: String,
    /// Last completed HTTP exchange with the SM-DP+, if any.
    #[serde(default)]
    pub last_http_response: Option<HttpResponse>,
    /// Transport failure that aborted the last HTTP exchange, if any.
    #[serde(default)]
    pub last_http_exception: Option<TransportError>,
    /// Last raw card response, trailer included.
    #[serde(default)]
    pub last_apdu_response: Option<Vec<u8>>,
}

fn undefined_reason() -> String {
    ES10B_ERROR_REASON_UNDEFINED.to_string()
}

/// `null` means the same as an absent reason.
fn deserialize_reason<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let reason = <Option<String> as serde::Deserialize>::deserialize(deserializer)?;
    Ok(reason.unwrap_or_else(undefined_reason))
}

impl DownloadFailure {
    /// A failure with no signal on any layer.
    pub fn undefined() -> Self {
        Self {
            lpa_error_reason: undefined_reason(),
            last_http_response: None,
            last_http_exception: None,
            last_apdu_response: None,
        }
    }

    pub fn has_specific_lpa_reason(&self) -> bool {
        self.lpa_error_reason != ES10B_ERROR_REASON_UNDEFINED
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpResponse {
    pub status_code: u16,
    /// Raw body. In JSON it may be given either as text or as a byte array.
    #[serde(deserialize_with = "deserialize_body")]
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub const OK: u16 = 200;

    pub fn is_ok(&self) -> bool {
        self.status_code == Self::OK
    }
}

struct BodyVisitor;

impl<'de> serde::de::Visitor<'de> for BodyVisitor {
    type Value = Vec<u8>;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("a string, a byte array or a byte buffer")
    }

    fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(v.as_bytes().to_vec())
    }

    fn visit_string<E: serde::de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(v.into_bytes())
    }

    fn visit_bytes<E: serde::de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
        Ok(v.to_vec())
    }

    fn visit_byte_buf<E: serde::de::Error>(self, v: Vec<u8>) -> Result<Self::Value, E> {
        Ok(v)
    }

    fn visit_seq<A: serde::de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut bytes = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(b) = seq.next_element::<u8>()? {
            bytes.push(b);
        }
        Ok(bytes)
    }
}

/// Accepts text, a JSON byte array, or a native byte buffer (a JS `Uint8Array`).
fn deserialize_body<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    deserializer.deserialize_any(BodyVisitor)
}

/// Kind of transport failure that ended an HTTP exchange before a response
/// was received.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TransportError {
    /// Certificate validation or TLS handshake failure.
    Tls { message: Option<String> },
    /// DNS resolution failure.
    UnknownHost { host: Option<String> },
    NoRouteToHost,
    PortUnreachable,
    Timeout,
    /// Any other socket-level failure. Only the message tells these apart.
    Socket { message: Option<String> },
    /// A failure outside the socket hierarchy (e.g. a protocol error).
    Other { message: Option<String> },
}

impl TransportError {
    /// Maps a standard I/O error onto the transport kinds the classifier knows.
    pub fn from_io(err: &std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::TimedOut => Self::Timeout,
            std::io::ErrorKind::HostUnreachable | std::io::ErrorKind::NetworkUnreachable => {
                Self::NoRouteToHost
            }
            _ => Self::Socket {
                message: Some(err.to_string()),
            },
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Tls { message } | Self::Socket { message } | Self::Other { message } => {
                message.as_deref()
            }
            Self::UnknownHost { host } => host.as_deref(),
            Self::NoRouteToHost | Self::PortUnreachable | Self::Timeout => None,
        }
    }
}

impl From<&std::io::Error> for TransportError {
    fn from(err: &std::io::Error) -> Self {
        Self::from_io(err)
    }
}
