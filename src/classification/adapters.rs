use crate::classification::ErrorCode;
use crate::layers::{self, Layer};
use crate::types::DownloadFailure;

/// One step of the classification chain.
///
/// `applies` decides whether the layer has a signal for this failure at all;
/// once it returns `true`, the outcome of `classify` is final.
pub trait LayerClassifier: Sync {
    fn layer(&self) -> Layer;

    fn applies(&self, failure: &DownloadFailure) -> bool;

    fn classify(&self, failure: &DownloadFailure) -> Option<ErrorCode>;
}

pub struct LpaReasonClassifier;
pub struct HttpStatusClassifier;
pub struct TransportClassifier;
pub struct ApduClassifier;

impl LayerClassifier for LpaReasonClassifier {
    fn layer(&self) -> Layer {
        Layer::LpaReason
    }

    fn applies(&self, failure: &DownloadFailure) -> bool {
        failure.has_specific_lpa_reason()
    }

    fn classify(&self, failure: &DownloadFailure) -> Option<ErrorCode> {
        let code = layers::lpa::classify_reason(&failure.lpa_error_reason);
        if code.is_none() {
            tracing::debug!(
                reason = %failure.lpa_error_reason,
                "LPA error reason has no classification"
            );
        }
        code
    }
}

impl LayerClassifier for HttpStatusClassifier {
    fn layer(&self) -> Layer {
        Layer::HttpStatus
    }

    fn applies(&self, failure: &DownloadFailure) -> bool {
        failure
            .last_http_response
            .as_ref()
            .is_some_and(|r| r.is_ok())
    }

    fn classify(&self, failure: &DownloadFailure) -> Option<ErrorCode> {
        layers::http::classify_response(failure.last_http_response.as_ref()?)
    }
}

impl LayerClassifier for TransportClassifier {
    fn layer(&self) -> Layer {
        Layer::Transport
    }

    fn applies(&self, failure: &DownloadFailure) -> bool {
        failure.last_http_exception.is_some()
    }

    fn classify(&self, failure: &DownloadFailure) -> Option<ErrorCode> {
        layers::transport::classify_exception(failure.last_http_exception.as_ref()?)
    }
}

impl LayerClassifier for ApduClassifier {
    fn layer(&self) -> Layer {
        Layer::Apdu
    }

    fn applies(&self, failure: &DownloadFailure) -> bool {
        failure.last_apdu_response.is_some()
    }

    fn classify(&self, failure: &DownloadFailure) -> Option<ErrorCode> {
        layers::apdu::classify_response(failure.last_apdu_response.as_deref()?)
    }
}

pub fn adapter_for(layer: Layer) -> &'static dyn LayerClassifier {
    match layer {
        Layer::LpaReason => &LpaReasonClassifier,
        Layer::HttpStatus => &HttpStatusClassifier,
        Layer::Transport => &TransportClassifier,
        Layer::Apdu => &ApduClassifier,
    }
}
