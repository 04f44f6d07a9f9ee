use wasm_bindgen::prelude::*;

use crate::classification::{Classifier, Diagnosis, ErrorCode};
use crate::layers::http::HTTP_STATUS_CODES;
use crate::layers::lpa::LPA_REASON_CODES;
use crate::types::DownloadFailure;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = JSON)]
    fn parse(s: &str) -> JsValue;
}

fn to_js(value: &serde_json::Value) -> JsValue {
    match serde_json::to_string(value) {
        Ok(json_str) => parse(&json_str),
        Err(_) => JsValue::NULL,
    }
}

fn code_json(code: ErrorCode) -> serde_json::Value {
    serde_json::json!({
        "code": code.as_ref(),
        "titleKey": code.title_key(),
        "suggestKey": code.suggest_key(),
    })
}

fn diagnosis_json(diagnosis: &Diagnosis) -> serde_json::Value {
    serde_json::json!({
        "layer": diagnosis.layer.map(|l| l.to_string()),
        "classification": diagnosis.code.map(code_json),
    })
}

/// Classify a download failure given as a JSON string.
#[wasm_bindgen]
pub fn classify_json(json: &str) -> JsValue {
    match serde_json::from_str::<DownloadFailure>(json) {
        Ok(failure) => to_js(&diagnosis_json(&Classifier::diagnose(&failure))),
        Err(e) => error_result(&format!("Invalid download failure: {e}")),
    }
}

/// Classify a download failure given as a plain JS object.
#[wasm_bindgen]
pub fn classify_value(value: JsValue) -> JsValue {
    match serde_wasm_bindgen::from_value::<DownloadFailure>(value) {
        Ok(failure) => to_js(&diagnosis_json(&Classifier::diagnose(&failure))),
        Err(e) => error_result(&format!("Invalid download failure: {e}")),
    }
}

/// Every classification with its message keys.
#[wasm_bindgen]
pub fn get_error_codes() -> JsValue {
    use strum::IntoEnumIterator;

    let codes: Vec<serde_json::Value> = ErrorCode::iter().map(code_json).collect();
    to_js(&serde_json::Value::Array(codes))
}

/// The subject/reason code table and the LPA reason table.
#[wasm_bindgen]
pub fn get_http_status_table() -> JsValue {
    let http: Vec<serde_json::Value> = HTTP_STATUS_CODES
        .iter()
        .map(|((subject, reason), code)| {
            serde_json::json!({
                "subjectCode": subject,
                "reasonCode": reason,
                "code": code.as_ref(),
            })
        })
        .collect();
    let lpa: serde_json::Map<String, serde_json::Value> = LPA_REASON_CODES
        .iter()
        .map(|(token, code)| {
            (
                (*token).to_string(),
                serde_json::Value::String(code.as_ref().to_string()),
            )
        })
        .collect();
    to_js(&serde_json::json!({
        "statusCodes": http,
        "lpaReasons": lpa,
    }))
}

fn error_result(msg: &str) -> JsValue {
    let obj = serde_json::json!({"error": msg});
    to_js(&obj)
}
