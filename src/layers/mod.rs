pub mod apdu;
pub mod http;
pub mod lpa;
pub mod transport;

use serde::Serialize;

/// Protocol layer a download failure can be explained at.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::AsRefStr,
    strum_macros::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    LpaReason,
    HttpStatus,
    Transport,
    Apdu,
}

/// Order in which layers are consulted. The first applicable layer decides
/// the outcome on its own, even when it yields no classification.
pub const PRECEDENCE: [Layer; 4] = [
    Layer::LpaReason,
    Layer::HttpStatus,
    Layer::Transport,
    Layer::Apdu,
];
