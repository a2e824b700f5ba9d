use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::service::{ControlAction, StateView, TimeControl};

#[derive(Debug, Deserialize)]
pub struct CreateGameRequest {
    #[serde(default = "CreateGameRequest::default_variant")]
    pub variant: String,
    #[serde(default)]
    pub time: Option<TimeControl>,
    /// Accepted for forward compatibility; seats always start empty.
    #[serde(default)]
    pub seats: Option<Value>,
}

impl CreateGameRequest {
    fn default_variant() -> String {
        "standard".into()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResponse {
    pub game_id: String,
    pub version: u64,
    pub state: StateView,
}

#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    #[serde(default)]
    pub seat: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JoinResponse {
    pub seat: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
pub struct ControlRequest {
    pub action: ControlAction,
}

#[derive(Debug, Deserialize)]
pub struct SquareQuery {
    pub row: i64,
    pub col: i64,
}

#[derive(Debug, Deserialize)]
pub struct SinceQuery {
    pub since: i64,
}
