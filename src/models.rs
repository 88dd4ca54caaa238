use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub struct SessionOpened {
    pub session_id: String,
    pub message: String,
    pub timestamp: String,
}

#[derive(Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Serialize)]
pub struct ChatReply {
    pub reply: String,
    pub timestamp: String,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}
