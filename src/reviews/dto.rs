use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub rating: i64,
    pub comment: String,
}

#[derive(Debug, Deserialize)]
pub struct ReplyRequest {
    pub comment: String,
}
