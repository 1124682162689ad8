use serde::{Deserialize, Serialize};
use serde_json::Value;
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub token: Option<Token>,
}

/// Body of a successful `/api/token` response. A refresh may omit the
/// refresh token, in which case the previous one stays valid.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

/// Position to continue a paginated read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cursor {
    Offset(u32),
    After(String),
    Before(String),
}

/// One page of upstream items plus the cursor of the following page.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub items: Vec<Value>,
    pub next: Option<Cursor>,
    pub total: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    pub dataset: String,
    pub error: String,
}

impl ErrorEntry {
    pub fn new(dataset: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self {
            dataset: dataset.into(),
            error: error.to_string(),
        }
    }
}

#[derive(Tabled)]
pub struct DatasetTableRow {
    pub dataset: String,
    pub rows: String,
    pub status: String,
}
