use serde::Deserialize;

/// Either shape the server answers with: `{success, message}` or `{error}`.
#[derive(Deserialize, Default)]
pub struct Reply {
    #[serde(default)]
    pub success: bool,

    pub message: Option<String>,

    pub error: Option<String>,
}
