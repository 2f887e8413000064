use serde::{Deserialize, Serialize};

/// Spark `auth/sessions` request
#[derive(Debug, Clone, Serialize)]
pub struct SessionLoginRequest<'a> {
    pub email: &'a str,
    pub locale: &'a str,
    pub password: &'a str,
}

/// Spark `auth/sessions` response
#[derive(Debug, Clone, Deserialize)]
pub struct SessionLoginResponse {
    pub token: String,
}

/// Value of one entry in the `user/accounts` response, keyed by account id
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountEntry {
    pub display_name: String,
}

/// Game account bound to the logged-in platform user
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GameAccount {
    pub id: String,
    pub display_name: String,
}

/// Spark `auth/thin/codes` request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThinCodeRequest<'a> {
    pub platform_game_account_id: &'a str,
    pub gsid: String,
}

/// Spark `auth/thin/codes` response
#[derive(Debug, Clone, Deserialize)]
pub struct ThinCodeResponse {
    pub code: String,
}

/// Start-time event posted to the events host before login.
///
/// Field order matches what the official client emits.
#[derive(Debug, Clone, Serialize)]
pub struct StartTimeEvent {
    pub client_installation_id: String,
    pub client_locale: &'static str,
    pub client_session_id: String,
    pub client_version_info: ClientVersionInfo,
    pub id: u32,
    pub localtime: String,
    pub start_count: u32,
    pub start_time: u32,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientVersionInfo {
    pub branch: &'static str,
    pub commit_id: &'static str,
    pub version: String,
}
