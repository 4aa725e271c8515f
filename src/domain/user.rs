use serde::{Deserialize, Serialize};

/// Signed-in user as reported by the auth endpoint.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrentUser {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Envelope of `GET /api/auth/me`.
#[derive(Clone, Debug, Deserialize)]
pub struct CurrentUserResponse {
    pub user: CurrentUser,
}
