use common::RedactedSecret;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Organizer,
    Participant,
}

/// The signed-in user as returned by `user/me` and `auth/login`.
///
/// This is a UI projection only; it never carries the session credential.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub profile_pic: Option<String>,
}

/// `GET user/me` wraps the user in a `user` field.
#[derive(Debug, Clone, Deserialize)]
pub struct MeResponse {
    pub user: User,
}

/// `POST auth/login` answers with a success flag and, on success, the user.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone)]
pub struct SignupPayload {
    pub full_name: String,
    pub email: String,
    pub password: RedactedSecret,
    pub role: Role,
}

impl SignupPayload {
    pub fn to_json(&self) -> Value {
        json!({
            "fullName": self.full_name,
            "email": self.email,
            "password": self.password.expose(),
            "role": self.role,
        })
    }
}

#[derive(Debug, Clone)]
pub struct LoginPayload {
    pub email: String,
    pub password: RedactedSecret,
}

impl LoginPayload {
    pub fn new(email: impl Into<String>, password: impl Into<RedactedSecret>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "email": self.email,
            "password": self.password.expose(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ForgotPasswordPayload {
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfoUpdate {
    pub full_name: String,
    pub phone: String,
}

#[derive(Debug, Clone)]
pub struct PasswordChange {
    pub old_password: RedactedSecret,
    pub new_password: RedactedSecret,
}

impl PasswordChange {
    pub fn to_json(&self) -> Value {
        json!({
            "oldPassword": self.old_password.expose(),
            "newPassword": self.new_password.expose(),
        })
    }
}
