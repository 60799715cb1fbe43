use crate::error::GatewayError;
use crate::gateway::{ApiRequest, FormPart, Gateway};

use common::RedactedSecret;
use models::{
    ApiMessage, ForgotPasswordPayload, LoginPayload, LoginResponse, MeResponse, PasswordChange,
    SignupPayload, Upload, User, UserInfoUpdate,
};

use std::sync::Arc;

use log::{debug, info};
use serde_json::{Value, json};

const SIGNUP_ENDPOINT: &str = "auth/signup";
const LOGIN_ENDPOINT: &str = "auth/login";
const LOGOUT_ENDPOINT: &str = "auth/logout";
const FORGOT_PASSWORD_ENDPOINT: &str = "auth/forgot-password";
const RESET_PASSWORD_ENDPOINT: &str = "auth/verify-reset";
const ME_ENDPOINT: &str = "user/me";
const PROFILE_PIC_ENDPOINT: &str = "user/update-profile-pic";
const USER_INFO_ENDPOINT: &str = "user/update-user-info";
const PASSWORD_ENDPOINT: &str = "user/update-password";

const PROFILE_PIC_FIELD: &str = "profilePic";

#[derive(Clone)]
pub struct AuthService {
    gateway: Arc<Gateway>,
}

impl AuthService {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    /// Register a new account. Exempt from session refresh.
    pub async fn signup(&self, payload: &SignupPayload) -> Result<Value, GatewayError> {
        debug!("Signing up {} as {:?}", payload.email, payload.role);
        let request = ApiRequest::post(SIGNUP_ENDPOINT)
            .with_json(payload.to_json())
            .skip_refresh();
        self.gateway.send_json(request).await
    }

    /// Sign in. A 401 here is a rejected credential and surfaces directly.
    ///
    /// A `success: false` body is returned as-is for the caller to display.
    pub async fn login(&self, payload: &LoginPayload) -> Result<LoginResponse, GatewayError> {
        let request = ApiRequest::post(LOGIN_ENDPOINT)
            .with_json(payload.to_json())
            .skip_refresh();
        let response: LoginResponse = self.gateway.send_json(request).await?;

        if response.success {
            info!("Signed in as {}", payload.email);
        }
        Ok(response)
    }

    pub async fn me(&self) -> Result<User, GatewayError> {
        let response: MeResponse = self.gateway.send_json(ApiRequest::get(ME_ENDPOINT)).await?;
        Ok(response.user)
    }

    pub async fn logout(&self) -> Result<ApiMessage, GatewayError> {
        let message = self
            .gateway
            .send_json(ApiRequest::get(LOGOUT_ENDPOINT))
            .await?;
        info!("Signed out");
        Ok(message)
    }

    pub async fn forgot_password(&self, email: &str) -> Result<ApiMessage, GatewayError> {
        let payload = ForgotPasswordPayload {
            email: email.to_string(),
        };
        let request = ApiRequest::post(FORGOT_PASSWORD_ENDPOINT).with_json(serde_json::to_value(payload)?);
        self.gateway.send_json(request).await
    }

    pub async fn reset_password(
        &self,
        token: &RedactedSecret,
        new_password: &RedactedSecret,
    ) -> Result<ApiMessage, GatewayError> {
        let request = ApiRequest::post(RESET_PASSWORD_ENDPOINT)
            .with_query("token", token.expose())
            .with_json(json!({ "newPassword": new_password.expose() }));
        self.gateway.send_json(request).await
    }

    pub async fn update_profile_pic(&self, picture: Upload) -> Result<Value, GatewayError> {
        let request = ApiRequest::put(PROFILE_PIC_ENDPOINT)
            .with_multipart(vec![FormPart::file(PROFILE_PIC_FIELD, picture)]);
        self.gateway.send_json(request).await
    }

    pub async fn update_user_info(&self, update: &UserInfoUpdate) -> Result<Value, GatewayError> {
        let request = ApiRequest::put(USER_INFO_ENDPOINT).with_json(serde_json::to_value(update)?);
        self.gateway.send_json(request).await
    }

    pub async fn update_password(&self, change: &PasswordChange) -> Result<ApiMessage, GatewayError> {
        let request = ApiRequest::put(PASSWORD_ENDPOINT).with_json(change.to_json());
        self.gateway.send_json(request).await
    }
}
