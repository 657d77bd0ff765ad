use serde::Serialize;

use crate::api::client::ApiClient;
use crate::error::TaskFlowError;
use crate::models::{TokenResponse, User};

#[derive(Debug, Serialize)]
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SignUpInput {
    pub email: String,
    pub password: String,
}

pub async fn sign_in(client: &ApiClient, input: &SignInInput) -> Result<TokenResponse, TaskFlowError> {
    client.post("/api/auth/signin", input).await
}

pub async fn sign_up(client: &ApiClient, input: &SignUpInput) -> Result<User, TaskFlowError> {
    client.post("/api/auth/signup", input).await
}

pub async fn me(client: &ApiClient) -> Result<User, TaskFlowError> {
    client.get("/api/auth/me").await
}
