use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{ErrorCode, TaskFlowError};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Shared HTTP client for the TaskFlow backend.
///
/// Attaches the bearer token to every request and normalizes HTTP and
/// transport failures into the crate error taxonomy.
pub struct ApiClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: Url, token: Option<String>) -> Self {
        Self {
            http: Client::new(),
            base_url,
            token,
        }
    }

    /// Base URL from `TASKFLOW_API_URL`, falling back to the local backend.
    pub fn base_url_from_env() -> Result<Url, TaskFlowError> {
        let raw = std::env::var("TASKFLOW_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());
        Url::parse(&raw)
            .map_err(|e| TaskFlowError::validation(format!("Invalid TASKFLOW_API_URL '{raw}': {e}")))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, TaskFlowError> {
        self.request_json(Method::GET, path, None::<&()>).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, TaskFlowError> {
        self.request_json(Method::POST, path, Some(body)).await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, TaskFlowError> {
        self.request_json(Method::PUT, path, Some(body)).await
    }

    pub async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, TaskFlowError> {
        self.request_json(Method::PATCH, path, body).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), TaskFlowError> {
        let res = self.send(Method::DELETE, path, None::<&()>).await?;
        Self::check_status(res).await?;
        Ok(())
    }

    async fn request_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, TaskFlowError> {
        let res = self.send(method, path, body).await?;
        let res = Self::check_status(res).await?;
        res.json::<T>().await.map_err(TaskFlowError::from)
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, TaskFlowError> {
        let url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| TaskFlowError::validation(format!("Invalid request path '{path}': {e}")))?;

        debug!(%method, %url, "api request");

        let mut req = self.http.request(method, url);
        if let Some(ref token) = self.token {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        req.send().await.map_err(TaskFlowError::from)
    }

    async fn check_status(res: reqwest::Response) -> Result<reqwest::Response, TaskFlowError> {
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }

        let detail = Self::error_detail(res).await;
        debug!(%status, detail, "api error response");

        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                TaskFlowError::new(ErrorCode::NotAuthenticated, detail)
            }
            StatusCode::NOT_FOUND => TaskFlowError::new(ErrorCode::NotFound, detail),
            s if s.is_client_error() => TaskFlowError::validation(detail),
            _ => TaskFlowError::api(format!("Server error ({}): {detail}", status.as_u16())),
        })
    }

    /// Pull the human-readable message out of a FastAPI-style `{"detail": …}` body.
    async fn error_detail(res: reqwest::Response) -> String {
        let status = res.status();
        let fallback = || format!("Request failed with status {}", status.as_u16());
        let Ok(text) = res.text().await else {
            return fallback();
        };
        match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(v) => match &v["detail"] {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Null => fallback(),
                other => other.to_string(),
            },
            Err(_) if !text.is_empty() => text,
            Err(_) => fallback(),
        }
    }
}
