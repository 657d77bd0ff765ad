use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    NotAuthenticated,
    NoWorkspace,
    NotFound,
    TaskNotFoundLocally,
    AmbiguousRef,
    ValidationError,
    NetworkError,
    ApiError,
    StorageError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotAuthenticated => "NOT_AUTHENTICATED",
            Self::NoWorkspace => "NO_WORKSPACE",
            Self::NotFound => "NOT_FOUND",
            Self::TaskNotFoundLocally => "TASK_NOT_FOUND_LOCALLY",
            Self::AmbiguousRef => "AMBIGUOUS_REF",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::NetworkError => "NETWORK_ERROR",
            Self::ApiError => "API_ERROR",
            Self::StorageError => "STORAGE_ERROR",
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TaskFlowError {
    pub code: ErrorCode,
    pub message: String,
}

impl TaskFlowError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn not_authenticated() -> Self {
        Self::new(
            ErrorCode::NotAuthenticated,
            "Not signed in. Run `taskflow login <email> <password>` first.",
        )
    }

    pub fn no_scope() -> Self {
        Self::new(ErrorCode::NotAuthenticated, "No workspace or user selected")
    }

    pub fn no_workspace() -> Self {
        Self::new(
            ErrorCode::NoWorkspace,
            "No workspace selected. Use `taskflow workspace switch <id>`.",
        )
    }

    pub fn not_found(what: &str) -> Self {
        Self::new(ErrorCode::NotFound, format!("Not found: {what}"))
    }

    pub fn task_not_found_locally(reference: &str) -> Self {
        Self::new(
            ErrorCode::TaskNotFoundLocally,
            format!("Task not found: {reference}"),
        )
    }

    pub fn ambiguous_ref(reference: &str, candidates: &[String]) -> Self {
        Self::new(
            ErrorCode::AmbiguousRef,
            format!(
                "Ambiguous reference '{}'. Candidates: {}",
                reference,
                candidates.join(", ")
            ),
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NetworkError, message)
    }

    pub fn api(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiError, message)
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageError, message)
    }
}

impl From<reqwest::Error> for TaskFlowError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::api(format!("Invalid response body: {e}"))
        } else {
            Self::network(e.to_string())
        }
    }
}

impl From<std::io::Error> for TaskFlowError {
    fn from(e: std::io::Error) -> Self {
        Self::storage(e.to_string())
    }
}
