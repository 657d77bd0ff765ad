pub mod analytics;
pub mod auth;
pub mod client;
pub mod tasks;
pub mod workspaces;

pub use client::ApiClient;
pub use tasks::{HttpTaskGateway, TaskGateway};
