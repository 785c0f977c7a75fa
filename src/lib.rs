pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod prompt;

use std::sync::Arc;
use config::Config;
use llm::StudyProvider;

/// Read-only configuration and provider handle, built once in `main`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub provider: Arc<dyn StudyProvider>,
}
