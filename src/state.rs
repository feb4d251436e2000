use std::sync::Arc;

use crate::config::Config;
use crate::service::CaptionService;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Captioning pipeline holding the pooled HTTP clients
    pub service: Arc<CaptionService>,
}

impl AppState {
    pub fn new(config: Config) -> eyre::Result<Self> {
        let service = CaptionService::new(&config)?;
        Ok(Self {
            config: Arc::new(config),
            service: Arc::new(service),
        })
    }
}
