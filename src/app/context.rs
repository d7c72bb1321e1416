use std::sync::Arc;

use crate::app::error::Result;
use crate::config::Config;
use crate::extractor::ProductExtractor;
use crate::fetcher::http::HttpTransport;
use crate::fetcher::Transport;

pub struct AppContext {
    pub config: Config,
    pub transport: Arc<dyn Transport>,
    pub extractor: ProductExtractor,
}

impl AppContext {
    pub fn new() -> Result<Self> {
        Ok(Self::with_config(Config::load()?))
    }

    pub fn with_config(config: Config) -> Self {
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(&config.extractor));
        let extractor = ProductExtractor::new(transport.clone(), config.extractor.clone());

        Self {
            config,
            transport,
            extractor,
        }
    }
}
