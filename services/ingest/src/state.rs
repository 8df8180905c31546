use std::sync::Arc;

use ecolingua_core::Config;
use ecolingua_stream::Pipeline;

pub struct AppState {
    pub config: Config,
    pub pipeline: Arc<Pipeline>,
}

impl AppState {
    pub fn new(config: Config, pipeline: Arc<Pipeline>) -> Self {
        AppState { config, pipeline }
    }
}
