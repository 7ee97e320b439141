use crate::cache::EnergyCache;
use crate::client::EnergyClient;
use crate::config::Config;
use crate::submission::SubmissionFlow;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub cache: EnergyCache,
    pub submissions: Arc<SubmissionFlow>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, reqwest::Error> {
        let client = EnergyClient::new(&config)?;
        let cache = EnergyCache::new(client.clone());
        let submissions = SubmissionFlow::new(client, cache.clone());

        Ok(Self {
            config: Arc::new(config),
            cache,
            submissions,
        })
    }
}
