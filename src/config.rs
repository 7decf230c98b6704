use serde::Deserialize;

/// Application configuration, supplied by the embedding harness and passed
/// into the operations that need it. There is no package-level state.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    tally_service: String,
    tally_channel: String,
    results_page_size: u32,
}

impl Config {
    /// Name of the cooperating tally service.
    pub fn tally_service(&self) -> &str {
        &self.tally_service
    }

    /// Channel the tally service is reachable on.
    pub fn tally_channel(&self) -> &str {
        &self.tally_channel
    }

    /// Page size used when draining vote pages during a count.
    pub fn results_page_size(&self) -> u32 {
        self.results_page_size
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tally_service: "tally".to_string(),
            tally_channel: "votingchannel".to_string(),
            results_page_size: 100,
        }
    }
}
