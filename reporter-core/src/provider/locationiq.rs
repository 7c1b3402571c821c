use async_trait::async_trait;
use reqwest::Client;

use crate::{
    error::{Resource, Result},
    model::GeoCode,
};

use super::{PlaceSearch, endpoint, get_json, http_client};

const SUGGESTION_LIMIT: &str = "5";

/// LocationIQ autocomplete.
#[derive(Debug, Clone)]
pub struct LocationIqClient {
    api_url: String,
    api_key: String,
    http: Client,
}

impl LocationIqClient {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
            http: http_client(),
        }
    }
}

#[async_trait]
impl PlaceSearch for LocationIqClient {
    async fn autocomplete(&self, query: &str) -> Result<Vec<GeoCode>> {
        let url = endpoint(&self.api_url, "autocomplete");

        get_json(
            &self.http,
            &url,
            &[
                ("key", self.api_key.as_str()),
                ("q", query),
                ("limit", SUGGESTION_LIMIT),
                ("dedupe", "1"),
            ],
            Resource::LocationSuggestions,
        )
        .await
    }
}
