//! Thin proxy to the Google Books volumes API

use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    config::GoogleBooksConfig,
    error::{AppError, AppResult},
};

/// Search request forwarded to the volumes API
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GoogleBooksRequest {
    pub q: Option<String>,
    pub category: Option<String>,
    pub max_results: Option<u32>,
}

#[derive(Clone)]
pub struct GoogleBooksService {
    client: reqwest::Client,
    config: GoogleBooksConfig,
}

impl GoogleBooksService {
    pub fn new(config: GoogleBooksConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Forward a search to the volumes API and pass the JSON body through.
    /// Upstream failures are translated, never exposed raw.
    pub async fn search(&self, request: &GoogleBooksRequest) -> AppResult<serde_json::Value> {
        let q = request
            .q
            .as_deref()
            .filter(|q| !q.is_empty())
            .ok_or_else(|| {
                AppError::BadRequest("Missing 'q' (search) query parameter.".to_string())
            })?;

        let mut query = urlencoding::encode(q).into_owned();
        if let Some(category) = request.category.as_deref() {
            if !category.is_empty() && category != "All" {
                query.push_str("+subject:");
                query.push_str(&urlencoding::encode(category));
            }
        }

        let max_results = request
            .max_results
            .unwrap_or(self.config.default_max_results);
        let url = format!(
            "{}?q={}&key={}&maxResults={}",
            self.config.base_url, query, self.config.api_key, max_results
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Google Books API fetch error: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "Google Books API error: {}",
                response.status()
            )));
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Google Books API returned invalid JSON: {}", e)))
    }
}
