//! Model Selector — picks a model that can generate content.
//!
//! Discovery via the listing endpoint is preferred because the catalog changes
//! over time. If listing fails, the first preferred name is returned unverified;
//! a bad name surfaces when the model is actually called.

use tracing::{debug, warn};

use crate::gemini::GenerativeApi;

/// Fallback model names, most preferred first.
pub const PREFERRED_MODELS: &[&str] = &[
    "gemini-2.5-pro",
    "gemini-pro",
    "gemini-2.5-flash",
    "gemini-1.5",
    "gemini-1.5-flash",
];

/// Returns the first listed model (in listing order) with a non-empty name and
/// a capability containing "generate", else the first entry of `preferred`.
pub async fn select_supported_model(
    api: &dyn GenerativeApi,
    preferred: &[String],
) -> Option<String> {
    match api.list_models().await {
        Ok(records) => {
            if let Some(record) = records
                .iter()
                .find(|r| !r.name.is_empty() && r.supports_generation())
            {
                debug!("Selected model {} from listing", record.name);
                return Some(record.name.clone());
            }
            warn!(
                "Model listing returned {} entries, none supporting generation",
                records.len()
            );
        }
        Err(e) => warn!("Model listing failed, using preferred list: {e}"),
    }

    preferred.first().cloned()
}

pub fn default_preferred_models() -> Vec<String> {
    PREFERRED_MODELS.iter().map(|m| m.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::{GeminiError, Generation, ModelRecord};
    use async_trait::async_trait;

    struct ListingOnly(Result<Vec<ModelRecord>, u16>);

    #[async_trait]
    impl GenerativeApi for ListingOnly {
        async fn list_models(&self) -> Result<Vec<ModelRecord>, GeminiError> {
            self.0.clone().map_err(|status| GeminiError::Api {
                status,
                message: "listing unavailable".into(),
            })
        }

        async fn generate_content(&self, _: &str, _: &str) -> Result<Generation, GeminiError> {
            unreachable!("selector never generates")
        }
    }

    #[tokio::test]
    async fn test_selects_entry_with_generate_capability() {
        let api = ListingOnly(Ok(vec![
            ModelRecord::new("models/embedding-001", &["embedContent"]),
            ModelRecord::new("models/gemini-2.5-flash", &["countTokens", "Generate Content"]),
        ]));
        let model = select_supported_model(&api, &default_preferred_models()).await;
        assert_eq!(model.as_deref(), Some("models/gemini-2.5-flash"));
    }

    #[tokio::test]
    async fn test_first_match_wins() {
        let api = ListingOnly(Ok(vec![
            ModelRecord::new("models/a", &["generateContent"]),
            ModelRecord::new("models/b", &["generateContent"]),
        ]));
        let model = select_supported_model(&api, &default_preferred_models()).await;
        assert_eq!(model.as_deref(), Some("models/a"));
    }

    #[tokio::test]
    async fn test_skips_nameless_entries() {
        let api = ListingOnly(Ok(vec![
            ModelRecord::new("", &["generateContent"]),
            ModelRecord::new("models/named", &["generateContent"]),
        ]));
        let model = select_supported_model(&api, &default_preferred_models()).await;
        assert_eq!(model.as_deref(), Some("models/named"));
    }

    #[tokio::test]
    async fn test_listing_error_falls_back_to_first_preferred() {
        let api = ListingOnly(Err(403));
        let model = select_supported_model(&api, &default_preferred_models()).await;
        assert_eq!(model.as_deref(), Some("gemini-2.5-pro"));
    }

    #[tokio::test]
    async fn test_no_generating_model_falls_back() {
        let api = ListingOnly(Ok(vec![ModelRecord::new("models/embed", &["embedContent"])]));
        let model = select_supported_model(&api, &["custom-model".to_string()]).await;
        assert_eq!(model.as_deref(), Some("custom-model"));
    }

    #[tokio::test]
    async fn test_empty_preferred_list_yields_none() {
        let api = ListingOnly(Err(500));
        assert!(select_supported_model(&api, &[]).await.is_none());
    }
}
