//! Resume analysis: model selection, prompt composition, a single generation
//! call, and classification of whatever goes wrong.
//!
//! All remote calls go through `gemini::GenerativeApi`.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::gemini::GenerativeApi;

pub mod failure;
pub mod handlers;
pub mod model_selector;
pub mod prompts;

use crate::analysis::failure::{classify_failure, remediation, FailureCategory};
use crate::analysis::model_selector::select_supported_model;
use crate::analysis::prompts::build_review_prompt;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Input validation: nothing to analyze. No remote call is made.
    #[error("Resume text is required for analysis.")]
    EmptyResume,

    /// Configuration: neither discovery nor the preferred list produced a model.
    #[error(
        "No suitable model found. Please check your API key and ensure you have access to \
         Gemini models. Available models can be listed at https://ai.google.dev/models"
    )]
    NoModel,

    /// The generation call failed; `diagnostic` is the rendered remediation text.
    #[error("{diagnostic}")]
    Upstream {
        category: FailureCategory,
        model: String,
        diagnostic: String,
    },
}

pub struct Analyzer {
    api: Arc<dyn GenerativeApi>,
    preferred_models: Vec<String>,
}

impl Analyzer {
    pub fn new(api: Arc<dyn GenerativeApi>, preferred_models: Vec<String>) -> Self {
        Self {
            api,
            preferred_models,
        }
    }

    pub fn api(&self) -> &dyn GenerativeApi {
        self.api.as_ref()
    }

    /// Reviews `resume_text`, optionally against `job_description`, and returns
    /// the model's trimmed answer.
    pub async fn analyze_resume(
        &self,
        resume_text: &str,
        job_description: Option<&str>,
    ) -> Result<String, AnalysisError> {
        if resume_text.is_empty() {
            return Err(AnalysisError::EmptyResume);
        }

        let model = select_supported_model(self.api.as_ref(), &self.preferred_models)
            .await
            .ok_or(AnalysisError::NoModel)?;

        let prompt = build_review_prompt(resume_text, job_description);
        info!(
            "Requesting analysis from {model} ({} resume chars, job description: {})",
            resume_text.len(),
            job_description.is_some_and(|jd| !jd.trim().is_empty())
        );

        let generation = self
            .api
            .generate_content(&model, &prompt)
            .await
            .map_err(|e| {
                let message = e.to_string();
                let category = classify_failure(&message);
                warn!("Generation with {model} failed ({category:?}): {message}");
                AnalysisError::Upstream {
                    category,
                    diagnostic: remediation(category, &message),
                    model: model.clone(),
                }
            })?;

        let analysis = match generation.text() {
            Some(text) => text.trim().to_string(),
            None => generation.raw.to_string().trim().to_string(),
        };
        Ok(analysis)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use crate::gemini::{GeminiError, Generation, GenerativeApi, ModelRecord};

    /// Scripted `GenerativeApi` that records every call.
    pub struct MockApi {
        pub listing: Result<Vec<ModelRecord>, String>,
        pub reply: Result<String, (u16, String)>,
        pub list_calls: AtomicUsize,
        pub generate_calls: AtomicUsize,
        pub prompts: Mutex<Vec<(String, String)>>,
    }

    impl MockApi {
        pub fn replying(text: &str) -> Self {
            Self {
                listing: Ok(vec![ModelRecord::new(
                    "models/gemini-2.5-flash",
                    &["generateContent", "countTokens"],
                )]),
                reply: Ok(text.to_string()),
                list_calls: AtomicUsize::new(0),
                generate_calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(status: u16, message: &str) -> Self {
            Self {
                reply: Err((status, message.to_string())),
                ..Self::replying("")
            }
        }

        pub fn remote_calls(&self) -> usize {
            self.list_calls.load(Ordering::SeqCst) + self.generate_calls.load(Ordering::SeqCst)
        }

        pub fn last_prompt(&self) -> Option<(String, String)> {
            self.prompts.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl GenerativeApi for MockApi {
        async fn list_models(&self) -> Result<Vec<ModelRecord>, GeminiError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            self.listing.clone().map_err(|message| GeminiError::Api {
                status: 500,
                message,
            })
        }

        async fn generate_content(
            &self,
            model: &str,
            prompt: &str,
        ) -> Result<Generation, GeminiError> {
            self.generate_calls.fetch_add(1, Ordering::SeqCst);
            self.prompts
                .lock()
                .unwrap()
                .push((model.to_string(), prompt.to_string()));
            match &self.reply {
                Ok(text) => Ok(Generation::from_raw(json!({
                    "candidates": [{"content": {"parts": [{"text": text}], "role": "model"}}]
                }))),
                Err((status, message)) => Err(GeminiError::Api {
                    status: *status,
                    message: message.clone(),
                }),
            }
        }
    }
}
