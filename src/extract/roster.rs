//! Candidate Model Roster
//!
//! Ordered model selection for the fallback loop. The roster starts
//! from the configured preference list (fast/lightweight models
//! first) and can optionally rebuild itself from the backend's
//! ListModels endpoint, filtered to models that support content
//! generation and sorted so that flash-class models are tried before
//! pro-class ones.

use tracing::{debug, warn};

use super::backend::VisionBackend;
use crate::config::ExtractionConfig;

/// Ordered candidate models for one extraction attempt
#[derive(Debug, Clone)]
pub struct ModelRoster {
    preferred: Vec<String>,
    discover: bool,
}

impl ModelRoster {
    pub fn new(preferred: Vec<String>, discover: bool) -> Self {
        Self { preferred, discover }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(config.models.clone(), config.discover_models)
    }

    /// Resolve the candidate list for this scan.
    ///
    /// With discovery enabled, a successful ListModels call replaces
    /// the static preference list; a failed or empty discovery falls
    /// back to it. Discovery failures never fail the scan.
    pub async fn candidates(&self, backend: &dyn VisionBackend) -> Vec<String> {
        if self.discover {
            match backend.list_models().await {
                Ok(models) => {
                    let mut names: Vec<String> = models
                        .iter()
                        .filter(|m| m.supports_generation())
                        .map(|m| m.name.clone())
                        .collect();

                    if names.is_empty() {
                        warn!(
                            backend = backend.name(),
                            "Discovery returned no generation-capable models, using preference list"
                        );
                    } else {
                        // Stable: equal-priority models keep the backend's order
                        names.sort_by_key(|name| model_priority(name));
                        debug!(candidates = ?names, "Using discovered model roster");
                        return names;
                    }
                }
                Err(e) => {
                    warn!(
                        backend = backend.name(),
                        error = %e,
                        "Model discovery failed, using preference list"
                    );
                }
            }
        }

        self.preferred.clone()
    }
}

/// Roster ordering: flash-class models before pro-class, everything
/// else last, input order preserved within a class
pub fn model_priority(name: &str) -> u8 {
    if name.contains("flash") {
        0
    } else if name.contains("pro") {
        1
    } else {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::backend::{InlineImage, ModelInfo, VisionBackend};
    use crate::types::{CuentasError, Result};
    use async_trait::async_trait;

    struct StubBackend {
        models: Result<Vec<ModelInfo>>,
    }

    #[async_trait]
    impl VisionBackend for StubBackend {
        async fn generate(
            &self,
            _model: &str,
            _prompt: &str,
            _image: &InlineImage,
        ) -> Result<String> {
            unreachable!("roster tests never generate")
        }

        async fn list_models(&self) -> Result<Vec<ModelInfo>> {
            match &self.models {
                Ok(models) => Ok(models.clone()),
                Err(_) => Err(CuentasError::backend_status("models", 500, "boom")),
            }
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    fn generation_model(name: &str) -> ModelInfo {
        ModelInfo {
            name: name.to_string(),
            methods: vec!["generateContent".to_string()],
        }
    }

    #[test]
    fn test_priority_ordering() {
        assert_eq!(model_priority("gemini-2.0-flash"), 0);
        assert_eq!(model_priority("gemini-1.5-pro"), 1);
        assert_eq!(model_priority("aqa"), 2);
    }

    #[tokio::test]
    async fn test_discovery_sorts_flash_before_pro() {
        let backend = StubBackend {
            models: Ok(vec![
                generation_model("gemini-1.5-pro"),
                generation_model("gemini-2.0-flash"),
                generation_model("gemini-1.5-flash"),
            ]),
        };
        let roster = ModelRoster::new(vec!["fallback-model".into()], true);

        let candidates = roster.candidates(&backend).await;
        assert_eq!(
            candidates,
            vec!["gemini-2.0-flash", "gemini-1.5-flash", "gemini-1.5-pro"]
        );
    }

    #[tokio::test]
    async fn test_discovery_filters_non_generation_models() {
        let backend = StubBackend {
            models: Ok(vec![
                ModelInfo {
                    name: "text-embedding-004".into(),
                    methods: vec!["embedContent".into()],
                },
                generation_model("gemini-2.0-flash"),
            ]),
        };
        let roster = ModelRoster::new(vec![], true);

        let candidates = roster.candidates(&backend).await;
        assert_eq!(candidates, vec!["gemini-2.0-flash"]);
    }

    #[tokio::test]
    async fn test_discovery_failure_falls_back_to_preferences() {
        let backend = StubBackend {
            models: Err(CuentasError::backend_status("models", 500, "boom")),
        };
        let roster = ModelRoster::new(vec!["gemini-2.0-flash".into()], true);

        let candidates = roster.candidates(&backend).await;
        assert_eq!(candidates, vec!["gemini-2.0-flash"]);
    }

    #[tokio::test]
    async fn test_discovery_disabled_uses_preferences() {
        let backend = StubBackend {
            models: Ok(vec![generation_model("gemini-9.9-ultra")]),
        };
        let roster = ModelRoster::new(vec!["a".into(), "b".into()], false);

        let candidates = roster.candidates(&backend).await;
        assert_eq!(candidates, vec!["a", "b"]);
    }
}
