use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info};

use st_core::config::AdvisorConfig;
use st_core::types::{AiStrategy, Ticket};

use crate::prompt::{build_prompt, parse_strategy};
use crate::provider::{AdvisorError, GeminiProvider, StrategyProvider};

/// Result of one advisor consultation.
///
/// `strategy` is always usable; `error` is set when it is the fallback.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Advice {
    pub strategy: AiStrategy,
    pub error: Option<String>,
}

impl Advice {
    pub fn is_fallback(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Clone)]
enum Backend {
    Provider(Arc<dyn StrategyProvider>),
    Offline(String),
}

/// Asks a [`StrategyProvider`] for a race briefing and never fails: any
/// transport, API or parse error is logged and replaced by
/// [`AiStrategy::fallback`]. No retries; the caller decides when to ask
/// again.
#[derive(Clone)]
pub struct StrategyAdvisor {
    backend: Backend,
}

impl StrategyAdvisor {
    pub fn new(provider: Arc<dyn StrategyProvider>) -> Self {
        Self {
            backend: Backend::Provider(provider),
        }
    }

    /// An advisor that always answers with the fallback, without any call.
    pub fn offline(reason: impl Into<String>) -> Self {
        Self {
            backend: Backend::Offline(reason.into()),
        }
    }

    /// Gemini-backed advisor from config, or an offline one when the
    /// advisor is disabled or has no credential.
    pub fn from_config(cfg: &AdvisorConfig) -> Self {
        if !cfg.enabled {
            return Self::offline("disabled in config");
        }
        match GeminiProvider::from_config(cfg) {
            Ok(provider) => {
                info!(model = %cfg.model, "strategy advisor online");
                Self::new(Arc::new(provider))
            }
            Err(e) => {
                info!(reason = %e, "strategy advisor offline");
                Self::offline(e.to_string())
            }
        }
    }

    pub fn is_offline(&self) -> bool {
        matches!(self.backend, Backend::Offline(_))
    }

    /// Consult the provider; the outcome carries the failure reason, if any.
    pub async fn advise(&self, tickets: &[Ticket]) -> Advice {
        match self.try_advise(tickets).await {
            Ok(strategy) => {
                debug!(priority = %strategy.priority_level, "strategy received");
                Advice {
                    strategy,
                    error: None,
                }
            }
            Err(e) => {
                error!(error = %e, "race strategy analysis failed");
                Advice {
                    strategy: AiStrategy::fallback(),
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// The strategy alone; the fallback on any failure.
    pub async fn get_strategy(&self, tickets: &[Ticket]) -> AiStrategy {
        self.advise(tickets).await.strategy
    }

    async fn try_advise(&self, tickets: &[Ticket]) -> Result<AiStrategy, AdvisorError> {
        let provider = match &self.backend {
            Backend::Provider(p) => p,
            Backend::Offline(reason) => {
                return Err(AdvisorError::Offline(reason.clone()));
            }
        };
        let prompt = build_prompt(tickets)?;
        debug!(provider = provider.name(), tickets = tickets.len(), "requesting strategy");
        let text = provider.generate(&prompt).await?;
        parse_strategy(&text)
    }
}
