//! Prompt composition: rendered structure + document text → provider prompt.
//!
//! [`PromptComposer`] owns the (immutable, shared) [`TemplateRegistry`] and
//! the [`ProviderPolicy`] it was configured with. It is cheap to clone and
//! holds no mutable state, so one instance serves every request.
//!
//! Two flavours of the same operation exist:
//!
//! * [`PromptComposer::try_compose`] returns `Result<String, PromptError>`
//!   for callers that want to map failures themselves (the HTTP gateway
//!   turns a strict-mode unknown provider into a 400).
//! * [`PromptComposer::compose`] never fails: any error becomes
//!   `"Prompt composition error: <message>"` in place of the prompt.

use crate::config::{EnhancementLevel, ProviderPolicy};
use crate::error::PromptError;
use crate::pipeline::render::{render_structure, render_structure_value};
use crate::pipeline::template::TemplateRegistry;
use crate::semantic::SemanticMap;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Prefix of the diagnostic returned by [`PromptComposer::compose`] on failure.
pub const COMPOSE_ERROR_PREFIX: &str = "Prompt composition error: ";

/// Merges a rendered semantic map and document text into a provider template.
#[derive(Debug, Clone)]
pub struct PromptComposer {
    registry: Arc<TemplateRegistry>,
    policy: ProviderPolicy,
}

impl Default for PromptComposer {
    fn default() -> Self {
        Self::new(TemplateRegistry::builtin())
    }
}

impl PromptComposer {
    /// A lenient composer over `registry`.
    pub fn new(registry: TemplateRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            policy: ProviderPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ProviderPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    pub fn policy(&self) -> ProviderPolicy {
        self.policy
    }

    /// Compose a prompt, reporting failures as a typed error.
    ///
    /// `level` is accepted for forward compatibility; `Basic` and `Full`
    /// currently yield identical output.
    ///
    /// # Errors
    /// [`PromptError::UnknownProvider`] when `provider` is not registered and
    /// the policy is [`ProviderPolicy::Strict`].
    pub fn try_compose(
        &self,
        semantic_map: &SemanticMap,
        document_text: &str,
        provider: &str,
        level: EnhancementLevel,
    ) -> Result<String, PromptError> {
        let structure = render_structure(semantic_map);
        self.fill(&structure, document_text, provider, level)
    }

    /// Compose a prompt; never fails.
    pub fn compose(
        &self,
        semantic_map: &SemanticMap,
        document_text: &str,
        provider: &str,
        level: EnhancementLevel,
    ) -> String {
        self.try_compose(semantic_map, document_text, provider, level)
            .unwrap_or_else(diagnostic)
    }

    /// Compose from an untyped JSON semantic map; never fails.
    ///
    /// A map that cannot be read still yields a prompt, with the
    /// `"Structure parsing error: …"` diagnostic in the structure slot.
    pub fn compose_value(
        &self,
        semantic_map: &Value,
        document_text: &str,
        provider: &str,
        level: EnhancementLevel,
    ) -> String {
        self.try_compose_value(semantic_map, document_text, provider, level)
            .unwrap_or_else(diagnostic)
    }

    /// Typed-error variant of [`PromptComposer::compose_value`].
    pub fn try_compose_value(
        &self,
        semantic_map: &Value,
        document_text: &str,
        provider: &str,
        level: EnhancementLevel,
    ) -> Result<String, PromptError> {
        let structure = render_structure_value(semantic_map);
        self.fill(&structure, document_text, provider, level)
    }

    fn fill(
        &self,
        structure: &str,
        document_text: &str,
        provider: &str,
        level: EnhancementLevel,
    ) -> Result<String, PromptError> {
        let (resolved, template) = self.registry.resolve(provider, self.policy)?;
        let prompt = template.fill(structure, document_text);
        debug!(
            requested = provider,
            resolved,
            level = level.as_str(),
            bytes = prompt.len(),
            "Composed prompt"
        );
        Ok(prompt)
    }
}

fn diagnostic(e: PromptError) -> String {
    warn!("Prompt composition failed: {}", e);
    format!("{COMPOSE_ERROR_PREFIX}{e}")
}
