//! Prompt templates and the provider → template registry.
//!
//! ## Parse once, substitute many
//!
//! A [`PromptTemplate`] is tokenised when it is constructed: literal text,
//! `{{` / `}}` escapes and the two named slots. Everything that could go
//! wrong with a template (a stray brace, an unknown or positional slot, a
//! missing required slot) is therefore reported by the constructor as a
//! [`PromptError`], and [`PromptTemplate::fill`] itself is infallible.
//!
//! Slot values are copied in verbatim and never re-scanned, so document text
//! containing braces or even the literal text `{semantic_map}` comes out
//! exactly as it went in.
//!
//! ## Registry
//!
//! [`TemplateRegistry`] is an immutable map from provider key to template
//! plus the key of the default provider. It has no mutation API: build it
//! once (built-ins or injected templates) and share it behind an `Arc`.

use crate::config::ProviderPolicy;
use crate::error::PromptError;
use crate::prompts::{BUILTIN_TEMPLATES, DEFAULT_PROVIDER};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use tracing::debug;

/// Slot receiving the rendered structure outline.
pub const SEMANTIC_MAP_SLOT: &str = "semantic_map";

/// Slot receiving the cleaned document text.
pub const DOCUMENT_TEXT_SLOT: &str = "document_text";

/// Escapes, well-formed slots (named or positional), then any lone brace.
static RE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{|\}\}|\{([A-Za-z_][A-Za-z0-9_]*)?\}|[{}]").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    SemanticMap,
    DocumentText,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Slot(Slot),
}

/// A parsed provider template with `{semantic_map}` and `{document_text}` slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl PromptTemplate {
    /// Parse and validate a template.
    ///
    /// # Errors
    /// - [`PromptError::UnbalancedBrace`] for a `{` or `}` that is not doubled
    ///   and not part of a slot
    /// - [`PromptError::PositionalPlaceholder`] for `{}`
    /// - [`PromptError::UnknownPlaceholder`] for any other slot name
    /// - [`PromptError::MissingPlaceholder`] when either required slot is absent
    pub fn new(source: impl Into<String>) -> Result<Self, PromptError> {
        let source = source.into();
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut last = 0;

        for caps in RE_TOKEN.captures_iter(&source) {
            let Some(m) = caps.get(0) else { continue };
            literal.push_str(&source[last..m.start()]);
            last = m.end();

            match m.as_str() {
                "{{" => literal.push('{'),
                "}}" => literal.push('}'),
                "{}" => {
                    return Err(PromptError::PositionalPlaceholder { offset: m.start() });
                }
                "{" | "}" => {
                    return Err(PromptError::UnbalancedBrace {
                        brace: m.as_str().chars().next().unwrap_or('{'),
                        offset: m.start(),
                    });
                }
                _ => {
                    let name = caps.get(1).map_or("", |n| n.as_str());
                    let slot = match name {
                        SEMANTIC_MAP_SLOT => Slot::SemanticMap,
                        DOCUMENT_TEXT_SLOT => Slot::DocumentText,
                        other => {
                            return Err(PromptError::UnknownPlaceholder {
                                name: other.to_string(),
                            })
                        }
                    };
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Slot(slot));
                }
            }
        }
        literal.push_str(&source[last..]);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        for (slot, name) in [
            (Slot::SemanticMap, SEMANTIC_MAP_SLOT),
            (Slot::DocumentText, DOCUMENT_TEXT_SLOT),
        ] {
            if !segments.contains(&Segment::Slot(slot)) {
                return Err(PromptError::MissingPlaceholder { name });
            }
        }

        Ok(Self { source, segments })
    }

    /// Substitute both slots. Values are inserted verbatim.
    pub fn fill(&self, semantic_map: &str, document_text: &str) -> String {
        let capacity = self.source.len() + semantic_map.len() + document_text.len();
        let mut out = String::with_capacity(capacity);
        for segment in &self.segments {
            match segment {
                Segment::Literal(s) => out.push_str(s),
                Segment::Slot(Slot::SemanticMap) => out.push_str(semantic_map),
                Segment::Slot(Slot::DocumentText) => out.push_str(document_text),
            }
        }
        out
    }
}

/// Immutable provider-key → template mapping with a default provider.
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, PromptTemplate>,
    default_provider: String,
}

static BUILTIN: Lazy<TemplateRegistry> = Lazy::new(|| {
    let templates = BUILTIN_TEMPLATES
        .iter()
        .map(|(key, text)| PromptTemplate::new(*text).map(|t| (key.to_string(), t)))
        .collect::<Result<Vec<_>, PromptError>>()
        .expect("built-in templates are well-formed");
    TemplateRegistry::new(DEFAULT_PROVIDER, templates)
        .expect("built-in registry contains its default provider")
});

impl TemplateRegistry {
    /// Build a registry from `(provider, template)` pairs.
    ///
    /// Later pairs with the same key replace earlier ones.
    ///
    /// # Errors
    /// [`PromptError::MissingDefaultProvider`] if `default_provider` has no
    /// template.
    pub fn new(
        default_provider: impl Into<String>,
        templates: impl IntoIterator<Item = (String, PromptTemplate)>,
    ) -> Result<Self, PromptError> {
        let default_provider = default_provider.into();
        let templates: BTreeMap<_, _> = templates.into_iter().collect();
        if !templates.contains_key(&default_provider) {
            return Err(PromptError::MissingDefaultProvider {
                provider: default_provider,
            });
        }
        Ok(Self {
            templates,
            default_provider,
        })
    }

    /// The three built-in templates (`chatgpt`, `claude`, `gemini`),
    /// defaulting to `chatgpt`.
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    /// Exact lookup; no fallback.
    pub fn get(&self, provider: &str) -> Option<&PromptTemplate> {
        self.templates.get(provider)
    }

    /// Lookup honouring `policy`.
    ///
    /// Returns the key that was actually used alongside the template, so
    /// callers can report a lenient fallback.
    pub fn resolve<'a>(
        &'a self,
        provider: &'a str,
        policy: ProviderPolicy,
    ) -> Result<(&'a str, &'a PromptTemplate), PromptError> {
        if let Some(template) = self.templates.get(provider) {
            return Ok((provider, template));
        }
        match policy {
            ProviderPolicy::Lenient => {
                debug!(
                    "Unknown provider '{}', falling back to '{}'",
                    provider, self.default_provider
                );
                Ok((&self.default_provider, self.default_template()))
            }
            ProviderPolicy::Strict => Err(PromptError::UnknownProvider {
                provider: provider.to_string(),
                available: self.providers().collect::<Vec<_>>().join(", "),
            }),
        }
    }

    pub fn default_provider(&self) -> &str {
        &self.default_provider
    }

    fn default_template(&self) -> &PromptTemplate {
        // `new` guarantees the default key is present.
        &self.templates[&self.default_provider]
    }

    /// Registered provider keys in sorted order.
    pub fn providers(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn contains(&self, provider: &str) -> bool {
        self.templates.contains_key(provider)
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
