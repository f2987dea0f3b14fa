//! Built-in prompt templates, one per target chat provider.
//!
//! Centralising every template here serves two purposes:
//!
//! 1. **Single source of truth**: changing how a provider is addressed
//!    requires editing exactly one constant.
//!
//! 2. **Testability**: unit tests can parse and inspect the templates
//!    directly, so a stray brace is caught before the gateway ever starts.
//!
//! Each template carries two named slots, `{semantic_map}` (the rendered
//! structure outline) and `{document_text}` (the cleaned OCR text). Literal
//! braces must be doubled (`{{` / `}}`). The constants are only raw text;
//! [`crate::pipeline::template::TemplateRegistry::builtin`] parses them.

/// Provider key for OpenAI ChatGPT. Also the default provider.
pub const CHATGPT: &str = "chatgpt";

/// Provider key for Anthropic Claude.
pub const CLAUDE: &str = "claude";

/// Provider key for Google Gemini.
pub const GEMINI: &str = "gemini";

/// Provider used when a request names none (or, leniently, an unknown one).
pub const DEFAULT_PROVIDER: &str = CHATGPT;

/// Plain numbered instructions.
pub const CHATGPT_TEMPLATE: &str = r#"
ANALYZE THIS DOCUMENT WITH STRUCTURAL CONTEXT:

DOCUMENT STRUCTURE:
{semantic_map}

DOCUMENT CONTENT:
{document_text}

INSTRUCTIONS:
1. Use the hierarchical structure to understand document organization
2. Maintain context relationships between sections
3. Reference specific document sections when answering
4. Respect the original document flow and organization

RESPONSE FORMAT: Provide comprehensive analysis considering the document structure.
"#;

/// XML-style tagged sections, which Claude follows closely.
pub const CLAUDE_TEMPLATE: &str = r#"
<document_analysis>
<structure>
{semantic_map}
</structure>

<content>
{document_text}
</content>

<instructions>
Analyze this document using its structural hierarchy. Pay attention to:
- Section relationships and dependencies
- Content organization patterns
- Hierarchical importance of information
- Contextual connections between blocks

Provide insights that respect the original document architecture.
</instructions>
</document_analysis>
"#;

/// Markdown headings with the outline fenced off from the content.
pub const GEMINI_TEMPLATE: &str = r#"
**DOCUMENT STRUCTURAL ANALYSIS REQUEST**

**SEMANTIC MAP:**
```text
{semantic_map}
```

**DOCUMENT CONTENT:**
{document_text}

**ANALYSIS GUIDELINES:**
- Leverage the document structure for deeper understanding
- Map responses to specific hierarchical elements
- Maintain contextual relationships in your analysis
- Consider spatial and logical connections between content blocks

Please provide a structured response that aligns with the document's organization.
"#;

/// All built-in `(provider, template)` pairs.
pub const BUILTIN_TEMPLATES: [(&str, &str); 3] = [
    (CHATGPT, CHATGPT_TEMPLATE),
    (CLAUDE, CLAUDE_TEMPLATE),
    (GEMINI, GEMINI_TEMPLATE),
];
