use serde::Deserialize;
use std::path::PathBuf;

/// Root configuration for the p4-lsp server.
///
/// Provided by the LSP client through `initializationOptions`. Every field
/// has a default, so partial or empty objects are accepted.
///
/// # Examples
///
/// ```
/// use p4_lsp::config::P4Config;
///
/// let json = r#"{
///     "formatting": { "left_margin": 8 },
///     "hover": { "show_definitions": false }
/// }"#;
///
/// let config: P4Config = serde_json::from_str(json).unwrap();
/// assert_eq!(config.formatting.left_margin, 8);
/// assert!(!config.hover.show_definitions);
/// assert!(config.formatting.enabled);
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
pub struct P4Config {
    #[serde(default)]
    pub formatting: FormattingConfig,
    #[serde(default)]
    pub hover: HoverConfig,
    #[serde(default)]
    pub documentation: DocumentationConfig,
}

impl P4Config {
    /// Reads the configuration from LSP `initializationOptions`.
    ///
    /// A missing or `null` value yields the defaults.
    pub fn from_init_options(options: Option<serde_json::Value>) -> crate::Result<Self> {
        match options {
            None | Some(serde_json::Value::Null) => Ok(Self::default()),
            Some(value) => Ok(serde_json::from_value(value)?),
        }
    }
}

/// Configuration for document formatting.
///
/// # Defaults
///
/// - `enabled`: `true`
/// - `left_margin`: `16` (clamped to `1..=80`)
#[derive(Debug, Clone, Deserialize)]
pub struct FormattingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Column where mnemonics start.
    #[serde(
        default = "default_left_margin",
        deserialize_with = "deserialize_left_margin"
    )]
    pub left_margin: u32,
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            left_margin: default_left_margin(),
        }
    }
}

/// Configuration for hover content.
///
/// # Defaults
///
/// - `show_definitions`: `true`
/// - `jump_hint_text`: `"**Ctrl+click** to jump to the definition"`
#[derive(Debug, Clone, Deserialize)]
pub struct HoverConfig {
    /// Show the defining line when hovering a label or variable use.
    #[serde(default = "default_true")]
    pub show_definitions: bool,
    /// Markdown appended below a definition preview; empty to omit.
    #[serde(default = "default_jump_hint")]
    pub jump_hint_text: String,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            show_definitions: true,
            jump_hint_text: default_jump_hint(),
        }
    }
}

/// Where instruction and register documentation is read from.
///
/// Without a `path` the tables bundled with the server are used. A
/// directory must contain `instructions.csv` and `registers.csv`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentationConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

// Default value functions
const fn default_true() -> bool {
    true
}

fn default_jump_hint() -> String {
    "**Ctrl+click** to jump to the definition".to_string()
}

const DEFAULT_LEFT_MARGIN: u32 = 16;
const MIN_LEFT_MARGIN: u32 = 1;
const MAX_LEFT_MARGIN: u32 = 80;

const fn default_left_margin() -> u32 {
    DEFAULT_LEFT_MARGIN
}

fn validate_left_margin(margin: u32) -> u32 {
    let clamped = margin.clamp(MIN_LEFT_MARGIN, MAX_LEFT_MARGIN);
    if clamped != margin {
        tracing::warn!(
            "left_margin {} outside {}..={}, using {}",
            margin,
            MIN_LEFT_MARGIN,
            MAX_LEFT_MARGIN,
            clamped
        );
    }
    clamped
}

fn deserialize_left_margin<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let margin = u32::deserialize(deserializer)?;
    Ok(validate_left_margin(margin))
}
