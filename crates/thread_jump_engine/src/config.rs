use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Markers the extractor looks for in the host page.
///
/// Every field has a built-in default, so a config file only needs the entries it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Attribute that tags an element as a conversation message.
    pub id_attribute: String,
    /// Attribute carrying an explicit author role.
    pub role_attribute: String,
    /// Descendant markup that identifies a user message.
    pub user_indicators: Vec<String>,
    /// Descendant markup that identifies an assistant message.
    pub assistant_indicators: Vec<String>,
    /// Sub-elements whose text never belongs in a snippet.
    pub chrome_selectors: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            id_attribute: "data-message-id".to_string(),
            role_attribute: "data-message-author-role".to_string(),
            user_indicators: strings(&[
                r#"[data-message-author-role="user"]"#,
                ".user-message-bubble-color",
                r#"[data-testid="user-avatar"]"#,
                r#"img[alt~="User"]"#,
            ]),
            assistant_indicators: strings(&[
                r#"[data-message-author-role="assistant"]"#,
                ".markdown",
                ".agent-turn",
                r#"[data-testid="bot-avatar"]"#,
                r#"img[alt~="ChatGPT"]"#,
            ]),
            chrome_selectors: strings(&[
                "button",
                r#"[role="button"]"#,
                ".sr-only",
                ".ctn-panel",
                ".ctn-jump-button",
            ]),
        }
    }
}

impl ExtractorConfig {
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        ron::from_str(text).map_err(|err| ConfigError::Parse(err.to_string()))
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}
