use scraper::Html;

use crate::{decode_page, DecodeError};

/// A parsed conversation page.
pub struct ConversationPage {
    html: Html,
    encoding_label: String,
}

impl ConversationPage {
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
            encoding_label: "UTF-8".to_string(),
        }
    }

    /// Decodes raw page bytes, then parses them.
    pub fn from_bytes(bytes: &[u8], charset_hint: Option<&str>) -> Result<Self, DecodeError> {
        let decoded = decode_page(bytes, charset_hint)?;
        Ok(Self {
            html: Html::parse_document(&decoded.text),
            encoding_label: decoded.encoding_label,
        })
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    pub fn encoding_label(&self) -> &str {
        &self.encoding_label
    }
}
