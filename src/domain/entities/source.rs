//! Per-site source metadata.

use serde::{Deserialize, Serialize};

/// Byte transformation applied to downloaded images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DecodeRule {
    /// XOR every byte with a repeating hex-encoded key.
    Xor {
        /// Hex-encoded key bytes.
        key: String,
    },
    /// Body is base64 text of the image.
    Base64,
}

/// Site metadata resolved from an origin key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSource {
    /// Origin key, usually the site URL.
    pub origin: String,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Request headers as JSON object text.
    #[serde(default)]
    pub header: Option<String>,

    /// Whether requests go through the shared cookie jar.
    #[serde(default)]
    pub enabled_cookie_jar: bool,

    /// Rule applied to cover images.
    #[serde(default)]
    pub cover_decode: Option<DecodeRule>,

    /// Rule applied to manga pages.
    #[serde(default)]
    pub image_decode: Option<DecodeRule>,
}

impl BookSource {
    /// Creates a source with only an origin.
    #[must_use]
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            ..Self::default()
        }
    }

    /// Returns the decode rule for covers or pages.
    #[must_use]
    pub const fn decode_rule(&self, is_cover: bool) -> Option<&DecodeRule> {
        if is_cover {
            self.cover_decode.as_ref()
        } else {
            self.image_decode.as_ref()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_source_toml() {
        let toml_content = r#"
            origin = "https://manga.example"
            name = "Example"
            header = '{"Referer":"https://manga.example/"}'
            enabled_cookie_jar = true
            cover_decode = { kind = "xor", key = "5a" }
            image_decode = { kind = "base64" }
        "#;

        let source: BookSource = toml::from_str(toml_content).expect("Failed to parse source");

        assert!(source.enabled_cookie_jar);
        assert_eq!(
            source.decode_rule(true),
            Some(&DecodeRule::Xor {
                key: "5a".to_string()
            })
        );
        assert_eq!(source.decode_rule(false), Some(&DecodeRule::Base64));
    }
}
