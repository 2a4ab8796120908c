//! Companion-app card descriptors.

use serde::Serialize;

/// A card shown in the user's companion app alongside the spoken response.
///
/// Serializes with a `type` discriminator matching the platform wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Card {
    /// A title with a plain-text body.
    Simple {
        /// Card title.
        title: String,
        /// Plain-text body.
        content: String,
    },

    /// A title with formatted text and an optional image.
    Standard {
        /// Card title.
        title: String,
        /// Formatted body text.
        text: String,
        /// Optional image shown on the card.
        #[serde(skip_serializing_if = "Option::is_none")]
        image: Option<CardImage>,
    },

    /// Prompts the user to link their account.
    LinkAccount,
}

/// Image URLs for a [`Card::Standard`] card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardImage {
    /// URL of the small rendition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub small_image_url: Option<String>,

    /// URL of the large rendition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub large_image_url: Option<String>,
}

impl Card {
    /// Creates a simple title/content card.
    pub fn simple(title: impl Into<String>, content: impl Into<String>) -> Self {
        Card::Simple {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Creates a standard card without an image.
    pub fn standard(title: impl Into<String>, text: impl Into<String>) -> Self {
        Card::Standard {
            title: title.into(),
            text: text.into(),
            image: None,
        }
    }

    /// Attaches an image to a standard card. No-op for other card kinds.
    pub fn with_image(mut self, card_image: CardImage) -> Self {
        if let Card::Standard { image, .. } = &mut self {
            *image = Some(card_image);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn simple_card_serializes_with_type_tag() {
        let card = Card::simple("foo", "bar");
        assert_eq!(
            serde_json::to_value(&card).unwrap(),
            json!({ "type": "Simple", "title": "foo", "content": "bar" })
        );
    }

    #[test]
    fn standard_card_omits_missing_image() {
        let card = Card::standard("foo", "bar");
        assert_eq!(
            serde_json::to_value(&card).unwrap(),
            json!({ "type": "Standard", "title": "foo", "text": "bar" })
        );
    }

    #[test]
    fn attached_image_serializes_with_camel_case_urls() {
        let card = Card::standard("foo", "bar").with_image(CardImage {
            small_image_url: Some("https://img.test/small.png".to_owned()),
            large_image_url: Some("https://img.test/large.png".to_owned()),
        });
        assert_eq!(
            serde_json::to_value(&card).unwrap(),
            json!({
                "type": "Standard",
                "title": "foo",
                "text": "bar",
                "image": {
                    "smallImageUrl": "https://img.test/small.png",
                    "largeImageUrl": "https://img.test/large.png"
                }
            })
        );
    }

    #[test]
    fn with_image_leaves_other_card_kinds_unchanged() {
        let card = Card::simple("foo", "bar").with_image(CardImage {
            small_image_url: Some("https://img.test/small.png".to_owned()),
            large_image_url: None,
        });
        assert_eq!(
            serde_json::to_value(&card).unwrap(),
            json!({ "type": "Simple", "title": "foo", "content": "bar" })
        );
    }

    #[test]
    fn link_account_card_is_bare() {
        assert_eq!(
            serde_json::to_value(Card::LinkAccount).unwrap(),
            json!({ "type": "LinkAccount" })
        );
    }
}
