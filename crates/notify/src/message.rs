//! Slack message payload and Block Kit types.

use serde::{Deserialize, Serialize};

/// Body posted to a webhook or to `chat.postMessage`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessagePayload {
    pub channel: String,
    /// Display name, only sent in webhook mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Icon, only sent in webhook mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_emoji: Option<String>,
    pub blocks: Vec<Block>,
    /// Plain-text fallback shown in push notifications.
    pub text: String,
}

/// A Block Kit layout block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Header {
        text: TextObject,
    },
    Section {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<TextObject>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        fields: Vec<TextObject>,
    },
    Actions {
        elements: Vec<Button>,
    },
    Context {
        elements: Vec<TextObject>,
    },
}

impl Block {
    #[must_use]
    pub fn header(text: impl Into<String>) -> Self {
        Self::Header {
            text: TextObject::plain(text),
        }
    }

    /// Section with a single mrkdwn paragraph.
    #[must_use]
    pub fn text_section(text: impl Into<String>) -> Self {
        Self::Section {
            text: Some(TextObject::mrkdwn(text)),
            fields: vec![],
        }
    }

    /// Section laid out as a two-column field grid.
    #[must_use]
    pub fn field_section(fields: Vec<TextObject>) -> Self {
        Self::Section { text: None, fields }
    }

    /// Visible text of the block, if it has a single text body.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Header { text } | Self::Section { text: Some(text), .. } => Some(text.text()),
            _ => None,
        }
    }
}

/// Text composition object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextObject {
    PlainText { text: String },
    Mrkdwn { text: String },
}

impl TextObject {
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self::PlainText { text: text.into() }
    }

    #[must_use]
    pub fn mrkdwn(text: impl Into<String>) -> Self {
        Self::Mrkdwn { text: text.into() }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::PlainText { text } | Self::Mrkdwn { text } => text,
        }
    }
}

/// Link button element inside an actions block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "button")]
pub struct Button {
    pub text: TextObject,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

impl Button {
    #[must_use]
    pub fn link(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: TextObject::plain(label),
            url: url.into(),
            style: None,
        }
    }

    #[must_use]
    pub fn primary(mut self) -> Self {
        self.style = Some("primary".to_string());
        self
    }
}
