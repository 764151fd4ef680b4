//! # Response Entities
//!
//! What a skill answers with. Handlers usually start from
//! [`ResponseEnvelope::speak`] and chain the `with_*` builders.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Envelope version the platform expects.
pub const RESPONSE_VERSION: &str = "1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SpeechType {
    #[default]
    PlainText,
    #[serde(rename = "SSML")]
    Ssml,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OutputSpeech {
    #[serde(rename = "type")]
    pub speech_type: SpeechType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssml: Option<String>,
}

impl OutputSpeech {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            speech_type: SpeechType::PlainText,
            text: Some(text.into()),
            ssml: None,
        }
    }

    pub fn ssml(ssml: impl Into<String>) -> Self {
        Self {
            speech_type: SpeechType::Ssml,
            text: None,
            ssml: Some(ssml.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CardImage {
    #[serde(rename = "smallImageUrl", default, skip_serializing_if = "Option::is_none")]
    pub small_image_url: Option<String>,
    #[serde(rename = "largeImageUrl", default, skip_serializing_if = "Option::is_none")]
    pub large_image_url: Option<String>,
}

/// Visual card shown in the companion app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Card {
    /// `Simple`, `Standard` or `LinkAccount`.
    #[serde(rename = "type")]
    pub card_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<CardImage>,
}

impl Card {
    pub fn simple(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            card_type: "Simple".into(),
            title: Some(title.into()),
            content: Some(content.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Reprompt {
    #[serde(rename = "outputSpeech")]
    pub output_speech: OutputSpeech,
}

/// Device directive; fields beyond `type` are directive specific.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Directive {
    #[serde(rename = "type")]
    pub directive_type: String,
    #[serde(flatten)]
    pub fields: HashMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ResponseBody {
    #[serde(rename = "outputSpeech", default, skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<Directive>,
    #[serde(rename = "shouldEndSession", default, skip_serializing_if = "Option::is_none")]
    pub should_end_session: Option<bool>,
}

/// The JSON document returned to the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub version: String,
    #[serde(rename = "sessionAttributes", default, skip_serializing_if = "HashMap::is_empty")]
    pub session_attributes: HashMap<String, Value>,
    pub response: ResponseBody,
}

impl Default for ResponseEnvelope {
    fn default() -> Self {
        Self {
            version: RESPONSE_VERSION.to_string(),
            session_attributes: HashMap::new(),
            response: ResponseBody::default(),
        }
    }
}

impl ResponseEnvelope {
    /// Plain-text speech response.
    pub fn speak(text: impl Into<String>) -> Self {
        let mut envelope = Self::default();
        envelope.response.output_speech = Some(OutputSpeech::plain(text));
        envelope
    }

    pub fn with_card(mut self, card: Card) -> Self {
        self.response.card = Some(card);
        self
    }

    pub fn with_reprompt(mut self, text: impl Into<String>) -> Self {
        self.response.reprompt = Some(Reprompt {
            output_speech: OutputSpeech::plain(text),
        });
        self
    }

    pub fn with_directive(mut self, directive: Directive) -> Self {
        self.response.directives.push(directive);
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.session_attributes.insert(key.into(), value);
        self
    }

    pub fn end_session(mut self, end: bool) -> Self {
        self.response.should_end_session = Some(end);
        self
    }
}
