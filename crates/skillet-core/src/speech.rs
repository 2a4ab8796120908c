//! Output speech descriptors.
//!
//! Speech content comes in two forms: plain text and rendered SSML markup.
//! The response object resolves what a caller hands it with two rules:
//!
//! 1. One-argument form (`say(content)`): the content is inspected —
//!    structured markup renders and tags as [`Speech::Ssml`], anything
//!    textual tags as [`Speech::Plain`]. Inspection happens at the type
//!    level through [`IntoSpeech`].
//! 2. Two-argument form (`say_as(kind, content)`): the [`SpeechKind`] is
//!    authoritative and coerces the content, see [`Speech::coerce`].

use serde::Serialize;

use crate::ssml::Tag;

/// Accumulated output-speech content, tagged by form.
///
/// Serializes to the platform wire shape:
/// `{"type":"PlainText","text":…}` or `{"type":"SSML","ssml":…}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Speech {
    /// Plain spoken text.
    #[serde(rename = "PlainText")]
    Plain {
        /// The text to speak.
        text: String,
    },

    /// Rendered speech markup.
    #[serde(rename = "SSML")]
    Ssml {
        /// The canonical markup string.
        ssml: String,
    },
}

/// Explicit speech form selector for the two-argument `say`/`reprompt` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechKind {
    /// Treat the content as plain text.
    Text,
    /// Treat the content as speech markup.
    Ssml,
}

impl Speech {
    /// Coerces content to the requested kind.
    ///
    /// The kind is authoritative: [`SpeechKind::Ssml`] keeps markup strings
    /// unchanged and renders structured markup, while [`SpeechKind::Text`]
    /// takes the content's textual form as plain text.
    pub fn coerce(kind: SpeechKind, content: impl IntoSpeech) -> Self {
        let text = content.into_speech().into_text();
        match kind {
            SpeechKind::Text => Speech::Plain { text },
            SpeechKind::Ssml => Speech::Ssml { ssml: text },
        }
    }

    /// Returns the textual content, whichever form it is tagged as.
    pub fn into_text(self) -> String {
        match self {
            Speech::Plain { text } => text,
            Speech::Ssml { ssml } => ssml,
        }
    }
}

/// Conversion into a [`Speech`] descriptor, inferring the form.
///
/// Strings infer plain text; an SSML [`Tag`] renders to its canonical
/// string and infers markup; a `Speech` passes through unchanged.
pub trait IntoSpeech {
    /// Converts `self` into a tagged speech descriptor.
    fn into_speech(self) -> Speech;
}

impl IntoSpeech for Speech {
    fn into_speech(self) -> Speech {
        self
    }
}

impl IntoSpeech for String {
    fn into_speech(self) -> Speech {
        Speech::Plain { text: self }
    }
}

impl IntoSpeech for &str {
    fn into_speech(self) -> Speech {
        Speech::Plain {
            text: self.to_owned(),
        }
    }
}

impl IntoSpeech for Tag {
    fn into_speech(self) -> Speech {
        Speech::Ssml {
            ssml: self.render(),
        }
    }
}

impl IntoSpeech for &Tag {
    fn into_speech(self) -> Speech {
        Speech::Ssml {
            ssml: self.render(),
        }
    }
}
