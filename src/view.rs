//! View models shared by every dashboard panel.

use std::fmt::{self, Display};

use crate::types::Format;
use crate::util::html::html_escape;

/// Placeholder shown in a statistics field that has no value yet.
pub const FIELD_PLACEHOLDER: &str = "---";

/// Visual weight of a status line.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Tone {
    /// Request pending or nothing to report.
    Neutral,
    Success,
    Warning,
    Error,
    /// Data was found and it is bad news (active problems).
    Alert,
}

impl Tone {
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Neutral => "status-neutral",
            Self::Success => "status-success",
            Self::Warning => "status-warning",
            Self::Error => "status-error",
            Self::Alert => "status-alert",
        }
    }

    const fn marker(self) -> &'static str {
        match self {
            Self::Neutral => "…",
            Self::Success => "✅",
            Self::Warning => "⚠️",
            Self::Error => "❌",
            Self::Alert => "🚨",
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StatusMessage {
    pub tone: Tone,
    pub text: String,
}

impl StatusMessage {
    pub fn new(tone: Tone, text: impl Into<String>) -> Self {
        Self {
            tone,
            text: text.into(),
        }
    }

    pub fn connection_error(err: &impl Display) -> Self {
        Self::new(Tone::Error, format!("Error de conexión: {err}"))
    }

    pub fn to_html(&self) -> String {
        format!(
            r#"<p class="status {}">{}</p>"#,
            self.tone.css_class(),
            html_escape(&self.text)
        )
    }
}

impl Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.tone.marker(), self.text)
    }
}

/// Anything a panel hands back to be shown to the user.
pub trait Render {
    fn status(&self) -> &StatusMessage;
    fn to_text(&self) -> String;
    fn to_html(&self) -> String;

    fn render(&self, format: Format) -> String {
        match format {
            Format::Text => self.to_text(),
            Format::Html => self.to_html(),
        }
    }
}
