//! Types for table requests

use serde::Deserialize;

use crate::fetch::error_message;

/// What the server sends back after a write
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReturnOption {
    /// Return the written rows
    Representation,

    /// Return no body
    Minimal,
}

impl ReturnOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReturnOption::Representation => "return=representation",
            ReturnOption::Minimal => "return=minimal",
        }
    }
}

/// Error body returned by PostgREST
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostgrestError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

impl PostgrestError {
    /// Parse an error body, keeping the raw text as the message when it is not JSON
    pub fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_else(|_| Self {
            message: Some(error_message(body)),
            ..Self::default()
        })
    }

    pub fn describe(&self) -> String {
        let mut text = self.message.clone().unwrap_or_default();
        if let Some(code) = &self.code {
            text = format!("{} ({})", text, code);
        }
        if let Some(details) = &self.details {
            text = format!("{}: {}", text, details);
        }
        if let Some(hint) = &self.hint {
            text = format!("{} hint: {}", text, hint);
        }
        text
    }
}
