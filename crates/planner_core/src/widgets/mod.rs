//! Dashboard widget content backed by public REST services.
//!
//! # Responsibility
//! - Parse quote and weather responses into display models.
//! - Degrade to static fallbacks on any fetch or parse failure.
//!
//! # Invariants
//! - Widget loaders never return errors; failures are logged as warnings.
//! - Transport is supplied by the host through the `*Source` traits.

pub mod quote;
pub mod weather;

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum WidgetError {
    /// Transport failure reported by the host.
    Fetch(String),
    Parse(serde_json::Error),
    MissingField(&'static str),
}

impl Display for WidgetError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fetch(message) => write!(f, "fetch failed: {message}"),
            Self::Parse(err) => write!(f, "unexpected response: {err}"),
            Self::MissingField(field) => write!(f, "response is missing `{field}`"),
        }
    }
}

impl Error for WidgetError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for WidgetError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}
