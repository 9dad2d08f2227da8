//! Quote-of-the-day widget.

use crate::widgets::WidgetError;
use log::warn;
use serde::Deserialize;

pub const FALLBACK_QUOTE: &str = "The secret of getting ahead is getting started.";
pub const FALLBACK_AUTHOR: &str = "Mark Twain";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Quote {
    pub content: String,
    pub author: String,
}

impl Quote {
    pub fn fallback() -> Self {
        Self {
            content: FALLBACK_QUOTE.to_string(),
            author: FALLBACK_AUTHOR.to_string(),
        }
    }
}

/// Host-provided transport for the random-quote endpoint.
pub trait QuoteSource {
    /// Returns the raw JSON response body.
    fn fetch_random_quote(&self) -> Result<String, WidgetError>;
}

#[derive(Deserialize)]
#[serde(untagged)]
enum QuoteBody {
    Single(Quote),
    List(Vec<Quote>),
}

/// Parses `{content, author}` or a one-element array of it.
pub fn parse_quote(body: &str) -> Result<Quote, WidgetError> {
    let quote = match serde_json::from_str::<QuoteBody>(body)? {
        QuoteBody::Single(quote) => quote,
        QuoteBody::List(quotes) => quotes
            .into_iter()
            .next()
            .ok_or(WidgetError::MissingField("content"))?,
    };
    if quote.content.trim().is_empty() {
        return Err(WidgetError::MissingField("content"));
    }
    let author = match quote.author.trim() {
        "" => "Unknown".to_string(),
        author => author.to_string(),
    };
    Ok(Quote {
        content: quote.content.trim().to_string(),
        author,
    })
}

/// Fetches a quote, falling back to a static one on any failure.
pub fn load_quote(source: &dyn QuoteSource) -> Quote {
    match source.fetch_random_quote().and_then(|body| parse_quote(&body)) {
        Ok(quote) => quote,
        Err(err) => {
            warn!("event=quote_refresh module=widgets status=error error_code=quote_fallback error={err}");
            Quote::fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{load_quote, parse_quote, Quote, QuoteSource};
    use crate::widgets::WidgetError;

    struct Offline;

    impl QuoteSource for Offline {
        fn fetch_random_quote(&self) -> Result<String, WidgetError> {
            Err(WidgetError::Fetch("network unreachable".to_string()))
        }
    }

    struct Canned(&'static str);

    impl QuoteSource for Canned {
        fn fetch_random_quote(&self) -> Result<String, WidgetError> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn parses_object_and_array_bodies() {
        let single = parse_quote(r#"{"content":" Be brief. ","author":"Anon"}"#).unwrap();
        assert_eq!(single.content, "Be brief.");
        let listed = parse_quote(r#"[{"content":"Hi","author":""}]"#).unwrap();
        assert_eq!(listed.author, "Unknown");
    }

    #[test]
    fn offline_source_yields_fallback() {
        assert_eq!(load_quote(&Offline), Quote::fallback());
    }

    #[test]
    fn malformed_body_yields_fallback() {
        assert_eq!(load_quote(&Canned("<html>502</html>")), Quote::fallback());
        assert_eq!(load_quote(&Canned("[]")), Quote::fallback());
    }
}
