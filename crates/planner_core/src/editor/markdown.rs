//! Live markdown shortcuts.
//!
//! An ordered rule table evaluated top to bottom; only the first matching
//! rule applies. Rules run over a block's inline markup
//! source and never match across tags, so existing markup is left intact.
//!
//! | order | pattern      | result                          |
//! |-------|--------------|---------------------------------|
//! | 1     | `# ` .. `### ` | heading tier, marks stripped  |
//! | 2     | `* ` / `- `  | bullet-prefixed line            |
//! | 3     | `N. `        | ordinal continuing the list     |
//! | 4     | `**text**`   | `<b>` span                      |
//! | 5     | `*text*`     | `<i>` span                      |
//! | 6     | `` `text` `` | `<code class="inline-code">`    |

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

const SPACE: &str = r"(?:\s|&nbsp;)+";
pub const BULLET_PREFIX: &str = "• ";

static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?s)^(#{{1,3}}){SPACE}(.*)$")).expect("valid heading regex"));
static BULLET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?s)^[*-]{SPACE}(.*)$")).expect("valid bullet regex"));
static NUMBERED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?s)^(\d+)\.{SPACE}(.*)$")).expect("valid numbered regex"));
static BOLD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*([^*<>]+)\*\*").expect("valid bold regex"));
static ITALIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*([^*<>\s][^*<>]*)\*").expect("valid italic regex"));
static CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`<>]+)`").expect("valid code regex"));
static ORDINAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)\. ").expect("valid ordinal regex"));
static TRAILING_SPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\s|&nbsp;)+$").expect("valid trailing space regex"));

/// Style produced by a matched rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkdownStyle {
    /// Heading tier 1..=3.
    Heading(usize),
    Bullet,
    Numbered(u32),
    Bold,
    Italic,
    InlineCode,
}

/// Rewritten block markup plus the style tag that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownMatch {
    pub html: String,
    pub style: MarkdownStyle,
}

/// Surrounding-line information needed by context-sensitive rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkdownContext {
    /// Ordinal of the preceding numbered line, when there is one.
    pub previous_ordinal: Option<u32>,
}

type Rule = fn(&str, MarkdownContext) -> Option<MarkdownMatch>;

const RULES: &[Rule] = &[
    heading_rule,
    bullet_rule,
    numbered_rule,
    bold_rule,
    italic_rule,
    code_rule,
];

/// Applies the first matching rule only. Returns `None` when no rule
/// matches, or when the matching rule leaves the line as it is (a list
/// item already carrying the right number).
pub fn apply_live_markdown(line: &str, context: MarkdownContext) -> Option<MarkdownMatch> {
    let matched = RULES.iter().find_map(|rule| rule(line, context))?;
    (matched.html != line).then_some(matched)
}

/// Ordinal of a numbered line (`"3. item"` -> `3`).
pub fn line_ordinal(line: &str) -> Option<u32> {
    ORDINAL_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|digits| digits.as_str().parse().ok())
}

fn heading_rule(line: &str, _: MarkdownContext) -> Option<MarkdownMatch> {
    let caps = HEADING_RE.captures(line)?;
    let level = caps.get(1)?.as_str().len();
    let body = TRAILING_SPACE_RE.replace(capture(&caps, 2), "");
    Some(MarkdownMatch {
        html: body.into_owned(),
        style: MarkdownStyle::Heading(level),
    })
}

fn bullet_rule(line: &str, _: MarkdownContext) -> Option<MarkdownMatch> {
    let caps = BULLET_RE.captures(line)?;
    Some(MarkdownMatch {
        html: format!("{BULLET_PREFIX}{}", capture(&caps, 1)),
        style: MarkdownStyle::Bullet,
    })
}

fn numbered_rule(line: &str, context: MarkdownContext) -> Option<MarkdownMatch> {
    let caps = NUMBERED_RE.captures(line)?;
    let ordinal = context.previous_ordinal.map_or(1, |previous| previous.saturating_add(1));
    Some(MarkdownMatch {
        html: format!("{ordinal}. {}", capture(&caps, 2)),
        style: MarkdownStyle::Numbered(ordinal),
    })
}

fn bold_rule(line: &str, _: MarkdownContext) -> Option<MarkdownMatch> {
    replace_first(&BOLD_RE, line, "<b>${1}</b>", MarkdownStyle::Bold)
}

fn italic_rule(line: &str, _: MarkdownContext) -> Option<MarkdownMatch> {
    replace_first(&ITALIC_RE, line, "<i>${1}</i>", MarkdownStyle::Italic)
}

fn code_rule(line: &str, _: MarkdownContext) -> Option<MarkdownMatch> {
    replace_first(
        &CODE_RE,
        line,
        "<code class=\"inline-code\">${1}</code>",
        MarkdownStyle::InlineCode,
    )
}

fn replace_first(
    pattern: &Regex,
    line: &str,
    replacement: &str,
    style: MarkdownStyle,
) -> Option<MarkdownMatch> {
    if !pattern.is_match(line) {
        return None;
    }
    Some(MarkdownMatch {
        html: pattern.replace(line, replacement).into_owned(),
        style,
    })
}

fn capture<'t>(caps: &Captures<'t>, index: usize) -> &'t str {
    caps.get(index).map_or("", |m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::{apply_live_markdown, line_ordinal, MarkdownContext, MarkdownStyle};

    fn apply(line: &str) -> Option<(String, MarkdownStyle)> {
        apply_live_markdown(line, MarkdownContext::default()).map(|m| (m.html, m.style))
    }

    #[test]
    fn heading_marks_and_trailing_space_are_stripped() {
        assert_eq!(
            apply("# Hello "),
            Some(("Hello".to_string(), MarkdownStyle::Heading(1)))
        );
        assert_eq!(
            apply("### Deep&nbsp;"),
            Some(("Deep".to_string(), MarkdownStyle::Heading(3)))
        );
        assert_eq!(apply("#### Too deep"), None);
    }

    #[test]
    fn bullet_rule_accepts_star_and_dash() {
        assert_eq!(
            apply("- item "),
            Some(("• item ".to_string(), MarkdownStyle::Bullet))
        );
        assert_eq!(
            apply("* item "),
            Some(("• item ".to_string(), MarkdownStyle::Bullet))
        );
    }

    #[test]
    fn numbered_lines_continue_previous_ordinal() {
        assert_eq!(
            apply("7. first "),
            Some(("1. first ".to_string(), MarkdownStyle::Numbered(1)))
        );
        let context = MarkdownContext {
            previous_ordinal: Some(2),
        };
        let matched = apply_live_markdown("1. third ", context).unwrap();
        assert_eq!(matched.html, "3. third ");
        assert_eq!(matched.style, MarkdownStyle::Numbered(3));
    }

    #[test]
    fn already_numbered_line_is_left_alone() {
        assert_eq!(apply("1. done "), None);
    }

    #[test]
    fn numbered_match_stops_rule_evaluation() {
        assert_eq!(apply("1. **key** "), None);
        assert_eq!(
            apply("4. **key** "),
            Some(("1. **key** ".to_string(), MarkdownStyle::Numbered(1)))
        );
    }

    #[test]
    fn bold_wins_over_italic() {
        assert_eq!(
            apply("**bold** "),
            Some(("<b>bold</b> ".to_string(), MarkdownStyle::Bold))
        );
        assert_eq!(
            apply("an *aside* "),
            Some(("an <i>aside</i> ".to_string(), MarkdownStyle::Italic))
        );
    }

    #[test]
    fn inline_code_gets_monospace_span() {
        assert_eq!(
            apply("run `cargo` "),
            Some((
                "run <code class=\"inline-code\">cargo</code> ".to_string(),
                MarkdownStyle::InlineCode
            ))
        );
    }

    #[test]
    fn markup_is_never_matched_across_tags() {
        assert_eq!(apply("<b>*a</b>* "), None);
        assert_eq!(apply("plain text "), None);
    }

    #[test]
    fn line_ordinal_reads_leading_number() {
        assert_eq!(line_ordinal("12. twelve"), Some(12));
        assert_eq!(line_ordinal("twelve"), None);
    }
}
