//! Inline rich-text fragment tree.
//!
//! A block's `html` is parsed into a shallow tree of text runs, inline
//! elements and void elements. Offsets are measured in text units: one
//! char, one character entity (`&amp;`), or one void element (`<br>`).
//!
//! # Invariants
//! - Serializing a parsed fragment reproduces the input byte for byte,
//!   including tag case, attribute spacing, stray closing tags and
//!   unclosed elements.
//! - Splitting never drops or duplicates text units; inline elements
//!   straddling the split point are cloned onto both sides, and the left
//!   clone is always closed.
//! - Joining re-fuses identical inline elements meeting at the seam, so a
//!   split followed by a join restores the original source.

use std::mem;

const VOID_TAGS: &[&str] = &["br", "img", "hr", "wbr", "input"];
const MAX_ENTITY_LEN: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Tag {
    /// Lowercased element name.
    name: String,
    /// Trimmed attribute source.
    attrs: String,
    /// Opening tag as written.
    open: String,
    /// Closing tag as written; `None` when the source never closed it.
    close: Option<String>,
}

impl Tag {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attrs: String::new(),
            open: format!("<{name}>"),
            close: Some(format!("</{name}>")),
        }
    }

    /// Same element for fusing purposes; raw spelling is ignored.
    fn same_kind(&self, other: &Tag) -> bool {
        self.name == other.name && self.attrs == other.attrs
    }

    fn closed(&self) -> Tag {
        let mut tag = self.clone();
        if tag.close.is_none() {
            tag.close = Some(format!("</{}>", tag.name));
        }
        tag
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    /// Raw text with character entities left encoded.
    Text(String),
    Element { tag: Tag, children: Vec<Node> },
    /// Raw source of a void element such as `<br>`.
    Void(String),
    /// Zero-width markup kept verbatim: stray closing tags, comments.
    Markup(String),
}

impl Node {
    fn unit_len(&self) -> usize {
        match self {
            Self::Text(text) => unit_boundaries(text).len() - 1,
            Self::Element { children, .. } => nodes_unit_len(children),
            Self::Void(_) => 1,
            Self::Markup(_) => 0,
        }
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Self::Text(text) | Self::Void(text) | Self::Markup(text) => out.push_str(text),
            Self::Element { tag, children } => {
                out.push_str(&tag.open);
                for child in children {
                    child.write_html(out);
                }
                if let Some(close) = &tag.close {
                    out.push_str(close);
                }
            }
        }
    }

    fn write_units(&self, out: &mut String) {
        match self {
            Self::Text(text) => {
                let bounds = unit_boundaries(text);
                for pair in bounds.windows(2) {
                    out.push(decode_unit(&text[pair[0]..pair[1]]));
                }
            }
            Self::Element { children, .. } => {
                for child in children {
                    child.write_units(out);
                }
            }
            Self::Void(_) => out.push('\n'),
            Self::Markup(_) => {}
        }
    }
}

/// Parsed inline fragment of one block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    nodes: Vec<Node>,
}

impl Fragment {
    /// Parses inline markup leniently. Nothing is dropped: closing tags
    /// that match no open element are kept as zero-width markup, and
    /// elements left open stay open.
    pub fn parse(html: &str) -> Self {
        let mut open: Vec<(Tag, Vec<Node>)> = Vec::new();
        let mut current: Vec<Node> = Vec::new();
        let mut rest = html;

        while !rest.is_empty() {
            if rest.starts_with('<') {
                if let Some(end) = rest.find('>') {
                    let raw = &rest[..=end];
                    rest = &rest[end + 1..];
                    match classify_tag(raw) {
                        TagToken::Open(tag) => {
                            open.push((tag, mem::take(&mut current)));
                        }
                        TagToken::Close(name) => {
                            match open.iter().rposition(|(tag, _)| tag.name == name) {
                                Some(depth) => close_elements(&mut open, &mut current, depth, Some(raw)),
                                None => current.push(Node::Markup(raw.to_string())),
                            }
                        }
                        TagToken::Void => current.push(Node::Void(raw.to_string())),
                        TagToken::Ignored => current.push(Node::Markup(raw.to_string())),
                    }
                    continue;
                }
                push_text(&mut current, rest);
                break;
            }

            let next = rest.find('<').unwrap_or(rest.len());
            push_text(&mut current, &rest[..next]);
            rest = &rest[next..];
        }

        close_elements(&mut open, &mut current, 0, None);
        Self { nodes: current }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            node.write_html(&mut out);
        }
        out
    }

    /// Number of text units.
    pub fn unit_len(&self) -> usize {
        nodes_unit_len(&self.nodes)
    }

    /// Decoded text with exactly one char per unit (`<br>` becomes `\n`).
    pub fn unit_text(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            node.write_units(&mut out);
        }
        out
    }

    /// Splits at a unit offset (clamped to the fragment length).
    pub fn split_at(self, offset: usize) -> (Fragment, Fragment) {
        let (left, right) = split_nodes(self.nodes, offset);
        (Self { nodes: left }, Self { nodes: right })
    }

    /// Appends `other`, fusing identical inline elements at the seam.
    pub fn join(mut self, other: Fragment) -> Fragment {
        join_nodes(&mut self.nodes, other.nodes);
        self
    }

    /// Appends `other` verbatim; the serialized result is the plain
    /// concatenation of both sources.
    pub fn append(mut self, other: Fragment) -> Fragment {
        self.nodes.extend(other.nodes);
        self
    }

    /// Wraps units `start..end` in a new `<tag>` element. Hands the
    /// fragment back unchanged as `Err` when the clamped range is empty.
    pub fn wrap(self, start: usize, end: usize, tag: &str) -> Result<Fragment, Fragment> {
        let len = self.unit_len();
        let end = end.min(len);
        if start >= end {
            return Err(self);
        }
        let (left, rest) = split_nodes(self.nodes, start);
        let (middle, right) = split_nodes(rest, end - start);
        let mut nodes = left;
        nodes.push(Node::Element {
            tag: Tag::new(tag),
            children: middle,
        });
        nodes.extend(right);
        Ok(Self { nodes })
    }
}

enum TagToken {
    Open(Tag),
    Close(String),
    Void,
    Ignored,
}

fn classify_tag(raw: &str) -> TagToken {
    let inner = raw[1..raw.len() - 1].trim();
    if inner.is_empty() || inner.starts_with('!') || inner.starts_with('?') {
        return TagToken::Ignored;
    }
    if let Some(name) = inner.strip_prefix('/') {
        return TagToken::Close(name.trim().to_ascii_lowercase());
    }

    let self_closing = inner.ends_with('/');
    let inner = inner.trim_end_matches('/').trim_end();
    let (name, attrs) = match inner.find(char::is_whitespace) {
        Some(split) => (&inner[..split], inner[split..].trim()),
        None => (inner, ""),
    };
    let name = name.to_ascii_lowercase();
    if self_closing || VOID_TAGS.contains(&name.as_str()) {
        return TagToken::Void;
    }
    TagToken::Open(Tag {
        name,
        attrs: attrs.to_string(),
        open: raw.to_string(),
        close: None,
    })
}

/// Pops open elements down to `depth`. The element at `depth` receives
/// `closing`; elements nested inside it were never closed in the source.
fn close_elements(
    open: &mut Vec<(Tag, Vec<Node>)>,
    current: &mut Vec<Node>,
    depth: usize,
    closing: Option<&str>,
) {
    while open.len() > depth {
        let Some((mut tag, parent)) = open.pop() else {
            break;
        };
        if open.len() == depth {
            tag.close = closing.map(str::to_string);
        }
        let children = mem::replace(current, parent);
        current.push(Node::Element { tag, children });
    }
}

fn push_text(nodes: &mut Vec<Node>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Node::Text(last)) = nodes.last_mut() {
        last.push_str(text);
    } else {
        nodes.push(Node::Text(text.to_string()));
    }
}

fn nodes_unit_len(nodes: &[Node]) -> usize {
    nodes.iter().map(Node::unit_len).sum()
}

/// Byte offsets of every unit start plus the end of `text`.
fn unit_boundaries(text: &str) -> Vec<usize> {
    let mut bounds = Vec::with_capacity(text.len() + 1);
    let mut index = 0;
    while index < text.len() {
        bounds.push(index);
        let rest = &text[index..];
        let step = entity_len(rest)
            .or_else(|| rest.chars().next().map(char::len_utf8))
            .unwrap_or(1);
        index += step;
    }
    bounds.push(text.len());
    bounds
}

/// Length in bytes of a character entity at the start of `text`.
fn entity_len(text: &str) -> Option<usize> {
    let body = text.strip_prefix('&')?;
    let end = body.find(';')?;
    if end == 0 || end > MAX_ENTITY_LEN {
        return None;
    }
    let name = &body[..end];
    let valid = match name.strip_prefix('#') {
        Some(digits) => !digits.is_empty() && digits.chars().all(|ch| ch.is_ascii_alphanumeric()),
        None => name.chars().all(|ch| ch.is_ascii_alphanumeric()),
    };
    valid.then_some(end + 2)
}

fn decode_unit(unit: &str) -> char {
    if unit.len() == 1 || !unit.starts_with('&') {
        return unit.chars().next().unwrap_or(' ');
    }
    match unit {
        "&amp;" => '&',
        "&lt;" => '<',
        "&gt;" => '>',
        "&quot;" => '"',
        "&#39;" | "&apos;" => '\'',
        "&nbsp;" => '\u{a0}',
        other => other
            .strip_prefix("&#")
            .and_then(|code| code.strip_suffix(';'))
            .and_then(|code| match code.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => code.parse::<u32>().ok(),
            })
            .and_then(char::from_u32)
            .unwrap_or('\u{fffd}'),
    }
}

fn split_nodes(nodes: Vec<Node>, offset: usize) -> (Vec<Node>, Vec<Node>) {
    let mut left = Vec::new();
    let mut right = Vec::new();
    let mut remaining = offset;

    for node in nodes {
        if remaining == 0 {
            right.push(node);
            continue;
        }
        let len = node.unit_len();
        if remaining >= len {
            remaining -= len;
            left.push(node);
            continue;
        }

        match node {
            Node::Text(text) => {
                let cut = unit_boundaries(&text)[remaining];
                left.push(Node::Text(text[..cut].to_string()));
                right.push(Node::Text(text[cut..].to_string()));
            }
            Node::Element { tag, children } => {
                let (head, tail) = split_nodes(children, remaining);
                left.push(Node::Element {
                    tag: tag.closed(),
                    children: head,
                });
                right.push(Node::Element {
                    tag,
                    children: tail,
                });
            }
            // Zero or one unit: always handled by the whole-node branches above.
            other => right.push(other),
        }
        remaining = 0;
    }

    (left, right)
}

fn join_nodes(left: &mut Vec<Node>, right: Vec<Node>) {
    let mut right = right.into_iter();
    let Some(first) = right.next() else {
        return;
    };
    let leftover = match left.last_mut() {
        Some(last) => merge_into(last, first),
        None => Some(first),
    };
    if let Some(node) = leftover {
        left.push(node);
    }
    left.extend(right);
}

/// Fuses `next` into `last` when both are text or the same element;
/// hands `next` back otherwise. A fused element takes the closing tag of
/// `next`.
fn merge_into(last: &mut Node, next: Node) -> Option<Node> {
    match (last, next) {
        (Node::Text(text), Node::Text(more)) => {
            text.push_str(&more);
            None
        }
        (
            Node::Element { tag, children },
            Node::Element {
                tag: next_tag,
                children: next_children,
            },
        ) if tag.same_kind(&next_tag) => {
            join_nodes(children, next_children);
            tag.close = next_tag.close;
            None
        }
        (_, next) => Some(next),
    }
}

#[cfg(test)]
mod tests {
    use super::Fragment;

    #[test]
    fn parse_and_serialize_reproduce_well_formed_markup() {
        let html = "a <b>bold <i>both</i></b> &amp; <span class=\"x\">s</span><br>end";
        assert_eq!(Fragment::parse(html).to_html(), html);
    }

    #[test]
    fn serialization_keeps_source_spelling() {
        for html in [
            "<B>bold</B> x",
            "<span  class=\"x\" >s</SPAN>",
            "a</b>c",
            "<b>open",
            "<b><i>unclosed inner</b> tail",
            "x<!-- note -->y<>z",
        ] {
            assert_eq!(Fragment::parse(html).to_html(), html);
        }
    }

    #[test]
    fn stray_markup_has_no_width() {
        let fragment = Fragment::parse("a</b>c<!-- c -->");
        assert_eq!(fragment.unit_len(), 2);
        assert_eq!(fragment.unit_text(), "ac");
    }

    #[test]
    fn entities_and_void_elements_count_as_one_unit() {
        let fragment = Fragment::parse("a&amp;b<br>c");
        assert_eq!(fragment.unit_len(), 5);
        assert_eq!(fragment.unit_text(), "a&b\nc");
    }

    #[test]
    fn split_inside_element_clones_it_onto_both_sides() {
        let (left, right) = Fragment::parse("x<B>bold</B>y").split_at(3);
        assert_eq!(left.to_html(), "x<B>bo</B>");
        assert_eq!(right.to_html(), "<B>ld</B>y");
    }

    #[test]
    fn split_inside_unclosed_element_closes_left_half_only() {
        let (left, right) = Fragment::parse("<b>open").split_at(2);
        assert_eq!(left.to_html(), "<b>op</b>");
        assert_eq!(right.to_html(), "<b>en");
        assert_eq!(left.join(right).to_html(), "<b>open");
    }

    #[test]
    fn split_then_join_restores_original_source() {
        for source in ["one <b>two <u>three</u></b> four", "<I >a</i>b</u>c"] {
            let fragment = Fragment::parse(source);
            for offset in 0..=fragment.unit_len() {
                let (left, right) = fragment.clone().split_at(offset);
                assert_eq!(left.join(right).to_html(), source, "offset {offset}");
            }
        }
    }

    #[test]
    fn append_is_plain_concatenation() {
        let joined = Fragment::parse("<b>A</b>").append(Fragment::parse("<b>B</b>"));
        assert_eq!(joined.to_html(), "<b>A</b><b>B</b>");
        assert_eq!(joined.unit_len(), 2);
    }

    #[test]
    fn split_at_entity_keeps_entity_whole() {
        let (left, right) = Fragment::parse("a&amp;b").split_at(2);
        assert_eq!(left.to_html(), "a&amp;");
        assert_eq!(right.to_html(), "b");
    }

    #[test]
    fn wrap_rejects_empty_range() {
        let fragment = Fragment::parse("abc");
        assert!(fragment.clone().wrap(2, 2, "b").is_err());
        let wrapped = fragment.wrap(1, 3, "b").unwrap();
        assert_eq!(wrapped.to_html(), "a<b>bc</b>");
    }
}
