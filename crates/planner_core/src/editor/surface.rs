//! Text-editing surface abstraction.
//!
//! Block logic only talks to a [`TextSurface`]; any rich-text primitive
//! with caret and range support can implement it. [`FragmentSurface`] is
//! the in-process implementation over an inline [`Fragment`].

use crate::editor::fragment::Fragment;
use std::mem;
use std::ops::Range;

/// Anchor/focus pair in text units. Collapsed when both are equal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub anchor: usize,
    pub focus: usize,
}

impl Selection {
    pub fn caret(offset: usize) -> Self {
        Self {
            anchor: offset,
            focus: offset,
        }
    }

    pub fn range(anchor: usize, focus: usize) -> Self {
        Self { anchor, focus }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// Ordered `start..end` regardless of selection direction.
    pub fn ordered(&self) -> Range<usize> {
        self.anchor.min(self.focus)..self.anchor.max(self.focus)
    }
}

/// Inline emphasis applied by the formatting commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineFormat {
    Bold,
    Italic,
    Underline,
}

impl InlineFormat {
    pub fn tag(self) -> &'static str {
        match self {
            Self::Bold => "b",
            Self::Italic => "i",
            Self::Underline => "u",
        }
    }
}

/// Caret and range primitives needed by structural block edits.
pub trait TextSurface {
    fn caret_offset(&self) -> usize;
    fn selection(&self) -> Selection;
    fn set_selection(&mut self, selection: Selection);
    fn text_len(&self) -> usize;
    /// Decoded text, one char per unit.
    fn unit_text(&self) -> String;
    /// Removes and returns the markup after `offset`.
    fn extract_after(&mut self, offset: usize) -> String;
    /// Inserts markup at `offset`; the caret lands after the insertion.
    /// At the end of the content the markup is appended verbatim.
    fn insert_at(&mut self, offset: usize, html: &str);
    /// Wraps `start..end` in `<tag>`. Returns `false` for an empty range.
    fn wrap_range(&mut self, start: usize, end: usize, tag: &str) -> bool;
    fn html(&self) -> String;
}

pub struct FragmentSurface {
    fragment: Fragment,
    selection: Selection,
}

impl FragmentSurface {
    /// Opens a surface with the caret at the end of the content.
    pub fn new(html: &str) -> Self {
        let fragment = Fragment::parse(html);
        let end = fragment.unit_len();
        Self {
            fragment,
            selection: Selection::caret(end),
        }
    }

    pub fn with_selection(html: &str, selection: Selection) -> Self {
        let mut surface = Self::new(html);
        surface.set_selection(selection);
        surface
    }
}

impl TextSurface for FragmentSurface {
    fn caret_offset(&self) -> usize {
        self.selection.focus
    }

    fn selection(&self) -> Selection {
        self.selection
    }

    fn set_selection(&mut self, selection: Selection) {
        let len = self.text_len();
        self.selection = Selection::range(selection.anchor.min(len), selection.focus.min(len));
    }

    fn text_len(&self) -> usize {
        self.fragment.unit_len()
    }

    fn unit_text(&self) -> String {
        self.fragment.unit_text()
    }

    fn extract_after(&mut self, offset: usize) -> String {
        let (left, right) = mem::take(&mut self.fragment).split_at(offset);
        self.fragment = left;
        let len = self.text_len();
        self.set_selection(Selection::caret(self.selection.focus.min(len)));
        right.to_html()
    }

    fn insert_at(&mut self, offset: usize, html: &str) {
        let inserted = Fragment::parse(html);
        let fragment = mem::take(&mut self.fragment);
        let len = fragment.unit_len();
        let caret = offset.min(len) + inserted.unit_len();
        self.fragment = if offset >= len {
            fragment.append(inserted)
        } else {
            let (left, right) = fragment.split_at(offset);
            left.join(inserted).join(right)
        };
        self.selection = Selection::caret(caret);
    }

    fn wrap_range(&mut self, start: usize, end: usize, tag: &str) -> bool {
        match mem::take(&mut self.fragment).wrap(start, end, tag) {
            Ok(wrapped) => {
                self.fragment = wrapped;
                let end = end.min(self.text_len());
                self.selection = Selection::caret(end);
                true
            }
            Err(unchanged) => {
                self.fragment = unchanged;
                false
            }
        }
    }

    fn html(&self) -> String {
        self.fragment.to_html()
    }
}

/// Range of the word ending right before `caret`, if any.
pub fn word_range_before(text: &str, caret: usize) -> Option<Range<usize>> {
    let chars: Vec<char> = text.chars().collect();
    let caret = caret.min(chars.len());
    let mut start = caret;
    while start > 0 && !chars[start - 1].is_whitespace() {
        start -= 1;
    }
    (start < caret).then_some(start..caret)
}

/// Applies `format` to the surface selection, or to the word before a
/// collapsed caret. Returns the caret offset after the formatted span.
pub fn apply_inline_format(surface: &mut dyn TextSurface, format: InlineFormat) -> Option<usize> {
    let selection = surface.selection();
    let range = if selection.is_collapsed() {
        word_range_before(&surface.unit_text(), selection.focus)?
    } else {
        selection.ordered()
    };
    if !surface.wrap_range(range.start, range.end, format.tag()) {
        return None;
    }
    Some(surface.caret_offset())
}

#[cfg(test)]
mod tests {
    use super::{
        apply_inline_format, word_range_before, FragmentSurface, InlineFormat, Selection,
        TextSurface,
    };

    #[test]
    fn extract_after_truncates_and_returns_tail() {
        let mut surface = FragmentSurface::new("Hello <b>world</b>");
        let tail = surface.extract_after(8);
        assert_eq!(surface.html(), "Hello <b>wo</b>");
        assert_eq!(tail, "<b>rld</b>");
        assert_eq!(surface.caret_offset(), 8);
    }

    #[test]
    fn insert_at_places_caret_after_insertion() {
        let mut surface = FragmentSurface::new("ac");
        surface.insert_at(1, "<i>b</i>");
        assert_eq!(surface.html(), "a<i>b</i>c");
        assert_eq!(surface.caret_offset(), 2);
    }

    #[test]
    fn insert_at_end_appends_markup_unchanged() {
        let mut surface = FragmentSurface::new("<b>A</b>");
        surface.insert_at(1, "<b>B</b>");
        assert_eq!(surface.html(), "<b>A</b><b>B</b>");
        assert_eq!(surface.caret_offset(), 2);
    }

    #[test]
    fn collapsed_caret_formats_preceding_word() {
        let mut surface = FragmentSurface::with_selection("say hello", Selection::caret(9));
        let caret = apply_inline_format(&mut surface, InlineFormat::Bold);
        assert_eq!(caret, Some(9));
        assert_eq!(surface.html(), "say <b>hello</b>");
    }

    #[test]
    fn backward_selection_is_ordered_before_wrapping() {
        let mut surface = FragmentSurface::with_selection("abcdef", Selection::range(4, 1));
        let caret = apply_inline_format(&mut surface, InlineFormat::Underline);
        assert_eq!(caret, Some(4));
        assert_eq!(surface.html(), "a<u>bcd</u>ef");
    }

    #[test]
    fn caret_after_whitespace_formats_nothing() {
        let mut surface = FragmentSurface::with_selection("word ", Selection::caret(5));
        assert_eq!(apply_inline_format(&mut surface, InlineFormat::Italic), None);
        assert_eq!(surface.html(), "word ");
        assert_eq!(word_range_before("word ", 4), Some(0..4));
    }

    #[test]
    fn formatting_inside_existing_markup_keeps_it_balanced() {
        let mut surface = FragmentSurface::with_selection("<i>abc</i>d", Selection::range(1, 4));
        apply_inline_format(&mut surface, InlineFormat::Bold).unwrap();
        assert_eq!(surface.html(), "<i>a</i><b><i>bc</i>d</b>");
    }
}
