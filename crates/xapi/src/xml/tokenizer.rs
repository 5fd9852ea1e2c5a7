//! Lenient XML tokenizer.
//!
//! Turns a text buffer into a forest of [`Element`] nodes. The tokenizer is a
//! state machine over a byte cursor with an explicit stack of open elements,
//! so nesting depth never touches the call stack. Every step advances the
//! cursor by at least one byte, and every construct has a defined exit at end
//! of input, so malformed documents end the scan cleanly instead of failing.
//!
//! What the tokenizer keeps and drops:
//! - The XML declaration, processing instructions, DOCTYPE and comments are
//!   discarded wherever they appear.
//! - Text outside any element is skipped.
//! - Inside an element, text runs and CDATA sections accumulate until a child
//!   element or a closing tag interrupts them. A whitespace-only run is
//!   dropped when it sits next to a child element and kept as the content of
//!   an element without child elements. Text is never trimmed.
//! - Text children and attribute values hold *entity-encoded* text. CDATA
//!   content is re-encoded with [`escape`] when it is appended, so a single
//!   [`unescape`](crate::escape::unescape) recovers the literal text of both.

use std::collections::BTreeMap;
use std::mem;

use memchr::{memchr, memmem};
use tracing::trace;

use crate::escape::escape;

/// A child of an element: a nested element or a run of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(Element),
    /// Entity-encoded text.
    Text(String),
}

/// A tokenized element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    /// Tag name, including any prefix.
    pub name: String,
    /// Raw (entity-encoded) attribute values. The first occurrence of a
    /// repeated attribute wins.
    pub attributes: BTreeMap<String, String>,
    /// Children in document order.
    pub children: Vec<XmlNode>,
}

impl Element {
    /// Creates a childless element without attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Returns the raw value of an attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Iterates over the child elements, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|child| match child {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    /// Returns the first child element with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|element| element.name == name)
    }

    /// Iterates over child elements with the given name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |element| element.name == name)
    }

    /// Concatenated text children, still entity-encoded.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for child in &self.children {
            if let XmlNode::Text(run) = child {
                text.push_str(run);
            }
        }
        text
    }

    /// Finds the first element with the given name in pre-order, starting
    /// with this element itself.
    pub fn find(&self, name: &str) -> Option<&Element> {
        if self.name == name {
            return Some(self);
        }
        self.elements().find_map(|element| element.find(name))
    }
}

/// Tokenizes `input` into its top-level elements.
///
/// Empty or whitespace-only input yields an empty list.
pub fn tokenize(input: &str) -> Vec<Element> {
    Tokenizer::new(input).run()
}

/// What the cursor is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Between markup: text or nothing.
    Content,
    /// At a `<`.
    Markup,
    /// End of input reached.
    Done,
}

struct Tokenizer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    /// Open elements, innermost last.
    stack: Vec<Element>,
    /// Closed top-level elements.
    roots: Vec<Element>,
    /// Pending text for the innermost open element.
    text: String,
    /// Whether `text` holds anything besides whitespace (or came from CDATA).
    text_significant: bool,
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            stack: Vec::new(),
            roots: Vec::new(),
            text: String::new(),
            text_significant: false,
        }
    }

    fn state(&self) -> State {
        match self.bytes.get(self.pos) {
            None => State::Done,
            Some(b'<') => State::Markup,
            Some(_) => State::Content,
        }
    }

    fn run(mut self) -> Vec<Element> {
        loop {
            match self.state() {
                State::Content => self.text_run(),
                State::Markup => self.markup(),
                State::Done => break,
            }
        }
        self.finish()
    }

    fn text_run(&mut self) {
        let end = memchr(b'<', &self.bytes[self.pos..]).map_or(self.bytes.len(), |i| self.pos + i);
        if !self.stack.is_empty() {
            let run = &self.input[self.pos..end];
            self.push_text(run, false);
        }
        self.pos = end;
    }

    fn markup(&mut self) {
        let rest = &self.bytes[self.pos..];
        if rest.starts_with(b"<?") {
            self.skip_past(2, b"?>");
        } else if rest.starts_with(b"<!--") {
            self.skip_past(4, b"-->");
        } else if rest.starts_with(b"<![CDATA[") {
            self.cdata();
        } else if rest.starts_with(b"<!") {
            self.skip_past(2, b">");
        } else if rest.starts_with(b"</") {
            self.end_tag();
        } else if rest.get(1).is_some_and(|&b| is_name_start(b)) {
            self.start_tag();
        } else {
            // A lone '<' is kept as text.
            if !self.stack.is_empty() {
                self.push_text("&lt;", false);
            }
            self.pos += 1;
        }
    }

    /// Moves the cursor past `terminator`, searching from `self.pos + offset`.
    fn skip_past(&mut self, offset: usize, terminator: &[u8]) {
        let from = (self.pos + offset).min(self.bytes.len());
        self.pos = match memmem::find(&self.bytes[from..], terminator) {
            Some(i) => from + i + terminator.len(),
            None => {
                trace!(position = self.pos, "unterminated markup at end of input");
                self.bytes.len()
            }
        };
    }

    fn cdata(&mut self) {
        let start = self.pos + b"<![CDATA[".len();
        let (content, next) = match memmem::find(&self.bytes[start..], b"]]>") {
            Some(i) => (&self.input[start..start + i], start + i + 3),
            None => {
                trace!(position = self.pos, "unterminated CDATA section");
                (&self.input[start..], self.bytes.len())
            }
        };
        if !self.stack.is_empty() {
            let encoded = escape(content);
            self.push_text(&encoded, true);
        }
        self.pos = next;
    }

    fn end_tag(&mut self) {
        let name_start = self.pos + 2;
        let (name_end, next) = match memchr(b'>', &self.bytes[name_start..]) {
            Some(i) => (name_start + i, name_start + i + 1),
            None => (self.bytes.len(), self.bytes.len()),
        };
        let name = self.input[name_start..name_end].trim();
        self.pos = next;

        let index = self.stack.iter().rposition(|open| open.name == name);
        let closes_innermost = index.is_some() && index == self.stack.len().checked_sub(1);
        self.flush_text(closes_innermost);
        match index {
            Some(index) => {
                while self.stack.len() > index {
                    if let Some(element) = self.stack.pop() {
                        self.attach(element);
                    }
                }
            }
            None => trace!(name, "ignoring unmatched closing tag"),
        }
    }

    fn start_tag(&mut self) {
        let name_start = self.pos + 1;
        let mut cursor = name_start;
        while let Some(&b) = self.bytes.get(cursor) {
            if is_whitespace(b) || b == b'/' || b == b'>' {
                break;
            }
            cursor += 1;
        }
        let mut element = Element::new(&self.input[name_start..cursor]);
        self.pos = cursor;

        let self_closing = self.attributes(&mut element);
        self.flush_text(false);
        if self_closing {
            self.attach(element);
        } else {
            self.stack.push(element);
        }
    }

    /// Reads attributes up to and including the end of the start tag.
    ///
    /// Returns true for a self-closing tag.
    fn attributes(&mut self, element: &mut Element) -> bool {
        loop {
            self.skip_whitespace();
            match self.bytes.get(self.pos) {
                None => return false,
                Some(b'>') => {
                    self.pos += 1;
                    return false;
                }
                Some(b'/') => {
                    self.pos += 1;
                    if self.bytes.get(self.pos) == Some(&b'>') {
                        self.pos += 1;
                        return true;
                    }
                }
                Some(_) => {
                    let key_start = self.pos;
                    while let Some(&b) = self.bytes.get(self.pos) {
                        if is_whitespace(b) || matches!(b, b'=' | b'>' | b'/') {
                            break;
                        }
                        self.pos += 1;
                    }
                    if self.pos == key_start {
                        // Stray '=' without a name.
                        self.pos += 1;
                        continue;
                    }
                    let key = &self.input[key_start..self.pos];

                    self.skip_whitespace();
                    let value = if self.bytes.get(self.pos) == Some(&b'=') {
                        self.pos += 1;
                        self.skip_whitespace();
                        self.attribute_value()
                    } else {
                        String::new()
                    };
                    element.attributes.entry(key.to_string()).or_insert(value);
                }
            }
        }
    }

    fn attribute_value(&mut self) -> String {
        match self.bytes.get(self.pos) {
            Some(&quote @ (b'"' | b'\'')) => {
                let start = self.pos + 1;
                match memchr(quote, &self.bytes[start..]) {
                    Some(i) => {
                        self.pos = start + i + 1;
                        self.input[start..start + i].to_string()
                    }
                    None => {
                        self.pos = self.bytes.len();
                        self.input[start..].to_string()
                    }
                }
            }
            _ => {
                let start = self.pos;
                while let Some(&b) = self.bytes.get(self.pos) {
                    if is_whitespace(b) || b == b'>' || b == b'/' {
                        break;
                    }
                    self.pos += 1;
                }
                self.input[start..self.pos].to_string()
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while self.bytes.get(self.pos).is_some_and(|&b| is_whitespace(b)) {
            self.pos += 1;
        }
    }

    fn push_text(&mut self, run: &str, significant: bool) {
        self.text.push_str(run);
        if significant || !run.bytes().all(is_whitespace) {
            self.text_significant = true;
        }
    }

    /// Hands pending text to the innermost open element.
    ///
    /// `closing` is set when the innermost element is being closed; its
    /// whitespace-only content survives if it has no child elements.
    fn flush_text(&mut self, closing: bool) {
        let text = mem::take(&mut self.text);
        let significant = mem::replace(&mut self.text_significant, false);
        if let Some(parent) = self.stack.last_mut() {
            let blank_content = closing && !text.is_empty() && parent.elements().next().is_none();
            if significant || blank_content {
                parent.children.push(XmlNode::Text(text));
            }
        }
    }

    fn attach(&mut self, element: Element) {
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(XmlNode::Element(element)),
            None => self.roots.push(element),
        }
    }

    /// Closes whatever is still open at end of input.
    fn finish(mut self) -> Vec<Element> {
        self.flush_text(false);
        if !self.stack.is_empty() {
            trace!(open = self.stack.len(), "closing unterminated elements");
        }
        while let Some(element) = self.stack.pop() {
            self.attach(element);
        }
        self.roots
    }
}

#[inline]
fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

#[inline]
fn is_name_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b':' || b >= 0x80
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escape::unescape;

    fn single(input: &str) -> Element {
        let mut roots = tokenize(input);
        assert_eq!(roots.len(), 1, "expected one root in {:?}", input);
        roots.remove(0)
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  \n\t ").is_empty());
    }

    #[test]
    fn test_declaration_and_comments_skipped() {
        let root = single(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!-- head -->\n<Root><!-- in --><a/></Root>",
        );
        assert_eq!(root.name, "Root");
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.child("a").map(|a| a.children.len()), Some(0));
    }

    #[test]
    fn test_attributes() {
        let root = single(r#"<Col id="a" size='10' type=INT flag other = "x y"/>"#);
        assert_eq!(root.attribute("id"), Some("a"));
        assert_eq!(root.attribute("size"), Some("10"));
        assert_eq!(root.attribute("type"), Some("INT"));
        assert_eq!(root.attribute("flag"), Some(""));
        assert_eq!(root.attribute("other"), Some("x y"));
        assert!(root.children.is_empty());
    }

    #[test]
    fn test_duplicate_attribute_keeps_first() {
        let root = single(r#"<a id="1" id="2"></a>"#);
        assert_eq!(root.attribute("id"), Some("1"));
    }

    #[test]
    fn test_whitespace_between_elements_dropped() {
        let root = single("<Rows>\n  <Row>\n    <Col id=\"x\">  v  </Col>\n  </Row>\n</Rows>");
        let row = root.child("Row").unwrap();
        assert_eq!(row.children.len(), 1);
        let col = row.child("Col").unwrap();
        assert_eq!(col.children, vec![XmlNode::Text("  v  ".to_string())]);
    }

    #[test]
    fn test_blank_content_of_leaf_kept() {
        let root = single("<Row>\n  <Col id=\"a\">   </Col>\n  <Col id=\"b\">\n</Col>\n</Row>");
        assert_eq!(root.children.len(), 2);
        let texts: Vec<_> = root.elements().map(Element::text).collect();
        assert_eq!(texts, vec!["   ".to_string(), "\n".to_string()]);

        let root = single("<a> <b/> </a>");
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.text(), "");
    }

    #[test]
    fn test_cdata_concatenated_with_text() {
        let root = single("<a>x<![CDATA[<y> & z]]>w</a>");
        assert_eq!(unescape(&root.text()), "x<y> & zw");
    }

    #[test]
    fn test_whitespace_cdata_is_kept() {
        let root = single("<a><![CDATA[ ]]></a>");
        assert_eq!(root.text(), " ");
    }

    #[test]
    fn test_comment_inside_text() {
        let root = single("<a>he<!-- note -->llo</a>");
        assert_eq!(root.children, vec![XmlNode::Text("hello".to_string())]);
    }

    #[test]
    fn test_mixed_content_split_by_child() {
        let root = single("<a>one<b/>two</a>");
        assert_eq!(root.children.len(), 3);
        assert_eq!(root.text(), "onetwo");
    }

    #[test]
    fn test_top_level_text_skipped() {
        let roots = tokenize("junk<a/>more junk<b></b>tail");
        let names: Vec<_> = roots.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_unterminated_input() {
        let root = single("<Root><Dataset id=\"d\"><Col>text");
        let dataset = root.child("Dataset").unwrap();
        assert_eq!(dataset.attribute("id"), Some("d"));
        assert_eq!(dataset.child("Col").unwrap().text(), "text");

        let root = single("<Root attr=\"never closed");
        assert_eq!(root.attribute("attr"), Some("never closed"));

        assert_eq!(single("<a><!-- open comment").children.len(), 0);
        assert_eq!(single("<a><![CDATA[open").text(), "open");
        assert!(tokenize("<?xml version=\"1.0\"").is_empty());
    }

    #[test]
    fn test_mismatched_closing_tags() {
        let root = single("<a><b></a>");
        assert_eq!(root.child("b").map(|b| b.name.as_str()), Some("b"));

        let root = single("<a></c><b/></a>");
        assert_eq!(root.elements().count(), 1);
    }

    #[test]
    fn test_stray_angle_bracket() {
        let root = single("<a>1 < 2</a>");
        assert_eq!(unescape(&root.text()), "1 < 2");
    }

    #[test]
    fn test_find_preorder() {
        let root = single("<x><y><Root id=\"inner\"/></y><Root id=\"second\"/></x>");
        assert_eq!(root.find("Root").and_then(|r| r.attribute("id")), Some("inner"));
        assert_eq!(root.children_named("Root").count(), 1);
    }

    #[test]
    fn test_doctype_skipped() {
        let root = single("<!DOCTYPE Root><Root/>");
        assert_eq!(root.name, "Root");
    }

    #[test]
    fn test_multibyte_text_and_names() {
        let root = single("<데이터 이름=\"값\">한글 텍스트</데이터>");
        assert_eq!(root.name, "데이터");
        assert_eq!(root.attribute("이름"), Some("값"));
        assert_eq!(root.text(), "한글 텍스트");
    }
}
