#![forbid(unsafe_code)]

//! `<start>` declarations of a run config.
//!
//! Only `<start>` elements that are direct children of the root element are
//! declarations.  A declaration's *effective binary name* is the `name` of
//! its `<binary>` child when that child exists, and its own `name` otherwise.

use crate::edit::TextEdit;
use crate::escape::{escape_attr, escape_attr_quoted};
use cfgsign_core::{attr, node};

/// A view over one `<start>` element.
#[derive(Debug, Clone, Copy)]
pub struct StartDeclaration<'a, 'input: 'a> {
    node: roxmltree::Node<'a, 'input>,
}

impl<'a, 'input: 'a> StartDeclaration<'a, 'input> {
    /// Wrap a `<start>` element.
    pub fn new(node: roxmltree::Node<'a, 'input>) -> Self {
        Self { node }
    }

    /// The underlying element.
    pub fn node(&self) -> roxmltree::Node<'a, 'input> {
        self.node
    }

    /// The declaration's own `name` attribute.
    pub fn name(&self) -> Option<&'a str> {
        self.node.attribute(attr::NAME)
    }

    /// The first `<binary>` child, if present.
    pub fn binary(&self) -> Option<roxmltree::Node<'a, 'input>> {
        find_child_element(self.node, node::BINARY)
    }

    /// The `name` of the `<binary>` child, if present.
    pub fn binary_name(&self) -> Option<&'a str> {
        self.binary().and_then(|b| b.attribute(attr::NAME))
    }

    /// The name this declaration is matched by.
    ///
    /// A `<binary>` child is authoritative even when it lacks a `name`; such
    /// a declaration has no effective name and never matches.
    pub fn effective_binary_name(&self) -> Option<&'a str> {
        match self.binary() {
            Some(binary) => binary.attribute(attr::NAME),
            None => self.name(),
        }
    }

    /// The first `<signature>` child, if present.
    pub fn signature(&self) -> Option<roxmltree::Node<'a, 'input>> {
        find_child_element(self.node, node::SIGNATURE)
    }

    /// The recorded signature value, if any.
    pub fn signature_value(&self) -> Option<&'a str> {
        self.signature().and_then(|s| s.attribute(attr::VALUE))
    }

    /// Build the edit that records `value` as this declaration's signature.
    ///
    /// An existing `<signature>` child gets its `value` rewritten in place
    /// (or added, if the attribute is missing).  Otherwise a new
    /// `<signature value="…"/>` is appended as the last element child.
    pub fn upsert_signature(&self, value: &str) -> TextEdit {
        let text = self.node.document().input_text();

        let Some(sig) = self.signature() else {
            return self.append_signature(text, value);
        };

        let existing = sig
            .attributes()
            .find(|a| a.name() == attr::VALUE && a.namespace().is_none());
        match existing {
            Some(existing) => {
                let range = existing.range_value();
                let quote = match text[..range.start].chars().next_back() {
                    Some('\'') => '\'',
                    _ => '"',
                };
                TextEdit::replace(range, escape_attr_quoted(value, quote))
            }
            None => {
                let start = sig.range().start;
                let at = start + 1 + qualified_name(text, start).len();
                TextEdit::insert(at, format!(" {}=\"{}\"", attr::VALUE, escape_attr(value)))
            }
        }
    }

    fn append_signature(&self, text: &str, value: &str) -> TextEdit {
        let element = format!("<{} {}=\"{}\"/>", node::SIGNATURE, attr::VALUE, escape_attr(value));
        let range = self.node.range();
        let source = &text[range.clone()];

        // <start name="x"/> has to be opened up first.
        if source.ends_with("/>") {
            let qname = qualified_name(text, range.start);
            return TextEdit::replace(range.end - 2..range.end, format!(">{element}</{qname}>"));
        }

        match self.node.last_element_child() {
            Some(last) => {
                let indent = indent_before(last);
                TextEdit::insert(last.range().end, format!("{indent}{element}"))
            }
            None => {
                let close = source
                    .rfind("</")
                    .map(|i| range.start + i)
                    .unwrap_or(range.end);
                TextEdit::insert(close, element)
            }
        }
    }
}

/// All declarations in document order.
pub fn start_declarations<'a, 'input: 'a>(
    doc: &'a roxmltree::Document<'input>,
) -> impl Iterator<Item = StartDeclaration<'a, 'input>> {
    doc.root_element()
        .children()
        .filter(|n| is_element_named(*n, node::START))
        .map(StartDeclaration::new)
}

/// The first declaration whose effective binary name is `binary`.
pub fn find_start<'a, 'input: 'a>(
    doc: &'a roxmltree::Document<'input>,
    binary: &str,
) -> Option<StartDeclaration<'a, 'input>> {
    start_declarations(doc).find(|d| d.effective_binary_name() == Some(binary))
}

fn is_element_named(n: roxmltree::Node<'_, '_>, local_name: &str) -> bool {
    n.is_element() && n.tag_name().name() == local_name && n.tag_name().namespace().unwrap_or("") == ""
}

fn find_child_element<'a, 'input: 'a>(
    parent: roxmltree::Node<'a, 'input>,
    local_name: &str,
) -> Option<roxmltree::Node<'a, 'input>> {
    parent.children().find(|n| is_element_named(*n, local_name))
}

/// The tag name as written in the source, starting at the element's `<`.
fn qualified_name(text: &str, element_start: usize) -> &str {
    let rest = &text[element_start + 1..];
    let end = rest
        .find(|c: char| c.is_ascii_whitespace() || c == '/' || c == '>')
        .unwrap_or(rest.len());
    &rest[..end]
}

/// Indentation of the line holding `node`.
///
/// Comments and processing instructions directly in front of `node` sit on
/// the same line, so the whitespace before them is used instead.
fn indent_before<'a>(node: roxmltree::Node<'a, '_>) -> &'a str {
    let mut prev = node.prev_sibling();
    while let Some(n) = prev {
        if n.is_text() {
            return n.text().map(line_indent).unwrap_or("");
        }
        if !(n.is_comment() || n.is_pi()) {
            break;
        }
        prev = n.prev_sibling();
    }
    ""
}

/// Whitespace from the last line break of `s`, or nothing for mixed content.
fn line_indent(s: &str) -> &str {
    if !s.trim().is_empty() {
        return "";
    }
    match s.rfind('\n') {
        Some(i) => &s[i..],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfigDocument;

    fn upsert(xml: &str, binary: &str, value: &str) -> String {
        let mut doc = ConfigDocument::parse(xml.to_owned()).unwrap();
        let edit = {
            let tree = doc.parse_doc().unwrap();
            find_start(&tree, binary).unwrap().upsert_signature(value)
        };
        doc.apply(&edit).unwrap();
        doc.text().to_owned()
    }

    #[test]
    fn test_binary_child_is_authoritative() {
        let xml = r#"<config><start name="A"><binary name="B"/></start><start name="C"/></config>"#;
        let doc = roxmltree::Document::parse(xml).unwrap();

        let b = find_start(&doc, "B").unwrap();
        assert_eq!(b.name(), Some("A"));
        assert_eq!(b.binary_name(), Some("B"));
        assert!(find_start(&doc, "A").is_none());
        assert_eq!(find_start(&doc, "C").unwrap().effective_binary_name(), Some("C"));
    }

    #[test]
    fn test_first_match_wins() {
        let xml = r#"<config>
            <start name="first"><binary name="x"/></start>
            <start name="x"/>
        </config>"#;
        let doc = roxmltree::Document::parse(xml).unwrap();
        assert_eq!(find_start(&doc, "x").unwrap().name(), Some("first"));
        assert_eq!(start_declarations(&doc).count(), 2);
    }

    #[test]
    fn test_only_direct_children_are_declarations() {
        let xml = r#"<config><parent><start name="deep"/></parent></config>"#;
        let doc = roxmltree::Document::parse(xml).unwrap();
        assert!(find_start(&doc, "deep").is_none());
    }

    #[test]
    fn test_unnamed_binary_never_matches() {
        let xml = r#"<config><start name="a"><binary/></start></config>"#;
        let doc = roxmltree::Document::parse(xml).unwrap();
        let decl = start_declarations(&doc).next().unwrap();
        assert_eq!(decl.effective_binary_name(), None);
        assert!(find_start(&doc, "a").is_none());
    }

    #[test]
    fn test_signature_lookup() {
        let xml = r#"<config><start name="a"><signature value="abc"/></start><start name="b"/></config>"#;
        let doc = roxmltree::Document::parse(xml).unwrap();
        assert_eq!(find_start(&doc, "a").unwrap().signature_value(), Some("abc"));
        assert!(find_start(&doc, "b").unwrap().signature().is_none());
    }

    #[test]
    fn test_append_keeps_indentation() {
        let xml = "<config>\n\t<start name=\"app\">\n\t\t<binary name=\"app.bin\"/>\n\t</start>\n</config>\n";
        let expected = "<config>\n\t<start name=\"app\">\n\t\t<binary name=\"app.bin\"/>\n\t\t<signature value=\"ABCDEF0123\"/>\n\t</start>\n</config>\n";
        assert_eq!(upsert(xml, "app.bin", "ABCDEF0123"), expected);
    }

    #[test]
    fn test_append_after_commented_child() {
        let xml = "<config>\n  <start name=\"app\">\n    <!-- image --><binary name=\"app.bin\"/>\n  </start>\n</config>\n";
        let expected = "<config>\n  <start name=\"app\">\n    <!-- image --><binary name=\"app.bin\"/>\n    <signature value=\"S\"/>\n  </start>\n</config>\n";
        assert_eq!(upsert(xml, "app.bin", "S"), expected);
    }

    #[test]
    fn test_append_to_empty_element() {
        assert_eq!(
            upsert(r#"<config><start name="app"/></config>"#, "app", "S"),
            r#"<config><start name="app"><signature value="S"/></start></config>"#
        );
        assert_eq!(
            upsert(r#"<config><start name="app"></start></config>"#, "app", "S"),
            r#"<config><start name="app"><signature value="S"/></start></config>"#
        );
    }

    #[test]
    fn test_overwrite_existing_value() {
        let xml = r#"<config><start name="app"><signature value="old"/></start><start name="other"><signature value="keep"/></start></config>"#;
        assert_eq!(
            upsert(xml, "app", "new"),
            r#"<config><start name="app"><signature value="new"/></start><start name="other"><signature value="keep"/></start></config>"#
        );
    }

    #[test]
    fn test_overwrite_single_quoted_value() {
        let xml = "<config><start name='app'><signature value='old'/></start></config>";
        assert_eq!(
            upsert(xml, "app", "it's"),
            "<config><start name='app'><signature value='it&apos;s'/></start></config>"
        );
    }

    #[test]
    fn test_signature_without_value_gains_attribute() {
        assert_eq!(
            upsert(r#"<config><start name="app"><signature/></start></config>"#, "app", "S"),
            r#"<config><start name="app"><signature value="S"/></start></config>"#
        );
    }

    #[test]
    fn test_upsert_is_idempotent() {
        let xml = "<config>\n  <start name=\"app\">\n    <binary name=\"app.bin\"/>\n  </start>\n</config>\n";
        let once = upsert(xml, "app.bin", "ABCDEF0123");
        let twice = upsert(&once, "app.bin", "ABCDEF0123");
        assert_eq!(once, twice);
        assert_eq!(twice.matches("<signature").count(), 1);
    }

    #[test]
    fn test_value_survives_reparse_verbatim() {
        let value = "line one\nline \"two\" & <three>\t";
        let signed = upsert(r#"<config><start name="app"/></config>"#, "app", value);
        let doc = roxmltree::Document::parse(&signed).unwrap();
        assert_eq!(find_start(&doc, "app").unwrap().signature_value(), Some(value));
    }

    #[test]
    fn test_qualified_name_and_indent() {
        assert_eq!(qualified_name("<start name=\"a\">", 0), "start");
        assert_eq!(qualified_name("x<start/>", 1), "start");
        assert_eq!(line_indent("\n\n    "), "\n    ");
        assert_eq!(line_indent("text\n  "), "");
    }
}
