use std::collections::BTreeMap;

use dg_core::{DialogueError, SourceLocation, SourceSpan};
use roxmltree::{Document, Node, NodeType};

#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    pub root: XmlElementNode,
}

#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElementNode),
    Text(XmlTextNode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct XmlElementNode {
    pub name: String,
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<XmlNode>,
    pub location: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct XmlTextNode {
    pub value: String,
    pub location: SourceSpan,
}

impl XmlElementNode {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElementNode> {
        self.children.iter().filter_map(|child| match child {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    /// Direct text children joined and trimmed; nested elements are skipped.
    pub fn own_text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            if let XmlNode::Text(text) = child {
                out.push_str(&text.value);
            }
        }
        out.trim().to_string()
    }
}

pub fn parse_xml_document(source: &str) -> Result<XmlDocument, DialogueError> {
    let document = Document::parse(source)
        .map_err(|error| DialogueError::new("XML_PARSE_ERROR", error.to_string()))?;

    let Some(root) = document.root().children().find(|node| node.is_element()) else {
        return Err(DialogueError::new(
            "XML_PARSE_ERROR",
            "XML document must contain a root element.",
        ));
    };

    Ok(XmlDocument {
        root: parse_element(&document, root),
    })
}

fn parse_element(document: &Document<'_>, node: Node<'_, '_>) -> XmlElementNode {
    let mut attributes = BTreeMap::new();
    for attribute in node.attributes() {
        attributes.insert(attribute.name().to_string(), attribute.value().to_string());
    }

    let mut children = Vec::new();
    for child in node.children() {
        match child.node_type() {
            NodeType::Element => children.push(XmlNode::Element(parse_element(document, child))),
            NodeType::Text => {
                let value = child.text().unwrap_or_default().to_string();
                if value.trim().is_empty() {
                    continue;
                }
                children.push(XmlNode::Text(XmlTextNode {
                    value,
                    location: node_span(document, child.range().start, child.range().end),
                }));
            }
            _ => {}
        }
    }

    XmlElementNode {
        name: node.tag_name().name().to_string(),
        attributes,
        children,
        location: node_span(document, node.range().start, node.range().end),
    }
}

fn node_span(document: &Document<'_>, start: usize, end: usize) -> SourceSpan {
    let start_pos = document.text_pos_at(start);
    let end_pos = document.text_pos_at(end);
    SourceSpan {
        start: SourceLocation {
            line: start_pos.row as usize,
            column: start_pos.col as usize,
        },
        end: SourceLocation {
            line: end_pos.row as usize,
            column: end_pos.col as usize,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_xml_document_builds_tree_with_attributes_and_text() {
        let source = r#"<dialogue name="intro"><entry speaker="A" next="1">Hi</entry></dialogue>"#;
        let document = parse_xml_document(source).expect("xml should parse");
        assert_eq!(document.root.name, "dialogue");
        assert_eq!(document.root.attr("name"), Some("intro"));
        assert_eq!(document.root.children.len(), 1);

        let entry = document
            .root
            .child_elements()
            .next()
            .expect("entry element should exist");
        assert_eq!(entry.name, "entry");
        assert_eq!(entry.attr("speaker"), Some("A"));
        assert_eq!(entry.own_text(), "Hi");
        assert!(matches!(entry.children[0], XmlNode::Text(_)));
        assert!(entry.location.start.line >= 1);
    }

    #[test]
    fn whitespace_only_text_nodes_are_dropped() {
        let source = "<dialogue name=\"d\">\n  <entry speaker=\"A\">x</entry>\n  \n</dialogue>";
        let document = parse_xml_document(source).expect("xml should parse");
        assert_eq!(document.root.children.len(), 1);
    }

    #[test]
    fn own_text_ignores_nested_elements() {
        let source = r#"<entry speaker="A">Pick one<option side="top" next="1">Yes</option></entry>"#;
        let document = parse_xml_document(source).expect("xml should parse");
        assert_eq!(document.root.own_text(), "Pick one");
        assert_eq!(document.root.child_elements().count(), 1);
    }

    #[test]
    fn parse_xml_document_handles_comments_and_cdata() {
        let source = r#"<dialogue name="d"><entry><!--c--><![CDATA[A < B]]></entry></dialogue>"#;
        let document = parse_xml_document(source).expect("xml should parse");
        let entry = document.root.child_elements().next().expect("entry");
        assert_eq!(entry.own_text(), "A < B");
    }

    #[test]
    fn parse_xml_document_returns_parse_error_for_invalid_xml() {
        let error = parse_xml_document("<dialogue>").expect_err("invalid xml should fail");
        assert_eq!(error.code, "XML_PARSE_ERROR");
    }

    #[test]
    fn parse_xml_document_returns_parse_error_when_root_element_is_missing() {
        let error = parse_xml_document("<?xml version=\"1.0\"?><!---->")
            .expect_err("missing root element should fail");
        assert_eq!(error.code, "XML_PARSE_ERROR");
    }
}
