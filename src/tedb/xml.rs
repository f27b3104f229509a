//! Minimal XML element tree for TEDB replies.
//!
//! Namespace prefixes are stripped: `ns2:vatRateResults` becomes
//! `vatRateResults`. Attributes are not kept; TEDB carries everything the
//! mapper reads in element text.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::FetchError;

/// An XML element with its local name, concatenated text, and children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    /// Local element name.
    pub name: String,
    /// Text content directly inside this element.
    pub text: String,
    /// Child elements in document order.
    pub children: Vec<XmlNode>,
}

const DOCUMENT_NODE: &str = "#document";

/// Deepest element nesting accepted. TEDB replies stay under ten levels.
const MAX_DEPTH: usize = 64;

impl XmlNode {
    /// Create an element without text or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Parse an XML string into a tree rooted at a synthetic `#document` node.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Malformed` when the input is not well-formed, has
    /// no root element, or nests elements more than 64 levels deep.
    pub fn parse(xml: &str) -> Result<Self, FetchError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack = vec![XmlNode::new(DOCUMENT_NODE)];

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    // The synthetic document node sits at the bottom of the stack.
                    if stack.len() > MAX_DEPTH {
                        return Err(FetchError::Malformed(format!(
                            "elements nested deeper than {MAX_DEPTH} levels"
                        )));
                    }
                    stack.push(XmlNode::new(local_name(e)));
                }
                Ok(Event::Empty(ref e)) => attach(&mut stack, XmlNode::new(local_name(e)))?,
                Ok(Event::Text(ref e)) => {
                    let text = e
                        .unescape()
                        .map_err(|e| FetchError::Malformed(format!("XML text error: {e}")))?;
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&text);
                    }
                }
                Ok(Event::CData(e)) => {
                    let raw = e.into_inner();
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&String::from_utf8_lossy(&raw));
                    }
                }
                Ok(Event::End(_)) => {
                    let node = stack
                        .pop()
                        .ok_or_else(|| FetchError::Malformed("unbalanced end tag".into()))?;
                    attach(&mut stack, node)?;
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(FetchError::Malformed(format!(
                        "XML parse error at byte {}: {e}",
                        reader.error_position()
                    )));
                }
                _ => {}
            }
        }

        if stack.len() != 1 {
            return Err(FetchError::Malformed(
                "unexpected end of document inside an element".into(),
            ));
        }
        let document = stack.pop().unwrap_or_default();
        if document.children.is_empty() {
            return Err(FetchError::Malformed("document has no root element".into()));
        }
        Ok(document)
    }

    /// First child with the given local name.
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All children with the given local name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Follow a path of local names through first-matching children.
    pub fn find(&self, path: &[&str]) -> Option<&XmlNode> {
        path.iter().try_fold(self, |node, name| node.child(name))
    }

    /// Trimmed, non-empty text at `path`.
    pub fn text_at(&self, path: &[&str]) -> Option<&str> {
        self.find(path)
            .map(|n| n.text.trim())
            .filter(|t| !t.is_empty())
    }
}

fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn attach(stack: &mut [XmlNode], node: XmlNode) -> Result<(), FetchError> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(node);
            Ok(())
        }
        None => Err(FetchError::Malformed(format!(
            "element '{}' outside the document",
            node.name
        ))),
    }
}
