//! Namespace-resolved element tree built on `quick-xml`'s `NsReader`.
//!
//! Feeds are small enough to hold in memory, and every format variant needs
//! the same three queries: "child by local name and namespace", "all such
//! children", and "attribute by name". [`Element`] answers them so the
//! extractor never touches raw XML events.
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;
use thiserror::Error;

/// Maximum element nesting depth. Real feeds nest a handful of levels; this
/// bounds the recursion in `Drop` and `Clone` for hostile documents.
const MAX_DEPTH: usize = 256;

/// Errors produced while building the element tree.
#[derive(Debug, Error)]
pub enum XmlError {
    /// The underlying reader rejected the input.
    #[error("{0}")]
    Syntax(String),
    /// Input ended before any element was found.
    #[error("no root element found")]
    NoRoot,
    /// Input ended while an element was still open.
    #[error("unclosed element <{0}>")]
    Unclosed(String),
    /// An element or text appeared after the root element closed.
    #[error("junk after document element: {0}")]
    TrailingContent(String),
    /// An element used a namespace prefix that was never declared.
    #[error("unbound namespace prefix: {0}")]
    UnboundPrefix(String),
    /// Elements are nested deeper than [`MAX_DEPTH`].
    #[error("nesting depth exceeds maximum of {0} levels")]
    MaxDepthExceeded(usize),
}

/// One XML element with its resolved namespace, attributes, direct text and
/// child elements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    namespace: Option<String>,
    local_name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    /// Namespace URI the element is bound to, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Tag in Clark notation: `{uri}local` when namespaced, `local` otherwise.
    pub fn tag(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{{{}}}{}", ns, self.local_name),
            None => self.local_name.clone(),
        }
    }

    /// Attribute value by its name as written in the document (`href`, `xml:lang`).
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Text that appears directly inside this element before its first child.
    pub fn text(&self) -> &str {
        &self.text
    }

    fn is(&self, namespace: Option<&str>, local_name: &str) -> bool {
        self.local_name == local_name && self.namespace.as_deref() == namespace
    }

    /// First child with the given local name in the given namespace
    /// (`None` matches only un-namespaced children).
    pub fn find(&self, namespace: Option<&str>, local_name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.is(namespace, local_name))
    }

    /// All children with the given local name and namespace, in document order.
    pub fn find_all<'a>(
        &'a self,
        namespace: Option<&'a str>,
        local_name: &'a str,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self.children
            .iter()
            .filter(move |c| c.is(namespace, local_name))
    }

    /// Trimmed text of the first matching child, or `""` when the child is
    /// missing or blank.
    pub fn find_text(&self, namespace: Option<&str>, local_name: &str) -> &str {
        self.find(namespace, local_name)
            .map(|c| c.text.trim())
            .unwrap_or("")
    }
}

/// Parses a complete XML document and returns its root element.
///
/// # Errors
///
/// Returns [`XmlError`] when the document is not well-formed: reader syntax
/// errors, mismatched or unclosed tags, undeclared prefixes, no root, or
/// content after the root element.
///
/// # Security
///
/// `quick-xml` (0.37) does not expand `<!ENTITY>` declarations; only the five
/// predefined entities and character references are resolved. Custom entity
/// references surface as a syntax error.
pub fn parse_document(text: &str) -> Result<Element, XmlError> {
    let mut reader = NsReader::from_str(text);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let result = reader.read_resolved_event();
        let (resolved, event) = result.map_err(|e| XmlError::Syntax(e.to_string()))?;
        let namespace = match resolved {
            ResolveResult::Bound(ns) => Some(String::from_utf8_lossy(ns.as_ref()).into_owned()),
            ResolveResult::Unbound => None,
            ResolveResult::Unknown(prefix) => {
                return Err(XmlError::UnboundPrefix(
                    String::from_utf8_lossy(&prefix).into_owned(),
                ))
            }
        };

        match event {
            Event::Start(e) => {
                let element = new_element(&e, namespace, &reader);
                if root.is_some() {
                    return Err(XmlError::TrailingContent(format!("<{}>", element.local_name)));
                }
                if stack.len() >= MAX_DEPTH {
                    return Err(XmlError::MaxDepthExceeded(MAX_DEPTH));
                }
                stack.push(element);
            }
            Event::Empty(e) => {
                let element = new_element(&e, namespace, &reader);
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                // End names are checked by the reader, so the stack can't underflow
                // on well-formed input; treat a stray end tag as a syntax error anyway.
                let element = stack
                    .pop()
                    .ok_or_else(|| XmlError::Syntax("unexpected closing tag".to_owned()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(t) => {
                let text = t.unescape().map_err(|e| XmlError::Syntax(e.to_string()))?;
                push_text(&mut stack, &text)?;
            }
            Event::CData(c) => {
                push_text(&mut stack, &String::from_utf8_lossy(&c))?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(XmlError::Unclosed(open.local_name));
    }
    root.ok_or(XmlError::NoRoot)
}

fn new_element(
    start: &BytesStart<'_>,
    namespace: Option<String>,
    reader: &NsReader<&[u8]>,
) -> Element {
    let mut attributes = Vec::new();

    for attr_result in start.attributes() {
        let attr = match attr_result {
            Ok(attr) => attr,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed XML attribute");
                continue;
            }
        };
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        match attr.decode_and_unescape_value(reader.decoder()) {
            Ok(value) => attributes.push((key, value.into_owned())),
            Err(e) => {
                tracing::warn!(attribute = %key, error = %e, "Skipping undecodable XML attribute");
            }
        }
    }

    Element {
        namespace,
        local_name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
        attributes,
        text: String::new(),
        children: Vec::new(),
    }
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), XmlError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(XmlError::TrailingContent(format!("<{}>", element.local_name)));
        }
    }
    Ok(())
}

fn push_text(stack: &mut [Element], text: &str) -> Result<(), XmlError> {
    match stack.last_mut() {
        // Only text before the first child belongs to the element; later
        // runs are the tail of a child and are dropped.
        Some(current) if current.children.is_empty() => current.text.push_str(text),
        Some(_) => {}
        // Whitespace around the root element is insignificant
        None if text.trim().is_empty() => {}
        None => return Err(XmlError::TrailingContent(text.trim().to_owned())),
    }
    Ok(())
}
