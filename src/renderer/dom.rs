//! Display surface: an owned DOM-like node tree
//!
//! The surface plays the role of the page's map container. Rendered objects
//! are attached as top-level elements and addressed through the
//! [`NodeHandle`] returned by [`Surface::attach`], never by searching the
//! tree for an id.

use std::collections::BTreeMap;

/// A node in the element tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    /// Plain text content, escaped on output
    Text(String),
}

/// An element with ordered attributes, inline styles and children
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    styles: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    /// Create an empty element
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: vec![],
            styles: vec![],
            children: vec![],
        }
    }

    pub fn with_id(self, id: impl Into<String>) -> Self {
        self.with_attr("id", id)
    }

    pub fn with_class(self, class: impl Into<String>) -> Self {
        self.with_attr("class", class)
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_style(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_style(name, value);
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Set an attribute, replacing an existing value in place
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        set_entry(&mut self.attributes, name.into(), value.into());
    }

    /// Set an inline style property, replacing an existing value in place
    pub fn set_style(&mut self, name: impl Into<String>, value: impl Into<String>) {
        set_entry(&mut self.styles, name.into(), value.into());
    }

    pub fn push_child(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        get_entry(&self.attributes, name)
    }

    pub fn style(&self, name: &str) -> Option<&str> {
        get_entry(&self.styles, name)
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Child elements, skipping text nodes
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// Follow a path of child-node indices from this element
    pub fn descendant(&self, path: &[usize]) -> Option<&Element> {
        let mut current = self;
        for &index in path {
            match current.children.get(index)? {
                Node::Element(e) => current = e,
                Node::Text(_) => return None,
            }
        }
        Some(current)
    }

    /// Mutable variant of [`Element::descendant`]
    pub fn descendant_mut(&mut self, path: &[usize]) -> Option<&mut Element> {
        let mut current = self;
        for &index in path {
            match current.children.get_mut(index)? {
                Node::Element(e) => current = e,
                Node::Text(_) => return None,
            }
        }
        Some(current)
    }

    /// Remove the direct child element with the given id
    pub fn remove_child(&mut self, id: &str) -> Option<Element> {
        let index = self
            .children
            .iter()
            .position(|node| matches!(node, Node::Element(e) if e.id() == Some(id)))?;
        match self.children.remove(index) {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        }
    }

    /// Depth-first search for an element with the given id
    pub fn find(&self, id: &str) -> Option<&Element> {
        if self.id() == Some(id) {
            return Some(self);
        }
        self.child_elements().find_map(|child| child.find(id))
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        for node in &self.children {
            match node {
                Node::Text(t) => text.push_str(t),
                Node::Element(e) => text.push_str(&e.text_content()),
            }
        }
        text
    }

    /// Serialize this element as HTML
    pub fn to_html(&self, pretty: bool) -> String {
        let mut out = String::new();
        self.write_html(&mut out, 0, pretty);
        out
    }

    fn write_html(&self, out: &mut String, depth: usize, pretty: bool) {
        let indent = if pretty { "  ".repeat(depth) } else { String::new() };
        let nl = if pretty { "\n" } else { "" };

        out.push_str(&indent);
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attributes {
            out.push_str(&format!(r#" {}="{}""#, name, escape_html(value)));
        }
        if !self.styles.is_empty() {
            let style = self
                .styles
                .iter()
                .map(|(k, v)| format!("{}: {}", k, v))
                .collect::<Vec<_>>()
                .join("; ");
            out.push_str(&format!(r#" style="{}""#, escape_html(&style)));
        }

        if is_void(&self.tag) {
            out.push_str("/>");
            out.push_str(nl);
            return;
        }

        let inline = self.children.iter().all(|n| matches!(n, Node::Text(_)));
        if inline {
            out.push('>');
            out.push_str(&escape_html(&self.text_content()));
        } else {
            out.push('>');
            out.push_str(nl);
            for node in &self.children {
                match node {
                    Node::Element(e) => e.write_html(out, depth + 1, pretty),
                    Node::Text(t) => {
                        if pretty {
                            out.push_str(&"  ".repeat(depth + 1));
                        }
                        out.push_str(&escape_html(t));
                        out.push_str(nl);
                    }
                }
            }
            out.push_str(&indent);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
        out.push_str(nl);
    }
}

/// Owned reference to an element attached to a [`Surface`]
///
/// Handles are neither `Clone` nor `Copy`: detaching consumes the handle, so
/// a detached node cannot be addressed again.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct NodeHandle(u64);

/// The map container that rendered objects are attached to
#[derive(Debug)]
pub struct Surface {
    id: String,
    // keys only grow, so iteration order is attach order
    nodes: BTreeMap<u64, Element>,
    next: u64,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new("map")
    }
}

impl Surface {
    /// Create an empty surface with the given container id
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            nodes: BTreeMap::new(),
            next: 0,
        }
    }

    /// Attach a top-level element and return its handle
    pub fn attach(&mut self, element: Element) -> NodeHandle {
        let key = self.next;
        self.next += 1;
        self.nodes.insert(key, element);
        NodeHandle(key)
    }

    /// Detach an element, returning it if it was still attached
    pub fn detach(&mut self, handle: NodeHandle) -> Option<Element> {
        self.nodes.remove(&handle.0)
    }

    pub fn get(&self, handle: &NodeHandle) -> Option<&Element> {
        self.nodes.get(&handle.0)
    }

    pub fn get_mut(&mut self, handle: &NodeHandle) -> Option<&mut Element> {
        self.nodes.get_mut(&handle.0)
    }

    /// Number of attached top-level elements
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Attached top-level elements in attach order
    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.nodes.values()
    }

    /// Count top-level elements carrying the given id
    pub fn count_id(&self, id: &str) -> usize {
        self.nodes.values().filter(|e| e.id() == Some(id)).count()
    }

    /// Search all attached trees for an element id
    pub fn find(&self, id: &str) -> Option<&Element> {
        self.nodes.values().find_map(|e| e.find(id))
    }

    /// Serialize the container and all attached elements as HTML
    pub fn to_html(&self, pretty: bool) -> String {
        let nl = if pretty { "\n" } else { "" };
        let mut out = format!(r#"<div id="{}">{}"#, escape_html(&self.id), nl);
        for element in self.nodes.values() {
            element.write_html(&mut out, 1, pretty);
        }
        out.push_str("</div>");
        out.push_str(nl);
        out
    }
}

fn set_entry(entries: &mut Vec<(String, String)>, name: String, value: String) {
    match entries.iter_mut().find(|(k, _)| *k == name) {
        Some(entry) => entry.1 = value,
        None => entries.push((name, value)),
    }
}

fn get_entry<'a>(entries: &'a [(String, String)], name: &str) -> Option<&'a str> {
    entries
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

fn is_void(tag: &str) -> bool {
    matches!(tag, "img" | "br" | "hr" | "line" | "polygon")
}

/// Escape special HTML characters
pub(crate) fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
