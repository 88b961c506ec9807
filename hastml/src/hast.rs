//! HAST node types.
//!
//! A HAST tree is the generic syntax tree shape used by HTML processing
//! pipelines: a root holding children, elements with a tag name, an ordered
//! attribute list and children, and leaf nodes carrying a string payload.
//!
//! Trees are plain owned data. The serializer only ever borrows them.
//!
//! # Example
//!
//! ```rust
//! use hastml::{AttrValue, Element, Node};
//!
//! let mut p = Element::new("p").with_attr("class", AttrValue::space_list(["lead", "intro"]));
//! p.push_text("Hello & welcome");
//!
//! let root = Node::root(vec![Node::doctype("html"), p.into()]);
//! assert_eq!(root.text_content(), "Hello & welcome");
//! ```

/// A node in a HAST tree.
#[derive(Debug, Clone, PartialEq, Eq, facet::Facet)]
#[repr(u8)]
pub enum Node {
    /// Document or fragment root; renders only its children
    Root(Root),
    /// An element node
    Element(Element),
    /// A text node
    Text(String),
    /// A comment node (payload is emitted verbatim)
    Comment(String),
    /// A doctype node (payload is the doctype name, usually `html`)
    Doctype(String),
    /// Trusted markup, emitted verbatim only when dangerous HTML is allowed
    Raw(String),
}

impl Node {
    /// Create a root node from a list of children.
    pub fn root(children: Vec<Node>) -> Self {
        Node::Root(Root { children })
    }

    /// Create a text node.
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text(value.into())
    }

    /// Create a comment node.
    pub fn comment(value: impl Into<String>) -> Self {
        Node::Comment(value.into())
    }

    /// Create a doctype node.
    pub fn doctype(name: impl Into<String>) -> Self {
        Node::Doctype(name.into())
    }

    /// Create a raw markup node.
    pub fn raw(value: impl Into<String>) -> Self {
        Node::Raw(value.into())
    }

    /// Returns true if this is a comment node.
    pub fn is_comment(&self) -> bool {
        matches!(self, Node::Comment(_))
    }

    /// Get as element reference.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Children of this node; leaf nodes have none.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Root(r) => &r.children,
            Node::Element(e) => &e.children,
            Node::Text(_) | Node::Comment(_) | Node::Doctype(_) | Node::Raw(_) => &[],
        }
    }

    /// Returns true if this is an element with the given tag name.
    pub fn is_element_named(&self, tag: &str) -> bool {
        matches!(self, Node::Element(e) if e.tag.eq_ignore_ascii_case(tag))
    }

    /// Get text content of this node and all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(node: &Node, out: &mut String) {
    match node {
        Node::Text(t) => out.push_str(t),
        Node::Root(_) | Node::Element(_) => {
            for child in node.children() {
                collect_text(child, out);
            }
        }
        Node::Comment(_) | Node::Doctype(_) | Node::Raw(_) => {}
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<Root> for Node {
    fn from(root: Root) -> Self {
        Node::Root(root)
    }
}

/// A document or fragment root.
#[derive(Debug, Clone, Default, PartialEq, Eq, facet::Facet)]
pub struct Root {
    /// Child nodes
    pub children: Vec<Node>,
}

/// The value of one attribute.
#[derive(Debug, Clone, PartialEq, Eq, facet::Facet)]
#[repr(u8)]
pub enum AttrValue {
    /// `true` is a valueless (boolean) attribute, `false` means "not set"
    Bool(bool),
    /// A plain string value
    Str(String),
    /// Tokens joined with a single space, like `class`
    SpaceList(Vec<String>),
    /// Tokens joined with commas, like `srcset` or `accept`
    CommaList(Vec<String>),
}

impl AttrValue {
    /// Build a space-separated token list.
    pub fn space_list<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AttrValue::SpaceList(tokens.into_iter().map(Into::into).collect())
    }

    /// Build a comma-separated token list.
    pub fn comma_list<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AttrValue::CommaList(tokens.into_iter().map(Into::into).collect())
    }

    /// Returns the string value, if this is a plain string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Str(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Str(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

/// A single `name=value` pair.
#[derive(Debug, Clone, PartialEq, Eq, facet::Facet)]
pub struct Attribute {
    /// Attribute name, as written
    pub name: String,
    /// Attribute value
    pub value: AttrValue,
}

/// An ordered collection of attributes.
///
/// Insertion order is kept and is the order attributes are serialized in.
#[derive(Debug, Clone, Default, PartialEq, Eq, facet::Facet)]
pub struct Attributes {
    entries: Vec<Attribute>,
}

impl Attributes {
    /// Create a new empty attribute collection.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Create from an iterator of (name, value) pairs.
    /// Enforces first-wins: if a name appears multiple times, only the first is kept.
    pub fn collect_from<I, N, V>(iter: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<AttrValue>,
    {
        let mut attrs = Self::new();
        for (name, value) in iter {
            attrs.set_if_missing(name, value);
        }
        attrs
    }

    /// Get an attribute value by name.
    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.entries
            .iter()
            .find(|a| a.name == name)
            .map(|a| &a.value)
    }

    /// Set an attribute value. An existing attribute keeps its position.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        let name = name.into();
        let value = value.into();
        if let Some(attr) = self.entries.iter_mut().find(|a| a.name == name) {
            attr.value = value;
        } else {
            self.entries.push(Attribute { name, value });
        }
    }

    /// Set an attribute only if it doesn't already exist (first-wins semantics).
    pub fn set_if_missing(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        let name = name.into();
        if !self.contains(&name) {
            self.entries.push(Attribute {
                name,
                value: value.into(),
            });
        }
    }

    /// Check if an attribute exists.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|a| a.name == name)
    }

    /// Iterate over all attributes in order.
    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.entries.iter()
    }

    /// Get the number of attributes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no attributes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// An HTML (or SVG) element.
#[derive(Debug, Clone, Default, PartialEq, Eq, facet::Facet)]
pub struct Element {
    /// The tag name, written out as-is
    pub tag: String,
    /// Attributes in serialization order
    pub attrs: Attributes,
    /// Child nodes
    pub children: Vec<Node>,
}

impl Element {
    /// Create a new element with the given tag name.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Attributes::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style [`Element::set_attr`].
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder-style [`Element::push_child`].
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.push_child(child.into());
        self
    }

    /// Builder-style [`Element::push_text`].
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.push_text(text);
        self
    }

    /// Get an attribute value.
    pub fn get_attr(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.get(name)
    }

    /// Set an attribute value.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        self.attrs.set(name, value);
    }

    /// Add a child node.
    pub fn push_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Add a text child.
    pub fn push_text(&mut self, text: impl Into<String>) {
        self.push_child(Node::Text(text.into()));
    }

    /// Custom elements are the ones with a hyphen in their name (`my-widget`).
    pub fn is_custom(&self) -> bool {
        self.tag.contains('-')
    }

    /// Get text content of this element and all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            collect_text(child, &mut out);
        }
        out
    }
}

// =============================================================================
// Tests
// =============================================================================
