//! Optional start and end tags.
//!
//! The HTML standard lets a serializer leave out some tags when the parser
//! would infer them anyway (<https://html.spec.whatwg.org/#optional-tags>).
//! Whether a tag is implied depends only on the element, its neighbours and
//! its parent, so both checks here are pure functions of a [`Siblings`] view.

use crate::hast::{Element, Node};

/// Where an element sits: its parent's tag and its position among the
/// parent's children.
#[derive(Debug, Clone, Copy)]
pub struct Siblings<'a> {
    /// Tag of the parent element; `None` at a root or for a detached element
    pub parent: Option<&'a str>,
    /// All children of the parent, the element included
    pub children: &'a [Node],
    /// Index of the element in `children`
    pub index: usize,
}

impl<'a> Siblings<'a> {
    /// Position `index` within `children`.
    pub fn new(parent: Option<&'a str>, children: &'a [Node], index: usize) -> Self {
        Self {
            parent,
            children,
            index,
        }
    }

    /// A node with no parent and no siblings.
    pub fn alone(node: &'a Node) -> Self {
        Self::new(None, std::slice::from_ref(node), 0)
    }

    /// An element rendered on its own, outside any tree.
    pub fn detached() -> Self {
        Self::new(None, &[], 0)
    }

    fn at(self, index: usize) -> Self {
        Self { index, ..self }
    }

    /// The next sibling, skipping inter-element whitespace unless asked not to.
    fn after(&self, include_whitespace: bool) -> Option<&'a Node> {
        self.children
            .get(self.index + 1..)
            .unwrap_or_default()
            .iter()
            .find(|n| include_whitespace || !is_whitespace(n))
    }

    /// The previous sibling (and its index), skipping inter-element whitespace.
    fn before(&self) -> Option<(usize, &'a Node)> {
        self.children
            .get(..self.index)
            .unwrap_or_default()
            .iter()
            .enumerate()
            .rev()
            .find(|(_, n)| !is_whitespace(n))
    }
}

/// First child of `element`, the same way [`Siblings::after`] looks ahead.
fn first_child(element: &Element, include_whitespace: bool) -> Option<&Node> {
    element
        .children
        .iter()
        .find(|n| include_whitespace || !is_whitespace(n))
}

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0C')
}

/// Inter-element whitespace: a text node made of spaces only (or nothing).
fn is_whitespace(node: &Node) -> bool {
    matches!(node, Node::Text(t) if t.chars().all(is_space))
}

fn starts_with_whitespace(node: &Node) -> bool {
    matches!(node, Node::Text(t) if t.starts_with(is_space))
}

fn is_one_of(node: &Node, tags: &[&str]) -> bool {
    tags.iter().any(|tag| node.is_element_named(tag))
}

/// What has to follow an element for its end tag to be implied.
#[derive(Debug, Clone, Copy)]
enum Closing {
    /// Anything but a comment or text starting with whitespace
    Boundary,
    /// Nothing, or one of these elements
    LastOr(&'static [&'static str]),
    /// One of these elements
    FollowedBy(&'static [&'static str]),
    /// Nothing at all
    Last,
    /// The `<p>` rule
    Paragraph,
}

const CELLS: &[&str] = &["td", "th"];
const RUBY: &[&str] = &["rp", "rt"];
const DEFINITIONS: &[&str] = &["dt", "dd"];
const TABLE_SECTIONS: &[&str] = &["tbody", "tfoot"];

const CLOSING: &[(&str, Closing)] = &[
    ("html", Closing::Boundary),
    ("head", Closing::Boundary),
    ("body", Closing::Boundary),
    ("colgroup", Closing::Boundary),
    ("caption", Closing::Boundary),
    ("p", Closing::Paragraph),
    ("li", Closing::LastOr(&["li"])),
    ("dt", Closing::FollowedBy(DEFINITIONS)),
    ("dd", Closing::LastOr(DEFINITIONS)),
    ("rt", Closing::LastOr(RUBY)),
    ("rp", Closing::LastOr(RUBY)),
    ("optgroup", Closing::LastOr(&["optgroup"])),
    ("option", Closing::LastOr(&["option", "optgroup"])),
    ("menuitem", Closing::LastOr(&["menuitem", "hr", "menu"])),
    ("thead", Closing::FollowedBy(TABLE_SECTIONS)),
    ("tbody", Closing::LastOr(TABLE_SECTIONS)),
    ("tfoot", Closing::Last),
    ("tr", Closing::LastOr(&["tr"])),
    ("td", Closing::LastOr(CELLS)),
    ("th", Closing::LastOr(CELLS)),
];

/// Elements whose start implicitly closes an open `<p>`.
const CLOSES_PARAGRAPH: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "details",
    "div",
    "dl",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hgroup",
    "hr",
    "main",
    "menu",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "ul",
];

/// Parents in which a trailing `</p>` must stay.
const KEEPS_PARAGRAPH_OPEN: &[&str] = &["a", "audio", "del", "ins", "map", "noscript", "video"];

/// Returns true if the end tag of `element` can be left out.
pub fn closing(element: &Element, siblings: Siblings<'_>) -> bool {
    let Some((_, rule)) = CLOSING
        .iter()
        .find(|(tag, _)| element.tag.eq_ignore_ascii_case(tag))
    else {
        return false;
    };

    match *rule {
        Closing::Boundary => siblings
            .after(true)
            .is_none_or(|next| !next.is_comment() && !starts_with_whitespace(next)),
        Closing::LastOr(tags) => siblings.after(false).is_none_or(|next| is_one_of(next, tags)),
        Closing::FollowedBy(tags) => siblings.after(false).is_some_and(|next| is_one_of(next, tags)),
        Closing::Last => siblings.after(false).is_none(),
        Closing::Paragraph => match siblings.after(false) {
            Some(next) => is_one_of(next, CLOSES_PARAGRAPH),
            None => siblings.parent.is_none_or(|parent| {
                !KEEPS_PARAGRAPH_OPEN
                    .iter()
                    .any(|tag| parent.eq_ignore_ascii_case(tag))
            }),
        },
    }
}

type OpeningRule = fn(&Element, Siblings<'_>) -> bool;

const OPENING: &[(&str, OpeningRule)] = &[
    ("html", html_opening),
    ("head", head_opening),
    ("body", body_opening),
    ("colgroup", colgroup_opening),
    ("tbody", tbody_opening),
];

/// Returns true if the start tag of `element` can be left out.
///
/// Only meaningful for elements without attributes; the caller checks that.
pub fn opening(element: &Element, siblings: Siblings<'_>) -> bool {
    OPENING
        .iter()
        .find(|(tag, _)| element.tag.eq_ignore_ascii_case(tag))
        .is_some_and(|(_, rule)| rule(element, siblings))
}

fn html_opening(element: &Element, _: Siblings<'_>) -> bool {
    first_child(element, false).is_none_or(|head| !head.is_comment())
}

fn head_opening(element: &Element, _: Siblings<'_>) -> bool {
    let mut seen_title = false;
    let mut seen_base = false;
    for child in &element.children {
        let seen = if child.is_element_named("title") {
            &mut seen_title
        } else if child.is_element_named("base") {
            &mut seen_base
        } else {
            continue;
        };
        if *seen {
            return false;
        }
        *seen = true;
    }
    !element.children.is_empty()
}

fn body_opening(element: &Element, _: Siblings<'_>) -> bool {
    first_child(element, true).is_none_or(|head| {
        !head.is_comment()
            && !starts_with_whitespace(head)
            && !is_one_of(head, &["meta", "link", "script", "style", "template"])
    })
}

fn colgroup_opening(element: &Element, siblings: Siblings<'_>) -> bool {
    if previous_end_omitted(siblings, &["colgroup"]) {
        return false;
    }
    first_child(element, true).is_some_and(|head| head.is_element_named("col"))
}

fn tbody_opening(element: &Element, siblings: Siblings<'_>) -> bool {
    if previous_end_omitted(siblings, &["thead", "tbody"]) {
        return false;
    }
    first_child(element, false).is_some_and(|head| head.is_element_named("tr"))
}

/// A previous sibling of one of `tags` whose own end tag was left out: its
/// section is still open, so this start tag is needed to separate them.
fn previous_end_omitted(siblings: Siblings<'_>, tags: &[&str]) -> bool {
    let Some((index, Node::Element(previous))) = siblings.before() else {
        return false;
    };
    is_one_of(&siblings.children[index], tags) && closing(previous, siblings.at(index))
}

// =============================================================================
// Tests
// =============================================================================
