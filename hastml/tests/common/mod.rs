//! Test support: parse HTML with html5ever and convert the result to HAST,
//! so serialized output can be checked against what a real parser reads.

#![allow(dead_code)]

use hastml::{Element, Node};
use html5ever::tendril::TendrilSink;
use html5ever::{ParseOpts, parse_document};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Parse a full document into a HAST root.
pub fn parse(html: &str) -> Node {
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(html);
    Node::root(convert_children(&dom.document))
}

/// Find the first element named `tag`, depth-first.
pub fn find<'a>(node: &'a Node, tag: &str) -> Option<&'a Element> {
    if let Node::Element(element) = node
        && element.tag == tag
    {
        return Some(element);
    }
    node.children().iter().find_map(|child| find(child, tag))
}

fn convert_children(handle: &Handle) -> Vec<Node> {
    handle.children.borrow().iter().filter_map(convert).collect()
}

fn convert(handle: &Handle) -> Option<Node> {
    match &handle.data {
        NodeData::Document => Some(Node::root(convert_children(handle))),
        NodeData::Doctype { name, .. } => Some(Node::doctype(name.to_string())),
        NodeData::Text { contents } => Some(Node::text(contents.borrow().to_string())),
        NodeData::Comment { contents } => Some(Node::comment(contents.to_string())),
        NodeData::Element {
            name,
            attrs,
            template_contents,
            ..
        } => {
            let mut element = Element::new(name.local.to_string());
            for attr in attrs.borrow().iter() {
                element
                    .attrs
                    .set_if_missing(attr.name.local.to_string(), attr.value.to_string());
            }
            // Template children live in a separate fragment.
            let content = template_contents
                .borrow()
                .clone()
                .unwrap_or_else(|| handle.clone());
            element.children = convert_children(&content);
            Some(element.into())
        }
        NodeData::ProcessingInstruction { .. } => None,
    }
}
