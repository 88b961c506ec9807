//! HAST to HTML serializer.
//!
//! Walks a tree depth-first and writes markup for every node:
//!
//! - Void elements never get end tags or children
//! - Text, attribute names and attribute values are escaped for the exact
//!   context they land in (see [`crate::escape`])
//! - Raw text elements (script, style) are not escaped
//! - Optional start and end tags can be left out
//! - Inside `<svg>`, childless elements can use self-closing syntax
//!
//! The walk keeps its own stack, so tree depth is limited by memory rather
//! than by the call stack.

use std::borrow::Cow;
use std::fmt::{self, Write};

use crate::escape::{CharClass, escape_into, needs_escape};
use crate::hast::{AttrValue, Element, Node};
use crate::omission::{self, Siblings};
use crate::tracing_macros::{debug, trace};
use crate::{Config, Options, SerializeError};

/// Serialize a tree to an HTML string.
///
/// Validates `options` first; an invalid quote is reported before anything
/// is rendered.
///
/// ```rust
/// use hastml::{Element, Node, Options, to_html};
///
/// let img = Node::from(Element::new("img").with_attr("src", "a.png"));
/// assert_eq!(to_html(&img, &Options::default()).unwrap(), r#"<img src="a.png">"#);
/// ```
pub fn to_html(node: &Node, options: &Options) -> Result<String, SerializeError> {
    let config = options.clone().build()?;
    Ok(config.render(node))
}

/// Raw text elements - content is not escaped.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

fn is_raw_text_element(tag: &str) -> bool {
    RAW_TEXT_ELEMENTS.iter().any(|t| t.eq_ignore_ascii_case(tag))
}

/// Which set of element rules applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Space {
    Html,
    Svg,
}

/// How a rendered attribute ends, which decides what may directly follow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ending {
    /// A bare name (boolean attribute)
    Name,
    /// An unquoted value; a following `/` or quote would become part of it
    Unquoted,
    /// A closing quote
    Quoted,
}

/// One pending unit of work.
enum Step<'a> {
    /// Write a node (and schedule its children)
    Open {
        node: &'a Node,
        siblings: Siblings<'a>,
        space: Space,
    },
    /// Write the end tag of an element whose children are done
    Close {
        element: &'a Element,
        siblings: Siblings<'a>,
        space: Space,
    },
}

impl Config {
    /// Render `node` and its descendants to a string.
    pub fn render(&self, node: &Node) -> String {
        let mut out = String::new();
        let _ = self.render_into(node, &mut out);
        out
    }

    /// Render `node` and its descendants into `out`.
    pub fn render_into<W: Write>(&self, node: &Node, out: &mut W) -> fmt::Result {
        debug!(quote = %self.quote(), omit = self.omit_optional_tags(), "rendering tree");
        let mut ser = Serializer::new(out, self);
        ser.write_tree(node)
    }
}

struct Serializer<'a, W: Write> {
    out: &'a mut W,
    config: &'a Config,
}

impl<'a, W: Write> Serializer<'a, W> {
    fn new(out: &'a mut W, config: &'a Config) -> Self {
        Self { out, config }
    }

    fn write_tree(&mut self, node: &Node) -> fmt::Result {
        let stack = vec![Step::Open {
            node,
            siblings: Siblings::alone(node),
            space: Space::Html,
        }];
        self.run(stack)
    }

    fn write_detached(&mut self, element: &Element) -> fmt::Result {
        let mut stack = Vec::new();
        self.open_element(&mut stack, element, Siblings::detached(), Space::Html)?;
        self.run(stack)
    }

    fn run<'n>(&mut self, mut stack: Vec<Step<'n>>) -> fmt::Result {
        while let Some(step) = stack.pop() {
            match step {
                Step::Open {
                    node,
                    siblings,
                    space,
                } => match node {
                    Node::Root(root) => push_children(&mut stack, None, &root.children, space),
                    Node::Element(element) => {
                        self.open_element(&mut stack, element, siblings, space)?
                    }
                    Node::Text(text) => self.write_text(text, siblings.parent)?,
                    Node::Comment(text) => write!(self.out, "<!--{text}-->")?,
                    Node::Doctype(name) => self.write_doctype(name)?,
                    Node::Raw(html) => self.write_raw(html)?,
                },
                Step::Close {
                    element,
                    siblings,
                    space,
                } => self.close_element(element, siblings, space)?,
            }
        }
        Ok(())
    }

    fn open_element<'n>(
        &mut self,
        stack: &mut Vec<Step<'n>>,
        element: &'n Element,
        siblings: Siblings<'n>,
        space: Space,
    ) -> fmt::Result {
        let space = if space == Space::Html && element.tag.eq_ignore_ascii_case("svg") {
            Space::Svg
        } else {
            space
        };
        let (void, self_closing) = match space {
            Space::Html => {
                let void = self.config.is_void(&element.tag);
                (void, void && self.config.close_self_closing())
            }
            Space::Svg => {
                let empty = element.children.is_empty();
                (false, empty && self.config.close_empty_elements())
            }
        };

        let (attrs, last) = self.attributes(element, space);

        if !attrs.is_empty() || !self.omits(space) || !omission::opening(element, siblings) {
            write!(self.out, "<{}{}", element.tag, attrs)?;
            if self_closing {
                // An unquoted value would take the slash as part of itself.
                if !self.config.tight_self_closing() || last == Some(Ending::Unquoted) {
                    self.out.write_char(' ')?;
                }
                self.out.write_char('/')?;
            }
            self.out.write_char('>')?;
        } else {
            trace!(tag = %element.tag, "omitted start tag");
        }

        // Void elements never have content, whatever the tree says.
        if void || self_closing {
            return Ok(());
        }

        stack.push(Step::Close {
            element,
            siblings,
            space,
        });
        push_children(stack, Some(&element.tag), &element.children, space);
        Ok(())
    }

    fn close_element(&mut self, element: &Element, siblings: Siblings<'_>, space: Space) -> fmt::Result {
        if self.omits(space) && omission::closing(element, siblings) {
            trace!(tag = %element.tag, "omitted end tag");
            return Ok(());
        }
        write!(self.out, "</{}>", element.tag)
    }

    fn omits(&self, space: Space) -> bool {
        space == Space::Html && self.config.omit_optional_tags()
    }

    /// Render all attributes of `element`, each with its leading separator,
    /// and report how the last one ended.
    fn attributes(&self, element: &Element, space: Space) -> (String, Option<Ending>) {
        let rendered: Vec<(String, Ending)> = element
            .attrs
            .iter()
            .filter_map(|attr| self.attribute(&attr.name, &attr.value, space))
            .collect();

        let last = rendered.last().map(|(_, ending)| *ending);
        let mut out = String::new();
        if element.is_custom() && rendered.len() > 1 {
            for (attr, _) in &rendered {
                out.push('\n');
                out.push_str(self.config.custom_element_indent());
                out.push_str(attr);
            }
            return (out, last);
        }

        let mut previous = None;
        for (attr, ending) in &rendered {
            if !(self.config.tight_attributes() && previous == Some(Ending::Quoted)) {
                out.push(' ');
            }
            out.push_str(attr);
            previous = Some(*ending);
        }
        (out, last)
    }

    /// Render one attribute, or nothing for a `false` value.
    fn attribute(&self, name: &str, value: &AttrValue, space: Space) -> Option<(String, Ending)> {
        let value: Cow<'_, str> = match value {
            AttrValue::Bool(false) => return None,
            AttrValue::Bool(true) => {
                if let Some(bare) = self.config.strip_boolean_mark(name) {
                    return Some(self.bare_name(bare));
                }
                match space {
                    Space::Html if self.config.is_boolean_attribute(name) => {
                        return Some(self.bare_name(name));
                    }
                    Space::Html => Cow::Borrowed(""),
                    Space::Svg => Cow::Borrowed(name),
                }
            }
            AttrValue::Str(value) => Cow::Borrowed(value),
            AttrValue::SpaceList(tokens) => Cow::Owned(tokens.join(" ")),
            AttrValue::CommaList(tokens) => Cow::Owned(tokens.join(self.config.list_separator())),
        };

        let mut out = self.escape(name, CharClass::AttributeName).into_owned();
        out.push('=');
        let ending = self.push_value(&mut out, &value);
        Some((out, ending))
    }

    fn bare_name(&self, name: &str) -> (String, Ending) {
        let name = self.escape(name, CharClass::AttributeName).into_owned();
        (name, Ending::Name)
    }

    /// Append an attribute value, quoted unless it can safely go without.
    fn push_value(&self, out: &mut String, value: &str) -> Ending {
        let config = self.config;
        // A leading quote would open a quoted value when parsed back.
        if config.prefer_unquoted()
            && !value.is_empty()
            && !value.starts_with(['"', '\''])
            && !needs_escape(value, config.forbidden(CharClass::Unquoted))
        {
            out.push_str(value);
            return Ending::Unquoted;
        }

        let quote = config.quote_style();
        out.push(quote.as_char());
        let _ = escape_into(out, value, config.forbidden(quote.class()), config.entities());
        out.push(quote.as_char());
        Ending::Quoted
    }

    fn escape<'s>(&self, text: &'s str, class: CharClass) -> Cow<'s, str> {
        crate::escape(text, class, self.config)
    }

    fn write_text(&mut self, text: &str, parent: Option<&str>) -> fmt::Result {
        match parent {
            Some(tag) if is_raw_text_element(tag) => self.write_raw_text(text, tag),
            _ => self.write_escaped(text),
        }
    }

    fn write_escaped(&mut self, text: &str) -> fmt::Result {
        let config = self.config;
        escape_into(
            &mut *self.out,
            text,
            config.forbidden(CharClass::Text),
            config.entities(),
        )
    }

    /// Write raw text content, optionally escaping script end tags.
    fn write_raw_text(&mut self, text: &str, tag: &str) -> fmt::Result {
        if !(self.config.escape_script_end_tags() && tag.eq_ignore_ascii_case("script")) {
            return self.out.write_str(text);
        }

        // ASCII case-insensitive match on the original bytes keeps the
        // indices aligned with `text`.
        const PATTERN: &[u8] = b"</script";
        let bytes = text.as_bytes();
        let mut last_end = 0;
        let mut i = 0;
        while i + PATTERN.len() <= bytes.len() {
            if bytes[i..i + PATTERN.len()].eq_ignore_ascii_case(PATTERN) {
                self.out.write_str(&text[last_end..i])?;
                self.out.write_str("<\\/")?;
                // Keep the original casing of the tag name.
                last_end = i + 2;
                i += PATTERN.len();
            } else {
                i += 1;
            }
        }
        self.out.write_str(&text[last_end..])
    }

    fn write_doctype(&mut self, name: &str) -> fmt::Result {
        let name = if name.is_empty() { "html" } else { name };
        write!(self.out, "<!doctype {name}>")
    }

    fn write_raw(&mut self, html: &str) -> fmt::Result {
        if self.config.allow_dangerous_html() {
            self.out.write_str(html)
        } else {
            self.write_escaped(html)
        }
    }
}

/// Schedule `children` so the first child is written first.
fn push_children<'n>(
    stack: &mut Vec<Step<'n>>,
    parent: Option<&'n str>,
    children: &'n [Node],
    space: Space,
) {
    stack.extend((0..children.len()).rev().map(|index| Step::Open {
        node: &children[index],
        siblings: Siblings::new(parent, children, index),
        space,
    }));
}

// =============================================================================
// Convenience methods on Node
// =============================================================================

impl Node {
    /// Serialize this node to an HTML string with default options.
    pub fn to_html(&self) -> String {
        Config::default().render(self)
    }

    /// Serialize this node with a prepared configuration.
    pub fn to_html_with(&self, config: &Config) -> String {
        config.render(self)
    }
}

impl Element {
    /// Serialize this element to an HTML string with default options.
    pub fn to_html(&self) -> String {
        self.to_html_with(&Config::default())
    }

    /// Serialize this element with a prepared configuration.
    ///
    /// The element is treated as having no parent and no siblings.
    pub fn to_html_with(&self, config: &Config) -> String {
        let mut out = String::new();
        let _ = Serializer::new(&mut out, config).write_detached(self);
        out
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn render(node: impl Into<Node>, options: Options) -> String {
        options.build().unwrap().render(&node.into())
    }

    #[test]
    fn test_void_elements() {
        let div = Element::new("div")
            .with_child(Element::new("br"))
            .with_child(Element::new("input"));

        assert_eq!(div.to_html(), "<div><br><input></div>");
    }

    #[test]
    fn test_void_element_drops_children() {
        let img = Element::new("img")
            .with_attr("src", "a.png")
            .with_text("ignored")
            .with_child(Element::new("span"));

        assert_eq!(img.to_html(), r#"<img src="a.png">"#);
    }

    #[test]
    fn test_text_escaping() {
        let p = Element::new("p").with_text("<script>alert('xss')</script> & co");

        assert_eq!(
            p.to_html(),
            "<p>&#x3C;script>alert('xss')&#x3C;/script> &amp; co</p>"
        );
    }

    #[test]
    fn test_attribute_escaping() {
        let a = Element::new("a")
            .with_attr("href", "test?a=1&b=2")
            .with_attr("title", "Say \"hello\"");

        assert_eq!(
            a.to_html(),
            r#"<a href="test?a=1&amp;b=2" title="Say &#x22;hello&#x22;"></a>"#
        );
    }

    #[test]
    fn test_raw_text_elements() {
        let script = Element::new("script").with_text("if (a < b && c > d) {}");
        let config = Options::default().no_escape_script_end_tags().build().unwrap();

        assert_eq!(
            script.to_html_with(&config),
            "<script>if (a < b && c > d) {}</script>"
        );
    }

    #[test]
    fn test_script_end_tag_escaping() {
        let script = Element::new("script").with_text("var x = '</SCRIPT>';");

        assert_eq!(script.to_html(), "<script>var x = '<\\/SCRIPT>';</script>");
    }

    #[test]
    fn test_style_is_not_guarded() {
        let style = Element::new("style").with_text("a > b { content: '</script>' }");

        assert_eq!(
            style.to_html(),
            "<style>a > b { content: '</script>' }</style>"
        );
    }

    #[test]
    fn test_comment_is_verbatim() {
        let div = Element::new("div").with_child(Node::comment(" a <b> & c "));

        assert_eq!(div.to_html(), "<div><!-- a <b> & c --></div>");
    }

    #[test]
    fn test_doctype() {
        assert_eq!(Node::doctype("html").to_html(), "<!doctype html>");
        assert_eq!(Node::doctype("").to_html(), "<!doctype html>");
    }

    #[test]
    fn test_root_has_no_wrapper() {
        let root = Node::root(vec![
            Node::doctype("html"),
            Node::text("a"),
            Element::new("b").into(),
        ]);

        assert_eq!(root.to_html(), "<!doctype html>a<b></b>");
    }

    #[test]
    fn test_raw_defaults_to_escaped() {
        let raw = Node::raw("<script>alert(1)</script>");

        assert_eq!(
            raw.to_html(),
            "&#x3C;script>alert(1)&#x3C;/script>"
        );
        assert_eq!(
            render(raw, Options::default().allow_dangerous_html()),
            "<script>alert(1)</script>"
        );
    }

    #[test]
    fn test_raw_inside_script_still_escaped() {
        let script = Element::new("script").with_child(Node::raw("</script><b>"));

        assert_eq!(
            script.to_html(),
            "<script>&#x3C;/script>&#x3C;b></script>"
        );
    }

    #[test]
    fn test_boolean_attributes() {
        let input = Element::new("input")
            .with_attr("disabled", true)
            .with_attr("hidden", false)
            .with_attr("data-x", true);

        assert_eq!(input.to_html(), r#"<input disabled data-x="">"#);
    }

    #[test]
    fn test_boolean_attr_marks() {
        let el = Element::new("div").with_attr("#ref", true);
        assert_eq!(el.to_html(), "<div ref></div>");

        // A marked name with a value is an ordinary attribute.
        let el = Element::new("div").with_attr("#ref", "x");
        assert_eq!(el.to_html(), r##"<div #ref="x"></div>"##);
    }

    #[test]
    fn test_list_values() {
        let img = Element::new("img")
            .with_attr("class", AttrValue::space_list(["a", "b"]))
            .with_attr("srcset", AttrValue::comma_list(["a.png 1x", "b.png 2x"]));

        assert_eq!(
            img.to_html(),
            r#"<img class="a b" srcset="a.png 1x, b.png 2x">"#
        );
        assert_eq!(
            render(img, Options::default().tight_comma_separated_lists()),
            r#"<img class="a b" srcset="a.png 1x,b.png 2x">"#
        );
    }

    #[test]
    fn test_single_quotes() {
        let a = Element::new("a").with_attr("title", "it's \"fine\"");
        let options = Options::default().quote('\'').allow_dangerous_characters();

        assert_eq!(render(a, options), "<a title='it&#x27;s \"fine\"'></a>");
    }

    #[test]
    fn test_prefer_unquoted() {
        let a = Element::new("a")
            .with_attr("href", "/path")
            .with_attr("title", "two words")
            .with_attr("data-empty", "");

        assert_eq!(
            render(a, Options::default().prefer_unquoted()),
            r#"<a href=/path title="two words" data-empty=""></a>"#
        );
    }

    #[test]
    fn test_unquoted_never_starts_with_quote() {
        let options = Options::default()
            .allow_parse_errors()
            .allow_dangerous_characters()
            .prefer_unquoted();

        let div = Element::new("div").with_attr("title", "'x'");
        assert_eq!(render(div, options.clone()), r#"<div title="'x'"></div>"#);
        let div = Element::new("div").with_attr("title", r#""x""#);
        assert_eq!(render(div, options.clone()), r#"<div title="&#x22;x&#x22;"></div>"#);

        // A quote inside an unquoted value is plain text.
        let div = Element::new("div").with_attr("title", "a'b");
        assert_eq!(render(div, options), "<div title=a'b></div>");
    }

    #[test]
    fn test_tight_attributes_keep_space_after_unquoted() {
        let options = Options::default()
            .allow_parse_errors()
            .allow_dangerous_characters()
            .prefer_unquoted()
            .tight_attributes();
        let div = Element::new("div")
            .with_attr("title", "a'")
            .with_attr("id", "b c")
            .with_attr("class", "d");

        assert_eq!(render(div, options), r#"<div title=a' id="b c"class=d></div>"#);
    }

    #[test]
    fn test_tight_attributes() {
        let a = Element::new("a")
            .with_attr("title", "x")
            .with_attr("class", "y")
            .with_attr("hidden", true)
            .with_attr("id", "z");
        let options = Options::default().tight_attributes();

        assert_eq!(render(a, options), r#"<a title="x"class="y"hidden id="z"></a>"#);
    }

    #[test]
    fn test_self_closing() {
        let br = Element::new("br");
        assert_eq!(render(br.clone(), Options::default().close_self_closing()), "<br />");
        assert_eq!(
            render(
                br,
                Options::default().close_self_closing().tight_self_closing()
            ),
            "<br/>"
        );

        // Any unquoted value needs the space, or the slash joins the value.
        let options = Options::default()
            .close_self_closing()
            .tight_self_closing()
            .prefer_unquoted();
        let img = Element::new("img").with_attr("src", "a/");
        assert_eq!(render(img, options.clone()), "<img src=a/ />");
        let img = Element::new("img").with_attr("src", "a.png");
        assert_eq!(render(img, options.clone()), "<img src=a.png />");

        let input = Element::new("input").with_attr("alt", "x y").with_attr("disabled", true);
        assert_eq!(render(input, options.clone()), r#"<input alt="x y" disabled/>"#);
        let input = Element::new("input").with_attr("alt", "x y");
        assert_eq!(render(input, options), r#"<input alt="x y"/>"#);
    }

    #[test]
    fn test_custom_element_attributes() {
        let el = Element::new("my-card")
            .with_attr("title", "a")
            .with_attr("size", "b");
        assert_eq!(el.to_html(), "<my-card\n  title=\"a\"\n  size=\"b\"></my-card>");

        let single = Element::new("my-card").with_attr("title", "a");
        assert_eq!(single.to_html(), r#"<my-card title="a"></my-card>"#);

        let el = Element::new("my-card")
            .with_attr("title", "a")
            .with_attr("size", "b");
        assert_eq!(
            render(el, Options::default().custom_element_indent("\t")),
            "<my-card\n\ttitle=\"a\"\n\tsize=\"b\"></my-card>"
        );
    }

    #[test]
    fn test_svg_space() {
        let svg = Element::new("svg")
            .with_attr("hidden", true)
            .with_child(Element::new("path").with_attr("d", "M0 0"))
            .with_child(Element::new("image"));

        assert_eq!(
            svg.to_html(),
            r#"<svg hidden="hidden"><path d="M0 0"></path><image></image></svg>"#
        );
        assert_eq!(
            render(svg, Options::default().close_empty_elements()),
            r#"<svg hidden="hidden"><path d="M0 0" /><image /></svg>"#
        );
    }

    #[test]
    fn test_omit_optional_tags() {
        let body = Element::new("body")
            .with_child(Element::new("p").with_text("one"))
            .with_child(Element::new("p").with_text("two"))
            .with_child(Element::new("ul").with_child(Element::new("li").with_text("x")));
        let html = Element::new("html")
            .with_child(Element::new("head"))
            .with_child(body);

        let options = Options::default().omit_optional_tags();
        // An empty head keeps its start tag; `</p>` goes before `<ul>`.
        assert_eq!(render(html.clone(), options), "<head><p>one<p>two<ul><li>x</ul>");
        assert_eq!(
            html.to_html(),
            "<html><head></head><body><p>one</p><p>two</p><ul><li>x</li></ul></body></html>"
        );
    }

    #[test]
    fn test_start_tag_with_attributes_is_kept() {
        let html = Element::new("html")
            .with_attr("lang", "en")
            .with_child(Element::new("body").with_text("hi"));

        assert_eq!(
            render(html, Options::default().omit_optional_tags()),
            r#"<html lang="en">hi"#
        );
    }

    #[test]
    fn test_deep_tree() {
        let mut node = Node::text("leaf");
        for _ in 0..100_000 {
            node = Element::new("b").with_child(node).into();
        }

        let html = node.to_html();
        assert!(html.starts_with("<b><b>"));
        assert!(html.ends_with("</b></b>"));
        assert_eq!(html.len(), 100_000 * "<b></b>".len() + "leaf".len());

        // Drop iteratively as well.
        let mut current = Some(node);
        while let Some(Node::Element(mut element)) = current {
            current = element.children.pop();
        }
    }

    #[test]
    fn test_render_into_reuses_buffer() {
        let config = Config::default();
        let mut out = String::from("prefix:");
        config
            .render_into(&Node::text("a<b"), &mut out)
            .unwrap();
        assert_eq!(out, "prefix:a&#x3C;b");
    }
}
