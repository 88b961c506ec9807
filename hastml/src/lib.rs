//! Serialize HAST trees back to HTML.
//!
//! hastml turns an HTML syntax tree (root, elements, text, comments,
//! doctypes and raw fragments) into markup that an HTML parser reads back as
//! the same tree:
//!
//! - **Escaping**: every literal is escaped for the exact context it lands
//!   in, with XSS hardening on by default
//! - **Element policy**: void elements, boolean attributes, quoting strategy,
//!   self-closing syntax and custom element layout
//! - **Minification**: optional start and end tags can be left out, values
//!   left unquoted, whitespace between attributes dropped
//!
//! # Example
//!
//! ```rust
//! use hastml::{AttrValue, Element, Node, Options, to_html};
//!
//! let list = Element::new("ul")
//!     .with_attr("class", AttrValue::space_list(["plain", "tight"]))
//!     .with_child(Element::new("li").with_text("Fish & chips"))
//!     .with_child(Element::new("li").with_text("Tea"));
//! let tree = Node::root(vec![Node::doctype("html"), list.into()]);
//!
//! assert_eq!(
//!     to_html(&tree, &Options::default()).unwrap(),
//!     r#"<!doctype html><ul class="plain tight"><li>Fish &amp; chips</li><li>Tea</li></ul>"#,
//! );
//!
//! // Build the configuration once to render many trees.
//! let config = Options::new().omit_optional_tags().build().unwrap();
//! assert_eq!(
//!     config.render(&tree),
//!     r#"<!doctype html><ul class="plain tight"><li>Fish &amp; chips<li>Tea</ul>"#,
//! );
//! ```

mod tracing_macros;

mod error;
pub mod escape;
pub mod hast;
pub mod omission;
mod options;
pub mod serialize;

pub use error::SerializeError;
pub use escape::{CharClass, escape};
pub use hast::{AttrValue, Attribute, Attributes, Element, Node, Root};
pub use options::{BOOLEAN_ATTRIBUTES, Config, Options, VOID_ELEMENTS};
pub use serialize::to_html;
