//! Serializer options and the validated configuration built from them.
//!
//! [`Options`] is a loose builder: every field has a default and can be set
//! in any order. [`Options::build`] checks it once and produces a [`Config`],
//! which is immutable and can be shared between threads and reused for any
//! number of trees.

use std::collections::HashMap;

use crate::SerializeError;
use crate::escape::{CharClass, ForbiddenSets};

/// Elements that never have content or an end tag.
///
/// Includes the obsolete ones still recognized by parsers.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "command", "embed", "frame", "hr", "image",
    "img", "input", "isindex", "keygen", "link", "menuitem", "meta", "nextid", "param", "source",
    "track", "wbr",
];

/// Attributes whose presence alone means `true`, so they can be written
/// without a value.
pub const BOOLEAN_ATTRIBUTES: &[&str] = &[
    "allowfullscreen",
    "allowpaymentrequest",
    "async",
    "autofocus",
    "autoplay",
    "checked",
    "compact",
    "controls",
    "declare",
    "default",
    "defaultchecked",
    "defaultmuted",
    "defaultselected",
    "defer",
    "disabled",
    "disablepictureinpicture",
    "disableremoteplayback",
    "download",
    "formnovalidate",
    "hidden",
    "inert",
    "ismap",
    "itemscope",
    "loop",
    "multiple",
    "muted",
    "nohref",
    "nomodule",
    "noresize",
    "noshade",
    "novalidate",
    "nowrap",
    "open",
    "playsinline",
    "readonly",
    "required",
    "reversed",
    "scoped",
    "seamless",
    "selected",
    "truespeed",
    "typemustmatch",
];

/// Options for HTML serialization.
///
/// ```rust
/// use hastml::Options;
///
/// let config = Options::new()
///     .quote('\'')
///     .omit_optional_tags()
///     .prefer_unquoted()
///     .build()
///     .unwrap();
/// assert_eq!(config.quote(), '\'');
/// ```
#[derive(Clone, Debug)]
pub struct Options {
    /// Attribute-name prefixes that mark a valueless attribute (default: `#`)
    pub boolean_attr_marks: Vec<char>,
    /// Attribute quote, `"` or `'` (default: `"`)
    pub quote: char,
    /// Indentation for attributes of custom elements (default: two spaces)
    pub custom_element_indent: String,
    /// Use the permissive forbidden-character sets (default: false)
    pub allow_parse_errors: bool,
    /// Do not harden attributes against quote characters and NUL (default: false)
    pub allow_dangerous_characters: bool,
    /// Emit `Raw` nodes verbatim (default: false)
    pub allow_dangerous_html: bool,
    /// Omit start and end tags where the HTML standard allows it (default: false)
    pub omit_optional_tags: bool,
    /// Leave attribute values unquoted when that is safe (default: false)
    pub prefer_unquoted: bool,
    /// Drop the space after attributes that end with a quote (default: false)
    pub tight_attributes: bool,
    /// Join comma-separated lists with `,` instead of `, ` (default: false)
    pub tight_comma_separated_lists: bool,
    /// Write `<br/>` instead of `<br />` (default: false)
    pub tight_self_closing: bool,
    /// Close void elements with `/>` (default: false)
    pub close_self_closing: bool,
    /// Close childless SVG elements with `/>` (default: false)
    pub close_empty_elements: bool,
    /// Rewrite `</script` inside script content as `<\/script` (default: true)
    pub escape_script_end_tags: bool,
    /// Void element names; `None` means [`VOID_ELEMENTS`]
    pub voids: Option<Vec<String>>,
    /// Boolean attribute names; `None` means [`BOOLEAN_ATTRIBUTES`]
    pub boolean_attributes: Option<Vec<String>>,
    /// Named references to use instead of `&#x…;` (name without `&` and `;`)
    pub entities: HashMap<char, String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            boolean_attr_marks: vec!['#'],
            quote: '"',
            custom_element_indent: "  ".to_string(),
            allow_parse_errors: false,
            allow_dangerous_characters: false,
            allow_dangerous_html: false,
            omit_optional_tags: false,
            prefer_unquoted: false,
            tight_attributes: false,
            tight_comma_separated_lists: false,
            tight_self_closing: false,
            close_self_closing: false,
            close_empty_elements: false,
            escape_script_end_tags: true,
            voids: None,
            boolean_attributes: None,
            entities: HashMap::new(),
        }
    }
}

impl Options {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the attribute quote. Anything but `"` or `'` is rejected by [`Options::build`].
    pub fn quote(mut self, quote: char) -> Self {
        self.quote = quote;
        self
    }

    /// Replace the boolean attribute marks.
    pub fn boolean_attr_marks(mut self, marks: impl IntoIterator<Item = char>) -> Self {
        self.boolean_attr_marks = marks.into_iter().collect();
        self
    }

    /// Set the indentation string for custom element attributes.
    pub fn custom_element_indent(mut self, indent: impl Into<String>) -> Self {
        self.custom_element_indent = indent.into();
        self
    }

    /// Indent custom element attributes by `width` spaces.
    pub fn custom_element_indent_width(mut self, width: usize) -> Self {
        self.custom_element_indent = " ".repeat(width);
        self
    }

    /// Use the minimal forbidden-character sets, at the cost of parse errors.
    pub fn allow_parse_errors(mut self) -> Self {
        self.allow_parse_errors = true;
        self
    }

    /// Stop escaping `"`, `'`, `` ` `` and NUL beyond what the syntax requires.
    pub fn allow_dangerous_characters(mut self) -> Self {
        self.allow_dangerous_characters = true;
        self
    }

    /// Emit raw nodes verbatim (not recommended for untrusted input).
    pub fn allow_dangerous_html(mut self) -> Self {
        self.allow_dangerous_html = true;
        self
    }

    /// Omit optional start and end tags.
    pub fn omit_optional_tags(mut self) -> Self {
        self.omit_optional_tags = true;
        self
    }

    /// Leave attribute values unquoted when possible.
    pub fn prefer_unquoted(mut self) -> Self {
        self.prefer_unquoted = true;
        self
    }

    /// Drop whitespace between attributes where possible.
    pub fn tight_attributes(mut self) -> Self {
        self.tight_attributes = true;
        self
    }

    /// Join comma-separated lists without a space.
    pub fn tight_comma_separated_lists(mut self) -> Self {
        self.tight_comma_separated_lists = true;
        self
    }

    /// Drop the space before the self-closing slash.
    pub fn tight_self_closing(mut self) -> Self {
        self.tight_self_closing = true;
        self
    }

    /// Close void elements with `/>`.
    pub fn close_self_closing(mut self) -> Self {
        self.close_self_closing = true;
        self
    }

    /// Close childless SVG elements with `/>`.
    pub fn close_empty_elements(mut self) -> Self {
        self.close_empty_elements = true;
        self
    }

    /// Disable escaping `</script` in script content (not recommended).
    pub fn no_escape_script_end_tags(mut self) -> Self {
        self.escape_script_end_tags = false;
        self
    }

    /// Override the void element names.
    pub fn voids<I, S>(mut self, voids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.voids = Some(voids.into_iter().map(Into::into).collect());
        self
    }

    /// Override the boolean attribute names.
    pub fn boolean_attributes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.boolean_attributes = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Use `&name;` for `c` wherever it has to be escaped.
    pub fn entity(mut self, c: char, name: impl Into<String>) -> Self {
        self.entities.insert(c, name.into());
        self
    }

    /// Add several named references at once.
    pub fn entities<I, S>(mut self, entities: I) -> Self
    where
        I: IntoIterator<Item = (char, S)>,
        S: Into<String>,
    {
        self.entities
            .extend(entities.into_iter().map(|(c, name)| (c, name.into())));
        self
    }

    /// Validate the options and resolve them into a [`Config`].
    pub fn build(self) -> Result<Config, SerializeError> {
        let quote = Quote::from_char(self.quote)?;
        Ok(self.resolve(quote))
    }

    fn resolve(self, quote: Quote) -> Config {
        let voids = match self.voids {
            Some(voids) => voids,
            None => VOID_ELEMENTS.iter().map(|s| s.to_string()).collect(),
        };
        let boolean_attributes = match self.boolean_attributes {
            Some(names) => names,
            None => BOOLEAN_ATTRIBUTES.iter().map(|s| s.to_string()).collect(),
        };

        Config {
            forbidden: ForbiddenSets::new(
                self.allow_parse_errors,
                self.allow_dangerous_characters,
            ),
            quote,
            boolean_attr_marks: self.boolean_attr_marks,
            custom_element_indent: self.custom_element_indent,
            allow_dangerous_html: self.allow_dangerous_html,
            omit_optional_tags: self.omit_optional_tags,
            prefer_unquoted: self.prefer_unquoted,
            tight_attributes: self.tight_attributes,
            tight_comma_separated_lists: self.tight_comma_separated_lists,
            tight_self_closing: self.tight_self_closing,
            close_self_closing: self.close_self_closing,
            close_empty_elements: self.close_empty_elements,
            escape_script_end_tags: self.escape_script_end_tags,
            voids,
            boolean_attributes,
            entities: self.entities,
        }
    }
}

/// The two legal attribute quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Quote {
    Double,
    Single,
}

impl Quote {
    fn from_char(c: char) -> Result<Self, SerializeError> {
        match c {
            '"' => Ok(Quote::Double),
            '\'' => Ok(Quote::Single),
            quote => Err(SerializeError::InvalidQuote { quote }),
        }
    }

    pub(crate) fn as_char(self) -> char {
        match self {
            Quote::Double => '"',
            Quote::Single => '\'',
        }
    }

    pub(crate) fn class(self) -> CharClass {
        match self {
            Quote::Double => CharClass::DoubleQuoted,
            Quote::Single => CharClass::SingleQuoted,
        }
    }
}

/// A validated, immutable serializer configuration.
///
/// Built by [`Options::build`]; render trees with [`Config::render`].
#[derive(Clone, Debug)]
pub struct Config {
    forbidden: ForbiddenSets,
    quote: Quote,
    boolean_attr_marks: Vec<char>,
    custom_element_indent: String,
    allow_dangerous_html: bool,
    omit_optional_tags: bool,
    prefer_unquoted: bool,
    tight_attributes: bool,
    tight_comma_separated_lists: bool,
    tight_self_closing: bool,
    close_self_closing: bool,
    close_empty_elements: bool,
    escape_script_end_tags: bool,
    voids: Vec<String>,
    boolean_attributes: Vec<String>,
    entities: HashMap<char, String>,
}

impl Default for Config {
    fn default() -> Self {
        Options::default().resolve(Quote::Double)
    }
}

impl Config {
    /// The attribute quote character.
    pub fn quote(&self) -> char {
        self.quote.as_char()
    }

    pub(crate) fn quote_style(&self) -> Quote {
        self.quote
    }

    /// Characters that may not appear literally in `class`.
    pub fn forbidden(&self, class: CharClass) -> &[char] {
        self.forbidden.get(class)
    }

    /// Named character references in use.
    pub fn entities(&self) -> &HashMap<char, String> {
        &self.entities
    }

    /// Returns true if `tag` is a void element (ASCII case-insensitive).
    pub fn is_void(&self, tag: &str) -> bool {
        self.voids.iter().any(|v| v.eq_ignore_ascii_case(tag))
    }

    /// Returns true if `name` is a boolean attribute (ASCII case-insensitive).
    pub fn is_boolean_attribute(&self, name: &str) -> bool {
        self.boolean_attributes
            .iter()
            .any(|b| b.eq_ignore_ascii_case(name))
    }

    /// If `name` starts with a boolean attribute mark, the name without it.
    pub fn strip_boolean_mark<'a>(&self, name: &'a str) -> Option<&'a str> {
        let mut chars = name.chars();
        let first = chars.next()?;
        self.boolean_attr_marks
            .contains(&first)
            .then(|| chars.as_str())
    }

    /// Indentation for attributes of custom elements.
    pub fn custom_element_indent(&self) -> &str {
        &self.custom_element_indent
    }

    /// Whether raw nodes are emitted verbatim.
    pub fn allow_dangerous_html(&self) -> bool {
        self.allow_dangerous_html
    }

    /// Whether optional tags are omitted.
    pub fn omit_optional_tags(&self) -> bool {
        self.omit_optional_tags
    }

    pub(crate) fn prefer_unquoted(&self) -> bool {
        self.prefer_unquoted
    }

    pub(crate) fn tight_attributes(&self) -> bool {
        self.tight_attributes
    }

    pub(crate) fn list_separator(&self) -> &'static str {
        if self.tight_comma_separated_lists {
            ","
        } else {
            ", "
        }
    }

    pub(crate) fn tight_self_closing(&self) -> bool {
        self.tight_self_closing
    }

    pub(crate) fn close_self_closing(&self) -> bool {
        self.close_self_closing
    }

    pub(crate) fn close_empty_elements(&self) -> bool {
        self.close_empty_elements
    }

    pub(crate) fn escape_script_end_tags(&self) -> bool {
        self.escape_script_end_tags
    }
}

// =============================================================================
// Tests
// =============================================================================
