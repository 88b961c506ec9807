//! Character escaping for the five places a literal string can land in
//! serialized HTML.
//!
//! Each place has a set of characters that must never appear literally.
//! There is a strict variant of every set (default, output never trips a
//! parse error) and a permissive one (only what the HTML tokenizer strictly
//! requires, enabled with `allow_parse_errors`). Unless dangerous characters
//! are allowed, every set also forbids NUL, and the attribute sets forbid
//! `"`, `'` and `` ` ``, which older browsers treat as quote delimiters even
//! where the standard does not:
//!
//! - <https://html5sec.org/#59>
//! - <https://html5sec.org/#102>
//! - <https://html5sec.org/#108>
//!
//! The ampersand is escaped everywhere, whatever the configuration. In text
//! only `<` (and NUL) join it: a `>` there is never markup.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt::{self, Write};

use smallvec::SmallVec;

use crate::Config;

/// The syntactic context a string is written into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharClass {
    /// An attribute name
    AttributeName,
    /// An attribute value written without quotes
    Unquoted,
    /// An attribute value inside `'…'`
    SingleQuoted,
    /// An attribute value inside `"…"`
    DoubleQuoted,
    /// Text content
    Text,
}

/// Characters forbidden in one context.
pub(crate) type CharSet = SmallVec<[char; 16]>;

const NUL: char = '\0';
const FF: char = '\x0C';

// https://html.spec.whatwg.org/#attribute-name-state
const NAME: &[char] = &['&', ' ', '\t', '\n', '\r', FF, '/', '>', '='];
const NAME_STRICT: &[char] = &[NUL, '"', '\'', '<'];

// https://html.spec.whatwg.org/#attribute-value-(unquoted)-state
const UNQUOTED: &[char] = &['&', ' ', '\t', '\n', '\r', FF, '>'];
const UNQUOTED_STRICT: &[char] = &[NUL, '"', '\'', '<', '=', '`'];

// https://html.spec.whatwg.org/#attribute-value-(single-quoted)-state
const SINGLE_QUOTED: &[char] = &['&', '\''];
const SINGLE_QUOTED_STRICT: &[char] = &[NUL];

// https://html.spec.whatwg.org/#attribute-value-(double-quoted)-state
const DOUBLE_QUOTED: &[char] = &['&', '"'];
const DOUBLE_QUOTED_STRICT: &[char] = &[NUL];

// https://html.spec.whatwg.org/#data-state
const TEXT: &[char] = &['&', '<'];
const TEXT_STRICT: &[char] = &[NUL];

const QUOTES: &[char] = &['"', '\'', '`'];

/// The forbidden set of every context, resolved once per configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ForbiddenSets {
    name: CharSet,
    unquoted: CharSet,
    single_quoted: CharSet,
    double_quoted: CharSet,
    text: CharSet,
}

impl ForbiddenSets {
    pub(crate) fn new(allow_parse_errors: bool, allow_dangerous_characters: bool) -> Self {
        let harden = |mut set: CharSet, extra: &[char]| {
            if !allow_dangerous_characters {
                extend_unique(&mut set, &[NUL]);
                extend_unique(&mut set, extra);
            }
            set
        };
        let attribute =
            |base: &[char], strict: &[char]| harden(resolve(base, strict, allow_parse_errors), QUOTES);

        Self {
            name: attribute(NAME, NAME_STRICT),
            unquoted: attribute(UNQUOTED, UNQUOTED_STRICT),
            single_quoted: attribute(SINGLE_QUOTED, SINGLE_QUOTED_STRICT),
            double_quoted: attribute(DOUBLE_QUOTED, DOUBLE_QUOTED_STRICT),
            text: harden(resolve(TEXT, TEXT_STRICT, allow_parse_errors), &[]),
        }
    }

    pub(crate) fn get(&self, class: CharClass) -> &[char] {
        match class {
            CharClass::AttributeName => &self.name,
            CharClass::Unquoted => &self.unquoted,
            CharClass::SingleQuoted => &self.single_quoted,
            CharClass::DoubleQuoted => &self.double_quoted,
            CharClass::Text => &self.text,
        }
    }
}

fn resolve(base: &[char], strict: &[char], allow_parse_errors: bool) -> CharSet {
    let mut set = CharSet::from_slice(base);
    if !allow_parse_errors {
        extend_unique(&mut set, strict);
    }
    set
}

fn extend_unique(set: &mut CharSet, extra: &[char]) {
    for &c in extra {
        if !set.contains(&c) {
            set.push(c);
        }
    }
}

/// Escape `text` for the given context.
///
/// Returns the input unchanged (borrowed) when nothing in it needs escaping.
///
/// ```rust
/// use hastml::{CharClass, Options, escape};
///
/// let config = Options::default().build().unwrap();
/// assert_eq!(escape("a < b", CharClass::Text, &config), "a &#x3C; b");
/// assert_eq!(escape("plain", CharClass::Text, &config), "plain");
/// ```
pub fn escape<'a>(text: &'a str, class: CharClass, config: &Config) -> Cow<'a, str> {
    let forbidden = config.forbidden(class);
    if !needs_escape(text, forbidden) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 8);
    let _ = escape_into(&mut out, text, forbidden, config.entities());
    Cow::Owned(out)
}

pub(crate) fn needs_escape(text: &str, forbidden: &[char]) -> bool {
    text.chars().any(|c| c == '&' || forbidden.contains(&c))
}

/// Write `text` to `out`, replacing every forbidden character with a
/// character reference.
///
/// `forbidden` is usually [`Config::forbidden`] and `entities`
/// [`Config::entities`]. `&` is escaped whatever the set says.
pub fn escape_into<W: Write>(
    out: &mut W,
    text: &str,
    forbidden: &[char],
    entities: &HashMap<char, String>,
) -> fmt::Result {
    let mut last = 0;
    for (i, c) in text.char_indices() {
        if c != '&' && !forbidden.contains(&c) {
            continue;
        }
        out.write_str(&text[last..i])?;
        write_reference(out, c, entities)?;
        last = i + c.len_utf8();
    }
    out.write_str(&text[last..])
}

fn write_reference<W: Write>(out: &mut W, c: char, entities: &HashMap<char, String>) -> fmt::Result {
    if c == '&' {
        return out.write_str("&amp;");
    }
    match entities.get(&c) {
        Some(name) => write!(out, "&{name};"),
        None => write!(out, "&#x{:X};", u32::from(c)),
    }
}

// =============================================================================
// Tests
// =============================================================================
