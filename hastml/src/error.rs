use facet::Facet;

/// Errors that can occur while building a serializer configuration.
///
/// Rendering itself is total: once a [`Config`](crate::Config) exists, every
/// tree serializes.
#[derive(Facet, Debug, Clone, PartialEq, Eq)]
#[facet(derive(Error))]
#[repr(u8)]
pub enum SerializeError {
    /// invalid quote `{quote}`, expected `'` or `"`
    InvalidQuote { quote: char },
}
