//! Normalized NFO record.
//!
//! An [`NfoRecord`] is the hand-off between the converter and the generator:
//! an ordered list of tagged entries, independent of both the Stash JSON
//! shape and the XML writer. Repeated tags express list-valued fields
//! (`actor`, `genre`, `alias`) and keep the order they were pushed in.

/// Value carried by an [`NfoEntry`].
#[derive(Debug, Clone, PartialEq)]
pub enum NfoValue {
    /// Character data, stored unescaped.
    Text(String),
    /// Child entries, e.g. the `name`/`role` pair inside an `actor`.
    Nested(Vec<NfoEntry>),
}

/// A single tagged value with optional attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct NfoEntry {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub value: NfoValue,
}

impl NfoEntry {
    /// A text entry without attributes.
    pub fn text(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            value: NfoValue::Text(text.into()),
        }
    }

    /// An entry holding child entries.
    pub fn nested(tag: impl Into<String>, children: Vec<NfoEntry>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            value: NfoValue::Nested(children),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Text content, if this is a text entry.
    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            NfoValue::Text(text) => Some(text),
            NfoValue::Nested(_) => None,
        }
    }

    /// Child entries, if this is a nested entry.
    pub fn children(&self) -> Option<&[NfoEntry]> {
        match &self.value {
            NfoValue::Nested(children) => Some(children),
            NfoValue::Text(_) => None,
        }
    }

    /// Value of the attribute `name`, if set.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Text of the first child entry tagged `tag`.
    pub fn child_text(&self, tag: &str) -> Option<&str> {
        self.children()?
            .iter()
            .find(|entry| entry.tag == tag)
            .and_then(NfoEntry::as_text)
    }
}

/// Ordered mapping of output tag names to values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NfoRecord {
    entries: Vec<NfoEntry>,
}

impl NfoRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn push(&mut self, entry: NfoEntry) {
        self.entries.push(entry);
    }

    /// Append a text entry.
    pub fn push_text(&mut self, tag: &str, text: impl Into<String>) {
        self.entries.push(NfoEntry::text(tag, text));
    }

    /// Append a text entry only when `text` is present and non-empty.
    pub fn push_opt(&mut self, tag: &str, text: Option<String>) {
        if let Some(text) = text.filter(|t| !t.is_empty()) {
            self.push_text(tag, text);
        }
    }

    /// All entries in output order.
    pub fn entries(&self) -> &[NfoEntry] {
        &self.entries
    }

    /// Text of the first entry tagged `tag`.
    pub fn get(&self, tag: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.tag == tag)
            .and_then(NfoEntry::as_text)
    }

    /// Every entry tagged `tag`, in order.
    pub fn get_all<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a NfoEntry> + 'a {
        self.entries.iter().filter(move |entry| entry.tag == tag)
    }

    /// Whether any entry is tagged `tag`.
    pub fn contains(&self, tag: &str) -> bool {
        self.entries.iter().any(|entry| entry.tag == tag)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
