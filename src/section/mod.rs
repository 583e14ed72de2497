/// A contiguous span of document text being rebalanced toward a target count.
///
/// Sections have no identity beyond their position in the ordered list the
/// controller owns; merging and splitting replace entries in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// The text content of this section
    pub text: String,
}

impl Section {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Number of whitespace-delimited tokens in this section.
    ///
    /// Recomputed on every call so it always reflects the current text.
    pub fn word_count(&self) -> usize {
        word_count(&self.text)
    }

    /// Number of non-blank lines in this section.
    ///
    /// A line, not a blank-line-delimited block, is the unit here. Downstream
    /// merge/split decisions were tuned against this exact metric, so it is
    /// kept as-is.
    pub fn paragraph_count(&self) -> usize {
        paragraph_count(&self.text)
    }
}

/// Count whitespace-delimited tokens. Empty text yields zero.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Count non-blank lines. Empty text yields zero.
pub fn paragraph_count(text: &str) -> usize {
    text.lines().filter(|line| !line.trim().is_empty()).count()
}

/// Whitespace-normalized form of a text: tokens joined by single spaces.
///
/// Content-preservation checks compare texts in this form, since merges and
/// splits are allowed to rewrite whitespace at the join points but nothing
/// else.
pub fn normalized(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
