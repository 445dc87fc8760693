use crate::error::{ParseWarning, Recovery, SourceLocation};

/// Ordered key/value pairs taken from a document's front matter.
///
/// Keys are unique; inserting an existing key replaces its value but keeps
/// the position where the key was first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataBlock {
    entries: Vec<(String, String)>,
}

impl MetadataBlock {
    /// Creates an empty block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, replacing any earlier value for the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Looks up the value stored for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterates entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the block has no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes the block back out as a fenced front matter section.
    pub fn to_fence(&self) -> String {
        let mut out = String::from("---\n");
        for (key, value) in &self.entries {
            out.push_str(key);
            out.push_str(": ");
            out.push_str(value);
            out.push('\n');
        }
        out.push_str("---\n");
        out
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MetadataBlock {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut block = MetadataBlock::new();
        for (key, value) in iter {
            block.insert(key, value);
        }
        block
    }
}

/// A document split into its metadata block and Markdown body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction<'a> {
    /// Metadata parsed from the fence; empty when there is none.
    pub metadata: MetadataBlock,
    /// Everything after the closing fence, or the whole input.
    pub body: &'a str,
}

impl<'a> Extraction<'a> {
    fn without_metadata(input: &'a str) -> Self {
        Self {
            metadata: MetadataBlock::new(),
            body: input,
        }
    }
}

/// Splits front matter off the start of a document.
///
/// The opening `---` must be the very first line (a UTF-8 BOM is allowed in
/// front of it). An opening fence with no closing fence is recovered as "no
/// metadata" so one malformed file cannot abort a batch.
pub fn extract_metadata(input: &str) -> Recovery<Extraction<'_>> {
    let (without_bom, bom_len) = strip_bom(input);

    let Some((first_line, block_start)) = next_line(without_bom, 0) else {
        return Recovery::Clean(Extraction::without_metadata(input));
    };
    if !is_yaml_fence(first_line) {
        return Recovery::Clean(Extraction::without_metadata(input));
    }

    let mut scan_cursor = block_start;
    while let Some((line, next_cursor)) = next_line(without_bom, scan_cursor) {
        if is_yaml_fence(line) {
            let block = &without_bom[block_start..scan_cursor];
            return Recovery::Clean(Extraction {
                metadata: parse_block(block),
                body: &input[bom_len + next_cursor..],
            });
        }
        scan_cursor = next_cursor;
    }

    Recovery::Recovered {
        value: Extraction::without_metadata(input),
        warning: ParseWarning::UnterminatedFrontmatter {
            location: SourceLocation::new(1, 1),
        },
    }
}

fn parse_block(block: &str) -> MetadataBlock {
    let mut metadata = MetadataBlock::new();
    for line in block.lines() {
        let line = normalize_line(line);
        let trimmed = line.trim();
        // Indented lines belong to nested YAML structures we don't flatten.
        if trimmed.is_empty() || trimmed.starts_with('#') || line.starts_with([' ', '\t']) {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = unquote(key.trim());
        if key.is_empty() {
            continue;
        }
        metadata.insert(key, unquote(value.trim()));
    }
    metadata
}

/// Strips YAML quoting from a scalar; anything unquoted is kept verbatim.
fn unquote(raw: &str) -> String {
    if raw.len() >= 2
        && ((raw.starts_with('"') && raw.ends_with('"'))
            || (raw.starts_with('\'') && raw.ends_with('\'')))
        && let Ok(value) = serde_yaml::from_str::<String>(raw)
    {
        return value;
    }
    raw.to_string()
}

fn strip_bom(input: &str) -> (&str, usize) {
    if let Some(stripped) = input.strip_prefix('\u{feff}') {
        (stripped, '\u{feff}'.len_utf8())
    } else {
        (input, 0)
    }
}

fn next_line(input: &str, start: usize) -> Option<(&str, usize)> {
    if start >= input.len() {
        return None;
    }

    let bytes = &input.as_bytes()[start..];
    if let Some(pos) = bytes.iter().position(|b| *b == b'\n') {
        let line_end = start + pos;
        let line = &input[start..line_end];
        Some((line, line_end + 1))
    } else {
        Some((&input[start..], input.len()))
    }
}

fn is_yaml_fence(line: &str) -> bool {
    normalize_line(line) == "---"
}

fn normalize_line(line: &str) -> &str {
    line.trim_end_matches('\r')
}
