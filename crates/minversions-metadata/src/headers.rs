use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::MetadataError;

/// A line break followed by whitespace marks a folded header (RFC 5322 § 2.2.3).
static FOLDED_LINE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n([ \t])").unwrap());

/// The headers of a core metadata file.
///
/// Field names are matched case-insensitively and may repeat (e.g., `Requires-Dist`), so the
/// headers are stored in file order rather than in a map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    headers: Vec<(String, String)>,
}

impl Headers {
    /// Parse the headers from the given metadata file content.
    ///
    /// Returns the headers along with the body (the long description), which is everything after
    /// the first blank line.
    pub fn parse(content: &str) -> Result<(Self, String), MetadataError> {
        let (block, body) = content.split_once("\n\n").unwrap_or((content, ""));

        // Unfold the whole block first; continuation lines aren't fields of their own.
        let block = FOLDED_LINE_RE.replace_all(block, "$1");

        let mut headers = Vec::new();
        for line in block.split('\n') {
            // An empty line ends the headers, even if more lines follow.
            if line.is_empty() {
                break;
            }
            let Some((name, value)) = line.split_once(':') else {
                return Err(MetadataError::MissingSeparator(line.to_string()));
            };
            trace!("Parsed metadata field `{name}`");
            headers.push((name.to_string(), value.trim_start().to_string()));
        }

        Ok((Self { headers }, body.to_string()))
    }

    /// Return all values associated with the field with the given name, in file order.
    pub fn get_all<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a str> {
        self.headers
            .iter()
            .filter(move |(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Return the first value associated with the field with the given name.
    ///
    /// Older build backends write `UNKNOWN` for fields they don't know; those are treated as
    /// missing.
    pub fn get_first(&self, name: &str) -> Option<&str> {
        self.get_all(name).next().filter(|value| *value != "UNKNOWN")
    }

    /// Iterate over all `(name, value)` pairs, in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }
}
