use crate::{
    interpolate::{InterpolateError, Interpolator},
    CONTENT_SEPARATOR,
};
use indexmap::IndexMap;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic, PartialEq)]
pub enum ContentError {
    #[error("content segment {segment_index} ('{identifier}') has no body")]
    #[diagnostic(
        code(pgen::content::malformed),
        help("Put the file identifier on its own line, followed by the file body")
    )]
    Malformed {
        segment_index: usize,
        identifier: String,
    },
}

/// File bodies keyed by the symbolic (pre-substitution) path of the file they belong to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentStore(IndexMap<String, String>);
impl ContentStore {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }
    /// Splits `text` on separator lines. The first line of each segment is the identifier,
    /// everything after it is the body, kept byte for byte.
    pub fn parse(text: &str) -> Result<Self, ContentError> {
        let mut store = ContentStore::new();

        for (segment_index, segment) in split_segments(text).into_iter().enumerate() {
            if segment.trim().is_empty() {
                continue;
            }

            let Some((identifier, body)) = segment.split_once('\n') else {
                return Err(ContentError::Malformed {
                    segment_index,
                    identifier: segment.trim_end().to_string(),
                });
            };
            let identifier = identifier.strip_suffix('\r').unwrap_or(identifier);

            if store.0.contains_key(identifier) {
                log::warn!("duplicate content entry '{identifier}', keeping the last one");
            }

            store.0.insert(identifier.to_string(), body.to_string());
        }

        log::debug!("parsed {} content entr(y/ies)", store.len());

        Ok(store)
    }
    /// Substitutes placeholders in every body. Identifiers stay symbolic.
    pub fn resolve(self, interpolator: &Interpolator) -> Result<Self, InterpolateError> {
        let mut resolved = IndexMap::with_capacity(self.0.len());

        for (identifier, body) in self.0 {
            let body = interpolator.try_interpolate(&body)?;
            resolved.insert(identifier, body);
        }

        Ok(Self(resolved))
    }

    pub fn insert(&mut self, identifier: impl Into<String>, body: impl Into<String>) {
        self.0.insert(identifier.into(), body.into());
    }

    pub fn get(&self, identifier: &str) -> Option<&str> {
        self.0.get(identifier).map(String::as_str)
    }
    /// Body for `identifier`, or an empty string when there is none.
    pub fn content_for(&self, identifier: &str) -> &str {
        self.get(identifier).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn split_segments(text: &str) -> Vec<String> {
    let mut segments = vec![String::new()];

    for line in text.split_inclusive('\n') {
        let bare = line.trim_end_matches('\n').trim_end_matches('\r');

        if bare == CONTENT_SEPARATOR {
            segments.push(String::new());
        } else if let Some(current) = segments.last_mut() {
            current.push_str(line);
        }
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variables::VariableTable;

    #[test]
    fn test_parse_splits_on_separator_lines() {
        let text = "•••\nroot/a.txt\nhello\nworld\n•••\nroot/b.txt\nbye\n";

        let store = ContentStore::parse(text).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("root/a.txt"), Some("hello\nworld\n"));
        assert_eq!(store.get("root/b.txt"), Some("bye\n"));
    }

    #[test]
    fn test_parse_keeps_body_without_trailing_newline() {
        let store = ContentStore::parse("root/a.txt\nno newline").unwrap();

        assert_eq!(store.get("root/a.txt"), Some("no newline"));
    }

    #[test]
    fn test_parse_skips_empty_segments() {
        let store = ContentStore::parse("•••\n•••\nroot/a.txt\nx\n•••\n").unwrap();

        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_parse_allows_empty_body() {
        let store = ContentStore::parse("root/empty.txt\n•••\n").unwrap();

        assert_eq!(store.get("root/empty.txt"), Some(""));
    }

    #[test]
    fn test_parse_tolerates_crlf_separators() {
        let store = ContentStore::parse("•••\r\nroot/a.txt\r\nbody\r\n").unwrap();

        assert_eq!(store.get("root/a.txt"), Some("body\r\n"));
    }

    #[test]
    fn test_parse_rejects_segment_without_body() {
        let err = ContentStore::parse("•••\nroot/a.txt\nx\n•••\nlonely").unwrap_err();

        assert_eq!(
            err,
            ContentError::Malformed {
                segment_index: 2,
                identifier: "lonely".to_string()
            }
        );
    }

    #[test]
    fn test_separator_must_be_whole_line() {
        let store = ContentStore::parse("root/a.txt\nbefore ••• after\n").unwrap();

        assert_eq!(store.get("root/a.txt"), Some("before ••• after\n"));
    }

    #[test]
    fn test_resolve_substitutes_bodies_but_not_identifiers() {
        let vars: VariableTable = [("name", "Widget")].into_iter().collect();
        let store = ContentStore::parse("root/•name•.txt\nstruct •name•;\n").unwrap();

        let resolved = store.resolve(&Interpolator::new(&vars)).unwrap();

        assert_eq!(resolved.get("root/•name•.txt"), Some("struct Widget;\n"));
        assert_eq!(resolved.get("root/Widget.txt"), None);
    }

    #[test]
    fn test_content_for_missing_identifier_is_empty() {
        let store = ContentStore::new();

        assert_eq!(store.content_for("root/nothing.txt"), "");
    }
}
