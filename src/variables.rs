use crate::DELIMITER;
use indexmap::IndexMap;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic, PartialEq)]
pub enum VariableParseError {
    #[error("invalid variable definition on line {line_number}: '{line}'")]
    #[diagnostic(
        code(pgen::variables::malformed),
        help("Provide a single variable name and value, delimited by a single '=' (name=value)")
    )]
    Malformed { line_number: usize, line: String },

    #[error("variable '{name}' is defined more than once (line {line_number})")]
    #[diagnostic(
        code(pgen::variables::duplicate),
        help("Each variable name may only be defined once")
    )]
    Duplicate { name: String, line_number: usize },

    #[error("invalid variable name '{name}' on line {line_number}")]
    #[diagnostic(
        code(pgen::variables::invalid_name),
        help("Variable names must be non-empty and may not contain whitespace or '•'")
    )]
    InvalidName { name: String, line_number: usize },
}

/// A name usable inside `•name•`: non-empty, without whitespace or delimiters.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(DELIMITER) && !name.chars().any(char::is_whitespace)
}

/// Variable name to replacement value, in the order they were defined.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableTable(IndexMap<String, String>);
impl VariableTable {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }
    /// Parses `name=value` lines. Blank lines are ignored; any other line must contain
    /// exactly one `=` and a name accepted by [`is_valid_name`].
    pub fn parse(text: &str) -> Result<Self, VariableParseError> {
        let mut table = VariableTable::new();

        for (index, raw_line) in text.lines().enumerate() {
            let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
            let line_number = index + 1;

            if line.trim().is_empty() {
                continue;
            }

            let mut parts = line.split('=');
            let (Some(name), Some(value), None) = (parts.next(), parts.next(), parts.next())
            else {
                return Err(VariableParseError::Malformed {
                    line_number,
                    line: line.to_string(),
                });
            };

            if !is_valid_name(name) {
                return Err(VariableParseError::InvalidName {
                    name: name.to_string(),
                    line_number,
                });
            }

            if table.0.contains_key(name) {
                return Err(VariableParseError::Duplicate {
                    name: name.to_string(),
                    line_number,
                });
            }

            table.0.insert(name.to_string(), value.to_string());
        }

        log::debug!("parsed {} variable(s)", table.len());

        Ok(table)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for VariableTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
