use crate::{
    variables::{is_valid_name, VariableTable},
    DELIMITER,
};
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic, PartialEq)]
pub enum InterpolateError {
    #[error("unresolved placeholder(s): {}", .names.join(", "))]
    #[diagnostic(
        code(pgen::interpolate::unresolved),
        help("Define the missing names in the variables file, or run without --strict")
    )]
    Unresolved { names: Vec<String> },
}

lazy_static::lazy_static! {
    // a delimiter-enclosed name (see is_valid_name), anchored at the scan position
    static ref PLACEHOLDER_REGEX: regex::Regex =
        regex::Regex::new(r"^•([^•\s]+)•").expect("a valid regex pattern");
}

/// Replaces `•name•` placeholders with values from a [`VariableTable`].
///
/// Text is scanned once from left to right. At every delimiter the known placeholder tokens
/// are tried longest first, so a name that is a prefix of another name can never shadow
/// it. Substituted values are not scanned again. Names that could never form a placeholder
/// (empty, or holding whitespace or a delimiter) are ignored.
#[derive(Debug, Clone)]
pub struct Interpolator {
    /// `(•name•, value)` ordered by token length, longest first
    tokens: Vec<(String, String)>,
    strict: bool,
}
impl Interpolator {
    pub fn new(variables: &VariableTable) -> Self {
        let mut tokens: Vec<(String, String)> = variables
            .iter()
            .filter(|(name, _)| {
                let valid = is_valid_name(name);
                if !valid {
                    log::warn!("ignoring variable '{name}': not a valid placeholder name");
                }
                valid
            })
            .map(|(name, value)| (format!("{DELIMITER}{name}{DELIMITER}"), value.to_string()))
            .collect();

        tokens.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()));

        Self {
            tokens,
            strict: false,
        }
    }
    /// In strict mode [`Interpolator::try_interpolate`] rejects placeholders with no
    /// matching variable instead of leaving them in place.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Substitutes every known placeholder, passing unknown ones through verbatim.
    pub fn interpolate(&self, text: &str) -> String {
        self.scan(text).0
    }
    /// Like [`Interpolator::interpolate`], but fails on unknown placeholders when strict.
    pub fn try_interpolate(&self, text: &str) -> Result<String, InterpolateError> {
        let (output, unresolved) = self.scan(text);

        if self.strict && !unresolved.is_empty() {
            return Err(InterpolateError::Unresolved { names: unresolved });
        }

        Ok(output)
    }

    fn scan(&self, text: &str) -> (String, Vec<String>) {
        let mut output = String::with_capacity(text.len());
        let mut unresolved: Vec<String> = Vec::new();
        let mut rest = text;

        while let Some(position) = rest.find(DELIMITER) {
            output.push_str(&rest[..position]);
            let candidate = &rest[position..];

            if let Some((token, value)) = self
                .tokens
                .iter()
                .find(|(token, _)| candidate.starts_with(token.as_str()))
            {
                output.push_str(value);
                rest = &candidate[token.len()..];
                continue;
            }

            if let Some(captures) = PLACEHOLDER_REGEX.captures(candidate) {
                let name = &captures[1];
                if !unresolved.iter().any(|n| n == name) {
                    unresolved.push(name.to_string());
                }
                let whole = &captures[0];
                output.push_str(whole);
                rest = &candidate[whole.len()..];
            } else {
                output.push_str(DELIMITER);
                rest = &candidate[DELIMITER.len()..];
            }
        }

        output.push_str(rest);

        (output, unresolved)
    }
}

/// Convenience wrapper for a one-off, non-strict substitution.
pub fn interpolate(text: &str, variables: &VariableTable) -> String {
    Interpolator::new(variables).interpolate(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(pairs: &[(&str, &str)]) -> VariableTable {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_text_without_placeholders_is_unchanged() {
        let vars = table(&[("name", "Widget")]);
        let text = "root/\n\tsrc|\n\t\tmain.rs\n";

        assert_eq!(interpolate(text, &vars), text);
    }

    #[test]
    fn test_replaces_every_occurrence() {
        let vars = table(&[("name", "Widget")]);

        let result = interpolate("•name•/•name•.txt\nmod •name•;", &vars);

        assert_eq!(result, "Widget/Widget.txt\nmod Widget;");
        assert!(!result.contains("•name•"));
    }

    #[test]
    fn test_unknown_placeholder_passes_through() {
        let vars = table(&[("name", "Widget")]);

        assert_eq!(interpolate("•other•-•name•", &vars), "•other•-Widget");
    }

    #[test]
    fn test_stray_delimiter_is_kept() {
        let vars = table(&[("name", "Widget")]);

        assert_eq!(interpolate("• list item •name•", &vars), "• list item Widget");
    }

    #[test]
    fn test_prefix_names_prefer_longest_match() {
        let vars = table(&[("a", "short"), ("ab", "long")]);

        assert_eq!(interpolate("•ab• •a•", &vars), "long short");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let vars = table(&[("outer", "•inner•"), ("inner", "x")]);

        assert_eq!(interpolate("•outer•", &vars), "•inner•");
    }

    #[test]
    fn test_interpolate_is_idempotent() {
        let vars = table(&[("name", "Widget"), ("version", "1.0")]);
        let interpolator = Interpolator::new(&vars);
        let text = "•name•-•version•\n\t•name•.txt\n•unknown•";

        let once = interpolator.interpolate(text);
        let twice = interpolator.interpolate(&once);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_table_is_identity() {
        let vars = VariableTable::new();

        assert_eq!(interpolate("•name•", &vars), "•name•");
    }

    #[test]
    fn test_strict_rejects_unknown_placeholders() {
        let vars = table(&[("name", "Widget")]);
        let interpolator = Interpolator::new(&vars).strict(true);

        let err = interpolator
            .try_interpolate("•name• •missing• •gone• •missing•")
            .unwrap_err();

        assert_eq!(
            err,
            InterpolateError::Unresolved {
                names: vec!["missing".to_string(), "gone".to_string()]
            }
        );
    }

    #[test]
    fn test_strict_accepts_fully_resolved_text() {
        let vars = table(&[("name", "Widget")]);
        let interpolator = Interpolator::new(&vars).strict(true);

        assert_eq!(
            interpolator.try_interpolate("• bullet •name•").unwrap(),
            "• bullet Widget"
        );
    }

    #[test]
    fn test_strict_reports_unknown_name_next_to_known_one() {
        let vars = table(&[("name", "Widget")]);
        let interpolator = Interpolator::new(&vars).strict(true);

        let err = interpolator.try_interpolate("•name•-•other•").unwrap_err();

        assert_eq!(
            err,
            InterpolateError::Unresolved {
                names: vec!["other".to_string()]
            }
        );
    }

    #[test]
    fn test_whitespace_never_forms_a_placeholder() {
        let vars = table(&[("my var", "x")]);
        let interpolator = Interpolator::new(&vars).strict(true);

        assert_eq!(
            interpolator.try_interpolate("•my var• •other var•").unwrap(),
            "•my var• •other var•"
        );
    }

    #[test]
    fn test_lenient_try_interpolate_never_fails() {
        let interpolator = Interpolator::new(&VariableTable::new());

        assert_eq!(
            interpolator.try_interpolate("•missing•").unwrap(),
            "•missing•"
        );
    }
}
