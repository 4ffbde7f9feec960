//! Field name validation.
//!
//! A base field name ends up embedded in an attribute name (`data-{tag}-{field}`), so it
//! must be something an attribute name can hold:
//! - Not empty
//! - No whitespace
//! - No control characters (including NUL)
//! - None of `"`, `'`, `<`, `>`, `/`, `=`
//! - Not the flag delimiter

/// Validates a base field name.
///
/// # Examples
/// ```
/// use sieveapp::fields::validation::validate_field_name;
///
/// assert!(validate_field_name("status", ':').is_ok());
/// assert!(validate_field_name("first-name", ':').is_ok());
/// assert!(validate_field_name("prix_€", ':').is_ok());
///
/// assert!(validate_field_name("", ':').is_err());
/// assert!(validate_field_name("first name", ':').is_err());
/// assert!(validate_field_name("a=b", ':').is_err());
/// assert!(validate_field_name("a:b", ':').is_err());
/// ```
pub fn validate_field_name(name: &str, delimiter: char) -> Result<(), FieldNameError> {
    if name.is_empty() {
        return Err(FieldNameError::Empty);
    }

    for ch in name.chars() {
        if ch == delimiter {
            return Err(FieldNameError::ReservedDelimiter(ch));
        }
        if ch.is_whitespace() {
            return Err(FieldNameError::Whitespace);
        }
        if ch.is_control() {
            return Err(FieldNameError::ControlCharacter(ch as u32));
        }
        if !is_valid_field_char(ch) {
            return Err(FieldNameError::InvalidCharacter(ch));
        }
    }

    Ok(())
}

fn is_valid_field_char(ch: char) -> bool {
    !matches!(ch, '"' | '\'' | '<' | '>' | '/' | '=')
}

/// Error type for field name validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldNameError {
    /// Base name is empty (e.g. a raw name of just `:not`)
    Empty,
    /// Base name contains whitespace
    Whitespace,
    /// Base name contains a control character
    ControlCharacter(u32),
    /// Base name contains a character an attribute name cannot hold
    InvalidCharacter(char),
    /// Base name contains the flag delimiter
    ReservedDelimiter(char),
}

impl std::fmt::Display for FieldNameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldNameError::Empty => write!(f, "field name cannot be empty"),
            FieldNameError::Whitespace => write!(f, "field name cannot contain whitespace"),
            FieldNameError::ControlCharacter(code) => {
                write!(f, "field name contains control character U+{:04X}", code)
            }
            FieldNameError::InvalidCharacter(ch) => {
                write!(f, "field name contains invalid character '{}'", ch)
            }
            FieldNameError::ReservedDelimiter(ch) => {
                write!(f, "field name cannot contain the flag delimiter '{}'", ch)
            }
        }
    }
}

impl std::error::Error for FieldNameError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(validate_field_name("status", ':').is_ok());
        assert!(validate_field_name("data.value", ':').is_ok());
        assert!(validate_field_name("7days", ':').is_ok());
        assert!(validate_field_name("日付", ':').is_ok());
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(validate_field_name("", ':'), Err(FieldNameError::Empty));
    }

    #[test]
    fn test_whitespace() {
        assert_eq!(
            validate_field_name("a\tb", ':'),
            Err(FieldNameError::Whitespace)
        );
    }

    #[test]
    fn test_control_character() {
        assert_eq!(
            validate_field_name("a\u{0}b", ':'),
            Err(FieldNameError::ControlCharacter(0))
        );
    }

    #[test]
    fn test_invalid_characters() {
        for bad in ["a\"b", "a'b", "a<b", "a>b", "a/b", "a=b"] {
            assert!(matches!(
                validate_field_name(bad, ':'),
                Err(FieldNameError::InvalidCharacter(_))
            ));
        }
    }

    #[test]
    fn test_delimiter_is_reserved() {
        assert_eq!(
            validate_field_name("a|b", '|'),
            Err(FieldNameError::ReservedDelimiter('|'))
        );
        assert!(validate_field_name("a|b", ':').is_ok());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            FieldNameError::ControlCharacter(7).to_string(),
            "field name contains control character U+0007"
        );
    }
}
