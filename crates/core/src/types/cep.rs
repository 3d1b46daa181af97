//! CEP (Brazilian postal code) type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Cep`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum CepError {
    /// The input string is empty.
    #[error("cep cannot be empty")]
    Empty,
    /// The input has a hyphen somewhere other than between the fifth and
    /// sixth digits.
    #[error("cep must be written as dddddddd or ddddd-ddd")]
    InvalidFormat,
    /// The input does not have exactly eight digits.
    #[error("cep must have exactly {expected} digits")]
    InvalidLength {
        /// Required number of digits.
        expected: usize,
    },
    /// The input contains a character other than a digit.
    #[error("cep may only contain digits and a separating hyphen")]
    InvalidCharacter,
}

/// A CEP, the Brazilian postal code.
///
/// Parsing accepts the bare form (`01001000`) and the hyphenated form
/// (`01001-000`) and normalizes both to the eight bare digits, so either
/// spelling of the same code compares equal and keys the same address.
///
/// ## Examples
///
/// ```
/// use cadastro_core::Cep;
///
/// let bare = Cep::parse("01001000")?;
/// let hyphenated = Cep::parse("01001-000")?;
/// assert_eq!(bare, hyphenated);
/// assert_eq!(hyphenated.as_str(), "01001000");
///
/// assert!(Cep::parse("0100100").is_err());   // seven digits
/// assert!(Cep::parse("01001-0000").is_err()); // misplaced hyphen
/// # Ok::<(), cadastro_core::CepError>(())
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Cep(String);

impl Cep {
    /// Number of digits in a CEP.
    pub const DIGITS: usize = 8;

    /// Parse a `Cep` from a string, normalizing to the bare digits.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is empty
    /// - Splits on a hyphen anywhere other than `ddddd-ddd`
    /// - Does not have exactly eight digits
    /// - Contains a non-digit character
    pub fn parse(s: &str) -> Result<Self, CepError> {
        if s.is_empty() {
            return Err(CepError::Empty);
        }

        let digits = match s.split_once('-') {
            Some((head, tail)) if head.len() == 5 && tail.len() == 3 => {
                format!("{head}{tail}")
            }
            Some(_) => return Err(CepError::InvalidFormat),
            None => s.to_owned(),
        };

        if digits.len() != Self::DIGITS {
            return Err(CepError::InvalidLength {
                expected: Self::DIGITS,
            });
        }

        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CepError::InvalidCharacter);
        }

        Ok(Self(digits))
    }

    /// Returns the normalized eight-digit code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Cep` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Cep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Cep {
    type Err = CepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Cep {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_ceps() {
        assert!(Cep::parse("01001000").is_ok());
        assert!(Cep::parse("01001-000").is_ok());
        assert!(Cep::parse("99999999").is_ok());
    }

    #[test]
    fn test_parse_normalizes_hyphenated_form() {
        let cep = Cep::parse("01001-000").unwrap();
        assert_eq!(cep.as_str(), "01001000");
        assert_eq!(cep, Cep::parse("01001000").unwrap());
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(Cep::parse(""), Err(CepError::Empty)));
    }

    #[test]
    fn test_parse_misplaced_hyphen() {
        assert!(matches!(
            Cep::parse("0100-1000"),
            Err(CepError::InvalidFormat)
        ));
        assert!(matches!(
            Cep::parse("01001-0000"),
            Err(CepError::InvalidFormat)
        ));
        assert!(matches!(
            Cep::parse("-01001000"),
            Err(CepError::InvalidFormat)
        ));
        assert!(matches!(
            Cep::parse("01-001-000"),
            Err(CepError::InvalidFormat)
        ));
    }

    #[test]
    fn test_parse_wrong_length() {
        assert!(matches!(
            Cep::parse("0100100"),
            Err(CepError::InvalidLength { expected: 8 })
        ));
        assert!(matches!(
            Cep::parse("010010000"),
            Err(CepError::InvalidLength { expected: 8 })
        ));
    }

    #[test]
    fn test_parse_invalid_character() {
        assert!(matches!(
            Cep::parse("0100100a"),
            Err(CepError::InvalidCharacter)
        ));
        assert!(matches!(
            Cep::parse("01001 00"),
            Err(CepError::InvalidCharacter)
        ));
    }

    #[test]
    fn test_display() {
        let cep = Cep::parse("01001-000").unwrap();
        assert_eq!(format!("{cep}"), "01001000");
    }

    #[test]
    fn test_serde_roundtrip() {
        let cep = Cep::parse("01001-000").unwrap();
        let json = serde_json::to_string(&cep).unwrap();
        assert_eq!(json, "\"01001000\"");

        let parsed: Cep = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, cep);
    }

    #[test]
    fn test_from_str() {
        let cep: Cep = "70150900".parse().unwrap();
        assert_eq!(cep.as_str(), "70150900");
    }
}
