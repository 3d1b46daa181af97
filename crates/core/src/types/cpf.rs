//! CPF (Brazilian taxpayer number) type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Cpf`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum CpfError {
    /// The input contains more digits than a CPF can hold.
    #[error("cpf must have at most {max} digits")]
    TooLong {
        /// Maximum allowed number of digits.
        max: usize,
    },
    /// Every digit of the padded number is the same.
    #[error("cpf cannot be a single repeated digit")]
    RepeatedDigits,
    /// The check digits are inconsistent with the leading nine digits.
    #[error("cpf check digits are inconsistent")]
    ChecksumMismatch,
}

/// A CPF, the Brazilian natural-person taxpayer number.
///
/// The value keeps the exact spelling it was parsed from (punctuated or
/// bare), so `111.444.777-35` and `11144477735` are equal to themselves but
/// not to each other. Validation works on the digits alone.
///
/// ## Validation
///
/// - Every non-digit character is ignored.
/// - More than eleven digits is an error; fewer are left-padded with zeros,
///   so short numeric strings such as `"138"` can form a valid CPF.
/// - A number whose eleven digits are all identical is rejected.
/// - The two check digits are computed from weighted digit sums reduced
///   modulo eleven (a remainder of ten counts as zero). The number is
///   accepted when the sum of its last two digits equals the sum of the two
///   computed values.
///
/// ## Examples
///
/// ```
/// use cadastro_core::Cpf;
///
/// // Valid CPFs, with and without punctuation
/// assert!(Cpf::parse("111.444.777-35").is_ok());
/// assert!(Cpf::parse("52998224725").is_ok());
///
/// // Invalid CPFs
/// assert!(Cpf::parse("11111111111").is_err()); // repeated digit
/// assert!(Cpf::parse("11144477736").is_err()); // wrong check digits
/// assert!(Cpf::parse("111444777350").is_err()); // twelve digits
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Cpf(String);

impl Cpf {
    /// Number of digits in a full CPF.
    pub const DIGITS: usize = 11;

    /// Parse a `Cpf` from a string, keeping the original spelling.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Contains more than eleven digits
    /// - Reduces to a single repeated digit (this includes inputs with no
    ///   digits at all, which pad to eleven zeros)
    /// - Fails the check-digit comparison
    pub fn parse(s: &str) -> Result<Self, CpfError> {
        let stripped: Vec<u8> = digit_values(s).collect();

        if stripped.len() > Self::DIGITS {
            return Err(CpfError::TooLong { max: Self::DIGITS });
        }

        let digits = left_pad(&stripped);

        if let Some((&head, tail)) = digits.split_first() {
            if tail.iter().all(|&digit| digit == head) {
                return Err(CpfError::RepeatedDigits);
            }
        }

        let (first, second) = check_values(&digits);
        if u32::from(digits[9]) + u32::from(digits[10]) != first + second {
            return Err(CpfError::ChecksumMismatch);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns `true` when the input parses as a valid CPF.
    #[must_use]
    pub fn is_valid(s: &str) -> bool {
        Self::parse(s).is_ok()
    }

    /// Returns the CPF exactly as it was written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Cpf` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Returns the eleven digit values, left-padded with zeros.
    #[must_use]
    pub fn digits(&self) -> [u8; 11] {
        let stripped: Vec<u8> = digit_values(&self.0).collect();
        left_pad(&stripped)
    }
}

impl fmt::Display for Cpf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Cpf {
    type Err = CpfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Cpf {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn digit_values(s: &str) -> impl Iterator<Item = u8> + '_ {
    s.bytes().filter(u8::is_ascii_digit).map(|b| b - b'0')
}

fn left_pad(stripped: &[u8]) -> [u8; 11] {
    let pad = Cpf::DIGITS.saturating_sub(stripped.len());
    let mut digits = [0u8; 11];
    for (slot, &value) in digits.iter_mut().skip(pad).zip(stripped) {
        *slot = value;
    }
    digits
}

/// Weighted digit sums reduced modulo eleven, with ten counting as zero.
///
/// The first value weighs the leading nine digits by position starting at
/// one; the second weighs the leading ten digits by position starting at
/// zero.
fn check_values(digits: &[u8; 11]) -> (u32, u32) {
    let first: u32 = digits
        .iter()
        .take(9)
        .zip(1u32..)
        .map(|(&digit, weight)| u32::from(digit) * weight)
        .sum();
    let second: u32 = digits
        .iter()
        .take(10)
        .zip(0u32..)
        .map(|(&digit, weight)| u32::from(digit) * weight)
        .sum();
    (reduce(first), reduce(second))
}

const fn reduce(sum: u32) -> u32 {
    let remainder = sum % 11;
    if remainder == 10 { 0 } else { remainder }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_cpfs() {
        assert!(Cpf::parse("11144477735").is_ok());
        assert!(Cpf::parse("52998224725").is_ok());
        assert!(Cpf::parse("111.444.777-35").is_ok());
        assert!(Cpf::parse("529.982.247-25").is_ok());
    }

    #[test]
    fn test_parse_pads_short_inputs() {
        // "138" pads to 00000000138, whose check digits hold up.
        assert!(Cpf::parse("138").is_ok());
        assert_eq!(
            Cpf::parse("138").unwrap().digits(),
            [0, 0, 0, 0, 0, 0, 0, 0, 1, 3, 8]
        );
        assert!(matches!(
            Cpf::parse("123"),
            Err(CpfError::ChecksumMismatch)
        ));
    }

    #[test]
    fn test_short_input_agrees_with_padded_spelling() {
        assert_eq!(Cpf::is_valid("138"), Cpf::is_valid("00000000138"));
        assert_eq!(Cpf::is_valid("123"), Cpf::is_valid("00000000123"));
        assert_eq!(Cpf::is_valid("4477735"), Cpf::is_valid("00004477735"));
    }

    #[test]
    fn test_parse_too_long() {
        assert!(matches!(
            Cpf::parse("111444777350"),
            Err(CpfError::TooLong { max: 11 })
        ));
        assert!(matches!(
            Cpf::parse("111.444.777-3500"),
            Err(CpfError::TooLong { max: 11 })
        ));
    }

    #[test]
    fn test_parse_repeated_digits() {
        assert!(matches!(
            Cpf::parse("11111111111"),
            Err(CpfError::RepeatedDigits)
        ));
        assert!(matches!(
            Cpf::parse("00000000000"),
            Err(CpfError::RepeatedDigits)
        ));
        // No digits at all pads to eleven zeros.
        assert!(matches!(Cpf::parse(""), Err(CpfError::RepeatedDigits)));
        assert!(matches!(Cpf::parse("abc"), Err(CpfError::RepeatedDigits)));
    }

    #[test]
    fn test_parse_checksum_mismatch() {
        assert!(matches!(
            Cpf::parse("11144477736"),
            Err(CpfError::ChecksumMismatch)
        ));
        assert!(matches!(
            Cpf::parse("52998224726"),
            Err(CpfError::ChecksumMismatch)
        ));
    }

    #[test]
    fn test_remainder_ten_counts_as_zero() {
        // The first weighted sum of 10000000108 reduces to ten, which the
        // tables map to zero; 0 + 8 then matches the trailing 0 + 8.
        assert!(Cpf::parse("10000000108").is_ok());
    }

    #[test]
    fn test_sum_comparison_accepts_compensating_check_digits() {
        // 11144477735 is the canonically valid spelling. Changing both
        // check digits can leave the sums in agreement, so 11144477742 also
        // passes even though a position-wise comparison rejects it.
        assert!(Cpf::parse("11144477742").is_ok());
    }

    #[test]
    fn test_keeps_original_spelling() {
        let punctuated = Cpf::parse("111.444.777-35").unwrap();
        let bare = Cpf::parse("11144477735").unwrap();
        assert_eq!(punctuated.as_str(), "111.444.777-35");
        assert_eq!(bare.as_str(), "11144477735");
        assert_ne!(punctuated, bare);
        assert_eq!(punctuated.digits(), bare.digits());
    }

    #[test]
    fn test_display() {
        let cpf = Cpf::parse("111.444.777-35").unwrap();
        assert_eq!(format!("{cpf}"), "111.444.777-35");
    }

    #[test]
    fn test_serde_roundtrip() {
        let cpf = Cpf::parse("11144477735").unwrap();
        let json = serde_json::to_string(&cpf).unwrap();
        assert_eq!(json, "\"11144477735\"");

        let parsed: Cpf = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, cpf);
    }

    #[test]
    fn test_from_str() {
        let cpf: Cpf = "52998224725".parse().unwrap();
        assert_eq!(cpf.as_str(), "52998224725");
    }

    #[test]
    fn test_is_valid() {
        assert!(Cpf::is_valid("11144477735"));
        assert!(!Cpf::is_valid("11144477736"));
    }
}
