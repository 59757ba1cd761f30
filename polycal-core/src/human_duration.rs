//! Parsing of short human durations such as `15m` or `5d`.

use chrono::TimeDelta;

use crate::error::{PolycalError, PolycalResult};

/// Parse `<integer>[d|h|m]` into a duration.
///
/// The suffix multiplies by a day, an hour or a minute; a bare integer is
/// taken as seconds. Signs, fractions and compound values like `1d2h` are
/// rejected.
pub fn parse_human_duration(input: &str) -> PolycalResult<TimeDelta> {
    let invalid = || PolycalError::InvalidDuration(input.to_string());

    let (digits, unit_secs) = match input.char_indices().last() {
        Some((idx, 'd')) => (&input[..idx], 24 * 60 * 60),
        Some((idx, 'h')) => (&input[..idx], 60 * 60),
        Some((idx, 'm')) => (&input[..idx], 60),
        Some(_) => (input, 1),
        None => return Err(invalid()),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let count: i64 = digits.parse().map_err(|_| invalid())?;
    let seconds = count.checked_mul(unit_secs).ok_or_else(invalid)?;
    TimeDelta::try_seconds(seconds).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_suffixes() {
        assert_eq!(parse_human_duration("5d").unwrap(), TimeDelta::seconds(432_000));
        assert_eq!(parse_human_duration("1h").unwrap(), TimeDelta::seconds(3600));
        assert_eq!(parse_human_duration("15m").unwrap(), TimeDelta::seconds(900));
    }

    #[test]
    fn test_parse_bare_seconds() {
        assert_eq!(parse_human_duration("90").unwrap(), TimeDelta::seconds(90));
        assert_eq!(parse_human_duration("0").unwrap(), TimeDelta::zero());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in ["1d2h", "", "d", "-5m", "+5m", "1.5h", "10s", "5 m", " 5m", "abc", "5D"] {
            assert!(
                matches!(parse_human_duration(input), Err(PolycalError::InvalidDuration(_))),
                "expected {:?} to be rejected",
                input
            );
        }
    }

    #[test]
    fn test_parse_rejects_overflow() {
        assert!(parse_human_duration("99999999999999999999d").is_err());
        assert!(parse_human_duration("9223372036854775807d").is_err());
    }
}
