use std::fmt;
use lazy_static::lazy_static;
use regex::Regex;
use crate::{Error, Result};

lazy_static! {
    static ref LOCATION: Regex = Regex::new(r"^(?P<scaffold>\w+):(?P<fmin>[0-9]+)\.\.(?P<fmax>[0-9]+)$")
        .expect("location pattern should compile");
}

/// A range on a named reference sequence, half-open and 0-based like the
/// store's own feature locations.
#[derive(Debug, Hash, Eq, PartialEq, Clone)]
pub struct CoordinateRange {
    pub scaffold: String,
    pub fmin: i64,
    pub fmax: i64,
}

impl CoordinateRange {
    /// Parses `<scaffold>:<min>..<max>`, e.g. `3L:37238..59593`.
    ///
    /// Thousands separators are stripped first, so `3L:37,238..59,593` parses
    /// the same way. Anything else yields `None`.
    pub fn parse(text: &str) -> Option<CoordinateRange> {
        let formatted = text.trim().replace(',', "");
        let captures = LOCATION.captures(&formatted)?;
        let fmin = captures["fmin"].parse().ok()?;
        let fmax = captures["fmax"].parse().ok()?;
        Some(CoordinateRange {
            scaffold: captures["scaffold"].to_string(),
            fmin,
            fmax,
        })
    }

    /// Rejects reversed ranges, whose overlap is meaningless.
    pub fn validate(self) -> Result<CoordinateRange> {
        if self.fmin > self.fmax {
            return Err(Error::InvalidInput(format!("reversed range {}", self)));
        }
        Ok(self)
    }

    pub fn overlaps(&self, fmin: i64, fmax: i64) -> bool {
        overlaps(self.fmin, self.fmax, fmin, fmax)
    }
}

impl fmt::Display for CoordinateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}..{}", self.scaffold, self.fmin, self.fmax)
    }
}

/// Whether half-open intervals `[a_min, a_max)` and `[b_min, b_max)` intersect.
#[inline(always)]
pub fn overlaps(a_min: i64, a_max: i64, b_min: i64, b_max: i64) -> bool {
    a_min < b_max && b_min < a_max
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(scaffold: &str, fmin: i64, fmax: i64) -> CoordinateRange {
        CoordinateRange { scaffold: scaffold.to_string(), fmin, fmax }
    }

    #[test]
    fn test_parse_location() {
        assert_eq!(CoordinateRange::parse("3L:37238..59593"), Some(range("3L", 37238, 59593)));
    }

    #[test]
    fn test_parse_strips_commas() {
        assert_eq!(CoordinateRange::parse("3L:37,238..59,593"), Some(range("3L", 37238, 59593)));
    }

    #[test]
    fn test_parse_trims_line() {
        assert_eq!(CoordinateRange::parse("  2R:1..10\n"), Some(range("2R", 1, 10)));
        assert_eq!(CoordinateRange::parse("211000022278279:5..25"), Some(range("211000022278279", 5, 25)));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(CoordinateRange::parse("bad input"), None);
        assert_eq!(CoordinateRange::parse(""), None);
        assert_eq!(CoordinateRange::parse("3L:-5..10"), None);
        assert_eq!(CoordinateRange::parse("3L:5-10"), None);
        assert_eq!(CoordinateRange::parse("3L 5..10"), None);
        assert_eq!(CoordinateRange::parse("3L:5..10 extra"), None);
        assert_eq!(CoordinateRange::parse("3L:99999999999999999999..1"), None);
    }

    #[test]
    fn test_validate_reversed() {
        let reversed = CoordinateRange::parse("X:500..100").unwrap();
        assert!(matches!(reversed.validate(), Err(Error::InvalidInput(_))));
        assert!(range("X", 100, 100).validate().is_ok());
    }

    #[test]
    fn test_half_open_overlap() {
        let query = range("X", 100, 200);
        assert!(query.overlaps(150, 160));
        assert!(query.overlaps(50, 101));
        assert!(query.overlaps(199, 250));
        assert!(query.overlaps(0, 1000));
        assert!(!query.overlaps(50, 100));
        assert!(!query.overlaps(200, 250));
    }

    #[test]
    fn test_display_round_trip() {
        let parsed = CoordinateRange::parse("3L:37,238..59,593").unwrap();
        assert_eq!(parsed.to_string(), "3L:37238..59593");
    }
}
