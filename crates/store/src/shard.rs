//! Path-template sharding.
//!
//! A template is a short `/`-separated token string parsed once into an
//! ordered list of segment generators. Generators map either a timestamp
//! or an identifier string to a subdirectory chain, fanning blobs out
//! across directories without any per-object metadata. Parsing is strict;
//! generation is pure and deterministic.

use crate::StoreError;
use chrono::{Datelike, Timelike};
use std::path::PathBuf;

/// Timestamp segment token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeToken {
    /// `Y`: 4-digit year, e.g. 2016
    Year,
    /// `M`: 2-digit month, 01-12
    Month,
    /// `D`: 2-digit day of month, 01-31
    Day,
    /// `h`: 2-digit hour, 00-23
    Hour,
    /// `m`: 2-digit minute, 00-59
    Minute,
    /// `s`: 2-digit second, 00-59
    Second,
    /// `d`: ordinal day of year, 1-366, no padding
    DayOfYear,
}

impl TimeToken {
    fn parse(tok: &str) -> Option<Self> {
        match tok {
            "Y" => Some(Self::Year),
            "M" => Some(Self::Month),
            "D" => Some(Self::Day),
            "h" => Some(Self::Hour),
            "m" => Some(Self::Minute),
            "s" => Some(Self::Second),
            "d" => Some(Self::DayOfYear),
            _ => None,
        }
    }
}

/// Timestamp-based subdirectory template, e.g. "Y/M/D".
#[derive(Clone, Debug)]
pub struct TimeTemplate {
    tokens: Vec<TimeToken>,
}

impl TimeTemplate {
    /// Parse a template string. Each token must be one of `Y M D h m s d`
    /// and may appear at most once; order is up to the caller.
    pub fn parse(cfg: &str) -> Result<Self, StoreError> {
        let mut tokens = Vec::new();
        for part in cfg.split('/') {
            let tok = TimeToken::parse(part)
                .ok_or_else(|| StoreError::Config(format!("invalid time template token: {:?}", part)))?;
            if tokens.contains(&tok) {
                return Err(StoreError::Config(format!(
                    "duplicate time template token: {}",
                    part
                )));
            }
            tokens.push(tok);
        }
        Ok(Self { tokens })
    }

    /// Subdirectory chain for a timestamp.
    pub fn dir<T: Datelike + Timelike>(&self, tm: &T) -> PathBuf {
        let mut path = PathBuf::new();
        for tok in &self.tokens {
            path.push(match tok {
                TimeToken::Year => format!("{:04}", tm.year()),
                TimeToken::Month => format!("{:02}", tm.month()),
                TimeToken::Day => format!("{:02}", tm.day()),
                TimeToken::Hour => format!("{:02}", tm.hour()),
                TimeToken::Minute => format!("{:02}", tm.minute()),
                TimeToken::Second => format!("{:02}", tm.second()),
                TimeToken::DayOfYear => format!("{}", tm.ordinal()),
            });
        }
        path
    }
}

/// Identifier-based subdirectory template, e.g. "1/2/3".
///
/// Each token is a 1-based character offset into the identifier; the
/// selected character, lowercased, names a 1-character subdirectory.
/// Offsets need not be contiguous.
#[derive(Clone, Debug)]
pub struct IdTemplate {
    offsets: Vec<usize>,
}

impl IdTemplate {
    /// Parse a template string of positive integers.
    pub fn parse(cfg: &str) -> Result<Self, StoreError> {
        let mut offsets = Vec::new();
        for part in cfg.split('/') {
            let n: usize = part
                .parse()
                .map_err(|_| StoreError::Config(format!("invalid id template token: {:?}", part)))?;
            if n == 0 {
                return Err(StoreError::Config(
                    "id template offsets are 1-based, got 0".to_string(),
                ));
            }
            offsets.push(n);
        }
        Ok(Self { offsets })
    }

    /// Subdirectory chain for an identifier string.
    /// Offsets beyond the identifier length are skipped.
    pub fn dir(&self, id: &str) -> PathBuf {
        let chars: Vec<char> = id.chars().collect();
        let mut path = PathBuf::new();
        for &n in &self.offsets {
            if let Some(c) = chars.get(n - 1) {
                path.push(c.to_ascii_lowercase().to_string());
            }
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_time() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2016, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 42)
            .unwrap()
    }

    #[test]
    fn test_time_template_segments() {
        let t = TimeTemplate::parse("Y/M/D").unwrap();
        assert_eq!(t.dir(&sample_time()), PathBuf::from("2016/03/07"));

        let t = TimeTemplate::parse("h/m/s").unwrap();
        assert_eq!(t.dir(&sample_time()), PathBuf::from("09/05/42"));
    }

    #[test]
    fn test_day_of_year_unpadded() {
        let t = TimeTemplate::parse("d").unwrap();
        // 2016-03-07 is day 67 of a leap year
        assert_eq!(t.dir(&sample_time()), PathBuf::from("67"));
    }

    #[test]
    fn test_time_template_order_is_callers() {
        let t = TimeTemplate::parse("D/Y").unwrap();
        assert_eq!(t.dir(&sample_time()), PathBuf::from("07/2016"));
    }

    #[test]
    fn test_time_template_rejects_bad_tokens() {
        assert!(TimeTemplate::parse("Y/X").is_err());
        assert!(TimeTemplate::parse("YM").is_err());
        assert!(TimeTemplate::parse("Y//D").is_err());
        assert!(TimeTemplate::parse("").is_err());
    }

    #[test]
    fn test_time_template_rejects_duplicates() {
        assert!(TimeTemplate::parse("Y/M/Y").is_err());
    }

    #[test]
    fn test_id_template_selects_and_lowercases() {
        let t = IdTemplate::parse("1/2/3").unwrap();
        assert_eq!(t.dir("AB3def"), PathBuf::from("a/b/3"));
    }

    #[test]
    fn test_id_template_sparse_offsets() {
        let t = IdTemplate::parse("2/5").unwrap();
        assert_eq!(t.dir("abcdef"), PathBuf::from("b/e"));
    }

    #[test]
    fn test_id_template_skips_out_of_range() {
        let t = IdTemplate::parse("1/9").unwrap();
        assert_eq!(t.dir("abc"), PathBuf::from("a"));
        let t = IdTemplate::parse("9").unwrap();
        assert_eq!(t.dir("abc"), PathBuf::new());
    }

    #[test]
    fn test_id_template_rejects_bad_tokens() {
        assert!(IdTemplate::parse("1/x").is_err());
        assert!(IdTemplate::parse("0").is_err());
        assert!(IdTemplate::parse("-1/2").is_err());
        assert!(IdTemplate::parse("").is_err());
    }

    #[test]
    fn test_templates_are_deterministic() {
        let t = IdTemplate::parse("1/2/3").unwrap();
        assert_eq!(t.dir("f00dbeef"), t.dir("f00dbeef"));
    }
}
