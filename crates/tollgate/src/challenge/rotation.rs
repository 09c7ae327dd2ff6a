//! Time-based locale selection.

use tollgate_common::{Locale, TollgateError};

/// Cycles through a fixed list of locales, one per period
#[derive(Debug, Clone)]
pub struct LocaleRotation {
    locales: Vec<Locale>,
    period_secs: u64,
}

impl LocaleRotation {
    pub fn new(locales: Vec<Locale>, period_secs: u64) -> Result<Self, TollgateError> {
        if locales.is_empty() {
            return Err(TollgateError::Config("at least one locale is required".into()));
        }
        if period_secs == 0 {
            return Err(TollgateError::Config(
                "locale rotation period must be positive".into(),
            ));
        }
        Ok(Self { locales, period_secs })
    }

    /// Locale active at `now` (Unix seconds)
    pub fn choose(&self, now: i64) -> Locale {
        let slot = now.max(0) as u64 / self.period_secs;
        self.locales[(slot % self.locales.len() as u64) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotates_per_minute() {
        let rotation = LocaleRotation::new(vec![Locale::De, Locale::Fr], 60).unwrap();
        assert_eq!(rotation.choose(0), Locale::De);
        assert_eq!(rotation.choose(59), Locale::De);
        assert_eq!(rotation.choose(60), Locale::Fr);
        assert_eq!(rotation.choose(119), Locale::Fr);
        assert_eq!(rotation.choose(120), Locale::De);
    }

    #[test]
    fn test_single_locale() {
        let rotation = LocaleRotation::new(vec![Locale::Fr], 60).unwrap();
        for now in [0, 61, 1_700_000_000] {
            assert_eq!(rotation.choose(now), Locale::Fr);
        }
    }

    #[test]
    fn test_rejects_bad_config() {
        assert!(LocaleRotation::new(vec![], 60).is_err());
        assert!(LocaleRotation::new(vec![Locale::De], 0).is_err());
    }
}
