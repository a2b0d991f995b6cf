//! Stop report composition.
//!
//! Turns a set of validated form inputs into the natural-language stop
//! summary shown on the dashboard. Composing a report has no side effects;
//! the string is the whole product.

use crate::error::{Result, SecureCheckError};
use chrono::NaiveTime;

/// Youngest driver age the form accepts.
pub const MIN_DRIVER_AGE: u8 = 16;

/// Oldest driver age the form accepts.
pub const MAX_DRIVER_AGE: u8 = 100;

/// Driver gender selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// All selectable genders, in form order.
    pub const ALL: [Gender; 3] = [Self::Male, Self::Female, Self::Other];

    /// Returns the form label for this gender.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
        }
    }

    /// Parses a form label into a gender.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Stop duration bucket selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationBucket {
    UpToFifteen,
    SixteenToThirty,
    OverThirty,
    OverSixty,
}

impl DurationBucket {
    /// All selectable buckets, in form order.
    pub const ALL: [DurationBucket; 4] = [
        Self::UpToFifteen,
        Self::SixteenToThirty,
        Self::OverThirty,
        Self::OverSixty,
    ];

    /// Returns the form label for this bucket.
    pub fn label(&self) -> &'static str {
        match self {
            Self::UpToFifteen => "0–15 minutes",
            Self::SixteenToThirty => "16–30 minutes",
            Self::OverThirty => "30+ minutes",
            Self::OverSixty => "60+ minutes",
        }
    }

    /// Parses a form label into a bucket.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|b| b.label() == s)
    }
}

/// The validated inputs of one stop report.
#[derive(Debug, Clone, PartialEq)]
pub struct StopReport {
    pub driver_age: u8,
    pub gender: Gender,
    pub violation: String,
    pub stop_time: NaiveTime,
    pub search_conducted: bool,
    pub stop_outcome: String,
    pub duration: DurationBucket,
    pub drugs_related: bool,
}

impl StopReport {
    /// Checks that every field is within its domain.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_DRIVER_AGE..=MAX_DRIVER_AGE).contains(&self.driver_age) {
            return Err(SecureCheckError::report(format!(
                "driver age {} outside {}-{}",
                self.driver_age, MIN_DRIVER_AGE, MAX_DRIVER_AGE
            )));
        }
        if self.violation.trim().is_empty() {
            return Err(SecureCheckError::report("violation must not be empty"));
        }
        if self.stop_outcome.trim().is_empty() {
            return Err(SecureCheckError::report("stop outcome must not be empty"));
        }
        Ok(())
    }

    /// Composes the natural-language summary for this report.
    pub fn compose(&self) -> Result<String> {
        self.validate()?;

        let search_phrase = if self.search_conducted {
            "A search was conducted"
        } else {
            "No search was conducted"
        };
        let drugs_phrase = if self.drugs_related {
            "drug-related"
        } else {
            "not drug-related"
        };

        Ok(format!(
            "A {age}-year-old {gender} driver was stopped for {violation} at {time}.\n\
             {search}, and the driver received a {outcome}.\n\
             The stop lasted {duration} and was {drugs}.",
            age = self.driver_age,
            gender = self.gender.as_str(),
            violation = self.violation,
            time = self.stop_time.format("%I:%M %p"),
            search = search_phrase,
            outcome = self.stop_outcome,
            duration = self.duration.label(),
            drugs = drugs_phrase,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_report() -> StopReport {
        StopReport {
            driver_age: 27,
            gender: Gender::Male,
            violation: "Speeding".to_string(),
            stop_time: NaiveTime::from_hms_opt(14, 30, 0).unwrap(),
            search_conducted: true,
            stop_outcome: "Citation".to_string(),
            duration: DurationBucket::SixteenToThirty,
            drugs_related: false,
        }
    }

    #[test]
    fn test_compose_contains_all_inputs() {
        let summary = sample_report().compose().unwrap();

        assert!(summary.contains("27-year-old"));
        assert!(summary.contains("male driver"));
        assert!(summary.contains("Speeding"));
        assert!(summary.contains("02:30 PM"));
        assert!(summary.contains("A search was conducted"));
        assert!(summary.contains("Citation"));
        assert!(summary.contains("16–30 minutes"));
        assert!(summary.contains("not drug-related"));
    }

    #[test]
    fn test_compose_full_text() {
        let summary = sample_report().compose().unwrap();
        assert_eq!(
            summary,
            "A 27-year-old male driver was stopped for Speeding at 02:30 PM.\n\
             A search was conducted, and the driver received a Citation.\n\
             The stop lasted 16–30 minutes and was not drug-related."
        );
    }

    #[test]
    fn test_compose_negative_phrases() {
        let mut report = sample_report();
        report.search_conducted = false;
        report.drugs_related = true;

        let summary = report.compose().unwrap();
        assert!(summary.contains("No search was conducted"));
        assert!(summary.contains("was drug-related"));
    }

    #[test]
    fn test_morning_time_formatting() {
        let mut report = sample_report();
        report.stop_time = NaiveTime::from_hms_opt(9, 5, 0).unwrap();
        let summary = report.compose().unwrap();
        assert!(summary.contains("09:05 AM"));
    }

    #[test]
    fn test_age_bounds() {
        let mut report = sample_report();

        report.driver_age = MIN_DRIVER_AGE;
        assert!(report.validate().is_ok());

        report.driver_age = MAX_DRIVER_AGE;
        assert!(report.validate().is_ok());

        report.driver_age = 15;
        assert!(report.validate().is_err());

        report.driver_age = 101;
        let err = report.validate().unwrap_err();
        assert!(err.to_string().contains("driver age 101"));
    }

    #[test]
    fn test_empty_violation_rejected() {
        let mut report = sample_report();
        report.violation = "  ".to_string();
        assert!(report.compose().is_err());
    }

    #[test]
    fn test_gender_parse() {
        assert_eq!(Gender::parse("male"), Some(Gender::Male));
        assert_eq!(Gender::parse("Female"), Some(Gender::Female));
        assert_eq!(Gender::parse("unknown"), None);
    }

    #[test]
    fn test_duration_bucket_labels() {
        let labels: Vec<&str> = DurationBucket::ALL.iter().map(|b| b.label()).collect();
        assert_eq!(
            labels,
            vec!["0–15 minutes", "16–30 minutes", "30+ minutes", "60+ minutes"]
        );
        assert_eq!(
            DurationBucket::parse("30+ minutes"),
            Some(DurationBucket::OverThirty)
        );
        assert_eq!(DurationBucket::parse("forever"), None);
    }
}
