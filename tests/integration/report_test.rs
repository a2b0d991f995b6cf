//! Report composer tests.

use chrono::NaiveTime;
use securecheck::report::{DurationBucket, Gender, StopReport};

fn example_report() -> StopReport {
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
fn test_summary_interpolates_all_eight_inputs() {
    let summary = example_report().compose().unwrap();

    // Every form input appears in the summary
    assert!(summary.contains("27"));
    assert!(summary.contains("male"));
    assert!(summary.contains("Speeding"));
    assert!(summary.contains("02:30 PM"));
    assert!(summary.contains("A search was conducted"));
    assert!(summary.contains("Citation"));
    assert!(summary.contains("16–30 minutes"));
    assert!(summary.contains("not drug-related"));
}

#[test]
fn test_summary_has_no_side_effects() {
    let report = example_report();
    let first = report.compose().unwrap();
    let second = report.compose().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_out_of_range_age_is_rejected() {
    let mut report = example_report();
    report.driver_age = 12;
    assert!(report.compose().is_err());
}

#[test]
fn test_every_duration_bucket_appears_verbatim() {
    for bucket in DurationBucket::ALL {
        let mut report = example_report();
        report.duration = bucket;
        let summary = report.compose().unwrap();
        assert!(summary.contains(bucket.label()));
    }
}
