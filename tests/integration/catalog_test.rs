//! Catalog contract tests.
//!
//! The selector labels, the lookup-or-miss behavior, and the shape of the
//! bound SQL are all fixed contracts of the dashboard.

use securecheck::catalog::{CatalogEntry, CatalogSection, ComplexQuery, InsightQuery};

#[test]
fn test_catalog_has_fourteen_simple_and_six_complex_queries() {
    assert_eq!(InsightQuery::ALL.len(), 14);
    assert_eq!(ComplexQuery::ALL.len(), 6);
}

#[test]
fn test_every_label_resolves_to_its_own_sql() {
    for query in InsightQuery::ALL {
        let entry = CatalogEntry::from_label(query.label())
            .unwrap_or_else(|| panic!("label '{}' did not resolve", query.label()));
        assert_eq!(entry.sql(), query.sql());
        assert_eq!(entry.section(), CatalogSection::Simple);
    }

    for query in ComplexQuery::ALL {
        let entry = CatalogEntry::from_label(query.label())
            .unwrap_or_else(|| panic!("label '{}' did not resolve", query.label()));
        assert_eq!(entry.sql(), query.sql());
        assert_eq!(entry.section(), CatalogSection::Complex);
    }
}

#[test]
fn test_unknown_labels_miss() {
    for label in [
        "Average Stop Duration",       // close but not a catalog label
        "top 10 drug-related vehicles", // case matters
        "",
    ] {
        assert!(
            CatalogEntry::from_label(label).is_none(),
            "label '{}' unexpectedly resolved",
            label
        );
    }
}

#[test]
fn test_catalog_queries_are_read_only() {
    for entry in CatalogEntry::all() {
        let sql = entry.sql().to_uppercase();
        for forbidden in ["INSERT", "UPDATE", "DELETE", "DROP", "ALTER", "TRUNCATE"] {
            assert!(
                !sql.contains(forbidden),
                "'{}' contains {}",
                entry.label(),
                forbidden
            );
        }
    }
}

#[test]
fn test_section_titles() {
    assert_eq!(CatalogSection::Simple.title(), "Insights");
    assert_eq!(CatalogSection::Complex.title(), "Complex Insights");
}
