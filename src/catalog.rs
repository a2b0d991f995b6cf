//! The analytical query catalog.
//!
//! A fixed set of labelled SELECT statements over `traffic_stops`, split
//! into the simple insight section and the complex insight section the
//! dashboard exposes. Labels are the UI strings; each variant carries its
//! SQL as a constant. Lookup either resolves a label to its entry or
//! reports a miss; nothing here ever executes SQL.
//!
//! The catalog is deliberately not user-extensible: the strings below are
//! trusted constants, which is the only reason they can be shipped to the
//! database without sanitization.

/// The two sections of the query selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSection {
    /// Single-dimension insight queries.
    Simple,
    /// Multi-dimension breakdowns.
    Complex,
}

impl CatalogSection {
    /// Returns the section heading shown in the UI.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Simple => "Insights",
            Self::Complex => "Complex Insights",
        }
    }
}

/// Simple insight queries (one per selector row).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightQuery {
    TopDrugRelatedVehicles,
    MostSearchedVehicles,
    ArrestRateByAgeGroup,
    GenderDistributionByCountry,
    SearchRateByRaceAndGender,
    BusiestHours,
    AvgDurationByViolation,
    NightVsDayArrestRate,
    ViolationsMostSearchedOrArrested,
    CommonViolationsUnder25,
    ViolationsRarelyEscalating,
    DrugStopsByCountry,
    ArrestRateByCountryAndViolation,
    SearchesByCountry,
}

impl InsightQuery {
    /// All simple queries, in selector order.
    pub const ALL: [InsightQuery; 14] = [
        Self::TopDrugRelatedVehicles,
        Self::MostSearchedVehicles,
        Self::ArrestRateByAgeGroup,
        Self::GenderDistributionByCountry,
        Self::SearchRateByRaceAndGender,
        Self::BusiestHours,
        Self::AvgDurationByViolation,
        Self::NightVsDayArrestRate,
        Self::ViolationsMostSearchedOrArrested,
        Self::CommonViolationsUnder25,
        Self::ViolationsRarelyEscalating,
        Self::DrugStopsByCountry,
        Self::ArrestRateByCountryAndViolation,
        Self::SearchesByCountry,
    ];

    /// Returns the selector label for this query.
    pub fn label(&self) -> &'static str {
        match self {
            Self::TopDrugRelatedVehicles => "Top 10 Drug-Related Vehicles",
            Self::MostSearchedVehicles => "Most Frequently Searched Vehicles",
            Self::ArrestRateByAgeGroup => "Driver Age Group with Highest Arrest Rate",
            Self::GenderDistributionByCountry => "Gender Distribution by Country",
            Self::SearchRateByRaceAndGender => "Race + Gender with Highest Search Rate",
            Self::BusiestHours => "Time of Day with Most Traffic Stops",
            Self::AvgDurationByViolation => "Average Stop Duration by Violation",
            Self::NightVsDayArrestRate => "Are Night Stops More Likely to Lead to Arrests?",
            Self::ViolationsMostSearchedOrArrested => "Violations with Most Searches or Arrests",
            Self::CommonViolationsUnder25 => "Most Common Violations (<25 Age)",
            Self::ViolationsRarelyEscalating => "Rarely Resulting in Search or Arrest",
            Self::DrugStopsByCountry => "Countries with Highest Drug-Related Stops",
            Self::ArrestRateByCountryAndViolation => "Arrest Rate by Country and Violation",
            Self::SearchesByCountry => "Most Stops with Search by Country",
        }
    }

    /// Returns the SQL bound to this query.
    pub fn sql(&self) -> &'static str {
        match self {
            Self::TopDrugRelatedVehicles => {
                r#"
                SELECT vehicle_number
                FROM traffic_stops
                WHERE drugs_related_stop = TRUE
                LIMIT 10;
                "#
            }
            Self::MostSearchedVehicles => {
                r#"
                SELECT vehicle_number, COUNT(*) AS search_count
                FROM traffic_stops
                WHERE search_conducted = TRUE
                GROUP BY vehicle_number
                ORDER BY search_count DESC
                LIMIT 10;
                "#
            }
            Self::ArrestRateByAgeGroup => {
                r#"
                SELECT CASE
                    WHEN driver_age < 25 THEN '<25'
                    WHEN driver_age BETWEEN 25 AND 40 THEN '25-40'
                    WHEN driver_age BETWEEN 41 AND 60 THEN '41-60'
                    ELSE '60+' END AS age_group,
                    ROUND(100.0 * SUM(CASE WHEN is_arrested THEN 1 ELSE 0 END)/COUNT(*), 2) AS arrest_rate
                FROM traffic_stops
                GROUP BY age_group
                ORDER BY arrest_rate DESC;
                "#
            }
            Self::GenderDistributionByCountry => {
                r#"
                SELECT country_name, driver_gender, COUNT(*) AS count
                FROM traffic_stops
                GROUP BY country_name, driver_gender
                ORDER BY country_name, driver_gender;
                "#
            }
            Self::SearchRateByRaceAndGender => {
                r#"
                SELECT driver_race, driver_gender,
                    ROUND(100.0 * SUM(CASE WHEN search_conducted THEN 1 ELSE 0 END)/COUNT(*), 2) AS search_rate
                FROM traffic_stops
                GROUP BY driver_race, driver_gender
                ORDER BY search_rate DESC
                LIMIT 5;
                "#
            }
            Self::BusiestHours => {
                r#"
                SELECT EXTRACT(HOUR FROM stop_time::time) AS hour_of_day,
                       COUNT(*) AS stop_count
                FROM traffic_stops
                GROUP BY hour_of_day
                ORDER BY stop_count DESC
                LIMIT 5;
                "#
            }
            Self::AvgDurationByViolation => {
                r#"
                SELECT violation,
                    ROUND(AVG(stop_duration_minutes)::numeric, 2) AS avg_duration_minutes
                FROM traffic_stops
                GROUP BY violation
                ORDER BY avg_duration_minutes DESC;
                "#
            }
            // Night is hour >= 19 or hour < 5; EXTRACT(HOUR ...) yields 0-23,
            // so an upper bound of 24 can never match.
            Self::NightVsDayArrestRate => {
                r#"
                SELECT
                    CASE
                        WHEN EXTRACT(HOUR FROM stop_time::time) >= 19 OR EXTRACT(HOUR FROM stop_time::time) < 5
                        THEN 'Night' ELSE 'Day' END AS time_period,
                    ROUND(100.0 * SUM(CASE WHEN is_arrested THEN 1 ELSE 0 END)/COUNT(*), 2) AS arrest_rate
                FROM traffic_stops
                GROUP BY time_period;
                "#
            }
            Self::ViolationsMostSearchedOrArrested => {
                r#"
                SELECT violation,
                    COUNT(*) AS total_stops,
                    SUM(CASE WHEN search_conducted THEN 1 ELSE 0 END) AS total_searches,
                    SUM(CASE WHEN is_arrested THEN 1 ELSE 0 END) AS total_arrests
                FROM traffic_stops
                GROUP BY violation
                ORDER BY total_searches DESC, total_arrests DESC
                LIMIT 10;
                "#
            }
            Self::CommonViolationsUnder25 => {
                r#"
                SELECT violation, COUNT(*) AS count
                FROM traffic_stops
                WHERE driver_age < 25
                GROUP BY violation
                ORDER BY count DESC
                LIMIT 5;
                "#
            }
            Self::ViolationsRarelyEscalating => {
                r#"
                SELECT violation,
                    COUNT(*) AS total,
                    SUM(CASE WHEN search_conducted THEN 1 ELSE 0 END) AS searched,
                    SUM(CASE WHEN is_arrested THEN 1 ELSE 0 END) AS arrested
                FROM traffic_stops
                GROUP BY violation
                HAVING SUM(CASE WHEN search_conducted THEN 1 ELSE 0 END) < 5
                   AND SUM(CASE WHEN is_arrested THEN 1 ELSE 0 END) < 5
                ORDER BY total DESC
                LIMIT 10;
                "#
            }
            Self::DrugStopsByCountry => {
                r#"
                SELECT country_name, COUNT(*) AS drug_stops
                FROM traffic_stops
                WHERE drugs_related_stop = TRUE
                GROUP BY country_name
                ORDER BY drug_stops DESC;
                "#
            }
            Self::ArrestRateByCountryAndViolation => {
                r#"
                SELECT country_name, violation,
                    ROUND(100.0 * SUM(CASE WHEN is_arrested THEN 1 ELSE 0 END)/COUNT(*), 2) AS arrest_rate
                FROM traffic_stops
                GROUP BY country_name, violation
                ORDER BY arrest_rate DESC
                LIMIT 10;
                "#
            }
            Self::SearchesByCountry => {
                r#"
                SELECT country_name, COUNT(*) AS search_count
                FROM traffic_stops
                WHERE search_conducted = TRUE
                GROUP BY country_name
                ORDER BY search_count DESC;
                "#
            }
        }
    }
}

/// Complex insight queries (multi-dimension breakdowns).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplexQuery {
    YearlyStopsAndArrestsByCountry,
    ViolationTrendsByAgeAndRace,
    StopsByYearMonthHour,
    HighSearchAndArrestViolations,
    DemographicsByCountry,
    TopArrestViolations,
}

impl ComplexQuery {
    /// All complex queries, in selector order.
    pub const ALL: [ComplexQuery; 6] = [
        Self::YearlyStopsAndArrestsByCountry,
        Self::ViolationTrendsByAgeAndRace,
        Self::StopsByYearMonthHour,
        Self::HighSearchAndArrestViolations,
        Self::DemographicsByCountry,
        Self::TopArrestViolations,
    ];

    /// Returns the selector label for this query.
    pub fn label(&self) -> &'static str {
        match self {
            Self::YearlyStopsAndArrestsByCountry => {
                "Yearly Breakdown of Stops and Arrests by Country"
            }
            Self::ViolationTrendsByAgeAndRace => "Driver Violation Trends Based on Age and Race",
            Self::StopsByYearMonthHour => "Time Period Analysis of Stops (Year, Month, Hour)",
            Self::HighSearchAndArrestViolations => "Violations with High Search and Arrest Rates",
            Self::DemographicsByCountry => "Driver Demographics by Country (Age, Gender, Race)",
            Self::TopArrestViolations => "Top 5 Violations with Highest Arrest Rates",
        }
    }

    /// Returns the SQL bound to this query.
    pub fn sql(&self) -> &'static str {
        match self {
            Self::YearlyStopsAndArrestsByCountry => {
                r#"
                SELECT
                    country_name,
                    EXTRACT(YEAR FROM stopping_date::date) AS year,
                    COUNT(*) AS total_stops,
                    SUM(CASE WHEN is_arrested THEN 1 ELSE 0 END) AS total_arrests
                FROM traffic_stops
                GROUP BY country_name, year
                ORDER BY country_name, year;
                "#
            }
            Self::ViolationTrendsByAgeAndRace => {
                r#"
                SELECT driver_race,
                       CASE
                           WHEN driver_age < 25 THEN '<25'
                           WHEN driver_age BETWEEN 25 AND 40 THEN '25-40'
                           WHEN driver_age BETWEEN 41 AND 60 THEN '41-60'
                           ELSE '60+' END AS age_group,
                       violation,
                       COUNT(*) AS count
                FROM traffic_stops
                GROUP BY driver_race, age_group, violation
                ORDER BY count DESC
                LIMIT 10;
                "#
            }
            Self::StopsByYearMonthHour => {
                r#"
                SELECT
                    EXTRACT(YEAR FROM stopping_date::date) AS year,
                    EXTRACT(MONTH FROM stopping_date::date) AS month,
                    EXTRACT(HOUR FROM stop_time::time) AS hour,
                    COUNT(*) AS total_stops
                FROM traffic_stops
                GROUP BY year, month, hour
                ORDER BY year, month, hour;
                "#
            }
            Self::HighSearchAndArrestViolations => {
                r#"
                SELECT violation,
                       COUNT(*) AS total_stops,
                       ROUND(100.0 * SUM(CASE WHEN search_conducted THEN 1 ELSE 0 END)/COUNT(*), 2) AS search_rate,
                       ROUND(100.0 * SUM(CASE WHEN is_arrested THEN 1 ELSE 0 END)/COUNT(*), 2) AS arrest_rate
                FROM traffic_stops
                GROUP BY violation
                HAVING COUNT(*) > 10
                ORDER BY arrest_rate DESC, search_rate DESC;
                "#
            }
            Self::DemographicsByCountry => {
                r#"
                SELECT country_name, driver_gender, driver_race,
                       ROUND(AVG(driver_age), 1) AS avg_age,
                       COUNT(*) AS total_drivers
                FROM traffic_stops
                GROUP BY country_name, driver_gender, driver_race
                ORDER BY country_name, total_drivers DESC;
                "#
            }
            Self::TopArrestViolations => {
                r#"
                SELECT violation,
                       COUNT(*) AS total_stops,
                       ROUND(100.0 * SUM(CASE WHEN is_arrested THEN 1 ELSE 0 END)/COUNT(*), 2) AS arrest_rate
                FROM traffic_stops
                GROUP BY violation
                HAVING COUNT(*) > 10
                ORDER BY arrest_rate DESC
                LIMIT 5;
                "#
            }
        }
    }
}

/// A catalog entry from either section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogEntry {
    Simple(InsightQuery),
    Complex(ComplexQuery),
}

impl CatalogEntry {
    /// Resolves a selector label to its catalog entry, or reports a miss.
    ///
    /// Labels are matched exactly; a miss means the caller shows a warning
    /// and executes nothing.
    pub fn from_label(label: &str) -> Option<Self> {
        InsightQuery::ALL
            .iter()
            .find(|q| q.label() == label)
            .map(|q| Self::Simple(*q))
            .or_else(|| {
                ComplexQuery::ALL
                    .iter()
                    .find(|q| q.label() == label)
                    .map(|q| Self::Complex(*q))
            })
    }

    /// Returns the selector label for this entry.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Simple(q) => q.label(),
            Self::Complex(q) => q.label(),
        }
    }

    /// Returns the SQL bound to this entry.
    pub fn sql(&self) -> &'static str {
        match self {
            Self::Simple(q) => q.sql(),
            Self::Complex(q) => q.sql(),
        }
    }

    /// Returns the section this entry belongs to.
    pub fn section(&self) -> CatalogSection {
        match self {
            Self::Simple(_) => CatalogSection::Simple,
            Self::Complex(_) => CatalogSection::Complex,
        }
    }

    /// All entries across both sections, in selector order.
    pub fn all() -> impl Iterator<Item = CatalogEntry> {
        InsightQuery::ALL
            .iter()
            .map(|q| CatalogEntry::Simple(*q))
            .chain(ComplexQuery::ALL.iter().map(|q| CatalogEntry::Complex(*q)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_section_counts() {
        assert_eq!(InsightQuery::ALL.len(), 14);
        assert_eq!(ComplexQuery::ALL.len(), 6);
        assert_eq!(CatalogEntry::all().count(), 20);
    }

    #[test]
    fn test_labels_are_unique() {
        let labels: HashSet<&str> = CatalogEntry::all().map(|e| e.label()).collect();
        assert_eq!(labels.len(), 20);
    }

    #[test]
    fn test_lookup_hit_returns_bound_sql() {
        let entry = CatalogEntry::from_label("Most Frequently Searched Vehicles").unwrap();
        assert_eq!(entry.section(), CatalogSection::Simple);
        assert_eq!(entry.sql(), InsightQuery::MostSearchedVehicles.sql());

        let entry = CatalogEntry::from_label("Top 5 Violations with Highest Arrest Rates").unwrap();
        assert_eq!(entry.section(), CatalogSection::Complex);
        assert_eq!(entry.sql(), ComplexQuery::TopArrestViolations.sql());
    }

    #[test]
    fn test_lookup_miss() {
        assert!(CatalogEntry::from_label("Average Donut Consumption").is_none());
        // Near-misses do not match either
        assert!(CatalogEntry::from_label("most frequently searched vehicles").is_none());
        assert!(CatalogEntry::from_label("").is_none());
    }

    #[test]
    fn test_every_entry_is_a_select_on_stops() {
        for entry in CatalogEntry::all() {
            let sql = entry.sql().trim();
            assert!(sql.starts_with("SELECT"), "{} is not a SELECT", entry.label());
            assert!(
                sql.contains("FROM traffic_stops"),
                "{} does not read traffic_stops",
                entry.label()
            );
        }
    }

    #[test]
    fn test_night_stop_boundary_is_closed_form() {
        let sql = InsightQuery::NightVsDayArrestRate.sql();
        assert!(sql.contains(">= 19"));
        assert!(sql.contains("< 5"));
        assert!(!sql.contains("BETWEEN 19 AND 24"));
    }

    #[test]
    fn test_round_trip_label_lookup() {
        for entry in CatalogEntry::all() {
            assert_eq!(CatalogEntry::from_label(entry.label()), Some(entry));
        }
    }
}
