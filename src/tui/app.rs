//! Application state for the SecureCheck TUI.
//!
//! Holds the snapshot-derived dashboard data, the selector state of the
//! insights tab, and the report form. Key handling is synchronous; running
//! a catalog query is the only action that escapes to the async loop.

use crate::catalog::{CatalogEntry, CatalogSection, ComplexQuery, InsightQuery};
use crate::config::DashboardConfig;
use crate::db::{ColumnInfo, QueryResult, Value};
use crate::report::{DurationBucket, Gender, StopReport, MAX_DRIVER_AGE, MIN_DRIVER_AGE};
use crate::snapshot::{StopSnapshot, SummaryMetrics};
use crate::tui::events::Event;
use chrono::NaiveTime;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// The dashboard tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Overview,
    Insights,
    Report,
}

impl Tab {
    /// All tabs, in display order.
    pub const ALL: [Tab; 3] = [Self::Overview, Self::Insights, Self::Report];

    /// Returns the tab title.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Insights => "Insights",
            Self::Report => "Report",
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    fn next(&self) -> Tab {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn prev(&self) -> Tab {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// An action the async loop must perform on behalf of the app.
#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    /// Run the given catalog entry and store its outcome.
    RunQuery(CatalogEntry),
}

/// Outcome of the last insights query, kept for rendering.
#[derive(Debug)]
pub enum InsightOutcome {
    /// Query succeeded; show the result table.
    Table {
        label: &'static str,
        result: QueryResult,
    },
    /// Query failed; show the diagnostic in the result pane.
    Error {
        label: &'static str,
        message: String,
    },
}

/// Selector state of the insights tab.
#[derive(Debug)]
pub struct InsightsState {
    /// Which catalog section the selector shows.
    pub section: CatalogSection,
    /// Selected index within the section.
    pub selected: usize,
    /// Outcome of the last run, if any.
    pub outcome: Option<InsightOutcome>,
}

impl InsightsState {
    fn new() -> Self {
        Self {
            section: CatalogSection::Simple,
            selected: 0,
            outcome: None,
        }
    }

    /// Returns the entries of the current section, in selector order.
    pub fn entries(&self) -> Vec<CatalogEntry> {
        match self.section {
            CatalogSection::Simple => InsightQuery::ALL
                .iter()
                .map(|q| CatalogEntry::Simple(*q))
                .collect(),
            CatalogSection::Complex => ComplexQuery::ALL
                .iter()
                .map(|q| CatalogEntry::Complex(*q))
                .collect(),
        }
    }

    /// Returns the currently selected entry.
    pub fn selected_entry(&self) -> CatalogEntry {
        let entries = self.entries();
        entries[self.selected.min(entries.len() - 1)]
    }

    fn select_next(&mut self) {
        let len = self.entries().len();
        self.selected = (self.selected + 1) % len;
    }

    fn select_prev(&mut self) {
        let len = self.entries().len();
        self.selected = (self.selected + len - 1) % len;
    }

    fn toggle_section(&mut self) {
        self.section = match self.section {
            CatalogSection::Simple => CatalogSection::Complex,
            CatalogSection::Complex => CatalogSection::Simple,
        };
        self.selected = 0;
    }
}

/// Fields of the report form, in navigation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportField {
    Age,
    Gender,
    Violation,
    StopTime,
    Search,
    Outcome,
    Duration,
    Drugs,
}

impl ReportField {
    /// All fields, in navigation order.
    pub const ALL: [ReportField; 8] = [
        Self::Age,
        Self::Gender,
        Self::Violation,
        Self::StopTime,
        Self::Search,
        Self::Outcome,
        Self::Duration,
        Self::Drugs,
    ];

    /// Returns the form label for this field.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Age => "Driver Age",
            Self::Gender => "Driver Gender",
            Self::Violation => "Violation",
            Self::StopTime => "Stop Time",
            Self::Search => "Was a search conducted?",
            Self::Outcome => "Stop Outcome",
            Self::Duration => "Stop Duration",
            Self::Drugs => "Was it drug-related?",
        }
    }
}

/// State of the report form.
#[derive(Debug)]
pub struct ReportForm {
    /// Index into `ReportField::ALL` of the focused field.
    pub field: usize,
    pub age: u8,
    pub gender: usize,
    pub violation: usize,
    pub time: NaiveTime,
    pub search_conducted: bool,
    pub outcome: usize,
    pub duration: usize,
    pub drugs_related: bool,
    /// The composed summary, once generated.
    pub composed: Option<String>,
    /// Validation error from the last compose attempt.
    pub error: Option<String>,
}

impl ReportForm {
    fn new() -> Self {
        Self {
            field: 0,
            age: 27,
            gender: 0,
            violation: 0,
            time: NaiveTime::from_hms_opt(12, 0, 0).expect("noon is a valid time"),
            search_conducted: false,
            outcome: 0,
            duration: 0,
            drugs_related: false,
            composed: None,
            error: None,
        }
    }

    /// Returns the focused field.
    pub fn focused(&self) -> ReportField {
        ReportField::ALL[self.field.min(ReportField::ALL.len() - 1)]
    }

    fn focus_next(&mut self) {
        self.field = (self.field + 1) % ReportField::ALL.len();
    }

    fn focus_prev(&mut self) {
        self.field = (self.field + ReportField::ALL.len() - 1) % ReportField::ALL.len();
    }

    fn shift_time(&mut self, minutes: i64) {
        use chrono::Timelike;
        let total = (self.time.hour() * 60 + self.time.minute()) as i64;
        let shifted = (total + minutes).rem_euclid(24 * 60) as u32;
        self.time = NaiveTime::from_hms_opt(shifted / 60, shifted % 60, 0)
            .expect("shifted time stays within the day");
    }
}

/// The main TUI application state.
pub struct App {
    /// Whether the main loop keeps running.
    pub running: bool,
    /// The active tab.
    pub tab: Tab,
    /// Connection description for the header.
    pub connection_info: String,
    /// True while a catalog query is in flight.
    pub is_running_query: bool,

    /// The four metric tiles.
    pub metrics: SummaryMetrics,
    /// Violation counts for the bar chart, descending.
    pub violation_counts: Vec<(String, u64)>,
    /// Vehicle log table derived from the snapshot.
    pub vehicle_log: QueryResult,
    /// Outcome summary table derived from the snapshot.
    pub outcome_summary: QueryResult,
    /// Distinct violations observed in the snapshot.
    pub violations: Vec<String>,
    /// Distinct outcomes observed in the snapshot.
    pub outcomes: Vec<String>,
    /// Rows skipped while decoding the snapshot.
    pub skipped_rows: usize,

    /// Insights tab state.
    pub insights: InsightsState,
    /// Report tab state.
    pub report: ReportForm,

    /// Maximum number of bars in the violation chart.
    pub chart_bars: usize,
}

impl App {
    /// Creates the app state from the loaded snapshot.
    pub fn new(snapshot: &StopSnapshot, connection_info: String, dashboard: &DashboardConfig) -> Self {
        Self {
            running: true,
            tab: Tab::Overview,
            connection_info,
            is_running_query: false,
            metrics: snapshot.metrics(),
            violation_counts: snapshot.violation_counts(),
            vehicle_log: vehicle_log_result(snapshot, dashboard.vehicle_log_rows),
            outcome_summary: outcome_summary_result(snapshot),
            violations: snapshot.violations(),
            outcomes: snapshot.outcomes(),
            skipped_rows: snapshot.skipped_rows(),
            insights: InsightsState::new(),
            report: ReportForm::new(),
            chart_bars: dashboard.chart_bars,
        }
    }

    /// Handles an event, returning an action for the async loop if needed.
    pub fn handle_event(&mut self, event: Event) -> Option<Action> {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Resize(..) | Event::Tick => None,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        // Global shortcuts first
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q')
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                self.running = false;
                return None;
            }
            KeyCode::Char('q') => {
                self.running = false;
                return None;
            }
            KeyCode::Tab => {
                self.tab = self.tab.next();
                return None;
            }
            KeyCode::BackTab => {
                self.tab = self.tab.prev();
                return None;
            }
            KeyCode::Char('1') => {
                self.tab = Tab::Overview;
                return None;
            }
            KeyCode::Char('2') => {
                self.tab = Tab::Insights;
                return None;
            }
            KeyCode::Char('3') => {
                self.tab = Tab::Report;
                return None;
            }
            _ => {}
        }

        match self.tab {
            Tab::Overview => None,
            Tab::Insights => self.handle_insights_key(key),
            Tab::Report => {
                self.handle_report_key(key);
                None
            }
        }
    }

    fn handle_insights_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.insights.select_prev();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.insights.select_next();
                None
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Char('s') => {
                self.insights.toggle_section();
                None
            }
            KeyCode::Enter if !self.is_running_query => {
                Some(Action::RunQuery(self.insights.selected_entry()))
            }
            _ => None,
        }
    }

    fn handle_report_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.report.focus_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.report.focus_next(),
            KeyCode::Left | KeyCode::Char('h') => self.adjust_report_field(-1),
            KeyCode::Right | KeyCode::Char('l') => self.adjust_report_field(1),
            KeyCode::Enter => self.compose_report(),
            _ => {}
        }
    }

    /// Steps the focused report field by `delta`.
    fn adjust_report_field(&mut self, delta: i64) {
        fn cycle(current: usize, len: usize, delta: i64) -> usize {
            if len == 0 {
                return 0;
            }
            (current as i64 + delta).rem_euclid(len as i64) as usize
        }

        match self.report.focused() {
            ReportField::Age => {
                let age = self.report.age as i64 + delta;
                self.report.age = age.clamp(MIN_DRIVER_AGE as i64, MAX_DRIVER_AGE as i64) as u8;
            }
            ReportField::Gender => {
                self.report.gender = cycle(self.report.gender, Gender::ALL.len(), delta);
            }
            ReportField::Violation => {
                self.report.violation = cycle(self.report.violation, self.violations.len(), delta);
            }
            ReportField::StopTime => self.report.shift_time(delta * 15),
            ReportField::Search => self.report.search_conducted = !self.report.search_conducted,
            ReportField::Outcome => {
                self.report.outcome = cycle(self.report.outcome, self.outcomes.len(), delta);
            }
            ReportField::Duration => {
                self.report.duration = cycle(self.report.duration, DurationBucket::ALL.len(), delta);
            }
            ReportField::Drugs => self.report.drugs_related = !self.report.drugs_related,
        }
    }

    /// Returns the display value of a report field.
    pub fn report_field_value(&self, field: ReportField) -> String {
        match field {
            ReportField::Age => self.report.age.to_string(),
            ReportField::Gender => Gender::ALL[self.report.gender].as_str().to_string(),
            ReportField::Violation => self
                .violations
                .get(self.report.violation)
                .cloned()
                .unwrap_or_else(|| "(none observed)".to_string()),
            ReportField::StopTime => self.report.time.format("%H:%M").to_string(),
            ReportField::Search => yes_no(self.report.search_conducted),
            ReportField::Outcome => self
                .outcomes
                .get(self.report.outcome)
                .cloned()
                .unwrap_or_else(|| "(none observed)".to_string()),
            ReportField::Duration => DurationBucket::ALL[self.report.duration].label().to_string(),
            ReportField::Drugs => yes_no(self.report.drugs_related),
        }
    }

    /// Builds and composes the report from the current form state.
    fn compose_report(&mut self) {
        let report = StopReport {
            driver_age: self.report.age,
            gender: Gender::ALL[self.report.gender],
            violation: self
                .violations
                .get(self.report.violation)
                .cloned()
                .unwrap_or_default(),
            stop_time: self.report.time,
            search_conducted: self.report.search_conducted,
            stop_outcome: self
                .outcomes
                .get(self.report.outcome)
                .cloned()
                .unwrap_or_default(),
            duration: DurationBucket::ALL[self.report.duration],
            drugs_related: self.report.drugs_related,
        };

        match report.compose() {
            Ok(summary) => {
                self.report.composed = Some(summary);
                self.report.error = None;
            }
            Err(e) => {
                self.report.composed = None;
                self.report.error = Some(e.to_string());
            }
        }
    }

    /// Stores the outcome of a finished catalog query.
    pub fn set_insight_outcome(&mut self, outcome: InsightOutcome) {
        self.insights.outcome = Some(outcome);
    }
}

fn yes_no(flag: bool) -> String {
    if flag { "Yes" } else { "No" }.to_string()
}

/// Builds the vehicle log table from the first rows of the snapshot.
fn vehicle_log_result(snapshot: &StopSnapshot, limit: usize) -> QueryResult {
    let columns = vec![
        ColumnInfo::new("stopping_date", "date"),
        ColumnInfo::new("stop_time", "time"),
        ColumnInfo::new("vehicle_number", "varchar"),
        ColumnInfo::new("country_name", "varchar"),
    ];

    let rows = snapshot
        .vehicle_log(limit)
        .map(|record| {
            vec![
                record.stop_date.map(Value::Date).unwrap_or(Value::Null),
                record.stop_time.map(Value::Time).unwrap_or(Value::Null),
                Value::String(record.vehicle_number.clone()),
                Value::String(record.country_name.clone()),
            ]
        })
        .collect();

    QueryResult::with_data(columns, rows)
}

/// Builds the outcome summary table from the snapshot.
fn outcome_summary_result(snapshot: &StopSnapshot) -> QueryResult {
    let columns = vec![
        ColumnInfo::new("stop_outcome", "varchar"),
        ColumnInfo::new("total_stops", "bigint"),
        ColumnInfo::new("total_arrests", "bigint"),
    ];

    let rows = snapshot
        .outcome_summary()
        .into_iter()
        .map(|summary| {
            vec![
                Value::String(summary.stop_outcome),
                Value::Int(summary.total_stops as i64),
                Value::Int(summary.total_arrests as i64),
            ]
        })
        .collect();

    QueryResult::with_data(columns, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MockDatabaseClient;

    async fn sample_app() -> App {
        let client = MockDatabaseClient::new();
        let snapshot = StopSnapshot::load(&client).await.unwrap();
        App::new(
            &snapshot,
            "secure_check @ localhost:5432".to_string(),
            &DashboardConfig::default(),
        )
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[tokio::test]
    async fn test_initial_state() {
        let app = sample_app().await;
        assert!(app.running);
        assert_eq!(app.tab, Tab::Overview);
        assert_eq!(app.metrics.total_stops, 8);
        assert_eq!(app.vehicle_log.row_count, 8);
        assert_eq!(app.outcome_summary.row_count, 3);
    }

    #[tokio::test]
    async fn test_quit_key() {
        let mut app = sample_app().await;
        app.handle_event(key(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[tokio::test]
    async fn test_tab_cycling() {
        let mut app = sample_app().await;
        app.handle_event(key(KeyCode::Tab));
        assert_eq!(app.tab, Tab::Insights);
        app.handle_event(key(KeyCode::Tab));
        assert_eq!(app.tab, Tab::Report);
        app.handle_event(key(KeyCode::Tab));
        assert_eq!(app.tab, Tab::Overview);
        app.handle_event(key(KeyCode::BackTab));
        assert_eq!(app.tab, Tab::Report);
    }

    #[tokio::test]
    async fn test_insights_selection_and_run() {
        let mut app = sample_app().await;
        app.handle_event(key(KeyCode::Char('2')));
        assert_eq!(app.tab, Tab::Insights);

        app.handle_event(key(KeyCode::Down));
        let action = app.handle_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(
            action,
            Action::RunQuery(CatalogEntry::Simple(InsightQuery::MostSearchedVehicles))
        );
    }

    #[tokio::test]
    async fn test_insights_selection_wraps() {
        let mut app = sample_app().await;
        app.tab = Tab::Insights;

        app.handle_event(key(KeyCode::Up));
        assert_eq!(app.insights.selected, InsightQuery::ALL.len() - 1);
        app.handle_event(key(KeyCode::Down));
        assert_eq!(app.insights.selected, 0);
    }

    #[tokio::test]
    async fn test_insights_section_toggle_resets_selection() {
        let mut app = sample_app().await;
        app.tab = Tab::Insights;
        app.handle_event(key(KeyCode::Down));
        assert_eq!(app.insights.selected, 1);

        app.handle_event(key(KeyCode::Right));
        assert_eq!(app.insights.section, CatalogSection::Complex);
        assert_eq!(app.insights.selected, 0);
        assert_eq!(app.insights.entries().len(), 6);
    }

    #[tokio::test]
    async fn test_no_run_while_query_in_flight() {
        let mut app = sample_app().await;
        app.tab = Tab::Insights;
        app.is_running_query = true;
        assert_eq!(app.handle_event(key(KeyCode::Enter)), None);
    }

    #[tokio::test]
    async fn test_report_field_navigation_and_adjust() {
        let mut app = sample_app().await;
        app.tab = Tab::Report;

        assert_eq!(app.report.focused(), ReportField::Age);
        app.handle_event(key(KeyCode::Right));
        assert_eq!(app.report.age, 28);
        app.handle_event(key(KeyCode::Left));
        assert_eq!(app.report.age, 27);

        app.handle_event(key(KeyCode::Down));
        assert_eq!(app.report.focused(), ReportField::Gender);
        app.handle_event(key(KeyCode::Right));
        assert_eq!(app.report_field_value(ReportField::Gender), "female");
    }

    #[tokio::test]
    async fn test_report_age_clamps() {
        let mut app = sample_app().await;
        app.tab = Tab::Report;
        app.report.age = MAX_DRIVER_AGE;
        app.handle_event(key(KeyCode::Right));
        assert_eq!(app.report.age, MAX_DRIVER_AGE);

        app.report.age = MIN_DRIVER_AGE;
        app.handle_event(key(KeyCode::Left));
        assert_eq!(app.report.age, MIN_DRIVER_AGE);
    }

    #[tokio::test]
    async fn test_report_time_wraps_midnight() {
        let mut app = sample_app().await;
        app.tab = Tab::Report;
        app.report.time = NaiveTime::from_hms_opt(23, 45, 0).unwrap();
        app.report.field = 3; // StopTime
        app.handle_event(key(KeyCode::Right));
        assert_eq!(app.report.time, NaiveTime::from_hms_opt(0, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn test_compose_report_from_form() {
        let mut app = sample_app().await;
        app.tab = Tab::Report;
        app.handle_event(key(KeyCode::Enter));

        let summary = app.report.composed.as_ref().unwrap();
        assert!(summary.contains("27-year-old male driver"));
        // First observed violation/outcome are the defaults
        assert!(summary.contains("DUI"));
        assert!(summary.contains("Arrest"));
        assert!(app.report.error.is_none());
    }

    #[tokio::test]
    async fn test_compose_report_empty_snapshot_sets_error() {
        let client = MockDatabaseClient::empty();
        let snapshot = StopSnapshot::load(&client).await.unwrap();
        let mut app = App::new(
            &snapshot,
            "test".to_string(),
            &DashboardConfig::default(),
        );
        app.tab = Tab::Report;
        app.handle_event(key(KeyCode::Enter));

        assert!(app.report.composed.is_none());
        assert!(app.report.error.as_ref().unwrap().contains("violation"));
    }

    #[tokio::test]
    async fn test_set_insight_outcome() {
        let mut app = sample_app().await;
        app.set_insight_outcome(InsightOutcome::Error {
            label: "Time of Day with Most Traffic Stops",
            message: "ERROR: boom".to_string(),
        });
        assert!(matches!(
            app.insights.outcome,
            Some(InsightOutcome::Error { .. })
        ));
    }
}
