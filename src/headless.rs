//! One-shot output for SecureCheck.
//!
//! Implements `--summary`, `--run`, and `--list-queries`: render the
//! requested piece of the dashboard to stdout as text or JSON and exit,
//! without ever starting the terminal UI.

use crate::catalog::{CatalogSection, ComplexQuery, InsightQuery};
use crate::cli::OutputFormat;
use crate::db::{DatabaseClient, QueryResult, Value};
use crate::error::{Result, SecureCheckError};
use crate::query::{ExecutionResult, QueryRunner};
use crate::snapshot::StopSnapshot;

/// Renders the catalog labels for `--list-queries`.
pub fn render_catalog(format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut out = String::new();
            for (title, labels) in [
                (
                    CatalogSection::Simple.title(),
                    InsightQuery::ALL
                        .iter()
                        .map(|q| q.label())
                        .collect::<Vec<_>>(),
                ),
                (
                    CatalogSection::Complex.title(),
                    ComplexQuery::ALL
                        .iter()
                        .map(|q| q.label())
                        .collect::<Vec<_>>(),
                ),
            ] {
                out.push_str(title);
                out.push_str(":\n");
                for label in labels {
                    out.push_str("  ");
                    out.push_str(label);
                    out.push('\n');
                }
            }
            out
        }
        OutputFormat::Json => {
            let value = serde_json::json!({
                "simple": InsightQuery::ALL.iter().map(|q| q.label()).collect::<Vec<_>>(),
                "complex": ComplexQuery::ALL.iter().map(|q| q.label()).collect::<Vec<_>>(),
            });
            pretty_json(&value)
        }
    }
}

/// Renders the summary metrics for `--summary`.
pub fn render_summary(snapshot: &StopSnapshot, format: OutputFormat) -> String {
    let metrics = snapshot.metrics();

    match format {
        OutputFormat::Text => {
            let mut out = String::new();
            out.push_str(&format!("Total Police Stops   {}\n", metrics.total_stops));
            out.push_str(&format!("Total Arrests        {}\n", metrics.total_arrests));
            out.push_str(&format!("Total Warnings       {}\n", metrics.total_warnings));
            out.push_str(&format!(
                "Drug-Related Stops   {}\n",
                metrics.drug_related_stops
            ));
            if snapshot.skipped_rows() > 0 {
                out.push_str(&format!(
                    "({} rows skipped during load)\n",
                    snapshot.skipped_rows()
                ));
            }
            out
        }
        OutputFormat::Json => {
            let value = serde_json::json!({
                "metrics": metrics,
                "skipped_rows": snapshot.skipped_rows(),
            });
            pretty_json(&value)
        }
    }
}

/// Runs one catalog query for `--run` and renders the outcome.
///
/// A catalog miss or an execution failure is returned as an error so the
/// process can exit nonzero; the message carries the diagnostic.
pub async fn run_catalog_query(
    db: &dyn DatabaseClient,
    label: &str,
    format: OutputFormat,
) -> Result<String> {
    let runner = QueryRunner::new(db);

    match runner.run_label(label).await {
        ExecutionResult::Success(outcome) => Ok(render_result(&outcome.result, label, format)),
        ExecutionResult::Failed { entry, message } => Err(SecureCheckError::query(format!(
            "'{}' failed: {}",
            entry.label(),
            message
        ))),
        ExecutionResult::NotFound { label } => Err(SecureCheckError::query(format!(
            "No catalog query named '{}'. Use --list-queries to see the available labels.",
            label
        ))),
    }
}

/// Renders a query result in the requested format.
pub fn render_result(result: &QueryResult, label: &str, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut out = format!("{label}\n");
            out.push_str(&format_result_table(result));
            if let Some(warning) = result.truncation_warning() {
                out.push_str(&warning);
                out.push('\n');
            }
            out
        }
        OutputFormat::Json => {
            let rows: Vec<Vec<serde_json::Value>> = result
                .rows
                .iter()
                .map(|row| row.iter().map(value_to_json).collect())
                .collect();
            let value = serde_json::json!({
                "label": label,
                "columns": result.columns.iter().map(|c| c.name.clone()).collect::<Vec<_>>(),
                "rows": rows,
                "row_count": result.row_count,
                "was_truncated": result.was_truncated,
            });
            pretty_json(&value)
        }
    }
}

/// Formats a query result as an aligned text table.
pub fn format_result_table(result: &QueryResult) -> String {
    if result.columns.is_empty() {
        return "(empty result)\n".to_string();
    }

    // Column widths from headers and cell contents
    let mut widths: Vec<usize> = result.columns.iter().map(|c| c.name.len()).collect();
    for row in &result.rows {
        for (i, value) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(value.to_display_string().len());
            }
        }
    }

    let mut out = String::new();

    let header: Vec<String> = result
        .columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| format!("{:w$}", c.name, w = *w))
        .collect();
    out.push_str(&header.join("  "));
    out.push('\n');

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');

    for row in &result.rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{:w$}", v.to_display_string(), w = *w))
            .collect();
        out.push_str(cells.join("  ").trim_end());
        out.push('\n');
    }

    out.push_str(&format!(
        "{} row{} returned ({}ms)\n",
        result.row_count,
        if result.row_count == 1 { "" } else { "s" },
        result.execution_time.as_millis()
    ));

    out
}

/// Maps a database value to plain JSON.
fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::from(*b),
        Value::Int(i) => serde_json::Value::from(*i),
        Value::Float(f) => serde_json::Value::from(*f),
        Value::String(s) => serde_json::Value::from(s.clone()),
        Value::Date(_) | Value::Time(_) => serde_json::Value::from(value.to_display_string()),
    }
}

fn pretty_json(value: &serde_json::Value) -> String {
    let mut out = serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string());
    out.push('\n');
    out
}
