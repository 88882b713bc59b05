use std::collections::{BTreeMap, HashMap};

use clap::ValueEnum;
use comfy_table::Table;
use serde::Serialize;
use storage::dto::scores::{
    CategoryScoresResponse, OverallScoreResponse, PeriodOverPeriodResponse, TicketScoresResponse,
};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Silent,
}

/// Renders `response` in the requested format. `table` is only called for
/// [`OutputFormat::Table`].
pub fn render<T: Serialize>(
    format: OutputFormat,
    response: &T,
    table: impl FnOnce(&T) -> String,
) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(response)?),
        OutputFormat::Table => Ok(table(response)),
        OutputFormat::Silent => Ok("output omitted".to_string()),
    }
}

fn percent(score: i32) -> String {
    format!("{score} %")
}

/// One row per category with its rating count, then one column per period.
/// Periods without ratings for a category are left blank.
pub fn category_scores_table(response: &CategoryScoresResponse, max_cols: usize) -> String {
    let mut periods: Vec<&str> = Vec::new();
    let mut cells: HashMap<(&str, i64), i32> = HashMap::new();
    for entry in &response.scores {
        if !periods.contains(&entry.period.as_str()) {
            periods.push(entry.period.as_str());
        }
        cells.insert((entry.period.as_str(), entry.category_id), entry.score);
    }
    let shown = &periods[..periods.len().min(max_cols)];

    let mut header = vec!["Category".to_string(), "Ratings".to_string()];
    header.extend(shown.iter().map(|period| period.to_string()));

    let mut table = Table::new();
    table.set_header(header);
    for count in &response.counts {
        let mut row = vec![count.category_name.clone(), count.count.to_string()];
        row.extend(shown.iter().map(|period| {
            cells
                .get(&(*period, count.category_id))
                .map(|score| percent(*score))
                .unwrap_or_default()
        }));
        table.add_row(row);
    }

    let mut out = table.to_string();
    if periods.len() > shown.len() {
        out.push_str(&format!(
            "\nOutput limited to {} of {} columns. Use --max-cols to change that",
            shown.len(),
            periods.len()
        ));
    }
    out
}

/// One row per ticket in ascending id order, one column per category.
pub fn ticket_scores_table(response: &TicketScoresResponse, max_rows: usize) -> String {
    let mut tickets: BTreeMap<i64, HashMap<&str, i32>> = BTreeMap::new();
    for entry in &response.scores {
        tickets
            .entry(entry.ticket_id)
            .or_default()
            .insert(entry.category_name.as_str(), entry.score);
    }

    let mut header = vec!["Ticket".to_string()];
    header.extend(response.categories.iter().cloned());

    let mut table = Table::new();
    table.set_header(header);
    for (ticket_id, scores) in tickets.iter().take(max_rows) {
        let mut row = vec![ticket_id.to_string()];
        row.extend(response.categories.iter().map(|category| {
            scores
                .get(category.as_str())
                .map(|score| percent(*score))
                .unwrap_or_default()
        }));
        table.add_row(row);
    }

    let mut out = table.to_string();
    if tickets.len() > max_rows {
        out.push_str(&format!(
            "\nOutput limited to {} of {} rows. Use --max-rows to change that",
            max_rows,
            tickets.len()
        ));
    }
    out
}

pub fn overall_score_table(response: &OverallScoreResponse) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Overall score"]);
    table.add_row(vec![percent(response.score)]);
    table.to_string()
}

pub fn period_diff_table(response: &PeriodOverPeriodResponse) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Category", "Change"]);
    for change in &response.changes {
        table.add_row(vec![change.category_name.clone(), percent(change.diff)]);
    }
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::dto::scores::{
        CategoryCountEntry, CategoryDiffEntry, PeriodScoreEntry, TicketScoreEntry,
    };
    use storage::models::Granularity;

    fn score(category_id: i64, name: &str, period: &str, score: i32) -> PeriodScoreEntry {
        PeriodScoreEntry {
            category_id,
            category_name: name.to_string(),
            period: period.to_string(),
            score,
        }
    }

    fn category_scores() -> CategoryScoresResponse {
        CategoryScoresResponse {
            granularity: Granularity::Day,
            scores: vec![
                score(1, "Spelling", "2019-03-01", 80),
                score(2, "Grammar", "2019-03-01", 60),
                score(1, "Spelling", "2019-03-02", 100),
                score(1, "Spelling", "2019-03-03", 40),
            ],
            counts: vec![
                CategoryCountEntry {
                    category_id: 1,
                    category_name: "Spelling".to_string(),
                    count: 3,
                },
                CategoryCountEntry {
                    category_id: 2,
                    category_name: "Grammar".to_string(),
                    count: 1,
                },
            ],
        }
    }

    fn line_with<'a>(out: &'a str, needle: &str) -> &'a str {
        out.lines().find(|line| line.contains(needle)).unwrap()
    }

    #[test]
    fn test_category_table_pivots_periods() {
        let out = category_scores_table(&category_scores(), 5);

        assert!(line_with(&out, "Category").contains("2019-03-03"));
        let spelling = line_with(&out, "Spelling");
        assert!(spelling.contains("80 %"));
        assert!(spelling.contains("100 %"));
        assert!(spelling.contains("40 %"));
        let grammar = line_with(&out, "Grammar");
        assert!(grammar.contains("60 %"));
        assert!(!grammar.contains("100 %"));
        assert!(!out.contains("Output limited"));
    }

    #[test]
    fn test_category_table_truncates_columns() {
        let out = category_scores_table(&category_scores(), 2);

        assert!(out.contains("2019-03-02"));
        assert!(!out.contains("2019-03-03"));
        assert!(!line_with(&out, "Spelling").contains("40 %"));
        assert!(out.ends_with("Output limited to 2 of 3 columns. Use --max-cols to change that"));
    }

    fn ticket_scores() -> TicketScoresResponse {
        let entry = |ticket_id, name: &str, score| TicketScoreEntry {
            ticket_id,
            category_name: name.to_string(),
            score,
        };
        TicketScoresResponse {
            categories: vec!["Spelling".to_string(), "Grammar".to_string()],
            scores: vec![
                entry(7, "Spelling", 20),
                entry(3, "Spelling", 100),
                entry(3, "Grammar", 60),
                entry(5, "Grammar", 0),
            ],
        }
    }

    #[test]
    fn test_ticket_table_orders_by_id() {
        let out = ticket_scores_table(&ticket_scores(), 5);

        let rows: Vec<usize> = ["| 3", "| 5", "| 7"]
            .iter()
            .map(|needle| out.find(needle).unwrap())
            .collect();
        assert!(rows.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(line_with(&out, "| 5").contains("0 %"));
        assert!(!out.contains("Output limited"));
    }

    #[test]
    fn test_ticket_table_truncates_rows() {
        let out = ticket_scores_table(&ticket_scores(), 2);

        assert!(!out.contains("20 %"));
        assert!(out.ends_with("Output limited to 2 of 3 rows. Use --max-rows to change that"));
    }

    #[test]
    fn test_overall_and_diff_tables() {
        let overall = overall_score_table(&OverallScoreResponse { score: 87 });
        assert!(overall.contains("Overall score"));
        assert!(overall.contains("87 %"));

        let diff = period_diff_table(&PeriodOverPeriodResponse {
            changes: vec![CategoryDiffEntry {
                category_id: 2,
                category_name: "Grammar".to_string(),
                diff: -15,
            }],
        });
        assert!(line_with(&diff, "Category").contains("Change"));
        assert!(line_with(&diff, "Grammar").contains("-15 %"));
    }

    #[test]
    fn test_silent_and_json_output() {
        let response = OverallScoreResponse { score: 42 };

        let silent = render(OutputFormat::Silent, &response, overall_score_table).unwrap();
        assert_eq!(silent, "output omitted");

        let json = render(OutputFormat::Json, &response, overall_score_table).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["score"], 42);
    }
}
