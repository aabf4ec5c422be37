//! Report export over the filtered indicator/target views.
//!
//! # Responsibility
//! - Select indicators by optional perspective/objective filters.
//! - Render delimited text: one header row, one row per record,
//!   semicolon-separated, double-quote-escaped fields, CRLF line breaks,
//!   UTF-8 with byte-order mark.
//!
//! # Invariants
//! - Export is read-only; the graph is never mutated here.

use crate::model::{Graph, Indicator, ObjectiveId, PerspectiveId, Status};

const BOM: &str = "\u{FEFF}";
const DELIMITER: char = ';';
const LINE_BREAK: &str = "\r\n";

/// Optional narrowing of the exported indicator set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportFilter {
    pub perspective_id: Option<PerspectiveId>,
    pub objective_id: Option<ObjectiveId>,
}

/// Columns selectable for the indicator sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorColumn {
    Perspective,
    Objective,
    Indicator,
    Description,
    Formula,
    Unit,
    Source,
    Frequency,
    Polarity,
    Manager,
    Status,
}

impl IndicatorColumn {
    /// Every column in display order.
    pub const ALL: [Self; 11] = [
        Self::Perspective,
        Self::Objective,
        Self::Indicator,
        Self::Description,
        Self::Formula,
        Self::Unit,
        Self::Source,
        Self::Frequency,
        Self::Polarity,
        Self::Manager,
        Self::Status,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Perspective => "Perspective",
            Self::Objective => "Objective",
            Self::Indicator => "Indicator",
            Self::Description => "Description",
            Self::Formula => "Formula",
            Self::Unit => "Unit",
            Self::Source => "Source",
            Self::Frequency => "Frequency",
            Self::Polarity => "Polarity",
            Self::Manager => "Manager",
            Self::Status => "Status",
        }
    }
}

/// Indicators passing `filter`, in graph order.
pub fn filtered_indicators<'g>(graph: &'g Graph, filter: &ReportFilter) -> Vec<&'g Indicator> {
    graph
        .indicators
        .iter()
        .filter(|indicator| {
            if let Some(perspective_id) = filter.perspective_id {
                if indicator.perspective_id != perspective_id {
                    return false;
                }
            }
            if let Some(objective_id) = filter.objective_id {
                if indicator.objective_id != objective_id {
                    return false;
                }
            }
            true
        })
        .collect()
}

/// Renders the indicator sheet with the caller-chosen visible columns.
pub fn indicator_csv(graph: &Graph, filter: &ReportFilter, columns: &[IndicatorColumn]) -> String {
    let mut lines = Vec::new();
    lines.push(join_fields(columns.iter().map(|column| column.label().to_string())));

    for indicator in filtered_indicators(graph, filter) {
        let row = columns
            .iter()
            .map(|column| indicator_cell(graph, indicator, *column));
        lines.push(join_fields(row));
    }

    assemble(lines)
}

/// Renders the target sheet: fixed columns, one row per indicator that has
/// a target within the filtered set.
pub fn target_csv(graph: &Graph, filter: &ReportFilter) -> String {
    const HEADER: [&str; 15] = [
        "Indicator", "Year", "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep",
        "Oct", "Nov", "Dec", "Status",
    ];

    let mut lines = Vec::new();
    lines.push(join_fields(HEADER.iter().map(|label| label.to_string())));

    for indicator in filtered_indicators(graph, filter) {
        let Some(target) = graph.target_for_indicator(indicator.id) else {
            continue;
        };

        let mut row = Vec::with_capacity(HEADER.len());
        row.push(indicator.name.clone());
        row.push(target.year.map(|year| year.to_string()).unwrap_or_default());
        row.extend(target.monthly.as_row().iter().map(|value| value.to_string()));
        row.push(status_label(target.status).to_string());
        lines.push(join_fields(row.into_iter()));
    }

    assemble(lines)
}

fn indicator_cell(graph: &Graph, indicator: &Indicator, column: IndicatorColumn) -> String {
    match column {
        IndicatorColumn::Perspective => graph
            .perspective(indicator.perspective_id)
            .map(|persp| persp.name.clone())
            .unwrap_or_default(),
        IndicatorColumn::Objective => graph
            .objective(indicator.objective_id)
            .map(|objective| objective.name.clone())
            .unwrap_or_default(),
        IndicatorColumn::Indicator => indicator.name.clone(),
        IndicatorColumn::Description => indicator.description.clone(),
        IndicatorColumn::Formula => indicator.formula.clone(),
        IndicatorColumn::Unit => indicator.unit.clone(),
        IndicatorColumn::Source => indicator.source.clone(),
        IndicatorColumn::Frequency => indicator.frequency.clone(),
        IndicatorColumn::Polarity => indicator.polarity.clone(),
        IndicatorColumn::Manager => graph
            .manager(indicator.manager_id)
            .map(|manager| manager.name.clone())
            .unwrap_or_default(),
        IndicatorColumn::Status => status_label(indicator.status).to_string(),
    }
}

fn status_label(status: Status) -> &'static str {
    match status {
        Status::Draft => "draft",
        Status::Final => "final",
    }
}

fn join_fields(fields: impl Iterator<Item = String>) -> String {
    fields
        .map(|field| quote(&field))
        .collect::<Vec<_>>()
        .join(&DELIMITER.to_string())
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn assemble(lines: Vec<String>) -> String {
    format!("{BOM}{}", lines.join(LINE_BREAK))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_escapes_embedded_double_quotes() {
        assert_eq!(quote(r#"say "hi""#), r#""say ""hi""""#);
        assert_eq!(quote(""), r#""""#);
    }

    #[test]
    fn empty_selection_still_emits_bom_and_header() {
        let graph = Graph::default();
        let csv = indicator_csv(&graph, &ReportFilter::default(), &IndicatorColumn::ALL);

        assert!(csv.starts_with(BOM));
        assert!(csv.contains("\"Perspective\";\"Objective\";\"Indicator\""));
        assert!(!csv.contains(LINE_BREAK));
    }
}
