//! Period detection and category/period views over a raw dataset.

use crate::document::{RawDataset, Row};
use crate::labels;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

pub const CATEGORY_KEY: &str = "Klassifikator";

lazy_static! {
    static ref YEAR: Regex = Regex::new(r"^\d{4}$").expect("valid regex");
    static ref DASHED_SUBANNUAL: Regex = Regex::new(r"^\d{4}-(Q[1-4]|\d{1,2})$").expect("valid regex");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PeriodKind {
    /// Bare years, e.g. `2022`.
    Annual,
    /// Quarter or month tokens, e.g. `2022/Q1`, `2022-Q1`, `2023/05`.
    Subannual,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodSet {
    pub kind: PeriodKind,
    pub tokens: Vec<String>,
}

impl PeriodSet {
    /// Classify the keys of one row; sub-annual tokens win over years when both occur.
    pub fn detect(row: &Row) -> Self {
        let sub: Vec<String> = row
            .keys()
            .filter(|k| k.contains('/') || DASHED_SUBANNUAL.is_match(k))
            .cloned()
            .collect();
        if !sub.is_empty() {
            return Self { kind: PeriodKind::Subannual, tokens: sub };
        }
        let years = row.keys().filter(|k| YEAR.is_match(k)).cloned().collect();
        Self { kind: PeriodKind::Annual, tokens: years }
    }
}

/// Numeric reading of a cell; anything non-numeric is missing.
pub fn numeric_cell(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let s = s.trim();
            match s.parse::<f64>() {
                Ok(n) => n,
                Err(_) if s.matches(',').count() == 1 => s.replace(',', ".").parse().ok()?,
                Err(_) => return None,
            }
        }
        _ => return None,
    };
    n.is_finite().then_some(n)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryValue {
    pub category: String,
    pub period: String,
    pub value: f64,
}

/// Read-only view of one dataset: its period set and labelled rows.
pub struct DatasetView<'a> {
    doc: &'a RawDataset,
    periods: PeriodSet,
    rows: Vec<(&'a str, &'a Row)>,
}

impl<'a> DatasetView<'a> {
    /// `None` when the dataset has no data rows at all.
    pub fn new(doc: &'a RawDataset) -> Option<Self> {
        let first = doc.data.first()?;
        let periods = PeriodSet::detect(first);
        let rows = doc
            .data
            .iter()
            .filter_map(|row| match row.get(CATEGORY_KEY) {
                Some(Value::String(label)) if !label.trim().is_empty() => Some((label.as_str(), row)),
                _ => None,
            })
            .collect();
        Some(Self { doc, periods, rows })
    }

    pub fn document(&self) -> &'a RawDataset { self.doc }
    pub fn kind(&self) -> PeriodKind { self.periods.kind }
    pub fn periods(&self) -> &[String] { &self.periods.tokens }

    pub fn first_period(&self) -> Option<&str> {
        self.periods.tokens.first().map(String::as_str)
    }

    pub fn latest_period(&self) -> Option<&str> {
        self.periods.tokens.last().map(String::as_str)
    }

    pub fn categories(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.rows.iter().map(|(label, _)| *label)
    }

    pub fn row_count(&self) -> usize { self.rows.len() }

    pub fn label_at(&self, idx: usize) -> Option<&'a str> {
        self.rows.get(idx).map(|(label, _)| *label)
    }

    /// Cell of the first row labelled `category`. Repeated labels such as
    /// "shu jumladan" need [`DatasetView::value_at`].
    pub fn value(&self, category: &str, period: &str) -> Option<f64> {
        let idx = self.rows.iter().position(|(label, _)| *label == category)?;
        self.value_at(idx, period)
    }

    pub fn value_at(&self, idx: usize, period: &str) -> Option<f64> {
        let (_, row) = self.rows.get(idx)?;
        row.get(period).and_then(numeric_cell)
    }

    /// Numeric cells of one period, in row order.
    pub fn values_at(&self, period: &str) -> Vec<CategoryValue> {
        self.rows
            .iter()
            .filter_map(|(label, row)| {
                let value = row.get(period).and_then(numeric_cell)?;
                Some(CategoryValue { category: label.to_string(), period: period.to_string(), value })
            })
            .collect()
    }

    /// Numeric cells of the first row labelled `category`, in period order.
    pub fn series(&self, category: &str) -> Vec<CategoryValue> {
        self.rows
            .iter()
            .position(|(label, _)| *label == category)
            .map(|idx| self.series_at(idx))
            .unwrap_or_default()
    }

    /// Numeric cells of the row at `idx`, in period order.
    pub fn series_at(&self, idx: usize) -> Vec<CategoryValue> {
        let Some(category) = self.label_at(idx) else { return Vec::new() };
        self.periods
            .tokens
            .iter()
            .filter_map(|p| {
                let value = self.value_at(idx, p)?;
                Some(CategoryValue { category: category.to_string(), period: p.clone(), value })
            })
            .collect()
    }

    /// Values of `period` ranked descending, optionally excluding rows.
    pub fn ranked_at(&self, period: &str, exclude: impl Fn(&str) -> bool) -> Vec<CategoryValue> {
        let mut ranked: Vec<CategoryValue> =
            self.values_at(period).into_iter().filter(|cv| !exclude(&cv.category)).collect();
        ranked.sort_by(|a, b| b.value.total_cmp(&a.value));
        ranked
    }

    pub fn find_exact(&self, label: &str) -> Option<&'a str> {
        self.categories().find(|c| labels::same(c, label))
    }

    pub fn find_containing(&self, fragment: &str) -> Option<&'a str> {
        self.categories().find(|c| labels::contains(c, fragment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(data: Value) -> RawDataset {
        serde_json::from_value(json!({ "metadata": [], "data": data })).unwrap()
    }

    #[test]
    fn prefers_subannual_tokens() {
        let d = doc(json!([{ "Code": "1", "Klassifikator": "A", "2021": 1, "2022/Q1": 2, "2022/Q2": 3 }]));
        let v = DatasetView::new(&d).unwrap();
        assert_eq!(v.kind(), PeriodKind::Subannual);
        assert_eq!(v.periods(), ["2022/Q1", "2022/Q2"]);

        let d = doc(json!([{ "Klassifikator": "A", "2023-Q1": 2, "2023-Q2": 3, "2024": 1 }]));
        let v = DatasetView::new(&d).unwrap();
        assert_eq!(v.kind(), PeriodKind::Subannual);
        assert_eq!(v.periods(), ["2023-Q1", "2023-Q2"]);
    }

    #[test]
    fn annual_tokens_keep_column_order() {
        let d = doc(json!([{ "Code": "1", "Klassifikator": "A", "2019": 1, "2020": 2, "Klassifikator_en": "A" }]));
        let v = DatasetView::new(&d).unwrap();
        assert_eq!(v.kind(), PeriodKind::Annual);
        assert_eq!(v.periods(), ["2019", "2020"]);
        assert_eq!(v.latest_period(), Some("2020"));
    }

    #[test]
    fn non_numeric_cells_are_missing_not_zero() {
        assert_eq!(numeric_cell(&json!(" 12.5 ")), Some(12.5));
        assert_eq!(numeric_cell(&json!("104,3")), Some(104.3));
        assert_eq!(numeric_cell(&json!(7)), Some(7.0));
        assert_eq!(numeric_cell(&json!("-")), None);
        assert_eq!(numeric_cell(&json!("")), None);
        assert_eq!(numeric_cell(&json!(null)), None);
        assert_eq!(numeric_cell(&json!("NaN")), None);
    }

    #[test]
    fn rows_with_gaps_still_count_elsewhere() {
        let d = doc(json!([
            { "Klassifikator": "A", "2020": "…", "2021": 5 },
            { "Klassifikator": "B", "2020": 3 },
            { "2020": 9, "2021": 9 }
        ]));
        let v = DatasetView::new(&d).unwrap();
        let y2020: Vec<_> = v.values_at("2020").into_iter().map(|c| c.category).collect();
        let y2021: Vec<_> = v.values_at("2021").into_iter().map(|c| c.category).collect();
        assert_eq!(y2020, ["B"]);
        assert_eq!(y2021, ["A"]);
        assert_eq!(v.series("A").len(), 1);
    }

    #[test]
    fn repeated_labels_keep_their_own_rows() {
        let d = doc(json!([
            { "Klassifikator": "shu jumladan", "2020": 10, "2021": 20 },
            { "Klassifikator": "shu jumladan", "2020": 100, "2021": 50 }
        ]));
        let v = DatasetView::new(&d).unwrap();
        assert_eq!(v.row_count(), 2);
        assert_eq!(v.value_at(1, "2020"), Some(100.0));
        let second: Vec<f64> = v.series_at(1).into_iter().map(|c| c.value).collect();
        assert_eq!(second, [100.0, 50.0]);
        assert_eq!(v.series("shu jumladan")[0].value, 10.0);
        assert!(v.series_at(2).is_empty());
    }

    #[test]
    fn empty_dataset_has_no_view() {
        let d = doc(json!([]));
        assert!(DatasetView::new(&d).is_none());
    }
}
