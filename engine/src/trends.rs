//! Chart-ready growth trends per category.

use crate::numeric::{average, growth_rate, round1};
use crate::series::DatasetView;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodGrowth {
    pub period: String,
    pub growth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthTrend {
    pub category: String,
    pub yearly_growth: Vec<PeriodGrowth>,
    pub average_growth: f64,
    /// Mean of the last three growth steps minus the mean of the up to three
    /// before; `None` without an earlier step.
    pub acceleration: Option<f64>,
}

/// One trend per category with at least one growth step, fastest average first.
pub fn growth_trends(view: &DatasetView<'_>) -> Vec<GrowthTrend> {
    let mut trends: Vec<GrowthTrend> = view
        .categories()
        .enumerate()
        .filter_map(|(idx, category)| {
            let series = view.series_at(idx);
            let yearly_growth: Vec<PeriodGrowth> = series
                .windows(2)
                .filter_map(|w| {
                    let growth = growth_rate(w[0].value, w[1].value)?;
                    Some(PeriodGrowth { period: w[1].period.clone(), growth: round1(growth) })
                })
                .collect();
            let rates: Vec<f64> = yearly_growth.iter().map(|g| g.growth).collect();
            let average_growth = round1(average(&rates)?);

            let recent_from = rates.len().saturating_sub(3);
            let previous_from = recent_from.saturating_sub(3);
            let acceleration = match (average(&rates[recent_from..]), average(&rates[previous_from..recent_from])) {
                (Some(recent), Some(previous)) => Some(round1(recent - previous)),
                _ => None,
            };

            Some(GrowthTrend { category: category.to_string(), yearly_growth, average_growth, acceleration })
        })
        .collect();
    trends.sort_by(|a, b| b.average_growth.total_cmp(&a.average_growth));
    trends
}
