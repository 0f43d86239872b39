//! Informal economy and GDP composition datasets.

use super::{Specializer, AGGREGATE};
use crate::format::{fixed1, grouped};
use crate::labels;
use crate::numeric::{average, compound_growth_rate, correlation};
use crate::qa::{QaPair, QaSink};
use crate::series::{CategoryValue, DatasetView};

const COMPONENTS: &[&str] = &["Qishloq", "Savdo"];
const INFORMAL: &str = "Norasmiy";
const FORMAL: &str = "rasmiy";

/// Correlation of the total against named components, plus the half-range trend.
pub struct InformalCorrelation;

/// Compound average growth of the aggregate row over the full range.
pub struct CompoundGrowth;

/// Formal against informal share of their sum at the latest year.
pub struct ComponentShares;

pub fn strength(r: f64) -> &'static str {
    let a = r.abs();
    if a > 0.7 {
        "kuchli"
    } else if a > 0.3 {
        "o'rtacha"
    } else {
        "kuchsiz"
    }
}

pub fn direction(r: f64) -> &'static str {
    if r > 0.0 { "to'g'ri" } else { "teskari" }
}

/// Paired values of two categories over the periods where both are numeric.
fn paired(view: &DatasetView<'_>, a: &str, b: &str) -> (Vec<f64>, Vec<f64>, Vec<String>) {
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    let mut periods = Vec::new();
    for p in view.periods() {
        if let (Some(x), Some(y)) = (view.value(a, p), view.value(b, p)) {
            xs.push(x);
            ys.push(y);
            periods.push(p.clone());
        }
    }
    (xs, ys, periods)
}

fn aggregate_row<'a>(view: &DatasetView<'a>) -> Option<&'a str> {
    view.find_containing(AGGREGATE).or_else(|| view.categories().next())
}

impl Specializer for InformalCorrelation {
    fn name(&self) -> &'static str { "informal_correlation" }

    fn generate(&self, view: &DatasetView<'_>, dataset_id: &str, title: &str) -> Vec<QaPair> {
        let mut out = QaSink::new(dataset_id);
        let Some(total) = view.find_containing(AGGREGATE) else { return out.into_pairs() };

        for fragment in COMPONENTS {
            let Some(component) = view.find_containing(fragment) else { continue };
            let (xs, ys, periods) = paired(view, total, component);
            let r = correlation(&xs, &ys);
            if r.is_nan() {
                continue;
            }
            let span = format!("{}-{}", periods[0], periods[periods.len() - 1]);
            out.push(
                format!("{span} yillarda {total} va {component} ko'rsatkichlari o'rtasida qanday bog'liqlik mavjud?"),
                format!(
                    "{span} yillarda {total} va {component} o'rtasidagi korrelyatsiya koeffitsienti {r:.2} ga teng. Bu {} {} bog'liqlikni ko'rsatadi.",
                    strength(r),
                    direction(r)
                ),
            );
        }

        half_range_trend(view, total, title, &mut out);
        out.into_pairs()
    }
}

/// First-half against second-half mean of one category's series.
fn half_range_trend(view: &DatasetView<'_>, category: &str, title: &str, out: &mut QaSink) {
    let series = view.series(category);
    if series.len() < 2 {
        return;
    }
    let (early, late) = series.split_at(series.len() / 2);
    let mean = |part: &[CategoryValue]| average(&part.iter().map(|c| c.value).collect::<Vec<_>>());
    let (Some(a), Some(b)) = (mean(early), mean(late)) else { return };
    let span = |part: &[CategoryValue]| match part {
        [only] => only.period.clone(),
        _ => format!("{}-{}", part[0].period, part[part.len() - 1].period),
    };

    let verdict = if b < a { "pasayish" } else { "o'sish" };
    out.push(
        format!("{title} ko'rsatkichining umumiy tendensiyasi qanday?"),
        format!(
            "{} yillarda o'rtacha {}%, {} yillarda esa o'rtacha {}% ni tashkil etgan. Bu {verdict} tendensiyasini ko'rsatadi.",
            span(early),
            fixed1(a),
            span(late),
            fixed1(b)
        ),
    );
}

impl Specializer for CompoundGrowth {
    fn name(&self) -> &'static str { "compound_growth" }

    fn generate(&self, view: &DatasetView<'_>, dataset_id: &str, title: &str) -> Vec<QaPair> {
        let mut out = QaSink::new(dataset_id);
        let Some(category) = aggregate_row(view) else { return out.into_pairs() };
        let series = view.series(category);
        let (Some(first), Some(last)) = (series.first(), series.last()) else { return out.into_pairs() };

        let steps = match (first.period.parse::<i32>(), last.period.parse::<i32>()) {
            (Ok(a), Ok(b)) if b > a => (b - a) as usize,
            _ => series.len() - 1,
        };
        if let Some(rate) = compound_growth_rate(first.value, last.value, steps) {
            out.push(
                format!("{}-{} yillarda {title} ko'rsatkichining o'rtacha yillik o'sish sur'ati qancha bo'lgan?", first.period, last.period),
                format!(
                    "{}-{} yillarda {category} bo'yicha o'rtacha yillik murakkab o'sish sur'ati {}% ni tashkil etgan ({} dan {} gacha).",
                    first.period,
                    last.period,
                    fixed1(rate),
                    grouped(first.value),
                    grouped(last.value)
                ),
            );
        }
        out.into_pairs()
    }
}

impl Specializer for ComponentShares {
    fn name(&self) -> &'static str { "component_shares" }

    fn generate(&self, view: &DatasetView<'_>, dataset_id: &str, title: &str) -> Vec<QaPair> {
        let mut out = QaSink::new(dataset_id);
        let Some(period) = view.latest_period() else { return out.into_pairs() };

        let informal = view.find_containing(INFORMAL);
        let formal = view
            .categories()
            .find(|c| labels::contains_ignore_case(c, FORMAL) && !labels::contains_ignore_case(c, INFORMAL));
        let values = informal
            .zip(formal)
            .and_then(|(i, f)| Some((view.value(i, period)?, view.value(f, period)?)));
        let Some((informal, formal)) = values else { return out.into_pairs() };

        let sum = informal + formal;
        if sum == 0.0 {
            return out.into_pairs();
        }
        let (formal_share, informal_share) = (formal / sum * 100.0, informal / sum * 100.0);
        let verdict = if formal_share > informal_share {
            "Rasmiy sektor ustunlik qiladi."
        } else if formal_share < informal_share {
            "Norasmiy sektor ustunlik qiladi."
        } else {
            "Ikkala sektor teng ulushga ega."
        };
        out.push(
            format!("{period} yilda {title} tarkibida rasmiy va norasmiy sektor ulushlari qanday taqsimlangan?"),
            format!(
                "{period} yilda rasmiy sektor ulushi {}%, norasmiy sektor ulushi {}% ni tashkil etgan. {verdict}",
                fixed1(formal_share),
                fixed1(informal_share)
            ),
        );
        out.into_pairs()
    }
}
