//! Statements every dataset gets, whatever its family.

use crate::format::{fixed1, grouped, percent};
use crate::numeric::{average, growth_rate, max_by_value, min_by_value, step_growth_rates};
use crate::qa::QaSink;
use crate::series::{CategoryValue, DatasetView, PeriodKind};

const METHODOLOGY: &str = "Hisoblash metodikasi (qisqacha)";
const RESPONSIBLE: &str = "Mas'ul xodim FISh";
const LEADERBOARD_SIZE: usize = 3;

/// Direction of a change between two observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Flat,
}

impl Direction {
    pub fn between(first: f64, last: f64) -> Self {
        if last > first {
            Direction::Up
        } else if last < first {
            Direction::Down
        } else {
            Direction::Flat
        }
    }

    fn trend_word(self) -> &'static str {
        match self {
            Direction::Up => "o'sish",
            Direction::Down => "pasayish",
            Direction::Flat => "o'zgarmagan",
        }
    }
}

pub fn describe(view: &DatasetView<'_>, title: &str, out: &mut QaSink) {
    out.push("Bu dataset nima haqida?", title);

    let doc = view.document();
    if let Some(method) = doc.metadata_uz(METHODOLOGY) {
        out.push("Bu ma'lumotlar qanday metodologiya asosida hisoblanadi?", method);
    }
    if let Some(person) = doc.metadata_uz(RESPONSIBLE) {
        out.push("Bu ma'lumotlar uchun kim mas'ul?", person);
    }
}

/// Max, min and mean per period. Periods without a single numeric cell are skipped.
pub fn period_extremes(view: &DatasetView<'_>, title: &str, out: &mut QaSink) {
    for period in view.periods() {
        let values = view.values_at(period);
        let (Some(max), Some(min)) = (max_by_value(&values, |c| c.value), min_by_value(&values, |c| c.value)) else {
            continue;
        };

        out.push(
            format!("{period} davrida {title} bo'yicha eng yuqori ko'rsatkich qaysi hududda qayd etilgan?"),
            format!("{period} davrida eng yuqori ko'rsatkich {} bilan {}da qayd etilgan.", grouped(max.value), max.category),
        );
        out.push(
            format!("{period} davrida {title} bo'yicha eng past ko'rsatkich qaysi hududda qayd etilgan?"),
            format!("{period} davrida eng past ko'rsatkich {} bilan {}da qayd etilgan.", grouped(min.value), min.category),
        );

        let nums: Vec<f64> = values.iter().map(|c| c.value).collect();
        if let Some(avg) = average(&nums) {
            out.push(
                format!("{period} davrida O'zbekiston bo'yicha {title}ning o'rtacha ko'rsatkichi qancha edi?"),
                format!("{period} davrida O'zbekiston bo'yicha o'rtacha ko'rsatkich {}ni tashkil etgan.", grouped(avg)),
            );
        }
    }
}

/// Per-period fastest and slowest growing categories (annual data only).
pub fn period_growth(view: &DatasetView<'_>, title: &str, out: &mut QaSink) {
    let periods = view.periods();
    for pair in periods.windows(2) {
        let (prev, curr) = (&pair[0], &pair[1]);
        let growth: Vec<CategoryValue> = (0..view.row_count())
            .filter_map(|idx| {
                let value = growth_rate(view.value_at(idx, prev)?, view.value_at(idx, curr)?)?;
                Some(CategoryValue { category: view.label_at(idx)?.to_string(), period: curr.clone(), value })
            })
            .collect();

        let (Some(max), Some(min)) = (max_by_value(&growth, |c| c.value), min_by_value(&growth, |c| c.value)) else {
            continue;
        };
        out.push(
            format!("{curr} yilda {prev} yilga nisbatan {title} bo'yicha eng yuqori o'sish sur'ati qaysi hududda kuzatilgan?"),
            format!("{curr} yilda eng yuqori o'sish sur'ati {}da qayd etilgan: {prev} yilga nisbatan {}.", max.category, percent(max.value)),
        );
        out.push(
            format!("{curr} yilda {prev} yilga nisbatan {title} bo'yicha eng past o'sish sur'ati qaysi hududda kuzatilgan?"),
            format!("{curr} yilda eng past o'sish sur'ati {}da qayd etilgan: {prev} yilga nisbatan {}.", min.category, percent(min.value)),
        );
    }
}

/// Dynamics, long-run growth and first-to-last change for each category.
pub fn category_trends(view: &DatasetView<'_>, title: &str, out: &mut QaSink) {
    for (idx, category) in view.categories().enumerate() {
        let series = view.series_at(idx);
        if series.len() < 2 {
            continue;
        }
        let (first, last) = (&series[0], &series[series.len() - 1]);
        let span = format!("{}-{}", first.period, last.period);
        let values: Vec<f64> = series.iter().map(|c| c.value).collect();

        if let (Some(avg), Some(max), Some(min)) = (
            average(&values),
            max_by_value(&series, |c| c.value),
            min_by_value(&series, |c| c.value),
        ) {
            out.push(
                format!("{span} yillarda {category}da {title} ko'rsatkichi qanday o'zgargan?"),
                format!(
                    "{span} yillarda {category}da o'rtacha ko'rsatkich {}, eng yuqori ko'rsatkich {} ({}), eng past ko'rsatkich {} ({}) bo'lgan. Umumiy tendensiya: {}.",
                    grouped(avg),
                    grouped(max.value),
                    max.period,
                    grouped(min.value),
                    min.period,
                    Direction::between(first.value, last.value).trend_word(),
                ),
            );
        }

        let steps = step_growth_rates(&values);
        if steps.len() >= 2 {
            if let Some(avg_growth) = average(&steps) {
                out.push(
                    format!("{category}da {title} ko'rsatkichining o'rtacha yillik o'sish sur'ati qancha?"),
                    format!("{span} yillarda {category}da o'rtacha yillik o'sish sur'ati {}% ni tashkil etgan.", fixed1(avg_growth)),
                );
            }
        }

        if let Some(change) = growth_rate(first.value, last.value) {
            let question = format!(
                "{} yildan {} yilgacha {category}da {title} ko'rsatkichi qanchaga o'zgargan?",
                first.period, last.period
            );
            let answer = match Direction::between(0.0, change) {
                Direction::Up => format!(
                    "{} yildan {} yilgacha {category}da ko'rsatkich {}% ga oshgan.",
                    first.period, last.period, fixed1(change)
                ),
                Direction::Down => format!(
                    "{} yildan {} yilgacha {category}da ko'rsatkich {}% ga kamaygan.",
                    first.period, last.period, fixed1(change.abs())
                ),
                Direction::Flat => format!(
                    "{} yildan {} yilgacha {category}da ko'rsatkich o'zgarmagan.",
                    first.period, last.period
                ),
            };
            out.push(question, answer);
        }
    }
}

/// Top and bottom three at the latest period; needs two or more numeric categories.
pub fn leaderboard(view: &DatasetView<'_>, title: &str, out: &mut QaSink) {
    let Some(period) = view.latest_period() else { return };
    let ranked = view.ranked_at(period, |_| false);
    if ranked.len() < 2 {
        return;
    }

    let top = &ranked[..ranked.len().min(LEADERBOARD_SIZE)];
    // lowest first
    let bottom = ranked.iter().rev().take(LEADERBOARD_SIZE);

    out.push(
        format!("{period} davrida {title} bo'yicha eng yuqori ko'rsatkichga ega hududlar qaysilar?"),
        format!("{period} davrida eng yuqori ko'rsatkichlar: {}.", numbered(top.iter())),
    );
    out.push(
        format!("{period} davrida {title} bo'yicha eng past ko'rsatkichga ega hududlar qaysilar?"),
        format!("{period} davrida eng past ko'rsatkichlar: {}.", numbered(bottom)),
    );
}

fn numbered<'a>(items: impl Iterator<Item = &'a CategoryValue>) -> String {
    items
        .enumerate()
        .map(|(i, cv)| format!("{}. {} ({})", i + 1, cv.category, grouped(cv.value)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// All generic statements in emission order.
pub fn generate(view: &DatasetView<'_>, title: &str, out: &mut QaSink) {
    describe(view, title, out);
    period_extremes(view, title, out);
    if view.kind() == PeriodKind::Annual && view.periods().len() >= 2 {
        period_growth(view, title, out);
        category_trends(view, title, out);
    }
    leaderboard(view, title, out);
}
