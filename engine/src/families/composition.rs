use super::Specializer;
use crate::format::fixed1;
use crate::numeric::{average, max_by_value, min_by_value, step_growth_rates};
use crate::qa::{QaPair, QaSink};
use crate::series::{CategoryValue, DatasetView};

const SEASON: usize = 12;

/// Consumer price index split into food, non-food goods and services.
pub struct ConsumerBasket;

const BASKET_TOTAL: &str = "Jami";
const BASKET_PARTS: &[&str] = &["Oziq-ovqat mahsulotlari", "Nooziq-ovqat mahsulotlari", "Xizmatlar"];

/// Producer prices of manufacturing against energy.
pub struct IndustrialSectors;

const INDUSTRY_TOTAL: &str = "Jami sanoat";
const MANUFACTURING: &str = "Qayta ishlash";
const ENERGY: &str = "Elektr";

/// `a`, `a va b`, `a, b va c`.
fn join_va(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} va {last}", init.join(", ")),
    }
}

impl Specializer for ConsumerBasket {
    fn name(&self) -> &'static str { "consumer_basket" }

    fn generate(&self, view: &DatasetView<'_>, dataset_id: &str, _title: &str) -> Vec<QaPair> {
        let mut out = QaSink::new(dataset_id);
        let Some(period) = view.latest_period() else { return out.into_pairs() };

        let mut parts: Vec<CategoryValue> = BASKET_PARTS
            .iter()
            .filter_map(|label| {
                let category = view.find_exact(label)?;
                let value = view.value(category, period)?;
                Some(CategoryValue { category: label.to_string(), period: period.to_string(), value })
            })
            .collect();
        parts.sort_by(|a, b| b.value.total_cmp(&a.value));

        if let [lead, rest @ ..] = parts.as_slice() {
            let mut answer = format!(
                "{period} davrida eng yuqori o'sish {}da ({}%) qayd etilgan.",
                lead.category.to_lowercase(),
                fixed1(lead.value)
            );
            if !rest.is_empty() {
                let followers: Vec<String> = rest
                    .iter()
                    .map(|p| format!("{} ({}%)", p.category.to_lowercase(), fixed1(p.value)))
                    .collect();
                answer.push_str(&format!(" Keyingi o'rinlarda {} turadi.", join_va(&followers)));
            }
            out.push(
                format!("{period} davrida iste'mol narxlari indeksining asosiy tarkibiy qismlari orasida eng yuqori o'sish qaysi yo'nalishda bo'lgan?"),
                answer,
            );
        }

        if let Some(total) = view.find_exact(BASKET_TOTAL) {
            seasonal(view, total, &mut out);
        }
        out.into_pairs()
    }
}

/// Highest and lowest month of the trailing year; needs all twelve values.
fn seasonal(view: &DatasetView<'_>, total: &str, out: &mut QaSink) {
    let periods = view.periods();
    if periods.len() < SEASON {
        return;
    }
    let months: Vec<CategoryValue> = periods[periods.len() - SEASON..]
        .iter()
        .filter_map(|p| {
            let value = view.value(total, p)?;
            Some(CategoryValue { category: total.to_string(), period: p.clone(), value })
        })
        .collect();
    if months.len() != SEASON {
        return;
    }
    if let (Some(max), Some(min)) = (max_by_value(&months, |m| m.value), min_by_value(&months, |m| m.value)) {
        out.push(
            "So'nggi 12 oyda iste'mol narxlari indeksining mavsumiy o'zgarishlari qanday bo'lgan?",
            format!(
                "So'nggi 12 oyda eng yuqori o'sish {} davrida ({}%), eng past o'sish esa {} davrida ({}%) kuzatilgan.",
                max.period,
                fixed1(max.value),
                min.period,
                fixed1(min.value)
            ),
        );
    }
}

impl Specializer for IndustrialSectors {
    fn name(&self) -> &'static str { "industrial_sectors" }

    fn generate(&self, view: &DatasetView<'_>, dataset_id: &str, _title: &str) -> Vec<QaPair> {
        let mut out = QaSink::new(dataset_id);
        let (Some(first), Some(period)) = (view.first_period(), view.latest_period()) else {
            return out.into_pairs();
        };

        let manufacturing = view.find_containing(MANUFACTURING).and_then(|c| view.value(c, period));
        let energy = view.find_containing(ENERGY).and_then(|c| view.value(c, period));
        if let (Some(m), Some(e)) = (manufacturing, energy) {
            let comparison = if m > e {
                format!("qayta ishlash sanoatida ({}%) energetika tarmog'iga ({}%) nisbatan", fixed1(m), fixed1(e))
            } else {
                format!("energetika tarmog'ida ({}%) qayta ishlash sanoatiga ({}%) nisbatan", fixed1(e), fixed1(m))
            };
            out.push(
                format!("{period} davrida sanoatning turli tarmoqlarida narx indeksi qanday farqlangan?"),
                format!("{period} davrida {comparison} yuqoriroq narx o'sishi kuzatilgan."),
            );
        }

        if let Some(total) = view.find_exact(INDUSTRY_TOTAL) {
            let values: Vec<f64> = view.series(total).iter().map(|c| c.value).collect();
            if let Some(avg) = average(&step_growth_rates(&values)) {
                let verdict = if avg > 1.0 {
                    "Bu sezilarli inflyatsion bosim mavjudligini ko'rsatadi."
                } else if avg > 0.0 {
                    "Bu mo''tadil narx o'sishi mavjudligini ko'rsatadi."
                } else {
                    "Bu narxlar barqaror yoki pasayish tendensiyasiga ega ekanligini ko'rsatadi."
                };
                out.push(
                    "Sanoat mahsulotlari narx indeksining uzoq muddatli tendensiyasi qanday?",
                    format!(
                        "{first}-{period} davrida sanoat mahsulotlari narxining o'rtacha oylik o'sishi {}% ni tashkil etgan. {verdict}",
                        fixed1(avg)
                    ),
                );
            }
        }

        out.into_pairs()
    }
}
