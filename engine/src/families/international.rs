use super::{Specializer, NATIONAL};
use crate::format::fixed1;
use crate::labels;
use crate::qa::{QaPair, QaSink};
use crate::series::{CategoryValue, DatasetView};

const NEIGHBORS: &[&str] = &["Qozog'iston", "Qirg'iziston", "Tojikiston"];

/// Where the domestic row stands among CIS countries.
pub struct CisComparison;

/// 1-based position of `domestic` in a descending ranking of the other rows.
pub fn domestic_rank(others: &[CategoryValue], domestic: f64) -> usize {
    1 + others.iter().filter(|c| c.value > domestic).count()
}

fn rank_narrative(rank: usize, field: usize) -> &'static str {
    if rank <= 3 {
        "Bu yuqori inflyatsion bosim mavjudligini ko'rsatadi."
    } else if rank as f64 <= field as f64 / 2.0 {
        "Bu o'rtacha darajadagi narx o'sishini ko'rsatadi."
    } else {
        "Bu nisbatan past narx o'sishi sur'atini ko'rsatadi."
    }
}

impl Specializer for CisComparison {
    fn name(&self) -> &'static str { "international" }

    fn generate(&self, view: &DatasetView<'_>, dataset_id: &str, _title: &str) -> Vec<QaPair> {
        let mut out = QaSink::new(dataset_id);
        let Some(period) = view.latest_period() else { return out.into_pairs() };

        let ranking = view.ranked_at(period, |c| labels::contains(c, NATIONAL));
        let domestic = view
            .find_containing(NATIONAL)
            .and_then(|c| view.value(c, period));
        let Some(domestic) = domestic else { return out.into_pairs() };
        if ranking.is_empty() {
            return out.into_pairs();
        }

        let rank = domestic_rank(&ranking, domestic);
        out.push(
            format!("{period} davrida O'zbekistonning narx indeksi MDH davlatlari orasida qanday o'rinda turgan?"),
            format!(
                "{period} davrida O'zbekiston {}% ko'rsatkich bilan MDH davlatlari orasida {rank}-o'rinni egallagan. {}",
                fixed1(domestic),
                rank_narrative(rank, ranking.len())
            ),
        );

        let neighbors: Vec<&CategoryValue> = ranking
            .iter()
            .filter(|c| labels::contains_any(&c.category, NEIGHBORS))
            .collect();
        if !neighbors.is_empty() {
            let stance = if neighbors.iter().all(|n| n.value < domestic) {
                "barcha qo'shni davlatlarga nisbatan yuqoriroq"
            } else if neighbors.iter().all(|n| n.value > domestic) {
                "barcha qo'shni davlatlarga nisbatan pastroq"
            } else {
                "qo'shni davlatlarga nisbatan o'rtacha"
            };
            let listing = neighbors
                .iter()
                .map(|n| format!("{}da {}%", n.category, fixed1(n.value)))
                .collect::<Vec<_>>()
                .join(", ");
            out.push(
                format!("{period} davrida O'zbekistonning narx indeksi qo'shni davlatlarga nisbatan qanday?"),
                format!(
                    "{period} davrida O'zbekistonda ({}%) {stance} narx o'sishi kuzatilgan. {listing}.",
                    fixed1(domestic)
                ),
            );
        }

        out.into_pairs()
    }
}
