use super::{percent_list, top_bottom, Specializer, AGGREGATE};
use crate::format::fixed1;
use crate::labels;
use crate::qa::{QaPair, QaSink};
use crate::series::DatasetView;

/// Growth above this many percent counts as significant inflationary pressure.
pub const PRESSURE_THRESHOLD: f64 = 5.0;

/// Prices by kind of economic activity.
pub struct SectorGrowth;

impl Specializer for SectorGrowth {
    fn name(&self) -> &'static str { "sector_growth" }

    fn generate(&self, view: &DatasetView<'_>, dataset_id: &str, _title: &str) -> Vec<QaPair> {
        let mut out = QaSink::new(dataset_id);
        let Some(period) = view.latest_period() else { return out.into_pairs() };

        let ranking = view.ranked_at(period, |c| labels::contains(c, AGGREGATE));
        if ranking.is_empty() {
            return out.into_pairs();
        }

        let (top, bottom) = top_bottom(&ranking);
        out.push(
            format!("{period} davrida qaysi iqtisodiy faoliyat turlarida narxlarning eng yuqori va eng past o'sishi kuzatilgan?"),
            format!(
                "{period} davrida eng yuqori narx o'sishi {} qayd etilgan. Eng past o'sish esa {} kuzatilgan.",
                percent_list(top, true),
                percent_list(bottom, true)
            ),
        );

        let pressured: Vec<String> = ranking
            .iter()
            .filter(|s| s.value > PRESSURE_THRESHOLD)
            .map(|s| format!("{}da {}%", s.category.to_lowercase(), fixed1(s.value)))
            .collect();
        if !pressured.is_empty() {
            out.push(
                format!("{period} davrida qaysi iqtisodiy faoliyat turlarida sezilarli inflyatsion bosim kuzatilgan?"),
                format!(
                    "{period} davrida {} ta sektorda sezilarli inflyatsion bosim (5% dan yuqori o'sish) kuzatilgan: {}.",
                    pressured.len(),
                    pressured.join(", ")
                ),
            );
        }

        out.into_pairs()
    }
}
