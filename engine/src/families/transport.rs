use super::{Specializer, AGGREGATE};
use crate::format::fixed1;
use crate::labels;
use crate::numeric::average;
use crate::qa::{QaPair, QaSink};
use crate::series::DatasetView;

const PASSENGER: &str = "yo'lovchi";
const CARGO: &str = "yuk";

/// Transport tariffs by mode, passenger against cargo.
pub struct TransportServices;

impl Specializer for TransportServices {
    fn name(&self) -> &'static str { "transport" }

    fn generate(&self, view: &DatasetView<'_>, dataset_id: &str, _title: &str) -> Vec<QaPair> {
        let mut out = QaSink::new(dataset_id);
        let Some(period) = view.latest_period() else { return out.into_pairs() };

        let modes = view.ranked_at(period, |c| labels::contains(c, AGGREGATE));
        if modes.is_empty() {
            return out.into_pairs();
        }

        let listing = modes
            .iter()
            .map(|t| format!("{}da {}%", t.category.to_lowercase(), fixed1(t.value)))
            .collect::<Vec<_>>()
            .join(", ");
        out.push(
            format!("{period} davrida transport xizmatlari narxining o'zgarishi transport turlari bo'yicha qanday taqsimlangan?"),
            format!("{period} davrida transport xizmatlari narxining o'zgarishi: {listing}."),
        );

        let passenger: Vec<f64> = modes
            .iter()
            .filter(|t| labels::contains_ignore_case(&t.category, PASSENGER))
            .map(|t| t.value)
            .collect();
        let cargo: Vec<f64> = modes
            .iter()
            .filter(|t| labels::contains_ignore_case(&t.category, CARGO))
            .map(|t| t.value)
            .collect();

        if let (Some(p), Some(c)) = (average(&passenger), average(&cargo)) {
            let verdict = if p > c {
                "Yo'lovchi tashish xizmatlarida narx o'sishi yuqoriroq bo'lgan."
            } else if p < c {
                "Yuk tashish xizmatlarida narx o'sishi yuqoriroq bo'lgan."
            } else {
                "Ikkala yo'nalishda ham narx o'sishi bir xil darajada bo'lgan."
            };
            out.push(
                format!("{period} davrida yo'lovchi va yuk tashish xizmatlari narxlarining o'rtacha o'sishi qanday farqlangan?"),
                format!(
                    "{period} davrida yo'lovchi tashish xizmatlarida o'rtacha {}%, yuk tashish xizmatlarida esa {}% narx o'sishi qayd etilgan. {verdict}",
                    fixed1(p),
                    fixed1(c)
                ),
            );
        }

        out.into_pairs()
    }
}
