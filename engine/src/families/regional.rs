use super::{percent_list, top_bottom, Specializer, NATIONAL};
use crate::format::fixed1;
use crate::labels;
use crate::qa::{QaPair, QaSink};
use crate::series::DatasetView;

/// Regional price indices compared with the republic-wide row.
pub struct RegionalPriceIndex;

impl Specializer for RegionalPriceIndex {
    fn name(&self) -> &'static str { "regional" }

    fn generate(&self, view: &DatasetView<'_>, dataset_id: &str, _title: &str) -> Vec<QaPair> {
        let mut out = QaSink::new(dataset_id);
        let Some(period) = view.latest_period() else { return out.into_pairs() };

        let ranking = view.ranked_at(period, |c| labels::contains(c, NATIONAL));
        if ranking.is_empty() {
            return out.into_pairs();
        }

        let (top, bottom) = top_bottom(&ranking);
        out.push(
            format!("{period} davrida mintaqalar bo'yicha narx indeksining eng yuqori va eng past ko'rsatkichlari qanday?"),
            format!(
                "{period} davrida eng yuqori narx indeksi {} qayd etilgan. Eng past ko'rsatkichlar esa {} kuzatilgan.",
                percent_list(top, false),
                percent_list(bottom, false)
            ),
        );

        let national = view
            .find_containing(NATIONAL)
            .and_then(|c| view.value(c, period));
        if let Some(national) = national {
            let above: Vec<&str> = ranking
                .iter()
                .filter(|r| r.value > national)
                .map(|r| r.category.as_str())
                .collect();
            let listing = if above.is_empty() {
                String::new()
            } else {
                format!(" Bular: {}.", above.join(", "))
            };
            out.push(
                format!("{period} davrida qancha mintaqa respublika o'rtacha ko'rsatkichidan yuqori narx indeksiga ega bo'lgan?"),
                format!(
                    "{period} davrida {} ta mintaqa respublika o'rtacha ko'rsatkichidan ({}%) yuqori narx indeksiga ega bo'lgan.{listing}",
                    above.len(),
                    fixed1(national)
                ),
            );
        }

        out.into_pairs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::RawDataset;
    use serde_json::json;

    #[test]
    fn counts_regions_strictly_above_national() {
        let doc: RawDataset = serde_json::from_value(json!({
            "metadata": [],
            "data": [
                { "Klassifikator": "O‘zbekiston Respublikasi", "2023": 108.0 },
                { "Klassifikator": "Toshkent shahri", "2023": 110.2 },
                { "Klassifikator": "Samarqand viloyati", "2023": 108.0 },
                { "Klassifikator": "Buxoro viloyati", "2023": 109.1 },
                { "Klassifikator": "Xorazm viloyati", "2023": "-" }
            ]
        }))
        .unwrap();
        let view = DatasetView::new(&doc).unwrap();
        let pairs = RegionalPriceIndex.generate(&view, "1287", "Narx indeksi");
        assert_eq!(pairs.len(), 2);
        assert!(pairs[0].answer.contains("Toshkent shahrida (110.2%), Buxoro viloyatida (109.1%), Samarqand viloyatida (108.0%)"));
        assert!(pairs[1].answer.starts_with("2023 davrida 2 ta mintaqa"));
        assert!(pairs[1].answer.ends_with("Bular: Toshkent shahri, Buxoro viloyati."));
    }
}
