use criterion::{criterion_group, criterion_main, Criterion};
use engine::{generate_for_dataset, FamilyRegistry, RawDataset};
use serde_json::{json, Map, Value};

fn regional_dataset() -> RawDataset {
    let mut rows = Vec::new();
    for r in 0..14 {
        let mut row = Map::new();
        let label = if r == 0 { "O'zbekiston Respublikasi".to_string() } else { format!("Viloyat {r}") };
        row.insert("Klassifikator".into(), json!(label));
        for year in 2000..2024 {
            row.insert(year.to_string(), json!(100.0 + ((r * 7 + year) % 13) as f64 * 0.9));
        }
        rows.push(Value::Object(row));
    }
    serde_json::from_value(json!({ "metadata": [], "data": rows })).unwrap()
}

fn bench_generate(c: &mut Criterion) {
    let doc = regional_dataset();
    let registry = FamilyRegistry::builtin();
    c.bench_function("generate_regional_24y", |b| {
        b.iter(|| generate_for_dataset(&doc, "1287", "Iste'mol narxlari indeksi", &registry))
    });
}

criterion_group!(benches, bench_generate);
criterion_main!(benches);
