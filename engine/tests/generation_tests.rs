use engine::document::{CatalogContent, CatalogEntry};
use engine::persist::{file_stamp, save_corpus, load_corpus, DataPaths};
use engine::{
    generate_for_dataset, Assembler, Catalog, DirectorySource, FamilyRegistry, MemorySource, QaError, QaPair, RawDataset,
};
use serde_json::{json, Value};
use std::fs;

fn dataset(rows: Value) -> RawDataset {
    serde_json::from_value(json!({ "metadata": [], "data": rows })).unwrap()
}

fn two_by_two() -> RawDataset {
    dataset(json!([
        { "Klassifikator": "A", "2020": 10, "2021": 20 },
        { "Klassifikator": "B", "2020": 30, "2021": 10 }
    ]))
}

fn answer_of<'a>(pairs: &'a [QaPair], question_fragment: &str) -> &'a str {
    pairs
        .iter()
        .find(|p| p.question.contains(question_fragment))
        .map(|p| p.answer.as_str())
        .unwrap_or_else(|| panic!("no question containing {question_fragment:?}"))
}

fn catalog(entries: &[(&str, &str)]) -> Catalog {
    Catalog {
        url: "https://stat.uz/uz/ochiq-malumotlar".into(),
        title: "Ochiq ma'lumotlar".into(),
        content: CatalogContent {
            description: vec![],
            datasets: entries
                .iter()
                .map(|(id, title)| CatalogEntry { id: id.to_string(), title: title.to_string(), files: Default::default() })
                .collect(),
        },
    }
}

#[test]
fn two_regions_two_years() {
    let pairs = generate_for_dataset(&two_by_two(), "42", "Ko'rsatkich", &FamilyRegistry::builtin()).unwrap();

    assert_eq!(
        answer_of(&pairs, "2020 davrida Ko'rsatkich bo'yicha eng yuqori ko'rsatkich"),
        "2020 davrida eng yuqori ko'rsatkich 30,0 bilan Bda qayd etilgan."
    );
    assert_eq!(
        answer_of(&pairs, "2020 davrida Ko'rsatkich bo'yicha eng past ko'rsatkich"),
        "2020 davrida eng past ko'rsatkich 10,0 bilan Ada qayd etilgan."
    );
    assert_eq!(
        answer_of(&pairs, "2020 davrida O'zbekiston bo'yicha"),
        "2020 davrida O'zbekiston bo'yicha o'rtacha ko'rsatkich 20,0ni tashkil etgan."
    );
    assert_eq!(
        answer_of(&pairs, "2021 davrida Ko'rsatkich bo'yicha eng yuqori ko'rsatkich"),
        "2021 davrida eng yuqori ko'rsatkich 20,0 bilan Ada qayd etilgan."
    );
    assert_eq!(
        answer_of(&pairs, "2021 davrida Ko'rsatkich bo'yicha eng past ko'rsatkich"),
        "2021 davrida eng past ko'rsatkich 10,0 bilan Bda qayd etilgan."
    );
    assert_eq!(
        answer_of(&pairs, "2021 davrida O'zbekiston bo'yicha"),
        "2021 davrida O'zbekiston bo'yicha o'rtacha ko'rsatkich 15,0ni tashkil etgan."
    );
    assert_eq!(
        answer_of(&pairs, "eng yuqori o'sish sur'ati qaysi hududda"),
        "2021 yilda eng yuqori o'sish sur'ati Ada qayd etilgan: 2020 yilga nisbatan 100.0%."
    );
    assert_eq!(
        answer_of(&pairs, "eng past o'sish sur'ati qaysi hududda"),
        "2021 yilda eng past o'sish sur'ati Bda qayd etilgan: 2020 yilga nisbatan -66.7%."
    );
    assert_eq!(
        answer_of(&pairs, "2020 yildan 2021 yilgacha Bda"),
        "2020 yildan 2021 yilgacha Bda ko'rsatkich 66.7% ga kamaygan."
    );
    assert_eq!(pairs[0].question, "Bu dataset nima haqida?");
    assert_eq!(pairs[0].answer, "Ko'rsatkich");
}

#[test]
fn regions_above_national_are_counted_exactly() {
    let doc = dataset(json!([
        { "Klassifikator": "O'zbekiston Respublikasi", "2022": 111.0, "2023": 109.0 },
        { "Klassifikator": "Andijon viloyati", "2022": 110.0, "2023": 109.5 },
        { "Klassifikator": "Navoiy viloyati", "2022": 112.0, "2023": 112.4 },
        { "Klassifikator": "Jizzax viloyati", "2022": 108.0, "2023": 109.0 },
        { "Klassifikator": "Sirdaryo viloyati", "2022": 113.0, "2023": 107.9 }
    ]));
    let pairs = generate_for_dataset(&doc, "1288", "Iste'mol narxlari indeksi", &FamilyRegistry::builtin()).unwrap();
    let answer = answer_of(&pairs, "qancha mintaqa respublika o'rtacha");
    assert!(answer.starts_with("2023 davrida 2 ta mintaqa"), "{answer}");
    assert!(answer.contains("(109.0%)"));
}

#[test]
fn generation_is_deterministic() {
    let registry = FamilyRegistry::builtin();
    let doc = two_by_two();
    let first = generate_for_dataset(&doc, "1287", "Narx", &registry).unwrap();
    let second = generate_for_dataset(&doc, "1287", "Narx", &registry).unwrap();
    assert_eq!(serde_json::to_string(&first).unwrap(), serde_json::to_string(&second).unwrap());
}

#[test]
fn every_pair_carries_its_dataset_id() {
    let mut source = MemorySource::new();
    source.insert("1287", two_by_two());
    source.insert("77", dataset(json!([{ "Klassifikator": "X", "2023/01": 1.5, "2023/02": 1.1 }])));
    let assembly = Assembler::new(FamilyRegistry::builtin()).run(&catalog(&[("1287", "Narx"), ("77", "Oylik")]), &source);

    assert_eq!(assembly.report.succeeded, 2);
    assert!(assembly.pairs.iter().any(|p| p.dataset_id == "77"));
    let by_1287 = assembly.pairs.iter().take_while(|p| p.dataset_id == "1287").count();
    assert!(assembly.pairs[by_1287..].iter().all(|p| p.dataset_id == "77"));
}

#[test]
fn extremes_bound_every_value_in_period() {
    let values = [4.5, 17.25, -3.0, 17.0, 0.0, 9.9];
    let rows: Vec<Value> = values
        .iter()
        .enumerate()
        .map(|(i, v)| json!({ "Klassifikator": format!("Hudud {i}"), "2024": v }))
        .collect();
    let pairs = generate_for_dataset(&dataset(Value::Array(rows)), "1", "T", &FamilyRegistry::new()).unwrap();

    assert_eq!(answer_of(&pairs, "eng yuqori ko'rsatkich qaysi"), "2024 davrida eng yuqori ko'rsatkich 17,3 bilan Hudud 1da qayd etilgan.");
    assert_eq!(answer_of(&pairs, "eng past ko'rsatkich qaysi"), "2024 davrida eng past ko'rsatkich -3,0 bilan Hudud 2da qayd etilgan.");
}

#[test]
fn leaderboard_lists_are_ordered() {
    let doc = dataset(json!([
        { "Klassifikator": "A", "2023": 5.0 },
        { "Klassifikator": "B", "2023": 50.0 },
        { "Klassifikator": "C", "2023": 20.0 },
        { "Klassifikator": "D", "2023": 1.0 },
        { "Klassifikator": "E", "2023": 35.0 }
    ]));
    let pairs = generate_for_dataset(&doc, "1", "T", &FamilyRegistry::new()).unwrap();
    assert_eq!(
        answer_of(&pairs, "eng yuqori ko'rsatkichga ega hududlar"),
        "2023 davrida eng yuqori ko'rsatkichlar: 1. B (50,0), 2. E (35,0), 3. C (20,0)."
    );
    assert_eq!(
        answer_of(&pairs, "eng past ko'rsatkichga ega hududlar"),
        "2023 davrida eng past ko'rsatkichlar: 1. D (1,0), 2. A (5,0), 3. C (20,0)."
    );
}

#[test]
fn non_numeric_cells_only_drop_their_own_period() {
    let doc = dataset(json!([
        { "Klassifikator": "A", "2020": 10, "2021": 12 },
        { "Klassifikator": "B", "2020": "-", "2021": 40 },
        { "Klassifikator": "C", "2020": 30, "2021": 8 }
    ]));
    let pairs = generate_for_dataset(&doc, "1", "T", &FamilyRegistry::new()).unwrap();
    assert_eq!(
        answer_of(&pairs, "2020 davrida O'zbekiston bo'yicha"),
        "2020 davrida O'zbekiston bo'yicha o'rtacha ko'rsatkich 20,0ni tashkil etgan."
    );
    assert_eq!(
        answer_of(&pairs, "2021 davrida T bo'yicha eng yuqori ko'rsatkich"),
        "2021 davrida eng yuqori ko'rsatkich 40,0 bilan Bda qayd etilgan."
    );
    assert!(pairs.iter().all(|p| !p.question.contains("Bda T ko'rsatkichi qanday o'zgargan")));
}

#[test]
fn assembler_counts_failures_and_continues() {
    let mut source = MemorySource::new();
    source.insert("1", two_by_two());
    source.insert("3", dataset(json!([])));
    let assembly = Assembler::new(FamilyRegistry::builtin()).run(&catalog(&[("1", "a"), ("2", "b"), ("3", "c")]), &source);

    assert_eq!(assembly.report.processed, 3);
    assert_eq!(assembly.report.succeeded, 1);
    assert_eq!(assembly.report.failed, 2);
    assert_eq!(assembly.report.total_pairs, assembly.pairs.len());
    assert_eq!(assembly.generated, vec![("1".to_string(), assembly.pairs.len())]);
    assert!(matches!(assembly.failures[0], (ref id, QaError::DatasetLoad { .. }) if id == "2"));
    assert!(matches!(assembly.failures[1], (ref id, QaError::Generation { .. }) if id == "3"));
}

#[test]
fn directory_source_reads_latest_download() {
    let root = tempfile::tempdir().unwrap();
    let paths = DataPaths::new(root.path());
    let downloads = paths.downloads_dir("json");
    fs::create_dir_all(&downloads).unwrap();

    let old = json!([{ "metadata": [], "data": [{ "Klassifikator": "Eski", "2020": 1 }] }]);
    let new = json!([{ "metadata": [], "data": [{ "Klassifikator": "Yangi", "2020": 1 }, { "Klassifikator": "Yana", "2020": 2 }] }]);
    fs::write(paths.dataset_file("12", "2025-01-01T00-00-00-000Z", "json"), old.to_string()).unwrap();
    fs::write(paths.dataset_file("12", "2025-02-01T00-00-00-000Z", "json"), new.to_string()).unwrap();

    let source = DirectorySource::new(&downloads);
    let assembly = Assembler::new(FamilyRegistry::builtin()).run(&catalog(&[("12", "Ko'rsatkich"), ("13", "Yo'q")]), &source);
    assert_eq!(assembly.report.succeeded, 1);
    assert_eq!(assembly.report.failed, 1);
    assert!(assembly.pairs.iter().any(|p| p.answer.contains("Yangi")));
    assert!(!assembly.pairs.iter().any(|p| p.answer.contains("Eski")));

    let corpus = assembly.into_corpus("https://stat.uz/uz/ochiq-malumotlar");
    let written = save_corpus(&paths, &corpus).unwrap();
    let reread = load_corpus(&written).unwrap();
    assert_eq!(reread.qa_pairs, corpus.qa_pairs);
    assert_eq!(reread.source_url, "https://stat.uz/uz/ochiq-malumotlar");
    assert!(!file_stamp(time::OffsetDateTime::now_utc()).is_empty());
}
