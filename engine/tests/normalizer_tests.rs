use engine::{Normalizer, NormalizerConfig, StemmerKind, StopwordList};

fn indonesian() -> Normalizer {
    Normalizer::from_config(&NormalizerConfig::default()).unwrap()
}

#[test]
fn it_cleans_filters_and_stems_job_postings() {
    let n = indonesian();
    let words = n.normalize(
        "Info Magang (Internship) Web Developer. Lokasi: WFO di Semarang Tengah. Syarat skill: PHP, Gaji nego.",
    );
    for expected in ["magang", "internship", "web", "developer", "semarang", "php", "gaji"] {
        assert!(words.contains(&expected.to_string()), "missing {expected} in {words:?}");
    }
    for dropped in ["info", "wfo", "di"] {
        assert!(!words.contains(&dropped.to_string()));
    }
}

#[test]
fn it_is_deterministic() {
    let n = indonesian();
    let text = "Dibutuhkan segera: 2 orang desainer grafis untuk pekerjaan di Jakarta!";
    assert_eq!(n.normalize(text), n.normalize(text));
    assert_eq!(n.normalize(text), indonesian().normalize(text));
}

#[test]
fn it_applies_the_same_pipeline_to_queries() {
    let n = indonesian();
    assert_eq!(n.normalize("pekerjaan"), vec!["kerja"]);
    assert_eq!(n.normalize("PEKERJAAN!!"), vec!["kerja"]);
    assert!(n.normalize("di ke yg").is_empty());
}

#[test]
fn it_supports_snowball_and_diacritic_folding() {
    let cfg = NormalizerConfig {
        stemmer: StemmerKind::Snowball { algorithm: "english".into() },
        stopwords: StopwordList::English,
        extra_stopwords: Vec::new(),
        fold_diacritics: true,
        ..NormalizerConfig::default()
    };
    let words = Normalizer::from_config(&cfg).unwrap().normalize("Running Runners RUN! The café's menu.");
    assert!(words.contains(&"run".to_string()));
    assert!(words.contains(&"cafe".to_string()));
    assert!(!words.contains(&"the".to_string()));

    let unfolded = Normalizer::from_config(&NormalizerConfig { fold_diacritics: false, ..cfg }).unwrap();
    assert!(unfolded.normalize("café").contains(&"caf".to_string()));
}

#[test]
fn it_rejects_unknown_stemmers() {
    let cfg = NormalizerConfig {
        stemmer: StemmerKind::Snowball { algorithm: "elvish".into() },
        ..NormalizerConfig::default()
    };
    assert!(Normalizer::from_config(&cfg).is_err());
}
