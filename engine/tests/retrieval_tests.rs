use engine::{Document, EngineConfig, QueryError, RetrievalModel, SearchEngine};
use std::collections::BTreeSet;

fn two_docs() -> SearchEngine {
    SearchEngine::build(
        vec![
            Document::new("doc1", "Magang admin di Semarang"),
            Document::new("doc2", "Magang designer di Jakarta"),
        ],
        EngineConfig::default(),
    )
    .unwrap()
}

fn job_board() -> SearchEngine {
    SearchEngine::build(
        vec![
            Document::new("doc01_admin.txt", "Lowongan magang admin kantor di Semarang. Menguasai Excel."),
            Document::new("doc02_designer.txt", "Magang desainer grafis di Jakarta. Menguasai Figma dan Photoshop."),
            Document::new("doc03_web.txt", "Web developer freelance Semarang, menguasai PHP dan Laravel."),
            Document::new("doc04_marketing.txt", "Digital marketing full time di Jakarta. Pengalaman kampanye iklan."),
            Document::new("doc05_empty.txt", "123 456 !!!"),
        ],
        EngineConfig::default(),
    )
    .unwrap()
}

fn set(docs: &[&str]) -> BTreeSet<String> { docs.iter().map(|d| d.to_string()).collect() }

#[test]
fn boolean_end_to_end() {
    let engine = two_docs();
    assert_eq!(engine.boolean("admin AND semarang"), set(&["doc1"]));
    assert_eq!(engine.boolean("semarang"), engine.index().lookup("semarang"));
    assert_eq!(engine.boolean("magang OR internship"), engine.boolean("magang"));
}

#[test]
fn boolean_is_strict() {
    let engine = two_docs();
    assert!(engine.boolean("magang admin").is_empty());
    assert!(engine.boolean("magang AND").is_empty());
    assert!(engine.boolean("magang XOR internship").is_empty());
    assert!(engine.boolean("").is_empty());
    assert!(matches!(engine.explain_boolean("magang AND"), Err(QueryError::TrailingOperator { .. })));
}

#[test]
fn boolean_folds_left_without_precedence() {
    let engine = job_board();
    // (magang AND jakarta) OR semarang
    assert_eq!(
        engine.boolean("magang AND jakarta OR semarang"),
        set(&["doc01_admin.txt", "doc02_designer.txt", "doc03_web.txt"])
    );
    // with AND binding tighter this would also match doc03
    assert_eq!(engine.boolean("semarang OR jakarta AND magang"), set(&["doc01_admin.txt", "doc02_designer.txt"]));
    assert_eq!(engine.boolean("semarang not MAGANG"), set(&["doc03_web.txt"]));
    assert!(engine.boolean("unknownterm AND magang").is_empty());
    assert_eq!(engine.boolean("unknownterm or magang"), engine.boolean("magang"));
}

#[test]
fn boolean_algebra_laws() {
    let engine = job_board();
    let a = engine.boolean("semarang");
    let b = engine.boolean("magang");
    assert_eq!(engine.boolean("semarang AND semarang"), a);
    assert_eq!(engine.boolean("semarang OR semarang"), a);
    assert!(engine.boolean("semarang AND magang").is_subset(&a));
    assert!(a.is_subset(&engine.boolean("semarang OR magang")));
    assert_eq!(engine.boolean("semarang NOT magang"), a.difference(&b).cloned().collect::<BTreeSet<_>>());
}

#[test]
fn index_matches_normalized_documents() {
    let engine = job_board();
    for doc in engine.documents() {
        let terms = engine.document_terms(&doc.name).unwrap();
        for term in terms {
            assert!(engine.index().contains(term, &doc.name));
            assert!(engine.incidence().contains(term, &doc.name));
        }
    }
    for term in engine.index().terms() {
        for doc in engine.index().postings(term).unwrap() {
            assert!(engine.document_terms(doc).unwrap().iter().any(|t| t == term));
        }
    }
}

#[test]
fn vsm_end_to_end_tie() {
    let engine = two_docs();
    let hits = engine.ranked("magang", 2);
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].doc, "doc1");
    assert_eq!(hits[1].doc, "doc2");
    assert!(hits[0].score > 0.0);
    assert_eq!(hits[0].score, hits[1].score);
}

#[test]
fn vsm_bounds_order_and_zero_filter() {
    let engine = job_board();
    for k in 1..=6 {
        let hits = engine.ranked("magang desainer jakarta semarang", k);
        assert!(hits.len() <= k);
        assert!(hits.iter().all(|h| h.score > 0.0));
        assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
    }
    let hits = engine.ranked("figma", 5);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].doc, "doc02_designer.txt");
    assert!(engine.ranked("kubernetes", 5).is_empty());
    assert!(engine.ranked("di yang 2024", 5).is_empty());
}

#[test]
fn builds_are_idempotent() {
    let a = job_board();
    let b = job_board();
    assert_eq!(a.index(), b.index());
    assert_eq!(a.vsm(), b.vsm());
    for q in ["magang", "semarang NOT magang", "digital marketing jakarta"] {
        assert_eq!(a.boolean(q), b.boolean(q));
        assert_eq!(a.ranked(q, 3), b.ranked(q, 3));
    }
}

#[test]
fn empty_documents_are_tolerated() {
    let engine = job_board();
    assert_eq!(engine.stats().documents, 5);
    assert_eq!(engine.stats().empty_documents, 1);
}

#[test]
fn query_terms_drop_operators() {
    let engine = job_board();
    assert_eq!(engine.query_terms("magang AND semarang NOT magang", RetrievalModel::Boolean), vec![
        "magang".to_string(),
        "semarang".to_string()
    ]);
    let snippet = engine.snippet("doc01_admin.txt", &engine.query_terms("admin semarang", RetrievalModel::Vsm));
    assert_eq!(snippet.as_deref(), Some("Lowongan magang **admin** kantor di **Semarang**."));
}

#[test]
fn affixed_forms_match_their_roots() {
    let engine = job_board();
    assert_eq!(engine.boolean("kuasa"), set(&["doc01_admin.txt", "doc02_designer.txt", "doc03_web.txt"]));
    assert_eq!(engine.boolean("menguasai"), engine.boolean("kuasa"));

    let engine =
        SearchEngine::build(vec![Document::new("finance.txt", "Staf keuangan kantor pusat")], EngineConfig::default())
            .unwrap();
    assert_eq!(engine.boolean("uang"), set(&["finance.txt"]));
    assert_eq!(engine.ranked("uang", 3)[0].doc, "finance.txt");
}
