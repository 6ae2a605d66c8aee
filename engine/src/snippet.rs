use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};

use crate::config::SnippetConfig;

lazy_static! {
    static ref SENTENCE: Regex = Regex::new(r"[^.!?\r\n]+[.!?]*").expect("valid regex");
}

fn sentences(text: &str) -> Vec<&str> {
    SENTENCE.find_iter(text).map(|m| m.as_str().trim()).filter(|s| !s.is_empty()).collect()
}

/// Pick the sentence mentioning the most distinct query terms (first one on
/// ties), wrap every term occurrence in `cfg.marker` and cap the length.
pub fn create_snippet<S: AsRef<str>>(text: &str, terms: &[S], cfg: &SnippetConfig) -> String {
    let sentences = sentences(text);
    let lowered: Vec<String> = terms
        .iter()
        .map(|t| t.as_ref().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();

    let mut best: Option<&str> = None;
    let mut max_hits = 0;
    for sentence in &sentences {
        let s = sentence.to_lowercase();
        let hits = lowered.iter().filter(|t| s.contains(t.as_str())).count();
        if hits > max_hits {
            max_hits = hits;
            best = Some(*sentence);
        }
    }
    let chosen = match best.or_else(|| sentences.first().copied()) {
        Some(s) => s.to_string(),
        None => text.chars().take(cfg.fallback_chars).collect(),
    };

    let highlighted = highlight(&chosen, lowered.as_slice(), &cfg.marker);
    if highlighted.chars().count() > cfg.max_chars {
        let head: String = highlighted.chars().take(cfg.max_chars).collect();
        format!("...{head}...")
    } else {
        highlighted
    }
}

/// Case-insensitive, in term order; an occurrence keeps its original case.
pub fn highlight<S: AsRef<str>>(text: &str, terms: &[S], marker: &str) -> String {
    let mut out = text.to_string();
    for term in terms {
        let term = term.as_ref();
        if term.trim().is_empty() {
            continue;
        }
        let Ok(pat) = RegexBuilder::new(&regex::escape(term)).case_insensitive(true).build() else {
            continue;
        };
        out = pat
            .replace_all(&out, |caps: &regex::Captures| format!("{marker}{}{marker}", &caps[0]))
            .into_owned();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chooses_sentence_with_most_terms() {
        let text = "Perusahaan kami di Jakarta. Dibuka magang admin di Semarang! Kirim CV segera.";
        let s = create_snippet(text, &["magang", "semarang"], &SnippetConfig::default());
        assert_eq!(s, "Dibuka **magang** admin di **Semarang**!");
    }

    #[test]
    fn falls_back_to_first_sentence() {
        let text = "Baris pertama\nBaris kedua";
        let s = create_snippet(text, &["python"], &SnippetConfig::default());
        assert_eq!(s, "Baris pertama");
    }

    #[test]
    fn long_snippets_are_truncated() {
        let text = "kata ".repeat(100);
        let cfg = SnippetConfig { max_chars: 20, ..SnippetConfig::default() };
        let s = create_snippet(&text, &["zzz"], &cfg);
        assert!(s.starts_with("...") && s.ends_with("..."));
        assert_eq!(s.chars().count(), 26);
    }

    #[test]
    fn empty_text() {
        let terms: [&str; 0] = [];
        assert_eq!(create_snippet("", &terms, &SnippetConfig::default()), "");
    }
}
