//! Stemming strategies plugged into the [`Normalizer`](crate::normalizer::Normalizer).

use rust_stemmers::Algorithm;

use crate::config::StemmerKind;
use crate::error::{EngineError, Result};

/// Reduces a lowercase token to its stem. Implementations must be
/// deterministic: the index and the query path rely on equal output for
/// equal input.
pub trait Stemmer: Send + Sync {
    fn stem(&self, word: &str) -> String;

    fn name(&self) -> &'static str;
}

/// Leaves tokens untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityStemmer;

impl Stemmer for IdentityStemmer {
    fn stem(&self, word: &str) -> String { word.to_string() }

    fn name(&self) -> &'static str { "identity" }
}

/// Snowball stemmers from `rust-stemmers`.
pub struct SnowballStemmer {
    inner: rust_stemmers::Stemmer,
}

impl SnowballStemmer {
    pub fn new(algorithm: Algorithm) -> Self {
        Self { inner: rust_stemmers::Stemmer::create(algorithm) }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        let algorithm = match name.to_ascii_lowercase().as_str() {
            "arabic" => Algorithm::Arabic,
            "danish" => Algorithm::Danish,
            "dutch" => Algorithm::Dutch,
            "english" => Algorithm::English,
            "finnish" => Algorithm::Finnish,
            "french" => Algorithm::French,
            "german" => Algorithm::German,
            "greek" => Algorithm::Greek,
            "hungarian" => Algorithm::Hungarian,
            "italian" => Algorithm::Italian,
            "norwegian" => Algorithm::Norwegian,
            "portuguese" => Algorithm::Portuguese,
            "romanian" => Algorithm::Romanian,
            "russian" => Algorithm::Russian,
            "spanish" => Algorithm::Spanish,
            "swedish" => Algorithm::Swedish,
            "tamil" => Algorithm::Tamil,
            "turkish" => Algorithm::Turkish,
            other => return Err(EngineError::config(format!("unknown snowball algorithm: {other}"))),
        };
        Ok(Self::new(algorithm))
    }
}

impl Stemmer for SnowballStemmer {
    fn stem(&self, word: &str) -> String { self.inner.stem(word).into_owned() }

    fn name(&self) -> &'static str { "snowball" }
}

const PARTICLES: &[&str] = &["kah", "lah", "pun"];
const POSSESSIVES: &[&str] = &["nya", "ku", "mu"];
const DERIVATIONAL: &[&str] = &["kan", "an", "i"];

/// (surface form, prefix family, replacement when followed by a vowel)
const FIRST_ORDER: &[(&str, &str, Option<&str>)] = &[
    ("meng", "me", Some("k")),
    ("meny", "me", Some("s")),
    ("men", "me", Some("t")),
    ("mem", "me", Some("p")),
    ("me", "me", None),
    ("peng", "pe", Some("k")),
    ("peny", "pe", Some("s")),
    ("pen", "pe", Some("t")),
    ("pem", "pe", Some("p")),
    ("di", "di", None),
    ("ter", "ter", None),
    ("ke", "ke", None),
];

/// Vowel-initial roots that keep their vowel after `meng`/`peng`. Any other
/// vowel there is read as a nasalized `k`: `menguasai` -> `kuasa`.
const VOWEL_ROOTS: &[&str] = &[
    "ajar", "akses", "alam", "ambil", "amat", "analis", "angkat", "atur", "edit", "evaluasi", "ikut",
    "impor", "input", "isi", "olah", "operasi", "ubah", "ukur", "ulas", "undang", "unggah", "upload",
    "urus", "usaha", "utama",
];

const SECOND_ORDER: &[&str] = &["ber", "per", "be", "pe"];

/// Prefix/suffix pairs that never occur together on one Indonesian word.
const DISALLOWED: &[(&str, &str)] = &[
    ("be", "i"),
    ("ber", "i"),
    ("di", "an"),
    ("ke", "i"),
    ("ke", "kan"),
    ("me", "an"),
    ("ter", "an"),
];

/// Rule-based Indonesian stemmer in the style of Tala's Porter adaptation:
/// particles, possessive pronouns, prefixes and derivational suffixes are
/// stripped in a fixed order. A removal is applied only if the remainder
/// keeps at least two syllables, so short roots such as `magang` survive.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndonesianStemmer;

impl IndonesianStemmer {
    fn strip_inflectional(word: &str, suffixes: &[&str]) -> Option<String> {
        let suffix = suffixes.iter().find(|s| word.ends_with(*s))?;
        let rest = &word[..word.len() - suffix.len()];
        (syllables(rest) >= 2).then(|| rest.to_string())
    }

    fn strip_derivational(word: &str, prefix: Option<&'static str>) -> Option<String> {
        let suffix = DERIVATIONAL.iter().find(|s| word.ends_with(*s))?;
        if let Some(p) = prefix {
            if DISALLOWED.contains(&(p, *suffix)) {
                return None;
            }
        }
        let rest = &word[..word.len() - suffix.len()];
        (syllables(rest) >= 2).then(|| rest.to_string())
    }

    fn strip_first_order(word: &str) -> Option<(&'static str, String)> {
        let (surface, family, recode) = FIRST_ORDER.iter().find(|(p, _, _)| word.starts_with(p))?;
        let rest = &word[surface.len()..];
        let keeps_vowel = *recode == Some("k") && VOWEL_ROOTS.iter().any(|root| rest.starts_with(root));
        let stem = match recode {
            Some(r) if rest.starts_with(is_vowel) && !keeps_vowel => format!("{r}{rest}"),
            _ => rest.to_string(),
        };
        (syllables(&stem) >= 2).then_some((*family, stem))
    }

    fn strip_second_order(word: &str) -> Option<(&'static str, String)> {
        let prefix = SECOND_ORDER.iter().find(|p| word.starts_with(*p))?;
        let rest = &word[prefix.len()..];
        (syllables(rest) >= 2).then(|| (*prefix, rest.to_string()))
    }
}

impl Stemmer for IndonesianStemmer {
    fn stem(&self, word: &str) -> String {
        if word.len() < 4 || !word.bytes().all(|b| b.is_ascii_lowercase()) {
            return word.to_string();
        }
        let mut w = word.to_string();
        if let Some(rest) = Self::strip_inflectional(&w, PARTICLES) {
            w = rest;
        }
        if let Some(rest) = Self::strip_inflectional(&w, POSSESSIVES) {
            w = rest;
        }
        if let Some((prefix, rest)) = Self::strip_first_order(&w) {
            w = rest;
            if let Some(rest) = Self::strip_derivational(&w, Some(prefix)) {
                w = rest;
                if let Some((_, rest)) = Self::strip_second_order(&w) {
                    w = rest;
                }
            }
        } else {
            let mut prefix = None;
            if let Some((p, rest)) = Self::strip_second_order(&w) {
                prefix = Some(p);
                w = rest;
            }
            if let Some(rest) = Self::strip_derivational(&w, prefix) {
                w = rest;
            }
        }
        w
    }

    fn name(&self) -> &'static str { "indonesian" }
}

fn is_vowel(c: char) -> bool { matches!(c, 'a' | 'e' | 'i' | 'o' | 'u') }

/// Syllable count: one per vowel, except that the diphthongs `ai`, `au` and
/// `oi` count once. `uang` has two syllables, `pandai` has two.
fn syllables(word: &str) -> usize {
    let mut count = 0;
    let mut prev = ' ';
    for c in word.chars() {
        if is_vowel(c) && !matches!((prev, c), ('a', 'i') | ('a', 'u') | ('o', 'i')) {
            count += 1;
        }
        prev = c;
    }
    count
}

pub fn from_kind(kind: &StemmerKind) -> Result<Box<dyn Stemmer>> {
    Ok(match kind {
        StemmerKind::Indonesian => Box::new(IndonesianStemmer),
        StemmerKind::Snowball { algorithm } => Box::new(SnowballStemmer::from_name(algorithm)?),
        StemmerKind::Identity => Box::new(IdentityStemmer),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stem(w: &str) -> String { IndonesianStemmer.stem(w) }

    #[test]
    fn short_roots_are_kept() {
        for w in ["magang", "admin", "semarang", "jakarta", "designer", "kerja"] {
            assert_eq!(stem(w), w);
        }
    }

    #[test]
    fn strips_affixes() {
        assert_eq!(stem("pekerjaan"), "kerja");
        assert_eq!(stem("dibutuhkan"), "butuh");
        assert_eq!(stem("lamaran"), "lamar");
        assert_eq!(stem("menulis"), "tulis");
        assert_eq!(stem("menyusun"), "susun");
        assert_eq!(stem("bukunya"), "buku");
        assert_eq!(stem("bekerja"), "kerja");
    }

    #[test]
    fn nasal_prefix_before_vowel() {
        assert_eq!(stem("menguasai"), "kuasa");
        assert_eq!(stem("mengelola"), "kelola");
        assert_eq!(stem("pengembangan"), "kembang");
        assert_eq!(stem("mengikuti"), "ikut");
        assert_eq!(stem("pengalaman"), "alam");
        assert_eq!(stem("pengguna"), "guna");
    }

    #[test]
    fn confix_keeps_two_syllable_roots() {
        assert_eq!(stem("keuangan"), "uang");
        assert_eq!(stem("uang"), "uang");
        assert_eq!(stem("kuasa"), "kuasa");
    }

    #[test]
    fn counts_syllables() {
        assert_eq!(syllables("magang"), 2);
        assert_eq!(syllables("kerjaan"), 3);
        assert_eq!(syllables("uang"), 2);
        assert_eq!(syllables("kuasai"), 3);
        assert_eq!(syllables("pandai"), 2);
        assert_eq!(syllables("xyz"), 0);
    }

    #[test]
    fn snowball_english() {
        let s = SnowballStemmer::from_name("English").unwrap();
        assert_eq!(s.stem("running"), "run");
        assert!(SnowballStemmer::from_name("klingon").is_err());
    }
}
