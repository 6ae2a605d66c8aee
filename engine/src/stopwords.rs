use std::collections::HashSet;

use crate::config::{NormalizerConfig, StopwordList};

/// Decides whether a lowercase token carries no retrieval value.
pub trait StopwordPredicate: Send + Sync {
    fn is_stopword(&self, token: &str) -> bool;
}

pub const INDONESIAN_STOPWORDS: &[&str] = &[
    "ada","adalah","adanya","adapun","agak","agaknya","agar","akan","akankah","akhir","akhiri","akhirnya",
    "aku","akulah","amat","amatlah","anda","andalah","antar","antara","antaranya","apa","apaan","apabila",
    "apakah","apalagi","apatah","artinya","asal","asalkan","atas","atau","ataukah","ataupun","awal","awalnya",
    "bagai","bagaikan","bagaimana","bagaimanakah","bagaimanapun","bagi","bagian","bahkan","bahwa","bahwasanya",
    "baik","bakal","bakalan","balik","banyak","bapak","bawah","beberapa","begini","beginian","beginikah",
    "beginilah","begitu","begitukah","begitulah","begitupun","belakang","belakangan","belum","belumlah",
    "benar","benarkah","benarlah","berada","berakhir","berapa","berikut","berikutnya","bersama","betul",
    "biasa","biasanya","bila","bilakah","bisa","bisakah","boleh","bolehkah","bukan","bukankah","bukanlah",
    "bukannya","bung","cara","caranya","cukup","cuma","dahulu","dalam","dan","dapat","dari","daripada",
    "datang","dekat","demi","demikian","dengan","depan","di","dia","diantara","dilakukan","dimana","dini",
    "diri","dirinya","dong","dulu","enggak","entah","guna","hal","hampir","hanya","hanyalah","harus",
    "haruslah","hendak","hingga","ia","ialah","ibarat","ibu","ikut","ingin","ini","inilah","itu","itulah",
    "jadi","jangan","jauh","jelas","jika","jikalau","juga","jumlah","justru","kala","kalau","kalaulah",
    "kalaupun","kalian","kami","kamilah","kamu","kamulah","kan","kapan","kapankah","kapanpun","karena",
    "karenanya","kata","katakan","ke","keadaan","kebetulan","kedua","keduanya","keluar","kembali","kemudian",
    "kenapa","kepada","ketika","khususnya","kini","kinilah","kira","kita","kitalah","kok","kurang","lagi",
    "lagian","lah","lain","lainnya","lalu","lama","lanjut","lebih","lewat","luar","macam","maka","makanya",
    "makin","malah","malahan","mampu","mana","manakala","manalagi","masa","masalah","masih","masing","mau",
    "maupun","melainkan","melakukan","melalui","memang","mengapa","menjadi","menurut","merasa","mereka",
    "merekalah","merupakan","meski","meskipun","mula","mulai","mungkin","nah","namun","nanti","nantinya",
    "nyaris","oleh","olehnya","pada","padahal","padanya","paling","para","pasti","pastilah","per","pernah",
    "pertama","pihak","pula","pun","punya","rasa","rata","saat","saja","saling","sama","sambil","sampai",
    "sana","sangat","sangatlah","satu","saya","sayalah","se","sebab","sebagai","sebagaimana","sebagian",
    "sebaliknya","sebanyak","sebelum","sebelumnya","sebenarnya","sebesar","sebetulnya","sebuah","secara",
    "sedang","sedangkan","sedikit","segala","segera","sehingga","sejak","sekali","sekalian","sekarang",
    "sekitar","selain","selalu","selama","seluruh","semakin","semua","semuanya","sendiri","seorang",
    "seperti","sering","serta","sesuatu","sesudah","setelah","setiap","siapa","sini","situ","suatu","sudah",
    "supaya","tadi","tak","tanpa","tapi","telah","tentang","tentu","tepat","terhadap","terjadi","termasuk",
    "tersebut","tetap","tetapi","tiap","tidak","toh","turut","untuk","wah","walau","walaupun","ya","yaitu",
    "yakni","yang",
];

/// Contractions are left out: the normalizer splits them on the apostrophe.
pub const ENGLISH_STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are", "as", "at",
    "be", "because", "been", "before", "being", "below", "between", "both", "but", "by", "can", "cannot",
    "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for", "from", "further", "had",
    "has", "have", "having", "he", "her", "here", "hers", "herself", "him", "himself", "his", "how", "i",
    "if", "in", "into", "is", "it", "its", "itself", "me", "more", "most", "my", "myself", "no", "nor", "not",
    "of", "off", "on", "once", "only", "or", "other", "ought", "our", "ours", "ourselves", "out", "over",
    "own", "same", "she", "should", "so", "some", "such", "than", "that", "the", "their", "theirs", "them",
    "themselves", "then", "there", "these", "they", "this", "those", "through", "to", "too", "under", "until",
    "up", "very", "was", "we", "were", "what", "when", "where", "which", "while", "who", "whom", "why",
    "with", "would", "you", "your", "yours", "yourself", "yourselves",
];

/// An immutable stopword set assembled from a base list plus extra words.
#[derive(Debug, Clone, Default)]
pub struct StopwordSet {
    words: HashSet<String>,
}

impl StopwordSet {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self { words: words.into_iter().map(|w| w.as_ref().to_lowercase()).collect() }
    }

    pub fn from_config(cfg: &NormalizerConfig) -> Self {
        let base: &[&str] = match cfg.stopwords {
            StopwordList::Indonesian => INDONESIAN_STOPWORDS,
            StopwordList::English => ENGLISH_STOPWORDS,
            StopwordList::None => &[],
        };
        Self::new(base.iter().copied().chain(cfg.extra_stopwords.iter().map(String::as_str)))
    }

    pub fn len(&self) -> usize { self.words.len() }

    pub fn is_empty(&self) -> bool { self.words.is_empty() }
}

impl StopwordPredicate for StopwordSet {
    fn is_stopword(&self, token: &str) -> bool { self.words.contains(token) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_merges_domain_words() {
        let set = StopwordSet::from_config(&NormalizerConfig::default());
        assert!(set.is_stopword("yang"));
        assert!(set.is_stopword("wfo"));
        assert!(set.is_stopword("info"));
        assert!(!set.is_stopword("magang"));
        assert!(!set.is_stopword("semarang"));
    }

    #[test]
    fn none_list_keeps_only_extras() {
        let cfg = NormalizerConfig {
            stopwords: StopwordList::None,
            extra_stopwords: vec!["Foo".into()],
            ..NormalizerConfig::default()
        };
        let set = StopwordSet::from_config(&cfg);
        assert_eq!(set.len(), 1);
        assert!(set.is_stopword("foo"));
        assert!(!set.is_stopword("yang"));
    }

    #[test]
    fn lists_hold_only_normalized_tokens() {
        for word in INDONESIAN_STOPWORDS.iter().chain(ENGLISH_STOPWORDS) {
            assert!(word.bytes().all(|b| b.is_ascii_lowercase()), "{word} can never match a token");
        }
    }
}
