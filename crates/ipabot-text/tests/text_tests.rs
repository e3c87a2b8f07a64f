use ipabot_core::config::TextSettings;
use ipabot_text::{similarity, Analyzer};

const SAMPLES: &[&str] = &[
    "Apa itu fotosintesis?",
    "Jelaskan  HUKUM   Newton 1!!",
    "Mengapa es mencair di suhu ruang???",
    "Sebutkan organ pernapasan manusia",
    "Bagaimana cara-kerja sistem pencernaan",
    "Protéin, karbohidrat & lemak",
    "apa",
    "",
    "   \t\n ",
    "energi kinetik vs energi potensial",
];

const WORDS: &[&str] = &[
    "fotosintesis", "bergerak", "tekanan", "didinginkan", "sel", "di", "se", "ber", "an", "nya",
    "pernapasan", "menguapkan", "terapung", "pemanasan", "sebutkan", "kah", "a", "ab", "abc",
];

#[test]
fn normalize_is_idempotent() {
    let a = Analyzer::default();
    for s in SAMPLES {
        let once = a.normalize(s);
        assert_eq!(a.normalize(&once), once, "input {:?}", s);
    }
}

#[test]
fn normalize_output_has_single_spaces_and_no_punctuation() {
    let a = Analyzer::default();
    for s in SAMPLES {
        let n = a.normalize(s);
        assert_eq!(n.trim(), n);
        assert!(!n.contains("  "));
        assert!(n.chars().all(|c| c.is_alphanumeric() || c == '_' || c == ' '), "{:?}", n);
    }
}

#[test]
fn stem_never_lengthens_or_empties() {
    let a = Analyzer::default();
    for w in WORDS {
        let stem = a.stem(w);
        assert!(!stem.is_empty(), "{:?} stemmed to empty", w);
        assert!(stem.chars().count() <= w.chars().count(), "{:?} -> {:?}", w, stem);
    }
}

#[test]
fn self_similarity_is_at_least_one() {
    let a = Analyzer::default();
    for s in SAMPLES {
        let n = a.normalize(s);
        if n.is_empty() {
            continue;
        }
        assert!(similarity(&n, &n) >= 1.0, "{:?}", n);
    }
}

#[test]
fn custom_stop_words_from_settings() {
    let mut settings = TextSettings::default();
    settings.stop_words = vec!["Tentang".to_string()];
    let a = Analyzer::from_settings(&settings);
    // configured words are folded the same way as input
    assert_eq!(a.normalize("tentang apa itu gaya"), "apa itu gaya");
}
