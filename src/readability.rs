use crate::text::sentence_count;

/// Only the start of long pages is scored.
const SAMPLE_CHARS: usize = 5000;

/// Flesch reading ease of `text`; higher is easier. `None` for text without words.
pub fn flesch_reading_ease(text: &str) -> Option<f64> {
    let sample: String = text.chars().take(SAMPLE_CHARS).collect();

    let words: Vec<&str> = sample
        .split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_alphabetic()))
        .filter(|word| !word.is_empty())
        .collect();
    if words.is_empty() {
        return None;
    }

    let sentences = sentence_count(&sample).max(1) as f64;
    let syllables: usize = words.iter().map(|word| syllable_count(word)).sum();
    let word_count = words.len() as f64;

    Some(206.835 - 1.015 * (word_count / sentences) - 84.6 * (syllables as f64 / word_count))
}

/// Rough English syllable count: vowel groups, minus a silent trailing `e`.
pub fn syllable_count(word: &str) -> usize {
    let lower = word.to_lowercase();
    let chars: Vec<char> = lower.chars().filter(|c| c.is_alphabetic()).collect();
    if chars.is_empty() {
        return 0;
    }

    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
    let mut groups = 0;
    let mut previous_vowel = false;
    for &c in &chars {
        let vowel = is_vowel(c);
        if vowel && !previous_vowel {
            groups += 1;
        }
        previous_vowel = vowel;
    }

    let len = chars.len();
    if groups > 1 && chars[len - 1] == 'e' && !(len >= 2 && chars[len - 2] == 'l') {
        groups -= 1;
    }

    groups.max(1)
}

/// Human label for a reading-ease score.
pub fn difficulty(score: f64) -> &'static str {
    match score {
        s if s >= 90.0 => "Very Easy",
        s if s >= 80.0 => "Easy",
        s if s >= 70.0 => "Fairly Easy",
        s if s >= 60.0 => "Standard",
        s if s >= 50.0 => "Fairly Difficult",
        s if s >= 30.0 => "Difficult",
        _ => "Very Difficult",
    }
}
