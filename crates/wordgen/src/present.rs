use std::fmt::Write;

use crate::WordEntry;

/// Renders generated words for the console.
pub fn render(language: &str, entries: &[WordEntry]) -> String {
    if entries.is_empty() {
        return format!("No words were generated for {language}.");
    }
    let mut out = format!("Generated {} words in {language}:", entries.len());
    for (index, entry) in entries.iter().enumerate() {
        // writing into a String cannot fail
        let _ = write!(
            out,
            "\n{}. {}\n   {}",
            index + 1,
            entry.word.to_uppercase(),
            entry.description
        );
    }
    out
}
