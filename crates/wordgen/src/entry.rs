use serde::{Deserialize, Serialize};

pub const MISSING_WORD: &str = "N/A";
pub const MISSING_DESCRIPTION: &str = "No description available";

/// A generated vocabulary word together with its English description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    pub word: String,
    pub description: String,
}

impl WordEntry {
    pub fn new(word: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            description: description.into(),
        }
    }

    /// Whether the entry honors the shape the prompt asks for: a lowercase
    /// word with more than 4 and fewer than 10 characters.
    pub fn is_conforming(&self) -> bool {
        let length = self.word.chars().count();
        length > 4 && length < 10 && !self.word.chars().any(char::is_uppercase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conforming_words() {
        assert!(WordEntry::new("bonjour", "hello").is_conforming());
        assert!(WordEntry::new("árvore", "tree").is_conforming());
        assert!(!WordEntry::new("chat", "cat").is_conforming());
        assert!(!WordEntry::new("Bonjour", "hello").is_conforming());
        assert!(!WordEntry::new("anticonstitutionnellement", "unconstitutionally").is_conforming());
    }
}
