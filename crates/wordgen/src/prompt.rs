/// Number of words requested from the model on every call.
pub const WORD_COUNT: usize = 5;

/// How the instruction text is wrapped before it reaches the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptStyle {
    /// The bare instruction text.
    #[default]
    Plain,
    /// The instruction wrapped in the Llama 3 instruct chat template.
    Llama3Instruct,
}

pub fn instruction(language: &str, count: usize) -> String {
    format!(
        "Generate {count} unique words that have a random number of characters more than 4 and less than 10 in {language} language. \
         For each word, provide a brief description of its meaning in English with more than a couple of words. \
         Produce output only in minified JSON array with the keys word and description. Word always must be in lowercase."
    )
}

pub fn build_prompt(language: &str, style: PromptStyle) -> String {
    let instruction = instruction(language, WORD_COUNT);
    match style {
        PromptStyle::Plain => instruction,
        PromptStyle::Llama3Instruct => format!(
            "<|begin_of_text|><|start_header_id|>user<|end_header_id|>\n\n\
             {instruction}<|eot_id|>\n\
             <|start_header_id|>assistant<|end_header_id|>\n\n"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeds_language_and_count() {
        let prompt = build_prompt("French", PromptStyle::Plain);
        assert!(prompt.starts_with("Generate 5 unique words"));
        assert!(prompt.contains("in French language."));
        assert!(prompt.contains("keys word and description"));
        assert!(prompt.contains("lowercase"));
    }

    #[test]
    fn same_language_same_prompt() {
        assert_eq!(
            build_prompt("Swahili", PromptStyle::Llama3Instruct),
            build_prompt("Swahili", PromptStyle::Llama3Instruct)
        );
    }

    #[test]
    fn instruct_style_wraps_the_plain_instruction() {
        let plain = build_prompt("German", PromptStyle::Plain);
        let wrapped = build_prompt("German", PromptStyle::Llama3Instruct);
        assert!(wrapped.starts_with("<|begin_of_text|><|start_header_id|>user<|end_header_id|>"));
        assert!(wrapped.contains(&format!("{plain}<|eot_id|>")));
        assert!(wrapped.ends_with("<|start_header_id|>assistant<|end_header_id|>\n\n"));
    }
}
