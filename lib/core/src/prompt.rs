//! Prompt assembly for the generation service.

/// Passages placed in the prompt, regardless of how many were retrieved
pub const MAX_CONTEXT_PASSAGES: usize = 3;

/// Separator between passages in the context block
pub const PASSAGE_SEPARATOR: &str = "\n\n";

/// Join the leading passages into one context block
pub fn context_block<S: AsRef<str>>(contexts: &[S]) -> String {
    contexts
        .iter()
        .take(MAX_CONTEXT_PASSAGES)
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(PASSAGE_SEPARATOR)
}

/// Fill the answering template with retrieved context and the verbatim question
pub fn build_prompt<S: AsRef<str>>(contexts: &[S], question: &str) -> String {
    format!(
        "Answer the following question using ONLY the provided context.\n\
         If the context does not contain relevant information, say so.\n\
         \n\
         Context:\n\
         {}\n\
         \n\
         Question:\n\
         {}\n",
        context_block(contexts),
        question
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_template() {
        let prompt = build_prompt(&["first", "second"], "Why?");
        assert_eq!(
            prompt,
            "Answer the following question using ONLY the provided context.\n\
             If the context does not contain relevant information, say so.\n\
             \n\
             Context:\n\
             first\n\nsecond\n\
             \n\
             Question:\n\
             Why?\n"
        );
    }

    #[test]
    fn test_only_three_passages_used() {
        let contexts = vec!["a", "b", "c", "d", "e"];
        assert_eq!(context_block(&contexts), "a\n\nb\n\nc");
        assert!(!build_prompt(&contexts, "q").contains("\nd"));
    }

    #[test]
    fn test_empty_context() {
        let contexts: Vec<String> = Vec::new();
        let prompt = build_prompt(&contexts, "  spaced question ");
        assert!(prompt.contains("Context:\n\n\nQuestion:\n  spaced question \n"));
    }
}
