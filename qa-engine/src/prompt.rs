//! Prompt assembler: a fixed grounding template around context and question.
//!
//! Rendering is a direct substitution — the question is carried verbatim
//! (no truncation, no stripping) and the retrieved chunks are joined in
//! rank order with a paragraph separator. The grounding guarantee is a
//! behavioral instruction to the model, not a mechanical constraint here.

/// Builds the final prompt from the retrieved context and the question.
///
/// The instruction enforces the grounding policy: answer only from the
/// supplied context, keep the persona of a thoughtful scholar of the book,
/// and say explicitly when the context does not contain the answer.
pub fn build_prompt(question: &str, context: &[String]) -> String {
    let context_block = context.join("\n\n");
    format!(
        "You are a thoughtful scholar of the book this context was drawn from. \
Answer in a measured, principled voice, basing yourself exclusively on the \
context provided below.\n\
If the answer is not found in the context, say plainly that the book does \
not give you that specific information — do not invent one — while keeping \
the reflective tone of the work.\n\
\n\
Context:\n\
{context_block}\n\
\n\
Question: {question}\n\
\n\
Answer:"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_is_carried_verbatim() {
        let question = "What about {braces} and <tags> and very exact wording?";
        let prompt = build_prompt(question, &["ctx".to_string()]);
        assert!(prompt.contains(question));
    }

    #[test]
    fn long_questions_are_not_truncated() {
        let question = "why ".repeat(5_000);
        let prompt = build_prompt(&question, &[]);
        assert!(prompt.contains(question.as_str()));
    }

    #[test]
    fn context_joined_in_rank_order_with_paragraph_separator() {
        let ctx = vec!["first chunk".to_string(), "second chunk".to_string()];
        let prompt = build_prompt("q?", &ctx);
        assert!(prompt.contains("first chunk\n\nsecond chunk"));
        let first = prompt.find("first chunk").unwrap();
        let second = prompt.find("second chunk").unwrap();
        assert!(first < second);
    }

    #[test]
    fn rendering_is_deterministic() {
        let ctx = vec!["a".to_string(), "b".to_string()];
        assert_eq!(build_prompt("q", &ctx), build_prompt("q", &ctx));
    }
}
