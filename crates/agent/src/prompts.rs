//! Prompt templates sent to the language model.

/// Instructions given to the model on every request.
pub const SYSTEM_PROMPT: &str = "You are a helpful retail customer assistant.
Use ONLY the context given.
If missing info, ask a clarifying question and NEVER hallucinate.
Be concise, friendly, and compliant with store policy.
";

/// Wrap the assembled context and the (masked) user message into the user turn.
pub fn build_user_prompt(context: &str, message: &str) -> String {
    format!(
        "{context}\n### User Message:\n{message}\n\n### Task:\nUse the context above to answer the user:\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_prompt_puts_message_after_context() {
        let prompt = build_user_prompt("### User Profile\nP\n\n", "where is <PHONE_1>?");
        let context_at = prompt.find("### User Profile").unwrap();
        let message_at = prompt.find("### User Message:\nwhere is <PHONE_1>?").unwrap();
        let task_at = prompt.find("### Task:").unwrap();
        assert!(context_at < message_at && message_at < task_at);
        assert!(prompt.ends_with("Use the context above to answer the user:\n"));
    }

    #[test]
    fn system_prompt_forbids_guessing() {
        assert!(SYSTEM_PROMPT.contains("Use ONLY the context given."));
        assert!(SYSTEM_PROMPT.contains("NEVER hallucinate"));
    }
}
