//! The cxbot request pipeline.
//!
//! A user message is handled in one fixed sequence:
//!
//! 1. **Mask** phone numbers and emails in the message
//! 2. **Retrieve** the nearest passages for the masked message
//! 3. **Assemble** profile, live retail data and passages into a context block
//! 4. **Answer** with a single system + user call to the language model
//! 5. **Unmask** placeholders in the reply
//!
//! Any failure aborts the request; there are no partial answers.

pub mod assembler;
pub mod live_data;
pub mod orchestrator;
pub mod prompts;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use assembler::ContextAssembler;
pub use live_data::{LiveData, render_tool_context};
pub use orchestrator::{ChatOutcome, ChatRequest, ChatResponse, Orchestrator, RequestStage};
pub use prompts::{SYSTEM_PROMPT, build_user_prompt};
