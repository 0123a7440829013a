//! Context assembly: the three labeled sections the model answers from.
//!
//! Sections always appear in this order:
//!
//! 1. **User Profile**: the one-line customer summary
//! 2. **Tools (real-time)**: stores, coupons and the latest order
//! 3. **RAG Context**: retrieved passages, one entry per result
//!
//! Each passage is rendered as `[rank] (score) doc_id` followed by its full
//! text. Assembly is pure: identical inputs always produce identical output.

use cxbot_core::RetrievalResult;

pub const PROFILE_HEADER: &str = "### User Profile\n";
pub const TOOLS_HEADER: &str = "### Tools (real-time)\n";
pub const RAG_HEADER: &str = "### RAG Context\n";

/// Renders profile, live data and retrieved passages into one context block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextAssembler {
    score_precision: usize,
}

impl Default for ContextAssembler {
    fn default() -> Self {
        Self { score_precision: 4 }
    }
}

impl ContextAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the context block. Results are rendered in the order given.
    pub fn build(&self, results: &[RetrievalResult], tool_context: &str, profile: &str) -> String {
        let mut ctx = String::new();

        ctx.push_str(PROFILE_HEADER);
        ctx.push_str(profile);
        ctx.push_str("\n\n");

        ctx.push_str(TOOLS_HEADER);
        ctx.push_str(tool_context);
        ctx.push_str("\n\n");

        ctx.push_str(RAG_HEADER);
        for (rank, result) in results.iter().enumerate() {
            ctx.push_str(&format!(
                "[{rank}] ({score:.precision$}) {doc_id}\n{text}\n\n",
                score = result.score,
                precision = self.score_precision,
                doc_id = result.doc_id,
                text = result.text,
            ));
        }
        ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(doc_id: &str, score: f32, text: &str) -> RetrievalResult {
        RetrievalResult {
            text: text.into(),
            score,
            doc_id: doc_id.into(),
        }
    }

    #[test]
    fn golden_output() {
        let results = vec![
            result("returns.md", 0.123456, "Refunds within 30 days."),
            result("hours.txt", 1.5, "Open 7am to 9pm."),
        ];
        let ctx = ContextAssembler::new().build(
            &results,
            "Nearby stores:\n- Downtown Roastery (S001)\n",
            "User u-1 is a frequent customer who enjoys hot drinks.",
        );

        let expected = "### User Profile\n\
User u-1 is a frequent customer who enjoys hot drinks.\n\n\
### Tools (real-time)\n\
Nearby stores:\n- Downtown Roastery (S001)\n\n\n\
### RAG Context\n\
[0] (0.1235) returns.md\nRefunds within 30 days.\n\n\
[1] (1.5000) hours.txt\nOpen 7am to 9pm.\n\n";
        assert_eq!(ctx, expected);
    }

    #[test]
    fn headers_appear_in_fixed_order() {
        let inputs: [(&[RetrievalResult], &str, &str); 3] = [
            (&[], "", ""),
            (&[], "### RAG Context\n", "### Tools (real-time)\n"),
            (&[], "coupons", "profile"),
        ];
        for (results, tools, profile) in inputs {
            let ctx = ContextAssembler::new().build(results, tools, profile);
            let profile_at = ctx.find(PROFILE_HEADER).unwrap();
            let tools_at = ctx.find(TOOLS_HEADER).unwrap();
            let rag_at = ctx.rfind(RAG_HEADER).unwrap();
            assert!(profile_at < tools_at && tools_at < rag_at);
        }
    }

    #[test]
    fn empty_fields_are_still_rendered() {
        let ctx = ContextAssembler::new().build(&[result("", 0.0, "")], "", "");
        assert!(ctx.ends_with("### RAG Context\n[0] (0.0000) \n\n\n"));
    }

    #[test]
    fn passages_keep_given_order() {
        let results = vec![
            result("b", 0.9, "second best"),
            result("a", 0.1, "best"),
        ];
        let ctx = ContextAssembler::new().build(&results, "", "");
        assert!(ctx.find("[0] (0.9000) b").unwrap() < ctx.find("[1] (0.1000) a").unwrap());
    }

    #[test]
    fn build_is_deterministic() {
        let results = vec![result("a", 0.25, "x")];
        let assembler = ContextAssembler::new();
        assert_eq!(
            assembler.build(&results, "t", "p"),
            assembler.build(&results, "t", "p")
        );
    }
}
