//! Prompt builders for specialized assistance modes.
//!
//! These wrap a raw question into a structured request before it goes
//! through the normal [`crate::ResponseGenerator::generate`] path — the
//! generator itself stays mode-agnostic.

/// Build a prompt asking for interview-answer coaching.
pub fn interview_help(question: &str, context: &str) -> String {
    format!(
        "Interview Question: {question}\n\
         Context: {context}\n\n\
         Please provide:\n\
         1. A suggested answer framework\n\
         2. Key points to mention\n\
         3. What to avoid saying\n\n\
         Keep it concise for real-time use."
    )
}

/// Build a prompt asking for coding hints without a full solution.
pub fn coding_help(problem: &str, language: &str) -> String {
    format!(
        "Coding Problem: {problem}\n\
         Language: {language}\n\n\
         Please provide:\n\
         1. Approach/algorithm hint\n\
         2. Key concepts to consider\n\
         3. Potential edge cases\n\n\
         Don't give the full solution unless specifically asked."
    )
}
