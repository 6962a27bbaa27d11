//! Seed instructions for a run
//!
//! Scripted backends match on this text, so it is kept byte-for-byte stable.

/// Render the seed instructions for `query`
pub fn seed_instructions(manifest: &[String], names: &[&str], query: &str) -> String {
    format!(
        r#"
Answer the following questions as best you can. You have access to the following tools:

{manifest}

Use the following format:

Question: the input question you must answer
Thought: you should always think about what to do
Action: the action to take, should be one of [{names}]
Action Input: the input to the action
Observation: the result of the action
... (this Thought/Action/Action Input/Observation can repeat N times)
Thought: I now know the final answer
Final Answer: the final answer to the original input question

Begin!

Question: {query}
"#,
        manifest = manifest.join("\n"),
        names = names.join(", "),
        query = query,
    )
}
