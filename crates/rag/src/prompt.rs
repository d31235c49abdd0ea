use tp_vector_store::SearchResult;

const INSTRUCTIONS: &str = "You are a Transfer Pricing knowledge agent for UAE tax regulations.
Use the following pieces of context to answer the question at the end.
If you don't know the answer, just say that you don't know, don't try to make up an answer.
Always cite the section or page number from the Transfer Pricing guide if possible.";

/// Retrieved chunk text, separated by blank lines
pub fn join_context(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|r| r.chunk.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Fill the answering template
pub fn render_prompt(context: &str, question: &str) -> String {
    format!("{INSTRUCTIONS}\n\nContext:\n{context}\n\nQuestion: {question}\n\nAnswer:")
}
