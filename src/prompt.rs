//! Prompt composition. Pure string building, no IO.

/// Frame the inventory report and the user's question for the model. The
/// report is embedded verbatim; nothing is escaped.
pub fn build(report: &str, query: &str) -> String {
    format!(
        "Based on this directory information (including file contents):\n\
         {report}\n\
         \n\
         Answer this question: {query}\n\
         \n\
         Please provide a concise and relevant answer. You can use markdown formatting for:\n\
         - Code blocks with ```\n\
         - Lists with - or *\n\
         - **Bold** or *italic* text\n\
         - > Quotes\n\
         \n\
         Do not add any titles or headers at the beginning of your response."
    )
}

/// Single-turn request for a short display title for the query.
pub fn title_prompt(query: &str) -> String {
    format!(
        "Create a very short (3-5 words) title that captures the essence of this query: {query}.\n\
         To give more context, the query is about the current directory and its contents."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_embeds_report_and_query() {
        let prompt = build("Found 2 files and 0 directories", "what is here?");
        assert!(prompt.starts_with("Based on this directory information"));
        assert!(prompt.contains("Found 2 files and 0 directories"));
        assert!(prompt.contains("Answer this question: what is here?"));
        assert!(prompt.ends_with("beginning of your response."));
    }

    #[test]
    fn title_prompt_embeds_query() {
        let prompt = title_prompt("what is here?");
        assert!(prompt.contains("3-5 words"));
        assert!(prompt.contains("what is here?"));
    }
}
