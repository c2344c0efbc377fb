//! Short display titles for queries: model-generated, with a deterministic
//! fallback so a title failure never blocks the answer.

use tracing::debug;

use crate::config;
use crate::ollama::OllamaClient;
use crate::prompt;

/// Ask the model for a 3-5 word title; fall back to the deterministic
/// transform on any failure or an empty reply. Computed once per query.
pub async fn summarize(client: &OllamaClient, query: &str) -> String {
    match client.chat(&prompt::title_prompt(query)).await {
        Ok(raw) => {
            let title = raw.trim().trim_end_matches('.').trim().to_string();
            if title.is_empty() {
                fallback_title(query)
            } else {
                title
            }
        }
        Err(err) => {
            debug!("title generation failed, using fallback: {err:#}");
            fallback_title(query)
        }
    }
}

/// Strip a trailing `?`, capitalize, truncate to [`config::TITLE_LIMIT`]
/// characters with `...` when longer.
pub fn fallback_title(query: &str) -> String {
    let title = capitalize(query.trim().trim_end_matches('?'));
    if title.chars().count() > config::TITLE_LIMIT {
        let head: String = title.chars().take(config::TITLE_LIMIT).collect();
        format!("{head}...")
    } else {
        title
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_question_mark_and_capitalizes() {
        assert_eq!(fallback_title("what is here?"), "What is here");
    }

    #[test]
    fn long_queries_are_truncated_with_ellipsis() {
        let title = fallback_title("which of these files contains the database configuration?");
        assert_eq!(title, "Which of these files contains ...");
        assert_eq!(title.chars().count(), config::TITLE_LIMIT + 3);
    }

    #[test]
    fn empty_query_yields_empty_title() {
        assert_eq!(fallback_title(""), "");
    }

    #[test]
    fn repeated_question_marks_are_all_stripped() {
        assert_eq!(fallback_title("really??"), "Really");
    }
}
