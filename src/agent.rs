//! Orchestration: inventory -> prompt -> title -> streaming answer.

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::inventory;
use crate::ollama::OllamaClient;
use crate::present::Presenter;
use crate::prompt;
use crate::title;

const EVENT_CHANNEL_CAPACITY: usize = 100;

pub struct Agent {
    client: OllamaClient,
}

impl Agent {
    pub fn new(client: OllamaClient) -> Self {
        Self { client }
    }

    /// Answer a query about the current directory, streaming the reply into
    /// the terminal panel. Every failure in the pipeline degrades to an
    /// error string; this never panics or propagates.
    pub async fn answer_query(&self, query: &str) -> String {
        match self.run(query).await {
            Ok(content) => content,
            Err(err) => {
                let message = format!("Error processing query: {err:#}");
                error!("{message}");
                message
            }
        }
    }

    async fn run(&self, query: &str) -> Result<String> {
        let cwd = std::env::current_dir().context("resolve current directory")?;
        let report = inventory::scan(&cwd);
        let prompt = prompt::build(&report, query);

        // Title is generated once, before streaming starts.
        let title = title::summarize(&self.client, query).await;
        info!(%title, model = self.client.model(), "answering query");

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let client = self.client.clone();
        let stream_task =
            tokio::spawn(async move { client.chat_stream(&prompt, tx).await });

        let presented = Presenter::new(title).run(rx).await;
        stream_task.await.context("join streaming task")??;
        presented
    }
}
