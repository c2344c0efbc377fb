//! Live terminal presentation of a streaming answer.
//!
//! A ratatui inline viewport holds the bordered panel: first a spinner while
//! waiting for the first token, then the accumulated answer as styled
//! Markdown, redrawn on every event and on a 100ms tick. When the stream
//! ends, the full panel is flushed into native scrollback and the viewport is
//! released. When stdout is not a terminal the live display is skipped and
//! the finished answer is printed plainly.

use std::io;

use anyhow::{anyhow, Context, Result};
use crossterm::tty::IsTty;
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap};
use ratatui::{Terminal, TerminalOptions, Viewport};
use tokio::sync::mpsc;
use tokio::time::{interval, Duration};
use tracing::debug;

use crate::markdown;
use crate::ollama::ChatEvent;

const VIEWPORT_HEIGHT: u16 = 14;
const REDRAW_INTERVAL_MS: u64 = 100;
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Accumulated answer text. Every intermediate state is a prefix of the
/// final content.
#[derive(Debug, Default)]
pub struct Transcript {
    content: String,
}

impl Transcript {
    pub fn push(&mut self, chunk: &str) {
        self.content.push_str(chunk);
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn into_content(self) -> String {
        self.content
    }
}

pub struct Presenter {
    title: String,
}

impl Presenter {
    pub fn new(title: String) -> Self {
        Self { title }
    }

    /// Consume the event stream and return the final answer text. A
    /// [`ChatEvent::Error`] finalizes whatever was last drawn and surfaces as
    /// an `Err` for the caller to stringify.
    pub async fn run(self, rx: mpsc::Receiver<ChatEvent>) -> Result<String> {
        if io::stdout().is_tty() {
            self.run_live(rx).await
        } else {
            debug!("stdout is not a terminal, skipping live display");
            self.run_plain(rx).await
        }
    }

    /// Accumulate without any terminal control, then print the answer.
    async fn run_plain(self, mut rx: mpsc::Receiver<ChatEvent>) -> Result<String> {
        let mut transcript = Transcript::default();
        while let Some(event) = rx.recv().await {
            match event {
                ChatEvent::Token(text) => transcript.push(&text),
                ChatEvent::Done => break,
                ChatEvent::Error(err) => return Err(anyhow!(err)),
            }
        }
        println!("{}", transcript.content());
        Ok(transcript.into_content())
    }

    async fn run_live(self, mut rx: mpsc::Receiver<ChatEvent>) -> Result<String> {
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::with_options(
            backend,
            TerminalOptions {
                viewport: Viewport::Inline(VIEWPORT_HEIGHT),
            },
        )
        .context("initialize inline terminal viewport")?;

        let mut transcript = Transcript::default();
        let mut ticker = interval(Duration::from_millis(REDRAW_INTERVAL_MS));
        let mut tick = 0usize;
        let mut failure: Option<String> = None;

        draw(&mut terminal, &self.title, &transcript, tick)?;
        loop {
            tokio::select! {
                event = rx.recv() => match event {
                    Some(ChatEvent::Token(text)) => transcript.push(&text),
                    Some(ChatEvent::Done) | None => break,
                    Some(ChatEvent::Error(err)) => {
                        failure = Some(err);
                        break;
                    }
                },
                _ = ticker.tick() => tick += 1,
            }
            draw(&mut terminal, &self.title, &transcript, tick)?;
        }

        finalize(&mut terminal, &self.title, &transcript)?;
        match failure {
            Some(err) => Err(anyhow!(err)),
            None => Ok(transcript.into_content()),
        }
    }
}

/// Redraw the panel: spinner while the transcript is empty, otherwise the
/// tail of the styled answer that fits the viewport.
fn draw(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    title: &str,
    transcript: &Transcript,
    tick: usize,
) -> Result<()> {
    terminal.draw(|frame| {
        let area = frame.area();
        let block = panel_block(title);
        if transcript.is_empty() {
            let spinner = SPINNER_FRAMES[tick % SPINNER_FRAMES.len()];
            let waiting = Line::from(vec![
                Span::styled(format!("{spinner} "), Style::default().fg(Color::Cyan)),
                Span::styled("Thinking...", Style::default().fg(Color::DarkGray)),
            ]);
            frame.render_widget(Paragraph::new(waiting).block(block), area);
        } else {
            let lines = markdown::render(transcript.content());
            let inner_width = area.width.saturating_sub(2);
            let inner_height = area.height.saturating_sub(2);
            let tail = tail_lines(lines, inner_width, inner_height);
            frame.render_widget(
                Paragraph::new(tail).wrap(Wrap { trim: false }).block(block),
                area,
            );
        }
    })?;
    Ok(())
}

/// Flush the complete panel into scrollback and blank the live region,
/// leaving the final frame as the terminal output.
fn finalize(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    title: &str,
    transcript: &Transcript,
) -> Result<()> {
    let width = terminal.size()?.width.max(3);
    let lines = markdown::render(transcript.content());
    let inner_width = width - 2;
    let content_height: u32 = lines
        .iter()
        .map(|line| u32::from(wrapped_height(line, inner_width)))
        .sum();
    let height = (content_height + 2).min(u32::from(u16::MAX)) as u16;

    terminal.insert_before(height, |buf| {
        let area = buf.area;
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(panel_block(title))
            .render(area, buf);
    })?;
    terminal.draw(|frame| frame.render_widget(Clear, frame.area()))?;
    Ok(())
}

fn panel_block(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(format!(" {title} "))
}

/// Keep the newest lines that fit `height` rows once wrapped to `width`.
fn tail_lines(lines: Vec<Line<'static>>, width: u16, height: u16) -> Vec<Line<'static>> {
    let mut used = 0u16;
    let mut keep = 0usize;
    for (idx, line) in lines.iter().enumerate().rev() {
        let rows = wrapped_height(line, width);
        if used.saturating_add(rows) > height {
            break;
        }
        used += rows;
        keep = lines.len() - idx;
    }
    let skip = lines.len() - keep;
    lines.into_iter().skip(skip).collect()
}

fn wrapped_height(line: &Line<'_>, width: u16) -> u16 {
    let width = width.max(1) as usize;
    let cells = line.width().max(1);
    cells.div_ceil(width).min(usize::from(u16::MAX)) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunks_accumulate_in_order() {
        let mut transcript = Transcript::default();
        let chunks = ["Hel", "lo, ", "world"];
        let mut seen = Vec::new();
        for chunk in chunks {
            transcript.push(chunk);
            seen.push(transcript.content().to_string());
        }
        assert_eq!(transcript.content(), "Hello, world");
        for state in &seen {
            assert!("Hello, world".starts_with(state.as_str()));
        }
        assert!(seen[0].len() < seen[1].len() && seen[1].len() < seen[2].len());
    }

    #[tokio::test]
    async fn plain_run_collects_until_done() {
        let (tx, rx) = mpsc::channel(8);
        for chunk in ["Hel", "lo, ", "world"] {
            tx.send(ChatEvent::Token(chunk.to_string())).await.unwrap();
        }
        tx.send(ChatEvent::Done).await.unwrap();

        let answer = Presenter::new("Test".to_string()).run_plain(rx).await.unwrap();
        assert_eq!(answer, "Hello, world");
    }

    #[tokio::test]
    async fn plain_run_surfaces_stream_errors() {
        let (tx, rx) = mpsc::channel(8);
        tx.send(ChatEvent::Token("partial".to_string())).await.unwrap();
        tx.send(ChatEvent::Error("connection reset".to_string()))
            .await
            .unwrap();

        let result = Presenter::new("Test".to_string()).run_plain(rx).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("connection reset"));
    }

    #[test]
    fn tail_keeps_newest_lines_that_fit() {
        let lines: Vec<Line<'static>> = (0..10)
            .map(|i| Line::from(format!("line {i}")))
            .collect();
        let tail = tail_lines(lines, 80, 3);
        assert_eq!(tail.len(), 3);
        assert_eq!(
            tail.iter()
                .map(|l| l.spans[0].content.to_string())
                .collect::<Vec<_>>(),
            vec!["line 7", "line 8", "line 9"]
        );
    }

    #[test]
    fn wrapped_height_accounts_for_width() {
        let line = Line::from("x".repeat(25));
        assert_eq!(wrapped_height(&line, 10), 3);
        assert_eq!(wrapped_height(&line, 25), 1);
        assert_eq!(wrapped_height(&Line::from(""), 10), 1);
    }
}
