//! Terminal chooser.
//!
//! Renders the prompt to a writer (stderr by default, keeping stdout free
//! for machine-readable output) and reads answers line by line from an
//! async reader (stdin by default).
//!
//! ```text
//!   Apply profile "Work"
//!   Choose a profile state:
//!     1) on
//!   * 2) off
//!   [Enter = off, q = cancel] >
//! ```

use super::parser::{ChoiceInput, ChoiceParser};
use super::{ChooserGateway, ChooserOutcome, ChooserPrompt};
use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tracing::{info, warn};

struct ConsoleIo<R, W> {
    reader: R,
    writer: W,
}

/// [`ChooserGateway`] that talks to a human on a terminal.
///
/// End of input counts as dismissal, as does any I/O error.
pub struct ConsoleChooser<R, W> {
    io: Mutex<ConsoleIo<R, W>>,
}

impl ConsoleChooser<BufReader<tokio::io::Stdin>, tokio::io::Stderr> {
    /// Creates a chooser on the process's stdin/stderr.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stderr())
    }
}

impl<R, W> ConsoleChooser<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    /// Creates a chooser over arbitrary streams.
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            io: Mutex::new(ConsoleIo { reader, writer }),
        }
    }

    /// Consumes the chooser, returning the streams.
    pub fn into_inner(self) -> (R, W) {
        let io = self.io.into_inner();
        (io.reader, io.writer)
    }

    async fn ask(io: &mut ConsoleIo<R, W>, prompt: &ChooserPrompt) -> std::io::Result<ChooserOutcome> {
        io.writer.write_all(render(prompt).as_bytes()).await?;

        loop {
            io.writer.write_all(hint(prompt).as_bytes()).await?;
            io.writer.flush().await?;

            let mut line = String::new();
            if io.reader.read_line(&mut line).await? == 0 {
                return Ok(ChooserOutcome::Dismissed);
            }

            match ChoiceParser::parse(&line) {
                ChoiceInput::Select(state) => return Ok(ChooserOutcome::Selected(state)),
                ChoiceInput::Dismiss => return Ok(ChooserOutcome::Dismissed),
                ChoiceInput::AcceptPreselected => match prompt.preselected {
                    Some(state) => return Ok(ChooserOutcome::Selected(state)),
                    None => io.writer.write_all(b"  Please choose a state.\n").await?,
                },
                ChoiceInput::Unknown(input) => {
                    let msg = format!("  Unrecognized choice '{input}'.\n");
                    io.writer.write_all(msg.as_bytes()).await?;
                }
            }
        }
    }
}

#[async_trait]
impl<R, W> ChooserGateway for ConsoleChooser<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn present(&self, prompt: ChooserPrompt) -> ChooserOutcome {
        info!(
            request = %prompt.request_id,
            profile = %prompt.profile_id,
            preselected = ?prompt.preselected,
            "Awaiting state choice"
        );

        let mut io = self.io.lock().await;
        match Self::ask(&mut io, &prompt).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(request = %prompt.request_id, error = %e, "Chooser I/O failed, dismissing");
                ChooserOutcome::Dismissed
            }
        }
    }
}

fn render(prompt: &ChooserPrompt) -> String {
    let mut out = format!(
        "\n  Apply profile \"{}\"\n  Choose a profile state:\n",
        prompt.profile_name
    );
    for (i, option) in prompt.options.iter().enumerate() {
        let marker = if prompt.preselected == Some(*option) {
            '*'
        } else {
            ' '
        };
        out.push_str(&format!("  {marker} {}) {option}\n", i + 1));
    }
    out
}

fn hint(prompt: &ChooserPrompt) -> String {
    match prompt.preselected {
        Some(state) => format!("  [Enter = {state}, q = cancel] > "),
        None => "  [q = cancel] > ".to_string(),
    }
}
