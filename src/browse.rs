use std::str::FromStr;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, BufReader};
use tracing::{info, warn};

use crate::AppResult;
use crate::cli::OutputFormat;
use crate::github::RevisionSource;
use crate::io_utils::write_frames;
use crate::surface::RenderedSurface;
use crate::viewer::HistoryViewer;

const HELP: &str = "commands: list | view <N> | diff <OLDER> <NEWER> | close | help | quit";

/// One line typed by the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseCommand {
    List,
    View(usize),
    Diff { older: usize, newer: usize },
    Close,
    Help,
    Quit,
}

impl FromStr for BrowseCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let cmd = words.next().ok_or_else(|| "empty command".to_string())?;
        let mut index = |what: &str| -> Result<usize, String> {
            let raw = words
                .next()
                .ok_or_else(|| format!("`{cmd}` needs {what}"))?;
            raw.parse()
                .map_err(|e| format!("'{raw}' is not a version index: {e}"))
        };
        let parsed = match cmd.to_ascii_lowercase().as_str() {
            "list" | "ls" | "reload" => BrowseCommand::List,
            "view" | "show" => BrowseCommand::View(index("an index")?),
            "diff" | "compare" => BrowseCommand::Diff {
                older: index("an older index")?,
                newer: index("a newer index")?,
            },
            "close" => BrowseCommand::Close,
            "help" | "?" => BrowseCommand::Help,
            "quit" | "exit" | "q" => BrowseCommand::Quit,
            other => return Err(format!("unknown command `{other}`")),
        };
        match words.next() {
            Some(extra) => Err(format!("unexpected argument '{extra}'")),
            None => Ok(parsed),
        }
    }
}

/// Drive the viewer from stdin until `quit` or end of input.
pub async fn run<S: RevisionSource>(viewer: HistoryViewer<S>, format: OutputFormat) -> AppResult<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    session(viewer, format, stdin, &mut stdout).await
}

#[tracing::instrument(name = "Browsing history", level = "info", skip_all)]
async fn session<S, R, W>(
    mut viewer: HistoryViewer<S>,
    format: OutputFormat,
    input: R,
    out: &mut W,
) -> AppResult<()>
where
    S: RevisionSource,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut surface = RenderedSurface::new(format);
    let mut lines = input.lines();
    info!("{}", HELP);
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<BrowseCommand>() {
            Ok(command) => command,
            Err(e) => {
                warn!("{}", e);
                continue;
            }
        };
        match command {
            BrowseCommand::List => {
                viewer.load_revisions(&mut surface).await;
            }
            BrowseCommand::View(index) => {
                viewer.view_revision(index, &mut surface).await;
            }
            BrowseCommand::Diff { older, newer } => {
                viewer.view_diff(older, newer, &mut surface).await;
            }
            BrowseCommand::Close => viewer.close(&mut surface),
            BrowseCommand::Help => info!("{}", HELP),
            BrowseCommand::Quit => break,
        }
        write_frames(out, &surface.take_frames()).await?;
    }
    Ok(())
}
