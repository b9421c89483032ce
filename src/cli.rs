use std::fmt::Display;
use std::io::Write;
use std::path::PathBuf;

use clap::builder::styling::{AnsiColor, Color, Style, Styles};
use clap::{Args, ColorChoice, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::aot::{Generator, Shell, generate};
use clap_complete_nushell::Nushell;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use time::UtcOffset;
use tracing::{info, warn};

use crate::config::{PartialSettings, Settings};
use crate::github::GitHubClient;
use crate::surface::RenderedSurface;
use crate::thumbnail::thumbnail_src;
use crate::viewer::HistoryViewer;
use crate::{AppResult, browse, io_utils};

const STYLES: Styles = Styles::styled()
    .header(Style::new().bold())
    .usage(Style::new().bold())
    .error(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))))
    .literal(
        Style::new()
            .bold()
            .fg_color(Some(Color::Ansi(AnsiColor::Green))),
    )
    .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))))
    .valid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))))
    .invalid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightRed))))
    .context(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Magenta))))
    .context_value(
        Style::new()
            .bold()
            .fg_color(Some(Color::Ansi(AnsiColor::Cyan))),
    );

/// Long-form CLI description shown in `--help`.
const LONG_ABOUT: &str = "Post History - Browse past versions of a blog post

Reads the commit history of one file through the GitHub REST API and renders:
- a timeline of every version of the post
- the content of any past version, front matter removed and markdown converted to HTML
- a line-classified diff between two versions

Repository coordinates come from flags or from config.toml in the post-history config directory.";

/// Post History - Browse past versions of a blog post.
#[derive(Parser, Debug, Clone)]
#[command(author, version, propagate_version = true, about, long_about = Some(LONG_ABOUT), styles = STYLES)]
pub struct Cli {
    /// Color choice for the output
    #[arg(long, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Subcommand to run
    #[command(subcommand)]
    pub cmd: Cmd,
}

/// Output format for rendered views.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// HTML fragments, ready to drop into a page
    Html,

    /// The JSON render model
    Json,
}

/// Top-level commands supported by the CLI.
#[derive(Subcommand, Debug, Clone)]
pub enum Cmd {
    /// Show the timeline of past versions
    List {
        #[command(flatten)]
        repo: RepoArgs,
        #[command(flatten)]
        out: OutputArgs,
        #[command(flatten)]
        verbosity: Verbosity<InfoLevel>,
    },

    /// Show the content of one version
    ///
    /// Versions are addressed by their position in the timeline, 0 being the latest.
    Show {
        /// Timeline position of the version
        index: usize,
        #[command(flatten)]
        repo: RepoArgs,
        #[command(flatten)]
        out: OutputArgs,
        #[command(flatten)]
        verbosity: Verbosity<InfoLevel>,
    },

    /// Show the changes between two versions
    Diff {
        /// Timeline position of the older version
        older: usize,
        /// Timeline position of the newer version
        newer: usize,
        #[command(flatten)]
        repo: RepoArgs,
        #[command(flatten)]
        out: OutputArgs,
        #[command(flatten)]
        verbosity: Verbosity<InfoLevel>,
    },

    /// Browse interactively, reading commands from stdin
    ///
    /// Commands: `list`, `view <N>`, `diff <OLDER> <NEWER>`, `close`, `help`, `quit`.
    Browse {
        #[command(flatten)]
        repo: RepoArgs,
        /// Output format of rendered views
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Html)]
        format: OutputFormat,
        #[command(flatten)]
        verbosity: Verbosity<InfoLevel>,
    },

    /// Pick the best available format for post thumbnails
    ///
    /// Tries .webp, .png, .jpg, .jpeg and .svg in that order, one at a time.
    Thumbnail {
        /// Image URLs without extension
        #[arg(required = true)]
        bases: Vec<String>,
        /// Source to keep when no format loads
        #[arg(long, default_value = "")]
        default: String,
        /// Output file to write to
        /// If not provided, prints to stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        verbosity: Verbosity<InfoLevel>,
    },

    /// Generate shell completion for a given shell
    Completion {
        /// Output file to write the completion script to
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// The shell to generate the completion for
        #[arg(value_enum)]
        shell: CompletionShell,

        #[command(flatten)]
        verbosity: Verbosity<InfoLevel>,
    },
}

/// Supported completion targets for shell auto-completion.
#[derive(ValueEnum, Clone, Debug)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
    Nushell,
}

impl Display for CompletionShell {
    /// Render the canonical shell name string.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CompletionShell::Bash => "bash",
            CompletionShell::Zsh => "zsh",
            CompletionShell::Fish => "fish",
            CompletionShell::PowerShell => "powershell",
            CompletionShell::Elvish => "elvish",
            CompletionShell::Nushell => "nushell",
        };
        write!(f, "{}", s)
    }
}

impl Generator for &CompletionShell {
    fn generate(&self, cmd: &clap::builder::Command, buf: &mut dyn Write) {
        match self {
            CompletionShell::Bash => Shell::Bash.generate(cmd, buf),
            CompletionShell::Zsh => Shell::Zsh.generate(cmd, buf),
            CompletionShell::Fish => Shell::Fish.generate(cmd, buf),
            CompletionShell::PowerShell => Shell::PowerShell.generate(cmd, buf),
            CompletionShell::Elvish => Shell::Elvish.generate(cmd, buf),
            CompletionShell::Nushell => Nushell.generate(cmd, buf),
        }
    }

    fn file_name(&self, name: &str) -> String {
        match self {
            CompletionShell::Bash => Shell::Bash.file_name(name),
            CompletionShell::Zsh => Shell::Zsh.file_name(name),
            CompletionShell::Fish => Shell::Fish.file_name(name),
            CompletionShell::PowerShell => Shell::PowerShell.file_name(name),
            CompletionShell::Elvish => Shell::Elvish.file_name(name),
            CompletionShell::Nushell => Nushell.file_name(name),
        }
    }
}

/// Which file of which repository to read. Unset flags fall back to config.toml.
#[derive(Args, Debug, Clone, Default)]
pub struct RepoArgs {
    /// Owner of the repository (user or organization)
    #[arg(long)]
    pub owner: Option<String>,

    /// Name of the repository
    #[arg(long)]
    pub repo: Option<String>,

    /// Path of the post inside the repository
    #[arg(long)]
    pub path: Option<String>,

    /// Base URL of the REST API
    ///
    /// Defaults to https://api.github.com
    #[arg(long)]
    pub api_base: Option<String>,

    /// User-Agent header sent with every request
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Config file to read instead of the default one
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Where and how rendered views are written.
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output format of rendered views
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Html)]
    pub format: OutputFormat,

    /// Output file to write to
    /// If not provided, prints to stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl From<&RepoArgs> for PartialSettings {
    fn from(args: &RepoArgs) -> Self {
        PartialSettings {
            owner: args.owner.clone(),
            repo: args.repo.clone(),
            path: args.path.clone(),
            api_base: args.api_base.clone(),
            token: None,
            user_agent: args.user_agent.clone(),
        }
    }
}

impl RepoArgs {
    /// Merge flags over the config file and build a viewer bound to the resulting post.
    pub async fn viewer(&self, offset: UtcOffset) -> AppResult<HistoryViewer<GitHubClient>> {
        let file = PartialSettings::load(self.config.as_deref()).await?;
        let settings = Settings::try_from(file.merge(self.into()))?;
        let client = GitHubClient::new(
            &settings.api_base,
            &settings.user_agent,
            settings.token.as_deref(),
        )?;
        info!(
            "Reading history of {}/{}:{}",
            settings.coords.owner, settings.coords.repo, settings.coords.path
        );
        Ok(HistoryViewer::new(client, settings.coords, offset))
    }
}

/// Helper trait for accessing verbosity flags on commands.
pub trait GetVerbosity {
    fn get_verbosity(&self) -> &Verbosity<InfoLevel>;
}

impl GetVerbosity for Cmd {
    fn get_verbosity(&self) -> &Verbosity<InfoLevel> {
        match self {
            Cmd::List { verbosity, .. } => verbosity,
            Cmd::Show { verbosity, .. } => verbosity,
            Cmd::Diff { verbosity, .. } => verbosity,
            Cmd::Browse { verbosity, .. } => verbosity,
            Cmd::Thumbnail { verbosity, .. } => verbosity,
            Cmd::Completion { verbosity, .. } => verbosity,
        }
    }
}

impl Cmd {
    /// Execute the chosen top-level command.
    #[tracing::instrument(name = "Running command", level = "info", skip(self))]
    pub async fn run(&self, offset: UtcOffset) -> AppResult<()> {
        match self {
            Cmd::List { repo, out, .. } => {
                let mut viewer = repo.viewer(offset).await?;
                let mut surface = RenderedSurface::new(out.format);
                viewer.load_revisions(&mut surface).await;
                io_utils::write_output(out.output.as_deref(), &surface.take_frames()).await
            }
            Cmd::Show {
                index, repo, out, ..
            } => {
                let mut viewer = repo.viewer(offset).await?;
                let mut surface = RenderedSurface::new(out.format);
                viewer.load_revisions(&mut surface).await;
                // Only the version itself is wanted, not the timeline.
                surface.take_frames();
                if !viewer.view_revision(*index, &mut surface).await {
                    warn!(
                        "There is no version {} (history has {} versions)",
                        index,
                        viewer.revisions().len()
                    );
                }
                io_utils::write_output(out.output.as_deref(), &surface.take_frames()).await
            }
            Cmd::Diff {
                older,
                newer,
                repo,
                out,
                ..
            } => {
                let mut viewer = repo.viewer(offset).await?;
                let mut surface = RenderedSurface::new(out.format);
                viewer.load_revisions(&mut surface).await;
                surface.take_frames();
                if !viewer.view_diff(*older, *newer, &mut surface).await {
                    warn!(
                        "Versions {} and {} are not both in the history ({} versions)",
                        older,
                        newer,
                        viewer.revisions().len()
                    );
                }
                io_utils::write_output(out.output.as_deref(), &surface.take_frames()).await
            }
            Cmd::Browse { repo, format, .. } => {
                let viewer = repo.viewer(offset).await?;
                browse::run(viewer, *format).await
            }
            Cmd::Thumbnail {
                bases,
                default,
                output,
                ..
            } => {
                let client = reqwest::Client::builder()
                    .user_agent(crate::github::client::DEFAULT_USER_AGENT)
                    .build()?;
                let mut lines = Vec::with_capacity(bases.len());
                for base in bases {
                    let src = thumbnail_src(&client, base, default).await;
                    lines.push(format!("{base} -> {src}"));
                }
                io_utils::write_output(output.as_deref(), &lines).await
            }
            Cmd::Completion { shell, output, .. } => {
                let mut cmd = Cli::command();
                if let Some(output_path) = output {
                    let mut file = std::fs::OpenOptions::new()
                        .write(true)
                        .truncate(true)
                        .create(true)
                        .open(output_path)?;
                    // Write completion script to the requested file.
                    generate(shell, &mut cmd, "post-history", &mut file);
                    info!(
                        "Generated completion script for {} at {}",
                        shell,
                        output_path.display()
                    );
                } else {
                    generate(shell, &mut cmd, "post-history", &mut std::io::stdout());
                }
                Ok(())
            }
        }
    }
}
