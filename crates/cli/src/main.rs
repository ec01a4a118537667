// letsgo-snippet - interactive Go course snippets in the terminal

mod exit_codes;
mod host;
mod logger;
mod render;

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use clap::{Args, Parser, Subcommand, ValueEnum};

use letsgo_config::manifest::{ContentSpec, SnippetManifest};
use letsgo_config::settings::Settings;
use letsgo_config::snippet::SnippetOptions;
use letsgo_config::theme::{HighlightTheme, ThemeSource};
use letsgo_config::ConfigError;
use letsgo_exec_client::ExecClient;
use letsgo_snippet::{
    Capabilities, ClipboardWriter, Control, FailureKind, FileSaver, GoHighlighter, RunRejected,
    RunState, SnippetError, SnippetWidget, StaticDir,
};

use exit_codes::{run_exit_code, EXIT_COMMUNICATION, EXIT_IO, EXIT_SUCCESS, EXIT_USAGE};
use host::{DirectorySaver, NoClipboard, SystemClipboard, TerminalSurface};
use render::Renderer;

#[derive(Parser)]
#[command(name = "letsgo-snippet")]
#[command(about = "Interactive Go course snippets: show, run, copy and download")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Execution endpoint (overrides settings)
    #[arg(long, global = true, env = "LETSGO_EXEC_ENDPOINT")]
    endpoint: Option<String>,

    /// Settings file (default: the user config directory)
    #[arg(long, global = true, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the rendered snippet
    #[command(after_help = "\
Examples:
  letsgo-snippet show --src basics/hello.go
  letsgo-snippet show --code 'package main' --no-execute --plain")]
    Show {
        #[command(flatten)]
        snippet: SnippetArgs,

        /// Highlight theme (overrides settings)
        #[arg(long, value_enum)]
        theme: Option<ThemeArg>,

        /// Disable colors
        #[arg(long)]
        plain: bool,
    },

    /// Send the snippet to the execution endpoint and print the result
    #[command(after_help = "\
Exit codes:
  0  program ran successfully
  1  program reported an error
  4  endpoint unreachable, non-success status, or unreadable reply")]
    Run {
        #[command(flatten)]
        snippet: SnippetArgs,

        /// Edit the snippet first: replace the buffer with this file
        #[arg(long, value_name = "FILE")]
        edit: Option<PathBuf>,

        /// Print the whole rendered widget instead of only the result
        #[arg(long)]
        show: bool,
    },

    /// Copy the snippet to the system clipboard
    Copy {
        #[command(flatten)]
        snippet: SnippetArgs,

        /// Do not wait for the confirmation label to revert
        #[arg(long)]
        no_wait: bool,
    },

    /// Save the snippet under its file name
    Download {
        #[command(flatten)]
        snippet: SnippetArgs,

        /// Target directory
        #[arg(long, value_name = "DIR", default_value = ".")]
        out_dir: PathBuf,
    },
}

/// Where the snippet comes from and what it allows. With no content flag,
/// the code is read from stdin.
#[derive(Args, Debug, Clone)]
struct SnippetArgs {
    /// Inline Go source
    #[arg(long, conflicts_with_all = ["src", "manifest"])]
    code: Option<String>,

    /// Static file reference, relative to the static directory
    #[arg(long, conflicts_with = "manifest")]
    src: Option<String>,

    /// TOML snippet manifest
    #[arg(long, value_name = "PATH")]
    manifest: Option<PathBuf>,

    /// Static content directory (overrides settings)
    #[arg(long, value_name = "DIR")]
    static_dir: Option<PathBuf>,

    /// Download file name
    #[arg(long)]
    file_name: Option<String>,

    /// Hide the Run control
    #[arg(long)]
    no_execute: bool,

    /// Hide the Edit control
    #[arg(long)]
    no_edit: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ThemeArg {
    Dark,
    Light,
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nbuild:   debug",
            "\ntarget:  ", env!("TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nbuild:   release",
            "\ntarget:  ", env!("TARGET"),
        )
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    let result = load_settings(cli.settings.as_deref()).and_then(|settings| {
        let endpoint = cli.endpoint.clone().unwrap_or_else(|| settings.endpoint.clone());
        let ctx = Context { settings, endpoint };
        match cli.command {
            Commands::Show { snippet, theme, plain } => cmd_show(&ctx, snippet, theme, plain),
            Commands::Run { snippet, edit, show } => cmd_run(&ctx, snippet, edit, show),
            Commands::Copy { snippet, no_wait } => cmd_copy(&ctx, snippet, no_wait),
            Commands::Download { snippet, out_dir } => cmd_download(&ctx, snippet, out_dir),
        }
    });

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn communication(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_COMMUNICATION,
            message: msg.into(),
            hint: Some("check --endpoint or LETSGO_EXEC_ENDPOINT".to_string()),
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    fn config(err: ConfigError) -> Self {
        match err {
            ConfigError::Io { .. } => Self::io(err.to_string()),
            other => Self::args(other.to_string()),
        }
    }
}

impl From<SnippetError> for CliError {
    fn from(err: SnippetError) -> Self {
        match err {
            SnippetError::EditNotPermitted => {
                CliError::args(err.to_string()).with_hint("drop --no-edit to allow editing")
            }
            SnippetError::Run(RunRejected::NotPermitted) => {
                CliError::args(err.to_string()).with_hint("drop --no-execute to allow running")
            }
            SnippetError::Save(e) => CliError::io(e.to_string()),
            other => CliError::args(other.to_string()),
        }
    }
}

struct Context {
    settings: Settings,
    endpoint: String,
}

fn load_settings(path: Option<&Path>) -> Result<Settings, CliError> {
    match path {
        Some(path) => Settings::load_from(path).map_err(CliError::config),
        None => Ok(Settings::load()),
    }
}

/// Resolve content and options from the flags. Flags win over the manifest.
fn snippet_source(args: &SnippetArgs) -> Result<(ContentSpec, SnippetOptions), CliError> {
    let (content, mut options) = if let Some(path) = &args.manifest {
        let manifest = SnippetManifest::load(path).map_err(CliError::config)?;
        (manifest.content(), manifest.options)
    } else if let Some(src) = &args.src {
        (ContentSpec::File(src.clone()), SnippetOptions::default())
    } else if let Some(code) = &args.code {
        (ContentSpec::Inline(code.clone()), SnippetOptions::default())
    } else {
        let mut code = String::new();
        io::stdin()
            .read_to_string(&mut code)
            .map_err(|e| CliError::io(format!("failed to read stdin: {}", e)))?;
        (ContentSpec::Inline(code), SnippetOptions::default())
    };

    if let Some(name) = &args.file_name {
        options = options.with_file_name(name.clone());
    }
    if args.no_execute {
        options = options.with_execute(false);
    }
    if args.no_edit {
        options = options.with_edit(false);
    }
    Ok((content, options))
}

fn build_widget(
    ctx: &Context,
    args: &SnippetArgs,
    clipboard: Arc<dyn ClipboardWriter>,
    saver: Box<dyn FileSaver>,
) -> Result<SnippetWidget, CliError> {
    let (content, options) = snippet_source(args)?;
    let runner = ExecClient::new(ctx.endpoint.clone())
        .map_err(|e| CliError::communication(e.to_string()))?;
    let static_dir = args
        .static_dir
        .clone()
        .unwrap_or_else(|| ctx.settings.static_dir.clone());

    let caps = Capabilities {
        runner: Arc::new(runner),
        clipboard,
        saver,
        highlighter: Box::new(GoHighlighter),
    };
    let mut widget =
        SnippetWidget::from_content(options, &content, &StaticDir::new(static_dir), caps)
            .with_copy_feedback(ctx.settings.copy_feedback());
    widget.mount(Box::new(TerminalSurface::new()));
    widget.on_frame();
    Ok(widget)
}

/// Saver for commands that never download.
fn scratch_saver() -> Box<dyn FileSaver> {
    Box::new(DirectorySaver::new(std::env::temp_dir()))
}

fn copy_label(widget: &SnippetWidget) -> &'static str {
    widget
        .render()
        .editor()
        .and_then(|editor| editor.control(|c| matches!(c, Control::Copy { .. })).copied())
        .map(|control| control.label())
        .unwrap_or(letsgo_snippet::view::COPY_LABEL)
}

// ============================================================================
// Commands
// ============================================================================

fn cmd_show(
    ctx: &Context,
    args: SnippetArgs,
    theme: Option<ThemeArg>,
    plain: bool,
) -> Result<(), CliError> {
    let widget = build_widget(ctx, &args, Arc::new(NoClipboard), scratch_saver())?;

    let source = match theme {
        Some(ThemeArg::Dark) => ThemeSource::Dark,
        Some(ThemeArg::Light) => ThemeSource::Light,
        None => ctx.settings.theme_source.clone(),
    };
    let (theme, theme_name) = HighlightTheme::load(&source);
    log::debug!("theme: {}", theme_name);

    let color = !plain && atty::is(atty::Stream::Stdout);
    let renderer = Renderer::new(&theme, color);
    print!("{}", renderer.view(&widget.render(), &widget.options().file_name));
    Ok(())
}

fn cmd_run(
    ctx: &Context,
    args: SnippetArgs,
    edit: Option<PathBuf>,
    show: bool,
) -> Result<(), CliError> {
    let mut widget = build_widget(ctx, &args, Arc::new(NoClipboard), scratch_saver())?;

    if let Some(path) = edit {
        let text = std::fs::read_to_string(&path)
            .map_err(|e| CliError::io(format!("{}: {}", path.display(), e)))?;
        widget.toggle_edit()?;
        widget.set_code(text)?;
        widget.on_frame();
    }

    let state = smol::block_on(widget.execute())
        .map_err(SnippetError::from)?
        .clone();

    if show {
        let (theme, _) = HighlightTheme::load(&ctx.settings.theme_source);
        let renderer = Renderer::new(&theme, atty::is(atty::Stream::Stdout));
        print!("{}", renderer.view(&widget.render(), &widget.options().file_name));
    }

    match state {
        RunState::Succeeded(output) => {
            if !show {
                print!("{}", output);
            }
            Ok(())
        }
        RunState::Failed(failure) => {
            let err = CliError {
                code: run_exit_code(failure.kind),
                message: failure.message,
                hint: None,
            };
            Err(match failure.kind {
                FailureKind::Communication => {
                    err.with_hint("check --endpoint or LETSGO_EXEC_ENDPOINT")
                }
                FailureKind::Api | FailureKind::Program => err,
            })
        }
        // execute always settles the run it started
        RunState::Idle | RunState::Running => {
            Err(CliError::communication("run did not complete"))
        }
    }
}

fn cmd_copy(ctx: &Context, args: SnippetArgs, no_wait: bool) -> Result<(), CliError> {
    let clipboard = SystemClipboard::detect().ok_or_else(|| {
        CliError::io("no clipboard tool found")
            .with_hint("install one of wl-copy, xclip, xsel (or use pbcopy/clip)")
    })?;
    let mut widget = build_widget(ctx, &args, Arc::new(clipboard), scratch_saver())?;

    // A failed write is logged by the widget; the label stays unchanged
    let _ = smol::block_on(widget.copy());
    println!("{}", copy_label(&widget));

    if !no_wait {
        if let Some(deadline) = widget.next_deadline() {
            smol::block_on(smol::Timer::at(deadline));
            widget.tick(Instant::now());
            println!("{}", copy_label(&widget));
        }
    }
    widget.unmount();
    Ok(())
}

fn cmd_download(ctx: &Context, args: SnippetArgs, out_dir: PathBuf) -> Result<(), CliError> {
    if !out_dir.is_dir() {
        return Err(CliError::io(format!("{}: not a directory", out_dir.display())));
    }
    let saver = DirectorySaver::new(&out_dir);
    let widget = build_widget(ctx, &args, Arc::new(NoClipboard), Box::new(saver))?;

    widget.download().map_err(SnippetError::from)?;
    println!("{}", out_dir.join(&widget.options().file_name).display());
    Ok(())
}
