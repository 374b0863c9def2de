use std::{
    collections::{BTreeMap, BTreeSet},
    path::PathBuf,
    sync::Arc,
    time::Instant,
};

use anyhow::{Context, Result};
use captionist_core::{
    CaptionError, Delivery, DocumentOutput, FileJobStore, Format, HighlightMode, JobRequest,
    JobState, JobStore, Pipeline, RecognitionResult, Settings, deliver,
    engine::transcript_file::{load_transcript, save_transcript},
    format_timestamp, paths::get_jobs_dir, paths::get_root_cache_dir,
    synthesize,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use console::style;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::{
    engine::{CliEngine, build_engine},
    progress::{SpinnerJobStore, create_spinner, done_line, format_duration},
};

mod engine;
mod progress;

/// CLI wrapper for Format (needed for clap ValueEnum)
#[derive(Clone, Copy, ValueEnum)]
enum CliFormat {
    #[value(alias = "txt")]
    Plain,
    Srt,
    Vtt,
    Ass,
}

impl From<CliFormat> for Format {
    fn from(cli: CliFormat) -> Self {
        match cli {
            CliFormat::Plain => Format::Plain,
            CliFormat::Srt => Format::Srt,
            CliFormat::Vtt => Format::Vtt,
            CliFormat::Ass => Format::Ass,
        }
    }
}

/// CLI wrapper for HighlightMode (needed for clap ValueEnum)
#[derive(Clone, Copy, ValueEnum)]
enum CliMode {
    Classic,
    Karaoke,
    #[value(name = "word_by_word", alias = "word-by-word")]
    WordByWord,
}

impl From<CliMode> for HighlightMode {
    fn from(cli: CliMode) -> Self {
        match cli {
            CliMode::Classic => HighlightMode::Classic,
            CliMode::Karaoke => HighlightMode::Karaoke,
            CliMode::WordByWord => HighlightMode::WordByWord,
        }
    }
}

#[derive(Parser)]
#[command(name = "captionist")]
#[command(about = "Transcribe media with Whisper and render plain text, SRT, WebVTT and ASS subtitles")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file (defaults to <config_dir>/captionist/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Transcribe a media file and render subtitles
    Transcribe(TranscribeArgs),
    /// Render subtitles from a saved transcript JSON without running an engine
    Render {
        transcript: PathBuf,

        #[command(flatten)]
        render: RenderArgs,
    },
    /// Show the recorded state of a job
    Status { job_id: Uuid },
}

#[derive(Args)]
struct TranscribeArgs {
    /// Local media path or file:// URL
    media: String,

    #[command(flatten)]
    render: RenderArgs,

    /// Language hint passed to the engine (e.g., "en", "de")
    #[arg(short, long)]
    language: Option<String>,

    /// Recognition engine
    #[arg(short, long)]
    engine: Option<CliEngine>,

    /// Whisper model name, or ggml model path for whisper-rs
    #[arg(long)]
    model: Option<String>,

    /// Saved transcript JSON for the transcript engine
    #[arg(long)]
    transcript: Option<PathBuf>,

    /// Also save the recognized transcript as JSON (reusable with `render`)
    #[arg(long)]
    save_transcript: Option<PathBuf>,
}

#[derive(Args)]
struct RenderArgs {
    /// Output formats (repeat or comma-separate); defaults to the config
    #[arg(short, long = "format", value_delimiter = ',')]
    formats: Vec<CliFormat>,

    /// Maximum characters per displayed line
    #[arg(long)]
    max_chars: Option<usize>,

    /// ASS highlight mode
    #[arg(short, long)]
    mode: Option<CliMode>,

    /// Directory for written subtitle files
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Print documents to stdout instead of writing files
    #[arg(long)]
    stdout: bool,
}

impl RenderArgs {
    fn apply(&self, settings: &mut Settings) {
        if !self.formats.is_empty() {
            settings.subtitles.formats = self.formats.iter().map(|f| (*f).into()).collect();
        }
        if let Some(max_chars) = self.max_chars {
            settings.subtitles.max_chars = max_chars;
        }
        if let Some(mode) = self.mode {
            settings.style.mode = mode.into();
        }
        if let Some(out) = &self.out {
            settings.paths.output_dir = Some(out.clone());
        }
    }

    fn delivery(&self, settings: &Settings) -> Delivery {
        if self.stdout {
            Delivery::InMemory
        } else {
            Delivery::Files {
                dir: settings.output_dir(),
            }
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn header() {
    eprintln!(
        "\n{}  {}\n",
        style("captionist").cyan().bold(),
        style("Subtitle Synthesizer").dim()
    );
}

fn print_transcript_summary(transcript: &RecognitionResult) {
    eprintln!(
        "{} Transcript: {}, {} segments, {}",
        style("✓").green().bold(),
        format_timestamp(transcript.duration()),
        transcript.segments.len(),
        style(transcript.language.as_deref().unwrap_or("unknown")).yellow()
    );
}

/// Print outputs and per-format failures. Returns false when nothing rendered.
fn print_outputs(
    outputs: &BTreeMap<Format, DocumentOutput>,
    failures: &BTreeMap<Format, CaptionError>,
) -> bool {
    eprintln!("{}", style("─".repeat(60)).dim());
    for (format, output) in outputs {
        match output {
            DocumentOutput::File(path) => eprintln!(
                "{} {:<5} {}",
                style("✓").green().bold(),
                format,
                style(path.display()).cyan()
            ),
            DocumentOutput::InMemory(body) => {
                eprintln!("{} {}", style("✓").green().bold(), format);
                println!("{body}");
            }
        }
    }
    for (format, error) in failures {
        eprintln!(
            "{} {:<5} {}",
            style("✗").red().bold(),
            format,
            style(error).red()
        );
    }

    !(outputs.is_empty() && !failures.is_empty())
}

async fn transcribe(mut settings: Settings, args: TranscribeArgs) -> Result<bool> {
    args.render.apply(&mut settings);
    if let Some(engine) = args.engine {
        settings.engine.kind = engine.into();
    }
    if let Some(model) = args.model {
        settings.engine.model = model;
    }
    if args.language.is_some() {
        settings.engine.language = args.language;
    }
    settings.validate()?;

    let engine = build_engine(&settings, args.transcript)?;
    let jobs = SpinnerJobStore::new(FileJobStore::new(get_jobs_dir(&get_root_cache_dir())));
    let pipeline = Pipeline::new(engine, Arc::new(jobs), settings.work_dir());

    let mut request = JobRequest::new(args.media, settings.subtitles.formats.clone());
    request.options = settings.render_options();
    request.language = settings.engine.language.clone();
    request.delivery = args.render.delivery(&settings);

    header();
    eprintln!(
        "{} Job {}",
        style("•").dim(),
        style(request.job_id).dim()
    );

    let total_start = Instant::now();
    let report = pipeline.run(&request).await?;

    print_transcript_summary(&report.transcript);
    if let Some(path) = args.save_transcript {
        save_transcript(&report.transcript, &path).await?;
        eprintln!(
            "{} {}",
            style("Saved transcript:").dim(),
            style(path.display()).cyan()
        );
    }
    eprintln!(
        "\n{} {}\n",
        style("Total time:").dim(),
        style(format_duration(total_start.elapsed())).cyan().bold()
    );

    Ok(print_outputs(&report.outputs, &report.failures))
}

async fn render_transcript(
    mut settings: Settings,
    transcript_path: PathBuf,
    render: RenderArgs,
) -> Result<bool> {
    render.apply(&mut settings);
    settings.validate()?;

    header();
    let started = Instant::now();
    let spinner = create_spinner("Loading transcript...");
    let transcript = load_transcript(&transcript_path)
        .await
        .with_context(|| format!("failed to load {}", transcript_path.display()))?;
    spinner.finish_with_message(done_line("Transcript loaded", started));
    print_transcript_summary(&transcript);

    let started = Instant::now();
    let spinner = create_spinner("Rendering subtitles...");
    let formats: BTreeSet<Format> = settings.subtitles.formats.clone();
    let synthesis = synthesize(&transcript, &formats, &settings.render_options())?;
    let outputs = deliver(&synthesis, &render.delivery(&settings), Uuid::new_v4()).await?;
    spinner.finish_with_message(done_line("Subtitles rendered", started));

    Ok(print_outputs(&outputs, &synthesis.failures))
}

async fn status(job_id: Uuid) -> Result<bool> {
    let jobs = FileJobStore::new(get_jobs_dir(&get_root_cache_dir()));
    let state = jobs
        .get(job_id)
        .await?
        .ok_or(CaptionError::JobNotFound { job_id })?;

    match &state {
        JobState::Queued => println!("{}", style("queued").dim()),
        JobState::Processing { stage } => {
            println!("{} {}", style("processing").yellow(), stage)
        }
        JobState::Completed { outputs, failures } => {
            println!("{}", style("completed").green().bold());
            for (format, output) in outputs {
                println!("  {:<5} {}", format, output);
            }
            for (format, error) in failures {
                println!("  {:<5} {}", format, style(error).red());
            }
        }
        JobState::Failed { error } => {
            println!("{} {}", style("failed").red().bold(), error)
        }
    }

    Ok(!matches!(state, JobState::Failed { .. }))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = Settings::load(cli.config.as_deref())?;
    debug!(?settings, "settings loaded");

    let succeeded = match cli.command {
        Command::Transcribe(args) => transcribe(settings, args).await,
        Command::Render { transcript, render } => {
            render_transcript(settings, transcript, render).await
        }
        Command::Status { job_id } => status(job_id).await,
    };

    match succeeded {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{} {:#}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    }
}
