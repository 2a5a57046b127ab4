use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use meetlens::{
    annotate_roles, describe_context, format_transcript, generate_questions, read_audio_file,
    read_transcript_file, summarize_meeting, tag_speaker_roles, transcribe, transcribe_url,
    write_json, write_text, AnthropicClient, AppConfig, DagloProvider, FfmpegTranscoder, MeetingQuestion,
    SttChain, SttResult, TranscriptSegment,
};

#[derive(Parser)]
#[command(name = "meetlens")]
#[command(author, version, about = "Meeting transcription and question assistant", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transcribe an audio file (or a hosted recording) and tag speaker roles
    Transcribe {
        /// Audio file to upload
        #[arg(short, long, required_unless_present = "url", conflicts_with = "url")]
        input: Option<PathBuf>,

        /// Publicly reachable audio URL, transcribed as an async job with speaker separation
        #[arg(long)]
        url: Option<String>,

        /// Write the full result as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the formatted transcript as plain text
        #[arg(long)]
        text: Option<PathBuf>,

        /// Print an empty result instead of failing when no provider succeeds
        #[arg(long)]
        allow_empty: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show what the conversation has covered so far
    Analyze {
        /// Transcript file (JSON segments, JSON strings, or one utterance per line)
        #[arg(short, long)]
        input: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Suggest follow-up questions that have not been covered yet
    Questions {
        /// Transcript file
        #[arg(short, long)]
        input: PathBuf,

        /// Write the question set as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Summarize a finished meeting
    Summarize {
        /// Transcript file
        #[arg(short, long)]
        input: PathBuf,

        /// JSON array of {"text", "isUsed"} questions shown during the meeting
        #[arg(short, long)]
        questions: Option<PathBuf>,

        /// Write the summary as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Transcribe {
            input,
            url,
            output,
            text,
            allow_empty,
            verbose,
        } => {
            setup_logging(verbose);
            run_transcribe(input, url, output, text, allow_empty).await
        }
        Commands::Analyze { input, verbose } => {
            setup_logging(verbose);
            run_analyze(&input)
        }
        Commands::Questions {
            input,
            output,
            verbose,
        } => {
            setup_logging(verbose);
            run_questions(&input, output.as_deref()).await
        }
        Commands::Summarize {
            input,
            questions,
            output,
            verbose,
        } => {
            setup_logging(verbose);
            run_summarize(&input, questions.as_deref(), output.as_deref()).await
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

async fn run_transcribe(
    input: Option<PathBuf>,
    url: Option<String>,
    output: Option<PathBuf>,
    text: Option<PathBuf>,
    allow_empty: bool,
) -> Result<()> {
    let config = AppConfig::from_env()?;
    let transcoder = Arc::new(FfmpegTranscoder::new(config.transcoder.clone()));

    let outcome = match (input, url) {
        (Some(path), _) => {
            info!("Loading audio from {:?}", path);
            let audio = read_audio_file(&path)?;
            let chain = SttChain::standard(config.daglo.clone(), config.whisper.clone(), transcoder);
            transcribe(&chain, &audio).await
        }
        (None, Some(url)) => {
            let provider = DagloProvider::new(config.daglo.clone(), transcoder);
            transcribe_url(&provider, &url).await
        }
        (None, None) => anyhow::bail!("either --input or --url is required"),
    };

    let mut result = match outcome {
        Ok(result) => result,
        Err(e) if allow_empty && e.is_transcription_unavailable() => {
            warn!("{}; returning an empty result", e);
            SttResult::unavailable()
        }
        Err(e) => return Err(anyhow::Error::new(e).context("Transcription failed")),
    };

    annotate_roles(&mut result, &config.heuristics);

    println!("{}", result.formatted_text);

    if let Some(path) = output {
        write_json(&result, &path)?;
        info!("Result written to {:?}", path);
    }

    if let Some(path) = text {
        write_text(&result.formatted_text, &path)?;
        info!("Transcript written to {:?}", path);
    }

    Ok(())
}

/// Split a transcript into its newest utterance and everything before it
fn latest_and_previous(segments: &[TranscriptSegment]) -> (String, Vec<String>) {
    match segments.split_last() {
        Some((last, earlier)) => (
            last.text.clone(),
            earlier.iter().map(|s| s.text.clone()).collect(),
        ),
        None => (String::new(), Vec::new()),
    }
}

fn run_analyze(input: &Path) -> Result<()> {
    let config = AppConfig::from_env()?;

    info!("Analyzing transcript from {:?}", input);
    let segments = read_transcript_file(input).context("Failed to read transcript")?;
    let (latest, previous) = latest_and_previous(&segments);
    let analysis = describe_context(&latest, &previous, &config.heuristics);

    println!("Conversation Analysis");
    println!("=====================");
    println!("Utterances: {}", segments.len());
    println!("Stage: {}", analysis.context.stage.as_str());
    println!();
    println!("{}", analysis.context_block);

    if !analysis.answered_facts.is_empty() {
        println!();
        println!("Answered Facts");
        println!("--------------");
        for fact in &analysis.answered_facts {
            println!("- {}", fact);
        }
    }

    let tagged = tag_speaker_roles(segments, &config.heuristics);
    let mut speakers: Vec<(&str, &str)> = tagged
        .iter()
        .map(|s| (s.speaker.as_str(), s.role_or_unknown().as_str()))
        .collect();
    speakers.sort();
    speakers.dedup();

    println!();
    println!("Speaker Roles");
    println!("-------------");
    for (speaker, role) in speakers {
        println!("{}: {}", speaker, role);
    }

    println!();
    println!("{}", format_transcript(&tagged));

    Ok(())
}

fn anthropic_client(config: &AppConfig) -> Result<AnthropicClient> {
    let anthropic = config
        .anthropic
        .clone()
        .context("ANTHROPIC_API_KEY environment variable not set")?;
    Ok(AnthropicClient::new(anthropic))
}

async fn run_questions(input: &Path, output: Option<&Path>) -> Result<()> {
    let config = AppConfig::from_env()?;
    let client = anthropic_client(&config)?;

    let segments = read_transcript_file(input).context("Failed to read transcript")?;
    let (latest, previous) = latest_and_previous(&segments);

    let set = generate_questions(&client, &latest, &previous, &config.heuristics).await;

    println!("{}", serde_json::to_string_pretty(&set)?);
    if let Some(path) = output {
        write_json(&set, path)?;
        info!("Questions written to {:?}", path);
    }

    Ok(())
}

async fn run_summarize(input: &Path, questions: Option<&Path>, output: Option<&Path>) -> Result<()> {
    let config = AppConfig::from_env()?;
    let client = anthropic_client(&config)?;

    let segments = read_transcript_file(input).context("Failed to read transcript")?;
    let questions: Vec<MeetingQuestion> = match questions {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read file: {:?}", path))?;
            serde_json::from_str(&content).context("Failed to parse questions JSON")?
        }
        None => Vec::new(),
    };

    let summary = summarize_meeting(&client, &segments, &questions).await;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    if let Some(path) = output {
        write_json(&summary, path)?;
        info!("Summary written to {:?}", path);
    }

    Ok(())
}
