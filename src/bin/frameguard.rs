use std::{fs, path::PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use frameguard::{
    AnalyzerConfig, FfmpegLogLevel, FrameSource, KeywordClassifier, RemoteClassifier, Report,
    TesseractTextExtractor, TextClassifier, VideoAnalyzer, YouTubeCommentSource,
    classify_comments, generate_report,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

const CLI_AFTER_HELP: &str = "Examples:\n  frameguard analyze upload.mp4 --sample-rate 0.5 --threshold 0.5 --json\n  frameguard analyze upload.mp4 --remote --token $HF_TOKEN --out report.json\n  frameguard metadata upload.mp4 --json\n  frameguard comments dQw4w9WgXcQ --api-key $YT_API_KEY";

#[derive(Debug, Parser)]
#[command(
    name = "frameguard",
    version,
    about = "Scan video frames for toxic on-screen text",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show a per-frame progress bar where supported.
    #[arg(long)]
    progress: bool,

    /// FFmpeg log level (quiet, fatal, error, warning, info, debug).
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyze a video's frames for toxic on-screen text.
    #[command(
        about = "Sample frames, OCR them, and report flagged timestamps",
        after_help = "Examples:\n  frameguard analyze upload.mp4\n  frameguard analyze upload.mp4 --sample-rate 1.0 --threshold 0.8 --json"
    )]
    Analyze {
        /// Input video path.
        input: PathBuf,

        /// Fraction of frames to analyze, in (0, 1]. 0.5 = every 2nd frame.
        #[arg(long, default_value_t = 0.5)]
        sample_rate: f64,

        /// Confidence threshold above which a category flags a frame.
        #[arg(long, default_value_t = 0.5)]
        threshold: f32,

        /// Classify via the hosted inference endpoint instead of the
        /// offline keyword rules.
        #[arg(long)]
        remote: bool,

        /// Override the inference endpoint URL (implies --remote).
        #[arg(long)]
        endpoint: Option<String>,

        /// Bearer token for the inference endpoint.
        #[arg(long)]
        token: Option<String>,

        /// Tesseract language code.
        #[arg(long, default_value = "eng")]
        language: String,

        /// Write the JSON report to a file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Print the report as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print metadata for a video file (alias: probe).
    #[command(about = "Print video metadata", visible_alias = "probe")]
    Metadata {
        /// Input video path.
        input: PathBuf,

        /// Output metadata as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Scan a YouTube video's comment section for harmful content.
    #[command(
        about = "Fetch and classify YouTube comments",
        after_help = "Examples:\n  frameguard comments dQw4w9WgXcQ --api-key $YT_API_KEY --max-results 200"
    )]
    Comments {
        /// YouTube video id.
        video_id: String,

        /// YouTube Data API key.
        #[arg(long)]
        api_key: String,

        /// Maximum number of top-level comments to fetch.
        #[arg(long, default_value_t = 100)]
        max_results: usize,

        /// Print results as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },
}

fn parse_log_level(value: &str) -> Option<FfmpegLogLevel> {
    match value.to_ascii_lowercase().as_str() {
        "quiet" => Some(FfmpegLogLevel::Quiet),
        "fatal" => Some(FfmpegLogLevel::Fatal),
        "error" => Some(FfmpegLogLevel::Error),
        "warning" | "warn" => Some(FfmpegLogLevel::Warning),
        "info" => Some(FfmpegLogLevel::Info),
        "debug" => Some(FfmpegLogLevel::Debug),
        _ => None,
    }
}

fn build_classifier(
    remote: bool,
    endpoint: Option<String>,
    token: Option<String>,
) -> Box<dyn TextClassifier> {
    if remote || endpoint.is_some() {
        let mut classifier = RemoteClassifier::new();
        if let Some(endpoint) = endpoint {
            classifier = classifier.with_endpoint(endpoint);
        }
        if let Some(token) = token {
            classifier = classifier.with_token(token);
        }
        Box::new(classifier)
    } else {
        Box::new(KeywordClassifier::new())
    }
}

fn frame_progress_bar(total_frames: u64) -> ProgressBar {
    let bar = ProgressBar::new(total_frames);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} Analyzing [{bar:40.cyan/blue}] {pos}/{len} frames")
            .expect("static template is valid")
            .progress_chars("##-"),
    );
    bar
}

fn print_report(report: &Report) {
    println!(
        "{} {} frame(s) produced analyzable text",
        "analyzed:".green().bold(),
        report.total_frames_analyzed,
    );

    if report.flagged_content.is_empty() {
        println!("{} no frames exceeded the threshold", "clean:".green().bold());
        return;
    }

    for flagged in &report.flagged_content {
        let categories: Vec<String> = flagged
            .toxic_categories
            .iter()
            .map(|(label, score)| format!("{label}={score:.3}"))
            .collect();
        println!(
            "{} frame {} at {:.2}s [{}] {:?}",
            "flagged:".red().bold(),
            flagged.frame_index,
            flagged.timestamp_seconds,
            categories.join(", "),
            flagged.text,
        );
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(level) = &cli.global.log_level {
        let parsed = parse_log_level(level).ok_or(format!("unsupported --log-level: {level}"))?;
        frameguard::set_ffmpeg_log_level(parsed);
    }

    match cli.command {
        Commands::Analyze {
            input,
            sample_rate,
            threshold,
            remote,
            endpoint,
            token,
            language,
            out,
            json,
        } => {
            let config = AnalyzerConfig::new()
                .with_sample_rate(sample_rate)
                .with_threshold(threshold);
            let extractor = TesseractTextExtractor::new().with_language(language);
            let classifier = build_classifier(remote, endpoint, token);

            let report = if cli.global.progress {
                // Drive the pipeline core directly so the bar can observe
                // each decoded frame.
                let interval = config.sampling_interval()?;
                let mut source = FrameSource::open(&input)?;
                let frames_per_second = source.frame_rate();
                let bar = frame_progress_bar(source.total_frames());

                let records = frameguard::analyze_frames(
                    source.frames()?.inspect(|_| bar.inc(1)),
                    frames_per_second,
                    interval,
                    &extractor,
                    classifier.as_ref(),
                )?;
                bar.finish_and_clear();
                generate_report(&records, config.threshold)
            } else {
                let analyzer =
                    VideoAnalyzer::with_config(Box::new(extractor), classifier, config);
                analyzer.analyze(&input)?
            };

            if let Some(out) = out {
                fs::write(&out, serde_json::to_string_pretty(&report)?)?;
                println!("Report written to {}", out.display());
            } else if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }
        Commands::Metadata { input, json } => {
            let source = FrameSource::open(&input)?;
            let metadata = source.metadata();
            if json {
                let payload = json!({
                    "format": metadata.format,
                    "duration_seconds": metadata.duration.as_secs_f64(),
                    "width": metadata.width,
                    "height": metadata.height,
                    "fps": metadata.frames_per_second,
                    "frame_count": metadata.frame_count,
                    "codec": metadata.codec,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("Format: {}", metadata.format);
                println!("Duration: {:?}", metadata.duration);
                println!(
                    "Video: {}x{} @ {:.2} fps [{}], ~{} frames",
                    metadata.width,
                    metadata.height,
                    metadata.frames_per_second,
                    metadata.codec,
                    metadata.frame_count,
                );
            }
        }
        Commands::Comments {
            video_id,
            api_key,
            max_results,
            json,
        } => {
            let source = YouTubeCommentSource::new(api_key);
            let comments = source.fetch_comments(&video_id, max_results)?;
            let classifier = KeywordClassifier::new();
            let results = classify_comments(&comments, &classifier);

            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                for result in &results {
                    println!(
                        "{} ({:.3}) {:?}",
                        result.classification.bold(),
                        result.confidence,
                        result.comment,
                    );
                }
            }
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}
