use anyhow::{Context, Result};
use clap::Parser;
use gd_room::result::{rank_label, ScoreBand};
use gd_room::session::{format_clock, SessionNotice, REACTION_PALETTE};
use gd_room::speech::{self, SpeechRecognizerFactory, SpeechSource};
use gd_room::{
    Config, GdResult, ResultGenerator, SessionHandle, SessionPhase, SessionSummary, StdRandom,
};
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "config/gd-room";

/// Group-discussion practice room in the terminal
#[derive(Debug, Parser)]
#[command(name = "gd-room", version)]
struct Args {
    /// Config file (TOML); defaults to config/gd-room.toml when present
    #[arg(short, long)]
    config: Option<String>,

    /// Seed for AI speaker choice, intervals and scoring
    #[arg(long)]
    seed: Option<u64>,

    /// Override the session length in seconds
    #[arg(short, long)]
    duration: Option<u32>,

    /// Utterances to dictate through the scripted speech recognizer
    #[arg(long = "speak")]
    speak: Vec<String>,

    /// Print the final report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, PartialEq)]
enum Command {
    Say(String),
    Mute,
    Video,
    Hand,
    Record,
    Share,
    React(String),
    Status,
    End,
    Unknown(String),
}

impl Command {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        let Some(rest) = line.strip_prefix('/') else {
            return Command::Say(line.to_string());
        };

        let (name, arg) = rest.split_once(' ').unwrap_or((rest, ""));
        match name {
            "mute" => Command::Mute,
            "video" => Command::Video,
            "hand" => Command::Hand,
            "record" => Command::Record,
            "share" => Command::Share,
            "react" => Command::React(if arg.trim().is_empty() {
                REACTION_PALETTE[0].to_string()
            } else {
                arg.trim().to_string()
            }),
            "status" => Command::Status,
            "end" => Command::End,
            other => Command::Unknown(other.to_string()),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let cfg = match &args.config {
        Some(path) => Config::load(path)?,
        None if Path::new(&format!("{}.toml", DEFAULT_CONFIG)).exists() => {
            Config::load(DEFAULT_CONFIG)?
        }
        None => Config::from_env()?,
    };

    let mut session_config = cfg.session_config();
    if let Some(duration) = args.duration {
        session_config.duration_secs = duration;
    }

    let (engine_random, result_random) = match args.seed {
        Some(seed) => (StdRandom::seeded(seed), StdRandom::seeded(seed.wrapping_add(1))),
        None => (StdRandom::from_entropy(), StdRandom::from_entropy()),
    };

    info!("{} starting", cfg.service.name);

    let session = Arc::new(
        SessionHandle::create(session_config, Box::new(engine_random))
            .context("Failed to create discussion session")?,
    );

    let snapshot = session.session().await;
    println!("Topic: {}", snapshot.topic);
    println!(
        "Participants: {}",
        snapshot
            .participants
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!(
        "Time: {}  |  type to speak, /mute /video /hand /record /share /react <emoji> /status /end",
        format_clock(snapshot.duration)
    );

    if !args.speak.is_empty() {
        let mut recognizer =
            SpeechRecognizerFactory::create(SpeechSource::Scripted(args.speak.clone()))?;
        let voice_session = Arc::clone(&session);
        tokio::spawn(async move {
            if let Err(e) = speech::drive(recognizer.as_mut(), &voice_session).await {
                warn!("Voice input failed: {}", e);
            }
        });
    }

    run(&session).await?;

    let summary = session
        .summary()
        .await
        .context("Session ended without a summary")?;
    let mut generator = ResultGenerator::new(Box::new(result_random));
    let result = generator.generate(&summary.transcript);

    if args.json {
        let report = serde_json::json!({ "summary": summary, "result": result });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&summary, &result);
    }

    session.dispose().await;
    Ok(())
}

/// Pump stdin commands and session notices until the session ends
async fn run(session: &SessionHandle) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut notices = session.subscribe();
    let mut phase = session.watch_phase();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            line = lines.next_line(), if stdin_open => {
                match line.context("Failed to read stdin")? {
                    Some(line) => handle_command(session, Command::parse(&line)).await,
                    None => {
                        stdin_open = false;
                        session.end_session().await;
                    }
                }
            }
            notice = notices.recv() => match notice {
                Ok(notice) => print_notice(&notice),
                Err(RecvError::Lagged(skipped)) => warn!("Skipped {} session notices", skipped),
                Err(RecvError::Closed) => break,
            },
            changed = phase.changed() => {
                if changed.is_err() || *phase.borrow() == SessionPhase::Ended {
                    break;
                }
            }
        }
    }

    // Flush notices published alongside the end of the session
    while let Ok(notice) = notices.try_recv() {
        print_notice(&notice);
    }

    Ok(())
}

async fn handle_command(session: &SessionHandle, command: Command) {
    match command {
        Command::Say(text) => {
            session.send_message(&text).await;
        }
        Command::Mute => session.toggle_mute().await,
        Command::Video => session.toggle_video().await,
        Command::Hand => session.toggle_hand_raise().await,
        Command::Record => session.toggle_recording().await,
        Command::Share => session.toggle_screen_share().await,
        Command::React(emoji) => session.react(&emoji).await,
        Command::Status => {
            let stats = session.stats().await;
            println!(
                "[{}] {} lines, {} from you{}",
                stats.clock,
                stats.transcript_len,
                stats.your_message_count,
                if stats.is_low_time { "  (time is running out)" } else { "" }
            );
        }
        Command::End => session.end_session().await,
        Command::Unknown(name) => println!("Unknown command: /{}", name),
    }
}

fn print_notice(notice: &SessionNotice) {
    match notice {
        SessionNotice::MessageAppended(message) => {
            println!(
                "[{}] {}: {}",
                message.timestamp.format("%H:%M:%S"),
                message.participant_name,
                message.content
            );
        }
        SessionNotice::Tick { time_remaining } if time_remaining % 60 == 0 => {
            println!("-- {} remaining --", format_clock(*time_remaining));
        }
        SessionNotice::ParticipantUpdated(p) => {
            println!(
                "-- you: {}, video {}, hand {} --",
                if p.is_muted { "muted" } else { "unmuted" },
                if p.is_video_off { "off" } else { "on" },
                if p.is_hand_raised { "raised" } else { "down" }
            );
        }
        SessionNotice::RecordingChanged { is_recording } => {
            println!("-- recording {} --", if *is_recording { "on" } else { "off" });
        }
        SessionNotice::ScreenShareChanged { is_screen_sharing } => {
            println!(
                "-- screen share {} --",
                if *is_screen_sharing { "on" } else { "off" }
            );
        }
        SessionNotice::ReactionAdded(reaction) => println!("   {}", reaction.emoji),
        SessionNotice::Ended {
            reason,
            time_remaining,
        } => {
            println!(
                "-- session ended ({:?}) with {} left --",
                reason,
                format_clock(*time_remaining)
            );
        }
        _ => {}
    }
}

fn print_report(summary: &SessionSummary, result: &GdResult) {
    println!();
    println!("Your Performance Report");
    println!("Topic: \"{}\"", summary.topic);
    println!(
        "Score: {:.1}/10 ({:?})  Rank: {}",
        result.score,
        ScoreBand::of(result.score),
        rank_label(result.rank)
    );
    println!();
    for (label, value) in result.metrics() {
        println!("  {:<14} {:>4.1}  {:?}", label, value, ScoreBand::of(value));
    }

    let sections = [
        ("Strengths", &result.strengths),
        ("Areas to improve", &result.weaknesses),
        ("Suggestions", &result.suggestions),
    ];
    for (title, items) in sections {
        println!();
        println!("{}:", title);
        for item in items {
            println!("  - {}", item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("hello"), Command::Say("hello".to_string()));
        assert_eq!(Command::parse("/mute"), Command::Mute);
        assert_eq!(Command::parse("/react 🎉"), Command::React("🎉".to_string()));
        assert_eq!(Command::parse("/react"), Command::React("👍".to_string()));
        assert_eq!(Command::parse(" /end "), Command::End);
        assert_eq!(Command::parse("/dance"), Command::Unknown("dance".to_string()));
    }

    #[test]
    fn test_parse_args() {
        let args = Args::parse_from([
            "gd-room",
            "--seed",
            "7",
            "--speak",
            "AI creates jobs",
            "--speak",
            "skills matter",
            "--json",
        ]);
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.speak, vec!["AI creates jobs", "skills matter"]);
        assert!(args.json);
        assert!(args.config.is_none());

        let args = Args::parse_from(["gd-room"]);
        assert!(args.speak.is_empty());
    }
}
