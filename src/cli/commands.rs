//! Command implementations

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, warn};

use crate::adapters::HttpJobAdapter;
use crate::app::{AppContainer, JobDraft, SubmitInteractor};
use crate::cli::args::{DecodeArgs, SecondsArgs, SubmitArgs, TimecodeArgs};
use crate::domain::model::*;
use crate::shuttle::{protocol::button_actions, DialStep, ShuttleSample, ShuttleSpeed};
use crate::transport::{Focus, Key, KeyboardShortcuts};
use crate::utils::time::TimestampParser;

/// How long the session waits for the live timecode to catch up with a command
const DISPLAY_SETTLE: Duration = Duration::from_millis(100);

/// Execute the timecode command
pub fn timecode(args: &TimecodeArgs, rate: FrameRate) -> String {
    TimecodeCodec::new(rate).format(args.seconds)
}

/// Execute the seconds command
pub fn seconds(args: &SecondsArgs, rate: FrameRate) -> Result<String> {
    let parser = TimestampParser::new(rate);
    let directive = parser
        .parse(&args.text)
        .with_context(|| format!("Cannot parse '{}'", args.text))?;
    let target = directive.resolve(args.position);

    let kind = match directive {
        SeekDirective::Absolute(_) => "absolute",
        SeekDirective::RelativeForward(_) => "forward",
        SeekDirective::RelativeBackward(_) => "backward",
    };

    Ok(format!(
        "{} {:.3} {}",
        kind,
        target,
        TimecodeCodec::new(rate).format(target)
    ))
}

/// Execute the decode command
pub fn decode(args: &DecodeArgs) -> Result<String> {
    let report = parse_report(&args.bytes)?;
    let sample = ShuttleSample::decode(&report)?;
    let previous = match &args.previous {
        Some(bytes) => Some(ShuttleSample::decode(&parse_report(bytes)?)?),
        None => None,
    };

    let speed = ShuttleSpeed::from_wheel(sample.wheel);
    let dial = DialStep::between(previous.as_ref(), &sample);
    let actions = button_actions(&sample);

    if args.json {
        let value = serde_json::json!({
            "wheel": sample.wheel,
            "dial": sample.dial,
            "buttons_low": sample.buttons_low,
            "buttons_high": sample.buttons_high,
            "frames_per_tick": speed.frames_per_tick(),
            "dial_step": dial.map(|step| step.frames()),
            "actions": actions.iter().map(|a| format!("{:?}", a)).collect::<Vec<_>>(),
        });
        return Ok(serde_json::to_string_pretty(&value)?);
    }

    let speed_text = match speed {
        ShuttleSpeed::Neutral => "neutral".to_string(),
        ShuttleSpeed::Forward(frames) => format!("forward {} frames/tick", frames),
        ShuttleSpeed::Reverse(frames) => format!("reverse {} frames/tick", frames),
    };
    let dial_text = match dial {
        Some(DialStep::Forward) => "forward",
        Some(DialStep::Back) => "back",
        None => "none",
    };
    let actions_text = if actions.is_empty() {
        "none".to_string()
    } else {
        actions
            .iter()
            .map(|a| format!("{:?}", a))
            .collect::<Vec<_>>()
            .join(", ")
    };

    Ok(format!(
        "wheel={} dial={} buttons={:#04x}/{:#04x}\nspeed: {}\ndial: {}\nbuttons: {}",
        sample.wheel,
        sample.dial,
        sample.buttons_low,
        sample.buttons_high,
        speed_text,
        dial_text,
        actions_text
    ))
}

fn parse_report(bytes: &[String]) -> Result<Vec<u8>> {
    bytes
        .iter()
        .map(|text| {
            let text = text.trim();
            let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
                Some(hex) => u8::from_str_radix(hex, 16),
                None => text.parse(),
            };
            parsed.with_context(|| format!("Invalid report byte '{}'", text))
        })
        .collect()
}

/// Execute the session command.
///
/// Each input line is either a session command (`gi`, `go`, `shuttle`,
/// `disconnect`, `wait <ms>`, `marks`, `focus <body|text|video>`, `quit`) or
/// a run of key presses: `left`, `right`, `space`, `esc`, `enter`, and any
/// other token typed character by character. The live timecode is printed
/// after every line.
pub async fn session<R, W>(
    container: &dyn AppContainer,
    connect_shuttle: bool,
    input: R,
    out: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let transport = container.transport();
    let display = container.display();
    let shuttle = container.shuttle();
    let mut keys = KeyboardShortcuts::new();
    let mut display_rx = display.subscribe();

    if connect_shuttle {
        let state = shuttle.connect().await?;
        writeln!(out, "shuttle: {:?}", state)?;
    }

    info!("Session started at {} fps", transport.codec().frame_rate());
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        display_rx.borrow_and_update();

        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or_default();
        let outcome = match command {
            "quit" | "q" => break,
            "gi" => transport.go_to_in().map_err(anyhow::Error::from),
            "go" => transport.go_to_out().map_err(anyhow::Error::from),
            "shuttle" => shuttle
                .connect()
                .await
                .map(|state| debug!("Shuttle state: {:?}", state))
                .map_err(anyhow::Error::from),
            "disconnect" => {
                shuttle.disconnect().await;
                Ok(())
            }
            "wait" => match words.next().map(str::parse::<u64>) {
                Some(Ok(ms)) => {
                    tokio::time::sleep(Duration::from_millis(ms)).await;
                    Ok(())
                }
                _ => Err(anyhow::anyhow!("usage: wait <ms>")),
            },
            "marks" => {
                let marks = transport.marks();
                writeln!(out, "in={} out={}", marks.in_point, marks.out_point)?;
                Ok(())
            }
            "focus" => match words.next() {
                Some("body") => Some(Focus::Body),
                Some("text") => Some(Focus::TextField),
                Some("video") => Some(Focus::Video),
                _ => None,
            }
            .map(|focus| keys.set_focus(focus))
            .ok_or_else(|| anyhow::anyhow!("usage: focus <body|text|video>")),
            _ => press_keys(line, &mut keys, &transport),
        };

        if let Err(e) = outcome {
            warn!("{}", e);
            writeln!(out, "error: {}", e)?;
        }

        // give the frame sync loop a chance to publish the new position
        let _ = tokio::time::timeout(DISPLAY_SETTLE, display_rx.changed()).await;
        writeln!(out, "{}", display.get())?;
    }

    shuttle.disconnect().await;
    info!("Session finished");
    Ok(())
}

fn press_keys(
    line: &str,
    keys: &mut KeyboardShortcuts,
    transport: &crate::transport::TransportController,
) -> Result<()> {
    for token in line.split_whitespace() {
        let named = match token {
            "left" => Some(Key::ArrowLeft),
            "right" => Some(Key::ArrowRight),
            "space" => Some(Key::Space),
            "esc" => Some(Key::Escape),
            "enter" => Some(Key::Enter),
            _ => None,
        };

        match named {
            Some(key) => {
                keys.handle(key, transport)?;
            }
            None => {
                for c in token.chars() {
                    keys.handle(Key::Char(c), transport)?;
                }
            }
        }
    }
    Ok(())
}

/// Execute the submit command
pub async fn submit(args: &SubmitArgs, config: &VideologConfig) -> Result<String> {
    let rate = config.frame_rate()?;
    let mut draft = JobDraft::new();

    if let Some(path) = &args.talks {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read talk catalog {}", path))?;
        let catalog = TalkCatalog::from_schedule_json(&json)?;
        info!("Loaded {} talks from {}", catalog.len(), path);

        let talk_id = args
            .talk_id
            .as_deref()
            .map(str::parse::<u64>)
            .transpose()
            .context("Talk id must be numeric when a catalog is given")?;
        draft.select_talk(talk_id, &catalog)?;
    } else if let Some(talk_id) = &args.talk_id {
        draft.set_field(JobField::TalkId, talk_id)?;
    }

    if let Some(presenter) = &args.presenter {
        draft.set_field(JobField::Presenter, presenter)?;
    }
    if let Some(title) = &args.title {
        draft.set_field(JobField::Title, title)?;
    }
    draft.set_field(JobField::Video, &args.video)?;
    draft.apply_marks(&MarkFields {
        in_point: args.start.clone(),
        out_point: args.end.clone(),
    });

    let interactor = SubmitInteractor::new(
        Arc::new(HttpJobAdapter::new(&config.api_base_url)),
        rate,
    );

    if args.dry_run {
        interactor.check(draft.job()).into_result()?;
        return Ok(serde_json::to_string_pretty(draft.job())?);
    }

    let receipt = interactor.execute(draft.job()).await?;
    Ok(format!("New job ID: {}", receipt.result_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(fps: u32) -> FrameRate {
        FrameRate::new(fps).unwrap()
    }

    #[test]
    fn test_seconds_command_output() {
        let args = SecondsArgs {
            text: "+100".to_string(),
            position: 10.0,
        };
        assert_eq!(seconds(&args, rate(25)).unwrap(), "forward 11.000 00:00:11:00");
    }

    #[test]
    fn test_decode_command_reports_reverse_speed() {
        let args = DecodeArgs {
            bytes: ["200", "3", "0", "0", "0x20"].map(String::from).to_vec(),
            previous: Some(["200", "2", "0", "0", "0"].map(String::from).to_vec()),
            json: false,
        };
        let text = decode(&args).unwrap();
        assert!(text.contains("reverse 280 frames/tick"));
        assert!(text.contains("dial: forward"));
        assert!(text.contains("buttons: MarkIn"));
    }

    #[test]
    fn test_decode_rejects_bad_bytes() {
        let args = DecodeArgs {
            bytes: vec!["300".to_string()],
            previous: None,
            json: false,
        };
        assert!(decode(&args).is_err());
    }

    #[tokio::test]
    async fn test_submit_dry_run_fills_from_catalog() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("talks.json");
        std::fs::write(
            &path,
            r#"[{"id": 3, "type": "talk", "title": "Shuttles", "speaker": "Ada"},
                {"id": 4, "type": "break", "title": "Coffee"}]"#,
        )
        .unwrap();

        let args = SubmitArgs {
            start: "00:01:00:00".to_string(),
            end: "00:02:00:00".to_string(),
            talk_id: Some("3".to_string()),
            presenter: None,
            title: None,
            video: "hall-a.mp4".to_string(),
            talks: Some(path.to_string_lossy().to_string()),
            dry_run: true,
            api_base_url: None,
        };

        let json = submit(&args, &VideologConfig::default()).await.unwrap();
        assert!(json.contains("\"presenter\": \"Ada\""));
        assert!(json.contains("\"talkid\": \"3\""));
    }

    #[tokio::test]
    async fn test_submit_dry_run_rejects_reversed_marks() {
        let args = SubmitArgs {
            start: "00:02:00:00".to_string(),
            end: "00:01:00:00".to_string(),
            talk_id: Some("3".to_string()),
            presenter: Some("Ada".to_string()),
            title: Some("Shuttles".to_string()),
            video: String::new(),
            talks: None,
            dry_run: true,
            api_base_url: None,
        };
        assert!(submit(&args, &VideologConfig::default()).await.is_err());
    }
}
