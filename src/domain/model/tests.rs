// Unit tests for domain models

use crate::domain::errors::*;
use crate::domain::model::*;

fn codec(fps: u32) -> TimecodeCodec {
    TimecodeCodec::new(FrameRate::new(fps).unwrap())
}

#[test]
fn test_frame_rate_rejects_zero() {
    assert_eq!(FrameRate::new(0), Err(DomainError::InvalidFrameRate(0)));
    assert_eq!(FrameRate::new(25).unwrap().fps(), 25);
    assert_eq!(FrameRate::default().fps(), 50);
}

#[test]
fn test_seconds_to_timecode_decomposes_frames() {
    // 125.02 s at 50 fps is 6251 frames: 2 min 5 s and 1 frame
    let tc = codec(50).seconds_to_timecode(125.02);
    assert_eq!(tc, Timecode::new(0, 2, 5, 1));
    assert_eq!(tc.to_string(), "00:02:05:01");
}

#[test]
fn test_seconds_to_timecode_rounds_to_nearest_frame() {
    let c = codec(25);
    // 0.039 s is 0.975 frames
    assert_eq!(c.seconds_to_timecode(0.039), Timecode::new(0, 0, 0, 1));
    // 0.019 s is 0.475 frames
    assert_eq!(c.seconds_to_timecode(0.019), Timecode::new(0, 0, 0, 0));
}

#[test]
fn test_hours_wrap_at_sixty() {
    let c = codec(25);
    assert_eq!(c.format(61.0 * 3600.0 + 1.0), "01:00:01:00");
}

#[test]
fn test_negative_and_non_finite_seconds_are_zero() {
    let c = codec(50);
    assert_eq!(c.format(-3.0), "00:00:00:00");
    assert_eq!(c.format(f64::NAN), "00:00:00:00");
}

#[test]
fn test_timecode_to_seconds() {
    let c = codec(50);
    assert_eq!(c.timecode_to_seconds(&Timecode::new(1, 2, 3, 25)), 3723.5);
    assert_eq!(c.timecode_to_seconds(&Timecode::default()), 0.0);
}

#[test]
fn test_timecode_round_trip() {
    for fps in [24, 25, 30, 50, 60] {
        let c = codec(fps);
        for tc in [
            Timecode::new(0, 0, 0, 0),
            Timecode::new(0, 0, 1, fps - 1),
            Timecode::new(0, 59, 59, fps / 2),
            Timecode::new(12, 34, 56, 7),
            Timecode::new(59, 59, 59, fps - 1),
        ] {
            let seconds = c.timecode_to_seconds(&tc);
            assert_eq!(c.seconds_to_timecode(seconds), tc, "fps {} tc {}", fps, tc);
        }
    }
}

#[test]
fn test_seconds_round_trip_is_frame_exact() {
    let c = codec(30);
    for seconds in [0.0, 0.01, 1.234, 59.999, 3600.5, 7205.4321] {
        let tc = c.seconds_to_timecode(seconds);
        let expected = (seconds * 30.0_f64).round() / 30.0;
        assert_eq!(c.timecode_to_seconds(&tc), expected, "seconds {}", seconds);
    }
}

#[test]
fn test_seek_directive_resolution() {
    assert_eq!(SeekDirective::Absolute(4.0).resolve(10.0), 4.0);
    assert_eq!(SeekDirective::RelativeForward(4.0).resolve(10.0), 14.0);
    assert_eq!(SeekDirective::RelativeBackward(4.0).resolve(10.0), 6.0);
    assert!(!SeekDirective::Absolute(1.0).is_relative());
    assert!(SeekDirective::RelativeBackward(1.0).is_relative());
}

#[test]
fn test_clip_job_autofill_from_talk() {
    let talk = TalkInfo {
        title: "Soldering for Beginners".to_string(),
        presenter: "Grace".to_string(),
    };
    let marks = MarkFields {
        in_point: "00:00:10:00".to_string(),
        out_point: "00:20:00:00".to_string(),
    };

    let job = ClipJob::default().with_talk(7, &talk).with_marks(&marks);
    assert_eq!(job.talk_id, "7");
    assert_eq!(job.title, "Soldering for Beginners");
    assert_eq!(job.presenter, "Grace");
    assert_eq!(job.start_tc, "00:00:10:00");

    let names: Vec<&str> = job.form_fields().iter().map(|(f, _)| f.form_name()).collect();
    assert_eq!(
        names,
        vec!["start_tc", "end_tc", "presenter", "title", "video", "talkid"]
    );
}

#[test]
fn test_talk_catalog_keeps_talks_only() {
    let json = r#"[
        {"id": 3, "type": "talk", "title": "Zebras", "speaker": "Zed", "slug": "zebras"},
        {"id": 1, "type": "workshop", "title": "Knitting", "speaker": "Kim"},
        {"id": 2, "type": "talk", "title": "Antennas", "speaker": "Ann"}
    ]"#;

    let catalog = TalkCatalog::from_schedule_json(json).unwrap();
    assert_eq!(catalog.len(), 2);
    assert!(catalog.get(1).is_none());
    assert_eq!(catalog.get(3).unwrap().presenter, "Zed");

    let titles: Vec<&str> = catalog
        .sorted_by_title()
        .into_iter()
        .map(|(_, talk)| talk.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Antennas", "Zebras"]);
}

#[test]
fn test_talk_catalog_rejects_bad_json() {
    assert!(TalkCatalog::from_schedule_json("{not json").is_err());
}

#[test]
fn test_config_defaults_validate() {
    let config = VideologConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.shuttle.vendor_id, 0x0b33);
    assert_eq!(config.shuttle.product_id, 0x0030);
    assert_eq!(config.shuttle.idle_poll_ms, 300);
    assert_eq!(config.shuttle.active_poll_ms, 20);
}

#[test]
fn test_config_validation_failures() {
    let mut config = VideologConfig::default();
    config.frame_rate = 0;
    assert!(config.validate().is_err());

    let mut config = VideologConfig::default();
    config.log_level = "loud".to_string();
    assert!(config.validate().is_err());

    let mut config = VideologConfig::default();
    config.shuttle.active_poll_ms = 0;
    assert!(config.validate().is_err());
}
