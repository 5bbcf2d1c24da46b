// Clock playback adapter - wall-clock driven stand-in for a media engine

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::domain::errors::*;
use crate::domain::model::FrameRate;
use crate::ports::*;

const EVENT_CAPACITY: usize = 64;

struct ClockState {
    /// Position at the moment playback last started or was seeked
    anchor: f64,
    /// Set while playing
    playing_since: Option<Instant>,
}

/// Playback engine that advances media time with the clock.
///
/// Decodes nothing; it only keeps a position, a paused flag and the event
/// streams a real engine would emit.
pub struct ClockPlaybackAdapter {
    state: Mutex<ClockState>,
    duration: Option<f64>,
    native_frames: bool,
    frames: broadcast::Sender<FramePresented>,
    seeks: broadcast::Sender<f64>,
}

impl ClockPlaybackAdapter {
    /// Create a paused engine at position zero
    pub fn new(duration: Option<f64>) -> Self {
        let (frames, _) = broadcast::channel(EVENT_CAPACITY);
        let (seeks, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            state: Mutex::new(ClockState {
                anchor: 0.0,
                playing_since: None,
            }),
            duration,
            native_frames: true,
            frames,
            seeks,
        }
    }

    /// Behave like an engine lacking per-frame callbacks
    pub fn without_frame_callbacks(mut self) -> Self {
        self.native_frames = false;
        self
    }

    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    /// Emit a frame event every frame period while playing.
    ///
    /// Stops once the adapter is dropped.
    pub fn start_presenting(self: &Arc<Self>, rate: FrameRate) -> JoinHandle<()> {
        let engine: Weak<Self> = Arc::downgrade(self);
        let period = std::time::Duration::from_secs_f64(rate.frame_duration());

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let Some(engine) = engine.upgrade() else {
                    break;
                };
                if !engine.is_paused() {
                    engine.present();
                }
            }
        })
    }

    fn clamp(&self, seconds: f64) -> f64 {
        let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
        match self.duration {
            Some(duration) => seconds.min(duration),
            None => seconds,
        }
    }

    fn position(&self, state: &ClockState) -> f64 {
        let elapsed = state
            .playing_since
            .map(|since| since.elapsed().as_secs_f64())
            .unwrap_or(0.0);
        self.clamp(state.anchor + elapsed)
    }

    fn present(&self) {
        if self.native_frames {
            let media_time = self.current_time();
            // no subscribers is fine
            let _ = self.frames.send(FramePresented { media_time });
        }
    }
}

impl PlaybackPort for ClockPlaybackAdapter {
    fn current_time(&self) -> f64 {
        let state = self.state.lock();
        self.position(&state)
    }

    fn set_current_time(&self, seconds: f64) -> Result<(), DomainError> {
        if !seconds.is_finite() {
            return Err(DomainError::PlaybackFailed(format!(
                "cannot seek to {}",
                seconds
            )));
        }

        let target = self.clamp(seconds);
        {
            let mut state = self.state.lock();
            state.anchor = target;
            if state.playing_since.is_some() {
                state.playing_since = Some(Instant::now());
            }
        }

        let _ = self.seeks.send(target);
        self.present();
        Ok(())
    }

    fn play(&self) -> Result<(), DomainError> {
        let mut state = self.state.lock();
        if state.playing_since.is_none() {
            state.playing_since = Some(Instant::now());
        }
        Ok(())
    }

    fn pause(&self) -> Result<(), DomainError> {
        let mut state = self.state.lock();
        let position = self.position(&state);
        state.anchor = position;
        state.playing_since = None;
        Ok(())
    }

    fn is_paused(&self) -> bool {
        self.state.lock().playing_since.is_none()
    }

    fn frame_events(&self) -> Option<broadcast::Receiver<FramePresented>> {
        self.native_frames.then(|| self.frames.subscribe())
    }

    fn seek_events(&self) -> broadcast::Receiver<f64> {
        self.seeks.subscribe()
    }
}
