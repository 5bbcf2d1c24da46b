//! Keeps the live timecode field in step with presented frames

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::domain::model::TimecodeCodec;
use crate::ports::PlaybackPort;

/// The on-screen live timecode field
#[derive(Debug, Clone)]
pub struct TimecodeDisplay {
    tx: Arc<watch::Sender<String>>,
}

impl Default for TimecodeDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl TimecodeDisplay {
    pub fn new() -> Self {
        let (tx, _) = watch::channel("00:00:00:00".to_string());
        Self { tx: Arc::new(tx) }
    }

    pub fn set(&self, text: String) {
        self.tx.send_replace(text);
    }

    pub fn get(&self) -> String {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.tx.subscribe()
    }
}

/// Rewrites the display on every presented frame.
///
/// Engines without native frame callbacks are followed through their seek
/// events instead. Runs until the engine closes its event source.
pub struct FrameSyncLoop {
    playback: Arc<dyn PlaybackPort>,
    codec: TimecodeCodec,
    display: TimecodeDisplay,
}

impl FrameSyncLoop {
    pub fn new(
        playback: Arc<dyn PlaybackPort>,
        codec: TimecodeCodec,
        display: TimecodeDisplay,
    ) -> Self {
        Self {
            playback,
            codec,
            display,
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    pub async fn run(self) {
        let mut frames = self.playback.frame_events();
        let mut seeks = if frames.is_none() {
            info!("Playback engine has no frame callbacks, updating timecode on seek");
            Some(self.playback.seek_events())
        } else {
            None
        };

        loop {
            tokio::select! {
                frame = next_event(&mut frames) => match frame {
                    Some(frame) => self.update(frame.media_time),
                    None => break,
                },
                position = next_event(&mut seeks) => match position {
                    Some(position) => self.update(position),
                    None => break,
                },
            }
        }

        debug!("Frame sync loop finished");
    }

    fn update(&self, media_time: f64) {
        self.display.set(self.codec.format(media_time));
    }
}

/// Next event from an optional source; a missing source never yields
async fn next_event<T: Clone>(rx: &mut Option<broadcast::Receiver<T>>) -> Option<T> {
    let Some(rx) = rx.as_mut() else {
        return std::future::pending().await;
    };

    loop {
        match rx.recv().await {
            Ok(value) => return Some(value),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                debug!(skipped, "Timecode display fell behind");
            }
            Err(broadcast::error::RecvError::Closed) => return None,
        }
    }
}
