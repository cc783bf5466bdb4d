//! Frame-sequence animation and its terminal event.
//!
//! Rendering the frames is the host toolkit's job. This module owns the
//! timing: which frame is due when, and the single "finished" signal after
//! the last one.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace};

/// Error types for the splash animation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnimationError {
    /// Player went away before the last frame
    #[error("Animation aborted before the last frame")]
    Aborted,

    /// Terminal event was already taken
    #[error("Animation signal already consumed")]
    Consumed,

    /// Looping sequences never finish
    #[error("Looping sequence has no terminal event")]
    Looping,

    /// No frames to play
    #[error("Frame range {start}..={end} is empty")]
    EmptySequence { start: u32, end: u32 },

    /// Frame rate of zero
    #[error("Frame rate must be positive")]
    ZeroFrameRate,
}

/// A numbered sequence of frame images played at a fixed rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameSequence {
    /// Directory holding the frames
    pub directory: String,
    /// File name prefix before the frame number
    pub prefix: String,
    /// First frame number (inclusive)
    pub start: u32,
    /// Last frame number (inclusive)
    pub end: u32,
    /// File extension without the dot
    pub extension: String,
    /// Frames per second
    pub fps: u32,
    /// Restart after the last frame
    pub looping: bool,
}

impl Default for FrameSequence {
    fn default() -> Self {
        Self {
            directory: "assets/sportic_frames/".to_string(),
            prefix: "frame_".to_string(),
            start: 0,
            end: 33,
            extension: "png".to_string(),
            fps: 30,
            looping: false,
        }
    }
}

impl FrameSequence {
    /// Number of frames in the sequence.
    pub fn frame_count(&self) -> u64 {
        if self.end < self.start {
            0
        } else {
            u64::from(self.end - self.start) + 1
        }
    }

    /// Asset path for frame number `frame`, if it is in range.
    pub fn frame_path(&self, frame: u32) -> Option<String> {
        if frame < self.start || frame > self.end {
            return None;
        }
        Some(format!(
            "{}/{}{}.{}",
            self.directory.trim_end_matches('/'),
            self.prefix,
            frame,
            self.extension
        ))
    }

    /// Asset paths of every frame, in play order.
    pub fn frame_paths(&self) -> Vec<String> {
        (self.start..=self.end)
            .filter_map(|frame| self.frame_path(frame))
            .collect()
    }

    /// Time each frame stays on screen.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1)
            .checked_div(self.fps)
            .unwrap_or(Duration::ZERO)
    }

    /// Time from the first frame until the terminal event.
    pub fn total_duration(&self) -> Duration {
        u32::try_from(self.frame_count())
            .map_or(Duration::MAX, |frames| self.frame_interval().saturating_mul(frames))
    }

    /// Check the sequence can be played to completion.
    pub fn validate(&self) -> Result<(), AnimationError> {
        if self.fps == 0 {
            return Err(AnimationError::ZeroFrameRate);
        }
        if self.frame_count() == 0 {
            return Err(AnimationError::EmptySequence {
                start: self.start,
                end: self.end,
            });
        }
        if self.looping {
            return Err(AnimationError::Looping);
        }
        Ok(())
    }
}

/// Create the one-shot channel carrying the terminal event.
pub fn channel() -> (FinishNotifier, AnimationSignal) {
    let (tx, rx) = oneshot::channel();
    (FinishNotifier { tx }, AnimationSignal { rx })
}

/// Sending half of the terminal event.
///
/// `finish` consumes the notifier, so the event can be sent at most once.
#[derive(Debug)]
pub struct FinishNotifier {
    tx: oneshot::Sender<()>,
}

impl FinishNotifier {
    /// Emit the terminal event.
    pub fn finish(self) {
        // Receiver gone means the screen was torn down
        let _ = self.tx.send(());
    }
}

/// Receiving half of the terminal event.
#[derive(Debug)]
pub struct AnimationSignal {
    rx: oneshot::Receiver<()>,
}

impl AnimationSignal {
    /// Resolve once the last frame has played.
    pub async fn finished(self) -> Result<(), AnimationError> {
        self.rx.await.map_err(|_| AnimationError::Aborted)
    }
}

/// Plays a [`FrameSequence`] on the runtime clock.
#[derive(Debug, Clone)]
pub struct FramePlayer {
    sequence: FrameSequence,
}

impl FramePlayer {
    /// Create a player. The sequence must be finite and non-empty.
    pub fn new(sequence: FrameSequence) -> Result<Self, AnimationError> {
        sequence.validate()?;
        Ok(Self { sequence })
    }

    pub fn sequence(&self) -> &FrameSequence {
        &self.sequence
    }

    /// Play every frame once, reporting each to `on_frame`, then emit the
    /// terminal event.
    pub async fn play<F>(&self, notifier: FinishNotifier, mut on_frame: F)
    where
        F: FnMut(u32),
    {
        let mut ticker = tokio::time::interval(self.sequence.frame_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        for frame in self.sequence.start..=self.sequence.end {
            ticker.tick().await;
            on_frame(frame);
        }
        // Last frame stays up for a full interval
        ticker.tick().await;

        debug!(
            frames = self.sequence.frame_count(),
            "Splash animation finished"
        );
        notifier.finish();
    }

    /// Play on a background task.
    pub fn spawn(self, notifier: FinishNotifier) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.play(notifier, |frame| trace!(frame, "Splash frame due"))
                .await;
        })
    }
}
