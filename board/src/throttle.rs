//! Frame-rate coalescing for continuous drag and resize streams.
//!
//! While a gesture is active every pointer move replaces the pending interim
//! message, and at most one animation frame request is outstanding. On each
//! frame the latest pending message (if any) goes out. Releasing the pointer
//! discards whatever is pending and yields the final message, which is always
//! sent. Strokes never pass through here.

#[cfg(test)]
#[path = "throttle_test.rs"]
mod throttle_test;

use wire::SurfaceMessage;

#[derive(Debug, Default)]
pub struct Throttler {
    pending: Option<SurfaceMessage>,
    frame_requested: bool,
}

impl Throttler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the pending interim message.
    ///
    /// Returns true when the caller must request an animation frame.
    pub fn schedule(&mut self, interim: SurfaceMessage) -> bool {
        self.pending = Some(interim);
        if self.frame_requested {
            return false;
        }
        self.frame_requested = true;
        true
    }

    /// Called once per animation frame. Returns the interim message to send.
    pub fn take_frame(&mut self) -> Option<SurfaceMessage> {
        self.frame_requested = false;
        self.pending.take()
    }

    /// End the gesture: drop any pending interim and hand back `last`.
    pub fn finish(&mut self, last: SurfaceMessage) -> SurfaceMessage {
        self.pending = None;
        last
    }

    /// Forget everything, including an outstanding frame request.
    pub fn reset(&mut self) {
        self.pending = None;
        self.frame_requested = false;
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}
