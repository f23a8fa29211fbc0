use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::state::OutgoingFrame;
use crate::color::Rgb;
use crate::error::StripError;
use crate::protocol::LightOutput;

/// Output that records what the loop sends.
#[derive(Default)]
pub(crate) struct RecordingOutput {
    enables: Mutex<Vec<bool>>,
    frames: Mutex<Vec<OutgoingFrame>>,
    color_attempts: AtomicUsize,
    fail_colors: AtomicBool,
}

impl RecordingOutput {
    pub(crate) fn enables(&self) -> Vec<bool> {
        self.enables.lock().clone()
    }

    pub(crate) fn frames(&self) -> Vec<OutgoingFrame> {
        self.frames.lock().clone()
    }

    pub(crate) fn color_attempts(&self) -> usize {
        self.color_attempts.load(Ordering::SeqCst)
    }

    pub(crate) fn fail_colors(&self, fail: bool) {
        self.fail_colors.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl LightOutput for RecordingOutput {
    async fn send_enable(&self, enable: bool) -> Result<(), StripError> {
        self.enables.lock().push(enable);
        Ok(())
    }

    async fn send_colors(&self, colors: &[Rgb], gradient_mode: bool) -> Result<(), StripError> {
        self.color_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_colors.load(Ordering::SeqCst) {
            return Err(StripError::Packet("simulated failure".to_string()));
        }
        self.frames.lock().push(OutgoingFrame {
            colors: colors.to_vec(),
            gradient_mode,
        });
        Ok(())
    }
}
