use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::Duration;

use super::state::SharedStrip;
use crate::error::StripError;
use crate::protocol::LightOutput;

/// Pause after a failed tick before resuming the normal cadence
pub const ERROR_BACKOFF: Duration = Duration::from_secs(1);

struct LoopTask {
    handle: JoinHandle<()>,
    shutdown: watch::Sender<bool>,
}

/// Recurring send task of one strip.
///
/// At most one task runs per loop. `stop` resolves only after the task has
/// fully exited, so no frame leaves after it returns.
pub struct AnimationLoop {
    shared: Arc<SharedStrip>,
    output: Arc<dyn LightOutput>,
    update_interval: Duration,
    task: Mutex<Option<LoopTask>>,
    running: Arc<AtomicBool>,
}

impl AnimationLoop {
    pub fn new(
        shared: Arc<SharedStrip>,
        output: Arc<dyn LightOutput>,
        update_interval: Duration,
    ) -> Self {
        Self {
            shared,
            output,
            update_interval,
            task: Mutex::new(None),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Start ticking. A no-op while a task is already alive.
    pub async fn start(&self) {
        let mut task = self.task.lock().await;
        if let Some(existing) = task.as_ref() {
            if !existing.handle.is_finished() {
                return;
            }
        }

        let (shutdown, shutdown_rx) = watch::channel(false);
        self.running.store(true, Ordering::SeqCst);

        let handle = tokio::spawn(Self::run(
            Arc::clone(&self.shared),
            Arc::clone(&self.output),
            self.update_interval,
            shutdown_rx,
            Arc::clone(&self.running),
        ));

        *task = Some(LoopTask { handle, shutdown });
    }

    /// Request cancellation and wait for the task to exit.
    pub async fn stop(&self) {
        let mut task = self.task.lock().await;
        if let Some(LoopTask { handle, shutdown }) = task.take() {
            let _ = shutdown.send(true);
            if let Err(e) = handle.await {
                log::error!("Animation task ended abnormally: {}", e);
            }
        }
        self.running.store(false, Ordering::SeqCst);
    }

    async fn run(
        shared: Arc<SharedStrip>,
        output: Arc<dyn LightOutput>,
        update_interval: Duration,
        mut shutdown: watch::Receiver<bool>,
        running: Arc<AtomicBool>,
    ) {
        log::info!(
            "Animation loop started, ticking every {:?}",
            update_interval
        );

        if let Err(e) = output.send_enable(true).await {
            log::error!("Failed to enable strip: {}", e);
        }

        let mut ticks: u64 = 0;
        loop {
            if *shutdown.borrow() {
                break;
            }

            let pause = match Self::tick(&shared, output.as_ref()).await {
                Ok(()) => update_interval,
                Err(e) => {
                    log::error!("Error in animation tick: {}", e);
                    ERROR_BACKOFF
                }
            };
            ticks += 1;

            tokio::select! {
                _ = tokio::time::sleep(pause) => {}
                // Also fires when the sender is dropped
                _ = shutdown.changed() => break,
            }
        }

        // A strip switched off right before the stop still goes dark
        let blackout = shared.state.lock().take_blackout();
        if let Some(frame) = blackout {
            if let Err(e) = output.send_colors(&frame.colors, frame.gradient_mode).await {
                log::error!("Failed to send final blackout: {}", e);
            }
        }

        running.store(false, Ordering::SeqCst);
        log::info!("Animation loop stopped after {} ticks", ticks);
    }

    async fn tick(shared: &SharedStrip, output: &dyn LightOutput) -> Result<(), StripError> {
        let frame = shared.state.lock().next_frame();
        if let Some(frame) = frame {
            output
                .send_colors(&frame.colors, frame.gradient_mode)
                .await?;
        }
        Ok(())
    }
}
