use std::time::Duration;

use color_eyre::eyre::{OptionExt, Result};
use crossterm::event::{Event as CrosstermEvent, EventStream};
use futures::{FutureExt, StreamExt};
use tokio::{
    sync::{mpsc, watch},
    time::sleep,
};

/// Frame rate for UI ticks, independent of the sample cadence.
pub const TICK_FPS: f64 = 30.0;

#[derive(Clone, Debug)]
pub enum Event {
    /// UI frame tick, used for animation only.
    Tick,
    Crossterm(CrosstermEvent),
    App(AppEvent),
}

#[derive(Clone, Debug)]
pub enum AppEvent {
    Quit,
    Reload,
    TogglePause,
    /// Adjust the sample interval by a delta in seconds (clamped by the app).
    AdjustInterval(f64),
    /// Time to take the next sample.
    SampleRefresh,
}

/// Terminal event handler.
///
/// Fans crossterm events, frame ticks, and app events into one channel, and
/// runs the sample ticker whose period is shared through a watch channel so
/// interval changes take effect on the very next sleep.
#[derive(Debug)]
pub struct EventHandler {
    sender: mpsc::UnboundedSender<Event>,
    receiver: mpsc::UnboundedReceiver<Event>,
    interval: watch::Sender<Duration>,
}

impl EventHandler {
    pub fn new(sample_interval: Duration) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let (interval, interval_rx) = watch::channel(sample_interval);
        let actor = EventTask::new(sender.clone());
        tokio::spawn(async move { actor.run().await });
        tokio::spawn(sample_ticker(sender.clone(), interval_rx));
        Self {
            sender,
            receiver,
            interval,
        }
    }

    /// Receive the next event, in arrival order.
    pub async fn next(&mut self) -> Result<Event> {
        self.receiver
            .recv()
            .await
            .ok_or_eyre("event channel closed")
    }

    /// Queue an app event to be processed on the next loop turn.
    pub fn send(&mut self, app_event: AppEvent) {
        let _ = self.sender.send(Event::App(app_event));
    }

    pub fn clone_sender(&self) -> mpsc::UnboundedSender<Event> {
        self.sender.clone()
    }

    pub fn sample_interval(&self) -> Duration {
        *self.interval.borrow()
    }

    pub fn set_sample_interval(&self, interval: Duration) {
        let _ = self.interval.send(interval);
    }
}

/// Publishes `SampleRefresh` on the configured cadence. Re-arms immediately
/// when the interval changes rather than finishing the old sleep.
async fn sample_ticker(
    sender: mpsc::UnboundedSender<Event>,
    mut interval: watch::Receiver<Duration>,
) {
    loop {
        let period = *interval.borrow_and_update();
        tokio::select! {
            _ = sleep(period) => {
                if sender.send(Event::App(AppEvent::SampleRefresh)).is_err() {
                    break;
                }
            }
            changed = interval.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }
}

/// Pumps crossterm events and frame ticks until the receiving side closes.
struct EventTask {
    sender: mpsc::UnboundedSender<Event>,
}

impl EventTask {
    fn new(sender: mpsc::UnboundedSender<Event>) -> Self {
        Self { sender }
    }

    async fn run(self) {
        let tick_rate = Duration::from_secs_f64(1.0 / TICK_FPS);
        let mut reader = EventStream::new();
        let mut tick = tokio::time::interval(tick_rate);
        loop {
            let tick_delay = tick.tick();
            let crossterm_event = reader.next().fuse();
            tokio::select! {
                _ = self.sender.closed() => {
                    break;
                }
                _ = tick_delay => {
                    self.send(Event::Tick);
                }
                Some(Ok(event)) = crossterm_event => {
                    self.send(Event::Crossterm(event));
                }
            }
        }
    }

    fn send(&self, event: Event) {
        // Ignore failures: the app is shutting down.
        let _ = self.sender.send(event);
    }
}
