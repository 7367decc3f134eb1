//! Main service orchestration: the fetch-render-announce poll loop.
//!
//! One cycle = GET the objects endpoint, replace the rendered list, submit
//! one utterance per object. Cycles are fire-and-forget tasks: the timer
//! keeps its schedule even when a fetch runs long, so cycles may overlap.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::Local;
use tracing::{info, warn};

use crate::client::ObjectsClient;
use crate::config::Config;
use crate::history::{save_poll_record, PollRecord};
use crate::render::RenderTarget;
use crate::speech::Speaker;

pub struct AnnouncerService<R, S> {
    config: Config,
    client: Arc<ObjectsClient>,
    target: Arc<Mutex<R>>,
    speaker: Arc<Mutex<S>>,
}

impl<R, S> AnnouncerService<R, S>
where
    R: RenderTarget + 'static,
    S: Speaker + 'static,
{
    pub fn new(config: Config, target: R, speaker: S) -> Self {
        let client = Arc::new(ObjectsClient::new(&config.poll));
        Self {
            config,
            client,
            target: Arc::new(Mutex::new(target)),
            speaker: Arc::new(Mutex::new(speaker)),
        }
    }

    /// Run the poll loop for the life of the process.
    ///
    /// The first cycle fires immediately, then one every `interval_ms`.
    /// Each cycle is spawned, not awaited, so slow fetches overlap the next
    /// tick instead of delaying it. There is no shutdown path besides
    /// process exit, and a failed cycle never stops the timer.
    pub async fn run(&self) {
        let mut interval =
            tokio::time::interval(Duration::from_millis(self.config.poll.interval_ms));

        info!(
            "Polling {} every {}ms",
            self.client.endpoint(),
            self.config.poll.interval_ms
        );

        loop {
            interval.tick().await;

            let client = self.client.clone();
            let target = self.target.clone();
            let speaker = self.speaker.clone();
            let record_history = self.config.history.enabled;

            tokio::spawn(async move {
                poll_cycle(&client, &target, &speaker, record_history).await;
            });
        }
    }

    /// Run exactly one poll cycle and return.
    pub async fn poll_once(&self) {
        poll_cycle(
            &self.client,
            &self.target,
            &self.speaker,
            self.config.history.enabled,
        )
        .await;
    }
}

/// One fetch-render-announce cycle.
///
/// On fetch failure the render target keeps its previous entries and no
/// utterances are submitted; the failure is logged and the cycle ends.
pub async fn poll_cycle<R: RenderTarget, S: Speaker>(
    client: &ObjectsClient,
    target: &Mutex<R>,
    speaker: &Mutex<S>,
    record_history: bool,
) {
    let t_fetch = Instant::now();
    let timestamp = Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string();

    match client.fetch().await {
        Ok(objects) => {
            let fetch_ms = t_fetch.elapsed().as_millis() as i64;

            target.lock().unwrap().replace(&objects);

            {
                let mut speaker = speaker.lock().unwrap();
                for obj in &objects {
                    speaker.submit(&obj.spoken_phrase());
                }
            }

            if record_history {
                save_poll_record(&PollRecord {
                    timestamp,
                    endpoint: client.endpoint().to_string(),
                    object_count: objects.len(),
                    fetch_ms,
                    error: None,
                    spoken: !objects.is_empty(),
                });
            }
        }
        Err(e) => {
            let fetch_ms = t_fetch.elapsed().as_millis() as i64;
            warn!("Poll failed: {e}");

            if record_history {
                save_poll_record(&PollRecord {
                    timestamp,
                    endpoint: client.endpoint().to_string(),
                    object_count: 0,
                    fetch_ms,
                    error: Some(e.to_string()),
                    spoken: false,
                });
            }
        }
    }
}
