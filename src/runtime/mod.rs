// Tokio glue: a timer scheduler that reports back through the session's
// event channel, and a driver loop that feeds the channel into a session.

use std::collections::HashMap;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::platform::{Scheduler, TimerId};
use crate::player::{PlayerSession, SessionEvent};
use crate::utils::{PlayerError, PlayerResult};

/// Channel every asynchronous answer (timers, probes, host events) goes through
pub fn session_channel() -> (
    UnboundedSender<SessionEvent>,
    UnboundedReceiver<SessionEvent>,
) {
    mpsc::unbounded_channel()
}

/// One-shot timers backed by `tokio::time::sleep`
pub struct TokioScheduler {
    runtime: Handle,
    events: UnboundedSender<SessionEvent>,
    next_id: u64,
    timers: HashMap<TimerId, JoinHandle<()>>,
}

impl TokioScheduler {
    /// Must be called from within a tokio runtime
    pub fn new(events: UnboundedSender<SessionEvent>) -> PlayerResult<Self> {
        let runtime = Handle::try_current().map_err(|e| PlayerError::Runtime(e.to_string()))?;
        Ok(Self {
            runtime,
            events,
            next_id: 0,
            timers: HashMap::new(),
        })
    }

    /// Timers scheduled and not yet fired or cancelled
    pub fn pending(&self) -> usize {
        self.timers.values().filter(|task| !task.is_finished()).count()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        self.timers.retain(|_, task| !task.is_finished());

        self.next_id += 1;
        let id = TimerId(self.next_id);
        let events = self.events.clone();
        let task = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            trace!("Timer {:?} fired", id);
            let _ = events.send(SessionEvent::TimerFired(id));
        });
        self.timers.insert(id, task);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(task) = self.timers.remove(&id) {
            task.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, task) in self.timers.drain() {
            task.abort();
        }
    }
}

/// Feeds events from the channel into a session until it is detached
pub struct SessionDriver {
    session: PlayerSession,
    events: UnboundedReceiver<SessionEvent>,
}

impl SessionDriver {
    pub fn new(session: PlayerSession, events: UnboundedReceiver<SessionEvent>) -> Self {
        Self { session, events }
    }

    /// Run until `SessionEvent::Detach` arrives or every sender is gone.
    /// Returns the detached session.
    pub async fn run(mut self) -> PlayerSession {
        while let Some(event) = self.events.recv().await {
            if event == SessionEvent::Detach {
                break;
            }
            self.session.dispatch(event);
        }
        debug!("Session event loop finished");
        self.session.detach();
        self.session
    }
}
