//! Channel between request worker threads and the sync main loop.
//!
//! - Worker threads get a cloneable sender and push one message per
//!   finished request
//! - The main loop drains pending messages once per frame, non-blocking
//! - Every message carries the generation of the request that produced
//!   it, so the consumer can discard anything superseded

use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use crate::services::parser::ParseOutcome;

/// Messages sent from worker threads to the main loop.
#[derive(Debug)]
pub enum UiMessage {
    /// A parse request finished, in whatever way.
    ParseFinished {
        generation: u64,
        outcome: ParseOutcome,
    },
}

/// Bridge between worker threads and the sync main loop.
#[derive(Clone)]
pub struct UiBridge {
    sender: mpsc::Sender<UiMessage>,
    // Receiver wrapped in Arc<Mutex<>> to allow cloning
    receiver: Arc<Mutex<mpsc::Receiver<UiMessage>>>,
}

impl UiBridge {
    /// Create a new bridge with an unbounded channel. The main loop
    /// drains it every tick, so depth stays bounded by request rate.
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver: Arc::new(Mutex::new(receiver)),
        }
    }

    /// Cloneable sender for worker threads.
    pub fn sender(&self) -> mpsc::Sender<UiMessage> {
        self.sender.clone()
    }

    /// Drain all pending messages without blocking.
    pub fn try_recv_all(&self) -> Vec<UiMessage> {
        let mut messages = Vec::new();
        if let Ok(receiver) = self.receiver.lock() {
            while let Ok(msg) = receiver.try_recv() {
                messages.push(msg);
            }
        }
        messages
    }
}

impl Default for UiBridge {
    fn default() -> Self {
        Self::new()
    }
}
