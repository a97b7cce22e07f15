use crate::lock_unpoisoned;
use chrono::Utc;
use oxprof_common::types::MonitorEvent;
use std::sync::Mutex;

/// Append-only audit log shared between the controller and the sampler
/// thread.
///
/// Appending is the only mutation. Reads return a snapshot copy rather than
/// holding the lock, so a caller's iteration is never invalidated by
/// concurrent sampling; a read may miss an event appended a moment later,
/// which is acceptable.
pub struct EventLog {
    events: Mutex<Vec<MonitorEvent>>,
    verbose: bool,
}

impl EventLog {
    pub fn new(verbose: bool) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            verbose,
        }
    }

    /// Appends one event, emits it through `tracing`, and echoes it on the
    /// operator channel when verbose output is enabled.
    pub fn record(&self, category: &str, message: impl Into<String>, is_error: bool) {
        let event = MonitorEvent {
            timestamp: Utc::now(),
            category: category.to_string(),
            message: message.into(),
            is_error,
        };
        if is_error {
            tracing::error!(category = %event.category, "{}", event.message);
        } else {
            tracing::info!(category = %event.category, "{}", event.message);
        }
        if self.verbose {
            println!("{event}");
        }
        lock_unpoisoned(&self.events).push(event);
    }

    /// Snapshot copy of the events, optionally restricted to one category.
    pub fn snapshot(&self, filter_category: Option<&str>) -> Vec<MonitorEvent> {
        let events = lock_unpoisoned(&self.events);
        match filter_category {
            Some(category) => events
                .iter()
                .filter(|e| e.category == category)
                .cloned()
                .collect(),
            None => events.clone(),
        }
    }

    /// The most recent event, if any.
    pub fn last(&self) -> Option<MonitorEvent> {
        lock_unpoisoned(&self.events).last().cloned()
    }

    /// Prints up to `max_events` of the most recent events on the operator
    /// channel.
    pub fn print_tail(&self, max_events: usize) {
        let events = self.snapshot(None);
        let skip = events.len().saturating_sub(max_events);
        for event in &events[skip..] {
            println!("{event}");
        }
    }

    pub fn len(&self) -> usize {
        lock_unpoisoned(&self.events).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
