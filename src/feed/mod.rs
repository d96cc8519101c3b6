//! # Quote feed
//!
//! [`QuoteFeed`] keeps an eventually fresh, sanitized copy of a remote quote
//! board. It polls its [`QuoteSource`] once on [`start`](QuoteFeed::start)
//! and then on a fixed interval until [`stop`](QuoteFeed::stop) or drop.
//!
//! ## Concurrency
//!
//! Every poll runs as a separate task, whether a timer tick or a caller
//! asked for it. Stopping the timer or dropping a `refresh` future never
//! cancels a poll already waiting on the network; its result is still
//! applied. Timer polls and [`refresh`](QuoteFeed::refresh) are not
//! serialized against each other and the last one to finish wins.
//!
//! ## Failures
//!
//! A failed poll leaves the previous quotes in place, records
//! [`FAILED_TO_FETCH`] as the snapshot's `last_error` and hands the typed
//! [`FeedError`] back to whoever asked for the poll.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError, RwLock},
    time::Duration,
};

use chrono::Local;
use tokio::{
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};

use crate::{
    crawler::{campus::quote, QuoteSource},
    declare::{FeedSnapshot, Quote},
    error::{FeedError, FeedResult},
    logging,
    util::map::{self, Keyable},
};

/// Message published in `last_error` whenever a poll fails.
pub const FAILED_TO_FETCH: &str = "Failed to fetch stock data";

/// Shortest accepted polling period.
const MIN_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Default)]
struct FeedState {
    snapshot: FeedSnapshot,
    /// Lower-cased symbol -> first quote carrying it
    index: HashMap<String, Quote>,
}

impl FeedState {
    fn replace(&mut self, quotes: Vec<Quote>) {
        self.index = map::vec_to_hashmap(&quotes);
        self.snapshot.quotes = quotes;
        self.snapshot.last_updated = Some(Local::now());
    }
}

/// The part of the feed shared with the timer and with in-flight polls.
struct Shared<S> {
    source: S,
    state: RwLock<FeedState>,
}

impl<S: QuoteSource> Shared<S> {
    fn write<R>(&self, f: impl FnOnce(&mut FeedState) -> R) -> R {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    fn read<R>(&self, f: impl FnOnce(&FeedState) -> R) -> R {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    async fn poll(&self) -> FeedResult<usize> {
        self.write(|state| state.snapshot.last_error = None);

        let outcome = self
            .source
            .fetch()
            .await
            .map(|payload| quote::sanitize(&payload));

        let result = self.write(|state| {
            let result = match outcome {
                Ok(quotes) => {
                    let count = quotes.len();
                    state.replace(quotes);
                    Ok(count)
                }
                Err(why) => {
                    state.snapshot.last_error = Some(FAILED_TO_FETCH.to_string());
                    Err(why)
                }
            };
            state.snapshot.is_loading = false;
            result
        });

        match &result {
            Ok(count) => logging::debug_file_async(format!("Published {} quotes", count)),
            Err(why) => logging::error_file_async(format!("Failed to poll quotes because {}", why)),
        }

        result
    }
}

/// Polling quote feed over any [`QuoteSource`].
pub struct QuoteFeed<S: QuoteSource + 'static> {
    shared: Arc<Shared<S>>,
    interval: Duration,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl<S: QuoteSource + 'static> QuoteFeed<S> {
    /// Builds an idle feed. Periods shorter than one second are raised to one second.
    pub fn new(source: S, interval: Duration) -> Self {
        QuoteFeed {
            shared: Arc::new(Shared {
                source,
                state: RwLock::new(FeedState::default()),
            }),
            interval: interval.max(MIN_INTERVAL),
            timer: Mutex::new(None),
        }
    }

    /// Polls right away, then once per interval.
    ///
    /// Must be called inside a tokio runtime. Fails with
    /// [`FeedError::AlreadyRunning`] while a timer is active; the running
    /// timer is left untouched.
    pub fn start(&self) -> FeedResult<()> {
        let mut timer = self.timer.lock().unwrap_or_else(PoisonError::into_inner);
        if timer.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return Err(FeedError::AlreadyRunning);
        }

        self.shared.write(|state| state.snapshot.is_loading = true);

        let shared = Arc::clone(&self.shared);
        let period = self.interval;
        *timer = Some(tokio::spawn(async move {
            let mut ticker = time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                // the first tick completes immediately
                ticker.tick().await;
                let shared = Arc::clone(&shared);
                tokio::spawn(async move {
                    let _ = shared.poll().await;
                });
            }
        }));

        logging::info_file_async(format!(
            "Quote feed started, polling every {:?} (wire schema v{})",
            period,
            quote::SCHEMA_VERSION
        ));

        Ok(())
    }

    /// Cancels the timer. Polls already in flight still complete and apply.
    pub fn stop(&self) {
        let handle = self
            .timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(handle) = handle {
            handle.abort();
            logging::info_file_async("Quote feed stopped".to_string());
        }
    }

    pub fn is_running(&self) -> bool {
        self.timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Polls immediately, outside the timer cadence, with `is_loading` set
    /// for the duration. The timer schedule is not affected.
    pub async fn refresh(&self) -> FeedResult<usize> {
        self.shared.write(|state| state.snapshot.is_loading = true);
        self.poll().await
    }

    /// One poll attempt; returns how many quotes were published.
    ///
    /// The attempt runs on its own task. Dropping the returned future stops
    /// the wait, not the poll, whose outcome is still applied.
    pub async fn poll(&self) -> FeedResult<usize> {
        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move { shared.poll().await })
            .await
            .map_err(|why| FeedError::Interrupted(why.to_string()))?
    }

    /// Case-insensitive lookup by symbol.
    pub fn lookup(&self, symbol: &str) -> Option<Quote> {
        let key = symbol.to_lowercase();
        self.shared.read(|state| state.index.get(&key).cloned())
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        self.shared.read(|state| state.snapshot.clone())
    }
}

impl<S: QuoteSource + 'static> Drop for QuoteFeed<S> {
    fn drop(&mut self) {
        self.stop();
    }
}
