//! Wiring between the feed, the advisor and the dashboard.

use std::time::Duration;

use tokio::runtime::Handle;
use tracing::debug;

use st_advisor::{Advice, Debouncer, StrategyAdvisor};
use st_core::types::{FeedEvent, Ticket};
use st_feed::TelemetryFeed;

use crate::app::{App, Intent};

/// Owns the running feed and advisor and funnels their output into two
/// channels the UI thread drains between frames.
pub struct Race {
    pub feed: TelemetryFeed,
    advisor: StrategyAdvisor,
    debouncer: Debouncer,
    runtime: Handle,
    events: flume::Receiver<FeedEvent>,
    advice_tx: flume::Sender<Advice>,
    advice: flume::Receiver<Advice>,
}

impl Race {
    /// Subscribe to `feed` and ask the advisor once for the opening grid.
    pub fn start(
        feed: TelemetryFeed,
        advisor: StrategyAdvisor,
        debounce: Duration,
        runtime: Handle,
    ) -> Self {
        let (tx, events) = flume::unbounded::<FeedEvent>();
        let data_tx = tx.clone();
        feed.on_data(move |tickets| {
            let _ = data_tx.send(FeedEvent::Data(tickets.to_vec()));
        });
        let log_tx = tx.clone();
        feed.on_log(move |entry| {
            let _ = log_tx.send(FeedEvent::Log(entry.clone()));
        });
        feed.on_stats(move |stats| {
            let _ = tx.send(FeedEvent::Stats(*stats));
        });

        let (advice_tx, advice) = flume::unbounded();
        let race = Self {
            debouncer: Debouncer::new(debounce, runtime.clone()),
            feed,
            advisor,
            runtime,
            events,
            advice_tx,
            advice,
        };
        race.advise_now(race.feed.tickets());
        race
    }

    /// Re-arm the advisor: only the last grid in a quiet period is sent.
    pub fn schedule_advice(&self, tickets: Vec<Ticket>) {
        self.debouncer.trigger(self.consult(tickets));
    }

    /// Ask the advisor right away, dropping any pending debounced call.
    pub fn advise_now(&self, tickets: Vec<Ticket>) {
        self.debouncer.cancel();
        self.runtime.spawn(self.consult(tickets));
    }

    fn consult(&self, tickets: Vec<Ticket>) -> impl std::future::Future<Output = ()> + Send + 'static {
        let advisor = self.advisor.clone();
        let tx = self.advice_tx.clone();
        async move {
            let advice = advisor.advise(&tickets).await;
            let _ = tx.send(advice);
        }
    }

    /// Carry out something the dashboard asked for.
    pub fn handle(&self, intent: Intent, app: &App) {
        debug!(?intent, "dashboard intent");
        match intent {
            Intent::Connect => self.feed.connect(),
            Intent::Disconnect => self.feed.disconnect(),
            Intent::RetryAdvisor => self.advise_now(app.tickets.clone()),
        }
    }

    /// Apply everything queued since the last call. `observe` sees each
    /// feed event and each advice before the dashboard does.
    pub fn drain(&self, app: &mut App, mut observe: impl FnMut(Drained<'_>)) {
        while let Ok(event) = self.events.try_recv() {
            observe(Drained::Feed(&event));
            if app.apply_event(event) {
                self.schedule_advice(app.tickets.clone());
            }
        }
        while let Ok(advice) = self.advice.try_recv() {
            observe(Drained::Advice(&advice));
            app.apply_advice(advice);
        }
    }
}

/// One item taken off a [`Race`] channel.
pub enum Drained<'a> {
    Feed(&'a FeedEvent),
    Advice(&'a Advice),
}
