//! Shared runtime state for mcn-daemon.
//!
//! Every collaborator is injected as a trait object so scenario tests can
//! drive the router with in-process fakes.

use std::sync::Arc;

use chrono::NaiveDate;
use mcn_cache::SignalCache;
use mcn_config::SimulationDefaults;
use mcn_md::PriceProvider;
use mcn_news::{NewsProvider, SentimentScorer};
use serde::{Deserialize, Serialize};

use crate::signals::SignalResolver;

/// Static build metadata included in health responses.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BuildInfo {
    pub service: &'static str,
    pub version: &'static str,
}

/// Calendar day the news signal is keyed on.
pub type Clock = fn() -> NaiveDate;

pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Handle shared across all Axum handlers (wrapped in `Arc`).
pub struct AppState {
    pub build: BuildInfo,
    pub prices: Arc<dyn PriceProvider>,
    pub signals: SignalResolver,
    pub defaults: SimulationDefaults,
    pub today: Clock,
}

impl AppState {
    pub fn new(
        prices: Arc<dyn PriceProvider>,
        news: Arc<dyn NewsProvider>,
        scorer: Arc<dyn SentimentScorer>,
        cache: Arc<dyn SignalCache>,
        defaults: SimulationDefaults,
    ) -> Self {
        Self {
            build: BuildInfo {
                service: "mcn-daemon",
                version: env!("CARGO_PKG_VERSION"),
            },
            prices,
            signals: SignalResolver::new(news, scorer, cache),
            defaults,
            today: local_today,
        }
    }

    pub fn with_clock(mut self, today: Clock) -> Self {
        self.today = today;
        self
    }
}
