//! Race strategy advisor.
//!
//! Turns the ticket grid into a narrative briefing by asking a generative
//! model, and guarantees a usable answer: any failure becomes the fixed
//! CRITICAL fallback briefing. The [`debounce`] module collapses bursts of
//! grid changes into a single advisor call.

pub mod advisor;
pub mod debounce;
pub mod prompt;
pub mod provider;

pub use advisor::{Advice, StrategyAdvisor};
pub use debounce::Debouncer;
pub use provider::{AdvisorError, GeminiProvider, MockProvider, StrategyProvider};
