//! Listening Coach · assessment backend
//!
//! Three pure engines sit at the core and never perform I/O:
//!   - `recommend`: ordered advice from a learner profile and the latest mini-test
//!   - `weakness`: keyword taxonomy over AI-written weakness descriptions
//!   - `trends`: windows, chart series and summary statistics over the test history
//!
//! Around them, an Axum HTTP service stores profiles and results in memory, caches
//! statistics per window and caches sentence translations.

pub mod config;
pub mod domain;
pub mod error;
pub mod logic;
pub mod openai;
pub mod protocol;
pub mod recommend;
pub mod routes;
pub mod state;
pub mod stats_cache;
pub mod store;
pub mod telemetry;
pub mod translation_cache;
pub mod trends;
pub mod util;
pub mod weakness;

pub use recommend::{recommend, MAX_RECOMMENDATIONS};
pub use trends::{compute_statistics, select_window, Statistics, TimeWindow};
pub use weakness::{classify_weaknesses, WeaknessCategory, WeaknessShare};
