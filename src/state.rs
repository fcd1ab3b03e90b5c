//! Application state: in-memory stores, caches, prompts and the optional OpenAI client.
//!
//! This module owns:
//!   - the profile/result store
//!   - the per-window statistics cache
//!   - the sentence translation cache
//!   - service settings and prompts (from TOML or defaults)

use tracing::{info, instrument};

use crate::config::{load_config_from_env, Prompts, ServiceConfig, ServiceSettings};
use crate::openai::OpenAI;
use crate::stats_cache::StatsCache;
use crate::store::AssessmentStore;
use crate::translation_cache::TranslationCache;

#[derive(Clone)]
pub struct AppState {
    pub store: AssessmentStore,
    pub stats_cache: StatsCache,
    pub translations: TranslationCache,
    pub openai: Option<OpenAI>,
    pub settings: ServiceSettings,
    pub prompts: Prompts,
}

impl AppState {
    /// Build state from env: load config, init OpenAI.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let openai = OpenAI::from_env();
        if let Some(oa) = &openai {
            info!(target: "listening_coach", base_url = %oa.base_url, fast_model = %oa.fast_model, "OpenAI enabled.");
        } else {
            info!(target: "listening_coach", "OpenAI disabled (no OPENAI_API_KEY). Translation endpoint unavailable.");
        }
        Self::with_config(load_config_from_env(), openai)
    }

    /// Build state from an explicit config. Used by `new` and by tests.
    pub fn with_config(cfg: ServiceConfig, openai: Option<OpenAI>) -> Self {
        info!(
            target: "listening_coach",
            default_results_limit = cfg.service.default_results_limit,
            stats_cache_max_age_secs = cfg.service.stats_cache_max_age_secs,
            "Service settings"
        );
        Self {
            store: AssessmentStore::new(),
            stats_cache: StatsCache::new(cfg.service.stats_cache_max_age_secs),
            translations: TranslationCache::new(),
            openai,
            settings: cfg.service,
            prompts: cfg.prompts,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_config(ServiceConfig::default(), None)
    }
}
