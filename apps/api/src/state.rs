use std::sync::Arc;

use crate::config::Config;
use crate::wardrobe::RuleBook;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Read-only rule set; every solve runs against it.
    pub rules: Arc<RuleBook>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let rules = RuleBook::builtin()
            .with_floor_plan_only(config.floor_plan_only.iter().copied())
            .with_fixed_overlap_policy(config.fixed_overlap_policy)
            .with_tall_fixed_doors(config.tall_fixed_door_housebuilders.iter().copied());

        AppState {
            rules: Arc::new(rules),
        }
    }
}
