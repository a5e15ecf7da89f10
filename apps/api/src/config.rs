use anyhow::{anyhow, Context, Result};

use crate::wardrobe::{Housebuilder, OverlapPolicy, Vocabulary};

/// Application configuration loaded from environment variables.
/// Every variable has a default; invalid values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Housebuilders whose openings are sized from their own floor plan.
    pub floor_plan_only: Vec<Housebuilder>,
    pub fixed_overlap_policy: OverlapPolicy,
    /// Housebuilders fitted with the taller fixed-size door.
    pub tall_fixed_door_housebuilders: Vec<Housebuilder>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            floor_plan_only: parse_housebuilders(&env_or("FLOOR_PLAN_ONLY_HOUSEBUILDERS", "Bloor"))
                .context("FLOOR_PLAN_ONLY_HOUSEBUILDERS must list known housebuilders")?,
            fixed_overlap_policy: env_or("FIXED_OVERLAP_POLICY", "per_style")
                .parse::<OverlapPolicy>()
                .map_err(|e| anyhow!(e))
                .context("FIXED_OVERLAP_POLICY is invalid")?,
            tall_fixed_door_housebuilders: parse_housebuilders(&env_or("TALL_FIXED_DOOR_HOUSEBUILDERS", ""))
                .context("TALL_FIXED_DOOR_HOUSEBUILDERS must list known housebuilders")?,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Comma-separated housebuilder labels. Unknown labels are rejected rather than
/// defaulted so a typo cannot silently switch sizing back on.
fn parse_housebuilders(raw: &str) -> Result<Vec<Housebuilder>> {
    raw.split(',')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(|label| {
            Housebuilder::from_label(label).ok_or_else(|| anyhow!("unknown housebuilder '{label}'"))
        })
        .collect()
}
