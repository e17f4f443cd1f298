//! Importance and strength classification for detected crossovers.
//!
//! Thresholds come from [`AnalysisConfig`]; the 5%/2%/200-day defaults are
//! product conventions, not derived constants.

use crate::config::AnalysisConfig;
use crate::models::signal::{ClassifiedAlert, CrossoverEvent, Importance, Strength};

/// Classify a crossover event into its terminal alert form.
pub fn classify(event: CrossoverEvent, config: &AnalysisConfig) -> ClassifiedAlert {
    let strength = strength_for(event.separation_pct, config);
    let importance = importance_for(&event, config);
    ClassifiedAlert {
        event,
        importance,
        strength,
    }
}

/// Strength depends on separation alone, independent of horizon.
fn strength_for(separation_pct: f64, config: &AnalysisConfig) -> Strength {
    if separation_pct > config.high_separation_pct {
        Strength::Strong
    } else if separation_pct >= config.medium_separation_pct {
        Strength::Medium
    } else {
        Strength::Weak
    }
}

/// HIGH requires both a wide separation and a long-horizon pair; a wide
/// separation on a short-horizon pair ranks MEDIUM.
fn importance_for(event: &CrossoverEvent, config: &AnalysisConfig) -> Importance {
    let long_horizon = event.pair.slow_period >= config.long_horizon_threshold;
    if event.separation_pct > config.high_separation_pct && long_horizon {
        Importance::High
    } else if event.separation_pct >= config.medium_separation_pct {
        Importance::Medium
    } else {
        Importance::Low
    }
}
