use serde::Serialize;
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Environmental impact totals estimated from item counts. All figures
/// are rough per-item factors for awareness messaging, not measurements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct ImpactEstimate {
    pub plastic_kg: f64,
    pub co2_kg: f64,
    pub landfill_l: f64,
    pub marine_lives_saved: f64,
}

struct ImpactFactors {
    plastic_kg: f64,
    co2_kg: f64,
    landfill_l: f64,
}

fn factors_for(item: &str) -> Option<ImpactFactors> {
    let f = match item.to_lowercase().as_str() {
        "bottle" => ImpactFactors {
            plastic_kg: 0.02,
            co2_kg: 0.054,
            landfill_l: 0.05,
        },
        "bag" => ImpactFactors {
            plastic_kg: 0.01,
            co2_kg: 0.027,
            landfill_l: 0.02,
        },
        "cup" => ImpactFactors {
            plastic_kg: 0.015,
            co2_kg: 0.04,
            landfill_l: 0.03,
        },
        "straw" => ImpactFactors {
            plastic_kg: 0.005,
            co2_kg: 0.01,
            landfill_l: 0.005,
        },
        _ => return None,
    };
    Some(f)
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Sum per-item factors over a mapping of item to count. Unknown items
/// contribute zero.
pub fn estimate_impacts(counts: &BTreeMap<String, i64>) -> ImpactEstimate {
    let mut plastic_kg = 0.0;
    let mut co2_kg = 0.0;
    let mut landfill_l = 0.0;
    let mut total_items: i64 = 0;

    for (item, count) in counts {
        total_items += count;
        if let Some(f) = factors_for(item) {
            plastic_kg += f.plastic_kg * *count as f64;
            co2_kg += f.co2_kg * *count as f64;
            landfill_l += f.landfill_l * *count as f64;
        }
    }

    ImpactEstimate {
        plastic_kg: round_to(plastic_kg, 3),
        co2_kg: round_to(co2_kg, 3),
        landfill_l: round_to(landfill_l, 3),
        marine_lives_saved: round_to(total_items as f64 * 0.005, 2).max(0.0),
    }
}

/// Eco-friendly replacement suggestions for a plastic item.
pub fn alternatives_for(item: &str) -> Vec<String> {
    let options: &[&str] = match item.to_lowercase().as_str() {
        "bottle" => &["Metal bottle", "Glass bottle", "Refill station"],
        "bag" => &["Cloth bag", "Jute bag", "Paper bag"],
        "cup" => &["Steel cup", "Biodegradable cup", "Bring-your-own mug"],
        "straw" => &["Steel straw", "Paper straw", "Bamboo straw"],
        _ => &["No alternative found"],
    };
    options.iter().map(|s| s.to_string()).collect()
}

/// Friendly message based on how much a user has logged so far.
pub fn nudge_message(total_items: i64, impact: &ImpactEstimate) -> String {
    if total_items >= 50 {
        format!(
            "Amazing! You've avoided ~{} kg plastic and ~{} kg CO2e. Keep leading!",
            impact.plastic_kg, impact.co2_kg
        )
    } else if total_items >= 10 {
        format!(
            "Great progress: {} items logged, approx {} kg plastic avoided. Keep going!",
            total_items, impact.plastic_kg
        )
    } else {
        "Tip: Scan via QR for quicker logging. Try refill stations to cut more plastic."
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, i64)]) -> BTreeMap<String, i64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_estimate_impacts_known_items() {
        let est = estimate_impacts(&counts(&[("bottle", 3), ("bag", 5)]));

        assert_eq!(est.plastic_kg, 0.11);
        assert_eq!(est.co2_kg, 0.297);
        assert_eq!(est.landfill_l, 0.25);
        assert_eq!(est.marine_lives_saved, 0.04);
    }

    #[test]
    fn test_estimate_impacts_unknown_items_contribute_zero() {
        let est = estimate_impacts(&counts(&[("styrofoam", 100)]));

        assert_eq!(est.plastic_kg, 0.0);
        assert_eq!(est.co2_kg, 0.0);
        assert_eq!(est.landfill_l, 0.0);
        // Unknown items still count toward the item total.
        assert_eq!(est.marine_lives_saved, 0.5);
    }

    #[test]
    fn test_estimate_impacts_empty() {
        let est = estimate_impacts(&BTreeMap::new());
        assert_eq!(est.plastic_kg, 0.0);
        assert_eq!(est.marine_lives_saved, 0.0);
    }

    #[test]
    fn test_estimate_impacts_case_insensitive() {
        let a = estimate_impacts(&counts(&[("Bottle", 2)]));
        let b = estimate_impacts(&counts(&[("bottle", 2)]));
        assert_eq!(a, b);
    }

    #[test]
    fn test_alternatives() {
        assert_eq!(
            alternatives_for("bag"),
            vec!["Cloth bag", "Jute bag", "Paper bag"]
        );
        assert_eq!(alternatives_for("styrofoam"), vec!["No alternative found"]);
    }

    #[test]
    fn test_nudge_thresholds() {
        let est = estimate_impacts(&counts(&[("bottle", 60)]));
        assert!(nudge_message(60, &est).starts_with("Amazing"));
        assert!(nudge_message(12, &est).starts_with("Great progress"));
        assert!(nudge_message(3, &est).starts_with("Tip"));
    }
}
