//! Lifestyle insight engine.
//!
//! A pure mapping from a weather snapshot to bounded activity scores and
//! advisory text. No I/O and no state; given the same snapshot it always
//! produces the same insights.

use serde::{Deserialize, Serialize};

use crate::types::WeatherSnapshot;

/// Rain chance (percent) above which the umbrella alert fires.
const RAIN_ALERT_THRESHOLD: f64 = 50.0;

/// Activity scores, each clamped to 0–100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifestyleScores {
    pub laundry: u8,
    pub outdoor: u8,
    pub travel: u8,
    pub exercise: u8,
}

/// Scores plus ordered advisory strings. `alerts` are warnings, `advice` is
/// informational; the two sequences are independent of the scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifestyleInsights {
    pub scores: LifestyleScores,
    pub advice: Vec<String>,
    pub alerts: Vec<String>,
}

/// Derive lifestyle insights from a snapshot.
///
/// Advisory rules run in a fixed order, which fixes the order of the output
/// sequences. When no rule produces anything, a single fallback advice
/// entry is emitted.
pub fn compute_insights(weather: &WeatherSnapshot) -> LifestyleInsights {
    let scores = LifestyleScores {
        laundry: laundry_score(weather),
        outdoor: outdoor_score(weather),
        travel: travel_score(weather),
        exercise: exercise_score(weather),
    };

    let mut advice = Vec::new();
    let mut alerts = Vec::new();

    if weather.humidity > 80 {
        advice.push("It's quite sticky today. Stay hydrated and prefer cotton clothes.".to_string());
    }

    if weather.rain_chance > RAIN_ALERT_THRESHOLD || is_rainy(weather) {
        alerts.push("Rain expected soon. Don't forget your umbrella!".to_string());
        advice.push("Maybe a good day for indoor activities.".to_string());
    }

    if weather.temperature > 35.0 {
        alerts.push("Heatwave warning! Avoid direct sun exposure between 12 PM and 4 PM.".to_string());
    } else if weather.temperature > 30.0 {
        advice.push("Warm day ahead. Keep a water bottle handy.".to_string());
    }

    // AQI scale: 1 good, 2 fair, 3 moderate, 4 poor, 5 very poor.
    if weather.air_quality_index >= 4 {
        alerts.push("Poor air quality. Wear a mask if heading outdoors.".to_string());
        advice.push("Sensitive groups should avoid prolonged outdoor exertion.".to_string());
    } else if weather.air_quality_index == 3 {
        advice.push("Moderate air quality. Fine for most, but keep an eye out.".to_string());
    }

    if advice.is_empty() && alerts.is_empty() {
        advice.push("The weather looks pleasant! Great time for a quick walk.".to_string());
    }

    LifestyleInsights {
        scores,
        advice,
        alerts,
    }
}

/// Scoring reads the free-text condition label, not the rain probability;
/// that field only feeds the umbrella alert above.
fn is_rainy(weather: &WeatherSnapshot) -> bool {
    weather.description.to_lowercase().contains("rain")
}

fn clamp_score(score: f64) -> u8 {
    score.clamp(0.0, 100.0).round() as u8
}

fn laundry_score(w: &WeatherSnapshot) -> u8 {
    let mut score = 100.0;
    if w.humidity > 70 {
        score -= 2.0 * f64::from(w.humidity - 70);
    }
    if is_rainy(w) {
        score -= 80.0;
    }
    if w.temperature < 20.0 {
        score -= 20.0;
    }
    clamp_score(score)
}

fn outdoor_score(w: &WeatherSnapshot) -> u8 {
    let mut score = 100.0;
    if w.temperature > 35.0 {
        score -= 10.0 * (w.temperature - 35.0);
    }
    if w.temperature < 15.0 {
        score -= 5.0 * (15.0 - w.temperature);
    }
    if w.humidity > 80 {
        score -= 20.0;
    }
    if w.air_quality_index >= 4 {
        score -= 50.0;
    }
    if is_rainy(w) {
        score -= 60.0;
    }
    clamp_score(score)
}

fn travel_score(w: &WeatherSnapshot) -> u8 {
    let mut score = 100.0;
    if is_rainy(w) {
        score -= 40.0;
    }
    if w.temperature > 38.0 {
        score -= 30.0;
    }
    if w.wind_speed > 10.0 {
        score -= 20.0;
    }
    clamp_score(score)
}

fn exercise_score(w: &WeatherSnapshot) -> u8 {
    let mut score = 100.0;
    if w.air_quality_index >= 4 {
        score -= 70.0;
    }
    if w.temperature > 32.0 {
        score -= 30.0;
    }
    if w.humidity > 85 {
        score -= 20.0;
    }
    if is_rainy(w) {
        score -= 50.0;
    }
    clamp_score(score)
}
