use std::f64::consts::PI;

use rand::Rng;

/// Substrate temperature over a day: cool at night, peaking mid-afternoon.
pub fn simulated_temperature(day_fraction: f64) -> f64 {
    let radians = (day_fraction - 0.375) * 2.0 * PI;

    24.0 + radians.sin() * 3.0
}

/// Moisture drops while the room is warm and recovers overnight.
pub fn simulated_moisture(day_fraction: f64) -> f64 {
    let radians = day_fraction * 2.0 * PI;

    if (0.3..=0.7).contains(&day_fraction) {
        (65.0 - radians.sin().max(0.0) * 8.0).round()
    } else {
        (65.0 + radians.cos().max(0.0) * 4.0).round()
    }
}

pub fn simulated_ph(day_fraction: f64) -> f64 {
    let radians = day_fraction * 2.0 * PI;

    6.75 + radians.cos() * 0.15
}

/// Adds sensor jitter of at most `amplitude` in either direction.
pub fn jitter(value: f64, amplitude: f64) -> f64 {
    if amplitude <= 0.0 {
        return value;
    }

    value + rand::rng().random_range(-amplitude..amplitude)
}
