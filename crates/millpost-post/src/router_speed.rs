//! Router dial setting interpolation
//!
//! Maps a target spindle RPM onto the continuous dial position of a router
//! whose calibration table gives the RPM at dial positions `1..=len`.
//! Between calibration points the position is linear in RPM; outside the
//! table it clamps to the first or last position.

use millpost_settings::RouterSettings;

/// Dial position for `rpm` on a calibration table
///
/// The table must hold at least two strictly increasing RPM values (checked
/// when the configuration is loaded). A table with fewer than two entries
/// yields position 1.
pub fn dial_setting(rpm: f64, table: &[f64]) -> f64 {
    debug_assert!(
        table.windows(2).all(|pair| pair[0] < pair[1]),
        "calibration table must be strictly increasing: {table:?}"
    );

    if table.len() < 2 {
        return 1.0;
    }
    let (first, last) = (table[0], table[table.len() - 1]);
    if rpm <= first {
        return 1.0;
    }
    if rpm >= last {
        return table.len() as f64;
    }

    // rpm > table[0], so the first entry >= rpm is at index 1 or later.
    let upper = table
        .iter()
        .position(|&calibrated| calibrated >= rpm)
        .unwrap_or(table.len() - 1);
    let lower = table[upper - 1];
    (rpm - lower) / (table[upper] - lower) + upper as f64
}

/// Dial position for `rpm` on the configured router, `None` when no router
/// model is selected
pub fn dial_for(router: &RouterSettings, rpm: f64) -> Option<f64> {
    router.calibration().map(|table| dial_setting(rpm, table))
}
