use crate::histogram::Histogram;

/// Otsu's threshold: the level `t` maximizing the between-class variance of
/// `[0, t]` and `(t, 255]`.
///
/// The first maximum wins. An empty or single-level histogram yields the
/// lowest level that separates nothing, so `value > t` still selects every
/// brighter pixel.
pub fn otsu_threshold(hist: &Histogram) -> u8 {
    let total = hist.total();
    if total == 0 {
        return 0;
    }

    let total = total as f64;
    let weighted_total: f64 = hist
        .counts()
        .iter()
        .enumerate()
        .map(|(level, &count)| level as f64 * count as f64)
        .sum();

    let mut best_threshold = 0u8;
    let mut best_variance = 0.0f64;
    let mut weight_bg = 0.0f64;
    let mut weighted_bg = 0.0f64;

    for (level, &count) in hist.counts().iter().enumerate() {
        weight_bg += count as f64;
        if weight_bg == 0.0 {
            continue;
        }
        let weight_fg = total - weight_bg;
        if weight_fg == 0.0 {
            break;
        }

        weighted_bg += level as f64 * count as f64;
        let mean_bg = weighted_bg / weight_bg;
        let mean_fg = (weighted_total - weighted_bg) / weight_fg;
        let diff = mean_bg - mean_fg;
        let variance = weight_bg * weight_fg * diff * diff;

        if variance > best_variance {
            best_variance = variance;
            best_threshold = level as u8;
        }
    }

    best_threshold
}
