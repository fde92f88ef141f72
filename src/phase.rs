/// Half-width of the density window summed around each candidate grid line.
const LINE_WINDOW: usize = 3;

/// Finds the phase offset in `[0, period)` whose grid lines fall on the
/// lowest-density positions of the profile.
///
/// For every candidate offset the foreground density is summed in a
/// ±[`LINE_WINDOW`] window around each line position `offset + k * period`;
/// the offset with the minimum total wins. True grid lines sit in the gaps
/// between sprites, where density is locally minimal.
pub fn find_offset(profile: &[f32], period: usize) -> usize {
    if period == 0 {
        return 0;
    }

    let mut best_offset = 0;
    let mut best_score = f32::INFINITY;
    for offset in 0..period {
        let mut score = 0.0f32;
        let mut position = offset;
        while position < profile.len() {
            let lo = position.saturating_sub(LINE_WINDOW);
            let hi = (position + LINE_WINDOW + 1).min(profile.len());
            score += profile[lo..hi].iter().sum::<f32>();
            position += period;
        }
        if score < best_score {
            best_score = score;
            best_offset = offset;
        }
    }
    best_offset
}
