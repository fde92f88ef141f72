use rustfft::num_complex::Complex32;
use rustfft::FftPlanner;

/// Default lower bound on the grid period, in pixels. Peaks corresponding to
/// shorter periods are treated as noise rather than plausible sprite spacing.
pub const MIN_PERIOD: usize = 50;

/// Finds the dominant repeating period of a density profile, in samples.
///
/// The profile is mean-centered, transformed, and the strongest spectral
/// peak is picked after two exclusion bands are zeroed: the lowest two bins
/// (periods longer than half the signal, which would report "the whole
/// signal repeats once") and every bin whose period is shorter than
/// `min_period`.
///
/// Returns `None` when no positive-magnitude peak survives the exclusions.
pub fn find_period(profile: &[f32], min_period: usize) -> Option<usize> {
    let n = profile.len();
    if n < 4 {
        return None;
    }

    let mut magnitudes = magnitude_spectrum(profile);
    magnitudes[0] = 0.0;
    magnitudes[1] = 0.0;
    if min_period > 0 {
        for (bin, magnitude) in magnitudes.iter_mut().enumerate() {
            // bin / n > 1 / min_period, kept in integers
            if bin * min_period > n {
                *magnitude = 0.0;
            }
        }
    }

    let mut peak_bin = 0;
    let mut peak_magnitude = 0.0f32;
    for (bin, &magnitude) in magnitudes.iter().enumerate() {
        if magnitude > peak_magnitude {
            peak_bin = bin;
            peak_magnitude = magnitude;
        }
    }

    if peak_bin == 0 || peak_magnitude <= 0.0 {
        return None;
    }
    Some((n as f32 / peak_bin as f32).round() as usize)
}

/// Ratio of the strongest spectral magnitude to the mean magnitude of the
/// mean-centered profile. High values indicate strong periodicity.
pub fn peak_to_mean(profile: &[f32]) -> f32 {
    if profile.len() < 2 {
        return 0.0;
    }
    let magnitudes = magnitude_spectrum(profile);
    let peak = magnitudes.iter().copied().fold(0.0f32, f32::max);
    let mean = magnitudes.iter().sum::<f32>() / magnitudes.len() as f32;
    peak / (mean + 1e-10)
}

/// Magnitudes of the non-negative-frequency half of the DFT of the
/// mean-centered profile (`n / 2 + 1` bins; bin `i` has frequency `i / n`).
fn magnitude_spectrum(profile: &[f32]) -> Vec<f32> {
    let n = profile.len();
    let mean = profile.iter().sum::<f32>() / n as f32;
    let mut buffer: Vec<Complex32> = profile
        .iter()
        .map(|&value| Complex32::new(value - mean, 0.0))
        .collect();

    FftPlanner::new().plan_fft_forward(n).process(&mut buffer);

    buffer.truncate(n / 2 + 1);
    buffer.into_iter().map(|bin| bin.norm()).collect()
}
