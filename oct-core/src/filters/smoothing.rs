//! Smoothing filters for noisy spectrometer traces

use num_complex::Complex;
use rustfft::FftPlanner;

/// Moving average by same-length convolution with a box kernel.
///
/// The ends see an implicitly zero-padded signal, so edge samples are
/// attenuated rather than renormalized.
pub fn moving_average(signal: &[f64], filter_size: usize) -> Vec<f64> {
    let n = signal.len();
    if n == 0 || filter_size <= 1 {
        return signal.to_vec();
    }
    let upper = (filter_size - 1) / 2;
    let lower = filter_size - 1 - upper;
    let weight = 1.0 / filter_size as f64;

    (0..n)
        .map(|i| {
            let start = i.saturating_sub(lower);
            let end = (i + upper).min(n - 1);
            signal[start..=end].iter().sum::<f64>() * weight
        })
        .collect()
}

/// Sliding-window median filter with edge clamping.
pub fn median(signal: &[f64], filter_size: usize) -> Vec<f64> {
    let n = signal.len();
    if n == 0 || filter_size <= 1 {
        return signal.to_vec();
    }
    let half = filter_size / 2;

    (0..n)
        .map(|i| {
            let mut window: Vec<f64> = (0..filter_size)
                .map(|j| {
                    // Out-of-bounds positions clamp to the nearest edge sample.
                    let idx = (i + j).saturating_sub(half).min(n - 1);
                    signal[idx]
                })
                .collect();
            window.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            if filter_size % 2 == 1 {
                window[half]
            } else {
                0.5 * (window[half - 1] + window[half])
            }
        })
        .collect()
}

/// Digital low-pass filter.
///
/// Keeps FFT bins up to `cutoff` (one-sided), doubles them to compensate
/// for the dropped conjugate half (DC excepted), and reconstructs the
/// real signal.
pub fn low_pass(signal: &[f64], cutoff: usize) -> Vec<f64> {
    let n = signal.len();
    if n == 0 {
        return Vec::new();
    }
    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n);
    let ifft = planner.plan_fft_inverse(n);

    let mut buf: Vec<Complex<f64>> = signal.iter().map(|&v| Complex::new(v, 0.0)).collect();
    fft.process(&mut buf);

    let scale = 2.0 / n as f64;
    for (k, c) in buf.iter_mut().enumerate() {
        *c = if k > cutoff {
            Complex::new(0.0, 0.0)
        } else if k == 0 {
            *c * (scale / 2.0)
        } else {
            *c * scale
        };
    }

    // rustfft leaves the inverse unscaled by 1/n; the one-sided
    // reconstruction needs exactly that factor, so no rescale here.
    ifft.process(&mut buf);
    buf.iter().map(|c| c.re).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_moving_average_flattens_interior() {
        let signal = vec![1.0; 50];
        let smoothed = moving_average(&signal, 5);

        assert_eq!(smoothed.len(), 50);
        for &v in &smoothed[2..48] {
            assert!((v - 1.0).abs() < 1e-12);
        }
        // Zero padding attenuates the first sample: 3 of 5 taps covered.
        assert!((smoothed[0] - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_moving_average_reduces_noise() {
        let noisy: Vec<f64> = (0..200)
            .map(|i| 1.0 + 0.5 * if i % 2 == 0 { 1.0 } else { -1.0 })
            .collect();
        let smoothed = moving_average(&noisy, 11);
        for &v in &smoothed[10..190] {
            assert!((v - 1.0).abs() < 0.06);
        }
    }

    #[test]
    fn test_median_removes_spike() {
        let mut signal = vec![2.0; 30];
        signal[15] = 100.0;
        let filtered = median(&signal, 5);
        assert!(filtered.iter().all(|&v| (v - 2.0).abs() < 1e-12));
    }

    #[test]
    fn test_median_even_window_averages() {
        let signal = vec![1.0, 3.0, 2.0, 4.0, 3.0, 5.0];
        let filtered = median(&signal, 4);
        assert_eq!(filtered.len(), 6);
        // Interior window around i=2 is [1,3,2,4]; median = (2+3)/2.
        assert!((filtered[2] - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_low_pass_keeps_dc() {
        let n = 128;
        let signal: Vec<f64> = (0..n)
            .map(|i| 3.0 + (2.0 * PI * 20.0 * i as f64 / n as f64).sin())
            .collect();

        // Cutoff below the sine bin leaves only the DC level.
        let filtered = low_pass(&signal, 2);
        for &v in &filtered {
            assert!((v - 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_low_pass_passband_transparent() {
        let n = 128;
        let signal: Vec<f64> = (0..n)
            .map(|i| 1.0 + (2.0 * PI * 5.0 * i as f64 / n as f64).sin())
            .collect();

        // Cutoff above the sine bin reconstructs the signal.
        let filtered = low_pass(&signal, 10);
        for (a, b) in filtered.iter().zip(signal.iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }
}
