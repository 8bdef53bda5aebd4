use approx::assert_relative_eq;
use specpick_algorithms::{find_peaks, LocalMaximaDetector, PeakConfig, PeakDetection};
use specpick_core::signal::FrameSignal;

/// Deterministic pseudo-random signal (xorshift), no external RNG needed.
fn noisy_signal(len: usize, seed: u64) -> Vec<f64> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            #[allow(clippy::cast_precision_loss)]
            let value = (state % 1000) as f64 / 100.0;
            value - 2.0
        })
        .collect()
}

#[test]
fn test_detect_is_deterministic() {
    for seed in [1_u64, 7, 42, 1_234_567] {
        let intensities = noisy_signal(500, seed);
        let wavelengths: Vec<f64> = (0..500_i32).map(|i| 400.0 + f64::from(i) * 0.5).collect();
        let signal = FrameSignal::new(1, wavelengths, intensities).unwrap();

        for min_height in [0.0, 1.5, -10.0] {
            let config = PeakConfig::new().with_min_height(min_height);
            let first = LocalMaximaDetector.detect(&signal, &config);
            let second = LocalMaximaDetector.detect(&signal, &config);
            assert_eq!(first, second, "seed {seed}, min_height {min_height}");
        }
    }
}

#[test]
fn test_indices_strictly_increasing_and_valid() {
    let y = noisy_signal(1000, 99);
    let peaks = find_peaks(&y, 0.0);
    assert!(!peaks.is_empty());
    assert!(peaks.windows(2).all(|w| w[0] < w[1]));
    for &i in &peaks {
        assert!(i > 0 && i < y.len() - 1, "boundary sample {i} reported");
        assert!(y[i] > y[i - 1] && y[i] > y[i + 1]);
        assert!(y[i] >= 0.0);
    }
}

#[test]
fn test_peaks_at_known_wavelengths() {
    let wavelengths = vec![490.0, 500.0, 510.0, 520.0, 530.0, 540.0, 550.0];
    let intensities = vec![0.0, 5.0, 1.0, 8.0, 1.0, 6.0, 0.0];
    let signal = FrameSignal::new(1, wavelengths, intensities).unwrap();

    let peaks = LocalMaximaDetector.detect(&signal, &PeakConfig::default());
    assert_eq!(peaks.len(), 3);
    for (&index, expected) in peaks.iter().zip([500.0, 520.0, 540.0]) {
        assert_relative_eq!(signal.wavelengths()[index], expected);
    }
}
