//! End-to-end tests for the fingerprint pipeline
//!
//! Tests cover:
//! - Spectrogram shape and frame partitioning
//! - Silence, stationary tones, and paired onsets
//! - Token invariants and determinism on noisy input
//! - Configuration and empty-signal errors

use anchorprint_fingerprint::{
    AnchorConfig, AudioSignal, FingerprintConfig, FingerprintError, Fingerprinter, PeakConfig,
    Signal, SpectrogramConfig, SuppressionTracker,
};
use anchorprint_test_utils::{silence, SignalBuilder, PCM_AMPLITUDE};
use assert_matches::assert_matches;
use rstest::rstest;

const SAMPLE_RATE: u32 = 44100;
const WINDOW: usize = 1024;

fn fingerprinter() -> Fingerprinter {
    Fingerprinter::new(FingerprintConfig::default()).unwrap()
}

/// Column holding FFT coefficient `bin` for the default 256-band layout
fn column_for_bin(bin: usize) -> usize {
    256 - bin / 2 - 1
}

fn noisy_music(seed: u64) -> AudioSignal {
    SignalBuilder::new(SAMPLE_RATE)
        .frames(WINDOW, 24)
        .tone_at_bin_in(100, WINDOW, PCM_AMPLITUDE, 0..6 * WINDOW)
        .tone_at_bin_in(140, WINDOW, PCM_AMPLITUDE * 0.8, 3 * WINDOW..12 * WINDOW)
        .tone_at_bin_in(60, WINDOW, PCM_AMPLITUDE * 0.6, 8 * WINDOW..20 * WINDOW)
        .tone_at_bin_in(220, WINDOW, PCM_AMPLITUDE, 15 * WINDOW..24 * WINDOW)
        .noise(seed, 300.0)
        .build("noisy")
}

// =============================================================================
// Spectrogram shape
// =============================================================================

#[rstest]
#[case(4096, 1024, 2, 4, 256)]
#[case(5119, 1024, 2, 4, 256)]
#[case(5120, 1024, 2, 5, 256)]
#[case(3000, 512, 4, 5, 64)]
#[case(100, 2, 1, 50, 1)]
fn test_grid_dimensions(
    #[case] samples: usize,
    #[case] window_size: usize,
    #[case] bin_size: usize,
    #[case] frames: usize,
    #[case] bands: usize,
) {
    let config = FingerprintConfig {
        spectrogram: SpectrogramConfig::new(window_size, bin_size),
        ..Default::default()
    };
    let signal = AudioSignal::new(silence(samples), SAMPLE_RATE, "shape");
    let grid = Fingerprinter::new(config).unwrap().spectrogram(&signal).unwrap();
    assert_eq!(grid.shape(), (frames, bands));
}

#[test]
fn test_trailing_samples_do_not_change_grid() {
    let exact = SignalBuilder::new(SAMPLE_RATE)
        .frames(WINDOW, 3)
        .tone_at_bin(100, WINDOW, PCM_AMPLITUDE)
        .build("exact");
    let mut padded_samples = exact.samples().to_vec();
    padded_samples.extend(std::iter::repeat(12_345.0).take(WINDOW - 1));
    let padded = AudioSignal::new(padded_samples, SAMPLE_RATE, "padded");

    let fingerprinter = fingerprinter();
    assert_eq!(
        fingerprinter.spectrogram(&exact).unwrap(),
        fingerprinter.spectrogram(&padded).unwrap()
    );
}

// =============================================================================
// Scenarios
// =============================================================================

#[test_log::test]
fn test_silence_yields_no_tokens() {
    let signal = AudioSignal::new(silence(4096), SAMPLE_RATE, "silence");
    let fingerprinter = fingerprinter();

    let grid = fingerprinter.spectrogram(&signal).unwrap();
    assert_eq!(grid.frames(), 4);
    assert!(grid.rows().all(|row| row.iter().all(|&m| m == 0.0)));

    let series = fingerprinter.fingerprints(&signal).unwrap();
    assert_eq!(series.len(), 4);
    assert!(series.iter().all(|frame| frame.peaks.is_empty()));

    assert!(fingerprinter.tokens(&signal).unwrap().is_empty());
}

#[test_log::test]
fn test_stationary_tone_is_suppressed_after_onset() {
    let signal = SignalBuilder::new(SAMPLE_RATE)
        .frames(WINDOW, 8)
        .tone_at_bin(100, WINDOW, PCM_AMPLITUDE)
        .build("tone");
    let fingerprinter = fingerprinter();
    let band = column_for_bin(100);

    let series = fingerprinter.fingerprints(&signal).unwrap();
    assert_eq!(series.get(0).unwrap().peaks.as_slice(), &[band]);

    let grid = fingerprinter.spectrogram(&signal).unwrap();
    let mut tracker = SuppressionTracker::new(grid.bands(), &PeakConfig::default());
    let unsuppressed = tracker.biased(grid.frame(1))[band];
    tracker.process_frame(grid.frame(0));
    let suppressed = tracker.biased(grid.frame(1))[band];

    assert!(
        suppressed < unsuppressed,
        "suppressed {} should be below unsuppressed {}",
        suppressed,
        unsuppressed
    );
    assert!(suppressed < grid.frame(1)[band]);
}

#[test_log::test]
fn test_stationary_tone_pairs_with_itself() {
    let signal = SignalBuilder::new(SAMPLE_RATE)
        .frames(WINDOW, 8)
        .tone_at_bin(100, WINDOW, PCM_AMPLITUDE)
        .build("tone");
    let band = column_for_bin(100);

    let tokens = fingerprinter().tokens(&signal).unwrap();
    // Frames 0-3 see four later frames, then 3, 2, 1, 0
    assert_eq!(tokens.len(), 4 * 4 + 3 + 2 + 1);
    assert!(tokens
        .iter()
        .all(|t| t.anchor_band == band && t.target_band == band));
}

#[test_log::test]
fn test_two_onsets_two_frames_apart() {
    let signal = SignalBuilder::new(SAMPLE_RATE)
        .frames(WINDOW, 5)
        .tone_at_bin_in(100, WINDOW, PCM_AMPLITUDE, 0..WINDOW)
        .tone_at_bin_in(110, WINDOW, PCM_AMPLITUDE, 2 * WINDOW..3 * WINDOW)
        .build("onsets");

    let tokens = fingerprinter().tokens(&signal).unwrap();
    assert_eq!(tokens.len(), 1);

    let token = &tokens[0];
    assert_eq!(token.anchor_band, column_for_bin(100));
    assert_eq!(token.target_band, column_for_bin(110));
    assert_eq!(token.frame_delta, 2);
    assert_eq!(token.anchor_time_seconds, 0.0);
    assert_eq!(token.source_id, "onsets");
}

#[test]
fn test_onsets_too_far_apart_in_band_do_not_pair() {
    let signal = SignalBuilder::new(SAMPLE_RATE)
        .frames(WINDOW, 5)
        .tone_at_bin_in(100, WINDOW, PCM_AMPLITUDE, 0..WINDOW)
        .tone_at_bin_in(160, WINDOW, PCM_AMPLITUDE, 2 * WINDOW..3 * WINDOW)
        .build("far");

    assert!(fingerprinter().tokens(&signal).unwrap().is_empty());
}

#[test]
fn test_anchor_times_follow_frames() {
    let signal = SignalBuilder::new(SAMPLE_RATE)
        .frames(WINDOW, 6)
        .tone_at_bin_in(100, WINDOW, PCM_AMPLITUDE, 3 * WINDOW..4 * WINDOW)
        .tone_at_bin_in(104, WINDOW, PCM_AMPLITUDE, 4 * WINDOW..5 * WINDOW)
        .build("late");

    let tokens = fingerprinter().tokens(&signal).unwrap();
    assert_eq!(tokens.len(), 1);
    let expected = 3.0 * WINDOW as f64 / SAMPLE_RATE as f64;
    assert!((tokens[0].anchor_time_seconds - expected).abs() < 1e-12);
}

// =============================================================================
// Invariants on noisy input
// =============================================================================

#[rstest]
#[case(1)]
#[case(42)]
#[case(9001)]
fn test_token_invariants_hold(#[case] seed: u64) {
    let signal = noisy_music(seed);
    let fingerprinter = fingerprinter();

    let series = fingerprinter.fingerprints(&signal).unwrap();
    assert!(series.iter().all(|frame| frame.peaks.len() <= 5));
    assert!(series.peak_count() > 0);

    let tokens = fingerprinter.tokens(&signal).unwrap();
    assert!(!tokens.is_empty());
    for token in &tokens {
        assert!((1..=4).contains(&token.frame_delta), "{:?}", token);
        assert!(token.anchor_band.abs_diff(token.target_band) <= 8, "{:?}", token);
        let anchor_frame = (token.anchor_time_seconds * SAMPLE_RATE as f64 / WINDOW as f64).round() as usize;
        assert!(series.get(anchor_frame).unwrap().peaks.contains(token.anchor_band));
        assert!(series
            .get(anchor_frame + token.frame_delta)
            .unwrap()
            .peaks
            .contains(token.target_band));
    }
}

#[test]
fn test_tokens_are_deterministic() {
    let fingerprinter = fingerprinter();
    let first = fingerprinter.tokens(&noisy_music(7)).unwrap();
    let second = fingerprinter.tokens(&noisy_music(7)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_tokens_ordered_by_anchor_time() {
    let tokens = fingerprinter().tokens(&noisy_music(3)).unwrap();
    assert!(tokens
        .windows(2)
        .all(|pair| pair[0].anchor_time_seconds <= pair[1].anchor_time_seconds));
}

#[test]
fn test_custom_zone_bounds_frame_delta() {
    let config = FingerprintConfig {
        anchors: AnchorConfig {
            left_offset: 2,
            width: 2,
            height: 6,
        },
        ..Default::default()
    };
    let tokens = Fingerprinter::new(config)
        .unwrap()
        .tokens(&noisy_music(11))
        .unwrap();
    for token in &tokens {
        assert!((2..=3).contains(&token.frame_delta));
        assert!(token.anchor_band.abs_diff(token.target_band) <= 3);
    }
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_short_signal_is_empty_signal_error() {
    let signal = AudioSignal::new(silence(WINDOW - 1), SAMPLE_RATE, "short");
    let result = fingerprinter().tokens(&signal);
    assert_matches!(
        result,
        Err(FingerprintError::EmptySignal { samples, window_size: WINDOW }) if samples == WINDOW - 1
    );
}

#[rstest]
#[case(SpectrogramConfig::new(1023, 2))]
#[case(SpectrogramConfig::new(0, 2))]
#[case(SpectrogramConfig::new(1024, 0))]
#[case(SpectrogramConfig::new(1024, 1024))]
fn test_invalid_spectrogram_config(#[case] spectrogram: SpectrogramConfig) {
    let config = FingerprintConfig {
        spectrogram,
        ..Default::default()
    };
    let err = Fingerprinter::new(config).err().unwrap();
    assert!(err.is_fatal_configuration());
}

#[test]
fn test_zero_sample_rate_is_configuration_error() {
    let signal = AudioSignal::new(silence(4096), 0, "broken");
    let err = fingerprinter().tokens(&signal).unwrap_err();
    assert!(err.is_fatal_configuration());
}
