//! Integration tests for sonograph-analysis.
//!
//! Exercise the public pipeline end to end with synthetic signals whose
//! spectra, pitch and levels are known in advance.

use std::f32::consts::PI;

use sonograph_analysis::{
    AnalysisError, AnalysisRequest, AudioBuffer, ChannelSelection, FrameParams, FrequencyBand,
    PitchEstimator, PitchProfile, analyze, basic_spectrum, compute_metrics, crest_factor,
    estimate_pitch_by_autocorrelation, hilbert_envelope, instantaneous_frequency, sfft3d,
    sliding_rms, spectrogram, stft_db,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Sine at `freq_hz` generated with a double-precision phase.
fn sine(freq_hz: f64, sample_rate: u32, num_samples: usize, amplitude: f32) -> Vec<f32> {
    (0..num_samples)
        .map(|i| {
            let phase = 2.0 * std::f64::consts::PI * freq_hz * i as f64 / f64::from(sample_rate);
            amplitude * phase.sin() as f32
        })
        .collect()
}

fn argmax(values: &[f32]) -> usize {
    values
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(i, _)| i)
        .unwrap()
}

// ===========================================================================
// 1. Spectrum
// ===========================================================================

#[test]
fn spectrum_of_220hz_peaks_at_one() {
    let signal = sine(220.0, 44100, 44100, 1.0);
    let spectrum = basic_spectrum(&signal, 44100, FrequencyBand::new(20.0, 2000.0), 1).unwrap();

    // 1 Hz bins: 20..=2000 inclusive
    assert_eq!(spectrum.len(), 1981);
    let peak = argmax(&spectrum.magnitudes);
    assert_eq!(spectrum.frequencies[peak], 220.0);
    assert_eq!(spectrum.magnitudes[peak], 1.0);
    assert!(spectrum.magnitudes.iter().all(|&m| m <= 1.0));
}

#[test]
fn spectrum_of_440hz_within_one_bin() {
    let n = 16384;
    let signal = sine(440.0, 44100, n, 0.8);
    let spectrum = basic_spectrum(&signal, 44100, FrequencyBand::AUDIBLE, 1).unwrap();

    let bin_width = 44100.0 / n as f32;
    let (freq, mag) = spectrum.peak().unwrap();
    assert!((freq - 440.0).abs() <= bin_width, "peak at {freq}");
    assert_eq!(mag, 1.0);
}

#[test]
fn spectrum_decimation_thins_the_axis() {
    let signal = sine(220.0, 44100, 44100, 1.0);
    let band = FrequencyBand::new(20.0, 2000.0);
    let full = basic_spectrum(&signal, 44100, band, 1).unwrap();
    let thinned = basic_spectrum(&signal, 44100, band, 10).unwrap();

    // Bins 0, 10, 20, ...: the band keeps 20..=2000 in steps of 10
    assert_eq!(thinned.len(), 199);
    assert_eq!(thinned.frequencies[0], 20.0);
    assert!(thinned.len() < full.len());
    // 220 Hz is a multiple of 10 so the peak survives decimation
    assert_eq!(thinned.frequencies[argmax(&thinned.magnitudes)], 220.0);
}

// ===========================================================================
// 2. Spectrogram and surface
// ===========================================================================

#[test]
fn spectrogram_frame_count_and_band() {
    let signal = sine(1000.0, 44100, 44100, 1.0);
    let params = FrameParams::new(2048, 512);
    let grid = spectrogram(&signal, 44100, params, FrequencyBand::new(500.0, 1500.0)).unwrap();

    assert_eq!(grid.num_frames(), (44100 - 2048) / 512 + 1);
    assert!(grid.frequencies.iter().all(|&f| (500.0..=1500.0).contains(&f)));
    assert!(grid.times.windows(2).all(|w| w[1] > w[0]));
    assert!((grid.times[0] - 1024.0 / 44100.0).abs() < 1e-6);

    let peak_bin = argmax(&grid.values[grid.num_frames() / 2]);
    assert!((grid.frequencies[peak_bin] - 1000.0).abs() <= 44100.0 / 2048.0);
}

#[test]
fn surface_mesh_transposes_the_db_grid() {
    let signal = sine(300.0, 8000, 8000, 0.5);
    let params = FrameParams::new(256, 128);
    let band = FrequencyBand::new(0.0, 4000.0);
    let grid = stft_db(&signal, 8000, params, band).unwrap();
    let mesh = sfft3d(&signal, 8000, params, band).unwrap();

    assert_eq!(mesh.magnitude_db.len(), grid.num_bins());
    assert_eq!(mesh.magnitude_db[0].len(), grid.num_frames());
    assert_eq!(mesh.magnitude_db[5][3], grid.values[3][5]);
    assert_eq!(mesh.time[5][3], grid.times[3]);
    assert_eq!(mesh.frequency[5][3], grid.frequencies[5]);
}

// ===========================================================================
// 3. Pitch
// ===========================================================================

#[test]
fn both_pitch_estimators_find_440hz() {
    let signal = sine(440.0, 44100, 44100, 0.7);

    let peak = PitchEstimator::default().estimate(&signal, 44100).unwrap();
    assert!((peak.mean_f0() - 440.0).abs() <= 44100.0 / 2048.0);

    let acf = estimate_pitch_by_autocorrelation(&signal, 44100, PitchProfile::Robust).unwrap();
    let stats = acf.stats().unwrap();
    assert!((stats.mean - 440.0).abs() < 5.0, "mean {}", stats.mean);
    assert!(stats.std_dev < 5.0);
}

#[test]
fn autocorrelation_follows_a_pitch_change() {
    let mut signal = sine(200.0, 44100, 44100, 0.7);
    signal.extend(sine(400.0, 44100, 44100, 0.7));

    let series =
        estimate_pitch_by_autocorrelation(&signal, 44100, PitchProfile::Balanced).unwrap();
    let first = series.values.first().copied().unwrap();
    let last = series.values.last().copied().unwrap();
    assert!((first - 200.0).abs() < 3.0, "first {first}");
    assert!((last - 400.0).abs() < 5.0, "last {last}");
}

// ===========================================================================
// 4. Hilbert and energy
// ===========================================================================

#[test]
fn instantaneous_frequency_rescales_with_decimation() {
    let signal = sine(440.0, 44100, 44100, 1.0);
    let trace = instantaneous_frequency(&signal, 44100, Some(8000)).unwrap();
    let envelope = hilbert_envelope(&signal, 44100, Some(8000)).unwrap();

    // step = 44100 / 8000 = 5
    assert_eq!(trace.effective_sample_rate, 44100.0 / 5.0);
    assert_eq!(trace.values.len() + 1, envelope.values.len());
    assert_eq!(trace.times.len(), trace.values.len());

    let middle = &trace.values[100..trace.values.len() - 100];
    let mean = middle.iter().sum::<f32>() / middle.len() as f32;
    assert!((mean - 440.0).abs() < 2.0, "mean {mean}");
}

#[test]
fn envelope_of_am_tone_tracks_modulator() {
    let n = 8000;
    let signal: Vec<f32> = (0..n)
        .map(|i| {
            let t = i as f32 / 8000.0;
            (1.0 + 0.5 * (2.0 * PI * 4.0 * t).sin()) * (2.0 * PI * 1000.0 * t).sin()
        })
        .collect();
    let envelope = hilbert_envelope(&signal, 8000, None).unwrap();

    // Away from the edges the envelope stays within the modulation range
    for &v in &envelope.values[200..n - 200] {
        assert!((0.4..=1.6).contains(&v), "envelope {v}");
    }
}

#[test]
fn sliding_rms_of_constant_level() {
    let signal = vec![0.25; 10000];
    let env = sliding_rms(&signal, 8000, FrameParams::new(1000, 250)).unwrap();
    assert_eq!(env.values.len(), (10000 - 1000) / 250 + 1);
    assert!(env.values.iter().all(|&v| (v - 0.25).abs() < 1e-6));
}

// ===========================================================================
// 5. Degenerate input and full report
// ===========================================================================

#[test]
fn half_second_of_silence_is_not_an_error() {
    assert_eq!(crest_factor(&[0.0; 22050]), 0.0);

    for sample_rate in [8000, 16000, 22050, 44100] {
        let buffer = AudioBuffer::mono(vec![0.0; sample_rate as usize / 2], sample_rate).unwrap();
        let report = analyze(&buffer, &AnalysisRequest::for_sample_rate(sample_rate)).unwrap();

        assert_eq!(report.metrics.rms, 0.0, "{sample_rate} Hz");
        assert_eq!(report.metrics.crest_factor, 0.0);
        assert_eq!(report.metrics.mean_f0, 0.0);
        assert!(report.envelope.values.iter().all(|&v| v == 0.0));
    }
}

#[test]
fn stereo_channels_are_analyzed_separately() {
    let left = sine(300.0, 44100, 44100, 1.0);
    let right = sine(600.0, 44100, 44100, 1.0);
    let buffer = AudioBuffer::stereo(left, right, 44100).unwrap();
    let band = FrequencyBand::new(20.0, 2000.0);

    let both = analyze(
        &buffer,
        &AnalysisRequest::default()
            .with_band(band)
            .with_channel(ChannelSelection::Both),
    )
    .unwrap();
    let axis = &both.spectrum.frequencies;
    assert_eq!(axis[argmax(&both.spectrum.magnitudes[0])], 300.0);
    assert_eq!(axis[argmax(&both.spectrum.magnitudes[1])], 600.0);

    let right_only = AnalysisRequest::default()
        .with_band(band)
        .with_channel(ChannelSelection::Right);
    let metrics = compute_metrics(buffer.right(), 44100, &right_only).unwrap();
    assert!((metrics.mean_f0 - 600.0).abs() <= 44100.0 / 2048.0);
}

#[test]
fn invalid_requests_fail_before_computing() {
    let buffer = AudioBuffer::mono(vec![0.1; 4096], 44100).unwrap();

    let inverted = AnalysisRequest::default().with_band(FrequencyBand::new(2000.0, 20.0));
    assert!(matches!(
        analyze(&buffer, &inverted),
        Err(AnalysisError::InvalidBand { .. })
    ));

    let bad_hop = AnalysisRequest::default().with_stft(FrameParams::new(1024, 2048));
    assert_eq!(
        analyze(&buffer, &bad_hop).unwrap_err(),
        AnalysisError::HopExceedsWindow {
            hop: 2048,
            window: 1024
        }
    );
}
