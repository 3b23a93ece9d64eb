//! Analysis demo: spectrum, pitch, envelope and metrics of a synthetic tone.
//!
//! Run with: cargo run -p sonograph-analysis --example analysis_demo

use sonograph_analysis::{
    AnalysisRequest, AudioBuffer, FrequencyBand, PitchEstimator, PitchProfile, analyze,
};
use std::f32::consts::PI;

fn main() -> Result<(), sonograph_analysis::AnalysisError> {
    let sample_rate = 44100;

    // --- 220 Hz tone with a 3 Hz tremolo and a quiet octave ---
    let samples: Vec<f32> = (0..2 * sample_rate as usize)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            let tremolo = 0.75 + 0.25 * (2.0 * PI * 3.0 * t).sin();
            tremolo * ((2.0 * PI * 220.0 * t).sin() + 0.3 * (2.0 * PI * 440.0 * t).sin())
        })
        .collect();
    let buffer = AudioBuffer::mono(samples, sample_rate)?;

    for estimator in [
        PitchEstimator::default(),
        PitchEstimator::Autocorrelation {
            profile: PitchProfile::Robust,
        },
    ] {
        let request = AnalysisRequest::default()
            .with_band(FrequencyBand::new(20.0, 2000.0))
            .with_pitch(estimator);
        let report = analyze(&buffer, &request)?;

        println!("=== {} ===", estimator.name());
        if let Some((freq, _)) = report
            .spectrum
            .frequencies
            .iter()
            .zip(&report.spectrum.magnitudes[0])
            .max_by(|a, b| a.1.total_cmp(b.1))
        {
            println!("  Spectrum peak:     {freq:.1} Hz");
        }
        match report.pitch.stats() {
            Some(stats) => println!(
                "  Pitch:             {:.1} ± {:.1} Hz over {} frames",
                stats.mean, stats.std_dev, stats.count
            ),
            None => println!("  Pitch:             unvoiced"),
        }
        let m = report.metrics;
        println!("  RMS / peak:        {:.3} / {:.3}", m.rms, m.peak);
        println!("  Crest factor:      {:.2}", m.crest_factor);
        println!("  Centroid:          {:.1} Hz", m.spectral_centroid);
        println!("  Roll-off (85%):    {:.1} Hz", m.spectral_rolloff);
        println!(
            "  Spectrogram:       {} frames x {} bins",
            report.spectrogram.num_frames(),
            report.spectrogram.num_bins()
        );
        println!();
    }

    Ok(())
}
