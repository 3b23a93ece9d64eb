//! Integration tests for sonograph-cli.
//!
//! Every test drives the real binary: fixtures are written with
//! `sonograph generate`, then analyzed through the other subcommands.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Helper to get the path to the `sonograph` binary built by cargo.
fn sonograph_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_sonograph"))
}

/// Run with an explicit config so the user's own file never leaks in.
fn run(dir: &TempDir, args: &[&str]) -> Output {
    let config = config_path(dir);
    if !config.exists() {
        std::fs::write(&config, "").unwrap();
    }
    sonograph_bin()
        .arg("--config")
        .arg(&config)
        .args(args)
        .output()
        .expect("failed to run sonograph")
}

fn run_ok(dir: &TempDir, args: &[&str]) -> String {
    let output = run(dir, args);
    assert!(
        output.status.success(),
        "sonograph {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap()
}

fn config_path(dir: &TempDir) -> PathBuf {
    dir.path().join("analysis.toml")
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn generate_sine(dir: &TempDir, name: &str, extra: &[&str]) -> PathBuf {
    let path = dir.path().join(name);
    let mut args = vec!["generate", "sine", path_str(&path)];
    args.extend_from_slice(extra);
    run_ok(dir, &args);
    path
}

/// Parse CSV text into its header and numeric rows.
fn parse_csv(text: &str) -> (String, Vec<Vec<f64>>) {
    let mut lines = text.lines();
    let header = lines.next().unwrap_or_default().to_string();
    let rows = lines
        .map(|line| line.split(',').map(|v| v.parse().unwrap()).collect())
        .collect();
    (header, rows)
}

fn json(text: &str) -> serde_json::Value {
    serde_json::from_str(text).unwrap()
}

// ---------------------------------------------------------------------------
// generate / info
// ---------------------------------------------------------------------------

#[test]
fn generate_then_info() {
    let dir = TempDir::new().unwrap();
    let file = generate_sine(&dir, "tone.wav", &["--bits", "16"]);

    let stdout = run_ok(&dir, &["info", path_str(&file)]);
    assert!(stdout.contains("Sample Rate: 44100 Hz"), "got: {stdout}");
    assert!(stdout.contains("PCM 16-bit"), "got: {stdout}");
    assert!(stdout.contains("(mono)"), "got: {stdout}");

    let info = json(&run_ok(&dir, &["info", "--json", path_str(&file)]));
    assert_eq!(info["num_frames"], 44100);
    assert_eq!(info["channels"], 1);
}

#[test]
fn missing_input_fails() {
    let dir = TempDir::new().unwrap();
    let output = run(&dir, &["spectrum", "/definitely/not/here.wav"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to load"), "got: {stderr}");
}

// ---------------------------------------------------------------------------
// spectrum
// ---------------------------------------------------------------------------

#[test]
fn spectrum_peaks_at_tone() {
    let dir = TempDir::new().unwrap();
    let file = generate_sine(&dir, "tone.wav", &["--freq", "220"]);

    let stdout = run_ok(
        &dir,
        &["spectrum", path_str(&file), "--fmin", "20", "--fmax", "2000"],
    );
    let (header, rows) = parse_csv(&stdout);
    assert_eq!(header, "frequency_hz,mono");

    assert!(rows.iter().all(|r| (20.0..=2000.0).contains(&r[0])));
    assert!(rows.windows(2).all(|w| w[0][0] < w[1][0]));
    let peak = rows.iter().max_by(|a, b| a[1].total_cmp(&b[1])).unwrap();
    assert_eq!(peak[0], 220.0);
    assert_eq!(peak[1], 1.0);
}

#[test]
fn spectrum_decimation_thins_bins() {
    let dir = TempDir::new().unwrap();
    let file = generate_sine(&dir, "tone.wav", &[]);

    let full = parse_csv(&run_ok(&dir, &["spectrum", path_str(&file), "--fmax", "2000"])).1;
    let thin = parse_csv(&run_ok(
        &dir,
        &["spectrum", path_str(&file), "--fmax", "2000", "--fft-scale", "4"],
    ))
    .1;
    assert!(thin.len() < full.len() / 3);
    assert!(thin.len() > full.len() / 5);
}

#[test]
fn stereo_spectrum_has_a_column_per_channel() {
    let dir = TempDir::new().unwrap();
    let file = generate_sine(&dir, "stereo.wav", &["--freq", "300", "--right-freq", "600"]);

    let stdout = run_ok(
        &dir,
        &["spectrum", path_str(&file), "--channel", "both", "--fmax", "1000"],
    );
    let (header, rows) = parse_csv(&stdout);
    assert_eq!(header, "frequency_hz,left,right");

    let left_peak = rows.iter().max_by(|a, b| a[1].total_cmp(&b[1])).unwrap();
    let right_peak = rows.iter().max_by(|a, b| a[2].total_cmp(&b[2])).unwrap();
    assert_eq!(left_peak[0], 300.0);
    assert_eq!(right_peak[0], 600.0);
}

#[test]
fn default_band_is_clamped_for_low_sample_rates() {
    let dir = TempDir::new().unwrap();
    let file = generate_sine(&dir, "low.wav", &["--sample-rate", "16000"]);

    let (_, rows) = parse_csv(&run_ok(&dir, &["spectrum", path_str(&file)]));
    let last = rows.last().unwrap();
    assert!(last[0] <= 8000.0);
}

#[test]
fn explicit_band_beyond_nyquist_fails() {
    let dir = TempDir::new().unwrap();
    let file = generate_sine(&dir, "tone.wav", &[]);

    let output = run(&dir, &["spectrum", path_str(&file), "--fmax", "30000"]);
    assert!(!output.status.success());
}

#[test]
fn spectrum_writes_to_file() {
    let dir = TempDir::new().unwrap();
    let file = generate_sine(&dir, "tone.wav", &[]);
    let csv = dir.path().join("spectrum.csv");

    let stdout = run_ok(&dir, &["spectrum", path_str(&file), "-o", path_str(&csv)]);
    assert!(stdout.contains("Wrote"));

    let text = std::fs::read_to_string(&csv).unwrap();
    assert!(text.starts_with("frequency_hz,mono\n"));
}

// ---------------------------------------------------------------------------
// spectrogram / surface
// ---------------------------------------------------------------------------

#[test]
fn spectrogram_frame_count() {
    let dir = TempDir::new().unwrap();
    let file = generate_sine(&dir, "tone.wav", &[]);

    let stdout = run_ok(
        &dir,
        &["spectrogram", path_str(&file), "--window", "2048", "--hop", "1024"],
    );
    let (header, rows) = parse_csv(&stdout);
    assert!(header.starts_with("time_s,"));
    assert_eq!(rows.len(), (44100 - 2048) / 1024 + 1);
    assert!(rows.windows(2).all(|w| w[0][0] < w[1][0]));
    assert!((rows[0][0] - 1024.0 / 44100.0).abs() < 1e-5);
}

#[test]
fn surface_rows_cover_the_mesh() {
    let dir = TempDir::new().unwrap();
    let file = generate_sine(&dir, "short.wav", &["--duration", "0.25"]);

    let grid = parse_csv(&run_ok(
        &dir,
        &["spectrogram", path_str(&file), "--magnitude", "--fmax", "1000"],
    ));
    let mesh = parse_csv(&run_ok(
        &dir,
        &["surface", path_str(&file), "--fmax", "1000"],
    ));

    let bins = grid.0.split(',').count() - 1;
    assert_eq!(mesh.0, "time_s,frequency_hz,magnitude_db");
    assert_eq!(mesh.1.len(), grid.1.len() * bins);
}

// ---------------------------------------------------------------------------
// pitch / envelope / rms / waveform
// ---------------------------------------------------------------------------

#[test]
fn autocorrelation_pitch_tracks_tone() {
    let dir = TempDir::new().unwrap();
    let file = generate_sine(&dir, "tone.wav", &[]);

    let stdout = run_ok(
        &dir,
        &["pitch", path_str(&file), "--pitch", "autocorrelation"],
    );
    let (header, rows) = parse_csv(&stdout);
    assert_eq!(header, "time_s,f0_hz");
    assert!(!rows.is_empty());
    for row in &rows {
        assert!((row[1] - 440.0).abs() < 5.0, "f0 {}", row[1]);
    }
}

#[test]
fn instantaneous_frequency_follows_tone() {
    let dir = TempDir::new().unwrap();
    let file = generate_sine(&dir, "tone.wav", &[]);

    let stdout = run_ok(&dir, &["envelope", path_str(&file), "--frequency"]);
    let (header, rows) = parse_csv(&stdout);
    assert_eq!(header, "time_s,frequency_hz");

    let mut values: Vec<f64> = rows.iter().map(|r| r[1]).collect();
    values.sort_by(f64::total_cmp);
    let median = values[values.len() / 2];
    assert!((median - 440.0).abs() < 5.0, "median {median}");
}

#[test]
fn envelope_of_silence_is_zero() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("silence.wav");
    run_ok(
        &dir,
        &["generate", "silence", path_str(&file), "--duration", "0.5"],
    );

    let (_, rows) = parse_csv(&run_ok(&dir, &["envelope", path_str(&file)]));
    assert!(!rows.is_empty());
    assert!(rows.iter().all(|r| r[1] == 0.0));
}

#[test]
fn rms_frames_follow_overrides() {
    let dir = TempDir::new().unwrap();
    let file = generate_sine(&dir, "tone.wav", &["--amplitude", "1.0"]);

    let (header, rows) = parse_csv(&run_ok(
        &dir,
        &["rms", path_str(&file), "--frame", "4410", "--frame-hop", "4410"],
    ));
    assert_eq!(header, "time_s,rms");
    assert_eq!(rows.len(), 10);
    for row in &rows {
        assert!((row[1] - std::f64::consts::FRAC_1_SQRT_2).abs() < 0.01);
    }
}

#[test]
fn waveform_respects_preview_budget() {
    let dir = TempDir::new().unwrap();
    let file = generate_sine(&dir, "tone.wav", &[]);

    let (_, rows) = parse_csv(&run_ok(
        &dir,
        &["waveform", path_str(&file), "--preview-points", "1000"],
    ));
    // 44100 / 1000 = stride 44
    assert_eq!(rows.len(), 44100usize.div_ceil(44));
}

// ---------------------------------------------------------------------------
// metrics / report
// ---------------------------------------------------------------------------

#[test]
fn metrics_of_a_sine() {
    let dir = TempDir::new().unwrap();
    let file = generate_sine(&dir, "tone.wav", &[]);

    let metrics = json(&run_ok(
        &dir,
        &["metrics", path_str(&file), "--pitch", "autocorrelation"],
    ));
    assert_eq!(metrics["sample_rate"], 44100);
    assert_eq!(metrics["channel"], "mono");
    assert_eq!(metrics["pitch_strategy"], "autocorrelation");

    let crest = metrics["crest_factor"].as_f64().unwrap();
    assert!((crest - std::f64::consts::SQRT_2).abs() < 0.02);
    let f0 = metrics["mean_f0_hz"].as_f64().unwrap();
    assert!((f0 - 440.0).abs() < 5.0, "f0 {f0}");
    let centroid = metrics["spectral_centroid_hz"].as_f64().unwrap();
    assert!((centroid - 440.0).abs() < 50.0, "centroid {centroid}");
}

#[test]
fn metrics_of_silence_are_zero() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("silence.wav");
    run_ok(
        &dir,
        &["generate", "silence", path_str(&file), "--duration", "0.5"],
    );

    let metrics = json(&run_ok(&dir, &["metrics", path_str(&file)]));
    assert_eq!(metrics["peak"], 0.0);
    assert_eq!(metrics["rms"], 0.0);
    assert_eq!(metrics["crest_factor"], 0.0);
    assert_eq!(metrics["mean_f0_hz"], 0.0);
}

#[test]
fn report_contains_every_view() {
    let dir = TempDir::new().unwrap();
    let file = generate_sine(&dir, "tone.wav", &["--duration", "0.5"]);
    let out = dir.path().join("report.json");

    run_ok(&dir, &["report", path_str(&file), "-o", path_str(&out)]);
    let report = json(&std::fs::read_to_string(&out).unwrap());

    for key in [
        "metrics",
        "waveform",
        "spectrum",
        "spectrogram",
        "pitch",
        "envelope",
        "instantaneous_frequency",
        "rms",
    ] {
        assert!(report.get(key).is_some(), "missing {key}");
    }
    assert_eq!(report["request"]["channel"], "mono");
    assert_eq!(
        report["spectrum"]["channels"].as_array().map(Vec::len),
        Some(1)
    );
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

#[test]
fn config_init_then_show() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("nested").join("speech.toml");

    let stdout = run_ok(&dir, &["config", "init", path_str(&target)]);
    assert!(stdout.contains("Wrote default config"));
    assert!(target.is_file());

    let again = run(&dir, &["config", "init", path_str(&target)]);
    assert!(!again.status.success());
    run_ok(&dir, &["config", "init", path_str(&target), "--force"]);

    let shown = sonograph_bin()
        .args(["--config", path_str(&target), "config", "show"])
        .output()
        .unwrap();
    assert!(shown.status.success());
    let text = String::from_utf8_lossy(&shown.stdout);
    assert!(text.contains("fft_scale = 1"), "got: {text}");
    assert!(text.contains("[pitch]"), "got: {text}");
}

#[test]
fn config_file_values_apply() {
    let dir = TempDir::new().unwrap();
    let file = generate_sine(&dir, "tone.wav", &[]);
    std::fs::write(
        config_path(&dir),
        "[band]\nfmin = 100.0\nfmax = 1000.0\n",
    )
    .unwrap();

    let (_, rows) = parse_csv(&run_ok(&dir, &["spectrum", path_str(&file)]));
    assert!(rows.first().unwrap()[0] >= 100.0);
    assert!(rows.last().unwrap()[0] <= 1000.0);
}

#[test]
fn unknown_config_value_is_reported() {
    let dir = TempDir::new().unwrap();
    let file = generate_sine(&dir, "tone.wav", &[]);
    std::fs::write(config_path(&dir), "channel = \"center\"\n").unwrap();

    let output = run(&dir, &["spectrum", path_str(&file)]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown channel 'center'"), "got: {stderr}");
}

#[test]
fn config_path_reports_missing_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.toml");

    let output = sonograph_bin()
        .args(["--config", path_str(&missing), "config", "path"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("(not found)"));
}
