use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use loci_config::Config;

fn write_temp_config(payload: &str) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("loci_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

#[test]
fn default_config_is_valid() {
	let cfg = Config::default();

	assert!(loci_config::validate(&cfg).is_ok());
}

#[test]
fn empty_toml_yields_defaults() {
	let path = write_temp_config("");
	let result = loci_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	let cfg = result.expect("Expected empty config to load with defaults.");

	assert_eq!(cfg.scoring.exact_substring_bonus, 300);
	assert_eq!(cfg.fuzzy.min_overlap, 0.4);
	assert_eq!(cfg.orphan.min_block_words, 20);
}

#[test]
fn overrides_survive_load() {
	let path = write_temp_config(
		"\
[scoring]
numeric_match_bonus = 45

[fuzzy]
min_overlap = 0.5
",
	);
	let result = loci_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	let cfg = result.expect("Expected override config to load.");

	assert_eq!(cfg.scoring.numeric_match_bonus, 45);
	assert_eq!(cfg.fuzzy.min_overlap, 0.5);
	assert_eq!(cfg.scoring.exact_substring_bonus, 300);
}

#[test]
fn fuzzy_overlap_must_be_a_ratio() {
	let mut cfg = Config::default();

	cfg.fuzzy.min_overlap = 1.5;

	let err = loci_config::validate(&cfg).expect_err("Expected fuzzy overlap validation error.");

	assert!(
		err.to_string().contains("fuzzy.min_overlap must be in the range 0.0-1.0."),
		"Unexpected error: {err}"
	);
}

#[test]
fn fuzzy_overlap_must_be_finite() {
	let mut cfg = Config::default();

	cfg.fuzzy.min_overlap = f32::NAN;

	let err = loci_config::validate(&cfg).expect_err("Expected fuzzy overlap validation error.");

	assert!(
		err.to_string().contains("fuzzy.min_overlap must be a finite number."),
		"Unexpected error: {err}"
	);
}

#[test]
fn confidence_bonuses_must_be_ordered() {
	let mut cfg = Config::default();

	cfg.scoring.medium_confidence_bonus = cfg.scoring.high_confidence_bonus + 1;

	let err = loci_config::validate(&cfg).expect_err("Expected bonus ordering validation error.");

	assert!(
		err.to_string().contains("scoring confidence bonuses must be ordered high >= medium >= low."),
		"Unexpected error: {err}"
	);
}

#[test]
fn exact_substring_bonus_must_dominate() {
	let mut cfg = Config::default();

	cfg.scoring.exact_substring_bonus = cfg.scoring.high_confidence_bonus - 1;

	let err = loci_config::validate(&cfg).expect_err("Expected dominance validation error.");

	assert!(
		err.to_string()
			.contains("scoring.exact_substring_bonus must be at least scoring.high_confidence_bonus."),
		"Unexpected error: {err}"
	);
}

#[test]
fn strong_term_ratio_cannot_undercut_min() {
	let mut cfg = Config::default();

	cfg.verify.min_term_ratio = 0.6;
	cfg.verify.strong_term_ratio = 0.5;

	let err = loci_config::validate(&cfg).expect_err("Expected term ratio validation error.");

	assert!(
		err.to_string()
			.contains("verify.strong_term_ratio must be at least verify.min_term_ratio."),
		"Unexpected error: {err}"
	);
}

#[test]
fn weights_must_be_non_negative() {
	let mut cfg = Config::default();

	cfg.scoring.numeric_match_bonus = -1;

	let err = loci_config::validate(&cfg).expect_err("Expected weight validation error.");

	assert!(
		err.to_string().contains("scoring.numeric_match_bonus must be zero or greater."),
		"Unexpected error: {err}"
	);
}

#[test]
fn repair_context_window_must_be_positive() {
	let mut cfg = Config::default();

	cfg.repair.context_window_chars = 0;

	let err = loci_config::validate(&cfg).expect_err("Expected repair window validation error.");

	assert!(
		err.to_string().contains("repair.context_window_chars must be greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn loci_example_toml_is_valid() {
	let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));

	path.push("../../loci.example.toml");

	loci_config::load(&path).expect("Expected loci.example.toml to be a valid config.");
}
