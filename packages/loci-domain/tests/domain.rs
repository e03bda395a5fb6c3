use loci_config::Config;
use loci_domain::{BoundingBox, Confidence, narrow, numbers, terms, verify};

#[test]
fn numeric_safety_selects_the_matching_amount_block() {
	let cfg = Config::default();
	let cited = "Market Value: £1,950,000";
	let block_a = "the assessed Market Value of £1,950,000 as at 30 June 2025";
	let block_b = "the property is currently under offer at £2,400,000";
	let report_a = verify::verify(cited, block_a, &cfg);
	let report_b = verify::verify(cited, block_b, &cfg);

	assert!(report_a.is_match);
	assert!(!report_b.is_match);
	assert!(report_a.confidence > report_b.confidence);
}

#[test]
fn verifier_reports_matched_and_missing_terms() {
	let cfg = Config::default();
	let report =
		verify::verify("annual rent of £90,000", "the annual rent is £90,000 exclusive", &cfg);

	assert!(report.is_match);
	assert!(report.matched_terms.contains(&"annual".to_string()));
	assert!(report.matched_terms.contains(&"rent".to_string()));
	assert_eq!(report.numeric_matches, vec!["90000".to_string()]);
}

#[test]
fn currency_normalization_round_trips_through_extraction() {
	assert_eq!(
		numbers::extract_numbers("£1,950,000 or $1,950,000 or 1950000"),
		vec!["1950000".to_string()]
	);
}

#[test]
fn narrowing_a_four_line_block_returns_a_quarter_height_bbox() {
	let cfg = Config::default();
	let bbox = BoundingBox { left: 0.0, top: 0.0, width: 1.0, height: 0.8, page: 1 };
	let content = "line one\nline two\nthe figure is £1,950,000\nline four";
	let narrowed = narrow::narrow(content, bbox, "the figure is £1,950,000", &cfg);

	assert!((narrowed.height - 0.2).abs() < 1e-6);
	assert!((narrowed.top - 0.4).abs() < 1e-6);
}

#[test]
fn confidence_orders_low_medium_high() {
	assert!(Confidence::Low < Confidence::Medium);
	assert!(Confidence::Medium < Confidence::High);
}

#[test]
fn term_overlap_is_symmetric_in_content_but_quote_relative_in_ratio() {
	let full = terms::overlap_ratio("assessed market value", "market value assessed today", 3);
	let partial = terms::overlap_ratio("assessed market value today extra", "market value", 3);

	assert!(full > partial);
}
