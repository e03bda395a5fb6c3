use regex::Regex;

const NUMBER_PATTERN: &str = r"[£$€]?\d[\d,]*(?:\.\d+)?%?";

/// Canonical form of one numeric token: currency symbols, thousands separators,
/// and percent signs stripped, so "£1,950,000" and "1950000" compare equal.
pub fn normalize_number(raw: &str) -> String {
	let mut out = String::with_capacity(raw.len());

	for ch in raw.chars() {
		match ch {
			'£' | '$' | '€' | ',' | '%' => {},
			_ => out.push(ch),
		}
	}

	if let Some(stripped) = out.strip_suffix(".0") {
		return stripped.to_string();
	}

	out
}

/// All normalized numbers in `text`, deduplicated, in order of appearance.
pub fn extract_numbers(text: &str) -> Vec<String> {
	let Ok(pattern) = Regex::new(NUMBER_PATTERN) else { return Vec::new() };
	let mut out = Vec::new();

	for found in pattern.find_iter(text) {
		let normalized = normalize_number(found.as_str());

		if !out.contains(&normalized) {
			out.push(normalized);
		}
	}

	out
}

pub fn numeric_value(normalized: &str) -> Option<f64> {
	normalized.parse::<f64>().ok()
}

/// The numerically largest number in `text`. Labels like "90-day" sit next to
/// the real amount in valuation copy, so the largest candidate is primary.
pub fn largest_number(text: &str) -> Option<String> {
	extract_numbers(text)
		.into_iter()
		.filter_map(|number| numeric_value(&number).map(|value| (number, value)))
		.max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
		.map(|(number, _)| number)
}

/// Normalized numbers present in both strings, ordered by appearance in `a`.
pub fn shared_numbers(a: &str, b: &str) -> Vec<String> {
	let in_b = extract_numbers(b);

	extract_numbers(a).into_iter().filter(|number| in_b.contains(number)).collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn strips_currency_and_separators() {
		assert_eq!(normalize_number("£1,950,000"), "1950000");
		assert_eq!(normalize_number("$2,400.50"), "2400.50");
		assert_eq!(normalize_number("85%"), "85");
	}

	#[test]
	fn extracts_in_order_without_duplicates() {
		let numbers = extract_numbers("Rent of £90,000 over 90 days, i.e. £90,000 total.");

		assert_eq!(numbers, vec!["90000".to_string(), "90".to_string()]);
	}

	#[test]
	fn largest_number_prefers_the_amount_over_the_label() {
		assert_eq!(
			largest_number("90-day marketing period, Market Value £1,950,000").as_deref(),
			Some("1950000")
		);
	}

	#[test]
	fn shared_numbers_compare_normalized_forms() {
		let shared = shared_numbers("value of £1,950,000", "assessed at 1950000 as at June");

		assert_eq!(shared, vec!["1950000".to_string()]);
	}
}
