//! Path pattern compilation and matching.
//!
//! Patterns use the route syntax of the surrounding catalog application:
//!
//! - `/beers` - literal match
//! - `/beer/:id` - named segment, captures one non-separator component
//! - `/docs/*` - trailing wildcard, matches any remaining suffix
//! - `(.*)` - bare catch-all, conventionally registered last as a fallback
//!
//! A pattern is compiled exactly once, at registration, into an anchored
//! regex; matching never mutates the pattern. Captured values are the
//! literal substrings of the candidate path, without any decoding or
//! coercion.

use std::collections::HashMap;

use crate::error::PatternError;

/// Maximum allowed length for a route pattern string in bytes.
const MAX_PATTERN_LENGTH: usize = 1024;

/// Maximum allowed number of path segments in a route pattern.
const MAX_PATH_SEGMENTS: usize = 32;

/// Maximum allowed size for a compiled pattern regex (in bytes).
const MAX_REGEX_SIZE: usize = 1 << 20; // 1 MiB

/// Spelling of the bare catch-all pattern.
const CATCH_ALL: &str = "(.*)";

/// The canonical root path.
pub const ROOT_PATH: &str = "/";

/// Normalizes a raw path for matching.
///
/// Enforces a leading separator, collapses duplicate separators, and strips
/// the trailing separator except for the root, so `/beers` and `/beers/`
/// resolve identically. An empty or whitespace-only input normalizes to the
/// root path.
pub fn normalize_path(raw: &str) -> String {
	let trimmed = raw.trim();
	let mut out = String::with_capacity(trimmed.len() + 1);
	out.push('/');
	for segment in trimmed.split('/').filter(|s| !s.is_empty()) {
		if !out.ends_with('/') {
			out.push('/');
		}
		out.push_str(segment);
	}
	out
}

/// A compiled, immutable route pattern.
#[derive(Debug, Clone)]
pub struct PathPattern {
	/// The normalized pattern string as registered.
	source: String,
	/// Anchored matcher compiled from the pattern.
	regex: regex::Regex,
	/// Parameter names in the order they appear.
	param_names: Vec<String>,
	/// Whether this is the bare catch-all spelling.
	catch_all: bool,
}

impl PathPattern {
	/// Compiles a pattern string.
	///
	/// # Errors
	///
	/// Returns [`PatternError`] if the pattern is empty, exceeds the length
	/// or segment limits, names a parameter illegally or twice, or fails
	/// regex compilation.
	pub fn new(pattern: &str) -> Result<Self, PatternError> {
		if pattern.trim().is_empty() {
			return Err(PatternError::Empty);
		}
		if pattern.len() > MAX_PATTERN_LENGTH {
			return Err(PatternError::TooLong {
				length: pattern.len(),
				limit: MAX_PATTERN_LENGTH,
			});
		}
		let segment_count = pattern.split('/').count();
		if segment_count > MAX_PATH_SEGMENTS {
			return Err(PatternError::TooManySegments {
				count: segment_count,
				limit: MAX_PATH_SEGMENTS,
			});
		}

		if pattern.trim() == CATCH_ALL {
			return Ok(Self {
				source: CATCH_ALL.to_string(),
				regex: build_regex("^.*$", pattern)?,
				param_names: Vec::new(),
				catch_all: true,
			});
		}

		let normalized = normalize_path(pattern);
		let (regex_str, param_names) = compile(&normalized, pattern)?;
		Ok(Self {
			source: normalized,
			regex: build_regex(&regex_str, pattern)?,
			param_names,
			catch_all: false,
		})
	}

	/// Returns the pattern string (normalized at registration).
	pub fn source(&self) -> &str {
		&self.source
	}

	/// Returns the parameter names in pattern order.
	pub fn param_names(&self) -> &[String] {
		&self.param_names
	}

	/// Returns whether this is the bare catch-all pattern.
	pub fn is_catch_all(&self) -> bool {
		self.catch_all
	}

	/// Checks whether a normalized path would match this pattern.
	pub fn is_match(&self, path: &str) -> bool {
		self.regex.is_match(path)
	}

	/// Attempts to match a normalized path against this pattern.
	///
	/// On success returns the mapping from parameter name to the literal
	/// substring captured at that named-segment position.
	pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
		self.regex.captures(path).map(|caps| {
			self.param_names
				.iter()
				.filter_map(|name| {
					caps.name(name)
						.map(|m| (name.clone(), m.as_str().to_string()))
				})
				.collect()
		})
	}

	/// Generates a path from this pattern with the given parameter values.
	///
	/// Returns `None` if a parameter has no value, or if the pattern is a
	/// catch-all or ends in a wildcard (such patterns are not reversible).
	pub fn reverse(&self, params: &HashMap<String, String>) -> Option<String> {
		if self.catch_all {
			return None;
		}
		let mut out = String::new();
		for segment in self.source.split('/').filter(|s| !s.is_empty()) {
			out.push('/');
			if segment == "*" {
				return None;
			}
			if let Some(rest) = segment.strip_prefix(':') {
				let name = leading_param_name(rest);
				out.push_str(params.get(name)?);
				out.push_str(&rest[name.len()..]);
			} else {
				out.push_str(segment);
			}
		}
		if out.is_empty() {
			out.push('/');
		}
		Some(out)
	}
}

impl PartialEq for PathPattern {
	fn eq(&self, other: &Self) -> bool {
		self.source == other.source
	}
}

impl Eq for PathPattern {}

impl std::fmt::Display for PathPattern {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.source)
	}
}

/// Compiles a normalized pattern into a regex string plus parameter names.
fn compile(normalized: &str, original: &str) -> Result<(String, Vec<String>), PatternError> {
	let mut regex_str = String::from("^");
	let mut param_names: Vec<String> = Vec::new();
	let segments: Vec<&str> = normalized.split('/').filter(|s| !s.is_empty()).collect();

	if segments.is_empty() {
		regex_str.push('/');
	}
	for (index, segment) in segments.iter().enumerate() {
		let last = index + 1 == segments.len();
		if *segment == "*" && last {
			// trailing wildcard: the rest of the path, possibly empty
			regex_str.push_str("(?:/.*)?");
			continue;
		}
		regex_str.push('/');
		if let Some(rest) = segment.strip_prefix(':') {
			let name = leading_param_name(rest);
			if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
				return Err(PatternError::InvalidParamName {
					pattern: original.to_string(),
				});
			}
			if param_names.iter().any(|n| n == name) {
				return Err(PatternError::DuplicateParam {
					pattern: original.to_string(),
					name: name.to_string(),
				});
			}
			param_names.push(name.to_string());
			regex_str.push_str("(?P<");
			regex_str.push_str(name);
			regex_str.push_str(">[^/]+)");
			escape_into(&mut regex_str, &rest[name.len()..]);
		} else {
			escape_into(&mut regex_str, segment);
		}
	}
	regex_str.push('$');
	Ok((regex_str, param_names))
}

/// Builds the anchored matcher with a size limit on the compiled program.
fn build_regex(expr: &str, pattern: &str) -> Result<regex::Regex, PatternError> {
	regex::RegexBuilder::new(expr)
		.size_limit(MAX_REGEX_SIZE)
		.build()
		.map_err(|e| PatternError::Regex {
			pattern: pattern.to_string(),
			reason: e.to_string(),
		})
}

/// Returns the leading run of name characters after a `:` marker.
fn leading_param_name(rest: &str) -> &str {
	let end = rest
		.char_indices()
		.find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '_'))
		.map(|(i, _)| i)
		.unwrap_or(rest.len());
	&rest[..end]
}

/// Appends a literal, escaping regex metacharacters.
fn escape_into(out: &mut String, literal: &str) {
	for c in literal.chars() {
		if matches!(
			c,
			'.' | '+' | '*' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '^' | '$' | '|' | '\\'
				| '/'
		) {
			out.push('\\');
		}
		out.push(c);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_normalize_path() {
		assert_eq!(normalize_path("/beers"), "/beers");
		assert_eq!(normalize_path("/beers/"), "/beers");
		assert_eq!(normalize_path("beers"), "/beers");
		assert_eq!(normalize_path("//beers///ale"), "/beers/ale");
		assert_eq!(normalize_path(""), "/");
		assert_eq!(normalize_path("   "), "/");
		assert_eq!(normalize_path("/"), "/");
	}

	#[test]
	fn test_literal_pattern() {
		let pattern = PathPattern::new("/beers").unwrap();
		assert!(pattern.is_match("/beers"));
		assert!(!pattern.is_match("/beers/42"));
		assert!(!pattern.is_match("/beer"));
		assert!(pattern.param_names().is_empty());
	}

	#[test]
	fn test_trailing_separator_equivalence() {
		// patterns normalize the same way candidate paths do
		let pattern = PathPattern::new("/beers/").unwrap();
		assert_eq!(pattern.source(), "/beers");
		assert!(pattern.is_match("/beers"));
	}

	#[test]
	fn test_root_pattern() {
		let pattern = PathPattern::new("/").unwrap();
		assert!(pattern.is_match("/"));
		assert!(!pattern.is_match("/beers"));
	}

	#[test]
	fn test_named_segment() {
		let pattern = PathPattern::new("/beer/:id").unwrap();
		assert_eq!(pattern.param_names(), &["id".to_string()]);

		let params = pattern.matches("/beer/42").unwrap();
		assert_eq!(params.get("id"), Some(&"42".to_string()));

		let params = pattern.matches("/beer/chimay-rouge").unwrap();
		assert_eq!(params.get("id"), Some(&"chimay-rouge".to_string()));

		assert!(pattern.matches("/beer").is_none());
		assert!(pattern.matches("/beer/42/reviews").is_none());
	}

	#[test]
	fn test_multiple_named_segments() {
		let pattern = PathPattern::new("/brewery/:brewery/beer/:beer").unwrap();
		let params = pattern.matches("/brewery/affligem/beer/tripel").unwrap();
		assert_eq!(params.get("brewery"), Some(&"affligem".to_string()));
		assert_eq!(params.get("beer"), Some(&"tripel".to_string()));
	}

	#[test]
	fn test_named_segment_with_literal_suffix() {
		let pattern = PathPattern::new("/beer/:id-details").unwrap();
		let params = pattern.matches("/beer/42-details").unwrap();
		assert_eq!(params.get("id"), Some(&"42".to_string()));
	}

	#[test]
	fn test_catch_all() {
		let pattern = PathPattern::new("(.*)").unwrap();
		assert!(pattern.is_catch_all());
		assert!(pattern.is_match("/"));
		assert!(pattern.is_match("/anything/at/all"));
		assert_eq!(pattern.matches("/unknown/path"), Some(HashMap::new()));
	}

	#[test]
	fn test_trailing_wildcard() {
		let pattern = PathPattern::new("/docs/*").unwrap();
		assert!(pattern.is_match("/docs"));
		assert!(pattern.is_match("/docs/styles/main"));
		assert!(!pattern.is_match("/beers"));
	}

	#[test]
	fn test_special_chars_escaped() {
		let pattern = PathPattern::new("/api/v1.0").unwrap();
		assert!(pattern.is_match("/api/v1.0"));
		assert!(!pattern.is_match("/api/v1X0"));
	}

	#[test]
	fn test_empty_pattern_rejected() {
		assert_eq!(PathPattern::new(""), Err(PatternError::Empty));
		assert_eq!(PathPattern::new("   "), Err(PatternError::Empty));
	}

	#[test]
	fn test_invalid_param_name_rejected() {
		assert!(matches!(
			PathPattern::new("/beer/:"),
			Err(PatternError::InvalidParamName { .. })
		));
		assert!(matches!(
			PathPattern::new("/beer/:-x"),
			Err(PatternError::InvalidParamName { .. })
		));
		assert!(matches!(
			PathPattern::new("/beer/:1st"),
			Err(PatternError::InvalidParamName { .. })
		));
	}

	#[test]
	fn test_duplicate_param_rejected() {
		assert!(matches!(
			PathPattern::new("/beer/:id/compare/:id"),
			Err(PatternError::DuplicateParam { .. })
		));
	}

	#[test]
	fn test_over_limit_patterns_rejected() {
		let long = format!("/{}", "a".repeat(MAX_PATTERN_LENGTH + 1));
		assert!(matches!(
			PathPattern::new(&long),
			Err(PatternError::TooLong { .. })
		));

		let deep = "/seg".repeat(MAX_PATH_SEGMENTS + 1);
		assert!(matches!(
			PathPattern::new(&deep),
			Err(PatternError::TooManySegments { .. })
		));
	}

	#[test]
	fn test_reverse() {
		let pattern = PathPattern::new("/beer/:id").unwrap();
		let mut params = HashMap::new();
		params.insert("id".to_string(), "42".to_string());
		assert_eq!(pattern.reverse(&params), Some("/beer/42".to_string()));

		assert_eq!(pattern.reverse(&HashMap::new()), None);
	}

	#[test]
	fn test_reverse_root_and_wildcards() {
		let root = PathPattern::new("/").unwrap();
		assert_eq!(root.reverse(&HashMap::new()), Some("/".to_string()));

		let catch_all = PathPattern::new("(.*)").unwrap();
		assert_eq!(catch_all.reverse(&HashMap::new()), None);

		let wildcard = PathPattern::new("/docs/*").unwrap();
		assert_eq!(wildcard.reverse(&HashMap::new()), None);
	}

	#[test]
	fn test_pattern_display_and_equality() {
		let p1 = PathPattern::new("/beer/:id").unwrap();
		let p2 = PathPattern::new("/beer/:id/").unwrap();
		let p3 = PathPattern::new("/beer/:name").unwrap();

		assert_eq!(format!("{}", p1), "/beer/:id");
		assert_eq!(p1, p2);
		assert_ne!(p1, p3);
	}
}
