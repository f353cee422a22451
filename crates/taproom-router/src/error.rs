//! Error types for route registration, navigation, and parameter access.

use thiserror::Error;

/// Rejection of a route pattern at registration time.
///
/// Pattern errors are fatal: the route table refuses to build, so no
/// resolution can ever run against a malformed pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
	/// The pattern string was empty or whitespace-only.
	#[error("route pattern must not be empty")]
	Empty,
	/// The pattern exceeds the maximum allowed length.
	#[error("pattern length {length} exceeds the maximum of {limit} bytes")]
	TooLong {
		/// Length of the rejected pattern in bytes.
		length: usize,
		/// Maximum allowed length.
		limit: usize,
	},
	/// The pattern has too many path segments.
	#[error("pattern has {count} segments, exceeding the maximum of {limit}")]
	TooManySegments {
		/// Segment count of the rejected pattern.
		count: usize,
		/// Maximum allowed segment count.
		limit: usize,
	},
	/// A `:` segment carries no usable parameter name.
	#[error("invalid parameter name in pattern '{pattern}'")]
	InvalidParamName {
		/// The offending pattern string.
		pattern: String,
	},
	/// The same parameter name appears twice in one pattern.
	#[error("duplicate parameter name '{name}' in pattern '{pattern}'")]
	DuplicateParam {
		/// The offending pattern string.
		pattern: String,
		/// The repeated name.
		name: String,
	},
	/// The compiled matcher was rejected by the regex engine.
	#[error("pattern '{pattern}' failed to compile: {reason}")]
	Regex {
		/// The offending pattern string.
		pattern: String,
		/// Error message from the regex engine.
		reason: String,
	},
}

/// Error type for navigation operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
	/// The requested target cannot be normalized to a fragment path.
	///
	/// Rejected synchronously by `navigate_to`; the navigation state is
	/// left untouched.
	#[error("invalid navigation target '{0}'")]
	InvalidTarget(String),
	/// No registered route matched the path and no fallback exists.
	///
	/// Non-fatal: the previous navigation state stays current and the
	/// failure is surfaced through the navigator's failure hook.
	#[error("no route matched '{0}'")]
	Unresolved(String),
	/// Reverse lookup for a route name that was never registered.
	#[error("unknown route name '{0}'")]
	UnknownRouteName(String),
	/// Reverse lookup without a value for one of the pattern's parameters.
	#[error("missing parameter '{name}' for route '{route}'")]
	MissingParameter {
		/// Name of the route being reversed.
		route: String,
		/// The parameter that had no value.
		name: String,
	},
}

/// Error type for typed path parameter access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
	/// No parameter with that name was captured.
	#[error("missing path parameter '{0}'")]
	Missing(String),
	/// The captured value failed to parse as the requested type.
	#[error("failed to parse parameter '{name}' value '{value}' as {ty}: {reason}")]
	Parse {
		/// Parameter name.
		name: String,
		/// Raw captured value.
		value: String,
		/// Requested type name.
		ty: &'static str,
		/// Error message from parsing.
		reason: String,
	},
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_pattern_error_display() {
		assert_eq!(
			PatternError::Empty.to_string(),
			"route pattern must not be empty"
		);
		let err = PatternError::DuplicateParam {
			pattern: "/beer/:id/:id".to_string(),
			name: "id".to_string(),
		};
		assert!(err.to_string().contains("duplicate parameter name 'id'"));
	}

	#[rstest]
	fn test_navigation_error_display() {
		assert_eq!(
			NavigationError::Unresolved("/nope".to_string()).to_string(),
			"no route matched '/nope'"
		);
		assert_eq!(
			NavigationError::InvalidTarget("#x".to_string()).to_string(),
			"invalid navigation target '#x'"
		);
	}

	#[rstest]
	fn test_param_error_display() {
		let err = ParamError::Parse {
			name: "id".to_string(),
			value: "abc".to_string(),
			ty: "usize",
			reason: "invalid digit found in string".to_string(),
		};
		assert!(err.to_string().contains("'id'"));
		assert!(err.to_string().contains("abc"));
		assert!(err.to_string().contains("usize"));
	}
}
