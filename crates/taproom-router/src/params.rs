//! The parameter object handed to route handlers.

use std::collections::HashMap;
use std::str::FromStr;

use crate::error::ParamError;

/// Context for a matched route: the normalized path that matched, plus the
/// value captured at each named segment of the pattern.
///
/// Values are the literal substrings of the path; nothing is decoded or
/// coerced. Use [`RouteContext::parse`] when a handler wants a typed value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteContext {
	/// The normalized path that produced this match.
	path: String,
	/// Captured parameter values keyed by name.
	params: HashMap<String, String>,
}

impl RouteContext {
	/// Creates a new context.
	pub fn new(path: impl Into<String>, params: HashMap<String, String>) -> Self {
		Self {
			path: path.into(),
			params,
		}
	}

	/// Returns the normalized path that produced this match.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// Returns all captured parameters.
	pub fn params(&self) -> &HashMap<String, String> {
		&self.params
	}

	/// Returns the raw value captured for `name`, if any.
	pub fn param(&self, name: &str) -> Option<&str> {
		self.params.get(name).map(String::as_str)
	}

	/// Parses the value captured for `name` into `T`.
	///
	/// # Errors
	///
	/// Returns [`ParamError::Missing`] if the parameter was not captured and
	/// [`ParamError::Parse`] if the value does not parse as `T`.
	pub fn parse<T>(&self, name: &str) -> Result<T, ParamError>
	where
		T: FromStr,
		T::Err: std::fmt::Display,
	{
		let value = self
			.param(name)
			.ok_or_else(|| ParamError::Missing(name.to_string()))?;
		value.parse::<T>().map_err(|e| ParamError::Parse {
			name: name.to_string(),
			value: value.to_string(),
			ty: std::any::type_name::<T>(),
			reason: e.to_string(),
		})
	}

	/// Returns the number of captured parameters.
	pub fn len(&self) -> usize {
		self.params.len()
	}

	/// Returns whether no parameters were captured.
	pub fn is_empty(&self) -> bool {
		self.params.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn context_with(name: &str, value: &str) -> RouteContext {
		let mut params = HashMap::new();
		params.insert(name.to_string(), value.to_string());
		RouteContext::new("/beer/42", params)
	}

	#[test]
	fn test_param_access() {
		let ctx = context_with("id", "42");
		assert_eq!(ctx.path(), "/beer/42");
		assert_eq!(ctx.param("id"), Some("42"));
		assert_eq!(ctx.param("name"), None);
		assert_eq!(ctx.len(), 1);
		assert!(!ctx.is_empty());
	}

	#[test]
	fn test_parse_ok() {
		let ctx = context_with("id", "42");
		assert_eq!(ctx.parse::<usize>("id"), Ok(42));
	}

	#[test]
	fn test_parse_failure() {
		let ctx = context_with("id", "chimay");
		let err = ctx.parse::<usize>("id").unwrap_err();
		assert!(matches!(err, ParamError::Parse { .. }));
	}

	#[test]
	fn test_parse_missing() {
		let ctx = RouteContext::default();
		assert_eq!(
			ctx.parse::<usize>("id"),
			Err(ParamError::Missing("id".to_string()))
		);
	}
}
