//! Ordered route registry and first-match resolution.
//!
//! A [`RouteTable`] is built once, at startup, from the application's
//! declarative route list and is immutable afterwards. Resolution walks the
//! entries in registration order and returns the first structural match, so
//! a catch-all entry belongs last.

use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

use crate::error::{NavigationError, PatternError};
use crate::handler::RouteHandler;
use crate::params::RouteContext;
use crate::pattern::{PathPattern, normalize_path};

/// A single route: a compiled pattern paired with the handler to invoke.
pub struct Route<V> {
	/// The path pattern.
	pattern: PathPattern,
	/// Optional route name for reverse lookups.
	name: Option<String>,
	/// The route handler.
	handler: Rc<dyn RouteHandler<V>>,
}

impl<V> Clone for Route<V> {
	fn clone(&self) -> Self {
		Self {
			pattern: self.pattern.clone(),
			name: self.name.clone(),
			handler: Rc::clone(&self.handler),
		}
	}
}

impl<V> std::fmt::Debug for Route<V> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Route")
			.field("pattern", &self.pattern)
			.field("name", &self.name)
			.finish()
	}
}

impl<V: 'static> Route<V> {
	/// Creates a route from a pattern and a handler closure.
	///
	/// # Errors
	///
	/// Returns [`PatternError`] if the pattern does not compile.
	pub fn new<F>(pattern: &str, handler: F) -> Result<Self, PatternError>
	where
		F: Fn(&RouteContext) -> V + 'static,
	{
		Self::from_handler(pattern, Rc::new(handler))
	}

	/// Creates a named route, usable for reverse URL generation.
	///
	/// # Errors
	///
	/// Returns [`PatternError`] if the pattern does not compile.
	pub fn named<F>(name: impl Into<String>, pattern: &str, handler: F) -> Result<Self, PatternError>
	where
		F: Fn(&RouteContext) -> V + 'static,
	{
		let mut route = Self::from_handler(pattern, Rc::new(handler))?;
		route.name = Some(name.into());
		Ok(route)
	}

	/// Creates a route from an already-built handler, which may be shared
	/// between several entries.
	///
	/// # Errors
	///
	/// Returns [`PatternError`] if the pattern does not compile.
	pub fn from_handler(
		pattern: &str,
		handler: Rc<dyn RouteHandler<V>>,
	) -> Result<Self, PatternError> {
		Ok(Self {
			pattern: PathPattern::new(pattern)?,
			name: None,
			handler,
		})
	}

	/// Returns the route name.
	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	/// Returns the pattern.
	pub fn pattern(&self) -> &PathPattern {
		&self.pattern
	}

	/// Invokes the handler.
	pub fn handle(&self, ctx: &RouteContext) -> V {
		self.handler.handle(ctx)
	}
}

/// A successful resolution: the matched route plus captured parameters.
#[derive(Debug, Clone)]
pub struct RouteMatch<V> {
	route: Route<V>,
	params: HashMap<String, String>,
	path: String,
}

impl<V: 'static> RouteMatch<V> {
	/// Returns the matched route.
	pub fn route(&self) -> &Route<V> {
		&self.route
	}

	/// Returns the captured parameters.
	pub fn params(&self) -> &HashMap<String, String> {
		&self.params
	}

	/// Returns the normalized path that produced this match.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// Invokes the matched handler with this match's context.
	pub fn render(&self) -> V {
		self.route
			.handle(&RouteContext::new(self.path.clone(), self.params.clone()))
	}
}

/// The ordered route registry.
pub struct RouteTable<V> {
	/// Registered routes, in registration order.
	routes: Vec<Route<V>>,
	/// Named routes for reverse lookups.
	named: HashMap<String, usize>,
}

impl<V> std::fmt::Debug for RouteTable<V> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouteTable")
			.field("routes_count", &self.routes.len())
			.field("named", &self.named.keys().collect::<Vec<_>>())
			.finish()
	}
}

impl<V: 'static> RouteTable<V> {
	/// Starts a builder collecting routes in registration order.
	pub fn builder() -> RouteTableBuilder<V> {
		RouteTableBuilder::default()
	}

	/// Builds a table from already-compiled routes.
	pub fn new(routes: Vec<Route<V>>) -> Self {
		let named = routes
			.iter()
			.enumerate()
			.filter_map(|(index, route)| route.name().map(|name| (name.to_string(), index)))
			.collect();
		Self { routes, named }
	}

	/// Resolves a path to the first matching entry.
	///
	/// The candidate is normalized before matching, so `/beers` and
	/// `/beers/` resolve identically and an empty path resolves against a
	/// root route. Resolution is a pure function of the table contents and
	/// the path.
	pub fn resolve(&self, path: &str) -> Option<RouteMatch<V>> {
		let normalized = normalize_path(path);
		for route in &self.routes {
			if let Some(params) = route.pattern.matches(&normalized) {
				debug!(path = %normalized, pattern = %route.pattern, "route matched");
				return Some(RouteMatch {
					route: route.clone(),
					params,
					path: normalized,
				});
			}
		}
		debug!(path = %normalized, "no route matched");
		None
	}

	/// Generates a path for a named route with the given parameters.
	///
	/// # Errors
	///
	/// Returns [`NavigationError::UnknownRouteName`] if no route has that
	/// name and [`NavigationError::MissingParameter`] if a parameter value
	/// is absent or the pattern is not reversible.
	pub fn reverse(&self, name: &str, params: &[(&str, &str)]) -> Result<String, NavigationError> {
		let index = self
			.named
			.get(name)
			.ok_or_else(|| NavigationError::UnknownRouteName(name.to_string()))?;
		let route = &self.routes[*index];
		let map: HashMap<String, String> = params
			.iter()
			.map(|(k, v)| ((*k).to_string(), (*v).to_string()))
			.collect();
		route.pattern.reverse(&map).ok_or_else(|| {
			let missing = route
				.pattern
				.param_names()
				.iter()
				.find(|param| !map.contains_key(param.as_str()))
				.map(|param| param.clone())
				.unwrap_or_else(|| "*".to_string());
			NavigationError::MissingParameter {
				route: name.to_string(),
				name: missing,
			}
		})
	}

	/// Returns the number of registered routes.
	pub fn len(&self) -> usize {
		self.routes.len()
	}

	/// Returns whether the table has no routes.
	pub fn is_empty(&self) -> bool {
		self.routes.is_empty()
	}

	/// Checks whether a route name exists.
	pub fn has_route(&self, name: &str) -> bool {
		self.named.contains_key(name)
	}
}

/// Builder collecting `(pattern, handler)` pairs in registration order.
///
/// Patterns are compiled at [`build`](RouteTableBuilder::build); a malformed
/// pattern fails the whole registration before any resolution is possible.
pub struct RouteTableBuilder<V> {
	entries: Vec<PendingRoute<V>>,
}

struct PendingRoute<V> {
	name: Option<String>,
	pattern: String,
	handler: Rc<dyn RouteHandler<V>>,
}

impl<V> Default for RouteTableBuilder<V> {
	fn default() -> Self {
		Self {
			entries: Vec::new(),
		}
	}
}

impl<V: 'static> RouteTableBuilder<V> {
	/// Adds a route.
	pub fn route<F>(mut self, pattern: &str, handler: F) -> Self
	where
		F: Fn(&RouteContext) -> V + 'static,
	{
		self.entries.push(PendingRoute {
			name: None,
			pattern: pattern.to_string(),
			handler: Rc::new(handler),
		});
		self
	}

	/// Adds a named route, usable for reverse URL generation.
	pub fn named_route<F>(mut self, name: &str, pattern: &str, handler: F) -> Self
	where
		F: Fn(&RouteContext) -> V + 'static,
	{
		self.entries.push(PendingRoute {
			name: Some(name.to_string()),
			pattern: pattern.to_string(),
			handler: Rc::new(handler),
		});
		self
	}

	/// Adds a route backed by a shared handler.
	pub fn handler_route(mut self, pattern: &str, handler: Rc<dyn RouteHandler<V>>) -> Self {
		self.entries.push(PendingRoute {
			name: None,
			pattern: pattern.to_string(),
			handler,
		});
		self
	}

	/// Compiles every pattern and builds the table.
	///
	/// # Errors
	///
	/// Returns the first [`PatternError`] encountered, in registration
	/// order.
	pub fn build(self) -> Result<RouteTable<V>, PatternError> {
		let mut routes = Vec::with_capacity(self.entries.len());
		for entry in self.entries {
			let mut route = Route::from_handler(&entry.pattern, entry.handler)?;
			route.name = entry.name;
			routes.push(route);
		}
		Ok(RouteTable::new(routes))
	}
}
