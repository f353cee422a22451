//! Route handler abstraction.
//!
//! A handler is anything invocable with a [`RouteContext`] that produces the
//! application's view value. What a "view" is stays the application's
//! business; the router only carries the value from the matched handler to
//! the outlet it was constructed with.

use crate::params::RouteContext;

/// A capability invocable with route parameters, producing a view.
///
/// Implemented for free by any `Fn(&RouteContext) -> V` closure or function;
/// implement it by hand for handlers that carry their own state.
pub trait RouteHandler<V> {
	/// Produces the view for a matched route.
	fn handle(&self, ctx: &RouteContext) -> V;
}

impl<V, F> RouteHandler<V> for F
where
	F: Fn(&RouteContext) -> V,
{
	fn handle(&self, ctx: &RouteContext) -> V {
		self(ctx)
	}
}
