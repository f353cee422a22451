//! # Taproom
//!
//! Hash-fragment routing for single-page frontends. This crate is the
//! unified interface over the workspace crates:
//!
//! - `taproom-router`: route patterns, the ordered route table, and the
//!   navigation controller that keeps location, history, and render state
//!   consistent
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//!
//! use taproom::prelude::*;
//!
//! let table = RouteTable::builder()
//!     .route("/beers", |_ctx| "all beers")
//!     .route("(.*)", |_ctx| "all beers")
//!     .build()
//!     .expect("route patterns are valid");
//!
//! let navigator = Rc::new(Navigator::new(
//!     table,
//!     Rc::new(MemoryLocation::new()),
//!     |_view| {},
//! ));
//! navigator.activate();
//! assert_eq!(navigator.state().expect("startup resolved").path(), "/");
//! ```

pub use taproom_router as router;

/// Commonly used types.
pub mod prelude {
	#[cfg(target_arch = "wasm32")]
	pub use taproom_router::HashLocation;
	pub use taproom_router::{
		LocationDriver, MemoryLocation, NavigationError, NavigationState, NavigationType,
		Navigator, PathPattern, PatternError, Route, RouteContext, RouteHandler, RouteMatch,
		RouteTable,
	};
}
