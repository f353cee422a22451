//! # Taproom Router
//!
//! Hash-fragment routing for single-page frontends:
//!
//! - **Declarative route patterns**: literal segments, `:name` captures, and
//!   a `(.*)` catch-all, compiled once at registration
//! - **First-match resolution**: an ordered table, evaluated top to bottom,
//!   handing the matched handler the captured parameter strings
//! - **A navigation controller**: keeps the visible location, the history,
//!   and the rendered state consistent across programmatic navigation,
//!   manual address edits, and back/forward presses
//! - **An injectable location driver**: deterministic in-memory location for
//!   tests and native binaries, `window.location.hash` on wasm32
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use taproom_router::{LocationDriver, MemoryLocation, Navigator, RouteTable};
//!
//! let table = RouteTable::builder()
//!     .route("/beers", |_ctx| "all beers".to_string())
//!     .route("/beer/:id", |ctx| {
//!         format!("beer {}", ctx.param("id").unwrap_or("?"))
//!     })
//!     .route("(.*)", |_ctx| "all beers".to_string())
//!     .build()
//!     .expect("route patterns are valid");
//!
//! let location = MemoryLocation::new();
//! let rendered = Rc::new(RefCell::new(String::new()));
//! let sink = Rc::clone(&rendered);
//!
//! let navigator = Rc::new(Navigator::new(
//!     table,
//!     Rc::new(location.clone()),
//!     move |view: String| *sink.borrow_mut() = view,
//! ));
//! navigator.activate();
//! navigator.push("/beer/42").unwrap();
//!
//! assert_eq!(*rendered.borrow(), "beer 42");
//! assert_eq!(location.current_path(), Some("/beer/42".to_string()));
//! ```

pub mod error;
pub mod handler;
pub mod history;
pub mod navigator;
pub mod params;
pub mod pattern;
pub mod table;

pub use error::{NavigationError, ParamError, PatternError};
pub use handler::RouteHandler;
#[cfg(target_arch = "wasm32")]
pub use history::HashLocation;
pub use history::{ChangeListener, LocationDriver, MemoryLocation, NavigationType, Subscription};
pub use navigator::{NavigationState, Navigator};
pub use params::RouteContext;
pub use pattern::{PathPattern, ROOT_PATH, normalize_path};
pub use table::{Route, RouteMatch, RouteTable, RouteTableBuilder};
