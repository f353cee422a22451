//! The navigation controller.
//!
//! Bridges navigation intents (programmatic calls as well as location
//! changes observed on the driver) and the route table, while keeping the
//! visible location, the history, and the rendered state consistent.
//!
//! The controller is idle until an intent arrives, resolves each intent
//! synchronously against the table, and then holds the resulting
//! [`NavigationState`] until the next successful resolution replaces it.
//! Intents are processed strictly in arrival order: one resolve, state
//! swap, location reconcile, and render completes before the next intent
//! is looked at, so an intent raised from inside a handler (or by the
//! driver echoing back the controller's own write) waits its turn.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use tracing::{debug, warn};

use crate::error::NavigationError;
use crate::history::{LocationDriver, NavigationType, Subscription};
use crate::params::RouteContext;
use crate::pattern::{ROOT_PATH, normalize_path};
use crate::table::RouteTable;

/// The active match: the resolved path plus its captured parameters.
///
/// Replaced as a whole on every successful resolution, never mutated in
/// place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
	path: String,
	params: HashMap<String, String>,
}

impl NavigationState {
	/// Returns the normalized path of the active match.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// Returns the parameters of the active match.
	pub fn params(&self) -> &HashMap<String, String> {
		&self.params
	}
}

/// Where an intent came from; decides echo suppression and how the visible
/// location is rewritten afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IntentOrigin {
	/// `navigate_to` and friends.
	Programmatic(NavigationType),
	/// A change observed on the location driver: back/forward, a manual
	/// edit, or this controller's own rewrite echoing back.
	External,
}

/// One queued navigation intent; consumed and discarded per event.
#[derive(Debug)]
struct Intent {
	path: String,
	origin: IntentOrigin,
}

type Outlet<V> = Rc<dyn Fn(V)>;
type UnresolvedHook = Rc<dyn Fn(&NavigationError)>;

/// The navigation controller.
///
/// Owns the [`NavigationState`] exclusively; the rendered view never
/// mutates it directly, only through new intents.
pub struct Navigator<V> {
	table: RouteTable<V>,
	driver: Rc<dyn LocationDriver>,
	outlet: Outlet<V>,
	on_unresolved: Option<UnresolvedHook>,
	state: RefCell<Option<NavigationState>>,
	queue: RefCell<VecDeque<Intent>>,
	draining: Cell<bool>,
	subscription: RefCell<Option<Subscription>>,
}

impl<V> std::fmt::Debug for Navigator<V> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Navigator")
			.field("state", &self.state.borrow())
			.field("active", &self.subscription.borrow().is_some())
			.finish()
	}
}

impl<V: 'static> Navigator<V> {
	/// Creates a controller over `table`, reading and writing the visible
	/// location through `driver` and delivering rendered views to `outlet`.
	///
	/// The controller starts idle; call [`activate`](Self::activate) to
	/// start listening and render the current location.
	pub fn new<F>(table: RouteTable<V>, driver: Rc<dyn LocationDriver>, outlet: F) -> Self
	where
		F: Fn(V) + 'static,
	{
		Self {
			table,
			driver,
			outlet: Rc::new(outlet),
			on_unresolved: None,
			state: RefCell::new(None),
			queue: RefCell::new(VecDeque::new()),
			draining: Cell::new(false),
			subscription: RefCell::new(None),
		}
	}

	/// Installs a hook observing paths that resolved to nothing.
	///
	/// The previous state stays current when that happens; rendering a
	/// "not found" view (or not) is the hook's decision.
	pub fn on_unresolved<F>(mut self, hook: F) -> Self
	where
		F: Fn(&NavigationError) + 'static,
	{
		self.on_unresolved = Some(Rc::new(hook));
		self
	}

	/// Returns the route table.
	pub fn table(&self) -> &RouteTable<V> {
		&self.table
	}

	/// Returns the current navigation state, if any resolution has
	/// succeeded yet.
	pub fn state(&self) -> Option<NavigationState> {
		self.state.borrow().clone()
	}

	/// Returns whether the controller is listening for location changes.
	pub fn is_active(&self) -> bool {
		self.subscription.borrow().is_some()
	}

	/// Starts listening for externally triggered location changes and
	/// synthesizes one intent from the current visible location (or the
	/// root path if there is none).
	///
	/// Idempotent: activating an active controller does nothing.
	pub fn activate(self: &Rc<Self>) {
		if self.subscription.borrow().is_some() {
			return;
		}
		let weak = Rc::downgrade(self);
		let subscription = self.driver.subscribe(Box::new(move |path| {
			if let Some(navigator) = weak.upgrade() {
				navigator.enqueue(Intent {
					path: path.to_string(),
					origin: IntentOrigin::External,
				});
			}
		}));
		*self.subscription.borrow_mut() = Some(subscription);

		let initial = self
			.driver
			.current_path()
			.unwrap_or_else(|| ROOT_PATH.to_string());
		debug!(path = %initial, "navigator activated");
		self.enqueue(Intent {
			path: initial,
			origin: IntentOrigin::External,
		});
	}

	/// Stops listening for location changes. The last state stays rendered.
	///
	/// Idempotent; the subscription is also released if an active
	/// controller is simply dropped.
	pub fn inactivate(&self) {
		if let Some(subscription) = self.subscription.borrow_mut().take() {
			subscription.release();
			debug!("navigator inactivated");
		}
	}

	/// Requests navigation to `target`.
	///
	/// [`NavigationType::Push`] preserves back-navigation to the current
	/// entry; [`NavigationType::Replace`] overwrites it.
	///
	/// # Errors
	///
	/// Returns [`NavigationError::InvalidTarget`] if `target` cannot be
	/// normalized to a fragment path; the state machine is not touched. A
	/// path that resolves to nothing is not an error of this call: it is
	/// reported through the unresolved hook once the intent is processed.
	pub fn navigate_to(&self, target: &str, kind: NavigationType) -> Result<(), NavigationError> {
		let target = validate_target(target)?;
		self.enqueue(Intent {
			path: target,
			origin: IntentOrigin::Programmatic(kind),
		});
		Ok(())
	}

	/// Navigates with [`NavigationType::Push`].
	///
	/// # Errors
	///
	/// See [`navigate_to`](Self::navigate_to).
	pub fn push(&self, target: &str) -> Result<(), NavigationError> {
		self.navigate_to(target, NavigationType::Push)
	}

	/// Navigates with [`NavigationType::Replace`].
	///
	/// # Errors
	///
	/// See [`navigate_to`](Self::navigate_to).
	pub fn replace(&self, target: &str) -> Result<(), NavigationError> {
		self.navigate_to(target, NavigationType::Replace)
	}

	fn enqueue(&self, intent: Intent) {
		self.queue.borrow_mut().push_back(intent);
		self.drain();
	}

	/// Processes queued intents strictly in arrival order. Re-entrant calls
	/// return immediately; the already-running drain picks the new intent
	/// up after the current one completes.
	fn drain(&self) {
		if self.draining.get() {
			return;
		}
		self.draining.set(true);
		loop {
			let next = self.queue.borrow_mut().pop_front();
			match next {
				Some(intent) => self.process(intent),
				None => break,
			}
		}
		self.draining.set(false);
	}

	/// One resolve-reconcile-render unit.
	fn process(&self, intent: Intent) {
		let path = normalize_path(&intent.path);

		// Reconciliation: an externally observed path equal to the current
		// state is this controller's own rewrite echoing back (or a repeat
		// of the current location) and must not re-resolve or re-render.
		if intent.origin == IntentOrigin::External
			&& self
				.state
				.borrow()
				.as_ref()
				.is_some_and(|state| state.path == path)
		{
			debug!(path = %path, "location change already reflects current state");
			return;
		}

		debug!(path = %path, origin = ?intent.origin, "resolving");
		let Some(matched) = self.table.resolve(&path) else {
			warn!(path = %path, "no route matched and no fallback is registered");
			let error = NavigationError::Unresolved(path);
			if let Some(hook) = &self.on_unresolved {
				hook(&error);
			}
			return;
		};

		*self.state.borrow_mut() = Some(NavigationState {
			path: path.clone(),
			params: matched.params().clone(),
		});

		// Rewrite the visible location only when it is out of sync with the
		// resolved path. External changes and startup use replace semantics
		// so a normalization rewrite never grows history.
		if self.driver.current_path().as_deref() != Some(path.as_str()) {
			let kind = match intent.origin {
				IntentOrigin::Programmatic(kind) => kind,
				IntentOrigin::External => NavigationType::Replace,
			};
			self.driver.write(&path, kind);
		}

		let ctx = RouteContext::new(path, matched.params().clone());
		(self.outlet)(matched.route().handle(&ctx));
	}
}

/// Validates a programmatic navigation target.
///
/// A target must be usable as a bare fragment path: no fragment delimiter,
/// no scheme separator, no control characters. Empty and whitespace-only
/// targets normalize to the root path later, mirroring how an empty
/// fragment resolves.
fn validate_target(raw: &str) -> Result<String, NavigationError> {
	if raw.contains('#') || raw.contains("://") || raw.chars().any(char::is_control) {
		return Err(NavigationError::InvalidTarget(raw.to_string()));
	}
	Ok(raw.to_string())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::history::MemoryLocation;
	use crate::table::RouteTable;

	fn catalog_table() -> RouteTable<String> {
		RouteTable::builder()
			.route("/beers", |_ctx: &RouteContext| "list".to_string())
			.route("/beer/:id", |ctx: &RouteContext| {
				format!("beer {}", ctx.param("id").unwrap_or("?"))
			})
			.route("(.*)", |_ctx: &RouteContext| "list".to_string())
			.build()
			.unwrap()
	}

	fn navigator_with(
		table: RouteTable<String>,
		location: &MemoryLocation,
	) -> (Rc<Navigator<String>>, Rc<RefCell<Vec<String>>>) {
		let rendered = Rc::new(RefCell::new(Vec::new()));
		let sink = Rc::clone(&rendered);
		let navigator = Rc::new(Navigator::new(
			table,
			Rc::new(location.clone()),
			move |view: String| sink.borrow_mut().push(view),
		));
		(navigator, rendered)
	}

	#[test]
	fn test_startup_renders_current_location() {
		let location = MemoryLocation::with_path("/beer/2");
		let (navigator, rendered) = navigator_with(catalog_table(), &location);

		navigator.activate();
		assert_eq!(*rendered.borrow(), vec!["beer 2".to_string()]);
		assert_eq!(navigator.state().unwrap().path(), "/beer/2");
	}

	#[test]
	fn test_startup_defaults_to_root() {
		let location = MemoryLocation::new();
		let (navigator, rendered) = navigator_with(catalog_table(), &location);

		navigator.activate();
		// the catch-all renders, and the root path becomes visible
		assert_eq!(*rendered.borrow(), vec!["list".to_string()]);
		assert_eq!(location.current_path(), Some("/".to_string()));
	}

	#[test]
	fn test_push_updates_state_and_location() {
		let location = MemoryLocation::new();
		let (navigator, rendered) = navigator_with(catalog_table(), &location);
		navigator.activate();

		navigator.push("/beer/7").unwrap();
		let state = navigator.state().unwrap();
		assert_eq!(state.path(), "/beer/7");
		assert_eq!(state.params().get("id"), Some(&"7".to_string()));
		assert_eq!(location.current_path(), Some("/beer/7".to_string()));
		assert_eq!(
			*rendered.borrow(),
			vec!["list".to_string(), "beer 7".to_string()]
		);
	}

	#[test]
	fn test_navigation_works_before_activation() {
		let location = MemoryLocation::new();
		let (navigator, rendered) = navigator_with(catalog_table(), &location);

		navigator.push("/beers").unwrap();
		assert_eq!(*rendered.borrow(), vec!["list".to_string()]);
		assert_eq!(navigator.state().unwrap().path(), "/beers");
	}

	#[test]
	fn test_invalid_target_rejected_synchronously() {
		let location = MemoryLocation::new();
		let (navigator, rendered) = navigator_with(catalog_table(), &location);
		navigator.activate();
		let before = navigator.state();

		for target in ["#/beers", "https://example.com/beers", "/beer\n/1"] {
			assert!(matches!(
				navigator.push(target),
				Err(NavigationError::InvalidTarget(_))
			));
		}
		assert_eq!(navigator.state(), before);
		assert_eq!(rendered.borrow().len(), 1);
	}

	#[test]
	fn test_external_change_resolves() {
		let location = MemoryLocation::new();
		let (navigator, rendered) = navigator_with(catalog_table(), &location);
		navigator.activate();

		// a manual address edit
		location.write("/beer/3", NavigationType::Push);
		assert_eq!(navigator.state().unwrap().path(), "/beer/3");
		assert_eq!(rendered.borrow().last().unwrap(), "beer 3");
	}

	#[test]
	fn test_own_write_echo_is_suppressed() {
		let location = MemoryLocation::new();
		let (navigator, rendered) = navigator_with(catalog_table(), &location);
		navigator.activate();

		navigator.push("/beers").unwrap();
		// the push above echoed through the driver; exactly one render
		assert_eq!(
			*rendered.borrow(),
			vec!["list".to_string(), "list".to_string()]
		);
		assert_eq!(location.history(), vec!["/", "/beers"]);
	}

	#[test]
	fn test_unresolved_keeps_state_and_reports() {
		let table = RouteTable::builder()
			.route("/beers", |_ctx: &RouteContext| "list".to_string())
			.build()
			.unwrap();
		let location = MemoryLocation::with_path("/beers");
		let failures = Rc::new(RefCell::new(Vec::new()));
		let failure_sink = Rc::clone(&failures);
		let rendered = Rc::new(RefCell::new(Vec::new()));
		let sink = Rc::clone(&rendered);
		let navigator = Rc::new(
			Navigator::new(table, Rc::new(location.clone()), move |view: String| {
				sink.borrow_mut().push(view)
			})
			.on_unresolved(move |error| failure_sink.borrow_mut().push(error.clone())),
		);
		navigator.activate();

		navigator.push("/unknown").unwrap();
		assert_eq!(navigator.state().unwrap().path(), "/beers");
		assert_eq!(rendered.borrow().len(), 1);
		assert_eq!(
			*failures.borrow(),
			vec![NavigationError::Unresolved("/unknown".to_string())]
		);
		// the location was never rewritten to the unresolved path
		assert_eq!(location.current_path(), Some("/beers".to_string()));
	}

	#[test]
	fn test_activate_is_idempotent() {
		let location = MemoryLocation::new();
		let (navigator, rendered) = navigator_with(catalog_table(), &location);

		navigator.activate();
		navigator.activate();
		assert_eq!(location.listener_count(), 1);

		location.write("/beer/1", NavigationType::Push);
		assert_eq!(rendered.borrow().len(), 2);
	}

	#[test]
	fn test_inactivate_stops_event_intake() {
		let location = MemoryLocation::new();
		let (navigator, rendered) = navigator_with(catalog_table(), &location);
		navigator.activate();
		navigator.inactivate();
		navigator.inactivate();

		assert!(!navigator.is_active());
		assert_eq!(location.listener_count(), 0);
		location.write("/beer/1", NavigationType::Push);
		// the last state is preserved, no new render
		assert_eq!(rendered.borrow().len(), 1);
		assert_eq!(navigator.state().unwrap().path(), "/");
	}

	#[test]
	fn test_subscription_released_on_drop() {
		let location = MemoryLocation::new();
		{
			let (navigator, _rendered) = navigator_with(catalog_table(), &location);
			navigator.activate();
			assert_eq!(location.listener_count(), 1);
		}
		assert_eq!(location.listener_count(), 0);
	}
}
