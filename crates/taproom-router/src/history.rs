//! Visible-location plumbing.
//!
//! The navigator never touches a global location object. It talks to a
//! [`LocationDriver`] injected at construction: [`MemoryLocation`] gives
//! deterministic tests and native demos, and [`HashLocation`] bridges the
//! browser fragment on wasm32 targets.
//!
//! Drivers emulate the browser contract for fragment writes: assigning a
//! new fragment is observable through subscribed listeners, which is why
//! the navigator must suppress the echo of its own writes.

use std::cell::RefCell;
use std::rc::Rc;

/// How a location write should affect history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationType {
	/// Add a history entry, preserving back-navigation to the current one.
	Push,
	/// Overwrite the current history entry.
	Replace,
}

/// Callback invoked with the new path on every observable location change.
pub type ChangeListener = Box<dyn Fn(&str)>;

/// Releases a change subscription when dropped.
#[must_use = "dropping the subscription stops event delivery immediately"]
pub struct Subscription {
	release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
	/// Wraps a release action to run exactly once, on drop at the latest.
	pub fn new(release: impl FnOnce() + 'static) -> Self {
		Self {
			release: Some(Box::new(release)),
		}
	}

	/// Releases the subscription now.
	pub fn release(mut self) {
		if let Some(release) = self.release.take() {
			release();
		}
	}
}

impl Drop for Subscription {
	fn drop(&mut self) {
		if let Some(release) = self.release.take() {
			release();
		}
	}
}

impl std::fmt::Debug for Subscription {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Subscription")
			.field("released", &self.release.is_none())
			.finish()
	}
}

/// The visible location: one fragment path string round-tripped through the
/// environment, plus change events for edits the controller did not make.
pub trait LocationDriver {
	/// The current fragment path, if the environment has one.
	fn current_path(&self) -> Option<String>;

	/// Rewrites the fragment.
	///
	/// Like assigning the browser fragment, a write to a different path is
	/// observable through subscribed listeners; writing the current path is
	/// a no-op.
	fn write(&self, path: &str, kind: NavigationType);

	/// Starts delivering change events to `listener` until the returned
	/// subscription is dropped.
	fn subscribe(&self, listener: ChangeListener) -> Subscription;
}

/// In-memory [`LocationDriver`] with a linear history stack.
///
/// Clones share the same underlying location, so a test can keep a handle
/// for inspection while the navigator owns another.
#[derive(Clone, Default)]
pub struct MemoryLocation {
	inner: Rc<RefCell<MemoryInner>>,
}

#[derive(Default)]
struct MemoryInner {
	entries: Vec<String>,
	cursor: usize,
	listeners: Vec<(u64, Rc<dyn Fn(&str)>)>,
	next_listener: u64,
}

impl MemoryLocation {
	/// Creates an empty location: no history, no current path.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a location with `path` as its single history entry.
	pub fn with_path(path: &str) -> Self {
		let location = Self::new();
		location.inner.borrow_mut().entries.push(path.to_string());
		location
	}

	/// Steps back one history entry, notifying listeners (a back button
	/// press). Does nothing at the oldest entry.
	pub fn back(&self) {
		let path = {
			let mut inner = self.inner.borrow_mut();
			if inner.cursor == 0 || inner.entries.is_empty() {
				return;
			}
			inner.cursor -= 1;
			inner.entries[inner.cursor].clone()
		};
		self.notify(&path);
	}

	/// Steps forward one history entry, notifying listeners. Does nothing
	/// at the newest entry.
	pub fn forward(&self) {
		let path = {
			let mut inner = self.inner.borrow_mut();
			if inner.cursor + 1 >= inner.entries.len() {
				return;
			}
			inner.cursor += 1;
			inner.entries[inner.cursor].clone()
		};
		self.notify(&path);
	}

	/// Returns the number of entries in the history stack.
	pub fn history_len(&self) -> usize {
		self.inner.borrow().entries.len()
	}

	/// Returns the full history stack, oldest first.
	pub fn history(&self) -> Vec<String> {
		self.inner.borrow().entries.clone()
	}

	/// Returns the number of live change subscriptions.
	pub fn listener_count(&self) -> usize {
		self.inner.borrow().listeners.len()
	}

	fn notify(&self, path: &str) {
		// snapshot so listeners may subscribe, unsubscribe, or write
		// without holding the borrow
		let listeners: Vec<Rc<dyn Fn(&str)>> = self
			.inner
			.borrow()
			.listeners
			.iter()
			.map(|(_, listener)| Rc::clone(listener))
			.collect();
		for listener in listeners {
			listener(path);
		}
	}
}

impl std::fmt::Debug for MemoryLocation {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let inner = self.inner.borrow();
		f.debug_struct("MemoryLocation")
			.field("entries", &inner.entries)
			.field("cursor", &inner.cursor)
			.field("listeners", &inner.listeners.len())
			.finish()
	}
}

impl LocationDriver for MemoryLocation {
	fn current_path(&self) -> Option<String> {
		let inner = self.inner.borrow();
		inner.entries.get(inner.cursor).cloned()
	}

	fn write(&self, path: &str, kind: NavigationType) {
		{
			let mut inner = self.inner.borrow_mut();
			if inner.entries.get(inner.cursor).map(String::as_str) == Some(path) {
				return;
			}
			let cursor = inner.cursor;
			if inner.entries.is_empty() {
				inner.entries.push(path.to_string());
				inner.cursor = 0;
			} else {
				match kind {
					NavigationType::Replace => {
						inner.entries[cursor] = path.to_string();
					}
					NavigationType::Push => {
						inner.entries.truncate(cursor + 1);
						inner.entries.push(path.to_string());
						inner.cursor = cursor + 1;
					}
				}
			}
		}
		self.notify(path);
	}

	fn subscribe(&self, listener: ChangeListener) -> Subscription {
		let id = {
			let mut inner = self.inner.borrow_mut();
			let id = inner.next_listener;
			inner.next_listener += 1;
			inner.listeners.push((id, Rc::from(listener)));
			id
		};
		let inner = Rc::clone(&self.inner);
		Subscription::new(move || {
			inner
				.borrow_mut()
				.listeners
				.retain(|(listener_id, _)| *listener_id != id);
		})
	}
}

/// Browser fragment driver: reads and writes `window.location.hash` and
/// listens for `hashchange` events.
#[cfg(target_arch = "wasm32")]
mod hash {
	use wasm_bindgen::JsCast;
	use wasm_bindgen::prelude::Closure;

	use super::{ChangeListener, LocationDriver, NavigationType, Subscription};
	use crate::pattern::ROOT_PATH;

	/// [`LocationDriver`] over the browser's fragment.
	#[derive(Debug, Clone, Copy, Default)]
	pub struct HashLocation;

	impl HashLocation {
		/// Creates the driver. The browser window is looked up per call, so
		/// the value itself is stateless.
		pub fn new() -> Self {
			Self
		}
	}

	/// Extracts the fragment path from a full URL, the way the address bar
	/// reports it in a `hashchange` event.
	fn fragment_path(url: &str) -> String {
		match url.find('#') {
			Some(index) => url[index + 1..].to_string(),
			None => ROOT_PATH.to_string(),
		}
	}

	impl LocationDriver for HashLocation {
		fn current_path(&self) -> Option<String> {
			let hash = web_sys::window()?.location().hash().ok()?;
			let path = hash.strip_prefix('#').unwrap_or(&hash);
			if path.is_empty() {
				None
			} else {
				Some(path.to_string())
			}
		}

		fn write(&self, path: &str, kind: NavigationType) {
			let Some(window) = web_sys::window() else {
				return;
			};
			let location = window.location();
			match kind {
				NavigationType::Push => {
					let _ = location.set_hash(path);
				}
				NavigationType::Replace => {
					// location.replace swaps the current history entry
					let _ = location.replace(&format!("#{path}"));
				}
			}
		}

		fn subscribe(&self, listener: ChangeListener) -> Subscription {
			let Some(window) = web_sys::window() else {
				return Subscription::new(|| {});
			};
			let closure = Closure::<dyn FnMut(web_sys::HashChangeEvent)>::new(
				move |event: web_sys::HashChangeEvent| {
					listener(&fragment_path(&event.new_url()));
				},
			);
			let _ = window
				.add_event_listener_with_callback("hashchange", closure.as_ref().unchecked_ref());
			// the closure stays alive inside the release action instead of
			// being forgotten, so teardown detaches it from the window
			Subscription::new(move || {
				if let Some(window) = web_sys::window() {
					let _ = window.remove_event_listener_with_callback(
						"hashchange",
						closure.as_ref().unchecked_ref(),
					);
				}
			})
		}
	}
}

#[cfg(target_arch = "wasm32")]
pub use hash::HashLocation;
