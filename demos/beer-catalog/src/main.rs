//! Beer catalog walkthrough.
//!
//! Wires the tutorial's route table - a list view, a detail view, and a
//! catch-all falling back to the list - to the in-memory location driver
//! and replays a short browsing session: open the catalog, follow a link
//! to one beer, press back.

mod catalog;

use std::error::Error;
use std::rc::Rc;

use taproom::prelude::*;
use tracing::info;

use crate::catalog::{render_details, render_list};

fn main() -> Result<(), Box<dyn Error>> {
	tracing_subscriber::fmt::init();

	let table = RouteTable::builder()
		.named_route("list", "/beers", render_list)
		.named_route("details", "/beer/:id", render_details)
		.route("(.*)", render_list)
		.build()?;

	let location = MemoryLocation::new();
	let navigator = Rc::new(
		Navigator::new(table, Rc::new(location.clone()), |view: String| {
			println!("{view}\n");
		})
		.on_unresolved(|error| eprintln!("navigation failed: {error}")),
	);

	// renders the fallback list at the root path
	navigator.activate();

	// canonical list location
	navigator.push("/beers")?;

	// a link to one beer, built from the route name
	let rochefort = navigator.table().reverse("details", &[("id", "1")])?;
	navigator.push(&rochefort)?;

	// the back button returns to the list
	location.back();

	info!(
		entries = location.history_len(),
		path = ?navigator.state().map(|s| s.path().to_string()),
		"session finished"
	);
	Ok(())
}
