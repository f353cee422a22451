//! The static catalog and its plain-text views.
//!
//! Stands in for the display components, which are not the router's
//! business: a view here is just the string a component would render.

use taproom::prelude::RouteContext;

/// One catalog entry.
pub struct Beer {
	pub name: &'static str,
	pub alcohol: f32,
	pub description: &'static str,
}

/// The catalog.
pub const BEERS: &[Beer] = &[
	Beer {
		name: "Affligem Tripel",
		alcohol: 8.5,
		description: "The king of the abbey beers. It is amber-gold and \
			pours with a deep head and original aroma, delivering a complex, \
			full bodied flavour. Pure enjoyment! Secondary fermentation in \
			the bottle.",
	},
	Beer {
		name: "Rochefort 8",
		alcohol: 9.2,
		description: "A dry but rich flavoured beer with complex fruity and \
			spicy flavours.",
	},
	Beer {
		name: "Chimay Rouge",
		alcohol: 7.0,
		description: "This Trappist beer possesses a beautiful coppery \
			colour. Topped with a creamy head, it gives off a slight fruity \
			apricot smell from the fermentation.",
	},
];

/// Renders the list view.
pub fn render_list(_ctx: &RouteContext) -> String {
	let mut out = String::from("== Beers ==\n");
	for (index, beer) in BEERS.iter().enumerate() {
		out.push_str(&format!("  [{index}] {} ({}%)\n", beer.name, beer.alcohol));
	}
	out.push_str(&format!("Number of beers in list: {}", BEERS.len()));
	out
}

/// Renders the detail view for the beer at `:id`.
pub fn render_details(ctx: &RouteContext) -> String {
	match ctx.parse::<usize>("id") {
		Ok(id) if id < BEERS.len() => {
			let beer = &BEERS[id];
			format!(
				"== {} ==\nAlcohol content: {}%\n{}",
				beer.name, beer.alcohol, beer.description
			)
		}
		_ => format!(
			"No beer is listed under '{}'",
			ctx.param("id").unwrap_or_default()
		),
	}
}
