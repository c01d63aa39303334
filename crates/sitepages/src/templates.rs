//! Page rendering with Handlebars
//!
//! Built-in templates are compiled into the binary. A template directory may
//! override any of them: `<dir>/<name>.html.hbs` replaces the built-in `<name>`.
//! Pages render their body template first, then wrap it in `layout`.

use handlebars::Handlebars;
use serde::Serialize;
use std::path::Path;

use crate::form::datetime_input_helper;
use crate::prelude::*;

const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
	("layout", include_str!("../templates/layout.html.hbs")),
	("legal", include_str!("../templates/legal.html.hbs")),
	("favourites", include_str!("../templates/favourites.html.hbs")),
];

const TEMPLATE_EXTENSION: &str = "html.hbs";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LayoutVars<'a> {
	title: &'a str,
	site_name: &'a str,
	body: &'a str,
}

pub struct TemplateEngine {
	handlebars: Handlebars<'static>,
}

impl TemplateEngine {
	/// Engine with the built-in templates only
	pub fn new() -> ClResult<Self> {
		Self::with_overrides(None)
	}

	pub fn with_overrides(template_dir: Option<&Path>) -> ClResult<Self> {
		let mut handlebars = Handlebars::new();

		// Catch undefined variables
		handlebars.set_strict_mode(true);
		handlebars.register_helper("datetime_input", Box::new(datetime_input_helper));

		for (name, builtin) in BUILTIN_TEMPLATES {
			let source = match template_dir {
				Some(dir) => Self::load_override(dir, name)?,
				None => None,
			};
			let source = source.as_deref().unwrap_or(builtin);
			handlebars
				.register_template_string(name, source)
				.map_err(|e| Error::Template(format!("Invalid template '{}': {}", name, e)))?;
		}

		Ok(Self { handlebars })
	}

	fn load_override(dir: &Path, name: &str) -> ClResult<Option<String>> {
		let path = dir.join(format!("{}.{}", name, TEMPLATE_EXTENSION));
		match std::fs::read_to_string(&path) {
			Ok(content) => {
				info!("Template '{}' overridden by {}", name, path.display());
				Ok(Some(content))
			}
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
			Err(e) => Err(Error::ConfigError(format!("Cannot read {}: {}", path.display(), e))),
		}
	}

	pub fn render(&self, name: &str, data: &impl Serialize) -> ClResult<String> {
		self.handlebars
			.render(name, data)
			.map_err(|e| Error::Template(format!("Failed to render '{}': {}", name, e)))
	}

	/// Render `name` and wrap the result in the site layout
	pub fn render_page(
		&self,
		name: &str,
		title: &str,
		site_name: &str,
		data: &impl Serialize,
	) -> ClResult<String> {
		let body = self.render(name, data)?;
		self.render("layout", &LayoutVars { title, site_name, body: &body })
	}
}


// vim: ts=4
