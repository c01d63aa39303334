//! Form controls
//!
//! Presentational only: values are written out as given and never validated
//! here. Validation belongs to whatever handles the submitted form.

use chrono::NaiveDateTime;
use handlebars::{
	Context, Handlebars, Helper, HelperResult, Output, RenderContext, html_escape,
};

/// Format used by `<input type="datetime-local">`
pub const DATETIME_LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Date-and-time text field with an optional label
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateTimeInput {
	pub name: String,
	pub label: Option<String>,
	pub value: Option<String>,
	pub required: bool,
}

impl DateTimeInput {
	pub fn new(name: impl Into<String>) -> Self {
		Self { name: name.into(), ..Default::default() }
	}

	pub fn label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	/// Pre-fill from a timestamp, minute precision
	pub fn value(mut self, value: NaiveDateTime) -> Self {
		self.value = Some(value.format(DATETIME_LOCAL_FORMAT).to_string());
		self
	}

	/// Pre-fill with a string, passed through verbatim
	pub fn raw_value(mut self, value: impl Into<String>) -> Self {
		self.value = Some(value.into());
		self
	}

	pub fn required(mut self, required: bool) -> Self {
		self.required = required;
		self
	}

	pub fn to_html(&self) -> String {
		let name = html_escape(&self.name);
		let mut html = String::new();
		if let Some(label) = &self.label {
			html.push_str(&format!("<label for=\"{}\">{}</label>", name, html_escape(label)));
		}
		html.push_str(&format!(
			"<input type=\"datetime-local\" id=\"{}\" name=\"{}\"",
			name, name
		));
		if let Some(value) = &self.value {
			html.push_str(&format!(" value=\"{}\"", html_escape(value)));
		}
		if self.required {
			html.push_str(" required");
		}
		html.push('>');
		html
	}
}

/// `{{datetime_input name="starts_at" label="Starts" value=startsAt}}`
pub fn datetime_input_helper<'reg, 'rc>(
	h: &Helper<'rc>,
	_: &'reg Handlebars<'reg>,
	_: &'rc Context,
	_: &mut RenderContext<'reg, 'rc>,
	out: &mut dyn Output,
) -> HelperResult {
	let hash_str = |key: &str| h.hash_get(key).and_then(|v| v.value().as_str());

	let mut input = DateTimeInput::new(hash_str("name").unwrap_or("datetime"));
	if let Some(label) = hash_str("label") {
		input = input.label(label);
	}
	if let Some(value) = hash_str("value").filter(|v| !v.is_empty()) {
		input = input.raw_value(value);
	}
	if h.hash_get("required").and_then(|v| v.value().as_bool()).unwrap_or(false) {
		input = input.required(true);
	}

	out.write(&input.to_html())?;
	Ok(())
}


// vim: ts=4
