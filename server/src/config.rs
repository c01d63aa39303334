//! Server configuration from environment variables
//!
//! | Variable                      | Meaning                                   |
//! |-------------------------------|-------------------------------------------|
//! | `LISTEN`                      | listen address (default `127.0.0.1:8080`) |
//! | `SETTINGS_URL`                | HTTP(S) settings endpoint                 |
//! | `SETTINGS_FILE`               | local JSON/YAML settings file             |
//! | `SETTINGS_TTL_SECS`           | cache freshness window (default 600)      |
//! | `SETTINGS_REVALIDATE`         | `swr` or `blocking`                       |
//! | `SETTINGS_FETCH_TIMEOUT_SECS` | HTTP fetch timeout                        |
//! | `SITE_NAME`                   | site name when settings have none         |
//! | `TEMPLATE_DIR`                | template override directory               |
//! | `SITE_CACHE_CAPACITY`         | settings cache capacity                   |

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use sitepages::core::{
	FileSettingsFetcher, HttpSettingsFetcher, RevalidateMode, SettingsFetcher,
};
use sitepages::error::{ClResult, Error};
use sitepages::AppBuilder;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsSource {
	Url(String),
	File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	pub listen: Option<String>,
	pub source: SettingsSource,
	pub ttl: Option<Duration>,
	pub revalidate: Option<RevalidateMode>,
	pub fetch_timeout: Option<Duration>,
	pub site_name: Option<String>,
	pub template_dir: Option<PathBuf>,
	pub cache_capacity: Option<usize>,
}

fn parse_num<T: std::str::FromStr>(key: &str, value: Option<String>) -> ClResult<Option<T>> {
	value
		.map(|v| {
			v.trim()
				.parse::<T>()
				.map_err(|_| Error::ConfigError(format!("{} must be a number, got '{}'", key, v)))
		})
		.transpose()
}

impl Config {
	pub fn from_env() -> ClResult<Self> {
		Self::from_lookup(|key| std::env::var(key).ok().filter(|v| !v.is_empty()))
	}

	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ClResult<Self> {
		let source = match (lookup("SETTINGS_URL"), lookup("SETTINGS_FILE")) {
			(Some(_), Some(_)) => {
				return Err(Error::ConfigError(
					"SETTINGS_URL and SETTINGS_FILE are mutually exclusive".to_string(),
				));
			}
			(Some(url), None) => SettingsSource::Url(url),
			(None, Some(path)) => SettingsSource::File(PathBuf::from(path)),
			(None, None) => {
				return Err(Error::ConfigError(
					"One of SETTINGS_URL or SETTINGS_FILE must be set".to_string(),
				));
			}
		};

		Ok(Self {
			listen: lookup("LISTEN"),
			source,
			ttl: parse_num::<u64>("SETTINGS_TTL_SECS", lookup("SETTINGS_TTL_SECS"))?
				.map(Duration::from_secs),
			revalidate: lookup("SETTINGS_REVALIDATE").map(|v| v.parse()).transpose()?,
			fetch_timeout: parse_num::<u64>(
				"SETTINGS_FETCH_TIMEOUT_SECS",
				lookup("SETTINGS_FETCH_TIMEOUT_SECS"),
			)?
			.map(Duration::from_secs),
			site_name: lookup("SITE_NAME"),
			template_dir: lookup("TEMPLATE_DIR").map(PathBuf::from),
			cache_capacity: parse_num("SITE_CACHE_CAPACITY", lookup("SITE_CACHE_CAPACITY"))?,
		})
	}

	fn fetcher(&self) -> ClResult<Arc<dyn SettingsFetcher>> {
		Ok(match &self.source {
			SettingsSource::Url(url) => {
				let mut fetcher = HttpSettingsFetcher::new(url)?;
				if let Some(timeout) = self.fetch_timeout {
					fetcher = fetcher.with_timeout(timeout);
				}
				Arc::new(fetcher)
			}
			SettingsSource::File(path) => Arc::new(FileSettingsFetcher::new(path.clone())),
		})
	}

	pub fn apply(&self, builder: &mut AppBuilder) -> ClResult<()> {
		builder.settings_fetcher(self.fetcher()?);
		if let Some(listen) = &self.listen {
			builder.listen(listen.as_str());
		}
		if let Some(ttl) = self.ttl {
			builder.settings_ttl(ttl);
		}
		if let Some(mode) = self.revalidate {
			builder.revalidate_mode(mode);
		}
		if let Some(site_name) = &self.site_name {
			builder.site_name(site_name.as_str());
		}
		if let Some(dir) = &self.template_dir {
			builder.template_dir(dir.as_path());
		}
		if let Some(capacity) = self.cache_capacity {
			builder.cache_capacity(capacity);
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;

	fn config(vars: &[(&str, &str)]) -> ClResult<Config> {
		let map: HashMap<String, String> =
			vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
		Config::from_lookup(|key| map.get(key).cloned())
	}

	#[test]
	fn test_minimal_file_config() {
		let config = config(&[("SETTINGS_FILE", "./site.yaml")]).unwrap();
		assert_eq!(config.source, SettingsSource::File(PathBuf::from("./site.yaml")));
		assert_eq!(config.ttl, None);
		assert_eq!(config.revalidate, None);
	}

	#[test]
	fn test_full_url_config() {
		let config = config(&[
			("SETTINGS_URL", "https://cms.example.com/site-settings"),
			("LISTEN", "0.0.0.0:3000"),
			("SETTINGS_TTL_SECS", "120"),
			("SETTINGS_REVALIDATE", "blocking"),
			("SETTINGS_FETCH_TIMEOUT_SECS", "5"),
			("SITE_CACHE_CAPACITY", "8"),
		])
		.unwrap();
		assert_eq!(
			config.source,
			SettingsSource::Url("https://cms.example.com/site-settings".to_string())
		);
		assert_eq!(config.listen.as_deref(), Some("0.0.0.0:3000"));
		assert_eq!(config.ttl, Some(Duration::from_secs(120)));
		assert_eq!(config.revalidate, Some(RevalidateMode::Blocking));
		assert_eq!(config.fetch_timeout, Some(Duration::from_secs(5)));
		assert_eq!(config.cache_capacity, Some(8));
	}

	#[test]
	fn test_source_is_required_and_exclusive() {
		assert!(matches!(config(&[]), Err(Error::ConfigError(_))));
		assert!(matches!(
			config(&[("SETTINGS_URL", "http://a"), ("SETTINGS_FILE", "b.json")]),
			Err(Error::ConfigError(_))
		));
	}

	#[test]
	fn test_bad_numbers_are_rejected() {
		let err = config(&[("SETTINGS_FILE", "s.json"), ("SETTINGS_TTL_SECS", "ten")]).unwrap_err();
		assert!(matches!(err, Error::ConfigError(ref msg) if msg.contains("SETTINGS_TTL_SECS")));
	}

	#[test]
	fn test_apply_builds_app() {
		let config = config(&[("SETTINGS_FILE", "s.json"), ("SITE_NAME", "Corner Shop")]).unwrap();
		let mut builder = AppBuilder::new();
		config.apply(&mut builder).unwrap();
		let app = builder.build().unwrap();
		assert_eq!(&*app.opts.site_name, "Corner Shop");
		assert_eq!(app.settings.source(), "file:s.json");
	}
}

// vim: ts=4
