pub use crate::app::App;
pub use sitepages_types::error::{ClResult, Error};
pub use sitepages_types::types::{LegalDocumentConfig, ResolvedDocument, SiteSettings};

pub use tracing::{debug, error, info, warn};

// vim: ts=4
