//! Escaping and validation of user input.
//!
//! - [`html`]: entity escaping for text and attributes
//! - [`path`]: containment checks for files read and written
//! - [`link`]: link target validation

mod html;
mod path;
mod link;

pub use html::{escape_text, unescape};
pub use path::{normalize_path, safe_join, validate_path};
pub use link::validate_link_url;
