//! Turns structured outlines (a title, then sections of headings, paragraphs,
//! bullet lists and labeled fields) into paginated, printable PDF documents.
//!
//! ```
//! use prospectus::{generate_from_json, FontSet, LayoutConfig};
//!
//! let spec = r#"{
//!     "title": "Acme Holdings",
//!     "subtitle": "Investor overview",
//!     "footerLinkText": "acme.example",
//!     "sections": [
//!         { "heading": "Overview", "blocks": [ { "type": "paragraph", "text": "We make anvils." } ] }
//!     ]
//! }"#;
//!
//! let artifact = generate_from_json(spec, &LayoutConfig::default(), &FontSet::helvetica())
//!     .expect("spec is valid");
//! assert_eq!(artifact.filename, "acme-holdings.pdf");
//! assert_eq!(artifact.mime_type, "application/pdf");
//! ```

mod colour;
pub use colour::*;

mod content;

mod document;
pub use document::*;

mod font;
pub use font::*;

mod info;

/// Sanitizing, wrapping and placing text on pages
pub mod layout;
pub use layout::LayoutConfig;

mod model;
pub use model::*;

mod outline;

mod page;
pub use page::*;

pub mod pagesize;

mod rect;
pub use rect::*;

pub(crate) mod refs;

mod render;
pub use render::*;

/// Serving generated documents over HTTP
pub mod transport;

mod units;
pub use units::*;

mod error;
pub use error::*;
