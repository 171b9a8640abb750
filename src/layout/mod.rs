//! Positioning content on pages.
//!
//! Text flows through three stages before it reaches a page:
//!
//! - [`TextSanitizer`](crate::layout::TextSanitizer) folds typographic characters
//!   down to what the active fonts can draw
//! - [`wrap`](crate::layout::wrap()) greedily breaks it into lines no wider than
//!   the content area
//! - [`LayoutEngine`](crate::layout::LayoutEngine) places each line, breaking to
//!   a new page whenever the next line would cross the bottom margin
//!
//! # Example
//!
//! ```
//! use prospectus::{FontMetrics, FontSet, FontWeight};
//! use prospectus::layout::{wrap, Footer, LayoutConfig, LayoutEngine, TextSanitizer};
//!
//! let config = LayoutConfig::default();
//! let fonts = FontSet::helvetica();
//! let sanitizer = TextSanitizer::new(&fonts);
//!
//! let text = sanitizer.sanitize("Growth \u{2014} year over year");
//! let size = config.typography.body_size;
//! let lines = wrap(&text, config.content_width(), |s| {
//!     fonts.width_of_text(FontWeight::Regular, s, size)
//! })
//! .expect("helvetica can measure sanitized text");
//!
//! let mut engine = LayoutEngine::new(&config, &fonts, Footer::default()).expect("valid config");
//! engine.begin_content().expect("engine is active");
//! for _line in lines {
//!     engine
//!         .checked_draw(config.typography.line_height(size), |_page, _frame| Ok(()))
//!         .expect("a line fits on a page");
//! }
//! let pages = engine.finish().expect("engine is active");
//! assert_eq!(pages.len(), 2);
//! ```

mod config;
mod engine;
mod margins;
mod sanitize;
mod wrap;

pub use config::*;
pub use engine::*;
pub use margins::*;
pub use sanitize::*;
pub use wrap::*;
