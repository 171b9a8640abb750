//! The page cursor.
//!
//! A [`LayoutEngine`] owns the pages of one generation call and the vertical
//! write position on the last of them. Content is only ever placed through
//! [`LayoutEngine::checked_draw`] (or its look-ahead form
//! [`LayoutEngine::checked_draw_keep`]), which breaks to a fresh page first if
//! the unit being drawn would cross the bottom margin.
//!
//! Page 1 is the cover and carries no number. Whatever is drawn before
//! [`LayoutEngine::begin_content`] stays on the cover. Content pages are numbered
//! from 2, and each page's footer is stamped with its number when the cursor
//! leaves it.

use crate::colour::Colour;
use crate::error::DocumentError;
use crate::font::{FontMetrics, FontWeight};
use crate::layout::{LayoutConfig, Margins, OverflowPolicy};
use crate::page::{FillLayout, LinkLayout, Page, SpanFont, SpanLayout};
use crate::rect::Rect;
use crate::units::Pt;
use log::{debug, warn};

/// Geometry and cursor of the page currently being written
#[derive(Debug, Clone, PartialEq)]
pub struct PageState {
    /// 1-based; the cover is page 1
    pub page_index: usize,
    /// Top of the next line box, measured up from the bottom edge of the page
    pub cursor_y: Pt,
    pub page_width: Pt,
    pub page_height: Pt,
    pub margins: Margins,
}

impl PageState {
    pub fn top_limit(&self) -> Pt {
        self.page_height - self.margins.top
    }

    pub fn bottom_limit(&self) -> Pt {
        self.margins.bottom
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    AwaitingContent,
    PageBreakPending,
    Done,
}

/// Where a draw callback may place its unit: `top` is the top of the unit's box
/// and `left`/`width` span the content area between the side margins
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub left: Pt,
    pub top: Pt,
    pub width: Pt,
}

/// Text stamped into page footers. Strings must already be sanitized for the
/// active fonts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Footer {
    /// Centred in the cover's bottom margin
    pub link_text: String,
    /// Target of the cover footer, made clickable when present
    pub link_url: Option<String>,
    /// Left-aligned on every content page
    pub text: Option<String>,
}

pub struct LayoutEngine<'a, M: FontMetrics> {
    config: &'a LayoutConfig,
    metrics: M,
    footer: Footer,
    pages: Vec<Page>,
    state: PageState,
    phase: CursorState,
}

impl<'a, M: FontMetrics> LayoutEngine<'a, M> {
    /// Allocates and decorates the cover page and places the cursor at its top margin
    pub fn new(config: &'a LayoutConfig, metrics: M, footer: Footer) -> Result<Self, DocumentError> {
        config.validate()?;

        let (page_width, page_height) = config.page_dimensions();
        let state = PageState {
            page_index: 1,
            cursor_y: page_height - config.margins.top,
            page_width,
            page_height,
            margins: config.margins.clone(),
        };

        let mut engine = LayoutEngine {
            config,
            metrics,
            footer,
            pages: vec![Page::new(config.page_dimensions(), &config.margins, None)],
            state,
            phase: CursorState::AwaitingContent,
        };
        engine.decorate_cover()?;
        Ok(engine)
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn phase(&self) -> CursorState {
        self.phase
    }

    pub fn metrics(&self) -> &M {
        &self.metrics
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn content_width(&self) -> Pt {
        self.config.content_width()
    }

    /// True when nothing has been drawn below the top margin of the current page
    pub fn at_page_top(&self) -> bool {
        self.state.cursor_y >= self.state.top_limit()
    }

    /// Leave the cover and open the first content page (page 2). Past the cover,
    /// opens a fresh page unless the current one is still empty.
    pub fn begin_content(&mut self) -> Result<(), DocumentError> {
        self.ensure_active()?;
        if self.on_cover() || !self.at_page_top() {
            self.break_page()?;
        }
        Ok(())
    }

    pub fn on_cover(&self) -> bool {
        self.state.page_index == 1
    }

    /// Move the cursor down by `gap` without drawing. Never crosses the bottom
    /// margin; the next checked draw decides whether a break is needed.
    pub fn advance(&mut self, gap: Pt) -> Result<(), DocumentError> {
        self.ensure_active()?;
        self.state.cursor_y = (self.state.cursor_y - gap).max(self.state.bottom_limit());
        Ok(())
    }

    /// Draw one atomic unit of `height`, breaking to a new page first if it would
    /// cross the bottom margin. The cursor moves down by `height` afterwards.
    pub fn checked_draw<F>(&mut self, height: Pt, draw: F) -> Result<(), DocumentError>
    where
        F: FnOnce(&mut Page, Frame) -> Result<(), DocumentError>,
    {
        self.checked_draw_keep(height, Pt(0.0), draw)
    }

    /// Like [`LayoutEngine::checked_draw`], but the unit is also kept on the same
    /// page as the next `keep_with_next` points of content. Only `height` is
    /// consumed.
    pub fn checked_draw_keep<F>(
        &mut self,
        height: Pt,
        keep_with_next: Pt,
        draw: F,
    ) -> Result<(), DocumentError>
    where
        F: FnOnce(&mut Page, Frame) -> Result<(), DocumentError>,
    {
        self.ensure_active()?;
        if self.on_cover() {
            return self.draw_on_cover(height, draw);
        }

        let available = self.config.usable_height();
        if height > available {
            return self.draw_oversized(height, available, draw);
        }

        // look-ahead never asks for more than a whole page
        let needed = (height + keep_with_next).min(available);
        if self.state.cursor_y - needed < self.state.bottom_limit() {
            self.break_page()?;
        }

        let frame = self.frame();
        draw(self.current_page()?, frame)?;
        self.state.cursor_y -= height;
        self.debug_check_cursor();
        Ok(())
    }

    /// Stamp the last page's footer and hand over the pages. The engine accepts
    /// no further content afterwards.
    pub fn finish(&mut self) -> Result<Vec<Page>, DocumentError> {
        self.ensure_active()?;
        self.stamp_footer()?;
        self.phase = CursorState::Done;
        debug!("layout finished with {} pages", self.pages.len());
        Ok(std::mem::take(&mut self.pages))
    }

    /// The cover never breaks: a unit that doesn't fit in what is left of it
    /// follows the overflow policy without leaving page 1
    fn draw_on_cover<F>(&mut self, height: Pt, draw: F) -> Result<(), DocumentError>
    where
        F: FnOnce(&mut Page, Frame) -> Result<(), DocumentError>,
    {
        let available = self.state.cursor_y - self.state.bottom_limit();
        let fits = height <= available;
        if !fits {
            match self.config.overflow_policy {
                OverflowPolicy::Error => {
                    return Err(DocumentError::CoverOverflow { height, available })
                }
                OverflowPolicy::ForceDraw => warn!(
                    "cover content of height {height} exceeds the {available} left on the cover; drawing past the bottom margin"
                ),
            }
        }

        let frame = self.frame();
        draw(self.current_page()?, frame)?;
        self.state.cursor_y = if fits {
            self.state.cursor_y - height
        } else {
            self.state.bottom_limit()
        };
        self.debug_check_cursor();
        Ok(())
    }

    fn draw_oversized<F>(&mut self, height: Pt, available: Pt, draw: F) -> Result<(), DocumentError>
    where
        F: FnOnce(&mut Page, Frame) -> Result<(), DocumentError>,
    {
        match self.config.overflow_policy {
            OverflowPolicy::Error => Err(DocumentError::LayoutOverflow { height, available }),
            OverflowPolicy::ForceDraw => {
                warn!(
                    "content unit of height {height} is taller than the usable page height {available}; drawing past the bottom margin"
                );
                if !self.at_page_top() {
                    self.break_page()?;
                }
                let frame = self.frame();
                draw(self.current_page()?, frame)?;
                self.state.cursor_y = self.state.bottom_limit();
                self.debug_check_cursor();
                Ok(())
            }
        }
    }

    fn ensure_active(&self) -> Result<(), DocumentError> {
        match self.phase {
            CursorState::Done => Err(DocumentError::LayoutFinished),
            _ => Ok(()),
        }
    }

    fn frame(&self) -> Frame {
        Frame {
            left: self.state.margins.left,
            top: self.state.cursor_y,
            width: self.config.content_width(),
        }
    }

    fn current_page(&mut self) -> Result<&mut Page, DocumentError> {
        // only `finish` empties the page list, and it also moves the engine to `Done`
        self.pages.last_mut().ok_or(DocumentError::LayoutFinished)
    }

    fn break_page(&mut self) -> Result<(), DocumentError> {
        self.phase = CursorState::PageBreakPending;
        if self.pages.len() >= self.config.max_pages {
            return Err(DocumentError::PageLimitExceeded {
                limit: self.config.max_pages,
            });
        }

        self.stamp_footer()?;
        self.state.page_index += 1;
        self.pages.push(Page::new(
            self.config.page_dimensions(),
            &self.config.margins,
            Some(self.state.page_index),
        ));
        self.state.cursor_y = self.state.top_limit();
        debug!("page break: now on page {}", self.state.page_index);

        self.phase = CursorState::AwaitingContent;
        Ok(())
    }

    /// Baseline shared by every footer element: centred in the bottom margin
    fn footer_baseline(&self) -> Pt {
        let size = self.config.typography.footer_size;
        ((self.state.margins.bottom - size) / 2.0).max(Pt(0.0))
    }

    fn decorate_cover(&mut self) -> Result<(), DocumentError> {
        let config = self.config;
        let palette = &config.palette;
        let (width, height) = config.page_dimensions();
        let band = FillLayout {
            rect: Rect {
                x1: Pt(0.0),
                y1: height - config.cover_band_height,
                x2: width,
                y2: height,
            },
            colour: palette.primary,
        };

        let size = config.typography.footer_size;
        let link_text = self.footer.link_text.clone();
        let text_width = self
            .metrics
            .width_of_text(FontWeight::Regular, &link_text, size)?;
        let x = (width - text_width) / 2.0;
        let baseline = self.footer_baseline();
        let link = self.footer.link_url.clone();

        let page = self.current_page()?;
        page.add_fill(band);
        if link_text.is_empty() {
            return Ok(());
        }
        page.add_span(footer_span(link_text, size, palette.accent, x, baseline));
        if let Some(uri) = link {
            page.add_link(LinkLayout {
                rect: Rect {
                    x1: x,
                    y1: baseline - size * 0.25,
                    x2: x + text_width,
                    y2: baseline + size,
                },
                uri,
            });
        }
        Ok(())
    }

    /// Draw the rule, footer text and page number into the current page's bottom
    /// margin. The cover has its own footer and is left alone.
    fn stamp_footer(&mut self) -> Result<(), DocumentError> {
        let Some(number) = self.pages.last().and_then(|page| page.number) else {
            return Ok(());
        };

        let config = self.config;
        let palette = &config.palette;
        let size = config.typography.footer_size;
        let left = self.state.margins.left;
        let right = self.state.page_width - self.state.margins.right;
        let baseline = self.footer_baseline();

        let label = format!("Page {number}");
        let label_width = self.metrics.width_of_text(FontWeight::Regular, &label, size)?;
        let rule_y = (baseline + size * 1.5).min(self.state.margins.bottom);
        let text = self.footer.text.clone();

        let page = self.current_page()?;
        page.add_fill(FillLayout {
            rect: Rect {
                x1: left,
                y1: rule_y - Pt(0.5),
                x2: right,
                y2: rule_y,
            },
            colour: palette.muted,
        });
        if let Some(text) = text.filter(|t| !t.is_empty()) {
            page.add_span(footer_span(text, size, palette.muted, left, baseline));
        }
        page.add_span(footer_span(
            label,
            size,
            palette.muted,
            right - label_width,
            baseline,
        ));
        Ok(())
    }

    fn debug_check_cursor(&self) {
        debug_assert!(
            self.state.cursor_y >= self.state.bottom_limit()
                && self.state.cursor_y <= self.state.top_limit(),
            "cursor {} escaped [{}, {}] on page {}",
            self.state.cursor_y,
            self.state.bottom_limit(),
            self.state.top_limit(),
            self.state.page_index
        );
    }
}

fn footer_span(text: String, size: Pt, colour: Colour, x: Pt, baseline: Pt) -> SpanLayout {
    SpanLayout {
        text,
        font: SpanFont {
            weight: FontWeight::Regular,
            size,
        },
        colour,
        coords: (x, baseline),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colour::colours;

    /// every character is half the font size wide, ascent is 0.75 of the size
    struct FixedAdvance;

    impl FontMetrics for FixedAdvance {
        fn width_of_text(&self, _: FontWeight, text: &str, size: Pt) -> Result<Pt, DocumentError> {
            Ok(size * 0.5 * text.chars().count() as f32)
        }

        fn ascent(&self, _: FontWeight, size: Pt) -> Pt {
            size * 0.75
        }

        fn supports(&self, _: FontWeight, ch: char) -> bool {
            ch.is_ascii()
        }
    }

    /// 100pt of usable height per page
    fn small_pages() -> LayoutConfig {
        LayoutConfig {
            page_size: (Pt(200.0), Pt(140.0)),
            margins: Margins::all(Pt(20.0)),
            bullet_indent: Pt(10.0),
            ..LayoutConfig::default()
        }
    }

    fn footer() -> Footer {
        Footer {
            link_text: "example.com".to_string(),
            link_url: Some("https://example.com".to_string()),
            text: Some("Confidential".to_string()),
        }
    }

    fn marker(page: &mut Page, frame: Frame) -> Result<(), DocumentError> {
        page.add_span(SpanLayout {
            text: "x".to_string(),
            font: SpanFont {
                weight: FontWeight::Regular,
                size: Pt(10.0),
            },
            colour: colours::BLACK,
            coords: (frame.left, frame.top),
        });
        Ok(())
    }

    #[test]
    fn starts_on_a_decorated_cover() {
        let config = small_pages();
        let engine = LayoutEngine::new(&config, FixedAdvance, footer()).unwrap();
        assert_eq!(engine.phase(), CursorState::AwaitingContent);
        assert_eq!(engine.state().page_index, 1);
        assert_eq!(engine.state().cursor_y, Pt(120.0));
        assert!(engine.at_page_top());
        assert_eq!(engine.page_count(), 1);
    }

    #[test]
    fn breaks_before_a_unit_that_would_cross_the_bottom_margin() {
        let config = small_pages();
        let mut engine = LayoutEngine::new(&config, FixedAdvance, footer()).unwrap();
        engine.begin_content().unwrap();
        assert_eq!(engine.state().page_index, 2);

        for _ in 0..4 {
            engine.checked_draw(Pt(25.0), marker).unwrap();
        }
        // exactly full
        assert_eq!(engine.state().page_index, 2);
        assert_eq!(engine.state().cursor_y, Pt(20.0));

        engine.checked_draw(Pt(1.0), marker).unwrap();
        assert_eq!(engine.state().page_index, 3);
        assert_eq!(engine.state().cursor_y, Pt(119.0));
    }

    #[test]
    fn cursor_stays_in_bounds_and_pages_number_from_two() {
        let config = small_pages();
        let mut engine = LayoutEngine::new(&config, FixedAdvance, footer()).unwrap();
        engine.begin_content().unwrap();
        let heights = [7.0, 13.0, 30.0, 2.5, 41.0, 19.0, 60.0, 11.0, 99.0, 3.0];
        for _ in 0..5 {
            for h in heights {
                engine.checked_draw(Pt(h), marker).unwrap();
                let state = engine.state();
                assert!(state.cursor_y >= state.bottom_limit());
                assert!(state.cursor_y <= state.top_limit());
            }
            engine.advance(Pt(8.0)).unwrap();
        }

        let pages = engine.finish().unwrap();
        assert_eq!(pages[0].number, None);
        let numbers: Vec<usize> = pages[1..].iter().filter_map(|p| p.number).collect();
        let expected: Vec<usize> = (2..pages.len() + 1).collect();
        assert_eq!(numbers, expected);

        // every content page has its number stamped in the footer
        for page in pages[1..].iter() {
            let label = format!("Page {}", page.number.unwrap());
            assert!(page.spans().any(|span| span.text == label));
        }
    }

    #[test]
    fn keep_with_next_moves_the_unit_to_the_next_page() {
        let config = small_pages();
        let mut engine = LayoutEngine::new(&config, FixedAdvance, footer()).unwrap();
        engine.begin_content().unwrap();
        engine.checked_draw(Pt(70.0), marker).unwrap();

        // 20 fits, but not together with the 15 that must follow it
        engine.checked_draw_keep(Pt(20.0), Pt(15.0), marker).unwrap();
        assert_eq!(engine.state().page_index, 3);
        assert_eq!(engine.state().cursor_y, Pt(100.0));
    }

    #[test]
    fn advance_never_crosses_the_bottom_margin() {
        let config = small_pages();
        let mut engine = LayoutEngine::new(&config, FixedAdvance, footer()).unwrap();
        engine.begin_content().unwrap();
        engine.advance(Pt(500.0)).unwrap();
        assert_eq!(engine.state().cursor_y, Pt(20.0));
        assert_eq!(engine.state().page_index, 2);
    }

    #[test]
    fn oversized_units_fail_by_default() {
        let config = small_pages();
        let mut engine = LayoutEngine::new(&config, FixedAdvance, footer()).unwrap();
        engine.begin_content().unwrap();
        let err = engine.checked_draw(Pt(150.0), marker).unwrap_err();
        assert!(matches!(
            err,
            DocumentError::LayoutOverflow { height, available } if height == Pt(150.0) && available == Pt(100.0)
        ));
    }

    #[test]
    fn oversized_units_can_be_forced_onto_a_fresh_page() {
        let config = LayoutConfig {
            overflow_policy: OverflowPolicy::ForceDraw,
            ..small_pages()
        };
        let mut engine = LayoutEngine::new(&config, FixedAdvance, footer()).unwrap();
        engine.begin_content().unwrap();
        engine.checked_draw(Pt(10.0), marker).unwrap();
        engine.checked_draw(Pt(150.0), marker).unwrap();
        assert_eq!(engine.state().page_index, 3);
        assert_eq!(engine.state().cursor_y, Pt(20.0));

        engine.checked_draw(Pt(10.0), marker).unwrap();
        assert_eq!(engine.state().page_index, 4);
    }

    #[test]
    fn page_ceiling_is_enforced() {
        let config = LayoutConfig {
            max_pages: 3,
            ..small_pages()
        };
        let mut engine = LayoutEngine::new(&config, FixedAdvance, footer()).unwrap();
        engine.begin_content().unwrap();
        let mut result = Ok(());
        for _ in 0..20 {
            result = engine.checked_draw(Pt(40.0), marker);
            if result.is_err() {
                break;
            }
        }
        assert!(matches!(
            result,
            Err(DocumentError::PageLimitExceeded { limit: 3 })
        ));
    }

    #[test]
    fn finished_engines_refuse_more_content() {
        let config = small_pages();
        let mut engine = LayoutEngine::new(&config, FixedAdvance, footer()).unwrap();
        engine.begin_content().unwrap();
        engine.checked_draw(Pt(10.0), marker).unwrap();
        let pages = engine.finish().unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(engine.phase(), CursorState::Done);

        assert!(matches!(
            engine.checked_draw(Pt(10.0), marker),
            Err(DocumentError::LayoutFinished)
        ));
        assert!(matches!(engine.advance(Pt(1.0)), Err(DocumentError::LayoutFinished)));
        assert!(matches!(engine.finish(), Err(DocumentError::LayoutFinished)));
    }

    #[test]
    fn cover_content_never_spills_onto_content_pages() {
        let config = small_pages();
        let mut engine = LayoutEngine::new(&config, FixedAdvance, footer()).unwrap();
        engine.checked_draw(Pt(40.0), marker).unwrap();
        engine.checked_draw(Pt(40.0), marker).unwrap();
        let err = engine.checked_draw(Pt(40.0), marker).unwrap_err();
        assert!(matches!(
            err,
            DocumentError::CoverOverflow { height, available } if height == Pt(40.0) && available == Pt(20.0)
        ));
        assert_eq!(engine.page_count(), 1);
    }

    #[test]
    fn forced_cover_overflow_stays_on_the_cover() {
        let config = LayoutConfig {
            overflow_policy: OverflowPolicy::ForceDraw,
            ..small_pages()
        };
        let mut engine = LayoutEngine::new(&config, FixedAdvance, footer()).unwrap();
        for _ in 0..5 {
            engine.checked_draw(Pt(40.0), marker).unwrap();
        }
        assert_eq!(engine.state().page_index, 1);
        assert_eq!(engine.state().cursor_y, Pt(20.0));

        engine.begin_content().unwrap();
        assert_eq!(engine.state().page_index, 2);
        assert!(engine.at_page_top());
        engine.checked_draw(Pt(10.0), marker).unwrap();

        let pages = engine.finish().unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].spans().filter(|s| s.text == "x").count(), 5);
        assert_eq!(pages[1].number, Some(2));
    }

    #[test]
    fn begin_content_always_opens_an_empty_page() {
        let config = small_pages();
        let mut engine = LayoutEngine::new(&config, FixedAdvance, footer()).unwrap();
        engine.begin_content().unwrap();
        // already on an empty content page
        engine.begin_content().unwrap();
        assert_eq!(engine.state().page_index, 2);

        engine.checked_draw(Pt(10.0), marker).unwrap();
        engine.begin_content().unwrap();
        assert_eq!(engine.state().page_index, 3);
        assert!(engine.at_page_top());
    }

    #[test]
    fn cover_footer_is_a_link() {
        let config = small_pages();
        let mut engine = LayoutEngine::new(&config, FixedAdvance, footer()).unwrap();
        let pages = engine.finish().unwrap();
        let cover = &pages[0];
        assert_eq!(cover.links.len(), 1);
        assert_eq!(cover.links[0].uri, "https://example.com");
        let span = cover.spans().next().unwrap();
        assert_eq!(span.text, "example.com");
        // 11 characters at 4pt each, centred on a 200pt page
        assert_eq!(span.coords.0, Pt(78.0));
    }
}
