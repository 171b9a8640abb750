use crate::colour::Colour;
use crate::document::{Bookmark, RenderedDocument};
use crate::error::DocumentError;
use crate::font::{FontMetrics, FontWeight};
use crate::layout::{wrap, Footer, LayoutConfig, LayoutEngine, Line, TextSanitizer};
use crate::model::{Block, Document, Section, StyleHint};
use crate::page::{SpanFont, SpanLayout};
use crate::units::Pt;
use log::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq)]
struct TextStyle {
    weight: FontWeight,
    size: Pt,
    colour: Colour,
}

/// A piece of a line: some text in one style, offset from the left margin
struct Run<'t> {
    text: &'t str,
    style: TextStyle,
    indent: Pt,
}

/// Walks a [`Document`] block by block and lays it out onto pages. Every piece
/// of text is sanitized, wrapped and then placed one line at a time through the
/// layout engine's checked draw.
pub struct Renderer<'a, M: FontMetrics> {
    config: &'a LayoutConfig,
    metrics: &'a M,
    sanitizer: TextSanitizer<&'a M>,
}

impl<'a, M: FontMetrics> Renderer<'a, M> {
    pub fn new(config: &'a LayoutConfig, metrics: &'a M) -> Self {
        Renderer {
            config,
            metrics,
            sanitizer: TextSanitizer::new(metrics),
        }
    }

    /// Lay out the whole document. Fails without producing any pages if any
    /// block can't be measured or placed.
    pub fn render(&self, doc: &Document) -> Result<RenderedDocument, DocumentError> {
        let chars = doc.content_chars();
        if chars > self.config.max_content_chars {
            return Err(DocumentError::ContentTooLarge {
                actual: chars,
                limit: self.config.max_content_chars,
            });
        }
        debug!(
            "rendering `{}`: {} sections, {} characters",
            doc.title,
            doc.sections.len(),
            chars
        );

        let footer = Footer {
            link_text: self.sanitize_single_line(&doc.footer_link_text),
            link_url: doc.footer_link_url.clone(),
            text: doc.footer_text.as_deref().map(|t| self.sanitize_single_line(t)),
        };
        let mut engine = LayoutEngine::new(self.config, self.metrics, footer)?;

        self.render_cover(&mut engine, doc)?;

        let mut bookmarks = Vec::with_capacity(doc.sections.len());
        if !doc.sections.is_empty() {
            engine.begin_content()?;
        }
        for section in doc.sections.iter() {
            bookmarks.push(self.render_section(&mut engine, section)?);
        }

        let pages = engine.finish()?;
        debug!("rendered `{}` onto {} pages", doc.title, pages.len());
        Ok(RenderedDocument {
            pages,
            title: doc.title.clone(),
            subject: Some(doc.subtitle.clone()).filter(|s| !s.is_empty()),
            author: doc.author.clone(),
            bookmarks,
            filename: doc.filename(),
            compress: self.config.compress,
        })
    }

    fn render_cover(
        &self,
        engine: &mut LayoutEngine<'a, &'a M>,
        doc: &Document,
    ) -> Result<(), DocumentError> {
        let typography = &self.config.typography;
        let palette = &self.config.palette;
        let width = self.config.content_width();

        engine.advance(self.config.cover_title_offset)?;
        let title = TextStyle {
            weight: FontWeight::Bold,
            size: typography.title_size,
            colour: palette.primary,
        };
        let lines = self.wrap_text(&doc.title, title, width)?;
        self.draw_lines(engine, &lines, title, Pt(0.0), Pt(0.0))?;

        if !doc.subtitle.trim().is_empty() {
            engine.advance(self.config.paragraph_spacing)?;
            let subtitle = TextStyle {
                weight: FontWeight::Regular,
                size: typography.subtitle_size,
                colour: palette.muted,
            };
            let lines = self.wrap_text(&doc.subtitle, subtitle, width)?;
            self.draw_lines(engine, &lines, subtitle, Pt(0.0), Pt(0.0))?;
        }
        Ok(())
    }

    fn render_section(
        &self,
        engine: &mut LayoutEngine<'a, &'a M>,
        section: &Section,
    ) -> Result<Bookmark, DocumentError> {
        if !engine.at_page_top() {
            engine.advance(self.config.section_spacing)?;
        }

        let style = TextStyle {
            weight: FontWeight::Bold,
            size: self.config.typography.section_heading_size,
            colour: self.config.palette.primary,
        };
        let lines = self.wrap_text(&section.heading, style, self.config.content_width())?;
        let gap = self.heading_gap();
        let keep = section
            .blocks
            .first()
            .map_or(Pt(0.0), |block| gap + self.first_unit_height(block));
        let top = self.draw_lines(engine, &lines, style, Pt(0.0), keep)?;
        let bookmark = Bookmark {
            title: section.heading.clone(),
            page_index: engine.state().page_index - 1,
            top,
        };
        engine.advance(gap)?;

        for (i, block) in section.blocks.iter().enumerate() {
            self.render_block(engine, block, section.blocks.get(i + 1))?;
        }
        Ok(bookmark)
    }

    fn render_block(
        &self,
        engine: &mut LayoutEngine<'a, &'a M>,
        block: &Block,
        next: Option<&Block>,
    ) -> Result<(), DocumentError> {
        let width = self.config.content_width();
        match block {
            Block::Heading(text) => {
                let style = self.heading_style();
                let lines = self.wrap_text(text, style, width)?;
                let gap = self.heading_gap();
                let keep = next.map_or(Pt(0.0), |block| gap + self.first_unit_height(block));
                self.draw_lines(engine, &lines, style, Pt(0.0), keep)?;
                engine.advance(gap)
            }
            Block::Paragraph(text) => {
                let style = self.body_style();
                let lines = self.wrap_text(text, style, width)?;
                self.draw_lines(engine, &lines, style, Pt(0.0), Pt(0.0))?;
                engine.advance(self.config.paragraph_spacing)
            }
            Block::BulletList(items) => {
                self.render_bullets(engine, items)?;
                engine.advance(self.config.paragraph_spacing)
            }
            Block::LabeledField { label, value, style } => {
                let (label_style, value_style) = self.field_styles(*style);
                let label_lines = self.wrap_text(label, label_style, width)?;
                let value_lines = self.wrap_text(value, value_style, width)?;
                // the label always shares a page with the first line of its value
                let keep = self.line_height(value_style);
                self.draw_lines(engine, &label_lines, label_style, Pt(0.0), keep)?;
                self.draw_lines(engine, &value_lines, value_style, Pt(0.0), Pt(0.0))?;
                engine.advance(self.config.paragraph_spacing)
            }
        }
    }

    fn render_bullets(
        &self,
        engine: &mut LayoutEngine<'a, &'a M>,
        items: &[String],
    ) -> Result<(), DocumentError> {
        let style = self.body_style();
        let indent = self.config.bullet_indent;
        let marker = self.sanitize_single_line(&self.config.bullet_marker);
        let marker_width = self
            .metrics
            .width_of_text(style.weight, &marker, style.size)?;
        let marker_indent = ((indent - marker_width) / 2.0).max(Pt(0.0));
        let text_width = self.config.content_width() - indent;

        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                engine.advance(self.config.bullet_spacing)?;
            }
            let lines = self.wrap_text(item, style, text_width)?;
            for (l, line) in lines.iter().enumerate() {
                let text = Run {
                    text: &line.text,
                    style,
                    indent,
                };
                if l == 0 {
                    let bullet = Run {
                        text: &marker,
                        style,
                        indent: marker_indent,
                    };
                    self.draw_runs(engine, &[bullet, text], Pt(0.0))?;
                } else {
                    self.draw_runs(engine, &[text], Pt(0.0))?;
                }
            }
        }
        Ok(())
    }

    /// Draws each line as its own atomic unit. The first `lines.len() - 1` lines
    /// are kept with the rest of the block, and the last with `keep_after` points
    /// of whatever follows. Returns the top of the first line.
    fn draw_lines(
        &self,
        engine: &mut LayoutEngine<'a, &'a M>,
        lines: &[Line],
        style: TextStyle,
        indent: Pt,
        keep_after: Pt,
    ) -> Result<Pt, DocumentError> {
        let line_height = self.line_height(style);
        let mut first_top = None;
        for (i, line) in lines.iter().enumerate() {
            let remaining = lines.len() - i - 1;
            let keep = if keep_after > Pt(0.0) {
                line_height * remaining as f32 + keep_after
            } else {
                Pt(0.0)
            };
            let run = Run {
                text: &line.text,
                style,
                indent,
            };
            let top = self.draw_runs(engine, &[run], keep)?;
            first_top.get_or_insert(top);
        }
        Ok(first_top.unwrap_or(engine.state().cursor_y))
    }

    /// Place one line made of `runs` through the engine's checked draw,
    /// returning the top of its line box
    fn draw_runs(
        &self,
        engine: &mut LayoutEngine<'a, &'a M>,
        runs: &[Run],
        keep_with_next: Pt,
    ) -> Result<Pt, DocumentError> {
        let Some(tallest) = runs
            .iter()
            .map(|r| r.style)
            .max_by(|a, b| a.size.total_cmp(&b.size))
        else {
            return Ok(engine.state().cursor_y);
        };
        let height = self.line_height(tallest);
        let leading = (height - tallest.size) / 2.0;
        let ascent = self.metrics.ascent(tallest.weight, tallest.size);

        let mut top = Pt(0.0);
        engine.checked_draw_keep(height, keep_with_next, |page, frame| {
            top = frame.top;
            let baseline = frame.top - leading - ascent;
            for run in runs.iter().filter(|r| !r.text.is_empty()) {
                trace!("page line at {baseline}: {:?}", run.text);
                page.add_span(SpanLayout {
                    text: run.text.to_string(),
                    font: SpanFont {
                        weight: run.style.weight,
                        size: run.style.size,
                    },
                    colour: run.style.colour,
                    coords: (frame.left + run.indent, baseline),
                });
            }
            Ok(())
        })?;
        Ok(top)
    }

    fn wrap_text(&self, raw: &str, style: TextStyle, width: Pt) -> Result<Vec<Line>, DocumentError> {
        let text = self.sanitizer.sanitize(raw);
        wrap(&text, width, |s| {
            self.metrics.width_of_text(style.weight, s, style.size)
        })
    }

    fn sanitize_single_line(&self, raw: &str) -> String {
        self.sanitizer.sanitize(raw).replace(['\n', '\r'], " ")
    }

    fn line_height(&self, style: TextStyle) -> Pt {
        self.config.typography.line_height(style.size)
    }

    fn heading_gap(&self) -> Pt {
        self.config.paragraph_spacing / 2.0
    }

    /// Height of the smallest piece of `block` a heading must not be separated from
    fn first_unit_height(&self, block: &Block) -> Pt {
        match block {
            Block::Heading(_) => self.line_height(self.heading_style()),
            Block::Paragraph(_) | Block::BulletList(_) => self.line_height(self.body_style()),
            Block::LabeledField { style, .. } => {
                let (label, value) = self.field_styles(*style);
                self.line_height(label) + self.line_height(value)
            }
        }
    }

    fn body_style(&self) -> TextStyle {
        TextStyle {
            weight: FontWeight::Regular,
            size: self.config.typography.body_size,
            colour: self.config.palette.text,
        }
    }

    fn heading_style(&self) -> TextStyle {
        TextStyle {
            weight: FontWeight::Bold,
            size: self.config.typography.heading_size,
            colour: self.config.palette.text,
        }
    }

    /// Label and value styles for a labeled field
    fn field_styles(&self, hint: StyleHint) -> (TextStyle, TextStyle) {
        let typography = &self.config.typography;
        let palette = &self.config.palette;
        let body = self.body_style();
        match hint {
            StyleHint::Standard => (
                TextStyle {
                    weight: FontWeight::Bold,
                    ..body
                },
                body,
            ),
            StyleHint::Contact => (
                TextStyle {
                    weight: FontWeight::Bold,
                    ..body
                },
                TextStyle {
                    weight: FontWeight::Regular,
                    size: typography.contact_size,
                    colour: palette.accent,
                },
            ),
            StyleHint::Highlight => (
                TextStyle {
                    weight: FontWeight::Regular,
                    size: typography.contact_size,
                    colour: palette.muted,
                },
                TextStyle {
                    weight: FontWeight::Bold,
                    size: typography.highlight_size,
                    colour: palette.primary,
                },
            ),
        }
    }
}
