use crate::colour::{colours, Colour};
use crate::error::DocumentError;
use crate::layout::Margins;
use crate::pagesize::{self, Orientation, PageSize};
use crate::units::{In, Pt};
use serde::{Deserialize, Deserializer};

/// What to do with a single unit of content (one line, one bullet line, a label
/// with its value) that is taller than the usable height of an empty page, or
/// with cover text that runs past the bottom of the cover
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Fail the whole generation with [`DocumentError::LayoutOverflow`] or
    /// [`DocumentError::CoverOverflow`]
    #[default]
    Error,
    /// Draw the unit at the top of a fresh page (or where it is on the cover) and
    /// let it run past the bottom margin
    ForceDraw,
}

/// Font sizes and line spacing
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Typography {
    pub title_size: Pt,
    pub subtitle_size: Pt,
    pub section_heading_size: Pt,
    pub heading_size: Pt,
    pub body_size: Pt,
    /// Size of values in contact-style labeled fields
    pub contact_size: Pt,
    /// Size of values in highlight-style labeled fields
    pub highlight_size: Pt,
    pub footer_size: Pt,
    /// Line height as a multiple of the font size
    pub line_spacing: f32,
}

impl Default for Typography {
    fn default() -> Self {
        Typography {
            title_size: Pt(30.0),
            subtitle_size: Pt(15.0),
            section_heading_size: Pt(17.0),
            heading_size: Pt(13.0),
            body_size: Pt(10.5),
            contact_size: Pt(9.5),
            highlight_size: Pt(15.0),
            footer_size: Pt(8.0),
            line_spacing: 1.4,
        }
    }
}

impl Typography {
    /// Vertical space a line set at `size` occupies
    pub fn line_height(&self, size: Pt) -> Pt {
        size * self.line_spacing
    }
}

/// Branding colours
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Cover band, section headings and highlight values
    pub primary: Colour,
    /// Contact values and links
    pub accent: Colour,
    /// Body copy
    pub text: Colour,
    /// Footers and secondary labels
    pub muted: Colour,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            primary: colours::NAVY,
            accent: colours::TEAL,
            text: colours::SLATE,
            muted: colours::GREY,
        }
    }
}

/// Every tunable of page geometry and styling. Nothing in the layout engine reads
/// global state; two generations with equal configs lay out identically.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Either a named size (`"letter"`, `"a4"`, ...) or `[width, height]` in points
    #[serde(deserialize_with = "deserialize_page_size")]
    pub page_size: PageSize,
    /// Turns `page_size` to portrait or landscape; absent keeps it as given
    pub orientation: Option<Orientation>,
    pub margins: Margins,
    pub typography: Typography,
    pub palette: Palette,
    /// Space after each paragraph, labeled field and bullet list
    pub paragraph_spacing: Pt,
    /// Space before every section heading except the first on a page
    pub section_spacing: Pt,
    /// Horizontal offset of bullet item text from the left margin
    pub bullet_indent: Pt,
    /// Fixed space between consecutive bullet items
    pub bullet_spacing: Pt,
    pub bullet_marker: String,
    /// Height of the coloured band across the top of the cover page
    pub cover_band_height: Pt,
    /// Distance from the top margin of the cover to the title
    pub cover_title_offset: Pt,
    pub overflow_policy: OverflowPolicy,
    /// Maximum number of pages (cover included) a document may produce
    pub max_pages: usize,
    /// Maximum number of characters of text a document spec may carry
    pub max_content_chars: usize,
    /// Deflate page content streams
    pub compress: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            page_size: pagesize::LETTER,
            orientation: None,
            margins: Margins::all(In(0.75)),
            typography: Typography::default(),
            palette: Palette::default(),
            paragraph_spacing: Pt(8.0),
            section_spacing: Pt(18.0),
            bullet_indent: Pt(18.0),
            bullet_spacing: Pt(3.0),
            bullet_marker: "\u{2022}".to_string(),
            cover_band_height: In(1.25).into(),
            cover_title_offset: In(2.0).into(),
            overflow_policy: OverflowPolicy::Error,
            max_pages: 500,
            max_content_chars: 2_000_000,
            compress: true,
        }
    }
}

impl LayoutConfig {
    /// Parse a JSON layout config; absent fields take their default values
    pub fn from_json(json: &str) -> Result<LayoutConfig, DocumentError> {
        let config: LayoutConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject geometry no document could be laid out in
    pub fn validate(&self) -> Result<(), DocumentError> {
        let invalid = |msg: String| Err(DocumentError::InputValidation(msg));
        let (width, height) = self.page_dimensions();
        if !width.is_finite() || !height.is_finite() || width <= Pt(0.0) || height <= Pt(0.0) {
            return invalid(format!("page size {width} x {height} is not a usable page"));
        }
        let margins = &self.margins;
        for (name, margin) in [
            ("top", margins.top),
            ("right", margins.right),
            ("bottom", margins.bottom),
            ("left", margins.left),
        ] {
            if !margin.is_finite() || margin < Pt(0.0) {
                return invalid(format!("{name} margin must be zero or more, got {margin}"));
            }
        }
        if self.usable_height() <= Pt(0.0) {
            return invalid(format!(
                "vertical margins ({} + {}) leave no room on a page {} tall",
                margins.top, margins.bottom, height
            ));
        }
        if !self.bullet_indent.is_finite() || self.bullet_indent < Pt(0.0) {
            return invalid(format!("bullet indent must be zero or more, got {}", self.bullet_indent));
        }
        if self.content_width() <= self.bullet_indent {
            return invalid(format!(
                "content width {} leaves no room for bullet text indented by {}",
                self.content_width(),
                self.bullet_indent
            ));
        }

        let typography = &self.typography;
        if !typography.line_spacing.is_finite() || typography.line_spacing <= 0.0 {
            return invalid("line spacing must be positive".to_string());
        }
        for (name, size) in [
            ("title_size", typography.title_size),
            ("subtitle_size", typography.subtitle_size),
            ("section_heading_size", typography.section_heading_size),
            ("heading_size", typography.heading_size),
            ("body_size", typography.body_size),
            ("contact_size", typography.contact_size),
            ("highlight_size", typography.highlight_size),
            ("footer_size", typography.footer_size),
        ] {
            if !size.is_finite() || size <= Pt(0.0) || !typography.line_height(size).is_finite() {
                return invalid(format!("typography.{name} must be positive, got {size}"));
            }
        }

        for (name, gap) in [
            ("paragraph_spacing", self.paragraph_spacing),
            ("section_spacing", self.section_spacing),
            ("bullet_spacing", self.bullet_spacing),
            ("cover_band_height", self.cover_band_height),
            ("cover_title_offset", self.cover_title_offset),
        ] {
            if !gap.is_finite() || gap < Pt(0.0) {
                return invalid(format!("{name} must be zero or more, got {gap}"));
            }
        }

        if self.max_pages < 2 {
            return invalid("max_pages must allow a cover and one content page".to_string());
        }
        Ok(())
    }

    /// `page_size` turned to the configured orientation
    pub fn page_dimensions(&self) -> PageSize {
        match self.orientation {
            Some(orientation) => orientation.apply(self.page_size),
            None => self.page_size,
        }
    }

    pub fn content_width(&self) -> Pt {
        self.page_dimensions().0 - self.margins.left - self.margins.right
    }

    /// Height between the top and bottom margins
    pub fn usable_height(&self) -> Pt {
        self.page_dimensions().1 - self.margins.top - self.margins.bottom
    }
}

fn deserialize_page_size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PageSize, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PageSizeSpec {
        Named(String),
        Dimensions(Pt, Pt),
    }

    match PageSizeSpec::deserialize(deserializer)? {
        PageSizeSpec::Named(name) => pagesize::by_name(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown page size `{name}`"))),
        PageSizeSpec::Dimensions(width, height) => Ok((width, height)),
    }
}
