use crate::colour::Colour;
use crate::content::render_contents;
use crate::font::{FontSet, FontWeight};
use crate::layout::Margins;
use crate::pagesize::PageSize;
use crate::rect::Rect;
use crate::refs::{ObjectReferences, RefType};
use crate::units::Pt;
use crate::DocumentError;
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use pdf_writer::types::{ActionType, AnnotationType};
use pdf_writer::{Filter, Finish, Name, Pdf, Str};

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SpanFont {
    pub weight: FontWeight,
    pub size: Pt,
}

/// A run of text placed with its baseline starting at `coords`
#[derive(Clone, PartialEq, Debug)]
pub struct SpanLayout {
    pub text: String,
    pub font: SpanFont,
    pub colour: Colour,
    pub coords: (Pt, Pt),
}

/// A solid rectangle, used for bands and rules
#[derive(Clone, PartialEq, Debug)]
pub struct FillLayout {
    pub rect: Rect,
    pub colour: Colour,
}

/// A clickable region that opens a URI
#[derive(Clone, PartialEq, Debug)]
pub struct LinkLayout {
    pub rect: Rect,
    pub uri: String,
}

#[derive(Clone, PartialEq, Debug)]
pub enum PageContents {
    Text(Vec<SpanLayout>),
    Fill(FillLayout),
}

/// One laid-out page
#[derive(Clone, Debug)]
pub struct Page {
    /// The size of the page
    pub media_box: Rect,
    /// Where content can live, i.e. within the margins
    pub content_box: Rect,
    /// The number printed in the page's footer; the cover has none
    pub number: Option<usize>,
    /// The laid out text and shapes, in drawing order
    pub contents: Vec<PageContents>,
    pub links: Vec<LinkLayout>,
}

impl Page {
    pub fn new(size: PageSize, margins: &Margins, number: Option<usize>) -> Page {
        Page {
            media_box: Rect::media_box(size),
            content_box: Rect::content_box(size, margins),
            number,
            contents: Vec::default(),
            links: Vec::default(),
        }
    }

    pub fn add_span(&mut self, span: SpanLayout) {
        match self.contents.last_mut() {
            // consecutive spans share one text block in the content stream
            Some(PageContents::Text(spans)) => spans.push(span),
            _ => self.contents.push(PageContents::Text(vec![span])),
        }
    }

    pub fn add_fill(&mut self, fill: FillLayout) {
        self.contents.push(PageContents::Fill(fill));
    }

    pub fn add_link(&mut self, link: LinkLayout) {
        self.links.push(link);
    }

    /// All text spans on the page, in drawing order
    pub fn spans(&self) -> impl Iterator<Item = &SpanLayout> {
        self.contents.iter().flat_map(|c| match c {
            PageContents::Text(spans) => spans.as_slice(),
            PageContents::Fill(_) => &[] as &[SpanLayout],
        })
    }

    pub(crate) fn write(
        &self,
        refs: &mut ObjectReferences,
        page_index: usize,
        fonts: &FontSet,
        compress: bool,
        writer: &mut Pdf,
    ) -> Result<(), DocumentError> {
        let id = refs.gen(RefType::Page(page_index));
        let page_tree_id = refs.gen(RefType::PageTree);
        let content_id = refs.gen(RefType::ContentForPage(page_index));

        let mut page = writer.page(id);
        page.media_box(self.media_box.into());
        page.art_box(self.content_box.into());
        page.parent(page_tree_id);

        let mut resources = page.resources();
        let mut resource_fonts = resources.fonts();
        for (weight, _) in fonts.faces() {
            let index = weight.index();
            resource_fonts.pair(
                Name(format!("F{index}").as_bytes()),
                refs.gen(RefType::Font(index)),
            );
        }
        resource_fonts.finish();
        resources.finish();

        let link_ids: Vec<_> = (0..self.links.len())
            .map(|link_index| refs.gen(RefType::Annotation(page_index, link_index)))
            .collect();
        if !link_ids.is_empty() {
            page.annotations(link_ids.iter().copied());
        }

        page.contents(content_id);
        page.finish();

        for (link, id) in self.links.iter().zip(link_ids) {
            let mut annotation = writer.annotation(id);
            annotation.subtype(AnnotationType::Link);
            annotation.rect(link.rect.into());
            annotation.border(0.0, 0.0, 0.0, None);
            annotation
                .action()
                .action_type(ActionType::Uri)
                .uri(Str(link.uri.as_bytes()));
        }

        let rendered = render_contents(&self.contents, fonts)?;
        if compress {
            let compressed =
                compress_to_vec_zlib(&rendered, CompressionLevel::DefaultCompression as u8);
            writer
                .stream(content_id, compressed.as_slice())
                .filter(Filter::FlateDecode);
        } else {
            writer.stream(content_id, rendered.as_slice());
        }

        Ok(())
    }
}
