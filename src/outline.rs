use crate::document::Bookmark;
use crate::refs::{ObjectReferences, RefType};
use pdf_writer::{Finish, Pdf, Ref, TextStr};

/// A flat document outline: one entry per section, in reading order
#[derive(Default, Debug)]
pub struct Outline<'b> {
    pub entries: &'b [Bookmark],
}

impl<'b> Outline<'b> {
    pub fn from_bookmarks(entries: &'b [Bookmark]) -> Outline<'b> {
        Outline { entries }
    }

    /// Writes the outline root and its items, returning the root's id. Pages
    /// must already have been issued ids. Nothing is written for an empty outline.
    pub(crate) fn write(&self, refs: &mut ObjectReferences, writer: &mut Pdf) -> Option<Ref> {
        if self.entries.is_empty() {
            return None;
        }

        let outlines_id = refs.gen(RefType::Outlines);
        let item_ids: Vec<Ref> = (0..self.entries.len())
            .map(|i| refs.gen(RefType::OutlineEntry(i)))
            .collect();

        let mut outline = writer.outline(outlines_id);
        outline.first(item_ids[0]);
        outline.last(item_ids[item_ids.len() - 1]);
        outline.count(item_ids.len() as i32);
        outline.finish();

        for (i, entry) in self.entries.iter().enumerate() {
            let mut item = writer.outline_item(item_ids[i]);
            item.parent(outlines_id);
            item.title(TextStr(entry.title.as_str()));
            if i > 0 {
                item.prev(item_ids[i - 1]);
            }
            if let Some(next) = item_ids.get(i + 1) {
                item.next(*next);
            }
            let page = refs.gen(RefType::Page(entry.page_index));
            item.dest().page(page).fit_horizontal(entry.top.0);
            item.finish();
        }

        Some(outlines_id)
    }
}
