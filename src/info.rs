use crate::refs::{ObjectReferences, RefType};
use chrono::{DateTime, Datelike, FixedOffset, Local, Timelike};
use pdf_writer::{Date as PDate, Pdf, TextStr};

/// Document metadata written to the info dictionary
#[derive(Default, Debug, Clone)]
pub struct Info {
    pub title: Option<String>,
    /// No prescribed format
    pub author: Option<String>,
    pub subject: Option<String>,
}

impl Info {
    pub(crate) fn write(&self, refs: &mut ObjectReferences, writer: &mut Pdf) {
        let id = refs.gen(RefType::Info);
        let mut info = writer.document_info(id);

        if let Some(title) = &self.title {
            info.title(TextStr(title.as_str()));
        }
        if let Some(author) = &self.author {
            info.author(TextStr(author.as_str()));
        }
        if let Some(subject) = &self.subject {
            info.subject(TextStr(subject.as_str()));
        }
        info.creator(TextStr(concat!(
            env!("CARGO_PKG_NAME"),
            " v",
            env!("CARGO_PKG_VERSION")
        )));
        info.creation_date(pdf_date(Local::now().fixed_offset()));
    }
}

fn pdf_date(when: DateTime<FixedOffset>) -> PDate {
    let offset_minutes = when.offset().local_minus_utc() / 60;
    PDate::new(when.year() as u16)
        .month(when.month() as u8)
        .day(when.day() as u8)
        .hour(when.hour() as u8)
        .minute(when.minute() as u8)
        .second(when.second() as u8)
        .utc_offset_hour((offset_minutes / 60) as i8)
        .utc_offset_minute((offset_minutes % 60).unsigned_abs() as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_metadata_and_creator() {
        let mut refs = ObjectReferences::new();
        let mut writer = Pdf::new();
        Info {
            title: Some("Quarterly Update".to_string()),
            author: None,
            subject: Some("Q3".to_string()),
        }
        .write(&mut refs, &mut writer);
        let bytes = writer.finish();
        let raw = String::from_utf8_lossy(&bytes);
        assert!(raw.contains("/Title (Quarterly Update)"));
        assert!(raw.contains("/Subject (Q3)"));
        assert!(!raw.contains("/Author"));
        assert!(raw.contains("/Creator (prospectus v"));
        assert!(refs.get(RefType::Info).is_some());
    }

    #[test]
    fn negative_offsets_keep_their_minutes() {
        let newfoundland = FixedOffset::west_opt(3 * 3600 + 30 * 60).unwrap();
        let when = DateTime::parse_from_rfc3339("2024-03-05T07:08:09-03:30")
            .unwrap()
            .with_timezone(&newfoundland);
        let mut writer = Pdf::new();
        writer.document_info(pdf_writer::Ref::new(1)).creation_date(pdf_date(when));
        let raw = String::from_utf8_lossy(&writer.finish()).to_string();
        assert!(raw.contains("(D:20240305070809-03'30"), "{raw}");
    }
}
