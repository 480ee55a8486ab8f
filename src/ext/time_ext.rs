use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

const LISTING_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");
const CLOCK_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[hour]:[minute]:[second]");

pub trait OffsetDateTimeExt {
    /// Date and minute, as shown by `ls -l`
    fn to_listing_string(&self) -> String;
    /// Time of day, as shown by `ps`
    fn to_clock_string(&self) -> String;
}

impl OffsetDateTimeExt for OffsetDateTime {
    fn to_listing_string(&self) -> String {
        self.format(LISTING_FORMAT)
            .unwrap_or_else(|_| self.to_string())
    }

    fn to_clock_string(&self) -> String {
        self.format(CLOCK_FORMAT).unwrap_or_else(|_| self.to_string())
    }
}
