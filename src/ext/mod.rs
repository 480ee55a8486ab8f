mod path_display_ext;
mod time_ext;

pub use path_display_ext::BestEffortPathExt;
pub use time_ext::OffsetDateTimeExt;
