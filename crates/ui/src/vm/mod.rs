mod chapter_vm;
mod time_fmt;

pub use chapter_vm::{ChapterRowVm, map_chapter_rows};
pub use time_fmt::format_duration;
