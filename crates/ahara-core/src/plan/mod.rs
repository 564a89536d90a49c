//! Plan synthesis: tagged-text parsing, weekly assembly, defaults, formatting.

pub mod assembler;
pub mod defaults;
pub mod format;
pub mod lexer;
pub mod parser;

pub use assembler::{WEEKLY_NOTES, assemble_week, is_valid_week};
pub use defaults::{DAYS_PER_WEEK, day_offset, default_day, default_meals, default_week, default_week_for};
pub use format::{format_day, format_week};
pub use parser::{MAX_ITEMS_PER_MEAL, clean_items, extract_meals, has_meal_keyword, parse_single_day};
