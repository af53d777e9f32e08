//! Date range math and window planning.
//!
//! Splits a `[from, to]` calendar range into fixed-size windows, one per
//! remote job, handed out in chronological order by a moving cursor.

mod cursor;
mod window;

pub use cursor::{plan_windows, RangePartitioner};
pub use window::DateWindow;
