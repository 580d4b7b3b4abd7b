//! Pure renderers from API values to styled text.

pub mod calendar;
pub mod hadis;
pub mod header;
pub mod perawi;
pub mod quran;
pub mod sholat;
pub mod utils;

pub use header::{draw_header, HeaderInfo};
pub use utils::truncate;
