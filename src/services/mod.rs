pub mod checkpoint;
pub mod droid;
pub mod maps_scraper;

pub use droid::*;
pub use maps_scraper::*;
