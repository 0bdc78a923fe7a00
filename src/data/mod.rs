pub mod history;
pub mod loader;
pub mod registry;
pub mod resample;

pub use history::PricePoint;
pub use loader::{HistoryError, HistoryLoader};
pub use registry::AssetRegistry;
pub use resample::{resample, Bar, Interval, UnrecognizedInterval};
