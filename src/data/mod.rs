// Data module.
// Frames built from census downloads, derived breakdowns, and the WIC coverage sheet.

pub mod analysis;
pub mod dataset;
pub mod frame;
pub mod wic;

pub use dataset::{CensusSource, Dataset};
pub use frame::{Frame, RowKey};
pub use wic::{WicCell, WicTable};
