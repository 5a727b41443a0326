// Public library interface for bluffing-charts
// The binaries drive charts through these modules

pub mod chart;
pub mod error;
pub mod layout;
pub mod render;
pub mod table;

pub use error::{ChartError, Result};
