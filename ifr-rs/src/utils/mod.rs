mod ascii_plot;
mod stats;
pub use ascii_plot::*;
pub use stats::*;
