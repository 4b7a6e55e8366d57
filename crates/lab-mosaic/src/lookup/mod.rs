//! Block lookup tables
//!
//! [`LookupTableBuilder`] turns a bitmap and a palette into a
//! [`LookupTable`]: the grid of palette indices the renderer paints from.

mod builder;
mod table;

pub use builder::LookupTableBuilder;
pub use table::LookupTable;
