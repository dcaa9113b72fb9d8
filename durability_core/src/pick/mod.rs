//! Weighted random selection
//!
//! - [`PickOne`]: single-slot reservoir, one pass, one winner
//! - [`PickList`]: pool that can be pulled repeatedly without replacement

mod list;
mod one;

pub use list::PickList;
pub use one::PickOne;
