//! Gridpack is a small library for packing axis-aligned rectangles into a
//! near-minimal bounding box. It was built as the layout step of a
//! sprite/texture atlas pipeline: the caller hands over the sizes of the
//! tiles to pack and gets back a position for every tile, plus the bounding
//! box they all fit in. Reading image data and compositing the atlas stay on
//! the caller's side.
//!
//! The packer is a greedy heuristic, not an optimal one. Placement happens on
//! an occupancy grid whose rows and columns are split on demand to line up
//! with the rectangles placed so far, and an outer search repeatedly resizes
//! the packing area, re-attempting the layout until shrinking it further
//! stops paying off.
//!
//! ## Example
//! ```
//! use gridpack::{GridPacker, InputItem};
//!
//! // First, transform the rectangles you want to pack into the InputItem
//! // type.
//! let my_items = &[
//!     InputItem::new((128, 64)),
//!     InputItem::new((64, 64)),
//!     InputItem::new((1, 300)),
//! ];
//!
//! // Construct a packer and configure it with your constraints.
//! let packer = GridPacker::new().max_attempts(200);
//!
//! // Compute a solution. GridPacker::pack accepts anything that can turn
//! // into an iterator of InputItem or &InputItem.
//! let output = packer.pack(my_items).unwrap();
//!
//! for item in output.items() {
//!     println!("{:?} -> {:?}", item.id(), item.position());
//! }
//! ```

mod error;
mod geometry;
mod id;
mod matrix;
mod packer;
mod types;

pub use error::*;
pub use id::*;
pub use packer::*;
pub use types::*;
