use thiserror::Error;

use crate::id::Id;

/// Errors surfaced by the public packing API.
///
/// An attempt that merely fails to fit at the current candidate size is not
/// an error; that outcome feeds the search loop internally.
#[derive(Debug, Error)]
pub enum PackError {
    #[error("Cannot pack an empty set of rectangles.")]
    EmptyInput,

    #[error("Rectangle {id:?} has a degenerate size of {width}x{height}.")]
    DegenerateItem { id: Id, width: u32, height: u32 },

    #[error("No packing attempt succeeded within the attempt budget.")]
    NoFit,
}
