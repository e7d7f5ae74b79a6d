use crate::{geometry::Rect, id::Id};

/// An input to the packer.
///
/// `InputItem` is just a 2D size and a generated unique identifier. It's
/// expected that consumers will assign meaning to the given IDs and then use
/// them to associate the packing results back to the application's own
/// objects.
#[derive(Debug, Clone, Copy)]
pub struct InputItem {
    pub(crate) id: Id,
    pub(crate) size: (u32, u32),
}

impl InputItem {
    #[inline]
    pub fn new(size: (u32, u32)) -> Self {
        Self {
            id: Id::new(),
            size,
        }
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }
}

/// An item that was placed by a packing run.
///
/// `OutputItem` corresponds 1:1 to the `InputItem` objects that were passed
/// into the packing function. They expose the ID from the input, as well as
/// position and size.
#[derive(Debug, Clone, Copy)]
pub struct OutputItem {
    pub(crate) id: Id,
    pub(crate) rect: Rect,
}

impl OutputItem {
    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    #[inline]
    pub fn position(&self) -> (u32, u32) {
        self.rect.pos
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.rect.size
    }

    #[inline]
    pub fn min(&self) -> (u32, u32) {
        self.rect.pos
    }

    #[inline]
    pub fn max(&self) -> (u32, u32) {
        self.rect.max()
    }
}

/// The results from one packing run: the bounding box of the best layout that
/// was found, its area, and every item with its final position.
#[derive(Debug, Clone)]
pub struct PackOutput {
    pub(crate) size: (u32, u32),
    pub(crate) area: u64,
    pub(crate) items: Vec<OutputItem>,
}

impl PackOutput {
    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    #[inline]
    pub fn area(&self) -> u64 {
        self.area
    }

    #[inline]
    pub fn items(&self) -> &[OutputItem] {
        &self.items
    }
}

/// Working rectangle used while a packing run is in flight.
///
/// `position` is `None` until the current placement attempt finds a spot for
/// the rectangle; every attempt starts by clearing it again.
#[derive(Debug, Clone)]
pub(crate) struct PackRect {
    id: Id,
    size: (u32, u32),
    position: Option<(u32, u32)>,
}

impl PackRect {
    pub fn new(item: &InputItem) -> Self {
        Self {
            id: item.id,
            size: item.size,
            position: None,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn height(&self) -> u32 {
        self.size.1
    }

    pub fn position(&self) -> Option<(u32, u32)> {
        self.position
    }

    pub fn place(&mut self, position: (u32, u32)) {
        self.position = Some(position);
    }

    pub fn unplace(&mut self) {
        self.position = None;
    }

    pub fn left(&self) -> u32 {
        match self.position {
            Some((x, _)) => x,
            None => 0,
        }
    }

    pub fn top(&self) -> u32 {
        match self.position {
            Some((_, y)) => y,
            None => 0,
        }
    }

    /// Right edge of the rectangle. An unplaced rectangle reports its bare
    /// width.
    pub fn right(&self) -> u32 {
        match self.position {
            Some((x, _)) => x + self.size.0,
            None => self.size.0,
        }
    }

    /// Bottom edge of the rectangle. An unplaced rectangle reports its bare
    /// height.
    pub fn bottom(&self) -> u32 {
        match self.position {
            Some((_, y)) => y + self.size.1,
            None => self.size.1,
        }
    }
}
