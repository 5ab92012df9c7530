/// Topological location of a point relative to an area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Location {
    Interior,
    Boundary,
    Exterior,
    /// Not yet determined.
    #[default]
    None,
}

/// Side of a directed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    On,
    Left,
    Right,
}

impl Position {
    /// Swaps `Left` and `Right`; `On` is unchanged.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::On => Self::On,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Per-edge topology annotation: one location per position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Label {
    on: Location,
    left: Location,
    right: Location,
}

impl Label {
    /// Creates an area label.
    #[must_use]
    pub fn new(on: Location, left: Location, right: Location) -> Self {
        Self { on, left, right }
    }

    /// Location at the given position.
    #[must_use]
    pub fn location(&self, position: Position) -> Location {
        match position {
            Position::On => self.on,
            Position::Left => self.left,
            Position::Right => self.right,
        }
    }

    /// Sets the location at the given position.
    pub fn set_location(&mut self, position: Position, location: Location) {
        match position {
            Position::On => self.on = location,
            Position::Left => self.left = location,
            Position::Right => self.right = location,
        }
    }

    /// Swaps the left and right locations.
    pub fn flip(&mut self) {
        std::mem::swap(&mut self.left, &mut self.right);
    }

    /// Returns a copy with left and right swapped.
    #[must_use]
    pub fn flipped(mut self) -> Self {
        self.flip();
        self
    }

    /// Fills undetermined locations from `other`.
    pub fn merge(&mut self, other: &Label) {
        for pos in [Position::On, Position::Left, Position::Right] {
            if self.location(pos) == Location::None {
                self.set_location(pos, other.location(pos));
            }
        }
    }

    /// Change in depth when crossing from the right side to the left side.
    ///
    /// +1 for interior-on-the-left, -1 for interior-on-the-right, 0 otherwise.
    #[must_use]
    pub fn depth_delta(&self) -> i32 {
        match (self.left, self.right) {
            (Location::Interior, Location::Exterior) => 1,
            (Location::Exterior, Location::Interior) => -1,
            _ => 0,
        }
    }

    /// Both sides are interior: the edge lies strictly inside the area.
    #[must_use]
    pub fn is_interior_area(&self) -> bool {
        self.left == Location::Interior && self.right == Location::Interior
    }
}
