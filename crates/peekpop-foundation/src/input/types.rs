use peekpop_ui_graphics::Point;

pub type PointerId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    Cancel,
}

/// A single pointer sample in surface coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub id: PointerId,
    pub kind: PointerEventKind,
    pub position: Point,
}

impl PointerEvent {
    pub fn new(id: PointerId, kind: PointerEventKind, position: Point) -> Self {
        Self { id, kind, position }
    }

    pub fn down(id: PointerId, position: Point) -> Self {
        Self::new(id, PointerEventKind::Down, position)
    }

    pub fn moved(id: PointerId, position: Point) -> Self {
        Self::new(id, PointerEventKind::Move, position)
    }

    pub fn up(id: PointerId, position: Point) -> Self {
        Self::new(id, PointerEventKind::Up, position)
    }

    pub fn cancel(id: PointerId, position: Point) -> Self {
        Self::new(id, PointerEventKind::Cancel, position)
    }

    /// Whether this event ends the pointer's interaction.
    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, PointerEventKind::Up | PointerEventKind::Cancel)
    }
}
