/// A rectangular pixel area that lies entirely inside its frame.
///
/// Regions only come out of [`Detection::clamp`](crate::detection::domain::detection::Detection::clamp),
/// so effect code can index frame memory without further bounds checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Exclusive right edge, saturating at `u32::MAX`.
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// True when the region fits inside a `frame_w` × `frame_h` frame.
    pub fn fits_within(&self, frame_w: u32, frame_h: u32) -> bool {
        self.x as u64 + self.width as u64 <= frame_w as u64
            && self.y as u64 + self.height as u64 <= frame_h as u64
    }
}
