#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct MaterialHandle(pub u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MaterialRange {
    pub start: u32,
    pub count: u32,
}

impl MaterialRange {
    pub const fn new(start: u32, count: u32) -> Self {
        Self { start, count }
    }

    pub const fn end(&self) -> u32 {
        self.start + self.count
    }

    pub const fn contains(&self, index: u32) -> bool {
        index >= self.start && index < self.end()
    }
}

/// Packed ARGB, as the panel runtime expects vertex colours.
pub type Colour = u32;

pub const OPAQUE_WHITE: Colour = 0xFFFF_FFFF;
