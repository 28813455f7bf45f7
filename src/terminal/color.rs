//! True-color values and the palette used to draw grids.

/// A 24-bit terminal color.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Black (0, 0, 0)
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// White (255, 255, 255)
    pub const WHITE: Self = Self::new(255, 255, 255);
}

impl std::fmt::Debug for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    #[inline]
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

/// Live cell.
pub const ALIVE: Rgb = Rgb::new(60, 220, 160);
/// Dead cell.
pub const DEAD: Rgb = Rgb::new(20, 20, 24);
/// Area around the grid.
pub const MARGIN: Rgb = Rgb::BLACK;
/// Status line background.
pub const STATUS_BG: Rgb = Rgb::new(40, 40, 48);
/// Status line text.
pub const STATUS_FG: Rgb = Rgb::new(200, 200, 210);
