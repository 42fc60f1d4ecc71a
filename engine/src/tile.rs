/// One cell of the board, packed into a single byte.
///
/// The byte is exactly what the state token stores for the tile, so the bit
/// layout is part of the wire format:
///
/// | bits   | meaning                 |
/// |--------|-------------------------|
/// | `0x80` | shown                   |
/// | `0x40` | mine                    |
/// | `0x20` | flagged                 |
/// | `0x0F` | adjacent mine count 0–8 |
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Tile(u8);

impl Tile {
    const SHOWN: u8 = 0x80;
    const MINE: u8 = 0x40;
    const FLAG: u8 = 0x20;
    const COUNT_MASK: u8 = 0x0F;

    /// Rebuilds a tile from its raw byte.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// The raw byte, as written into the state token.
    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_mine(self) -> bool {
        self.0 & Self::MINE != 0
    }

    pub const fn is_flagged(self) -> bool {
        self.0 & Self::FLAG != 0
    }

    pub const fn is_shown(self) -> bool {
        self.0 & Self::SHOWN != 0
    }

    /// Number of mines among the neighbors. Only meaningful for safe tiles.
    pub const fn adjacent_mines(self) -> u8 {
        self.0 & Self::COUNT_MASK
    }

    pub(crate) fn set_mine(&mut self) {
        self.0 |= Self::MINE;
    }

    pub(crate) fn mark_shown(&mut self) {
        self.0 |= Self::SHOWN;
    }

    pub(crate) fn toggle_flag(&mut self) {
        self.0 ^= Self::FLAG;
    }

    pub(crate) fn set_adjacent_mines(&mut self, count: u8) {
        self.0 = (self.0 & !Self::COUNT_MASK) | (count & Self::COUNT_MASK);
    }
}
