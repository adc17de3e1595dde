use std::fmt;

/// 24-bit colour that identifies a shape on the hit-detection surface.
///
/// Black (`#000000`) is never handed out; it is the colour of "no shape".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorKey(pub [u8; 3]);

impl ColorKey {
    pub(crate) const MAX: u32 = 0x00FF_FFFF;

    /// Builds the key for a packed `0xRRGGBB` value.
    #[must_use]
    pub fn from_rgb(rgb: u32) -> Self {
        let [_, r, g, b] = (rgb & Self::MAX).to_be_bytes();
        Self([r, g, b])
    }

    /// Packs the key back into `0xRRGGBB`.
    #[must_use]
    pub fn to_rgb(self) -> u32 {
        let [r, g, b] = self.0;
        u32::from_be_bytes([0, r, g, b])
    }

    /// Maps an allocation index onto a colour, spreading consecutive indices
    /// across the colour space so neighbouring shapes do not get near-identical
    /// keys. Index `n` never maps to black.
    pub(crate) fn for_index(index: u32) -> Self {
        // Odd multiplier: a bijection on 24-bit values.
        let spread = (index % Self::MAX).wrapping_mul(0x9E_3779) & Self::MAX;
        let rgb = (spread % Self::MAX) + 1;
        Self::from_rgb(rgb)
    }
}

impl fmt::Display for ColorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}
