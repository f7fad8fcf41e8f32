//! Placeholder address tokens emitted before addresses are known.

use std::fmt;

/// The symbolic address of a reserved slot: `T{n}XX`, where `n` is the
/// slot's allocation ordinal.
///
/// An address occupies two cells, low byte first. The leading part `T{n}`
/// stands in for the low byte and the trailing part `XX` for the high byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaceholderToken {
    ordinal: u32,
}

impl PlaceholderToken {
    pub(crate) fn new(ordinal: u32) -> Self {
        Self { ordinal }
    }

    pub fn ordinal(self) -> u32 {
        self.ordinal
    }

    pub fn leading(self) -> PlaceholderPart {
        PlaceholderPart::Leading(self.ordinal)
    }

    pub fn trailing(self) -> PlaceholderPart {
        PlaceholderPart::Trailing(self.ordinal)
    }

    /// Both parts in emission order.
    pub fn parts(self) -> [PlaceholderPart; 2] {
        [self.leading(), self.trailing()]
    }
}

impl fmt::Display for PlaceholderToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.leading(), self.trailing())
    }
}

/// One cell's worth of a placeholder token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderPart {
    /// Replaced by the low address byte.
    Leading(u32),
    /// Replaced by the high address byte.
    Trailing(u32),
}

impl PlaceholderPart {
    pub fn ordinal(self) -> u32 {
        match self {
            PlaceholderPart::Leading(n) | PlaceholderPart::Trailing(n) => n,
        }
    }

    /// The byte this part becomes once the slot lives at `address`.
    pub fn resolve(self, address: u16) -> u8 {
        let [low, high] = address.to_le_bytes();
        match self {
            PlaceholderPart::Leading(_) => low,
            PlaceholderPart::Trailing(_) => high,
        }
    }
}

impl fmt::Display for PlaceholderPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaceholderPart::Leading(n) => write!(f, "T{}", n),
            PlaceholderPart::Trailing(_) => f.write_str("XX"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_text() {
        let token = PlaceholderToken::new(3);
        assert_eq!(token.to_string(), "T3XX");
        assert_eq!(token.leading().to_string(), "T3");
        assert_eq!(token.trailing().to_string(), "XX");
    }

    #[test]
    fn test_parts_resolve_little_endian() {
        let [leading, trailing] = PlaceholderToken::new(0).parts();
        assert_eq!(leading.resolve(0x1234), 0x34);
        assert_eq!(trailing.resolve(0x1234), 0x12);
        assert_eq!(trailing.resolve(0x0042), 0x00);
    }
}
