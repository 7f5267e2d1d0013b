use std::{fmt, time::Instant};

/// One captured video frame, exactly as the host hands it to the landmark
/// provider. The classification core never inspects the pixels itself.
#[derive(Clone, Debug)]
pub struct Frame {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub timestamp: Instant,
}

/// The recognizable output alphabet: the 26 fingerspelled letters plus the
/// Space and Delete control symbols.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Symbol {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    Space,
    Delete,
}

impl Symbol {
    /// Every symbol in display order, letters first.
    pub const ALL: [Symbol; 28] = [
        Symbol::A,
        Symbol::B,
        Symbol::C,
        Symbol::D,
        Symbol::E,
        Symbol::F,
        Symbol::G,
        Symbol::H,
        Symbol::I,
        Symbol::J,
        Symbol::K,
        Symbol::L,
        Symbol::M,
        Symbol::N,
        Symbol::O,
        Symbol::P,
        Symbol::Q,
        Symbol::R,
        Symbol::S,
        Symbol::T,
        Symbol::U,
        Symbol::V,
        Symbol::W,
        Symbol::X,
        Symbol::Y,
        Symbol::Z,
        Symbol::Space,
        Symbol::Delete,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Symbol::A => "A",
            Symbol::B => "B",
            Symbol::C => "C",
            Symbol::D => "D",
            Symbol::E => "E",
            Symbol::F => "F",
            Symbol::G => "G",
            Symbol::H => "H",
            Symbol::I => "I",
            Symbol::J => "J",
            Symbol::K => "K",
            Symbol::L => "L",
            Symbol::M => "M",
            Symbol::N => "N",
            Symbol::O => "O",
            Symbol::P => "P",
            Symbol::Q => "Q",
            Symbol::R => "R",
            Symbol::S => "S",
            Symbol::T => "T",
            Symbol::U => "U",
            Symbol::V => "V",
            Symbol::W => "W",
            Symbol::X => "X",
            Symbol::Y => "Y",
            Symbol::Z => "Z",
            Symbol::Space => "Space",
            Symbol::Delete => "Delete",
        }
    }

    /// Fragment this symbol contributes to the phrase-matching sequence.
    /// Space becomes a literal space so multi-word keys like "MY NAME" can
    /// match; Delete maps to a character that occurs in no dictionary key.
    pub fn key_fragment(&self) -> &'static str {
        match self {
            Symbol::Space => " ",
            Symbol::Delete => "\u{7f}",
            letter => letter.label(),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One symbol proposed by a classifier rule for the current frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureCandidate {
    pub symbol: Symbol,
    pub confidence: f32,
}

/// One detection worker result published to the host.
#[derive(Clone, Debug)]
pub struct DetectionUpdate {
    pub symbol: Option<Symbol>,
    pub phrase: Option<String>,
    pub timestamp: Instant,
}
