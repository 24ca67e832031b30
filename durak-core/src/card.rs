use std::fmt;
use std::str::FromStr;

/// Number of suits in the deck
pub const NUM_SUITS: usize = 4;

/// Number of ranks per suit (6 through Ace)
pub const NUM_RANKS: usize = 9;

/// Total cards in a durak deck
pub const DECK_SIZE: usize = NUM_SUITS * NUM_RANKS;

/// Represents the four suits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Suit {
    Clubs = 0,
    Diamonds = 1,
    Hearts = 2,
    Spades = 3,
}

impl Suit {
    /// All suits in standard order
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    /// Convert from numeric index (0-3)
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Suit::Clubs),
            1 => Some(Suit::Diamonds),
            2 => Some(Suit::Hearts),
            3 => Some(Suit::Spades),
            _ => None,
        }
    }

    /// Get the suit as a single character (C, D, H, S)
    pub fn to_char(&self) -> char {
        match self {
            Suit::Clubs => 'C',
            Suit::Diamonds => 'D',
            Suit::Hearts => 'H',
            Suit::Spades => 'S',
        }
    }

    /// Get the suit as a symbol
    pub fn symbol(&self) -> char {
        match self {
            Suit::Clubs => '♣',
            Suit::Diamonds => '♦',
            Suit::Hearts => '♥',
            Suit::Spades => '♠',
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl FromStr for Suit {
    type Err = ParseCardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "C" | "c" | "clubs" => Ok(Suit::Clubs),
            "D" | "d" | "diamonds" => Ok(Suit::Diamonds),
            "H" | "h" | "hearts" => Ok(Suit::Hearts),
            "S" | "s" | "spades" => Ok(Suit::Spades),
            _ => Err(ParseCardError::BadSuit(s.to_string())),
        }
    }
}

/// Represents card ranks from 6 to Ace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Rank {
    Six = 6,
    Seven = 7,
    Eight = 8,
    Nine = 9,
    Ten = 10,
    Jack = 11,
    Queen = 12,
    King = 13,
    Ace = 14,
}

impl Rank {
    /// All ranks from Six to Ace
    pub const ALL: [Rank; 9] = [
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Lowest rank value in the deck
    pub const MIN: u8 = 6;

    /// Convert from numeric value (6-14)
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            6 => Some(Rank::Six),
            7 => Some(Rank::Seven),
            8 => Some(Rank::Eight),
            9 => Some(Rank::Nine),
            10 => Some(Rank::Ten),
            11 => Some(Rank::Jack),
            12 => Some(Rank::Queen),
            13 => Some(Rank::King),
            14 => Some(Rank::Ace),
            _ => None,
        }
    }

    /// Zero-based offset from the lowest rank (0-8)
    #[inline]
    pub fn offset(&self) -> u8 {
        *self as u8 - Self::MIN
    }

    /// Get the rank as a character (6-9, T, J, Q, K, A)
    pub fn to_char(&self) -> char {
        match self {
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            '6' => Some(Rank::Six),
            '7' => Some(Rank::Seven),
            '8' => Some(Rank::Eight),
            '9' => Some(Rank::Nine),
            'T' | 't' => Some(Rank::Ten),
            'J' | 'j' => Some(Rank::Jack),
            'Q' | 'q' => Some(Rank::Queen),
            'K' | 'k' => Some(Rank::King),
            'A' | 'a' => Some(Rank::Ace),
            _ => None,
        }
    }
}

/// Represents a single playing card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    /// Create a new card
    pub fn new(suit: Suit, rank: Rank) -> Self {
        Card { suit, rank }
    }

    /// Create a card from an index (0-35).
    /// Index is calculated as: suit * 9 + (rank - 6)
    pub fn from_index(index: u8) -> Option<Self> {
        if index as usize >= DECK_SIZE {
            return None;
        }
        let suit = Suit::from_index(index / NUM_RANKS as u8)?;
        let rank = Rank::from_value(index % NUM_RANKS as u8 + Rank::MIN)?;
        Some(Card::new(suit, rank))
    }

    /// Convert card to index (0-35)
    #[inline]
    pub fn index(&self) -> u8 {
        self.suit as u8 * NUM_RANKS as u8 + self.rank.offset()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.rank.to_char(), self.suit.to_char())
    }
}

impl FromStr for Card {
    type Err = ParseCardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (rank_char, suit_char) = match (chars.next(), chars.next(), chars.next()) {
            (Some(r), Some(su), None) => (r, su),
            _ => return Err(ParseCardError::BadLength(s.to_string())),
        };
        let rank = Rank::from_char(rank_char).ok_or(ParseCardError::BadRank(rank_char))?;
        let suit = Suit::from_str(&suit_char.to_string())?;
        Ok(Card::new(suit, rank))
    }
}

/// Error parsing a card or suit from text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCardError {
    /// Input is not two characters (rank then suit)
    BadLength(String),
    /// Unknown rank character
    BadRank(char),
    /// Unknown suit name or character
    BadSuit(String),
}

impl fmt::Display for ParseCardError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseCardError::BadLength(s) => write!(f, "expected rank and suit, got {:?}", s),
            ParseCardError::BadRank(c) => write!(f, "unknown rank {:?}", c),
            ParseCardError::BadSuit(s) => write!(f, "unknown suit {:?}", s),
        }
    }
}

impl std::error::Error for ParseCardError {}
