//! Core value types shared by every subsystem.
//!
//! `Team`, `PieceKind`, `Position` and `PieceId` are small `Copy` values so
//! board cells, move records and threat queries can pass them around freely.
//! Square indexing follows `0 == a1`, `7 == h1`, `63 == h8`.

use std::fmt;

/// Side of the board. A piece's team never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Team {
    White,
    Black,
}

impl Team {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Team::White => 0,
            Team::Black => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Team::White => Team::Black,
            Team::Black => Team::White,
        }
    }

    /// Rank delta of a pawn step for this team.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Team::White => 1,
            Team::Black => -1,
        }
    }

    /// Rank holding this team's King and Rooks at the start.
    #[inline]
    pub const fn home_rank(self) -> u8 {
        match self {
            Team::White => 0,
            Team::Black => 7,
        }
    }

    #[inline]
    pub const fn pawn_start_rank(self) -> u8 {
        match self {
            Team::White => 1,
            Team::Black => 6,
        }
    }

    /// Opponent's back rank, where this team's pawns promote.
    #[inline]
    pub const fn promotion_rank(self) -> u8 {
        self.opposite().home_rank()
    }

    #[inline]
    pub const fn wire_sign(self) -> char {
        match self {
            Team::White => '+',
            Team::Black => '-',
        }
    }

    pub fn from_wire_sign(sign: char) -> Option<Self> {
        match sign {
            '+' => Some(Team::White),
            '-' => Some(Team::Black),
            _ => None,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::White => write!(f, "White"),
            Team::Black => write!(f, "Black"),
        }
    }
}

/// Piece kind. Color lives on `Team`, identity on `PieceId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Kinds a pawn may become.
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }

    /// Kind code used by the piece identity encoding.
    #[inline]
    pub const fn wire_code(self) -> u8 {
        match self {
            PieceKind::King => 1,
            PieceKind::Queen => 2,
            PieceKind::Bishop => 3,
            PieceKind::Knight => 4,
            PieceKind::Rook => 5,
            PieceKind::Pawn => 6,
        }
    }

    pub const fn from_wire_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(PieceKind::King),
            2 => Some(PieceKind::Queen),
            3 => Some(PieceKind::Bishop),
            4 => Some(PieceKind::Knight),
            5 => Some(PieceKind::Rook),
            6 => Some(PieceKind::Pawn),
            _ => None,
        }
    }

    /// Promotion suffix letter used by the command loop (`e7e8q`).
    pub fn from_promotion_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'q' => Some(PieceKind::Queen),
            'r' => Some(PieceKind::Rook),
            'b' => Some(PieceKind::Bishop),
            'n' => Some(PieceKind::Knight),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_slider(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)
    }
}

/// Board square as (file, rank), both in `0..8`.
///
/// Fields are private so a `Position` can never hold an off-board value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    file: u8,
    rank: u8,
}

impl Position {
    #[inline]
    pub const fn new(file: u8, rank: u8) -> Option<Self> {
        if file < 8 && rank < 8 {
            Some(Self { file, rank })
        } else {
            None
        }
    }

    /// Crate-internal constructor for literal squares that are known to be on the board.
    #[inline]
    pub(crate) const fn new_unchecked(file: u8, rank: u8) -> Self {
        Self { file, rank }
    }

    #[inline]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < 64 {
            Some(Self {
                file: (index % 8) as u8,
                rank: (index / 8) as u8,
            })
        } else {
            None
        }
    }

    #[inline]
    pub const fn file(self) -> u8 {
        self.file
    }

    #[inline]
    pub const fn rank(self) -> u8 {
        self.rank
    }

    /// Row-major index, `0 == a1`.
    #[inline]
    pub const fn index(self) -> usize {
        self.rank as usize * 8 + self.file as usize
    }

    /// Shift by a file/rank delta, `None` when the result leaves the board.
    #[inline]
    pub fn offset(self, d_file: i8, d_rank: i8) -> Option<Self> {
        let file = self.file as i8 + d_file;
        let rank = self.rank as i8 + d_rank;
        if (0..8).contains(&file) && (0..8).contains(&rank) {
            Some(Self {
                file: file as u8,
                rank: rank as u8,
            })
        } else {
            None
        }
    }

    /// Iterate all 64 squares in row-major order.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..64).filter_map(Position::from_index)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            char::from(b'a' + self.file),
            char::from(b'1' + self.rank)
        )
    }
}

/// Identity of one piece, carried in board cells and on the wire.
///
/// `instance` disambiguates pieces sharing team and kind. A promoted piece
/// keeps the instance of the pawn it came from and sets `promoted`, so the
/// lineage survives promotion while the encoded kind changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId {
    pub team: Team,
    pub kind: PieceKind,
    pub instance: u8,
    pub promoted: bool,
}

impl PieceId {
    #[inline]
    pub const fn new(team: Team, kind: PieceKind, instance: u8) -> Self {
        Self {
            team,
            kind,
            instance,
            promoted: false,
        }
    }

    /// Identity of the piece a pawn turns into.
    #[inline]
    pub const fn promoted_from(pawn: PieceId, kind: PieceKind) -> Self {
        Self {
            team: pawn.team,
            kind,
            instance: pawn.instance,
            promoted: true,
        }
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}{}",
            self.team.wire_sign(),
            self.kind.wire_code(),
            self.instance,
            if self.promoted { "P" } else { "" }
        )
    }
}
