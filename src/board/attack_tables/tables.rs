//! Precomputed tables for leaper pieces and ray geometry.

use once_cell::sync::Lazy;

use crate::board::types::{Bitboard, Color, Square};

/// Compass direction from a square, in board geometry (north = toward rank 8).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub(crate) const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    #[inline]
    pub(crate) const fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::NorthEast => 1,
            Direction::East => 2,
            Direction::SouthEast => 3,
            Direction::South => 4,
            Direction::SouthWest => 5,
            Direction::West => 6,
            Direction::NorthWest => 7,
        }
    }

    /// (rank delta, file delta) of one step
    #[inline]
    pub(crate) const fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (1, 0),
            Direction::NorthEast => (1, 1),
            Direction::East => (0, 1),
            Direction::SouthEast => (-1, 1),
            Direction::South => (-1, 0),
            Direction::SouthWest => (-1, -1),
            Direction::West => (0, -1),
            Direction::NorthWest => (1, -1),
        }
    }

    /// Rook directions (rank/file rays); the rest are bishop directions.
    #[inline]
    pub(crate) const fn is_orthogonal(self) -> bool {
        matches!(
            self,
            Direction::North | Direction::East | Direction::South | Direction::West
        )
    }

    /// Whether a step in this direction increases the square index.
    /// Determines whether the nearest blocker on a ray is the lsb or msb.
    #[inline]
    pub(crate) const fn is_increasing(self) -> bool {
        matches!(
            self,
            Direction::North | Direction::NorthEast | Direction::East | Direction::NorthWest
        )
    }
}

fn walk_ray(sq: usize, dir: Direction) -> Bitboard {
    let (dr, df) = dir.delta();
    let mut mask = Bitboard::EMPTY;
    let mut r = (sq / 8) as i32 + dr;
    let mut f = (sq % 8) as i32 + df;
    while (0..8).contains(&r) && (0..8).contains(&f) {
        mask |= Bitboard(1u64 << (r * 8 + f));
        r += dr;
        f += df;
    }
    mask
}

/// Open rays from each square to the board edge, per direction (square excluded)
pub(crate) static RAYS: Lazy<[[Bitboard; 64]; 8]> = Lazy::new(|| {
    let mut rays = [[Bitboard::EMPTY; 64]; 8];
    for dir in Direction::ALL {
        for sq in 0..64 {
            rays[dir.index()][sq] = walk_ray(sq, dir);
        }
    }
    rays
});

/// Squares strictly between two collinear squares; empty when not collinear
pub(crate) static BETWEEN: Lazy<Box<[[Bitboard; 64]; 64]>> = Lazy::new(|| {
    let mut between = Box::new([[Bitboard::EMPTY; 64]; 64]);
    for from in 0..64 {
        for dir in Direction::ALL {
            let (dr, df) = dir.delta();
            let mut path = Bitboard::EMPTY;
            let mut r = (from / 8) as i32 + dr;
            let mut f = (from % 8) as i32 + df;
            while (0..8).contains(&r) && (0..8).contains(&f) {
                let to = (r * 8 + f) as usize;
                between[from][to] = path;
                path |= Bitboard(1u64 << to);
                r += dr;
                f += df;
            }
        }
    }
    between
});

/// The full line through two collinear squares, both endpoints included and
/// extended to both board edges; empty when not collinear
pub(crate) static LINE: Lazy<Box<[[Bitboard; 64]; 64]>> = Lazy::new(|| {
    let mut line = Box::new([[Bitboard::EMPTY; 64]; 64]);
    for from in 0..64 {
        for (i, dir) in Direction::ALL.iter().enumerate() {
            let opposite = Direction::ALL[(i + 4) % 8];
            let full = RAYS[dir.index()][from]
                | RAYS[opposite.index()][from]
                | Bitboard(1u64 << from);
            for to in RAYS[dir.index()][from].iter() {
                line[from][to.index()] = full;
            }
        }
    }
    line
});

pub(crate) static KNIGHT_ATTACKS: Lazy<[Bitboard; 64]> = Lazy::new(|| {
    let deltas = [
        (2, 1),
        (1, 2),
        (-1, 2),
        (-2, 1),
        (-2, -1),
        (-1, -2),
        (1, -2),
        (2, -1),
    ];
    leaper_table(&deltas)
});

pub(crate) static KING_ATTACKS: Lazy<[Bitboard; 64]> = Lazy::new(|| {
    let deltas = [
        (1, 0),
        (-1, 0),
        (0, 1),
        (0, -1),
        (1, 1),
        (1, -1),
        (-1, 1),
        (-1, -1),
    ];
    leaper_table(&deltas)
});

fn leaper_table(deltas: &[(i32, i32)]) -> [Bitboard; 64] {
    let mut attacks = [Bitboard::EMPTY; 64];
    for (sq, slot) in attacks.iter_mut().enumerate() {
        let r = (sq / 8) as i32;
        let f = (sq % 8) as i32;
        let mut mask = Bitboard::EMPTY;
        for &(dr, df) in deltas {
            let nr = r + dr;
            let nf = f + df;
            if (0..8).contains(&nr) && (0..8).contains(&nf) {
                mask |= Bitboard(1u64 << (nr * 8 + nf));
            }
        }
        *slot = mask;
    }
    attacks
}

/// Squares a pawn of the given color attacks from each square
pub(crate) static PAWN_ATTACKS: Lazy<[[Bitboard; 64]; 2]> = Lazy::new(|| {
    let mut attacks = [[Bitboard::EMPTY; 64]; 2];
    for sq in 0..64 {
        let bb = Bitboard(1u64 << sq);
        attacks[Color::White.index()][sq] = bb.shift_north_east() | bb.shift_north_west();
        attacks[Color::Black.index()][sq] = bb.shift_south_east() | bb.shift_south_west();
    }
    attacks
});

#[inline]
pub(crate) fn ray(dir: Direction, sq: Square) -> Bitboard {
    RAYS[dir.index()][sq.index()]
}

#[inline]
pub(crate) fn between(from: Square, to: Square) -> Bitboard {
    BETWEEN[from.index()][to.index()]
}

#[inline]
pub(crate) fn line(from: Square, to: Square) -> Bitboard {
    LINE[from.index()][to.index()]
}
