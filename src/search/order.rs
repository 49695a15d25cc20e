//! Unified move ordering.
//!
//! The generator emits unordered legal moves; every priority lives here:
//! transposition-table move, MVV-LVA captures with a recapture bonus,
//! promotions, checking moves, killers, then quiet history.

use crate::board::{
    bishop_attacks, knight_attacks, line, pawn_attacks, queen_attacks, rook_attacks, Bitboard,
    Board, Move, MoveList, Piece, RankedMoveList, Square,
};

use super::constants::{
    CAPTURE_BASE, CHECK_BONUS, KILLER_PRIMARY_SCORE, KILLER_SECONDARY_SCORE, PROMOTION_BASE,
    RECAPTURE_BONUS, TT_MOVE_SCORE,
};
use super::SearchState;

/// Piece worth for MVV-LVA. The king ranks above the queen as an attacker
/// so king captures sort last among equal victims.
const ORDER_VALUES: [i32; 6] = [100, 350, 350, 525, 975, 1400];

#[inline]
fn order_value(piece: Piece) -> i32 {
    ORDER_VALUES[piece.index()]
}

/// Promotion preference: queen, then knight (distinct check patterns),
/// then rook and bishop.
#[inline]
fn promotion_bonus(piece: Piece) -> i32 {
    match piece {
        Piece::Queen => 4_000,
        Piece::Knight => 3_000,
        Piece::Rook => 2_000,
        _ => 1_000,
    }
}

/// Victim on the target square; en passant always captures a pawn.
#[inline]
fn victim_value(board: &Board, mv: Move) -> i32 {
    if mv.is_en_passant() {
        return order_value(Piece::Pawn);
    }
    board.piece_on(mv.to()).map_or(0, order_value)
}

/// Whether the move checks the enemy king: direct attacks from the target
/// square, plus discovered checks from vacating a slider's line.
pub(crate) fn move_gives_check(board: &Board, mv: Move) -> bool {
    let us = board.side_to_move();
    let enemy_king = board.king_square(us.opponent());

    let Some(mover) = board.piece_on(mv.from()) else {
        return false;
    };
    let piece = mv.promotion_piece().unwrap_or(mover);

    let occupancy_after = (board.all_occupancy() ^ Bitboard::from_square(mv.from()))
        | Bitboard::from_square(mv.to());

    let direct = match piece {
        Piece::Pawn => pawn_attacks(us, mv.to()).contains(enemy_king),
        Piece::Knight => knight_attacks(mv.to()).contains(enemy_king),
        Piece::King => false,
        Piece::Bishop => bishop_attacks(mv.to(), occupancy_after).contains(enemy_king),
        Piece::Rook => rook_attacks(mv.to(), occupancy_after).contains(enemy_king),
        Piece::Queen => queen_attacks(mv.to(), occupancy_after).contains(enemy_king),
    };
    if direct {
        return true;
    }

    // Discovered check: the vacated square lies on a line through the enemy
    // king, the move leaves that line, and an own slider stands behind it
    let vacated_line = line(enemy_king, mv.from());
    if vacated_line.is_empty() || vacated_line.contains(mv.to()) {
        return false;
    }
    let orthogonal =
        enemy_king.rank() == mv.from().rank() || enemy_king.file() == mv.from().file();
    let sliders = if orthogonal {
        board.pieces_of(us, Piece::Rook) | board.pieces_of(us, Piece::Queen)
    } else {
        board.pieces_of(us, Piece::Bishop) | board.pieces_of(us, Piece::Queen)
    };
    if !(sliders & vacated_line).any() {
        return false;
    }
    let reopened = if orthogonal {
        rook_attacks(enemy_king, occupancy_after)
    } else {
        bishop_attacks(enemy_king, occupancy_after)
    };
    (reopened & sliders).any()
}

/// Score every move for the main search.
pub(crate) fn order_moves(
    board: &Board,
    state: &SearchState,
    moves: &MoveList,
    tt_move: Move,
    ply: usize,
    prev_target: Option<Square>,
) -> RankedMoveList {
    let us = board.side_to_move();
    let mut ranked = RankedMoveList::new();

    for &mv in moves {
        let gives_check = move_gives_check(board, mv);
        let mut score = 0;

        if mv == tt_move {
            score += TT_MOVE_SCORE;
        }

        if mv.is_capture() {
            let attacker = board.piece_on(mv.from()).map_or(0, order_value);
            score += CAPTURE_BASE + victim_value(board, mv) - attacker;
            if prev_target == Some(mv.to()) {
                score += RECAPTURE_BONUS;
            }
        }

        if let Some(promo) = mv.promotion_piece() {
            score += PROMOTION_BASE + promotion_bonus(promo);
        }

        if gives_check {
            score += CHECK_BONUS;
        }

        if mv.is_quiet() {
            if state.killers[ply][0] == mv {
                score += KILLER_PRIMARY_SCORE;
            } else if state.killers[ply][1] == mv {
                score += KILLER_SECONDARY_SCORE;
            } else {
                score += state.history_score(us, mv);
            }
        }

        ranked.push(mv, score, gives_check);
    }

    ranked
}

/// Score captures and promotions for quiescence: MVV-LVA only, with the
/// transposition-table move first when present.
pub(crate) fn order_tactical(board: &Board, moves: &MoveList, tt_move: Move) -> RankedMoveList {
    let mut ranked = RankedMoveList::new();
    for &mv in moves {
        let mut score = 0;
        if mv == tt_move {
            score += TT_MOVE_SCORE;
        }
        if mv.is_capture() {
            let attacker = board.piece_on(mv.from()).map_or(0, order_value);
            score += CAPTURE_BASE + victim_value(board, mv) - attacker;
        }
        if let Some(promo) = mv.promotion_piece() {
            score += PROMOTION_BASE + promotion_bonus(promo);
        }
        ranked.push(mv, score, false);
    }
    ranked
}
