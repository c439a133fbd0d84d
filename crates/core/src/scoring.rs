//! Scoring module - block points, line-clear bonus and combo bookkeeping
//!
//! - Every placed cell is worth one point.
//! - A placement that clears lines earns
//!   `lines x board_size x (combo / 2) x block_score`, rounded half up.
//! - The combo is the running total of lines cleared. It survives placements
//!   without clears until a full hand's worth of them has gone by.

/// Score calculation result for one placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    /// One point per placed cell
    pub block_score: u32,
    /// Line-clear bonus (0 when nothing cleared)
    pub clear_bonus: u64,
    pub total: u64,
    /// Combo after this placement
    pub combo: u32,
}

/// Points for placing `cells` cells
pub fn calculate_block_score(cells: usize) -> u32 {
    cells as u32
}

/// Line-clear bonus: `lines x board_size x (combo / 2) x block_score`, rounded
///
/// `combo` is the combo after adding `lines`.
pub fn calculate_clear_bonus(lines: u32, board_size: usize, combo: u32, block_score: u32) -> u64 {
    if lines == 0 {
        return 0;
    }
    let doubled = (lines as u64)
        .saturating_mul(board_size as u64)
        .saturating_mul(combo as u64)
        .saturating_mul(block_score as u64);
    // doubled / 2, half rounded up
    doubled / 2 + doubled % 2
}

/// Combo state carried between placements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComboTracker {
    pub combo: u32,
    pub moves_since_last_clear: u32,
}

impl ComboTracker {
    /// Record a placement that cleared `lines` lines
    ///
    /// A clear resets the idle counter and grows the combo; otherwise the idle
    /// counter grows and the combo drops to zero once it reaches `hand_capacity`.
    pub fn record(&mut self, lines: u32, hand_capacity: usize) {
        if lines > 0 {
            self.moves_since_last_clear = 0;
            self.combo = self.combo.saturating_add(lines);
        } else {
            self.moves_since_last_clear = self.moves_since_last_clear.saturating_add(1);
            if self.moves_since_last_clear as usize >= hand_capacity {
                self.combo = 0;
            }
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Score a placement of `cells` cells that cleared `lines` lines
///
/// Updates `tracker` and returns the points earned.
pub fn calculate_score(
    tracker: &mut ComboTracker,
    cells: usize,
    lines: u32,
    board_size: usize,
    hand_capacity: usize,
) -> ScoreResult {
    let block_score = calculate_block_score(cells);
    tracker.record(lines, hand_capacity);
    let clear_bonus = calculate_clear_bonus(lines, board_size, tracker.combo, block_score);

    ScoreResult {
        block_score,
        clear_bonus,
        total: (block_score as u64).saturating_add(clear_bonus),
        combo: tracker.combo,
    }
}
