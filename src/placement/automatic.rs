//! Automatic placement.
//!
//! Lays out a whole army with a constrained greedy pass:
//!
//! 1. reserve one passage column per siege unit,
//! 2. scatter mountains over the two frontier rows, outside the passages,
//! 3. seat each siege unit in its passage and reserve the corridor behind it,
//! 4. King, heavy cavalry, dragon, elephants, the line troops (in random
//!    order), and finally the rabble.
//!
//! Every unit goes through the same tiers: preferred cells, then fallback
//! cells nearer the owner's edge, then a forced placement that evicts the
//! occupant of the first candidate in scan order. A unit that still finds no
//! cell stays in the reserve and is reported, not treated as an error.

use std::collections::HashSet;

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::board::{BoardState, Cell, Evicted, PieceType, Side};
use crate::config::GameConfig;

use super::{PlacementCore, PlacementError, PlacementReport, PlacementStrategy, Placed, Zone};

/// Siege units, in the order they claim passage columns.
const SIEGE: [PieceType; 2] = [PieceType::Catapult, PieceType::Trebuchet];

/// Rows behind a siege unit kept clear as its corridor.
const CORRIDOR_ROWS: i32 = 3;

/// Candidate cells for one unit type, best tier first.
struct Tiers {
    preferred: Vec<Vec<Cell>>,
    fallback: Vec<Vec<Cell>>,
}

/// Places a whole army with the tiered greedy layout.
#[derive(Debug, Clone)]
pub struct AutomaticPlacement {
    core: PlacementCore,
    rng: SmallRng,
    passages: Vec<i32>,
    reserved: HashSet<Cell>,
}

impl AutomaticPlacement {
    /// Creates a strategy seeded from the config (0 = entropy).
    pub fn new(side: Side, config: &GameConfig) -> Self {
        let rng = if config.seed != 0 {
            let offset = match side {
                Side::Side1 => 0,
                Side::Side2 => 1,
            };
            SmallRng::seed_from_u64(config.seed.wrapping_add(offset))
        } else {
            SmallRng::from_entropy()
        };
        Self::with_rng(side, config, rng)
    }

    pub fn with_rng(side: Side, config: &GameConfig, rng: SmallRng) -> Self {
        AutomaticPlacement {
            core: PlacementCore::new(side, config),
            rng,
            passages: Vec::new(),
            reserved: HashSet::new(),
        }
    }

    pub fn zone(&self) -> &Zone {
        &self.core.zone
    }

    /// Columns reserved for siege units in the last run.
    pub fn passages(&self) -> &[i32] {
        &self.passages
    }

    /// Returns true if `cell` is part of a siege corridor.
    pub fn is_reserved(&self, cell: Cell) -> bool {
        self.reserved.contains(&cell)
    }

    /// Runs the full layout for this side.
    fn run(&mut self, board: &mut BoardState, mountain_count: u32) -> PlacementReport {
        self.core.reset(board, mountain_count);
        self.passages.clear();
        self.reserved.clear();
        let mut report = PlacementReport::new(self.side());

        self.choose_passages();
        self.place_mountains(board, &mut report);

        let zone = self.core.zone;
        let frontier = zone.frontier();
        let siege_units: Vec<PieceType> = SIEGE
            .iter()
            .flat_map(|&kind| std::iter::repeat(kind).take(self.core.reserve.remaining(kind) as usize))
            .collect();
        let passages = self.passages.clone();
        for (kind, column) in siege_units.into_iter().zip(passages) {
            self.place_siege(board, kind, column, &mut report);
        }

        let all = zone.all_columns();
        let center2 = zone.central_columns(2);
        let center4 = zone.central_columns(4);
        let center6 = zone.central_columns(6);
        let line = frontier - 1;
        let behind_line = || (0..line).rev();

        self.place_kind(
            board,
            PieceType::King,
            Tiers {
                preferred: vec![zone.cells([0], &center2)],
                fallback: vec![zone.cells([0, 1], &center4), zone.cells([0, 1], &all)],
            },
            &mut report,
        );

        let mut cavalry_preferred = Vec::new();
        if !report.mountains.is_empty() {
            cavalry_preferred.push(self.shielded_cells(board, &center6));
        }
        cavalry_preferred.push(zone.cells([line], &center6));
        self.place_kind(
            board,
            PieceType::HeavyCavalry,
            Tiers {
                preferred: cavalry_preferred,
                fallback: vec![zone.cells(behind_line(), &center6), zone.cells(0..=line, &all)],
            },
            &mut report,
        );

        self.place_kind(
            board,
            PieceType::Dragon,
            Tiers {
                preferred: vec![zone.cells([1], &center4)],
                fallback: vec![zone.cells(0..=line, &all)],
            },
            &mut report,
        );

        let flanks: Vec<i32> = all.iter().copied().filter(|x| !center2.contains(x)).collect();
        self.place_kind(
            board,
            PieceType::Elephant,
            Tiers {
                preferred: vec![zone.cells([line], &flanks), zone.cells([line], &all)],
                fallback: vec![zone.cells(behind_line(), &all)],
            },
            &mut report,
        );

        let mut line_troops = [PieceType::LightHorse, PieceType::Crossbowman, PieceType::Spearman];
        line_troops.shuffle(&mut self.rng);
        for kind in line_troops {
            self.place_kind(
                board,
                kind,
                Tiers {
                    preferred: vec![zone.cells([line], &all)],
                    fallback: vec![zone.cells(behind_line(), &all)],
                },
                &mut report,
            );
        }

        self.place_kind(
            board,
            PieceType::Rabble,
            Tiers {
                preferred: vec![zone.cells([frontier], &all)],
                fallback: vec![zone.cells((0..frontier).rev(), &all)],
            },
            &mut report,
        );

        // Anything else a custom army brings.
        let leftovers: Vec<PieceType> = self
            .core
            .reserve
            .counts()
            .keys()
            .copied()
            .filter(|k| !k.is_terrain() && !SIEGE.contains(k))
            .collect();
        for kind in leftovers {
            self.place_kind(
                board,
                kind,
                Tiers {
                    preferred: vec![zone.cells([line], &all)],
                    fallback: vec![zone.cells((0..frontier).rev(), &all)],
                },
                &mut report,
            );
        }

        report.unplaced = self.core.unplaced();
        if report.is_complete() {
            tracing::debug!(
                side = %self.side(),
                units = report.placed.len(),
                mountains = report.mountains.len(),
                evictions = report.evictions,
                "automatic placement complete"
            );
        } else {
            tracing::warn!(
                side = %self.side(),
                unplaced = report.unplaced_count(),
                evictions = report.evictions,
                "automatic placement could not seat every unit"
            );
        }
        report
    }

    /// Step 1: one distinct random column per siege unit.
    fn choose_passages(&mut self) {
        let wanted: u32 = SIEGE.iter().map(|k| self.core.reserve.remaining(*k)).sum();
        let mut columns = self.core.zone.all_columns();
        columns.shuffle(&mut self.rng);
        columns.truncate(wanted as usize);
        self.passages = columns;
    }

    /// Step 2: random mountains on the frontier row and the row behind it.
    fn place_mountains(&mut self, board: &mut BoardState, report: &mut PlacementReport) {
        let zone = self.core.zone;
        let frontier = zone.frontier();
        let columns: Vec<i32> = zone
            .all_columns()
            .into_iter()
            .filter(|x| !self.passages.contains(x))
            .collect();
        let mut eligible: Vec<Cell> = zone
            .cells([frontier, frontier - 1], &columns)
            .into_iter()
            .filter(|c| !board.is_blocked(*c))
            .collect();

        while self.core.reserve.remaining(PieceType::Mountain) > 0 && !eligible.is_empty() {
            let pick = eligible.swap_remove(self.rng_index(eligible.len()));
            if self.core.place(board, PieceType::Mountain, pick).is_ok() {
                report.mountains.push(pick);
            }
        }
        report.mountains_skipped = self.core.reserve.discard(PieceType::Mountain);
    }

    /// Step 3: a siege unit in its own passage, then its corridor.
    fn place_siege(&mut self, board: &mut BoardState, kind: PieceType, column: i32, report: &mut PlacementReport) {
        let zone = self.core.zone;
        let frontier = zone.frontier();
        let tiers = Tiers {
            preferred: vec![zone.cells([frontier], &[column])],
            fallback: vec![zone.cells((0..frontier).rev(), &[column])],
        };
        let Some(cell) = self.place_one(board, kind, &tiers, report) else {
            return;
        };
        let depth = zone.depth_of(cell);
        for behind in zone.cells((depth - CORRIDOR_ROWS)..depth, &[column]) {
            self.reserved.insert(behind);
        }
    }

    /// Cells in `columns` whose forward neighbour is a mountain.
    fn shielded_cells(&self, board: &BoardState, columns: &[i32]) -> Vec<Cell> {
        let zone = &self.core.zone;
        let forward = self.side().forward();
        zone.cells(0..zone.frontier(), columns)
            .into_iter()
            .filter(|c| board.is_mountain(c.offset(0, forward)))
            .collect()
    }

    /// Seats every remaining unit of `kind`.
    fn place_kind(&mut self, board: &mut BoardState, kind: PieceType, tiers: Tiers, report: &mut PlacementReport) {
        while self.core.reserve.remaining(kind) > 0 {
            if self.place_one(board, kind, &tiers, report).is_none() {
                break;
            }
        }
    }

    /// Seats one unit: preferred, then fallback, then forced.
    fn place_one(
        &mut self,
        board: &mut BoardState,
        kind: PieceType,
        tiers: &Tiers,
        report: &mut PlacementReport,
    ) -> Option<Cell> {
        for tier in tiers.preferred.iter().chain(&tiers.fallback) {
            let open: Vec<Cell> = tier.iter().copied().filter(|c| self.is_open(board, *c)).collect();
            if let Some(&cell) = open.choose(&mut self.rng) {
                if self.core.place(board, kind, cell).is_ok() {
                    report.placed.push((kind, cell));
                    return Some(cell);
                }
            }
        }
        self.place_forced(board, kind, tiers, report)
    }

    /// Evicts the occupant of the first eligible candidate in scan order.
    ///
    /// The King, siege units and units of the kind being placed are never
    /// evicted. Corridor cells are off limits too, except to a siege unit. An
    /// evicted own unit goes back to the reserve and loses its `placed` entry;
    /// an enemy unit is simply destroyed.
    fn place_forced(
        &mut self,
        board: &mut BoardState,
        kind: PieceType,
        tiers: &Tiers,
        report: &mut PlacementReport,
    ) -> Option<Cell> {
        let target = tiers
            .preferred
            .iter()
            .chain(&tiers.fallback)
            .flatten()
            .copied()
            .find(|c| self.is_evictable(board, kind, *c))?;

        match board.clear_cell(target) {
            Some(Evicted::Piece(piece)) => {
                if piece.owner == self.side() {
                    self.core.reserve.give_back(piece.kind);
                    if let Some(pos) = report.placed.iter().position(|(_, c)| *c == target) {
                        report.placed.remove(pos);
                    }
                }
                report.evictions += 1;
            }
            Some(Evicted::Mountain(cell)) => {
                report.mountains.retain(|c| *c != cell);
                report.evictions += 1;
            }
            None => {}
        }
        tracing::debug!(side = %self.side(), kind = %kind, cell = %target, "forced placement");

        self.core.place(board, kind, target).ok()?;
        report.placed.push((kind, target));
        Some(target)
    }

    /// An open cell is in the zone, empty, and outside every siege corridor.
    fn is_open(&self, board: &BoardState, cell: Cell) -> bool {
        self.core.zone.contains(cell) && !board.is_blocked(cell) && !self.reserved.contains(&cell)
    }

    /// Forced placement never clears a corridor cell, a King or siege unit, or
    /// a unit of the kind being placed. Siege units may clear anything else in
    /// their own passage.
    fn is_evictable(&self, board: &BoardState, kind: PieceType, cell: Cell) -> bool {
        if !self.core.zone.contains(cell) {
            return false;
        }
        let protected = board.piece_at(cell).is_some_and(|p| {
            p.kind == kind || p.kind == PieceType::King || SIEGE.contains(&p.kind)
        });
        if protected {
            return false;
        }
        SIEGE.contains(&kind) || !self.reserved.contains(&cell)
    }

    fn rng_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

impl PlacementStrategy for AutomaticPlacement {
    fn side(&self) -> Side {
        self.core.side()
    }

    fn initialize(&mut self, board: &mut BoardState, mountain_count: u32) -> PlacementReport {
        self.run(board, mountain_count)
    }

    fn can_place(&self, board: &BoardState, kind: PieceType, cell: Cell) -> bool {
        self.core.can_place(board, kind, cell)
    }

    fn place(&mut self, board: &mut BoardState, kind: PieceType, cell: Cell) -> Result<Placed, PlacementError> {
        self.core.place(board, kind, cell)
    }

    fn remove(&mut self, board: &mut BoardState, cell: Cell) -> Result<Option<PieceType>, PlacementError> {
        self.core.remove(board, cell)
    }

    fn move_piece(&mut self, board: &mut BoardState, from: Cell, to: Cell) -> Result<(), PlacementError> {
        self.core.move_piece(board, from, to)
    }

    fn remaining_count(&self, kind: PieceType) -> u32 {
        self.core.reserve.remaining(kind)
    }

    fn has_completed_placement(&self) -> bool {
        self.core.reserve.is_empty()
    }

    fn is_king_placed(&self, board: &BoardState) -> bool {
        self.core.is_king_placed(board)
    }
}
