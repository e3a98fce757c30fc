//! Placement audit.
//!
//! Runs many independent automatic placements, one game per run with both
//! sides laid out, and records how each went: what was placed, how many
//! forced evictions were needed, and which units never found a cell. Runs are
//! spread over a rayon thread pool; each owns its board and RNG.

use std::collections::BTreeMap;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;

use rayon::prelude::*;
use serde::Serialize;

use crate::board::{BoardState, PieceType, Side, ALL_SIDES};
use crate::config::{ConfigError, GameConfig};
use crate::game::{Game, GameError};
use crate::placement::{PlacementReport, Zone};

/// Errors that stop an audit before any run starts.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Settings for an audit.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    pub games: usize,
    pub threads: usize,
    /// Mountains requested per side.
    pub mountains: u32,
    /// Base seed (0 = entropy for every run).
    pub seed: u64,
    pub game: GameConfig,
    /// Suppress per-run progress lines.
    pub quiet: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        let game = GameConfig::default();
        AuditConfig {
            games: 100,
            threads: 4,
            mountains: game.mountains_per_side,
            seed: 0,
            game,
            quiet: false,
        }
    }
}

/// Outcome of one side's automatic placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SideAudit {
    pub side: Side,
    pub placed: usize,
    pub mountains: usize,
    pub mountains_skipped: u32,
    pub evictions: u32,
    pub unplaced: BTreeMap<PieceType, u32>,
    /// Units standing outside the side's zone. Always 0 unless placement is broken.
    pub outside_zone: usize,
}

impl SideAudit {
    fn new(report: &PlacementReport, board: &BoardState, zone: Zone) -> Self {
        SideAudit {
            side: report.side,
            placed: report.placed.len(),
            mountains: report.mountains.len(),
            mountains_skipped: report.mountains_skipped,
            evictions: report.evictions,
            unplaced: report.unplaced.clone(),
            outside_zone: board
                .pieces_of(report.side)
                .iter()
                .filter(|p| !zone.contains(p.position))
                .count(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.unplaced.is_empty()
    }
}

/// One audited run. Serialized as one JSONL line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditRecord {
    pub game_id: usize,
    pub seed: u64,
    pub sides: Vec<SideAudit>,
    /// Whether play could start (both Kings on the board).
    pub playable: bool,
}

/// Seed for run `game_id`. Each run uses two consecutive seeds, one per side.
fn run_seed(base: u64, game_id: usize) -> u64 {
    if base == 0 {
        0
    } else {
        base.wrapping_add((game_id as u64) << 1)
    }
}

/// Lays out both sides of one game and records the result.
pub fn audit_game(config: &AuditConfig, game_id: usize) -> Result<AuditRecord, GameError> {
    let seed = run_seed(config.seed, game_id);
    let game_config = GameConfig {
        seed,
        ..config.game.clone()
    };
    let mut game = Game::new(game_config)?;

    let mut reports = Vec::with_capacity(2);
    for side in ALL_SIDES {
        reports.push(game.auto_place(side, config.mountains)?);
    }
    let sides = reports
        .iter()
        .map(|r| SideAudit::new(r, game.board(), Zone::for_config(r.side, game.config())))
        .collect();
    let playable = game.start_play(Side::Side1).is_ok();

    Ok(AuditRecord {
        game_id,
        seed,
        sides,
        playable,
    })
}

/// Runs the audit and collects every record.
pub fn run_audit(config: &AuditConfig) -> Result<Vec<AuditRecord>, AuditError> {
    let mut records = Vec::with_capacity(config.games);
    run_audit_with_callback(config, |record| records.push(record))?;
    records.sort_by_key(|r| r.game_id);
    Ok(records)
}

/// Runs the audit, handing each record to `on_record` as it completes.
pub fn run_audit_with_callback<F>(config: &AuditConfig, mut on_record: F) -> Result<(), AuditError>
where
    F: FnMut(AuditRecord) + Send,
{
    config.game.validate()?;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads.max(1))
        .build()?;
    let completed = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel::<AuditRecord>();

    std::thread::scope(|scope| {
        scope.spawn(|| {
            pool.install(|| {
                (0..config.games).into_par_iter().for_each_with(tx, |tx, i| {
                    match audit_game(config, i) {
                        Ok(record) => {
                            if !config.quiet {
                                let n = completed.fetch_add(1, Ordering::Relaxed) + 1;
                                let unplaced: u32 = record
                                    .sides
                                    .iter()
                                    .flat_map(|s| s.unplaced.values())
                                    .sum();
                                eprintln!("Run {}/{}: {} unplaced", n, config.games, unplaced);
                            }
                            let _ = tx.send(record);
                        }
                        Err(e) => tracing::error!(game_id = i, error = %e, "audit run failed"),
                    }
                });
            });
        });

        // Receive completed records on this thread and pass them on.
        for record in rx {
            on_record(record);
        }
    });
    Ok(())
}

/// Writes records as JSONL (one JSON object per run).
pub fn write_jsonl<W: Write>(records: &[AuditRecord], out: &mut W) -> std::io::Result<()> {
    for record in records {
        serde_json::to_writer(&mut *out, record)?;
        writeln!(out)?;
    }
    out.flush()
}

/// Aggregate numbers over many runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditSummary {
    pub runs: usize,
    pub sides_complete: usize,
    pub sides_total: usize,
    pub unplayable: usize,
    pub evictions: u32,
    pub mountains_skipped: u32,
    pub unplaced: BTreeMap<PieceType, u32>,
}

pub fn summarize(records: &[AuditRecord]) -> AuditSummary {
    let mut summary = AuditSummary {
        runs: records.len(),
        ..AuditSummary::default()
    };
    for record in records {
        if !record.playable {
            summary.unplayable += 1;
        }
        for side in &record.sides {
            summary.sides_total += 1;
            if side.is_complete() {
                summary.sides_complete += 1;
            }
            summary.evictions += side.evictions;
            summary.mountains_skipped += side.mountains_skipped;
            for (kind, n) in &side.unplaced {
                *summary.unplaced.entry(*kind).or_insert(0) += n;
            }
        }
    }
    summary
}

pub fn print_summary(records: &[AuditRecord]) {
    let summary = summarize(records);
    eprintln!("=== Placement Audit Summary ===");
    eprintln!("Runs: {}", summary.runs);
    eprintln!(
        "Complete sides: {}/{} ({:.1}%)",
        summary.sides_complete,
        summary.sides_total,
        100.0 * summary.sides_complete as f64 / summary.sides_total.max(1) as f64
    );
    eprintln!("Unplayable runs: {}", summary.unplayable);
    eprintln!("Forced evictions: {}", summary.evictions);
    eprintln!("Mountains skipped: {}", summary.mountains_skipped);
    if !summary.unplaced.is_empty() {
        eprintln!("Unplaced units:");
        for (kind, n) in &summary.unplaced {
            eprintln!("  {:>14}: {}", kind.name(), n);
        }
    }
}
