//! Deferred one-shot actions keyed on the real session clock.
//!
//! Each action kind carries a generation. Scheduling bumps the kind's
//! generation, so only the newest pending action of a kind can fire.
//! `invalidate_all` drops everything and bumps every generation; it is
//! called when a new session starts.

use marksman_core::constants::TICK_RATE;

/// Kinds of deferred mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeferredKind {
    /// Refill the magazine and clear the reloading flag.
    ReloadComplete,
    /// Leave bullet time and empty the charge meter.
    BulletTimeEnd,
    /// Spawn the next wave.
    WaveAdvance,
}

const KIND_COUNT: usize = 3;

impl DeferredKind {
    fn index(self) -> usize {
        match self {
            DeferredKind::ReloadComplete => 0,
            DeferredKind::BulletTimeEnd => 1,
            DeferredKind::WaveAdvance => 2,
        }
    }
}

/// A scheduled action.
#[derive(Debug, Clone, Copy)]
struct Deferred {
    kind: DeferredKind,
    due_tick: u64,
    generation: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    pending: Vec<Deferred>,
    generations: [u64; KIND_COUNT],
}

/// Convert a delay to whole ticks (at least one).
pub fn delay_ticks(delay_secs: f64) -> u64 {
    ((delay_secs * TICK_RATE as f64).round() as u64).max(1)
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `kind` to fire `delay_secs` after `now_tick`.
    /// Supersedes any pending action of the same kind.
    /// Returns the generation assigned to the action.
    pub fn schedule(&mut self, kind: DeferredKind, now_tick: u64, delay_secs: f64) -> u64 {
        let slot = &mut self.generations[kind.index()];
        *slot += 1;
        let generation = *slot;
        self.pending.push(Deferred {
            kind,
            due_tick: now_tick + delay_ticks(delay_secs),
            generation,
        });
        generation
    }

    /// Remove and return every action due at `now_tick`, oldest first.
    /// Superseded actions are dropped silently.
    pub fn take_due(&mut self, now_tick: u64) -> Vec<DeferredKind> {
        let mut due = Vec::new();
        self.pending.retain(|d| {
            if d.due_tick <= now_tick {
                due.push(*d);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|d| d.due_tick);

        due.into_iter()
            .filter(|d| {
                let current = d.generation == self.generations[d.kind.index()];
                if !current {
                    log::trace!("dropping stale {:?} (generation {})", d.kind, d.generation);
                }
                current
            })
            .map(|d| d.kind)
            .collect()
    }

    /// Whether a live (non-superseded) action of `kind` is waiting.
    pub fn is_pending(&self, kind: DeferredKind) -> bool {
        let generation = self.generations[kind.index()];
        self.pending
            .iter()
            .any(|d| d.kind == kind && d.generation == generation)
    }

    /// Drop every pending action and invalidate anything already handed out.
    pub fn invalidate_all(&mut self) {
        self.pending.clear();
        for generation in &mut self.generations {
            *generation += 1;
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
