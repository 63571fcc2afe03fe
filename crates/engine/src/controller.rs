//! Game controller - orchestrates sessions, timing and best records
//!
//! The controller owns the current [`Session`], the RNG used for dealing and
//! the best-record store. Front-ends feed it discrete events (configure,
//! start, card clicks) plus fixed-timestep ticks, and read back a
//! [`GameSnapshot`] to render.
//!
//! Delays (pair resolution, completion notice) are kept as deferred actions
//! tagged with the generation that scheduled them. `start()` bumps the
//! generation and drops the queue, so nothing scheduled for an old board can
//! touch the new one.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace};

use crate::core::{CompletedRun, GameSnapshot, PendingResolution, PickOutcome, Resolution, Session};
use crate::records::{BestRecords, Improvement, KeyValueStore};
use crate::types::{
    format_tenths, BestRecord, FaceStyle, GameAction, GridSize, GridSizeError,
    COMPLETION_NOTICE_MS, DEFAULT_EMOJI_MAX_GRID,
};

/// Settings the controller starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    pub grid_size: GridSize,
    pub use_emoji: bool,
    /// Largest board that honors `use_emoji`.
    pub emoji_max_grid: u8,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            grid_size: GridSize::default(),
            use_emoji: true,
            emoji_max_grid: DEFAULT_EMOJI_MAX_GRID,
        }
    }
}

/// Emitted once per finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionNotice {
    pub size: GridSize,
    pub time_tenths: u32,
    pub moves: u32,
    pub improved: bool,
    pub previous_best: Option<BestRecord>,
}

impl CompletionNotice {
    pub fn time_display(&self) -> String {
        format_tenths(self.time_tenths)
    }

    /// Human-readable message for the player.
    pub fn summary(&self) -> String {
        let mut msg = format!(
            "Congratulations! You found all pairs. Time: {} s, moves: {}",
            self.time_display(),
            self.moves
        );
        if self.improved {
            msg.push_str(" (new record!)");
        }
        msg
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deferred {
    Resolve(PendingResolution),
    Notify(CompletionNotice),
}

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    generation: u32,
    remaining_ms: u32,
    action: Deferred,
}

pub struct GameController<S, R = StdRng> {
    config: ControllerConfig,
    /// Size used by the next `start()`.
    selected_size: GridSize,
    use_emoji: bool,
    session: Session,
    /// Monotonic deal id (increments on every start).
    generation: u32,
    queue: Vec<Scheduled>,
    records: BestRecords<S>,
    best: Option<BestRecord>,
    notice: Option<CompletionNotice>,
    rng: R,
}

impl<S: KeyValueStore> GameController<S, StdRng> {
    /// Controller with a reproducible deal sequence.
    pub fn with_seed(config: ControllerConfig, records: BestRecords<S>, seed: u64) -> Self {
        Self::new(config, records, StdRng::seed_from_u64(seed))
    }
}

impl<S: KeyValueStore, R: Rng> GameController<S, R> {
    /// Create a controller and deal the first board.
    pub fn new(config: ControllerConfig, records: BestRecords<S>, mut rng: R) -> Self {
        let generation = 1;
        let style = FaceStyle::select(config.use_emoji, config.grid_size, config.emoji_max_grid);
        let session = Session::deal(config.grid_size, style, generation, &mut rng);
        let best = records.get(config.grid_size);

        debug!(
            generation,
            size = config.grid_size.n(),
            style = style.as_str(),
            "dealt first board"
        );

        Self {
            config,
            selected_size: config.grid_size,
            use_emoji: config.use_emoji,
            session,
            generation,
            queue: Vec::new(),
            records,
            best,
            notice: None,
            rng,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn selected_size(&self) -> GridSize {
        self.selected_size
    }

    pub fn use_emoji(&self) -> bool {
        self.use_emoji
    }

    pub fn best(&self) -> Option<BestRecord> {
        self.best
    }

    pub fn records(&self) -> &BestRecords<S> {
        &self.records
    }

    /// Number of deferred actions waiting to fire.
    pub fn pending_actions(&self) -> usize {
        self.queue.len()
    }

    /// Select the board size for the next start.
    ///
    /// The current board is left alone until `start()` is called.
    pub fn configure(&mut self, size: GridSize) {
        self.selected_size = size;
    }

    /// Like [`configure`](Self::configure), from a raw dimension.
    pub fn configure_n(&mut self, n: u8) -> Result<(), GridSizeError> {
        self.configure(GridSize::try_from(n)?);
        Ok(())
    }

    pub fn set_use_emoji(&mut self, use_emoji: bool) {
        self.use_emoji = use_emoji;
    }

    /// Face style the next start will deal.
    pub fn next_face_style(&self) -> FaceStyle {
        FaceStyle::select(self.use_emoji, self.selected_size, self.config.emoji_max_grid)
    }

    /// Deal a fresh board with the selected size, dropping any pending work.
    pub fn start(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.queue.clear();
        self.notice = None;

        let style = self.next_face_style();
        self.session = Session::deal(self.selected_size, style, self.generation, &mut self.rng);
        self.best = self.records.get(self.selected_size);

        debug!(
            generation = self.generation,
            size = self.selected_size.n(),
            style = style.as_str(),
            "dealt new board"
        );
    }

    /// Flip the card at `index` and return the state to render.
    pub fn handle_card_click(&mut self, index: usize) -> GameSnapshot {
        self.click(index);
        self.snapshot()
    }

    fn click(&mut self, index: usize) -> PickOutcome {
        let outcome = self.session.pick(index);
        match outcome {
            PickOutcome::Ignored(reason) => {
                trace!(index, ?reason, "pick ignored");
            }
            PickOutcome::First => {
                trace!(index, "first pick");
            }
            PickOutcome::Second(pending) => {
                trace!(index, outcome = ?pending.outcome, "second pick");
                self.schedule(pending.delay_ms(), Deferred::Resolve(pending));
            }
        }
        outcome
    }

    /// Single entry point for front-end actions.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        trace!(action = action.as_str(), phase = self.session.phase().as_str(), "apply action");
        match action {
            GameAction::Start | GameAction::Shuffle => {
                self.start();
                true
            }
            GameAction::Flip(index) => !matches!(self.click(index), PickOutcome::Ignored(_)),
            GameAction::SetGridSize(size) => {
                let changed = size != self.selected_size;
                self.configure(size);
                changed
            }
            GameAction::ToggleEmoji => {
                self.use_emoji = !self.use_emoji;
                true
            }
        }
    }

    /// Advance time. Returns true when anything visible changed.
    ///
    /// Time is applied deadline by deadline: the stopwatch only runs up to
    /// the next due action before that action fires, so a long tick that
    /// spans the final match does not count time past completion.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        let mut changed = false;
        let mut left = elapsed_ms;

        loop {
            let step = self
                .queue
                .iter()
                .map(|s| s.remaining_ms)
                .min()
                .map_or(left, |due| due.min(left));

            changed |= self.session.tick(step);
            for scheduled in &mut self.queue {
                scheduled.remaining_ms = scheduled.remaining_ms.saturating_sub(step);
            }
            left -= step;

            // Fire due actions in scheduling order; firing may schedule more.
            while let Some(pos) = self.queue.iter().position(|s| s.remaining_ms == 0) {
                let scheduled = self.queue.remove(pos);
                if scheduled.generation != self.generation {
                    trace!(generation = scheduled.generation, "dropping stale deferred action");
                    continue;
                }
                changed |= self.run_deferred(scheduled.action);
            }

            if left == 0 {
                return changed;
            }
        }
    }

    /// Completion notice, once, after it falls due.
    pub fn take_notice(&mut self) -> Option<CompletionNotice> {
        self.notice.take()
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.session.snapshot_into(out);
        out.selected_size = self.selected_size;
        out.use_emoji = self.use_emoji;
        out.best = self.best;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    fn schedule(&mut self, delay_ms: u32, action: Deferred) {
        self.queue.push(Scheduled {
            generation: self.generation,
            remaining_ms: delay_ms,
            action,
        });
    }

    fn run_deferred(&mut self, action: Deferred) -> bool {
        match action {
            Deferred::Resolve(pending) => match self.session.resolve(&pending) {
                Resolution::Stale => false,
                Resolution::Matched { found } => {
                    debug!(found, pairs = self.session.pairs_total(), "pair matched");
                    true
                }
                Resolution::Mismatched => {
                    debug!(moves = self.session.moves(), "pair mismatched");
                    true
                }
                Resolution::Completed(run) => {
                    self.finish(run);
                    true
                }
            },
            Deferred::Notify(notice) => {
                self.notice = Some(notice);
                true
            }
        }
    }

    fn finish(&mut self, run: CompletedRun) {
        let improvement = self
            .records
            .record_if_better(run.size, run.time_tenths, run.moves);

        let (improved, previous_best) = match improvement {
            Improvement::Improved { previous } => (true, previous),
            Improvement::NotImproved { best } => (false, Some(best)),
        };
        self.best = if improved {
            Some(BestRecord::new(run.time_tenths, run.moves))
        } else {
            previous_best
        };

        info!(
            size = run.size.n(),
            time = %format_tenths(run.time_tenths),
            moves = run.moves,
            improved,
            "board complete"
        );

        self.schedule(
            COMPLETION_NOTICE_MS,
            Deferred::Notify(CompletionNotice {
                size: run.size,
                time_tenths: run.time_tenths,
                moves: run.moves,
                improved,
                previous_best,
            }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::MemoryStore;
    use crate::types::{Phase, MATCH_RESOLVE_MS, MISMATCH_RESOLVE_MS};

    fn controller(n: u8) -> GameController<MemoryStore> {
        let config = ControllerConfig {
            grid_size: GridSize::try_from(n).unwrap(),
            ..ControllerConfig::default()
        };
        GameController::with_seed(config, BestRecords::new(MemoryStore::new()), 12345)
    }

    /// Board indices grouped by face id, taken from the rendered state.
    fn pairs(c: &GameController<MemoryStore>) -> Vec<(usize, usize)> {
        let snap = c.snapshot();
        let mut slots: Vec<Vec<usize>> = vec![Vec::new(); snap.pairs_total as usize];
        for (i, card) in snap.cards.iter().enumerate() {
            slots[card.face.id as usize].push(i);
        }
        slots.into_iter().map(|s| (s[0], s[1])).collect()
    }

    /// Two indices holding different faces.
    fn mismatch(c: &GameController<MemoryStore>) -> (usize, usize) {
        let p = pairs(c);
        (p[0].0, p[1].0)
    }

    fn play_pair(c: &mut GameController<MemoryStore>, a: usize, b: usize, wait_ms: u32) {
        c.handle_card_click(a);
        c.tick(wait_ms);
        c.handle_card_click(b);
        c.tick(MISMATCH_RESOLVE_MS);
    }

    #[test]
    fn test_new_controller_deals_configured_board() {
        let c = controller(4);
        let snap = c.snapshot();
        assert_eq!(snap.cards.len(), 16);
        assert_eq!(snap.pairs_total, 8);
        assert_eq!(snap.generation, 1);
        assert_eq!(snap.moves, 0);
        assert_eq!(snap.elapsed_display(), "0.0");
        assert_eq!(snap.best, None);
    }

    #[test]
    fn test_resolution_waits_for_delay() {
        let mut c = controller(4);
        let (a, b) = pairs(&c)[0];

        c.handle_card_click(a);
        let snap = c.handle_card_click(b);
        assert_eq!(snap.phase, Phase::Resolving);
        assert!(snap.locked);
        assert_eq!(c.pending_actions(), 1);

        c.tick(MATCH_RESOLVE_MS - 1);
        assert_eq!(c.snapshot().found, 0);

        assert!(c.tick(1));
        let snap = c.snapshot();
        assert_eq!(snap.found, 1);
        assert!(snap.cards[a].matched && snap.cards[b].matched);
        assert_eq!(snap.phase, Phase::Idle);
        assert_eq!(c.pending_actions(), 0);
    }

    #[test]
    fn test_mismatch_flips_back_after_longer_delay() {
        let mut c = controller(4);
        let (a, b) = mismatch(&c);

        c.handle_card_click(a);
        c.handle_card_click(b);
        c.tick(MATCH_RESOLVE_MS);
        assert!(c.snapshot().cards[a].flipped);

        c.tick(MISMATCH_RESOLVE_MS - MATCH_RESOLVE_MS);
        let snap = c.snapshot();
        assert!(!snap.cards[a].flipped && !snap.cards[b].flipped);
        assert_eq!(snap.moves, 1);
        assert_eq!(snap.found, 0);
    }

    #[test]
    fn test_clicks_while_locked_are_ignored() {
        let mut c = controller(4);
        let p = pairs(&c);

        c.handle_card_click(p[0].0);
        c.handle_card_click(p[1].0);
        assert!(!c.apply_action(GameAction::Flip(p[2].0)));

        let snap = c.snapshot();
        assert!(!snap.cards[p[2].0].flipped);
        assert_eq!(snap.moves, 1);
    }

    #[test]
    fn test_start_drops_pending_resolution() {
        let mut c = controller(4);
        let (a, b) = pairs(&c)[0];
        c.handle_card_click(a);
        c.handle_card_click(b);

        c.start();
        assert_eq!(c.generation(), 2);
        assert_eq!(c.pending_actions(), 0);

        c.tick(MISMATCH_RESOLVE_MS);
        let snap = c.snapshot();
        assert_eq!(snap.found, 0);
        assert_eq!(snap.moves, 0);
        assert!(snap.cards.iter().all(|card| !card.face_up()));
    }

    #[test]
    fn test_configure_applies_on_next_start() {
        let mut c = controller(4);
        c.configure_n(6).unwrap();
        assert_eq!(c.snapshot().cards.len(), 16);
        assert_eq!(c.snapshot().selected_size.n(), 6);

        c.start();
        assert_eq!(c.snapshot().cards.len(), 36);
        assert!(c.configure_n(7).is_err());
        assert_eq!(c.selected_size().n(), 6);
    }

    #[test]
    fn test_emoji_falls_back_to_color_above_threshold() {
        let mut c = controller(8);
        assert_eq!(c.next_face_style(), FaceStyle::Emoji);

        c.configure_n(10).unwrap();
        assert_eq!(c.next_face_style(), FaceStyle::Color);

        c.configure_n(4).unwrap();
        c.apply_action(GameAction::ToggleEmoji);
        assert_eq!(c.next_face_style(), FaceStyle::Color);
    }

    #[test]
    fn test_timer_starts_on_first_pick() {
        let mut c = controller(4);
        c.tick(3000);
        assert_eq!(c.snapshot().elapsed_tenths, 0);

        let (a, _) = pairs(&c)[0];
        c.handle_card_click(a);
        c.tick(1200);
        assert_eq!(c.snapshot().elapsed_display(), "1.2");
        assert!(c.snapshot().timer_running);
    }

    #[test]
    fn test_completion_records_and_notifies() {
        let mut c = controller(4);
        for (a, b) in pairs(&c) {
            play_pair(&mut c, a, b, 100);
        }

        let snap = c.snapshot();
        assert_eq!(snap.phase, Phase::Complete);
        assert_eq!(snap.found, 8);
        assert_eq!(snap.moves, 8);
        assert!(!snap.timer_running);
        assert!(snap.best.is_some());

        // Notice is delayed slightly after the final match.
        c.tick(COMPLETION_NOTICE_MS);
        let notice = c.take_notice().expect("completion notice");
        assert!(notice.improved);
        assert_eq!(notice.previous_best, None);
        assert_eq!(notice.moves, 8);
        assert_eq!(Some(BestRecord::new(notice.time_tenths, 8)), snap.best);
        assert!(notice.summary().ends_with("(new record!)"));
        assert_eq!(c.take_notice(), None);
    }

    #[test]
    fn test_slower_rerun_keeps_record() {
        let mut c = controller(2);
        for (a, b) in pairs(&c) {
            play_pair(&mut c, a, b, 100);
        }
        c.tick(COMPLETION_NOTICE_MS);
        let first = c.take_notice().unwrap();

        c.start();
        for (a, b) in pairs(&c) {
            play_pair(&mut c, a, b, 900);
        }
        c.tick(COMPLETION_NOTICE_MS);
        let second = c.take_notice().unwrap();

        assert!(second.time_tenths > first.time_tenths);
        assert!(!second.improved);
        assert_eq!(
            second.previous_best,
            Some(BestRecord::new(first.time_tenths, first.moves))
        );
        assert_eq!(c.best(), second.previous_best);
        assert!(!second.summary().contains("record"));
    }

    #[test]
    fn test_long_tick_stops_clock_at_final_match() {
        let mut c = controller(2);
        let p = pairs(&c);

        c.handle_card_click(p[0].0);
        c.handle_card_click(p[0].1);
        c.tick(MATCH_RESOLVE_MS);

        c.handle_card_click(p[1].0);
        c.handle_card_click(p[1].1);
        // One frame far longer than the resolution delay.
        c.tick(5000);

        let snap = c.snapshot();
        assert_eq!(snap.phase, Phase::Complete);
        assert_eq!(snap.elapsed_tenths, 8);

        // Notice fell due inside the same frame.
        let notice = c.take_notice().expect("notice within the long tick");
        assert_eq!(notice.time_tenths, 8);
        assert_eq!(c.best(), Some(BestRecord::new(8, 2)));
    }

    #[test]
    fn test_tick_split_matches_single_tick() {
        let mut split = controller(4);
        let mut whole = controller(4);
        let (a, b) = mismatch(&split);

        for c in [&mut split, &mut whole] {
            c.handle_card_click(a);
            c.handle_card_click(b);
        }
        for _ in 0..10 {
            split.tick(130);
        }
        whole.tick(1300);

        assert_eq!(split.snapshot(), whole.snapshot());
        assert_eq!(whole.snapshot().elapsed_tenths, 13);
        assert!(!whole.snapshot().cards[a].flipped);
    }

    #[test]
    fn test_start_clears_pending_notice() {
        let mut c = controller(2);
        for (a, b) in pairs(&c) {
            play_pair(&mut c, a, b, 0);
        }
        c.start();
        c.tick(COMPLETION_NOTICE_MS);
        assert_eq!(c.take_notice(), None);
        // The record itself was still written.
        assert!(c.best().is_some());
    }
}
