//! Turn-taking state machine.
//!
//! `GameSession` owns the shared game, one controller per side and the
//! display/transport collaborators. All committing mutations (human, remote
//! and AI moves, history stepping, resignation) happen here on the caller's
//! thread while holding the game mutex. Search workers only read snapshots
//! and report results as `WorkerEvent`s, which the session drains in
//! `poll_workers` / `wait_for_ai_move` and commits if the result's generation
//! is still the outstanding one.
//!
//! Phases: `Setup -> AwaitingMove | SearchInProgress -> ... -> GameEnded`,
//! with `Paused` entered explicitly for history browsing.

use std::fmt;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::engines::engine_trait::Engine;
use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::{Cell, Color};
use crate::game_state::game_state::{GameState, PositionKey};
use crate::move_generation::legal_move_generator::legal_moves_from;
use crate::move_generation::terminal::GameStatus;
use crate::moves::move_descriptions::Move;
use crate::search::search_worker::{SearchHandle, SharedGame, WorkerEvent};
use crate::session::display::GameDisplay;
use crate::session::game_record::{GameRecord, SessionContext};
use crate::session::player::{GameMode, Player, PlayerKind};
use crate::session::session_config::SessionConfig;
use crate::session::transport::{resolve_remote_move, MoveTransport, RemoteMoveDescriptor};
use crate::utils::san::san_to_move;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Setup,
    AwaitingMove(Color),
    SearchInProgress(Color),
    Paused,
    GameEnded(GameStatus),
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPhase::Setup => write!(f, "setup"),
            SessionPhase::AwaitingMove(side) => write!(f, "awaiting_move {side}"),
            SessionPhase::SearchInProgress(side) => write!(f, "searching {side}"),
            SessionPhase::Paused => write!(f, "paused"),
            SessionPhase::GameEnded(status) => write!(f, "ended {status}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OutstandingSearch {
    side: Color,
    generation: u64,
}

/// Where play stood when the session was paused.
#[derive(Debug, Clone)]
struct PauseMark {
    resume_phase: SessionPhase,
    cursor: usize,
    history_len: usize,
    key: PositionKey,
}

/// Search result that arrived while paused.
#[derive(Debug, Clone)]
struct ParkedResult {
    search: OutstandingSearch,
    mv: Option<Move>,
    position: PositionKey,
}

/// Builds the engine for a computer-controlled side. Called again whenever a
/// terminated worker is replaced.
pub type EngineFactory = Arc<dyn Fn(Color) -> Box<dyn Engine> + Send + Sync>;

pub struct GameSession {
    game: SharedGame,
    config: SessionConfig,
    players: [Player; 2],
    phase: SessionPhase,
    pause_mark: Option<PauseMark>,
    outstanding: Option<OutstandingSearch>,
    parked: Option<ParkedResult>,
    events_tx: Sender<WorkerEvent>,
    events_rx: Receiver<WorkerEvent>,
    display: Box<dyn GameDisplay>,
    transport: Option<Box<dyn MoveTransport>>,
    remote_enabled: bool,
    record: GameRecord,
    engines: EngineFactory,
}

impl GameSession {
    /// Builds the position, the players and their (blocked) workers, replays
    /// any configured SAN moves, then releases the workers. Play begins with
    /// `start`.
    pub fn new(
        config: SessionConfig,
        display: Box<dyn GameDisplay>,
        transport: Option<Box<dyn MoveTransport>>,
        context: &mut SessionContext,
    ) -> ChessResult<Self> {
        let difficulty = config.difficulty;
        let engines: EngineFactory = Arc::new(move |_side: Color| difficulty.build_engine());
        Self::with_engines(config, display, transport, context, engines)
    }

    /// Like `new`, with computer sides played by engines from `engines`
    /// instead of the configured difficulty's engine.
    pub fn with_engines(
        config: SessionConfig,
        display: Box<dyn GameDisplay>,
        transport: Option<Box<dyn MoveTransport>>,
        context: &mut SessionContext,
        engines: EngineFactory,
    ) -> ChessResult<Self> {
        if config.mode == GameMode::OnlineMultiplayer
            && (config.network_role.is_none() || transport.is_none())
        {
            return Err(ChessError::InvalidPhase(
                "online play needs a network role and a transport".to_owned(),
            ));
        }

        let mut game = match &config.start_fen {
            Some(fen) => GameState::from_fen(fen)?,
            None => GameState::new_game(),
        };
        game.refresh_status()?;
        let game: SharedGame = Arc::new(Mutex::new(game));

        let (events_tx, events_rx) = mpsc::channel();
        let light = Self::build_player(&config, &engines, Color::Light, &game, &events_tx)?;
        let dark = Self::build_player(&config, &engines, Color::Dark, &game, &events_tx)?;

        let mut record = config.record.clone();
        context.assign_round(&mut record);
        if light.is_ai() || dark.is_ai() {
            record.difficulty = Some(config.difficulty);
        }
        let unnamed = GameRecord::default();
        if record.white == unnamed.white {
            record.white = light.label(Color::Light, config.difficulty);
        }
        if record.black == unnamed.black {
            record.black = dark.label(Color::Dark, config.difficulty);
        }

        let mut session = Self {
            game,
            players: [light, dark],
            phase: SessionPhase::Setup,
            pause_mark: None,
            outstanding: None,
            parked: None,
            events_tx,
            events_rx,
            display,
            remote_enabled: transport.is_some(),
            transport,
            record,
            config,
            engines,
        };

        let replay = session.config.replay_san.clone();
        session.replay(&replay)?;
        session.for_each_worker(|handle| handle.block(false));
        session.info(format!(
            "info string session created mode {:?} round {}",
            session.config.mode,
            session.record.round.as_deref().unwrap_or("-")
        ));
        Ok(session)
    }

    fn build_player(
        config: &SessionConfig,
        engines: &EngineFactory,
        side: Color,
        game: &SharedGame,
        events: &Sender<WorkerEvent>,
    ) -> ChessResult<Player> {
        let kind = match config.mode {
            GameMode::ManualOnly => PlayerKind::Human,
            GameMode::AiOnly => PlayerKind::Ai,
            GameMode::ManualVsAi if side == config.human_color => PlayerKind::Human,
            GameMode::ManualVsAi => PlayerKind::Ai,
            GameMode::OnlineMultiplayer => match config.network_role {
                Some(role) if role.local_color() == side => PlayerKind::Human,
                _ => PlayerKind::Remote,
            },
        };
        Ok(match kind {
            PlayerKind::Human => Player::Human,
            PlayerKind::Remote => Player::Remote,
            PlayerKind::Ai => {
                let handle = Self::spawn_worker(config, engines, side, game, events)?;
                handle.block(true);
                Player::Ai(handle)
            }
        })
    }

    fn spawn_worker(
        config: &SessionConfig,
        engines: &EngineFactory,
        side: Color,
        game: &SharedGame,
        events: &Sender<WorkerEvent>,
    ) -> ChessResult<SearchHandle> {
        SearchHandle::spawn(
            side,
            Arc::clone(game),
            engines(side),
            config.search_config(),
            events.clone(),
        )
    }

    /// Commits a SAN move list while workers are still blocked.
    fn replay(&mut self, moves: &[String]) -> ChessResult<()> {
        for san in moves {
            let mv = {
                let mut game = self.lock_game()?;
                san_to_move(&mut game, san)?
            };
            self.commit(&mv)?;
        }
        if !moves.is_empty() {
            self.info(format!("info string session replayed {} moves", moves.len()));
        }
        Ok(())
    }

    // --- Accessors ---

    #[inline]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[inline]
    pub fn shared_game(&self) -> SharedGame {
        Arc::clone(&self.game)
    }

    #[inline]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[inline]
    pub fn record(&self) -> &GameRecord {
        &self.record
    }

    #[inline]
    pub fn player(&self, side: Color) -> &Player {
        &self.players[side.index()]
    }

    pub fn fen(&self) -> ChessResult<String> {
        Ok(self.lock_game()?.get_fen())
    }

    /// SAN of the moves currently applied to the board.
    pub fn san_history(&self) -> ChessResult<Vec<String>> {
        Ok(self.lock_game()?.history.san_moves())
    }

    /// Legal moves of the piece on `cell`, for move-input highlighting.
    pub fn legal_moves_from(&self, cell: Cell) -> ChessResult<Vec<Move>> {
        let mut game = self.lock_game()?;
        legal_moves_from(&mut game, cell)
    }

    // --- Turn flow ---

    pub fn start(&mut self) -> ChessResult<()> {
        if self.phase != SessionPhase::Setup {
            return Err(ChessError::InvalidPhase(format!(
                "start requires setup, session is {}",
                self.phase
            )));
        }
        self.advance_turn()
    }

    /// Human move for the side whose turn it is.
    pub fn submit_move(&mut self, mv: &Move) -> ChessResult<()> {
        let side = self.expect_turn_of(PlayerKind::Human)?;
        let mover = self
            .lock_game()?
            .grid
            .piece_at(mv.from)
            .map(|p| p.color())
            .ok_or(ChessError::EmptyOrigin(mv.from))?;
        if mover != side {
            return Err(ChessError::NotYourTurn(mover));
        }

        self.commit(mv)?;
        if self.config.mode == GameMode::OnlineMultiplayer && self.remote_enabled {
            let descriptor = RemoteMoveDescriptor::from_move(mv);
            let sent = match self.transport.as_mut() {
                Some(transport) => transport.send_move(&descriptor),
                None => Err(ChessError::Transport("no transport attached".to_owned())),
            };
            if let Err(error) = sent {
                self.info(format!("info string session send_failed {error}"));
                self.handle_disconnection();
                return Ok(());
            }
        }
        self.advance_turn()
    }

    pub fn submit_san(&mut self, san: &str) -> ChessResult<Move> {
        self.expect_turn_of(PlayerKind::Human)?;
        let mv = {
            let mut game = self.lock_game()?;
            san_to_move(&mut game, san)?
        };
        self.submit_move(&mv)?;
        Ok(mv)
    }

    /// Resolves and commits a move received from the remote peer. Descriptors
    /// that do not resolve are reported to the transport and nothing changes.
    pub fn submit_remote_move(&mut self, descriptor: &RemoteMoveDescriptor) -> ChessResult<Move> {
        self.expect_turn_of(PlayerKind::Remote)?;
        if !self.remote_enabled {
            return Err(ChessError::Transport("remote play is disabled".to_owned()));
        }

        let resolved = {
            let mut game = self.lock_game()?;
            resolve_remote_move(&mut game, descriptor)
        };
        let mv = match resolved {
            Ok(mv) => mv,
            Err(error) => {
                if let Some(transport) = self.transport.as_mut() {
                    transport.report_unresolvable(descriptor, &error);
                }
                self.info(format!(
                    "info string session remote_unresolvable {descriptor}"
                ));
                return Err(error);
            }
        };

        self.commit(&mv)?;
        self.advance_turn()?;
        Ok(mv)
    }

    /// Drains pending worker events without blocking. Returns the number of
    /// AI moves committed.
    pub fn poll_workers(&mut self) -> ChessResult<usize> {
        let mut committed = 0;
        loop {
            match self.events_rx.try_recv() {
                Ok(event) => {
                    if self.handle_event(event)? {
                        committed += 1;
                    }
                }
                Err(TryRecvError::Empty) => return Ok(committed),
                Err(TryRecvError::Disconnected) => {
                    return Err(ChessError::CorruptState("worker channel closed".to_owned()))
                }
            }
        }
    }

    /// Blocks until an AI move is committed or `timeout` elapses. Returns
    /// `false` on timeout or when no search is running.
    pub fn wait_for_ai_move(&mut self, timeout: Duration) -> ChessResult<bool> {
        // Deadlines past the clock's range wait without a limit.
        let deadline = Instant::now().checked_add(timeout);
        while matches!(self.phase, SessionPhase::SearchInProgress(_)) {
            let received = match deadline {
                Some(deadline) => self
                    .events_rx
                    .recv_timeout(deadline.saturating_duration_since(Instant::now())),
                None => self
                    .events_rx
                    .recv()
                    .map_err(|_| RecvTimeoutError::Disconnected),
            };
            match received {
                Ok(event) => {
                    if self.handle_event(event)? {
                        return Ok(true);
                    }
                }
                Err(RecvTimeoutError::Timeout) => return Ok(false),
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(ChessError::CorruptState("worker channel closed".to_owned()))
                }
            }
        }
        Ok(false)
    }

    /// Starts a fresh search after a worker fault left an AI side waiting.
    pub fn retry_search(&mut self) -> ChessResult<()> {
        match self.phase {
            SessionPhase::AwaitingMove(side) if self.players[side.index()].is_ai() => {
                self.advance_turn()
            }
            phase => Err(ChessError::InvalidPhase(format!(
                "nothing to retry while {phase}"
            ))),
        }
    }

    // --- Pause and history ---

    /// Suspends any running search without cancelling it.
    pub fn pause(&mut self) -> ChessResult<()> {
        if self.config.mode == GameMode::OnlineMultiplayer {
            return Err(ChessError::InvalidPhase(
                "history browsing is disabled in online play".to_owned(),
            ));
        }
        if matches!(self.phase, SessionPhase::Setup | SessionPhase::Paused) {
            return Err(ChessError::InvalidPhase(format!("cannot pause while {}", self.phase)));
        }

        self.for_each_worker(|handle| handle.request_pause());
        let (cursor, history_len, key, back, forward) = {
            let game = self.lock_game()?;
            (
                game.history.cursor(),
                game.history.len(),
                game.position_key(),
                game.history.can_step_back(),
                game.history.can_step_forward(),
            )
        };
        self.pause_mark = Some(PauseMark {
            resume_phase: self.phase,
            cursor,
            history_len,
            key,
        });
        self.set_phase(SessionPhase::Paused);
        self.display.navigation_changed(back, forward);
        Ok(())
    }

    /// Leaves `Paused`. An unchanged position resumes exactly where play
    /// stood; a changed one cancels the old search and restarts the turn.
    pub fn resume(&mut self) -> ChessResult<()> {
        if self.phase != SessionPhase::Paused {
            return Err(ChessError::InvalidPhase(format!("cannot resume while {}", self.phase)));
        }
        let mark = self
            .pause_mark
            .take()
            .ok_or_else(|| ChessError::CorruptState("paused without a pause mark".to_owned()))?;

        let unchanged = {
            let game = self.lock_game()?;
            game.history.cursor() == mark.cursor
                && game.history.len() == mark.history_len
                && game.position_key() == mark.key
        };

        if unchanged {
            self.set_phase(mark.resume_phase);
            self.for_each_worker(|handle| handle.request_resume());
            if let Some(parked) = self.parked.take() {
                if self.outstanding == Some(parked.search) {
                    self.outstanding = None;
                    self.apply_search_result(parked.search.side, parked.mv, &parked.position)?;
                    return Ok(());
                }
            }
            if let SessionPhase::SearchInProgress(side) = mark.resume_phase {
                if self.outstanding.map(|o| o.side) != Some(side) {
                    self.info(format!("info string session reissued_search {side}"));
                    return self.advance_turn();
                }
            }
            return Ok(());
        }

        self.cancel_outstanding();
        self.for_each_worker(|handle| handle.request_resume());
        let status = self.lock_game()?.refresh_status()?;
        self.record.set_result(status);
        self.info("info string session resumed from a new position".to_owned());
        self.advance_turn()
    }

    pub fn step_back(&mut self) -> ChessResult<Option<Move>> {
        self.expect_paused("step back")?;
        let undone = self.lock_game()?.step_back()?;
        if let Some(mv) = &undone {
            self.display.move_undone(mv);
            self.announce_position()?;
        }
        Ok(undone)
    }

    pub fn step_forward(&mut self) -> ChessResult<Option<Move>> {
        self.expect_paused("step forward")?;
        let redone = {
            let mut game = self.lock_game()?;
            let stepped = game.step_forward()?;
            let entry = stepped.and_then(|_| game.history.last_applied().cloned());
            entry
        };
        if let Some(entry) = &redone {
            self.display.move_executed(&entry.mv, &entry.san, entry.mover);
            self.announce_position()?;
        }
        Ok(redone.map(|entry| entry.mv))
    }

    // --- Endings and settings ---

    pub fn resign(&mut self, side: Color) -> ChessResult<()> {
        if matches!(self.phase, SessionPhase::Setup | SessionPhase::GameEnded(_)) {
            return Err(ChessError::InvalidPhase(format!("cannot resign while {}", self.phase)));
        }
        let status = GameStatus::Resigned {
            winner: side.opposite(),
        };
        self.lock_game()?.mark_ended(status);
        self.end_game(status);
        Ok(())
    }

    /// The peer is gone: the game ends without a winner and remote play stops.
    pub fn handle_disconnection(&mut self) {
        self.remote_enabled = false;
        if matches!(self.phase, SessionPhase::GameEnded(_)) {
            return;
        }
        if let Ok(mut game) = self.lock_game() {
            game.mark_ended(GameStatus::Disconnected);
        }
        self.end_game(GameStatus::Disconnected);
    }

    /// Updates the search step delay on every live worker.
    pub fn set_speed(&mut self, delay: Duration) {
        self.config.step_delay = delay;
        self.for_each_worker(|handle| handle.set_delay(delay));
        self.info(format!(
            "info string session step_delay_ms {}",
            delay.as_millis()
        ));
    }

    /// Stops every worker. Handles also stop and join on drop.
    pub fn shutdown(&mut self) {
        self.cancel_outstanding();
        self.for_each_worker(|handle| handle.request_stop());
    }

    // --- Internals ---

    fn lock_game(&self) -> ChessResult<MutexGuard<'_, GameState>> {
        self.game
            .lock()
            .map_err(|_| ChessError::CorruptState("shared game lock poisoned".to_owned()))
    }

    fn info(&mut self, line: String) {
        self.display.info_line(&line);
    }

    fn set_phase(&mut self, phase: SessionPhase) {
        self.phase = phase;
        self.info(format!("info string session phase {phase}"));
    }

    fn for_each_worker(&self, f: impl Fn(&SearchHandle)) {
        for player in &self.players {
            if let Player::Ai(handle) = player {
                f(handle);
            }
        }
    }

    fn expect_paused(&self, action: &str) -> ChessResult<()> {
        if self.phase == SessionPhase::Paused {
            Ok(())
        } else {
            Err(ChessError::InvalidPhase(format!(
                "{action} is only valid while paused, session is {}",
                self.phase
            )))
        }
    }

    /// Side to move if the session awaits a move from a `kind` controller.
    fn expect_turn_of(&self, kind: PlayerKind) -> ChessResult<Color> {
        match self.phase {
            SessionPhase::AwaitingMove(side) if self.players[side.index()].kind() == kind => {
                Ok(side)
            }
            SessionPhase::AwaitingMove(side) | SessionPhase::SearchInProgress(side) => {
                Err(ChessError::NotYourTurn(side.opposite()))
            }
            phase => Err(ChessError::InvalidPhase(format!("no move accepted while {phase}"))),
        }
    }

    fn commit(&mut self, mv: &Move) -> ChessResult<()> {
        let (entry, status) = {
            let mut game = self.lock_game()?;
            let entry = game.commit_move(mv)?.clone();
            (entry, game.status)
        };
        self.display.move_executed(&entry.mv, &entry.san, entry.mover);
        self.record.set_result(status);
        self.info(format!(
            "info string session committed {} {} status {status}",
            entry.mover, entry.san
        ));
        Ok(())
    }

    fn announce_position(&mut self) -> ChessResult<()> {
        let (side, fullmove, ply, back, forward) = {
            let game = self.lock_game()?;
            (
                game.side_to_move,
                game.fullmove_number,
                game.ply,
                game.history.can_step_back(),
                game.history.can_step_forward(),
            )
        };
        self.display.navigation_changed(back, forward);
        self.display.move_counter_updated(fullmove, ply);
        self.display.side_to_move_changed(side);
        Ok(())
    }

    /// Hands the turn to whoever controls the side to move.
    fn advance_turn(&mut self) -> ChessResult<()> {
        self.announce_position()?;
        let (status, side) = {
            let game = self.lock_game()?;
            (game.status, game.side_to_move)
        };
        if status.is_terminal() {
            self.end_game(status);
            return Ok(());
        }

        match self.players[side.index()].kind() {
            PlayerKind::Human => self.set_phase(SessionPhase::AwaitingMove(side)),
            PlayerKind::Remote => {
                self.set_phase(SessionPhase::AwaitingMove(side));
                if !self.remote_enabled {
                    return Ok(());
                }
                let armed = match self.transport.as_mut() {
                    Some(transport) => transport.await_remote_move(side),
                    None => Err(ChessError::Transport("no transport attached".to_owned())),
                };
                if let Err(error) = armed {
                    self.info(format!("info string session listen_failed {error}"));
                    self.handle_disconnection();
                }
            }
            PlayerKind::Ai => {
                let generation = self.ensure_worker(side)?.start_search();
                self.outstanding = Some(OutstandingSearch { side, generation });
                self.set_phase(SessionPhase::SearchInProgress(side));
            }
        }
        Ok(())
    }

    /// The side's live worker, constructing a replacement if the previous one
    /// terminated.
    fn ensure_worker(&mut self, side: Color) -> ChessResult<&SearchHandle> {
        let index = side.index();
        let terminated = match &self.players[index] {
            Player::Ai(handle) => handle.is_terminated(),
            _ => {
                return Err(ChessError::InvalidPhase(format!(
                    "{side} is not computer-controlled"
                )))
            }
        };
        if terminated {
            let handle = Self::spawn_worker(
                &self.config,
                &self.engines,
                side,
                &self.game,
                &self.events_tx,
            )?;
            self.players[index] = Player::Ai(handle);
            self.info(format!("info string session worker_replaced {side}"));
        }
        self.players[index]
            .search_handle()
            .ok_or_else(|| ChessError::CorruptState(format!("{side} lost its worker")))
    }

    fn cancel_outstanding(&mut self) {
        self.parked = None;
        if let Some(search) = self.outstanding.take() {
            if let Some(handle) = self.players[search.side.index()].search_handle() {
                handle.cancel_search();
            }
        }
    }

    /// Returns whether an AI move was committed.
    fn handle_event(&mut self, event: WorkerEvent) -> ChessResult<bool> {
        match event {
            WorkerEvent::Info { line, .. } => {
                self.info(line);
                Ok(false)
            }
            WorkerEvent::BestMove {
                side,
                generation,
                mv,
                position,
                info_lines,
            } => {
                for line in info_lines {
                    self.info(line);
                }
                let search = OutstandingSearch { side, generation };
                if self.outstanding != Some(search) {
                    self.info(format!(
                        "info string session dropped_stale_result {side} generation {generation}"
                    ));
                    return Ok(false);
                }
                if self.phase == SessionPhase::Paused {
                    self.parked = Some(ParkedResult {
                        search,
                        mv,
                        position,
                    });
                    return Ok(false);
                }
                self.outstanding = None;
                self.apply_search_result(side, mv, &position)
            }
            WorkerEvent::Skipped { side, generation } => {
                let search = OutstandingSearch { side, generation };
                if self.outstanding != Some(search) {
                    return Ok(false);
                }
                // The worker saw a position where it was not on move. While
                // paused, resume reissues the search instead.
                self.outstanding = None;
                if self.phase == SessionPhase::SearchInProgress(side) {
                    self.advance_turn()?;
                }
                Ok(false)
            }
            WorkerEvent::Fault {
                side,
                generation,
                message,
            } => {
                self.info(format!("info string search_worker {side} fault {message}"));
                let ours = self
                    .outstanding
                    .is_some_and(|o| o.side == side && generation.map_or(true, |g| g == o.generation));
                if ours {
                    self.outstanding = None;
                    let waiting = SessionPhase::AwaitingMove(side);
                    if self.phase == SessionPhase::SearchInProgress(side) {
                        self.set_phase(waiting);
                    }
                    if let Some(mark) = self.pause_mark.as_mut() {
                        if mark.resume_phase == SessionPhase::SearchInProgress(side) {
                            mark.resume_phase = waiting;
                        }
                    }
                }
                Err(ChessError::WorkerFault { side, message })
            }
        }
    }

    /// Commits a search result if the board still shows the searched
    /// position; otherwise searches again.
    fn apply_search_result(
        &mut self,
        side: Color,
        mv: Option<Move>,
        position: &PositionKey,
    ) -> ChessResult<bool> {
        if self.lock_game()?.position_key() != *position {
            self.info(format!("info string session dropped_stale_position {side}"));
            self.advance_turn()?;
            return Ok(false);
        }
        match mv {
            Some(mv) => {
                self.commit(&mv)?;
                self.advance_turn()?;
                Ok(true)
            }
            None => {
                let status = self.lock_game()?.refresh_status()?;
                self.info(format!("info string session no_move_found {side} status {status}"));
                self.advance_turn()?;
                Ok(false)
            }
        }
    }

    fn end_game(&mut self, status: GameStatus) {
        self.cancel_outstanding();
        self.pause_mark = None;
        self.for_each_worker(|handle| handle.request_resume());
        self.record.set_result(status);
        self.set_phase(SessionPhase::GameEnded(status));
        self.display.game_ended(status, status.winner());
        self.info(format!(
            "info string session game_end {status} result {}",
            self.record.result
        ));
    }
}

impl Drop for GameSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}
