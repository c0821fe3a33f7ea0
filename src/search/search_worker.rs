//! Background search worker.
//!
//! One worker thread per AI-controlled side. The worker waits for a job from
//! its `SearchControl`, locks the shared game only long enough to take a
//! private snapshot, searches that snapshot, and reports the chosen move over
//! a channel. It never commits anything: the session applies the result on
//! the main thread after checking the job's generation is still current.
//!
//! A job whose snapshot shows the other side on move is answered with
//! `WorkerEvent::Skipped`, so the session can reissue it. Every result carries
//! the key of the position it was computed for.
//!
//! Engine errors and panics are reported as `WorkerEvent::Fault` and end the
//! thread; the session constructs a fresh worker if that side searches again.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::engines::engine_trait::{Engine, EngineError, GoParams, SearchContext};
use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::Color;
use crate::game_state::game_state::{GameState, PositionKey};
use crate::moves::move_descriptions::Move;
use crate::search::threading::SearchControl;

/// The committed game, shared between the session and its search workers.
pub type SharedGame = Arc<Mutex<GameState>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    pub max_depth: u8,
    /// Pause inserted between root moves; throttles search speed only.
    pub step_delay: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 2,
            step_delay: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerEvent {
    BestMove {
        side: Color,
        generation: u64,
        /// `None` when the searched position had no legal move.
        mv: Option<Move>,
        position: PositionKey,
        info_lines: Vec<String>,
    },
    /// The job was picked up while the other side was on move.
    Skipped {
        side: Color,
        generation: u64,
    },
    Info {
        side: Color,
        line: String,
    },
    Fault {
        side: Color,
        generation: Option<u64>,
        message: String,
    },
}

/// Owning handle for one worker thread. Dropping it stops and joins the thread.
#[derive(Debug)]
pub struct SearchHandle {
    side: Color,
    control: Arc<SearchControl>,
    thread: Option<JoinHandle<()>>,
}

impl SearchHandle {
    pub fn spawn(
        side: Color,
        game: SharedGame,
        engine: Box<dyn Engine>,
        config: SearchConfig,
        events: Sender<WorkerEvent>,
    ) -> ChessResult<Self> {
        let control = SearchControl::new();
        control.set_delay(config.step_delay);

        let worker_control = Arc::clone(&control);
        let thread = thread::Builder::new()
            .name(format!("search-{}", side.to_string().to_lowercase()))
            .spawn(move || worker_loop(side, game, engine, config, worker_control, events))
            .map_err(|e| ChessError::WorkerFault {
                side,
                message: format!("failed to spawn search worker: {e}"),
            })?;

        Ok(Self {
            side,
            control,
            thread: Some(thread),
        })
    }

    #[inline]
    pub fn side(&self) -> Color {
        self.side
    }

    #[inline]
    pub fn control(&self) -> &Arc<SearchControl> {
        &self.control
    }

    pub fn start_search(&self) -> u64 {
        self.control.start_search()
    }

    pub fn cancel_search(&self) {
        self.control.cancel_search();
    }

    pub fn block(&self, blocked: bool) {
        self.control.block(blocked);
    }

    pub fn request_pause(&self) {
        self.control.request_pause();
    }

    pub fn request_resume(&self) {
        self.control.request_resume();
    }

    pub fn request_stop(&self) {
        self.control.request_stop();
    }

    pub fn set_delay(&self, delay: Duration) {
        self.control.set_delay(delay);
    }

    /// True once the worker is stopped or faulted, even if the thread has
    /// not finished unwinding yet.
    pub fn is_terminated(&self) -> bool {
        self.control.is_stopped() || self.thread.as_ref().map_or(true, JoinHandle::is_finished)
    }
}

impl Drop for SearchHandle {
    fn drop(&mut self) {
        self.control.request_stop();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

fn worker_loop(
    side: Color,
    game: SharedGame,
    mut engine: Box<dyn Engine>,
    config: SearchConfig,
    control: Arc<SearchControl>,
    events: Sender<WorkerEvent>,
) {
    let info = |line: String| events.send(WorkerEvent::Info { side, line }).is_ok();
    // Marks the worker stopped before reporting, so a replacement can be
    // spawned as soon as the fault is seen.
    let fault = |generation: u64, message: String| {
        control.request_stop();
        let _ = events.send(WorkerEvent::Fault {
            side,
            generation: Some(generation),
            message,
        });
    };
    if !info(format!(
        "info string search_worker {side} started engine {}",
        engine.name()
    )) {
        return;
    }

    while let Some(generation) = control.wait_for_job() {
        // A pause that lands between pickup and snapshot holds the job here,
        // so browsed positions are never searched.
        if control.checkpoint(generation).is_err() {
            continue;
        }
        let snapshot = match game.lock() {
            Ok(guard) => guard.snapshot_for_search(),
            Err(_) => {
                fault(generation, "shared game lock poisoned".to_owned());
                return;
            }
        };
        if snapshot.side_to_move != side {
            info(format!(
                "info string search_worker {side} skipped generation {generation} not_our_turn"
            ));
            if events.send(WorkerEvent::Skipped { side, generation }).is_err() {
                return;
            }
            continue;
        }
        let position = snapshot.position_key();

        let params = GoParams {
            depth: Some(config.max_depth),
        };
        let context = SearchContext::controlled(&control, generation);
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            engine.choose_move(&snapshot, &params, &context)
        }));

        let sent = match outcome {
            Ok(Ok(output)) => events
                .send(WorkerEvent::BestMove {
                    side,
                    generation,
                    mv: output.best_move,
                    position,
                    info_lines: output.info_lines,
                })
                .is_ok(),
            Ok(Err(EngineError::Interrupted)) => info(format!(
                "info string search_worker {side} interrupted generation {generation}"
            )),
            Ok(Err(error)) => {
                fault(generation, error.to_string());
                return;
            }
            Err(payload) => {
                fault(generation, panic_message(payload.as_ref()));
                return;
            }
        };
        if !sent {
            return;
        }
    }

    info(format!("info string search_worker {side} stopped"));
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        format!("search panicked: {text}")
    } else if let Some(text) = payload.downcast_ref::<String>() {
        format!("search panicked: {text}")
    } else {
        "search panicked".to_owned()
    }
}
