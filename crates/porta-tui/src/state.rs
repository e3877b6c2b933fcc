//! Application state composition.
//!
//! ```text
//! AppState
//! ├── tui: TuiState
//! │   ├── navigator: Navigator      (active screen + back-stack)
//! │   ├── sign_in: SignInState      (sign-in form)
//! │   ├── register: RegisterState   (registration form)
//! │   ├── home: HomeState           (session observer)
//! │   ├── task_seq: TaskSeq         (async task id generator)
//! │   └── tasks: Tasks              (in-flight submissions)
//! └── overlay: Option<Overlay>      (modal notices)
//! ```
//!
//! State is split between `TuiState` and `Option<Overlay>` so overlay
//! handlers can hold `&mut` to the overlay while the reducer touches the rest.

use crate::common::{TaskId, TaskKind, TaskSeq, Tasks};
use crate::features::home::HomeState;
use crate::features::register::RegisterState;
use crate::features::sign_in::SignInState;
use crate::navigator::Navigator;
use crate::overlays::Overlay;

pub struct AppState {
    pub tui: TuiState,
    pub overlay: Option<Overlay>,
}

impl AppState {
    pub fn new(backend: &'static str) -> Self {
        Self {
            tui: TuiState::new(backend),
            overlay: None,
        }
    }
}

pub struct TuiState {
    /// Flag indicating the app should quit.
    pub should_quit: bool,
    pub navigator: Navigator,
    pub sign_in: SignInState,
    pub register: RegisterState,
    pub home: HomeState,
    pub task_seq: TaskSeq,
    pub tasks: Tasks,
    /// Spinner animation frame counter.
    pub spinner_frame: usize,
    /// Identity backend name, shown in the status line.
    pub backend: &'static str,
}

impl TuiState {
    pub fn new(backend: &'static str) -> Self {
        Self {
            should_quit: false,
            navigator: Navigator::new(),
            sign_in: SignInState::new(),
            register: RegisterState::new(),
            home: HomeState::new(),
            task_seq: TaskSeq::default(),
            tasks: Tasks::default(),
            spinner_frame: 0,
            backend,
        }
    }

    /// True while any submission is in flight. Drives the blocking indicator.
    pub fn is_submitting(&self) -> bool {
        self.tasks.is_any_running()
    }

    /// Allocates a task id and marks `kind` as running.
    pub fn start_task(&mut self, kind: TaskKind) -> TaskId {
        let id = self.task_seq.next_id();
        self.tasks.state_mut(kind).start(id);
        id
    }
}
