//! Screen navigator.
//!
//! A finite state machine over the three screens. Each transition names a
//! target screen; the back-stack follows native-stack `navigate` semantics:
//! a target already on the stack is popped back to, anything else is pushed.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    SignIn,
    Register,
    Home,
}

impl Screen {
    pub fn title(self) -> &'static str {
        match self {
            Screen::SignIn => "Sign in",
            Screen::Register => "Create account",
            Screen::Home => "Home",
        }
    }
}

/// What caused a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    SignedIn,
    OpenRegister,
    Registered,
    Back,
    SignedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot apply {trigger:?} on the {from:?} screen")]
pub struct InvalidTransition {
    pub from: Screen,
    pub trigger: Trigger,
}

/// Result of an accepted transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Screen,
    pub to: Screen,
}

#[derive(Debug, Clone)]
pub struct Navigator {
    stack: Vec<Screen>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self {
            stack: vec![Screen::SignIn],
        }
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Screen {
        self.stack.last().copied().unwrap_or(Screen::SignIn)
    }

    /// Screens from the root to the current one.
    pub fn stack(&self) -> &[Screen] {
        &self.stack
    }

    /// Target screen for `trigger` from `from`, if the pair is allowed.
    pub fn target(from: Screen, trigger: Trigger) -> Option<Screen> {
        match (from, trigger) {
            (Screen::SignIn, Trigger::SignedIn) => Some(Screen::Home),
            (Screen::SignIn, Trigger::OpenRegister) => Some(Screen::Register),
            (Screen::Register, Trigger::Registered | Trigger::Back) => Some(Screen::SignIn),
            (Screen::Home, Trigger::SignedOut) => Some(Screen::SignIn),
            _ => None,
        }
    }

    /// Applies `trigger`. Rejected pairs leave the navigator unchanged.
    pub fn apply(&mut self, trigger: Trigger) -> Result<Transition, InvalidTransition> {
        let from = self.current();
        let to = Self::target(from, trigger).ok_or(InvalidTransition { from, trigger })?;
        self.navigate(to);
        tracing::debug!(?from, ?to, ?trigger, "navigated");
        Ok(Transition { from, to })
    }

    fn navigate(&mut self, to: Screen) {
        if let Some(pos) = self.stack.iter().position(|&s| s == to) {
            self.stack.truncate(pos + 1);
        } else {
            self.stack.push(to);
        }
    }
}
