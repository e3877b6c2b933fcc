//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use porta_core::validation::Credentials;

use crate::common::{TaskId, TaskKind};
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::features::form::FormAction;
use crate::features::{home, register, sign_in};
use crate::mutations::StateMutation;
use crate::navigator::{Screen, Trigger};
use crate::overlays::{self, Overlay};
use crate::state::{AppState, TuiState};

/// The main reducer function.
///
/// Takes the current state and an event, mutates state, and returns effects
/// for the runtime to execute.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            app.tui.spinner_frame = app.tui.spinner_frame.wrapping_add(1);
            vec![]
        }
        UiEvent::Terminal(term_event) => handle_terminal_event(app, term_event),
        UiEvent::AuthStateChanged(user) => {
            tracing::debug!(signed_in = user.is_some(), "auth state changed");
            app.tui.home.observer.on_auth_state_changed(user.as_ref());
            vec![]
        }
        UiEvent::TaskCompleted { kind, completed } => {
            if app.tui.tasks.state_mut(kind).finish_if_active(completed.id) {
                update(app, *completed.result)
            } else {
                tracing::debug!(?kind, "ignoring result of inactive task");
                vec![]
            }
        }
        UiEvent::SignInFinished(result) => {
            let mutations = sign_in::handle_result(&mut app.tui.sign_in, result);
            apply_mutations(app, mutations)
        }
        UiEvent::RegisterFinished(result) => {
            let mutations = register::handle_result(&mut app.tui.register, result);
            apply_mutations(app, mutations)
        }
        UiEvent::SignOutFinished(result) => {
            let mutations = home::handle_sign_out_result(result);
            apply_mutations(app, mutations)
        }
    }
}

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(app, key),
        Event::Paste(text) => {
            handle_paste(app, &text);
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return vec![UiEffect::Quit];
    }

    if overlays::handle_overlay_key(&mut app.overlay, key) {
        return vec![];
    }

    // Input is blocked while a submission is in flight.
    if app.tui.is_submitting() {
        return vec![];
    }

    match app.tui.navigator.current() {
        Screen::SignIn => {
            let action = sign_in::handle_key(&mut app.tui.sign_in, key);
            apply_form_action(app, action, TaskKind::SignIn, |task, credentials| {
                UiEffect::SignIn { task, credentials }
            })
        }
        Screen::Register => {
            let action = register::handle_key(&mut app.tui.register, key);
            apply_form_action(app, action, TaskKind::Register, |task, credentials| {
                UiEffect::Register { task, credentials }
            })
        }
        Screen::Home => match home::handle_key(key) {
            home::HomeAction::LogOut => {
                let task = app.tui.start_task(TaskKind::SignOut);
                vec![UiEffect::SignOut { task }]
            }
            home::HomeAction::None => vec![],
        },
    }
}

fn handle_paste(app: &mut AppState, text: &str) {
    if app.overlay.is_some() || app.tui.is_submitting() {
        return;
    }
    match app.tui.navigator.current() {
        Screen::SignIn => sign_in::handle_paste(&mut app.tui.sign_in, text),
        Screen::Register => register::handle_paste(&mut app.tui.register, text),
        Screen::Home => {}
    }
}

fn apply_form_action(
    app: &mut AppState,
    action: FormAction,
    kind: TaskKind,
    submit: impl FnOnce(TaskId, Credentials) -> UiEffect,
) -> Vec<UiEffect> {
    match action {
        FormAction::None => vec![],
        FormAction::Quit => vec![UiEffect::Quit],
        FormAction::Navigate(trigger) => {
            apply_mutations(app, vec![StateMutation::Navigate(trigger)])
        }
        FormAction::Submit(credentials) => {
            let task = app.tui.start_task(kind);
            vec![submit(task, credentials)]
        }
    }
}

fn apply_mutations(app: &mut AppState, mutations: Vec<StateMutation>) -> Vec<UiEffect> {
    let mut effects = Vec::new();
    for mutation in mutations {
        match mutation {
            StateMutation::Navigate(trigger) => {
                effects.extend(navigate(&mut app.tui, trigger));
            }
            StateMutation::ShowNotice(notice) => {
                app.overlay = Some(Overlay::Notice(notice));
            }
            StateMutation::ClearIdentity => app.tui.home.observer.clear(),
        }
    }
    effects
}

/// Applies a navigator transition and mounts or unmounts the session observer
/// when Home is entered or left.
fn navigate(tui: &mut TuiState, trigger: Trigger) -> Vec<UiEffect> {
    let transition = match tui.navigator.apply(trigger) {
        Ok(transition) => transition,
        Err(err) => {
            tracing::warn!(error = %err, "rejected navigation");
            return vec![];
        }
    };

    let mut effects = Vec::new();
    if transition.from == Screen::Home {
        effects.push(UiEffect::UnmountObserver);
    }
    if transition.to == Screen::Home {
        effects.push(UiEffect::MountObserver);
    }
    effects
}

#[cfg(test)]
mod tests {
    use porta_core::error::ServiceError;
    use porta_core::identity::User;

    use super::*;
    use crate::common::TaskCompleted;

    fn key(code: KeyCode) -> UiEvent {
        UiEvent::Terminal(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn type_text(app: &mut AppState, text: &str) {
        for c in text.chars() {
            update(app, key(KeyCode::Char(c)));
        }
    }

    fn user(email: &str) -> User {
        User {
            uid: "uid-1".to_string(),
            email: email.to_string(),
            display_name: None,
        }
    }

    fn completed(kind: TaskKind, id: TaskId, result: UiEvent) -> UiEvent {
        UiEvent::TaskCompleted {
            kind,
            completed: TaskCompleted {
                id,
                result: Box::new(result),
            },
        }
    }

    /// Fills the sign-in form and submits it; returns the task id.
    fn submit_sign_in(app: &mut AppState, email: &str, password: &str) -> TaskId {
        type_text(app, email);
        update(app, key(KeyCode::Tab));
        type_text(app, password);
        let effects = update(app, key(KeyCode::Enter));
        match effects.as_slice() {
            [UiEffect::SignIn { task, credentials }] => {
                assert_eq!(credentials.email, email);
                *task
            }
            other => panic!("expected sign-in effect, got {other:?}"),
        }
    }

    fn sign_in_app() -> AppState {
        let mut app = AppState::new("memory");
        let task = submit_sign_in(&mut app, "a@b.com", "secret1");
        let effects = update(
            &mut app,
            completed(TaskKind::SignIn, task, UiEvent::SignInFinished(Ok(user("a@b.com")))),
        );
        assert_eq!(effects, vec![UiEffect::MountObserver]);
        app
    }

    #[test]
    fn test_malformed_email_never_submits() {
        let mut app = AppState::new("memory");
        type_text(&mut app, "not-an-email");
        update(&mut app, key(KeyCode::Tab));
        type_text(&mut app, "secret1");

        assert!(update(&mut app, key(KeyCode::Enter)).is_empty());
        assert!(!app.tui.is_submitting());
        assert!(!app.tui.sign_in.errors.is_empty());
    }

    #[test]
    fn test_sign_in_success_navigates_home_once() {
        let mut app = AppState::new("memory");
        let task = submit_sign_in(&mut app, "a@b.com", "secret1");
        assert!(app.tui.is_submitting());

        let effects = update(
            &mut app,
            completed(TaskKind::SignIn, task, UiEvent::SignInFinished(Ok(user("a@b.com")))),
        );

        assert_eq!(effects, vec![UiEffect::MountObserver]);
        assert_eq!(app.tui.navigator.current(), Screen::Home);
        assert_eq!(app.tui.navigator.stack(), &[Screen::SignIn, Screen::Home]);
        assert!(!app.tui.is_submitting());
        assert!(app.overlay.is_none());

        // A duplicate delivery of the same result is ignored.
        let effects = update(
            &mut app,
            completed(TaskKind::SignIn, task, UiEvent::SignInFinished(Ok(user("a@b.com")))),
        );
        assert!(effects.is_empty());
        assert_eq!(app.tui.navigator.stack().len(), 2);
    }

    #[test]
    fn test_sign_in_failure_stays_with_one_notice() {
        let mut app = AppState::new("memory");
        let task = submit_sign_in(&mut app, "a@b.com", "wrong12");

        let effects = update(
            &mut app,
            completed(
                TaskKind::SignIn,
                task,
                UiEvent::SignInFinished(Err(ServiceError::rejected("INVALID_PASSWORD"))),
            ),
        );

        assert!(effects.is_empty());
        assert_eq!(app.tui.navigator.current(), Screen::SignIn);
        assert!(!app.tui.is_submitting());
        match &app.overlay {
            Some(Overlay::Notice(notice)) => {
                assert_eq!(notice.message, porta_core::flows::SIGN_IN_FAILED);
            }
            None => panic!("expected a failure notice"),
        }

        // Dismissing the notice leaves a re-submittable form.
        update(&mut app, key(KeyCode::Enter));
        assert!(app.overlay.is_none());
        assert_eq!(app.tui.sign_in.email.value(), "a@b.com");
        assert!(app.tui.sign_in.password.is_empty());
    }

    #[test]
    fn test_keys_blocked_while_submitting() {
        let mut app = AppState::new("memory");
        submit_sign_in(&mut app, "a@b.com", "secret1");

        assert!(update(&mut app, key(KeyCode::Enter)).is_empty());
        update(&mut app, key(KeyCode::Char('x')));
        assert_eq!(app.tui.sign_in.password.value(), "secret1");
    }

    #[test]
    fn test_ctrl_c_quits_even_while_submitting() {
        let mut app = AppState::new("memory");
        submit_sign_in(&mut app, "a@b.com", "secret1");

        let effects = update(
            &mut app,
            UiEvent::Terminal(Event::Key(KeyEvent::new(
                KeyCode::Char('c'),
                KeyModifiers::CONTROL,
            ))),
        );
        assert_eq!(effects, vec![UiEffect::Quit]);
    }

    #[test]
    fn test_escape_on_sign_in_quits() {
        let mut app = AppState::new("memory");
        assert_eq!(update(&mut app, key(KeyCode::Esc)), vec![UiEffect::Quit]);
    }

    #[test]
    fn test_registration_flow() {
        let mut app = AppState::new("memory");
        app.tui.sign_in.focus = crate::features::sign_in::SignInFocus::Register;
        update(&mut app, key(KeyCode::Enter));
        assert_eq!(app.tui.navigator.current(), Screen::Register);

        type_text(&mut app, "new@b.com");
        update(&mut app, key(KeyCode::Tab));
        type_text(&mut app, "secret1");
        update(&mut app, key(KeyCode::Tab));
        type_text(&mut app, "secret1");
        let effects = update(&mut app, key(KeyCode::Enter));
        let [UiEffect::Register { task, .. }] = effects.as_slice() else {
            panic!("expected register effect, got {effects:?}");
        };

        update(
            &mut app,
            completed(
                TaskKind::Register,
                *task,
                UiEvent::RegisterFinished(Ok(user("new@b.com"))),
            ),
        );
        assert_eq!(app.tui.navigator.stack(), &[Screen::SignIn]);
        assert!(matches!(app.overlay, Some(Overlay::Notice(_))));
    }

    #[test]
    fn test_registration_mismatch_sends_nothing() {
        let mut app = AppState::new("memory");
        update(
            &mut app,
            UiEvent::Terminal(Event::Key(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT))),
        );
        update(&mut app, key(KeyCode::Enter));
        assert_eq!(app.tui.navigator.current(), Screen::Register);

        type_text(&mut app, "new@b.com");
        update(&mut app, key(KeyCode::Tab));
        type_text(&mut app, "secret1");
        update(&mut app, key(KeyCode::Tab));
        type_text(&mut app, "secret2");

        assert!(update(&mut app, key(KeyCode::Enter)).is_empty());
        assert!(!app.tui.is_submitting());
    }

    #[test]
    fn test_register_back() {
        let mut app = AppState::new("memory");
        app.tui.navigator.apply(Trigger::OpenRegister).unwrap();
        update(&mut app, key(KeyCode::Esc));
        assert_eq!(app.tui.navigator.current(), Screen::SignIn);
    }

    #[test]
    fn test_observer_events_update_identity() {
        let mut app = sign_in_app();

        update(&mut app, UiEvent::AuthStateChanged(Some(user("x@y.com"))));
        assert_eq!(
            app.tui.home.observer.identity().map(|i| i.email.as_str()),
            Some("x@y.com")
        );

        update(&mut app, UiEvent::AuthStateChanged(None));
        assert!(app.tui.home.observer.identity().is_none());
    }

    #[test]
    fn test_log_out_success() {
        let mut app = sign_in_app();
        update(&mut app, UiEvent::AuthStateChanged(Some(user("a@b.com"))));

        let effects = update(&mut app, key(KeyCode::Enter));
        let [UiEffect::SignOut { task }] = effects.as_slice() else {
            panic!("expected sign-out effect, got {effects:?}");
        };

        let effects = update(
            &mut app,
            completed(TaskKind::SignOut, *task, UiEvent::SignOutFinished(Ok(()))),
        );
        assert_eq!(effects, vec![UiEffect::UnmountObserver]);
        assert_eq!(app.tui.navigator.current(), Screen::SignIn);
        assert!(app.tui.home.observer.identity().is_none());
        let Some(Overlay::Notice(notice)) = &app.overlay else {
            panic!("expected sign-out notice");
        };
        assert_eq!(notice.message, "You have signed out.");
    }

    #[test]
    fn test_log_out_failure_stays_home() {
        let mut app = sign_in_app();
        update(&mut app, UiEvent::AuthStateChanged(Some(user("a@b.com"))));

        let effects = update(&mut app, key(KeyCode::Char('l')));
        let [UiEffect::SignOut { task }] = effects.as_slice() else {
            panic!("expected sign-out effect, got {effects:?}");
        };
        update(
            &mut app,
            completed(
                TaskKind::SignOut,
                *task,
                UiEvent::SignOutFinished(Err(ServiceError::Storage(anyhow::anyhow!("denied")))),
            ),
        );

        assert_eq!(app.tui.navigator.current(), Screen::Home);
        assert!(app.tui.home.observer.identity().is_some());
        assert!(matches!(app.overlay, Some(Overlay::Notice(_))));
        assert!(!app.tui.is_submitting());
    }

    #[test]
    fn test_paste_goes_to_focused_field() {
        let mut app = AppState::new("memory");
        update(&mut app, UiEvent::Terminal(Event::Paste("a@b.com".to_string())));
        assert_eq!(app.tui.sign_in.email.value(), "a@b.com");
    }
}
