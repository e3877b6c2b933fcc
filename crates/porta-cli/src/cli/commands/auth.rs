//! Non-interactive account commands.
//!
//! Passwords are read from stdin, one per line, so they never show up in the
//! process list or shell history. Failures print the same generic messages
//! the interactive app shows; the provider's detail goes to the log file.

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{Context, Result};
use porta_core::config::Config;
use porta_core::error::FlowError;
use porta_core::flows;
use porta_core::identity;
use porta_core::session::SessionObserver;
use porta_core::validation::{RegisterForm, SignInForm};

pub async fn sign_in(config: &Config, email: String) -> Result<()> {
    let service = identity::connect(config)?;
    let mut input = SecretInput::stdin();
    let password = input.next("Password")?;

    let form = SignInForm { email, password };
    let user = match flows::sign_in(service.as_ref(), &form).await {
        Ok(user) => user,
        Err(FlowError::Validation(errors)) => anyhow::bail!("{errors}"),
        Err(FlowError::Service(_)) => anyhow::bail!(flows::SIGN_IN_FAILED),
    };

    println!("Signed in as {}", user.email);
    Ok(())
}

pub async fn register(config: &Config, email: String, display_name: Option<&str>) -> Result<()> {
    let service = identity::connect(config)?;
    let mut input = SecretInput::stdin();
    let password = input.next("Password")?;
    let password_confirm = input.next("Confirm password")?;

    let form = RegisterForm {
        email,
        password,
        password_confirm,
    };
    let user = match flows::register(service.as_ref(), &form, display_name).await {
        Ok(user) => user,
        Err(FlowError::Validation(errors)) => anyhow::bail!("{errors}"),
        Err(FlowError::Service(_)) => anyhow::bail!(flows::REGISTRATION_FAILED),
    };

    println!("{}", flows::REGISTRATION_SUCCEEDED);
    println!("Signed in as {}", describe(&user.email, user.display_name.as_deref()));
    Ok(())
}

pub async fn sign_out(config: &Config) -> Result<()> {
    let service = identity::connect(config)?;

    let mut observer = SessionObserver::new();
    observer.mount(service.as_ref());
    observer.poll();

    let Some(identity) = observer.identity().cloned() else {
        observer.unmount();
        println!("Not signed in.");
        return Ok(());
    };

    let result = observer.log_out(service.as_ref()).await;
    observer.unmount();
    result.context(flows::SIGN_OUT_FAILED)?;

    println!("Signed out {}", identity.email);
    Ok(())
}

pub fn whoami(config: &Config) -> Result<()> {
    let service = identity::connect(config)?;
    match service.current_user() {
        Some(user) => println!("{}", describe(&user.email, user.display_name.as_deref())),
        None => println!("Not signed in."),
    }
    Ok(())
}

fn describe(email: &str, display_name: Option<&str>) -> String {
    match display_name.filter(|name| !name.is_empty()) {
        Some(name) => format!("{email} ({name})"),
        None => email.to_string(),
    }
}

/// Line-oriented secret reader. Prompts on stderr only when stdin is a terminal.
struct SecretInput<R> {
    reader: R,
    interactive: bool,
}

impl SecretInput<io::StdinLock<'static>> {
    fn stdin() -> Self {
        let stdin = io::stdin();
        let interactive = stdin.is_terminal();
        Self {
            reader: stdin.lock(),
            interactive,
        }
    }
}

impl<R: BufRead> SecretInput<R> {
    /// Reads the next line without its line ending. End of input is an error.
    fn next(&mut self, label: &str) -> Result<String> {
        if self.interactive {
            eprint!("{label}: ");
            io::stderr().flush()?;
        }

        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .with_context(|| format!("read {} from stdin", label.to_lowercase()))?;
        if read == 0 {
            anyhow::bail!("No {} provided on stdin", label.to_lowercase());
        }

        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn input(text: &str) -> SecretInput<Cursor<Vec<u8>>> {
        SecretInput {
            reader: Cursor::new(text.as_bytes().to_vec()),
            interactive: false,
        }
    }

    #[test]
    fn test_secret_input_reads_lines_in_order() {
        let mut input = input("secret1\r\nsecret2\n");
        assert_eq!(input.next("Password").unwrap(), "secret1");
        assert_eq!(input.next("Confirm password").unwrap(), "secret2");
    }

    #[test]
    fn test_secret_input_keeps_inner_spaces() {
        let mut input = input(" pass word ");
        assert_eq!(input.next("Password").unwrap(), " pass word ");
    }

    #[test]
    fn test_secret_input_fails_at_end_of_input() {
        let mut input = input("only-one\n");
        input.next("Password").unwrap();
        let err = input.next("Confirm password").unwrap_err();
        assert!(err.to_string().contains("No confirm password provided"));
    }

    #[test]
    fn test_describe_includes_display_name() {
        assert_eq!(describe("a@b.com", Some("Ana")), "a@b.com (Ana)");
        assert_eq!(describe("a@b.com", Some("")), "a@b.com");
        assert_eq!(describe("a@b.com", None), "a@b.com");
    }
}
