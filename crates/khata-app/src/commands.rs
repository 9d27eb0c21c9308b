//! Command handlers for the CLI

use std::sync::Arc;

use anyhow::{bail, Result};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use khata_app::accounts::{self, AddAccountForm, BankAccounts, BANKS};
use khata_app::auth::{
    AttemptCounter, ConfirmStep, Keystroke, MountOutcome, PinError, PinLockFlow, PinSetupFlow,
    SetupOutcome, SetupState, VerifyStep,
};
use khata_app::profile::Profile;
use khata_app::{AppConfig, Notice, NoticeEffect, Route, Router};
use khata_core::{AuthToken, FileStore, KeyValueStore, PinSetFlag, PIN_LENGTH};

/// Stores and settings shared by every command
pub struct Context {
    pub config: AppConfig,
    pub secure: Arc<FileStore>,
    pub local: Arc<FileStore>,
}

impl Context {
    fn secure(&self) -> Arc<dyn KeyValueStore> {
        self.secure.clone()
    }

    fn local(&self) -> Arc<dyn KeyValueStore> {
        self.local.clone()
    }
}

type Input = Lines<BufReader<Stdin>>;

fn input() -> Input {
    BufReader::new(tokio::io::stdin()).lines()
}

async fn prompt(lines: &mut Input, text: &str) -> Result<Option<String>> {
    eprint!("{}: ", text);
    Ok(lines.next_line().await?.map(|l| l.trim().to_string()))
}

fn show(notice: &Notice) {
    eprintln!("{} {}: {}", notice.icon(), notice.title, notice.message);
}

/// Show a question and return the effect of the chosen action
async fn ask(lines: &mut Input, notice: &Notice) -> Result<NoticeEffect> {
    show(notice);
    let labels: Vec<&str> = notice.actions.iter().map(|a| a.label.as_str()).collect();
    let answer = prompt(lines, &labels.join("/")).await?.unwrap_or_default();

    Ok(notice
        .actions
        .iter()
        .find(|a| a.label.eq_ignore_ascii_case(&answer))
        .map(|a| a.effect.clone())
        .unwrap_or(NoticeEffect::Dismiss))
}

/// A line must hold exactly one PIN before any of it reaches a flow
fn check_pin_line(line: &str) -> Result<(), PinError> {
    if line.chars().count() != PIN_LENGTH {
        return Err(PinError::Incomplete);
    }
    if !line.chars().all(|c| c.is_ascii_digit()) {
        return Err(PinError::InvalidKeystroke);
    }
    Ok(())
}

fn announce(router: &Router) {
    eprintln!("→ {}", router.current().title());
}

pub async fn pin_setup(ctx: &Context) -> Result<()> {
    let mut router = Router::new(Route::Profile);
    router.push(Route::PinSetup);
    let mut flow = PinSetupFlow::new(ctx.secure());
    let mut lines = input();

    loop {
        let label = match flow.state() {
            SetupState::Entering => "Enter 4 digit PIN (empty to cancel)",
            SetupState::Confirming => "Confirm your PIN (empty to cancel)",
            SetupState::Saved => return Ok(()),
        };
        let line = match prompt(&mut lines, label).await? {
            Some(line) if !line.is_empty() => line,
            _ => {
                router.apply(flow.cancel());
                announce(&router);
                return Ok(());
            }
        };
        if let Err(e) = check_pin_line(&line) {
            eprintln!("{}", e);
            continue;
        }

        let before = flow.state();
        let mut buf = [0u8; 4];
        let rejected = line
            .chars()
            .enumerate()
            .any(|(i, c)| flow.keystroke(i, c.encode_utf8(&mut buf)) == Keystroke::Rejected);
        if rejected {
            eprintln!("{}", PinError::InvalidKeystroke);
            continue;
        }
        if before == SetupState::Entering && flow.state() == SetupState::Confirming {
            continue;
        }

        match flow.confirm() {
            ConfirmStep::Advanced | ConfirmStep::Busy => {}
            ConfirmStep::Incomplete(notice)
            | ConfirmStep::Mismatch(notice)
            | ConfirmStep::Failed(notice) => show(&notice),
            ConfirmStep::Saving(pending) => match flow.finish(pending).await {
                SetupOutcome::Saved(notice) => {
                    show(&notice);
                    if let Some(NoticeEffect::Navigate(nav)) = notice.effect_of("OK") {
                        router.apply(*nav);
                    }
                    announce(&router);
                    return Ok(());
                }
                SetupOutcome::Failed(notice) => show(&notice),
            },
        }
    }
}

pub async fn pin_unlock(ctx: &Context) -> Result<()> {
    let mut router = Router::new(Route::PinLock);
    let attempts = AttemptCounter::new(ctx.config.pin_attempts);

    let mut flow = match PinLockFlow::mount(ctx.secure(), attempts).await {
        MountOutcome::Redirect(nav) => {
            router.apply(nav);
            announce(&router);
            return Ok(());
        }
        MountOutcome::Prompt(flow) => flow,
    };

    let mut lines = input();
    loop {
        eprintln!("{}", flow.attempts_caption());
        let Some(line) = prompt(&mut lines, "Enter your PIN").await? else {
            return Ok(());
        };
        if let Err(e) = check_pin_line(&line) {
            eprintln!("{}", e);
            continue;
        }

        let mut step = VerifyStep::Pending;
        let mut buf = [0u8; 4];
        for (i, c) in line.chars().enumerate() {
            step = flow.keystroke(i, c.encode_utf8(&mut buf)).await;
            if step != VerifyStep::Pending {
                break;
            }
        }
        if step == VerifyStep::Pending {
            step = flow.unlock().await;
        }

        match step {
            VerifyStep::Unlocked(nav) => {
                router.apply(nav);
                announce(&router);
                return Ok(());
            }
            VerifyStep::Retry { notice, .. } | VerifyStep::Failed(notice) => show(&notice),
            VerifyStep::Locked(notice) => {
                show(&notice);
                if let Some(nav) = flow.end_session().await {
                    router.apply(nav);
                }
                announce(&router);
                bail!("PIN attempts exhausted");
            }
            VerifyStep::Rejected => eprintln!("{}", PinError::InvalidKeystroke),
            VerifyStep::Pending | VerifyStep::Ignored => {}
        }
    }
}

pub async fn pin_status(ctx: &Context) -> Result<()> {
    let flag = PinSetFlag::load(ctx.secure.as_ref()).await?;
    println!("PIN lock: {}", if flag.is_set() { "enabled" } else { "disabled" });
    Ok(())
}

pub async fn accounts_list(ctx: &Context) -> Result<()> {
    let service = BankAccounts::new(ctx.local());
    let linked = service.linked().await?;

    for (i, account) in service.list().await?.iter().enumerate() {
        let marker = if linked.as_ref() == Some(account) { " (linked)" } else { "" };
        println!(
            "[{}] {} {} {}{}",
            i,
            account.bank_name,
            account.account_holder,
            account.masked_number(),
            marker
        );
    }
    Ok(())
}

pub fn accounts_banks() {
    for bank in BANKS {
        println!("{}", bank);
    }
}

pub async fn accounts_add(ctx: &Context, bank: String, holder: String, number: String) -> Result<()> {
    let form = AddAccountForm {
        selected_bank: bank,
        account_holder: holder,
        account_number: number,
    };

    match BankAccounts::new(ctx.local()).add(&form).await {
        Ok(_) => {
            show(&accounts::added_notice());
            Ok(())
        }
        Err(e) => {
            show(&accounts::error_notice(&e));
            Err(e.into())
        }
    }
}

pub async fn accounts_remove(ctx: &Context, index: usize, yes: bool) -> Result<()> {
    let service = BankAccounts::new(ctx.local());
    let effect = if yes {
        NoticeEffect::RemoveAccount(index)
    } else {
        ask(&mut input(), &service.removal_prompt(index)).await?
    };

    if let NoticeEffect::RemoveAccount(i) = effect {
        let remaining = service.remove(i).await?;
        eprintln!("{} account(s) left", remaining.len());
    }
    Ok(())
}

pub async fn accounts_link(ctx: &Context, index: usize, yes: bool) -> Result<()> {
    let service = BankAccounts::new(ctx.local());
    let effect = if yes {
        NoticeEffect::LinkAccount(index)
    } else {
        ask(&mut input(), &service.link_prompt(index)).await?
    };

    if let NoticeEffect::LinkAccount(i) = effect {
        service.link(i).await?;
        show(&accounts::linked_notice());
    }
    Ok(())
}

pub async fn profile(ctx: &Context) -> Result<()> {
    let view = Profile::new(ctx.local()).load().await?;

    println!("Name:  {}", view.name);
    println!("ID:    {}", view.user_id);
    println!("Email: {}", view.email);
    if let Some(linked) = &view.linked {
        println!("Linked account: {} {}", linked.account_holder, linked.masked_number());
    }
    for account in &view.accounts {
        println!("  {} {}", account.account_holder, account.masked_number());
    }
    Ok(())
}

pub async fn session_status(ctx: &Context) -> Result<()> {
    let signed_in = AuthToken::is_present(ctx.secure.as_ref()).await?;
    let email = ctx.secure.get(khata_core::keys::USER_EMAIL).await?;

    match (signed_in, email) {
        (true, Some(email)) => println!("Signed in as {}", email),
        (true, None) => println!("Signed in"),
        (false, _) => println!("Signed out"),
    }
    Ok(())
}

pub async fn session_logout(ctx: &Context) -> Result<()> {
    AuthToken::revoke(ctx.secure.as_ref()).await?;
    let mut router = Router::new(Route::Home);
    router.apply(khata_app::Navigation::Replace(Route::Login));
    announce(&router);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_line_must_be_four_digits() {
        assert!(check_pin_line("4821").is_ok());
        assert!(matches!(check_pin_line("48211"), Err(PinError::Incomplete)));
        assert!(matches!(check_pin_line("482"), Err(PinError::Incomplete)));
        assert!(matches!(check_pin_line("48a1"), Err(PinError::InvalidKeystroke)));
    }

    #[test]
    fn test_long_line_never_reaches_setup_flow() {
        let store = Arc::new(khata_core::MemoryStore::new());
        let flow = PinSetupFlow::new(store);

        assert!(check_pin_line("12345").is_err());
        assert_eq!(flow.state(), SetupState::Entering);
        assert_eq!(flow.active().digits().filled(), 0);
    }
}
