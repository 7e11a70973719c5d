mod assignments;
mod permissions;
mod roles;
mod session;
mod watch;

use serde::Serialize;
use tracing::debug;

use mes_client::{ClientResult, CrudList, MesClient, SessionContext};

use crate::cli::{Cli, Command};
use crate::config::ConsoleConfig;
use crate::error::{ConsoleError, ConsoleResult};
use crate::output::{Output, Row};

/// Builds the client for the resolved configuration and runs one command.
pub async fn run(cli: Cli, config: ConsoleConfig) -> ConsoleResult<()> {
    let output = Output::new(cli.json);
    let session = SessionContext::persisted(config.session_file.clone());
    let client = MesClient::new(&config.api_url, session, config.timeout)?;
    debug!(api_url = %config.api_url, session_file = %config.session_file.display(), "console client ready");

    match cli.command {
        Command::Login(args) => session::login(&client, output, &args).await,
        Command::Health => session::health(&client, output).await,
        command => {
            if !client.session().hydrate().await? {
                return Err(ConsoleError::NotSignedIn);
            }
            dispatch(&client, output, command).await
        }
    }
}

async fn dispatch(client: &MesClient, output: Output, command: Command) -> ConsoleResult<()> {
    match command {
        Command::Logout => session::logout(client, output).await,
        Command::Whoami => session::whoami(client, output).await,
        Command::Roles { command } => roles::run(client, output, command).await,
        Command::Permissions { command } => permissions::run(client, output, command).await,
        Command::Assignments { command } => assignments::run(client, output, command).await,
        Command::Audit(args) => assignments::audit(client, output, &args).await,
        Command::Watch(args) => watch::run(client, output, &args).await,
        Command::Login(_) | Command::Health => Ok(()),
    }
}

/// Reports a mutation's notices, then prints the record it returned.
fn finish<T: Row + Serialize + Clone>(
    output: Output,
    list: &mut CrudList<T>,
    result: ClientResult<T>,
) -> ConsoleResult<()> {
    output.notices(&list.take_notices())?;
    match result {
        Ok(record) => output.record(&record),
        Err(error) => Err(error.into()),
    }
}

/// Runs a confirmed delete through the list's pending-delete slot.
async fn confirm_delete<T, F, Fut>(
    output: Output,
    list: &mut CrudList<T>,
    record: T,
    label: String,
    confirmed: bool,
    delete: F,
) -> ConsoleResult<()>
where
    T: Clone,
    F: FnOnce(T) -> Fut,
    Fut: Future<Output = ClientResult<()>>,
{
    list.request_delete(record);
    if !confirmed {
        list.cancel_delete();
        return Err(ConsoleError::Unconfirmed(label));
    }

    if let Some(record) = list.take_pending_delete() {
        let _ = list
            .submit(delete(record), &format!("Deleted {label}"))
            .await;
    }
    output.notices(&list.take_notices())
}
