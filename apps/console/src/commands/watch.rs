use std::time::Duration;

use chrono::Utc;
use mes_client::{
    AuditLogFilter, CrudList, MesClient, PermissionView, RoleAssignmentView, RoleView, spawn_poller,
};
use tracing::{info, warn};

use crate::cli::{WatchArgs, WatchTarget};
use crate::error::{ConsoleError, ConsoleResult};
use crate::output::Output;

/// Re-renders the target list every interval until Ctrl-C or `--for` elapses.
pub async fn run(client: &MesClient, output: Output, args: &WatchArgs) -> ConsoleResult<()> {
    let target = args.target;
    let client = client.clone();
    info!(watch_target = ?target, interval_secs = args.interval, "watch started");

    let handle = spawn_poller(Duration::from_secs(args.interval), move || {
        let client = client.clone();
        async move {
            // The next tick retries.
            if let Err(error) = render(&client, output, target).await {
                warn!(error = %error, "refresh failed");
            }
        }
    });

    let stopped = match args.run_for {
        Some(seconds) => {
            tokio::select! {
                () = tokio::time::sleep(Duration::from_secs(seconds)) => Ok(()),
                signal = tokio::signal::ctrl_c() => signal,
            }
        }
        None => tokio::signal::ctrl_c().await,
    };

    handle.cancel().await;
    info!("watch stopped");
    stopped.map_err(|error| ConsoleError::Output(error.to_string()))
}

async fn render(client: &MesClient, output: Output, target: WatchTarget) -> ConsoleResult<()> {
    if !output.is_json() {
        output.line(&format!("-- {} --", Utc::now().format("%Y-%m-%d %H:%M:%S UTC")))?;
    }

    match target {
        WatchTarget::Roles => {
            let mut list: CrudList<RoleView> = CrudList::new();
            list.reload(client.get_roles()).await;
            output.notices(&list.take_notices())?;
            output.rows(list.items())
        }
        WatchTarget::Permissions => {
            let mut list: CrudList<PermissionView> = CrudList::new();
            list.reload(client.get_permissions()).await;
            output.notices(&list.take_notices())?;
            output.rows(list.items())
        }
        WatchTarget::Assignments => {
            let mut list: CrudList<RoleAssignmentView> = CrudList::new();
            list.reload(client.list_role_assignments()).await;
            output.notices(&list.take_notices())?;
            output.rows(list.items())
        }
        WatchTarget::Audit => {
            let filter = AuditLogFilter {
                limit: Some(20),
                ..AuditLogFilter::default()
            };
            output.rows(&client.get_audit_log(&filter).await?)
        }
    }
}
