use mes_client::{AuditLogFilter, CrudList, MesClient, RoleAssignmentView};

use crate::cli::{AssignmentCommand, AuditArgs};
use crate::error::ConsoleResult;
use crate::output::Output;

pub async fn run(
    client: &MesClient,
    output: Output,
    command: AssignmentCommand,
) -> ConsoleResult<()> {
    let mut list: CrudList<RoleAssignmentView> = CrudList::new();

    match command {
        AssignmentCommand::List => {}
        AssignmentCommand::Assign { subject, role_id } => {
            let _ = list
                .submit(
                    client.assign_role_to_subject(subject.trim(), role_id),
                    &format!("Role assigned to {}", subject.trim()),
                )
                .await;
            output.notices(&list.take_notices())?;
        }
        AssignmentCommand::Remove { subject, role_id } => {
            let _ = list
                .submit(
                    client.remove_role_from_subject(subject.trim(), role_id),
                    &format!("Role removed from {}", subject.trim()),
                )
                .await;
            output.notices(&list.take_notices())?;
        }
    }

    list.reload(client.list_role_assignments()).await;
    output.notices(&list.take_notices())?;
    output.rows(list.items())
}

pub async fn audit(client: &MesClient, output: Output, args: &AuditArgs) -> ConsoleResult<()> {
    let filter = AuditLogFilter {
        limit: args.limit,
        offset: args.offset,
        action: args.action.clone(),
        subject: args.subject.clone(),
    };
    output.rows(&client.get_audit_log(&filter).await?)
}
