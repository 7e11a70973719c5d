use mes_client::{
    ClientError, CrudList, MesClient, PageQuery, PermissionDialog, RoleFilter, RoleForm,
    RoleUpdate, RoleView, require_fields,
};
use mes_domain::{PermissionId, RoleId};

use super::{confirm_delete, finish};
use crate::cli::RoleCommand;
use crate::error::ConsoleResult;
use crate::output::{Output, format_checklist};

pub async fn run(client: &MesClient, output: Output, command: RoleCommand) -> ConsoleResult<()> {
    let mut list: CrudList<RoleView> = CrudList::new();

    match command {
        RoleCommand::List {
            status,
            search,
            page,
        } => {
            let filter = RoleFilter { status, search };
            match page.page {
                Some(index) => {
                    let query = PageQuery {
                        page: index,
                        size: page.size,
                    };
                    list.reload_page(client.get_roles_page(query, &filter)).await;
                    output.notices(&list.take_notices())?;
                    output.page(list.items(), list.total_elements(), index)
                }
                None => {
                    list.reload(client.find_roles(&filter)).await;
                    output.notices(&list.take_notices())?;
                    output.rows(list.items())
                }
            }
        }
        RoleCommand::Get { role_id } => output.record(&client.get_role(role_id).await?),
        RoleCommand::Create {
            code,
            name,
            description,
        } => {
            require_fields(&[("Role code", code.as_str()), ("Role name", name.as_str())])?;
            list.open_create();
            let form = RoleForm {
                role_code: code,
                role_name: name,
                description,
            };
            let created = list.submit(client.create_role(&form), "Role created").await;
            finish(output, &mut list, created)
        }
        RoleCommand::Update {
            role_id,
            name,
            description,
        } => {
            require_fields(&[("Role name", name.as_str())])?;
            list.open_edit(client.get_role(role_id).await?);
            let update = RoleUpdate {
                role_name: name,
                description,
            };
            let updated = list
                .submit(client.update_role(role_id, &update), "Role updated")
                .await;
            finish(output, &mut list, updated)
        }
        RoleCommand::Delete { role_id, yes } => {
            let role = client.get_role(role_id).await?;
            let label = format!("role {}", role.role_code);
            confirm_delete(output, &mut list, role, label, yes, |role| async move {
                client.delete_role(role.role_id).await
            })
            .await
        }
        RoleCommand::Activate { role_id } => {
            let result = list
                .submit(client.activate_role(role_id), "Role activated")
                .await;
            finish(output, &mut list, result)
        }
        RoleCommand::Deactivate { role_id } => {
            let result = list
                .submit(client.deactivate_role(role_id), "Role deactivated")
                .await;
            finish(output, &mut list, result)
        }
        RoleCommand::Toggle { role_id } => {
            let result = list
                .submit(client.toggle_role_active(role_id), "Role status changed")
                .await;
            finish(output, &mut list, result)
        }
        RoleCommand::Permissions { role_id } => {
            output.rows(&client.get_role_permissions(role_id).await?)
        }
        RoleCommand::Grant {
            role_id,
            permission_id,
        } => {
            let _ = list
                .submit(
                    client.assign_permission(role_id, permission_id),
                    "Permission granted",
                )
                .await;
            output.notices(&list.take_notices())?;
            output.rows(&client.get_role_permissions(role_id).await?)
        }
        RoleCommand::Revoke {
            role_id,
            permission_id,
        } => {
            let _ = list
                .submit(
                    client.remove_permission(role_id, permission_id),
                    "Permission revoked",
                )
                .await;
            output.notices(&list.take_notices())?;
            output.rows(&client.get_role_permissions(role_id).await?)
        }
        RoleCommand::Checklist { role_id, toggles } => {
            checklist(client, output, role_id, toggles).await
        }
    }
}

async fn checklist(
    client: &MesClient,
    output: Output,
    role_id: RoleId,
    toggles: Vec<PermissionId>,
) -> ConsoleResult<()> {
    let mut dialog = PermissionDialog::new(client.clone());
    dialog.enter_role_list();
    dialog.open(role_id).await;

    for permission_id in toggles {
        // Server failures are already queued as notices; local rejections are not.
        if let Err(error @ ClientError::Validation(_)) = dialog.toggle(permission_id).await {
            dialog.leave();
            return Err(error.into());
        }
    }

    let groups = dialog.checklist();
    let notices = dialog.take_notices();
    dialog.leave();

    if output.is_json() {
        let rendered: Vec<serde_json::Value> = groups
            .iter()
            .map(|group| {
                serde_json::json!({
                    "module": group.module,
                    "label": group.module.label(),
                    "entries": group
                        .entries
                        .iter()
                        .map(|entry| serde_json::json!({
                            "permission": entry.permission,
                            "checked": entry.checked,
                        }))
                        .collect::<Vec<_>>(),
                })
            })
            .collect();
        output.json_value(&rendered)?;
    } else if groups.is_empty() {
        output.line("(no permissions defined)")?;
    } else {
        output.line(&format_checklist(&groups))?;
    }

    output.notices(&notices)
}
