use mes_client::{
    CrudList, MesClient, PageQuery, PermissionFilter, PermissionForm, PermissionUpdate,
    PermissionView, require_fields,
};

use super::{confirm_delete, finish};
use crate::cli::PermissionCommand;
use crate::error::ConsoleResult;
use crate::output::Output;

pub async fn run(
    client: &MesClient,
    output: Output,
    command: PermissionCommand,
) -> ConsoleResult<()> {
    let mut list: CrudList<PermissionView> = CrudList::new();

    match command {
        PermissionCommand::List {
            status,
            module,
            search,
            page,
        } => {
            let filter = PermissionFilter {
                status,
                module,
                search,
            };
            match page.page {
                Some(index) => {
                    let query = PageQuery {
                        page: index,
                        size: page.size,
                    };
                    list.reload_page(client.get_permissions_page(query, &filter))
                        .await;
                    output.notices(&list.take_notices())?;
                    output.page(list.items(), list.total_elements(), index)
                }
                None => {
                    list.reload(client.find_permissions(&filter)).await;
                    output.notices(&list.take_notices())?;
                    output.rows(list.items())
                }
            }
        }
        PermissionCommand::Get { permission_id } => {
            output.record(&client.get_permission(permission_id).await?)
        }
        PermissionCommand::Create {
            code,
            name,
            module,
            description,
        } => {
            require_fields(&[
                ("Permission code", code.as_str()),
                ("Permission name", name.as_str()),
            ])?;
            list.open_create();
            let form = PermissionForm {
                permission_code: code,
                permission_name: name,
                module,
                description,
            };
            let created = list
                .submit(client.create_permission(&form), "Permission created")
                .await;
            finish(output, &mut list, created)
        }
        PermissionCommand::Update {
            permission_id,
            name,
            module,
            description,
        } => {
            require_fields(&[("Permission name", name.as_str())])?;
            list.open_edit(client.get_permission(permission_id).await?);
            let update = PermissionUpdate {
                permission_name: name,
                module,
                description,
            };
            let updated = list
                .submit(
                    client.update_permission(permission_id, &update),
                    "Permission updated",
                )
                .await;
            finish(output, &mut list, updated)
        }
        PermissionCommand::Delete { permission_id, yes } => {
            let permission = client.get_permission(permission_id).await?;
            let label = format!("permission {}", permission.permission_code);
            confirm_delete(output, &mut list, permission, label, yes, |permission| async move {
                client.delete_permission(permission.permission_id).await
            })
            .await
        }
        PermissionCommand::Activate { permission_id } => {
            let result = list
                .submit(
                    client.activate_permission(permission_id),
                    "Permission activated",
                )
                .await;
            finish(output, &mut list, result)
        }
        PermissionCommand::Deactivate { permission_id } => {
            let result = list
                .submit(
                    client.deactivate_permission(permission_id),
                    "Permission deactivated",
                )
                .await;
            finish(output, &mut list, result)
        }
        PermissionCommand::Toggle { permission_id } => {
            let result = list
                .submit(
                    client.toggle_permission_active(permission_id),
                    "Permission status changed",
                )
                .await;
            finish(output, &mut list, result)
        }
    }
}
