use async_trait::async_trait;
use tracing::warn;

use mes_domain::{PermissionId, PermissionModule, RoleId};

use crate::client::MesClient;
use crate::error::{ClientError, ClientResult};
use crate::notice::Notice;
use crate::wire::PermissionView;

/// Remote calls the permission dialog needs.
#[async_trait]
pub trait RolePermissionGateway: Send + Sync {
    /// Returns the full permission catalog.
    async fn list_permissions(&self) -> ClientResult<Vec<PermissionView>>;

    /// Returns the permissions currently granted to a role.
    async fn list_role_permissions(&self, role_id: RoleId) -> ClientResult<Vec<PermissionView>>;

    /// Grants a permission to a role.
    async fn assign_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> ClientResult<()>;

    /// Revokes a permission from a role.
    async fn remove_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> ClientResult<()>;
}

#[async_trait]
impl RolePermissionGateway for MesClient {
    async fn list_permissions(&self) -> ClientResult<Vec<PermissionView>> {
        self.get_permissions().await
    }

    async fn list_role_permissions(&self, role_id: RoleId) -> ClientResult<Vec<PermissionView>> {
        self.get_role_permissions(role_id).await
    }

    async fn assign_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> ClientResult<()> {
        MesClient::assign_permission(self, role_id, permission_id).await
    }

    async fn remove_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> ClientResult<()> {
        MesClient::remove_permission(self, role_id, permission_id).await
    }
}

/// Where the operator is in the role screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    /// Role list not shown.
    Closed,
    /// Role list shown, no dialog open.
    EditingRoleList,
    /// Permission checklist open for one role.
    PermissionDialogOpen(RoleId),
}

/// One checkbox in the permission checklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistEntry {
    /// Permission behind the checkbox.
    pub permission: PermissionView,
    /// Whether the role currently holds it.
    pub checked: bool,
}

/// Checklist entries of one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistGroup {
    /// Module the entries belong to.
    pub module: PermissionModule,
    /// Entries ordered by permission code.
    pub entries: Vec<ChecklistEntry>,
}

/// Headless state of the role-permission checklist dialog.
///
/// Every toggle issues one assign or remove call and then refetches the role's
/// permissions; the checked set always reflects the last successful fetch.
pub struct PermissionDialog<G> {
    gateway: G,
    state: DialogState,
    catalog: Vec<PermissionView>,
    granted: Vec<PermissionId>,
    notices: Vec<Notice>,
}

impl<G: RolePermissionGateway> PermissionDialog<G> {
    /// Creates a closed dialog.
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            state: DialogState::Closed,
            catalog: Vec::new(),
            granted: Vec::new(),
            notices: Vec::new(),
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> DialogState {
        self.state
    }

    /// Shows the role list.
    pub fn enter_role_list(&mut self) {
        self.state = DialogState::EditingRoleList;
    }

    /// Opens the checklist for a role.
    ///
    /// Loads the catalog and then the role snapshot. A failed load leaves the
    /// dialog open with whatever was fetched and records an error notice.
    pub async fn open(&mut self, role_id: RoleId) {
        self.state = DialogState::PermissionDialogOpen(role_id);
        self.catalog.clear();
        self.granted.clear();

        match self.gateway.list_permissions().await {
            Ok(catalog) => self.catalog = catalog,
            Err(error) => {
                warn!(role_id = %role_id, error = %error, "failed to load permission catalog");
                self.notices.push(Notice::error(&error));
                return;
            }
        }

        self.refresh(role_id).await;
    }

    /// Flips one checkbox.
    ///
    /// Removes the permission when checked, assigns it otherwise. A failed call
    /// is reported as a notice and the snapshot is refetched either way.
    pub async fn toggle(&mut self, permission_id: PermissionId) -> ClientResult<()> {
        let DialogState::PermissionDialogOpen(role_id) = self.state else {
            return Err(ClientError::Validation(
                "no role permission dialog is open".to_owned(),
            ));
        };
        if !self
            .catalog
            .iter()
            .any(|permission| permission.permission_id == permission_id)
        {
            return Err(ClientError::Validation(format!(
                "permission '{permission_id}' is not in the catalog"
            )));
        }

        let result = if self.is_checked(permission_id) {
            self.gateway.remove_permission(role_id, permission_id).await
        } else {
            self.gateway.assign_permission(role_id, permission_id).await
        };

        if let Err(error) = &result {
            self.notices.push(Notice::error(error));
        }

        self.refresh(role_id).await;
        result
    }

    /// Closes the checklist and returns to the role list.
    pub fn close(&mut self) {
        if matches!(self.state, DialogState::PermissionDialogOpen(_)) {
            self.state = DialogState::EditingRoleList;
        }
        self.catalog.clear();
        self.granted.clear();
    }

    /// Leaves the role screen entirely.
    pub fn leave(&mut self) {
        self.close();
        self.state = DialogState::Closed;
    }

    /// Returns whether the role currently holds the permission.
    pub fn is_checked(&self, permission_id: PermissionId) -> bool {
        self.granted.contains(&permission_id)
    }

    /// Groups the catalog by module in display order.
    pub fn checklist(&self) -> Vec<ChecklistGroup> {
        PermissionModule::all()
            .iter()
            .filter_map(|module| {
                let mut entries: Vec<ChecklistEntry> = self
                    .catalog
                    .iter()
                    .filter(|permission| permission.module == *module)
                    .map(|permission| ChecklistEntry {
                        permission: permission.clone(),
                        checked: self.is_checked(permission.permission_id),
                    })
                    .collect();
                if entries.is_empty() {
                    return None;
                }

                entries.sort_by(|left, right| {
                    left.permission
                        .permission_code
                        .cmp(&right.permission.permission_code)
                });
                Some(ChecklistGroup {
                    module: *module,
                    entries,
                })
            })
            .collect()
    }

    /// Drains pending notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    async fn refresh(&mut self, role_id: RoleId) {
        match self.gateway.list_role_permissions(role_id).await {
            Ok(permissions) => {
                self.granted = permissions
                    .into_iter()
                    .map(|permission| permission.permission_id)
                    .collect();
            }
            Err(error) => {
                warn!(role_id = %role_id, error = %error, "failed to refresh role permissions");
                self.notices.push(Notice::error(&error));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::Utc;
    use tokio::sync::Mutex;

    use mes_domain::{PermissionId, PermissionModule, PermissionStatus, RoleId};

    use super::{DialogState, PermissionDialog, RolePermissionGateway};
    use crate::error::{ClientError, ClientResult};
    use crate::wire::PermissionView;

    #[derive(Clone, Default)]
    struct FakeGateway {
        catalog: Vec<PermissionView>,
        granted: Arc<Mutex<BTreeSet<PermissionId>>>,
        fail_edits: Arc<AtomicBool>,
        fail_snapshots: Arc<AtomicBool>,
        edit_calls: Arc<AtomicUsize>,
        snapshot_calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl RolePermissionGateway for FakeGateway {
        async fn list_permissions(&self) -> ClientResult<Vec<PermissionView>> {
            Ok(self.catalog.clone())
        }

        async fn list_role_permissions(&self, _role_id: RoleId) -> ClientResult<Vec<PermissionView>> {
            self.snapshot_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_snapshots.load(Ordering::SeqCst) {
                return Err(ClientError::Api {
                    status: 503,
                    message: Some("snapshot unavailable".to_owned()),
                });
            }
            let granted = self.granted.lock().await;
            Ok(self
                .catalog
                .iter()
                .filter(|permission| granted.contains(&permission.permission_id))
                .cloned()
                .collect())
        }

        async fn assign_permission(
            &self,
            _role_id: RoleId,
            permission_id: PermissionId,
        ) -> ClientResult<()> {
            self.edit_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_edits.load(Ordering::SeqCst) {
                return Err(ClientError::Api {
                    status: 500,
                    message: Some("database unavailable".to_owned()),
                });
            }
            self.granted.lock().await.insert(permission_id);
            Ok(())
        }

        async fn remove_permission(
            &self,
            _role_id: RoleId,
            permission_id: PermissionId,
        ) -> ClientResult<()> {
            self.edit_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_edits.load(Ordering::SeqCst) {
                return Err(ClientError::Api {
                    status: 500,
                    message: None,
                });
            }
            self.granted.lock().await.remove(&permission_id);
            Ok(())
        }
    }

    fn permission(code: &str, module: PermissionModule) -> PermissionView {
        PermissionView {
            permission_id: PermissionId::new(),
            permission_code: code.to_owned(),
            permission_name: format!("{code} name"),
            module,
            description: None,
            status: PermissionStatus::Active,
            created_at: Utc::now(),
        }
    }

    fn gateway() -> FakeGateway {
        FakeGateway {
            catalog: vec![
                permission("STOCK_VIEW", PermissionModule::Inventory),
                permission("WORK_ORDER_RELEASE", PermissionModule::Production),
                permission("STOCK_ADJUST", PermissionModule::Inventory),
            ],
            ..FakeGateway::default()
        }
    }

    #[tokio::test]
    async fn toggling_twice_restores_the_snapshot() {
        let gateway = gateway();
        let target = gateway.catalog[0].permission_id;
        let mut dialog = PermissionDialog::new(gateway.clone());
        let role_id = RoleId::new();

        dialog.enter_role_list();
        dialog.open(role_id).await;
        assert_eq!(dialog.state(), DialogState::PermissionDialogOpen(role_id));
        assert!(!dialog.is_checked(target));

        assert!(dialog.toggle(target).await.is_ok());
        assert!(dialog.is_checked(target));
        assert!(dialog.toggle(target).await.is_ok());
        assert!(!dialog.is_checked(target));

        assert_eq!(gateway.edit_calls.load(Ordering::SeqCst), 2);
        assert_eq!(gateway.snapshot_calls.load(Ordering::SeqCst), 3);
        assert!(dialog.take_notices().is_empty());
    }

    #[tokio::test]
    async fn failed_edit_reports_and_still_refetches() {
        let gateway = gateway();
        let target = gateway.catalog[0].permission_id;
        gateway.fail_edits.store(true, Ordering::SeqCst);
        let mut dialog = PermissionDialog::new(gateway.clone());

        dialog.open(RoleId::new()).await;
        let result = dialog.toggle(target).await;

        assert!(matches!(result, Err(ClientError::Api { status: 500, .. })));
        assert!(!dialog.is_checked(target));
        assert_eq!(gateway.snapshot_calls.load(Ordering::SeqCst), 2);

        let notices = dialog.take_notices();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].is_error());
        assert_eq!(notices[0].message, "database unavailable");
    }

    #[tokio::test]
    async fn failed_refetch_after_failed_edit_keeps_previous_snapshot() {
        let gateway = gateway();
        let target = gateway.catalog[0].permission_id;
        gateway.granted.lock().await.insert(target);
        let mut dialog = PermissionDialog::new(gateway.clone());

        dialog.open(RoleId::new()).await;
        assert!(dialog.is_checked(target));

        gateway.fail_edits.store(true, Ordering::SeqCst);
        gateway.fail_snapshots.store(true, Ordering::SeqCst);
        let result = dialog.toggle(target).await;

        assert!(matches!(result, Err(ClientError::Api { status: 500, .. })));
        assert!(dialog.is_checked(target));
        assert_eq!(gateway.snapshot_calls.load(Ordering::SeqCst), 2);

        let notices = dialog.take_notices();
        let messages: Vec<&str> = notices.iter().map(|notice| notice.message.as_str()).collect();
        assert!(notices.iter().all(|notice| notice.is_error()));
        assert_eq!(
            messages,
            vec!["Request failed with status code 500", "snapshot unavailable"]
        );
    }

    #[tokio::test]
    async fn toggle_outside_an_open_dialog_is_rejected_locally() {
        let gateway = gateway();
        let target = gateway.catalog[0].permission_id;
        let mut dialog = PermissionDialog::new(gateway.clone());

        let closed = dialog.toggle(target).await;
        dialog.open(RoleId::new()).await;
        let unknown = dialog.toggle(PermissionId::new()).await;

        assert!(matches!(closed, Err(ClientError::Validation(_))));
        assert!(matches!(unknown, Err(ClientError::Validation(_))));
        assert_eq!(gateway.edit_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn checklist_groups_by_module_in_display_order() {
        let mut dialog = PermissionDialog::new(gateway());
        dialog.open(RoleId::new()).await;

        let groups = dialog.checklist();
        let modules: Vec<PermissionModule> = groups.iter().map(|group| group.module).collect();
        let inventory_codes: Vec<&str> = groups[1]
            .entries
            .iter()
            .map(|entry| entry.permission.permission_code.as_str())
            .collect();

        assert_eq!(
            modules,
            vec![PermissionModule::Production, PermissionModule::Inventory]
        );
        assert_eq!(inventory_codes, vec!["STOCK_ADJUST", "STOCK_VIEW"]);
    }

    #[tokio::test]
    async fn close_and_leave_walk_back_through_states() {
        let mut dialog = PermissionDialog::new(gateway());
        dialog.enter_role_list();
        dialog.open(RoleId::new()).await;

        dialog.close();
        assert_eq!(dialog.state(), DialogState::EditingRoleList);
        assert!(dialog.checklist().is_empty());

        dialog.leave();
        assert_eq!(dialog.state(), DialogState::Closed);
    }
}
