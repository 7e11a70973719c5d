use super::*;

impl MesClient {
    /// Lists all roles.
    pub async fn get_roles(&self) -> ClientResult<Vec<RoleView>> {
        self.roles.list(&RoleFilter::default()).await
    }

    /// Lists roles matching the filter.
    pub async fn find_roles(&self, filter: &RoleFilter) -> ClientResult<Vec<RoleView>> {
        self.roles.list(filter).await
    }

    /// Returns one page of roles.
    pub async fn get_roles_page(
        &self,
        page: PageQuery,
        filter: &RoleFilter,
    ) -> ClientResult<mes_domain::Page<RoleView>> {
        self.roles.list_page(page, filter).await
    }

    /// Returns one role.
    pub async fn get_role(&self, role_id: RoleId) -> ClientResult<RoleView> {
        self.roles.get(role_id).await
    }

    /// Creates a role. A taken code fails with a conflict.
    pub async fn create_role(&self, form: &RoleForm) -> ClientResult<RoleView> {
        self.roles.create(form).await
    }

    /// Updates role name and description.
    pub async fn update_role(&self, role_id: RoleId, update: &RoleUpdate) -> ClientResult<RoleView> {
        self.roles.update(role_id, update).await
    }

    /// Deletes a role.
    pub async fn delete_role(&self, role_id: RoleId) -> ClientResult<()> {
        self.roles.delete(role_id).await
    }

    /// Activates a role.
    pub async fn activate_role(&self, role_id: RoleId) -> ClientResult<RoleView> {
        self.roles.activate(role_id).await
    }

    /// Deactivates a role.
    pub async fn deactivate_role(&self, role_id: RoleId) -> ClientResult<RoleView> {
        self.roles.deactivate(role_id).await
    }

    /// Flips role status.
    pub async fn toggle_role_active(&self, role_id: RoleId) -> ClientResult<RoleView> {
        self.roles.toggle_active(role_id).await
    }

    /// Returns the current permission snapshot of a role.
    pub async fn get_role_permissions(&self, role_id: RoleId) -> ClientResult<Vec<PermissionView>> {
        self.roles.list_children(role_id, "permissions").await
    }

    /// Grants a permission to a role.
    pub async fn assign_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> ClientResult<()> {
        self.roles
            .edit_child(Method::POST, role_id, "permissions", permission_id)
            .await
    }

    /// Revokes a permission from a role.
    pub async fn remove_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> ClientResult<()> {
        self.roles
            .edit_child(Method::DELETE, role_id, "permissions", permission_id)
            .await
    }
}
