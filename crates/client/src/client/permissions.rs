use super::*;

impl MesClient {
    /// Lists the whole permission catalog.
    pub async fn get_permissions(&self) -> ClientResult<Vec<PermissionView>> {
        self.permissions.list(&PermissionFilter::default()).await
    }

    /// Lists permissions matching the filter.
    pub async fn find_permissions(&self, filter: &PermissionFilter) -> ClientResult<Vec<PermissionView>> {
        self.permissions.list(filter).await
    }

    /// Returns one page of permissions.
    pub async fn get_permissions_page(
        &self,
        page: PageQuery,
        filter: &PermissionFilter,
    ) -> ClientResult<mes_domain::Page<PermissionView>> {
        self.permissions.list_page(page, filter).await
    }

    /// Returns one permission.
    pub async fn get_permission(&self, permission_id: PermissionId) -> ClientResult<PermissionView> {
        self.permissions.get(permission_id).await
    }

    /// Creates a permission. A taken code fails with a conflict.
    pub async fn create_permission(&self, form: &PermissionForm) -> ClientResult<PermissionView> {
        self.permissions.create(form).await
    }

    /// Updates permission name, module and description.
    pub async fn update_permission(
        &self,
        permission_id: PermissionId,
        update: &PermissionUpdate,
    ) -> ClientResult<PermissionView> {
        self.permissions.update(permission_id, update).await
    }

    /// Deletes a permission.
    pub async fn delete_permission(&self, permission_id: PermissionId) -> ClientResult<()> {
        self.permissions.delete(permission_id).await
    }

    /// Activates a permission.
    pub async fn activate_permission(&self, permission_id: PermissionId) -> ClientResult<PermissionView> {
        self.permissions.activate(permission_id).await
    }

    /// Deactivates a permission.
    pub async fn deactivate_permission(
        &self,
        permission_id: PermissionId,
    ) -> ClientResult<PermissionView> {
        self.permissions.deactivate(permission_id).await
    }

    /// Flips permission status.
    pub async fn toggle_permission_active(
        &self,
        permission_id: PermissionId,
    ) -> ClientResult<PermissionView> {
        self.permissions.toggle_active(permission_id).await
    }
}
