use std::time::Duration;

use reqwest::Method;
use tracing::info;

use mes_domain::{PermissionId, RoleId};

use crate::error::{ClientError, ClientResult};
use crate::resource::{QueryFilter, ResourceClient};
use crate::session::{SessionContext, session_cookie_from_headers};
use crate::transport::Transport;
use crate::wire::{
    AuditLogEntryView, AuditLogFilter, BootstrapRequest, IdentityView, PageQuery,
    PermissionFilter, PermissionForm, PermissionUpdate, PermissionView, RoleAssignmentRequest,
    RoleAssignmentView, RoleFilter, RoleForm, RoleUpdate, RoleView,
};

mod permissions;
mod roles;

const ROLES: &[&str] = &["api", "roles"];
const PERMISSIONS: &[&str] = &["api", "permissions"];

/// Typed client for the MES access-control API.
///
/// Every call maps one request to one response; the client holds no cache.
#[derive(Clone)]
pub struct MesClient {
    transport: Transport,
    roles: ResourceClient<RoleView, RoleFilter>,
    permissions: ResourceClient<PermissionView, PermissionFilter>,
}

impl MesClient {
    /// Creates a client for the API at `base_url`.
    pub fn new(base_url: &str, session: SessionContext, timeout: Duration) -> ClientResult<Self> {
        let transport = Transport::new(base_url, session, timeout)?;

        Ok(Self {
            roles: ResourceClient::new(transport.clone(), ROLES),
            permissions: ResourceClient::new(transport.clone(), PERMISSIONS),
            transport,
        })
    }

    /// Returns the session this client authenticates with.
    #[must_use]
    pub fn session(&self) -> &SessionContext {
        self.transport.session()
    }

    /// Returns the generic role resource.
    #[must_use]
    pub fn roles(&self) -> &ResourceClient<RoleView, RoleFilter> {
        &self.roles
    }

    /// Returns the generic permission resource.
    #[must_use]
    pub fn permissions(&self) -> &ResourceClient<PermissionView, PermissionFilter> {
        &self.permissions
    }

    /// Signs in with the bootstrap token and stores the issued session.
    pub async fn login(&self, subject: &str, token: &str) -> ClientResult<IdentityView> {
        let url = self.transport.endpoint(&["auth", "bootstrap"], &[])?;
        let response = self
            .transport
            .send_json(Method::POST, url, &BootstrapRequest { subject, token })
            .await?;

        let cookie = session_cookie_from_headers(response.headers()).ok_or_else(|| {
            ClientError::Session("server did not issue a session cookie".to_owned())
        })?;
        let identity = Transport::decode::<IdentityView>(response).await?;
        self.session().establish(cookie).await?;

        info!(subject = %identity.subject, "signed in");
        Ok(identity)
    }

    /// Ends the server session and clears the local one.
    ///
    /// The local session is cleared even when the server call fails.
    pub async fn logout(&self) -> ClientResult<()> {
        let url = self.transport.endpoint(&["auth", "logout"], &[])?;
        let remote = self.transport.send_empty(Method::POST, url).await;
        self.session().teardown().await?;
        remote.map(|_| ())
    }

    /// Returns the authenticated operator.
    pub async fn me(&self) -> ClientResult<IdentityView> {
        let url = self.transport.endpoint(&["auth", "me"], &[])?;
        let response = self.transport.send_empty(Method::GET, url).await?;
        Transport::decode(response).await
    }

    /// Checks that the API is reachable.
    pub async fn health(&self) -> ClientResult<()> {
        let url = self.transport.endpoint(&["health"], &[])?;
        self.transport.send_empty(Method::GET, url).await?;
        Ok(())
    }

    /// Lists subject role assignments.
    pub async fn list_role_assignments(&self) -> ClientResult<Vec<RoleAssignmentView>> {
        let url = self.transport.endpoint(&["api", "role-assignments"], &[])?;
        let response = self.transport.send_empty(Method::GET, url).await?;
        Transport::decode(response).await
    }

    /// Assigns a role to a subject. Repeating the call is a no-op.
    pub async fn assign_role_to_subject(&self, subject: &str, role_id: RoleId) -> ClientResult<()> {
        let url = self.transport.endpoint(&["api", "role-assignments"], &[])?;
        self.transport
            .send_json(
                Method::POST,
                url,
                &RoleAssignmentRequest { subject, role_id },
            )
            .await?;
        Ok(())
    }

    /// Removes a role from a subject. Removing an absent assignment is a no-op.
    pub async fn remove_role_from_subject(&self, subject: &str, role_id: RoleId) -> ClientResult<()> {
        let role_id = role_id.to_string();
        let url = self
            .transport
            .endpoint(&["api", "role-assignments", subject, role_id.as_str()], &[])?;
        self.transport.send_empty(Method::DELETE, url).await?;
        Ok(())
    }

    /// Returns recent audit entries, newest first.
    pub async fn get_audit_log(&self, filter: &AuditLogFilter) -> ClientResult<Vec<AuditLogEntryView>> {
        let url = self
            .transport
            .endpoint(&["api", "audit-log"], &filter.query_pairs())?;
        let response = self.transport.send_empty(Method::GET, url).await?;
        Transport::decode(response).await
    }
}
