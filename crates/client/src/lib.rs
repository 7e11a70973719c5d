//! Typed REST client for the MES access-control API plus the headless state
//! the administration screens are built from.

#![forbid(unsafe_code)]

mod client;
mod crud;
mod error;
mod notice;
mod permission_dialog;
mod poller;
mod resource;
mod session;
mod transport;
mod wire;

pub use client::MesClient;
pub use crud::{CrudList, EditorState, require_fields};
pub use error::{ClientError, ClientResult, GENERIC_ERROR_MESSAGE};
pub use notice::{Notice, NoticeKind};
pub use permission_dialog::{
    ChecklistEntry, ChecklistGroup, DialogState, PermissionDialog, RolePermissionGateway,
};
pub use poller::{PollHandle, spawn_poller};
pub use resource::{QueryFilter, ResourceClient, StatusTransition};
pub use session::{SESSION_COOKIE_NAME, SessionContext};
pub use wire::{
    AuditLogEntryView, AuditLogFilter, IdentityView, PageQuery, PermissionFilter, PermissionForm,
    PermissionUpdate, PermissionView, RoleAssignmentView, RoleFilter, RoleForm, RoleUpdate,
    RoleView,
};

pub use mes_domain::Page;
