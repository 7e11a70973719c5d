use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use mes_domain::{PermissionId, PermissionModule, PermissionStatus, RoleId, RoleStatus};

/// Operator console for MES roles and permissions.
#[derive(Debug, Parser)]
#[command(name = "mes-console", version)]
pub struct Cli {
    /// API base URL; overrides MES_API_URL.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Session file; overrides MES_SESSION_FILE.
    #[arg(long, global = true)]
    pub session_file: Option<PathBuf>,

    /// Print JSON instead of tables.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Starts a session with the bootstrap token.
    Login(LoginArgs),
    /// Ends the current session.
    Logout,
    /// Shows the signed-in subject and its permission codes.
    Whoami,
    /// Checks that the API is reachable.
    Health,
    /// Manages roles.
    Roles {
        #[command(subcommand)]
        command: RoleCommand,
    },
    /// Manages permissions.
    Permissions {
        #[command(subcommand)]
        command: PermissionCommand,
    },
    /// Manages subject role assignments.
    Assignments {
        #[command(subcommand)]
        command: AssignmentCommand,
    },
    /// Reads the audit log.
    Audit(AuditArgs),
    /// Re-renders a list on a fixed interval.
    Watch(WatchArgs),
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Subject to sign in as.
    pub subject: String,

    /// Shared bootstrap token.
    #[arg(long, env = "MES_BOOTSTRAP_TOKEN", hide_env_values = true)]
    pub token: String,
}

#[derive(Debug, Args, Default)]
pub struct PageArgs {
    /// Zero-based page index; omit for the full list.
    #[arg(long)]
    pub page: Option<usize>,

    /// Page size.
    #[arg(long, requires = "page")]
    pub size: Option<usize>,
}

#[derive(Debug, Subcommand)]
pub enum RoleCommand {
    /// Lists roles.
    List {
        #[arg(long)]
        status: Option<RoleStatus>,
        #[arg(long)]
        search: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Shows one role.
    Get { role_id: RoleId },
    /// Creates a role.
    Create {
        #[arg(long)]
        code: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Renames a role. The code cannot change.
    Update {
        role_id: RoleId,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Deletes a role.
    Delete {
        role_id: RoleId,
        /// Confirms the delete.
        #[arg(long)]
        yes: bool,
    },
    /// Sets a role active.
    Activate { role_id: RoleId },
    /// Sets a role inactive.
    Deactivate { role_id: RoleId },
    /// Flips a role between active and inactive.
    Toggle { role_id: RoleId },
    /// Lists the permissions granted to a role.
    Permissions { role_id: RoleId },
    /// Grants a permission to a role.
    Grant {
        role_id: RoleId,
        permission_id: PermissionId,
    },
    /// Revokes a permission from a role.
    Revoke {
        role_id: RoleId,
        permission_id: PermissionId,
    },
    /// Shows the permission checklist of a role, optionally toggling entries first.
    Checklist {
        role_id: RoleId,
        /// Permission to flip; repeatable.
        #[arg(long = "toggle")]
        toggles: Vec<PermissionId>,
    },
}

#[derive(Debug, Subcommand)]
pub enum PermissionCommand {
    /// Lists permissions.
    List {
        #[arg(long)]
        status: Option<PermissionStatus>,
        #[arg(long)]
        module: Option<PermissionModule>,
        #[arg(long)]
        search: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Shows one permission.
    Get { permission_id: PermissionId },
    /// Creates a permission.
    Create {
        #[arg(long)]
        code: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        module: PermissionModule,
        #[arg(long)]
        description: Option<String>,
    },
    /// Edits a permission. The code cannot change.
    Update {
        permission_id: PermissionId,
        #[arg(long)]
        name: String,
        #[arg(long)]
        module: PermissionModule,
        #[arg(long)]
        description: Option<String>,
    },
    /// Deletes a permission.
    Delete {
        permission_id: PermissionId,
        /// Confirms the delete.
        #[arg(long)]
        yes: bool,
    },
    /// Sets a permission active.
    Activate { permission_id: PermissionId },
    /// Sets a permission inactive.
    Deactivate { permission_id: PermissionId },
    /// Flips a permission between active and inactive.
    Toggle { permission_id: PermissionId },
}

#[derive(Debug, Subcommand)]
pub enum AssignmentCommand {
    /// Lists every subject role assignment.
    List,
    /// Assigns a role to a subject.
    Assign { subject: String, role_id: RoleId },
    /// Removes a role from a subject.
    Remove { subject: String, role_id: RoleId },
}

#[derive(Debug, Args)]
pub struct AuditArgs {
    #[arg(long)]
    pub limit: Option<usize>,
    #[arg(long)]
    pub offset: Option<usize>,
    /// Exact action, e.g. security.role.created.
    #[arg(long)]
    pub action: Option<String>,
    #[arg(long)]
    pub subject: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WatchTarget {
    Roles,
    Permissions,
    Assignments,
    Audit,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    pub target: WatchTarget,

    /// Seconds between refreshes.
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: u64,

    /// Stop after this many seconds instead of waiting for Ctrl-C.
    #[arg(long = "for")]
    pub run_for: Option<u64>,
}
