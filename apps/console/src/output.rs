use std::io::Write;

use serde::Serialize;

use mes_client::{
    AuditLogEntryView, ChecklistGroup, IdentityView, Notice, PermissionView, RoleAssignmentView,
    RoleView,
};

use crate::error::{ConsoleError, ConsoleResult};

/// Entity that can be rendered as one table row.
pub trait Row {
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

impl Row for RoleView {
    const HEADERS: &'static [&'static str] = &["ID", "CODE", "NAME", "STATUS", "DESCRIPTION"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.role_id.to_string(),
            self.role_code.clone(),
            self.role_name.clone(),
            self.status.as_str().to_owned(),
            self.description.clone().unwrap_or_default(),
        ]
    }
}

impl Row for PermissionView {
    const HEADERS: &'static [&'static str] = &["ID", "CODE", "NAME", "MODULE", "STATUS"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.permission_id.to_string(),
            self.permission_code.clone(),
            self.permission_name.clone(),
            self.module.as_str().to_owned(),
            self.status.as_str().to_owned(),
        ]
    }
}

impl Row for RoleAssignmentView {
    const HEADERS: &'static [&'static str] = &["SUBJECT", "ROLE", "ROLE ID", "ASSIGNED AT"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.subject.clone(),
            self.role_code.clone(),
            self.role_id.to_string(),
            self.assigned_at.to_rfc3339(),
        ]
    }
}

impl Row for AuditLogEntryView {
    const HEADERS: &'static [&'static str] = &["AT", "SUBJECT", "ACTION", "RESOURCE", "DETAIL"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.created_at.to_rfc3339(),
            self.subject.clone(),
            self.action.clone(),
            format!("{}:{}", self.resource_type, self.resource_id),
            self.detail.clone().unwrap_or_default(),
        ]
    }
}

/// Left-aligned, space-padded table.
pub fn format_table<T: Row>(rows: &[T]) -> String {
    let rows: Vec<Vec<String>> = rows.iter().map(T::cells).collect();
    let mut widths: Vec<usize> = T::HEADERS.iter().map(|header| header.len()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let headers: Vec<String> = T::HEADERS.iter().map(|header| (*header).to_owned()).collect();
    std::iter::once(&headers)
        .chain(rows.iter())
        .map(|row| {
            row.iter()
                .zip(&widths)
                .map(|(cell, &width)| format!("{cell:<width$}"))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_owned()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Checklist rendered as `[x] CODE  Name` lines under module labels.
pub fn format_checklist(groups: &[ChecklistGroup]) -> String {
    let mut lines = Vec::new();
    for group in groups {
        lines.push(format!("{}:", group.module.label()));
        for entry in &group.entries {
            let mark = if entry.checked { "x" } else { " " };
            lines.push(format!(
                "  [{mark}] {}  {}  ({})",
                entry.permission.permission_code,
                entry.permission.permission_name,
                entry.permission.permission_id
            ));
        }
    }
    lines.join("\n")
}

pub fn format_identity(identity: &IdentityView) -> String {
    let permissions = if identity.permissions.is_empty() {
        "(none)".to_owned()
    } else {
        identity.permissions.join(", ")
    };
    format!(
        "{} ({})\ntenant: {}\npermissions: {permissions}",
        identity.display_name, identity.subject, identity.tenant_id
    )
}

/// Writes command results to stdout and notices to stdout or stderr.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn is_json(self) -> bool {
        self.json
    }

    pub fn rows<T: Row + Serialize>(self, rows: &[T]) -> ConsoleResult<()> {
        if self.json {
            return self.json_value(rows);
        }
        if rows.is_empty() {
            return self.line("(no rows)");
        }
        self.line(&format_table(rows))
    }

    pub fn page<T: Row + Serialize>(self, rows: &[T], total_elements: usize, page: usize) -> ConsoleResult<()> {
        if self.json {
            return self.json_value(&serde_json::json!({
                "content": rows,
                "totalElements": total_elements,
            }));
        }
        self.rows(rows)?;
        self.line(&format!("page {page}, {} of {total_elements} rows", rows.len()))
    }

    pub fn record<T: Row + Serialize>(self, record: &T) -> ConsoleResult<()> {
        self.rows(std::slice::from_ref(record))
    }

    pub fn json_value<T: Serialize + ?Sized>(self, value: &T) -> ConsoleResult<()> {
        let rendered = serde_json::to_string_pretty(value)
            .map_err(|error| ConsoleError::Output(error.to_string()))?;
        self.line(&rendered)
    }

    pub fn line(self, text: &str) -> ConsoleResult<()> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{text}").map_err(|error| ConsoleError::Output(error.to_string()))
    }

    /// Prints notices and fails when any of them is an error.
    pub fn notices(self, notices: &[Notice]) -> ConsoleResult<()> {
        let mut failures = 0;
        for notice in notices {
            if notice.is_error() {
                failures += 1;
                let mut stderr = std::io::stderr().lock();
                writeln!(stderr, "error: {}", notice.message)
                    .map_err(|error| ConsoleError::Output(error.to_string()))?;
            } else if !self.json {
                self.line(&notice.message)?;
            }
        }

        if failures > 0 {
            return Err(ConsoleError::Failed(failures));
        }
        Ok(())
    }
}
