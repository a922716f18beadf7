//! Plain-text tables for the shell.

use gatehouse_core::query::{UserQuery, UserRow};
use gatehouse_model::prelude::{Role, Session};

fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = format_line(headers.iter().copied(), &widths);
    out.push('\n');
    for row in rows {
        out.push_str(&format_line(row.iter().map(String::as_str), &widths));
        out.push('\n');
    }
    out
}

fn format_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let mut out = String::new();
    for (i, (cell, width)) in cells.zip(widths).enumerate() {
        if i > 0 {
            out.push_str("  ");
        }
        out.push_str(cell);
        let pad = width.saturating_sub(cell.chars().count());
        out.extend(std::iter::repeat_n(' ', pad));
    }
    out.trim_end().to_string()
}

pub fn users(rows: &[UserRow], query: &UserQuery) -> String {
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                row.user.name.clone(),
                row.user.email.clone(),
                row.role_name.clone(),
                if row.user.is_active { "active" } else { "inactive" }.to_string(),
                row.user.id.to_string(),
            ]
        })
        .collect();

    let mut out = table(&["NAME", "EMAIL", "ROLE", "STATUS", "ID"], &body);
    out.push_str(&format!(
        "{} user(s) | search: \"{}\" | status: {} | role: {} | sort: {} {}\n",
        rows.len(),
        query.search_term,
        query.status.as_str(),
        match &query.role {
            gatehouse_core::RoleFilter::All => "all",
            gatehouse_core::RoleFilter::Role(id) => id.as_str(),
        },
        query.sort.field.as_str(),
        query.sort.direction.as_str(),
    ));
    out
}

pub fn roles(roles: &[Role]) -> String {
    let body: Vec<Vec<String>> = roles
        .iter()
        .map(|role| {
            let permissions = if role.permissions.is_empty() {
                "-".to_string()
            } else {
                role.permissions.to_string()
            };
            vec![role.name.clone(), permissions, role.id.to_string()]
        })
        .collect();
    table(&["NAME", "PERMISSIONS", "ID"], &body)
}

pub fn whoami(session: &Session) -> String {
    let Some(user) = session.user() else {
        return "Not signed in".to_string();
    };
    match &session.role {
        Some(role) => format!(
            "{} <{}> | role: {} | permissions: {}",
            user.name, user.email, role.name, role.permissions
        ),
        None => format!(
            "{} <{}> | role: Unknown | permissions: -",
            user.name, user.email
        ),
    }
}

pub const HELP: &str = "\
Session
  login <email> [<password>]   sign in; prompts when the password is left off
  logout                       sign out
  whoami                       show the signed-in user
  tab users|roles              switch dashboard tab
  theme                        toggle dark/light theme
Users
  users                        list users with the current filters
  search [term]                filter by name, email or role name
  status all|active|inactive   filter by status
  role-filter all|<role-id>    filter by role
  sort name|email|role         sort by column; repeat to flip direction
  add-user <name> <email> [<password>] <role-id> [--inactive]
  edit-user <id> [name=..] [email=..] [role=..] [active=true|false]
  passwd <id> [<password>]     set a new password
  delete-user <id>
Roles
  roles                        list roles
  add-role <name> [read,write,delete]
  edit-role <id> [name=..] [permissions=read,write,delete]
  delete-role <id>
  help                         this text
  quit                         leave the console
Quote arguments containing spaces: add-user \"Ann Lee\" ann@example.com pw user
";
