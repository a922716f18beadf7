//! Line parsing for the interactive shell.

use gatehouse_core::navigation::DashboardTab;
use gatehouse_core::query::{RoleFilter, SortField, StatusFilter};
use gatehouse_model::prelude::{PermissionSet, RoleId, RolePatch, UserId, UserPatch};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unterminated quote")]
    UnterminatedQuote,
    #[error("unknown command `{0}`; type `help` for the list")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login { email: String, password: Option<String> },
    Logout,
    Whoami,
    Tab(DashboardTab),
    Users,
    Search(String),
    Status(StatusFilter),
    RoleFilter(RoleFilter),
    Sort(SortField),
    AddUser {
        name: String,
        email: String,
        password: Option<String>,
        role_id: RoleId,
        is_active: bool,
    },
    EditUser { id: UserId, patch: UserPatch },
    Passwd { id: UserId, password: Option<String> },
    DeleteUser(UserId),
    Roles,
    AddRole { name: String, permissions: PermissionSet },
    EditRole { id: RoleId, patch: RolePatch },
    DeleteRole(RoleId),
    Theme,
    Help,
    Quit,
}

impl Command {
    /// Command word, safe to log.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Login { .. } => "login",
            Command::Logout => "logout",
            Command::Whoami => "whoami",
            Command::Tab(_) => "tab",
            Command::Users => "users",
            Command::Search(_) => "search",
            Command::Status(_) => "status",
            Command::RoleFilter(_) => "role-filter",
            Command::Sort(_) => "sort",
            Command::AddUser { .. } => "add-user",
            Command::EditUser { .. } => "edit-user",
            Command::Passwd { .. } => "passwd",
            Command::DeleteUser(_) => "delete-user",
            Command::Roles => "roles",
            Command::AddRole { .. } => "add-role",
            Command::EditRole { .. } => "edit-role",
            Command::DeleteRole(_) => "delete-role",
            Command::Theme => "theme",
            Command::Help => "help",
            Command::Quit => "quit",
        }
    }

    /// Whether a password was typed inline on the command line.
    pub fn carries_secret(&self) -> bool {
        match self {
            Command::Login { password, .. }
            | Command::AddUser { password, .. }
            | Command::Passwd { password, .. } => password.is_some(),
            _ => false,
        }
    }
}

/// Whether a line is safe to keep in history. Lines that fail to parse are
/// not kept, since they may hold a password.
pub fn is_recordable(line: &str) -> bool {
    matches!(parse(line), Ok(Some(command)) if !command.carries_secret())
}

/// Split a line on whitespace. Double quotes group words; `\"` and `\\`
/// escape inside quotes.
pub fn tokenize(line: &str) -> Result<Vec<String>, CommandError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quoted = false;
    let mut chars = line.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                quoted = !quoted;
                in_token = true;
            }
            '\\' if quoted => match chars.next() {
                Some(next @ ('"' | '\\')) => current.push(next),
                Some(other) => {
                    current.push('\\');
                    current.push(other);
                }
                None => return Err(CommandError::UnterminatedQuote),
            },
            c if c.is_whitespace() && !quoted => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if quoted {
        return Err(CommandError::UnterminatedQuote);
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let tokens = tokenize(line)?;
    let Some((name, args)) = tokens.split_first() else {
        return Ok(None);
    };

    let command = match name.as_str() {
        "login" => match args {
            [email] => Command::Login {
                email: email.clone(),
                password: None,
            },
            [email, password] => Command::Login {
                email: email.clone(),
                password: Some(password.clone()),
            },
            _ => return Err(CommandError::Usage("login <email> [<password>]")),
        },
        "logout" => no_args(args, Command::Logout, "logout")?,
        "whoami" => no_args(args, Command::Whoami, "whoami")?,
        "tab" => match args {
            [tab] => Command::Tab(tab.parse().map_err(CommandError::Invalid)?),
            _ => return Err(CommandError::Usage("tab users|roles")),
        },
        "users" => no_args(args, Command::Users, "users")?,
        "search" => Command::Search(args.join(" ")),
        "status" => match args {
            [status] => Command::Status(invalid(status.parse())?),
            _ => return Err(CommandError::Usage("status all|active|inactive")),
        },
        "role-filter" => match args {
            [role] => Command::RoleFilter(invalid(role.parse())?),
            _ => return Err(CommandError::Usage("role-filter all|<role-id>")),
        },
        "sort" => match args {
            [field] => Command::Sort(invalid(field.parse())?),
            _ => return Err(CommandError::Usage("sort name|email|role")),
        },
        "add-user" => parse_add_user(args)?,
        "edit-user" => match args {
            [id, fields @ ..] if !fields.is_empty() => Command::EditUser {
                id: invalid(UserId::parse(id.as_str()))?,
                patch: parse_user_patch(fields)?,
            },
            _ => return Err(CommandError::Usage(EDIT_USER_USAGE)),
        },
        "passwd" => match args {
            [id, password @ ..] if password.len() <= 1 => Command::Passwd {
                id: invalid(UserId::parse(id.as_str()))?,
                password: password.first().cloned(),
            },
            _ => return Err(CommandError::Usage("passwd <user-id> [<password>]")),
        },
        "delete-user" => match args {
            [id] => Command::DeleteUser(invalid(UserId::parse(id.as_str()))?),
            _ => return Err(CommandError::Usage("delete-user <user-id>")),
        },
        "roles" => no_args(args, Command::Roles, "roles")?,
        "add-role" => match args {
            [name, permissions @ ..] => Command::AddRole {
                name: name.clone(),
                permissions: invalid(PermissionSet::parse_list(
                    &permissions.join(","),
                ))?,
            },
            _ => return Err(CommandError::Usage("add-role <name> [read,write,delete]")),
        },
        "edit-role" => match args {
            [id, fields @ ..] if !fields.is_empty() => Command::EditRole {
                id: invalid(RoleId::parse(id.as_str()))?,
                patch: parse_role_patch(fields)?,
            },
            _ => return Err(CommandError::Usage(EDIT_ROLE_USAGE)),
        },
        "delete-role" => match args {
            [id] => Command::DeleteRole(invalid(RoleId::parse(id.as_str()))?),
            _ => return Err(CommandError::Usage("delete-role <role-id>")),
        },
        "theme" => no_args(args, Command::Theme, "theme")?,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

const EDIT_USER_USAGE: &str =
    "edit-user <user-id> [name=..] [email=..] [role=..] [active=true|false]";
const EDIT_ROLE_USAGE: &str =
    "edit-role <role-id> [name=..] [permissions=read,write,delete]";

fn no_args(
    args: &[String],
    command: Command,
    usage: &'static str,
) -> Result<Command, CommandError> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(CommandError::Usage(usage))
    }
}

fn invalid<T, E: std::fmt::Display>(
    result: Result<T, E>,
) -> Result<T, CommandError> {
    result.map_err(|err| CommandError::Invalid(err.to_string()))
}

fn parse_add_user(args: &[String]) -> Result<Command, CommandError> {
    const USAGE: &str =
        "add-user <name> <email> [<password>] <role-id> [--inactive]";

    let (positional, flags): (Vec<&String>, Vec<&String>) =
        args.iter().partition(|arg| !arg.starts_with("--"));
    let is_active = match flags.as_slice() {
        [] => true,
        [flag] if flag.as_str() == "--inactive" => false,
        _ => return Err(CommandError::Usage(USAGE)),
    };

    let (name, email, password, role) = match positional.as_slice() {
        [name, email, role] => (name, email, None, role),
        [name, email, password, role] => {
            (name, email, Some(password.to_string()), role)
        }
        _ => return Err(CommandError::Usage(USAGE)),
    };
    Ok(Command::AddUser {
        name: name.to_string(),
        email: email.to_string(),
        password,
        role_id: invalid(RoleId::parse(role.as_str()))?,
        is_active,
    })
}

fn key_value(field: &str) -> Result<(&str, &str), CommandError> {
    field.split_once('=').ok_or_else(|| {
        CommandError::Invalid(format!("expected key=value, got `{field}`"))
    })
}

fn parse_flag(raw: &str) -> Result<bool, CommandError> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(CommandError::Invalid(format!("expected true or false, got `{raw}`"))),
    }
}

fn parse_user_patch(fields: &[String]) -> Result<UserPatch, CommandError> {
    let mut patch = UserPatch::default();
    for field in fields {
        patch = match key_value(field)? {
            ("name", value) => patch.name(value),
            ("email", value) => patch.email(value),
            ("role", value) => patch.role(invalid(RoleId::parse(value))?),
            ("active", value) => patch.active(parse_flag(value)?),
            (key, _) => {
                return Err(CommandError::Invalid(format!(
                    "unknown user field `{key}`"
                )));
            }
        };
    }
    Ok(patch)
}

fn parse_role_patch(fields: &[String]) -> Result<RolePatch, CommandError> {
    let mut patch = RolePatch::default();
    for field in fields {
        patch = match key_value(field)? {
            ("name", value) => patch.name(value),
            ("permissions", value) => {
                patch.permissions(invalid(PermissionSet::parse_list(value))?)
            }
            (key, _) => {
                return Err(CommandError::Invalid(format!(
                    "unknown role field `{key}`"
                )));
            }
        };
    }
    Ok(patch)
}
