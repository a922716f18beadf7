//! Interactive command loop.
//!
//! Every dashboard command passes the session gate first: without a session
//! the console falls back to the login view. Creating and editing needs the
//! `write` permission, deleting needs `delete`. Passwords left off a command
//! line are asked for only after that check passes.

use std::io::Write;

use anyhow::Result;
use gatehouse_config::{DisplayPreferences, PreferenceStore};
use gatehouse_core::{
    Access, DashboardTab, EntityStore, Guard, Navigator, PermissionChecker,
    SessionGate, UserListView, View,
};
use gatehouse_model::prelude::{NewUser, Permission};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::command::{self, Command};
use crate::prompt::{NoTerminal, SecretPrompt};
use crate::render;

const LOGIN_FAILED: &str = "Invalid email or password";
const SIGN_IN_FIRST: &str = "Please sign in first";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Shell<W> {
    store: EntityStore,
    preferences: PreferenceStore,
    theme: DisplayPreferences,
    navigator: Navigator,
    users: UserListView,
    secrets: Box<dyn SecretPrompt>,
    out: W,
}

impl<W> std::fmt::Debug for Shell<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shell")
            .field("store", &self.store)
            .field("view", &self.navigator.current())
            .field("theme", &self.theme)
            .finish_non_exhaustive()
    }
}

impl<W: Write> Shell<W> {
    pub fn new(
        store: EntityStore,
        preferences: PreferenceStore,
        out: W,
    ) -> Self {
        let theme = preferences.load();
        Self {
            store,
            preferences,
            theme,
            navigator: Navigator::new(),
            users: UserListView::new(),
            secrets: Box::new(NoTerminal),
            out,
        }
    }

    /// Where passwords left off a command line are read from.
    pub fn with_secret_prompt(
        mut self,
        secrets: impl SecretPrompt + 'static,
    ) -> Self {
        self.secrets = Box::new(secrets);
        self
    }

    pub fn into_output(self) -> W {
        self.out
    }

    fn greet(&mut self) -> Result<()> {
        writeln!(
            self.out,
            "Gatehouse admin console ({} theme). Type `help` for commands.",
            self.theme.theme_name()
        )?;
        Ok(())
    }

    fn prompt(&self) -> String {
        format!("{}> ", self.navigator.current())
    }

    /// Read and execute lines until `quit` or end of input.
    pub async fn run<R>(&mut self, input: R) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        self.greet()?;

        let mut lines = input.lines();
        loop {
            let prompt = self.prompt();
            write!(self.out, "{prompt}")?;
            self.out.flush()?;

            let Some(line) = lines.next_line().await? else {
                writeln!(self.out)?;
                break;
            };
            if self.handle_line(&line).await? == Flow::Quit {
                break;
            }
        }
        Ok(())
    }

    /// Terminal session: line editing and history through `editor`.
    /// Ctrl-C clears the line, Ctrl-D leaves.
    pub async fn run_interactive(
        &mut self,
        editor: &mut DefaultEditor,
    ) -> Result<()> {
        self.greet()?;
        self.out.flush()?;

        loop {
            let line = match editor.readline(&self.prompt()) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err.into()),
            };
            if command::is_recordable(&line)
                && let Err(err) = editor.add_history_entry(line.trim())
            {
                debug!(error = %err, "history entry dropped");
            }
            if self.handle_line(&line).await? == Flow::Quit {
                break;
            }
        }
        Ok(())
    }

    async fn handle_line(&mut self, line: &str) -> Result<Flow> {
        match command::parse(line) {
            Ok(None) => Ok(Flow::Continue),
            Ok(Some(command)) => self.execute(command).await,
            Err(err) => {
                writeln!(self.out, "error: {err}")?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Execute one command. Only failures of the credential path or the
    /// output stream are returned as errors.
    pub async fn execute(&mut self, command: Command) -> Result<Flow> {
        debug!(command = command.name(), "executing");
        match command {
            Command::Login { email, password } => {
                let Some(password) = self.secret(password, "Password")? else {
                    return Ok(Flow::Continue);
                };
                let succeeded = self.store.login(&email, &password).await?;
                let session = self.store.session();
                self.navigator.on_login(succeeded, &session);
                match session.user() {
                    Some(user) if succeeded => {
                        writeln!(self.out, "Signed in as {}", user.name)?
                    }
                    _ => writeln!(self.out, "{LOGIN_FAILED}")?,
                }
            }
            Command::Logout => {
                self.store.logout();
                self.navigator.on_logout();
                writeln!(self.out, "Signed out")?;
            }
            Command::Whoami => {
                let session = self.store.session();
                let mut text = render::whoami(&session);
                if session.is_authenticated() {
                    let checker = PermissionChecker::new(&session);
                    text.push_str(&format!(" | access: {}", checker.access_level()));
                    if checker.is_admin() {
                        text.push_str(" (administrator)");
                    }
                }
                writeln!(self.out, "{text}")?;
            }
            Command::Tab(tab) => {
                if self.open(tab)? {
                    self.show_tab(tab)?;
                }
            }
            Command::Users => {
                if self.open(DashboardTab::Users)? {
                    self.show_users()?;
                }
            }
            Command::Search(term) => {
                if self.open(DashboardTab::Users)? {
                    self.users.set_search_term(term);
                    self.show_users()?;
                }
            }
            Command::Status(status) => {
                if self.open(DashboardTab::Users)? {
                    self.users.set_status_filter(status);
                    self.show_users()?;
                }
            }
            Command::RoleFilter(role) => {
                if self.open(DashboardTab::Users)? {
                    self.users.set_role_filter(role);
                    self.show_users()?;
                }
            }
            Command::Sort(field) => {
                if self.open(DashboardTab::Users)? {
                    self.users.sort_by(field);
                    self.show_users()?;
                }
            }
            Command::AddUser {
                name,
                email,
                password,
                role_id,
                is_active,
            } => {
                if self.authorize(Permission::Write)? {
                    let Some(password) =
                        self.secret(password, "Password for the new user")?
                    else {
                        return Ok(Flow::Continue);
                    };
                    let new_user =
                        NewUser::new(name, email, password.as_str(), role_id)
                            .active(is_active);
                    let id = self.store.add_user(new_user).await?;
                    writeln!(self.out, "Created user {id}")?;
                }
            }
            Command::EditUser { id, patch } => {
                if self.authorize(Permission::Write)? {
                    if self.store.update_user(&id, patch) {
                        writeln!(self.out, "Updated user {id}")?;
                    } else {
                        writeln!(self.out, "No user with id {id}")?;
                    }
                }
            }
            Command::Passwd { id, password } => {
                if self.authorize(Permission::Write)? {
                    if self.store.user(&id).is_none() {
                        writeln!(self.out, "No user with id {id}")?;
                        return Ok(Flow::Continue);
                    }
                    let Some(password) = self.secret(password, "New password")?
                    else {
                        return Ok(Flow::Continue);
                    };
                    if self.store.set_password(&id, password.as_str()).await? {
                        writeln!(self.out, "Password changed for {id}")?;
                    } else {
                        writeln!(self.out, "No user with id {id}")?;
                    }
                }
            }
            Command::DeleteUser(id) => {
                if self.authorize(Permission::Delete)? {
                    if self.store.delete_user(&id) {
                        writeln!(self.out, "Deleted user {id}")?;
                        let session = self.store.session();
                        if !session.is_authenticated() {
                            self.navigator.refresh(&session);
                            writeln!(self.out, "Your account was deleted; signed out")?;
                        }
                    } else {
                        writeln!(self.out, "No user with id {id}")?;
                    }
                }
            }
            Command::Roles => {
                if self.open(DashboardTab::Roles)? {
                    self.show_roles()?;
                }
            }
            Command::AddRole { name, permissions } => {
                if self.authorize(Permission::Write)? {
                    let id = self.store.add_role(name, permissions);
                    writeln!(self.out, "Created role {id}")?;
                }
            }
            Command::EditRole { id, patch } => {
                if self.authorize(Permission::Write)? {
                    if self.store.update_role(&id, patch) {
                        writeln!(self.out, "Updated role {id}")?;
                    } else {
                        writeln!(self.out, "No role with id {id}")?;
                    }
                }
            }
            Command::DeleteRole(id) => {
                if self.authorize(Permission::Delete)? {
                    if self.store.delete_role(&id) {
                        writeln!(self.out, "Deleted role {id}")?;
                    } else {
                        writeln!(self.out, "No role with id {id}")?;
                    }
                }
            }
            Command::Theme => match self.preferences.toggle_theme() {
                Ok(theme) => {
                    self.theme = theme;
                    writeln!(self.out, "Theme: {}", theme.theme_name())?;
                }
                Err(err) => {
                    warn!(error = %err, "theme change not saved");
                    writeln!(self.out, "error: {err}")?;
                }
            },
            Command::Help => write!(self.out, "{}", render::HELP)?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// The inline password, or one read from the secret prompt. A failed
    /// prompt is reported and yields `None`.
    fn secret(
        &mut self,
        inline: Option<String>,
        label: &str,
    ) -> Result<Option<Zeroizing<String>>> {
        if let Some(password) = inline {
            return Ok(Some(Zeroizing::new(password)));
        }
        match self.secrets.read_secret(label) {
            Ok(secret) => Ok(Some(secret)),
            Err(err) => {
                writeln!(self.out, "error: {err}")?;
                Ok(None)
            }
        }
    }

    /// Navigate to a dashboard tab through the view guard.
    fn open(&mut self, tab: DashboardTab) -> Result<bool> {
        let target = View::Dashboard(tab);
        let session = self.store.session();
        if self.navigator.navigate(target, &session) == target {
            return Ok(true);
        }
        writeln!(self.out, "{SIGN_IN_FIRST}")?;
        Ok(false)
    }

    /// Gate a mutating command on the signed-in user's permissions.
    fn authorize(&mut self, permission: Permission) -> Result<bool> {
        let session = self.store.session();
        match SessionGate::evaluate(&session, &Guard::permission(permission)) {
            Access::Allowed => Ok(true),
            Access::Unauthenticated => {
                self.navigator.refresh(&session);
                writeln!(self.out, "{SIGN_IN_FIRST}")?;
                Ok(false)
            }
            Access::Forbidden => {
                writeln!(
                    self.out,
                    "Permission denied: requires `{permission}`"
                )?;
                Ok(false)
            }
        }
    }

    fn show_tab(&mut self, tab: DashboardTab) -> Result<()> {
        match tab {
            DashboardTab::Users => self.show_users(),
            DashboardTab::Roles => self.show_roles(),
        }
    }

    fn show_users(&mut self) -> Result<()> {
        let rows = self.users.rows(&self.store);
        write!(self.out, "{}", render::users(&rows, self.users.query()))?;
        Ok(())
    }

    fn show_roles(&mut self) -> Result<()> {
        write!(self.out, "{}", render::roles(&self.store.roles()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use gatehouse_core::{AuthCrypto, SeedAccount};
    use tempfile::TempDir;

    use super::*;
    use crate::prompt::PromptError;

    /// Answers every password prompt from a fixed list, recording labels.
    struct Answers {
        secrets: Vec<&'static str>,
        asked: Arc<parking_lot::Mutex<Vec<String>>>,
    }

    impl SecretPrompt for Answers {
        fn read_secret(
            &mut self,
            label: &str,
        ) -> Result<Zeroizing<String>, PromptError> {
            self.asked.lock().push(label.to_string());
            if self.secrets.is_empty() {
                return Err(PromptError::NoTerminal);
            }
            Ok(Zeroizing::new(self.secrets.remove(0).to_string()))
        }
    }

    async fn shell(prefs: &TempDir) -> Shell<Vec<u8>> {
        let hasher =
            Arc::new(AuthCrypto::with_cost("test-pepper", 1024, 1, 1).unwrap());
        let store = EntityStore::bootstrap(hasher, SeedAccount::default())
            .await
            .unwrap();
        Shell::new(store, PreferenceStore::new(prefs.path()), Vec::new())
    }

    async fn script(lines: &str) -> (String, TempDir) {
        let prefs = tempfile::tempdir().unwrap();
        let mut shell = shell(&prefs).await;
        shell.run(lines.as_bytes()).await.unwrap();
        let output = String::from_utf8(shell.into_output()).unwrap();
        (output, prefs)
    }

    async fn script_with_answers(
        lines: &str,
        secrets: Vec<&'static str>,
    ) -> (String, Vec<String>) {
        let prefs = tempfile::tempdir().unwrap();
        let asked = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let mut shell = shell(&prefs).await.with_secret_prompt(Answers {
            secrets,
            asked: Arc::clone(&asked),
        });
        shell.run(lines.as_bytes()).await.unwrap();
        let output = String::from_utf8(shell.into_output()).unwrap();
        let asked = asked.lock().clone();
        (output, asked)
    }

    #[tokio::test]
    async fn dashboard_requires_sign_in() {
        let (out, _prefs) = script("users\ntab roles\n").await;
        assert_eq!(out.matches(SIGN_IN_FIRST).count(), 2);
        assert!(!out.contains("dashboard/"));
    }

    #[tokio::test]
    async fn failed_logins_share_one_message() {
        let (out, _prefs) = script(
            "login admin@example.com wrong\nlogin nobody@example.com admin123\n",
        )
        .await;
        assert_eq!(out.matches(LOGIN_FAILED).count(), 2);
    }

    #[tokio::test]
    async fn admin_session_manages_users() {
        let (out, _prefs) = script(
            "login admin@example.com admin123\n\
             add-user \"Bob Stone\" bob@example.com pw user --inactive\n\
             status inactive\n\
             whoami\n",
        )
        .await;
        assert!(out.contains("Signed in as Admin User"));
        assert!(out.contains("dashboard/users> "));
        assert!(out.contains("Created user "));
        assert!(out.contains("Bob Stone"));
        assert!(out.contains("1 user(s)"));
        assert!(out.contains("(administrator)"));
    }

    #[tokio::test]
    async fn read_only_users_cannot_mutate() {
        let (out, _prefs) = script(
            "login admin@example.com admin123\n\
             add-user Reader reader@example.com pw user\n\
             logout\n\
             login reader@example.com pw\n\
             add-role Ops read\n\
             delete-user admin\n\
             users\n",
        )
        .await;
        assert!(out.contains("Signed in as Reader"));
        assert!(out.contains("Permission denied: requires `write`"));
        assert!(out.contains("Permission denied: requires `delete`"));
        assert!(out.contains("2 user(s)"));
    }

    #[tokio::test]
    async fn deleting_own_account_signs_out() {
        let (out, _prefs) =
            script("login admin@example.com admin123\ndelete-user admin\nusers\n")
                .await;
        assert!(out.contains("Your account was deleted; signed out"));
        assert!(out.ends_with("login> \n"));
        assert!(out.contains(SIGN_IN_FIRST));
    }

    #[tokio::test]
    async fn missing_passwords_are_read_from_the_prompt() {
        let (out, asked) = script_with_answers(
            "login admin@example.com\n\
             add-user Ann ann@example.com user\n\
             logout\n\
             login ann@example.com\n",
            vec!["admin123", "ann-secret", "ann-secret"],
        )
        .await;
        assert_eq!(asked, ["Password", "Password for the new user", "Password"]);
        assert!(out.contains("Signed in as Admin User"));
        assert!(out.contains("Created user "));
        assert!(out.contains("Signed in as Ann"));
        assert!(!out.contains("ann-secret"));
    }

    #[tokio::test]
    async fn forbidden_commands_never_prompt() {
        let (out, asked) = script_with_answers(
            "passwd admin\nlogin admin@example.com admin123\npasswd ghost\n",
            vec![],
        )
        .await;
        assert!(asked.is_empty());
        assert!(out.contains(SIGN_IN_FIRST));
        assert!(out.contains("No user with id ghost"));
    }

    #[tokio::test]
    async fn piped_input_without_password_reports_and_continues() {
        let (out, _prefs) =
            script("login admin@example.com\nlogin admin@example.com admin123\n")
                .await;
        assert!(out.contains("error: password required"));
        assert!(out.contains("Signed in as Admin User"));
    }

    #[tokio::test]
    async fn theme_toggle_is_persisted() {
        let (out, prefs) = script("theme\nquit\n").await;
        assert!(out.starts_with("Gatehouse admin console (light theme)"));
        assert!(out.contains("Theme: dark"));
        assert!(PreferenceStore::new(prefs.path()).load().is_dark);
    }

    #[tokio::test]
    async fn parse_errors_do_not_end_the_session() {
        let (out, _prefs) = script("frobnicate\nlogin \"unterminated\nhelp\n").await;
        assert!(out.contains("error: unknown command `frobnicate`"));
        assert!(out.contains("error: unterminated quote"));
        assert!(out.contains("add-user <name>"));
    }
}
