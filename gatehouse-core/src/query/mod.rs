//! User list query engine
//!
//! A [`UserQuery`] is applied to a snapshot of users and roles in three
//! steps: resolve each user's role display name, keep the rows matching the
//! search term and both filters, then stable-sort on the active field.
//! [`UserListView`] holds the query state the console edits and memoizes the
//! materialized rows per store revision.

pub mod filtering;
pub mod sorting;
pub mod types;
pub mod view;

use gatehouse_model::{Role, User};

pub use filtering::{RoleDirectory, UNKNOWN_ROLE, matches_query, matches_search};
pub use sorting::{compare_rows, locale_compare, sort_rows};
pub use types::{
    QueryParseError, RoleFilter, SortCriteria, SortDirection, SortField,
    StatusFilter, UserQuery, UserRow,
};
pub use view::UserListView;

/// Materialize the user list for `query`.
pub fn run_user_query(
    users: &[User],
    roles: &[Role],
    query: &UserQuery,
) -> Vec<UserRow> {
    let directory = RoleDirectory::new(roles);
    let term = query.search_term.to_lowercase();

    let mut rows: Vec<UserRow> = users
        .iter()
        .filter_map(|user| {
            let role_name = directory.display_name(&user.role_id);
            matches_query(user, role_name, query, &term).then(|| UserRow {
                user: user.clone(),
                role_name: role_name.to_string(),
            })
        })
        .collect();

    sort_rows(&mut rows, query.sort);
    rows
}
