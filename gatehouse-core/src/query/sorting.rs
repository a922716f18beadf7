use std::cmp::Ordering;

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use super::types::{SortCriteria, SortDirection, SortField, UserRow};

/// Human-oriented string ordering.
///
/// Levels, each consulted only when the previous one ties:
///
/// 1. base letters, ignoring accents and case (`Émile` sorts with `Emile`)
/// 2. accents, unaccented first
/// 3. case, lowercase first at the first position differing only by case
/// 4. the raw strings
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| with_accents(a).cmp(with_accents(b)))
        .then_with(|| case_order(a, b))
        .then_with(|| a.cmp(b))
}

fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

fn with_accents(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().flat_map(char::to_lowercase)
}

fn case_order(a: &str, b: &str) -> Ordering {
    for (left, right) in a.nfd().zip(b.nfd()) {
        if left == right {
            continue;
        }
        match (left.is_lowercase(), right.is_lowercase()) {
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => {}
        }
    }
    Ordering::Equal
}

/// Compare two rows on the active sort field and direction.
pub fn compare_rows(a: &UserRow, b: &UserRow, sort: SortCriteria) -> Ordering {
    let ord = match sort.field {
        SortField::Name => locale_compare(&a.user.name, &b.user.name),
        SortField::Email => locale_compare(&a.user.email, &b.user.email),
        SortField::Role => locale_compare(&a.role_name, &b.role_name),
    };

    match sort.direction {
        SortDirection::Ascending => ord,
        SortDirection::Descending => ord.reverse(),
    }
}

/// Stable sort: rows comparing equal keep their relative order in either
/// direction.
pub fn sort_rows(rows: &mut [UserRow], sort: SortCriteria) {
    rows.sort_by(|a, b| compare_rows(a, b, sort));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_insensitive_before_case_tiebreak() {
        assert_eq!(locale_compare("amy", "Bob"), Ordering::Less);
        assert_eq!(locale_compare("Bob", "amy"), Ordering::Greater);
        assert_eq!(locale_compare("amy", "Amy"), Ordering::Less);
        assert_eq!(locale_compare("Amy", "Amy"), Ordering::Equal);
    }

    #[test]
    fn accents_fold_to_their_base_letter() {
        assert_eq!(locale_compare("Émile", "Zoe"), Ordering::Less);
        assert_eq!(locale_compare("Adam", "Émile"), Ordering::Less);
        assert_eq!(locale_compare("Ångström", "Bo"), Ordering::Less);
        assert_eq!(locale_compare("ça", "cb"), Ordering::Less);
    }

    #[test]
    fn unaccented_sorts_before_accented_then_case() {
        assert_eq!(locale_compare("emile", "émile"), Ordering::Less);
        assert_eq!(locale_compare("Emile", "émile"), Ordering::Less);
        assert_eq!(locale_compare("émile", "Émile"), Ordering::Less);
        // Precomposed and decomposed forms differ only at the last level.
        assert_ne!(locale_compare("\u{e9}", "e\u{301}"), Ordering::Equal);
        assert_eq!(
            locale_compare("\u{e9}x", "e\u{301}y"),
            Ordering::Less
        );
    }

    #[test]
    fn prefix_sorts_first() {
        assert_eq!(locale_compare("Ann", "Anna"), Ordering::Less);
        assert_eq!(locale_compare("", "a"), Ordering::Less);
    }
}
