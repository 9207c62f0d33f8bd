//! Shared helper functions for SQLite repositories.

use crate::db::{PageSort, SortOrder};

/// Validate and map a sort field to the actual column name.
/// Returns None for invalid fields (falls back to default).
pub fn validate_sort_field(field: &str, allowed: &[&str]) -> Option<&'static str> {
    if !allowed.contains(&field) {
        return None;
    }
    // Return static str to avoid lifetime issues
    match field {
        "created_at" => Some("created_at"),
        "updated_at" => Some("updated_at"),
        _ => None,
    }
}

/// Build ORDER BY clause from PageSort parameters.
///
/// A rowid tiebreaker in the same direction keeps rows created within the
/// same second in a total order, so pagination never duplicates or drops
/// rows across pages.
pub fn build_order_clause(page: &PageSort, allowed_fields: &[&str], default_field: &str) -> String {
    let sort_field = page
        .sort_by
        .as_deref()
        .and_then(|f| validate_sort_field(f, allowed_fields))
        .unwrap_or(default_field);

    let order = match page.sort_order.unwrap_or_default() {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    };

    format!("ORDER BY {} {}, rowid {}", sort_field, order, order)
}

/// Build LIMIT/OFFSET clause from PageSort parameters.
/// Note: SQL requires LIMIT when using OFFSET. If offset is provided without
/// limit, we use LIMIT -1 (SQLite's "no limit" value).
pub fn build_limit_offset_clause(page: &PageSort) -> String {
    let mut clause = String::new();

    let has_offset = page.offset.is_some_and(|o| o > 0);

    if let Some(limit) = page.limit {
        clause.push_str(&format!(" LIMIT {}", limit));
    } else if has_offset {
        clause.push_str(" LIMIT -1");
    }

    if has_offset
        && let Some(offset) = page.offset
    {
        clause.push_str(&format!(" OFFSET {}", offset));
    }

    clause
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_clause_defaults_to_descending() {
        let page = PageSort::default();
        assert_eq!(
            build_order_clause(&page, &["updated_at", "created_at"], "updated_at"),
            "ORDER BY updated_at DESC, rowid DESC"
        );
    }

    #[test]
    fn order_clause_rejects_unknown_field() {
        let page = PageSort {
            sort_by: Some("password_hash".to_string()),
            ..Default::default()
        };
        assert_eq!(
            build_order_clause(&page, &["updated_at", "created_at"], "updated_at"),
            "ORDER BY updated_at DESC, rowid DESC"
        );
    }

    #[test]
    fn order_clause_ascending() {
        let page = PageSort {
            sort_by: Some("created_at".to_string()),
            sort_order: Some(SortOrder::Asc),
            ..Default::default()
        };
        assert_eq!(
            build_order_clause(&page, &["updated_at", "created_at"], "updated_at"),
            "ORDER BY created_at ASC, rowid ASC"
        );
    }

    #[test]
    fn limit_offset_clause_variants() {
        assert_eq!(build_limit_offset_clause(&PageSort::default()), "");

        let limited = PageSort {
            limit: Some(20),
            ..Default::default()
        };
        assert_eq!(build_limit_offset_clause(&limited), " LIMIT 20");

        let offset_only = PageSort {
            offset: Some(10),
            ..Default::default()
        };
        assert_eq!(build_limit_offset_clause(&offset_only), " LIMIT -1 OFFSET 10");

        let both = PageSort {
            limit: Some(20),
            offset: Some(40),
            ..Default::default()
        };
        assert_eq!(build_limit_offset_clause(&both), " LIMIT 20 OFFSET 40");
    }
}
