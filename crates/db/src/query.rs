//! Builder for enriched listing queries.
//!
//! Every paginated listing in the system has the same shape: filter the
//! base table, join the owning user's public summary, compute derived
//! counters (like count, viewer-relative liked flag, comment count), keep
//! a fixed projection, sort by an allow-listed key, and window the result.
//! [`ListQuery`] produces the two SQL statements that shape requires:
//!
//! - `count_sql()` -- `SELECT COUNT(*)` over the same FROM/WHERE, so the
//!   total (and therefore `total_pages`) is always computed from the exact
//!   predicate the page query runs with;
//! - `page_sql()` -- the projected, ordered, windowed page query.
//!
//! Bind convention, in order: the predicate arguments (`$1..$n`, shared by
//! both statements), then -- page query only -- the viewer id when the
//! projection contains the `{viewer}` marker, then LIMIT and OFFSET. The
//! builder assigns those trailing indices so predicates and projections
//! can never collide.

use clipstream_core::sort::SortOrder;

/// Composable two-statement listing query. See the module docs for the
/// bind convention.
#[derive(Debug, Clone)]
pub struct ListQuery {
    projection: String,
    from: String,
    conditions: Vec<String>,
    predicate_params: usize,
    order_by: String,
}

impl ListQuery {
    /// Start a query over `from` (base table plus any joins).
    ///
    /// `projection` may contain the `{viewer}` marker wherever the
    /// accessing user's id belongs (liked flags); `predicate_params` is
    /// the number of `$n` placeholders the caller will use in filters.
    pub fn new(projection: &str, from: &str, predicate_params: usize) -> Self {
        Self {
            projection: projection.to_string(),
            from: from.to_string(),
            conditions: Vec::new(),
            predicate_params,
            order_by: String::new(),
        }
    }

    /// AND an additional predicate onto the WHERE clause.
    pub fn filter(mut self, condition: &str) -> Self {
        self.conditions.push(condition.to_string());
        self
    }

    /// Set the ORDER BY expression. `expr` must come from a sort
    /// allow-list, never from raw caller input.
    pub fn order_by(mut self, expr: &str, order: SortOrder) -> Self {
        self.order_by = format!("{expr} {}", order.as_sql());
        self
    }

    fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }

    fn has_viewer(&self) -> bool {
        self.projection.contains("{viewer}")
    }

    /// Index the page query expects the viewer id bound at, if any.
    pub fn viewer_index(&self) -> Option<usize> {
        self.has_viewer().then_some(self.predicate_params + 1)
    }

    /// `SELECT COUNT(*)` sharing this query's FROM and WHERE verbatim.
    pub fn count_sql(&self) -> String {
        format!("SELECT COUNT(*) FROM {}{}", self.from, self.where_clause())
    }

    /// The projected, ordered, LIMIT/OFFSET page query.
    pub fn page_sql(&self) -> String {
        let mut next = self.predicate_params + 1;
        let projection = if self.has_viewer() {
            let resolved = self.projection.replace("{viewer}", &format!("${next}"));
            next += 1;
            resolved
        } else {
            self.projection.clone()
        };
        let limit = next;
        let offset = next + 1;
        format!(
            "SELECT {projection} FROM {}{} ORDER BY {} LIMIT ${limit} OFFSET ${offset}",
            self.from,
            self.where_clause(),
            self.order_by,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ListQuery {
        ListQuery::new(
            "v.id, ({viewer} IS NOT NULL) AS is_liked",
            "videos v JOIN users u ON u.id = v.owner_id",
            2,
        )
        .filter("v.is_published = $1")
        .filter("v.owner_id = $2")
        .order_by("v.created_at", SortOrder::Desc)
    }

    #[test]
    fn count_shares_from_and_where() {
        assert_eq!(
            sample().count_sql(),
            "SELECT COUNT(*) FROM videos v JOIN users u ON u.id = v.owner_id \
             WHERE v.is_published = $1 AND v.owner_id = $2"
        );
    }

    #[test]
    fn page_appends_viewer_limit_offset_after_predicate_params() {
        let sql = sample().page_sql();
        assert!(sql.contains("($3 IS NOT NULL) AS is_liked"));
        assert!(sql.ends_with("ORDER BY v.created_at DESC LIMIT $4 OFFSET $5"));
    }

    #[test]
    fn viewer_index_matches_page_sql() {
        assert_eq!(sample().viewer_index(), Some(3));
    }

    #[test]
    fn no_viewer_marker_means_no_viewer_bind() {
        let q = ListQuery::new("p.id", "playlists p", 1)
            .filter("p.owner_id = $1")
            .order_by("p.created_at", SortOrder::Asc);
        assert_eq!(q.viewer_index(), None);
        assert!(q.page_sql().ends_with("ORDER BY p.created_at ASC LIMIT $2 OFFSET $3"));
    }

    #[test]
    fn no_filters_omits_where() {
        let q = ListQuery::new("v.id", "videos v", 0).order_by("v.views", SortOrder::Desc);
        assert_eq!(q.count_sql(), "SELECT COUNT(*) FROM videos v");
        assert_eq!(
            q.page_sql(),
            "SELECT v.id FROM videos v ORDER BY v.views DESC LIMIT $1 OFFSET $2"
        );
    }
}
