//! SQL for the filtered product listing.
//!
//! Products join their category and discount, both to-one relations, so a
//! product never appears twice; the count still uses `COUNT(DISTINCT p.id)`.

use sqlx::{Postgres, QueryBuilder};

use crate::domain::filter::contains_pattern;
use crate::domain::{Pagination, ProductFilter};
use crate::models::product::PRODUCT_COLUMNS;

fn push_from(qb: &mut QueryBuilder<'static, Postgres>, filter: &ProductFilter) {
    let category_join = if filter.requires_category() { "INNER JOIN" } else { "LEFT JOIN" };
    qb.push(" FROM products p ")
        .push(category_join)
        .push(" categories c ON c.id = p.category_id LEFT JOIN discounts d ON d.id = p.discount_id");
    push_where(qb, filter);
}

fn push_where(qb: &mut QueryBuilder<'static, Postgres>, filter: &ProductFilter) {
    let mut first = true;
    let mut clause = |qb: &mut QueryBuilder<'static, Postgres>| {
        qb.push(if first { " WHERE " } else { " AND " });
        first = false;
    };

    if let Some(term) = &filter.search {
        let pattern = contains_pattern(term);
        clause(qb);
        qb.push("(p.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR c.name ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if !filter.categories.is_empty() {
        // Both sides fold in Postgres so the comparison follows one collation.
        clause(qb);
        qb.push("LOWER(c.name) = ANY(SELECT LOWER(n) FROM UNNEST(")
            .push_bind(filter.categories.clone())
            .push("::text[]) AS n)");
    }
    if !filter.types.is_empty() {
        clause(qb);
        qb.push("p.type = ANY(").push_bind(filter.types.clone()).push(")");
    }
    if let Some(range) = &filter.price_range {
        clause(qb);
        qb.push("p.price BETWEEN ").push_bind(range.min).push(" AND ").push_bind(range.max);
    }
    if let Some(featured) = filter.featured {
        clause(qb);
        qb.push("p.is_featured = ").push_bind(featured);
    }
}

/// Page of products, newest first.
pub fn listing_query(filter: &ProductFilter, pagination: Pagination) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT ");
    qb.push(PRODUCT_COLUMNS);
    push_from(&mut qb, filter);
    qb.push(" ORDER BY p.created_at DESC, p.id DESC");
    if let Pagination::Paged { offset, limit } = pagination {
        qb.push(" LIMIT ").push_bind(limit).push(" OFFSET ").push_bind(offset);
    }
    qb
}

/// Number of products matching the filter, ignoring pagination.
pub fn count_query(filter: &ProductFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT COUNT(DISTINCT p.id)");
    push_from(&mut qb, filter);
    qb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PriceRange;
    use rust_decimal::Decimal;

    #[test]
    fn unfiltered_listing_left_joins_and_skips_pagination() {
        let qb = listing_query(&ProductFilter::default(), Pagination::All);
        let sql = qb.sql();
        assert!(sql.contains("LEFT JOIN categories c"));
        assert!(!sql.contains("WHERE"));
        assert!(!sql.contains("LIMIT"));
        assert!(sql.ends_with("ORDER BY p.created_at DESC, p.id DESC"));
    }

    #[test]
    fn search_forces_inner_join_and_matches_both_names() {
        let filter = ProductFilter { search: Some("lốp".into()), ..Default::default() };
        let qb = listing_query(&filter, Pagination::All);
        let sql = qb.sql();
        assert!(sql.contains("INNER JOIN categories c"));
        assert!(sql.contains("WHERE (p.name ILIKE $1 OR c.name ILIKE $2)"));
    }

    #[test]
    fn every_filter_is_bound_in_order() {
        let filter = ProductFilter {
            search: None,
            categories: vec!["Lốp xe".into()],
            types: vec!["tire".into(), "battery".into()],
            price_range: Some(PriceRange { min: Decimal::new(100, 0), max: Decimal::new(500, 0) }),
            featured: Some(true),
        };
        let qb = listing_query(&filter, Pagination::Paged { offset: 20, limit: 10 });
        let sql = qb.sql();
        assert!(sql.contains("INNER JOIN categories c"));
        assert!(sql.contains(
            "WHERE LOWER(c.name) = ANY(SELECT LOWER(n) FROM UNNEST($1::text[]) AS n) AND p.type = ANY($2) AND p.price BETWEEN $3 AND $4 AND p.is_featured = $5"
        ));
        assert!(sql.ends_with("LIMIT $6 OFFSET $7"));
    }

    #[test]
    fn count_shares_filters_without_ordering() {
        let filter = ProductFilter { featured: Some(false), ..Default::default() };
        let qb = count_query(&filter);
        let sql = qb.sql();
        assert!(sql.starts_with("SELECT COUNT(DISTINCT p.id) FROM products p LEFT JOIN"));
        assert!(sql.ends_with("WHERE p.is_featured = $1"));
        assert!(!sql.contains("ORDER BY"));
    }
}
