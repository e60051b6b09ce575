//! Product listing filters, normalized from raw query parameters.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use std::str::FromStr;

/// Raw listing query string, exactly as clients send it.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingParams {
    pub search: Option<String>,
    pub categories: Option<String>,
    pub types: Option<String>,
    pub price_min: Option<String>,
    pub price_max: Option<String>,
    pub featured: Option<String>,
    #[serde(default, deserialize_with = "blank_or_integer")]
    pub offset: Option<i64>,
    #[serde(default, deserialize_with = "blank_or_integer")]
    pub limit: Option<i64>,
}

/// An empty value counts as absent; anything else must be an integer.
fn blank_or_integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriceRange { pub min: Decimal, pub max: Decimal }

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub categories: Vec<String>,
    pub types: Vec<String>,
    pub price_range: Option<PriceRange>,
    pub featured: Option<bool>,
}

impl ProductFilter {
    /// Category rows are required when filtering or searching on them.
    pub fn requires_category(&self) -> bool {
        self.search.is_some() || !self.categories.is_empty()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Pagination {
    Paged { offset: i64, limit: i64 },
    #[default]
    All,
}

impl ListingParams {
    pub fn into_query(self) -> (ProductFilter, Pagination) {
        let price_range = match (parse_decimal(self.price_min.as_deref()), parse_decimal(self.price_max.as_deref())) {
            (Some(min), Some(max)) => Some(PriceRange { min, max }),
            _ => None,
        };
        let filter = ProductFilter {
            search: self.search.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
            categories: split_list(self.categories.as_deref()),
            types: split_list(self.types.as_deref()),
            price_range,
            featured: self.featured.as_deref().map(parse_flag),
        };
        let pagination = match (self.offset, self.limit) {
            (Some(offset), Some(limit)) => Pagination::Paged { offset: offset.max(0), limit: limit.max(0) },
            _ => Pagination::All,
        };
        (filter, pagination)
    }
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn parse_decimal(raw: Option<&str>) -> Option<Decimal> {
    raw.and_then(|s| Decimal::from_str(s.trim()).ok())
}

/// `"true"` and `"1"` mean true; any other present value means false.
pub fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "true" | "1")
}

/// Escapes LIKE wildcards and wraps the term for a substring match.
pub fn contains_pattern(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    out.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') { out.push('\\'); }
        out.push(ch);
    }
    out.push('%');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_needs_both_bounds() {
        let p = ListingParams { offset: Some(10), ..Default::default() };
        assert_eq!(p.into_query().1, Pagination::All);
        let p = ListingParams { offset: Some(10), limit: Some(5), ..Default::default() };
        assert_eq!(p.into_query().1, Pagination::Paged { offset: 10, limit: 5 });
    }

    #[test]
    fn blank_pagination_values_mean_absent() {
        let p: ListingParams = serde_json::from_value(serde_json::json!({ "offset": "", "limit": " " })).unwrap();
        assert_eq!(p.into_query().1, Pagination::All);
        let p: ListingParams = serde_json::from_value(serde_json::json!({ "offset": "20", "limit": "10" })).unwrap();
        assert_eq!(p.into_query().1, Pagination::Paged { offset: 20, limit: 10 });
        assert!(serde_json::from_value::<ListingParams>(serde_json::json!({ "offset": "abc" })).is_err());
    }

    #[test]
    fn price_range_needs_both_bounds() {
        let p = ListingParams { price_min: Some("100".into()), ..Default::default() };
        assert_eq!(p.into_query().0.price_range, None);
        let p = ListingParams { price_min: Some("100".into()), price_max: Some("250.5".into()), ..Default::default() };
        assert_eq!(p.into_query().0.price_range, Some(PriceRange { min: Decimal::new(100, 0), max: Decimal::new(2505, 1) }));
    }

    #[test]
    fn featured_is_normalized_to_bool() {
        assert!(parse_flag("true"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("yes"));
        let p = ListingParams { featured: Some("false".into()), ..Default::default() };
        assert_eq!(p.into_query().0.featured, Some(false));
        assert_eq!(ListingParams::default().into_query().0.featured, None);
    }

    #[test]
    fn lists_are_split_and_trimmed() {
        let p = ListingParams { categories: Some("Lốp xe, Bình điện,,".into()), ..Default::default() };
        let (f, _) = p.into_query();
        assert_eq!(f.categories, vec!["Lốp xe".to_string(), "Bình điện".to_string()]);
        assert!(f.requires_category());
    }

    #[test]
    fn blank_search_is_ignored() {
        let p = ListingParams { search: Some("   ".into()), ..Default::default() };
        let (f, _) = p.into_query();
        assert_eq!(f.search, None);
        assert!(!f.requires_category());
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(contains_pattern("lốp"), "%lốp%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
    }
}
