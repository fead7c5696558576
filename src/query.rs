// Rickllow Listings - Query Composer
// Turns optional search/category parameters into bound WHERE fragments.
// All caller-supplied values travel as bound parameters, never spliced
// into the SQL text.

use crate::error::{Error, Result};

/// Location type literal for the "planets" category.
pub const TYPE_PLANET: &str = "Planet";

/// Location type literal for the "space-stations" category.
pub const TYPE_SPACE_STATION: &str = "Space Station";

// ============================================================================
// FILTER PREDICATE
// ============================================================================

/// Tagged filter predicate applied to the locations table.
///
/// Each variant maps to exactly one WHERE fragment plus its parameter
/// bindings, so there is a single place where filter SQL gets built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationFilter {
    /// No filtering; the full catalog.
    All,

    /// Case-insensitive substring match against name, type, or dimension.
    Search(String),

    /// Exact match on the location type.
    TypeEquals(&'static str),

    /// Location type is none of the given values ("misc" complement).
    TypeNotIn(&'static [&'static str]),
}

impl LocationFilter {
    /// Render this filter as a WHERE fragment plus its bound parameters.
    ///
    /// The fragment is empty for `All`, otherwise a complete
    /// `WHERE ...` clause referencing the locations table as `l`.
    /// Parameter placeholders are numbered from `?1`.
    pub fn predicate(&self) -> (String, Vec<String>) {
        match self {
            LocationFilter::All => (String::new(), Vec::new()),

            LocationFilter::Search(term) => (
                "WHERE lower(l.name) LIKE '%' || lower(?1) || '%' \
                 OR lower(l.type) LIKE '%' || lower(?1) || '%' \
                 OR lower(l.dimension) LIKE '%' || lower(?1) || '%'"
                    .to_string(),
                vec![term.clone()],
            ),

            LocationFilter::TypeEquals(ty) => {
                ("WHERE l.type = ?1".to_string(), vec![(*ty).to_string()])
            }

            LocationFilter::TypeNotIn(types) => {
                let clause = types
                    .iter()
                    .enumerate()
                    .map(|(i, _)| format!("l.type <> ?{}", i + 1))
                    .collect::<Vec<_>>()
                    .join(" AND ");

                (
                    format!("WHERE {}", clause),
                    types.iter().map(|ty| (*ty).to_string()).collect(),
                )
            }
        }
    }
}

// ============================================================================
// CATEGORY TOKEN
// ============================================================================

/// Pre-filter category token, as received from the frontend routes.
///
/// The caller is expected to lowercase the token before it arrives;
/// anything outside the four known tokens is a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Planets,
    SpaceStations,
    /// Not a type filter: returns the full catalog annotated with the
    /// dimension field. Regrouping by dimension happens on the frontend.
    Dimensions,
    Misc,
}

impl Category {
    /// Parse a category token, rejecting unknown values.
    pub fn parse(token: &str) -> Result<Category> {
        match token {
            "planets" => Ok(Category::Planets),
            "space-stations" => Ok(Category::SpaceStations),
            "dimensions" => Ok(Category::Dimensions),
            "misc" => Ok(Category::Misc),
            other => Err(Error::Validation(format!("No such category: {}", other))),
        }
    }

    /// The filter this category applies to the locations table.
    pub fn filter(&self) -> LocationFilter {
        match self {
            Category::Planets => LocationFilter::TypeEquals(TYPE_PLANET),
            Category::SpaceStations => LocationFilter::TypeEquals(TYPE_SPACE_STATION),
            Category::Misc => {
                LocationFilter::TypeNotIn(&[TYPE_PLANET, TYPE_SPACE_STATION])
            }
            Category::Dimensions => LocationFilter::All,
        }
    }

    /// Whether summary rows for this category carry the dimension field.
    pub fn includes_dimension(&self) -> bool {
        matches!(self, Category::Dimensions)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Planets => "planets",
            Category::SpaceStations => "space-stations",
            Category::Dimensions => "dimensions",
            Category::Misc => "misc",
        }
    }
}

/// Resolve an optional search term into a filter.
///
/// An absent or empty term means the unfiltered catalog, matching the
/// behavior of a bare `GET /locations`.
pub fn search_filter(search_term: Option<&str>) -> LocationFilter {
    match search_term {
        Some(term) if !term.is_empty() => LocationFilter::Search(term.to_string()),
        _ => LocationFilter::All,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_categories() {
        assert_eq!(Category::parse("planets").unwrap(), Category::Planets);
        assert_eq!(
            Category::parse("space-stations").unwrap(),
            Category::SpaceStations
        );
        assert_eq!(Category::parse("dimensions").unwrap(), Category::Dimensions);
        assert_eq!(Category::parse("misc").unwrap(), Category::Misc);
    }

    #[test]
    fn test_parse_unknown_category_is_validation_error() {
        let err = Category::parse("nonsense").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(err.to_string().contains("nonsense"));
    }

    #[test]
    fn test_all_filter_has_no_clause() {
        let (clause, params) = LocationFilter::All.predicate();
        assert!(clause.is_empty());
        assert!(params.is_empty());
    }

    #[test]
    fn test_search_filter_binds_term_once() {
        let (clause, params) =
            LocationFilter::Search("citadel".to_string()).predicate();
        assert!(clause.starts_with("WHERE"));
        // One bound parameter reused across the three columns
        assert_eq!(params, vec!["citadel".to_string()]);
        assert!(!clause.contains("citadel"));
    }

    #[test]
    fn test_type_filters_bind_values() {
        let (clause, params) = Category::Planets.filter().predicate();
        assert_eq!(clause, "WHERE l.type = ?1");
        assert_eq!(params, vec!["Planet".to_string()]);

        let (clause, params) = Category::Misc.filter().predicate();
        assert_eq!(clause, "WHERE l.type <> ?1 AND l.type <> ?2");
        assert_eq!(
            params,
            vec!["Planet".to_string(), "Space Station".to_string()]
        );
    }

    #[test]
    fn test_dimensions_category_is_unfiltered() {
        assert_eq!(Category::Dimensions.filter(), LocationFilter::All);
        assert!(Category::Dimensions.includes_dimension());
        assert!(!Category::Planets.includes_dimension());
    }

    #[test]
    fn test_search_filter_helper() {
        assert_eq!(search_filter(None), LocationFilter::All);
        assert_eq!(search_filter(Some("")), LocationFilter::All);
        assert_eq!(
            search_filter(Some("earth")),
            LocationFilter::Search("earth".to_string())
        );
    }
}
