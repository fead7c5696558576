// Rickllow Listings - Aggregator & Catalog Operations
// The three read operations the frontend consumes, plus the reshaping of
// flat rows into nested documents.
//
// The aggregation hazard here is JOIN fan-out: joining a location against
// both its images and its reviews in one flat query yields the
// images x reviews cross-product, and naive grouping then duplicates every
// child. The detail path therefore resolves each one-to-many relation with
// its own name-scoped query and merges the independently-built arrays into
// the final document. Adding another sibling collection later is one more
// query, not a combinatorial rewrite.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::db;
use crate::error::{Error, Result};
use crate::query::{self, Category};

// ============================================================================
// DOCUMENT SHAPES
// ============================================================================

/// Minimal per-location fields for list views (one frontend card each).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryDoc {
    pub name: String,
    pub cost: f64,
    #[serde(rename = "altCostCurrency")]
    pub alt_cost_currency: String,
    #[serde(rename = "altCostAmount")]
    pub alt_cost_amount: f64,
    pub image: Option<String>,
    /// Present only for the "dimensions" category view.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension: Option<String>,
}

/// One review inside a detail document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewDoc {
    pub id: i64,
    #[serde(rename = "userUsername")]
    pub user_username: String,
    pub text: String,
}

/// Agent object inside a detail document. A location with no assigned
/// agent still carries this object with null fields, never an omitted key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentDoc {
    pub name: Option<String>,
    pub image: Option<String>,
}

/// Full per-location document for the detail view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailDoc {
    pub name: String,
    #[serde(rename = "type")]
    pub location_type: String,
    pub dimension: String,
    pub description: String,
    pub cost: f64,
    #[serde(rename = "altCostCurrency")]
    pub alt_cost_currency: String,
    #[serde(rename = "altCostAmount")]
    pub alt_cost_amount: f64,
    pub neighborhood: String,
    pub images: Vec<String>,
    pub reviews: Vec<ReviewDoc>,
    pub agent: AgentDoc,
}

impl From<db::SummaryRow> for SummaryDoc {
    fn from(row: db::SummaryRow) -> Self {
        Self {
            name: row.name,
            cost: row.cost,
            alt_cost_currency: row.alt_cost_curr,
            alt_cost_amount: row.alt_cost_amt,
            image: row.image,
            dimension: row.dimension,
        }
    }
}

impl From<db::ReviewRow> for ReviewDoc {
    fn from(row: db::ReviewRow) -> Self {
        Self {
            id: row.id,
            user_username: row.user_username,
            text: row.text,
        }
    }
}

// ============================================================================
// OPERATIONS
// ============================================================================

/// All location summaries, optionally narrowed by a case-insensitive
/// substring match against name, type, or dimension. Ordered by name.
pub fn list(conn: &Connection, search_term: Option<&str>) -> Result<Vec<SummaryDoc>> {
    let filter = query::search_filter(search_term);
    let rows = db::summary_rows(conn, &filter, false)?;

    Ok(rows.into_iter().map(SummaryDoc::from).collect())
}

/// Location summaries for one of the frontend's pre-filtered categories.
///
/// planets/space-stations/misc filter on the type column; dimensions
/// returns everything with the dimension field attached, since regrouping
/// by dimension is the frontend's job. Unknown tokens are rejected.
pub fn list_by_category(conn: &Connection, category: &str) -> Result<Vec<SummaryDoc>> {
    let category = Category::parse(category)?;
    let rows = db::summary_rows(conn, &category.filter(), category.includes_dimension())?;

    Ok(rows.into_iter().map(SummaryDoc::from).collect())
}

/// The full nested document for one location, or NotFound.
///
/// Images and reviews are each fetched by their own query scoped only by
/// the location name (phase 1), then merged with the scalar row and agent
/// lookup (phase 2). Empty collections come back as empty arrays.
pub fn get_by_name(conn: &Connection, name: &str) -> Result<DetailDoc> {
    let row = db::location_row(conn, name)?.ok_or_else(|| {
        Error::NotFound(format!("No location found with name of '{}'", name))
    })?;

    let images = db::image_names(conn, name)?;
    let reviews = db::review_rows(conn, name)?
        .into_iter()
        .map(ReviewDoc::from)
        .collect();

    Ok(DetailDoc {
        name: row.name,
        location_type: row.location_type,
        dimension: row.dimension,
        description: row.description,
        cost: row.cost,
        alt_cost_currency: row.alt_cost_curr,
        alt_cost_amount: row.alt_cost_amt,
        neighborhood: row.neighborhood,
        images,
        reviews,
        agent: AgentDoc {
            name: row.agent_name,
            image: row.agent_image,
        },
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{
        insert_agent, insert_image, insert_location, insert_review, setup_database,
        LocationRecord,
    };

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        conn
    }

    fn add_location(conn: &Connection, name: &str, location_type: &str, agent: Option<&str>) {
        insert_location(
            conn,
            &LocationRecord {
                name: name.to_string(),
                location_type: location_type.to_string(),
                dimension: "C-137".to_string(),
                description: format!("{} description", name),
                cost: 1000.0,
                alt_cost_curr: "Flurbos".to_string(),
                alt_cost_amt: 50.0,
                neighborhood: "Somewhere".to_string(),
                agent_name: agent.map(str::to_string),
            },
        )
        .unwrap();
    }

    /// Location with n images and m reviews, for the fan-out matrix.
    fn add_location_with_children(conn: &Connection, name: &str, n_images: usize, m_reviews: usize) {
        add_location(conn, name, "Planet", None);

        for i in 0..n_images {
            insert_image(conn, name, &format!("{}-img-{}.png", name, i)).unwrap();
        }
        for i in 0..m_reviews {
            insert_review(conn, name, &format!("user_{}", i), "Would visit again.").unwrap();
        }
    }

    #[test]
    fn test_no_fan_out_across_image_review_counts() {
        let conn = test_conn();

        // Independently varying child counts, including both zero cases
        let matrix = [(0usize, 0usize), (2, 3), (3, 2), (1, 0), (0, 1)];

        for (idx, (n, m)) in matrix.iter().enumerate() {
            let name = format!("Loc-{}", idx);
            add_location_with_children(&conn, &name, *n, *m);

            let doc = get_by_name(&conn, &name).unwrap();
            assert_eq!(doc.images.len(), *n, "image count for (n={}, m={})", n, m);
            assert_eq!(doc.reviews.len(), *m, "review count for (n={}, m={})", n, m);
        }
    }

    #[test]
    fn test_empty_collections_are_empty_arrays() {
        let conn = test_conn();
        add_location(&conn, "Bare Rock", "Planet", None);

        let doc = get_by_name(&conn, "Bare Rock").unwrap();
        assert!(doc.images.is_empty());
        assert!(doc.reviews.is_empty());

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["images"], serde_json::json!([]));
        assert_eq!(json["reviews"], serde_json::json!([]));
    }

    #[test]
    fn test_children_are_deduplicated_exactly() {
        let conn = test_conn();
        add_location(&conn, "Citadel of Ricks", "Space Station", None);
        insert_image(&conn, "Citadel of Ricks", "c.png").unwrap();
        insert_review(&conn, "Citadel of Ricks", "rick_prime", "Overrated.").unwrap();
        insert_review(&conn, "Citadel of Ricks", "morty_c137", "Too many Ricks.").unwrap();

        let doc = get_by_name(&conn, "Citadel of Ricks").unwrap();

        // 1 image x 2 reviews must not become 2 images or 2x reviews
        assert_eq!(doc.images, vec!["c.png"]);
        assert_eq!(doc.reviews.len(), 2);
        assert_eq!(doc.reviews[0].user_username, "rick_prime");
        assert_eq!(doc.reviews[1].user_username, "morty_c137");
    }

    #[test]
    fn test_get_by_name_unknown_is_not_found() {
        let conn = test_conn();
        add_location(&conn, "Earth (C-137)", "Planet", None);

        let err = get_by_name(&conn, "Earth (C-500A)").unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert!(err.to_string().contains("Earth (C-500A)"));
    }

    #[test]
    fn test_missing_agent_degenerates_to_null_fields() {
        let conn = test_conn();
        insert_agent(&conn, "Birdperson", "birdperson.png").unwrap();
        add_location(&conn, "Bird World", "Planet", Some("Birdperson"));
        add_location(&conn, "Orphan Rock", "Planet", None);

        let with_agent = get_by_name(&conn, "Bird World").unwrap();
        assert_eq!(with_agent.agent.name.as_deref(), Some("Birdperson"));
        assert_eq!(with_agent.agent.image.as_deref(), Some("birdperson.png"));

        let without = get_by_name(&conn, "Orphan Rock").unwrap();
        assert_eq!(without.agent, AgentDoc { name: None, image: None });

        // The agent key is present with null fields, never omitted
        let json = serde_json::to_value(&without).unwrap();
        assert_eq!(
            json["agent"],
            serde_json::json!({ "name": null, "image": null })
        );
    }

    #[test]
    fn test_detail_doc_wire_keys() {
        let conn = test_conn();
        add_location(&conn, "Gazorpazorp", "Planet", None);
        insert_review(&conn, "Gazorpazorp", "summz", "Strong matriarchy.").unwrap();

        let doc = get_by_name(&conn, "Gazorpazorp").unwrap();
        let json = serde_json::to_value(&doc).unwrap();

        assert_eq!(json["type"], "Planet");
        assert!(json["altCostCurrency"].is_string());
        assert!(json["altCostAmount"].is_number());
        assert_eq!(json["reviews"][0]["userUsername"], "summz");
    }

    #[test]
    fn test_list_without_term_returns_all_sorted() {
        let conn = test_conn();
        add_location(&conn, "Venzenulon 7", "Planet", None);
        add_location(&conn, "Anatomy Park", "Theme Park", None);
        add_location(&conn, "Citadel of Ricks", "Space Station", None);

        let docs = list(&conn, None).unwrap();
        let names: Vec<&str> = docs.iter().map(|d| d.name.as_str()).collect();

        assert_eq!(names, vec!["Anatomy Park", "Citadel of Ricks", "Venzenulon 7"]);
    }

    #[test]
    fn test_list_search_is_case_insensitive_substring() {
        let conn = test_conn();
        add_location(&conn, "Earth (C-137)", "Planet", None);
        add_location(&conn, "Citadel of Ricks", "Space Station", None);

        // Substring of a name, different case
        let by_name = list(&conn, Some("CITADEL")).unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].name, "Citadel of Ricks");

        // Substring of a type
        let by_type = list(&conn, Some("station")).unwrap();
        assert_eq!(by_type.len(), 1);
        assert_eq!(by_type[0].name, "Citadel of Ricks");

        // Substring of a dimension, matches everything seeded here
        let by_dimension = list(&conn, Some("c-13")).unwrap();
        assert_eq!(by_dimension.len(), 2);

        let nothing = list(&conn, Some("gromflomite")).unwrap();
        assert!(nothing.is_empty());
    }

    #[test]
    fn test_category_type_partition() {
        let conn = test_conn();
        add_location(&conn, "Earth (C-137)", "Planet", None);
        add_location(&conn, "Gazorpazorp", "Planet", None);
        add_location(&conn, "Citadel of Ricks", "Space Station", None);
        add_location(&conn, "Anatomy Park", "Theme Park", None);

        let planets = list_by_category(&conn, "planets").unwrap();
        let planet_names: Vec<&str> = planets.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(planet_names, vec!["Earth (C-137)", "Gazorpazorp"]);

        let stations = list_by_category(&conn, "space-stations").unwrap();
        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].name, "Citadel of Ricks");

        let misc = list_by_category(&conn, "misc").unwrap();
        assert_eq!(misc.len(), 1);
        assert_eq!(misc[0].name, "Anatomy Park");
    }

    #[test]
    fn test_dimensions_category_returns_everything_annotated() {
        let conn = test_conn();
        add_location(&conn, "Earth (C-137)", "Planet", None);
        add_location(&conn, "Citadel of Ricks", "Space Station", None);

        let docs = list_by_category(&conn, "dimensions").unwrap();
        assert_eq!(docs.len(), 2);
        assert!(docs.iter().all(|d| d.dimension.as_deref() == Some("C-137")));

        // Plain categories keep the summary shape free of the key entirely
        let planets = list_by_category(&conn, "planets").unwrap();
        let json = serde_json::to_value(&planets[0]).unwrap();
        assert!(json.get("dimension").is_none());
    }

    #[test]
    fn test_unknown_category_is_validation_error() {
        let conn = test_conn();

        let err = list_by_category(&conn, "nonsense").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_summary_carries_representative_image() {
        let conn = test_conn();
        add_location(&conn, "Earth (C-137)", "Planet", None);
        insert_image(&conn, "Earth (C-137)", "b.png").unwrap();
        insert_image(&conn, "Earth (C-137)", "a.png").unwrap();

        let docs = list(&conn, None).unwrap();
        assert_eq!(docs[0].image.as_deref(), Some("a.png"));
    }

    #[test]
    fn test_reads_are_idempotent() {
        let conn = test_conn();
        insert_agent(&conn, "Birdperson", "birdperson.png").unwrap();
        add_location(&conn, "Citadel of Ricks", "Space Station", Some("Birdperson"));
        insert_image(&conn, "Citadel of Ricks", "c.png").unwrap();
        insert_review(&conn, "Citadel of Ricks", "morty_c137", "Too many Ricks.").unwrap();

        assert_eq!(list(&conn, None).unwrap(), list(&conn, None).unwrap());
        assert_eq!(
            list_by_category(&conn, "dimensions").unwrap(),
            list_by_category(&conn, "dimensions").unwrap()
        );
        assert_eq!(
            get_by_name(&conn, "Citadel of Ricks").unwrap(),
            get_by_name(&conn, "Citadel of Ricks").unwrap()
        );
    }
}
