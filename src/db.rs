// Rickllow Listings - Schema Accessor
// Owns the relational shape (locations, location_images, agents, reviews)
// and the raw row-fetching primitives. No business logic beyond query
// execution; filters arrive pre-composed from the query module.

use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use crate::error::Result;
use crate::query::LocationFilter;

// ============================================================================
// ROW TYPES
// ============================================================================

/// One summary row, as used by the list views.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub name: String,
    pub cost: f64,
    pub alt_cost_curr: String,
    pub alt_cost_amt: f64,
    /// Representative image: lexicographically-lowest image name, so the
    /// choice is stable across calls. None when the location has no images.
    pub image: Option<String>,
    /// Populated only for the "dimensions" category view.
    pub dimension: Option<String>,
}

/// The scalar fields of one location plus its agent lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationRow {
    pub name: String,
    pub location_type: String,
    pub dimension: String,
    pub description: String,
    pub cost: f64,
    pub alt_cost_curr: String,
    pub alt_cost_amt: f64,
    pub neighborhood: String,
    pub agent_name: Option<String>,
    pub agent_image: Option<String>,
}

/// One review row, scoped to a single location.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewRow {
    pub id: i64,
    pub user_username: String,
    pub text: String,
}

/// Insertable location record, used by the seed tooling and tests.
/// The serving path itself never writes.
#[derive(Debug, Clone)]
pub struct LocationRecord {
    pub name: String,
    pub location_type: String,
    pub dimension: String,
    pub description: String,
    pub cost: f64,
    pub alt_cost_curr: String,
    pub alt_cost_amt: f64,
    pub neighborhood: String,
    pub agent_name: Option<String>,
}

// ============================================================================
// SCHEMA SETUP
// ============================================================================

pub fn setup_database(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS agents (
            name TEXT PRIMARY KEY,
            image TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS locations (
            name TEXT PRIMARY KEY,
            type TEXT NOT NULL,
            dimension TEXT NOT NULL,
            description TEXT NOT NULL,
            cost REAL NOT NULL,
            alt_cost_curr TEXT NOT NULL,
            alt_cost_amt REAL NOT NULL,
            neighborhood TEXT NOT NULL,
            agent_name TEXT REFERENCES agents(name)
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS location_images (
            location_name TEXT NOT NULL REFERENCES locations(name),
            name TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS reviews (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            location_name TEXT NOT NULL REFERENCES locations(name),
            user_username TEXT NOT NULL,
            text TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_images_location
         ON location_images(location_name)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_reviews_location
         ON reviews(location_name)",
        [],
    )?;

    Ok(())
}

// ============================================================================
// ROW FETCH PRIMITIVES
// ============================================================================

/// Fetch summary rows under the given filter, ordered by name.
///
/// The representative image is resolved with a correlated subquery scoped
/// to each location, so image multiplicity never affects the row count.
pub fn summary_rows(
    conn: &Connection,
    filter: &LocationFilter,
    include_dimension: bool,
) -> Result<Vec<SummaryRow>> {
    let (where_clause, bindings) = filter.predicate();

    let query = format!(
        "SELECT l.name,
                l.cost,
                l.alt_cost_curr,
                l.alt_cost_amt,
                l.dimension,
                (SELECT MIN(i.name) FROM location_images AS i
                 WHERE i.location_name = l.name) AS image
         FROM locations AS l
         {}
         ORDER BY l.name",
        where_clause
    );

    let mut stmt = conn.prepare(&query)?;

    let rows = stmt
        .query_map(params_from_iter(bindings.iter()), |row| {
            Ok(SummaryRow {
                name: row.get(0)?,
                cost: row.get(1)?,
                alt_cost_curr: row.get(2)?,
                alt_cost_amt: row.get(3)?,
                dimension: if include_dimension {
                    Some(row.get(4)?)
                } else {
                    None
                },
                image: row.get(5)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Fetch one location's scalar fields plus its agent, or None.
pub fn location_row(conn: &Connection, name: &str) -> Result<Option<LocationRow>> {
    let mut stmt = conn.prepare(
        "SELECT l.name, l.type, l.dimension, l.description, l.cost,
                l.alt_cost_curr, l.alt_cost_amt, l.neighborhood,
                a.name, a.image
         FROM locations AS l
           LEFT JOIN agents AS a ON a.name = l.agent_name
         WHERE l.name = ?1",
    )?;

    let row = stmt
        .query_row(params![name], |row| {
            Ok(LocationRow {
                name: row.get(0)?,
                location_type: row.get(1)?,
                dimension: row.get(2)?,
                description: row.get(3)?,
                cost: row.get(4)?,
                alt_cost_curr: row.get(5)?,
                alt_cost_amt: row.get(6)?,
                neighborhood: row.get(7)?,
                agent_name: row.get(8)?,
                agent_image: row.get(9)?,
            })
        })
        .optional()?;

    Ok(row)
}

/// Fetch one location's image names, ordered, scoped only by location.
pub fn image_names(conn: &Connection, location_name: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM location_images
         WHERE location_name = ?1
         ORDER BY name",
    )?;

    let names = stmt
        .query_map(params![location_name], |row| row.get(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(names)
}

/// Fetch one location's reviews, ordered by id, scoped only by location.
pub fn review_rows(conn: &Connection, location_name: &str) -> Result<Vec<ReviewRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_username, text FROM reviews
         WHERE location_name = ?1
         ORDER BY id",
    )?;

    let reviews = stmt
        .query_map(params![location_name], |row| {
            Ok(ReviewRow {
                id: row.get(0)?,
                user_username: row.get(1)?,
                text: row.get(2)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(reviews)
}

// ============================================================================
// SEED TOOLING (CLI + tests; the serving path never writes)
// ============================================================================

pub fn insert_agent(conn: &Connection, name: &str, image: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO agents (name, image) VALUES (?1, ?2)",
        params![name, image],
    )?;
    Ok(())
}

pub fn insert_location(conn: &Connection, location: &LocationRecord) -> Result<()> {
    conn.execute(
        "INSERT INTO locations (
            name, type, dimension, description, cost,
            alt_cost_curr, alt_cost_amt, neighborhood, agent_name
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            location.name,
            location.location_type,
            location.dimension,
            location.description,
            location.cost,
            location.alt_cost_curr,
            location.alt_cost_amt,
            location.neighborhood,
            location.agent_name,
        ],
    )?;
    Ok(())
}

pub fn insert_image(conn: &Connection, location_name: &str, name: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO location_images (location_name, name) VALUES (?1, ?2)",
        params![location_name, name],
    )?;
    Ok(())
}

pub fn insert_review(
    conn: &Connection,
    location_name: &str,
    user_username: &str,
    text: &str,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO reviews (location_name, user_username, text)
         VALUES (?1, ?2, ?3)",
        params![location_name, user_username, text],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Populate a fresh database with a small demo catalog.
pub fn seed_demo_data(conn: &Connection) -> Result<()> {
    insert_agent(conn, "Mr. Goldenfold", "goldenfold.png")?;
    insert_agent(conn, "Birdperson", "birdperson.png")?;

    insert_location(
        conn,
        &LocationRecord {
            name: "Earth (C-137)".to_string(),
            location_type: "Planet".to_string(),
            dimension: "C-137".to_string(),
            description: "Cradle of humanity, pre-Cronenberg.".to_string(),
            cost: 250000.0,
            alt_cost_curr: "Flurbos".to_string(),
            alt_cost_amt: 12500.0,
            neighborhood: "Milky Way".to_string(),
            agent_name: Some("Mr. Goldenfold".to_string()),
        },
    )?;

    insert_location(
        conn,
        &LocationRecord {
            name: "Citadel of Ricks".to_string(),
            location_type: "Space Station".to_string(),
            dimension: "Unknown".to_string(),
            description: "Off-dimension seat of the Council of Ricks.".to_string(),
            cost: 980000.0,
            alt_cost_curr: "Brapples".to_string(),
            alt_cost_amt: 44000.0,
            neighborhood: "Outside the Central Finite Curve".to_string(),
            agent_name: Some("Birdperson".to_string()),
        },
    )?;

    insert_location(
        conn,
        &LocationRecord {
            name: "Anatomy Park".to_string(),
            location_type: "Theme Park".to_string(),
            dimension: "C-137".to_string(),
            description: "Microscopic park inside a homeless man.".to_string(),
            cost: 64000.0,
            alt_cost_curr: "Flurbos".to_string(),
            alt_cost_amt: 3100.0,
            neighborhood: "Ruben".to_string(),
            agent_name: None,
        },
    )?;

    insert_image(conn, "Earth (C-137)", "earth-1.png")?;
    insert_image(conn, "Earth (C-137)", "earth-2.png")?;
    insert_image(conn, "Citadel of Ricks", "citadel-1.png")?;

    insert_review(conn, "Citadel of Ricks", "morty_c137", "Too many Ricks.")?;
    insert_review(conn, "Citadel of Ricks", "summz", "Great portal access.")?;

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
