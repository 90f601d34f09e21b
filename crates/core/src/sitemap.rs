//! Sitemap generation from the location hierarchy.
//!
//! The sitemap is a JSON array with one object per country:
//!
//! ```text
//! [
//!     {
//!         "USA": "usa",
//!         "locations": [
//!             { "Texas": "usa/tx", "locations": [ { "Austin": "usa/tx/atx" } ] },
//!             { "Washington DC": "usa/dc" }
//!         ]
//!     }
//! ]
//! ```
//!
//! Countries and every child list are ordered by title (ties by id). States
//! carry a nested `locations` list; every other level is a leaf.

use std::path::Path;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::location::{path_segment, LocationType, MAX_HIERARCHY_DEPTH};
use crate::location_tree::{LocationTree, TreeError, TreeLocation};
use crate::storage::{FileStorage, StorageError};

/// Key holding the nested child list of a branch entry.
pub const LOCATIONS_KEY: &str = "locations";

/// Indentation used for the published artifact.
const JSON_INDENT: &[u8] = b"    ";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One `{title: path}` record, optionally with nested `locations`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    pub title: String,
    pub path: String,
    /// `Some` for countries and states (possibly empty), `None` for leaves.
    pub locations: Option<Vec<SitemapEntry>>,
}

impl SitemapEntry {
    pub fn leaf(title: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            path: path.into(),
            locations: None,
        }
    }

    pub fn branch(
        title: impl Into<String>,
        path: impl Into<String>,
        locations: Vec<SitemapEntry>,
    ) -> Self {
        Self {
            title: title.into(),
            path: path.into(),
            locations: Some(locations),
        }
    }
}

impl Serialize for SitemapEntry {
    /// Title key first, then `locations`, independent of map key ordering.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.locations.is_some() { 2 } else { 1 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry(&self.title, &self.path)?;
        if let Some(locations) = &self.locations {
            map.serialize_entry(LOCATIONS_KEY, locations)?;
        }
        map.end()
    }
}

/// Non-fatal irregularities noticed while walking the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SitemapAnomaly {
    /// A state sits at the last conventional level; its children were not
    /// emitted and the state was written with an empty `locations` list.
    UnexpectedDepth {
        location_id: String,
        depth: usize,
        skipped_children: usize,
    },
}

/// Result of a build: the entries plus anything worth logging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sitemap {
    pub entries: Vec<SitemapEntry>,
    pub anomalies: Vec<SitemapAnomaly>,
}

impl Sitemap {
    /// Render the artifact: a JSON array indented with four spaces.
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(JSON_INDENT);
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.entries.serialize(&mut serializer)?;
        Ok(out)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SitemapError {
    #[error("Location hierarchy is inconsistent: {0}")]
    Tree(#[from] TreeError),

    #[error("Failed to serialize sitemap: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write sitemap: {0}")]
    Storage(#[from] StorageError),
}

// ---------------------------------------------------------------------------
// Building
// ---------------------------------------------------------------------------

/// Build the sitemap for every country in `tree`.
pub fn build_sitemap(tree: &LocationTree) -> Sitemap {
    let mut anomalies = Vec::new();

    let entries = tree
        .of_type(LocationType::Country)
        .into_iter()
        .map(|country| {
            let path = path_segment(&country.id);
            let locations = child_entries(tree, country, &path, 1, &mut anomalies);
            SitemapEntry::branch(country.title.clone(), path, locations)
        })
        .collect();

    Sitemap { entries, anomalies }
}

/// Build the tree from flat records and then the sitemap.
pub fn build_sitemap_from_locations<I>(locations: I) -> Result<Sitemap, SitemapError>
where
    I: IntoIterator<Item = TreeLocation>,
{
    let tree = LocationTree::from_locations(locations)?;
    Ok(build_sitemap(&tree))
}

fn child_entries(
    tree: &LocationTree,
    parent: &TreeLocation,
    parent_path: &str,
    parent_depth: usize,
    anomalies: &mut Vec<SitemapAnomaly>,
) -> Vec<SitemapEntry> {
    let depth = parent_depth + 1;

    tree.children(&parent.id)
        .map(|child| {
            let path = format!("{parent_path}/{}", path_segment(&child.id));

            if child.location_type != LocationType::State {
                return SitemapEntry::leaf(child.title.clone(), path);
            }

            if depth >= MAX_HIERARCHY_DEPTH {
                let skipped = tree.child_count(&child.id);
                if skipped > 0 {
                    anomalies.push(SitemapAnomaly::UnexpectedDepth {
                        location_id: child.id.clone(),
                        depth,
                        skipped_children: skipped,
                    });
                }
                return SitemapEntry::branch(child.title.clone(), path, Vec::new());
            }

            let nested = child_entries(tree, child, &path, depth, anomalies);
            SitemapEntry::branch(child.title.clone(), path, nested)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Publishing
// ---------------------------------------------------------------------------

/// Serialize `sitemap` and write it to `target` through `storage`.
///
/// The write replaces any previous artifact in place; it is not atomic.
/// Returns the number of bytes written.
pub async fn publish_sitemap(
    storage: &dyn FileStorage,
    target: &Path,
    sitemap: &Sitemap,
) -> Result<usize, SitemapError> {
    let json = sitemap.to_json()?;
    storage.write_document(target, &json).await?;
    Ok(json.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::LocationType::{City, Country, State};

    fn loc(id: &str, title: &str, ty: LocationType, parent: Option<&str>) -> TreeLocation {
        TreeLocation::new(id, title, ty, parent)
    }

    fn build(locations: Vec<TreeLocation>) -> Sitemap {
        build_sitemap_from_locations(locations).expect("tree should build")
    }

    fn compact(sitemap: &Sitemap) -> String {
        serde_json::to_string(&sitemap.entries).unwrap()
    }

    #[test]
    fn country_state_city_paths_are_nested() {
        let sitemap = build(vec![
            loc("usa", "USA", Country, None),
            loc("tx", "Texas", State, Some("usa")),
            loc("atx", "Austin", City, Some("tx")),
        ]);
        assert_eq!(
            compact(&sitemap),
            r#"[{"USA":"usa","locations":[{"Texas":"usa/tx","locations":[{"Austin":"usa/tx/atx"}]}]}]"#
        );
        assert!(sitemap.anomalies.is_empty());
    }

    #[test]
    fn countries_are_alphabetical_regardless_of_insertion() {
        let sitemap = build(vec![
            loc("usa", "USA", Country, None),
            loc("can", "Canada", Country, None),
        ]);
        let titles: Vec<&str> = sitemap.entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Canada", "USA"]);
    }

    #[test]
    fn country_without_children_has_empty_locations() {
        let sitemap = build(vec![loc("can", "Canada", Country, None)]);
        assert_eq!(compact(&sitemap), r#"[{"Canada":"can","locations":[]}]"#);
    }

    #[test]
    fn state_without_children_has_empty_locations() {
        let sitemap = build(vec![
            loc("usa", "USA", Country, None),
            loc("dc", "District", State, Some("usa")),
        ]);
        assert_eq!(
            sitemap.entries[0].locations.as_ref().unwrap()[0],
            SitemapEntry::branch("District", "usa/dc", vec![])
        );
    }

    #[test]
    fn city_directly_under_country_is_a_leaf() {
        let sitemap = build(vec![
            loc("usa", "USA", Country, None),
            loc("atx", "Austin", City, Some("usa")),
        ]);
        assert_eq!(
            compact(&sitemap),
            r#"[{"USA":"usa","locations":[{"Austin":"usa/atx"}]}]"#
        );
    }

    #[test]
    fn ids_are_lowercased_in_paths() {
        let sitemap = build(vec![
            loc("USA", "USA", Country, None),
            loc("TX", "Texas", State, Some("USA")),
        ]);
        let state = &sitemap.entries[0].locations.as_ref().unwrap()[0];
        assert_eq!(sitemap.entries[0].path, "usa");
        assert_eq!(state.path, "usa/tx");
    }

    #[test]
    fn children_of_a_city_are_not_emitted() {
        let sitemap = build(vec![
            loc("usa", "USA", Country, None),
            loc("atx", "Austin", City, Some("usa")),
            loc("dt", "Downtown", City, Some("atx")),
        ]);
        assert_eq!(
            compact(&sitemap),
            r#"[{"USA":"usa","locations":[{"Austin":"usa/atx"}]}]"#
        );
    }

    #[test]
    fn state_below_the_third_level_is_reported() {
        let sitemap = build(vec![
            loc("usa", "USA", Country, None),
            loc("tx", "Texas", State, Some("usa")),
            loc("ctx", "Central Texas", State, Some("tx")),
            loc("atx", "Austin", City, Some("ctx")),
        ]);
        assert_eq!(
            compact(&sitemap),
            r#"[{"USA":"usa","locations":[{"Texas":"usa/tx","locations":[{"Central Texas":"usa/tx/ctx","locations":[]}]}]}]"#
        );
        assert_eq!(
            sitemap.anomalies,
            vec![SitemapAnomaly::UnexpectedDepth {
                location_id: "ctx".into(),
                depth: 3,
                skipped_children: 1,
            }]
        );
    }

    #[test]
    fn childless_state_at_the_third_level_keeps_an_empty_list() {
        let sitemap = build(vec![
            loc("usa", "USA", Country, None),
            loc("tx", "Texas", State, Some("usa")),
            loc("ctx", "Central Texas", State, Some("tx")),
        ]);
        assert_eq!(
            compact(&sitemap),
            r#"[{"USA":"usa","locations":[{"Texas":"usa/tx","locations":[{"Central Texas":"usa/tx/ctx","locations":[]}]}]}]"#
        );
        assert!(sitemap.anomalies.is_empty());
    }

    #[test]
    fn title_key_precedes_locations_even_when_it_sorts_later() {
        let sitemap = build(vec![loc("zz", "zulu", Country, None)]);
        assert_eq!(compact(&sitemap), r#"[{"zulu":"zz","locations":[]}]"#);
    }

    #[test]
    fn rebuilding_is_byte_identical() {
        let locations = vec![
            loc("usa", "USA", Country, None),
            loc("tx", "Texas", State, Some("usa")),
            loc("ca", "California", State, Some("usa")),
            loc("atx", "Austin", City, Some("tx")),
            loc("la", "Los Angeles", City, Some("ca")),
            loc("sf", "San Francisco", City, Some("ca")),
            loc("can", "Canada", Country, None),
        ];
        let mut reversed = locations.clone();
        reversed.reverse();

        let first = build(locations).to_json().unwrap();
        let second = build(reversed).to_json().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn artifact_uses_four_space_indent() {
        let json = build(vec![loc("can", "Canada", Country, None)])
            .to_json()
            .unwrap();
        let text = String::from_utf8(json).unwrap();
        assert_eq!(
            text,
            "[\n    {\n        \"Canada\": \"can\",\n        \"locations\": []\n    }\n]"
        );
    }

    #[test]
    fn empty_hierarchy_gives_empty_array() {
        let sitemap = build(vec![]);
        assert!(sitemap.entries.is_empty());
        assert_eq!(sitemap.to_json().unwrap(), b"[]");
    }

    #[test]
    fn inconsistent_hierarchy_fails_the_build() {
        let result = build_sitemap_from_locations(vec![loc("tx", "Texas", State, Some("usa"))]);
        assert!(matches!(result, Err(SitemapError::Tree(_))));
    }
}
