//! File naming and JSON encoding for generated map descriptions.

use std::path::{Path, PathBuf};

use arena_core::{MapDescription, Rect};
use arena_world::{self as world, query, MapError};

const OUTPUT_EXTENSION: &str = "json";

/// Output path used when none is given: the input with its extension replaced.
#[must_use]
pub(crate) fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension(OUTPUT_EXTENSION)
}

/// Serializes a map description, optionally indented for review.
pub(crate) fn encode(map: &MapDescription, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(map)
    } else {
        serde_json::to_string(map)
    }
}

/// Parses a map description previously produced by [`encode`].
pub(crate) fn decode(json: &str) -> serde_json::Result<MapDescription> {
    serde_json::from_str(json)
}

/// Loads `map` into a runtime state with the target at the primary spawn.
///
/// Returns the root node chosen for that target, or `None` when no node can
/// see the spawn.
pub(crate) fn verify(map: MapDescription) -> Result<Option<usize>, MapError> {
    let target = Rect::unit_at(map.primary_spawn);
    let state = world::load(map, target)?;
    Ok(query::root(&state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::{NodeRecord, Point};

    fn sample_map() -> MapDescription {
        MapDescription {
            width: 8.0,
            height: 6.0,
            primary_spawn: Point::new(1.0, 1.0),
            secondary_spawns: vec![Point::new(6.0, 4.0)],
            bounds: vec![Rect::new(4.0, 0.0, 1.0, 3.0).expect("valid rect")],
            graph: vec![
                NodeRecord {
                    x: 1.5,
                    y: 1.5,
                    edges: vec![1],
                },
                NodeRecord {
                    x: 4.5,
                    y: 4.5,
                    edges: vec![0],
                },
            ],
        }
    }

    #[test]
    fn output_path_replaces_extension() {
        assert_eq!(
            default_output_path(Path::new("maps/arena.ppm")),
            PathBuf::from("maps/arena.json")
        );
        assert_eq!(
            default_output_path(Path::new("maps/arena.v2.ppm")),
            PathBuf::from("maps/arena.v2.json")
        );
        assert_eq!(
            default_output_path(Path::new("arena")),
            PathBuf::from("arena.json")
        );
    }

    #[test]
    fn encoded_map_uses_wire_keys() {
        let json = encode(&sample_map(), false).expect("map serializes");
        assert!(json.contains("\"primarySpawn\""));
        assert!(json.contains("\"secondarySpawns\""));
        assert!(!json.contains('\n'), "compact output stays on one line");
        assert!(encode(&sample_map(), true)
            .expect("map serializes")
            .contains('\n'));
    }

    #[test]
    fn decode_reverses_encode() {
        let map = sample_map();
        let json = encode(&map, true).expect("map serializes");
        assert_eq!(decode(&json).expect("map parses"), map);
    }

    #[test]
    fn verify_reports_root_near_spawn() {
        assert_eq!(verify(sample_map()), Ok(Some(0)));

        let mut far_spawn = sample_map();
        far_spawn.primary_spawn = Point::new(6.0, 1.0);
        assert_eq!(verify(far_spawn), Ok(Some(1)));

        let mut broken = sample_map();
        broken.graph[0].edges.clear();
        assert!(matches!(
            verify(broken),
            Err(MapError::AsymmetricEdge { node: 1, neighbor: 0 })
        ));
    }
}
