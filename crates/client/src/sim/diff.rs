// Diff engine - reconciles the latest snapshot against the rendered set
use std::collections::HashSet;

use protocol::{CellSnapshot, Coord};

use crate::scene::SceneAdapter;
use crate::sim::registry::CellRegistry;

/// Outcome counters for one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub added: usize,
    pub removed: usize,
    /// Cells skipped because the scene refused to create their visual.
    pub failed: usize,
}

/// Make the rendered set equal the snapshot's live set, touching only the
/// cells that actually changed.
///
/// Removals run before additions; either way, after this returns the
/// registry (and therefore the scene) holds exactly the snapshot's live
/// coordinates, minus any cell the scene failed to create. Malformed keys
/// and per-cell scene failures are logged and skipped so one bad entry
/// never discards the rest of the generation.
pub fn reconcile<S: SceneAdapter>(
    snapshot: &CellSnapshot,
    registry: &mut CellRegistry<S::Handle>,
    scene: &mut S,
) -> ReconcileStats {
    let mut stats = ReconcileStats::default();

    let mut wanted: HashSet<Coord> = HashSet::with_capacity(snapshot.len());
    for parsed in snapshot.live_coords() {
        match parsed {
            Ok(coord) => {
                wanted.insert(coord);
            }
            Err(e) => {
                log::warn!("dropping snapshot entry: {e}");
            }
        }
    }

    let stale: Vec<Coord> = registry
        .coords()
        .filter(|coord| !wanted.contains(coord))
        .collect();
    for coord in stale {
        if let Some(handle) = registry.remove(coord) {
            scene.remove_from_scene(&handle);
            stats.removed += 1;
        }
    }

    for coord in wanted {
        if registry.contains(coord) {
            continue;
        }
        match scene.create_visual(coord) {
            Ok(handle) => {
                scene.add_to_scene(&handle);
                registry.insert(coord, handle);
                stats.added += 1;
            }
            Err(e) => {
                log::error!("{e}");
                stats.failed += 1;
            }
        }
    }

    stats
}

/// Remove every rendered cell and empty the registry. Used when a new run
/// starts and on any full scene reset.
pub fn clear_all<S: SceneAdapter>(registry: &mut CellRegistry<S::Handle>, scene: &mut S) {
    registry.clear();
    scene.clear_scene();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::testing::MockScene;

    fn live_set(scene: &MockScene) -> Vec<Coord> {
        let mut coords = scene.rendered();
        coords.sort_by_key(|c| (c.x(), c.y(), c.z()));
        coords
    }

    #[test]
    fn test_reconcile_matches_live_set_exactly() {
        let mut scene = MockScene::new();
        let mut registry = CellRegistry::new();

        let snapshot =
            CellSnapshot::from([("0:0:0", "true"), ("1:0:0", "false"), ("2:2:2", "true")]);
        let stats = reconcile(&snapshot, &mut registry, &mut scene);

        assert_eq!(stats.added, 2);
        assert_eq!(stats.removed, 0);
        assert_eq!(
            live_set(&scene),
            vec![Coord::new(0, 0, 0), Coord::new(2, 2, 2)],
        );
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_reconcile_removes_stale_cells() {
        let mut scene = MockScene::new();
        let mut registry = CellRegistry::new();

        reconcile(
            &CellSnapshot::from([("0:0:0", "true"), ("1:1:1", "true")]),
            &mut registry,
            &mut scene,
        );
        let stats = reconcile(
            &CellSnapshot::from([("1:1:1", "true"), ("2:2:2", "true")]),
            &mut registry,
            &mut scene,
        );

        assert_eq!(stats.added, 1);
        assert_eq!(stats.removed, 1);
        assert_eq!(
            live_set(&scene),
            vec![Coord::new(1, 1, 1), Coord::new(2, 2, 2)],
        );
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let mut scene = MockScene::new();
        let mut registry = CellRegistry::new();
        let snapshot = CellSnapshot::from([("0:0:0", "true"), ("-3:0:7", "true")]);

        reconcile(&snapshot, &mut registry, &mut scene);
        let before = live_set(&scene);
        let handles_before = scene.handles_created();

        let stats = reconcile(&snapshot, &mut registry, &mut scene);

        assert_eq!(stats, ReconcileStats::default());
        assert_eq!(live_set(&scene), before);
        assert_eq!(scene.handles_created(), handles_before);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_reconcile_skips_malformed_keys() {
        let mut scene = MockScene::new();
        let mut registry = CellRegistry::new();

        let snapshot = CellSnapshot::from([("0:0:0", "true"), ("not-a-key", "true")]);
        let stats = reconcile(&snapshot, &mut registry, &mut scene);

        assert_eq!(stats.added, 1);
        assert_eq!(live_set(&scene), vec![Coord::new(0, 0, 0)]);
    }

    #[test]
    fn test_create_failure_skips_that_cell_only() {
        let mut scene = MockScene::new();
        scene.fail_create_at(Coord::new(1, 1, 1));
        let mut registry = CellRegistry::new();

        let snapshot = CellSnapshot::from([("0:0:0", "true"), ("1:1:1", "true")]);
        let stats = reconcile(&snapshot, &mut registry, &mut scene);

        assert_eq!(stats.added, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(live_set(&scene), vec![Coord::new(0, 0, 0)]);
        assert!(!registry.contains(Coord::new(1, 1, 1)));
    }

    #[test]
    fn test_clear_all_empties_scene_and_registry() {
        let mut scene = MockScene::new();
        let mut registry = CellRegistry::new();
        reconcile(
            &CellSnapshot::from([("0:0:0", "true")]),
            &mut registry,
            &mut scene,
        );

        clear_all(&mut registry, &mut scene);

        assert!(registry.is_empty());
        assert!(scene.rendered().is_empty());
    }
}
