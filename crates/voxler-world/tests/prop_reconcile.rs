use std::collections::BTreeSet;

use proptest::collection::btree_map;
use proptest::prelude::*;
use voxler_host::{HostOp, MemoryHost, ScriptedProgress};
use voxler_voxel::{GridCoord, Rgba, Shape, VoxelSpec, WorldDef};
use voxler_world::{ProgressSettings, VoxelWorld, WorldConfig};

const APPEARANCES: [&str; 3] = ["Steel - Satin", "Oak", "Plastic - Matte (White)"];
const NAMES: [&str; 3] = ["a", "b", "Voxel"];

fn arb_coord() -> impl Strategy<Value = GridCoord> {
    (-3i32..3, -3i32..3, -3i32..3).prop_map(|(x, y, z)| GridCoord::new(x, y, z))
}

fn arb_color() -> impl Strategy<Value = Option<Rgba>> {
    prop_oneof![
        Just(None),
        Just(Some(Rgba::opaque(255, 0, 0))),
        Just(Some(Rgba::opaque(0, 0, 255))),
        Just(Some(Rgba::new(0, 255, 0, 128))),
    ]
}

fn arb_spec() -> impl Strategy<Value = VoxelSpec> {
    (
        prop_oneof![Just(Shape::Cube), Just(Shape::Sphere)],
        arb_color(),
        0..APPEARANCES.len(),
        0..NAMES.len(),
    )
        .prop_map(|(shape, color, a, n)| VoxelSpec {
            shape,
            color,
            appearance: APPEARANCES[a].to_string(),
            name: NAMES[n].to_string(),
        })
}

fn arb_world_def() -> impl Strategy<Value = WorldDef> {
    btree_map(arb_coord(), arb_spec(), 0..24)
}

fn setup(threshold: usize) -> (MemoryHost, VoxelWorld) {
    let mut host = MemoryHost::with_stock_library();
    let comp = host.add_component("prop world");
    let config = WorldConfig {
        progress: ProgressSettings {
            threshold,
            ..ProgressSettings::default()
        },
        ..WorldConfig::default()
    };
    let world = VoxelWorld::new(comp, config).expect("world");
    (host, world)
}

fn body_of(op: &HostOp) -> Option<voxler_host::BodyId> {
    match op {
        HostOp::CreateCube { body, .. }
        | HostOp::CreateSphere { body, .. }
        | HostOp::RenameBody { body, .. }
        | HostOp::SetBodyAppearance { body, .. }
        | HostOp::DeleteBody { body } => Some(*body),
        HostOp::CopyAppearance { .. } | HostOp::SetAppearanceColor { .. } => None,
    }
}

proptest! {
    // update(D) then get_current_world_def() == D, and coordinates == keys(D).
    #[test]
    fn update_round_trips(d in arb_world_def()) {
        let (mut host, mut world) = setup(usize::MAX);
        prop_assert!(world.update(&mut host, &d, None).unwrap());
        prop_assert_eq!(world.get_current_world_def(), d.clone());
        let keys: Vec<GridCoord> = d.keys().copied().collect();
        prop_assert_eq!(world.get_coordinates(), keys);
        prop_assert_eq!(host.body_count(), d.len());
    }

    // A second update with the same definition never reaches the host.
    #[test]
    fn update_is_idempotent(d in arb_world_def()) {
        let (mut host, mut world) = setup(usize::MAX);
        world.update(&mut host, &d, None).unwrap();
        host.take_journal();
        prop_assert!(world.update(&mut host, &d, None).unwrap());
        prop_assert!(host.journal().is_empty());
        prop_assert_eq!(world.number_of_changes(&d), 0);
        prop_assert_eq!(world.get_current_world_def(), d);
    }

    // Feeding the observed definition back in is accepted unchanged.
    #[test]
    fn observed_definition_is_valid_input(d in arb_world_def()) {
        let (mut host, mut world) = setup(usize::MAX);
        world.update(&mut host, &d, None).unwrap();
        let observed = world.get_current_world_def();
        host.take_journal();
        prop_assert!(world.update(&mut host, &observed, None).unwrap());
        prop_assert!(host.journal().is_empty());
    }

    // Geometry work between two definitions is exactly what the diff demands.
    #[test]
    fn transition_touches_only_needed_geometry(
        d1 in arb_world_def(),
        d2 in arb_world_def(),
    ) {
        let (mut host, mut world) = setup(usize::MAX);
        world.update(&mut host, &d1, None).unwrap();
        host.take_journal();
        prop_assert!(world.update(&mut host, &d2, None).unwrap());

        let removed = d1.keys().filter(|c| !d2.contains_key(*c)).count();
        let added = d2.keys().filter(|c| !d1.contains_key(*c)).count();
        let reshaped = d2
            .iter()
            .filter(|(c, s)| d1.get(*c).is_some_and(|old| old.shape != s.shape))
            .count();
        prop_assert_eq!(host.deletions(), removed + reshaped);
        prop_assert_eq!(host.creations(), added + reshaped);
        prop_assert_eq!(world.get_current_world_def(), d2);
    }

    // Changing one property at one coordinate only touches that voxel's body.
    #[test]
    fn single_property_change_is_local(
        d in arb_world_def().prop_filter("non-empty", |d| !d.is_empty()),
        pick in any::<prop::sample::Index>(),
        field in 0usize..3,
    ) {
        let (mut host, mut world) = setup(usize::MAX);
        world.update(&mut host, &d, None).unwrap();

        let coord = *pick.get(&d.keys().copied().collect::<Vec<_>>());
        let mut d2 = d.clone();
        let spec = d2.get_mut(&coord).unwrap();
        match field {
            0 => spec.color = Some(Rgba::new(1, 2, 3, 4)),
            1 => spec.appearance = if spec.appearance == "Oak" { "Steel - Satin".into() } else { "Oak".into() },
            _ => spec.name = format!("{}-renamed", spec.name),
        }

        let body = world.get_voxel(coord).unwrap().body();
        host.take_journal();
        prop_assert!(world.update(&mut host, &d2, None).unwrap());

        let ops = host.journal();
        prop_assert!(!ops.is_empty());
        prop_assert!(ops.iter().all(|op| !op.is_geometry()));
        prop_assert!(ops.iter().filter_map(body_of).all(|b| b == body));
        prop_assert_eq!(world.get_voxel(coord).unwrap().body(), body);
        prop_assert_eq!(world.get_current_world_def(), d2);
    }

    // Cancelling after k coordinates leaves (old ∩ D) ∪ first k keys of D.
    #[test]
    fn cancellation_leaves_processed_prefix(
        d0 in arb_world_def(),
        d in arb_world_def(),
        k in 0usize..30,
    ) {
        let (mut host, mut world) = setup(0);
        world.update(&mut host, &d0, None).unwrap();

        let mut progress = ScriptedProgress::cancel_after(k);
        let completed = world.update(&mut host, &d, Some(&mut progress)).unwrap();
        prop_assert_eq!(completed, k >= d.len());
        prop_assert!(!progress.is_visible());

        let mut expected: BTreeSet<GridCoord> =
            d0.keys().filter(|c| d.contains_key(*c)).copied().collect();
        expected.extend(d.keys().take(k).copied());
        let got: BTreeSet<GridCoord> = world.get_coordinates().into_iter().collect();
        prop_assert_eq!(&got, &expected);
        prop_assert!(got.iter().all(|c| d.contains_key(c)));
        for c in d.keys().take(k) {
            prop_assert_eq!(&world.get_voxel(*c).unwrap().spec(), &d[c]);
        }
    }

    // Rescaling preserves the definition and rebuilds every body.
    #[test]
    fn rescale_preserves_definition(d in arb_world_def(), size in 0.1f64..10.0) {
        let (mut host, mut world) = setup(usize::MAX);
        world.update(&mut host, &d, None).unwrap();
        host.take_journal();
        prop_assume!(size != world.grid_size());
        prop_assert!(world.set_grid_size(&mut host, size, None).unwrap());
        prop_assert_eq!(host.deletions(), d.len());
        prop_assert_eq!(host.creations(), d.len());
        prop_assert_eq!(world.get_current_world_def(), d);
        prop_assert!(world.get_all_voxels().iter().all(|v| v.side_length() == size));
    }
}
