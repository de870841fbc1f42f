use featuremap_core::codec::{aggregate, decode, encode, expand, RunLengthSequence, SUB_TILES_PER_TILE};
use featuremap_core::feature::{FeatureRecord, TilePoint, TileSize};
use featuremap_core::layout::{compute_bounds, Bounds};
use featuremap_core::room_layout::{generate_feature, FeatureRequest};
use featuremap_core::{MapError, WalkabilityGrid};

// Small deterministic generator so the grids are reproducible.
struct Lcg(u64);

impl Lcg {
    fn next_bool(&mut self, walkable_per_mille: u64) -> bool {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.0 >> 33) % 1000 < walkable_per_mille
    }
}

fn random_grid(rng: &mut Lcg, width_tiles: usize, height_tiles: usize, density: u64) -> WalkabilityGrid {
    let w = width_tiles * SUB_TILES_PER_TILE;
    let h = height_tiles * SUB_TILES_PER_TILE;
    let cells = (0..w * h).map(|_| rng.next_bool(density)).collect();
    WalkabilityGrid::from_column_major(w, h, cells).unwrap()
}

fn feature(id: i64, ox: i32, oy: i32, w: u32, h: u32) -> FeatureRecord {
    FeatureRecord {
        id,
        size: TileSize { x: w, y: h },
        origin: TilePoint { x: ox, y: oy },
        data: RunLengthSequence { width_tiles: w, height_tiles: h, runs: vec![w * 4 * h * 4] },
        plane: None,
    }
}

#[test]
fn decode_of_encode_is_identity() {
    let mut rng = Lcg(42);
    for (w, h) in [(1, 1), (2, 3), (5, 1), (7, 4)] {
        for density in [0, 100, 500, 900, 1000] {
            let g = random_grid(&mut rng, w, h, density);
            let seq = encode(&g).unwrap();
            assert_eq!(decode(&seq).unwrap(), g, "{w}x{h} at density {density}");
        }
    }
}

#[test]
fn encoded_runs_conserve_area() {
    let mut rng = Lcg(7);
    for (w, h) in [(1, 2), (3, 3), (6, 2)] {
        let g = random_grid(&mut rng, w, h, 600);
        let seq = encode(&g).unwrap();
        assert_eq!(seq.run_total(), seq.sub_tile_area().unwrap() as u64);
        assert_eq!((seq.width_tiles as usize, seq.height_tiles as usize), (w, h));
    }
}

#[test]
fn zero_runs_only_appear_first() {
    let mut rng = Lcg(99);
    for _ in 0..20 {
        let g = random_grid(&mut rng, 2, 2, 500);
        let seq = encode(&g).unwrap();
        assert!(seq.runs.iter().skip(1).all(|&r| r > 0), "{:?}", seq.runs);
        assert_eq!(seq.runs[0] == 0, !g.is_walkable(0, 0));
    }
}

#[test]
fn even_runs_walkable_odd_runs_blocked() {
    let runs = vec![3, 0, 5, 2, 0, 6];
    let seq = RunLengthSequence { width_tiles: 1, height_tiles: 1, runs: runs.clone() };
    let flat = decode(&seq).unwrap().as_column_major().to_vec();
    let mut i = 0;
    for (idx, &len) in runs.iter().enumerate() {
        for _ in 0..len {
            assert_eq!(flat[i], idx % 2 == 0, "cell {i} from run {idx}");
            i += 1;
        }
    }
}

#[test]
fn one_blocked_sub_tile_blocks_the_game_tile() {
    for dx in 0..4 {
        for dy in 0..4 {
            let mut g = WalkabilityGrid::filled(8, 8, true);
            g.set(4 + dx, dy, false);
            let tiles = aggregate(&g, 4).unwrap();
            assert!(!tiles.is_walkable(1, 0));
            assert_eq!(tiles.walkable_count(), 3);
        }
    }
    let all = aggregate(&WalkabilityGrid::filled(8, 8, true), 4).unwrap();
    assert_eq!(all.walkable_count(), 4);
}

#[test]
fn south_west_corner_layout_order() {
    let mut g = WalkabilityGrid::filled(8, 8, true);
    g.set(0, 0, false);
    assert_eq!(encode(&g).unwrap().to_values(), vec![2, 2, 0, 1, 63]);
}

#[test]
fn ring_room_scenario() {
    let req = FeatureRequest {
        id: 50001,
        plane: 1,
        origin: TilePoint { x: 2700, y: 5350 },
        layout: "XXX\nX X\nXXX".to_string(),
    };
    let f = generate_feature(&req).unwrap();
    assert_eq!(f.size, TileSize { x: 3, y: 3 });
    assert_eq!(f.origin, TilePoint { x: 2700, y: 5350 });
    let values = f.data.to_values();
    assert_eq!(&values[..2], &[3, 3]);
    assert_eq!(f.data.run_total(), 144);
    assert_eq!(values, vec![3, 3, 0, 52, 4, 8, 4, 8, 4, 8, 4, 52]);

    let tiles = f.tile_walkability().unwrap();
    for x in 0..3 {
        for y in 0..3 {
            assert_eq!(tiles.is_walkable(x, y), (x, y) == (1, 1), "({x}, {y})");
        }
    }

    let json = serde_json::to_value(&f).unwrap();
    assert_eq!(json["s"], serde_json::json!({"x": 3, "y": 3}));
    assert_eq!(json["o"], serde_json::json!({"x": 2700, "y": 5350}));
    assert_eq!(json["f"], serde_json::json!(50001));
}

#[test]
fn generated_layout_matches_expanded_grid() {
    let req = FeatureRequest {
        id: 1,
        plane: 0,
        origin: TilePoint { x: 0, y: 0 },
        layout: "X  X\n XX \n    ".to_string(),
    };
    let f = generate_feature(&req).unwrap();
    let sub = f.walkability().unwrap();
    let tiles = f.tile_walkability().unwrap();
    assert_eq!(expand(&tiles, 4), sub);
    // bottom text row is fully walkable
    assert!((0..4).all(|x| tiles.is_walkable(x, 0)));
    assert!(!tiles.is_walkable(0, 2) && !tiles.is_walkable(3, 2));
}

#[test]
fn bounds_scenario() {
    let a = feature(1, 0, 0, 2, 2);
    let b = feature(2, 5, 5, 3, 3);
    assert_eq!(compute_bounds([&a, &b]).unwrap(), Bounds { min_x: 0, min_y: 0, max_x: 8, max_y: 8 });
}

#[test]
fn short_feature_data_fails_decode() {
    let v = serde_json::json!({"f": 1, "s": {"x": 2, "y": 2}, "o": {"x": 0, "y": 0}, "d": [2, 2, 10, 20, 3]});
    let f: FeatureRecord = serde_json::from_value(v).unwrap();
    f.validate().unwrap();
    match f.walkability() {
        Err(MapError::LengthMismatch { expected, actual }) => {
            assert_eq!(expected, 64);
            assert_eq!(actual, 33);
        }
        other => panic!("expected LengthMismatch, got {other:?}"),
    }
}
