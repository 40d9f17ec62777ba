use odormap::{
    AxisAlignedRect, Config, DomainConfig, GasMap, GasMapError, KernelParams, ObstacleSet,
    Observation, Point3d, Sample, SampleBuffer, WindReading, parse_dump,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn small_config() -> Config {
    Config::new(
        DomainConfig::new(0.0, 4.0, 0.0, 4.0).with_bins(4, 4),
        KernelParams::isotropic(1.0, 2.0),
    )
}

/// Untouched cells keep zero weight, zero confidence and the unset average.
#[test]
fn test_untouched_cells_stay_zero() {
    init_logger();
    let mut map = GasMap::new(&Config::default()).expect("Failed to create map");
    map.ingest(Point3d::planar(3.0, 0.5), 2.0).unwrap();

    let window = map.update_window(&Point3d::planar(3.0, 0.5)).unwrap();
    let grid = map.grid();
    for i in 0..grid.nx() {
        for j in 0..grid.ny() {
            if window.contains(i, j) {
                continue;
            }
            assert_eq!(map.weight_at(i, j), Some(0.0));
            assert_eq!(map.confidence_at(i, j), Some(0.0));
            assert_eq!(map.average_at(i, j), Some(0.0));
        }
    }
}

/// The 4x4 reference scenario.
#[test]
fn test_four_by_four_scenario() {
    let mut map = GasMap::new(&small_config()).unwrap();
    map.ingest(Point3d::planar(2.0, 2.0), 10.0).unwrap();

    let peak = map.weight_at(2, 2).unwrap();
    let max = map
        .weights()
        .as_slice()
        .iter()
        .cloned()
        .fold(f64::NEG_INFINITY, f64::max);
    assert_eq!(peak, max);
    assert!((map.average_at(2, 2).unwrap() - 10.0).abs() < 1e-12);
    assert!((map.query(&Point3d::planar(2.0, 2.0)).unwrap() - 10.0).abs() < 1e-12);
}

/// Weight falls off with distance along both axes inside the window.
#[test]
fn test_weight_decreases_with_distance() {
    let config = Config::new(
        DomainConfig::new(0.0, 20.0, 0.0, 20.0).with_bins(20, 20),
        KernelParams::new(1.0, 1.0, 1.0, 0.5, 5.0),
    );
    let mut map = GasMap::new(&config).unwrap();
    map.ingest(Point3d::planar(10.0, 10.0), 1.0).unwrap();

    for step in 0..5 {
        assert!(map.weight_at(10 + step, 10).unwrap() > map.weight_at(11 + step, 10).unwrap());
        assert!(map.weight_at(10, 10 - step).unwrap() > map.weight_at(10, 9 - step).unwrap());
    }
    // Outside the five-cell window nothing is deposited.
    assert_eq!(map.weight_at(16, 10), Some(0.0));
    assert_eq!(map.weight_at(10, 4), Some(0.0));
    // Along-wind spread is wider than cross-wind spread.
    assert!(map.weight_at(12, 10).unwrap() > map.weight_at(10, 12).unwrap());
}

/// Without wind the deposited weights are symmetric under rotation.
#[test]
fn test_isotropic_without_wind() {
    let config = Config::new(
        DomainConfig::new(0.0, 10.0, 0.0, 10.0).with_bins(10, 10),
        KernelParams::new(1.0, 3.0, 1.0, 0.0, 3.0),
    );
    let mut map = GasMap::new(&config).unwrap();
    assert_eq!(map.kernel().a(), map.kernel().b());
    map.ingest(Point3d::planar(5.0, 5.0), 1.0).unwrap();

    assert_eq!(map.weight_at(7, 5), map.weight_at(5, 7));
    assert_eq!(map.weight_at(3, 6), map.weight_at(6, 3));
    assert_eq!(map.weight_at(4, 4), map.weight_at(6, 6));
}

#[test]
fn test_batch_equals_sequential() {
    let observations = vec![
        Observation::new(Point3d::planar(4.1, 1.2), 0.7),
        Observation::new(Point3d::planar(4.3, 1.3), 1.9),
        Observation::new(Point3d::planar(9.0, 3.5), 0.2),
    ];
    let positions: Vec<Point3d> = observations.iter().map(|o| o.position).collect();
    let concentrations: Vec<f64> = observations.iter().map(|o| o.concentration).collect();

    let mut batch = GasMap::new(&Config::default()).unwrap();
    batch.ingest_batch(&positions, &concentrations).unwrap();

    let mut streamed = GasMap::new(&Config::default()).unwrap();
    streamed.ingest_observations(observations.clone()).unwrap();

    let mut single = GasMap::new(&Config::default()).unwrap();
    for obs in &observations {
        single.ingest(obs.position, obs.concentration).unwrap();
    }

    assert_eq!(batch.dump(), single.dump());
    assert_eq!(streamed.dump(), single.dump());
    assert_eq!(batch.weights(), single.weights());
    assert_eq!(batch.confidences(), single.confidences());
}

#[test]
fn test_configure_discards_history() {
    init_logger();
    let mut map = GasMap::new(&Config::default()).unwrap();
    for k in 0..10 {
        map.ingest(Point3d::planar(3.0 + k as f64, 2.0), 1.0).unwrap();
    }
    map.configure(KernelParams::default()).unwrap();

    let fresh = GasMap::new(&Config::default()).unwrap();
    assert_eq!(map.dump(), fresh.dump());
    assert_eq!(map.weights(), fresh.weights());
    assert_eq!(map.stats().touched_cells, 0);
}

#[test]
fn test_dump_roundtrip_reference_grid() {
    let mut map = GasMap::new(&Config::default()).unwrap();
    for k in 0..30 {
        let x = 3.0 + (k as f64 * 0.31) % 9.0;
        let y = 0.2 + (k as f64 * 0.17) % 3.5;
        map.ingest(Point3d::planar(x, y), (k as f64).sqrt() / 7.0).unwrap();
    }

    let text = map.dump();
    let values: Vec<&str> = text.trim_end().split(", ").collect();
    assert_eq!(values.len(), 64 * 64);

    let layer = parse_dump(&text, 64, 64).unwrap();
    assert_eq!(&layer, map.average_concentrations());
}

#[test]
fn test_out_of_domain_query_rejected() {
    let map = GasMap::new(&Config::default()).unwrap();
    match map.query(&Point3d::planar(1.0, 1.0)) {
        Err(GasMapError::OutOfDomain { x, y }) => {
            assert_eq!(x, 1.0);
            assert_eq!(y, 1.0);
        }
        other => panic!("expected OutOfDomain, got {:?}", other),
    }
    assert!(map.query(&Point3d::planar(12.7418, 3.9916)).is_ok());
}

/// Samples averaged by the buffer feed the map like any other observation;
/// readings inside an obstacle are zeroed by the host first.
#[test]
fn test_buffered_sensors_with_obstacles() {
    init_logger();
    let obstacles: ObstacleSet = vec![AxisAlignedRect::new(2.5, 3.5, 2.5, 3.5)]
        .into_iter()
        .collect();
    let sensors = [Point3d::planar(1.0, 1.0), Point3d::planar(3.0, 3.0)];

    let mut map = GasMap::new(&small_config()).unwrap();
    for (k, sensor) in sensors.iter().enumerate() {
        let mut buffer = SampleBuffer::new(5).unwrap();
        for r in 0..5 {
            let mut reading = 4.0 + k as f64 + r as f64 * 0.5;
            let mut wind = WindReading::from_vector(0.5, 0.0, 0.0);
            if obstacles.contains(sensor) {
                reading = 0.0;
                wind = WindReading::calm();
            }
            buffer.push(Sample::new(reading, wind)).unwrap();
        }
        let summary = buffer.summary().unwrap();
        let observation = summary.observation(*sensor);
        map.ingest(observation.position, observation.concentration)
            .unwrap();
    }

    assert_eq!(map.samples_ingested(), 2);
    // The first sensor averaged 5.0; the masked one contributes zero.
    let near_first = map.query(&Point3d::planar(1.0, 1.0)).unwrap();
    assert!(near_first > 0.0 && near_first < 5.0);
    let at_obstacle = map.query(&Point3d::planar(3.0, 3.0)).unwrap();
    assert!(at_obstacle < near_first);
}
