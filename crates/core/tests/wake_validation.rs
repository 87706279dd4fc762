//! Wake deficit models and farm-level aggregation

use approx::assert_abs_diff_eq;
use windsite_core::wake::{downstream_unit, GLOBAL_LOSS_SECTORS};
use windsite_core::{
    Turbine, TurbineWake, Vec2, WakeCollection, WakeGrid, WakeModel, WakeModelConfig, WakeModelKind, WindFarm,
};

fn wake(id: &str, x: f64, y: f64) -> TurbineWake {
    TurbineWake::new(id, x, y, 80.0, 100.0, 0.8)
}

fn models() -> Vec<WakeModel> {
    let mut models = Vec::new();
    for kind in [WakeModelKind::Jensen, WakeModelKind::Larsen] {
        for deflection in [0.0, 0.05] {
            models.push(WakeModel::new(WakeModelConfig {
                model: kind,
                deflection_coefficient: deflection,
                ..WakeModelConfig::default()
            }));
        }
    }
    models
}

#[test]
fn test_no_deficit_upstream_in_any_direction() {
    let source = wake("T1", 250.0, -120.0);
    for model in models() {
        for step in 0..72 {
            let direction = f64::from(step) * 5.0;
            let upstream = source.position() - downstream_unit(direction) * 400.0;
            assert_eq!(
                model.deficit_at(upstream, &source, direction),
                0.0,
                "{} deficit upstream at {direction}°",
                model.kind()
            );
            // The rotor plane itself is not in the wake
            assert_eq!(model.deficit_at(source.position(), &source, direction), 0.0);
        }
    }
}

#[test]
fn test_deficits_stay_in_unit_interval() {
    let source = wake("T1", 0.0, 0.0);
    for model in models() {
        for step in 1..=40 {
            let downstream = f64::from(step) * 50.0;
            let point = source.position() + downstream_unit(30.0) * downstream;
            let deficit = model.deficit_at(point, &source, 30.0);
            assert!((0.0..=1.0).contains(&deficit), "{deficit} at {downstream} m");
        }
    }
}

#[test]
fn test_larsen_decays_downstream() {
    let model = WakeModel::larsen();
    let near = model.larsen_deficit(300.0, 100.0, 0.8);
    let far = model.larsen_deficit(1500.0, 100.0, 0.8);
    assert!(near > far);
    assert_abs_diff_eq!(model.larsen_deficit(500.0, 100.0, 0.8), 0.4 / 2.25, epsilon = 1e-12);
}

#[test]
fn test_superposition_bounded_and_dominates_single_wake() {
    // A row along x with wind from 180°: everything flows towards +x
    let row: Vec<TurbineWake> = (0..5).map(|i| wake(&format!("T{i}"), f64::from(i) * 300.0, 0.0)).collect();
    let model = WakeModel::larsen();
    let point = Vec2::new(2000.0, 0.0);

    let total = model.total_deficit(point, &row, 180.0);
    assert!(total <= 1.0);
    for source in &row {
        assert!(total >= model.deficit_at(point, source, 180.0));
    }

    // Many overlapping strong wakes saturate at 1
    let crowd: Vec<TurbineWake> = (0..50).map(|i| wake(&format!("C{i}"), -f64::from(i), 0.0)).collect();
    assert_eq!(model.total_deficit(Vec2::new(150.0, 0.0), &crowd, 180.0), 1.0);
}

#[test]
fn test_single_turbine_loss_is_downstream_deficit() {
    let farm = WakeCollection::with_wakes(WakeModel::larsen(), vec![wake("T1", 0.0, 0.0)]);
    let expected = 0.4 / 2.25;

    let sectors = farm.sector_losses(8);
    assert_eq!(sectors.len(), 8);
    for loss in &sectors {
        assert_abs_diff_eq!(loss.loss_fraction, expected, epsilon = 1e-9);
        assert_abs_diff_eq!(loss.loss_percent, expected * 100.0, epsilon = 1e-7);
    }
    assert_abs_diff_eq!(sectors[3].direction_range.0, 135.0, epsilon = 1e-12);
    assert_abs_diff_eq!(sectors[3].direction_range.1, 180.0, epsilon = 1e-12);
    assert_abs_diff_eq!(farm.global_loss(), expected, epsilon = 1e-9);
}

#[test]
fn test_sector_loss_averages_each_turbines_own_wake() {
    // Two tightly packed rotors of different size
    let farm = WakeCollection::with_wakes(
        WakeModel::larsen(),
        vec![wake("T1", 0.0, 0.0), TurbineWake::new("T2", 150.0, 40.0, 80.0, 80.0, 0.5)],
    );
    let expected = 0.5 * (0.4 / 2.25 + 0.25 / 2.25);

    let sectors = farm.sector_losses(4);
    let centres: Vec<f64> = sectors.iter().map(|s| s.wind_direction()).collect();
    assert_eq!(centres, vec![45.0, 135.0, 225.0, 315.0]);
    for loss in &sectors {
        assert_abs_diff_eq!(loss.loss_fraction, expected, epsilon = 1e-9);
    }
}

#[test]
fn test_global_loss_is_unweighted_sector_mean() {
    let wakes = vec![
        wake("T1", 0.0, 0.0),
        wake("T2", 600.0, 0.0),
        wake("T3", 0.0, 700.0),
        wake("T4", 900.0, 900.0),
    ];
    for model in models() {
        let farm = WakeCollection::with_wakes(model, wakes.clone());
        let sectors = farm.sector_losses(GLOBAL_LOSS_SECTORS);
        let mean = sectors.iter().map(|s| s.loss_fraction).sum::<f64>() / GLOBAL_LOSS_SECTORS as f64;

        assert_abs_diff_eq!(farm.global_loss(), mean, epsilon = 1e-12);
        let report = farm.report();
        assert_eq!(report.n_turbines, 4);
        assert_eq!(report.sector_losses, sectors);
        assert_abs_diff_eq!(report.global_loss_percent, mean * 100.0, epsilon = 1e-9);
        assert!((0.0..=1.0).contains(&report.global_loss));
    }
}

#[test]
fn test_collection_from_farm() {
    let mut farm = WindFarm::new("site");
    farm.add_turbine(Turbine::new("A", 0.0, 0.0, 90.0, 120.0).unwrap());
    farm.add_turbine(Turbine::new("B", 800.0, 0.0, 90.0, 120.0).unwrap().with_ct(0.75).unwrap());

    let collection = WakeCollection::from_farm(WakeModel::larsen(), &farm);
    assert_eq!(collection.len(), 2);
    assert_eq!(collection.wakes[1].ct, 0.75);
    assert_eq!(collection.wakes[0].id, "A");
}

#[test]
fn test_wake_map_shape_and_upstream_cells() {
    let farm = WakeCollection::with_wakes(WakeModel::larsen(), vec![wake("T1", 0.0, 0.0), wake("T2", 0.0, 800.0)]);
    let grid = WakeGrid::around(&farm.wakes, 21, 1000.0);
    assert_eq!(grid.xs.len(), 21);
    assert_eq!(grid.n_cells(), 21 * 21);

    // From 270°: the wake runs towards +y
    let map = farm.wake_map(&grid, 80.0, 270.0);
    assert_eq!(map.deficits.nrows(), grid.ys.len());
    assert_eq!(map.deficits.ncols(), grid.xs.len());
    assert_eq!(map.hub_height, 80.0);

    assert_eq!(map.sample(0.0, -500.0), Some(0.0));
    assert!(map.sample(0.0, 400.0).is_some_and(|d| d > 0.0));
    assert!(map.max_deficit() <= 1.0);
    assert!(map.mean_deficit() > 0.0);

    let empty = WakeCollection::new(WakeModel::jensen());
    let map = empty.wake_map(&WakeGrid::around(&empty.wakes, 10, 100.0), 80.0, 0.0);
    assert_eq!(map.sample(0.0, 0.0), None);
    assert_eq!(map.mean_deficit(), 0.0);
}
