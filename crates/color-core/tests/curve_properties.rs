//! Randomized property coverage for tabulated-curve inversion, seeded so failures reproduce.

use color_core::math::invert_tabulated_curve;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Build a monotonic increasing curve with `points` samples by accumulating random
/// non-negative steps, then rescaling into `[0, 1]`.
fn random_monotonic_curve(rng: &mut ChaCha8Rng, points: usize) -> Vec<f64> {
    let mut curve = Vec::with_capacity(points);
    let mut acc = 0.0;
    for _ in 0..points {
        acc += rng.gen_range(0.0..1.0);
        curve.push(acc);
    }
    let max = *curve.last().unwrap();
    for v in curve.iter_mut() {
        *v /= max;
    }
    curve
}

#[test]
fn inverted_tabulated_curve_round_trips_within_one_grid_step() {
    let mut rng = ChaCha8Rng::seed_from_u64(0xC0FFEE);
    let grid = 256usize;

    for _ in 0..32 {
        let points = rng.gen_range(8usize..64);
        let forward = random_monotonic_curve(&mut rng, points);
        let inverse = invert_tabulated_curve(&forward, grid);

        // Walk the forward curve's own sample points: each one's y-value, looked up in the
        // inverse table, should land back near the x it came from.
        for k in 0..points {
            let x_expected = k as f64 / (points - 1) as f64;
            let y = forward[k];
            let i = ((y * (grid - 1) as f64).round() as usize).min(grid - 1);
            let x_got = inverse[i];

            assert!(
                (x_got - x_expected).abs() <= 1.0 / points as f64 + 1.0 / grid as f64,
                "k={k} x_expected={x_expected} y={y} x_got={x_got} points={points}"
            );
        }
    }
}

#[test]
fn inverted_tabulated_curve_handles_decreasing_direction() {
    let mut rng = ChaCha8Rng::seed_from_u64(0xFACE);
    let mut forward = random_monotonic_curve(&mut rng, 40);
    for v in forward.iter_mut() {
        *v = 1.0 - *v;
    }

    let inverse = invert_tabulated_curve(&forward, 64);
    assert!((inverse[0] - 0.0).abs() < 1e-6 || (inverse[0] - 1.0).abs() < 1e-6);
    assert!(inverse.iter().all(|v| (0.0..=1.0).contains(v)));
}
