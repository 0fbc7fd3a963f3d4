//! Randomized algebra oracles: the strategies check each other.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use tensa_core::{Tensor, ThreadMode};
use tensa_linalg::{
    batched_determinant, batched_matmul, determinant_gaussian, determinant_laplace, divide,
    invert, lu, matmul, plu, power, reduced_row_echelon,
};

fn random_int_matrix(rng: &mut StdRng, n: usize) -> Tensor<i64> {
    let data: Vec<i64> = (0..n * n).map(|_| rng.gen_range(-6..=6)).collect();
    Tensor::from_vec(data, &[n, n]).unwrap()
}

fn random_float_matrix(rng: &mut StdRng, n: usize) -> Tensor<f64> {
    let data: Vec<f64> = (0..n * n).map(|_| rng.gen_range(-4.0..4.0)).collect();
    Tensor::from_vec(data, &[n, n]).unwrap()
}

fn assert_close(a: &Tensor<f64>, b: &Tensor<f64>, tol: f64) {
    assert_eq!(a.shape(), b.shape());
    for (x, y) in a.iter().zip(b.iter()) {
        assert!((x - y).abs() < tol, "{x} vs {y}");
    }
}

#[test]
fn determinant_strategies_agree_on_random_integers() {
    // Entries and orders kept small: the deferred-division fractions grow
    // multiplicatively, and i64 must hold every intermediate numerator.
    let mut rng = StdRng::seed_from_u64(42);
    for n in 1..=3 {
        for _ in 0..25 {
            let data: Vec<i64> = (0..n * n).map(|_| rng.gen_range(-4..=4)).collect();
            let m = Tensor::from_vec(data, &[n, n]).unwrap();
            assert_eq!(
                determinant_laplace(&m).unwrap(),
                determinant_gaussian(&m).unwrap(),
                "order {n}: {m}"
            );
        }
    }
}

#[test]
fn determinant_strategies_agree_on_random_floats() {
    let mut rng = StdRng::seed_from_u64(42);
    for n in 1..=5 {
        for _ in 0..10 {
            let m = random_float_matrix(&mut rng, n);
            let l = determinant_laplace(&m).unwrap();
            let g = determinant_gaussian(&m).unwrap();
            assert!((l - g).abs() < 1e-6 * (1.0 + l.abs()), "order {n}: {l} vs {g}");
        }
    }
}

#[test]
fn determinant_is_multiplicative() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..10 {
        let a = random_int_matrix(&mut rng, 3);
        let b = random_int_matrix(&mut rng, 3);
        let lhs = determinant_laplace(&matmul(&a, &b).unwrap()).unwrap();
        let rhs = determinant_laplace(&a).unwrap() * determinant_laplace(&b).unwrap();
        assert_eq!(lhs, rhs);
    }
}

#[test]
fn inversion_roundtrips_on_random_floats() {
    let mut rng = StdRng::seed_from_u64(9);
    let id = Tensor::<f64>::identity(3);
    let mut checked = 0;
    while checked < 10 {
        let m = random_float_matrix(&mut rng, 3);
        if determinant_gaussian(&m).unwrap().abs() < 0.5 {
            continue; // skip near-singular draws
        }
        let inv = invert(&m).unwrap();
        assert_close(&matmul(&m, &inv).unwrap(), &id, 1e-9);
        assert_close(&invert(&inv).unwrap(), &m, 1e-9);
        checked += 1;
    }
}

#[test]
fn division_undoes_multiplication() {
    let mut rng = StdRng::seed_from_u64(23);
    let mut checked = 0;
    while checked < 10 {
        let a = random_float_matrix(&mut rng, 3);
        let b = random_float_matrix(&mut rng, 3);
        if determinant_gaussian(&b).unwrap().abs() < 0.5 {
            continue;
        }
        let ab = matmul(&a, &b).unwrap();
        assert_close(&divide(&ab, &b).unwrap(), &a, 1e-8);
        checked += 1;
    }
}

#[test]
fn plu_reconstructs_random_floats() {
    let mut rng = StdRng::seed_from_u64(5);
    for n in 1..=4 {
        for _ in 0..10 {
            let m = random_float_matrix(&mut rng, n);
            let (p, l, u) = plu(&m).unwrap();
            assert_close(
                &matmul(&p, &m).unwrap(),
                &matmul(&l, &u).unwrap(),
                1e-9,
            );
        }
    }
}

#[test]
fn lu_agrees_with_plu_when_no_swaps_needed() {
    // Diagonally dominant, so straight Doolittle succeeds.
    let m = Tensor::from_vec(
        vec![8.0f64, 1.0, 2.0, 2.0, 9.0, 1.0, 1.0, 2.0, 7.0],
        &[3, 3],
    )
    .unwrap();
    let (l, u) = lu(&m).unwrap();
    let (p, l2, u2) = plu(&m).unwrap();
    assert_eq!(p, Tensor::identity(3));
    assert_close(&l, &l2, 1e-12);
    assert_close(&u, &u2, 1e-12);
}

#[test]
fn rref_solves_random_invertible_systems() {
    let mut rng = StdRng::seed_from_u64(17);
    let mut checked = 0;
    while checked < 10 {
        let a = random_float_matrix(&mut rng, 3);
        if determinant_gaussian(&a).unwrap().abs() < 0.5 {
            continue;
        }
        let x: Vec<f64> = (0..3).map(|_| rng.gen_range(-3.0..3.0)).collect();
        let xs = Tensor::from_vec(x.clone(), &[3]).unwrap();
        let rhs = matmul(&a, &xs).unwrap();
        // Augment [A | b] and reduce; the last column is the solution.
        let mut aug = Vec::with_capacity(12);
        for i in 0..3 {
            for j in 0..3 {
                aug.push(*a.get(&[i, j]).unwrap());
            }
            aug.push(*rhs.get(&[i]).unwrap());
        }
        let aug = Tensor::from_vec(aug, &[3, 4]).unwrap();
        let r = reduced_row_echelon(&aug).unwrap();
        for i in 0..3 {
            assert!((r.get(&[i, 3]).unwrap() - x[i]).abs() < 1e-8);
        }
        checked += 1;
    }
}

#[test]
fn power_laws_hold() {
    let mut rng = StdRng::seed_from_u64(31);
    let m = random_int_matrix(&mut rng, 3);
    // M^(a+b) = M^a · M^b
    let lhs = power(&m, 7).unwrap();
    let rhs = matmul(&power(&m, 3).unwrap(), &power(&m, 4).unwrap()).unwrap();
    assert_eq!(lhs, rhs);
    assert_eq!(power(&m, 0).unwrap(), Tensor::identity(3));
}

#[test]
fn batched_results_match_per_slot_loops() {
    let mut rng = StdRng::seed_from_u64(3);
    let data: Vec<i64> = (0..6 * 9).map(|_| rng.gen_range(-5..5)).collect();
    let stack = Tensor::from_vec(data, &[2, 3, 3, 3]).unwrap();

    let dets = batched_determinant(&stack, ThreadMode::Parallel).unwrap();
    assert_eq!(dets.shape().dims(), &[2, 3]);
    for i in 0..2 {
        for j in 0..3 {
            let slot = stack
                .subtensor(i)
                .unwrap()
                .subtensor(j)
                .unwrap()
                .to_tensor();
            assert_eq!(
                dets.get(&[i, j]).unwrap(),
                &determinant_gaussian(&slot).unwrap()
            );
        }
    }

    let prods = batched_matmul(&stack, &stack, ThreadMode::Auto).unwrap();
    for i in 0..2 {
        for j in 0..3 {
            let slot = stack
                .subtensor(i)
                .unwrap()
                .subtensor(j)
                .unwrap()
                .to_tensor();
            let expect = matmul(&slot, &slot).unwrap();
            let got = prods.subtensor(i).unwrap().subtensor(j).unwrap().to_tensor();
            assert_eq!(got, expect);
        }
    }
}
