//! 3D simplex gradient noise.
//!
//! CPU reference for `shaders/noise.wgsl`. Both sides use the same mod-289 permutation
//! polynomial and gradient construction so a value sampled here is the value the
//! fragment shader sees (up to float rounding). Stateless, total over all of R³.

use glam::{Vec3, Vec3Swizzles, Vec4, Vec4Swizzles};

/// Skew/unskew factors for the 3D simplex lattice
const SKEW: f32 = 1.0 / 3.0;
const UNSKEW: f32 = 1.0 / 6.0;

/// Output scale that maps the kernel sum onto roughly [-1, 1]
const OUTPUT_SCALE: f32 = 42.0;

/// Squared radius of each corner's falloff kernel
const KERNEL_RADIUS_SQ: f32 = 0.6;

fn mod289_3(x: Vec3) -> Vec3 {
    x - (x * (1.0 / 289.0)).floor() * 289.0
}

fn mod289_4(x: Vec4) -> Vec4 {
    x - (x * (1.0 / 289.0)).floor() * 289.0
}

/// Permutation polynomial (34x² + x) mod 289
fn permute(x: Vec4) -> Vec4 {
    mod289_4((x * 34.0 + 1.0) * x)
}

fn taylor_inv_sqrt(r: Vec4) -> Vec4 {
    Vec4::splat(1.792_842_9) - r * 0.853_734_7
}

/// GLSL `step`: 0 where `x < edge`, 1 otherwise
fn step3(edge: Vec3, x: Vec3) -> Vec3 {
    Vec3::select(x.cmplt(edge), Vec3::ZERO, Vec3::ONE)
}

fn step4(edge: Vec4, x: Vec4) -> Vec4 {
    Vec4::select(x.cmplt(edge), Vec4::ZERO, Vec4::ONE)
}

/// Sample simplex noise at `v`. Result lies in [-1, 1] (with a few thousandths of overshoot).
pub fn noise3(v: Vec3) -> f32 {
    // First corner
    let i = (v + Vec3::splat(v.dot(Vec3::splat(SKEW)))).floor();
    let x0 = v - i + Vec3::splat(i.dot(Vec3::splat(UNSKEW)));

    // Other corners, ordered by which axis of x0 dominates
    let g = step3(x0.yzx(), x0);
    let l = Vec3::ONE - g;
    let i1 = g.min(l.zxy());
    let i2 = g.max(l.zxy());

    let x1 = x0 - i1 + Vec3::splat(UNSKEW);
    let x2 = x0 - i2 + Vec3::splat(SKEW);
    let x3 = x0 - Vec3::splat(0.5);

    // Hash the four corners
    let i = mod289_3(i);
    let p = permute(
        permute(
            permute(Vec4::splat(i.z) + Vec4::new(0.0, i1.z, i2.z, 1.0))
                + Vec4::splat(i.y)
                + Vec4::new(0.0, i1.y, i2.y, 1.0),
        ) + Vec4::splat(i.x)
            + Vec4::new(0.0, i1.x, i2.x, 1.0),
    );

    // Gradients: 7x7 points over a square, mapped onto an octahedron
    let n = 1.0 / 7.0;
    let ns = Vec3::new(2.0 * n, 0.5 * n - 1.0, n);

    let j = p - 49.0 * (p * ns.z * ns.z).floor();

    let x_ = (j * ns.z).floor();
    let y_ = (j - 7.0 * x_).floor();

    let x = x_ * ns.x + Vec4::splat(ns.y);
    let y = y_ * ns.x + Vec4::splat(ns.y);
    let h = Vec4::ONE - x.abs() - y.abs();

    let b0 = Vec4::new(x.x, x.y, y.x, y.y);
    let b1 = Vec4::new(x.z, x.w, y.z, y.w);

    let s0 = b0.floor() * 2.0 + Vec4::ONE;
    let s1 = b1.floor() * 2.0 + Vec4::ONE;
    let sh = -step4(h, Vec4::ZERO);

    let a0 = b0.xzyw() + s0.xzyw() * sh.xxyy();
    let a1 = b1.xzyw() + s1.xzyw() * sh.zzww();

    let p0 = Vec3::new(a0.x, a0.y, h.x);
    let p1 = Vec3::new(a0.z, a0.w, h.y);
    let p2 = Vec3::new(a1.x, a1.y, h.z);
    let p3 = Vec3::new(a1.z, a1.w, h.w);

    // Normalise gradients
    let norm = taylor_inv_sqrt(Vec4::new(
        p0.dot(p0),
        p1.dot(p1),
        p2.dot(p2),
        p3.dot(p3),
    ));
    let p0 = p0 * norm.x;
    let p1 = p1 * norm.y;
    let p2 = p2 * norm.z;
    let p3 = p3 * norm.w;

    // Mix final noise value
    let m = (Vec4::splat(KERNEL_RADIUS_SQ)
        - Vec4::new(x0.dot(x0), x1.dot(x1), x2.dot(x2), x3.dot(x3)))
    .max(Vec4::ZERO);
    let m = m * m;

    OUTPUT_SCALE * (m * m).dot(Vec4::new(p0.dot(x0), p1.dot(x1), p2.dot(x2), p3.dot(x3)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_point(rng: &mut StdRng, extent: f32) -> Vec3 {
        Vec3::new(
            rng.random_range(-extent..extent),
            rng.random_range(-extent..extent),
            rng.random_range(-extent..extent),
        )
    }

    #[test]
    fn test_noise_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let p = random_point(&mut rng, 100.0);
            assert_eq!(noise3(p).to_bits(), noise3(p).to_bits());
        }
    }

    #[test]
    fn test_noise_range_over_random_points() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..10_000 {
            let p = random_point(&mut rng, 50.0);
            let value = noise3(p);
            assert!(
                (-1.05..=1.05).contains(&value),
                "noise({:?}) = {} out of range",
                p,
                value
            );
        }
    }

    #[test]
    fn test_noise_is_continuous() {
        let mut rng = StdRng::seed_from_u64(3);
        let eps = 1e-4;
        for _ in 0..2000 {
            let p = random_point(&mut rng, 20.0);
            let q = p + Vec3::new(eps, -eps, eps);
            assert!(
                (noise3(p) - noise3(q)).abs() < 0.01,
                "jump between {:?} and {:?}",
                p,
                q
            );
        }
    }

    #[test]
    fn test_noise_varies_across_space() {
        let samples: Vec<f32> = (0..64)
            .map(|i| noise3(Vec3::new(i as f32 * 0.37, i as f32 * 0.11, 1.5)))
            .collect();
        let min = samples.iter().copied().fold(f32::MAX, f32::min);
        let max = samples.iter().copied().fold(f32::MIN, f32::max);
        assert!(max - min > 0.5, "noise too flat: [{}, {}]", min, max);
    }
}
