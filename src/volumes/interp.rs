// Copyright @yucwang 2026

use crate::buffer::voxel_buffer::VoxelBuffer;
use crate::math::color::Color;
use crate::math::constants::{ Float, Int, Vector3f, EPSILON };

/// Resampling filter used when a voxel buffer is evaluated at a
/// continuous voxel-space position.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InterpKind {
    Nearest,
    Linear,
    Cubic,
    MonotonicCubic,
    Gaussian,
    Mitchell,
}

/// Evaluates a buffer at a continuous voxel-space position. Voxel
/// centers lie at half-integer coordinates, so every kernel shifts the
/// position by -0.5 before taking integer parts. Out-of-window taps are
/// clamped to the nearest in-window index per axis; the buffer never
/// wraps or extrapolates.
pub fn sample(kind: InterpKind, buffer: &VoxelBuffer, vs_p: Vector3f) -> Color {
    match kind {
        InterpKind::Nearest => sample_nearest(buffer, vs_p),
        InterpKind::Linear => sample_linear(buffer, vs_p),
        InterpKind::Cubic => sample_cubic(buffer, vs_p, cubic_1d),
        InterpKind::MonotonicCubic => sample_cubic(buffer, vs_p, mono_cubic_1d),
        InterpKind::Gaussian => sample_filtered(buffer, vs_p, gaussian_weight),
        InterpKind::Mitchell => sample_filtered(buffer, vs_p, mitchell_weight),
    }
}

fn clamped_value(buffer: &VoxelBuffer, i: Int, j: Int, k: Int) -> Color {
    let (ci, cj, ck) = buffer.data_window().clamp_index(i, j, k);
    buffer.value(ci, cj, ck)
}

fn sample_nearest(buffer: &VoxelBuffer, vs_p: Vector3f) -> Color {
    // Continuous-to-discrete conversion: the voxel containing vs_p.
    clamped_value(buffer,
                  vs_p.x.floor() as Int,
                  vs_p.y.floor() as Int,
                  vs_p.z.floor() as Int)
}

fn sample_linear(buffer: &VoxelBuffer, vs_p: Vector3f) -> Color {
    let p = vs_p - Vector3f::new(0.5, 0.5, 0.5);
    let c = Vector3f::new(p.x.floor(), p.y.floor(), p.z.floor());
    let (tx, ty, tz) = (p.x - c.x, p.y - c.y, p.z - c.z);
    let (i, j, k) = (c.x as Int, c.y as Int, c.z as Int);

    let lerp = |t: Float, a: Color, b: Color| a * (1.0 - t) + b * t;

    let c000 = clamped_value(buffer, i, j, k);
    let c100 = clamped_value(buffer, i + 1, j, k);
    let c010 = clamped_value(buffer, i, j + 1, k);
    let c110 = clamped_value(buffer, i + 1, j + 1, k);
    let c001 = clamped_value(buffer, i, j, k + 1);
    let c101 = clamped_value(buffer, i + 1, j, k + 1);
    let c011 = clamped_value(buffer, i, j + 1, k + 1);
    let c111 = clamped_value(buffer, i + 1, j + 1, k + 1);

    lerp(tz,
         lerp(ty, lerp(tx, c000, c100), lerp(tx, c010, c110)),
         lerp(ty, lerp(tx, c001, c101), lerp(tx, c011, c111)))
}

/// Catmull-Rom cubic through four samples, x in [0, 1] between p[1]
/// and p[2]. Componentwise over color channels.
fn cubic_1d(x: Float, p: [Color; 4]) -> Color {
    p[1] + 0.5 * x *
        (p[2] - p[0] +
         x * (2.0 * p[0] - 5.0 * p[1] + 4.0 * p[2] - p[3] +
              x * (3.0 * (p[1] - p[2]) + p[3] - p[0])))
}

/// Slope-limited Hermite cubic: monotone between p[1] and p[2], so the
/// reconstruction never overshoots the surrounding samples.
fn mono_cubic_1d(x: Float, p: [Color; 4]) -> Color {
    let channel = |p0: Float, p1: Float, p2: Float, p3: Float| {
        let delta = p2 - p1;
        let mut d1 = 0.5 * (p2 - p0);
        let mut d2 = 0.5 * (p3 - p1);
        if delta == 0.0 {
            d1 = 0.0;
            d2 = 0.0;
        } else {
            if d1 * delta < 0.0 {
                d1 = 0.0;
            }
            if d2 * delta < 0.0 {
                d2 = 0.0;
            }
            let limit = 3.0 * delta.abs();
            d1 = d1.clamp(-limit, limit);
            d2 = d2.clamp(-limit, limit);
        }
        p1 + x * (d1 + x * (3.0 * delta - 2.0 * d1 - d2 +
                            x * (d1 + d2 - 2.0 * delta)))
    };
    Color::new(
        channel(p[0].x, p[1].x, p[2].x, p[3].x),
        channel(p[0].y, p[1].y, p[2].y, p[3].y),
        channel(p[0].z, p[1].z, p[2].z, p[3].z),
    )
}

/// Separable 4x4x4 tensor application of a 1D interpolant: x first,
/// then y, then z. The order matters for the slope-limited variant.
fn sample_cubic(buffer: &VoxelBuffer, vs_p: Vector3f,
                interp_1d: fn(Float, [Color; 4]) -> Color) -> Color {
    let p = vs_p - Vector3f::new(0.5, 0.5, 0.5);
    let f = Vector3f::new(p.x.floor(), p.y.floor(), p.z.floor());
    let (x, y, z) = (p.x - f.x, p.y - f.y, p.z - f.z);
    let c = Vector3f::new(f.x - 1.0, f.y - 1.0, f.z - 1.0);

    let mut z_interps = [Color::new(0.0, 0.0, 0.0); 4];
    for ki in 0..4 {
        let mut y_interps = [Color::new(0.0, 0.0, 0.0); 4];
        for ji in 0..4 {
            let mut taps = [Color::new(0.0, 0.0, 0.0); 4];
            for ii in 0..4 {
                taps[ii] = clamped_value(buffer,
                                         c.x as Int + ii as Int,
                                         c.y as Int + ji as Int,
                                         c.z as Int + ki as Int);
            }
            y_interps[ji] = interp_1d(x, taps);
        }
        z_interps[ki] = interp_1d(y, y_interps);
    }
    interp_1d(z, z_interps)
}

const GAUSSIAN_ALPHA: Float = 2.0;
const FILTER_WIDTH: Float = 2.0;

/// Gaussian-minus-floor filter: the tail beyond the filter width is
/// subtracted off so the weight reaches exactly zero at the stencil
/// edge.
fn gaussian_weight(x: Float) -> Float {
    let floor = (-GAUSSIAN_ALPHA * FILTER_WIDTH * FILTER_WIDTH).exp();
    ((-GAUSSIAN_ALPHA * x * x).exp() - floor).max(0.0)
}

/// Mitchell-Netravali piecewise cubic with B = C = 1/3.
fn mitchell_weight(x: Float) -> Float {
    const B: Float = 1.0 / 3.0;
    const C: Float = 1.0 / 3.0;
    let ax = x.abs();
    if ax < 1.0 {
        ((12.0 - 9.0 * B - 6.0 * C) * ax * ax * ax +
         (-18.0 + 12.0 * B + 6.0 * C) * ax * ax +
         (6.0 - 2.0 * B)) / 6.0
    } else if ax < 2.0 {
        ((-B - 6.0 * C) * ax * ax * ax +
         (6.0 * B + 30.0 * C) * ax * ax +
         (-12.0 * B - 48.0 * C) * ax +
         (8.0 * B + 24.0 * C)) / 6.0
    } else {
        0.0
    }
}

/// Normalized 4x4x4 filter application with a separable weight
/// function. A weight sum of zero falls back to the nearest tap rather
/// than dividing by zero.
fn sample_filtered(buffer: &VoxelBuffer, vs_p: Vector3f,
                   weight: fn(Float) -> Float) -> Color {
    // Keep the stencil's lower corner from underflowing the window at
    // the volume boundary.
    let clamped = Vector3f::new(vs_p.x.max(0.5), vs_p.y.max(0.5),
                                vs_p.z.max(0.5));
    let p = clamped - Vector3f::new(0.5, 0.5, 0.5);
    let f = Vector3f::new(p.x.floor(), p.y.floor(), p.z.floor());
    let (x, y, z) = (p.x - f.x, p.y - f.y, p.z - f.z);
    let c = Vector3f::new(f.x - 1.0, f.y - 1.0, f.z - 1.0);

    let mut value = Color::new(0.0, 0.0, 0.0);
    let mut weight_sum = 0.0;
    for ki in 0..4 {
        let wz = weight(z - (ki as Float - 1.0));
        for ji in 0..4 {
            let wy = weight(y - (ji as Float - 1.0));
            for ii in 0..4 {
                let wx = weight(x - (ii as Float - 1.0));
                let w = wx * wy * wz;
                if w == 0.0 {
                    continue;
                }
                value += w * clamped_value(buffer,
                                           c.x as Int + ii as Int,
                                           c.y as Int + ji as Int,
                                           c.z as Int + ki as Int);
                weight_sum += w;
            }
        }
    }

    if weight_sum < EPSILON {
        return sample_nearest(buffer, vs_p);
    }
    value / weight_sum
}

/* Tests for interpolation kernels */
