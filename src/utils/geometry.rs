// src/utils/geometry.rs

type Vec3 = [f64; 3];

/// Angle between two vectors in degrees, in [0, 180]
pub fn vector_angle(v1: Vec3, v2: Vec3) -> f64 {
    let cos = dot(v1, v2) / (len(v1) * len(v2));
    cos.clamp(-1.0, 1.0).acos().to_degrees()
}

// --- Internal Math Helpers for [f64; 3] ---

pub(crate) fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub(crate) fn add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

pub(crate) fn scale(a: Vec3, f: f64) -> Vec3 {
    [a[0] * f, a[1] * f, a[2] * f]
}

fn dot(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn len(a: Vec3) -> f64 {
    dot(a, a).sqrt()
}
