use std::f64::consts::PI;
use rand::Rng;

pub type Vec3 = [f64; 3];

/// Projects a latitude/longitude onto a sphere
///
/// (0, 0) lands on +x, (0, -90) on +z and the north pole on +y.
///
/// # Arguments
///
/// * 'lat' - latitude in degrees
/// * 'lng' - longitude in degrees
/// * 'radius' - sphere radius
pub fn lat_lng_to_vector(lat: f64, lng: f64, radius: f64) -> Vec3 {
    let phi = (90.0 - lat).to_radians();
    let theta = (lng + 180.0).to_radians();

    [
        -radius * phi.sin() * theta.cos(),
        radius * phi.cos(),
        radius * phi.sin() * theta.sin(),
    ]
}

/// Returns a uniformly distributed direction scaled to a random radius in [r_min, r_max)
///
/// # Arguments
///
/// * 'rng' - random source
/// * 'r_min' - inner shell radius
/// * 'r_max' - outer shell radius
pub fn random_on_shell<R: Rng + ?Sized>(rng: &mut R, r_min: f64, r_max: f64) -> Vec3 {
    let radius = r_min + rng.random::<f64>() * (r_max - r_min);
    let theta = rng.random::<f64>() * PI * 2.0;
    let phi = (rng.random::<f64>() * 2.0 - 1.0).acos();

    [
        radius * phi.sin() * theta.cos(),
        radius * phi.sin() * theta.sin(),
        radius * phi.cos(),
    ]
}

pub fn add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

pub fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub fn scale(a: Vec3, s: f64) -> Vec3 {
    [a[0] * s, a[1] * s, a[2] * s]
}

pub fn dot(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

pub fn length(a: Vec3) -> f64 {
    dot(a, a).sqrt()
}

pub fn distance(a: Vec3, b: Vec3) -> f64 {
    length(sub(a, b))
}

pub fn normalize(a: Vec3) -> Vec3 {
    let len = length(a);
    if len > 0.0 { scale(a, 1.0 / len) } else { a }
}

/// Rotates a vector around the y axis, right handed
pub fn rotate_y(a: Vec3, angle: f64) -> Vec3 {
    let (sin, cos) = angle.sin_cos();
    [a[0] * cos + a[2] * sin, a[1], -a[0] * sin + a[2] * cos]
}

/// Converts 0xRRGGBB into rgb components in 0..=1
pub fn hex_to_rgb(hex: u32) -> Vec3 {
    [
        ((hex >> 16) & 0xff) as f64 / 255.0,
        ((hex >> 8) & 0xff) as f64 / 255.0,
        (hex & 0xff) as f64 / 255.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn assert_close(a: Vec3, b: Vec3) {
        assert!(distance(a, b) < 1e-9, "{:?} != {:?}", a, b);
    }

    #[test]
    fn projection_axes() {
        assert_close(lat_lng_to_vector(0.0, 0.0, 1.0), [1.0, 0.0, 0.0]);
        assert_close(lat_lng_to_vector(0.0, -90.0, 1.0), [0.0, 0.0, 1.0]);
        assert_close(lat_lng_to_vector(90.0, 0.0, 1.0), [0.0, 1.0, 0.0]);
        assert_close(lat_lng_to_vector(0.0, 180.0, 2.0), [-2.0, 0.0, 0.0]);
    }

    #[test]
    fn marker_radius_scales_with_size() {
        let v = lat_lng_to_vector(43.65, -79.38, 1.0 + 1.7 * 0.1);

        assert!((length(v) - 1.17).abs() < 1e-9);
    }

    #[test]
    fn shell_points_stay_within_radii() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let r = length(random_on_shell(&mut rng, 10.0, 15.0));
            assert!((10.0..15.0 + 1e-9).contains(&r));
        }
    }

    #[test]
    fn rotation_about_y() {
        assert_close(rotate_y([1.0, 2.0, 0.0], PI / 2.0), [0.0, 2.0, -1.0]);
        assert_close(rotate_y(rotate_y([0.3, 0.1, 0.7], 0.4), -0.4), [0.3, 0.1, 0.7]);
    }

    #[test]
    fn colors() {
        assert_close(hex_to_rgb(0x00ffff), [0.0, 1.0, 1.0]);
        assert_close(hex_to_rgb(0xff0080), [1.0, 0.0, 128.0 / 255.0]);
    }
}
