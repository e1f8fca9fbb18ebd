use crate::render::geo::{add, cross, dot, normalize, scale, sub, Vec3};
use crate::render::RenderError;

const UP: Vec3 = [0.0, 1.0, 0.0];

/// Perspective camera looking at the origin
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Vertical field of view in degrees
    pub fov: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
    pub position: Vec3,
}

impl Camera {
    /// Returns a camera with near 0.1 and far 1000
    ///
    /// # Arguments
    ///
    /// * 'fov' - vertical field of view in degrees
    /// * 'position' - camera position, it looks at the origin from there
    pub fn new(fov: f64, position: Vec3) -> Camera {
        Camera { fov, aspect: 1.0, near: 0.1, far: 1000.0, position }
    }

    /// Updates the aspect ratio for a new viewport size
    ///
    /// # Arguments
    ///
    /// * 'width' - viewport width in pixels
    /// * 'height' - viewport height in pixels
    pub fn set_aspect(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidViewport(width, height));
        }
        self.aspect = width as f64 / height as f64;
        Ok(())
    }

    /// Returns the pick ray through a point in normalized device coordinates
    ///
    /// # Arguments
    ///
    /// * 'ndc' - x and y in -1..=1, y pointing up
    pub fn ray_from_ndc(&self, ndc: [f64; 2]) -> Ray {
        let forward = normalize(sub([0.0, 0.0, 0.0], self.position));
        let right = normalize(cross(forward, UP));
        let up = cross(right, forward);
        let tan_half = (self.fov.to_radians() / 2.0).tan();

        let direction = add(
            forward,
            add(scale(right, ndc[0] * tan_half * self.aspect), scale(up, ndc[1] * tan_half)));

        Ray { origin: self.position, direction: normalize(direction) }
    }
}

/// Converts a position within the viewport to normalized device coordinates
///
/// # Arguments
///
/// * 'x' - pixels from the left edge
/// * 'y' - pixels from the top edge
/// * 'width' - viewport width
/// * 'height' - viewport height
pub fn ndc_from_client(x: f64, y: f64, width: u32, height: u32) -> [f64; 2] {
    [
        (x / width as f64) * 2.0 - 1.0,
        -(y / height as f64) * 2.0 + 1.0,
    ]
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction
    pub direction: Vec3,
}

impl Ray {
    pub fn at(&self, t: f64) -> Vec3 {
        add(self.origin, scale(self.direction, t))
    }

    /// Distance along the ray to the first hit of a sphere, if it is hit in front of the origin
    ///
    /// # Arguments
    ///
    /// * 'center' - sphere center
    /// * 'radius' - sphere radius
    pub fn intersect_sphere(&self, center: Vec3, radius: f64) -> Option<f64> {
        let oc = sub(self.origin, center);
        let b = dot(oc, self.direction);
        let c = dot(oc, oc) - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }

        let root = discriminant.sqrt();
        [-b - root, -b + root].into_iter().find(|t| *t >= 0.0)
    }

    /// Distance along the ray to the first hit of an axis aligned box centered at the origin
    ///
    /// # Arguments
    ///
    /// * 'half' - half extents of the box
    pub fn intersect_box(&self, half: Vec3) -> Option<f64> {
        let mut t_min = f64::NEG_INFINITY;
        let mut t_max = f64::INFINITY;

        for axis in 0..3 {
            let o = self.origin[axis];
            let d = self.direction[axis];
            if d.abs() < 1e-12 {
                if o < -half[axis] || o > half[axis] {
                    return None;
                }
                continue;
            }
            let t1 = (-half[axis] - o) / d;
            let t2 = (half[axis] - o) / d;
            t_min = t_min.max(t1.min(t2));
            t_max = t_max.min(t1.max(t2));
        }

        if t_max < t_min || t_max < 0.0 {
            None
        } else {
            Some(t_min.max(0.0))
        }
    }
}
