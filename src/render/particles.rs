use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use crate::render::camera::Camera;
use crate::render::geo::{add, distance, hex_to_rgb, length, random_on_shell, scale, Vec3};
use crate::render::{RenderError, Visualization};

/// Cyan, blue, purple and pink
const PALETTE: [u32; 4] = [0x00ffff, 0x0080ff, 0x8000ff, 0xff0080];

/// Particles farther than this from their nearest neighbour get no line
const LINE_DISTANCE: f64 = 15.0;

const FIELD_ROTATION: f64 = 0.0005;

/// What happens to a particle that drifts beyond max_distance
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Boundary {
    /// Put it back on a random point of a shell between the radii
    Respawn { max_distance: f64, min_radius: f64, max_radius: f64 },
    /// Pull it towards the center by the factor
    Contract { max_distance: f64, factor: f64 },
}

/// Positions and velocities of a set of drifting particles
#[derive(Debug, Clone)]
pub struct ParticleBuffer {
    pub positions: Vec<Vec3>,
    pub velocities: Vec<Vec3>,
    boundary: Boundary,
}

impl ParticleBuffer {
    /// Places particles on a shell with random velocities in -max_speed..max_speed per axis
    ///
    /// # Arguments
    ///
    /// * 'rng' - random source
    /// * 'count' - number of particles
    /// * 'radii' - inner and outer shell radius
    /// * 'max_speed' - largest velocity component
    /// * 'boundary' - rule for particles drifting too far
    pub fn on_shell<R: Rng + ?Sized>(rng: &mut R, count: usize, radii: (f64, f64), max_speed: f64, boundary: Boundary) -> ParticleBuffer {
        let positions = (0..count).map(|_| random_on_shell(rng, radii.0, radii.1)).collect();
        let velocities = (0..count)
            .map(|_| [
                (rng.random::<f64>() - 0.5) * 2.0 * max_speed,
                (rng.random::<f64>() - 0.5) * 2.0 * max_speed,
                (rng.random::<f64>() - 0.5) * 2.0 * max_speed,
            ])
            .collect();

        ParticleBuffer { positions, velocities, boundary }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Moves every particle by its velocity and applies the boundary rule
    ///
    /// # Arguments
    ///
    /// * 'rng' - random source for respawning
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for (position, velocity) in self.positions.iter_mut().zip(self.velocities.iter()) {
            *position = add(*position, *velocity);

            match self.boundary {
                Boundary::Respawn { max_distance, min_radius, max_radius } => {
                    if length(*position) > max_distance {
                        *position = random_on_shell(rng, min_radius, max_radius);
                    }
                },
                Boundary::Contract { max_distance, factor } => {
                    if length(*position) > max_distance {
                        *position = scale(*position, factor);
                    }
                },
            }
        }
    }
}

/// A line from a particle to its nearest neighbour at creation time
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub particle: usize,
    pub neighbour: usize,
    /// Follows the particle every frame
    pub start: Vec3,
    pub end: Vec3,
    pub start_color: Vec3,
    pub end_color: Vec3,
}

/// Floating background particles connected to their nearest neighbours
pub struct ParticleField {
    camera: Camera,
    buffer: ParticleBuffer,
    colors: Vec<Vec3>,
    sizes: Vec<f64>,
    lines: Vec<Line>,
    rotation: f64,
    rng: StdRng,
}

impl ParticleField {
    /// Returns a field with count particles placed from the seed
    ///
    /// # Arguments
    ///
    /// * 'count' - number of particles, 100 on the landing page
    /// * 'seed' - seed for placement and respawning
    pub fn new(count: usize, seed: u64) -> ParticleField {
        let mut rng = StdRng::seed_from_u64(seed);
        let boundary = Boundary::Respawn { max_distance: 50.0, min_radius: 10.0, max_radius: 15.0 };
        let buffer = ParticleBuffer::on_shell(&mut rng, count, (10.0, 30.0), 0.01, boundary);

        let colors: Vec<Vec3> = (0..count)
            .map(|_| hex_to_rgb(PALETTE[rng.random_range(0..PALETTE.len())]))
            .collect();
        let sizes = (0..count).map(|_| rng.random_range(1.0..3.0)).collect();
        let lines = nearest_neighbour_lines(&buffer.positions, &colors);

        ParticleField {
            camera: Camera::new(75.0, [0.0, 0.0, 5.0]),
            buffer,
            colors,
            sizes,
            lines,
            rotation: 0.0,
            rng,
        }
    }

    pub fn particles(&self) -> &ParticleBuffer {
        &self.buffer
    }

    pub fn particles_mut(&mut self) -> &mut ParticleBuffer {
        &mut self.buffer
    }

    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    pub fn sizes(&self) -> &[f64] {
        &self.sizes
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Rotation of the whole field around y in radians
    pub fn rotation(&self) -> f64 {
        self.rotation
    }
}

impl Visualization for ParticleField {
    fn frame(&mut self, _time_secs: f64) {
        self.buffer.step(&mut self.rng);

        for line in self.lines.iter_mut() {
            line.start = self.buffer.positions[line.particle];
        }

        self.rotation += FIELD_ROTATION;
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        self.camera.set_aspect(width, height)
    }

    /// The field lets clicks through
    fn pick(&self, _ndc: [f64; 2]) -> Option<usize> {
        None
    }
}

/// Connects each particle to its nearest neighbour closer than the line distance,
/// colors fade with 1 - d / 15
///
/// # Arguments
///
/// * 'positions' - particle positions
/// * 'colors' - particle colors
pub fn nearest_neighbour_lines(positions: &[Vec3], colors: &[Vec3]) -> Vec<Line> {
    let mut lines: Vec<Line> = Vec::new();

    for (i, p) in positions.iter().enumerate() {
        let nearest = positions.iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(j, q)| (j, distance(*p, *q)))
            .filter(|(_, d)| *d < LINE_DISTANCE)
            .min_by(|a, b| a.1.total_cmp(&b.1));

        if let Some((j, d)) = nearest {
            let opacity = (1.0 - d / LINE_DISTANCE).max(0.0);
            lines.push(Line {
                particle: i,
                neighbour: j,
                start: *p,
                end: positions[j],
                start_color: scale(colors[i], opacity),
                end_color: scale(colors[j], opacity),
            });
        }
    }

    lines
}
