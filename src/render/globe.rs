use rand::SeedableRng;
use rand::rngs::StdRng;
use crate::air_quality::models::GlobePoint;
use crate::fire::FirePoint;
use crate::render::camera::Camera;
use crate::render::geo::{lat_lng_to_vector, random_on_shell, Vec3};
use crate::render::particles::{Boundary, ParticleBuffer};
use crate::render::{RenderError, Visualization};

pub const EARTH_RADIUS: f64 = 1.0;
pub const ATMOSPHERE_RADIUS: f64 = 1.05;

/// Per frame spins, star shell and marker look of a globe scene
#[derive(Debug, Clone, PartialEq)]
pub struct GlobeConfig {
    pub earth_spin: f64,
    pub atmosphere_spin: f64,
    pub star_spin: f64,
    pub star_count: usize,
    pub star_radii: (f64, f64),
    /// Orbiting particles around the earth, none for most scenes
    pub orbit_particles: usize,
    pub marker_radius: f64,
    /// Marker pulse rate per second, None for static markers
    pub pulse_rate: Option<f64>,
    pub camera_z: f64,
}

impl GlobeConfig {
    /// Air quality dashboard globe
    pub fn dashboard() -> GlobeConfig {
        GlobeConfig {
            earth_spin: 0.001,
            atmosphere_spin: 0.002,
            star_spin: 0.0005,
            star_count: 200,
            star_radii: (3.0, 5.0),
            orbit_particles: 0,
            marker_radius: 0.02,
            pulse_rate: None,
            camera_z: 3.0,
        }
    }

    /// Landing page globe with orbiting particles
    pub fn landing() -> GlobeConfig {
        GlobeConfig {
            earth_spin: 0.002,
            atmosphere_spin: 0.005,
            star_spin: 0.0002,
            star_count: 500,
            star_radii: (8.0, 12.0),
            orbit_particles: 30,
            marker_radius: 0.03,
            pulse_rate: Some(1.0),
            camera_z: 3.5,
        }
    }

    /// Fire detection globe
    pub fn fire() -> GlobeConfig {
        GlobeConfig {
            star_count: 300,
            orbit_particles: 0,
            pulse_rate: Some(2.0),
            ..GlobeConfig::landing()
        }
    }
}

/// A point of interest drawn on the globe
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub lat: f64,
    pub lng: f64,
    pub size: f64,
    pub color: String,
    pub label: String,
    /// Fire id for fire markers
    pub fire_id: Option<u64>,
}

impl From<&GlobePoint> for Marker {
    fn from(point: &GlobePoint) -> Self {
        Marker {
            lat: point.lat,
            lng: point.lng,
            size: point.size,
            color: point.color.clone(),
            label: point.location.clone(),
            fire_id: None,
        }
    }
}

impl From<&FirePoint> for Marker {
    fn from(point: &FirePoint) -> Self {
        Marker {
            lat: point.lat,
            lng: point.lng,
            size: point.size,
            color: point.color.clone(),
            label: format!("{} {:.0}%", point.satellite, point.confidence),
            fire_id: Some(point.id),
        }
    }
}

/// Earth, atmosphere, stars and markers
///
/// Markers sit in their own group that does not turn with the earth, so a marker's position
/// only changes when the markers are replaced.
pub struct GlobeScene {
    config: GlobeConfig,
    camera: Camera,
    earth_rotation: f64,
    atmosphere_rotation: f64,
    star_rotation: f64,
    stars: Vec<Vec3>,
    orbit: Option<ParticleBuffer>,
    markers: Vec<Marker>,
    positions: Vec<Vec3>,
    scales: Vec<f64>,
    rng: StdRng,
}

impl GlobeScene {
    /// Builds a scene, stars and orbit particles are placed from the seed
    ///
    /// # Arguments
    ///
    /// * 'config' - scene preset
    /// * 'seed' - seed for the random placement
    pub fn new(config: GlobeConfig, seed: u64) -> GlobeScene {
        let mut rng = StdRng::seed_from_u64(seed);
        let stars = (0..config.star_count)
            .map(|_| random_on_shell(&mut rng, config.star_radii.0, config.star_radii.1))
            .collect();
        let orbit = (config.orbit_particles > 0).then(|| ParticleBuffer::on_shell(
            &mut rng, config.orbit_particles, (1.5, 2.0), 0.005,
            Boundary::Contract { max_distance: 2.5, factor: 0.9 }));

        GlobeScene {
            camera: Camera::new(60.0, [0.0, 0.0, config.camera_z]),
            config,
            earth_rotation: 0.0,
            atmosphere_rotation: 0.0,
            star_rotation: 0.0,
            stars,
            orbit,
            markers: Vec::new(),
            positions: Vec::new(),
            scales: Vec::new(),
            rng,
        }
    }

    /// Replaces all markers
    ///
    /// # Arguments
    ///
    /// * 'markers' - the new markers
    pub fn set_markers(&mut self, markers: Vec<Marker>) {
        self.positions = markers.iter()
            .map(|m| lat_lng_to_vector(m.lat, m.lng, EARTH_RADIUS + m.size * 0.1))
            .collect();
        self.scales = vec![1.0; markers.len()];
        self.markers = markers;
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn marker_position(&self, index: usize) -> Option<Vec3> {
        self.positions.get(index).copied()
    }

    pub fn marker_scale(&self, index: usize) -> Option<f64> {
        self.scales.get(index).copied()
    }

    pub fn config(&self) -> &GlobeConfig {
        &self.config
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn stars(&self) -> &[Vec3] {
        &self.stars
    }

    pub fn orbit(&self) -> Option<&ParticleBuffer> {
        self.orbit.as_ref()
    }

    /// Earth, atmosphere and star shell rotation around y in radians
    pub fn rotations(&self) -> (f64, f64, f64) {
        (self.earth_rotation, self.atmosphere_rotation, self.star_rotation)
    }
}

impl Visualization for GlobeScene {
    fn frame(&mut self, time_secs: f64) {
        self.earth_rotation += self.config.earth_spin;
        self.atmosphere_rotation += self.config.atmosphere_spin;
        self.star_rotation += self.config.star_spin;

        if let Some(orbit) = self.orbit.as_mut() {
            orbit.step(&mut self.rng);
        }

        if let Some(rate) = self.config.pulse_rate {
            for (i, scale) in self.scales.iter_mut().enumerate() {
                *scale = 1.0 + (time_secs * rate + i as f64).sin() * 0.3;
            }
        }
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        self.camera.set_aspect(width, height)
    }

    /// Index of the nearest marker under the pointer
    fn pick(&self, ndc: [f64; 2]) -> Option<usize> {
        let ray = self.camera.ray_from_ndc(ndc);

        self.positions.iter()
            .zip(self.scales.iter())
            .enumerate()
            .filter_map(|(i, (position, scale))| {
                ray.intersect_sphere(*position, self.config.marker_radius * scale).map(|t| (i, t))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::air_quality::{generate_globe_points, mock_air_quality};
    use crate::fire::fire_points;
    use crate::manager_nasa_api::mock;
    use crate::render::geo::length;

    fn marker(lat: f64, lng: f64, label: &str) -> Marker {
        Marker { lat, lng, size: 1.0, color: "#00ff88".to_string(), label: label.to_string(), fire_id: None }
    }

    #[test]
    fn presets() {
        let fire = GlobeConfig::fire();

        assert_eq!(fire.star_count, 300);
        assert_eq!(fire.orbit_particles, 0);
        assert_eq!(fire.camera_z, 3.5);
        assert_eq!(GlobeConfig::landing().orbit_particles, 30);
        assert_eq!(GlobeConfig::dashboard().pulse_rate, None);
    }

    #[test]
    fn stars_fill_the_configured_shell() {
        let scene = GlobeScene::new(GlobeConfig::dashboard(), 11);

        assert_eq!(scene.stars().len(), 200);
        assert!(scene.stars().iter().all(|s| (3.0..5.0 + 1e-9).contains(&length(*s))));
        assert!(scene.orbit().is_none());
        assert_eq!(GlobeScene::new(GlobeConfig::landing(), 11).orbit().map(|o| o.len()), Some(30));
    }

    #[test]
    fn center_click_picks_marker_facing_camera() {
        let mut scene = GlobeScene::new(GlobeConfig::dashboard(), 1);
        scene.set_markers(vec![marker(0.0, 0.0, "east"), marker(0.0, -90.0, "front"), marker(0.0, 90.0, "back")]);
        scene.resize(800, 600).unwrap();

        assert_eq!(scene.pick([0.0, 0.0]), Some(1));
        assert_eq!(scene.pick([0.9, 0.9]), None);
    }

    #[test]
    fn markers_keep_position_while_earth_turns() {
        let mut scene = GlobeScene::new(GlobeConfig::dashboard(), 1);
        scene.set_markers(vec![marker(0.0, -90.0, "front")]);
        let before = scene.marker_position(0);

        for i in 0..10 {
            scene.frame(i as f64 / 60.0);
        }

        assert_eq!(scene.marker_position(0), before);
        assert!((scene.rotations().0 - 0.01).abs() < 1e-12);
        assert!((scene.rotations().1 - 0.02).abs() < 1e-12);
        assert_eq!(scene.marker_scale(0), Some(1.0));
    }

    #[test]
    fn fire_markers_pulse() {
        let mut scene = GlobeScene::new(GlobeConfig::fire(), 1);
        scene.set_markers(fire_points(&mock::fire_detections(Utc::now())).iter().map(Marker::from).collect());
        scene.frame(0.0);

        assert_eq!(scene.marker_scale(0), Some(1.0));
        assert!((scene.marker_scale(1).unwrap() - (1.0 + 1f64.sin() * 0.3)).abs() < 1e-12);
        assert_eq!(scene.markers()[2].fire_id, Some(3));
        assert_eq!(scene.markers()[0].label, "MODIS 85%");
    }

    #[test]
    fn air_quality_markers_from_points() {
        let points = generate_globe_points(&mock_air_quality().unwrap());
        let mut scene = GlobeScene::new(GlobeConfig::dashboard(), 1);
        scene.set_markers(points.iter().map(Marker::from).collect());

        assert_eq!(scene.markers().len(), 5);
        let radius = length(scene.marker_position(4).unwrap());
        assert!((radius - 1.3).abs() < 1e-9);
    }
}
