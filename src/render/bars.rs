use crate::air_quality::AqiLevel;
use crate::air_quality::models::AirQualityData;
use crate::render::camera::{Camera, Ray};
use crate::render::geo::{rotate_y, sub, Vec3};
use crate::render::{RenderError, Visualization};

const BAR_WIDTH: f64 = 0.8;
const BAR_SPACING: f64 = 1.2;
const GROUP_SPIN: f64 = 0.005;
const BAR_SPIN: f64 = 0.01;

/// Metric bars next to each AQI bar with their colors
const METRICS: [(&str, &str); 4] = [("PM2.5", "#ff8800"), ("PM10", "#ff0080"), ("NO2", "#0080ff"), ("O3", "#8000ff")];

#[derive(Debug, Clone, PartialEq)]
pub enum BarKind {
    Aqi { aqi: u32 },
    Metric { name: &'static str, value: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub location: String,
    pub kind: BarKind,
    pub color: &'static str,
    /// Center in group space, the bar stands on y = 0
    pub center: Vec3,
    /// Width, height and depth before pulsing
    pub size: Vec3,
    pub scale_y: f64,
    pub rotation: f64,
    /// Position among the group's children, labels included, drives the pulse phase
    child_index: usize,
}

/// 3D bar chart of current air quality, one AQI bar and four metric bars per location
pub struct BarChartScene {
    camera: Camera,
    bars: Vec<Bar>,
    rotation: f64,
}

impl BarChartScene {
    /// Builds the bars for the given locations
    ///
    /// # Arguments
    ///
    /// * 'data' - air quality per location
    pub fn new(data: &[AirQualityData]) -> BarChartScene {
        let n = data.len() as f64;
        let mut bars: Vec<Bar> = Vec::new();

        for (index, city) in data.iter().enumerate() {
            let x = (index as f64 - n / 2.0) * BAR_SPACING;
            // aqi bar, four metric bars and a label per location
            let first_child = index * 6;

            let aqi_height = (city.current.aqi as f64 / 50.0).max(0.1);
            bars.push(Bar {
                location: city.location.name.clone(),
                kind: BarKind::Aqi { aqi: city.current.aqi },
                color: AqiLevel::from_aqi(city.current.aqi).info().color,
                center: [x, aqi_height / 2.0, 0.0],
                size: [BAR_WIDTH, aqi_height, BAR_WIDTH],
                scale_y: 1.0,
                rotation: 0.0,
                child_index: first_child,
            });

            let values = [city.current.pm25, city.current.pm10, city.current.no2, city.current.o3];
            for (m, ((name, color), value)) in METRICS.into_iter().zip(values).enumerate() {
                let height = (value / 100.0).max(0.05);
                bars.push(Bar {
                    location: city.location.name.clone(),
                    kind: BarKind::Metric { name, value },
                    color,
                    center: [x + (m as f64 - 1.5) * BAR_WIDTH * 0.4, height / 2.0, BAR_WIDTH * 0.6],
                    size: [BAR_WIDTH * 0.3, height, BAR_WIDTH * 0.3],
                    scale_y: 1.0,
                    rotation: 0.0,
                    child_index: first_child + 1 + m,
                });
            }
        }

        BarChartScene { camera: Camera::new(75.0, [0.0, 2.0, 8.0]), bars, rotation: 0.0 }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }
}

impl Visualization for BarChartScene {
    fn frame(&mut self, time_secs: f64) {
        self.rotation += GROUP_SPIN;

        for bar in self.bars.iter_mut() {
            bar.scale_y = 1.0 + (time_secs + bar.child_index as f64).sin() * 0.1;
            bar.rotation += BAR_SPIN;
        }
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        self.camera.set_aspect(width, height)
    }

    /// Index of the nearest bar under the pointer
    fn pick(&self, ndc: [f64; 2]) -> Option<usize> {
        let ray = self.camera.ray_from_ndc(ndc);

        self.bars.iter()
            .enumerate()
            .filter_map(|(i, bar)| {
                // into the bar's own space: undo group spin, move to the bar center, undo bar spin
                let origin = rotate_y(sub(rotate_y(ray.origin, -self.rotation), bar.center), -bar.rotation);
                let direction = rotate_y(rotate_y(ray.direction, -self.rotation), -bar.rotation);
                let local = Ray { origin, direction };
                let half = [bar.size[0] / 2.0, bar.size[1] * bar.scale_y / 2.0, bar.size[2] / 2.0];

                local.intersect_box(half).map(|t| (i, t))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }
}
