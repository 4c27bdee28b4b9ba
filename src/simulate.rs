//! Synthetic smart-building sensor data.
//!
//! Each scenario describes a fixed set of sensor fields with per-field
//! sampling distributions plus a closed-form comfort index derived from the
//! generated readings. Generation is fully deterministic for a given seed:
//! one `StdRng` drives all columns, sampled in declaration order.

use ndarray::{Array1, Array2};
use ndarray_rand::rand_distr::{Normal, Uniform};
use rand::distributions::Distribution as _;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Sampling distribution for a single sensor field.
#[derive(Debug, Clone, Copy)]
pub enum FieldDistribution {
    /// Gaussian readings, e.g. temperature or CO2.
    Normal { mean: f64, std_dev: f64 },
    /// Continuous uniform readings, e.g. a blind position in [0, 1).
    Uniform { low: f64, high: f64 },
    /// Discrete uniform over `0..levels`, e.g. occupancy bands or switches.
    UniformInt { levels: u64 },
}

/// A named sensor field and how it is sampled.
#[derive(Debug, Clone, Copy)]
pub struct SensorField {
    pub name: &'static str,
    pub distribution: FieldDistribution,
}

/// The two simulated building configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// Five basic environmental sensors, 100 readings.
    Baseline,
    /// The baseline sensors plus smart-tech fields, 400 readings.
    SmartBuilding,
}

impl Scenario {
    /// Number of readings generated for this scenario.
    pub fn n_samples(&self) -> usize {
        match self {
            Scenario::Baseline => 100,
            Scenario::SmartBuilding => 400,
        }
    }

    /// Predictor fields, in generation order.
    pub fn sensor_fields(&self) -> Vec<SensorField> {
        use FieldDistribution::*;
        match self {
            Scenario::Baseline => vec![
                SensorField { name: "temperature", distribution: Normal { mean: 24.0, std_dev: 2.0 } },
                SensorField { name: "humidity", distribution: Normal { mean: 50.0, std_dev: 10.0 } },
                SensorField { name: "co2", distribution: Normal { mean: 600.0, std_dev: 100.0 } },
                SensorField { name: "occupancy", distribution: UniformInt { levels: 2 } },
                SensorField { name: "daylight", distribution: Normal { mean: 200.0, std_dev: 50.0 } },
            ],
            Scenario::SmartBuilding => vec![
                SensorField { name: "temperature", distribution: Normal { mean: 22.0, std_dev: 2.5 } },
                SensorField { name: "humidity", distribution: Normal { mean: 47.0, std_dev: 11.0 } },
                SensorField { name: "co2", distribution: Normal { mean: 610.0, std_dev: 90.0 } },
                SensorField { name: "occupancy", distribution: UniformInt { levels: 4 } },
                SensorField { name: "daylight", distribution: Normal { mean: 190.0, std_dev: 55.0 } },
                SensorField { name: "hvac_power", distribution: Normal { mean: 48.0, std_dev: 14.0 } },
                SensorField { name: "window_open", distribution: UniformInt { levels: 2 } },
                SensorField { name: "smart_blinds_position", distribution: Uniform { low: 0.0, high: 1.0 } },
                SensorField { name: "air_purifier_status", distribution: UniformInt { levels: 2 } },
                SensorField { name: "solar_panel_output", distribution: Normal { mean: 20.0, std_dev: 5.0 } },
            ],
        }
    }

    /// Distribution of the measured energy consumption target.
    pub fn energy_distribution(&self) -> FieldDistribution {
        match self {
            Scenario::Baseline => FieldDistribution::Normal { mean: 150.0, std_dev: 30.0 },
            Scenario::SmartBuilding => FieldDistribution::Normal { mean: 155.0, std_dev: 32.0 },
        }
    }
}

/// Comfort index of the baseline scenario: penalizes deviation from 23 C
/// and 45 % relative humidity.
pub fn baseline_comfort(temperature: f64, humidity: f64) -> f64 {
    100.0 - ((temperature - 23.0).abs() + (humidity - 45.0).abs())
}

/// Comfort index of the smart-building scenario: adds an air-quality
/// penalty plus smart-blinds and air-purifier adjustments.
pub fn smart_building_comfort(
    temperature: f64,
    humidity: f64,
    co2: f64,
    smart_blinds_position: f64,
    air_purifier_status: f64,
) -> f64 {
    100.0
        - ((temperature - 22.0).abs() + (humidity - 48.0).abs() + co2 / 120.0
            - 5.0 * smart_blinds_position
            + 3.0 * air_purifier_status)
}

/// A generated batch of sensor readings with both regression targets.
///
/// The comfort column is computed once from the feature columns at
/// generation time and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct SensorFrame {
    pub feature_names: Vec<&'static str>,
    /// One row per reading, one column per field in `feature_names`.
    pub features: Array2<f64>,
    pub energy: Array1<f64>,
    pub comfort: Array1<f64>,
}

impl SensorFrame {
    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    /// View of a feature column by field name.
    pub fn column(&self, name: &str) -> Option<ndarray::ArrayView1<'_, f64>> {
        let idx = self.feature_names.iter().position(|&n| n == name)?;
        Some(self.features.column(idx))
    }
}

/// Generate a full sensor frame for `scenario`, reproducibly for `seed`.
pub fn simulate(scenario: Scenario, seed: u64) -> SensorFrame {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = scenario.n_samples();
    let fields = scenario.sensor_fields();

    let mut features = Array2::zeros((n, fields.len()));
    for (j, field) in fields.iter().enumerate() {
        let column = sample_column(&mut rng, n, &field.distribution);
        features.column_mut(j).assign(&column);
    }

    let energy = sample_column(&mut rng, n, &scenario.energy_distribution());
    let comfort = derive_comfort(scenario, &features, &fields);

    SensorFrame {
        feature_names: fields.iter().map(|f| f.name).collect(),
        features,
        energy,
        comfort,
    }
}

fn sample_column(rng: &mut StdRng, n: usize, dist: &FieldDistribution) -> Array1<f64> {
    match *dist {
        FieldDistribution::Normal { mean, std_dev } => {
            // scenario constants always have std_dev > 0
            let normal = Normal::new(mean, std_dev).unwrap();
            (0..n).map(|_| normal.sample(rng)).collect()
        }
        FieldDistribution::Uniform { low, high } => {
            let uniform = Uniform::new(low, high);
            (0..n).map(|_| uniform.sample(rng)).collect()
        }
        FieldDistribution::UniformInt { levels } => {
            (0..n).map(|_| rng.gen_range(0..levels) as f64).collect()
        }
    }
}

fn derive_comfort(scenario: Scenario, features: &Array2<f64>, fields: &[SensorField]) -> Array1<f64> {
    let col = |name: &str| {
        let idx = fields
            .iter()
            .position(|f| f.name == name)
            .unwrap_or_else(|| panic!("scenario is missing the {} field", name));
        features.column(idx)
    };

    match scenario {
        Scenario::Baseline => {
            let temperature = col("temperature");
            let humidity = col("humidity");
            temperature
                .iter()
                .zip(humidity.iter())
                .map(|(&t, &h)| baseline_comfort(t, h))
                .collect()
        }
        Scenario::SmartBuilding => {
            let temperature = col("temperature");
            let humidity = col("humidity");
            let co2 = col("co2");
            let blinds = col("smart_blinds_position");
            let purifier = col("air_purifier_status");
            (0..features.nrows())
                .map(|i| {
                    smart_building_comfort(
                        temperature[i],
                        humidity[i],
                        co2[i],
                        blinds[i],
                        purifier[i],
                    )
                })
                .collect()
        }
    }
}
