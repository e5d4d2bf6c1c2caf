//! Regression test parameters and operations

use crate::error::TestError;
use tessera_core::{Plane, Raster};

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Compare results (default)
    #[default]
    Compare,
    /// Compare and additionally print raster summaries
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable
    pub fn from_env() -> Self {
        match std::env::var("REGTEST_MODE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// Regression test parameters
///
/// Tracks the test name, current comparison index, mode, and every
/// recorded failure.
pub struct RegParams {
    /// Name of the test (e.g., "tile")
    pub test_name: String,
    /// Current test index (incremented before each comparison)
    index: usize,
    /// Test mode
    pub mode: RegTestMode,
    /// Recorded failures
    failures: Vec<TestError>,
}

impl RegParams {
    /// Create new regression test parameters
    ///
    /// # Arguments
    ///
    /// * `test_name` - Name of the test (e.g., "tile")
    pub fn new(test_name: &str) -> Self {
        let mode = RegTestMode::from_env();

        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");
        eprintln!("Mode: {:?}", mode);

        Self {
            test_name: test_name.to_string(),
            index: 0,
            mode,
            failures: Vec::new(),
        }
    }

    /// Get the current test index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Check if in display mode
    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    /// Print a raster summary in display mode.
    pub fn show(&self, label: &str, raster: &Raster) {
        if self.display() {
            eprintln!("  {}: {}", label, crate::describe(raster));
        }
    }

    /// Compare two floating-point values
    ///
    /// # Arguments
    ///
    /// * `expected` - Expected value
    /// * `actual` - Actual computed value
    /// * `delta` - Maximum allowed difference
    ///
    /// # Returns
    ///
    /// `true` if values match within delta, `false` otherwise.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        if diff > delta {
            self.fail(TestError::ValueMismatch {
                index: self.index,
                expected,
                actual,
                delta,
            });
            false
        } else {
            true
        }
    }

    /// Compare two rasters for exact equality
    ///
    /// Width, height, sample type, plane counts and every sample must match.
    /// The first difference found is recorded.
    pub fn compare_rasters(&mut self, expected: &Raster, actual: &Raster) -> bool {
        self.index += 1;

        let reason = if !expected.sizes_equal(actual) {
            Some(format!(
                "expected {}, got {}",
                crate::describe(expected),
                crate::describe(actual)
            ))
        } else if expected.dimensions() != actual.dimensions() {
            Some(format!(
                "plane counts differ: {:?} vs {:?}",
                expected.dimensions(),
                actual.dimensions()
            ))
        } else {
            expected
                .indexed_planes()
                .zip(actual.planes())
                .find_map(|((index, a), b)| {
                    first_difference(a, b)
                        .map(|(x, y)| format!("plane {} differs at ({}, {})", index, x, y))
                })
        };

        match reason {
            Some(reason) => {
                self.fail(TestError::RasterMismatch {
                    index: self.index,
                    reason,
                });
                false
            }
            None => true,
        }
    }

    fn fail(&mut self, err: TestError) {
        eprintln!("Failure in {}_reg: {}", self.test_name, err);
        self.failures.push(err);
    }

    /// Clean up and report results
    ///
    /// # Returns
    ///
    /// `true` if all comparisons passed, `false` if any failed.
    pub fn cleanup(self) -> bool {
        if self.failures.is_empty() {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.failures.is_empty()
    }

    /// Check if all comparisons have passed so far
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Get list of failures
    pub fn failures(&self) -> &[TestError] {
        &self.failures
    }
}

/// Position of the first differing sample, if any.
fn first_difference(a: &Plane, b: &Plane) -> Option<(u32, u32)> {
    if a.equals(b) {
        return None;
    }
    for y in 0..a.height() {
        for x in 0..a.width() {
            let same = if a.sample_type().is_rgb() {
                a.get_rgb(x, y) == b.get_rgb(x, y)
            } else {
                a.get_value(x, y).map(f32::to_bits) == b.get_value(x, y).map(f32::to_bits)
            };
            if !same {
                return Some((x, y));
            }
        }
    }
    Some((0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::{Dimensions, SampleType};

    #[test]
    fn test_mode_from_env() {
        let mode = RegTestMode::from_env();
        assert!(matches!(mode, RegTestMode::Compare | RegTestMode::Display));
    }

    #[test]
    fn test_compare_values_success() {
        let mut rp = RegParams::new("test");
        assert!(rp.compare_values(100.0, 100.0, 0.0));
        assert!(rp.compare_values(100.0, 100.5, 1.0));
        assert!(rp.is_success());
    }

    #[test]
    fn test_compare_values_failure() {
        let mut rp = RegParams::new("test");
        assert!(!rp.compare_values(100.0, 200.0, 0.0));
        assert!(!rp.is_success());
        assert_eq!(rp.failures().len(), 1);
    }

    #[test]
    fn test_compare_rasters() {
        let mut rp = RegParams::new("test");
        let a = crate::gradient_raster(5, 4, SampleType::Gray8, Dimensions::SINGLE).unwrap();
        let b = a.deep_clone();
        assert!(rp.compare_rasters(&a, &b));

        let mut m = b.to_mut();
        m.planes_mut()[0].set_value(3, 2, 200.0).unwrap();
        let c: Raster = m.into();
        assert!(!rp.compare_rasters(&a, &c));
        let msg = rp.failures()[0].to_string();
        assert!(msg.contains("(3, 2)"), "{}", msg);
    }
}
