//! Sine and cosine lookup tables for the angular weight search.

use std::f32::consts::PI;

pub const SINCOS_STEPS: usize = 1024;
pub const ANGULAR_STEPS: usize = 16;

/// Tables of `SINCOS_STEPS * ANGULAR_STEPS` entries, indexed by
/// `step * ANGULAR_STEPS + frequency`, where frequency `i` covers `i + 1`
/// full turns over the steps.
#[derive(Clone, Debug, PartialEq)]
pub struct AngularTables {
    pub sin: Vec<f32>,
    pub cos: Vec<f32>,
}

impl AngularTables {
    pub fn new() -> Self {
        let mut sin = vec![0.0; SINCOS_STEPS * ANGULAR_STEPS];
        let mut cos = vec![0.0; SINCOS_STEPS * ANGULAR_STEPS];

        for i in 0..ANGULAR_STEPS {
            let angle_step = (i + 1) as f32;
            for j in 0..SINCOS_STEPS {
                let angle = (2.0 * PI / (SINCOS_STEPS as f32 - 1.0)) * angle_step * j as f32;
                let index = j * ANGULAR_STEPS + i;
                sin[index] = angle.sin();
                cos[index] = angle.cos();
            }
        }

        AngularTables { sin, cos }
    }

    pub fn sin(&self, step: usize, frequency: usize) -> f32 {
        self.sin[step * ANGULAR_STEPS + frequency]
    }

    pub fn cos(&self, step: usize, frequency: usize) -> f32 {
        self.cos[step * ANGULAR_STEPS + frequency]
    }
}

impl Default for AngularTables {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_layout() {
        let tables = AngularTables::new();
        assert_eq!(tables.sin.len(), SINCOS_STEPS * ANGULAR_STEPS);
        assert_eq!(tables.cos.len(), SINCOS_STEPS * ANGULAR_STEPS);

        for i in 0..ANGULAR_STEPS {
            assert_eq!(tables.sin(0, i), 0.0);
            assert_eq!(tables.cos(0, i), 1.0);
        }

        let angle = 2.0 * PI / 1023.0 * 3.0 * 5.0;
        assert_eq!(tables.sin[5 * ANGULAR_STEPS + 2], angle.sin());
        assert_eq!(tables.cos(5, 2), angle.cos());
    }

    #[test]
    fn test_last_step_completes_turns() {
        let tables = AngularTables::new();
        for i in 0..ANGULAR_STEPS {
            assert!(tables.sin(SINCOS_STEPS - 1, i).abs() < 1e-3);
            assert!((tables.cos(SINCOS_STEPS - 1, i) - 1.0).abs() < 1e-3);
        }
    }
}
