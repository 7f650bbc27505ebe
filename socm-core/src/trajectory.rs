//! Tabular simulation output
//!
//! A [`Trajectory`] is the record a simulation run hands to downstream
//! reporting: one row per integrator output point, one named column per
//! state element plus the derived quantities (total carbon, instantaneous
//! respiration and input rates). It is a plain in-memory table; rendering
//! and persistence are the consumer's concern.

use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

/// Value type used across the crate.
pub type FloatValue = f64;

/// Simulation time, in the model's time units (years in the provided
/// parameterizations).
pub type Time = FloatValue;

/// Column label of the time axis.
pub const COL_TIME: &str = "time";
/// Column label of the cumulative respired carbon state.
pub const COL_CUMULATIVE_RESPIRATION: &str = "cumulative_respiration";
/// Column label of the derived total pool carbon.
pub const COL_TOTAL_CARBON: &str = "total_carbon";
/// Column label of the instantaneous respiration rate.
pub const COL_RESPIRATION_RATE: &str = "respiration_rate";
/// Column label of the instantaneous carbon input rate.
pub const COL_INPUT_RATE: &str = "input_rate";

/// A named-column table holding one simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trajectory {
    columns: Vec<String>,
    data: Array2<FloatValue>,
}

impl Trajectory {
    /// Assemble a trajectory from per-timestep rows.
    ///
    /// Panics if a row's length does not match the number of columns.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<FloatValue>>) -> Self {
        let num_columns = columns.len();
        let num_rows = rows.len();
        let mut flat = Vec::with_capacity(num_rows * num_columns);
        for row in &rows {
            assert_eq!(
                row.len(),
                num_columns,
                "trajectory row has {} values for {} columns",
                row.len(),
                num_columns
            );
            flat.extend_from_slice(row);
        }
        let data = Array2::from_shape_vec((num_rows, num_columns), flat)
            .expect("row-major trajectory data matches its shape");
        Self { columns, data }
    }

    /// Column labels, in storage order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows (output time points).
    pub fn num_rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }

    /// A single column by name.
    pub fn column(&self, name: &str) -> Option<ArrayView1<'_, FloatValue>> {
        let index = self.columns.iter().position(|c| c == name)?;
        Some(self.data.column(index))
    }

    /// The time axis.
    pub fn times(&self) -> ArrayView1<'_, FloatValue> {
        self.column(COL_TIME)
            .expect("trajectories always carry a time column")
    }

    /// A single row, in column order.
    pub fn row(&self, index: usize) -> ArrayView1<'_, FloatValue> {
        self.data.row(index)
    }

    /// The final output row, if any rows exist.
    pub fn last_row(&self) -> Option<ArrayView1<'_, FloatValue>> {
        if self.is_empty() {
            None
        } else {
            Some(self.data.row(self.num_rows() - 1))
        }
    }

    /// A single value by row index and column name.
    pub fn value(&self, row: usize, column: &str) -> Option<FloatValue> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.data.get((row, index)).copied()
    }

    /// The final value of a column, if any rows exist.
    pub fn final_value(&self, column: &str) -> Option<FloatValue> {
        if self.is_empty() {
            None
        } else {
            self.value(self.num_rows() - 1, column)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example() -> Trajectory {
        Trajectory::from_rows(
            vec![
                COL_TIME.to_string(),
                "soil".to_string(),
                COL_INPUT_RATE.to_string(),
            ],
            vec![
                vec![0.0, 100.0, 1.0],
                vec![0.5, 96.7, 1.0],
                vec![1.0, 93.5, 1.0],
            ],
        )
    }

    #[test]
    fn test_column_lookup() {
        let trajectory = example();
        assert_eq!(trajectory.num_rows(), 3);
        let soil = trajectory.column("soil").unwrap();
        assert_eq!(soil[0], 100.0);
        assert_eq!(soil[2], 93.5);
        assert!(trajectory.column("no_such_column").is_none());
    }

    #[test]
    fn test_times_and_rows() {
        let trajectory = example();
        assert_eq!(trajectory.times()[1], 0.5);
        let last = trajectory.last_row().unwrap();
        assert_eq!(last[0], 1.0);
        assert_eq!(trajectory.final_value("soil"), Some(93.5));
        assert_eq!(trajectory.value(1, "soil"), Some(96.7));
    }

    #[test]
    #[should_panic(expected = "trajectory row has")]
    fn test_ragged_rows_panic() {
        Trajectory::from_rows(
            vec!["time".to_string(), "soil".to_string()],
            vec![vec![0.0, 1.0], vec![0.5]],
        );
    }

    #[test]
    fn test_serialization_round_trip() {
        let trajectory = example();
        let json = serde_json::to_string(&trajectory).expect("Serialization failed");
        let parsed: Trajectory = serde_json::from_str(&json).expect("Deserialization failed");
        assert_eq!(parsed.columns(), trajectory.columns());
        assert_eq!(parsed.final_value("soil"), trajectory.final_value("soil"));
    }
}
