//! Instance grid: how many copies of the selected shape to draw and where.
//!
//! Instances are laid out on the XY plane, rows going up and columns going
//! right, centered on the origin using integer division so an odd grid has
//! an instance exactly at `(0, 0, 0)`.

use glam::{Mat4, Vec3};

/// One grid cell, with the translation it is drawn at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridInstance {
    pub row: u32,
    pub col: u32,
    pub translation: Vec3,
}

impl GridInstance {
    pub fn transform(&self) -> Mat4 {
        Mat4::from_translation(self.translation)
    }
}

/// Row/column layout of shape instances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstanceGrid {
    pub rows: u32,
    pub columns: u32,
    pub spacing: f32,
}

impl Default for InstanceGrid {
    fn default() -> Self {
        Self {
            rows: 7,
            columns: 7,
            spacing: 2.5,
        }
    }
}

impl InstanceGrid {
    pub fn new(rows: u32, columns: u32, spacing: f32) -> Self {
        Self {
            rows,
            columns,
            spacing,
        }
    }

    /// The grid actually drawn: a loaded model is shown once, at the origin.
    pub fn effective(&self, single: bool) -> Self {
        if single {
            Self {
                rows: 1,
                columns: 1,
                spacing: self.spacing,
            }
        } else {
            *self
        }
    }

    /// `((col - cols/2)·spacing, (row - rows/2)·spacing, 0)`, integer division.
    pub fn translation(&self, row: u32, col: u32) -> Vec3 {
        let x = col as i64 - (self.columns / 2) as i64;
        let y = row as i64 - (self.rows / 2) as i64;
        Vec3::new(x as f32 * self.spacing, y as f32 * self.spacing, 0.0)
    }

    pub fn len(&self) -> usize {
        self.rows as usize * self.columns as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every cell, row-major.
    pub fn instances(&self) -> impl Iterator<Item = GridInstance> + '_ {
        (0..self.rows).flat_map(move |row| {
            (0..self.columns).map(move |col| GridInstance {
                row,
                col,
                translation: self.translation(row, col),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_of_seven_by_seven_is_origin() {
        let grid = InstanceGrid::new(7, 7, 2.5);
        assert_eq!(grid.translation(3, 3), Vec3::ZERO);
    }

    #[test]
    fn corners_are_symmetric_for_odd_grids() {
        let grid = InstanceGrid::default();
        assert_eq!(grid.translation(0, 0), Vec3::new(-7.5, -7.5, 0.0));
        assert_eq!(grid.translation(6, 6), Vec3::new(7.5, 7.5, 0.0));
    }

    #[test]
    fn even_grids_lean_negative() {
        let grid = InstanceGrid::new(4, 4, 1.0);
        assert_eq!(grid.translation(0, 0), Vec3::new(-2.0, -2.0, 0.0));
        assert_eq!(grid.translation(3, 3), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn collapses_for_single_model() {
        let grid = InstanceGrid::default().effective(true);
        assert_eq!((grid.rows, grid.columns), (1, 1));
        let only: Vec<_> = grid.instances().collect();
        assert_eq!(only.len(), 1);
        assert_eq!(only[0].translation, Vec3::ZERO);

        assert_eq!(InstanceGrid::default().effective(false).len(), 49);
    }

    #[test]
    fn instances_are_row_major() {
        let grid = InstanceGrid::new(2, 3, 1.0);
        let cells: Vec<_> = grid.instances().map(|i| (i.row, i.col)).collect();
        assert_eq!(cells, vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]);
    }
}
