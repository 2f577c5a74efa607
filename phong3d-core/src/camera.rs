/// Camera position, view matrix and view-relative movement
use crate::error::Result;
use crate::matrix::Matrix4;
use crate::vector::Vector3;

/// Position plus view matrix. Projection lives in [`crate::PerspectiveCamera`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Camera {
    pub position: Vector3,
    pub view: Matrix4,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            position: Vector3::ZERO,
            view: Matrix4::new(),
        }
    }

    /// Write a look-at view matrix into `out`.
    pub fn look_at<'a>(
        out: &'a mut Matrix4,
        eye: &Vector3,
        center: &Vector3,
        up: &Vector3,
    ) -> &'a mut Matrix4 {
        out.look_at(eye, center, up)
    }

    /// Rebuild this camera's view from its own position.
    pub fn look_at_target(&mut self, center: &Vector3, up: &Vector3) -> &mut Matrix4 {
        let eye = self.position;
        Self::look_at(&mut self.view, &eye, center, up)
    }

    // Directions come from the rows of the current view matrix, so a stale
    // view gives stale movement.
    fn view_row(&self, row: usize) -> Result<Vector3> {
        let mut dir = Vector3::new(self.view[row], self.view[4 + row], self.view[8 + row]);
        let mag = dir.magnitude();
        dir.divide(mag)?;
        Ok(dir)
    }

    fn offset(&mut self, dir: &Vector3, vel: f32) -> &mut Self {
        self.position.add(&(*dir * vel));
        self
    }

    /// Move along the view's Z row (elements 2, 6, 10).
    pub fn move_forward(&mut self, vel: f32) -> Result<&mut Self> {
        let dir = self.view_row(2)?;
        Ok(self.offset(&dir, vel))
    }

    pub fn move_backward(&mut self, vel: f32) -> Result<&mut Self> {
        let dir = self.view_row(2)?;
        Ok(self.offset(&dir, -vel))
    }

    /// Move against the view's X row (elements 0, 4, 8).
    pub fn move_left(&mut self, vel: f32) -> Result<&mut Self> {
        let dir = self.view_row(0)?;
        Ok(self.offset(&dir, -vel))
    }

    pub fn move_right(&mut self, vel: f32) -> Result<&mut Self> {
        let dir = self.view_row(0)?;
        Ok(self.offset(&dir, vel))
    }

    /// World +Y, independent of orientation.
    pub fn move_up(&mut self, vel: f32) -> &mut Self {
        self.position.y += vel;
        self
    }

    pub fn move_down(&mut self, vel: f32) -> &mut Self {
        self.position.y -= vel;
        self
    }
}
