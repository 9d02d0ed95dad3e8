use crate::foundation::core::{Mat4, Vec3};
use crate::foundation::error::{CocoonError, CocoonResult};

/// Perspective camera looking at the flower.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Camera {
    /// Eye position in world space.
    pub position: Vec3,
    /// Point the camera looks at.
    pub target: Vec3,
    /// Up direction.
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fov_y_deg: f32,
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y_deg: 45.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Camera {
    pub fn validate(&self) -> CocoonResult<()> {
        let finite = self.position.is_finite()
            && self.target.is_finite()
            && self.up.is_finite()
            && self.fov_y_deg.is_finite()
            && self.near.is_finite()
            && self.far.is_finite();
        if !finite {
            return Err(CocoonError::validation("camera values must be finite"));
        }
        if !(self.fov_y_deg > 0.0 && self.fov_y_deg < 180.0) {
            return Err(CocoonError::validation(
                "camera.fov_y_deg must be in (0, 180)",
            ));
        }
        if self.near <= 0.0 || self.far <= self.near {
            return Err(CocoonError::validation(
                "camera clip planes must satisfy 0 < near < far",
            ));
        }
        let forward = self.target - self.position;
        if forward.length_squared() <= f32::EPSILON {
            return Err(CocoonError::validation(
                "camera.position and camera.target must differ",
            ));
        }
        if forward.cross(self.up).length_squared() <= f32::EPSILON {
            return Err(CocoonError::validation(
                "camera.up must not be parallel to the view direction",
            ));
        }
        Ok(())
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y_deg.to_radians(), aspect, self.near, self.far)
    }

    /// Combined world to clip transform (OpenGL clip conventions, z in [-w, w]).
    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        self.projection(aspect) * self.view()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/camera.rs"]
mod tests;
