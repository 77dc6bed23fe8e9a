use glam::{Mat4, Vec3};

use crate::renderer::RenderView;

/// Keeps the polar angle off the poles, where the view basis degenerates.
const BETA_LIMIT: f32 = 0.01;

/// Camera orbiting a target point.
///
/// `alpha` is the angle around the vertical axis, `beta` the angle from the
/// vertical. Decreasing `alpha` turns the view toward its right.
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub alpha: f32,
    beta: f32,
    pub radius: f32,
    pub target: Vec3,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            alpha: -std::f32::consts::FRAC_PI_2,
            beta: 1.3,
            radius: 6.0,
            target: Vec3::ZERO,
            fov: 60.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 5000.0,
        }
    }
}

impl OrbitCamera {
    pub fn new(alpha: f32, beta: f32, radius: f32, target: Vec3) -> Self {
        let mut cam = Self {
            alpha,
            radius,
            target,
            ..Self::default()
        };
        cam.set_beta(beta);
        cam
    }

    pub fn beta(&self) -> f32 {
        self.beta
    }

    pub fn set_beta(&mut self, beta: f32) {
        self.beta = beta.clamp(BETA_LIMIT, std::f32::consts::PI - BETA_LIMIT);
    }

    pub fn position(&self) -> Vec3 {
        let (sin_a, cos_a) = self.alpha.sin_cos();
        let (sin_b, cos_b) = self.beta.sin_cos();
        self.target + self.radius * Vec3::new(cos_a * sin_b, cos_b, -sin_a * sin_b)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    /// Camera-to-world transform. Column x is the view's right, column -z
    /// its forward.
    pub fn world_matrix(&self) -> Mat4 {
        self.view_matrix().inverse()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn render_view(&self) -> RenderView {
        RenderView {
            eye: self.position(),
            target: self.target,
            fov_degrees: self.fov.to_degrees(),
        }
    }
}
