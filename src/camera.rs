use glam::{Mat4, Vec3, Vec4};

/// Viewer position plus the direction it faces. This is all the bubble
/// simulation needs from the host to aim a breath.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewerPose {
    pub position: Vec3,
    pub forward: Vec3,
}

impl ViewerPose {
    /// Point just in front of and below the eye where a breath starts.
    pub fn breath_origin(&self, forward_offset: f32, drop: f32) -> Vec3 {
        self.position + self.forward * forward_offset - Vec3::Y * drop
    }
}

/// Right-handed perspective camera.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye).normalize_or_zero()
    }

    /// Camera-space right and up axes in world space, for billboards.
    pub fn basis(&self) -> (Vec3, Vec3) {
        let fwd = self.forward();
        let right = fwd.cross(self.up).normalize_or_zero();
        let up = right.cross(fwd);
        (right, up)
    }

    pub fn pose(&self) -> ViewerPose {
        ViewerPose {
            position: self.eye,
            forward: self.forward(),
        }
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// World-space ray through pixel `(sx, sy)` of a `width` x `height`
    /// viewport. Returns `(origin, direction)`.
    pub fn screen_ray(&self, width: f32, height: f32, sx: f32, sy: f32) -> (Vec3, Vec3) {
        let ndc_x = (2.0 * sx / width.max(1.0)) - 1.0;
        let ndc_y = 1.0 - (2.0 * sy / height.max(1.0));
        let inv = self.view_proj().inverse();
        let p_far = inv * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
        let p1: Vec3 = p_far.truncate() / p_far.w;
        let rd = (p1 - self.eye).normalize_or_zero();
        (self.eye, rd)
    }

    /// Distance along the view axis, used to sort transparent bubbles.
    pub fn view_depth(&self, point: Vec3) -> f32 {
        (point - self.eye).dot(self.forward())
    }
}
