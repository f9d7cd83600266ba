//! Thin-lens camera with a shutter interval.

use ember_core::RenderSettings;
use ember_math::{Ray, Vec3};
use rand::RngCore;

use crate::sampling::{gen_range, random_in_unit_disk};

/// Camera for generating rays into the scene.
///
/// Configure with the `with_*` methods, then call [`Camera::initialize`]
/// before generating rays.
#[derive(Debug, Clone)]
pub struct Camera {
    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    // Lens settings
    vfov: f32,       // Vertical field of view in degrees
    aspect: f32,     // Viewport width / height
    aperture: f32,   // Lens diameter
    focus_dist: f32, // Distance from camera to plane of perfect focus

    // Shutter
    time0: f32,
    time1: f32,

    // Cached computed values (set by initialize())
    origin: Vec3,
    lower_left_corner: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    lens_radius: f32,
}

impl Camera {
    /// Create a new camera with default settings, already initialized.
    pub fn new() -> Self {
        let mut camera = Self {
            look_from: Vec3::ZERO,
            look_at: Vec3::NEG_Z,
            vup: Vec3::Y,
            vfov: 90.0,
            aspect: 16.0 / 9.0,
            aperture: 0.0,
            focus_dist: 1.0,
            time0: 0.0,
            time1: 0.0,
            origin: Vec3::ZERO,
            lower_left_corner: Vec3::ZERO,
            horizontal: Vec3::ZERO,
            vertical: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            lens_radius: 0.0,
        };
        camera.initialize();
        camera
    }

    /// Camera described by render settings, ready to use.
    pub fn from_settings(settings: &RenderSettings) -> Self {
        let mut camera = Self::new()
            .with_position(settings.look_from, settings.look_at, settings.vup)
            .with_lens(settings.vfov, settings.aperture, settings.focus_dist)
            .with_aspect(settings.aspect)
            .with_shutter(settings.shutter_open, settings.shutter_close);
        camera.initialize();
        camera
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings. An aperture of 0 gives a pinhole camera.
    pub fn with_lens(mut self, vfov: f32, aperture: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.aperture = aperture;
        self.focus_dist = focus_dist;
        self
    }

    /// Set viewport aspect ratio (width / height).
    pub fn with_aspect(mut self, aspect: f32) -> Self {
        self.aspect = aspect;
        self
    }

    /// Set the interval over which ray times are drawn.
    pub fn with_shutter(mut self, time0: f32, time1: f32) -> Self {
        self.time0 = time0;
        self.time1 = time1;
        self
    }

    /// Initialize the camera (must be called after changing settings).
    pub fn initialize(&mut self) {
        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = self.aspect * viewport_height;

        // Orthonormal basis; w points backwards
        self.w = (self.look_from - self.look_at).normalize();
        self.u = self.vup.cross(self.w).normalize();
        self.v = self.w.cross(self.u);

        self.origin = self.look_from;
        self.horizontal = self.focus_dist * viewport_width * self.u;
        self.vertical = self.focus_dist * viewport_height * self.v;
        self.lower_left_corner = self.origin
            - self.horizontal / 2.0
            - self.vertical / 2.0
            - self.focus_dist * self.w;

        self.lens_radius = self.aperture / 2.0;
    }

    /// Ray through viewport coordinates `(s, t)`, both in `[0, 1]` from the
    /// lower-left corner.
    ///
    /// The origin is jittered across the lens and the time is drawn
    /// uniformly from the shutter interval.
    pub fn get_ray(&self, s: f32, t: f32, rng: &mut dyn RngCore) -> Ray {
        let rd = self.lens_radius * random_in_unit_disk(rng);
        let offset = self.u * rd.x + self.v * rd.y;

        let direction = self.lower_left_corner + s * self.horizontal + t * self.vertical
            - self.origin
            - offset;
        let time = gen_range(rng, self.time0, self.time1);

        Ray::new(self.origin + offset, direction, time)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
