//! Authoritative scene state: models, lights, viewpoints, and the
//! scripted car.
//!
//! The scene is an explicit object passed into the render step — there
//! are no hidden globals. Each frame the host calls
//! [`update`](Scene::update) to advance the car and re-pose its
//! headlights, [`execute`](Scene::execute) for every command the input
//! layer produced, and the accessors to pull the view matrix, lights,
//! and draw list for rendering.

pub mod car;
pub mod command;
pub mod mesh;
pub mod model;
pub mod sphere;
pub mod vertex;

use glam::{Mat4, Quat, Vec3};

use crate::camera::controller::FlightCamera;
use crate::camera::rig::CameraRig;
use crate::lighting::{GpuSpotLight, SpotLight, SPOT_LIGHT_COUNT};
use crate::options::{Options, SkyPreset};
use crate::scene::car::{CarAnimator, CarPose};
use crate::scene::command::SceneCommand;
use crate::scene::model::Model;

/// Initial position of the free-flight camera.
const FREE_CAMERA_START: Vec3 = Vec3::new(0.0, 2.0, 10.0);
/// Headlight beam direction in car-local space before user tilt.
const HEADLIGHT_AIM: Vec3 = Vec3::new(0.0, -0.3, 1.0);
/// Headlight beam color.
const HEADLIGHT_COLOR: Vec3 = Vec3::new(0.9, 0.85, 0.7);
/// Headlight cone half-angles in degrees (inner, outer) and range.
const HEADLIGHT_CONE: (f32, f32) = (16.0, 22.0);
const HEADLIGHT_RADIUS: f32 = 4.0;

/// How a model is placed in the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// A fixed world transform (the city, the sphere).
    Static(Mat4),
    /// Attached to the scripted car: translated to its position, scaled
    /// down to scene units, rotated to its heading.
    Car,
}

/// A model plus its placement.
pub struct SceneModel {
    /// Imported mesh list.
    pub model: Model,
    placement: Placement,
}

impl SceneModel {
    /// Resolve the world transform for the current car pose.
    #[must_use]
    pub fn transform(&self, car: &CarPose) -> Mat4 {
        match self.placement {
            Placement::Static(matrix) => matrix,
            Placement::Car => {
                Mat4::from_translation(car.position)
                    * Mat4::from_scale(Vec3::splat(0.1))
                    * Mat4::from_quat(Quat::from_rotation_y(
                        car.heading_deg.to_radians(),
                    ))
            }
        }
    }
}

/// The authoritative scene. Owns all state the frame loop mutates.
pub struct Scene {
    /// Models in insertion order; insertion order is draw order.
    models: Vec<SceneModel>,
    rig: CameraRig,
    car: CarAnimator,
    street_lamp: SpotLight,
    headlights: [SpotLight; 2],
    headlight_aim: Vec3,
    headlight_intensity: f32,
    night: bool,
    phong_shading: bool,
    constrain_pitch: bool,
    day_sky: SkyPreset,
    night_sky: SkyPreset,
}

impl Scene {
    /// Create an empty scene (no models yet) configured from options.
    #[must_use]
    pub fn new(options: &Options) -> Self {
        let flight =
            FlightCamera::from_options(FREE_CAMERA_START, &options.camera);
        let street_lamp = SpotLight::new(
            Vec3::new(-5.7, 2.3, 5.4),
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(1.0, 0.8, 0.6),
            5.0,
            35.0,
            35.5,
            3.0,
        );
        let headlight_intensity =
            options.lighting.headlight_intensity.clamp(0.0, 1.0);
        let car = CarAnimator::new();
        let headlights =
            build_headlights(&car.pose(), HEADLIGHT_AIM, headlight_intensity);

        Self {
            models: Vec::new(),
            rig: CameraRig::new(flight),
            car,
            street_lamp,
            headlights,
            headlight_aim: HEADLIGHT_AIM,
            headlight_intensity,
            night: options.lighting.start_at_night,
            phong_shading: true,
            constrain_pitch: options.camera.constrain_pitch,
            day_sky: options.lighting.day,
            night_sky: options.lighting.night,
        }
    }

    /// Append a model; models draw in insertion order.
    pub fn add_model(&mut self, model: Model, placement: Placement) {
        self.models.push(SceneModel { model, placement });
    }

    /// The models in draw order.
    #[must_use]
    pub fn models(&self) -> &[SceneModel] {
        &self.models
    }

    /// Models paired with their resolved world transforms, in draw
    /// order.
    pub fn draw_items(&self) -> impl Iterator<Item = (&Model, Mat4)> {
        let pose = self.car.pose();
        self.models
            .iter()
            .map(move |m| (&m.model, m.transform(&pose)))
    }

    /// Advance the scripted car and re-pose its headlights.
    pub fn update(&mut self, dt: f32) {
        self.car.update(dt);
        self.headlights = build_headlights(
            &self.car.pose(),
            self.headlight_aim,
            self.headlight_intensity,
        );
    }

    /// Apply one discrete command from the input layer.
    pub fn execute(&mut self, command: SceneCommand) {
        match command {
            SceneCommand::MoveCamera { direction, dt } => {
                self.rig.flight.move_by(direction, dt);
            }
            SceneCommand::Look { delta } => {
                self.rig.flight.look(delta.x, delta.y, self.constrain_pitch);
            }
            SceneCommand::Zoom { delta } => self.rig.flight.zoom(delta),
            SceneCommand::Roll { delta_degrees } => {
                self.rig.flight.roll(delta_degrees);
            }
            SceneCommand::SelectViewpoint(mode) => self.rig.set_mode(mode),
            SceneCommand::ToggleNight => self.night = !self.night,
            SceneCommand::ToggleShadingModel => {
                self.phong_shading = !self.phong_shading;
            }
            SceneCommand::AimHeadlights { delta } => {
                self.headlight_aim.x += delta.x;
                self.headlight_aim.y += delta.y;
            }
            SceneCommand::AdjustHeadlightIntensity { delta } => {
                self.headlight_intensity =
                    (self.headlight_intensity + delta).clamp(0.0, 1.0);
            }
        }
    }

    /// View matrix and eye position of the active viewpoint.
    #[must_use]
    pub fn view(&self) -> (Mat4, Vec3) {
        let pose = self.car.pose();
        self.rig.view(pose.position, pose.heading_deg)
    }

    /// The camera rig (viewpoint modes and the free camera).
    #[must_use]
    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    /// Mutable rig access for the viewer layer.
    pub fn rig_mut(&mut self) -> &mut CameraRig {
        &mut self.rig
    }

    /// Current pose of the scripted car.
    #[must_use]
    pub fn car_pose(&self) -> CarPose {
        self.car.pose()
    }

    /// Whether the night lighting preset is active.
    #[must_use]
    pub fn night(&self) -> bool {
        self.night
    }

    /// Whether per-pixel (Phong) shading is active; otherwise the
    /// shader falls back to per-vertex (Gouraud).
    #[must_use]
    pub fn phong_shading(&self) -> bool {
        self.phong_shading
    }

    /// The sky preset for the current time of day.
    #[must_use]
    pub fn sky(&self) -> &SkyPreset {
        if self.night {
            &self.night_sky
        } else {
            &self.day_sky
        }
    }

    /// Pack all spot lights for the uniform buffer: street lamp first,
    /// then the two headlights. By day the lamp is disabled (zero
    /// contribution) while the headlights stay live.
    #[must_use]
    pub fn spot_lights_gpu(&self) -> [GpuSpotLight; SPOT_LIGHT_COUNT] {
        let lamp = if self.night {
            self.street_lamp.to_gpu()
        } else {
            GpuSpotLight::disabled()
        };
        [
            lamp,
            self.headlights[0].to_gpu(),
            self.headlights[1].to_gpu(),
        ]
    }
}

/// Build both headlight descriptors from the car pose, the user aim,
/// and the current intensity.
fn build_headlights(
    pose: &CarPose,
    aim: Vec3,
    intensity: f32,
) -> [SpotLight; 2] {
    pose.headlight_poses(aim).map(|hp| {
        SpotLight::new(
            hp.position,
            hp.direction,
            HEADLIGHT_COLOR,
            intensity,
            HEADLIGHT_CONE.0,
            HEADLIGHT_CONE.1,
            HEADLIGHT_RADIUS,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::rig::ViewpointMode;
    use glam::Vec2;

    fn scene() -> Scene {
        Scene::new(&Options::default())
    }

    #[test]
    fn toggle_night_switches_sky_and_lamp() {
        let mut s = scene();
        assert!(!s.night());
        let day_sky = *s.sky();
        assert_eq!(s.spot_lights_gpu()[0].color, [0.0; 3]);

        s.execute(SceneCommand::ToggleNight);
        assert!(s.night());
        assert_ne!(*s.sky(), day_sky);
        // The lamp contributes at night: color premultiplied by 5.
        assert!(s.spot_lights_gpu()[0].color[0] > 1.0);
    }

    #[test]
    fn headlights_track_the_car() {
        let mut s = scene();
        let before = s.spot_lights_gpu()[1];
        s.update(1.0);
        let after = s.spot_lights_gpu()[1];
        // One second at cruising speed moves the car (and its lamps).
        assert_ne!(before.position, after.position);
        // Both headlights share a direction.
        let lights = s.spot_lights_gpu();
        assert_eq!(lights[1].direction, lights[2].direction);
    }

    #[test]
    fn headlight_intensity_clamps() {
        let mut s = scene();
        s.execute(SceneCommand::AdjustHeadlightIntensity { delta: 10.0 });
        s.update(0.0);
        let full = s.spot_lights_gpu()[1];
        let expected = HEADLIGHT_COLOR;
        assert!(
            (Vec3::from_array(full.color) - expected).length() < 1e-5,
            "intensity should clamp to 1"
        );
        s.execute(SceneCommand::AdjustHeadlightIntensity { delta: -10.0 });
        s.update(0.0);
        assert_eq!(s.spot_lights_gpu()[1].color, [0.0; 3]);
    }

    #[test]
    fn aiming_tilts_the_beams_after_update() {
        let mut s = scene();
        s.update(0.0);
        let before = s.spot_lights_gpu()[1].direction;
        s.execute(SceneCommand::AimHeadlights {
            delta: Vec2::new(0.0, 0.5),
        });
        s.update(0.0);
        let after = s.spot_lights_gpu()[1].direction;
        assert_ne!(before, after);
    }

    #[test]
    fn commands_reach_the_flight_camera() {
        let mut s = scene();
        let start = s.rig().flight.camera.position;
        s.execute(SceneCommand::MoveCamera {
            direction: crate::camera::controller::MoveDirection::Forward,
            dt: 1.0,
        });
        assert_ne!(s.rig().flight.camera.position, start);

        s.execute(SceneCommand::Zoom { delta: 5.0 });
        assert_eq!(s.rig().flight.camera.fovy, 40.0);
    }

    #[test]
    fn follow_view_looks_at_the_car() {
        let mut s = scene();
        s.execute(SceneCommand::SelectViewpoint(ViewpointMode::Follow));
        let (view, _) = s.view();
        let p = view.transform_point3(s.car_pose().position);
        assert!(p.x.abs() < 1e-3);
        assert!(p.y.abs() < 1e-3);
        assert!(p.z < 0.0);
    }

    #[test]
    fn car_placement_follows_the_pose() {
        let pose = CarPose {
            position: Vec3::new(5.0, 0.0, -3.0),
            heading_deg: -90.0,
        };
        let model = SceneModel {
            model: Model::from_raw(
                &model::RawScene {
                    roots: vec![model::RawNode {
                        mesh_indices: Vec::new(),
                        children: Vec::new(),
                    }],
                    primitives: Vec::new(),
                    materials: Vec::new(),
                },
                std::path::Path::new("car.gltf"),
                &mut NullUploader,
            )
            .unwrap(),
            placement: Placement::Car,
        };
        let m = model.transform(&pose);
        // The origin of the model lands at the car position.
        assert!((m.transform_point3(Vec3::ZERO) - pose.position).length()
            < 1e-5);
        // Scale is applied before rotation: a unit X offset shrinks to
        // 0.1 units, rotated by the heading.
        let x = m.transform_point3(Vec3::X) - pose.position;
        assert!((x.length() - 0.1).abs() < 1e-5);
    }

    struct NullUploader;

    impl model::TextureUploader for NullUploader {
        fn upload(
            &mut self,
            _path: &std::path::Path,
        ) -> Result<
            mesh::TextureHandle,
            crate::error::TextureLoadError,
        > {
            Ok(mesh::TextureHandle::NULL)
        }
    }
}
