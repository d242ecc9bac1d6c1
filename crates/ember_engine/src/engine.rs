//! Engine facade and frame loop
//!
//! An [`Engine`] is an explicitly constructed context owning the world,
//! scene, render resources, and camera. Collaborators (input, render device,
//! command recorder) are passed into [`Engine::tick`] by the embedding
//! application; nothing here is global.

use std::path::Path;

use thiserror::Error;

use crate::assets::{AssetError, FileReader};
use crate::config::{ConfigError, EngineConfig};
use crate::ecs::{EcsError, World};
use crate::foundation::time::Timer;
use crate::input::{InputCollaborator, InputEvent};
use crate::render::{
    Camera, ClearFlags, CommandRecorder, GeometrySubpass, RenderDevice, RenderError,
    ResourceArena, ResourceCache, Scissor, ShaderSource, Viewport,
};
use crate::scene::{Scene, SceneError};

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// ECS contract violation
    #[error(transparent)]
    Ecs(#[from] EcsError),

    /// Scene graph failure
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// Rendering failure
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Configuration failure
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Asset access failure
    #[error("asset error: {0}")]
    Asset(#[from] AssetError),
}

/// Engine context: world, scene, render resources, and frame timing
pub struct Engine {
    world: World,
    scene: Scene,
    resources: ResourceArena,
    cache: ResourceCache,
    subpass: GeometrySubpass,
    camera: Camera,
    timer: Timer,
    config: EngineConfig,
    running: bool,
}

impl Engine {
    /// Create an engine, loading shader sources through the file collaborator
    pub fn new(config: EngineConfig, files: &dyn FileReader) -> Result<Self, EngineError> {
        log::info!("initializing engine (`{}`)", config.window.title);

        let vertex_source = load_shader_source(files, &config.renderer.vertex_shader)?;
        let fragment_source = load_shader_source(files, &config.renderer.fragment_shader)?;
        let subpass = GeometrySubpass::new(vertex_source, fragment_source);

        let mut camera = Camera::new();
        camera.set_perspective(
            config.renderer.fov_y_degrees.to_radians(),
            aspect_ratio(config.window.width, config.window.height),
            config.renderer.z_near,
            config.renderer.z_far,
        );

        Ok(Self {
            world: World::with_capacity(config.renderer.max_entities),
            scene: Scene::new(),
            resources: ResourceArena::new(),
            cache: ResourceCache::new(),
            subpass,
            camera,
            timer: Timer::new(),
            config,
            running: true,
        })
    }

    /// Advance one frame: poll events, tick systems, submit geometry
    ///
    /// Strictly sequential; nothing here suspends or runs concurrently.
    pub fn tick(
        &mut self,
        input: &mut dyn InputCollaborator,
        device: &mut dyn RenderDevice,
        recorder: &mut dyn CommandRecorder,
    ) -> Result<(), EngineError> {
        self.timer.update();
        let dt = self.timer.delta_time();

        for event in input.poll_events() {
            match event {
                InputEvent::CloseRequested => {
                    log::info!("shutdown requested");
                    self.running = false;
                }
                InputEvent::Resized { width, height } => {
                    self.config.window.width = width;
                    self.config.window.height = height;
                    self.camera.set_perspective(
                        self.config.renderer.fov_y_degrees.to_radians(),
                        aspect_ratio(width, height),
                        self.config.renderer.z_near,
                        self.config.renderer.z_far,
                    );
                }
                // Key state stays queryable through the collaborator; game
                // systems consume it, not the engine core.
                InputEvent::Key { .. } => {}
            }
        }

        self.world.update(dt);

        recorder.begin_render_pass(
            ClearFlags::COLOR | ClearFlags::DEPTH,
            self.config.renderer.clear_color,
        );
        let (width, height) = (self.config.window.width, self.config.window.height);
        recorder.set_viewport(Viewport::full(width as f32, height as f32));
        recorder.set_scissor(Scissor {
            x: 0,
            y: 0,
            width,
            height,
        });
        self.subpass.draw(
            &mut self.scene,
            &self.resources,
            &self.camera,
            &mut self.cache,
            device,
            recorder,
        )?;
        recorder.end_render_pass();
        Ok(())
    }

    /// Whether the engine should keep ticking
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Request shutdown
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Get the ECS world
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get mutable access to the ECS world
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Get the scene graph
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Get mutable access to the scene graph
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Get the render resource arena
    pub fn resources(&self) -> &ResourceArena {
        &self.resources
    }

    /// Get mutable access to the render resource arena
    pub fn resources_mut(&mut self) -> &mut ResourceArena {
        &mut self.resources
    }

    /// Get the active camera
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Get mutable access to the active camera
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Get the engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.timer.delta_time()
    }
}

fn aspect_ratio(width: u32, height: u32) -> f32 {
    width as f32 / height.max(1) as f32
}

fn load_shader_source(files: &dyn FileReader, path: &str) -> Result<ShaderSource, EngineError> {
    let bytes = files.read_bytes(Path::new(path))?;
    Ok(ShaderSource::new(
        path,
        String::from_utf8_lossy(&bytes).into_owned(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::foundation::math::{Quat, Vec3};
    use crate::input::{InputCollaborator, KeyCode, NullInput};
    use crate::render::{
        Aabb, BufferHandle, HeadlessDevice, Mesh, Model, RecordedCommand, RecordingRecorder,
        VertexAttribute, VertexFormat,
    };
    use crate::scene::Transform;

    struct MemoryFiles {
        files: HashMap<String, Vec<u8>>,
    }

    impl MemoryFiles {
        fn with_default_shaders(config: &EngineConfig) -> Self {
            let mut files = HashMap::new();
            files.insert(
                config.renderer.vertex_shader.clone(),
                b"void main() {}".to_vec(),
            );
            files.insert(
                config.renderer.fragment_shader.clone(),
                b"void main() {}".to_vec(),
            );
            Self { files }
        }
    }

    impl FileReader for MemoryFiles {
        fn read_bytes(&self, path: &Path) -> Result<Vec<u8>, AssetError> {
            self.files
                .get(path.to_string_lossy().as_ref())
                .cloned()
                .ok_or_else(|| AssetError::NotFound(path.display().to_string()))
        }
    }

    struct ClosingInput;

    impl InputCollaborator for ClosingInput {
        fn poll_events(&mut self) -> Vec<InputEvent> {
            vec![InputEvent::CloseRequested]
        }

        fn is_key_pressed(&self, _key: KeyCode) -> bool {
            false
        }
    }

    fn engine() -> Engine {
        let config = EngineConfig::default();
        let files = MemoryFiles::with_default_shaders(&config);
        Engine::new(config, &files).unwrap()
    }

    #[test]
    fn missing_shader_source_fails_construction() {
        let config = EngineConfig::default();
        let files = MemoryFiles {
            files: HashMap::new(),
        };
        assert!(matches!(
            Engine::new(config, &files),
            Err(EngineError::Asset(AssetError::NotFound(_)))
        ));
    }

    #[test]
    fn tick_brackets_the_render_pass() {
        let mut engine = engine();
        let mut input = NullInput;
        let mut device = HeadlessDevice::default();
        let mut recorder = RecordingRecorder::new();

        engine.tick(&mut input, &mut device, &mut recorder).unwrap();
        assert!(engine.is_running());

        let commands = recorder.commands();
        assert!(matches!(
            commands.first(),
            Some(RecordedCommand::BeginRenderPass { .. })
        ));
        assert_eq!(commands.last(), Some(&RecordedCommand::EndRenderPass));
    }

    #[test]
    fn close_request_stops_the_engine() {
        let mut engine = engine();
        let mut input = ClosingInput;
        let mut device = HeadlessDevice::default();
        let mut recorder = RecordingRecorder::new();

        engine.tick(&mut input, &mut device, &mut recorder).unwrap();
        assert!(!engine.is_running());
    }

    #[test]
    fn spawned_model_is_submitted_through_tick() {
        let mut engine = engine();

        let node = engine
            .scene_mut()
            .add_node(
                "hull",
                Transform::new(
                    Vec3::new(0.0, 0.0, -4.0),
                    Quat::identity(),
                    Vec3::new(1.0, 1.0, 1.0),
                ),
                None,
            )
            .unwrap();

        let mut mesh = Mesh::new("hull-mesh");
        mesh.set_attribute(
            "position",
            VertexAttribute {
                buffer: BufferHandle(1),
                format: VertexFormat::Float3,
                stride: 12,
                offset: 0,
            },
        );
        mesh.set_vertex_count(36);
        mesh.rebuild_variant(None);
        let mesh = engine.resources_mut().insert_mesh(mesh);

        let mut model = Model::new("hull");
        model.bounds = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        model.add_node(node);
        model.add_mesh(mesh);
        let model = engine.resources_mut().insert_model(model);
        engine.scene_mut().attach_model(model);

        let mut input = NullInput;
        let mut device = HeadlessDevice::default();
        let mut recorder = RecordingRecorder::new();
        engine.tick(&mut input, &mut device, &mut recorder).unwrap();

        assert_eq!(recorder.draw_count(), 1);
        assert!(recorder.commands().contains(&RecordedCommand::Draw {
            vertex_count: 36,
            instance_count: 1,
        }));
    }
}
