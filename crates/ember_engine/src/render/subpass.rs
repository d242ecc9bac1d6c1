//! Geometry submission subpass
//!
//! Walks the scene's model list once per frame, resolves node world
//! transforms and world-space bounds, sorts draw units by camera distance
//! (opaque front-to-back for early depth rejection, blended back-to-front
//! for correct compositing), and emits state binds and draw calls through
//! the command recorder.
//!
//! Missing or stale resources never abort the frame: the affected draw unit
//! or binding is skipped and logged, and submission continues.

use bytemuck::{Pod, Zeroable};

use crate::foundation::math::Mat4;
use crate::scene::Scene;

use super::arena::{MeshKey, ResourceArena};
use super::cache::ResourceCache;
use super::camera::Camera;
use super::commands::{BlendState, CommandRecorder, CullMode, RasterState};
use super::material::AlphaMode;
use super::shader::{RenderDevice, ShaderSource, ShaderStage};
use super::RenderError;

/// Per-draw uniform block written into the frame's transient allocation
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct GlobalUniform {
    /// Camera view-projection matrix
    pub view_projection: [[f32; 4]; 4],
    /// Node world (model) matrix
    pub model: [[f32; 4]; 4],
    /// Camera world position (w = 1)
    pub camera_position: [f32; 4],
}

/// One sortable unit of geometry: a mesh at a resolved node transform
struct DrawUnit {
    mesh: MeshKey,
    world: Mat4,
    distance: f32,
}

/// Subpass that sorts and submits scene geometry
pub struct GeometrySubpass {
    vertex_source: ShaderSource,
    fragment_source: ShaderSource,
    base_raster: RasterState,
}

impl GeometrySubpass {
    /// Create a subpass rendering with the given shader pair
    pub fn new(vertex_source: ShaderSource, fragment_source: ShaderSource) -> Self {
        Self {
            vertex_source,
            fragment_source,
            base_raster: RasterState::default(),
        }
    }

    /// Override the default rasterizer state
    #[must_use]
    pub fn with_raster_state(mut self, state: RasterState) -> Self {
        self.base_raster = state;
        self
    }

    /// Sort and submit every model attached to the scene
    pub fn draw(
        &self,
        scene: &mut Scene,
        arena: &ResourceArena,
        camera: &Camera,
        cache: &mut ResourceCache,
        device: &mut dyn RenderDevice,
        recorder: &mut dyn CommandRecorder,
    ) -> Result<(), RenderError> {
        let (opaque, transparent) = self.collect(scene, arena, camera);
        log::trace!(
            "geometry subpass: {} opaque, {} transparent draw units",
            opaque.len(),
            transparent.len()
        );

        recorder.set_blend_state(BlendState::DISABLED);
        for unit in &opaque {
            self.draw_unit(unit, arena, camera, cache, device, recorder);
        }

        recorder.set_blend_state(BlendState::ALPHA);
        for unit in &transparent {
            self.draw_unit(unit, arena, camera, cache, device, recorder);
        }
        Ok(())
    }

    /// Gather draw units and sort them by camera distance
    fn collect(
        &self,
        scene: &mut Scene,
        arena: &ResourceArena,
        camera: &Camera,
    ) -> (Vec<DrawUnit>, Vec<DrawUnit>) {
        let mut opaque = Vec::new();
        let mut transparent = Vec::new();

        let model_keys = scene.models().to_vec();
        for model_key in model_keys {
            let Some(model) = arena.model(model_key) else {
                log::warn!("scene references a stale model; skipping");
                continue;
            };
            for node_key in model.nodes() {
                let world = match scene.world_matrix(*node_key) {
                    Ok(world) => world,
                    Err(err) => {
                        log::warn!("model `{}`: {err}; skipping node", model.name());
                        continue;
                    }
                };
                let world_bounds = model.bounds.transformed(&world);
                let distance = (world_bounds.center() - camera.position()).norm();

                for mesh_key in model.meshes() {
                    let Some(mesh) = arena.mesh(*mesh_key) else {
                        log::warn!("model `{}` references a stale mesh; skipping", model.name());
                        continue;
                    };
                    let blended = mesh
                        .material()
                        .and_then(|key| arena.material(key))
                        .map(|material| material.alpha_mode == AlphaMode::Blend)
                        .unwrap_or(false);
                    let unit = DrawUnit {
                        mesh: *mesh_key,
                        world,
                        distance,
                    };
                    if blended {
                        transparent.push(unit);
                    } else {
                        opaque.push(unit);
                    }
                }
            }
        }

        // Opaque front-to-back, transparent back-to-front.
        opaque.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        transparent.sort_by(|a, b| b.distance.total_cmp(&a.distance));
        (opaque, transparent)
    }

    /// Bind state and resources for one unit and issue its draw call
    ///
    /// Soft failures skip the affected binding or the whole unit.
    fn draw_unit(
        &self,
        unit: &DrawUnit,
        arena: &ResourceArena,
        camera: &Camera,
        cache: &mut ResourceCache,
        device: &mut dyn RenderDevice,
        recorder: &mut dyn CommandRecorder,
    ) {
        let Some(mesh) = arena.mesh(unit.mesh) else {
            return;
        };
        let material = mesh.material().and_then(|key| arena.material(key));
        if mesh.material().is_some() && material.is_none() {
            log::warn!(
                "mesh `{}` references a stale material; drawing unlit",
                mesh.name()
            );
        }

        let vertex = match cache.request_shader_module(
            device,
            ShaderStage::Vertex,
            &self.vertex_source,
            mesh.variant(),
        ) {
            Ok(module) => module,
            Err(err) => {
                log::warn!("mesh `{}`: no vertex module ({err}); skipping", mesh.name());
                return;
            }
        };
        let fragment = match cache.request_shader_module(
            device,
            ShaderStage::Fragment,
            &self.fragment_source,
            mesh.variant(),
        ) {
            Ok(module) => module,
            Err(err) => {
                log::warn!("mesh `{}`: no fragment module ({err}); skipping", mesh.name());
                return;
            }
        };
        let layout = match cache.request_pipeline_layout(device, &[&vertex, &fragment]) {
            Ok(layout) => layout,
            Err(err) => {
                log::warn!("mesh `{}`: no pipeline ({err}); skipping", mesh.name());
                return;
            }
        };
        recorder.bind_pipeline(layout.pipeline);

        let uniform = GlobalUniform {
            view_projection: camera.view_projection().into(),
            model: unit.world.into(),
            camera_position: camera.position().push(1.0).into(),
        };
        recorder.bind_uniform(0, 0, bytemuck::bytes_of(&uniform));

        let mut raster = self.base_raster;
        if material.map(|material| material.double_sided).unwrap_or(false) {
            raster.cull_mode = CullMode::None;
        }
        // A negative scale triple product means the geometry is mirrored.
        if scale_triple_product(&unit.world) < 0.0 {
            raster.front_face = raster.front_face.flipped();
        }
        recorder.set_raster_state(raster);

        if let Some(material) = material {
            for binding in &layout.resources.texture_bindings {
                let Some(texture) = material
                    .texture(&binding.name)
                    .and_then(|key| arena.texture(key))
                else {
                    log::debug!(
                        "mesh `{}`: no texture for shader binding `{}`",
                        mesh.name(),
                        binding.name
                    );
                    continue;
                };
                let (Some(image), Some(sampler)) =
                    (arena.image(texture.image), arena.sampler(texture.sampler))
                else {
                    log::debug!(
                        "mesh `{}`: stale image or sampler for `{}`",
                        mesh.name(),
                        binding.name
                    );
                    continue;
                };
                recorder.bind_texture(binding.set, binding.binding, image.handle, sampler.handle);
            }
        }

        for input in &layout.resources.vertex_inputs {
            let Some(attribute) = mesh.attribute(&input.name) else {
                log::debug!(
                    "mesh `{}`: no attribute for shader input `{}`",
                    mesh.name(),
                    input.name
                );
                continue;
            };
            recorder.bind_vertex_buffer(input.location, attribute.buffer, u64::from(attribute.offset));
        }

        match mesh.index_binding() {
            Some(index) => {
                recorder.bind_index_buffer(index.buffer, index.index_type);
                recorder.draw_indexed(index.count, 1, 0, 0, 0);
            }
            None => recorder.draw(mesh.vertex_count(), 1, 0, 0),
        }
    }
}

/// Determinant of the upper 3x3 block: the triple product of the basis
/// vectors, negative iff the transform mirrors geometry
fn scale_triple_product(world: &Mat4) -> f32 {
    world.fixed_view::<3, 3>(0, 0).into_owned().determinant()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::render::arena::ModelKey;
    use crate::render::commands::{
        BlendState, BufferHandle, FrontFace, PipelineHandle, RecordedCommand, RecordingRecorder,
        SamplerHandle, ShaderModuleHandle, TextureHandle,
    };
    use crate::render::material::Material;
    use crate::render::mesh::{IndexBinding, Mesh, VertexAttribute, VertexFormat};
    use crate::render::model::Model;
    use crate::render::shader::{
        PipelineLayout, ShaderModule, ShaderResources, TextureBinding, VertexInput,
    };
    use crate::render::texture::{Image, ImageFormat, Sampler, Texture};
    use crate::render::variant::ShaderVariant;
    use crate::render::Aabb;
    use crate::scene::Transform;

    /// Device double reflecting a fixed shader interface.
    #[derive(Default)]
    struct FakeDevice {
        next_handle: u64,
    }

    impl FakeDevice {
        fn next(&mut self) -> u64 {
            self.next_handle += 1;
            self.next_handle
        }
    }

    impl RenderDevice for FakeDevice {
        fn create_shader_module(
            &mut self,
            stage: ShaderStage,
            _source: &ShaderSource,
            _variant: &ShaderVariant,
        ) -> Result<ShaderModule, RenderError> {
            let resources = match stage {
                ShaderStage::Vertex => ShaderResources {
                    vertex_inputs: vec![
                        VertexInput {
                            name: "position".to_string(),
                            location: 0,
                        },
                        VertexInput {
                            name: "normal".to_string(),
                            location: 1,
                        },
                    ],
                    texture_bindings: Vec::new(),
                },
                ShaderStage::Fragment => ShaderResources {
                    vertex_inputs: Vec::new(),
                    texture_bindings: vec![TextureBinding {
                        name: "baseColor".to_string(),
                        set: 1,
                        binding: 0,
                    }],
                },
            };
            Ok(ShaderModule {
                handle: ShaderModuleHandle(self.next()),
                stage,
                resources,
            })
        }

        fn create_pipeline_layout(
            &mut self,
            modules: &[&ShaderModule],
        ) -> Result<PipelineLayout, RenderError> {
            let mut resources = ShaderResources::default();
            for module in modules {
                resources.merge(&module.resources);
            }
            Ok(PipelineLayout {
                pipeline: PipelineHandle(self.next()),
                resources,
            })
        }
    }

    struct Fixture {
        scene: Scene,
        arena: ResourceArena,
        camera: Camera,
        cache: ResourceCache,
        device: FakeDevice,
        subpass: GeometrySubpass,
    }

    impl Fixture {
        fn new() -> Self {
            let mut camera = Camera::new();
            camera.look_at(Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0), Vec3::y());
            Self {
                scene: Scene::new(),
                arena: ResourceArena::new(),
                camera,
                cache: ResourceCache::new(),
                device: FakeDevice::default(),
                subpass: GeometrySubpass::new(
                    ShaderSource::new("geometry.vert", ""),
                    ShaderSource::new("geometry.frag", ""),
                ),
            }
        }

        /// Spawn a single-mesh model at `position`; the mesh's vertex count
        /// doubles as a marker in the recorded stream.
        fn spawn(
            &mut self,
            name: &str,
            position: Vec3,
            scale: Vec3,
            marker: u32,
            blended: bool,
        ) -> ModelKey {
            let node = self
                .scene
                .add_node(
                    name,
                    Transform::new(position, crate::foundation::math::Quat::identity(), scale),
                    None,
                )
                .unwrap();

            let mut material = Material::new(format!("{name}-material"));
            if blended {
                material.alpha_mode = AlphaMode::Blend;
            }
            let material_key = self.arena.insert_material(material);

            let mut mesh = Mesh::new(format!("{name}-mesh"));
            mesh.set_attribute(
                "position",
                VertexAttribute {
                    buffer: BufferHandle(10),
                    format: VertexFormat::Float3,
                    stride: 12,
                    offset: 0,
                },
            );
            mesh.set_vertex_count(marker);
            mesh.set_material(Some(material_key));
            let material = self.arena.material(material_key).cloned();
            mesh.rebuild_variant(material.as_ref());
            let mesh_key = self.arena.insert_mesh(mesh);

            let mut model = Model::new(name);
            model.bounds = Aabb::new(Vec3::zeros(), Vec3::zeros());
            model.add_node(node);
            model.add_mesh(mesh_key);
            let model_key = self.arena.insert_model(model);
            self.scene.attach_model(model_key);
            model_key
        }

        fn draw(&mut self) -> RecordingRecorder {
            let mut recorder = RecordingRecorder::new();
            self.subpass
                .draw(
                    &mut self.scene,
                    &self.arena,
                    &self.camera,
                    &mut self.cache,
                    &mut self.device,
                    &mut recorder,
                )
                .unwrap();
            recorder
        }
    }

    fn draw_markers(recorder: &RecordingRecorder) -> Vec<u32> {
        recorder
            .commands()
            .iter()
            .filter_map(|command| match command {
                RecordedCommand::Draw { vertex_count, .. } => Some(*vertex_count),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn opaque_draws_front_to_back() {
        let mut fixture = Fixture::new();
        let unit = Vec3::new(1.0, 1.0, 1.0);
        fixture.spawn("far", Vec3::new(0.0, 0.0, -5.0), unit, 5, false);
        fixture.spawn("near", Vec3::new(0.0, 0.0, -1.0), unit, 1, false);
        fixture.spawn("farther", Vec3::new(0.0, 0.0, -9.0), unit, 9, false);

        let recorder = fixture.draw();
        assert_eq!(draw_markers(&recorder), vec![1, 5, 9]);
    }

    #[test]
    fn transparent_draws_back_to_front_after_blend_switch() {
        let mut fixture = Fixture::new();
        let unit = Vec3::new(1.0, 1.0, 1.0);
        fixture.spawn("near", Vec3::new(0.0, 0.0, -2.0), unit, 2, true);
        fixture.spawn("far", Vec3::new(0.0, 0.0, -8.0), unit, 8, true);

        let recorder = fixture.draw();
        assert_eq!(draw_markers(&recorder), vec![8, 2]);

        // Blending must be enabled before the first transparent draw.
        let commands = recorder.commands();
        let blend_on = commands
            .iter()
            .position(|c| *c == RecordedCommand::SetBlendState(BlendState::ALPHA))
            .unwrap();
        let first_draw = commands
            .iter()
            .position(|c| matches!(c, RecordedCommand::Draw { .. }))
            .unwrap();
        assert!(blend_on < first_draw);
    }

    #[test]
    fn mixed_scene_draws_opaque_then_transparent() {
        let mut fixture = Fixture::new();
        let unit = Vec3::new(1.0, 1.0, 1.0);
        fixture.spawn("glass", Vec3::new(0.0, 0.0, -3.0), unit, 30, true);
        fixture.spawn("hull", Vec3::new(0.0, 0.0, -6.0), unit, 60, false);

        let recorder = fixture.draw();
        // Opaque first even though it is farther away.
        assert_eq!(draw_markers(&recorder), vec![60, 30]);

        let commands = recorder.commands();
        let blend_off = commands
            .iter()
            .position(|c| *c == RecordedCommand::SetBlendState(BlendState::DISABLED))
            .unwrap();
        let blend_on = commands
            .iter()
            .position(|c| *c == RecordedCommand::SetBlendState(BlendState::ALPHA))
            .unwrap();
        assert!(blend_off < blend_on);
    }

    #[test]
    fn mirrored_scale_flips_winding() {
        let mut fixture = Fixture::new();
        fixture.spawn(
            "mirrored",
            Vec3::new(0.0, 0.0, -2.0),
            Vec3::new(-1.0, 1.0, 1.0),
            3,
            false,
        );
        fixture.spawn(
            "plain",
            Vec3::new(0.0, 0.0, -4.0),
            Vec3::new(1.0, 1.0, 1.0),
            4,
            false,
        );

        let recorder = fixture.draw();
        let winding: Vec<FrontFace> = recorder
            .commands()
            .iter()
            .filter_map(|command| match command {
                RecordedCommand::SetRasterState(state) => Some(state.front_face),
                _ => None,
            })
            .collect();
        // Near (mirrored) draws first: flipped, then the default winding.
        assert_eq!(winding, vec![FrontFace::Clockwise, FrontFace::CounterClockwise]);
    }

    #[test]
    fn per_draw_uniform_carries_camera_and_model_data() {
        let mut fixture = Fixture::new();
        let position = Vec3::new(0.0, 0.0, -2.0);
        fixture.spawn("hull", position, Vec3::new(1.0, 1.0, 1.0), 3, false);

        let recorder = fixture.draw();
        let uniform = recorder
            .commands()
            .iter()
            .find_map(|command| match command {
                RecordedCommand::BindUniform { set: 0, binding: 0, data } => Some(data.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(uniform.len(), std::mem::size_of::<GlobalUniform>());

        let block: &GlobalUniform = bytemuck::from_bytes(&uniform);
        // Model matrix translation column carries the node position.
        assert_eq!(block.model[3][0], position.x);
        assert_eq!(block.model[3][1], position.y);
        assert_eq!(block.model[3][2], position.z);
        assert_eq!(block.camera_position, [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn textures_and_attributes_bind_by_reflected_name() {
        let mut fixture = Fixture::new();
        let model = fixture.spawn("hull", Vec3::new(0.0, 0.0, -2.0), Vec3::new(1.0, 1.0, 1.0), 3, false);

        // Bind a baseColor texture to the material after the fact.
        let image = fixture.arena.insert_image(Image {
            name: "albedo".to_string(),
            extent: (4, 4),
            format: ImageFormat::Rgba8Srgb,
            handle: TextureHandle(77),
        });
        let sampler = fixture.arena.insert_sampler(Sampler::linear(SamplerHandle(88)));
        let texture = fixture.arena.insert_texture(Texture { image, sampler });
        let mesh_key = fixture.arena.model(model).unwrap().meshes()[0];
        let material_key = fixture.arena.mesh(mesh_key).unwrap().material().unwrap();
        fixture
            .arena
            .material_mut(material_key)
            .unwrap()
            .set_texture("baseColor", texture);
        fixture.arena.rebuild_mesh_variant(mesh_key);

        let recorder = fixture.draw();
        let commands = recorder.commands();
        assert!(commands.contains(&RecordedCommand::BindTexture {
            set: 1,
            binding: 0,
            texture: TextureHandle(77),
            sampler: SamplerHandle(88),
        }));
        // position attribute matches shader input 0; the mesh has no
        // `normal` attribute, so input 1 is skipped rather than bound.
        assert!(commands.contains(&RecordedCommand::BindVertexBuffer {
            location: 0,
            buffer: BufferHandle(10),
            offset: 0,
        }));
        assert!(!commands
            .iter()
            .any(|c| matches!(c, RecordedCommand::BindVertexBuffer { location: 1, .. })));
    }

    #[test]
    fn indexed_meshes_draw_indexed() {
        let mut fixture = Fixture::new();
        let model = fixture.spawn("hull", Vec3::new(0.0, 0.0, -2.0), Vec3::new(1.0, 1.0, 1.0), 3, false);
        let mesh_key = fixture.arena.model(model).unwrap().meshes()[0];
        fixture
            .arena
            .mesh_mut(mesh_key)
            .unwrap()
            .set_index_binding(Some(IndexBinding {
                buffer: BufferHandle(20),
                index_type: crate::render::commands::IndexType::U32,
                count: 36,
            }));

        let recorder = fixture.draw();
        assert!(recorder.commands().contains(&RecordedCommand::DrawIndexed {
            index_count: 36,
            instance_count: 1,
        }));
        assert_eq!(recorder.draw_count(), 1);
    }

    #[test]
    fn stale_model_is_skipped_without_aborting_the_frame() {
        let mut fixture = Fixture::new();
        let stale = fixture.spawn("gone", Vec3::new(0.0, 0.0, -1.0), Vec3::new(1.0, 1.0, 1.0), 1, false);
        fixture.spawn("kept", Vec3::new(0.0, 0.0, -2.0), Vec3::new(1.0, 1.0, 1.0), 2, false);
        fixture.arena.remove_model(stale);

        let recorder = fixture.draw();
        assert_eq!(draw_markers(&recorder), vec![2]);
    }

    #[test]
    fn failing_device_skips_the_unit_but_not_the_frame() {
        /// Device whose compiler always fails.
        struct FailingDevice;

        impl RenderDevice for FailingDevice {
            fn create_shader_module(
                &mut self,
                _stage: ShaderStage,
                source: &ShaderSource,
                _variant: &ShaderVariant,
            ) -> Result<ShaderModule, RenderError> {
                Err(crate::backend_error!(
                    "create_shader_module",
                    format!("compile failed for `{}`", source.id)
                ))
            }

            fn create_pipeline_layout(
                &mut self,
                _modules: &[&ShaderModule],
            ) -> Result<PipelineLayout, RenderError> {
                Err(crate::backend_error!("create_pipeline_layout", "no modules"))
            }
        }

        let mut fixture = Fixture::new();
        fixture.spawn("hull", Vec3::new(0.0, 0.0, -2.0), Vec3::new(1.0, 1.0, 1.0), 3, false);

        let mut recorder = RecordingRecorder::new();
        let mut device = FailingDevice;
        fixture
            .subpass
            .draw(
                &mut fixture.scene,
                &fixture.arena,
                &fixture.camera,
                &mut fixture.cache,
                &mut device,
                &mut recorder,
            )
            .unwrap();

        // The unit is dropped, the frame still runs both blend phases.
        assert_eq!(recorder.draw_count(), 0);
        assert_eq!(
            recorder.commands().to_vec(),
            vec![
                RecordedCommand::SetBlendState(BlendState::DISABLED),
                RecordedCommand::SetBlendState(BlendState::ALPHA),
            ]
        );
    }

    #[test]
    fn pipelines_are_reused_across_frames() {
        let mut fixture = Fixture::new();
        let unit = Vec3::new(1.0, 1.0, 1.0);
        fixture.spawn("a", Vec3::new(0.0, 0.0, -1.0), unit, 1, false);
        fixture.spawn("b", Vec3::new(0.0, 0.0, -2.0), unit, 2, false);

        fixture.draw();
        let modules = fixture.cache.module_count();
        let layouts = fixture.cache.layout_count();
        fixture.draw();
        // Identical variants: the second frame compiles nothing new.
        assert_eq!(fixture.cache.module_count(), modules);
        assert_eq!(fixture.cache.layout_count(), layouts);
        assert_eq!(layouts, 1);
    }
}
