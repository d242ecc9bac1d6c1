//! GPU command recording contract
//!
//! The engine core never talks to a graphics API directly; it records state
//! changes and draws through the [`CommandRecorder`] trait, implemented by
//! the external backend. Handles are opaque integers minted by that backend.
//! [`RecordingRecorder`] captures the command stream for tests and headless
//! runs.

use bitflags::bitflags;

/// Opaque handle to a GPU buffer owned by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u64);

/// Opaque handle to a compiled graphics pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipelineHandle(pub u64);

/// Opaque handle to a GPU texture (image plus view)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Opaque handle to a GPU sampler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SamplerHandle(pub u64);

/// Opaque handle to a compiled shader module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderModuleHandle(pub u64);

/// Index element width for indexed draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexType {
    /// 16-bit indices
    U16,
    /// 32-bit indices
    U32,
}

/// Triangle front-face winding order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrontFace {
    /// Counter-clockwise triangles face the camera
    CounterClockwise,
    /// Clockwise triangles face the camera
    Clockwise,
}

impl FrontFace {
    /// The opposite winding, used when a mirrored transform flips geometry
    pub fn flipped(self) -> Self {
        match self {
            Self::CounterClockwise => Self::Clockwise,
            Self::Clockwise => Self::CounterClockwise,
        }
    }
}

/// Face culling mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CullMode {
    /// Cull nothing
    None,
    /// Cull front faces
    Front,
    /// Cull back faces
    Back,
}

/// Rasterizer state bound per draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RasterState {
    /// Front-face winding
    pub front_face: FrontFace,
    /// Face culling mode
    pub cull_mode: CullMode,
}

impl Default for RasterState {
    fn default() -> Self {
        Self {
            front_face: FrontFace::CounterClockwise,
            cull_mode: CullMode::Back,
        }
    }
}

/// Blend factor for color blending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    /// Factor of zero
    Zero,
    /// Factor of one
    One,
    /// Source alpha
    SrcAlpha,
    /// One minus source alpha
    OneMinusSrcAlpha,
}

/// Color blend state for a subpass phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlendState {
    /// Whether blending is enabled
    pub enabled: bool,
    /// Source color factor
    pub src_factor: BlendFactor,
    /// Destination color factor
    pub dst_factor: BlendFactor,
}

impl BlendState {
    /// Blending disabled (opaque phase)
    pub const DISABLED: Self = Self {
        enabled: false,
        src_factor: BlendFactor::One,
        dst_factor: BlendFactor::Zero,
    };

    /// Standard alpha blending (transparent phase):
    /// `src * srcAlpha + dst * (1 - srcAlpha)`
    pub const ALPHA: Self = Self {
        enabled: true,
        src_factor: BlendFactor::SrcAlpha,
        dst_factor: BlendFactor::OneMinusSrcAlpha,
    };
}

/// Viewport rectangle with depth range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Left edge in pixels
    pub x: f32,
    /// Top edge in pixels
    pub y: f32,
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
    /// Minimum depth
    pub min_depth: f32,
    /// Maximum depth
    pub max_depth: f32,
}

impl Viewport {
    /// Full-extent viewport with the standard [0,1] depth range
    pub fn full(width: f32, height: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
            min_depth: 0.0,
            max_depth: 1.0,
        }
    }
}

/// Scissor rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Scissor {
    /// Left edge in pixels
    pub x: i32,
    /// Top edge in pixels
    pub y: i32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

bitflags! {
    /// Attachments cleared when a render pass begins
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearFlags: u32 {
        /// Clear the color attachment
        const COLOR = 1;
        /// Clear the depth attachment
        const DEPTH = 1 << 1;
        /// Clear the stencil attachment
        const STENCIL = 1 << 2;
    }
}

/// Records GPU state changes and draw calls for one frame
///
/// Implemented by the external backend. Per-draw uniform data passed to
/// [`CommandRecorder::bind_uniform`] is written into a per-frame transient
/// allocation owned by the backend; the bytes need not outlive the call.
pub trait CommandRecorder {
    /// Begin the render pass, clearing the selected attachments
    fn begin_render_pass(&mut self, clear: ClearFlags, clear_color: [f32; 4]);

    /// End the render pass
    fn end_render_pass(&mut self);

    /// Bind a graphics pipeline
    fn bind_pipeline(&mut self, pipeline: PipelineHandle);

    /// Set the viewport
    fn set_viewport(&mut self, viewport: Viewport);

    /// Set the scissor rectangle
    fn set_scissor(&mut self, scissor: Scissor);

    /// Set rasterizer state (winding, culling)
    fn set_raster_state(&mut self, state: RasterState);

    /// Set color blend state
    fn set_blend_state(&mut self, state: BlendState);

    /// Bind a vertex buffer to a shader input location
    fn bind_vertex_buffer(&mut self, location: u32, buffer: BufferHandle, offset: u64);

    /// Bind an index buffer
    fn bind_index_buffer(&mut self, buffer: BufferHandle, index_type: IndexType);

    /// Push a small per-draw constant block
    fn push_constants(&mut self, offset: u32, data: &[u8]);

    /// Write `data` into a per-frame transient allocation and bind it as a
    /// uniform at (set, binding)
    fn bind_uniform(&mut self, set: u32, binding: u32, data: &[u8]);

    /// Bind a texture/sampler pair at (set, binding)
    fn bind_texture(&mut self, set: u32, binding: u32, texture: TextureHandle, sampler: SamplerHandle);

    /// Issue a non-indexed draw
    fn draw(&mut self, vertex_count: u32, instance_count: u32, first_vertex: u32, first_instance: u32);

    /// Issue an indexed draw
    fn draw_indexed(
        &mut self,
        index_count: u32,
        instance_count: u32,
        first_index: u32,
        vertex_offset: i32,
        first_instance: u32,
    );
}

/// One captured recorder call
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCommand {
    /// Captured [`CommandRecorder::begin_render_pass`]
    BeginRenderPass {
        /// Cleared attachments
        clear: ClearFlags,
        /// Clear color
        clear_color: [f32; 4],
    },
    /// Captured [`CommandRecorder::end_render_pass`]
    EndRenderPass,
    /// Captured [`CommandRecorder::bind_pipeline`]
    BindPipeline(PipelineHandle),
    /// Captured [`CommandRecorder::set_viewport`]
    SetViewport(Viewport),
    /// Captured [`CommandRecorder::set_scissor`]
    SetScissor(Scissor),
    /// Captured [`CommandRecorder::set_raster_state`]
    SetRasterState(RasterState),
    /// Captured [`CommandRecorder::set_blend_state`]
    SetBlendState(BlendState),
    /// Captured [`CommandRecorder::bind_vertex_buffer`]
    BindVertexBuffer {
        /// Shader input location
        location: u32,
        /// Bound buffer
        buffer: BufferHandle,
        /// Byte offset
        offset: u64,
    },
    /// Captured [`CommandRecorder::bind_index_buffer`]
    BindIndexBuffer {
        /// Bound buffer
        buffer: BufferHandle,
        /// Index element width
        index_type: IndexType,
    },
    /// Captured [`CommandRecorder::push_constants`]
    PushConstants {
        /// Byte offset
        offset: u32,
        /// Constant block bytes
        data: Vec<u8>,
    },
    /// Captured [`CommandRecorder::bind_uniform`]
    BindUniform {
        /// Descriptor set
        set: u32,
        /// Binding slot
        binding: u32,
        /// Uniform block bytes
        data: Vec<u8>,
    },
    /// Captured [`CommandRecorder::bind_texture`]
    BindTexture {
        /// Descriptor set
        set: u32,
        /// Binding slot
        binding: u32,
        /// Bound texture
        texture: TextureHandle,
        /// Bound sampler
        sampler: SamplerHandle,
    },
    /// Captured [`CommandRecorder::draw`]
    Draw {
        /// Vertices per instance
        vertex_count: u32,
        /// Instance count
        instance_count: u32,
    },
    /// Captured [`CommandRecorder::draw_indexed`]
    DrawIndexed {
        /// Indices per instance
        index_count: u32,
        /// Instance count
        instance_count: u32,
    },
}

/// Recorder that captures the command stream instead of submitting it
#[derive(Debug, Default)]
pub struct RecordingRecorder {
    commands: Vec<RecordedCommand>,
}

impl RecordingRecorder {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Captured commands in submission order
    pub fn commands(&self) -> &[RecordedCommand] {
        &self.commands
    }

    /// Number of draw calls (indexed and non-indexed) captured
    pub fn draw_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| {
                matches!(
                    command,
                    RecordedCommand::Draw { .. } | RecordedCommand::DrawIndexed { .. }
                )
            })
            .count()
    }

    /// Discard captured commands
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl CommandRecorder for RecordingRecorder {
    fn begin_render_pass(&mut self, clear: ClearFlags, clear_color: [f32; 4]) {
        self.commands
            .push(RecordedCommand::BeginRenderPass { clear, clear_color });
    }

    fn end_render_pass(&mut self) {
        self.commands.push(RecordedCommand::EndRenderPass);
    }

    fn bind_pipeline(&mut self, pipeline: PipelineHandle) {
        self.commands.push(RecordedCommand::BindPipeline(pipeline));
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.commands.push(RecordedCommand::SetViewport(viewport));
    }

    fn set_scissor(&mut self, scissor: Scissor) {
        self.commands.push(RecordedCommand::SetScissor(scissor));
    }

    fn set_raster_state(&mut self, state: RasterState) {
        self.commands.push(RecordedCommand::SetRasterState(state));
    }

    fn set_blend_state(&mut self, state: BlendState) {
        self.commands.push(RecordedCommand::SetBlendState(state));
    }

    fn bind_vertex_buffer(&mut self, location: u32, buffer: BufferHandle, offset: u64) {
        self.commands.push(RecordedCommand::BindVertexBuffer {
            location,
            buffer,
            offset,
        });
    }

    fn bind_index_buffer(&mut self, buffer: BufferHandle, index_type: IndexType) {
        self.commands
            .push(RecordedCommand::BindIndexBuffer { buffer, index_type });
    }

    fn push_constants(&mut self, offset: u32, data: &[u8]) {
        self.commands.push(RecordedCommand::PushConstants {
            offset,
            data: data.to_vec(),
        });
    }

    fn bind_uniform(&mut self, set: u32, binding: u32, data: &[u8]) {
        self.commands.push(RecordedCommand::BindUniform {
            set,
            binding,
            data: data.to_vec(),
        });
    }

    fn bind_texture(&mut self, set: u32, binding: u32, texture: TextureHandle, sampler: SamplerHandle) {
        self.commands.push(RecordedCommand::BindTexture {
            set,
            binding,
            texture,
            sampler,
        });
    }

    fn draw(&mut self, vertex_count: u32, instance_count: u32, _first_vertex: u32, _first_instance: u32) {
        self.commands.push(RecordedCommand::Draw {
            vertex_count,
            instance_count,
        });
    }

    fn draw_indexed(
        &mut self,
        index_count: u32,
        instance_count: u32,
        _first_index: u32,
        _vertex_offset: i32,
        _first_instance: u32,
    ) {
        self.commands.push(RecordedCommand::DrawIndexed {
            index_count,
            instance_count,
        });
    }
}
