use std::path::Path;
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

use super::compile::{compile_and_link, LinkedStages, ProgramBuild, SAMPLER_BINDING};
use super::{ShaderError, ShaderSource, ShaderStage};
use crate::batch::Vertex;
use crate::render::RenderCtx;

/// Name of the view-projection uniform.
pub const UNIFORM_VIEW_PROJECTION: &str = "u_view_projection";
/// Name of the per-batch model uniform.
pub const UNIFORM_MODEL: &str = "u_model";

/// CPU mirror of the `@group(0) @binding(0)` uniform block.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct Globals {
    view_projection: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
}

fn uniform_offset(name: &str) -> Option<u64> {
    match name {
        UNIFORM_VIEW_PROJECTION => Some(std::mem::offset_of!(Globals, view_projection) as u64),
        UNIFORM_MODEL => Some(std::mem::offset_of!(Globals, model) as u64),
        _ => None,
    }
}

/// GPU objects of a linked program.
#[derive(Debug)]
pub(crate) struct ProgramGpu {
    pub(crate) pipeline: wgpu::RenderPipeline,
    pub(crate) globals_ubo: wgpu::Buffer,
    pub(crate) globals_bind_group: wgpu::BindGroup,
    pub(crate) texture_layout: wgpu::BindGroupLayout,
}

/// A loaded shader program.
///
/// Loading never panics on bad shader code: a program that failed to compile
/// or link is still returned, reports `is_valid() == false` and draws nothing.
/// Clones share the same GPU objects.
#[derive(Debug, Clone)]
pub struct ShaderProgram {
    gpu: Option<Arc<ProgramGpu>>,
    diagnostics: Arc<[ShaderError]>,
}

/// Parses, compiles and links a dual-section shader file's contents.
///
/// Only a malformed file is an error; see [`ShaderProgram::is_valid`].
pub fn load_shader(ctx: &RenderCtx<'_>, source_text: &str) -> Result<ShaderProgram, ShaderError> {
    let source = ShaderSource::parse(source_text)?;
    Ok(ShaderProgram::from_build(ctx, compile_and_link(&source)))
}

/// Reads `path` and loads it with [`load_shader`].
pub fn load_shader_file(
    ctx: &RenderCtx<'_>,
    path: impl AsRef<Path>,
) -> Result<ShaderProgram, ShaderError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| ShaderError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    log::debug!("loading shader {}", path.display());
    load_shader(ctx, &text)
}

impl ShaderProgram {
    fn from_build(ctx: &RenderCtx<'_>, build: ProgramBuild) -> Self {
        let ProgramBuild {
            linked,
            mut diagnostics,
        } = build;

        let gpu = match linked.map(|linked| create_gpu(ctx, &linked)) {
            Some(Ok(gpu)) => {
                log::debug!("shader program linked ({} diagnostics)", diagnostics.len());
                Some(Arc::new(gpu))
            }
            Some(Err(e)) => {
                log::error!("{e}");
                diagnostics.push(e);
                None
            }
            None => None,
        };

        Self {
            gpu,
            diagnostics: diagnostics.into(),
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.gpu.is_some()
    }

    /// Everything reported while loading, including non-fatal validation notes.
    #[inline]
    pub fn diagnostics(&self) -> &[ShaderError] {
        &self.diagnostics
    }

    /// Writes a named mat4 uniform.
    ///
    /// Unknown names and invalid programs are ignored with a warning.
    pub fn set_mat4_uniform(&self, queue: &wgpu::Queue, name: &str, matrix: &Mat4) {
        let Some(gpu) = self.gpu.as_deref() else {
            log::warn!("set_mat4_uniform(`{name}`) on an invalid shader program");
            return;
        };
        let Some(offset) = uniform_offset(name) else {
            log::warn!("shader program has no uniform named `{name}`");
            return;
        };
        queue.write_buffer(&gpu.globals_ubo, offset, bytemuck::bytes_of(&matrix.to_cols_array_2d()));
    }

    pub(crate) fn gpu(&self) -> Option<&ProgramGpu> {
        self.gpu.as_deref()
    }
}

/// Builds the pipeline and its resources.
///
/// Validation errors raised while building are captured by an error scope and
/// returned as [`ShaderError::Link`].
fn create_gpu(ctx: &RenderCtx<'_>, linked: &LinkedStages) -> Result<ProgramGpu, ShaderError> {
    let device = ctx.device;
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

    let vertex = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("quadra vertex shader"),
        source: wgpu::ShaderSource::Wgsl(linked.vertex.source.as_str().into()),
    });
    let fragment = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("quadra fragment shader"),
        source: wgpu::ShaderSource::Wgsl(linked.fragment.source.as_str().into()),
    });

    let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("quadra globals bgl"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    });

    let texture_entries: Vec<wgpu::BindGroupLayoutEntry> = (0..SAMPLER_BINDING)
        .map(|binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        })
        .chain(std::iter::once(wgpu::BindGroupLayoutEntry {
            binding: SAMPLER_BINDING,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        }))
        .collect();

    let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("quadra textures bgl"),
        entries: &texture_entries,
    });

    let identity = Mat4::IDENTITY.to_cols_array_2d();
    let globals_ubo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("quadra globals ubo"),
        contents: bytemuck::bytes_of(&Globals {
            view_projection: identity,
            model: identity,
        }),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });

    let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("quadra globals bind group"),
        layout: &globals_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: globals_ubo.as_entire_binding(),
        }],
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("quadra batch pipeline layout"),
        bind_group_layouts: &[&globals_layout, &texture_layout],
        immediate_size: 0,
    });

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("quadra batch pipeline"),
        layout: Some(&pipeline_layout),

        vertex: wgpu::VertexState {
            module: &vertex,
            entry_point: Some(ShaderStage::Vertex.entry_point()),
            compilation_options: Default::default(),
            buffers: &[Vertex::layout()],
        },

        fragment: Some(wgpu::FragmentState {
            module: &fragment,
            entry_point: Some(ShaderStage::Fragment.entry_point()),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: ctx.surface_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    });

    if let Some(err) = pollster::block_on(scope.pop()) {
        return Err(pipeline_error(&err));
    }

    Ok(ProgramGpu {
        pipeline,
        globals_ubo,
        globals_bind_group,
        texture_layout,
    })
}

fn pipeline_error(err: &wgpu::Error) -> ShaderError {
    ShaderError::Link(format!("pipeline creation rejected the program: {err}"))
}
