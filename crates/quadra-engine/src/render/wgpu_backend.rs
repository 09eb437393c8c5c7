use glam::Mat4;
use wgpu::util::DeviceExt;

use super::{RenderCtx, RenderTarget};
use crate::batch::{
    BatchRenderer, BatchStats, DrawBackend, Vertex, MAX_QUADS_PER_BATCH, MAX_TEXTURE_SLOTS,
    VERTICES_PER_QUAD,
};
use crate::error::RenderError;
use crate::paint::Color;
use crate::shader::{ShaderProgram, UNIFORM_VIEW_PROJECTION};
use crate::texture::{SamplerConfig, Texture};

/// wgpu implementation of [`DrawBackend`].
///
/// Each draw is recorded into its own encoder and submitted immediately, so a
/// later batch's vertex upload can never overwrite data an earlier draw reads.
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,

    sampler: wgpu::Sampler,
    /// Fills texture units the current batch does not use.
    fallback: Texture,

    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,

    units: [Option<Texture>; MAX_TEXTURE_SLOTS],
    program: Option<ShaderProgram>,
    target: Option<RenderTarget>,

    warned_invalid_program: bool,
    warned_no_target: bool,
}

impl WgpuBackend {
    pub fn new(ctx: &RenderCtx<'_>, sampler: SamplerConfig) -> Self {
        Self {
            device: ctx.device.clone(),
            queue: ctx.queue.clone(),
            sampler: sampler.create_sampler(ctx.device),
            fallback: Texture::solid(ctx.device, ctx.queue, [u8::MAX; 4]),
            vertex_buffer: None,
            index_buffer: None,
            units: std::array::from_fn(|_| None),
            program: None,
            target: None,
            warned_invalid_program: false,
            warned_no_target: false,
        }
    }

    pub fn set_program(&mut self, program: ShaderProgram) {
        self.program = Some(program);
        self.warned_invalid_program = false;
    }

    #[inline]
    pub fn program(&self) -> Option<&ShaderProgram> {
        self.program.as_ref()
    }

    /// Target for subsequent clears and draws; `None` drops the frame's view.
    pub fn set_target(&mut self, target: Option<RenderTarget>) {
        self.target = target;
        self.warned_no_target = false;
    }

    #[inline]
    pub fn target(&self) -> Option<&RenderTarget> {
        self.target.as_ref()
    }

    #[inline]
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    fn check_target(&mut self) -> bool {
        if self.target.is_none() && !self.warned_no_target {
            log::warn!("batch submitted outside begin_frame/end_frame; nothing drawn");
            self.warned_no_target = true;
        }
        self.target.is_some()
    }

    fn texture_bind_group(&self, layout: &wgpu::BindGroupLayout) -> wgpu::BindGroup {
        let mut entries: Vec<wgpu::BindGroupEntry<'_>> = self
            .units
            .iter()
            .enumerate()
            .map(|(unit, texture)| wgpu::BindGroupEntry {
                binding: unit as u32,
                resource: wgpu::BindingResource::TextureView(
                    texture.as_ref().unwrap_or(&self.fallback).view(),
                ),
            })
            .collect();
        entries.push(wgpu::BindGroupEntry {
            binding: MAX_TEXTURE_SLOTS as u32,
            resource: wgpu::BindingResource::Sampler(&self.sampler),
        });

        self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("quadra textures bind group"),
            layout,
            entries: &entries,
        })
    }
}

impl DrawBackend for WgpuBackend {
    type Texture = Texture;

    fn allocate(&mut self, vertex_capacity: usize, indices: &[u32]) {
        self.vertex_buffer = Some(self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("quadra batch vbo"),
            size: (vertex_capacity * std::mem::size_of::<Vertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));

        self.index_buffer = Some(self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quadra batch ibo"),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }

    fn clear(&mut self, color: Color) {
        if !self.check_target() {
            return;
        }
        let Some(target) = self.target.as_ref() else { return };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("quadra clear encoder"),
            });
        {
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("quadra clear pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(color.into()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }
        self.queue.submit(std::iter::once(encoder.finish()));
    }

    fn bind_texture(&mut self, unit: usize, texture: &Texture) {
        if let Some(slot) = self.units.get_mut(unit) {
            *slot = Some(texture.clone());
        }
    }

    fn upload_vertices(&mut self, vertices: &[Vertex]) {
        if vertices.is_empty() {
            return;
        }
        let Some(vbo) = self.vertex_buffer.as_ref() else { return };
        self.queue.write_buffer(vbo, 0, bytemuck::cast_slice(vertices));
    }

    fn draw_indexed(&mut self, index_count: u32, view_projection: &Mat4) {
        if index_count > 0 {
            self.submit_draw(index_count, view_projection);
        }
        self.units.iter_mut().for_each(|u| *u = None);
    }

    fn release(&mut self) {
        if let Some(vbo) = self.vertex_buffer.take() {
            vbo.destroy();
        }
        if let Some(ibo) = self.index_buffer.take() {
            ibo.destroy();
        }
        self.fallback.clone().destroy();
        self.target = None;
    }
}

impl WgpuBackend {
    fn submit_draw(&mut self, index_count: u32, view_projection: &Mat4) {
        let program = match self.program.as_ref() {
            Some(p) if p.is_valid() => p.clone(),
            _ => {
                if !self.warned_invalid_program {
                    log::warn!("no valid shader program in use; batch dropped");
                    self.warned_invalid_program = true;
                }
                return;
            }
        };
        let Some(gpu) = program.gpu() else { return };
        if !self.check_target() {
            return;
        }
        let (Some(vbo), Some(ibo)) = (self.vertex_buffer.as_ref(), self.index_buffer.as_ref()) else {
            return;
        };
        let Some(target) = self.target.as_ref() else { return };

        program.set_mat4_uniform(&self.queue, UNIFORM_VIEW_PROJECTION, view_projection);
        let textures = self.texture_bind_group(&gpu.texture_layout);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("quadra batch encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("quadra batch pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_pipeline(&gpu.pipeline);
            rpass.set_bind_group(0, &gpu.globals_bind_group, &[]);
            rpass.set_bind_group(1, &textures, &[]);
            rpass.set_vertex_buffer(0, vbo.slice(..));
            rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..index_count, 0, 0..1);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
    }
}

impl BatchRenderer<WgpuBackend> {
    /// Renderer on a wgpu backend with the default sampler.
    ///
    /// The capacity is also bounded by the device's `max_buffer_size`, since a
    /// whole batch of vertices lives in one buffer.
    pub fn with_wgpu(ctx: &RenderCtx<'_>, max_quads: usize) -> Result<Self, RenderError> {
        check_capacity(max_quads, ctx.device.limits().max_buffer_size)?;
        Self::new(WgpuBackend::new(ctx, SamplerConfig::default()), max_quads)
    }

    /// Selects the program used by subsequent flushes.
    pub fn use_shader(&mut self, program: &ShaderProgram) {
        if !program.is_valid() {
            log::warn!("use_shader called with an invalid program; draws will be dropped");
        }
        self.backend_mut().set_program(program.clone());
    }

    /// Writes a mat4 uniform of the active program.
    ///
    /// `u_view_projection` is overwritten by every flush; set it with
    /// [`BatchRenderer::set_view_projection`] instead.
    pub fn set_mat4_uniform(&self, name: &str, matrix: &Mat4) {
        let backend = self.backend();
        match backend.program() {
            Some(program) => program.set_mat4_uniform(backend.queue(), name, matrix),
            None => log::warn!("set_mat4_uniform(`{name}`) with no shader in use"),
        }
    }

    /// Starts drawing into `target` and resets the frame counters.
    pub fn begin_frame(&mut self, target: RenderTarget) {
        self.backend_mut().set_target(Some(target));
        self.reset_stats();
    }

    /// Flushes the remainder and releases the target.
    pub fn end_frame(&mut self) -> BatchStats {
        self.flush();
        self.backend_mut().set_target(None);
        self.stats()
    }
}

/// Largest batch whose vertex buffer fits in a buffer of `max_buffer_size` bytes.
fn max_quads_for_buffer(max_buffer_size: u64) -> usize {
    let per_quad = (VERTICES_PER_QUAD * std::mem::size_of::<Vertex>()) as u64;
    usize::try_from(max_buffer_size / per_quad)
        .unwrap_or(usize::MAX)
        .min(MAX_QUADS_PER_BATCH)
}

fn check_capacity(max_quads: usize, max_buffer_size: u64) -> Result<(), RenderError> {
    let max = max_quads_for_buffer(max_buffer_size);
    if max_quads > max {
        return Err(RenderError::CapacityMisconfigured {
            requested: max_quads,
            max,
        });
    }
    Ok(())
}
