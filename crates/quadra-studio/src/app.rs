use anyhow::{Context, Result};
use quadra_engine::batch::BatchRenderer;
use quadra_engine::camera::Camera2d;
use quadra_engine::coords::{Vec2, Viewport};
use quadra_engine::core::{App, AppControl, FrameCtx};
use quadra_engine::input::{InputSource, Key};
use quadra_engine::paint::Color;
use quadra_engine::render::{RenderCtx, WgpuBackend};
use quadra_engine::shader::{load_shader, load_shader_file, BATCH_SHADER};
use quadra_engine::texture::Texture;

use crate::controls::CameraControls;
use crate::options::StudioOptions;
use crate::textures::{checkerboard, load_image, swatch};

/// Distinct swatch textures drawn each frame; more than one batch's slot table.
const SWATCHES: usize = 40;
const GRID_COLUMNS: u32 = 48;
const GRID_ROWS: u32 = 27;
const GRID_CELL: f32 = 24.0;
const SPRITE_SCALE: Vec2 = Vec2::new(3.0, 3.0);
const STATS_EVERY: u64 = 240;

/// GPU resources, created on the first frame.
struct Scene {
    renderer: BatchRenderer<WgpuBackend>,
    sprites: Vec<Texture>,
    swatches: Vec<Texture>,
}

pub struct StudioApp {
    options: StudioOptions,
    camera: Camera2d,
    controls: CameraControls,
    viewport: Option<Viewport>,
    scene: Option<Scene>,
}

impl StudioApp {
    pub fn new(options: StudioOptions) -> Self {
        Self {
            options,
            camera: Camera2d::default(),
            controls: CameraControls::default(),
            viewport: None,
            scene: None,
        }
    }

    fn ensure_scene(&mut self, ctx: &RenderCtx<'_>) -> Result<()> {
        if self.scene.is_some() {
            return Ok(());
        }

        let shader = match &self.options.shader {
            Some(path) => load_shader_file(ctx, path)?,
            None => load_shader(ctx, BATCH_SHADER)?,
        };
        if !shader.is_valid() {
            anyhow::bail!(
                "shader failed to load with {} diagnostic(s); see log",
                shader.diagnostics().len()
            );
        }

        let mut renderer = BatchRenderer::with_wgpu(ctx, self.options.capacity)?;
        renderer.use_shader(&shader);

        let mut sprites = Vec::new();
        for path in &self.options.images {
            let pixels = load_image(path)?;
            let texture = Texture::from_image(ctx, &pixels.image_data())
                .with_context(|| format!("failed to upload {}", path.display()))?;
            sprites.push(texture);
        }
        let fallback = [
            checkerboard(8, 4, [230, 230, 230, 255], [40, 40, 40, 255]),
            checkerboard(4, 8, [250, 200, 40, 255], [40, 90, 200, 255]),
        ];
        for pixels in fallback.iter().skip(sprites.len()) {
            sprites.push(Texture::from_image(ctx, &pixels.image_data())?);
        }

        let swatches = (0..SWATCHES)
            .map(|i| {
                let color = swatch(i, SWATCHES);
                let pixels = checkerboard(2, 4, color, [20, 20, 20, 255]);
                Texture::from_image(ctx, &pixels.image_data())
            })
            .collect::<Result<Vec<_>, _>>()?;

        log::info!(
            "scene ready: {} quads per batch, {} sprites, {} swatches",
            renderer.max_quads(),
            sprites.len(),
            swatches.len()
        );

        self.scene = Some(Scene {
            renderer,
            sprites,
            swatches,
        });
        Ok(())
    }

    fn sync_viewport(&mut self, viewport: Viewport) {
        if self.viewport == Some(viewport) || !viewport.is_valid() {
            return;
        }
        self.camera.set_projection(0.0, viewport.width, 0.0, viewport.height);
        self.viewport = Some(viewport);
    }
}

impl App for StudioApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input.is_key_pressed(Key::Escape) {
            return AppControl::Exit;
        }

        self.controls.apply(&mut self.camera, ctx.input, ctx.time.dt);
        self.sync_viewport(ctx.viewport());

        if let Err(e) = self.ensure_scene(&ctx.render_ctx()) {
            log::error!("failed to set up scene: {e:#}");
            return AppControl::Exit;
        }
        let Some(scene) = self.scene.as_mut() else {
            return AppControl::Continue;
        };

        let view_projection = self.camera.view_projection();
        let mut stats = None;

        let control = ctx.render(|_, target| {
            let renderer = &mut scene.renderer;
            renderer.begin_frame(target);
            renderer.clear(Color::BLACK);
            renderer.set_view_projection(view_projection);

            draw_grid(renderer);

            for (i, texture) in scene.swatches.iter().enumerate() {
                let position = Vec2::new(16.0 + i as f32 * 30.0, 8.0);
                renderer.add_texture(texture, position, Vec2::splat(3.0));
            }

            let anchors = [Vec2::zero(), Vec2::new(100.0, 100.0)];
            for (sprite, position) in scene.sprites.iter().zip(anchors) {
                renderer.add_texture(sprite, position, SPRITE_SCALE);
            }

            stats = Some(renderer.end_frame());
        });

        if let Some(stats) = stats {
            if ctx.time.frame_index % STATS_EVERY == 0 {
                ctx.window.set_title(&format!(
                    "quadra studio | {:.0} fps | {} draws",
                    ctx.time.fps, stats.draw_calls
                ));
                log::info!(
                    "frame {}: {:.0} fps, {} quads in {} draws ({} flushes)",
                    ctx.time.frame_index,
                    ctx.time.fps,
                    stats.quads,
                    stats.draw_calls,
                    stats.flushes
                );
            }
        }

        control
    }

    fn on_exit(&mut self) {
        if let Some(scene) = self.scene.take() {
            scene.renderer.destroy();
            for texture in scene.sprites.into_iter().chain(scene.swatches) {
                texture.destroy();
            }
            log::debug!("scene released");
        }
    }
}

/// Colour-ramped background grid.
fn draw_grid(renderer: &mut BatchRenderer<WgpuBackend>) {
    let gap = 2.0;
    for row in 0..GRID_ROWS {
        for col in 0..GRID_COLUMNS {
            let color = Color::rgba(
                col as f32 / GRID_COLUMNS as f32,
                row as f32 / GRID_ROWS as f32,
                0.35,
                1.0,
            );
            let position = Vec2::new(col as f32 * GRID_CELL, row as f32 * GRID_CELL);
            renderer.add_quad(position, Vec2::splat(GRID_CELL - gap), color);
        }
    }
}
