use crate::batch::MAX_TEXTURE_SLOTS;

/// Initialization parameters for the GPU layer.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when available.
    ///
    /// Textures are uploaded as sRGB, so an sRGB target keeps colours unchanged.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior).
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference for the surface.
    ///
    /// If provided but unsupported on the current surface, a supported mode is selected.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    ///
    /// Must allow [`MAX_TEXTURE_SLOTS`] sampled textures in the fragment stage.
    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency for the surface (a hint).
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: batch_limits(wgpu::Limits::default()),
            desired_maximum_frame_latency: 2,
        }
    }
}

/// Raises `base` so one bind group can hold a full texture slot table.
pub fn batch_limits(base: wgpu::Limits) -> wgpu::Limits {
    let slots = MAX_TEXTURE_SLOTS as u32;
    wgpu::Limits {
        max_sampled_textures_per_shader_stage: base.max_sampled_textures_per_shader_stage.max(slots),
        // Textures 0..32 plus the sampler.
        max_bindings_per_bind_group: base.max_bindings_per_bind_group.max(slots + 1),
        ..base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits_fit_slot_table() {
        let limits = GpuInit::default().required_limits;
        assert!(limits.max_sampled_textures_per_shader_stage >= MAX_TEXTURE_SLOTS as u32);
        assert!(limits.max_bindings_per_bind_group > MAX_TEXTURE_SLOTS as u32);
    }

    #[test]
    fn batch_limits_never_lower_a_limit() {
        let base = wgpu::Limits {
            max_sampled_textures_per_shader_stage: 128,
            ..wgpu::Limits::default()
        };
        assert_eq!(batch_limits(base).max_sampled_textures_per_shader_stage, 128);
    }
}
