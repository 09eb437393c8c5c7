/// Filtering and wrapping for batch textures.
///
/// Defaults: linear minification, nearest magnification, repeat on both axes.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SamplerConfig {
    pub min_filter: wgpu::FilterMode,
    pub mag_filter: wgpu::FilterMode,
    pub address_mode: wgpu::AddressMode,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            min_filter: wgpu::FilterMode::Linear,
            mag_filter: wgpu::FilterMode::Nearest,
            address_mode: wgpu::AddressMode::Repeat,
        }
    }
}

impl SamplerConfig {
    pub fn create_sampler(&self, device: &wgpu::Device) -> wgpu::Sampler {
        device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("quadra batch sampler"),
            address_mode_u: self.address_mode,
            address_mode_v: self.address_mode,
            address_mode_w: self.address_mode,
            mag_filter: self.mag_filter,
            min_filter: self.min_filter,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        })
    }
}
