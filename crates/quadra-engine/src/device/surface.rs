/// High-level response after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Fatal error (commonly OOM); terminate gracefully.
    Fatal,
}

impl SurfaceErrorAction {
    pub(crate) fn for_error(err: &wgpu::SurfaceError) -> Self {
        match err {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => Self::Reconfigured,
            wgpu::SurfaceError::OutOfMemory => Self::Fatal,
            wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => Self::SkipFrame,
        }
    }
}

pub(crate) fn choose_surface_format(
    formats: &[wgpu::TextureFormat],
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    if prefer_srgb {
        let preferred = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        if let Some(f) = preferred.into_iter().find(|f| formats.contains(f)) {
            return Some(f);
        }
    }
    formats.first().copied()
}

pub(crate) fn choose_alpha_mode(
    supported: &[wgpu::CompositeAlphaMode],
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| supported.contains(m))
        .or_else(|| supported.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}
