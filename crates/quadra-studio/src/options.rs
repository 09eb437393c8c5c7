use std::path::PathBuf;

use clap::Parser;

/// Quads per batch when `--capacity` is not given.
pub const DEFAULT_CAPACITY: usize = 100;

/// quadra studio: interactive demo of the batch renderer.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "quadra-studio", version, about)]
pub struct StudioOptions {
    /// Dual-section shader file; the built-in batch shader when absent.
    #[arg(long, value_name = "PATH")]
    pub shader: Option<PathBuf>,

    /// Quads per batch before an automatic flush.
    #[arg(long, value_name = "N", default_value_t = DEFAULT_CAPACITY)]
    pub capacity: usize,

    /// Up to two sprite images; procedural textures fill the rest.
    #[arg(value_name = "IMAGE", num_args = 0..=2)]
    pub images: Vec<PathBuf>,
}

impl Default for StudioOptions {
    fn default() -> Self {
        Self {
            shader: None,
            capacity: DEFAULT_CAPACITY,
            images: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<StudioOptions, clap::Error> {
        StudioOptions::try_parse_from(std::iter::once("quadra-studio").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_without_arguments() {
        assert_eq!(parse(&[]).unwrap(), StudioOptions::default());
    }

    #[test]
    fn reads_all_options() {
        let o = parse(&["--shader", "a.wgsl", "--capacity", "64", "one.png", "two.png"]).unwrap();
        assert_eq!(o.shader, Some(PathBuf::from("a.wgsl")));
        assert_eq!(o.capacity, 64);
        assert_eq!(o.images, vec![PathBuf::from("one.png"), PathBuf::from("two.png")]);
    }

    #[test]
    fn options_may_follow_images() {
        let o = parse(&["one.png", "--capacity", "8"]).unwrap();
        assert_eq!(o.capacity, 8);
        assert_eq!(o.images, vec![PathBuf::from("one.png")]);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse(&["--capacity", "many"]).is_err());
        assert!(parse(&["--shader"]).is_err());
        assert!(parse(&["--fast"]).is_err());
        assert!(parse(&["a.png", "b.png", "c.png"]).is_err());
    }
}
