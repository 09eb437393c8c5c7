//! Stage compilation, linking and validation.
//!
//! Runs entirely on the CPU through naga, the WGSL front end wgpu itself uses.
//! The link rules mirror what pipeline creation checks, so a linked program
//! is expected to build; [`super::load_shader`] still guards the GPU side.

use naga::valid::{Capabilities, ValidationFlags, Validator};
use naga::{
    AddressSpace, Binding, Handle, ImageClass, ImageDimension, Interpolation, Module, Sampling,
    ScalarKind, Type, TypeInner,
};

use super::{ShaderError, ShaderSource, ShaderStage};
use crate::batch::{Vertex, MAX_TEXTURE_SLOTS, VERTEX_ATTRIBUTE_COUNT};

/// Bind group holding the per-program uniform block.
pub(crate) const GLOBALS_GROUP: u32 = 0;
/// Bind group holding the batch textures and sampler.
pub(crate) const TEXTURE_GROUP: u32 = 1;
/// Sampler binding inside [`TEXTURE_GROUP`]; textures occupy `0..SAMPLER_BINDING`.
pub(crate) const SAMPLER_BINDING: u32 = MAX_TEXTURE_SLOTS as u32;

/// A successfully compiled stage.
#[derive(Debug, Clone)]
pub struct CompiledStage {
    pub stage: ShaderStage,
    pub source: String,
    pub module: Module,
}

/// Both stages after a successful link.
#[derive(Debug, Clone)]
pub struct LinkedStages {
    pub vertex: CompiledStage,
    pub fragment: CompiledStage,
}

/// Outcome of the CPU half of shader loading.
#[derive(Debug, Clone, Default)]
pub struct ProgramBuild {
    /// Present only when both stages compiled and linked.
    pub linked: Option<LinkedStages>,
    pub diagnostics: Vec<ShaderError>,
}

impl ProgramBuild {
    pub fn is_linked(&self) -> bool {
        self.linked.is_some()
    }
}

/// Parses and validates one stage's WGSL.
pub fn compile_stage(stage: ShaderStage, source: &str) -> Result<CompiledStage, ShaderError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| ShaderError::Compile {
        stage,
        log: e.emit_to_string(source),
    })?;

    Validator::new(ValidationFlags::all(), Capabilities::default())
        .validate(&module)
        .map_err(|e| ShaderError::Compile {
            stage,
            log: e.emit_to_string(source),
        })?;

    Ok(CompiledStage {
        stage,
        source: source.to_owned(),
        module,
    })
}

/// Checks that two compiled stages form a program the batch renderer can drive.
///
/// Interface types follow pipeline creation's rules: a vertex input matches
/// its attribute's scalar kind, a fragment input is a subtype of the vertex
/// output at the same location with the same interpolation, and colour
/// output 0 is a `vec4<f32>`.
pub fn link(vertex: CompiledStage, fragment: CompiledStage) -> Result<LinkedStages, ShaderError> {
    let vs = entry_point(&vertex)?;
    let fs = entry_point(&fragment)?;

    let attributes = Vertex::layout().attributes;
    for input in arguments_io(&vertex.module, vs) {
        let Some(attribute) = attributes.iter().find(|a| a.shader_location == input.location) else {
            return Err(ShaderError::Link(format!(
                "vertex input location {} has no matching vertex attribute (0..{VERTEX_ATTRIBUTE_COUNT})",
                input.location
            )));
        };
        let expected = attribute_shape(attribute.format);
        if input.shape.map(|s| s.kind) != expected.map(|s| s.kind) {
            return Err(ShaderError::Link(format!(
                "vertex input location {} is {}, but the attribute is {:?}",
                input.location,
                describe(input.shape),
                attribute.format
            )));
        }
    }

    let vs_outputs = result_io(&vertex.module, vs);
    for input in arguments_io(&fragment.module, fs) {
        let Some(output) = vs_outputs.iter().find(|o| o.location == input.location) else {
            return Err(ShaderError::Link(format!(
                "fragment input location {} is not written by the vertex stage",
                input.location
            )));
        };
        let fits = match (input.shape, output.shape) {
            (Some(i), Some(o)) => i.fits_in(o),
            _ => false,
        };
        if !fits {
            return Err(ShaderError::Link(format!(
                "fragment input location {} is {}, but the vertex stage writes {}",
                input.location,
                describe(input.shape),
                describe(output.shape)
            )));
        }
        if (input.interpolation, input.sampling) != (output.interpolation, output.sampling) {
            return Err(ShaderError::Link(format!(
                "fragment input location {} is interpolated differently from the vertex output",
                input.location
            )));
        }
    }

    let colour = COLOUR_TARGET_SHAPE;
    if let Some(target) = result_io(&fragment.module, fs).iter().find(|o| o.location == 0) {
        if !target.shape.is_some_and(|s| colour.fits_in(s)) {
            return Err(ShaderError::Link(format!(
                "fragment output location 0 is {}, but the colour target needs {}",
                describe(target.shape),
                describe(Some(colour))
            )));
        }
    }

    check_resources(&vertex, |group, binding, space, _| {
        group == GLOBALS_GROUP && binding == 0 && matches!(space, AddressSpace::Uniform)
    })?;
    check_resources(&fragment, |group, binding, _, ty| {
        group == TEXTURE_GROUP
            && match binding {
                SAMPLER_BINDING => matches!(ty, TypeInner::Sampler { comparison: false }),
                b if b < SAMPLER_BINDING => matches!(
                    ty,
                    TypeInner::Image {
                        dim: ImageDimension::D2,
                        arrayed: false,
                        class: ImageClass::Sampled {
                            kind: ScalarKind::Float,
                            multi: false,
                        },
                    }
                ),
                _ => false,
            }
    })?;

    Ok(LinkedStages { vertex, fragment })
}

/// Debug-build sanity pass over a linked program.
///
/// Failures here are reported but the program stays usable.
pub fn validate(linked: &LinkedStages) -> Result<(), ShaderError> {
    let vs = entry_point(&linked.vertex)?;
    let inputs: Vec<u32> = arguments_io(&linked.vertex.module, vs)
        .iter()
        .map(|io| io.location)
        .collect();
    let unused: Vec<String> = (0..VERTEX_ATTRIBUTE_COUNT)
        .filter(|l| !inputs.contains(l))
        .map(|l| l.to_string())
        .collect();
    if !unused.is_empty() {
        return Err(ShaderError::Validate(format!(
            "vertex stage ignores attribute location(s) {}",
            unused.join(", ")
        )));
    }

    let fs = entry_point(&linked.fragment)?;
    if !result_io(&linked.fragment.module, fs).iter().any(|io| io.location == 0) {
        return Err(ShaderError::Validate(
            "fragment stage does not write colour target 0".to_owned(),
        ));
    }

    Ok(())
}

/// Compiles, links and (in debug builds) validates both sections.
///
/// Every failure is logged and recorded in the returned diagnostics.
pub fn compile_and_link(source: &ShaderSource) -> ProgramBuild {
    let mut diagnostics = Vec::new();

    let vertex = compile_stage(ShaderStage::Vertex, &source.vertex);
    let fragment = compile_stage(ShaderStage::Fragment, &source.fragment);

    let (vertex, fragment) = match (vertex, fragment) {
        (Ok(v), Ok(f)) => (v, f),
        (v, f) => {
            diagnostics.extend(v.err());
            diagnostics.extend(f.err());
            for e in &diagnostics {
                log::error!("{e}");
            }
            return ProgramBuild { linked: None, diagnostics };
        }
    };

    let linked = match link(vertex, fragment) {
        Ok(linked) => linked,
        Err(e) => {
            log::error!("{e}");
            diagnostics.push(e);
            return ProgramBuild { linked: None, diagnostics };
        }
    };

    if cfg!(debug_assertions) {
        if let Err(e) = validate(&linked) {
            log::error!("{e}");
            diagnostics.push(e);
        }
    }

    ProgramBuild {
        linked: Some(linked),
        diagnostics,
    }
}

fn entry_point(stage: &CompiledStage) -> Result<&naga::EntryPoint, ShaderError> {
    let name = stage.stage.entry_point();
    stage
        .module
        .entry_points
        .iter()
        .find(|ep| ep.name == name && ep.stage == stage.stage.to_naga())
        .ok_or_else(|| ShaderError::Link(format!("{} stage has no `{name}` entry point", stage.stage)))
}

/// Scalar kind, byte width and component count of a stage interface value.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
struct IoShape {
    kind: ScalarKind,
    width: u8,
    components: u8,
}

/// What every supported surface format reads from colour output 0.
const COLOUR_TARGET_SHAPE: IoShape = IoShape {
    kind: ScalarKind::Float,
    width: 4,
    components: 4,
};

impl IoShape {
    fn of(inner: &TypeInner) -> Option<Self> {
        match *inner {
            TypeInner::Scalar(scalar) => Some(Self {
                kind: scalar.kind,
                width: scalar.width,
                components: 1,
            }),
            TypeInner::Vector { size, scalar } => Some(Self {
                kind: scalar.kind,
                width: scalar.width,
                components: size as u8,
            }),
            _ => None,
        }
    }

    /// Whether a value of this shape can be read from one of `other`'s.
    fn fits_in(self, other: IoShape) -> bool {
        self.kind == other.kind && self.width <= other.width && self.components <= other.components
    }
}

impl std::fmt::Display for IoShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let scalar = match self.kind {
            ScalarKind::Float => "f",
            ScalarKind::Sint => "i",
            ScalarKind::Uint => "u",
            _ => return write!(f, "{:?}", self.kind),
        };
        let bits = u32::from(self.width) * 8;
        match self.components {
            1 => write!(f, "{scalar}{bits}"),
            n => write!(f, "vec{n}<{scalar}{bits}>"),
        }
    }
}

fn describe(shape: Option<IoShape>) -> String {
    shape.map_or_else(|| "not a scalar or vector".to_owned(), |s| s.to_string())
}

/// Shader-side shape of a vertex attribute format.
fn attribute_shape(format: wgpu::VertexFormat) -> Option<IoShape> {
    use wgpu::VertexFormat as F;
    let (kind, components) = match format {
        F::Float32 => (ScalarKind::Float, 1),
        F::Float32x2 => (ScalarKind::Float, 2),
        F::Float32x3 => (ScalarKind::Float, 3),
        F::Float32x4 => (ScalarKind::Float, 4),
        F::Sint32 => (ScalarKind::Sint, 1),
        F::Sint32x2 => (ScalarKind::Sint, 2),
        F::Sint32x3 => (ScalarKind::Sint, 3),
        F::Sint32x4 => (ScalarKind::Sint, 4),
        F::Uint32 => (ScalarKind::Uint, 1),
        F::Uint32x2 => (ScalarKind::Uint, 2),
        F::Uint32x3 => (ScalarKind::Uint, 3),
        F::Uint32x4 => (ScalarKind::Uint, 4),
        _ => return None,
    };
    Some(IoShape {
        kind,
        width: 4,
        components,
    })
}

/// One user-defined `@location` of an entry point.
#[derive(Debug, Copy, Clone)]
struct IoVar {
    location: u32,
    shape: Option<IoShape>,
    interpolation: Option<Interpolation>,
    sampling: Option<Sampling>,
}

fn arguments_io(module: &Module, ep: &naga::EntryPoint) -> Vec<IoVar> {
    let mut out = Vec::new();
    for arg in &ep.function.arguments {
        collect_io(module, arg.ty, arg.binding.as_ref(), &mut out);
    }
    out
}

fn result_io(module: &Module, ep: &naga::EntryPoint) -> Vec<IoVar> {
    let mut out = Vec::new();
    if let Some(result) = &ep.function.result {
        collect_io(module, result.ty, result.binding.as_ref(), &mut out);
    }
    out
}

/// Collects user-defined `@location`s, looking through struct members.
fn collect_io(module: &Module, ty: Handle<Type>, binding: Option<&Binding>, out: &mut Vec<IoVar>) {
    match binding {
        Some(&Binding::Location {
            location,
            interpolation,
            sampling,
            ..
        }) => out.push(IoVar {
            location,
            shape: IoShape::of(&module.types[ty].inner),
            interpolation,
            sampling,
        }),
        Some(Binding::BuiltIn(_)) => {}
        None => {
            if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for m in members {
                    collect_io(module, m.ty, m.binding.as_ref(), out);
                }
            }
        }
    }
}

fn check_resources(
    stage: &CompiledStage,
    allowed: impl Fn(u32, u32, AddressSpace, &TypeInner) -> bool,
) -> Result<(), ShaderError> {
    for (_, var) in stage.module.global_variables.iter() {
        let Some(rb) = &var.binding else { continue };
        let ty = &stage.module.types[var.ty].inner;
        if !allowed(rb.group, rb.binding, var.space, ty) {
            return Err(ShaderError::Link(format!(
                "{} stage resource `{}` at @group({}) @binding({}) does not match the batch layout",
                stage.stage,
                var.name.as_deref().unwrap_or("<unnamed>"),
                rb.group,
                rb.binding,
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VS: &str = r#"
struct Globals { view_projection: mat4x4<f32>, model: mat4x4<f32> }
@group(0) @binding(0) var<uniform> globals: Globals;

struct VertexIn {
    @location(0) position: vec4<f32>,
    @location(1) color: vec4<f32>,
    @location(2) uv: vec2<f32>,
    @location(3) slot: i32,
}
struct VertexOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) color: vec4<f32>,
    @location(1) uv: vec2<f32>,
    @location(2) @interpolate(flat) slot: i32,
}

@vertex
fn vs_main(v: VertexIn) -> VertexOut {
    var out: VertexOut;
    out.clip = globals.view_projection * globals.model * v.position;
    out.color = v.color;
    out.uv = v.uv;
    out.slot = v.slot;
    return out;
}
"#;

    const FS: &str = r#"
@group(1) @binding(0) var t0: texture_2d<f32>;
@group(1) @binding(32) var samp: sampler;

struct FragIn {
    @location(0) color: vec4<f32>,
    @location(1) uv: vec2<f32>,
    @location(2) @interpolate(flat) slot: i32,
}

@fragment
fn fs_main(f: FragIn) -> @location(0) vec4<f32> {
    if f.slot < 0 {
        return f.color;
    }
    return f.color * textureSampleLevel(t0, samp, f.uv, 0.0);
}
"#;

    fn source(vertex: &str, fragment: &str) -> ShaderSource {
        ShaderSource {
            vertex: vertex.to_owned(),
            fragment: fragment.to_owned(),
        }
    }

    #[test]
    fn good_program_links_without_diagnostics() {
        let build = compile_and_link(&source(VS, FS));
        assert!(build.is_linked());
        assert!(build.diagnostics.is_empty(), "{:?}", build.diagnostics);
    }

    #[test]
    fn built_in_shader_is_clean() {
        let source = ShaderSource::parse(crate::shader::BATCH_SHADER).unwrap();
        let build = compile_and_link(&source);
        assert!(build.is_linked());
        assert!(build.diagnostics.is_empty(), "{:?}", build.diagnostics);
        assert_eq!(validate(build.linked.as_ref().unwrap()), Ok(()));
    }

    #[test]
    fn syntax_error_is_a_compile_error_for_that_stage() {
        let build = compile_and_link(&source(VS, "fn fs_main( {"));
        assert!(!build.is_linked());
        assert_eq!(build.diagnostics.len(), 1);
        assert!(matches!(
            &build.diagnostics[0],
            ShaderError::Compile { stage: ShaderStage::Fragment, log } if !log.is_empty()
        ));
    }

    #[test]
    fn both_stages_report_independently() {
        let build = compile_and_link(&source("nonsense", "more nonsense"));
        let stages: Vec<_> = build
            .diagnostics
            .iter()
            .filter_map(|e| match e {
                ShaderError::Compile { stage, .. } => Some(*stage),
                _ => None,
            })
            .collect();
        assert_eq!(stages, vec![ShaderStage::Vertex, ShaderStage::Fragment]);
    }

    #[test]
    fn type_error_is_caught_by_validation() {
        let bad = "@fragment fn fs_main() -> @location(0) vec4<f32> { let x: f32 = true; return vec4<f32>(x); }";
        let err = compile_stage(ShaderStage::Fragment, bad).unwrap_err();
        assert!(matches!(err, ShaderError::Compile { .. }));
    }

    #[test]
    fn missing_entry_point_fails_link() {
        let fs = FS.replace("fs_main", "main");
        let build = compile_and_link(&source(VS, &fs));
        assert!(!build.is_linked());
        assert!(matches!(&build.diagnostics[..], [ShaderError::Link(m)] if m.contains("fs_main")));
    }

    #[test]
    fn unmatched_fragment_input_fails_link() {
        let fs = FS.replace("@location(1) uv", "@location(5) uv");
        let build = compile_and_link(&source(VS, &fs));
        assert!(matches!(&build.diagnostics[..], [ShaderError::Link(m)] if m.contains("location 5")));
    }

    #[test]
    fn out_of_range_vertex_attribute_fails_link() {
        let vs = VS.replace("@location(3) slot", "@location(7) slot");
        let build = compile_and_link(&source(&vs, FS));
        assert!(matches!(&build.diagnostics[..], [ShaderError::Link(_)]));
    }

    #[test]
    fn resource_outside_layout_fails_link() {
        let fs = FS.replace("@group(1) @binding(0) var t0", "@group(2) @binding(0) var t0");
        let build = compile_and_link(&source(VS, &fs));
        assert!(matches!(&build.diagnostics[..], [ShaderError::Link(m)] if m.contains("t0")));
    }

    #[test]
    fn wrong_texture_kind_fails_link() {
        let fs = FS
            .replace("var t0: texture_2d<f32>", "var t0: texture_2d<u32>")
            .replace("f.color * textureSampleLevel(t0, samp, f.uv, 0.0)", "f.color");
        let build = compile_and_link(&source(VS, &fs));
        assert!(matches!(&build.diagnostics[..], [ShaderError::Link(_)]));
    }

    fn link_error(build: &ProgramBuild) -> &str {
        match &build.diagnostics[..] {
            [ShaderError::Link(m)] if !build.is_linked() => m,
            other => panic!("expected a single link error, got {other:?}"),
        }
    }

    #[test]
    fn vertex_input_kind_must_match_attribute() {
        let vs = VS
            .replace("@location(3) slot: i32", "@location(3) slot: f32")
            .replace("out.slot = v.slot;", "out.slot = i32(v.slot);");
        let build = compile_and_link(&source(&vs, FS));
        let m = link_error(&build);
        assert!(m.contains("location 3") && m.contains("Sint32"), "{m}");
    }

    #[test]
    fn fragment_input_wider_than_vertex_output_fails_link() {
        let fs = FS
            .replace("@location(1) uv: vec2<f32>", "@location(1) uv: vec4<f32>")
            .replace("f.uv, 0.0", "f.uv.xy, 0.0");
        let build = compile_and_link(&source(VS, &fs));
        let m = link_error(&build);
        assert!(m.contains("vec4<f32>") && m.contains("vec2<f32>"), "{m}");
    }

    #[test]
    fn fragment_input_kind_must_match_vertex_output() {
        let fs = FS.replace(
            "@location(2) @interpolate(flat) slot: i32",
            "@location(2) @interpolate(flat) slot: u32",
        );
        let build = compile_and_link(&source(VS, &fs));
        assert!(link_error(&build).contains("location 2"));
    }

    #[test]
    fn fragment_input_may_read_fewer_components() {
        let fs = FS
            .replace("@location(0) color: vec4<f32>", "@location(0) color: vec3<f32>")
            .replace("return f.color;", "return vec4<f32>(f.color, 1.0);")
            .replace(
                "return f.color * textureSampleLevel",
                "return vec4<f32>(f.color, 1.0) * textureSampleLevel",
            );
        let build = compile_and_link(&source(VS, &fs));
        assert!(build.is_linked(), "{:?}", build.diagnostics);
    }

    #[test]
    fn interpolation_mismatch_fails_link() {
        let fs = FS.replace("@location(1) uv: vec2<f32>", "@location(1) @interpolate(linear) uv: vec2<f32>");
        let build = compile_and_link(&source(VS, &fs));
        assert!(link_error(&build).contains("interpolated"));
    }

    #[test]
    fn colour_output_must_be_vec4_float() {
        let fs = "@fragment fn fs_main() -> @location(0) vec2<f32> { return vec2<f32>(1.0); }";
        let build = compile_and_link(&source(VS, fs));
        assert!(link_error(&build).contains("colour target"));
    }

    #[test]
    fn built_in_shader_with_retyped_interface_fails_link() {
        let text = crate::shader::BATCH_SHADER
            .replace("@location(3) slot: i32", "@location(3) slot: f32")
            .replace("out.slot = v.slot;", "out.slot = i32(v.slot);");
        let build = compile_and_link(&ShaderSource::parse(&text).unwrap());
        assert!(!build.is_linked());

        let text = crate::shader::BATCH_SHADER
            .replace(
                "struct FragmentIn {\n    @location(0) color: vec4<f32>,\n    @location(1) tex_coords: vec2<f32>,",
                "struct FragmentIn {\n    @location(0) color: vec4<f32>,\n    @location(1) tex_coords: vec4<f32>,",
            )
            .replace("sample_slot(f.slot, f.tex_coords)", "sample_slot(f.slot, f.tex_coords.xy)");
        assert_ne!(text, crate::shader::BATCH_SHADER);
        let build = compile_and_link(&ShaderSource::parse(&text).unwrap());
        assert!(!build.is_linked());
    }

    #[test]
    fn validation_flags_unused_attribute() {
        let vs = VS.replace("out.uv = v.uv;", "out.uv = vec2<f32>(0.0);");
        // Declared inputs count as consumed, so drop the member itself.
        let vs = vs.replace("    @location(2) uv: vec2<f32>,\n    @location(3) slot: i32,\n}\nstruct VertexOut", "    @location(3) slot: i32,\n}\nstruct VertexOut");
        let vertex = compile_stage(ShaderStage::Vertex, &vs).unwrap();
        let fragment = compile_stage(ShaderStage::Fragment, FS).unwrap();
        let linked = link(vertex, fragment).unwrap();
        assert!(matches!(validate(&linked), Err(ShaderError::Validate(m)) if m.contains('2')));
    }

    #[test]
    fn validation_accepts_complete_program() {
        let vertex = compile_stage(ShaderStage::Vertex, VS).unwrap();
        let fragment = compile_stage(ShaderStage::Fragment, FS).unwrap();
        assert_eq!(validate(&link(vertex, fragment).unwrap()), Ok(()));
    }
}
