use std::fmt;

/// Shader stage a program error refers to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn naga(self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Failure to build a [`ShaderProgram`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramError {
    /// WGSL failed to parse or validate.
    Compile {
        stage: ShaderStage,
        message: String,
    },
    /// The module has no entry point for its stage.
    MissingEntryPoint { stage: ShaderStage },
    /// The vertex stage reads a location the vertex buffers do not provide.
    UnboundVertexInput { location: u32 },
    /// The fragment stage reads a location the vertex stage does not write.
    UnlinkedVarying { location: u32 },
    /// The fragment outputs do not cover exactly the color target slots.
    OutputMismatch { expected: Vec<u32>, found: Vec<u32> },
    /// The device rejected the modules or the pipeline.
    Pipeline { message: String },
}

impl fmt::Display for ProgramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compile { stage, message } => {
                write!(f, "{stage} shader failed to compile:\n{message}")
            }
            Self::MissingEntryPoint { stage } => write!(f, "no {stage} entry point found"),
            Self::UnboundVertexInput { location } => {
                write!(f, "link failed: vertex input @location({location}) has no vertex attribute")
            }
            Self::UnlinkedVarying { location } => write!(
                f,
                "link failed: fragment input @location({location}) \
                 is not written by the vertex stage"
            ),
            Self::OutputMismatch { expected, found } => write!(
                f,
                "link failed: fragment writes locations {found:?}, color targets need {expected:?}"
            ),
            Self::Pipeline { message } => write!(f, "pipeline creation failed: {message}"),
        }
    }
}

impl std::error::Error for ProgramError {}

/// Inputs for [`ShaderProgram::build`].
pub struct ProgramDesc<'a> {
    pub label: &'a str,
    pub vertex_source: &'a str,
    pub fragment_source: &'a str,
    pub vertex_buffers: &'a [wgpu::VertexBufferLayout<'a>],
    /// One entry per color attachment, in slot order.
    pub color_formats: &'a [wgpu::TextureFormat],
}

/// Entry points chosen for a linked vertex + fragment pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedStages {
    pub vertex_entry: String,
    pub fragment_entry: String,
}

/// A compiled and linked vertex + fragment pair, ready to draw.
pub struct ShaderProgram {
    pipeline: wgpu::RenderPipeline,
}

impl ShaderProgram {
    /// Compiles both stages, checks their interface, and creates the pipeline.
    pub fn build(device: &wgpu::Device, desc: &ProgramDesc<'_>) -> Result<Self, ProgramError> {
        let vertex = compile(ShaderStage::Vertex, desc.vertex_source)?;
        let fragment = compile(ShaderStage::Fragment, desc.fragment_source)?;

        let provided: Vec<u32> = desc
            .vertex_buffers
            .iter()
            .flat_map(|b| b.attributes.iter().map(|a| a.shader_location))
            .collect();
        let stages = link(&vertex, &fragment, &provided, desc.color_formats.len())?;

        // naga accepted the stages with every capability enabled; the device may not.
        let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
        let vs_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("{} vertex shader", desc.label)),
            source: wgpu::ShaderSource::Wgsl(desc.vertex_source.into()),
        });
        let fs_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("{} fragment shader", desc.label)),
            source: wgpu::ShaderSource::Wgsl(desc.fragment_source.into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{} pipeline layout", desc.label)),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let targets: Vec<Option<wgpu::ColorTargetState>> = desc
            .color_formats
            .iter()
            .map(|&format| {
                Some(wgpu::ColorTargetState {
                    format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })
            })
            .collect();

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&format!("{} pipeline", desc.label)),
            layout: Some(&layout),

            vertex: wgpu::VertexState {
                module: &vs_module,
                entry_point: Some(stages.vertex_entry.as_str()),
                compilation_options: Default::default(),
                buffers: desc.vertex_buffers,
            },

            fragment: Some(wgpu::FragmentState {
                module: &fs_module,
                entry_point: Some(stages.fragment_entry.as_str()),
                compilation_options: Default::default(),
                targets: &targets,
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
            return Err(ProgramError::Pipeline {
                message: err.to_string(),
            });
        }

        log::debug!(
            "built program '{}' ({} -> {}, {} color targets)",
            desc.label,
            stages.vertex_entry,
            stages.fragment_entry,
            desc.color_formats.len()
        );

        Ok(Self { pipeline })
    }

    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }
}

/// Parses and validates one WGSL stage.
pub fn compile(stage: ShaderStage, source: &str) -> Result<naga::Module, ProgramError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| ProgramError::Compile {
        stage,
        message: e.emit_to_string(source),
    })?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    )
    .validate(&module)
    .map_err(|e| ProgramError::Compile {
        stage,
        message: e.emit_to_string(source),
    })?;

    Ok(module)
}

/// Checks the interface between two compiled stages.
///
/// - the vertex stage may only read locations listed in `vertex_attributes`
/// - the fragment stage may only read locations the vertex stage writes
/// - the fragment stage must write exactly locations `0..color_targets`
pub fn link(
    vertex: &naga::Module,
    fragment: &naga::Module,
    vertex_attributes: &[u32],
    color_targets: usize,
) -> Result<LinkedStages, ProgramError> {
    let vs = entry_point(vertex, ShaderStage::Vertex)?;
    let fs = entry_point(fragment, ShaderStage::Fragment)?;

    for location in input_locations(vertex, vs) {
        if !vertex_attributes.contains(&location) {
            return Err(ProgramError::UnboundVertexInput { location });
        }
    }

    let varyings = output_locations(vertex, vs);
    for location in input_locations(fragment, fs) {
        if !varyings.contains(&location) {
            return Err(ProgramError::UnlinkedVarying { location });
        }
    }

    let found = output_locations(fragment, fs);
    let expected: Vec<u32> = (0..color_targets as u32).collect();
    if found != expected {
        return Err(ProgramError::OutputMismatch { expected, found });
    }

    Ok(LinkedStages {
        vertex_entry: vs.name.clone(),
        fragment_entry: fs.name.clone(),
    })
}

fn entry_point(
    module: &naga::Module,
    stage: ShaderStage,
) -> Result<&naga::EntryPoint, ProgramError> {
    module
        .entry_points
        .iter()
        .find(|ep| ep.stage == stage.naga())
        .ok_or(ProgramError::MissingEntryPoint { stage })
}

fn input_locations(module: &naga::Module, ep: &naga::EntryPoint) -> Vec<u32> {
    let mut out = Vec::new();
    for arg in &ep.function.arguments {
        collect_locations(module, arg.ty, arg.binding.as_ref(), &mut out);
    }
    out.sort_unstable();
    out
}

fn output_locations(module: &naga::Module, ep: &naga::EntryPoint) -> Vec<u32> {
    let mut out = Vec::new();
    if let Some(result) = &ep.function.result {
        collect_locations(module, result.ty, result.binding.as_ref(), &mut out);
    }
    out.sort_unstable();
    out
}

// Struct-typed IO carries its bindings on the members.
fn collect_locations(
    module: &naga::Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&naga::Binding>,
    out: &mut Vec<u32>,
) {
    match binding {
        Some(naga::Binding::Location { location, .. }) => out.push(*location),
        Some(_) => {}
        None => {
            if let naga::TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for m in members {
                    collect_locations(module, m.ty, m.binding.as_ref(), out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VS: &str = include_str!("shaders/mrt_vertex.wgsl");
    const FS: &str = include_str!("shaders/mrt_fragment.wgsl");

    fn modules(vs: &str, fs: &str) -> (naga::Module, naga::Module) {
        (
            compile(ShaderStage::Vertex, vs).expect("vertex compiles"),
            compile(ShaderStage::Fragment, fs).expect("fragment compiles"),
        )
    }

    #[test]
    fn mrt_pair_links_against_four_targets() {
        let (vs, fs) = modules(VS, FS);
        let stages = link(&vs, &fs, &[0], 4).expect("links");
        assert_eq!(stages.vertex_entry, "vs_main");
        assert_eq!(stages.fragment_entry, "fs_main");
    }

    #[test]
    fn syntax_error_is_a_compile_error() {
        let err = compile(ShaderStage::Fragment, "@fragment fn fs_main( -> {").unwrap_err();
        assert!(matches!(err, ProgramError::Compile { stage: ShaderStage::Fragment, .. }));
    }

    #[test]
    fn type_error_is_a_compile_error() {
        let src = "@vertex fn vs_main() -> @builtin(position) vec4<f32> { return 1.0; }";
        let err = compile(ShaderStage::Vertex, src).unwrap_err();
        assert!(matches!(err, ProgramError::Compile { stage: ShaderStage::Vertex, .. }));
    }

    #[test]
    fn output_count_must_match_targets() {
        let (vs, fs) = modules(VS, FS);
        let err = link(&vs, &fs, &[0], 3).unwrap_err();
        assert_eq!(
            err,
            ProgramError::OutputMismatch {
                expected: vec![0, 1, 2],
                found: vec![0, 1, 2, 3],
            }
        );
    }

    #[test]
    fn gap_in_output_locations_fails_to_link() {
        let fs = "struct O { @location(0) a: vec4<f32>, @location(2) b: vec4<f32>, };
                  @fragment fn fs_main() -> O { return O(vec4<f32>(1.0), vec4<f32>(1.0)); }";
        let (vs, fs) = modules(VS, fs);
        let err = link(&vs, &fs, &[0], 2).unwrap_err();
        assert!(matches!(err, ProgramError::OutputMismatch { .. }));
    }

    #[test]
    fn missing_vertex_attribute_fails_to_link() {
        let (vs, fs) = modules(VS, FS);
        assert_eq!(
            link(&vs, &fs, &[1], 4).unwrap_err(),
            ProgramError::UnboundVertexInput { location: 0 }
        );
    }

    #[test]
    fn unwritten_varying_fails_to_link() {
        let fs = "@fragment fn fs_main(@location(3) c: vec4<f32>) -> @location(0) vec4<f32> {
                      return c;
                  }";
        let (vs, fs) = modules(VS, fs);
        assert_eq!(
            link(&vs, &fs, &[0], 1).unwrap_err(),
            ProgramError::UnlinkedVarying { location: 3 }
        );
    }

    #[test]
    fn stage_without_entry_point_fails_to_link() {
        // Both sources are vertex shaders, so the fragment module has no fragment entry.
        let (vs, fs) = modules(VS, VS);
        assert_eq!(
            link(&vs, &fs, &[0], 4).unwrap_err(),
            ProgramError::MissingEntryPoint {
                stage: ShaderStage::Fragment
            }
        );
    }
}
