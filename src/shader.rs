use std::fmt;
use std::path::Path;

use crate::reflect::{reflect_compute_layouts, reflect_layouts};
use crate::{process_file, Defines, FileIncludeProvider, IncludeProvider, Preprocessor};
use crate::{PrepperError, ShaderLayout};

/// Pipeline stage of a shader, decided by its file extension
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Geometry,
    TessellationControl,
    TessellationEvaluation,
    Compute,
}

impl ShaderStage {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "vert" => Some(ShaderStage::Vertex),
            "frag" => Some(ShaderStage::Fragment),
            "geom" => Some(ShaderStage::Geometry),
            "tesc" => Some(ShaderStage::TessellationControl),
            "tese" => Some(ShaderStage::TessellationEvaluation),
            "comp" => Some(ShaderStage::Compute),
            _ => None,
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        Path::new(path)
            .extension()
            .and_then(|extension| extension.to_str())
            .and_then(Self::from_extension)
    }

    pub fn name(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "Vertex",
            ShaderStage::Fragment => "Fragment",
            ShaderStage::Geometry => "Geometry",
            ShaderStage::TessellationControl => "TessellationControl",
            ShaderStage::TessellationEvaluation => "TessellationEvaluation",
            ShaderStage::Compute => "Compute",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One preprocessed and reflected shader stage.
#[derive(Clone, Debug)]
pub struct ShaderSource {
    file: String,
    src: String,
    stage: Option<ShaderStage>,
    defines: Defines,
    layouts: Vec<ShaderLayout>,
    work_groups: [u32; 3],
}

impl ShaderSource {
    /// Read, preprocess and reflect the shader at `path`. `args` may carry
    /// `-D` predefines, as passed to the shader compiler.
    pub fn parse(path: &str, args: &str) -> Result<Self, PrepperError> {
        Self::parse_with_provider(path, args, &mut FileIncludeProvider)
    }

    /// Like `parse`, reading the shader and its includes through `include_provider`.
    pub fn parse_with_provider(
        path: &str,
        args: &str,
        include_provider: &mut dyn IncludeProvider,
    ) -> Result<Self, PrepperError> {
        let stage = ShaderStage::from_path(path);
        if stage.is_none() {
            log::error!("invalid shader file extension: {}", path);
        }

        let chunks = process_file(path, include_provider)?;
        let (src, defines) = Preprocessor::new(Defines::from_args(args)).process(&chunks)?;

        let (work_groups, layouts) = if stage == Some(ShaderStage::Compute) {
            reflect_compute_layouts(&src, &defines)?
        } else {
            ([0; 3], reflect_layouts(&src, &defines)?)
        };

        log::debug!(
            "reflected {} layouts from {} ({})",
            layouts.len(),
            path,
            stage.map_or("unknown stage", ShaderStage::name)
        );

        Ok(Self {
            file: path.to_string(),
            src,
            stage,
            defines,
            layouts,
            work_groups,
        })
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    /// Source after include resolution, preprocessing and macro substitution
    pub fn source(&self) -> &str {
        &self.src
    }

    pub fn stage(&self) -> Option<ShaderStage> {
        self.stage
    }

    /// Stage name, or an empty string for unrecognized extensions.
    pub fn stage_name(&self) -> &'static str {
        self.stage.map_or("", ShaderStage::name)
    }

    pub fn is_compute(&self) -> bool {
        self.stage == Some(ShaderStage::Compute)
    }

    pub fn defines(&self) -> &Defines {
        &self.defines
    }

    pub fn layouts(&self) -> &[ShaderLayout] {
        &self.layouts
    }

    /// `local_size_x/y/z`; all zero outside compute shaders.
    pub fn work_groups(&self) -> [u32; 3] {
        self.work_groups
    }
}
