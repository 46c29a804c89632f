use std::fmt;

/// Storage qualifier a layout was declared with
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum LayoutSource {
    In,
    Out,
    Uniform,
    Buffer,

    /// Every layout of a compute shader is reported as a storage buffer,
    /// whatever its declared qualifier.
    StorageBuffer,
}

impl LayoutSource {
    pub fn from_qualifier(qualifier: &str) -> Option<Self> {
        match qualifier {
            "in" => Some(LayoutSource::In),
            "out" => Some(LayoutSource::Out),
            "uniform" => Some(LayoutSource::Uniform),
            "buffer" => Some(LayoutSource::Buffer),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LayoutSource::In => "in",
            LayoutSource::Out => "out",
            LayoutSource::Uniform => "uniform",
            LayoutSource::Buffer => "buffer",
            LayoutSource::StorageBuffer => "StorageBuffer",
        }
    }
}

impl fmt::Display for LayoutSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vulkan descriptor type a layout maps to
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum DescriptorType {
    UniformBuffer,
    StorageBuffer,
    InputAttachment,
    CombinedImageSampler,
}

/// Member of a uniform or buffer block. Array dimensions stay in `name`
/// with every size folded to an integer, e.g. `bones[4]`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ShaderLayoutField {
    pub ty: String,
    pub name: String,
}

impl ShaderLayoutField {
    /// Byte size of the field, using vec4 alignment for vec3. Saturates at `usize::MAX`.
    pub fn size(&self) -> usize {
        let size = match self.ty.as_str() {
            "mat4" => 64,
            "mat3" => 48,
            "vec4" | "ivec4" | "uvec4" => 16,
            "vec3" | "ivec3" | "uvec3" => 16,
            "vec2" | "ivec2" | "uvec2" => 8,
            "float" | "int" | "uint" => 4,
            _ => {
                log::warn!("shader layout field of type {:?} not found", self.ty);
                16
            }
        };

        let total = self
            .array_dims()
            .try_fold(size, |total: usize, dim| total.checked_mul(dim));
        total.unwrap_or_else(|| {
            log::warn!("size of shader layout field {} overflows", self.name);
            usize::MAX
        })
    }

    /// Sizes of the array dimensions in `name`; unsized `[]` counts as one element.
    pub fn array_dims(&self) -> impl Iterator<Item = usize> + '_ {
        self.name
            .split('[')
            .skip(1)
            .map(|dim| dim.split(']').next().unwrap_or("").trim())
            .map(|dim| dim.parse::<usize>().unwrap_or(1))
    }
}

/// A single `layout(...)` declaration found in a shader.
#[derive(Clone, PartialEq, Debug)]
pub struct ShaderLayout {
    /// -1 if not set
    pub location: i32,
    /// -1 if not set
    pub binding: i32,
    /// -1 if not set
    pub set: i32,
    /// -1 if not set
    pub input_attachment: i32,
    pub count: usize,

    /// Interface type (`vec3`, `sampler2D`) or block type name
    pub ty: String,
    pub name: String,
    pub source: LayoutSource,
    pub fields: Vec<ShaderLayoutField>,
}

impl ShaderLayout {
    pub const UNSET: i32 = -1;

    pub fn new(ty: &str, name: &str, source: LayoutSource) -> Self {
        Self {
            location: Self::UNSET,
            binding: Self::UNSET,
            set: Self::UNSET,
            input_attachment: Self::UNSET,
            count: 1,
            ty: ty.to_string(),
            name: name.to_string(),
            source,
            fields: Vec::new(),
        }
    }

    pub fn full_name(&self) -> &str {
        if self.name.is_empty() {
            &self.ty
        } else {
            &self.name
        }
    }

    /// Blocks with members get their own buffers; the global uniform buffer is shared.
    pub fn is_buffer(&self) -> bool {
        self.ty != "UniformBufferObject" && !self.fields.is_empty()
    }

    pub fn stride(&self) -> usize {
        self.fields
            .iter()
            .map(ShaderLayoutField::size)
            .fold(0, usize::saturating_add)
    }

    pub fn capacity(&self) -> usize {
        self.stride()
    }

    pub fn descriptor_type(&self) -> DescriptorType {
        if self.source == LayoutSource::StorageBuffer || self.source == LayoutSource::Buffer {
            return DescriptorType::StorageBuffer;
        }

        let bound = self.binding >= 0 && self.set >= 0;
        if bound && self.source == LayoutSource::Uniform && !self.fields.is_empty() {
            return DescriptorType::UniformBuffer;
        }

        match self.ty.as_str() {
            "subpassInput" | "subpassInputMS" => DescriptorType::InputAttachment,
            ty if ty.starts_with("sampler") => DescriptorType::CombinedImageSampler,
            _ => {
                log::warn!("unknown descriptor type for {} ({})", self.full_name(), self.ty);
                DescriptorType::UniformBuffer
            }
        }
    }
}
