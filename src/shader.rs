//! WGSL programs and the uniform blocks they read.
//!
//! Each program carries a typed table of its uniform struct members. The table is the
//! single description of the block's layout: tests check it against both the WGSL source
//! and the `#[repr(C)]` struct that gets uploaded.

use bytemuck::{Pod, Zeroable};

/// Type of one uniform struct member
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformKind {
    F32,
    Vec2,
    Vec3,
    Mat4,
}

impl UniformKind {
    /// WGSL alignment in bytes
    pub const fn align(self) -> usize {
        match self {
            UniformKind::F32 => 4,
            UniformKind::Vec2 => 8,
            UniformKind::Vec3 | UniformKind::Mat4 => 16,
        }
    }

    /// WGSL size in bytes
    pub const fn size(self) -> usize {
        match self {
            UniformKind::F32 => 4,
            UniformKind::Vec2 => 8,
            UniformKind::Vec3 => 12,
            UniformKind::Mat4 => 64,
        }
    }
}

/// Named member of a uniform block
#[derive(Debug, Clone, Copy)]
pub struct UniformBinding {
    pub name: &'static str,
    pub kind: UniformKind,
}

const fn binding(name: &'static str, kind: UniformKind) -> UniformBinding {
    UniformBinding { name, kind }
}

/// Versioned WGSL program with its uniform table (group 0, binding 0)
#[derive(Debug, Clone, Copy)]
pub struct ShaderProgram {
    pub label: &'static str,
    pub version: u32,
    pub source: &'static str,
    pub bindings: &'static [UniformBinding],
}

impl ShaderProgram {
    /// Byte offset of each member under WGSL uniform layout rules
    pub fn offsets(&self) -> Vec<usize> {
        let mut offset: usize = 0;
        self.bindings
            .iter()
            .map(|b| {
                offset = offset.next_multiple_of(b.kind.align());
                let at = offset;
                offset += b.kind.size();
                at
            })
            .collect()
    }

    /// Size of the uniform struct, rounded up to its 16-byte alignment
    pub fn uniform_size(&self) -> usize {
        let end = match (self.offsets().last(), self.bindings.last()) {
            (Some(offset), Some(last)) => offset + last.kind.size(),
            _ => 0,
        };
        end.next_multiple_of(16)
    }

    pub fn create_module(&self, device: &wgpu::Device) -> wgpu::ShaderModule {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(self.label),
            source: wgpu::ShaderSource::Wgsl(self.source.into()),
        })
    }
}

pub const PLANET: ShaderProgram = ShaderProgram {
    label: "Planet Shader",
    version: 2,
    source: concat!(
        include_str!("shaders/noise.wgsl"),
        include_str!("shaders/planet.wgsl")
    ),
    bindings: &[
        binding("view_proj", UniformKind::Mat4),
        binding("view", UniformKind::Mat4),
        binding("model", UniformKind::Mat4),
        binding("sun_direction", UniformKind::Vec3),
        binding("time", UniformKind::F32),
        binding("ocean_color", UniformKind::Vec3),
        binding("land_color", UniformKind::Vec3),
        binding("snow_color", UniformKind::Vec3),
    ],
};

pub const ATMOSPHERE: ShaderProgram = ShaderProgram {
    label: "Atmosphere Shader",
    version: 2,
    source: include_str!("shaders/atmosphere.wgsl"),
    bindings: &[
        binding("view_proj", UniformKind::Mat4),
        binding("view", UniformKind::Mat4),
        binding("model", UniformKind::Mat4),
        binding("sun_direction", UniformKind::Vec3),
    ],
};

pub const SUN: ShaderProgram = ShaderProgram {
    label: "Sun Shader",
    version: 1,
    source: include_str!("shaders/sun.wgsl"),
    bindings: &[
        binding("view_proj", UniformKind::Mat4),
        binding("model", UniformKind::Mat4),
        binding("color", UniformKind::Vec3),
    ],
};

pub const STARS: ShaderProgram = ShaderProgram {
    label: "Star Shader",
    version: 1,
    source: include_str!("shaders/stars.wgsl"),
    bindings: &[
        binding("view", UniformKind::Mat4),
        binding("proj", UniformKind::Mat4),
        binding("color", UniformKind::Vec3),
        binding("size", UniformKind::F32),
        binding("viewport", UniformKind::Vec2),
        binding("min_pixel_size", UniformKind::F32),
    ],
};

/// Uniform buffer for the planet surface
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct PlanetUniforms {
    pub view_proj: [[f32; 4]; 4],
    /// Rotates world normals into camera space for the rim haze
    pub view: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub sun_direction: [f32; 3],
    pub time: f32,
    pub ocean_color: [f32; 3],
    pub _padding0: f32,
    pub land_color: [f32; 3],
    pub _padding1: f32,
    pub snow_color: [f32; 3],
    pub _padding2: f32,
}

/// Uniform buffer for the atmosphere shell
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct AtmosphereUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub sun_direction: [f32; 3],
    pub _padding: f32,
}

/// Uniform buffer for the sun sphere
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SunUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub color: [f32; 3],
    pub _padding: f32,
}

/// Uniform buffer for the star quads
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct StarUniforms {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub color: [f32; 3],
    pub size: f32,
    pub viewport: [f32; 2],
    pub min_pixel_size: f32,
    pub _padding: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    fn programs() -> [(ShaderProgram, usize); 4] {
        [
            (PLANET, size_of::<PlanetUniforms>()),
            (ATMOSPHERE, size_of::<AtmosphereUniforms>()),
            (SUN, size_of::<SunUniforms>()),
            (STARS, size_of::<StarUniforms>()),
        ]
    }

    fn parse(program: &ShaderProgram) -> naga::Module {
        naga::front::wgsl::parse_str(program.source)
            .unwrap_or_else(|e| panic!("{} failed to parse: {}", program.label, e))
    }

    /// Members and span of the struct bound as `var<uniform>`
    fn uniform_struct(module: &naga::Module) -> (Vec<(String, u32)>, u32) {
        let (_, global) = module
            .global_variables
            .iter()
            .find(|(_, g)| g.space == naga::AddressSpace::Uniform)
            .expect("no uniform global");
        match &module.types[global.ty].inner {
            naga::TypeInner::Struct { members, span } => (
                members
                    .iter()
                    .map(|m| (m.name.clone().unwrap_or_default(), m.offset))
                    .collect(),
                *span,
            ),
            other => panic!("uniform is not a struct: {:?}", other),
        }
    }

    #[test]
    fn test_planet_layout_offsets() {
        assert_eq!(PLANET.offsets(), vec![0, 64, 128, 192, 204, 208, 224, 240]);
        assert_eq!(PLANET.uniform_size(), 256);
    }

    #[test]
    fn test_atmosphere_layout_offsets() {
        assert_eq!(ATMOSPHERE.offsets(), vec![0, 64, 128, 192]);
        assert_eq!(ATMOSPHERE.uniform_size(), 208);
    }

    #[test]
    fn test_tables_match_uniform_structs() {
        for (program, struct_size) in programs() {
            assert_eq!(
                program.uniform_size(),
                struct_size,
                "{} table does not match its uniform struct",
                program.label
            );
        }
    }

    #[test]
    fn test_shaders_parse_and_validate() {
        for (program, _) in programs() {
            let module = parse(&program);
            naga::valid::Validator::new(
                naga::valid::ValidationFlags::all(),
                naga::valid::Capabilities::all(),
            )
            .validate(&module)
            .unwrap_or_else(|e| panic!("{} failed validation: {:?}", program.label, e));

            let stages: Vec<_> = module.entry_points.iter().map(|e| e.stage).collect();
            assert!(stages.contains(&naga::ShaderStage::Vertex));
            assert!(stages.contains(&naga::ShaderStage::Fragment));
        }
    }

    #[test]
    fn test_tables_match_wgsl_structs() {
        for (program, _) in programs() {
            let module = parse(&program);
            let (members, span) = uniform_struct(&module);

            let expected: Vec<(String, u32)> = program
                .bindings
                .iter()
                .zip(program.offsets())
                .map(|(b, offset)| (b.name.to_string(), offset as u32))
                .collect();

            assert_eq!(members, expected, "{} member table", program.label);
            assert_eq!(span as usize, program.uniform_size(), "{} span", program.label);
        }
    }

    #[test]
    fn test_versions_are_tagged_in_source() {
        for (program, _) in programs() {
            let tag = format!(".wgsl v{}", program.version);
            assert!(program.source.contains(&tag), "{} missing {}", program.label, tag);
        }
    }
}
