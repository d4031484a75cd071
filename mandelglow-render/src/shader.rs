//! OpenGL implementation of the shading stage.
//!
//! Every `glow` call is `unsafe` because it talks to a raw GL context. The
//! calls here are only made from the thread that owns the context (the egui
//! paint callback or app creation), with this program's objects.

use glow::HasContext;
use tracing::{debug, info, warn};

use mandelglow_core::BASE_ITERATIONS;

use crate::error::RenderError;
use crate::palette::{Palette, PALETTE_SIZE};
use crate::stage::{ShadingStage, Uniform};
use crate::Result;

const VERTEX_SOURCE: &str = include_str!("shaders/mandelbrot.vert");
const FRAGMENT_SOURCE: &str = include_str!("shaders/mandelbrot.frag");

/// Attribute slot of the quad's 2D position.
pub const VERTEX_ATTRIBUTE: u32 = 0;

/// Full-viewport quad as a triangle strip, in normalized device coordinates.
pub const QUAD_VERTICES: [[f32; 2]; 4] = [[-1.0, -1.0], [1.0, -1.0], [-1.0, 1.0], [1.0, 1.0]];

/// Texture unit the palette is bound to.
const PALETTE_UNIT: u32 = 0;

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// GLSL dialect to compile for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlslDialect {
    /// Desktop GL 3.3 core.
    Desktop,
    /// OpenGL ES 3.0 / WebGL 2.
    Embedded,
}

impl GlslDialect {
    pub fn detect(gl: &glow::Context) -> Self {
        if gl.version().is_embedded {
            Self::Embedded
        } else {
            Self::Desktop
        }
    }

    fn version_line(self) -> &'static str {
        match self {
            Self::Desktop => "#version 330 core",
            Self::Embedded => "#version 300 es",
        }
    }
}

/// Which of the two shader sources to assemble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderKind {
    Vertex,
    Fragment,
}

impl ShaderKind {
    fn label(self) -> &'static str {
        match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
        }
    }

    fn gl_enum(self) -> u32 {
        match self {
            Self::Vertex => glow::VERTEX_SHADER,
            Self::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

/// Complete source for `kind`: version line, shared defines, then body.
///
/// `BASE_ITERATIONS` is injected from the core crate so the shader's
/// iteration bound and [`AccuracyLevel::max_iterations`] cannot drift apart.
///
/// [`AccuracyLevel::max_iterations`]: mandelglow_core::AccuracyLevel::max_iterations
pub fn shader_source(kind: ShaderKind, dialect: GlslDialect) -> String {
    let body = match kind {
        ShaderKind::Vertex => VERTEX_SOURCE,
        ShaderKind::Fragment => FRAGMENT_SOURCE,
    };
    format!(
        "{}\n#define BASE_ITERATIONS {}\n{}",
        dialect.version_line(),
        BASE_ITERATIONS,
        body
    )
}

// ---------------------------------------------------------------------------
// Program
// ---------------------------------------------------------------------------

struct UniformLocations {
    center: Option<glow::UniformLocation>,
    scale: Option<glow::UniformLocation>,
    ratio: Option<glow::UniformLocation>,
    accuracy: Option<glow::UniformLocation>,
    colormap: Option<glow::UniformLocation>,
}

impl UniformLocations {
    fn resolve(gl: &glow::Context, program: glow::Program) -> Self {
        let lookup = |name: &str| {
            let loc = unsafe { gl.get_uniform_location(program, name) };
            if loc.is_none() {
                // The linker drops uniforms that do not affect the output.
                warn!(name, "uniform not active in linked program");
            }
            loc
        };
        Self {
            center: lookup("center"),
            scale: lookup("scale"),
            ratio: lookup("ratio"),
            accuracy: lookup("accuracy"),
            colormap: lookup("colormap"),
        }
    }

    fn get(&self, uniform: &Uniform) -> Option<&glow::UniformLocation> {
        match uniform {
            Uniform::Center(_) => self.center.as_ref(),
            Uniform::Scale(_) => self.scale.as_ref(),
            Uniform::Ratio(_) => self.ratio.as_ref(),
            Uniform::Accuracy(_) => self.accuracy.as_ref(),
        }
    }
}

/// Linked Mandelbrot program plus the quad and palette texture it draws
/// with.
///
/// Holds object names only; the GL context is passed to every call.
/// Call [`destroy`](Self::destroy) before the context goes away.
pub struct GlowProgram {
    program: glow::Program,
    vertex_array: glow::VertexArray,
    vertex_buffer: glow::Buffer,
    palette_texture: glow::Texture,
    locations: UniformLocations,
}

impl GlowProgram {
    /// Compile, link, and create the quad and palette texture.
    pub fn new(gl: &glow::Context) -> Result<Self> {
        let dialect = GlslDialect::detect(gl);
        let program = link_program(gl, dialect)?;
        let locations = UniformLocations::resolve(gl, program);

        let created = unsafe { create_quad(gl) }.and_then(|(vertex_array, vertex_buffer)| {
            match unsafe { gl.create_texture() } {
                Ok(texture) => Ok((vertex_array, vertex_buffer, texture)),
                Err(reason) => {
                    unsafe {
                        gl.delete_vertex_array(vertex_array);
                        gl.delete_buffer(vertex_buffer);
                    }
                    Err(RenderError::Resource {
                        what: "texture",
                        reason,
                    })
                }
            }
        });
        let (vertex_array, vertex_buffer, palette_texture) = match created {
            Ok(objects) => objects,
            Err(e) => {
                unsafe { gl.delete_program(program) };
                return Err(e);
            }
        };

        unsafe {
            gl.use_program(Some(program));
            gl.uniform_1_i32(locations.colormap.as_ref(), PALETTE_UNIT as i32);
            gl.use_program(None);
        }

        info!(?dialect, "Mandelbrot shader program linked");
        Ok(Self {
            program,
            vertex_array,
            vertex_buffer,
            palette_texture,
            locations,
        })
    }

    /// Release all GL objects owned by this program.
    pub fn destroy(&self, gl: &glow::Context) {
        unsafe {
            gl.delete_program(self.program);
            gl.delete_vertex_array(self.vertex_array);
            gl.delete_buffer(self.vertex_buffer);
            gl.delete_texture(self.palette_texture);
        }
        debug!("Mandelbrot shader program destroyed");
    }
}

impl ShadingStage for GlowProgram {
    type Context = glow::Context;

    fn bind(&mut self, gl: &glow::Context) {
        unsafe {
            gl.use_program(Some(self.program));
            gl.bind_vertex_array(Some(self.vertex_array));
            gl.active_texture(glow::TEXTURE0 + PALETTE_UNIT);
            gl.bind_texture(glow::TEXTURE_2D, Some(self.palette_texture));
        }
    }

    fn upload_palette(&mut self, gl: &glow::Context, palette: &Palette) {
        let texels = palette.to_rgba8();
        unsafe {
            gl.active_texture(glow::TEXTURE0 + PALETTE_UNIT);
            gl.bind_texture(glow::TEXTURE_2D, Some(self.palette_texture));
            for param in [glow::TEXTURE_MIN_FILTER, glow::TEXTURE_MAG_FILTER] {
                gl.tex_parameter_i32(glow::TEXTURE_2D, param, glow::NEAREST as i32);
            }
            for param in [glow::TEXTURE_WRAP_S, glow::TEXTURE_WRAP_T] {
                gl.tex_parameter_i32(glow::TEXTURE_2D, param, glow::CLAMP_TO_EDGE as i32);
            }
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA8 as i32,
                PALETTE_SIZE as i32,
                1,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(texels.as_slice())),
            );
        }
        debug!(entries = PALETTE_SIZE, "palette uploaded");
    }

    fn set_uniform(&mut self, gl: &glow::Context, value: Uniform) {
        let loc = self.locations.get(&value);
        unsafe {
            match value {
                Uniform::Center([x, y]) => gl.uniform_2_f32(loc, x, y),
                Uniform::Scale(v) | Uniform::Ratio(v) => gl.uniform_1_f32(loc, v),
                Uniform::Accuracy(v) => gl.uniform_1_i32(loc, v),
            }
        }
    }

    fn clear(&mut self, gl: &glow::Context) {
        unsafe {
            gl.clear_color(0.0, 0.0, 0.0, 1.0);
            gl.clear(glow::COLOR_BUFFER_BIT);
        }
    }

    fn draw_quad(&mut self, gl: &glow::Context) {
        unsafe {
            gl.draw_arrays(glow::TRIANGLE_STRIP, 0, QUAD_VERTICES.len() as i32);
        }
    }
}

fn link_program(gl: &glow::Context, dialect: GlslDialect) -> Result<glow::Program> {
    unsafe {
        let program = gl.create_program().map_err(|reason| RenderError::Resource {
            what: "program",
            reason,
        })?;

        let mut shaders = Vec::with_capacity(2);
        for kind in [ShaderKind::Vertex, ShaderKind::Fragment] {
            match compile_shader(gl, kind, dialect) {
                Ok(shader) => {
                    gl.attach_shader(program, shader);
                    shaders.push(shader);
                }
                Err(e) => {
                    for shader in shaders {
                        gl.delete_shader(shader);
                    }
                    gl.delete_program(program);
                    return Err(e);
                }
            }
        }

        gl.bind_attrib_location(program, VERTEX_ATTRIBUTE, "vertex");
        gl.link_program(program);
        let linked = gl.get_program_link_status(program);
        let log = if linked {
            String::new()
        } else {
            gl.get_program_info_log(program)
        };

        for shader in shaders {
            gl.detach_shader(program, shader);
            gl.delete_shader(shader);
        }

        if !linked {
            gl.delete_program(program);
            return Err(RenderError::Link(log));
        }
        Ok(program)
    }
}

unsafe fn compile_shader(
    gl: &glow::Context,
    kind: ShaderKind,
    dialect: GlslDialect,
) -> Result<glow::Shader> {
    let shader = gl
        .create_shader(kind.gl_enum())
        .map_err(|reason| RenderError::Resource {
            what: "shader",
            reason,
        })?;
    gl.shader_source(shader, &shader_source(kind, dialect));
    gl.compile_shader(shader);
    if !gl.get_shader_compile_status(shader) {
        let log = gl.get_shader_info_log(shader);
        gl.delete_shader(shader);
        return Err(RenderError::Compile {
            stage: kind.label(),
            log,
        });
    }
    Ok(shader)
}

unsafe fn create_quad(gl: &glow::Context) -> Result<(glow::VertexArray, glow::Buffer)> {
    let vertex_array = gl
        .create_vertex_array()
        .map_err(|reason| RenderError::Resource {
            what: "vertex array",
            reason,
        })?;
    let vertex_buffer = match gl.create_buffer() {
        Ok(buffer) => buffer,
        Err(reason) => {
            gl.delete_vertex_array(vertex_array);
            return Err(RenderError::Resource {
                what: "vertex buffer",
                reason,
            });
        }
    };

    let bytes: Vec<u8> = QUAD_VERTICES
        .iter()
        .flatten()
        .flat_map(|v| v.to_ne_bytes())
        .collect();

    gl.bind_vertex_array(Some(vertex_array));
    gl.bind_buffer(glow::ARRAY_BUFFER, Some(vertex_buffer));
    gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, &bytes, glow::STATIC_DRAW);
    gl.vertex_attrib_pointer_f32(
        VERTEX_ATTRIBUTE,
        2,
        glow::FLOAT,
        false,
        std::mem::size_of::<[f32; 2]>() as i32,
        0,
    );
    gl.enable_vertex_attrib_array(VERTEX_ATTRIBUTE);
    gl.bind_vertex_array(None);
    gl.bind_buffer(glow::ARRAY_BUFFER, None);

    Ok((vertex_array, vertex_buffer))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_line_comes_first() {
        for dialect in [GlslDialect::Desktop, GlslDialect::Embedded] {
            for kind in [ShaderKind::Vertex, ShaderKind::Fragment] {
                let src = shader_source(kind, dialect);
                assert!(src.starts_with("#version "), "{kind:?} {dialect:?}");
            }
        }
        assert!(shader_source(ShaderKind::Fragment, GlslDialect::Embedded)
            .starts_with("#version 300 es\n"));
    }

    #[test]
    fn base_iterations_injected() {
        let src = shader_source(ShaderKind::Fragment, GlslDialect::Desktop);
        assert!(src.contains(&format!("#define BASE_ITERATIONS {BASE_ITERATIONS}\n")));
        assert!(src.contains("BASE_ITERATIONS << accuracy"));
    }

    #[test]
    fn vertex_attribute_name_matches_source() {
        assert!(VERTEX_SOURCE.contains("in vec2 vertex;"));
    }

    #[test]
    fn quad_covers_viewport() {
        for corner in [[-1.0, -1.0], [1.0, -1.0], [-1.0, 1.0], [1.0, 1.0]] {
            assert!(QUAD_VERTICES.contains(&corner));
        }
    }
}
