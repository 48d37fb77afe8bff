extern crate crayon_vector;
extern crate env_logger;
extern crate rand;

use std::rc::Rc;

use rand::Rng;

use crayon_vector::prelude::*;
use crayon_vector::shaders::vector::*;
use crayon_vector::shaders::Resources;
use crayon_vector::video::backends::headless::Call;

fn setup(version: Version, extensions: &[Extension]) -> (Context, Rc<HeadlessVisitor>) {
    let _ = env_logger::try_init();
    Context::headless(Capabilities::new(version, extensions))
}

fn writes(visitor: &HeadlessVisitor) -> Vec<UniformVariable> {
    visitor
        .calls()
        .into_iter()
        .filter_map(|v| match v {
            Call::SetUniform(_, _, variable) => Some(variable),
            _ => None,
        })
        .collect()
}

fn queried(visitor: &HeadlessVisitor, name: &str) -> bool {
    visitor.count(|v| match *v {
        Call::UniformLocation(_, ref v) => v == name,
        Call::UniformBlockIndex(_, ref v) => v == name,
        _ => false,
    }) > 0
}

#[test]
fn direct_defaults() {
    let (ctx, visitor) = setup(Version::GL(3, 2), &[]);
    let shader = VectorShader2D::new(&ctx).unwrap();

    let uniforms = shader.uniforms().unwrap();
    assert_eq!(uniforms.transformation_projection_matrix, Matrix3::identity());
    assert_eq!(uniforms.texture_matrix, Matrix3::identity());
    assert_eq!(uniforms.background_color, Color::transparent());
    assert_eq!(uniforms.color, Color::white());

    // The desktop sources initialize the uniforms themselves, only the sampler is set.
    assert_eq!(writes(&visitor), [UniformVariable::I32(VECTOR_TEXTURE_UNIT as i32)]);

    assert!(queried(&visitor, "transformationProjectionMatrix"));
    assert!(queried(&visitor, "backgroundColor"));
    assert!(queried(&visitor, "color"));
    assert!(queried(&visitor, "vectorTexture"));
    assert!(!queried(&visitor, "textureMatrix"));
    assert!(!queried(&visitor, "Draw"));
}

#[test]
fn direct_defaults_es() {
    let (ctx, visitor) = setup(Version::ES(3, 0), &[]);
    let cfg = Configuration::default().with_flags(Flags::TEXTURE_TRANSFORMATION);
    let shader = VectorShader2D::with_configuration(&ctx, &cfg).unwrap();

    let identity: UniformVariable = Matrix3::<f32>::identity().into();
    let white: UniformVariable = Color::<f32>::white().into();
    assert_eq!(
        writes(&visitor),
        [UniformVariable::I32(6), identity, identity, white]
    );

    assert!(queried(&visitor, "textureMatrix"));
    assert_eq!(shader.uniforms().unwrap().color, Color::white());

    // OpenGL ES 3.0 has explicit attribute locations.
    assert_eq!(
        visitor.count(|v| match v {
            Call::BindAttributeLocation(..) => true,
            _ => false,
        }),
        0
    );
}

#[test]
fn direct_defaults_3d() {
    let (ctx, visitor) = setup(Version::ES(2, 0), &[]);
    let shader = VectorShader3D::new(&ctx).unwrap();

    let identity: UniformVariable = Matrix4::<f32>::identity().into();
    let white: UniformVariable = Color::<f32>::white().into();
    assert_eq!(writes(&visitor), [UniformVariable::I32(6), identity, white]);
    assert_eq!(
        shader.uniforms().unwrap().transformation_projection_matrix,
        Matrix4::identity()
    );
}

#[test]
fn attribute_locations() {
    let (ctx, visitor) = setup(Version::GL(3, 2), &[]);
    let state = VectorShader2D::compile_default(&ctx).unwrap();

    let calls = visitor.calls();
    let position = calls
        .iter()
        .position(|v| match *v {
            Call::BindAttributeLocation(_, 0, ref name) => name == "position",
            _ => false,
        })
        .unwrap();
    let coordinates = calls
        .iter()
        .position(|v| match *v {
            Call::BindAttributeLocation(_, 1, ref name) => name == "textureCoordinates",
            _ => false,
        })
        .unwrap();
    let link = calls
        .iter()
        .position(|v| match v {
            Call::LinkProgram(_) => true,
            _ => false,
        })
        .unwrap();

    assert!(position < link);
    assert!(coordinates < link);

    VectorShader2D::from_compile_state(state).unwrap();
}

#[test]
fn explicit_locations() {
    let (ctx, visitor) = setup(Version::GL(4, 6), &[]);
    let cfg = Configuration::default().with_flags(Flags::TEXTURE_TRANSFORMATION);
    let shader = VectorShader3D::with_configuration(&ctx, &cfg).unwrap();

    // Everything is fixed by layout qualifiers, nothing is queried or bound by hand.
    assert_eq!(
        visitor.count(|v| match v {
            Call::UniformLocation(..)
            | Call::UniformBlockIndex(..)
            | Call::UniformBlockBinding(..)
            | Call::BindAttributeLocation(..)
            | Call::SetUniform(..) => true,
            _ => false,
        }),
        0
    );

    match shader.layout() {
        Layout::Direct { locations, .. } => {
            assert_eq!(
                locations.transformation_projection_matrix,
                TRANSFORMATION_PROJECTION_MATRIX_LOCATION
            );
            assert_eq!(locations.texture_matrix, TEXTURE_MATRIX_LOCATION);
            assert_eq!(locations.background_color, BACKGROUND_COLOR_LOCATION);
            assert_eq!(locations.color, COLOR_LOCATION);
        }
        Layout::Buffered { .. } => panic!("expected individual uniforms"),
    }
}

#[test]
fn sources() {
    let (ctx, visitor) = setup(Version::GL(3, 2), &[]);
    let cfg = Configuration::default()
        .with_flags(Flags::UNIFORM_BUFFERS | Flags::TEXTURE_TRANSFORMATION)
        .with_material_count(2)
        .with_draw_count(3);

    let _state = VectorShader2D::compile(&ctx, &cfg).unwrap();

    let mut vert = None;
    let mut frag = None;
    for call in visitor.calls() {
        match call {
            Call::CreateShader(ShaderStage::Vertex, id) => vert = Some(id),
            Call::CreateShader(ShaderStage::Fragment, id) => frag = Some(id),
            _ => {}
        }
    }

    let vert = visitor.recorded_source(vert.unwrap()).unwrap();
    assert!(vert.starts_with(
        "#version 150\n\
         #define DISABLE_GL_ARB_explicit_attrib_location\n\
         #define DISABLE_GL_ARB_shading_language_420pack\n\
         #define DISABLE_GL_ARB_explicit_uniform_location\n"
    ));

    let defines = vert
        .find(
            "#define TEXTURE_TRANSFORMATION\n\
             #define TWO_DIMENSIONS\n\
             #define UNIFORM_BUFFERS\n\
             #define DRAW_COUNT 3\n",
        )
        .unwrap();
    let generic = vert.find("#define POSITION_ATTRIBUTE_LOCATION").unwrap();
    let stage = vert.find("interpolatedTextureCoordinates").unwrap();
    assert!(defines < generic && generic < stage);
    assert!(!vert.contains("#define MULTI_DRAW"));
    assert!(!vert.contains("#define MATERIAL_COUNT"));

    let frag = visitor.recorded_source(frag.unwrap()).unwrap();
    assert!(frag.contains(
        "#define UNIFORM_BUFFERS\n\
         #define DRAW_COUNT 3\n\
         #define MATERIAL_COUNT 2\n"
    ));
    assert!(!frag.contains("#define TWO_DIMENSIONS"));
    assert!(frag.contains("fragmentColor"));
}

#[test]
fn submission_is_non_blocking() {
    let (ctx, visitor) = setup(Version::GL(3, 2), &[]);
    let state = VectorShader2D::compile_default(&ctx).unwrap();

    assert_eq!(
        visitor.count(|v| match v {
            Call::CompileStatus(_) | Call::LinkStatus(_) => true,
            _ => false,
        }),
        0
    );
    assert_eq!(
        visitor.count(|v| match v {
            Call::CompileShader(_) => true,
            _ => false,
        }),
        2
    );
    assert_eq!(visitor.alive(), (2, 1));

    // An abandoned build still releases everything.
    drop(state);
    assert_eq!(visitor.alive(), (0, 0));
}

#[test]
fn round_trip() {
    let (ctx, visitor) = setup(Version::GL(4, 6), &[]);
    let cfg = Configuration::default()
        .with_flags(Flags::MULTI_DRAW | Flags::TEXTURE_TRANSFORMATION)
        .with_material_count(3)
        .with_draw_count(8);

    let state = VectorShader3D::compile(&ctx, &cfg).unwrap();
    assert_eq!(state.configuration(), &cfg);
    assert_eq!(state.version(), Version::GL(3, 2));

    let shader = VectorShader3D::from_compile_state(state).unwrap();
    assert_eq!(shader.flags(), cfg.flags());
    assert_eq!(shader.material_count(), 3);
    assert_eq!(shader.draw_count(), 8);
    assert_eq!(shader.configuration(), &cfg);
    assert!(shader.uniforms().is_none());
    assert_eq!(
        *shader.layout(),
        Layout::Buffered {
            draw_offset: DRAW_OFFSET_LOCATION
        }
    );

    // Compiled shader objects are not needed once the program is linked.
    assert_eq!(visitor.alive(), (0, 1));
    drop(shader);
    assert_eq!(visitor.alive(), (0, 0));
}

#[test]
fn single_draw_offset() {
    let (ctx, visitor) = setup(Version::GL(3, 2), &[]);
    let cfg = Configuration::default().with_flags(Flags::UNIFORM_BUFFERS);
    let mut shader = VectorShader2D::with_configuration(&ctx, &cfg).unwrap();

    assert!(!queried(&visitor, "drawOffset"));
    assert_eq!(
        *shader.layout(),
        Layout::Buffered {
            draw_offset: UniformLocation::INVALID
        }
    );

    visitor.clear_calls();
    shader.set_draw_offset(0).unwrap();
    assert!(visitor.calls().is_empty());
}

#[test]
fn draw_offsets() {
    let mut rng = rand::thread_rng();
    let (ctx, visitor) = setup(Version::GL(3, 2), &[]);

    for _ in 0..8 {
        let draw_count = rng.gen_range(2, 64);
        let cfg = Configuration::default()
            .with_flags(Flags::UNIFORM_BUFFERS)
            .with_material_count(rng.gen_range(1, 16))
            .with_draw_count(draw_count);

        let mut shader = VectorShader2D::with_configuration(&ctx, &cfg).unwrap();
        let location = match *shader.layout() {
            Layout::Buffered { draw_offset } => draw_offset,
            Layout::Direct { .. } => panic!("expected uniform buffers"),
        };

        assert!(location.is_valid());

        let offset = rng.gen_range(0, draw_count);
        visitor.clear_calls();
        shader.set_draw_offset(offset).unwrap();
        assert_eq!(
            visitor.calls(),
            [Call::SetUniform(
                shader.program().id(),
                location.0,
                UniformVariable::U32(offset)
            )]
        );
    }
}

#[cfg(not(feature = "strict"))]
#[test]
fn draw_offset_out_of_bounds() {
    let mut rng = rand::thread_rng();
    let (ctx, visitor) = setup(Version::GL(3, 2), &[]);

    let draw_count = rng.gen_range(1, 64);
    let cfg = Configuration::default()
        .with_flags(Flags::UNIFORM_BUFFERS)
        .with_draw_count(draw_count);
    let mut shader = VectorShader2D::with_configuration(&ctx, &cfg).unwrap();

    visitor.clear_calls();
    let offset = draw_count + rng.gen_range(0, 4);
    match shader.set_draw_offset(offset) {
        Err(err @ Error::DrawOffsetOutOfBounds { .. }) => assert_eq!(
            format!("{}", err),
            format!(
                "Draw offset {} is out of bounds for {} draws.",
                offset, draw_count
            )
        ),
        _ => panic!("expected an out of bounds error"),
    }

    assert!(visitor.calls().is_empty());
}

#[cfg(not(feature = "strict"))]
#[test]
fn texture_matrix_without_texture_transformation() {
    let (ctx, visitor) = setup(Version::GL(3, 2), &[]);
    let mut shader = VectorShader2D::new(&ctx).unwrap();

    match shader.layout() {
        Layout::Direct { locations, .. } => {
            assert_eq!(locations.texture_matrix, UniformLocation::INVALID)
        }
        Layout::Buffered { .. } => panic!("expected individual uniforms"),
    }

    visitor.clear_calls();
    match shader.set_texture_matrix(Matrix3::identity()) {
        Err(Error::TextureTransformationDisabled(_)) => {}
        _ => panic!("expected the texture matrix to be rejected"),
    }

    assert!(visitor.calls().is_empty());
}

#[cfg(not(feature = "strict"))]
#[test]
fn data_paths_are_exclusive() {
    let (ctx, visitor) = setup(Version::GL(3, 2), &[]);
    let buffer = Buffer::from_raw(42);

    let cfg = Configuration::default()
        .with_flags(Flags::UNIFORM_BUFFERS | Flags::TEXTURE_TRANSFORMATION);
    let mut buffered = VectorShader2D::with_configuration(&ctx, &cfg).unwrap();
    visitor.clear_calls();

    assert!(buffered.uniforms().is_none());
    match buffered.set_transformation_projection_matrix(Matrix3::identity()) {
        Err(Error::UniformBuffersEnabled(_)) => {}
        _ => panic!("expected individual uniforms to be rejected"),
    }
    match buffered.set_texture_matrix(Matrix3::identity()) {
        Err(Error::UniformBuffersEnabled(_)) => {}
        _ => panic!("expected individual uniforms to be rejected"),
    }
    match buffered.set_background_color(Color::black()) {
        Err(Error::UniformBuffersEnabled(_)) => {}
        _ => panic!("expected individual uniforms to be rejected"),
    }
    match buffered.set_color(Color::red()) {
        Err(Error::UniformBuffersEnabled(_)) => {}
        _ => panic!("expected individual uniforms to be rejected"),
    }

    let mut direct = VectorShader2D::new(&ctx).unwrap();
    visitor.clear_calls();

    match direct.set_draw_offset(0) {
        Err(Error::UniformBuffersDisabled(_)) => {}
        _ => panic!("expected the draw offset to be rejected"),
    }
    match direct.bind_transformation_projection_buffer(&buffer) {
        Err(Error::UniformBuffersDisabled(_)) => {}
        _ => panic!("expected uniform buffers to be rejected"),
    }
    match direct.bind_draw_buffer_range(&buffer, 0, 16) {
        Err(Error::UniformBuffersDisabled(_)) => {}
        _ => panic!("expected uniform buffers to be rejected"),
    }
    match direct.bind_material_buffer(&buffer) {
        Err(Error::UniformBuffersDisabled(_)) => {}
        _ => panic!("expected uniform buffers to be rejected"),
    }
    // The data path is reported before the missing texture transformation.
    match direct.bind_texture_transformation_buffer(&buffer) {
        Err(Error::UniformBuffersDisabled(_)) => {}
        _ => panic!("expected uniform buffers to be rejected"),
    }
    match direct.bind_texture_transformation_buffer_range(&buffer, 0, 48) {
        Err(Error::UniformBuffersDisabled(_)) => {}
        _ => panic!("expected uniform buffers to be rejected"),
    }

    assert!(visitor.calls().is_empty());
}

#[test]
fn buffer_bindings() {
    let (ctx, visitor) = setup(Version::GL(3, 2), &[]);
    let cfg = Configuration::default()
        .with_flags(Flags::UNIFORM_BUFFERS | Flags::TEXTURE_TRANSFORMATION)
        .with_draw_count(4);
    let mut shader = VectorShader2D::with_configuration(&ctx, &cfg).unwrap();

    let bindings: Vec<u32> = visitor
        .calls()
        .into_iter()
        .filter_map(|v| match v {
            Call::UniformBlockBinding(_, _, binding) => Some(binding),
            _ => None,
        })
        .collect();
    assert_eq!(bindings, [1, 2, 3, 4]);

    let buffer = Buffer::from_raw(42);
    visitor.clear_calls();
    shader
        .bind_transformation_projection_buffer(&buffer)
        .unwrap()
        .bind_draw_buffer(&buffer)
        .unwrap()
        .bind_texture_transformation_buffer_range(&buffer, 0, 64)
        .unwrap()
        .bind_material_buffer_range(&buffer, 256, 128)
        .unwrap()
        .bind_vector_texture(&Texture2D::from_raw(7))
        .unwrap();

    assert_eq!(
        visitor.calls(),
        [
            Call::BindBuffer(BufferTarget::Uniform, 1, 42, None),
            Call::BindBuffer(BufferTarget::Uniform, 2, 42, None),
            Call::BindBuffer(BufferTarget::Uniform, 3, 42, Some((0, 64))),
            Call::BindBuffer(BufferTarget::Uniform, 4, 42, Some((256, 128))),
            Call::BindTexture(6, 7),
        ]
    );
}

#[test]
fn block_bindings_without_texture_transformation() {
    let (ctx, visitor) = setup(Version::ES(3, 0), &[]);
    let cfg = Configuration::default().with_flags(Flags::UNIFORM_BUFFERS);
    VectorShader2D::with_configuration(&ctx, &cfg).unwrap();

    let bindings: Vec<u32> = visitor
        .calls()
        .into_iter()
        .filter_map(|v| match v {
            Call::UniformBlockBinding(_, _, binding) => Some(binding),
            _ => None,
        })
        .collect();
    assert_eq!(bindings, [1, 2, 4]);
    assert!(!queried(&visitor, "TextureTransformation"));

    // No defaults are written on the buffered path, even on OpenGL ES.
    assert_eq!(writes(&visitor), [UniformVariable::I32(6)]);
}

#[cfg(not(feature = "strict"))]
#[test]
fn texture_transformation_buffer_requires_flag() {
    let (ctx, visitor) = setup(Version::GL(3, 2), &[]);
    let cfg = Configuration::default().with_flags(Flags::UNIFORM_BUFFERS);
    let mut shader = VectorShader2D::with_configuration(&ctx, &cfg).unwrap();

    visitor.clear_calls();
    match shader.bind_texture_transformation_buffer(&Buffer::from_raw(1)) {
        Err(Error::TextureTransformationDisabled(_)) => {}
        _ => panic!("expected the texture transformation buffer to be rejected"),
    }

    assert!(visitor.calls().is_empty());
}

#[test]
fn vector_texture() {
    let (ctx, visitor) = setup(Version::GL(2, 1), &[]);
    let mut shader = VectorShader2D::new(&ctx).unwrap();

    visitor.clear_calls();
    shader.bind_vector_texture(&Texture2D::from_raw(3)).unwrap();
    assert_eq!(visitor.calls(), [Call::BindTexture(VECTOR_TEXTURE_UNIT, 3)]);
}

#[test]
fn setters() {
    let (ctx, visitor) = setup(Version::GL(3, 2), &[]);
    let mut shader = VectorShader3D::new(&ctx).unwrap();
    let matrix = Matrix4::from_scale(2.0f32);

    visitor.clear_calls();
    shader
        .set_transformation_projection_matrix(matrix)
        .unwrap()
        .set_background_color(Color::black())
        .unwrap()
        .set_color(Color::red())
        .unwrap();

    let uniforms = shader.uniforms().unwrap();
    assert_eq!(uniforms.transformation_projection_matrix, matrix);
    assert_eq!(uniforms.background_color, Color::black());
    assert_eq!(uniforms.color, Color::red());

    let transformation: UniformVariable = matrix.into();
    let red: UniformVariable = Color::<f32>::red().into();
    let black: UniformVariable = Color::<f32>::black().into();
    assert_eq!(writes(&visitor), [transformation, black, red]);
}

#[cfg(not(feature = "strict"))]
#[test]
fn multi_draw_requires_extension() {
    let cfg = Configuration::default()
        .with_flags(Flags::MULTI_DRAW)
        .with_draw_count(4);

    let (ctx, visitor) = setup(Version::GL(3, 2), &[]);
    match VectorShader2D::compile(&ctx, &cfg) {
        Err(Error::Requirement(v)) => assert_eq!(v, "GL_ARB_shader_draw_parameters"),
        _ => panic!("expected multi-draw to be rejected"),
    }

    // Rejected before anything is created on the device.
    assert!(visitor.calls().is_empty());

    let (ctx, visitor) = setup(Version::ES(3, 0), &[]);
    match VectorShader2D::compile(&ctx, &cfg) {
        Err(Error::Requirement(v)) => assert_eq!(v, "GL_ANGLE_multi_draw"),
        _ => panic!("expected multi-draw to be rejected"),
    }

    assert!(visitor.calls().is_empty());
}

#[test]
fn multi_draw() {
    let cfg = Configuration::default()
        .with_flags(Flags::MULTI_DRAW)
        .with_draw_count(4);

    let (ctx, _) = setup(Version::GL(3, 2), &[Extension::ArbShaderDrawParameters]);
    let shader = VectorShader2D::with_configuration(&ctx, &cfg).unwrap();
    assert!(shader.flags().contains(Flags::UNIFORM_BUFFERS));

    let (ctx, visitor) = setup(Version::ES(3, 0), &[Extension::AngleMultiDraw]);
    let shader = VectorShader2D::with_configuration(&ctx, &cfg).unwrap();
    assert_eq!(shader.draw_count(), 4);
    assert!(queried(&visitor, "drawOffset"));
}

#[test]
fn es_extension_directives_lead_the_stage() {
    let cfg = Configuration::default()
        .with_flags(Flags::MULTI_DRAW)
        .with_draw_count(4);

    let (ctx, visitor) = setup(Version::ES(3, 0), &[Extension::AngleMultiDraw]);
    let _state = VectorShader2D::compile(&ctx, &cfg).unwrap();

    let mut vert = None;
    let mut frag = None;
    for call in visitor.calls() {
        match call {
            Call::CreateShader(ShaderStage::Vertex, id) => vert = Some(id),
            Call::CreateShader(ShaderStage::Fragment, id) => frag = Some(id),
            _ => {}
        }
    }

    // No statement may precede an #extension directive in ESSL 3.00.
    let vert = visitor.recorded_source(vert.unwrap()).unwrap();
    let extension = vert.find("#extension GL_ANGLE_multi_draw").unwrap();
    assert!(vert[..extension].find("precision ").is_none());
    assert!(vert.find(';').unwrap() > extension);

    let frag = visitor.recorded_source(frag.unwrap()).unwrap();
    assert!(frag.contains("precision mediump float;"));
}

#[cfg(not(feature = "strict"))]
#[test]
fn zero_counts() {
    let (ctx, visitor) = setup(Version::GL(3, 2), &[]);

    let cfg = Configuration::default()
        .with_flags(Flags::UNIFORM_BUFFERS)
        .with_draw_count(0);
    match VectorShader2D::compile(&ctx, &cfg) {
        Err(Error::InvalidConfiguration(_)) => {}
        _ => panic!("expected a zero draw count to be rejected"),
    }

    let cfg = Configuration::default()
        .with_flags(Flags::UNIFORM_BUFFERS)
        .with_material_count(0);
    match VectorShader2D::compile(&ctx, &cfg) {
        Err(Error::InvalidConfiguration(_)) => {}
        _ => panic!("expected a zero material count to be rejected"),
    }

    assert!(visitor.calls().is_empty());
}

#[test]
fn compile_failure() {
    let (ctx, visitor) = setup(Version::GL(3, 2), &[]);
    visitor.fail_compilation("0:12(3): error: syntax error, unexpected NEW_IDENTIFIER");

    let state = VectorShader2D::compile_default(&ctx).unwrap();
    match VectorShader2D::from_compile_state(state) {
        Err(Error::ShaderCreationFailure(log)) => {
            assert!(log.contains("Vertex"));
            assert!(log.contains("Fragment"));
            assert!(log.contains("unexpected NEW_IDENTIFIER"));
        }
        _ => panic!("expected the compilation to fail"),
    }

    assert_eq!(visitor.alive(), (0, 0));
}

#[test]
fn link_failure() {
    let (ctx, visitor) = setup(Version::GL(3, 2), &[]);
    visitor.fail_link("error: fragment shader input `drawId' has no matching output");

    match VectorShader2D::new(&ctx) {
        Err(Error::ShaderCreationFailure(log)) => assert!(log.contains("no matching output")),
        _ => panic!("expected the link to fail"),
    }

    assert_eq!(visitor.alive(), (0, 0));
}

#[test]
fn batch() {
    let (ctx, visitor) = setup(Version::GL(3, 2), &[]);
    let configurations = Configuration::parse_list(
        r#"[
            {},
            {"flags": ["TextureTransformation"]},
            {"flags": ["UniformBuffers"], "material_count": 2, "draw_count": 4}
        ]"#,
    )
    .unwrap();

    let shaders = compile_all::<TwoDimensions>(&ctx, &configurations).unwrap();
    assert_eq!(shaders.len(), 3);
    for (shader, cfg) in shaders.iter().zip(&configurations) {
        assert_eq!(shader.configuration(), cfg);
    }

    // Every program is submitted before the first status query blocks.
    let calls = visitor.calls();
    let last_link = calls
        .iter()
        .rposition(|v| match v {
            Call::LinkProgram(_) => true,
            _ => false,
        })
        .unwrap();
    let first_check = calls
        .iter()
        .position(|v| match v {
            Call::CompileStatus(_) => true,
            _ => false,
        })
        .unwrap();
    assert!(last_link < first_check);

    assert_eq!(visitor.alive(), (0, 3));
}

#[test]
fn custom_sources() {
    Resources::register_group("vector-test-partial", vec![("compatibility.glsl", "")]);

    let (ctx, visitor) = setup(Version::GL(3, 2), &[]);
    let ctx = ctx.with_sources(Rc::new(Resources::new("vector-test-partial").unwrap()));

    match VectorShader2D::compile_default(&ctx) {
        Err(Error::SourceUndefined(group, name)) => {
            assert_eq!(group, "vector-test-partial");
            assert_eq!(name, "generic.glsl");
        }
        _ => panic!("expected a missing source"),
    }

    assert!(visitor.calls().is_empty());
}
