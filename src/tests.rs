use std::collections::HashMap;

use crate::reflect::{reflect_compute_layouts, reflect_layouts, reflect_work_groups};
use crate::{
    expression, DefineValue, Defines, DescriptorType, ExpressionError, LayoutSource,
    PrepperError, Preprocessor, ResolvedIncludePath, ShaderLayout, ShaderLayoutField,
    ShaderSource, ShaderStage, SourceChunk,
};

struct HashMapIncludeProvider(HashMap<String, String>);
impl crate::IncludeProvider for HashMapIncludeProvider {
    fn resolve_path(
        &self,
        path: &str,
        _includer: &ResolvedIncludePath,
    ) -> Result<ResolvedIncludePath, crate::BoxedIncludeProviderError> {
        Ok(ResolvedIncludePath(path.to_owned()))
    }

    fn get_include(
        &mut self,
        resolved: &ResolvedIncludePath,
    ) -> Result<String, crate::BoxedIncludeProviderError> {
        self.0
            .get(&resolved.0)
            .cloned()
            .ok_or_else(|| format!("{} not found", resolved.0).into())
    }
}

fn provider(files: &[(&str, &str)]) -> HashMapIncludeProvider {
    HashMapIncludeProvider(
        files
            .iter()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect(),
    )
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn fixture(name: &str) -> String {
    format!("{}/test_data/shaders/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn preprocess_with_args(s: &str, args: &str) -> Result<String, PrepperError> {
    let chunks = vec![SourceChunk {
        source: s.to_string(),
        file: "no-file".to_string(),
        line_offset: 0,
    }];
    Preprocessor::new(Defines::from_args(args))
        .process(&chunks)
        .map(|(src, _)| src)
}

fn test_string(s: &str, s2: &str) {
    test_string_with_args(s, "", s2);
}

fn test_string_with_args(s: &str, args: &str, s2: &str) {
    match preprocess_with_args(s, args) {
        Ok(r) => assert_eq!(r, s2.to_string()),
        val => panic!("{:?}", val),
    };
}

fn defines(values: &[(&str, f64)]) -> Defines {
    let mut defines = Defines::new();
    for (name, value) in values {
        defines.set(name, DefineValue::Number(*value));
    }
    defines
}

// Include resolution

#[test]
fn basic_include() {
    let mut include_provider = provider(&[
        ("main.vert", "a\n#include \"b.glsl\"\nc"),
        ("b.glsl", "b1\nb2"),
    ]);

    assert_eq!(
        crate::process_file("main.vert", &mut include_provider).unwrap(),
        vec![
            SourceChunk {
                file: "main.vert".to_string(),
                line_offset: 0,
                source: "a\n".to_string(),
            },
            SourceChunk {
                file: "b.glsl".to_string(),
                line_offset: 0,
                source: "b1\nb2\n".to_string(),
            },
            SourceChunk {
                file: "main.vert".to_string(),
                line_offset: 2,
                source: "c\n".to_string(),
            },
        ]
    );
}

#[test]
fn include_forms() {
    let mut include_provider = provider(&[
        ("main.vert", "  #  include <b.glsl>\n#include \"c.glsl\"\n#include c.glsl"),
        ("b.glsl", "int b;"),
        ("c.glsl", "int c;"),
    ]);

    let source = crate::process_file("main.vert", &mut include_provider)
        .unwrap()
        .into_iter()
        .map(|chunk| chunk.source)
        .collect::<String>();

    assert_eq!(source, "int b;\nint c;\n#include c.glsl\n");
}

#[test]
fn multi_level_include() {
    let mut include_provider = provider(&[
        (
            "foo",
            "double rainbow;\n#include \"bar\"\nint spam;\n#include \"baz\"\nvoid ham();",
        ),
        ("bar", "int bar;\n#include \"baz\""),
        ("baz", "int baz;"),
    ]);

    let source = crate::process_file("foo", &mut include_provider)
        .unwrap()
        .into_iter()
        .map(|chunk| chunk.source)
        .collect::<String>();

    assert_eq!(
        source,
        "double rainbow;\nint bar;\nint baz;\nint spam;\nint baz;\nvoid ham();\n"
    );
}

#[test]
fn include_err() {
    let mut include_provider = provider(&[("main.vert", "int a;\n#include \"missing.glsl\"")]);

    match crate::process_file("main.vert", &mut include_provider) {
        Err(PrepperError::FileReadError { file, .. }) if file == "missing.glsl" => (),
        val => panic!("{:?}", val),
    }

    let mut recursive_include_provider = provider(&[
        ("main.vert", "#include \"a.glsl\""),
        ("a.glsl", "#include \"b.glsl\""),
        ("b.glsl", "int b;\n#include \"a.glsl\""),
    ]);

    match crate::process_file("main.vert", &mut recursive_include_provider) {
        Err(PrepperError::RecursiveInclude {
            file,
            from,
            from_line: 2,
        }) if file == "a.glsl" && from == "b.glsl" => (),
        val => panic!("{:?}", val),
    }
}

// Preprocessor

#[test]
fn passthrough_without_defines() {
    test_string(
        "#version 450\nvoid main() {}\n// comment\n\nint x; // trailing",
        "#version 450\nvoid main() {}\nint x; // trailing\n",
    );
}

#[test]
fn ifdef_else() {
    let src = "#ifdef FOO\nyes\n#else\nno\n#endif";
    test_string_with_args(src, "", "no\n");
    test_string_with_args(src, "-DFOO", "yes\n");

    let src = "#ifndef FOO\nmissing\n#endif\nafter";
    test_string_with_args(src, "", "missing\nafter\n");
    test_string_with_args(src, "-DFOO", "after\n");
}

#[test]
fn nested_conditionals() {
    let src = "#ifdef A\na\n#ifdef B\nab\n#else\na_not_b\n#endif\n#else\nnot_a\n#ifdef B\nnot_a_b\n#endif\n#endif";

    test_string_with_args(src, "", "not_a\n");
    test_string_with_args(src, "-DB", "not_a\nnot_a_b\n");
    test_string_with_args(src, "-DA", "a\na_not_b\n");
    test_string_with_args(src, "-DA -DB", "a\nab\n");
}

#[test]
fn if_defined_elif_chain() {
    let src = "#if defined(A)\na\n#elif defined(B)\nb\n#elif !defined(C)\nnot_c\n#else\nrest\n#endif";

    test_string_with_args(src, "-DA -DB", "a\n");
    test_string_with_args(src, "-DB -DC", "b\n");
    test_string_with_args(src, "", "not_c\n");
    test_string_with_args(src, "-DC", "rest\n");
}

#[test]
fn else_after_empty_branch() {
    test_string_with_args("#ifdef A\n#else\nno\n#endif", "-DA", "");
}

#[test]
fn arithmetic_conditions() {
    test_string("#define N 3\n#if N - 3\nnonzero\n#else\nzero\n#endif", "zero\n");
    test_string("#if 1\none\n#endif\n#if 0\nzero\n#endif", "one\n");
}

#[test]
fn compound_conditions() {
    let both = "#if defined(A) && defined(B)\nab\n#endif\nafter";
    test_string_with_args(both, "-DA -DB", "ab\nafter\n");
    test_string_with_args(both, "-DA", "after\n");

    let either = "#if defined(A) || !defined(B)\nyes\n#else\nno\n#endif";
    test_string_with_args(either, "-DA -DB", "yes\n");
    test_string_with_args(either, "", "yes\n");
    test_string_with_args(either, "-DB", "no\n");

    test_string_with_args(
        "#if defined A && (N > 4) || N == 1\nyes\n#endif",
        "-DA -DN 5",
        "yes\n",
    );
}

#[test]
fn comparison_conditions() {
    let src = "#define N 4\n#if N >= 4\nge\n#endif\n#if N < 4\nlt\n#endif\n#if N != 2 * 2\nne\n#endif";
    test_string(src, "ge\n");

    match preprocess_with_args("#if N > 4\n#endif", "") {
        Err(PrepperError::ExpressionEvaluation { cause, .. }) => {
            assert_eq!(cause, ExpressionError::UnknownIdentifier("N".to_string()))
        }
        val => panic!("{:?}", val),
    }
}

#[test]
fn dead_branches_are_not_evaluated() {
    test_string(
        "#ifdef NOPE\n#if garbage + 1\n#endif\n#define X 1\n#endif\n#ifdef X\nbad\n#endif\nok",
        "ok\n",
    );
}

#[test]
fn whole_word_substitution() {
    test_string(
        "#define FOO 2\nint a = FOO;\nint FOOBAR = FOO_X + FOO;",
        "int a = 2;\nint FOOBAR = FOO_X + 2;\n",
    );
}

#[test]
fn define_values() {
    test_string("#define A 4\n#define B A*2+1\nint x = B;", "int x = 9;\n");
    test_string("#define GAMMA 2.2\nfloat g = GAMMA;", "float g = 2.2;\n");
    test_string("#define SIZE 8 // pixels\nint s = SIZE;", "int s = 8;\n");
    test_string(
        "#define COLOR vec3(1.0, 0.5, 0.0)\nvec3 c = COLOR;",
        "vec3 c = vec3(1.0, 0.5, 0.0);\n",
    );
    test_string(
        "#define OFFSET vec2(-1.0, 1.0)\nvec2 o = OFFSET;",
        "vec2 o = vec2(-1.0, 1.0);\n",
    );
    test_string("#define ENABLED\nbool b = ENABLED;", "bool b = ENABLED;\n");
}

#[test]
fn multi_line_define() {
    test_string("#define BODY a \\\n  b \\\n  c\nBODY", "a\nb\nc\n");
}

#[test]
fn undef() {
    test_string("#define X 1\n#undef X\n#ifdef X\nyes\n#endif\nX", "X\n");
}

#[test]
fn unbalanced_conditionals() {
    match preprocess_with_args("a\n#endif", "") {
        Err(PrepperError::UnmatchedDirective {
            directive,
            line: 2,
            ..
        }) if directive == "endif" => (),
        val => panic!("{:?}", val),
    }

    match preprocess_with_args("#else", "") {
        Err(PrepperError::UnmatchedDirective { directive, .. }) if directive == "else" => (),
        val => panic!("{:?}", val),
    }

    match preprocess_with_args("#ifdef A\nfoo\n#ifdef B\n#endif", "") {
        Err(PrepperError::UnterminatedConditional { file, line: 1 }) if file == "no-file" => (),
        val => panic!("{:?}", val),
    }
}

#[test]
fn bad_define_expression() {
    match preprocess_with_args("#define X 1 + foo", "") {
        Err(PrepperError::ExpressionEvaluation { expression, cause }) => {
            assert_eq!(expression, "#define X 1 + foo");
            assert_eq!(cause, ExpressionError::UnknownIdentifier("foo".to_string()));
        }
        val => panic!("{:?}", val),
    }
}

#[test]
fn predefine_args() {
    let defines = Defines::from_args("-DFOO -DBAR 3 -O --target-env vulkan1.2 -DBAZ=1.5 -D QUX");

    assert_eq!(
        defines.iter().collect::<Vec<_>>(),
        vec![
            ("FOO", &DefineValue::Flag),
            ("BAR", &DefineValue::Number(3.0)),
            ("BAZ", &DefineValue::Number(1.5)),
            ("QUX", &DefineValue::Flag),
        ]
    );
    assert_eq!(defines.len(), 4);
    assert!(!defines.is_empty());
    assert!(Defines::from_args("-O --target-env vulkan1.2").is_empty());
}

// Expressions

#[test]
fn expression_precedence() -> anyhow::Result<()> {
    let none = Defines::new();

    assert_eq!(expression::evaluate("1+2*3", &none)?, 7.0);
    assert_eq!(expression::evaluate("8-2-1", &none)?, 5.0);
    assert_eq!(expression::evaluate("8/4/2", &none)?, 1.0);
    assert_eq!(expression::evaluate("2*3 + 4*5", &none)?, 26.0);
    assert_eq!(expression::evaluate("-2+5", &none)?, 3.0);
    assert_eq!(expression::evaluate("0.5*3", &none)?, 1.5);
    Ok(())
}

#[test]
fn expression_defines() -> anyhow::Result<()> {
    let mut defines = defines(&[("A", 4.0)]);
    defines.set("B", DefineValue::Text("3".to_string()));

    assert_eq!(expression::substitute_defines("A*2", &defines), "4 * 2");
    assert_eq!(expression::evaluate("A*2", &defines)?, 8.0);
    assert_eq!(expression::evaluate("A+B", &defines)?, 7.0);
    Ok(())
}

#[test]
fn expression_errors() {
    let none = Defines::new();

    assert_eq!(
        expression::evaluate("foo", &none),
        Err(ExpressionError::UnknownIdentifier("foo".to_string()))
    );
    assert_eq!(
        expression::evaluate("1/0", &none),
        Err(ExpressionError::DivisionByZero)
    );
    assert_eq!(expression::evaluate("  ", &none), Err(ExpressionError::Empty));
    assert_eq!(
        expression::evaluate("1+", &none),
        Err(ExpressionError::UnexpectedEnd)
    );
    assert_eq!(
        expression::evaluate("1 2", &none),
        Err(ExpressionError::UnexpectedToken {
            position: 1,
            token: "2".to_string()
        })
    );
    assert_eq!(
        expression::evaluate("2*(3)", &none),
        Err(ExpressionError::InvalidCharacter('('))
    );
}

// Layout reflection

#[test]
fn single_location() {
    let layouts =
        reflect_layouts("layout(location = 0) in vec3 Position;", &Defines::new()).unwrap();

    assert_eq!(
        layouts,
        vec![ShaderLayout {
            location: 0,
            ..ShaderLayout::new("vec3", "Position", LayoutSource::In)
        }]
    );
}

#[test]
fn location_array_expands() {
    let layouts =
        reflect_layouts("layout(location = 2) in vec4 Tangent[3];", &Defines::new()).unwrap();

    assert_eq!(
        layouts
            .iter()
            .map(|layout| (layout.location, layout.count, layout.name.as_str()))
            .collect::<Vec<_>>(),
        vec![(2, 1, "Tangent"), (3, 1, "Tangent"), (4, 1, "Tangent")]
    );
}

#[test]
fn location_array_out_of_range() {
    init_logging();

    match reflect_layouts("layout(location = 2147483647) in vec4 a[2];", &Defines::new()) {
        Err(PrepperError::MalformedDeclaration { declaration }) => {
            assert!(declaration.contains("vec4 a"), "{}", declaration)
        }
        val => panic!("{:?}", val),
    }

    match reflect_layouts("layout(location = 0) in vec4 a[100000000];", &Defines::new()) {
        Err(PrepperError::MalformedDeclaration { .. }) => (),
        val => panic!("{:?}", val),
    }

    let layouts = reflect_layouts("layout(location = 2147483646) in vec4 a[2];", &Defines::new())
        .unwrap();
    assert_eq!(
        layouts.iter().map(|layout| layout.location).collect::<Vec<_>>(),
        vec![2147483646, 2147483647]
    );
}

#[test]
fn field_size_saturates() {
    init_logging();

    let field = ShaderLayoutField {
        ty: "float".to_string(),
        name: "x[100000000000][100000000000]".to_string(),
    };
    assert_eq!(field.size(), usize::MAX);

    let layout = ShaderLayout {
        fields: vec![
            field,
            ShaderLayoutField {
                ty: "vec4".to_string(),
                name: "color".to_string(),
            },
        ],
        ..ShaderLayout::new("Huge", "huge", LayoutSource::Buffer)
    };
    assert_eq!(layout.stride(), usize::MAX);
}

#[test]
fn attribute_expressions() -> anyhow::Result<()> {
    let layouts = reflect_layouts(
        "layout(location = BASE + 1) out vec2 uv;",
        &defines(&[("BASE", 3.0)]),
    )?;
    assert_eq!(layouts[0].location, 4);
    assert_eq!(layouts[0].source, LayoutSource::Out);

    match reflect_layouts("layout(location = oops) in vec3 p;", &Defines::new()) {
        Err(PrepperError::ExpressionEvaluation { expression, .. }) if expression == "oops" => (),
        val => panic!("{:?}", val),
    }
    Ok(())
}

#[test]
fn uniform_block_with_define_sized_field() -> anyhow::Result<()> {
    let mut include_provider = provider(&[(
        "skin.vert",
        "#define MAX_BONES 4\nlayout(set = 0, binding = 0) uniform Skin {\n    mat4 bones[MAX_BONES];\n    vec4 tint;\n} skin;",
    )]);
    let shader = ShaderSource::parse_with_provider("skin.vert", "", &mut include_provider)?;

    let layout = &shader.layouts()[0];
    assert_eq!(shader.layouts().len(), 1);
    assert_eq!(layout.ty, "Skin");
    assert_eq!(layout.name, "skin");
    assert_eq!((layout.set, layout.binding), (0, 0));
    assert_eq!(
        layout.fields,
        vec![
            ShaderLayoutField {
                ty: "mat4".to_string(),
                name: "bones[4]".to_string()
            },
            ShaderLayoutField {
                ty: "vec4".to_string(),
                name: "tint".to_string()
            },
        ]
    );
    assert_eq!(layout.stride(), 64 * 4 + 16);
    assert!(layout.is_buffer());
    assert_eq!(layout.descriptor_type(), DescriptorType::UniformBuffer);
    Ok(())
}

#[test]
fn block_variants() -> anyhow::Result<()> {
    let src = "
        layout(std140, binding = 2) uniform Globals { float time; vec2 resolution; };
        layout(input_attachment_index = 0, set = 0, binding = 3) uniform subpassInput gbuffer;
        layout(set = 1, binding = 0) uniform sampler2D albedo;
        layout(set = 0, binding = 1) readonly buffer Instances { mat4 models[]; } instances;
    ";
    let layouts = reflect_layouts(src, &Defines::new())?;
    assert_eq!(layouts.len(), 4);

    assert_eq!(layouts[0].name, "");
    assert_eq!(layouts[0].full_name(), "Globals");
    assert_eq!((layouts[0].binding, layouts[0].set), (2, -1));
    assert_eq!(layouts[0].fields.len(), 2);

    assert_eq!(layouts[1].input_attachment, 0);
    assert_eq!(layouts[1].descriptor_type(), DescriptorType::InputAttachment);

    assert_eq!(layouts[2].name, "albedo");
    assert!(!layouts[2].is_buffer());
    assert_eq!(
        layouts[2].descriptor_type(),
        DescriptorType::CombinedImageSampler
    );

    assert_eq!(layouts[3].source, LayoutSource::Buffer);
    assert_eq!(layouts[3].fields[0].name, "models[]");
    assert_eq!(layouts[3].descriptor_type(), DescriptorType::StorageBuffer);
    Ok(())
}

#[test]
fn comments_and_global_qualifiers_are_skipped() -> anyhow::Result<()> {
    let src = "
        // layout(location = 9) in vec3 ghost;
        /* layout(location = 8) in vec3 ghost2; */
        layout(triangles) in;
        layout(triangle_strip, max_vertices = 3) out;
        layout(location = 0) in vec3 inNormal[];
        layout(location = 0) out vec4 color; // layout(location = 7) out vec4 ghost3;
    ";
    let layouts = reflect_layouts(src, &Defines::new())?;

    assert_eq!(
        layouts
            .iter()
            .map(|layout| (layout.name.as_str(), layout.count))
            .collect::<Vec<_>>(),
        vec![("inNormal", 1), ("color", 1)]
    );
    Ok(())
}

#[test]
fn struct_fields() -> anyhow::Result<()> {
    let layouts = reflect_layouts(
        "layout(binding = 0) uniform Params {\n float a, b[2]; // scale\n int c;\n};\n\
         layout(binding = 1) buffer Grid { float cells[N*2][N + 1]; };",
        &defines(&[("N", 2.0)]),
    )?;

    let names = |layout: &ShaderLayout| {
        layout
            .fields
            .iter()
            .map(|field| format!("{} {}", field.ty, field.name))
            .collect::<Vec<_>>()
    };
    assert_eq!(names(&layouts[0]), vec!["float a", "float b[2]", "int c"]);
    assert_eq!(names(&layouts[1]), vec!["float cells[4][3]"]);
    assert_eq!(layouts[1].stride(), 4 * 4 * 3);

    match reflect_layouts("layout(binding = 0) uniform U { float; };", &Defines::new()) {
        Err(PrepperError::MalformedDeclaration { declaration }) if declaration == "float" => (),
        val => panic!("{:?}", val),
    }
    Ok(())
}

#[test]
fn compute_layouts() -> anyhow::Result<()> {
    let src = "layout(local_size_y = 4, local_size_x = 16) in;\n\
               layout(local_size_x = 64) in;\n\
               layout(set = 0, binding = 1) uniform Params { float dt; } params;";
    let (work_groups, layouts) = reflect_compute_layouts(src, &Defines::new())?;

    assert_eq!(work_groups, [16, 4, 1]);
    assert_eq!(layouts.len(), 1);
    assert_eq!(layouts[0].source, LayoutSource::StorageBuffer);
    assert_eq!(layouts[0].descriptor_type(), DescriptorType::StorageBuffer);

    assert_eq!(
        reflect_work_groups("layout(local_size_x = WG) in;", &defines(&[("WG", 32.0)]))?,
        Some([32, 1, 1])
    );
    assert_eq!(
        reflect_work_groups("layout(location = 0) in vec3 p;", &Defines::new())?,
        None
    );
    Ok(())
}

// End to end

#[test]
fn parse_compute_file() -> anyhow::Result<()> {
    init_logging();
    let shader = ShaderSource::parse(&fixture("particles.comp"), "")?;

    assert_eq!(shader.stage(), Some(ShaderStage::Compute));
    assert_eq!(shader.stage_name(), "Compute");
    assert!(shader.is_compute());
    assert_eq!(shader.work_groups(), [8, 8, 1]);
    assert_eq!(shader.layouts().len(), 1);

    let layout = &shader.layouts()[0];
    assert_eq!(layout.source, LayoutSource::StorageBuffer);
    assert_eq!(layout.source.to_string(), "StorageBuffer");
    assert_eq!(layout.ty, "Buf");
    assert_eq!((layout.set, layout.binding), (0, 0));
    Ok(())
}

#[test]
fn parse_define_sized_location_array() -> anyhow::Result<()> {
    let shader = ShaderSource::parse(&fixture("scaled.vert"), "")?;

    assert_eq!(
        shader
            .layouts()
            .iter()
            .map(|layout| (layout.name.as_str(), layout.location, layout.count))
            .collect::<Vec<_>>(),
        vec![("pos", 0, 1), ("pos", 1, 1)]
    );
    assert_eq!(shader.work_groups(), [0, 0, 0]);
    Ok(())
}

#[test]
fn parse_with_nested_includes() -> anyhow::Result<()> {
    init_logging();
    let shader = ShaderSource::parse(&fixture("mesh.vert"), "")?;

    assert_eq!(shader.stage(), Some(ShaderStage::Vertex));
    assert!(!shader.source().contains("#include"));
    assert!(shader.source().contains("vec4 lights[4];"));
    assert_eq!(
        shader
            .layouts()
            .iter()
            .map(|layout| (layout.full_name(), layout.location, layout.source))
            .collect::<Vec<_>>(),
        vec![
            ("camera", -1, LayoutSource::Uniform),
            ("inPosition", 0, LayoutSource::In),
            ("inUV", 1, LayoutSource::In),
            ("fragUV", 0, LayoutSource::Out),
        ]
    );
    assert_eq!(shader.layouts()[0].fields[1].name, "lights[4]");
    assert_eq!(
        shader.defines().get("MAX_LIGHTS"),
        Some(&DefineValue::Number(4.0))
    );

    let skinned = ShaderSource::parse(&fixture("mesh.vert"), "-DSKINNED")?;
    assert_eq!(skinned.layouts().len(), 6);
    assert_eq!(skinned.layouts()[3].name, "inJoints");
    Ok(())
}

#[test]
fn flat_varyings_golden() -> anyhow::Result<()> {
    let shader = ShaderSource::parse(&fixture("flat_varyings.frag"), "")?;

    assert_eq!(
        shader
            .layouts()
            .iter()
            .map(|layout| (layout.location, layout.ty.as_str(), layout.name.as_str()))
            .collect::<Vec<_>>(),
        vec![(0, "vec2", "uv"), (1, "flat", "materialId"), (0, "vec4", "color")]
    );
    Ok(())
}

#[test]
fn parse_errors() {
    init_logging();

    match ShaderSource::parse(&fixture("broken.frag"), "") {
        Err(PrepperError::FileReadError { file, .. }) if file.ends_with("nope.glsl") => (),
        val => panic!("{:?}", val),
    }

    match ShaderSource::parse(&fixture("does_not_exist.vert"), "") {
        Err(PrepperError::FileReadError { file, .. }) if file.ends_with("does_not_exist.vert") => (),
        val => panic!("{:?}", val),
    }
}

#[test]
fn unknown_extension_still_reflects() -> anyhow::Result<()> {
    let shader = ShaderSource::parse(&fixture("lighting.glsl"), "")?;

    assert_eq!(shader.stage(), None);
    assert_eq!(shader.stage_name(), "");
    assert_eq!(shader.layouts().len(), 1);
    assert_eq!(shader.layouts()[0].name, "normal");
    Ok(())
}
