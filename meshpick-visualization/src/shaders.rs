//! WGSL shaders for the scene renderer

/// Flat colored triangles and lines.
///
/// Shading is baked into the vertex colors, so the shader only transforms.
pub const SCENE_SHADER: &str = r#"
struct Camera {
    view_proj: mat4x4<f32>,
    viewport: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> camera: Camera;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = camera.view_proj * vec4<f32>(in.position, 1.0);
    out.color = in.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

/// Screen-aligned round sprites, one instance per point.
///
/// Sizes are in pixels; sprites are nudged towards the camera so markers
/// on a surface are not hidden by it.
pub const POINT_SHADER: &str = r#"
struct Camera {
    view_proj: mat4x4<f32>,
    viewport: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> camera: Camera;

struct PointInput {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
    @location(2) size: f32,
};

struct PointOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
    @location(1) uv: vec2<f32>,
};

var<private> CORNERS: array<vec2<f32>, 6> = array<vec2<f32>, 6>(
    vec2<f32>(-1.0, -1.0),
    vec2<f32>(1.0, -1.0),
    vec2<f32>(1.0, 1.0),
    vec2<f32>(-1.0, -1.0),
    vec2<f32>(1.0, 1.0),
    vec2<f32>(-1.0, 1.0),
);

@vertex
fn vs_point(@builtin(vertex_index) index: u32, in: PointInput) -> PointOutput {
    let corner = CORNERS[index];
    var clip = camera.view_proj * vec4<f32>(in.position, 1.0);
    let pixel = corner * in.size / camera.viewport.xy;
    clip = vec4<f32>(clip.xy + pixel * clip.w, clip.z - 0.001 * clip.w, clip.w);

    var out: PointOutput;
    out.clip_position = clip;
    out.color = in.color;
    out.uv = corner;
    return out;
}

@fragment
fn fs_point(in: PointOutput) -> @location(0) vec4<f32> {
    if (dot(in.uv, in.uv) > 1.0) {
        discard;
    }
    return in.color;
}
"#;
