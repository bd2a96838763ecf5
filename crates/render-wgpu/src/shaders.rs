/// WGSL shader for instanced, flat-colored meshes with hemisphere and
/// directional lighting plus linear fog.
pub const SCENE_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    // rgb, enabled
    fog_color: vec4<f32>,
    // near, far
    fog_range: vec4<f32>,
    // rgb, intensity
    hemi_sky: vec4<f32>,
    hemi_ground: vec4<f32>,
    // direction toward the light
    sun_dir: vec4<f32>,
    // rgb, intensity
    sun_color: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_normal: vec3<f32>,
    @location(1) world_position: vec3<f32>,
    @location(2) color: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);
    let world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world_pos;
    out.world_normal = world_normal;
    out.world_position = world_pos.xyz;
    out.color = instance.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.world_normal);

    let sky_weight = 0.5 * n.y + 0.5;
    let hemi = mix(uniforms.hemi_ground.rgb, uniforms.hemi_sky.rgb, sky_weight) * uniforms.hemi_sky.w;

    let sun_dir = normalize(uniforms.sun_dir.xyz);
    let diffuse = max(dot(n, sun_dir), 0.0) * uniforms.sun_color.rgb * uniforms.sun_color.w;

    var rgb = in.color.rgb * (hemi + diffuse);

    if (uniforms.fog_color.w > 0.5) {
        let dist = distance(in.world_position, uniforms.camera_pos.xyz);
        let fog = smoothstep(uniforms.fog_range.x, uniforms.fog_range.y, dist);
        rgb = mix(rgb, uniforms.fog_color.rgb, fog);
    }

    return vec4<f32>(rgb, in.color.a);
}
"#;
