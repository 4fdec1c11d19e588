//! Both embedded WGSL programs must parse and validate with naga.

use drizzle::shader::{PARTICLE_SHADER, SCENE_SHADER};

fn validate_wgsl(source: &str) -> Result<naga::Module, String> {
    let module = naga::front::wgsl::parse_str(source)
        .map_err(|e| format!("WGSL parse error: {:?}", e))?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    validator
        .validate(&module)
        .map_err(|e| format!("WGSL validation error: {:?}", e))?;

    Ok(module)
}

fn entry_points(module: &naga::Module) -> Vec<(&str, naga::ShaderStage)> {
    module
        .entry_points
        .iter()
        .map(|ep| (ep.name.as_str(), ep.stage))
        .collect()
}

#[test]
fn test_particle_shader_validates() {
    let module = validate_wgsl(PARTICLE_SHADER).expect("particle shader should be valid");
    let entries = entry_points(&module);
    assert!(entries.contains(&("vs_main", naga::ShaderStage::Vertex)));
    assert!(entries.contains(&("fs_main", naga::ShaderStage::Fragment)));
}

#[test]
fn test_scene_shader_validates() {
    let module = validate_wgsl(SCENE_SHADER).expect("scene shader should be valid");
    let entries = entry_points(&module);
    assert!(entries.contains(&("vs_main", naga::ShaderStage::Vertex)));
    assert!(entries.contains(&("fs_main", naga::ShaderStage::Fragment)));
}

#[test]
fn test_particle_uniform_block_matches_rust_layout() {
    let module = validate_wgsl(PARTICLE_SHADER).expect("particle shader should be valid");

    let span = module
        .types
        .iter()
        .find_map(|(_, ty)| match (&ty.name, &ty.inner) {
            (Some(name), naga::TypeInner::Struct { span, .. }) if name == "ParticleUniforms" => {
                Some(*span)
            }
            _ => None,
        })
        .expect("ParticleUniforms struct should exist");

    assert_eq!(
        span as usize,
        std::mem::size_of::<drizzle::gpu::ParticleUniforms>()
    );
}
