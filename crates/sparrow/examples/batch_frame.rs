//! Draws a few frames of a crowd of armatures and prints what reached the
//! renderer.
//!
//! Run with `RUST_LOG=trace` to see every flush.

use glam::{Mat4, Vec2, Vec3};
use sparrow::core::profiling::{self, ProfilingMode};
use sparrow::prelude::*;
use sparrow::render::UvRect;

const CROWD: usize = 4_000;
const SKINS_PER_ARMATURE: usize = 6;

fn skin(index: usize) -> Skin {
    let quad = Quad::from_rect(
        Vec2::ZERO,
        Vec2::new(16.0, 32.0),
        0.0,
        UvRect::FULL,
        Color::WHITE,
    );
    Skin::new(quad).with_bone_transform(Mat4::from_translation(Vec3::new(
        0.0,
        index as f32 * 8.0,
        0.0,
    )))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    sparrow::init(
        &Config::default()
            .with_log_filter("info,sparrow=debug")
            .with_profiling(ProfilingMode::On),
    );

    let shaders = ShaderCache::with_builtin_programs();
    let mut batch = BatchNode::create(&shaders, &BatchConfig::default())?;

    for i in 0..CROWD {
        let mut armature = Armature::create(format!("soldier-{i}"), &shaders)?;
        armature.set_texture(Some(TextureId::new(1)));
        armature.set_transform(Mat4::from_translation(Vec3::new(
            (i % 64) as f32 * 20.0,
            (i / 64) as f32 * 40.0,
            0.0,
        )));
        for s in 0..SKINS_PER_ARMATURE {
            armature.add_skin(skin(s));
        }
        batch.add_child_with_z(armature, (i % 3) as i32);
    }

    let mut transforms = TransformStack::with_root(Mat4::orthographic_rh(
        0.0, 1280.0, 0.0, 720.0, -1.0, 1.0,
    ));
    let mut queue = CommandQueue::new();

    for frame in 0..3 {
        profiling::new_frame();
        batch.visit(&mut VisitContext::new(&mut transforms, &mut queue))?;

        let mut commands = 0;
        let mut quads = 0;
        queue.consume(|command| {
            commands += 1;
            quads += command.quad_count();
        });
        tracing::info!(frame, commands, quads, "frame submitted");
    }

    tracing::info!(
        allocated = queue.pool().allocated(),
        "command pool after steady-state frames"
    );
    Ok(())
}
