//! Compile a small humanoid, blend a walk cycle with a head turn and print
//! where the hand locator ends up over one second.
//!
//! Run with `RUST_LOG=debug cargo run --example walk_cycle`.

use std::sync::Arc;

use anyhow::{Context, Result};
use glam::{Vec2, Vec3};
use rig_animation::{
    AnimationBlender, AnimationData, AnimationTrack, Channel, Easing, KeyFrame, LoopMode, Scalar,
};
use rig_skeleton::{BoneDefinition, Cuboid, Locator, MatrixStack, Polygon, compile};

fn skeleton() -> Vec<BoneDefinition> {
    vec![
        BoneDefinition::new("body")
            .with_parent("parent.root")
            .with_pivot(Vec3::new(0.0, 24.0, 0.0))
            .with_cuboid(
                Cuboid::new(Vec3::new(-4.0, 12.0, -2.0), Vec3::new(8.0, 12.0, 4.0))
                    .with_box_uv(Vec2::new(16.0, 16.0)),
            ),
        BoneDefinition::new("head")
            .with_parent("body")
            .with_pivot(Vec3::new(0.0, 24.0, 0.0))
            .with_cuboid(
                Cuboid::new(Vec3::new(-4.0, 24.0, -4.0), Vec3::splat(8.0))
                    .with_box_uv(Vec2::ZERO),
            ),
        BoneDefinition::new("right_arm")
            .with_parent("body")
            .with_pivot(Vec3::new(-5.0, 22.0, 0.0))
            .with_cuboid(
                Cuboid::new(Vec3::new(-8.0, 12.0, -2.0), Vec3::new(4.0, 12.0, 4.0))
                    .with_box_uv(Vec2::new(40.0, 16.0)),
            )
            .with_locator(Locator::new("right_hand", Vec3::new(-6.0, 12.0, 0.0))),
        BoneDefinition::new("left_arm")
            .with_parent("body")
            .with_pivot(Vec3::new(5.0, 22.0, 0.0))
            .with_mirror(true)
            .with_cuboid(
                Cuboid::new(Vec3::new(4.0, 12.0, -2.0), Vec3::new(4.0, 12.0, 4.0))
                    .with_box_uv(Vec2::new(40.0, 16.0)),
            ),
    ]
}

fn swing(degrees: f32) -> Result<Channel> {
    Ok(Channel::new(vec![
        KeyFrame::constant(0.0, Vec3::new(degrees, 0.0, 0.0)),
        KeyFrame::constant(0.5, Vec3::new(-degrees, 0.0, 0.0)).with_easing(Easing::CatmullRom),
        KeyFrame::constant(1.0, Vec3::new(degrees, 0.0, 0.0)).with_easing(Easing::CatmullRom),
    ])?)
}

fn main() -> Result<()> {
    env_logger::init();

    let mut tree = compile(64, 64, &skeleton()).context("compiling skeleton")?;

    let walk = AnimationData::new("walk", 1.0)
        .with_loop_mode(LoopMode::Loop)
        .with_track(AnimationTrack::new("right_arm").with_rotation(swing(30.0)?))
        .with_track(AnimationTrack::new("left_arm").with_rotation(swing(-30.0)?));

    let look = AnimationData::new("look_around", 2.0)
        .with_loop_mode(LoopMode::HoldOnLastFrame)
        .with_blend_weight(Scalar::expression("variable.look_weight"))
        .with_track(AnimationTrack::new("head").with_rotation(Channel::new(vec![
            KeyFrame::constant(0.0, Vec3::ZERO),
            KeyFrame::constant(2.0, Vec3::new(0.0, 45.0, 0.0)).with_easing(Easing::InOutCubic),
        ])?));

    let env = |expression: &str, this: f32| -> f32 {
        match expression {
            "variable.look_weight" => 0.5 * this,
            _ => 0.0,
        }
    };

    let mut blender = AnimationBlender::new();
    blender.play(Arc::new(walk));
    blender.play(Arc::new(look));

    let mut stack = MatrixStack::new();
    for frame in 0..=10 {
        blender.apply(&mut tree, &env);
        tree.update_locators();

        let mut polygons = 0usize;
        tree.render(
            &mut |_: &MatrixStack, _: &Polygon| polygons += 1,
            &mut stack,
        );

        let hand = tree
            .locator_transformation("right_hand")
            .context("right_hand locator")?
            .position();
        println!(
            "t={:.1}s polygons={} right_hand=({:.3}, {:.3}, {:.3})",
            frame as f32 * 0.1,
            polygons,
            hand.x,
            hand.y,
            hand.z
        );

        blender.tick(0.1);
    }

    Ok(())
}
