//! Batch node traversal (no GPU required).
//!
//! Armatures and sprites are attached to a `BatchNode`, the node is visited
//! against a recording renderer, and the emitted commands are checked against
//! the quads left in the node's shared buffer.

use glam::{Mat4, Vec2, Vec3};
use sparrow_render::{BatchConfig, BatchError, ShaderCache, TextureId};
use sparrow_scene::{
    Armature, BatchNode, Node, SceneError, Skin, Sprite, TransformStack, VisitContext,
};
use sparrow_test_utils::{MockRenderer, assert_partitions, quad_at};

const MAXQ: usize = 256;

fn shaders() -> ShaderCache {
    ShaderCache::with_builtin_programs()
}

fn batch(shaders: &ShaderCache) -> BatchNode {
    let config = BatchConfig::default().with_slot_budget(MAXQ + 1);
    BatchNode::create(shaders, &config).unwrap()
}

/// An armature with one unit skin per entry of `xs`, placed at `(x, 0)`.
fn armature(shaders: &ShaderCache, texture: u32, xs: &[f32]) -> Armature {
    let mut armature = Armature::create(format!("armature-{texture}"), shaders).unwrap();
    armature.set_texture(Some(TextureId::new(texture)));
    for &x in xs {
        armature.add_skin(Skin::new(quad_at(x, 0.0)));
    }
    armature
}

fn armature_with(shaders: &ShaderCache, quads: usize) -> Armature {
    let xs: Vec<f32> = (0..quads).map(|i| i as f32).collect();
    armature(shaders, 1, &xs)
}

fn visit(node: &mut BatchNode, transforms: &mut TransformStack, renderer: &mut MockRenderer) {
    node.visit(&mut VisitContext::new(transforms, renderer)).unwrap();
}

/// x of the bottom-left corner of every quad the batch node emitted, in order.
fn emitted_xs(node: &BatchNode, renderer: &MockRenderer) -> Vec<f32> {
    renderer
        .commands()
        .iter()
        .filter(|command| command.source == node.quad_buffer().id())
        .flat_map(|command| node.quad_buffer().resolve(command.quads).unwrap())
        .map(|quad| quad.bl.position[0])
        .collect()
}

#[test]
fn test_attach_and_detach_back_reference() {
    let shaders = shaders();
    let mut node = batch(&shaders);

    let id = node.add_child(armature(&shaders, 1, &[0.0]));
    let container = node
        .child(id)
        .and_then(|child| child.as_batchable())
        .and_then(|batchable| batchable.batch_container());
    assert_eq!(container, Some(node.id()));

    let removed = node.remove_child(id).unwrap();
    let container = removed
        .as_batchable()
        .and_then(|batchable| batchable.batch_container());
    assert_eq!(container, None);
    assert_eq!(node.children_count(), 0);
}

#[test]
fn test_remove_by_tag_and_remove_all_clear_back_references() {
    let shaders = shaders();
    let mut node = batch(&shaders);
    node.add_child_with_tag(armature(&shaders, 1, &[0.0]), 0, 7);
    node.add_child(armature(&shaders, 2, &[1.0]));
    node.add_child(armature(&shaders, 3, &[2.0]));

    assert!(node.child_by_tag(7).is_some());
    let tagged = node.remove_child_by_tag(7).unwrap();
    assert!(tagged.as_batchable().unwrap().batch_container().is_none());
    assert!(node.child_by_tag(7).is_none());
    assert!(node.remove_child_by_tag(7).is_none());

    let rest = node.remove_all_children();
    assert_eq!(rest.len(), 2);
    for child in &rest {
        assert!(child.as_batchable().unwrap().batch_container().is_none());
    }
    assert_eq!(node.children_count(), 0);
}

#[test]
fn test_non_batchable_child_draws_itself() {
    let shaders = shaders();
    let mut node = batch(&shaders);
    let sprite = Sprite::create(TextureId::new(9), Vec2::ONE, &shaders).unwrap();
    let sprite_id = node.add_child_with_z(sprite, -1);
    node.add_child(armature(&shaders, 1, &[0.0, 1.0]));

    assert!(node.child(sprite_id).unwrap().as_batchable().is_none());

    let mut transforms = TransformStack::new();
    let mut renderer = MockRenderer::new();
    visit(&mut node, &mut transforms, &mut renderer);

    let commands = renderer.commands();
    assert_eq!(commands.len(), 2);
    // The sprite drew during dispatch, the batch at flush
    assert_eq!(commands[0].texture, TextureId::new(9));
    assert_ne!(commands[0].source, node.quad_buffer().id());
    assert_eq!(commands[1].texture, TextureId::new(1));
    assert_eq!(commands[1].quads.len, 2);
    // The sprite never became the shared texture
    assert_eq!(node.texture(), Some(TextureId::new(1)));
}

#[test]
fn test_children_dispatch_in_z_then_arrival_order() {
    let shaders = shaders();
    let mut node = batch(&shaders);
    node.add_child_with_z(armature(&shaders, 1, &[10.0]), 2);
    node.add_child_with_z(armature(&shaders, 2, &[-10.0]), -1);
    node.add_child_with_z(armature(&shaders, 3, &[20.0]), 2);

    let mut transforms = TransformStack::new();
    let mut renderer = MockRenderer::new();
    visit(&mut node, &mut transforms, &mut renderer);

    assert_eq!(emitted_xs(&node, &renderer), vec![-10.0, 10.0, 20.0]);
    // The shared texture follows the last batchable child that drew
    assert_eq!(renderer.commands()[0].texture, TextureId::new(3));
}

#[test]
fn test_children_added_between_frames_keep_insertion_order() {
    let shaders = shaders();
    let mut node = batch(&shaders);
    node.add_child_with_z(armature(&shaders, 1, &[1.0]), 0);
    node.add_child_with_z(armature(&shaders, 1, &[2.0]), 0);

    let mut transforms = TransformStack::new();
    let mut renderer = MockRenderer::new();
    visit(&mut node, &mut transforms, &mut renderer);
    assert_eq!(emitted_xs(&node, &renderer), vec![1.0, 2.0]);

    node.add_child_with_z(armature(&shaders, 1, &[3.0]), 0);
    renderer.reset();
    visit(&mut node, &mut transforms, &mut renderer);
    assert_eq!(emitted_xs(&node, &renderer), vec![1.0, 2.0, 3.0]);

    // A lower z still jumps ahead of older siblings
    node.add_child_with_z(armature(&shaders, 1, &[4.0]), -1);
    renderer.reset();
    visit(&mut node, &mut transforms, &mut renderer);
    assert_eq!(emitted_xs(&node, &renderer), vec![4.0, 1.0, 2.0, 3.0]);
}

#[test]
fn test_own_arrival_stamp_resets_after_visit() {
    let shaders = shaders();
    let mut node = batch(&shaders);
    node.add_child(armature(&shaders, 1, &[1.0]));
    node.set_order_of_arrival(9);

    let mut transforms = TransformStack::new();
    let mut renderer = MockRenderer::new();
    visit(&mut node, &mut transforms, &mut renderer);

    assert_eq!(node.order_of_arrival(), 0);
}

#[test]
fn test_reorder_child_between_frames() {
    let shaders = shaders();
    let mut node = batch(&shaders);
    let first = node.add_child(armature(&shaders, 1, &[1.0]));
    node.add_child(armature(&shaders, 1, &[2.0]));

    node.reorder_child(first, 5).unwrap();

    let mut transforms = TransformStack::new();
    let mut renderer = MockRenderer::new();
    visit(&mut node, &mut transforms, &mut renderer);
    assert_eq!(emitted_xs(&node, &renderer), vec![2.0, 1.0]);
    assert_eq!(node.child(first).unwrap().z_order(), 5);
}

#[test]
fn test_three_quads_one_command() {
    let shaders = shaders();
    let mut node = batch(&shaders);
    node.add_child(armature_with(&shaders, 3));

    let mut transforms = TransformStack::new();
    let mut renderer = MockRenderer::new();
    visit(&mut node, &mut transforms, &mut renderer);

    assert_eq!(renderer.chunk_lengths(), vec![3]);
    assert_eq!(node.last_flush_stats().quads, 3);
    assert!(node.quad_buffer().is_empty());
}

#[test]
fn test_257_quads_split_at_chunk_size() {
    let shaders = shaders();
    let mut node = batch(&shaders);
    node.add_child(armature_with(&shaders, 100));
    node.add_child(armature_with(&shaders, 157));

    let mut transforms = TransformStack::new();
    let mut renderer = MockRenderer::new();
    visit(&mut node, &mut transforms, &mut renderer);

    assert_eq!(renderer.chunk_lengths(), vec![MAXQ, 1]);
    assert_partitions(&renderer.commands(), 257);
    assert_eq!(node.quad_buffer().total_count(), 0);
}

#[test]
fn test_empty_batch_emits_nothing() {
    let shaders = shaders();
    let mut node = batch(&shaders);

    let mut transforms = TransformStack::new();
    let mut renderer = MockRenderer::new();
    visit(&mut node, &mut transforms, &mut renderer);

    assert_eq!(renderer.count_commands(), 0);
    assert_eq!(node.texture(), None);
}

#[test]
fn test_invisible_batch_is_skipped() {
    let shaders = shaders();
    let mut node = batch(&shaders);
    node.add_child(armature_with(&shaders, 4));
    node.set_visible(false);

    let mut transforms = TransformStack::new();
    let mut renderer = MockRenderer::new();
    visit(&mut node, &mut transforms, &mut renderer);

    assert!(renderer.calls().is_empty());
    assert_eq!(transforms.depth(), 1);
}

#[test]
fn test_invisible_armature_contributes_nothing() {
    let shaders = shaders();
    let mut node = batch(&shaders);
    let mut hidden = armature_with(&shaders, 4);
    hidden.set_visible(false);
    node.add_child(hidden);
    node.add_child(armature_with(&shaders, 2));

    let mut transforms = TransformStack::new();
    let mut renderer = MockRenderer::new();
    visit(&mut node, &mut transforms, &mut renderer);

    assert_eq!(renderer.chunk_lengths(), vec![2]);
}

#[test]
fn test_missing_texture_propagates_and_restores_transform() {
    let shaders = shaders();
    let mut node = batch(&shaders);
    let mut untextured = armature_with(&shaders, 2);
    untextured.set_texture(None);
    node.add_child(untextured);

    let mut transforms = TransformStack::new();
    let mut renderer = MockRenderer::new();
    let result = node.visit(&mut VisitContext::new(&mut transforms, &mut renderer));

    assert_eq!(
        result,
        Err(SceneError::Batch(BatchError::MissingTexture { quads: 2 }))
    );
    assert_eq!(transforms.depth(), 1);
    assert_eq!(renderer.count_commands(), 0);
    assert!(node.quad_buffer().is_empty());
}

#[test]
fn test_commands_carry_container_state() {
    let shaders = shaders();
    let mut node = batch(&shaders);
    node.set_transform(Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0)));
    node.set_vertex_z(3.5);
    node.add_child(armature_with(&shaders, 1));

    let view = Mat4::from_scale(Vec3::splat(2.0));
    let mut transforms = TransformStack::with_root(view);
    let mut renderer = MockRenderer::new();
    visit(&mut node, &mut transforms, &mut renderer);

    let command = renderer.commands()[0].clone();
    assert_eq!(
        command.transform,
        view * Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0))
    );
    assert_eq!(command.depth, 3.5);
    assert_eq!(command.shader, node.shader());
    assert_eq!(command.blend, node.blend_mode());
    assert_eq!(command.global_order, 0);
}

#[test]
fn test_steady_state_frames_reuse_commands() {
    let shaders = shaders();
    let mut node = batch(&shaders);
    node.add_child(armature_with(&shaders, 300));

    let mut transforms = TransformStack::new();
    let mut renderer = MockRenderer::new();
    for _ in 0..3 {
        visit(&mut node, &mut transforms, &mut renderer);
    }

    assert_eq!(renderer.count_commands(), 6);
    assert_eq!(renderer.pool_allocated(), 1);
}

#[test]
fn test_nested_batch_node_draws_itself() {
    let shaders = shaders();
    let mut inner = batch(&shaders);
    inner.add_child(armature(&shaders, 5, &[0.0]));
    let inner_buffer = inner.quad_buffer().id();

    let mut outer = batch(&shaders);
    outer.add_child_with_z(inner, 1);
    outer.add_child(armature(&shaders, 6, &[1.0, 2.0]));

    let mut transforms = TransformStack::new();
    let mut renderer = MockRenderer::new();
    visit(&mut outer, &mut transforms, &mut renderer);

    let commands = renderer.commands();
    assert_eq!(commands.len(), 2);
    assert_eq!(commands[0].source, inner_buffer);
    assert_eq!(commands[0].texture, TextureId::new(5));
    assert_eq!(commands[1].source, outer.quad_buffer().id());
    assert_eq!(commands[1].quads.len, 2);
}
