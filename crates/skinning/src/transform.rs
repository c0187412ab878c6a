use glam::Mat4;
use skinning_asset::node::NodeAsset;

/// Local transform of a node in its rest pose.
///
/// A matrix node returns its matrix verbatim, otherwise `T * R * S` is
/// composed from the decomposed fields.
#[inline]
pub fn local_transform(node: &NodeAsset) -> Mat4 {
    node.matrix()
}

/// Fill `locals` with the rest-pose local transform of every node.
pub fn compute_local_transforms(nodes: &[NodeAsset], locals: &mut Vec<Mat4>) {
    locals.clear();
    locals.extend(nodes.iter().map(local_transform));
}

/// Accumulate global transforms from `roots` down to the leaves.
///
/// Every node reachable from a root gets `parent global * local`, written
/// once, after its parent. Nodes not reachable from `roots` keep identity.
/// `locals` must cover the node table and child indices must be in range.
pub fn compute_global_transforms(
    nodes: &[NodeAsset],
    roots: &[usize],
    parent: Mat4,
    locals: &[Mat4],
    globals: &mut Vec<Mat4>,
) {
    globals.clear();
    globals.resize(nodes.len(), Mat4::IDENTITY);

    let mut stack: Vec<(usize, Mat4)> = roots.iter().rev().map(|&root| (root, parent)).collect();
    while let Some((index, parent)) = stack.pop() {
        let global = parent * locals[index];
        globals[index] = global;
        // Reversed so children are visited in declaration order
        stack.extend(nodes[index].children.iter().rev().map(|&child| (child, global)));
    }
}

#[cfg(test)]
mod test {
    use glam::{Mat4, Quat, Vec3};
    use skinning_asset::node::{DecomposedTransform, NodeAsset, NodeTransform};

    use super::{compute_global_transforms, compute_local_transforms, local_transform};

    fn translate(x: f32) -> NodeAsset {
        NodeAsset::new(NodeTransform::Decomposed(DecomposedTransform {
            translation: Vec3::new(x, 0.0, 0.0),
            ..Default::default()
        }))
    }

    #[test]
    fn test_matrix_node_returned_unchanged() {
        let matrix = Mat4::from_cols_array(&[
            1.0, 2.0, 3.0, 0.0, 4.0, 5.0, 6.0, 0.0, 7.0, 8.0, 9.0, 0.0, 1.0, 1.0, 1.0, 1.0,
        ]);
        assert_eq!(
            local_transform(&NodeAsset::new(NodeTransform::Matrix(matrix))),
            matrix
        );
    }

    #[test]
    fn test_absent_fields_default_to_identity() {
        let node = NodeAsset::new(NodeTransform::Decomposed(DecomposedTransform {
            rotation: Quat::from_rotation_x(1.0),
            ..Default::default()
        }));
        assert!(local_transform(&node).abs_diff_eq(Mat4::from_rotation_x(1.0), 1e-6));
    }

    #[test]
    fn test_three_level_chain() {
        let nodes = vec![
            translate(1.0).with_children([1]),
            translate(1.0).with_children([2]),
            translate(1.0),
        ];
        let mut locals = Vec::new();
        let mut globals = Vec::new();
        compute_local_transforms(&nodes, &mut locals);
        compute_global_transforms(&nodes, &[0], Mat4::IDENTITY, &locals, &mut globals);

        assert_eq!(
            globals[2].transform_point3(Vec3::ZERO),
            Vec3::new(3.0, 0.0, 0.0)
        );
        assert_eq!(globals[1].w_axis.x, 2.0);
    }

    #[test]
    fn test_unreachable_nodes_keep_identity() {
        let nodes = vec![
            translate(1.0).with_children([1]),
            translate(2.0),
            translate(4.0),
        ];
        let mut locals = Vec::new();
        let mut globals = Vec::new();
        compute_local_transforms(&nodes, &mut locals);
        compute_global_transforms(
            &nodes,
            &[1],
            Mat4::from_translation(Vec3::Y),
            &locals,
            &mut globals,
        );

        assert_eq!(globals[0], Mat4::IDENTITY);
        assert_eq!(globals[2], Mat4::IDENTITY);
        assert_eq!(
            globals[1].transform_point3(Vec3::ZERO),
            Vec3::new(2.0, 1.0, 0.0)
        );
    }

    #[test]
    fn test_deep_hierarchy() {
        let depth = 10_000;
        let nodes: Vec<NodeAsset> = (0..depth)
            .map(|index| {
                let node = translate(0.5);
                if index + 1 < depth {
                    node.with_children([index + 1])
                } else {
                    node
                }
            })
            .collect();
        let mut locals = Vec::new();
        let mut globals = Vec::new();
        compute_local_transforms(&nodes, &mut locals);
        compute_global_transforms(&nodes, &[0], Mat4::IDENTITY, &locals, &mut globals);

        assert_eq!(globals[depth - 1].w_axis.x, 0.5 * depth as f32);
    }
}
