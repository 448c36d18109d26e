//! Integration tests for deserializing bone definitions
#![cfg(feature = "serde")]

use glam::Vec3;
use pretty_assertions::assert_eq;
use rig_skeleton::{BoneDefinition, CuboidFace, FaceDirection, PolyType, UvRotation, compile};

#[test]
fn test_bone_list_from_json() {
    let json = r#"[
        {
            "name": "body",
            "pivot": [0.0, 24.0, 0.0],
            "cuboids": [
                {
                    "origin": [-4.0, 12.0, -2.0],
                    "size": [8.0, 12.0, 4.0],
                    "faces": [
                        null,
                        { "uv": [20.0, 16.0], "uv_size": [8.0, 4.0], "rotation": 90, "material": "texture" },
                        null, null, null, null
                    ]
                }
            ]
        },
        {
            "name": "head",
            "parent": "body",
            "poly_mesh": {
                "normalized_uvs": true,
                "positions": [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
                "normals": [[0.0, 0.0, 1.0]],
                "uvs": [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
                "polys": [{ "positions": [0, 1, 2], "normals": [0, 0, 0], "uvs": [0, 1, 2] }],
                "poly_type": "tri_list"
            }
        }
    ]"#;

    let bones: Vec<BoneDefinition> = serde_json::from_str(json).unwrap();
    assert_eq!(bones[0].pivot, Vec3::new(0.0, 24.0, 0.0));
    let up = bones[0].cuboids[0].face(FaceDirection::Up).unwrap();
    assert_eq!(up.rotation, UvRotation::Rot90);
    assert_eq!(
        bones[1].poly_mesh.as_ref().map(|m| m.poly_type),
        Some(PolyType::Triangles)
    );

    let tree = compile(64, 64, &bones).unwrap();
    assert_eq!(tree.bone("body").unwrap().polygons().len(), 1);
    assert_eq!(tree.bone("head").unwrap().polygons().len(), 1);
}

#[test]
fn test_uv_rotation_is_written_in_degrees() {
    let face: CuboidFace = serde_json::from_str(
        r#"{ "uv": [0.0, 0.0], "uv_size": [4.0, 4.0], "rotation": 270, "material": "texture" }"#,
    )
    .unwrap();
    assert_eq!(face.rotation, UvRotation::Rot270);

    let json = serde_json::to_value(UvRotation::Rot180).unwrap();
    assert_eq!(json, serde_json::json!(180));

    let err = serde_json::from_str::<UvRotation>("45").unwrap_err();
    assert!(err.to_string().contains("multiple of 90"), "{err}");
}
