//! Bone graph compilation
//!
//! Turns a flat, name-referenced list of [`BoneDefinition`]s into a
//! [`CompiledTree`]: an arena of [`CompiledBone`]s linked by [`BoneId`].
//! Validation (duplicate names, unknown parents, cycles, malformed poly
//! meshes) runs in full before any geometry is generated.

use std::collections::HashMap;

use crate::bone::{BoneId, CompiledBone, TransformSource};
use crate::definition::BoneDefinition;
use crate::error::{CompileError, Result};
use crate::locator::{LocatorTracker, LocatorTransformation};
use crate::matrix_stack::MatrixStack;
use crate::mesher::{TextureSize, mesh_cuboid, mesh_poly_mesh};
use crate::render::GeometryRenderer;

/// Parent prefix meaning "attached to the model itself"
pub const DEFAULT_ROOT_MARKER: &str = "parent.";

/// Options controlling skeleton compilation
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CompileOptions {
    /// Texture width in pixels, used to normalize UVs
    pub texture_width: u32,
    /// Texture height in pixels, used to normalize UVs
    pub texture_height: u32,
    /// Parent names starting with this prefix make a bone a root
    pub root_marker: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            texture_width: 64,
            texture_height: 64,
            root_marker: DEFAULT_ROOT_MARKER.to_string(),
        }
    }
}

impl CompileOptions {
    pub fn with_texture_size(mut self, width: u32, height: u32) -> Self {
        self.texture_width = width;
        self.texture_height = height;
        self
    }

    pub fn texture_size(&self) -> TextureSize {
        TextureSize::new(self.texture_width, self.texture_height)
    }
}

/// Compile bones using the default root marker
pub fn compile(texture_width: u32, texture_height: u32, bones: &[BoneDefinition]) -> Result<CompiledTree> {
    let options = CompileOptions::default().with_texture_size(texture_width, texture_height);
    compile_with_options(&options, bones)
}

/// Compile bones into a validated tree
pub fn compile_with_options(options: &CompileOptions, bones: &[BoneDefinition]) -> Result<CompiledTree> {
    let mut by_name = HashMap::with_capacity(bones.len());
    for (index, bone) in bones.iter().enumerate() {
        if by_name.insert(bone.name.clone(), BoneId(index)).is_some() {
            return Err(CompileError::DuplicateBone(bone.name.clone()));
        }
    }

    for bone in bones {
        if let Some(mesh) = &bone.poly_mesh {
            mesh.validate().map_err(|reason| CompileError::InvalidPolyMesh {
                bone: bone.name.clone(),
                reason,
            })?;
        }
    }

    let mut parents = vec![None; bones.len()];
    let mut children: Vec<Vec<BoneId>> = vec![Vec::new(); bones.len()];
    let mut roots = Vec::new();
    for (index, bone) in bones.iter().enumerate() {
        let parent = match &bone.parent {
            Some(parent) if !bone.is_root(&options.root_marker) => parent,
            _ => {
                roots.push(BoneId(index));
                continue;
            }
        };
        let Some(&parent_id) = by_name.get(parent) else {
            return Err(CompileError::UnknownParent {
                bone: bone.name.clone(),
                parent: parent.clone(),
            });
        };
        parents[index] = Some(parent_id);
        children[parent_id.index()].push(BoneId(index));
    }

    detect_cycles(bones, &children)?;

    let texture = options.texture_size();
    let compiled: Vec<CompiledBone> = bones
        .iter()
        .enumerate()
        .map(|(index, definition)| {
            let mut polygons: Vec<_> = definition
                .cuboids
                .iter()
                .flat_map(|cuboid| mesh_cuboid(cuboid, definition.inflate, definition.mirror, texture))
                .collect();
            if let Some(mesh) = &definition.poly_mesh {
                polygons.extend(mesh_poly_mesh(mesh, texture));
            }

            let mut bone = CompiledBone::new(BoneId(index), definition.clone(), polygons);
            if let Some(parent) = parents[index] {
                bone.set_parent(parent);
            }
            for &child in &children[index] {
                bone.attach_child(child);
            }
            bone
        })
        .collect();

    let locators = LocatorTracker::new(&compiled);

    log::debug!(
        "Compiled {} bones ({} roots, {} polygons, {} locators)",
        compiled.len(),
        roots.len(),
        compiled.iter().map(|b| b.polygons().len()).sum::<usize>(),
        locators.len()
    );

    Ok(CompiledTree {
        bones: compiled,
        roots,
        by_name,
        locators,
        options: options.clone(),
    })
}

/// Walk every node's descendants; any revisit means the parent chain loops
fn detect_cycles(bones: &[BoneDefinition], children: &[Vec<BoneId>]) -> Result<()> {
    let mut visited = vec![false; bones.len()];
    let mut pending = Vec::new();

    for start in 0..bones.len() {
        visited.fill(false);
        visited[start] = true;
        pending.clear();
        pending.extend_from_slice(&children[start]);

        while let Some(id) = pending.pop() {
            if visited[id.index()] {
                return Err(CompileError::CircularReference(bones[start].name.clone()));
            }
            visited[id.index()] = true;
            pending.extend_from_slice(&children[id.index()]);
        }
    }
    Ok(())
}

/// A compiled skeleton instance
#[derive(Debug, Clone)]
pub struct CompiledTree {
    bones: Vec<CompiledBone>,
    roots: Vec<BoneId>,
    by_name: HashMap<String, BoneId>,
    locators: LocatorTracker,
    options: CompileOptions,
}

impl Default for CompiledTree {
    fn default() -> Self {
        Self::empty()
    }
}

impl CompiledTree {
    /// A tree with no bones
    pub fn empty() -> Self {
        Self {
            bones: Vec::new(),
            roots: Vec::new(),
            by_name: HashMap::new(),
            locators: LocatorTracker::default(),
            options: CompileOptions::default(),
        }
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    pub fn bone_id(&self, name: &str) -> Option<BoneId> {
        self.by_name.get(name).copied()
    }

    pub fn bone(&self, name: &str) -> Option<&CompiledBone> {
        self.bone_id(name).and_then(|id| self.get(id))
    }

    pub fn bone_mut(&mut self, name: &str) -> Option<&mut CompiledBone> {
        let id = self.bone_id(name)?;
        self.get_mut(id)
    }

    pub fn get(&self, id: BoneId) -> Option<&CompiledBone> {
        self.bones.get(id.index())
    }

    pub fn get_mut(&mut self, id: BoneId) -> Option<&mut CompiledBone> {
        self.bones.get_mut(id.index())
    }

    /// Every bone, in definition order
    pub fn bones(&self) -> &[CompiledBone] {
        &self.bones
    }

    pub fn bones_mut(&mut self) -> &mut [CompiledBone] {
        &mut self.bones
    }

    pub fn roots(&self) -> &[BoneId] {
        &self.roots
    }

    pub fn root_bones(&self) -> impl Iterator<Item = &CompiledBone> {
        self.roots.iter().filter_map(|&id| self.get(id))
    }

    /// Put every bone back in its rest pose
    pub fn reset_transformation(&mut self) {
        for bone in &mut self.bones {
            bone.reset_transform();
        }
    }

    /// Make every bone declared under `parent` mimic `source`
    ///
    /// `None` selects bones declared without a parent.
    pub fn copy_angles(&mut self, parent: Option<&str>, source: &(impl TransformSource + ?Sized)) {
        for bone in &mut self.bones {
            if bone.definition().parent.as_deref() == parent {
                bone.copy_transform(source);
            }
        }
    }

    /// Depth-first pass over visible bones, one call per polygon
    pub fn render(&self, renderer: &mut impl GeometryRenderer, stack: &mut MatrixStack) {
        for &root in &self.roots {
            self.render_bone(root, renderer, stack);
        }
    }

    fn render_bone(&self, id: BoneId, renderer: &mut impl GeometryRenderer, stack: &mut MatrixStack) {
        let Some(bone) = self.get(id) else {
            return;
        };
        if !bone.is_visible() || (bone.polygons().is_empty() && bone.children().is_empty()) {
            return;
        }

        stack.push();
        bone.translate_and_rotate(stack);
        bone.apply_copy_offset(stack);

        for polygon in bone.polygons() {
            renderer.render(stack, polygon);
        }
        for &child in bone.children() {
            self.render_bone(child, renderer, stack);
        }

        stack.pop();
    }

    /// Recompute locator matrices from the current poses
    pub fn update_locators(&mut self) {
        self.locators.update(&self.bones, &self.roots);
    }

    pub fn locator_transformation(&self, name: &str) -> Option<&LocatorTransformation> {
        self.locators.get(name)
    }

    pub fn locators(&self) -> impl Iterator<Item = &LocatorTransformation> {
        self.locators.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_empty_input() {
        let tree = compile(64, 64, &[]).unwrap();
        assert!(tree.is_empty());
        assert_eq!(tree.root_bones().count(), 0);
    }

    #[test]
    fn test_self_parent_is_circular() {
        let bones = [BoneDefinition::new("loop").with_parent("loop")];
        assert_eq!(
            compile(64, 64, &bones).unwrap_err(),
            CompileError::CircularReference("loop".to_string())
        );
    }

    #[test]
    fn test_custom_root_marker() {
        let options = CompileOptions {
            root_marker: "model.".to_string(),
            ..CompileOptions::default()
        };
        let bones = [BoneDefinition::new("body").with_parent("model.root")];
        let tree = compile_with_options(&options, &bones).unwrap();
        assert_eq!(tree.roots(), &[BoneId(0)]);

        let err = compile(64, 64, &bones).unwrap_err();
        assert!(matches!(err, CompileError::UnknownParent { .. }));
    }

    #[test]
    fn test_copy_angles_by_parent() {
        let bones = [
            BoneDefinition::new("body"),
            BoneDefinition::new("left").with_parent("body"),
            BoneDefinition::new("right").with_parent("body"),
        ];
        let mut tree = compile(64, 64, &bones).unwrap();
        tree.copy_angles(Some("body"), &|stack: &mut MatrixStack| stack.translate(Vec3::X));

        assert!(tree.bone("body").is_some_and(|b| b.copied_transform().is_none()));
        assert!(tree.bone("left").is_some_and(|b| b.copied_transform().is_some()));
        assert!(tree.bone("right").is_some_and(|b| b.copied_transform().is_some()));

        tree.reset_transformation();
        assert!(tree.bones().iter().all(|b| b.copied_transform().is_none()));
    }
}
