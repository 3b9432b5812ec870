//! Tree operations: the only way an existing tree is mutated.
//!
//! Every operation takes a tree by reference and returns a new tree. Invalid
//! structural requests (unknown ids, drops onto leaves or objects, drops into
//! the moved node's own subtree, a key landing on a level that already has it)
//! are routine during drag-and-drop and return an unchanged clone instead of
//! an error.

use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{ContainerType, FieldType, LayoutType};
use crate::ids::{FieldId, IdGenerator};
use crate::node::{ArrayField, FieldNode, LayoutField, LeafField, NodeKind, ObjectField};
use crate::registry::FieldTypeRegistry;
use crate::tree::FieldTree;

/// Explicit drop target reported by the drag-and-drop layer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DropZone {
    #[serde(default)]
    pub parent_id: Option<FieldId>,
    #[serde(default)]
    pub index: usize,
    /// Field types the zone accepts; informational for the host.
    #[serde(default)]
    pub accepts: Vec<FieldType>,
}

#[must_use]
pub fn find_by_id<'a>(tree: &'a FieldTree, id: &FieldId) -> Option<&'a FieldNode> {
    tree.get(id)
}

/// Replace the node with `node.id`.
///
/// The existing node's `parent_id` and child list are kept: structure is
/// owned by the tree. Turning a node that still has children into a leaf is
/// refused. Returns an unchanged tree when the id is unknown, the node is
/// already equal, or its new key is taken at its property level.
#[must_use]
pub fn update_by_id(tree: &FieldTree, node: FieldNode) -> FieldTree {
    let Some(existing) = tree.get(&node.id) else {
        tracing::debug!(id = %node.id, "update: unknown field id");
        return tree.clone();
    };

    let parent = existing.parent_id.clone();
    let mut node = node;
    node.parent_id.clone_from(&parent);
    let children = existing.children().to_vec();
    match node.children_mut() {
        Some(list) => *list = children,
        None if !children.is_empty() => {
            tracing::debug!(id = %node.id, "update: refusing to turn a populated container into a leaf");
            return tree.clone();
        }
        None => {}
    }

    if &node == existing {
        return tree.clone();
    }

    let id = node.id.clone();
    let mut next = tree.clone();
    if let Some(slot) = next.node_mut(&id) {
        *slot = node;
    }
    if has_duplicate_keys(&next, parent.as_ref()) {
        tracing::debug!(%id, "update: key already used at this property level");
        return tree.clone();
    }
    next
}

/// Attach a fully formed node (with no children of its own) under `parent`
/// at `clamp(index, 0, len)`. No-op when its key is taken at that level.
#[must_use]
pub fn insert_node(
    tree: &FieldTree,
    node: FieldNode,
    parent: Option<&FieldId>,
    index: usize,
) -> FieldTree {
    if tree.contains(&node.id) || !accepts_drop(tree, parent) {
        tracing::debug!(id = %node.id, parent = ?parent, "insert: rejected drop target");
        return tree.clone();
    }
    let id = node.id.clone();
    let mut next = tree.clone();
    attach(&mut next, node, parent, index);
    if has_duplicate_keys(&next, parent) {
        tracing::debug!(%id, parent = ?parent, "insert: key already used at this property level");
        return tree.clone();
    }
    next
}

/// Materialize a palette entry and insert it.
///
/// The new node gets a fresh id, the registry's default schema and options,
/// and a `<type>_<n>` key that is free at the destination property level.
/// Objects are created wrapping a vertical layout so their children can be
/// dropped and reordered like any other container's. Returns the inserted id,
/// or `None` (and the unchanged tree) when the target rejects the drop or the
/// generator hands out an id the tree already holds.
pub fn insert_field(
    tree: &FieldTree,
    registry: &FieldTypeRegistry,
    field_type: FieldType,
    parent: Option<&FieldId>,
    index: usize,
    ids: &mut dyn IdGenerator,
) -> (FieldTree, Option<FieldId>) {
    if !accepts_drop(tree, parent) {
        tracing::debug!(%field_type, parent = ?parent, "insert: rejected drop target");
        return (tree.clone(), None);
    }
    let Some(def) = registry.get(field_type) else {
        tracing::debug!(%field_type, "insert: field type not registered");
        return (tree.clone(), None);
    };

    let taken = tree.property_keys(parent);
    let key = next_free_key(&taken, &field_type.as_str().replace('-', "_"), "_");
    let id = ids.next_id();
    if tree.contains(&id) {
        tracing::debug!(%id, "insert: generated id already in use");
        return (tree.clone(), None);
    }

    let kind = match field_type {
        FieldType::Control(control) => NodeKind::Leaf(LeafField {
            control,
            key,
            required: false,
            schema: def.default_schema.clone(),
        }),
        FieldType::Layout(layout) => NodeKind::Layout(LayoutField {
            layout,
            children: Vec::new(),
        }),
        FieldType::Container(ContainerType::Object) => NodeKind::Object(ObjectField {
            key,
            required: false,
            children: Vec::new(),
        }),
        FieldType::Container(ContainerType::Array) => NodeKind::Array(ArrayField {
            key,
            required: false,
            schema: def.default_schema.clone(),
            children: Vec::new(),
        }),
    };
    let mut node = FieldNode::new(id.clone(), def.label.clone(), kind);
    node.ui_options = def.default_ui_options.clone();
    let is_object = matches!(node.kind, NodeKind::Object(_));

    let mut next = tree.clone();
    attach(&mut next, node, parent, index);
    if is_object {
        let inner_id = ids.next_id();
        if next.contains(&inner_id) {
            tracing::debug!(id = %inner_id, "insert: generated id already in use");
            return (tree.clone(), None);
        }
        let inner = FieldNode::layout(inner_id, LayoutType::Vertical, "");
        attach(&mut next, inner, Some(&id), 0);
    }
    (next, Some(id))
}

/// Remove a node and its entire subtree.
#[must_use]
pub fn delete_by_id(tree: &FieldTree, id: &FieldId) -> FieldTree {
    if !tree.contains(id) {
        return tree.clone();
    }
    let mut next = tree.clone();
    detach(&mut next, id);
    for doomed in tree.subtree_ids(id) {
        next.take(&doomed);
    }
    next
}

/// Move `field_id` under `target_parent` (root for `None`) at
/// `clamp(target_index, 0, len)`, the index counted after detaching.
///
/// No-op when the field is unknown, the target is neither a layout nor an
/// array, the target sits inside the moved subtree, or a key the field
/// brings along is already used at the target's property level.
#[must_use]
pub fn move_field(
    tree: &FieldTree,
    field_id: &FieldId,
    target_parent: Option<&FieldId>,
    target_index: usize,
) -> FieldTree {
    if !tree.contains(field_id) || !accepts_drop(tree, target_parent) {
        tracing::debug!(id = %field_id, target = ?target_parent, "move: ignored");
        return tree.clone();
    }
    if target_parent.is_some_and(|t| tree.subtree_ids(field_id).contains(t)) {
        tracing::debug!(id = %field_id, "move: target is inside the moved subtree");
        return tree.clone();
    }
    let next = relocate(tree, field_id, target_parent, target_index);
    if has_duplicate_keys(&next, target_parent) {
        tracing::debug!(id = %field_id, target = ?target_parent, "move: key collision at target level");
        return tree.clone();
    }
    next
}

/// Reorder in response to a drag ending over another node.
///
/// An explicit drop zone wins. Otherwise `active_id` is placed immediately
/// after `over_id` in whichever list currently holds `over_id`.
#[must_use]
pub fn reorder_relative(
    tree: &FieldTree,
    active_id: &FieldId,
    over_id: &FieldId,
    over_data: Option<&DropZone>,
) -> FieldTree {
    if let Some(zone) = over_data {
        return move_field(tree, active_id, zone.parent_id.as_ref(), zone.index);
    }
    if active_id == over_id || !tree.contains(active_id) {
        return tree.clone();
    }
    let Some(over) = tree.get(over_id) else {
        return tree.clone();
    };
    let parent = over.parent_id.clone();
    if parent
        .as_ref()
        .is_some_and(|p| tree.subtree_ids(active_id).contains(p))
    {
        return tree.clone();
    }

    let mut next = tree.clone();
    let Some(moving) = detach(&mut next, active_id) else {
        return tree.clone();
    };
    let position = next
        .child_ids(parent.as_ref())
        .iter()
        .position(|id| id == over_id)
        .map_or(0, |i| i + 1);
    link(&mut next, moving, parent.as_ref(), position);
    if has_duplicate_keys(&next, parent.as_ref()) {
        tracing::debug!(id = %active_id, "reorder: key collision at target level");
        return tree.clone();
    }
    next
}

/// Preorder list of every id, ancestors before descendants, without repeats.
#[must_use]
pub fn get_all_ids(tree: &FieldTree) -> Vec<FieldId> {
    let mut seen = HashSet::new();
    tree.preorder()
        .into_iter()
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

/// Deep-copy a subtree with fresh ids and insert the copy right after the
/// original. The copy's key becomes the first free `<key>_copy<n>`.
/// Returns `None` for an unknown id or when the generator repeats an id the
/// tree already holds.
pub fn duplicate_field(
    tree: &FieldTree,
    id: &FieldId,
    ids: &mut dyn IdGenerator,
) -> (FieldTree, Option<FieldId>) {
    let Some(original) = tree.get(id) else {
        return (tree.clone(), None);
    };
    let parent = original.parent_id.clone();
    let position = tree
        .child_ids(parent.as_ref())
        .iter()
        .position(|c| c == id)
        .map_or(0, |i| i + 1);

    let mut next = tree.clone();
    let Some(copy_id) = copy_subtree(tree, &mut next, id, parent.as_ref(), ids) else {
        tracing::debug!(%id, "duplicate: generated id already in use");
        return (tree.clone(), None);
    };
    if let Some(base) = original.key() {
        let taken = tree.property_keys(parent.as_ref());
        let key = next_free_key(&taken, base, "_copy");
        if let Some(copy) = next.node_mut(&copy_id) {
            copy.set_key(key);
        }
    }
    link(&mut next, copy_id.clone(), parent.as_ref(), position);
    (next, Some(copy_id))
}

fn copy_subtree(
    source: &FieldTree,
    target: &mut FieldTree,
    id: &FieldId,
    parent: Option<&FieldId>,
    ids: &mut dyn IdGenerator,
) -> Option<FieldId> {
    let node = source.get(id)?;
    let mut copy = node.clone();
    copy.id = ids.next_id();
    if target.contains(&copy.id) {
        return None;
    }
    copy.parent_id = parent.cloned();
    let new_id = copy.id.clone();
    // Reserve the id before copying children so a repeat inside the copy is caught.
    target.put(copy.clone());
    let children = node
        .children()
        .iter()
        .map(|child| copy_subtree(source, target, child, Some(&new_id), ids))
        .collect::<Option<Vec<FieldId>>>()?;
    if let Some(list) = copy.children_mut() {
        *list = children;
    }
    target.put(copy);
    Some(new_id)
}

fn accepts_drop(tree: &FieldTree, parent: Option<&FieldId>) -> bool {
    parent.is_none_or(|id| tree.get(id).is_some_and(FieldNode::accepts_drop))
}

/// Whether two nodes project the same key into the property level of `parent`.
fn has_duplicate_keys(tree: &FieldTree, parent: Option<&FieldId>) -> bool {
    let mut seen = HashSet::new();
    tree.property_keys(parent)
        .into_iter()
        .any(|key| !seen.insert(key))
}

fn next_free_key(taken: &[String], base: &str, separator: &str) -> String {
    (1..)
        .map(|n| format!("{base}{separator}{n}"))
        .find(|candidate| !taken.iter().any(|k| k == candidate))
        .unwrap_or_else(|| base.to_string())
}

fn relocate(tree: &FieldTree, id: &FieldId, parent: Option<&FieldId>, index: usize) -> FieldTree {
    let mut next = tree.clone();
    if let Some(moving) = detach(&mut next, id) {
        link(&mut next, moving, parent, index);
    }
    next
}

/// Store `node` and link it under `parent` at the clamped index.
fn attach(tree: &mut FieldTree, mut node: FieldNode, parent: Option<&FieldId>, index: usize) {
    node.parent_id = parent.cloned();
    let id = node.id.clone();
    tree.put(node);
    link(tree, id, parent, index);
}

fn link(tree: &mut FieldTree, id: FieldId, parent: Option<&FieldId>, index: usize) {
    if let Some(node) = tree.node_mut(&id) {
        node.parent_id = parent.cloned();
    }
    if let Some(list) = tree.child_list_mut(parent) {
        let at = index.min(list.len());
        list.insert(at, id);
    }
}

/// Unlink `id` from whichever list holds it. The node entry stays in the arena.
fn detach(tree: &mut FieldTree, id: &FieldId) -> Option<FieldId> {
    let parent = tree.get(id)?.parent_id.clone();
    let list = tree.child_list_mut(parent.as_ref())?;
    let at = list.iter().position(|c| c == id)?;
    Some(list.remove(at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{ControlType, Effect, Operator};
    use crate::ids::SequentialIds;
    use crate::node::ConditionRow;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn tree() -> FieldTree {
        serde_json::from_value(json!([
            {"id": "name", "type": "text", "key": "name", "label": "Name"},
            {"id": "row", "type": "horizontal-layout", "children": [
                {"id": "first", "type": "text", "key": "first", "label": "First"},
                {"id": "last", "type": "text", "key": "last", "label": "Last"}
            ]},
            {"id": "pets", "type": "array", "key": "pets", "label": "Pets", "children": [
                {"id": "pet_name", "type": "text", "key": "pet_name", "label": "Pet"}
            ]},
            {"id": "addr", "type": "object", "key": "address", "label": "Address", "children": [
                {"id": "addr_body", "type": "vertical-layout", "children": [
                    {"id": "street", "type": "text", "key": "street", "label": "Street"}
                ]}
            ]}
        ]))
        .unwrap()
    }

    fn id(s: &str) -> FieldId {
        FieldId::new(s)
    }

    fn names(ids: &[FieldId]) -> Vec<&str> {
        ids.iter().map(FieldId::as_str).collect()
    }

    #[test]
    fn update_replaces_only_the_target() {
        let before = tree();
        let mut node = before.get(&id("first")).unwrap().clone();
        node.label = "Given name".into();
        let after = update_by_id(&before, node);

        assert_eq!(after.get(&id("first")).unwrap().label, "Given name");
        assert!(!std::sync::Arc::ptr_eq(
            before.shared(&id("first")).unwrap(),
            after.shared(&id("first")).unwrap()
        ));
        for untouched in ["name", "row", "last", "pets", "addr", "street"] {
            assert!(
                std::sync::Arc::ptr_eq(
                    before.shared(&id(untouched)).unwrap(),
                    after.shared(&id(untouched)).unwrap()
                ),
                "{untouched} was reallocated"
            );
        }
    }

    #[test]
    fn update_with_equal_node_is_noop() {
        let before = tree();
        let same = before.get(&id("last")).unwrap().clone();
        let after = update_by_id(&before, same);
        assert_eq!(after, before);
        assert!(std::sync::Arc::ptr_eq(
            before.shared(&id("last")).unwrap(),
            after.shared(&id("last")).unwrap()
        ));
    }

    #[test]
    fn update_keeps_structure_owned_by_tree() {
        let before = tree();
        let mut row = before.get(&id("row")).unwrap().clone();
        row.parent_id = Some(id("pets"));
        if let NodeKind::Layout(layout) = &mut row.kind {
            layout.children.clear();
        }
        row.label = "Full name".into();
        let after = update_by_id(&before, row);
        let row = after.get(&id("row")).unwrap();
        assert_eq!(row.parent_id, None);
        assert_eq!(names(row.children()), vec!["first", "last"]);
        assert_eq!(row.label, "Full name");
    }

    #[test]
    fn update_refuses_to_orphan_children() {
        let before = tree();
        let leaf = FieldNode::leaf(id("row"), ControlType::Text, "row", "Row");
        assert_eq!(update_by_id(&before, leaf), before);
    }

    #[test]
    fn update_sets_visibility() {
        let before = tree();
        let node = before.get(&id("last")).unwrap().clone().with_visibility(
            vec![ConditionRow::new("name", Operator::Equals, json!("x"))],
            Effect::Hide,
        );
        let after = update_by_id(&before, node);
        assert_eq!(after.get(&id("last")).unwrap().effect, Effect::Hide);
    }

    #[rstest]
    #[case::into_layout(Some("row"), 1, vec!["first", "name", "last"])]
    #[case::clamped_index(Some("row"), 99, vec!["first", "last", "name"])]
    #[case::into_array(Some("pets"), 0, vec!["name", "pet_name"])]
    fn move_into_container(
        #[case] target: Option<&str>,
        #[case] index: usize,
        #[case] expected: Vec<&str>,
    ) {
        let target = target.map(id);
        let after = move_field(&tree(), &id("name"), target.as_ref(), index);
        assert_eq!(names(after.child_ids(target.as_ref())), expected);
        assert_eq!(after.get(&id("name")).unwrap().parent_id, target);
        assert!(!after.roots().contains(&id("name")));
    }

    #[test]
    fn move_to_root() {
        let after = move_field(&tree(), &id("street"), None, 0);
        assert_eq!(names(after.roots()), vec!["street", "name", "row", "pets", "addr"]);
        assert!(after.child_ids(Some(&id("addr_body"))).is_empty());
        assert_eq!(after.get(&id("street")).unwrap().parent_id, None);
    }

    #[test]
    fn move_within_same_list_counts_after_detach() {
        let after = move_field(&tree(), &id("first"), Some(&id("row")), 1);
        assert_eq!(names(after.child_ids(Some(&id("row")))), vec!["last", "first"]);
    }

    #[rstest]
    #[case::unknown_field("ghost", Some("row"))]
    #[case::onto_leaf("name", Some("last"))]
    #[case::onto_object("name", Some("addr"))]
    #[case::unknown_target("name", Some("nowhere"))]
    #[case::into_own_subtree("addr", Some("addr_body"))]
    #[case::into_itself("row", Some("row"))]
    fn invalid_moves_are_noops(#[case] field: &str, #[case] target: Option<&str>) {
        let before = tree();
        let target = target.map(id);
        let after = move_field(&before, &id(field), target.as_ref(), 0);
        assert_eq!(after, before);
    }

    #[test]
    fn reorder_places_after_over_node() {
        let after = reorder_relative(&tree(), &id("name"), &id("first"), None);
        assert_eq!(names(after.child_ids(Some(&id("row")))), vec!["first", "name", "last"]);
        assert_eq!(after.get(&id("name")).unwrap().parent_id, Some(id("row")));
    }

    #[test]
    fn reorder_within_root() {
        let after = reorder_relative(&tree(), &id("name"), &id("pets"), None);
        assert_eq!(names(after.roots()), vec!["row", "pets", "name", "addr"]);
    }

    #[test]
    fn reorder_prefers_explicit_drop_zone() {
        let zone = DropZone {
            parent_id: Some(id("pets")),
            index: 1,
            accepts: vec![],
        };
        let after = reorder_relative(&tree(), &id("name"), &id("first"), Some(&zone));
        assert_eq!(names(after.child_ids(Some(&id("pets")))), vec!["pet_name", "name"]);
    }

    #[test]
    fn reorder_over_self_or_unknown_is_noop() {
        let before = tree();
        assert_eq!(reorder_relative(&before, &id("name"), &id("name"), None), before);
        assert_eq!(reorder_relative(&before, &id("name"), &id("ghost"), None), before);
        assert_eq!(reorder_relative(&before, &id("row"), &id("first"), None), before);
    }

    #[test]
    fn all_ids_are_preorder_and_unique() {
        let t = tree();
        let ids = get_all_ids(&t);
        assert_eq!(ids.len(), t.len());
        assert_eq!(
            names(&ids),
            vec!["name", "row", "first", "last", "pets", "pet_name", "addr", "addr_body", "street"]
        );
    }

    #[test]
    fn delete_cascades() {
        let after = delete_by_id(&tree(), &id("addr"));
        assert_eq!(after.len(), 6);
        assert!(after.get(&id("street")).is_none());
        assert!(after.get(&id("addr_body")).is_none());
        assert_eq!(names(after.roots()), vec!["name", "row", "pets"]);
    }

    #[test]
    fn insert_field_generates_free_key() {
        let registry = FieldTypeRegistry::builtin();
        let mut ids = SequentialIds::default();
        let (one, first) = insert_field(
            &tree(),
            &registry,
            ControlType::Email.into(),
            Some(&id("row")),
            0,
            &mut ids,
        );
        let (two, second) = insert_field(&one, &registry, ControlType::Email.into(), None, 99, &mut ids);

        let first = two.get(&first.unwrap()).unwrap().clone();
        let second = two.get(&second.unwrap()).unwrap().clone();
        assert_eq!(first.key(), Some("email_1"));
        assert_eq!(second.key(), Some("email_2"));
        assert_eq!(first.label, "Email");
        assert_eq!(first.schema().unwrap()["format"], json!("email"));
        assert_eq!(two.roots().last(), Some(&second.id));
        assert_eq!(two.child_ids(Some(&id("row")))[0], first.id);
    }

    #[test]
    fn insert_object_wraps_vertical_layout() {
        let registry = FieldTypeRegistry::builtin();
        let mut ids = SequentialIds::default();
        let (after, inserted) = insert_field(
            &FieldTree::new(),
            &registry,
            ContainerType::Object.into(),
            None,
            0,
            &mut ids,
        );
        let object = after.get(&inserted.unwrap()).unwrap();
        assert_eq!(object.key(), Some("object_1"));
        let inner = after.get(&object.children()[0]).unwrap();
        assert!(inner.accepts_drop());
        assert_eq!(inner.parent_id.as_ref(), Some(&object.id));
    }

    #[test]
    fn insert_onto_leaf_mints_no_id() {
        let registry = FieldTypeRegistry::builtin();
        let mut ids = SequentialIds::default();
        let before = tree();
        let (after, inserted) = insert_field(
            &before,
            &registry,
            ControlType::Text.into(),
            Some(&id("name")),
            0,
            &mut ids,
        );
        assert_eq!(after, before);
        assert!(inserted.is_none());
        assert_eq!(ids.peek(), 1);
    }

    #[test]
    fn insert_node_rejects_existing_id() {
        let before = tree();
        let dup = FieldNode::leaf(id("name"), ControlType::Text, "other", "Other");
        assert_eq!(insert_node(&before, dup, None, 0), before);
    }

    /// Same key `name` on the root level and inside the array items, and
    /// `first` both at root (through the row) and inside the object.
    fn shadowing() -> FieldTree {
        serde_json::from_value(json!([
            {"id": "name", "type": "text", "key": "name", "label": "Name"},
            {"id": "row", "type": "horizontal-layout", "children": [
                {"id": "first", "type": "text", "key": "first", "label": "First"}
            ]},
            {"id": "pets", "type": "array", "key": "pets", "label": "Pets", "children": [
                {"id": "pet", "type": "text", "key": "name", "label": "Pet"}
            ]},
            {"id": "addr", "type": "object", "key": "address", "label": "Address", "children": [
                {"id": "addr_body", "type": "vertical-layout", "children": [
                    {"id": "street", "type": "text", "key": "first", "label": "Street"}
                ]}
            ]}
        ]))
        .unwrap()
    }

    #[rstest]
    #[case::leaf_to_root("pet", None)]
    #[case::leaf_into_root_layout("pet", Some("row"))]
    #[case::flattened_sibling("street", None)]
    #[case::layout_brings_keys("row", Some("addr_body"))]
    fn moves_colliding_keys_are_noops(#[case] field: &str, #[case] target: Option<&str>) {
        let before = shadowing();
        let target = target.map(id);
        assert_eq!(move_field(&before, &id(field), target.as_ref(), 0), before);
    }

    #[test]
    fn move_without_collision_still_applies() {
        let after = move_field(&shadowing(), &id("street"), Some(&id("pets")), 0);
        assert_eq!(names(after.child_ids(Some(&id("pets")))), vec!["street", "pet"]);
    }

    #[rstest]
    #[case::after_over_node(None)]
    #[case::explicit_zone(Some(DropZone { parent_id: None, index: 0, accepts: vec![] }))]
    fn reorders_colliding_keys_are_noops(#[case] zone: Option<DropZone>) {
        let before = shadowing();
        let after = reorder_relative(&before, &id("pet"), &id("name"), zone.as_ref());
        assert_eq!(after, before);
    }

    #[rstest]
    #[case::taken_at_root("first", "name", false)]
    #[case::taken_through_layout("name", "first", false)]
    #[case::free_in_items("pet", "pet_name", true)]
    #[case::free_in_object("street", "name", true)]
    fn update_key_respects_level(
        #[case] field: &str,
        #[case] new_key: &str,
        #[case] applied: bool,
    ) {
        let before = shadowing();
        let mut node = before.get(&id(field)).unwrap().clone();
        node.set_key(new_key.to_string());
        let after = update_by_id(&before, node);
        assert_eq!(after.get(&id(field)).unwrap().key() == Some(new_key), applied);
        assert_eq!(after == before, !applied);
    }

    #[rstest]
    #[case::root(None)]
    #[case::root_layout(Some("row"))]
    #[case::array_items(Some("pets"))]
    fn insert_node_with_taken_key_is_noop(#[case] parent: Option<&str>) {
        let before = shadowing();
        let parent = parent.map(id);
        let node = FieldNode::leaf(id("fresh"), ControlType::Text, "name", "Name again");
        assert_eq!(insert_node(&before, node, parent.as_ref(), 0), before);
    }

    #[test]
    fn insert_field_with_repeated_id_is_noop() {
        let registry = FieldTypeRegistry::builtin();
        let before = tree();
        let mut repeat = || "name".to_string();
        let (after, inserted) =
            insert_field(&before, &registry, ControlType::Text.into(), None, 0, &mut repeat);
        assert_eq!(after, before);
        assert!(inserted.is_none());
    }

    #[test]
    fn insert_object_with_repeated_layout_id_is_noop() {
        let registry = FieldTypeRegistry::builtin();
        let before = tree();
        let mut calls = 0;
        let mut ids = move || {
            calls += 1;
            if calls == 1 { "obj".to_string() } else { "street".to_string() }
        };
        let (after, inserted) = insert_field(
            &before,
            &registry,
            ContainerType::Object.into(),
            None,
            0,
            &mut ids,
        );
        assert_eq!(after, before);
        assert!(inserted.is_none());
    }

    #[rstest]
    #[case::clashes_with_tree(vec!["pets_2", "pet_name"])]
    #[case::clashes_within_copy(vec!["copy", "copy"])]
    fn duplicate_with_repeated_id_is_noop(#[case] minted: Vec<&'static str>) {
        let before = tree();
        let mut minted = minted.into_iter();
        let mut ids = move || minted.next().unwrap_or("spare").to_string();
        let (after, copy) = duplicate_field(&before, &id("pets"), &mut ids);
        assert_eq!(after, before);
        assert!(copy.is_none());
    }

    #[test]
    fn duplicate_copies_subtree_with_fresh_ids() {
        let mut ids = SequentialIds::new("dup");
        let (after, copy) = duplicate_field(&tree(), &id("pets"), &mut ids);
        let copy = after.get(&copy.unwrap()).unwrap();
        assert_eq!(copy.key(), Some("pets_copy1"));
        assert_eq!(names(after.roots()), vec!["name", "row", "pets", "dup-1", "addr"]);
        let child = after.get(&copy.children()[0]).unwrap();
        assert_eq!(child.id.as_str(), "dup-2");
        assert_eq!(child.key(), Some("pet_name"));
        assert_eq!(child.parent_id.as_ref(), Some(&copy.id));
        assert_eq!(after.len(), tree().len() + 2);
    }
}
