#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use crate::Literal;
use pretty_assertions::assert_eq;

fn member(tree: &mut TypeTree, st: NodeId, name: &str) -> NodeId {
    let ty = tree.create_base_type(TypeFlags::INT32).unwrap();
    let decl = tree.create_declaration(name, Some(ty)).unwrap();
    tree.struct_add_member(st, decl).unwrap();
    decl
}

fn path(frames: &[NodeId]) -> CallPath {
    CallPath::from(frames.to_vec())
}

#[test]
fn call_path_push_pop() {
    let mut p = CallPath::new();
    assert!(p.is_empty());
    p.push(NodeId::from_raw(0));
    p.push(NodeId::from_raw(1));
    assert_eq!(p.len(), 2);
    assert_eq!(p.frames(), &[NodeId::from_raw(0), NodeId::from_raw(1)]);
    assert_eq!(p.pop(), Some(NodeId::from_raw(1)));
    assert_eq!(p.len(), 1);
}

#[test]
fn flat_member_key() {
    let mut tree = TypeTree::new();
    let st = tree.create_struct("S").unwrap();
    let a = member(&mut tree, st, "a");
    let b = member(&mut tree, st, "b");
    tree.struct_add_key(st, a).unwrap();

    assert_eq!(tree.declaration_is_key(&path(&[st, a])), Ok(true));
    assert_eq!(tree.declaration_is_key(&path(&[st, b])), Ok(false));
}

#[test]
fn inherited_key_through_an_inheritance_frame() {
    let mut tree = TypeTree::new();
    let base = tree.create_struct("Base").unwrap();
    let k = member(&mut tree, base, "k");
    tree.struct_add_key(base, k).unwrap();

    let derived = tree.create_struct("Derived").unwrap();
    tree.struct_set_base(derived, base).unwrap();

    // Walking from the derived struct into its base frame.
    assert_eq!(tree.declaration_is_key(&path(&[derived, base, k])), Ok(true));
}

#[test]
fn inherited_key_without_re_registration() {
    let mut tree = TypeTree::new();
    let base = tree.create_struct("Base").unwrap();
    let k = member(&mut tree, base, "k");
    let plain = member(&mut tree, base, "plain");
    tree.struct_add_key(base, k).unwrap();

    let derived = tree.create_struct("Derived").unwrap();
    tree.struct_set_base(derived, base).unwrap();

    // The derived struct never re-registered k; the base chain decides.
    assert_eq!(tree.declaration_is_key(&path(&[derived, k])), Ok(true));
    assert_eq!(tree.declaration_is_key(&path(&[derived, plain])), Ok(false));
}

#[test]
fn nested_aggregate_key_requires_every_level() {
    let mut tree = TypeTree::new();
    // struct Inner { long k; /*@key*/ };
    let inner = tree.create_struct("Inner").unwrap();
    let k = member(&mut tree, inner, "k");
    tree.struct_add_key(inner, k).unwrap();

    // struct Outer { Inner a; /*@key*/ };  (inline definition, owned)
    let outer = tree.create_struct("Outer").unwrap();
    let a = tree.create_declaration("a", Some(inner)).unwrap();
    tree.struct_add_member(outer, a).unwrap();
    tree.struct_add_key(outer, a).unwrap();

    assert_eq!(
        tree.declaration_is_key(&path(&[outer, a, inner, k])),
        Ok(true)
    );

    // struct Other { Inner2 b; };  without registering b as key.
    let inner2 = tree.create_struct("Inner2").unwrap();
    let k2 = member(&mut tree, inner2, "k2");
    tree.struct_add_key(inner2, k2).unwrap();
    let other = tree.create_struct("Other").unwrap();
    let b = tree.create_declaration("b", Some(inner2)).unwrap();
    tree.struct_add_member(other, b).unwrap();

    // Key of the inner struct, but the outer member is no key.
    assert_eq!(
        tree.declaration_is_key(&path(&[other, b, inner2, k2])),
        Ok(false)
    );
}

#[test]
fn shared_base_reached_from_two_derived_structs() {
    let mut tree = TypeTree::new();
    let base = tree.create_struct("Base").unwrap();
    let k = member(&mut tree, base, "k");
    let plain = member(&mut tree, base, "plain");
    tree.struct_add_key(base, k).unwrap();

    let derived_a = tree.create_struct("DerivedA").unwrap();
    tree.struct_set_base(derived_a, base).unwrap();
    let derived_b = tree.create_struct("DerivedB").unwrap();
    tree.struct_set_base(derived_b, base).unwrap();

    // The same base node answers in both inheritance contexts.
    assert_eq!(
        tree.declaration_is_key(&path(&[derived_a, base, k])),
        Ok(true)
    );
    assert_eq!(
        tree.declaration_is_key(&path(&[derived_b, base, k])),
        Ok(true)
    );
    assert_eq!(
        tree.declaration_is_key(&path(&[derived_a, base, plain])),
        Ok(false)
    );
}

#[test]
fn forward_frames_follow_the_resolved_definition() {
    let mut tree = TypeTree::new();
    let module = tree.create_module("m").unwrap();
    let fwd = tree.create_struct_forward_dcl("Point").unwrap();
    tree.module_add_member(module, fwd).unwrap();

    let point = tree.create_struct("Point").unwrap();
    let k = member(&mut tree, point, "k");
    tree.struct_add_key(point, k).unwrap();
    tree.module_add_member(module, point).unwrap();

    // The generator stepped through the forward's definition link.
    assert_eq!(
        tree.declaration_is_key(&path(&[module, fwd, point, k])),
        Ok(true)
    );

    // An unresolved forward cannot sit on a path into the definition.
    let unresolved = tree.create_struct_forward_dcl("Elsewhere").unwrap();
    tree.module_add_member(module, unresolved).unwrap();
    assert_eq!(
        tree.declaration_is_key(&path(&[module, unresolved, point, k])),
        Err(TreeError::MalformedPath(
            "forward frame does not resolve to the inner node"
        ))
    );
}

#[test]
fn union_frames_pass_the_member_through() {
    let mut tree = TypeTree::new();
    // struct Inner { long k; /*@key*/ };
    let inner = tree.create_struct("Inner").unwrap();
    let k = member(&mut tree, inner, "k");
    tree.struct_add_key(inner, k).unwrap();

    // union U switch (long) { case 1: Inner v; };
    let union_def = tree.create_union("U", TypeFlags::INT32).unwrap();
    let case = tree
        .union_add_case(union_def, vec![Literal::Int(1)], false)
        .unwrap();
    tree.union_case_set_decl(case, "v", inner).unwrap();

    // struct Outer { U u; /*@key*/ };
    let outer = tree.create_struct("Outer").unwrap();
    let u = tree.create_declaration("u", Some(union_def)).unwrap();
    tree.struct_add_member(outer, u).unwrap();
    tree.struct_add_key(outer, u).unwrap();

    assert_eq!(
        tree.declaration_is_key(&path(&[outer, u, union_def, case, inner, k])),
        Ok(true)
    );
}

#[test]
fn module_frames_check_membership() {
    let mut tree = TypeTree::new();
    let module = tree.create_module("m").unwrap();
    let st = tree.create_struct("S").unwrap();
    let a = member(&mut tree, st, "a");
    tree.struct_add_key(st, a).unwrap();
    tree.module_add_member(module, st).unwrap();

    assert_eq!(tree.declaration_is_key(&path(&[module, st, a])), Ok(true));

    let foreign = tree.create_module("elsewhere").unwrap();
    assert_eq!(
        tree.declaration_is_key(&path(&[foreign, st, a])),
        Err(TreeError::MalformedPath(
            "frame is not a member of its enclosing module"
        ))
    );
}

#[test]
fn malformed_paths_are_rejected() {
    let mut tree = TypeTree::new();
    let st = tree.create_struct("S").unwrap();
    let a = member(&mut tree, st, "a");
    tree.struct_add_key(st, a).unwrap();

    // Empty path.
    assert_eq!(
        tree.declaration_is_key(&CallPath::new()),
        Err(TreeError::MalformedPath("empty path"))
    );

    // Innermost frame is not a declaration.
    assert_eq!(
        tree.declaration_is_key(&path(&[st])),
        Err(TreeError::MalformedPath(
            "path does not end at a member declaration"
        ))
    );

    // Innermost declaration is not a member of the claimed struct.
    let stray_ty = tree.create_base_type(TypeFlags::INT32).unwrap();
    let stray = tree.create_declaration("stray", Some(stray_ty)).unwrap();
    assert_eq!(
        tree.declaration_is_key(&path(&[st, stray])),
        Err(TreeError::MalformedPath(
            "frame is not a member of its enclosing struct"
        ))
    );

    // A declaration frame that does not carry the inner node.
    let other_ty = tree.create_base_type(TypeFlags::INT32).unwrap();
    let other = tree.create_declaration("other", Some(other_ty)).unwrap();
    assert_eq!(
        tree.declaration_is_key(&path(&[other, a])),
        Err(TreeError::MalformedPath(
            "declaration frame does not carry the inner node"
        ))
    );

    // A dangling frame.
    assert_eq!(
        tree.declaration_is_key(&path(&[NodeId::from_raw(999), a])),
        Err(TreeError::InvalidArgument("dangling node handle"))
    );
}

#[test]
fn base_chain_cycle_terminates_as_non_key() {
    let mut tree = TypeTree::new();
    let first = tree.create_struct("First").unwrap();
    let second = tree.create_struct("Second").unwrap();
    // Mutually referential base links; each slot is only written once,
    // so the write-once rule does not catch this shape.
    tree.struct_set_base(first, second).unwrap();
    tree.struct_set_base(second, first).unwrap();

    let stray_ty = tree.create_base_type(TypeFlags::INT32).unwrap();
    let stray = tree.create_declaration("stray", Some(stray_ty)).unwrap();

    // The member is found in neither struct; the chain walk revisits
    // `first` and stops as a non-key instead of recursing.
    assert_eq!(tree.declaration_is_key(&path(&[first, stray])), Ok(false));
}
