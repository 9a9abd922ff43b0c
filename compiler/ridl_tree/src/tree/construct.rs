//! Construction and mutation operations.
//!
//! One factory per node kind plus the two-phase setters for
//! self-referential shapes. Every operation validates all of its inputs
//! before touching the tree, so a failure is always a no-op.
//!
//! Ownership transfers exactly once, at the call that attaches a node to
//! its container or slot; attaching an already-owned node fails with
//! [`TreeError::AlreadyOwned`] and leaves the original attachment alone.

use crate::{Literal, Node, NodeData, NodeId, TreeError, TypeFlags, TypeTree};

impl TypeTree {
    // === Leaf factories ===

    /// Create a basic scalar type from its kind flags.
    ///
    /// The flags must name a basic kind (optionally with the
    /// `UNSIGNED`/`WIDE` modifiers); reference markers are carried,
    /// anything else is rejected.
    pub fn create_base_type(&mut self, flags: TypeFlags) -> Result<NodeId, TreeError> {
        if !flags.is_basic() {
            return Err(TreeError::InvalidArgument("flags do not name a basic type"));
        }
        if !reference_marks().contains(flags.difference(flags.kind())) {
            return Err(TreeError::InvalidArgument(
                "attribute bits are not valid on a basic type",
            ));
        }
        Ok(self.alloc(unnamed(flags, NodeData::Basic)))
    }

    /// Create a string type; `flags` selects `STRING` or `STRING | WIDE`,
    /// `max` 0 means unbound.
    pub fn create_string(&mut self, flags: TypeFlags, max: u64) -> Result<NodeId, TreeError> {
        let kind = flags.kind();
        if kind != TypeFlags::STRING && kind != (TypeFlags::STRING | TypeFlags::WIDE) {
            return Err(TreeError::InvalidArgument("flags do not name a string type"));
        }
        Ok(self.alloc(unnamed(
            with_bound_marker(kind, max),
            NodeData::String { max },
        )))
    }

    /// Create a fixed-point type; `digits` must be positive.
    pub fn create_fixed_pt(
        &mut self,
        digits: u64,
        fraction_digits: u64,
    ) -> Result<NodeId, TreeError> {
        if digits == 0 {
            return Err(TreeError::InvalidArgument("fixed-point needs digits"));
        }
        Ok(self.alloc(unnamed(
            TypeFlags::FIXED_PT,
            NodeData::FixedPt {
                digits,
                fraction_digits,
            },
        )))
    }

    // === Template factories ===

    /// Create a sequence of `element`; `max` 0 means unbound.
    ///
    /// Takes ownership of `element`, which must not be owned yet.
    pub fn create_sequence(&mut self, element: NodeId, max: u64) -> Result<NodeId, TreeError> {
        self.ensure_unattached(element)?;
        let flags = with_bound_marker(TypeFlags::SEQUENCE, max);
        let id = self.alloc(unnamed(flags, NodeData::Sequence { element, max }));
        self.set_parent(element, id);
        Ok(id)
    }

    /// Create an array of `size` elements; `size` must be positive.
    ///
    /// The element type may be absent and supplied later through
    /// [`TypeTree::array_set_element_type`], which is how an array nested
    /// inside the struct it stores gets built.
    pub fn create_array(
        &mut self,
        element: Option<NodeId>,
        size: u64,
    ) -> Result<NodeId, TreeError> {
        if size == 0 {
            return Err(TreeError::InvalidArgument("array needs a positive size"));
        }
        if let Some(element) = element {
            self.ensure_unattached(element)?;
        }
        let element = element.unwrap_or(NodeId::NONE);
        let id = self.alloc(unnamed(TypeFlags::ARRAY, NodeData::Array { element, size }));
        if element.is_some() {
            self.set_parent(element, id);
        }
        Ok(id)
    }

    /// Complete an array created without an element type.
    ///
    /// Fails once the element slot is filled; an element type is never
    /// replaced.
    pub fn array_set_element_type(
        &mut self,
        array: NodeId,
        element: NodeId,
    ) -> Result<(), TreeError> {
        self.ensure_kind(array, TypeFlags::ARRAY)?;
        self.ensure_unattached(element)?;
        match &self.node_ref(array)?.data {
            NodeData::Array { element: slot, .. } if slot.is_some() => {
                return Err(TreeError::InvalidArgument("array element type already set"));
            }
            _ => {}
        }
        if let NodeData::Array { element: slot, .. } = &mut self.node_mut(array)?.data {
            *slot = element;
        }
        self.set_parent(element, array);
        Ok(())
    }

    /// Create a map from `key` to `value`; `max` 0 means unbound.
    ///
    /// Takes ownership of both types, which must not be owned yet.
    pub fn create_map(
        &mut self,
        key: NodeId,
        value: NodeId,
        max: u64,
    ) -> Result<NodeId, TreeError> {
        self.ensure_unattached(key)?;
        self.ensure_unattached(value)?;
        if key == value {
            return Err(TreeError::InvalidArgument(
                "map key and value must be distinct nodes",
            ));
        }
        let flags = with_bound_marker(TypeFlags::MAP, max);
        let id = self.alloc(unnamed(flags, NodeData::Map { key, value, max }));
        self.set_parent(key, id);
        self.set_parent(value, id);
        Ok(id)
    }

    // === Modules ===

    /// Create a module with no members.
    pub fn create_module(&mut self, name: &str) -> Result<NodeId, TreeError> {
        let name = self.intern_name(name)?;
        Ok(self.alloc(Node {
            flags: TypeFlags::MODULE,
            name: Some(name),
            parent: NodeId::NONE,
            data: NodeData::Module {
                members: crate::ChildList::new(),
                previous: NodeId::NONE,
            },
        }))
    }

    /// Append a member at the end of a module's member list, taking
    /// ownership of it.
    ///
    /// Two name-triggered linkages run as side effects, both scoped to
    /// this module only:
    /// - a member module whose name matches an earlier member module is a
    ///   reopening; its `previous` back-link is set to the most recent
    ///   earlier opening.
    /// - a struct or union definition resolves every matching forward
    ///   declaration of the same flavor whose definition is still unset.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn module_add_member(&mut self, module: NodeId, member: NodeId) -> Result<(), TreeError> {
        self.ensure_kind(module, TypeFlags::MODULE)?;
        self.ensure_unattached(member)?;

        let added = self.node_ref(member)?;
        let added_name = added.name;
        let added_kind = added.kind();

        let mut previous = NodeId::NONE;
        let mut resolved: Vec<NodeId> = Vec::new();
        if let NodeData::Module { members, .. } = &self.node_ref(module)?.data {
            if added_kind == TypeFlags::MODULE {
                previous = members
                    .iter()
                    .rev()
                    .find(|&m| {
                        self.node(m)
                            .is_some_and(|n| n.kind() == TypeFlags::MODULE && n.name == added_name)
                    })
                    .unwrap_or(NodeId::NONE);
            } else if let Some(flavor) = forward_flavor(added_kind) {
                resolved = members
                    .iter()
                    .filter(|&m| {
                        self.node(m).is_some_and(|n| {
                            n.kind() == flavor
                                && n.name == added_name
                                && n.definition().is_none()
                        })
                    })
                    .collect();
            }
        }

        for fwd in &resolved {
            if let NodeData::Forward { definition } = &mut self.node_mut(*fwd)?.data {
                *definition = member;
            }
            tracing::trace!(forward = %fwd, definition = %member, "resolved forward declaration");
        }
        if previous.is_some() {
            if let NodeData::Module { previous: slot, .. } = &mut self.node_mut(member)?.data {
                *slot = previous;
            }
            tracing::trace!(module = %member, previous = %previous, "reopened module");
        }

        self.set_parent(member, module);
        if let NodeData::Module { members, .. } = &mut self.node_mut(module)?.data {
            members.push(member);
        }
        Ok(())
    }

    // === Structs ===

    /// Create a forward declaration for a struct name.
    pub fn create_struct_forward_dcl(&mut self, name: &str) -> Result<NodeId, TreeError> {
        self.create_forward(name, TypeFlags::FORWARD_STRUCT)
    }

    /// Create a forward declaration for a union name.
    pub fn create_union_forward_dcl(&mut self, name: &str) -> Result<NodeId, TreeError> {
        self.create_forward(name, TypeFlags::FORWARD_UNION)
    }

    fn create_forward(&mut self, name: &str, flavor: TypeFlags) -> Result<NodeId, TreeError> {
        let name = self.intern_name(name)?;
        Ok(self.alloc(Node {
            flags: flavor,
            name: Some(name),
            parent: NodeId::NONE,
            data: NodeData::Forward {
                definition: NodeId::NONE,
            },
        }))
    }

    /// Create a struct with no members.
    pub fn create_struct(&mut self, name: &str) -> Result<NodeId, TreeError> {
        let name = self.intern_name(name)?;
        Ok(self.alloc(Node {
            flags: TypeFlags::STRUCT,
            name: Some(name),
            parent: NodeId::NONE,
            data: NodeData::Struct {
                base: NodeId::NONE,
                members: crate::ChildList::new(),
                keys: Vec::new(),
            },
        }))
    }

    /// Record the base struct of an extended struct definition.
    ///
    /// The link is non-owning: the base keeps whatever owner it has. Set
    /// at most once.
    pub fn struct_set_base(&mut self, struct_def: NodeId, base: NodeId) -> Result<(), TreeError> {
        self.ensure_kind(struct_def, TypeFlags::STRUCT)?;
        self.ensure_kind(base, TypeFlags::STRUCT)?;
        if struct_def == base {
            return Err(TreeError::InvalidArgument("struct cannot extend itself"));
        }
        match &self.node_ref(struct_def)?.data {
            NodeData::Struct { base: slot, .. } if slot.is_some() => {
                return Err(TreeError::InvalidArgument("struct base already set"));
            }
            _ => {}
        }
        if let NodeData::Struct { base: slot, .. } = &mut self.node_mut(struct_def)?.data {
            *slot = base;
        }
        Ok(())
    }

    /// Append a member at the end of a struct's member list, taking
    /// ownership of it.
    pub fn struct_add_member(&mut self, struct_def: NodeId, member: NodeId) -> Result<(), TreeError> {
        self.ensure_kind(struct_def, TypeFlags::STRUCT)?;
        self.ensure_unattached(member)?;
        self.set_parent(member, struct_def);
        if let NodeData::Struct { members, .. } = &mut self.node_mut(struct_def)?.data {
            members.push(member);
        }
        Ok(())
    }

    /// Register an existing member of the struct as a key.
    ///
    /// The key list holds non-owning references into the member list, in
    /// registration order. Duplicate detection is by node identity, not
    /// by name.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn struct_add_key(&mut self, struct_def: NodeId, member: NodeId) -> Result<(), TreeError> {
        self.ensure_kind(struct_def, TypeFlags::STRUCT)?;
        self.node_ref(member)?;
        match &self.node_ref(struct_def)?.data {
            NodeData::Struct { members, keys, .. } => {
                if !members.contains(member) {
                    return Err(TreeError::InvalidArgument(
                        "key is not a member of the struct",
                    ));
                }
                if keys.contains(&member) {
                    return Err(TreeError::DuplicateKey);
                }
            }
            _ => return Err(TreeError::InvalidArgument("node has the wrong kind")),
        }
        if let NodeData::Struct { keys, .. } = &mut self.node_mut(struct_def)?.data {
            keys.push(member);
        }
        Ok(())
    }

    // === Declarations ===

    /// Create a named declaration, optionally taking ownership of its
    /// type right away.
    ///
    /// With `decl_type` absent the declaration is completed later through
    /// [`TypeTree::declaration_set_type`].
    pub fn create_declaration(
        &mut self,
        name: &str,
        decl_type: Option<NodeId>,
    ) -> Result<NodeId, TreeError> {
        let name = self.intern_name(name)?;
        if let Some(decl_type) = decl_type {
            self.ensure_unattached(decl_type)?;
        }
        let decl_type = decl_type.unwrap_or(NodeId::NONE);
        let id = self.alloc(Node {
            flags: TypeFlags::DECLARATION,
            name: Some(name),
            parent: NodeId::NONE,
            data: NodeData::Declaration { decl_type },
        });
        if decl_type.is_some() {
            self.set_parent(decl_type, id);
        }
        Ok(id)
    }

    /// Complete a declaration created without a type.
    pub fn declaration_set_type(
        &mut self,
        declaration: NodeId,
        decl_type: NodeId,
    ) -> Result<(), TreeError> {
        self.ensure_kind(declaration, TypeFlags::DECLARATION)?;
        self.ensure_unattached(decl_type)?;
        match &self.node_ref(declaration)?.data {
            NodeData::Declaration { decl_type: slot } if slot.is_some() => {
                return Err(TreeError::InvalidArgument("declaration type already set"));
            }
            _ => {}
        }
        if let NodeData::Declaration { decl_type: slot } = &mut self.node_mut(declaration)?.data {
            *slot = decl_type;
        }
        self.set_parent(decl_type, declaration);
        Ok(())
    }

    // === Unions ===

    /// Create a union with no cases; `switch_kind` names the basic kind
    /// of the discriminator.
    pub fn create_union(
        &mut self,
        name: &str,
        switch_kind: TypeFlags,
    ) -> Result<NodeId, TreeError> {
        let name = self.intern_name(name)?;
        if !switch_kind.is_basic() {
            return Err(TreeError::InvalidArgument(
                "union switch kind must be a basic type",
            ));
        }
        Ok(self.alloc(Node {
            flags: TypeFlags::UNION,
            name: Some(name),
            parent: NodeId::NONE,
            data: NodeData::Union {
                switch_kind,
                cases: crate::ChildList::new(),
            },
        }))
    }

    /// Append a case at the end of a union's case list, owning the given
    /// labels.
    ///
    /// The case starts nameless and typeless; the grammar supplies both
    /// later through [`TypeTree::union_case_set_decl`]. Returns the new
    /// case so the caller can hold on to it for that.
    #[tracing::instrument(level = "trace", skip(self, labels), fields(label_count = labels.len()))]
    pub fn union_add_case(
        &mut self,
        union_def: NodeId,
        labels: Vec<Literal>,
        is_default: bool,
    ) -> Result<NodeId, TreeError> {
        self.ensure_kind(union_def, TypeFlags::UNION)?;
        let id = self.alloc(Node {
            flags: TypeFlags::UNION_CASE,
            name: None,
            parent: union_def,
            data: NodeData::UnionCase {
                decl_type: NodeId::NONE,
                labels,
                is_default,
            },
        });
        if let NodeData::Union { cases, .. } = &mut self.node_mut(union_def)?.data {
            cases.push(id);
        }
        Ok(id)
    }

    /// Complete a union case with its name and type, taking ownership of
    /// the type.
    pub fn union_case_set_decl(
        &mut self,
        union_case: NodeId,
        name: &str,
        decl_type: NodeId,
    ) -> Result<(), TreeError> {
        self.ensure_kind(union_case, TypeFlags::UNION_CASE)?;
        let name = self.intern_name(name)?;
        self.ensure_unattached(decl_type)?;
        match &self.node_ref(union_case)?.data {
            NodeData::UnionCase { decl_type: slot, .. } if slot.is_some() => {
                return Err(TreeError::InvalidArgument("union case already has a type"));
            }
            _ => {}
        }
        let case = self.node_mut(union_case)?;
        case.name = Some(name);
        if let NodeData::UnionCase { decl_type: slot, .. } = &mut case.data {
            *slot = decl_type;
        }
        self.set_parent(decl_type, union_case);
        Ok(())
    }

    // === Reference markers ===

    /// Set reference marker bits on a node. Only the marker bits are
    /// accepted; this core carries them without interpreting them.
    pub fn add_reference_marks(&mut self, id: NodeId, marks: TypeFlags) -> Result<(), TreeError> {
        if !reference_marks().contains(marks) {
            return Err(TreeError::InvalidArgument("not a reference marker"));
        }
        self.node_mut(id)?.flags.insert(marks);
        Ok(())
    }

    /// Clear reference marker bits on a node.
    pub fn clear_reference_marks(&mut self, id: NodeId, marks: TypeFlags) -> Result<(), TreeError> {
        if !reference_marks().contains(marks) {
            return Err(TreeError::InvalidArgument("not a reference marker"));
        }
        self.node_mut(id)?.flags.remove(marks);
        Ok(())
    }

    // === Shared checks ===

    fn intern_name(&mut self, name: &str) -> Result<crate::Name, TreeError> {
        if name.is_empty() {
            return Err(TreeError::InvalidArgument("empty name"));
        }
        Ok(self.intern(name))
    }

    fn ensure_kind(&self, id: NodeId, kind: TypeFlags) -> Result<(), TreeError> {
        if self.node_ref(id)?.kind() == kind {
            Ok(())
        } else {
            Err(TreeError::InvalidArgument("node has the wrong kind"))
        }
    }

    fn ensure_unattached(&self, id: NodeId) -> Result<(), TreeError> {
        if self.node_ref(id)?.is_attached() {
            Err(TreeError::AlreadyOwned)
        } else {
            Ok(())
        }
    }

    /// Record ownership. Callers have already checked the child with
    /// [`TypeTree::ensure_unattached`].
    fn set_parent(&mut self, child: NodeId, parent: NodeId) {
        if let Ok(node) = self.node_mut(child) {
            node.parent = parent;
        }
    }
}

fn unnamed(flags: TypeFlags, data: NodeData) -> Node {
    Node {
        flags,
        name: None,
        parent: NodeId::NONE,
        data,
    }
}

/// A bound of 0 means "no bound"; the node records that in its flags.
const fn with_bound_marker(flags: TypeFlags, max: u64) -> TypeFlags {
    if max == 0 {
        flags.union(TypeFlags::UNBOUND)
    } else {
        flags
    }
}

const fn reference_marks() -> TypeFlags {
    TypeFlags::REFERENCE_1.union(TypeFlags::REFERENCE_2)
}

fn forward_flavor(kind: TypeFlags) -> Option<TypeFlags> {
    if kind == TypeFlags::STRUCT {
        Some(TypeFlags::FORWARD_STRUCT)
    } else if kind == TypeFlags::UNION {
        Some(TypeFlags::FORWARD_UNION)
    } else {
        None
    }
}
