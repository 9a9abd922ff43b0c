//! Kind and attribute flags for type-tree nodes.
//!
//! Every node carries a `TypeFlags` value that encodes its kind plus a
//! small set of attribute bits. Kind bits are disjoint, so sets of kinds
//! are plain bit unions and membership tests are single mask operations.
//!
//! Flags are organized into ranges:
//! - **Basic scalar kinds and modifiers** (bits 0-16): the numeric,
//!   character and boolean kinds, plus the sign/wide modifiers that
//!   combine with them.
//! - **Constructed kinds** (bits 17-21): template types built from an
//!   element type and a bound.
//! - **Aggregate kinds** (bits 22-28): the container declarations a
//!   module tree is made of.
//! - **Attributes** (bit 30 up): markers orthogonal to the kind.

use bitflags::bitflags;

bitflags! {
    /// Node kind and attribute flag set.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct TypeFlags: u64 {
        // === Basic scalar kinds and modifiers (bits 0-16) ===

        /// Sign modifier for the integer kinds.
        const UNSIGNED = 1 << 0;
        /// 8-bit integer.
        const INT8 = 1 << 1;
        /// 16-bit integer (IDL `short`).
        const INT16 = 1 << 2;
        /// 32-bit integer (IDL `long`).
        const INT32 = 1 << 3;
        /// 64-bit integer (IDL `long long`).
        const INT64 = 1 << 4;
        /// 32-bit floating point.
        const FLOAT = 1 << 5;
        /// 64-bit floating point.
        const DOUBLE = 1 << 6;
        /// Extended-precision floating point.
        const LONG_DOUBLE = 1 << 7;
        /// Character.
        const CHAR = 1 << 8;
        /// Uninterpreted octet.
        const OCTET = 1 << 9;
        /// Boolean.
        const BOOLEAN = 1 << 10;
        /// Enumeration value.
        const ENUM = 1 << 11;
        /// Wide modifier for `CHAR` and `STRING`.
        const WIDE = 1 << 12;
        /// Fixed-point constant (constant expressions only).
        const FIXED_PT_CONST = 1 << 13;
        /// The `any` type.
        const ANY = 1 << 14;

        // Reserved: bits 15-16 for future basic kinds

        // === Constructed kinds (bits 17-21) ===

        /// Sequence of an element type, optionally bounded.
        const SEQUENCE = 1 << 17;
        /// Fixed-size array of an element type.
        const ARRAY = 1 << 18;
        /// String, optionally bounded; `WIDE` selects wstring.
        const STRING = 1 << 19;
        /// Fixed-point decimal.
        const FIXED_PT = 1 << 20;
        /// Map from a key type to a value type, optionally bounded.
        const MAP = 1 << 21;

        // === Aggregate kinds (bits 22-28) ===

        /// Module (namespace) declaration.
        const MODULE = 1 << 22;
        /// Forward declaration of a struct.
        const FORWARD_STRUCT = 1 << 23;
        /// Struct definition.
        const STRUCT = 1 << 24;
        /// Named declaration carrying a type.
        const DECLARATION = 1 << 25;
        /// Forward declaration of a union.
        const FORWARD_UNION = 1 << 26;
        /// Union definition.
        const UNION = 1 << 27;
        /// Single case of a union.
        const UNION_CASE = 1 << 28;

        // Reserved: bit 29 for future kinds

        // === Attributes (bit 30 up) ===

        /// A sequence/string/map bound of 0 was given: no bound at all.
        const UNBOUND = 1 << 30;
        /// Reference marker reserved for collaborators walking the tree.
        const REFERENCE_1 = 1 << 31;
        /// Second reference marker reserved for collaborators.
        const REFERENCE_2 = 1 << 32;
    }
}

impl TypeFlags {
    /// All basic scalar kind and modifier bits.
    pub const BASIC: Self = Self::from_bits_truncate((1 << 17) - 1);

    /// All kind bits (everything below the attribute range).
    pub const KIND: Self = Self::from_bits_truncate((1 << 30) - 1);

    /// The kinds that define a name in a module scope.
    pub const DEFINITIONS: Self = Self::from_bits_truncate(
        Self::MODULE.bits()
            | Self::FORWARD_STRUCT.bits()
            | Self::STRUCT.bits()
            | Self::FORWARD_UNION.bits()
            | Self::UNION.bits(),
    );

    /// The kind bits of this flag set, with all attributes masked out.
    #[inline]
    pub const fn kind(self) -> Self {
        self.intersection(Self::KIND)
    }

    /// The kind bits with the sign modifier also masked out.
    ///
    /// Use this when comparing numeric kinds irrespective of signedness.
    #[inline]
    pub const fn kind_ignoring_sign(self) -> Self {
        self.intersection(Self::KIND)
            .difference(Self::UNSIGNED)
    }

    /// Bitwise membership test of this node's kind against a kind set.
    #[inline]
    pub const fn is_kind(self, set: Self) -> bool {
        !self.kind().intersection(set).is_empty()
    }

    /// Check if this is a definition kind (module, struct, union, or a
    /// forward declaration of either).
    #[inline]
    pub const fn is_definition(self) -> bool {
        self.intersects(Self::DEFINITIONS)
    }

    /// Check if the unbound marker is set.
    #[inline]
    pub const fn is_unbound(self) -> bool {
        self.contains(Self::UNBOUND)
    }

    /// Check if the kind bits name a basic scalar type.
    #[inline]
    pub const fn is_basic(self) -> bool {
        let kind = self.kind();
        !kind.is_empty() && Self::BASIC.contains(kind)
    }
}
