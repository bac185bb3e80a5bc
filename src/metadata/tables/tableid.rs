use strum::{EnumCount, EnumIter};

/// Identifier of a metadata table (ECMA-335 II.22).
///
/// The discriminant is the table number as it appears in the `#~` stream
/// header and in the high byte of a metadata token.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, EnumIter, EnumCount)]
pub enum TableId {
    /// `Module` (0x00) - the current module.
    Module = 0x00,
    /// `TypeRef` (0x01) - references to types in other scopes.
    TypeRef = 0x01,
    /// `TypeDef` (0x02) - types defined in this module.
    TypeDef = 0x02,
    /// `FieldPtr` (0x03) - indirection table for fields.
    FieldPtr = 0x03,
    /// `Field` (0x04) - field definitions.
    Field = 0x04,
    /// `MethodPtr` (0x05) - indirection table for methods.
    MethodPtr = 0x05,
    /// `MethodDef` (0x06) - method definitions.
    MethodDef = 0x06,
    /// `ParamPtr` (0x07) - indirection table for parameters.
    ParamPtr = 0x07,
    /// `Param` (0x08) - parameter definitions.
    Param = 0x08,
    /// `InterfaceImpl` (0x09) - interface implementations.
    InterfaceImpl = 0x09,
    /// `MemberRef` (0x0A) - references to members of other types.
    MemberRef = 0x0A,
    /// `Constant` (0x0B) - compile-time constant values.
    Constant = 0x0B,
    /// `CustomAttribute` (0x0C) - custom attribute instances.
    CustomAttribute = 0x0C,
    /// `FieldMarshal` (0x0D) - marshalling descriptors.
    FieldMarshal = 0x0D,
    /// `DeclSecurity` (0x0E) - declarative security.
    DeclSecurity = 0x0E,
    /// `ClassLayout` (0x0F) - explicit type layout.
    ClassLayout = 0x0F,
    /// `FieldLayout` (0x10) - explicit field offsets.
    FieldLayout = 0x10,
    /// `StandAloneSig` (0x11) - standalone signatures.
    StandAloneSig = 0x11,
    /// `EventMap` (0x12) - type-to-event mappings.
    EventMap = 0x12,
    /// `EventPtr` (0x13) - indirection table for events.
    EventPtr = 0x13,
    /// `Event` (0x14) - event definitions.
    Event = 0x14,
    /// `PropertyMap` (0x15) - type-to-property mappings.
    PropertyMap = 0x15,
    /// `PropertyPtr` (0x16) - indirection table for properties.
    PropertyPtr = 0x16,
    /// `Property` (0x17) - property definitions.
    Property = 0x17,
    /// `MethodSemantics` (0x18) - property/event accessor bindings.
    MethodSemantics = 0x18,
    /// `MethodImpl` (0x19) - explicit method overrides.
    MethodImpl = 0x19,
    /// `ModuleRef` (0x1A) - references to external modules.
    ModuleRef = 0x1A,
    /// `TypeSpec` (0x1B) - type signatures used as tokens.
    TypeSpec = 0x1B,
    /// `ImplMap` (0x1C) - P/Invoke mappings.
    ImplMap = 0x1C,
    /// `FieldRVA` (0x1D) - field data addresses.
    FieldRVA = 0x1D,
    /// `EncLog` (0x1E) - edit-and-continue log.
    EncLog = 0x1E,
    /// `EncMap` (0x1F) - edit-and-continue map.
    EncMap = 0x1F,
    /// `Assembly` (0x20) - the current assembly.
    Assembly = 0x20,
    /// `AssemblyProcessor` (0x21) - processor-specific assembly info.
    AssemblyProcessor = 0x21,
    /// `AssemblyOS` (0x22) - OS-specific assembly info.
    AssemblyOS = 0x22,
    /// `AssemblyRef` (0x23) - references to external assemblies.
    AssemblyRef = 0x23,
    /// `AssemblyRefProcessor` (0x24) - external assembly processor info.
    AssemblyRefProcessor = 0x24,
    /// `AssemblyRefOS` (0x25) - external assembly OS info.
    AssemblyRefOS = 0x25,
    /// `File` (0x26) - files in the assembly.
    File = 0x26,
    /// `ExportedType` (0x27) - types exported from this assembly.
    ExportedType = 0x27,
    /// `ManifestResource` (0x28) - embedded or linked resources.
    ManifestResource = 0x28,
    /// `NestedClass` (0x29) - nesting relationships.
    NestedClass = 0x29,
    /// `GenericParam` (0x2A) - generic parameter declarations.
    GenericParam = 0x2A,
    /// `MethodSpec` (0x2B) - instantiated generic methods.
    MethodSpec = 0x2B,
    /// `GenericParamConstraint` (0x2C) - generic parameter constraints.
    GenericParamConstraint = 0x2C,
}

impl TableId {
    /// The token base for this table: the table number shifted into the high
    /// byte, ready to be combined with a 1-based row index.
    #[must_use]
    pub fn token_base(self) -> u32 {
        (self as u32) << 24
    }
}
