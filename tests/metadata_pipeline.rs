//! End-to-end pipeline over a crafted `#~` stream: build heaps and rows,
//! derive index widths from the stream header, read everything back, edit a
//! property through its façade and rebuild.

use std::sync::Arc;

use dotmeta::{
    metadata::{
        signatures::{read_element, ElementValue, TypeSignature},
        streams::{Blob, BlobBuffer, Guid, GuidBuffer, Strings, StringsBuffer},
        tables::{
            write_table, CodedIndex, ConstantRaw, FieldRaw, MetadataTable, ModuleRaw, Property,
            PropertyMapRaw, PropertyRaw, RowReadable, TableId, TableInfo, TableInfoRef,
            TypeDefRaw,
        },
        token::Token,
        typesystem::TypeRegistry,
    },
    Parser,
};

/// Byte image of a tables stream holding the crafted rows, together with the
/// heaps they point into.
struct CraftedStream {
    tables_data: Vec<u8>,
    sizes: TableInfoRef,
    strings_data: Vec<u8>,
    blob_data: Vec<u8>,
    guid_data: Vec<u8>,
}

const ROW_COUNTS: &[(TableId, u32)] = &[
    (TableId::Module, 1),
    (TableId::TypeDef, 1),
    (TableId::Field, 1),
    (TableId::Constant, 1),
    (TableId::PropertyMap, 1),
    (TableId::Property, 2),
];

fn craft_stream() -> CraftedStream {
    let mut strings = StringsBuffer::new();
    let module_name = strings.get_or_add("crafted.dll");
    let type_name = strings.get_or_add("SomeType");
    let type_namespace = strings.get_or_add("NS");
    let field_name = strings.get_or_add("_value");
    let property_name = strings.get_or_add("MyProperty");
    let other_property_name = strings.get_or_add("OtherProperty");

    let mut blob = BlobBuffer::new();
    // FIELD, I4
    let field_signature = blob.get_or_add(&[0x06, 0x08]).unwrap();
    // PROPERTY | HASTHIS, 0 params, I4
    let property_signature = blob.get_or_add(&[0x28, 0x00, 0x08]).unwrap();
    // 42 as a 4-byte constant
    let constant_value = blob.get_or_add(&[0x2A, 0x00, 0x00, 0x00]).unwrap();

    let mut guids = GuidBuffer::new();
    let mvid = guids.get_or_add(uguid::guid!("01020304-0506-0708-090a-0b0c0d0e0f10"));

    // #~ header: heap-size flags at offset 6 (all narrow), the valid
    // bitvector at offset 8, one row count per set bit from offset 24
    let mut header = vec![0u8; 24];
    header[4] = 2; // major version
    let valid: u64 = ROW_COUNTS
        .iter()
        .fold(0, |bits, (table, _)| bits | 1u64 << (*table as usize));
    header[8..16].copy_from_slice(&valid.to_le_bytes());
    for (_, count) in ROW_COUNTS {
        header.extend_from_slice(&count.to_le_bytes());
    }

    let sizes: TableInfoRef = Arc::new(TableInfo::new(&header).unwrap());

    let modules = [ModuleRaw {
        rid: 1,
        token: Token::new(0x0000_0001),
        offset: 0,
        generation: 0,
        name: module_name,
        mvid,
        encid: 0,
        encbaseid: 0,
    }];
    let type_defs = [TypeDefRaw {
        rid: 1,
        token: Token::new(0x0200_0001),
        offset: 0,
        flags: 0x0000_0001,
        name: type_name,
        namespace: type_namespace,
        extends: CodedIndex::new(TableId::TypeDef, 0),
        field_list: 1,
        method_list: 1,
    }];
    let fields = [FieldRaw {
        rid: 1,
        token: Token::new(0x0400_0001),
        offset: 0,
        flags: 0x8006,
        name: field_name,
        signature: field_signature,
    }];
    let constants = [ConstantRaw {
        rid: 1,
        token: Token::new(0x0B00_0001),
        offset: 0,
        base_type: 0x08,
        parent: CodedIndex::new(TableId::Field, 1),
        value: constant_value,
    }];
    let property_maps = [PropertyMapRaw {
        rid: 1,
        token: Token::new(0x1500_0001),
        offset: 0,
        parent: 1,
        property_list: 1,
    }];
    let properties = [
        PropertyRaw {
            rid: 1,
            token: Token::new(0x1700_0001),
            offset: 0,
            flags: 0,
            name: property_name,
            signature: property_signature,
        },
        PropertyRaw {
            rid: 2,
            token: Token::new(0x1700_0002),
            offset: 0,
            flags: 0,
            name: other_property_name,
            signature: property_signature,
        },
    ];

    let mut tables_data = Vec::new();
    tables_data.extend_from_slice(&write_table(&modules, &sizes).unwrap());
    tables_data.extend_from_slice(&write_table(&type_defs, &sizes).unwrap());
    tables_data.extend_from_slice(&write_table(&fields, &sizes).unwrap());
    tables_data.extend_from_slice(&write_table(&constants, &sizes).unwrap());
    tables_data.extend_from_slice(&write_table(&property_maps, &sizes).unwrap());
    tables_data.extend_from_slice(&write_table(&properties, &sizes).unwrap());

    CraftedStream {
        tables_data,
        sizes,
        strings_data: strings.data().to_vec(),
        blob_data: blob.data().to_vec(),
        guid_data: guids.data().to_vec(),
    }
}

/// Byte offset of `table` inside the crafted row data.
fn table_offset(sizes: &TableInfoRef, table: TableId) -> usize {
    let mut offset = 0usize;
    for (id, count) in ROW_COUNTS {
        if *id == table {
            return offset;
        }
        let row_size = match id {
            TableId::Module => <ModuleRaw as RowReadable>::row_size(sizes),
            TableId::TypeDef => <TypeDefRaw as RowReadable>::row_size(sizes),
            TableId::Field => <FieldRaw as RowReadable>::row_size(sizes),
            TableId::Constant => <ConstantRaw as RowReadable>::row_size(sizes),
            TableId::PropertyMap => <PropertyMapRaw as RowReadable>::row_size(sizes),
            TableId::Property => <PropertyRaw as RowReadable>::row_size(sizes),
            _ => unreachable!(),
        };
        offset += row_size as usize * *count as usize;
    }
    offset
}

fn read_table<'a, T: RowReadable>(
    stream: &'a CraftedStream,
    table: TableId,
    row_count: u32,
) -> MetadataTable<'a, T> {
    let offset = table_offset(&stream.sizes, table);
    MetadataTable::new(&stream.tables_data[offset..], row_count, stream.sizes.clone()).unwrap()
}

#[test]
fn rows_read_back_with_header_derived_widths() {
    let stream = craft_stream();
    let strings = Strings::from(&stream.strings_data).unwrap();
    let guids = Guid::from(&stream.guid_data).unwrap();

    let modules = read_table::<ModuleRaw>(&stream, TableId::Module, 1);
    let module = modules.get(1).unwrap();
    assert_eq!(strings.get(module.name as usize).unwrap(), "crafted.dll");
    assert_eq!(
        guids.get(module.mvid as usize).unwrap(),
        uguid::guid!("01020304-0506-0708-090a-0b0c0d0e0f10")
    );

    let type_defs = read_table::<TypeDefRaw>(&stream, TableId::TypeDef, 1);
    let type_def = type_defs.get(1).unwrap();
    assert_eq!(strings.get(type_def.name as usize).unwrap(), "SomeType");
    assert_eq!(strings.get(type_def.namespace as usize).unwrap(), "NS");
    assert_eq!(type_def.extends.row, 0);
    assert_eq!(type_def.field_list, 1);

    let fields = read_table::<FieldRaw>(&stream, TableId::Field, 1);
    let field = fields.get(1).unwrap();
    assert_eq!(strings.get(field.name as usize).unwrap(), "_value");
    assert_eq!(field.token, Token::new(0x0400_0001));
}

#[test]
fn constant_value_decodes_through_the_element_codec() {
    let stream = craft_stream();
    let blob = Blob::from(&stream.blob_data).unwrap();
    let registry = TypeRegistry::new();

    let constants = read_table::<ConstantRaw>(&stream, TableId::Constant, 1);
    let constant = constants.get(1).unwrap();
    assert_eq!(constant.base_type, 0x08);
    assert_eq!(constant.parent.tag, TableId::Field);
    assert_eq!(constant.parent.row, 1);

    let value_blob = blob.get(constant.value as usize).unwrap();
    let mut parser = Parser::new(value_blob);
    let value = read_element(&mut parser, &TypeSignature::I4, &registry).unwrap();
    assert_eq!(value, ElementValue::I4(42));
    assert!(!parser.has_more_data());
}

#[test]
fn property_facade_reads_edits_and_rebuilds() {
    let stream = craft_stream();
    let strings = Strings::from(&stream.strings_data).unwrap();
    let blob = Blob::from(&stream.blob_data).unwrap();

    let properties = read_table::<PropertyRaw>(&stream, TableId::Property, 2);
    let maps = read_table::<PropertyMapRaw>(&stream, TableId::PropertyMap, 1);

    let property = Property::from_raw(&properties.get(1).unwrap());
    assert_eq!(property.name(&strings).unwrap(), "MyProperty");
    assert_eq!(property.signature(&blob).unwrap().base, TypeSignature::I4);
    assert_eq!(property.owner(&maps, 2), Some(Token::new(0x0200_0001)));
    assert_eq!(
        property
            .full_name(&strings, &blob, Some("NS.SomeType"))
            .unwrap(),
        "System.Int32 NS.SomeType::MyProperty"
    );

    // Edit, flush into fresh heaps and serialize the new rows
    property.set_name("Renamed".to_string());

    let mut new_strings = StringsBuffer::new();
    let mut new_blob = BlobBuffer::new();
    let first = property
        .flush(&strings, &blob, &mut new_strings, &mut new_blob)
        .unwrap();
    let second = Property::from_raw(&properties.get(2).unwrap())
        .flush(&strings, &blob, &mut new_strings, &mut new_blob)
        .unwrap();

    let rows = [first, second];
    let data = write_table(&rows, &stream.sizes).unwrap();
    let reread = MetadataTable::<PropertyRaw>::new(&data, 2, stream.sizes.clone()).unwrap();

    let reread_strings = Strings::from(new_strings.data()).unwrap();
    let reread_blob = Blob::from(new_blob.data()).unwrap();

    let renamed = reread.get(1).unwrap();
    assert_eq!(
        reread_strings.get(renamed.name as usize).unwrap(),
        "Renamed"
    );
    // The untouched signature re-encodes to identical bytes
    assert_eq!(
        reread_blob.get(renamed.signature as usize).unwrap(),
        &[0x28, 0x00, 0x08]
    );

    let untouched = reread.get(2).unwrap();
    assert_eq!(
        reread_strings.get(untouched.name as usize).unwrap(),
        "OtherProperty"
    );
    // Both rows reference the interned signature blob, stored once
    assert_eq!(renamed.signature, untouched.signature);
}
