use std::sync::{OnceLock, RwLock};

use crate::{
    metadata::{
        signatures::{encode_property_signature, parse_property_signature, SignatureProperty},
        streams::{Blob, BlobBuffer, Strings, StringsBuffer},
        tables::{MetadataTable, PropertyMapRaw, PropertyRaw, TableId},
        token::Token,
    },
    Result,
};

/// A slot that is either still backed by the original heap data or already
/// materialized (by lazy load or assignment).
struct LazySlot<T> {
    value: RwLock<Option<T>>,
}

impl<T: Clone> LazySlot<T> {
    fn empty() -> Self {
        LazySlot {
            value: RwLock::new(None),
        }
    }

    fn get_or_load(&self, load: impl FnOnce() -> Result<T>) -> Result<T> {
        if let Ok(guard) = self.value.read() {
            if let Some(value) = guard.as_ref() {
                return Ok(value.clone());
            }
        }

        let loaded = load()?;
        if let Ok(mut guard) = self.value.write() {
            // Another thread may have won the race; keep its value
            if guard.is_none() {
                *guard = Some(loaded.clone());
            }
        }
        Ok(loaded)
    }

    fn set(&self, value: T) {
        if let Ok(mut guard) = self.value.write() {
            *guard = Some(value);
        }
    }
}

/// Editable view of one `Property` row.
///
/// Heap-backed members resolve lazily on first access and are cached; the
/// setters replace the cached value and invalidate anything derived from it.
/// Reads never mutate the underlying heaps, so a `Property` that is only
/// inspected leaves its row byte-identical on rebuild.
pub struct Property {
    /// Token of the underlying row (`0x17xxxxxx`).
    pub token: Token,
    /// `PropertyAttributes` bit mask.
    pub flags: u16,
    name_index: u32,
    signature_index: u32,
    name: LazySlot<String>,
    signature: LazySlot<SignatureProperty>,
    full_name: RwLock<Option<String>>,
    owner: OnceLock<Option<Token>>,
}

impl Property {
    /// Wrap a raw row in its editable façade. No heap access happens here.
    #[must_use]
    pub fn from_raw(raw: &PropertyRaw) -> Self {
        Property {
            token: raw.token,
            flags: raw.flags,
            name_index: raw.name,
            signature_index: raw.signature,
            name: LazySlot::empty(),
            signature: LazySlot::empty(),
            full_name: RwLock::new(None),
            owner: OnceLock::new(),
        }
    }

    /// The property name, resolved from `strings` on first access.
    ///
    /// # Errors
    /// Returns an error if the name index is invalid.
    pub fn name(&self, strings: &Strings) -> Result<String> {
        self.name
            .get_or_load(|| Ok(strings.get(self.name_index as usize)?.to_string()))
    }

    /// Replace the property name. Derived state is recomputed on next access.
    pub fn set_name(&self, value: String) {
        self.name.set(value);
        self.invalidate_full_name();
    }

    /// The parsed property signature, resolved from `blob` on first access.
    ///
    /// # Errors
    /// Returns an error if the signature index or blob content is invalid.
    pub fn signature(&self, blob: &Blob) -> Result<SignatureProperty> {
        self.signature
            .get_or_load(|| parse_property_signature(blob.get(self.signature_index as usize)?))
    }

    /// Replace the property signature. Derived state is recomputed on next
    /// access.
    pub fn set_signature(&self, value: SignatureProperty) {
        self.signature.set(value);
        self.invalidate_full_name();
    }

    /// The display name `{property type} {declaring type}::{name}`, cached
    /// until a setter invalidates it.
    ///
    /// `declaring_type` is the full name of the owning type, if known.
    ///
    /// # Errors
    /// Returns an error if name or signature resolution fails.
    pub fn full_name(
        &self,
        strings: &Strings,
        blob: &Blob,
        declaring_type: Option<&str>,
    ) -> Result<String> {
        if let Ok(guard) = self.full_name.read() {
            if let Some(cached) = guard.as_ref() {
                return Ok(cached.clone());
            }
        }

        let name = self.name(strings)?;
        let signature = self.signature(blob)?;
        let computed = match declaring_type {
            Some(owner) => format!("{} {}::{}", signature.base, owner, name),
            None => format!("{} {}", signature.base, name),
        };

        if let Ok(mut guard) = self.full_name.write() {
            *guard = Some(computed.clone());
        }
        Ok(computed)
    }

    /// The `TypeDef` token of the type owning this property, found by
    /// scanning the `PropertyMap` run lists. The scan runs once; the result
    /// is cached.
    ///
    /// `property_count` is the total number of `Property` rows, needed to
    /// close the last run.
    pub fn owner(
        &self,
        maps: &MetadataTable<PropertyMapRaw>,
        property_count: u32,
    ) -> Option<Token> {
        *self.owner.get_or_init(|| {
            let row = self.token.row();

            for index in 1..=maps.row_count() {
                let map = maps.get(index)?;
                let next_list = match maps.get(index + 1) {
                    Some(next) => next.property_list,
                    None => property_count + 1,
                };

                if map.contains_property(row, next_list) {
                    return Some(Token::new(TableId::TypeDef.token_base() | map.parent));
                }
            }

            None
        })
    }

    /// Write the current state back out: intern the name and the re-encoded
    /// signature into the rebuild buffers and return the row referencing
    /// them.
    ///
    /// Members never touched are loaded from the source heaps first, so an
    /// unmodified property round-trips with equal content.
    ///
    /// # Errors
    /// Returns an error if resolution or signature encoding fails.
    pub fn flush(
        &self,
        strings_src: &Strings,
        blob_src: &Blob,
        strings: &mut StringsBuffer,
        blob: &mut BlobBuffer,
    ) -> Result<PropertyRaw> {
        let name = self.name(strings_src)?;
        let signature = self.signature(blob_src)?;

        Ok(PropertyRaw {
            rid: self.token.row(),
            token: self.token,
            offset: 0,
            flags: self.flags,
            name: strings.get_or_add(&name),
            signature: blob.get_or_add(&encode_property_signature(&signature)?)?,
        })
    }

    fn invalidate_full_name(&self) {
        if let Ok(mut guard) = self.full_name.write() {
            *guard = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::signatures::TypeSignature;
    use crate::metadata::tables::{write_table, RowWritable, TableInfo};
    use std::sync::Arc;

    fn sample_heaps() -> (Vec<u8>, Vec<u8>) {
        let mut strings = StringsBuffer::new();
        assert_eq!(strings.get_or_add("MyProperty"), 1);

        let mut blob = BlobBuffer::new();
        // PROPERTY HASTHIS, 0 params, I4
        assert_eq!(blob.get_or_add(&[0x28, 0x00, 0x08]).unwrap(), 1);

        (strings.data().to_vec(), blob.data().to_vec())
    }

    fn sample_property() -> Property {
        Property::from_raw(&PropertyRaw {
            rid: 1,
            token: Token::new(0x1700_0001),
            offset: 0,
            flags: 0,
            name: 1,
            signature: 1,
        })
    }

    #[test]
    fn lazy_resolution() {
        let (strings_data, blob_data) = sample_heaps();
        let strings = Strings::from(&strings_data).unwrap();
        let blob = Blob::from(&blob_data).unwrap();

        let property = sample_property();
        assert_eq!(property.name(&strings).unwrap(), "MyProperty");
        assert_eq!(
            property.signature(&blob).unwrap().base,
            TypeSignature::I4
        );
        // Cached: a second read does not consult the heap again
        assert_eq!(property.name(&strings).unwrap(), "MyProperty");
    }

    #[test]
    fn full_name_invalidation() {
        let (strings_data, blob_data) = sample_heaps();
        let strings = Strings::from(&strings_data).unwrap();
        let blob = Blob::from(&blob_data).unwrap();

        let property = sample_property();
        assert_eq!(
            property
                .full_name(&strings, &blob, Some("NS.SomeType"))
                .unwrap(),
            "System.Int32 NS.SomeType::MyProperty"
        );

        property.set_name("Renamed".to_string());
        assert_eq!(
            property
                .full_name(&strings, &blob, Some("NS.SomeType"))
                .unwrap(),
            "System.Int32 NS.SomeType::Renamed"
        );

        property.set_signature(SignatureProperty {
            has_this: true,
            modifiers: Vec::new(),
            base: TypeSignature::String,
            params: Vec::new(),
        });
        assert_eq!(
            property
                .full_name(&strings, &blob, Some("NS.SomeType"))
                .unwrap(),
            "System.String NS.SomeType::Renamed"
        );
    }

    #[test]
    fn owner_scan() {
        // Two maps: TypeDef 1 owns properties 1-2, TypeDef 3 owns 3..
        let maps = vec![
            PropertyMapRaw {
                rid: 1,
                token: Token::new(0x1500_0001),
                offset: 0,
                parent: 1,
                property_list: 1,
            },
            PropertyMapRaw {
                rid: 2,
                token: Token::new(0x1500_0002),
                offset: 0,
                parent: 3,
                property_list: 3,
            },
        ];

        let sizes = Arc::new(TableInfo::new_test(
            &[
                (TableId::PropertyMap, 2),
                (TableId::TypeDef, 5),
                (TableId::Property, 4),
            ],
            false,
            false,
            false,
        ));
        let data = write_table(&maps, &sizes).unwrap();
        let table = MetadataTable::<PropertyMapRaw>::new(&data, 2, sizes).unwrap();

        let second = Property::from_raw(&PropertyRaw {
            rid: 2,
            token: Token::new(0x1700_0002),
            offset: 0,
            flags: 0,
            name: 1,
            signature: 1,
        });
        assert_eq!(second.owner(&table, 4), Some(Token::new(0x0200_0001)));

        let fourth = Property::from_raw(&PropertyRaw {
            rid: 4,
            token: Token::new(0x1700_0004),
            offset: 0,
            flags: 0,
            name: 1,
            signature: 1,
        });
        assert_eq!(fourth.owner(&table, 4), Some(Token::new(0x0200_0003)));
    }

    #[test]
    fn flush_unmodified_and_modified() {
        let (strings_data, blob_data) = sample_heaps();
        let strings_src = Strings::from(&strings_data).unwrap();
        let blob_src = Blob::from(&blob_data).unwrap();

        // Untouched property: flushed content equals the original
        let property = sample_property();
        let mut strings_out = StringsBuffer::new();
        let mut blob_out = BlobBuffer::new();
        let raw = property
            .flush(&strings_src, &blob_src, &mut strings_out, &mut blob_out)
            .unwrap();
        assert_eq!(raw.token, property.token);

        let reread_strings = Strings::from(strings_out.data()).unwrap();
        let reread_blob = Blob::from(blob_out.data()).unwrap();
        assert_eq!(reread_strings.get(raw.name as usize).unwrap(), "MyProperty");
        assert_eq!(
            reread_blob.get(raw.signature as usize).unwrap(),
            &[0x28, 0x00, 0x08]
        );

        // Renamed property: the new name lands in the buffer
        property.set_name("Changed".to_string());
        let mut strings_out = StringsBuffer::new();
        let mut blob_out = BlobBuffer::new();
        let raw = property
            .flush(&strings_src, &blob_src, &mut strings_out, &mut blob_out)
            .unwrap();
        let reread_strings = Strings::from(strings_out.data()).unwrap();
        assert_eq!(reread_strings.get(raw.name as usize).unwrap(), "Changed");
    }
}
