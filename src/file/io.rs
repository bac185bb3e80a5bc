//! Bounds-checked little-endian reads and writes over byte slices.
//!
//! Metadata tables are a packed little-endian format whose index columns are
//! either 2 or 4 bytes wide depending on run-time heap and table sizes. The
//! `*_dyn` variants cover that case: they read or write a `u16` promoted
//! to/truncated from `u32` when the index is narrow, and a full `u32` when it
//! is wide. All functions fail with [`crate::Error::OutOfBounds`] instead of
//! panicking when the buffer is too short.

use crate::{Error::OutOfBounds, Result};

/// Conversion between a primitive value and its little-endian byte image.
///
/// Implemented for every scalar type that appears in metadata rows and
/// signature blobs (unsigned/signed integers and IEEE-754 floats).
pub trait LeBytes: Sized {
    /// The fixed-size byte array holding the encoded value.
    type Bytes: Sized + for<'a> TryFrom<&'a [u8]>;

    /// Decode a value from its little-endian byte image.
    fn from_le(bytes: Self::Bytes) -> Self;
    /// Encode a value into its little-endian byte image.
    fn to_le(self) -> Self::Bytes;
}

macro_rules! impl_le_bytes {
    ($($t:ty),*) => {
        $(
            impl LeBytes for $t {
                type Bytes = [u8; std::mem::size_of::<$t>()];

                fn from_le(bytes: Self::Bytes) -> Self {
                    <$t>::from_le_bytes(bytes)
                }

                fn to_le(self) -> Self::Bytes {
                    <$t>::to_le_bytes(self)
                }
            }
        )*
    };
}

impl_le_bytes!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

/// Read a `T` at `offset`, advancing the offset by the bytes consumed.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if fewer than `size_of::<T>()` bytes
/// remain at `offset`.
pub fn read_le_at<T: LeBytes>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    match offset.checked_add(type_len) {
        Some(end) if end <= data.len() => {}
        _ => return Err(OutOfBounds),
    }

    let Ok(bytes) = data[*offset..*offset + type_len].try_into() else {
        return Err(OutOfBounds);
    };

    *offset += type_len;

    Ok(T::from_le(bytes))
}

/// Read a 2- or 4-byte index at `offset`, promoted to `u32`.
///
/// `is_large` selects the width; narrow reads consume 2 bytes, wide reads 4.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the buffer is too short.
pub fn read_le_at_dyn(data: &[u8], offset: &mut usize, is_large: bool) -> Result<u32> {
    if is_large {
        read_le_at::<u32>(data, offset)
    } else {
        Ok(u32::from(read_le_at::<u16>(data, offset)?))
    }
}

/// Write a `T` at `offset`, advancing the offset by the bytes emitted.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if fewer than `size_of::<T>()` bytes
/// remain at `offset`.
pub fn write_le_at<T: LeBytes>(data: &mut [u8], offset: &mut usize, value: T) -> Result<()>
where
    T::Bytes: AsRef<[u8]>,
{
    let type_len = std::mem::size_of::<T>();
    match offset.checked_add(type_len) {
        Some(end) if end <= data.len() => {}
        _ => return Err(OutOfBounds),
    }

    data[*offset..*offset + type_len].copy_from_slice(value.to_le().as_ref());
    *offset += type_len;

    Ok(())
}

/// Write a 2- or 4-byte index at `offset`.
///
/// `is_large` selects the width; narrow writes truncate the value to `u16`.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the buffer is too short, or
/// [`crate::Error::ModificationInvalid`] if a narrow write would lose bits.
#[allow(clippy::cast_possible_truncation)]
pub fn write_le_at_dyn(data: &mut [u8], offset: &mut usize, value: u32, is_large: bool) -> Result<()> {
    if is_large {
        write_le_at::<u32>(data, offset, value)
    } else {
        if value > u32::from(u16::MAX) {
            return Err(crate::Error::ModificationInvalid(format!(
                "Index value 0x{value:08x} does not fit a 2 byte column"
            )));
        }
        write_le_at::<u16>(data, offset, value as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_BUFFER: [u8; 8] = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];

    #[test]
    fn read_scalars() {
        let mut offset = 0;
        assert_eq!(read_le_at::<u16>(&TEST_BUFFER, &mut offset).unwrap(), 0x0201);
        assert_eq!(read_le_at::<u32>(&TEST_BUFFER, &mut offset).unwrap(), 0x0605_0403);
        assert_eq!(offset, 6);

        offset = 0;
        assert_eq!(
            read_le_at::<u64>(&TEST_BUFFER, &mut offset).unwrap(),
            0x0807_0605_0403_0201
        );

        offset = 0;
        assert_eq!(read_le_at::<i8>(&[0xFF], &mut offset).unwrap(), -1);
    }

    #[test]
    fn read_dyn_widths() {
        let mut offset = 0;
        assert_eq!(read_le_at_dyn(&TEST_BUFFER, &mut offset, false).unwrap(), 0x0201);
        assert_eq!(offset, 2);

        offset = 0;
        assert_eq!(read_le_at_dyn(&TEST_BUFFER, &mut offset, true).unwrap(), 0x0403_0201);
        assert_eq!(offset, 4);
    }

    #[test]
    fn write_scalars() {
        let mut buffer = [0u8; 8];
        let mut offset = 0;

        write_le_at(&mut buffer, &mut offset, 0x1234u16).unwrap();
        write_le_at(&mut buffer, &mut offset, 0xAABB_CCDDu32).unwrap();
        assert_eq!(offset, 6);
        assert_eq!(buffer, [0x34, 0x12, 0xDD, 0xCC, 0xBB, 0xAA, 0x00, 0x00]);
    }

    #[test]
    fn write_dyn_widths() {
        let mut buffer = [0u8; 6];
        let mut offset = 0;

        write_le_at_dyn(&mut buffer, &mut offset, 0x1234, false).unwrap();
        write_le_at_dyn(&mut buffer, &mut offset, 0x5678_9ABC, true).unwrap();
        assert_eq!(offset, 6);
        assert_eq!(buffer, [0x34, 0x12, 0xBC, 0x9A, 0x78, 0x56]);

        // A narrow column cannot hold a wide value
        offset = 0;
        assert!(write_le_at_dyn(&mut buffer, &mut offset, 0x0001_0000, false).is_err());
    }

    #[test]
    fn out_of_bounds() {
        let buffer = [0xFFu8; 4];
        let mut offset = 0;
        assert!(matches!(read_le_at::<u64>(&buffer, &mut offset), Err(OutOfBounds)));

        let mut small = [0u8; 2];
        let mut offset = 0;
        assert!(matches!(
            write_le_at(&mut small, &mut offset, 1u32),
            Err(OutOfBounds)
        ));
    }

    #[test]
    fn round_trip() {
        let mut buffer = [0u8; 8];
        let mut offset = 0;
        write_le_at(&mut buffer, &mut offset, 1.0f32).unwrap();
        assert_eq!(&buffer[..4], &[0x00, 0x00, 0x80, 0x3F]);

        offset = 0;
        assert_eq!(read_le_at::<f32>(&buffer, &mut offset).unwrap(), 1.0f32);
    }
}
