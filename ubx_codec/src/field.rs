//! Typed accessors over a payload buffer.
//!
//! Every field of a message is described by a small const descriptor: where it
//! lives, how wide it is and how the raw bits map to a value. Messages keep
//! their layout as tables of these descriptors, so an offset or mask is
//! written down exactly once.
//!
//! All reads and writes check the payload size first. A field that does not
//! fit (for example one that only exists in longer message versions) yields
//! [`FieldError::OutOfBounds`] instead of reading neighbouring memory.

use core::marker::PhantomData;
use num_traits::{float::FloatCore, AsPrimitive, NumCast, PrimInt};

use crate::error::FieldError;

/// Fixed width little-endian integer stored in a payload
pub trait Scalar: Copy + PartialEq + PartialOrd + core::fmt::Debug + NumCast + AsPrimitive<f64> {
    const WIDTH: usize;

    /// `bytes` is exactly `WIDTH` long
    fn read_le(bytes: &[u8]) -> Self;

    /// `out` is exactly `WIDTH` long
    fn write_le(self, out: &mut [u8]);
}

macro_rules! impl_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Scalar for $ty {
                const WIDTH: usize = core::mem::size_of::<$ty>();

                #[inline]
                fn read_le(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; core::mem::size_of::<$ty>()];
                    raw.copy_from_slice(bytes);
                    <$ty>::from_le_bytes(raw)
                }

                #[inline]
                fn write_le(self, out: &mut [u8]) {
                    out.copy_from_slice(&self.to_le_bytes());
                }
            }
        )*
    };
}

impl_scalar!(u8, i8, u16, i16, u32, i32);

fn window(payload: &[u8], offset: usize, width: usize) -> Result<&[u8], FieldError> {
    offset
        .checked_add(width)
        .and_then(|end| payload.get(offset..end))
        .ok_or(FieldError::OutOfBounds {
            offset,
            width,
            payload_len: payload.len(),
        })
}

fn window_mut(payload: &mut [u8], offset: usize, width: usize) -> Result<&mut [u8], FieldError> {
    let payload_len = payload.len();
    offset
        .checked_add(width)
        .and_then(|end| payload.get_mut(offset..end))
        .ok_or(FieldError::OutOfBounds {
            offset,
            width,
            payload_len,
        })
}

/// Anything that can be read out of a payload
pub trait FieldDescriptor {
    type Value<'a>;

    fn get<'a>(&self, payload: &'a [u8]) -> Result<Self::Value<'a>, FieldError>;
}

/// Plain integer at a byte offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field<T> {
    offset: usize,
    _ty: PhantomData<T>,
}

impl<T: Scalar> Field<T> {
    pub const fn at(offset: usize) -> Self {
        Self {
            offset,
            _ty: PhantomData,
        }
    }

    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// First byte after the field
    pub const fn end(&self) -> usize {
        self.offset + T::WIDTH
    }

    pub fn read(&self, payload: &[u8]) -> Result<T, FieldError> {
        window(payload, self.offset, T::WIDTH).map(T::read_le)
    }

    pub fn write(&self, payload: &mut [u8], value: T) -> Result<(), FieldError> {
        value.write_le(window_mut(payload, self.offset, T::WIDTH)?);
        Ok(())
    }
}

impl<T: Scalar> FieldDescriptor for Field<T> {
    type Value<'a> = T;

    fn get<'a>(&self, payload: &'a [u8]) -> Result<T, FieldError> {
        self.read(payload)
    }
}

/// Sub-field of an integer word selected by a contiguous mask.
///
/// The shift is always derived from the mask, `(word & mask) >> ctz(mask)`,
/// never written down separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitField<W> {
    word: Field<W>,
    mask: W,
}

impl<W: Scalar + PrimInt> BitField<W> {
    pub const fn new(offset: usize, mask: W) -> Self {
        Self {
            word: Field::at(offset),
            mask,
        }
    }

    pub fn mask(&self) -> W {
        self.mask
    }

    /// Trailing zeros of the mask, 0 for an empty mask
    pub fn shift(&self) -> u32 {
        if self.mask == W::zero() {
            return 0;
        }
        self.mask.trailing_zeros()
    }

    /// Largest value the field can hold, 0 for an empty mask
    pub fn max_value(&self) -> W {
        self.mask >> self.shift() as usize
    }

    /// Whether the mask is a single, non-empty run of ones
    pub fn is_contiguous(&self) -> bool {
        if self.mask == W::zero() {
            return false;
        }
        let max = self.max_value();
        let bits = W::zero().count_zeros();
        max.count_ones() + max.leading_zeros() == bits
    }

    /// Pull the field out of an already read word
    pub fn extract(&self, word: W) -> W {
        (word & self.mask) >> self.shift() as usize
    }

    /// Replace the field inside `word`, rejecting values wider than the mask
    pub fn insert(&self, word: W, value: W) -> Result<W, FieldError> {
        if value > self.max_value() {
            return Err(FieldError::invalid("value", "does not fit into the bit field"));
        }
        Ok((word & !self.mask) | ((value << self.shift() as usize) & self.mask))
    }

    pub fn read(&self, payload: &[u8]) -> Result<W, FieldError> {
        self.word.read(payload).map(|word| self.extract(word))
    }

    pub fn write(&self, payload: &mut [u8], value: W) -> Result<(), FieldError> {
        let word = self.word.read(payload)?;
        self.word.write(payload, self.insert(word, value)?)
    }
}

impl<W: Scalar + PrimInt> FieldDescriptor for BitField<W> {
    type Value<'a> = W;

    fn get<'a>(&self, payload: &'a [u8]) -> Result<W, FieldError> {
        self.read(payload)
    }
}

/// Integer with an implicit fixed-point scale: value = raw / scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scaled<T> {
    raw: Field<T>,
    scale: f64,
}

impl<T: Scalar> Scaled<T> {
    pub const fn new(offset: usize, scale: f64) -> Self {
        Self {
            raw: Field::at(offset),
            scale,
        }
    }

    pub const fn scale(&self) -> f64 {
        self.scale
    }

    pub fn decode(&self, raw: T) -> f64 {
        raw.as_() / self.scale
    }

    /// Round `value * scale` to the nearest raw integer
    pub fn encode(&self, value: f64) -> Result<T, FieldError> {
        <T as NumCast>::from(FloatCore::round(value * self.scale))
            .ok_or(FieldError::invalid("value", "out of range for the scaled field"))
    }

    pub fn read(&self, payload: &[u8]) -> Result<f64, FieldError> {
        self.raw.read(payload).map(|raw| self.decode(raw))
    }

    pub fn write(&self, payload: &mut [u8], value: f64) -> Result<(), FieldError> {
        let raw = self.encode(value)?;
        self.raw.write(payload, raw)
    }
}

impl<T: Scalar> FieldDescriptor for Scaled<T> {
    type Value<'a> = f64;

    fn get<'a>(&self, payload: &'a [u8]) -> Result<f64, FieldError> {
        self.read(payload)
    }
}

/// Fixed width, NUL-terminated ASCII text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Text {
    offset: usize,
    len: usize,
}

impl Text {
    pub const fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Text up to the first NUL, or the whole field when there is none.
    /// Bytes after the terminator are ignored.
    pub fn read<'a>(&self, payload: &'a [u8]) -> Result<&'a str, FieldError> {
        let raw = window(payload, self.offset, self.len)?;
        let end = raw.iter().position(|b| *b == 0).unwrap_or(raw.len());
        core::str::from_utf8(&raw[..end]).map_err(|_| FieldError::InvalidText {
            offset: self.offset,
        })
    }

    /// Store `text` and zero the rest of the field
    pub fn write(&self, payload: &mut [u8], text: &str) -> Result<(), FieldError> {
        let bytes = text.as_bytes();
        if bytes.len() > self.len {
            return Err(FieldError::invalid("text", "longer than the field"));
        }
        if bytes.contains(&0) {
            return Err(FieldError::invalid("text", "contains a NUL byte"));
        }
        let out = window_mut(payload, self.offset, self.len)?;
        out.fill(0);
        out[..bytes.len()].copy_from_slice(bytes);
        Ok(())
    }
}

impl FieldDescriptor for Text {
    type Value<'a> = &'a str;

    fn get<'a>(&self, payload: &'a [u8]) -> Result<&'a str, FieldError> {
        self.read(payload)
    }
}

/// Array of fixed size records starting at `offset`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Records {
    offset: usize,
    size: usize,
}

impl Records {
    pub const fn new(offset: usize, size: usize) -> Self {
        Self { offset, size }
    }

    pub const fn record_size(&self) -> usize {
        self.size
    }

    /// Byte offset of record `index` inside the payload
    pub fn record_offset(&self, index: usize) -> Option<usize> {
        index
            .checked_mul(self.size)
            .and_then(|rel| rel.checked_add(self.offset))
    }

    /// Record `index` of an array declaring `count` entries
    pub fn get<'a>(
        &self,
        payload: &'a [u8],
        count: usize,
        index: usize,
    ) -> Result<&'a [u8], FieldError> {
        if index >= count {
            return Err(FieldError::invalid("index", "outside of the record array"));
        }
        let offset = self.record_offset(index).ok_or(FieldError::OutOfBounds {
            offset: usize::MAX,
            width: self.size,
            payload_len: payload.len(),
        })?;
        window(payload, offset, self.size)
    }

    /// The first `count` records as one slice
    pub fn all<'a>(&self, payload: &'a [u8], count: usize) -> Result<&'a [u8], FieldError> {
        let width = count.checked_mul(self.size).ok_or(FieldError::OutOfBounds {
            offset: self.offset,
            width: usize::MAX,
            payload_len: payload.len(),
        })?;
        window(payload, self.offset, width)
    }

    /// Number of whole records the payload actually carries
    pub fn available(&self, payload: &[u8]) -> usize {
        match self.size {
            0 => 0,
            size => payload.len().saturating_sub(self.offset) / size,
        }
    }
}

/// Generate one-line getters from descriptor tables.
///
/// The type using it must have a `payload(&self) -> &[u8]` method.
macro_rules! ubx_getters {
    ($($(#[$attr:meta])* $name:ident: $ty:ty = $desc:expr;)*) => {
        $(
            $(#[$attr])*
            #[inline]
            pub fn $name(&self) -> Result<$ty, $crate::error::FieldError> {
                $crate::field::FieldDescriptor::get(&$desc, self.payload())
            }
        )*
    };
}

pub(crate) use ubx_getters;

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn scalars_are_little_endian_and_unaligned() {
        let payload = [0xaa, 0x78, 0x56, 0x34, 0x12, 0xfe, 0xff];
        assert_eq!(Field::<u32>::at(1).read(&payload), Ok(0x1234_5678));
        assert_eq!(Field::<u16>::at(1).read(&payload), Ok(0x5678));
        assert_eq!(Field::<i16>::at(5).read(&payload), Ok(-2));
        assert_eq!(Field::<i8>::at(6).read(&payload), Ok(-1));
        assert_eq!(Field::<u8>::at(0).read(&payload), Ok(0xaa));
        assert_eq!(Field::<i32>::at(3).read(&payload), Ok(-0x01ed_cc));
    }

    #[test]
    fn write_then_read() {
        let mut payload = [0u8; 8];
        Field::<i32>::at(3).write(&mut payload, -123_456).unwrap();
        assert_eq!(Field::<i32>::at(3).read(&payload), Ok(-123_456));
        assert_eq!(payload[0..3], [0, 0, 0]);
        assert_eq!(payload[7], 0);
    }

    #[test]
    fn out_of_bounds_is_reported() {
        let payload = [0u8; 5];
        assert_eq!(
            Field::<u32>::at(2).read(&payload),
            Err(FieldError::OutOfBounds {
                offset: 2,
                width: 4,
                payload_len: 5
            })
        );
        assert!(Field::<u8>::at(usize::MAX).read(&payload).is_err());
        let mut payload = payload;
        assert!(Field::<u16>::at(4).write(&mut payload, 1).is_err());
        assert_eq!(Field::<u32>::at(1).end(), 5);
        assert!(Field::<u32>::at(1).read(&payload).is_ok());
    }

    #[test]
    fn bitfield_shift_comes_from_mask() {
        let field = BitField::<u16>::new(0, 0x7c00);
        assert_eq!(field.shift(), 10);
        assert_eq!(field.max_value(), 0x1f);
        assert!(field.is_contiguous());
        assert_eq!(field.extract(0b1_10101_00000_11111), 0b10101);
    }

    #[test]
    fn bitfield_insert_keeps_other_bits() {
        let field = BitField::<u8>::new(0, 0x30);
        let word = field.insert(0xcf, 0x2).unwrap();
        assert_eq!(word, 0xef);
        assert_eq!(field.extract(word), 0x2);
        assert_eq!(
            field.insert(0, 4),
            Err(FieldError::invalid("value", "does not fit into the bit field"))
        );
    }

    #[test]
    fn bitfield_read_write_in_payload() {
        let field = BitField::<u32>::new(2, 0x0000_0700);
        let mut payload = [0xffu8; 6];
        field.write(&mut payload, 3).unwrap();
        assert_eq!(field.read(&payload), Ok(3));
        assert_eq!(payload, [0xff, 0xff, 0xff, 0xfb, 0xff, 0xff]);
    }

    #[test]
    fn non_contiguous_masks_are_detected() {
        assert!(!BitField::<u8>::new(0, 0b1010).is_contiguous());
        assert!(!BitField::<u8>::new(0, 0).is_contiguous());
        assert!(BitField::<u8>::new(0, 0xff).is_contiguous());
        assert!(BitField::<u32>::new(0, 0x8000_0000).is_contiguous());
    }

    #[test]
    fn empty_mask_holds_nothing() {
        let field = BitField::<u8>::new(0, 0);
        assert_eq!(field.shift(), 0);
        assert_eq!(field.max_value(), 0);
        assert_eq!(field.extract(0xff), 0);
        assert_eq!(field.insert(0xa5, 0), Ok(0xa5));
        assert!(field.insert(0xa5, 1).is_err());
    }

    /// Contiguous `u16` masks, the empty one included
    fn contiguous_mask() -> impl Strategy<Value = u16> {
        (0u32..16).prop_flat_map(|start| {
            (Just(start), 0u32..=16 - start).prop_map(|(start, len)| {
                let ones = if len == 16 { u16::MAX } else { (1u16 << len) - 1 };
                ones << start
            })
        })
    }

    proptest! {
        #[test]
        fn extracted_value_never_exceeds_mask(mask in any::<u16>(), word in any::<u16>()) {
            let field = BitField::<u16>::new(0, mask);
            let max = if mask == 0 { 0 } else { mask >> mask.trailing_zeros() };
            prop_assert_eq!(field.max_value(), max);
            prop_assert_eq!(field.extract(word), (word & mask) >> field.shift());
            prop_assert!(field.extract(word) <= max);
        }

        #[test]
        fn insert_accepts_exactly_the_values_that_fit(
            mask in contiguous_mask(),
            word in any::<u16>(),
            value in any::<u16>(),
        ) {
            let field = BitField::<u16>::new(0, mask);
            prop_assert_eq!(field.is_contiguous(), mask != 0);
            match field.insert(word, value) {
                Ok(updated) => {
                    prop_assert!(value <= field.max_value());
                    prop_assert_eq!(field.extract(updated), value);
                    prop_assert_eq!(updated & !mask, word & !mask);
                }
                Err(err) => {
                    prop_assert!(value > field.max_value());
                    prop_assert!(
                        matches!(err, FieldError::InvalidArgument { field: "value", .. }),
                        "unexpected error {:?}",
                        err
                    );
                }
            }
        }
    }

    #[test]
    fn scaled_hundredths() {
        let dop = Scaled::<u16>::new(0, 100.0);
        let payload = 156u16.to_le_bytes();
        assert_eq!(dop.read(&payload), Ok(1.56));

        let mut payload = [0u8; 2];
        dop.write(&mut payload, 2.346).unwrap();
        assert_eq!(u16::from_le_bytes(payload), 235);
        assert!(dop.write(&mut payload, -1.0).is_err());
        assert!(dop.write(&mut payload, 700.0).is_err());
        assert!(dop.write(&mut payload, f64::NAN).is_err());
    }

    #[test]
    fn scaled_signed_tenths() {
        let residual = Scaled::<i16>::new(0, 10.0);
        let payload = (-25i16).to_le_bytes();
        assert_eq!(residual.read(&payload), Ok(-2.5));
        assert_eq!(residual.encode(-2.54), Ok(-25));
    }

    #[test]
    fn text_stops_at_nul() {
        let payload = *b"ab\0zz\0\0\0xy";
        let text = Text::new(0, 8);
        assert_eq!(text.read(&payload), Ok("ab"));
        assert_eq!(Text::new(8, 2).read(&payload), Ok("xy"));
        assert!(Text::new(8, 3).read(&payload).is_err());
    }

    #[test]
    fn text_without_terminator_uses_whole_field() {
        let payload = *b"abcd";
        assert_eq!(Text::new(0, 4).read(&payload), Ok("abcd"));
        assert_eq!(Text::new(1, 2).read(&payload), Ok("bc"));
    }

    #[test]
    fn text_invalid_utf8() {
        let payload = [0x41, 0xff, 0x00];
        assert_eq!(
            Text::new(0, 3).read(&payload),
            Err(FieldError::InvalidText { offset: 0 })
        );
    }

    #[test]
    fn text_write_pads_and_validates() {
        let mut payload = [0xaau8; 6];
        let text = Text::new(1, 4);
        text.write(&mut payload, "hi").unwrap();
        assert_eq!(payload, [0xaa, b'h', b'i', 0, 0, 0xaa]);
        assert!(text.write(&mut payload, "hello").is_err());
        assert!(text.write(&mut payload, "a\0b").is_err());
    }

    #[test]
    fn records_bounds() {
        let records = Records::new(8, 12);
        let payload = [0u8; 8 + 2 * 12];
        assert_eq!(records.record_offset(1), Some(20));
        assert_eq!(records.available(&payload), 2);
        assert_eq!(records.get(&payload, 2, 1).unwrap().len(), 12);
        assert_eq!(
            records.get(&payload, 2, 2),
            Err(FieldError::invalid("index", "outside of the record array"))
        );
        // Declared count larger than what the payload carries
        assert!(matches!(
            records.get(&payload, 3, 2),
            Err(FieldError::OutOfBounds { offset: 32, .. })
        ));
        assert_eq!(records.all(&payload, 2).unwrap().len(), 24);
        assert_eq!(records.all(&payload, 0).unwrap().len(), 0);
        assert!(records.all(&payload, 3).is_err());
    }

    struct Sample([u8; 6]);

    impl Sample {
        fn payload(&self) -> &[u8] {
            &self.0
        }

        ubx_getters! {
            /// first word
            word: u16 = Field::<u16>::at(0);
            scaled: f64 = Scaled::<u16>::new(2, 10.0);
            bits: u8 = BitField::<u8>::new(4, 0x0c);
            name: &str = Text::new(5, 1);
            missing: u32 = Field::<u32>::at(4);
        }
    }

    #[test]
    fn getter_macro() {
        let sample = Sample([0x34, 0x12, 0x0f, 0x00, 0b0000_1000, b'x']);
        assert_eq!(sample.word(), Ok(0x1234));
        assert_eq!(sample.scaled(), Ok(1.5));
        assert_eq!(sample.bits(), Ok(2));
        assert_eq!(sample.name(), Ok("x"));
        assert!(sample.missing().is_err());
    }
}
