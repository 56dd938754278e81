//! One dimensional array codec.
//!
//! Binary array layout, all integers in network byte order:
//!
//! ```text
//! ┏━━━━━━┳━━━━━━━━━━━━┳━━━━━━━━━━┳━━━━━━┳━━━━━━━━┳━━━━━━━━━━━━━━━━━━━━━━━┓
//! ┃ ndim ┃ dataoffset ┃ elemtype ┃ size ┃ lbound ┃ (len, value) * size   ┃
//! ┣━━━━━━╋━━━━━━━━━━━━╋━━━━━━━━━━╋━━━━━━╋━━━━━━━━╋━━━━━━━━━━━━━━━━━━━━━━━┫
//! ┃ i32  ┃    i32     ┃   Oid    ┃ i32  ┃  i32   ┃ i32, [u8; len]        ┃
//! ┣━━━━━━╋━━━━━━━━━━━━╋━━━━━━━━━━╋━━━━━━╋━━━━━━━━╋━━━━━━━━━━━━━━━━━━━━━━━┫
//! ┃  1   ┃     0      ┃    20    ┃  n   ┃   0    ┃ 8, ..                 ┃
//! ┗━━━━━━┻━━━━━━━━━━━━┻━━━━━━━━━━┻━━━━━━┻━━━━━━━━┻━━━━━━━━━━━━━━━━━━━━━━━┛
//! ```
//!
//! Arrays are encode only, there is no decoding counterpart.
use bytes::{BufMut, Bytes, BytesMut};

use crate::{
    ext::UsizeExt,
    network::Network,
    postgres::{Oid, PgType},
};

/// Size of the array header, five 4 byte fields.
pub const HEADER_SIZE: usize = 5 * size_of::<i32>();

/// Size of the length prefix of each element.
pub const ELEMENT_PREFIX: usize = size_of::<i32>();

const DIMENSIONS: i32 = 1;
const DATA_OFFSET: i32 = 0;
const LOWER_BOUND: i32 = 0;

/// A type that can be an element of a binary encoded array.
///
/// This trait is sealed, only `i64` (`int8`, oid 20) is supported.
pub trait ArrayElement: Network + PgType + sealed::Sealed { }

impl sealed::Sealed for i64 { }
impl ArrayElement for i64 { }

/// Exact size of the encoded array of `count` elements.
pub const fn encoded_len<T: ArrayElement>(count: usize) -> usize {
    HEADER_SIZE + count * (ELEMENT_PREFIX + T::SIZE)
}

/// Encode one dimensional array into a single buffer.
///
/// Element order is preserved. An empty slice produces only the header with size zero.
pub fn encode_array<T: ArrayElement>(values: &[T]) -> Bytes {
    let size = encoded_len::<T>(values.len());
    let mut buf = BytesMut::with_capacity(size);

    buf.put_slice(&DIMENSIONS.to_network());
    buf.put_slice(&DATA_OFFSET.to_network());
    buf.put_slice(&<Oid as Network>::to_network(T::OID));
    buf.put_slice(&values.len().to_i32().to_network());
    buf.put_slice(&LOWER_BOUND.to_network());

    let elem_len = T::SIZE.to_i32().to_network();
    for value in values {
        buf.put_slice(&elem_len);
        buf.put_slice(value.to_network().as_ref());
    }

    assert_eq!(buf.len(), size, "encoded array size not equal to size hint");

    buf.freeze()
}

mod sealed {
    pub trait Sealed { }
}
