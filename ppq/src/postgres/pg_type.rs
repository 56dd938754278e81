
/// Postgres object identifier.
///
/// The oid type is implemented as an unsigned four-byte integer.
///
/// <https://www.postgresql.org/docs/current/datatype-oid.html>
pub type Oid = u32;

/// A type that have corresponding postgres oid.
///
/// The oid is the wire type identifier written in the header of
/// binary encoded arrays, so only array element types implement it.
pub trait PgType {
    const OID: Oid;
}

impl PgType for i64 {
    /// `int8` ~18 digit integer, 8-byte storage
    const OID: Oid = 20;
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::array::{ArrayElement, encode_array};

    fn header_oid<T: ArrayElement>(values: &[T]) -> Oid {
        let buf = encode_array(values);
        Oid::from_be_bytes([buf[8], buf[9], buf[10], buf[11]])
    }

    #[test]
    fn element_oid() {
        assert_eq!(i64::OID, 20);
        assert_eq!(header_oid::<i64>(&[]), i64::OID);
    }
}
