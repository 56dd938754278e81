use bytes::Bytes;
use std::ffi::{CStr, c_char};

/// Largest scalar is 8 bytes wide.
const INLINE_LEN: usize = 8;

/// Storage of a single encoded parameter.
///
/// The address returned by [`ValueRef::as_ptr`] is stable for as long as the
/// `ValueRef` itself is not moved, and the owner of the parameter list never
/// moves it while the list is borrowed.
pub(crate) enum ValueRef<'a> {
    /// Borrowed nul terminated string, passed through without copy.
    CStr(&'a CStr),
    /// Scalar bytes, right aligned.
    Inline {
        offset: usize,
        value: [u8; INLINE_LEN],
    },
    /// Heap buffer, used for arrays.
    Bytes(Bytes),
}

impl ValueRef<'_> {
    pub fn inline(slice: &[u8]) -> ValueRef<'static> {
        let len = slice.len();
        assert!(len <= INLINE_LEN, "inline slice is too large");
        let mut value = [0u8; INLINE_LEN];
        value[INLINE_LEN - len..].copy_from_slice(slice);
        ValueRef::Inline { offset: INLINE_LEN - len, value }
    }

    /// Value bytes, without the nul terminator for strings.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ValueRef::CStr(cstr) => cstr.to_bytes(),
            ValueRef::Inline { offset, value } => &value[*offset..],
            ValueRef::Bytes(bytes) => &bytes[..],
        }
    }

    /// Address of the first value byte.
    pub fn as_ptr(&self) -> *const c_char {
        match self {
            ValueRef::CStr(cstr) => cstr.as_ptr(),
            ValueRef::Inline { offset, value } => value[*offset..].as_ptr().cast(),
            ValueRef::Bytes(bytes) => bytes.as_ptr().cast(),
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }
}

impl std::fmt::Debug for ValueRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use crate::ext::FmtExt;
        std::fmt::Debug::fmt(&self.as_bytes().lossy(), f)
    }
}
