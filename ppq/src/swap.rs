//! Byte order engine.
//!
//! Postgres binary format stores every multi-byte integer in network byte order
//! (most significant byte first). The swaps here are pure and total, and each is
//! an involution: `swap(swap(x)) == x`.
//!
//! Wider swaps are composed from narrower ones, `swap32` swaps the two halves with
//! [`swap16`] and `swap64` swaps the two halves with [`swap32`].

/// Reverse the bytes of a 16 bit integer.
pub const fn swap16(value: u16) -> u16 {
    (value & 0xFF) << 8 | value >> 8
}

/// Reverse the bytes of a 32 bit integer.
pub const fn swap32(value: u32) -> u32 {
    (swap16((value & 0xFFFF) as u16) as u32) << 16 | swap16((value >> 16) as u16) as u32
}

/// Reverse the bytes of a 64 bit integer.
pub const fn swap64(value: u64) -> u64 {
    (swap32((value & 0xFFFF_FFFF) as u32) as u64) << 32 | swap32((value >> 32) as u32) as u64
}

macro_rules! network {
    ($(#[$doc:meta])* $name:ident, $ty:ty, $swap:ident) => {
        $(#[$doc])*
        ///
        /// Swap only on little endian host, so the in-memory representation
        /// is always network order.
        pub const fn $name(value: $ty) -> $ty {
            if cfg!(target_endian = "little") {
                $swap(value)
            } else {
                value
            }
        }
    };
}

network!(
    /// Convert between host and network order for 16 bit integer.
    to_network16, u16, swap16
);
network!(
    /// Convert between host and network order for 32 bit integer.
    to_network32, u32, swap32
);
network!(
    /// Convert between host and network order for 64 bit integer.
    to_network64, u64, swap64
);
