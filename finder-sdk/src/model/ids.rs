//! Composite 64-bit meeting identifiers
//!
//! Aggregator backends merge meetings from many upstream servers, so a
//! server-local meeting ID is not unique on its own. The SDK packs the
//! upstream server ID into the top 20 bits and the server-local meeting ID
//! into the bottom 44 bits. Query builders and response parsers share this
//! split; changing it on one side breaks ID round trips.

/// Bits reserved for the server-local meeting ID (low bits)
pub const LOCAL_ID_BITS: u32 = 44;

/// Bits reserved for the upstream server ID (high bits)
pub const SERVER_ID_BITS: u32 = 64 - LOCAL_ID_BITS;

const LOCAL_ID_MASK: u64 = (1 << LOCAL_ID_BITS) - 1;
const SERVER_ID_MASK: u64 = (1 << SERVER_ID_BITS) - 1;

/// Pack a (server ID, local meeting ID) pair into one composite ID.
///
/// Out-of-range components are masked to their bit budget so a corrupt
/// upstream value cannot bleed into the other half.
pub fn compose(server_id: u64, local_id: u64) -> u64 {
    ((server_id & SERVER_ID_MASK) << LOCAL_ID_BITS) | (local_id & LOCAL_ID_MASK)
}

/// Unpack a composite ID back into its (server ID, local meeting ID) pair.
pub fn decompose(id: u64) -> (u64, u64) {
    (id >> LOCAL_ID_BITS, id & LOCAL_ID_MASK)
}
