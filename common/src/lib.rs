pub mod opendota;

/// Marks a match record as a best-effort reconstruction from replay events
/// rather than a fully parsed record.
pub const RECONSTRUCTED_VERSION: u32 = 1;
