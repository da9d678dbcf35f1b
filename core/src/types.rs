//! Shared primitive types used across the dashboard engine.

/// Calendar year of a record.
pub type Year = i32;

/// Calendar month, 1 = January.
pub type Month = u8;

/// Stable identifier of a transaction record.
pub type OrderNumber = String;

/// Monotonic counter stamped on every published bundle.
pub type Revision = u64;

/// All twelve months in natural order.
pub const MONTHS: [Month; 12] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];
