/// Identifies a specific logical processor.
///
/// This will match the numeric identifier used by standard tooling of the operating system.
pub type ProcessorId = u32;

/// A fixed-priority real-time scheduling level.
///
/// Valid levels are in the range `0..=99`, matching the priority range of the operating
/// system's FIFO scheduling class.
pub type FifoPriority = u8;

/// The highest valid [`FifoPriority`] level.
pub const MAX_FIFO_PRIORITY: FifoPriority = 99;
