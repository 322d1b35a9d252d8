// Constants for the grid interpreter

/// Default tape length in cells
pub const DEFAULT_TAPE_CAPACITY: usize = 10_000;

/// Step at which the loop detector takes its first baseline
/// Earlier checkpoints misfire on short back-and-forth oscillations
pub const DEFAULT_DETECTION_START: u64 = 30;

/// No checkpoints are scheduled past this step
pub const DEFAULT_DETECTION_STOP: u64 = 5_000;

/// Default per-candidate step budget
pub const DEFAULT_MAX_STEPS: u64 = 10_000;

/// Pause between traced steps when verbosity is on
pub const DEFAULT_TRACE_DELAY_MS: u64 = 200;

/// Tape cells shown on either side of the pointer in traces
pub const TAPE_WINDOW_RADIUS: usize = 4;
