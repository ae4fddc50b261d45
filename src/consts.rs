/// Frequency of the master clock, in cycles per second.
pub const CPU_FREQ: u32 = 4194304;

/// Cycles charged for every memory access (fetch, operand
/// read or operand write).
pub const MEM_ACCESS_CYCLES: u16 = 4;

/// Cycles consumed by a halted CPU per step.
pub const HALT_CYCLES: u16 = 16;

/// Timer reload used when the GBS header does not request a
/// custom timer, ~59.7 Hz (VBlank).
pub const VBLANK_TIMER_TC: i32 = 70256;

/// Default output sampling rate, in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Number of interleaved 16-bit samples buffered between
/// writes to the PCM sink.
pub const SAMPLE_BUFFER_SIZE: usize = 4096;

// Timer registers
pub const TMA_ADDR: u16 = 0xff06;
pub const TAC_ADDR: u16 = 0xff07;

// Audio registers
pub const NR10_ADDR: u16 = 0xff10;
pub const NR52_ADDR: u16 = 0xff26;
pub const WAVE_RAM_ADDR: u16 = 0xff30;
