//! Player loop and subsong lifecycle.
//!
//! The [`Player`] owns the complete emulation state and drives it
//! single-threaded: it steps the CPU, counts the elapsed cycles
//! against the callback timer, synthesizes the call into the
//! driver's play routine when the timer fires and feeds the cycle
//! stream to the APU. Finished samples are flushed to an attached
//! PCM sink as interleaved little-endian signed 16-bit stereo.

use std::io::Write;

use soundboy_common::error::Error;

use crate::{
    apu::Apu,
    consts::{SAMPLE_BUFFER_SIZE, TAC_ADDR, TMA_ADDR, WAVE_RAM_ADDR},
    cpu::Cpu,
    gbs::Gbs,
    mmu::Mmu,
    timer::Timer,
};

/// Code placed at address 0x0000, the return target of the init
/// routine and of every play callback: halt until the timer fires,
/// then loop back into the halt.
const PLAYER_STUB: [u8; 3] = [
    0x76, // HALT
    0x18, 0xfd, // JR $-3
];

/// Wave pattern loaded into 0xFF30-0xFF3F at subsong start, the
/// pattern the DMG boot ROM leaves behind.
const DMG_WAVE_PATTERN: [u8; 16] = [
    0xac, 0xdd, 0xda, 0x48, 0x36, 0x02, 0xcf, 0x16, 0x2c, 0x04, 0xe5, 0x2c, 0xac, 0xdd, 0xda,
    0x48,
];

pub struct Player {
    gbs: Gbs,

    /// The CPU, owning the MMU which in turn owns the APU and the
    /// callback timer.
    cpu: Cpu,

    /// Currently loaded subsong (1-based).
    subsong: u8,

    /// Wall clock of the emulation, in cycles since the subsong was
    /// loaded.
    total_cycles: u64,

    /// Number of synthesized calls into the driver's play routine.
    play_calls: u64,

    /// The PCM sink; buffered samples are dropped when no sink is
    /// attached.
    sink: Option<Box<dyn Write>>,
}

impl Player {
    pub fn new(gbs: Gbs, sampling_rate: u32) -> Self {
        let mmu = Mmu::new(Apu::new(sampling_rate), Timer::new());
        Self {
            gbs,
            cpu: Cpu::new(mmu),
            subsong: 0,
            total_cycles: 0,
            play_calls: 0,
            sink: None,
        }
    }

    pub fn attach_sink(&mut self, sink: Box<dyn Write>) {
        self.sink = Some(sink);
    }

    /// Loads the given subsong (1-based), resetting the CPU, memory
    /// and audio state and running the format's setup sequence.
    pub fn load(&mut self, subsong: u8) -> Result<(), Error> {
        let count = self.gbs.song_count();
        if subsong == 0 || subsong > count {
            return Err(Error::SubsongOutOfRange(subsong, count));
        }
        self.subsong = subsong;
        self.total_cycles = 0;
        self.play_calls = 0;

        self.cpu.reset();
        self.cpu.mmu().reset();
        self.cpu.apu().reset();
        self.cpu.timer().reset();

        // ROM image sized up to a 16 KiB multiple, with the driver
        // body at the load address and the halt stub at the reset
        // vector
        let mut rom = vec![0x00; self.gbs.rom_size()];
        let load = self.gbs.load_addr() as usize;
        let body = self.gbs.body();
        rom[load..load + body.len()].copy_from_slice(body);
        rom[..PLAYER_STUB.len()].copy_from_slice(&PLAYER_STUB);
        self.cpu.mmu().set_rom(rom);

        self.cpu.set_pc(self.gbs.init_addr());
        self.cpu.set_sp(self.gbs.stack_addr());
        self.cpu.a = subsong - 1;
        self.cpu.set_rst_base(self.gbs.load_addr());

        // the init routine's final RET lands on the halt stub
        self.cpu.push_word(0x0000);

        for (index, value) in DMG_WAVE_PATTERN.iter().enumerate() {
            self.cpu.mmu().write(WAVE_RAM_ADDR + index as u16, *value);
        }

        if self.gbs.custom_timer() {
            let modulo = self.gbs.timer_modulo();
            let control = self.gbs.timer_control();
            self.cpu.mmu().write(TMA_ADDR, modulo);
            self.cpu.mmu().write(TAC_ADDR, control);
        }
        self.cpu.timer().rearm();

        self.cpu.clear_cycles();
        Ok(())
    }

    /// Runs one iteration of the player loop: a single CPU step (or
    /// a halted wait), timer accounting, the synthesized play call
    /// when due, and the APU advance. Returns the cycles charged to
    /// the wall clock.
    pub fn tick(&mut self) -> Result<u16, Error> {
        let cycles = self.cpu.clock()?;
        self.total_cycles += cycles as u64;

        if self.cpu.timer().clock(cycles) {
            // the driver expects a plain call into its play routine
            // on every tick; its final RET resumes the halt stub
            self.cpu.set_halted(false);
            let pc = self.cpu.pc();
            self.cpu.push_word(pc);
            self.cpu.set_pc(self.gbs.play_addr());
            self.play_calls += 1;
        }

        // the stack traffic of the synthesized call reaches the APU
        // on top of the instruction's own cycles
        let apu_cycles = self.cpu.cycles();
        self.cpu.apu().clock(apu_cycles);

        if self.cpu.apu_i().buffer().len() >= SAMPLE_BUFFER_SIZE {
            self.drain()?;
        }

        Ok(cycles)
    }

    /// Drives the player until the given cycle limit is reached,
    /// flushing remaining samples at the end. With no limit, runs
    /// until the sink stops accepting data or the driver trips an
    /// unknown opcode.
    pub fn run(&mut self, limit: Option<u64>) -> Result<(), Error> {
        while limit.map_or(true, |value| self.total_cycles < value) {
            self.tick()?;
        }
        self.flush()
    }

    /// Runs for (at least) the given number of cycles.
    pub fn run_cycles(&mut self, cycles: u64) -> Result<u64, Error> {
        let start = self.total_cycles;
        while self.total_cycles - start < cycles {
            self.tick()?;
        }
        Ok(self.total_cycles - start)
    }

    /// Writes out any buffered samples and flushes the sink.
    pub fn flush(&mut self) -> Result<(), Error> {
        self.drain()?;
        if let Some(sink) = self.sink.as_mut() {
            sink.flush()
                .map_err(|error| Error::CustomError(format!("Failed to flush PCM output: {error}")))?;
        }
        Ok(())
    }

    #[inline(always)]
    pub fn gbs(&self) -> &Gbs {
        &self.gbs
    }

    #[inline(always)]
    pub fn cpu(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    #[inline(always)]
    pub fn cpu_i(&self) -> &Cpu {
        &self.cpu
    }

    #[inline(always)]
    pub fn subsong(&self) -> u8 {
        self.subsong
    }

    #[inline(always)]
    pub fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    #[inline(always)]
    pub fn play_calls(&self) -> u64 {
        self.play_calls
    }

    fn drain(&mut self) -> Result<(), Error> {
        if let Some(sink) = self.sink.as_mut() {
            let samples = self.cpu.apu_i().buffer();
            let mut bytes = Vec::with_capacity(samples.len() * 2);
            for sample in samples {
                bytes.extend_from_slice(&sample.to_le_bytes());
            }
            sink.write_all(&bytes)
                .map_err(|error| Error::CustomError(format!("Failed to write PCM output: {error}")))?;
        }
        self.cpu.apu().clear_buffer();
        Ok(())
    }
}
