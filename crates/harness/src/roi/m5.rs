//! gem5 pseudo-instruction sink.
//!
//! Issues `m5_dump_reset_stats(id, variant)` at both ROI boundaries, so gem5
//! dumps the statistics accumulated so far and starts a fresh section. The
//! pseudo-instruction encodings follow gem5's `util/m5` ABI:
//!
//! | Arch    | Encoding                                  | Args       |
//! |---------|-------------------------------------------|------------|
//! | x86_64  | `0F 04` followed by the 16-bit function    | `rdi, rsi` |
//! | aarch64 | `0xff000110 \| (func << 16)`               | `x0, x1`   |
//! | riscv64 | `0x0000007b \| (func << 25)`               | `a0, a1`   |
//!
//! These instructions are illegal on real hardware. The sink only exists in
//! builds with the `m5ops` feature on one of the three architectures;
//! [`M5Sink::new`] returns `None` everywhere else.

use super::StatsSink;

/// gem5 function number of `dump_reset_stats`.
pub const M5OP_DUMP_RESET_STATS: u16 = 0x42;

/// Whether this build can emit gem5 pseudo-instructions.
pub const M5OPS_AVAILABLE: bool = cfg!(all(
    feature = "m5ops",
    any(
        target_arch = "x86_64",
        target_arch = "aarch64",
        target_arch = "riscv64"
    )
));

#[cfg(all(feature = "m5ops", target_arch = "x86_64"))]
#[inline(always)]
fn dump_reset_stats(delay: u64, period: u64) {
    // SAFETY: only reachable through an `M5Sink`, which exists only when the
    // user opted into running under gem5, where this opcode is a no-fault
    // pseudo-instruction that reads rdi/rsi and writes rax.
    unsafe {
        std::arch::asm!(
            ".byte 0x0f, 0x04",
            ".word 0x42",
            in("rdi") delay,
            in("rsi") period,
            lateout("rax") _,
            options(nostack),
        );
    }
}

#[cfg(all(feature = "m5ops", target_arch = "aarch64"))]
#[inline(always)]
fn dump_reset_stats(delay: u64, period: u64) {
    // SAFETY: see the x86_64 variant; gem5 reads x0/x1 and writes x0.
    unsafe {
        std::arch::asm!(
            ".inst 0xff420110",
            inlateout("x0") delay => _,
            in("x1") period,
            options(nostack),
        );
    }
}

#[cfg(all(feature = "m5ops", target_arch = "riscv64"))]
#[inline(always)]
fn dump_reset_stats(delay: u64, period: u64) {
    // SAFETY: see the x86_64 variant; gem5 reads a0/a1 and writes a0.
    unsafe {
        std::arch::asm!(
            ".long 0x8400007b",
            inlateout("a0") delay => _,
            in("a1") period,
            options(nostack),
        );
    }
}

#[cfg(not(all(
    feature = "m5ops",
    any(
        target_arch = "x86_64",
        target_arch = "aarch64",
        target_arch = "riscv64"
    )
)))]
#[inline(always)]
fn dump_reset_stats(_delay: u64, _period: u64) {}

/// Sink that delimits the ROI with gem5 stats dump-and-reset.
#[derive(Debug)]
pub struct M5Sink {
    _private: (),
}

impl M5Sink {
    /// Returns the sink when this build can emit gem5 pseudo-instructions.
    pub fn new() -> Option<Self> {
        M5OPS_AVAILABLE.then_some(Self { _private: () })
    }
}

impl StatsSink for M5Sink {
    fn name(&self) -> &'static str {
        "m5"
    }

    fn begin_roi(&mut self, id: u64, variant: u64) {
        dump_reset_stats(id, variant);
    }

    fn end_roi(&mut self, id: u64, variant: u64) {
        dump_reset_stats(id, variant);
    }
}
