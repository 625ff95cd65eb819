//! Host-side run setup.
//!
//! Pinning the process to one core keeps the host timer probes from mixing
//! cycle counts of different cores. It has no effect under a simulator.

use std::io;

/// Pins the calling thread to `cpu`.
///
/// # Errors
///
/// `InvalidInput` when `cpu` is outside the affinity mask, otherwise the OS
/// error of `sched_setaffinity`.
#[cfg(target_os = "linux")]
pub fn pin_to_cpu(cpu: usize) -> io::Result<()> {
    if cpu >= libc::CPU_SETSIZE as usize {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("cpu {cpu} is outside the affinity mask"),
        ));
    }
    // SAFETY: `cpu_set_t` is a plain bit array for which all-zero is the
    // empty set, `cpu` was bounds-checked above, and the kernel only reads
    // `size_of::<cpu_set_t>()` bytes from the pointer.
    let rc = unsafe {
        let mut set: libc::cpu_set_t = std::mem::zeroed();
        libc::CPU_ZERO(&mut set);
        libc::CPU_SET(cpu, &mut set);
        libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &raw const set)
    };
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

/// Pinning is Linux-only; elsewhere this succeeds without doing anything.
///
/// # Errors
///
/// Never fails.
#[cfg(not(target_os = "linux"))]
pub fn pin_to_cpu(_cpu: usize) -> io::Result<()> {
    Ok(())
}
