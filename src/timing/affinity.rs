//! CPU affinity helpers for stable measurements.
//!
//! Pinning the session to one core avoids cross-core TSC skew and keeps the
//! cache-eviction buffer resident in that core's cache hierarchy. Only
//! implemented on Linux; other platforms report `Unsupported` and the caller
//! is expected to pin manually if it matters.

use crate::error::Error;

/// Pin the calling thread to the given core.
#[cfg(target_os = "linux")]
pub fn pin_to_core(core: usize) -> Result<(), Error> {
    // SAFETY: cpu_set_t is a plain bitmask struct; CPU_ZERO/CPU_SET only
    // write within it, and sched_setaffinity reads it for the current thread.
    unsafe {
        let mut set: libc::cpu_set_t = std::mem::zeroed();
        libc::CPU_ZERO(&mut set);
        libc::CPU_SET(core, &mut set);
        if libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &set) != 0 {
            return Err(Error::Io(std::io::Error::last_os_error()));
        }
    }
    Ok(())
}

/// Pin the calling thread to the given core.
#[cfg(not(target_os = "linux"))]
pub fn pin_to_core(_core: usize) -> Result<(), Error> {
    Err(Error::Unsupported("core pinning requires Linux"))
}

/// The core the calling thread is currently running on, if known.
#[cfg(target_os = "linux")]
pub fn current_core() -> Option<usize> {
    // SAFETY: sched_getcpu takes no arguments and only returns a value.
    let cpu = unsafe { libc::sched_getcpu() };
    usize::try_from(cpu).ok()
}

/// The core the calling thread is currently running on, if known.
#[cfg(not(target_os = "linux"))]
pub fn current_core() -> Option<usize> {
    None
}
