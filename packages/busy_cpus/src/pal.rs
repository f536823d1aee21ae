//! Platform access layer. This is private API - all FFI calls into the operating system
//! go through the [`Bindings`] trait here, enabling them to be mocked in tests.

mod abstractions;
pub(crate) use abstractions::*;

mod facade;
pub(crate) use facade::*;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
pub(crate) use linux::*;

// On operating systems without native support the fallback still reports the processor
// count, while binding and priority requests surface as unsupported. The enforcement
// contract turns that into a clean fatal error instead of silently running unpinned.
#[cfg(not(target_os = "linux"))]
mod fallback;
#[cfg(not(target_os = "linux"))]
pub(crate) use fallback::*;
