use std::sync::{
    atomic::{AtomicBool, Ordering},
    Once,
};

use tracing::debug;

static INSTALL: Once = Once::new();
static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Makes [`CompositeKeyAwareCompiler`] the compiler of every serializer
/// created afterwards without an explicit choice. Calling it again does
/// nothing.
///
/// [`CompositeKeyAwareCompiler`]: crate::CompositeKeyAwareCompiler
pub fn install() {
    INSTALL.call_once(|| {
        debug!("installing composite key aware statement compiler");
        INSTALLED.store(true, Ordering::Release);
    });
}

pub fn is_installed() -> bool {
    INSTALLED.load(Ordering::Acquire)
}
