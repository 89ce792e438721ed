//! Action cursor
//!
//! A test case is a sequence of actions (for example HTTP calls). The driver
//! sets the cursor before each action so every score recorded afterwards can
//! be attributed to it. The cursor is shared by all threads: when the program
//! under test runs several actions concurrently, updates go to whichever
//! index was set last.

use crate::result::{SensorError, SensorResult};
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub(crate) struct ActionCursor {
    index: AtomicUsize,
}

impl ActionCursor {
    pub(crate) fn set(&self, index: i32) -> SensorResult<usize> {
        let index = usize::try_from(index).map_err(|_| {
            SensorError::invalid(format!("Negative action index: {index}"))
        })?;
        self.index.store(index, Ordering::Release);
        Ok(index)
    }

    #[inline]
    pub(crate) fn get(&self) -> usize {
        self.index.load(Ordering::Acquire)
    }

    pub(crate) fn reset(&self) {
        self.index.store(0, Ordering::Release);
    }
}
