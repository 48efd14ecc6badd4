use std::task::{RawWaker, RawWakerVTable, Waker};

/// Waker that does nothing. Pending loads are polled once per frame by the
/// asset pump, so there is no executor to wake.
pub(crate) struct DummyWaker;

impl DummyWaker {
    pub fn into_task_waker(self) -> Waker {
        const VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);

        fn clone(_: *const ()) -> RawWaker {
            RawWaker::new(std::ptr::null(), &VTABLE)
        }

        fn no_op(_: *const ()) {}

        let raw = RawWaker::new(std::ptr::null(), &VTABLE);
        unsafe { Waker::from_raw(raw) }
    }
}
