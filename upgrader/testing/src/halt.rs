use {
    std::fmt::Debug,
    upgrader_app::{AppError, AppResult, Halt},
};

/// Assertions on the outcome of a block that is expected to halt the node.
pub trait HaltExt {
    /// Ensure the result is a halt; return it.
    fn should_halt(self) -> Halt;

    /// Ensure the result is a halt, and equals the expected one.
    fn should_halt_with(self, expect: Halt) -> Halt
    where
        Self: Sized,
    {
        let halt = self.should_halt();
        assert_eq!(
            halt, expect,
            "halted as expected, but with different reason! expecting: {expect}, got: {halt}"
        );
        halt
    }
}

impl<T> HaltExt for AppResult<T>
where
    T: Debug,
{
    fn should_halt(self) -> Halt {
        match self {
            Err(AppError::Halt(halt)) => halt,
            Err(err) => panic!("expecting halt, got error: {err}"),
            Ok(value) => panic!("expecting halt, got ok: {value:?}"),
        }
    }
}
