use crate::failure::AllocationFailure;

/// The outcome of a checked allocation: either the diagnostic for a failed
/// request, or sole ownership of the resource that was allocated.
///
/// A `CheckedResult` is handled by [`dispatch`](CheckedResult::dispatch),
/// which takes one handler per variant and runs exactly one of them.
#[must_use = "a checked allocation must be dispatched to either handler"]
#[derive(Debug, PartialEq, Eq)]
pub enum CheckedResult<T> {
    Failure(AllocationFailure),
    Success(T),
}

impl<T> CheckedResult<T> {
    /// Consumes the result, moving the resource into `on_success` or the
    /// diagnostic into `on_failure`.
    pub fn dispatch<R>(
        self,
        on_success: impl FnOnce(T) -> R,
        on_failure: impl FnOnce(AllocationFailure) -> R,
    ) -> R {
        match self {
            CheckedResult::Success(resource) => on_success(resource),
            CheckedResult::Failure(failure) => on_failure(failure),
        }
    }

    /// Like [`dispatch`](CheckedResult::dispatch), but lends the resource to
    /// `on_success` so the caller keeps it afterwards.
    pub fn visit_mut<R>(
        &mut self,
        on_success: impl FnOnce(&mut T) -> R,
        on_failure: impl FnOnce(&AllocationFailure) -> R,
    ) -> R {
        match self {
            CheckedResult::Success(resource) => on_success(resource),
            CheckedResult::Failure(failure) => on_failure(failure),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CheckedResult::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    pub fn success(self) -> Option<T> {
        match self {
            CheckedResult::Success(resource) => Some(resource),
            CheckedResult::Failure(_) => None,
        }
    }

    pub fn failure(self) -> Option<AllocationFailure> {
        match self {
            CheckedResult::Success(_) => None,
            CheckedResult::Failure(failure) => Some(failure),
        }
    }

    pub fn as_ref(&self) -> CheckedResult<&T> {
        match self {
            CheckedResult::Success(resource) => CheckedResult::Success(resource),
            CheckedResult::Failure(failure) => CheckedResult::Failure(*failure),
        }
    }

    pub fn as_mut(&mut self) -> CheckedResult<&mut T> {
        match self {
            CheckedResult::Success(resource) => CheckedResult::Success(resource),
            CheckedResult::Failure(failure) => CheckedResult::Failure(*failure),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> CheckedResult<U> {
        match self {
            CheckedResult::Success(resource) => CheckedResult::Success(f(resource)),
            CheckedResult::Failure(failure) => CheckedResult::Failure(failure),
        }
    }

    /// Converts into a plain `Result`, for use with `?`.
    pub fn into_result(self) -> Result<T, AllocationFailure> {
        self.into()
    }
}

impl<T> From<CheckedResult<T>> for Result<T, AllocationFailure> {
    fn from(result: CheckedResult<T>) -> Self {
        match result {
            CheckedResult::Success(resource) => Ok(resource),
            CheckedResult::Failure(failure) => Err(failure),
        }
    }
}

impl<T> From<Result<T, AllocationFailure>> for CheckedResult<T> {
    fn from(result: Result<T, AllocationFailure>) -> Self {
        match result {
            Ok(resource) => CheckedResult::Success(resource),
            Err(failure) => CheckedResult::Failure(failure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    #[test]
    fn dispatch_success_runs_one_handler() {
        let successes = Cell::new(0);
        let failures = Cell::new(0);
        let value = CheckedResult::Success(7u8).dispatch(
            |v| {
                successes.set(successes.get() + 1);
                v
            },
            |_| {
                failures.set(failures.get() + 1);
                0
            },
        );
        assert_eq!(value, 7);
        assert_eq!((successes.get(), failures.get()), (1, 0));
    }

    #[test]
    fn dispatch_failure_runs_one_handler() {
        let successes = Cell::new(0);
        let failures = Cell::new(0);
        CheckedResult::<u8>::Failure(AllocationFailure::ZeroSized).dispatch(
            |_| successes.set(successes.get() + 1),
            |failure| {
                assert_eq!(failure, AllocationFailure::ZeroSized);
                failures.set(failures.get() + 1);
            },
        );
        assert_eq!((successes.get(), failures.get()), (0, 1));
    }

    #[test]
    fn visit_mut_keeps_mutation() {
        let mut result = CheckedResult::Success(1i32);
        result.visit_mut(|v| *v = 5, |_| unreachable!());
        assert_eq!(result.success(), Some(5));
    }

    #[test]
    fn visit_mut_failure_skips_success() {
        let successes = Cell::new(0);
        let mut result = CheckedResult::<u8>::Failure(AllocationFailure::ZeroSized);
        let seen = result.visit_mut(
            |_| {
                successes.set(successes.get() + 1);
                None
            },
            |failure| Some(*failure),
        );
        assert_eq!(seen, Some(AllocationFailure::ZeroSized));
        assert_eq!(successes.get(), 0);
        assert!(result.is_failure());
    }

    #[test]
    fn as_ref_and_as_mut() {
        let mut ok = CheckedResult::Success(2u32);
        assert_eq!(ok.as_ref(), CheckedResult::Success(&2));
        if let CheckedResult::Success(v) = ok.as_mut() {
            *v += 1;
        }
        assert_eq!(ok.success(), Some(3));

        let mut failed = CheckedResult::<u32>::Failure(AllocationFailure::LayoutOverflow);
        assert_eq!(
            failed.as_ref(),
            CheckedResult::Failure(AllocationFailure::LayoutOverflow)
        );
        assert_eq!(
            failed.as_mut().failure(),
            Some(AllocationFailure::LayoutOverflow)
        );
        assert!(failed.is_failure());
    }

    #[test]
    fn result_conversions() {
        let failed: CheckedResult<()> = CheckedResult::Failure(AllocationFailure::LayoutOverflow);
        assert!(failed.is_failure());
        assert_eq!(failed.into_result(), Err(AllocationFailure::LayoutOverflow));

        let ok: CheckedResult<u16> = Ok(3u16).into();
        assert_eq!(ok.map(|v| v * 2).success(), Some(6));
    }
}
