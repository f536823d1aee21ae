use crate::pal::{Bindings, BindingsFacade};
use crate::{Error, Result, SlotTarget};

/// Applies a target's binding and priority requests to the calling thread and verifies
/// each against the operating system.
///
/// Both requests are best-effort as far as the OS is concerned, so each is read back
/// after being applied; a request that did not take effect is an error even when the
/// apply call itself reported success. An unpinned or mis-prioritized worker would
/// silently produce a different load pattern than the operator asked for.
pub(crate) fn apply(bindings: &BindingsFacade, target: &SlotTarget) -> Result<()> {
    if let Some(processor) = target.processor() {
        bindings
            .bind_current_thread(processor)
            .map_err(|source| Error::BindRejected { processor, source })?;

        let observed = bindings
            .current_thread_binding()
            .map_err(|source| Error::BindRejected { processor, source })?;

        if observed != [processor] {
            return Err(Error::BindNotEffective {
                processor,
                observed,
            });
        }

        tracing::debug!(processor, "worker bound to processor");
    }

    if let Some(priority) = target.priority() {
        bindings
            .set_current_thread_fifo(priority)
            .map_err(|source| Error::PriorityRejected { priority, source })?;

        let observed = bindings
            .current_thread_fifo()
            .map_err(|source| Error::PriorityRejected { priority, source })?;

        if observed != Some(priority) {
            return Err(Error::PriorityNotEffective { priority, observed });
        }

        tracing::debug!(priority = u32::from(priority), "worker placed under FIFO scheduling");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io;

    use mockall::predicate::eq;

    use crate::DutyRate;
    use crate::pal::MockBindings;

    use super::*;

    fn target(processor: Option<u32>, priority: Option<u8>) -> SlotTarget {
        SlotTarget::individual(processor, priority, DutyRate::ZERO)
    }

    #[test]
    fn no_requests_touch_nothing() {
        // The mock panics on any unexpected call, so this also proves no OS calls happen.
        let bindings = BindingsFacade::from_mock(MockBindings::new());

        apply(&bindings, &target(None, None)).unwrap();
    }

    #[test]
    fn binding_is_applied_and_verified() {
        let mut mock = MockBindings::new();
        mock.expect_bind_current_thread()
            .with(eq(3))
            .times(1)
            .returning(|_| Ok(()));
        mock.expect_current_thread_binding()
            .times(1)
            .returning(|| Ok(vec![3]));

        let bindings = BindingsFacade::from_mock(mock);

        apply(&bindings, &target(Some(3), None)).unwrap();
    }

    #[test]
    fn rejected_binding_is_fatal() {
        let mut mock = MockBindings::new();
        mock.expect_bind_current_thread()
            .returning(|_| Err(io::Error::from(io::ErrorKind::PermissionDenied)));

        let bindings = BindingsFacade::from_mock(mock);

        assert!(matches!(
            apply(&bindings, &target(Some(3), None)),
            Err(Error::BindRejected { processor: 3, .. })
        ));
    }

    #[test]
    fn ineffective_binding_is_fatal() {
        let mut mock = MockBindings::new();
        mock.expect_bind_current_thread().returning(|_| Ok(()));
        mock.expect_current_thread_binding()
            .returning(|| Ok(vec![0, 1, 2, 3]));

        let bindings = BindingsFacade::from_mock(mock);

        assert!(matches!(
            apply(&bindings, &target(Some(3), None)),
            Err(Error::BindNotEffective { processor: 3, .. })
        ));
    }

    #[test]
    fn priority_is_applied_and_verified() {
        let mut mock = MockBindings::new();
        mock.expect_set_current_thread_fifo()
            .with(eq(20))
            .times(1)
            .returning(|_| Ok(()));
        mock.expect_current_thread_fifo()
            .times(1)
            .returning(|| Ok(Some(20)));

        let bindings = BindingsFacade::from_mock(mock);

        apply(&bindings, &target(None, Some(20))).unwrap();
    }

    #[test]
    fn rejected_priority_is_fatal() {
        let mut mock = MockBindings::new();
        mock.expect_set_current_thread_fifo()
            .returning(|_| Err(io::Error::from(io::ErrorKind::PermissionDenied)));

        let bindings = BindingsFacade::from_mock(mock);

        assert!(matches!(
            apply(&bindings, &target(None, Some(20))),
            Err(Error::PriorityRejected { priority: 20, .. })
        ));
    }

    #[test]
    fn ineffective_priority_is_fatal() {
        let mut mock = MockBindings::new();
        mock.expect_set_current_thread_fifo().returning(|_| Ok(()));
        mock.expect_current_thread_fifo().returning(|| Ok(None));

        let bindings = BindingsFacade::from_mock(mock);

        assert!(matches!(
            apply(&bindings, &target(None, Some(20))),
            Err(Error::PriorityNotEffective {
                priority: 20,
                observed: None,
            })
        ));
    }

    #[test]
    fn binding_is_verified_before_priority_is_touched() {
        // The priority expectations are deliberately absent: a failed binding must abort
        // enforcement before the priority request is attempted.
        let mut mock = MockBindings::new();
        mock.expect_bind_current_thread().returning(|_| Ok(()));
        mock.expect_current_thread_binding().returning(|| Ok(vec![7]));

        let bindings = BindingsFacade::from_mock(mock);

        assert!(matches!(
            apply(&bindings, &target(Some(3), Some(20))),
            Err(Error::BindNotEffective { .. })
        ));
    }
}
