//! Remote command source contract.

#![allow(async_fn_in_trait)]

use doorward_core::DoorCommand;

/// External override channel, polled on a fixed interval.
///
/// Open and close are level-triggered: the node reads the current value each
/// poll and the controller decides whether it still applies. A source must
/// report [`DoorCommand::Reset`] once per operator write, not on every poll,
/// or a stale value would acknowledge later alarms. Read failures are the
/// source's to log; they surface as `None`.
pub trait RemoteCommandSource: Send {
    /// Current command value, `None` when empty, unknown, or unreadable.
    async fn read_command(&mut self) -> Option<DoorCommand>;

    /// Whether the source can be read at all. Unavailable sources are
    /// never polled.
    fn is_available(&self) -> bool {
        true
    }
}

/// An absent source is never available.
impl<T: RemoteCommandSource> RemoteCommandSource for Option<T> {
    async fn read_command(&mut self) -> Option<DoorCommand> {
        match self {
            Some(source) => source.read_command().await,
            None => None,
        }
    }

    fn is_available(&self) -> bool {
        self.as_ref().is_some_and(|source| source.is_available())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Option<DoorCommand>);

    impl RemoteCommandSource for Fixed {
        async fn read_command(&mut self) -> Option<DoorCommand> {
            self.0
        }
    }

    #[tokio::test]
    async fn test_option_passes_through() {
        let mut present = Some(Fixed(Some(DoorCommand::Open)));
        assert!(present.is_available());
        assert_eq!(present.read_command().await, Some(DoorCommand::Open));

        let mut absent: Option<Fixed> = None;
        assert!(!absent.is_available());
        assert_eq!(absent.read_command().await, None);
    }
}
