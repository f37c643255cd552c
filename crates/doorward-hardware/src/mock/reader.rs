//! Mock proximity reader for testing and development.
//!
//! Cards are presented through [`MockReaderHandle`] as raw UID bytes and
//! surface on the next [`CredentialReader::poll`], exactly one read per
//! presentation.

use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use doorward_core::CredentialId;
use tokio::sync::mpsc::{self, error::TryRecvError};

use crate::{HardwareError, Result, traits::CredentialReader, types::DeviceInfo};

/// Mock proximity credential reader.
///
/// # Examples
///
/// ```
/// use doorward_hardware::mock::MockReader;
/// use doorward_hardware::traits::CredentialReader;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> doorward_hardware::Result<()> {
///     let (mut reader, handle) = MockReader::new();
///     assert!(reader.poll().await?.is_none());
///
///     handle.present_uid(&[0xE3, 0x87, 0x26, 0x29]).await?;
///     let id = reader.poll().await?.expect("card in field");
///     assert_eq!(id.as_str(), "E3 87 26 29");
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockReader {
    /// Presented UIDs waiting to be read
    uid_rx: mpsc::Receiver<Vec<u8>>,

    /// Device name
    name: String,

    shared: Arc<ReaderShared>,
}

#[derive(Debug, Default)]
struct ReaderShared {
    reinitializations: AtomicUsize,
    polls: AtomicUsize,
    offline: AtomicBool,
}

impl MockReader {
    /// Create a new mock reader with the default name.
    pub fn new() -> (Self, MockReaderHandle) {
        Self::with_name("Mock Proximity Reader")
    }

    /// Create a new mock reader with a custom name.
    pub fn with_name(name: impl Into<String>) -> (Self, MockReaderHandle) {
        let (uid_tx, uid_rx) = mpsc::channel(32);
        let shared = Arc::new(ReaderShared::default());
        let name = name.into();

        let reader = Self {
            uid_rx,
            name: name.clone(),
            shared: Arc::clone(&shared),
        };
        let handle = MockReaderHandle {
            uid_tx,
            name,
            shared,
        };

        (reader, handle)
    }
}

impl Default for MockReader {
    fn default() -> Self {
        Self::new().0
    }
}

impl CredentialReader for MockReader {
    async fn poll(&mut self) -> Result<Option<CredentialId>> {
        self.shared.polls.fetch_add(1, Ordering::Relaxed);
        if self.shared.offline.load(Ordering::Relaxed) {
            return Err(HardwareError::disconnected(self.name.clone()));
        }

        match self.uid_rx.try_recv() {
            Ok(uid) => Ok(Some(CredentialId::from_uid_bytes(&uid)?)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(HardwareError::disconnected(format!(
                "{}: presentation channel closed",
                self.name
            ))),
        }
    }

    async fn reinitialize(&mut self) -> Result<()> {
        if self.shared.offline.load(Ordering::Relaxed) {
            return Err(HardwareError::initialization_failed(format!(
                "{} is offline",
                self.name
            )));
        }
        // A fresh session forgets any card that was still in the field.
        while self.uid_rx.try_recv().is_ok() {}
        self.shared.reinitializations.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn info(&self) -> Result<DeviceInfo> {
        Ok(DeviceInfo::new(self.name.clone(), "ISO14443A").with_firmware_version("mock"))
    }
}

/// Handle for presenting cards to a [`MockReader`].
#[derive(Debug, Clone)]
pub struct MockReaderHandle {
    uid_tx: mpsc::Sender<Vec<u8>>,
    name: String,
    shared: Arc<ReaderShared>,
}

impl MockReaderHandle {
    /// Bring a card with the given UID into the field.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader has been dropped.
    pub async fn present_uid(&self, uid: &[u8]) -> Result<()> {
        self.uid_tx
            .send(uid.to_vec())
            .await
            .map_err(|_| HardwareError::disconnected(self.name.clone()))
    }

    /// Take the reader offline, or bring it back.
    pub fn set_offline(&self, offline: bool) {
        self.shared.offline.store(offline, Ordering::Relaxed);
    }

    /// Number of successful reader resets so far.
    pub fn reinit_count(&self) -> usize {
        self.shared.reinitializations.load(Ordering::Relaxed)
    }

    /// Number of polls the reader has served, including failed ones.
    pub fn poll_count(&self) -> usize {
        self.shared.polls.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_presented_card_is_read_once() {
        let (mut reader, handle) = MockReader::new();

        handle.present_uid(&[0x04, 0xAB, 0xCD, 0xEF]).await.unwrap();
        let id = reader.poll().await.unwrap().unwrap();
        assert_eq!(id.as_str(), "04 AB CD EF");
        assert!(reader.poll().await.unwrap().is_none());
        assert_eq!(handle.poll_count(), 2);
    }

    #[tokio::test]
    async fn test_malformed_uid_is_invalid_data() {
        let (mut reader, handle) = MockReader::new();

        handle.present_uid(&[0x01, 0x02]).await.unwrap();
        let error = reader.poll().await.unwrap_err();
        assert!(matches!(error, HardwareError::InvalidData { .. }));
    }

    #[tokio::test]
    async fn test_reinitialize_discards_pending_cards() {
        let (mut reader, handle) = MockReader::new();

        handle.present_uid(&[0xE3, 0x87, 0x26, 0x29]).await.unwrap();
        reader.reinitialize().await.unwrap();

        assert!(reader.poll().await.unwrap().is_none());
        assert_eq!(handle.reinit_count(), 1);
    }

    #[tokio::test]
    async fn test_offline_reader() {
        let (mut reader, handle) = MockReader::with_name("Door Reader");

        handle.set_offline(true);
        assert!(matches!(
            reader.poll().await,
            Err(HardwareError::Disconnected { .. })
        ));
        assert!(matches!(
            reader.reinitialize().await,
            Err(HardwareError::InitializationFailed { .. })
        ));
        assert_eq!(handle.reinit_count(), 0);

        handle.set_offline(false);
        assert!(reader.poll().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_dropped_handle_disconnects() {
        let (mut reader, handle) = MockReader::new();
        drop(handle);

        assert!(matches!(
            reader.poll().await,
            Err(HardwareError::Disconnected { .. })
        ));
    }

    #[tokio::test]
    async fn test_reader_info() {
        let (reader, _handle) = MockReader::with_name("Door Reader");
        let info = reader.info().await.unwrap();
        assert_eq!(info.name, "Door Reader");
        assert_eq!(info.firmware_version.as_deref(), Some("mock"));
    }
}
