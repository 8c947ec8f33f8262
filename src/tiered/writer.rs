//! Write-through to the backing store.
//!
//! Fire-and-forget writes go through one unbounded queue per tiered store,
//! drained by a single detached worker, so the backing store applies them in
//! the order they were issued.

use std::sync::{Arc, Mutex};

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::record::Record;
use crate::store::Store;

/// A cache mutation to replay on the backing store.
pub(crate) enum WriteOp<R> {
    Save(R),
    Delete(String),
    DeleteAll,
}

impl<R: Record> WriteOp<R> {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            WriteOp::Save(_) => "save",
            WriteOp::Delete(_) => "delete",
            WriteOp::DeleteAll => "delete_all",
        }
    }

    pub(crate) async fn apply(self, store: &dyn Store<R>) -> Result<(), StoreError> {
        match self {
            WriteOp::Save(record) => store.save(&record).await.map(drop),
            WriteOp::Delete(id) => store.delete(&id).await.map(drop),
            WriteOp::DeleteAll => store.delete_all().await,
        }
    }
}

/// The backing store plus its ordered write queue.
pub(crate) struct Backing<R: Record> {
    store: Arc<dyn Store<R>>,
    queue: Mutex<Option<UnboundedSender<WriteOp<R>>>>,
}

impl<R: Record> Backing<R> {
    pub(crate) fn new(store: Arc<dyn Store<R>>) -> Self {
        Backing {
            store,
            queue: Mutex::new(None),
        }
    }

    pub(crate) fn store(&self) -> &dyn Store<R> {
        self.store.as_ref()
    }

    /// Queue `op` behind every earlier one without waiting for it.
    ///
    /// The worker is started on the current runtime by the first call, and
    /// again if the runtime it ran on has gone away. Outside a runtime the
    /// operation is dropped with a warning.
    pub(crate) fn enqueue(&self, store_name: &str, op: WriteOp<R>) -> Result<(), StoreError> {
        let mut queue = self
            .queue
            .lock()
            .map_err(|_| StoreError::LockPoisoned("write queue"))?;

        let op = match queue.as_ref() {
            Some(sender) => match sender.send(op) {
                Ok(()) => return Ok(()),
                Err(mpsc::error::SendError(op)) => op,
            },
            None => op,
        };

        let operation = op.name();
        let Ok(runtime) = Handle::try_current() else {
            warn!(store = store_name, operation, "no tokio runtime, write-through dropped");
            return Ok(());
        };

        let (sender, receiver) = mpsc::unbounded_channel();
        let _worker: JoinHandle<()> = runtime.spawn(drain(
            store_name.to_string(),
            Arc::clone(&self.store),
            receiver,
        ));
        if sender.send(op).is_err() {
            warn!(store = store_name, operation, "runtime shutting down, write-through dropped");
            return Ok(());
        }
        *queue = Some(sender);
        Ok(())
    }
}

/// Apply queued operations one at a time until the tiered store is dropped.
async fn drain<R: Record>(
    store_name: String,
    store: Arc<dyn Store<R>>,
    mut receiver: UnboundedReceiver<WriteOp<R>>,
) {
    while let Some(op) = receiver.recv().await {
        let operation = op.name();
        if let Err(err) = op.apply(store.as_ref()).await {
            warn!(store = %store_name, operation, error = %err, "write-through to backing store failed");
        }
    }
    debug!(store = %store_name, "write-through queue closed");
}
