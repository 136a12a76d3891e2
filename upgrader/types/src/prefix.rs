use crate::{concat, increment_last_byte, trim, Batch, Order, Record, Storage};

/// A storage scoped to a private namespace.
///
/// Every key read or written is prefixed by the namespace, and keys returned
/// from iterations have it trimmed. Different modules of a host application
/// can thus share one underlying store without seeing each other's keys.
#[derive(Clone)]
pub struct PrefixStore<S> {
    storage: S,
    namespace: Vec<u8>,
}

impl<S> PrefixStore<S> {
    pub fn new(storage: S, namespace: &[u8]) -> Self {
        Self {
            storage,
            namespace: namespace.to_vec(),
        }
    }

    pub fn inner(&self) -> &S {
        &self.storage
    }
}

impl<S> Storage for PrefixStore<S>
where
    S: Storage + Clone,
{
    fn read(&self, key: &[u8]) -> Option<Vec<u8>> {
        let prefixed_key = concat(&self.namespace, key);
        self.storage.read(&prefixed_key)
    }

    fn scan<'a>(
        &'a self,
        min: Option<&[u8]>,
        max: Option<&[u8]>,
        order: Order,
    ) -> Box<dyn Iterator<Item = Record> + 'a> {
        let (min, max) = prefixed_range_bounds(&self.namespace, min, max);
        let iter = self
            .storage
            .scan(Some(min.as_slice()), Some(max.as_slice()), order)
            .map(|(key, value)| (trim(&self.namespace, &key), value));

        Box::new(iter)
    }

    fn write(&mut self, key: &[u8], value: &[u8]) {
        let prefixed_key = concat(&self.namespace, key);
        self.storage.write(&prefixed_key, value);
    }

    fn remove(&mut self, key: &[u8]) {
        let prefixed_key = concat(&self.namespace, key);
        self.storage.remove(&prefixed_key);
    }

    fn flush(&mut self, batch: Batch) {
        let batch = batch
            .into_iter()
            .map(|(key, op)| (concat(&self.namespace, &key), op))
            .collect();

        self.storage.flush(batch);
    }
}

#[inline]
fn prefixed_range_bounds(
    prefix: &[u8],
    min: Option<&[u8]>,
    max: Option<&[u8]>,
) -> (Vec<u8>, Vec<u8>) {
    let min = match min {
        Some(bytes) => concat(prefix, bytes),
        None => prefix.to_vec(),
    };
    let max = match max {
        Some(bytes) => concat(prefix, bytes),
        None => increment_last_byte(prefix.to_vec()),
    };
    (min, max)
}

// ----------------------------------- tests -----------------------------------
