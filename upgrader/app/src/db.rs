use upgrader_types::Storage;

/// Represents a database that the host application persists its state in.
///
/// The database keeps a changeset of uncommitted writes. Storage handles
/// obtained from [`Db::state_storage`] read the committed state overlaid with
/// the changeset, and write into the changeset. Nothing becomes durable until
/// [`Db::commit`] is called.
///
/// All methods take an immutable reference of self; implementations are
/// expected to use interior mutability (e.g. `Arc<RwLock<T>>`) so that the
/// storage handles and the database share one state.
pub trait Db {
    type Error: ToString;

    type Storage: Storage + Clone + 'static;

    /// Return an owned handle to the state storage.
    fn state_storage(&self) -> Self::Storage;

    /// Return the most recent version that has been committed.
    /// `None` if not a single version has been committed.
    fn latest_version(&self) -> Option<u64>;

    /// Persist the changeset, and increment the version. Return the new
    /// version.
    fn commit(&self) -> Result<u64, Self::Error>;

    /// Drop the changeset without persisting it.
    fn discard_changeset(&self);
}
