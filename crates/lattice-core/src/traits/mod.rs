mod persistence;

pub use persistence::PersistenceAdapter;
