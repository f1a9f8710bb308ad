mod failures;
mod record;

pub use failures::FailureListError;
pub use failures::FailureListManager;
pub use failures::Persisted;
pub use record::RunRecordManager;
