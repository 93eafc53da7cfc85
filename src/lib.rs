mod change;
mod channel;
mod delta;
mod mutation;
mod record;
mod remote;
mod report;
mod sync;
mod token;
mod view;

pub use change::{ChangeBatch, ChangeEvent, ChangeReason};
pub use channel::{ChangeChannel, ChangeSubscriber};
pub use delta::{DeltaBatch, DeltaFetcher, FetchError};
pub use mutation::MutationBroadcaster;
pub use record::{FieldValue, Record, RecordId};
pub use remote::{
    ChangeNotification, InMemoryRemoteStore, NotificationFeed, RemoteStore, RemoteStoreError,
};
pub use report::{HazardReport, ReportError, HAZARD_REPORT_TYPE};
pub use sync::{SyncCoordinator, SyncError, SyncOutcome};
pub use token::{ChangeToken, ChangeTokenStore, InMemoryTokenStore, TokenStoreError};
pub use view::{
    created_ascending, modified_descending, Comparator, FocusedView, LocalView, Predicate,
};
