//! Change notifications for view layers.
//!
//! Every successful mutation of a `RecordStore` is broadcast to subscribers
//! so a presentation layer can re-render without polling:
//! - `Added`, `Updated`, `Deleted` for record changes
//! - `Restored` when the collection is reloaded from storage
//!
//! Subscribers get a bounded buffer; one that falls behind is dropped.
//!
//! # Example
//!
//! ```ignore
//! let handle = store.subscribe(SubscriptionConfig::default());
//! store.delete("SV001")?;
//!
//! for event in handle.drain() {
//!     match event {
//!         StoreEvent::Deleted { student_id } => println!("removed {}", student_id),
//!         other => println!("{:?}", other),
//!     }
//! }
//! ```

mod manager;
mod types;

pub use manager::SubscriptionManager;
pub use types::{
    DropReason, StoreEvent, SubscriptionConfig, SubscriptionFilter, SubscriptionHandle,
    SubscriptionId,
};
