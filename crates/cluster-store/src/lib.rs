//! Cluster Store Accessor
//!
//! Typed get/create access to the objects the Web controller reads and owns,
//! keyed by (name, namespace). The reconciler only ever talks to the cluster
//! through [`ClusterStore`], so tests can swap in the in-memory
//! [`MockClusterStore`] (behind the `test-util` feature).
//!
//! # Example
//!
//! ```no_run
//! use cluster_store::{ClusterStore, KubeClusterStore, ObjectKey};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = kube::Client::try_default().await?;
//! let store = KubeClusterStore::new(client);
//!
//! if let Some(web) = store.get_web(&ObjectKey::new("site", "default")).await? {
//!     println!("serving {}", web.spec.image);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod key;
pub mod ownership;
#[path = "trait.rs"]
pub mod store_trait;
#[cfg(feature = "test-util")]
pub mod mock;

pub use client::KubeClusterStore;
pub use error::StoreError;
pub use key::{ObjectKey, ResourceKind, DEFAULT_NAMESPACE};
pub use ownership::set_controller_reference;
pub use store_trait::ClusterStore;
#[cfg(feature = "test-util")]
pub use mock::{MockClusterStore, StoreWrite};
