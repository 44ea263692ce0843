// Team database clusters provisioned through an external provider

pub mod cluster;
pub mod value_objects;

pub use cluster::{cluster_name, AtlasCluster};
pub use value_objects::ClusterStatus;
