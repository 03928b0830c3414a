//! Service implementations
//!
//! Real implementations of the boundary traits on the AWS SDK, plus the
//! environment-backed configuration source.

pub mod aws;
pub mod config_source;
pub mod endpoint_services;
pub mod instances;
pub mod target_groups;

pub use aws::AwsClients;
pub use config_source::RealConfigSource;
pub use endpoint_services::Ec2EndpointServiceApi;
pub use instances::Ec2InstanceDiscovery;
pub use target_groups::ElbTargetGroupApi;
