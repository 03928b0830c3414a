//! Ownership filtering for discovered resources

use shared::OwnershipTag;

use crate::types::ResourceTags;

/// Maximum number of ARNs accepted by one load balancer DescribeTags call
pub const DESCRIBE_TAGS_BATCH: usize = 20;

/// Resource ids whose tags include the ownership tag, in input order
pub fn owned_resources(tagged: &[ResourceTags], tag: &OwnershipTag) -> Vec<String> {
    tagged
        .iter()
        .filter(|resource| {
            resource
                .tags
                .iter()
                .any(|(key, value)| tag.matches(key, value))
        })
        .map(|resource| resource.resource_id.clone())
        .collect()
}

/// Service id embedded in an endpoint service name
///
/// `com.amazonaws.vpce.us-east-1.vpce-svc-0123456789abcdef0` carries the id in
/// its fifth dot-separated field. Names without a `vpce-svc-` id (AWS-owned
/// services, gateway endpoints) yield `None`.
pub fn service_id_from_name(service_name: &str) -> Option<String> {
    if !service_name.contains("vpce-svc-") {
        return None;
    }
    service_name
        .split('.')
        .nth(4)
        .filter(|id| id.starts_with("vpce-svc-"))
        .map(str::to_string)
}
