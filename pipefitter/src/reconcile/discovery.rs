//! Resource discovery
//!
//! Finds the target groups and endpoint services carrying this deployment's
//! ownership tag. Nothing is cached: every pass asks AWS again.

use std::collections::BTreeMap;

use shared::sets::uniq;
use shared::{FailurePolicy, OwnershipTag, Region, ResourceKind};

use crate::core::{owned_resources, ResourceFailure, DESCRIBE_TAGS_BATCH};
use crate::error::PipefitterResult;
use crate::traits::{EndpointServiceApi, TargetGroupApi};

use super::to_failure;

/// Managed resource ids per region, plus the regions that could not be searched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Discovered {
    /// Only regions with at least one managed resource appear; ids are sorted and unique
    pub resources: BTreeMap<Region, Vec<String>>,
    pub failures: Vec<ResourceFailure>,
}

impl Discovered {
    pub fn is_empty(&self) -> bool {
        self.resources.values().all(Vec::is_empty)
    }

    /// Resource ids found in `region` (empty if none)
    pub fn in_region(&self, region: &Region) -> &[String] {
        self.resources
            .get(region)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// (region, id) pairs in region order
    pub fn iter(&self) -> impl Iterator<Item = (&Region, &str)> {
        self.resources
            .iter()
            .flat_map(|(region, ids)| ids.iter().map(move |id| (region, id.as_str())))
    }

    pub fn len(&self) -> usize {
        self.resources.values().map(Vec::len).sum()
    }

    fn absorb(
        &mut self,
        kind: ResourceKind,
        region: &Region,
        found: PipefitterResult<Vec<String>>,
        policy: FailurePolicy,
    ) -> PipefitterResult<()> {
        match found {
            Ok(ids) if ids.is_empty() => Ok(()),
            Ok(ids) => {
                // A resource listed twice is still reconciled once
                self.resources.insert(region.clone(), uniq(ids));
                Ok(())
            }
            Err(error) => match policy {
                FailurePolicy::Strict => Err(error),
                FailurePolicy::Isolate => {
                    self.failures.push(to_failure(kind, region, None, &error));
                    Ok(())
                }
            },
        }
    }
}

/// Target groups tagged with `tag` in each of `regions`
pub async fn discover_target_groups<T>(
    api: &T,
    regions: &[Region],
    tag: &OwnershipTag,
    policy: FailurePolicy,
) -> PipefitterResult<Discovered>
where
    T: TargetGroupApi + ?Sized,
{
    let mut discovered = Discovered::default();
    for region in regions {
        let found = target_groups_in_region(api, region, tag).await;
        discovered.absorb(ResourceKind::TargetGroup, region, found, policy)?;
    }
    Ok(discovered)
}

async fn target_groups_in_region<T>(
    api: &T,
    region: &Region,
    tag: &OwnershipTag,
) -> PipefitterResult<Vec<String>>
where
    T: TargetGroupApi + ?Sized,
{
    let arns = api.list_target_groups(region).await?;

    let mut tagged = Vec::with_capacity(arns.len());
    for batch in arns.chunks(DESCRIBE_TAGS_BATCH) {
        tagged.extend(api.describe_tags(region, batch).await?);
    }

    Ok(owned_resources(&tagged, tag))
}

/// Endpoint services tagged with `tag` in each of `regions`
pub async fn discover_endpoint_services<E>(
    api: &E,
    regions: &[Region],
    tag: &OwnershipTag,
    policy: FailurePolicy,
) -> PipefitterResult<Discovered>
where
    E: EndpointServiceApi + ?Sized,
{
    let mut discovered = Discovered::default();
    for region in regions {
        let found = api.services_by_tag(region, tag).await;
        discovered.absorb(ResourceKind::EndpointService, region, found, policy)?;
    }
    Ok(discovered)
}
