//! EC2 instance discovery

use async_trait::async_trait;
use aws_sdk_ec2::types::Filter;
use shared::Region;

use super::aws::{describe_error, AwsClients};
use crate::error::{PipefitterError, PipefitterResult};
use crate::traits::InstanceDiscovery;
use crate::types::InstanceFilter;

const INSTANCE_STATE_FILTER: &str = "instance-state-name";

/// Instance discovery backed by `DescribeInstances`
pub struct Ec2InstanceDiscovery {
    clients: AwsClients,
}

impl Ec2InstanceDiscovery {
    pub fn new(clients: AwsClients) -> Self {
        Self { clients }
    }
}

#[async_trait]
impl InstanceDiscovery for Ec2InstanceDiscovery {
    async fn private_ips(
        &self,
        region: &Region,
        filter: &InstanceFilter,
    ) -> PipefitterResult<Vec<String>> {
        let client = self.clients.ec2(region)?;

        let mut pages = client
            .describe_instances()
            .filters(
                Filter::builder()
                    .name(filter.tag_filter.as_str())
                    .values(filter.tag_value.as_str())
                    .build(),
            )
            .filters(
                Filter::builder()
                    .name(INSTANCE_STATE_FILTER)
                    .set_values(Some(filter.states.clone()))
                    .build(),
            )
            .into_paginator()
            .send();

        let mut ips = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| {
                PipefitterError::discovery(region, "DescribeInstances", describe_error(&e))
            })?;
            // Every interface counts, so multi-homed hosts contribute several IPs
            for reservation in page.reservations() {
                for instance in reservation.instances() {
                    ips.extend(
                        instance
                            .network_interfaces()
                            .iter()
                            .filter_map(|iface| iface.private_ip_address())
                            .map(str::to_string),
                    );
                }
            }
        }
        Ok(ips)
    }
}
