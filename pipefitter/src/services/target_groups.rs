//! ELBv2 target group reads and writes

use async_trait::async_trait;
use aws_sdk_elasticloadbalancingv2::types::TargetDescription;
use shared::Region;

use super::aws::{describe_error, AwsClients};
use crate::error::{PipefitterError, PipefitterResult};
use crate::traits::TargetGroupApi;
use crate::types::{RegisteredTarget, ResourceTags, TargetSpec};

/// Target group API backed by the ELBv2 client of each region
pub struct ElbTargetGroupApi {
    clients: AwsClients,
}

impl ElbTargetGroupApi {
    pub fn new(clients: AwsClients) -> Self {
        Self { clients }
    }
}

#[async_trait]
impl TargetGroupApi for ElbTargetGroupApi {
    async fn list_target_groups(&self, region: &Region) -> PipefitterResult<Vec<String>> {
        let client = self.clients.elb(region)?;
        let mut pages = client.describe_target_groups().into_paginator().send();

        let mut arns = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| {
                PipefitterError::discovery(region, "DescribeTargetGroups", describe_error(&e))
            })?;
            arns.extend(
                page.target_groups()
                    .iter()
                    .filter_map(|group| group.target_group_arn())
                    .map(str::to_string),
            );
        }
        Ok(arns)
    }

    async fn describe_tags(
        &self,
        region: &Region,
        arns: &[String],
    ) -> PipefitterResult<Vec<ResourceTags>> {
        if arns.is_empty() {
            return Ok(Vec::new());
        }
        let client = self.clients.elb(region)?;
        let output = client
            .describe_tags()
            .set_resource_arns(Some(arns.to_vec()))
            .send()
            .await
            .map_err(|e| PipefitterError::discovery(region, "DescribeTags", describe_error(&e)))?;

        Ok(output
            .tag_descriptions()
            .iter()
            .filter_map(|description| {
                let resource_id = description.resource_arn()?.to_string();
                let tags = description
                    .tags()
                    .iter()
                    .map(|tag| {
                        (
                            tag.key().to_string(),
                            tag.value().unwrap_or_default().to_string(),
                        )
                    })
                    .collect();
                Some(ResourceTags { resource_id, tags })
            })
            .collect())
    }

    async fn registered_targets(
        &self,
        region: &Region,
        arn: &str,
    ) -> PipefitterResult<Vec<RegisteredTarget>> {
        let client = self.clients.elb(region)?;
        let output = client
            .describe_target_health()
            .target_group_arn(arn)
            .send()
            .await
            .map_err(|e| PipefitterError::read(arn, describe_error(&e)))?;

        Ok(output
            .target_health_descriptions()
            .iter()
            .filter_map(|health| health.target())
            .map(|target| RegisteredTarget {
                id: target.id().to_string(),
                port: target.port().and_then(|port| u16::try_from(port).ok()),
            })
            .collect())
    }

    async fn register_targets(
        &self,
        region: &Region,
        arn: &str,
        targets: &[TargetSpec],
    ) -> PipefitterResult<()> {
        let client = self.clients.elb(region)?;
        client
            .register_targets()
            .target_group_arn(arn)
            .set_targets(Some(target_descriptions(arn, targets)?))
            .send()
            .await
            .map_err(|e| PipefitterError::mutation(arn, describe_error(&e)))?;
        Ok(())
    }

    async fn deregister_targets(
        &self,
        region: &Region,
        arn: &str,
        targets: &[TargetSpec],
    ) -> PipefitterResult<()> {
        let client = self.clients.elb(region)?;
        client
            .deregister_targets()
            .target_group_arn(arn)
            .set_targets(Some(target_descriptions(arn, targets)?))
            .send()
            .await
            .map_err(|e| PipefitterError::mutation(arn, describe_error(&e)))?;
        Ok(())
    }
}

fn target_descriptions(
    arn: &str,
    targets: &[TargetSpec],
) -> PipefitterResult<Vec<TargetDescription>> {
    targets
        .iter()
        .map(|target| {
            TargetDescription::builder()
                .id(target.id.as_str())
                .port(i32::from(target.port))
                .availability_zone(target.availability_zone.as_str())
                .build()
                .map_err(|e| PipefitterError::mutation(arn, e.to_string()))
        })
        .collect()
}
