//! VPC endpoint service discovery and permissions

use async_trait::async_trait;
use aws_sdk_ec2::types::Filter;
use shared::{OwnershipTag, Region};

use super::aws::{describe_error, AwsClients};
use crate::core::service_id_from_name;
use crate::error::{PipefitterError, PipefitterResult};
use crate::traits::EndpointServiceApi;

/// Endpoint service API backed by the EC2 client of each region
pub struct Ec2EndpointServiceApi {
    clients: AwsClients,
}

impl Ec2EndpointServiceApi {
    pub fn new(clients: AwsClients) -> Self {
        Self { clients }
    }
}

#[async_trait]
impl EndpointServiceApi for Ec2EndpointServiceApi {
    async fn services_by_tag(
        &self,
        region: &Region,
        tag: &OwnershipTag,
    ) -> PipefitterResult<Vec<String>> {
        let client = self.clients.ec2(region)?;

        let mut ids = Vec::new();
        let mut next_token: Option<String> = None;
        loop {
            let output = client
                .describe_vpc_endpoint_services()
                .filters(
                    Filter::builder()
                        .name(tag.filter_name())
                        .values(tag.value.as_str())
                        .build(),
                )
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| {
                    PipefitterError::discovery(
                        region,
                        "DescribeVpcEndpointServices",
                        describe_error(&e),
                    )
                })?;

            ids.extend(
                output
                    .service_names()
                    .iter()
                    .filter_map(|name| service_id_from_name(name)),
            );

            match output.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }
        Ok(ids)
    }

    async fn allowed_principals(
        &self,
        region: &Region,
        service_id: &str,
    ) -> PipefitterResult<Vec<String>> {
        let client = self.clients.ec2(region)?;

        let mut principals = Vec::new();
        let mut next_token: Option<String> = None;
        loop {
            let output = client
                .describe_vpc_endpoint_service_permissions()
                .service_id(service_id)
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| PipefitterError::read(service_id, describe_error(&e)))?;

            principals.extend(
                output
                    .allowed_principals()
                    .iter()
                    .filter_map(|allowed| allowed.principal())
                    .map(str::to_string),
            );

            match output.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }
        Ok(principals)
    }

    async fn modify_allowed_principals(
        &self,
        region: &Region,
        service_id: &str,
        add: &[String],
        remove: &[String],
    ) -> PipefitterResult<bool> {
        let client = self.clients.ec2(region)?;
        let output = client
            .modify_vpc_endpoint_service_permissions()
            .service_id(service_id)
            .set_add_allowed_principals(non_empty(add))
            .set_remove_allowed_principals(non_empty(remove))
            .send()
            .await
            .map_err(|e| PipefitterError::mutation(service_id, describe_error(&e)))?;

        Ok(output.return_value().unwrap_or(false))
    }
}

/// Empty principal lists are left out of the request entirely
fn non_empty(principals: &[String]) -> Option<Vec<String>> {
    if principals.is_empty() {
        None
    } else {
        Some(principals.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_lists_are_omitted() {
        assert_eq!(non_empty(&[]), None);
        assert_eq!(
            non_empty(&["*".to_string()]),
            Some(vec!["*".to_string()])
        );
    }
}
