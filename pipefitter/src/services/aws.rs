//! Per-region AWS clients
//!
//! One SDK configuration is loaded per region the deployment touches; the EC2
//! and ELBv2 clients built from it are cheap to clone and shared by every
//! service.

use std::collections::BTreeMap;

use aws_config::BehaviorVersion;
use aws_sdk_ec2::config::Region as SdkRegion;
use aws_sdk_ec2::error::DisplayErrorContext;
use shared::Region;

use crate::error::{PipefitterError, PipefitterResult};

pub type Ec2Client = aws_sdk_ec2::Client;
pub type ElbClient = aws_sdk_elasticloadbalancingv2::Client;

/// EC2 and ELBv2 clients keyed by region
#[derive(Clone, Debug, Default)]
pub struct AwsClients {
    ec2: BTreeMap<Region, Ec2Client>,
    elb: BTreeMap<Region, ElbClient>,
}

impl AwsClients {
    /// Load credentials and build clients for each of `regions`
    pub async fn for_regions(regions: &[Region]) -> Self {
        let mut clients = Self::default();
        for region in regions {
            let sdk_config = aws_config::defaults(BehaviorVersion::latest())
                .region(SdkRegion::new(region.as_str().to_string()))
                .load()
                .await;
            clients
                .ec2
                .insert(region.clone(), Ec2Client::new(&sdk_config));
            clients
                .elb
                .insert(region.clone(), ElbClient::new(&sdk_config));
        }
        clients
    }

    pub fn ec2(&self, region: &Region) -> PipefitterResult<&Ec2Client> {
        self.ec2.get(region).ok_or_else(|| missing_client(region))
    }

    pub fn elb(&self, region: &Region) -> PipefitterResult<&ElbClient> {
        self.elb.get(region).ok_or_else(|| missing_client(region))
    }

    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.ec2.keys()
    }
}

fn missing_client(region: &Region) -> PipefitterError {
    PipefitterError::configuration(format!("No AWS client configured for region {region}"))
}

/// Full error chain of an SDK failure, including the service error code
pub(crate) fn describe_error<E: std::error::Error>(error: &E) -> String {
    DisplayErrorContext(error).to_string()
}
