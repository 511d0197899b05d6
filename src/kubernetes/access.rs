// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::error::{Result, RiffError};
use k8s_openapi::api::authorization::v1::{
    ResourceAttributes, SelfSubjectAccessReview, SelfSubjectAccessReviewSpec,
};
use kube::api::PostParams;
use kube::{Api, Client};
use tracing::{debug, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allowed,
    Denied,
    /// Neither allowed nor explicitly denied
    NoOpinion,
}

/// Ask the API server whether the current user may perform `attributes`.
#[instrument(skip(client))]
pub async fn review_access(client: &Client, attributes: ResourceAttributes) -> Result<AccessDecision> {
    let reviews: Api<SelfSubjectAccessReview> = Api::all(client.clone());
    let review = SelfSubjectAccessReview {
        spec: SelfSubjectAccessReviewSpec {
            resource_attributes: Some(attributes),
            ..Default::default()
        },
        ..Default::default()
    };

    let review = reviews.create(&PostParams::default(), &review).await?;
    let Some(status) = review.status else {
        return Ok(AccessDecision::NoOpinion);
    };
    if let Some(error) = status.evaluation_error.filter(|e| !e.is_empty()) {
        return Err(RiffError::OperationError(error));
    }

    let decision = if status.allowed {
        AccessDecision::Allowed
    } else if status.denied.unwrap_or(false) {
        AccessDecision::Denied
    } else {
        AccessDecision::NoOpinion
    };
    debug!("Access review: {:?}", decision);
    Ok(decision)
}
