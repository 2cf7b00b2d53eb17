//! Applying actions to the remote catalog

use std::sync::Arc;

use async_trait::async_trait;
use pano_core::{Action, ActionKind, Executor};
use pano_model::Entity;
use tracing::debug;

use crate::api::CatalogApi;
use crate::{Error, Result};

/// Upserts (PUT) and deletes entities in a company's catalog.
///
/// The package hint of an action has no meaning remotely and is ignored.
pub struct RemoteExecutor<A> {
    api: Arc<A>,
    company: String,
}

impl<A: CatalogApi> RemoteExecutor<A> {
    pub fn new(api: Arc<A>, company: impl Into<String>) -> Self {
        Self {
            api,
            company: company.into(),
        }
    }

    pub async fn apply(&self, action: &Action) -> Result<()> {
        let company = self.company.as_str();
        debug!(action = %action, company, "applying remote action");

        match (action.kind(), action.entity()) {
            (ActionKind::Create | ActionKind::Update, Entity::DataSource(ds)) => {
                self.api.upsert_data_source(company, ds).await
            }
            (ActionKind::Create | ActionKind::Update, Entity::Model(model)) => {
                self.api.upsert_model(company, model).await
            }
            (ActionKind::Create | ActionKind::Update, Entity::Field(field)) => {
                self.api.upsert_field(company, field).await
            }
            (ActionKind::Delete, Entity::DataSource(ds)) => {
                self.api.delete_data_source(company, &ds.dataset_slug).await
            }
            (ActionKind::Delete, Entity::Model(model)) => {
                self.api
                    .delete_model(company, model.dataset(), &model.model_name)
                    .await
            }
            (ActionKind::Delete, Entity::Field(field)) => {
                self.api
                    .delete_field(company, field.virtual_data_source.as_deref(), &field.slug)
                    .await
            }
        }
    }
}

#[async_trait]
impl<A: CatalogApi> Executor for RemoteExecutor<A> {
    type Error = Error;

    async fn execute(&self, action: &Action) -> Result<()> {
        self.apply(action).await
    }
}
