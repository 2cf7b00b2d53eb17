//! Pull and push
//!
//! Both commands validate the local documents, collect the local and remote
//! states, reconcile them and apply the result. Pull treats the catalog as
//! the source; push treats the local directory as the source.

use std::path::Path;

use colored::Colorize;
use dialoguer::Confirm;
use pano_core::{
    ActionKind, ActionSet, Executor, LocalCollector, LocalExecutor, StateCollector, SyncOptions,
    execute_actions, reconcile,
};
use pano_remote::CatalogApi;
use tracing::debug;

use super::validate::check_local_state;
use crate::cli::ApplyArgs;
use crate::context::Remote;
use crate::error::{CliError, Result};
use crate::progress::ActionBar;

/// Run the pull command
pub async fn run_pull<A: CatalogApi + 'static>(root: &Path, remote: &Remote<A>, args: ApplyArgs) -> Result<()> {
    check_local_state(root)?;
    println!(
        "{} Pulling models of {}...",
        "=>".blue().bold(),
        remote.company.cyan()
    );

    let source = remote.collector().collect().await?;
    let target = LocalCollector::new(root).collect().await?;
    let actions = reconcile(&source, &target);
    debug!(actions = actions.len(), "pull reconciled");

    if actions.is_empty() {
        println!("{} No configuration has been published", "OK".green().bold());
        return Ok(());
    }

    apply(&LocalExecutor::new(root), &actions, args, "Pulled").await
}

/// Run the push command
pub async fn run_push<A: CatalogApi + 'static>(root: &Path, remote: &Remote<A>, args: ApplyArgs) -> Result<()> {
    check_local_state(root)?;
    println!(
        "{} Pushing models to {}...",
        "=>".blue().bold(),
        remote.company.cyan()
    );

    let source = LocalCollector::new(root).collect().await?;
    let target = remote.collector().collect().await?;
    let actions = reconcile(&source, &target);
    debug!(actions = actions.len(), "push reconciled");

    if actions.is_empty() {
        println!("{} No configuration to publish", "OK".green().bold());
        return Ok(());
    }

    apply(&remote.executor(), &actions, args, "Updated").await
}

/// Show, confirm and apply an action set, then report the outcome.
///
/// `done` is the past-tense verb of the summary line, e.g. `Pulled`.
pub(crate) async fn apply<E>(executor: &E, actions: &ActionSet, args: ApplyArgs, done: &str) -> Result<()>
where
    E: Executor + ?Sized,
{
    let options = SyncOptions {
        dry_run: args.dry_run,
    };

    if args.dry_run {
        let report = execute_actions(executor, actions, &options, &ActionBar::new()).await;
        for line in &report.actions {
            println!("   {} {}", "~".yellow(), line);
        }
        println!("{} Dry run, nothing was changed.", "OK".green().bold());
        return Ok(());
    }

    print_plan(actions);
    if !args.yes && !confirm(actions.len())? {
        println!("Aborted.");
        return Ok(());
    }

    let report = execute_actions(executor, actions, &options, &ActionBar::new()).await;
    for error in &report.errors {
        println!("   {} {}", "!".red(), error);
    }

    if report.success {
        println!(
            "{} {} {} configurations",
            "OK".green().bold(),
            done,
            report.actions.len()
        );
        Ok(())
    } else {
        Err(CliError::user(format!(
            "{} of {} actions failed",
            report.errors.len(),
            actions.len()
        )))
    }
}

fn print_plan(actions: &ActionSet) {
    println!("Planned changes:");
    for action in actions {
        let marker = match action.kind() {
            ActionKind::Create => "+".green(),
            ActionKind::Update => "~".yellow(),
            ActionKind::Delete => "-".red(),
        };
        println!("   {} {}", marker, action);
    }
}

fn confirm(count: usize) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(format!("Apply {} change(s)?", count))
        .default(false)
        .interact()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use pano_model::{Field, Model, VirtualDataSource};
    use pano_remote::ApiSettings;
    use pano_test_utils::{FakeCatalog, TestRepo};

    const YES: ApplyArgs = ApplyArgs {
        yes: true,
        dry_run: false,
    };

    fn remote(catalog: FakeCatalog) -> Remote<FakeCatalog> {
        Remote::new(Arc::new(catalog), "acme", ApiSettings::default())
    }

    fn catalog_model(ds: &str, name: &str) -> Model {
        Model::new(name, format!("db.{ds}.{name}"))
            .in_dataset(ds)
            .with_field(Field::new(["id"], "\"ID\"").with_data_type("integer"))
    }

    #[tokio::test]
    async fn pull_writes_the_catalog_locally() {
        let repo = TestRepo::new();
        repo.add_dataset("stale", "stale");
        let remote = remote(
            FakeCatalog::new()
                .with_data_source(VirtualDataSource::new("sales", "Sales"))
                .with_model(catalog_model("sales", "orders")),
        );

        run_pull(repo.root(), &remote, YES).await.unwrap();

        repo.assert_file_contains("sales/dataset.yaml", "display_name: Sales");
        repo.assert_file_exists("sales/orders.model.yaml");
        repo.assert_file_not_exists("stale");
    }

    #[tokio::test]
    async fn pull_dry_run_changes_nothing() {
        let repo = TestRepo::new();
        let remote = remote(FakeCatalog::new().with_data_source(VirtualDataSource::new("sales", "Sales")));

        run_pull(
            repo.root(),
            &remote,
            ApplyArgs {
                yes: false,
                dry_run: true,
            },
        )
        .await
        .unwrap();

        repo.assert_file_not_exists("sales");
    }

    #[tokio::test]
    async fn push_publishes_local_models() {
        let repo = TestRepo::new();
        repo.add_dataset("sales", "sales");
        repo.add_model("sales", "orders", "db.sales.orders");
        let remote = remote(FakeCatalog::new().with_model(catalog_model("legacy", "old")));

        run_push(repo.root(), &remote, YES).await.unwrap();

        assert!(remote.api.data_source("sales").is_some());
        assert!(remote.api.model("sales", "orders").is_some());
        assert!(remote.api.model("legacy", "old").is_none());
    }

    #[tokio::test]
    async fn push_with_nothing_to_do_makes_no_calls() {
        let repo = TestRepo::new();
        let remote = remote(FakeCatalog::new());

        run_push(repo.root(), &remote, YES).await.unwrap();
        assert!(remote.api.calls().is_empty());
    }

    #[tokio::test]
    async fn failed_actions_fail_the_command() {
        let repo = TestRepo::new();
        repo.add_dataset("sales", "sales");
        repo.add_model("sales", "orders", "db.sales.orders");
        repo.add_model("sales", "broken", "db.sales.broken");
        let remote = remote(FakeCatalog::new().fail_on("broken"));

        let err = run_push(repo.root(), &remote, YES).await.unwrap_err();

        assert_eq!(err.to_string(), "1 of 3 actions failed");
        assert!(remote.api.model("sales", "orders").is_some());
    }

    #[tokio::test]
    async fn invalid_local_state_blocks_sync() {
        let repo = TestRepo::new();
        repo.add_dataset("sales", "sales");
        repo.write("sales/broken.model.yaml", "model_name: [\n");
        let remote = remote(FakeCatalog::new());

        assert!(run_push(repo.root(), &remote, YES).await.is_err());
        assert!(run_pull(repo.root(), &remote, YES).await.is_err());
        assert!(remote.api.calls().is_empty());
        repo.assert_file_exists("sales/broken.model.yaml");
    }
}
