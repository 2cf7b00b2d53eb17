//! Field scaffolding
//!
//! Creates a dimension definition for every `field_map` slug that no field
//! definition covers, in the package of the model that uses it.

use std::path::Path;

use colored::Colorize;
use pano_core::{LocalCollector, LocalExecutor, StateBuilder, missing_fields, reconcile};

use super::sync::apply;
use super::validate::check_local_state;
use crate::cli::ApplyArgs;
use crate::error::Result;

/// Run the field scaffold command
pub async fn run_field_scaffold(root: &Path, args: ApplyArgs) -> Result<()> {
    check_local_state(root)?;
    println!("{} Looking for undefined fields...", "=>".blue().bold());

    let current = LocalCollector::new(root).read_state()?;
    let missing = missing_fields(&current);
    if missing.is_empty() {
        println!("{} Every model field has a definition.", "OK".green().bold());
        return Ok(());
    }

    let mut desired = StateBuilder::new("scaffolded fields");
    for (_, entry) in current.iter() {
        desired.insert(entry.entity().clone(), entry.package().map(str::to_string))?;
    }
    for scaffolded in missing {
        desired.insert(scaffolded.field, scaffolded.package)?;
    }

    let actions = reconcile(&desired.build(), &current);
    apply(&LocalExecutor::new(root), &actions, args, "Scaffolded").await
}

#[cfg(test)]
mod tests {
    use super::*;
    use pano_test_utils::TestRepo;

    const YES: ApplyArgs = ApplyArgs {
        yes: true,
        dry_run: false,
    };

    #[tokio::test]
    async fn writes_missing_definitions_into_the_package() {
        let repo = TestRepo::new();
        repo.add_dataset("my_dir", "sales");
        repo.add_model("my_dir", "orders", "db.sales.orders");

        run_field_scaffold(repo.root(), YES).await.unwrap();

        assert_eq!(
            repo.read("my_dir/fields/id.field.yaml"),
            "api_version: v1\ndata_type: integer\ndisplay_name: id\nfield_type: dimension\ngroup: CLI\nslug: id\n"
        );
    }

    #[tokio::test]
    async fn company_definitions_count_as_defined() {
        let repo = TestRepo::new();
        repo.add_dataset("sales", "sales");
        repo.add_model("sales", "orders", "db.sales.orders");
        repo.add_field(None, "id");

        run_field_scaffold(repo.root(), YES).await.unwrap();

        repo.assert_file_not_exists("sales/fields");
    }

    #[tokio::test]
    async fn dry_run_writes_nothing() {
        let repo = TestRepo::new();
        repo.add_dataset("sales", "sales");
        repo.add_model("sales", "orders", "db.sales.orders");

        run_field_scaffold(
            repo.root(),
            ApplyArgs {
                yes: false,
                dry_run: true,
            },
        )
        .await
        .unwrap();

        repo.assert_file_not_exists("sales/fields/id.field.yaml");
    }
}
