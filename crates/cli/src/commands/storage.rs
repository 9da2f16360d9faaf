//! Storage reconciliation.
//!
//! Reports objects in a bucket that no row references, and removes them on
//! request. The comparison itself lives in [`premium_food_site::reconcile`].

use premium_food_core::Bucket;
use premium_food_site::backend::supabase::SupabaseClient;
use premium_food_site::backend::{Caller, ObjectStorage};
use premium_food_site::config::SupabaseConfig;
use premium_food_site::reconcile;

/// Environment variable holding the key the command authenticates with.
const SERVICE_ROLE_KEY_VAR: &str = "SUPABASE_SERVICE_ROLE_KEY";

/// Report objects in `bucket` that no row references, removing them when
/// `delete` is set.
///
/// # Errors
///
/// Returns an error if configuration is missing, the table could not be read
/// in full, or any backend call fails.
pub async fn orphans(bucket: Bucket, delete: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = SupabaseConfig::from_env(SERVICE_ROLE_KEY_VAR)?;
    let client = SupabaseClient::new(&config)?;
    // With no user token the service-role key is sent as the bearer.
    let caller = Caller::Anonymous;

    let report = reconcile::find_orphans(&client, &client, &caller, bucket).await?;
    tracing::info!(
        objects = report.objects,
        referenced = report.referenced,
        orphans = report.orphans.len(),
        "Reconciled {bucket}"
    );

    if report.orphans.is_empty() {
        tracing::info!("No orphaned objects found");
        return Ok(());
    }

    for path in &report.orphans {
        tracing::info!("  orphan: {path}");
    }

    if delete {
        client.remove(&caller, bucket, &report.orphans).await?;
        tracing::info!("Removed {} orphaned objects", report.orphans.len());
    } else {
        tracing::info!("Re-run with --delete to remove them");
    }

    Ok(())
}
