//! Startup seeding of accounts listed in the config

use crate::config::SeedUser;
use crate::core::auth::hash_password;
use crate::core::store::{User, UserStore};
use anyhow::Result;
use uuid::Uuid;

/// Insert every seed account whose email is not known yet
///
/// Returns how many accounts were added.
pub async fn seed_users(users: &dyn UserStore, seeds: &[SeedUser]) -> Result<usize> {
    let mut added = 0;

    for seed in seeds {
        if users.find_by_email(&seed.email).await?.is_some() {
            tracing::debug!(email = %seed.email, "seed user already present");
            continue;
        }

        users
            .insert_user(User {
                id: Uuid::new_v4().to_string(),
                name: seed.name.clone(),
                email: seed.email.clone(),
                password: hash_password(&seed.password)?,
            })
            .await?;
        added += 1;
    }

    if added > 0 {
        tracing::info!(count = added, "seeded users");
    }
    Ok(added)
}
