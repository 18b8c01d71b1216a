use postgresql_embedded::PostgreSQL;

use super::super::SHARED_RUNTIME;
use crate::pool::ConfigAndPool;

/// Represents a running embedded `PostgreSQL` instance.
pub struct EmbeddedPostgres {
    pub postgresql: PostgreSQL,
    pub port: u16,
    pub database_url: String,
    /// The actual working configuration with correct credentials
    pub config: deadpool_postgres::Config,
}

/// Set up an embedded `PostgreSQL` instance for testing.
///
/// The database named by `cfg.dbname` is created; when `cfg.user` differs from the
/// embedded superuser, that role is created with `cfg.password`.
///
/// # Errors
/// Returns an error if `cfg.dbname` is missing, if the embedded server cannot be set up
/// or started, or if role provisioning or the post-start connectivity check fails.
pub fn setup_postgres_embedded(
    cfg: &deadpool_postgres::Config,
) -> Result<EmbeddedPostgres, Box<dyn std::error::Error>> {
    SHARED_RUNTIME.block_on(async {
        let db_name = cfg.dbname.clone().ok_or("dbname is required")?;

        let mut postgresql = PostgreSQL::default();
        // Bundled binaries, nothing is downloaded
        postgresql.setup().await?;
        postgresql.start().await?;

        let port = postgresql.settings().port;
        let host = postgresql.settings().host.clone();
        let embedded_user = postgresql.settings().username.clone();
        let embedded_password = postgresql.settings().password.clone();

        postgresql.create_database(&db_name).await?;

        let (final_user, final_password) = match (cfg.user.as_ref(), cfg.password.as_ref()) {
            (Some(user), Some(password)) if user != &embedded_user => {
                let mut admin_cfg = cfg.clone();
                admin_cfg.port = Some(port);
                admin_cfg.host = Some(host.clone());
                admin_cfg.user = Some(embedded_user.clone());
                admin_cfg.password = Some(embedded_password.clone());
                admin_cfg.dbname = Some("postgres".to_string());

                let admin = ConfigAndPool::new_postgres(admin_cfg).await?.database();
                admin
                    .exec(&format!(
                        "CREATE USER \"{user}\" WITH PASSWORD {} CREATEDB SUPERUSER",
                        crate::query_builder::quote(password)
                    ))
                    .await
                    .map_err(|e| format!("Failed to create user {user}: {e}"))?;
                tracing::debug!(user, "created embedded postgres role");

                (user.clone(), password.clone())
            }
            _ => (embedded_user, embedded_password),
        };

        let database_url =
            format!("postgres://{final_user}:{final_password}@{host}:{port}/{db_name}");
        tracing::debug!(port, "embedded postgres started");

        let mut final_cfg = cfg.clone();
        final_cfg.port = Some(port);
        final_cfg.host = Some(host);
        final_cfg.user = Some(final_user);
        final_cfg.password = Some(final_password);

        // Quick connection test
        let db = ConfigAndPool::new_postgres(final_cfg.clone())
            .await?
            .database();
        db.query_associative_array("SELECT 1 AS ok").await?;

        Ok(EmbeddedPostgres {
            postgresql,
            port,
            database_url,
            config: final_cfg,
        })
    })
}

/// Stop a previously started embedded `PostgreSQL` instance.
pub fn stop_postgres_embedded(postgres: EmbeddedPostgres) {
    let EmbeddedPostgres { postgresql, .. } = postgres;
    SHARED_RUNTIME.block_on(async move {
        let _ = postgresql.stop().await;
    });
}
