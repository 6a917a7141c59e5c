use anyhow::{Context, Result};
use gcloud_gax::grpc::Code;
use gcloud_googleapis::spanner::admin::database::v1::{
    CreateDatabaseRequest, GetDatabaseDdlRequest, GetDatabaseRequest, UpdateDatabaseDdlRequest,
};
use gcloud_googleapis::spanner::admin::instance::v1::{
    CreateInstanceRequest, GetInstanceRequest, Instance,
};
use gcloud_spanner::admin::client::Client as AdminClient;
use gcloud_spanner::admin::AdminClientConfig;
use gcloud_spanner::client::{Client, ClientConfig};
use gcloud_spanner::mutation::insert_or_update;
use gcloud_spanner::statement::Statement;
use gcloud_spanner::value::CommitTimestamp;
use std::sync::Arc;

use crate::config::SpannerConfig;

const TABLE: &str = "content_store";

const CREATE_TABLE_DDL: &str = r#"
CREATE TABLE content_store (
    id STRING(64) NOT NULL,
    data STRING(MAX) NOT NULL,
    created_at TIMESTAMP NOT NULL OPTIONS (allow_commit_timestamp=true),
    updated_at TIMESTAMP NOT NULL OPTIONS (allow_commit_timestamp=true),
) PRIMARY KEY (id)
"#;

/// Key-value backend on a single Spanner table
///
/// One row per record key (`pages`, `config`); the serialized record sits in
/// the `data` column as text, so its key order survives the round trip.
#[derive(Clone)]
pub struct SpannerClient {
    inner: Arc<Client>,
}

impl SpannerClient {
    /// Connect to Spanner, provisioning instance, database and table first.
    ///
    /// `ClientConfig::default()` picks up `SPANNER_EMULATOR_HOST` on its own,
    /// so the emulator is used whenever that variable is set.
    pub async fn from_config(config: &SpannerConfig) -> Result<Self> {
        auto_provision(config).await?;

        let database_path = format!(
            "projects/{}/instances/{}/databases/{}",
            config.project, config.instance, config.database
        );

        match &config.emulator_host {
            Some(host) => tracing::info!("Connecting to Spanner emulator at: {}", host),
            None => tracing::info!("Connecting to production Spanner"),
        }

        let client = Client::new(&database_path, ClientConfig::default())
            .await
            .context("Failed to create Spanner client")?;

        tracing::info!("Successfully connected to Spanner database: {}", database_path);

        Ok(Self {
            inner: Arc::new(client),
        })
    }

    /// Insert or overwrite the record stored under `key`
    ///
    /// # Errors
    /// Returns an error if the Spanner mutation fails
    pub async fn upsert(&self, key: &str, data: &str) -> Result<()> {
        let key = key.to_string();
        let data = data.to_string();
        let mutation = insert_or_update(
            TABLE,
            &["id", "data", "created_at", "updated_at"],
            &[&key, &data, &CommitTimestamp::new(), &CommitTimestamp::new()],
        );

        self.inner
            .apply(vec![mutation])
            .await
            .context("Failed to write record to Spanner")?;

        tracing::debug!("Upserted record: {}", key);
        Ok(())
    }

    /// Read the serialized record stored under `key`
    ///
    /// # Returns
    /// * `Ok(Some(data))` - Record found
    /// * `Ok(None)` - No record under that key
    /// * `Err(_)` - Spanner operation failed
    pub async fn read(&self, key: &str) -> Result<Option<String>> {
        let mut statement = Statement::new("SELECT data FROM content_store WHERE id = @id");
        statement.add_param("id", &key.to_string());

        let mut tx = self
            .inner
            .single()
            .await
            .context("Failed to create read transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to query record from Spanner")?;

        match result_set.next().await? {
            Some(row) => {
                let data: String = row.column_by_name("data")?;
                tracing::debug!("Read record: {}", key);
                Ok(Some(data))
            }
            None => {
                tracing::debug!("Record not found: {}", key);
                Ok(None)
            }
        }
    }

    /// Run `SELECT 1` to confirm the database answers
    pub async fn health_check(&self) -> Result<()> {
        let mut tx = self
            .inner
            .single()
            .await
            .context("Failed to create health check transaction")?;

        let mut result_set = tx
            .query(Statement::new("SELECT 1"))
            .await
            .context("Failed to execute health check query")?;

        if result_set.next().await?.is_some() {
            tracing::debug!("Health check query succeeded");
            Ok(())
        } else {
            Err(anyhow::anyhow!("Health check query returned no results"))
        }
    }
}

/// Create the instance, database and table if they are missing.
async fn auto_provision(config: &SpannerConfig) -> Result<()> {
    tracing::info!("Starting auto-provisioning checks...");

    let admin_client = AdminClient::new(AdminClientConfig::default())
        .await
        .context("Failed to create Spanner admin client")?;

    let project_path = format!("projects/{}", config.project);
    let instance_path = format!("{}/instances/{}", project_path, config.instance);
    let database_path = format!("{}/databases/{}", instance_path, config.database);

    ensure_instance(&admin_client, config, &project_path, &instance_path).await?;
    ensure_database(&admin_client, config, &instance_path, &database_path).await?;
    ensure_table(&admin_client, &database_path).await?;

    tracing::info!("Auto-provisioning complete");
    Ok(())
}

async fn ensure_instance(
    admin_client: &AdminClient,
    config: &SpannerConfig,
    project_path: &str,
    instance_path: &str,
) -> Result<()> {
    let request = GetInstanceRequest {
        name: instance_path.to_string(),
        field_mask: None,
    };

    match admin_client.instance().get_instance(request, None).await {
        Ok(_) => {
            tracing::info!("Instance already exists: {}", instance_path);
            return Ok(());
        }
        Err(status) if status.code() == Code::NotFound => {}
        Err(e) => {
            return Err(anyhow::anyhow!(
                "Failed to check instance existence: {}",
                e.message()
            ))
        }
    }

    tracing::info!("Instance not found, creating: {}", instance_path);
    let instance_config = match config.emulator_host {
        Some(_) => format!("{}/instanceConfigs/emulator-config", project_path),
        None => format!("{}/instanceConfigs/regional-us-central1", project_path),
    };

    let create_request = CreateInstanceRequest {
        parent: project_path.to_string(),
        instance_id: config.instance.clone(),
        instance: Some(Instance {
            name: instance_path.to_string(),
            config: instance_config,
            display_name: format!("{} instance", config.instance),
            node_count: 1,
            ..Default::default()
        }),
    };

    let mut operation = admin_client
        .instance()
        .create_instance(create_request, None)
        .await
        .context("Failed to start instance creation")?;
    operation
        .wait(None)
        .await
        .context("Failed to create instance")?;

    tracing::info!("Instance created: {}", instance_path);
    Ok(())
}

async fn ensure_database(
    admin_client: &AdminClient,
    config: &SpannerConfig,
    instance_path: &str,
    database_path: &str,
) -> Result<()> {
    let request = GetDatabaseRequest {
        name: database_path.to_string(),
    };

    match admin_client.database().get_database(request, None).await {
        Ok(_) => {
            tracing::info!("Database already exists: {}", database_path);
            return Ok(());
        }
        Err(status) if status.code() == Code::NotFound => {}
        Err(e) => {
            return Err(anyhow::anyhow!(
                "Failed to check database existence: {}",
                e.message()
            ))
        }
    }

    tracing::info!("Database not found, creating: {}", database_path);
    let create_request = CreateDatabaseRequest {
        parent: instance_path.to_string(),
        create_statement: format!("CREATE DATABASE `{}`", config.database),
        extra_statements: vec![],
        encryption_config: None,
        database_dialect: 1, // Google Standard SQL
        proto_descriptors: vec![],
    };

    let mut operation = admin_client
        .database()
        .create_database(create_request, None)
        .await
        .context("Failed to start database creation")?;
    operation
        .wait(None)
        .await
        .context("Failed to create database")?;

    tracing::info!("Database created: {}", database_path);
    Ok(())
}

async fn ensure_table(admin_client: &AdminClient, database_path: &str) -> Result<()> {
    let ddl = admin_client
        .database()
        .get_database_ddl(
            GetDatabaseDdlRequest {
                database: database_path.to_string(),
            },
            None,
        )
        .await
        .context("Failed to get database DDL")?
        .into_inner();

    if ddl.statements.iter().any(|stmt| declares_table(stmt)) {
        tracing::info!("Table '{}' already exists", TABLE);
        return Ok(());
    }

    tracing::info!("Table '{}' not found, creating...", TABLE);
    let update_request = UpdateDatabaseDdlRequest {
        database: database_path.to_string(),
        statements: vec![CREATE_TABLE_DDL.trim().to_string()],
        operation_id: String::new(),
        proto_descriptors: vec![],
        throughput_mode: false,
    };

    let mut operation = admin_client
        .database()
        .update_database_ddl(update_request, None)
        .await
        .context("Failed to start table creation")?;
    operation
        .wait(None)
        .await
        .context("Failed to create table")?;

    tracing::info!("Table '{}' created", TABLE);
    Ok(())
}

fn declares_table(statement: &str) -> bool {
    statement.contains(&format!("CREATE TABLE {}", TABLE))
        || statement.contains(&format!("CREATE TABLE `{}`", TABLE))
}
