//! Warden - query-filter compiler for the access-control backend
//!
//! `warden compile` prints the predicate compiled from a filter map;
//! `warden query` runs it against the configured database.

use std::collections::HashMap;
use std::process::ExitCode;

use serde::Serialize;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use warden::cli::{self, CliOptions, Command, EntityKind};
use warden::config::{Config, LogFormat};
use warden::db::Database;
use warden::filters::{FilterableEntity, SpecificationBuilder};
use warden::models::{
    AccessControl, AccessControlPermission, AccessControlTreeView, Library, LibraryTemplate,
    Permission, User, UserAccessControlView, UserPermission,
};
use warden::orm::{DatabaseEntity, FromSqlRow, RepositoryError, count_matching, find_page};

/// Call `$run::<Entity>(args..)` for the entity named on the command line,
/// appending any trailing tokens (such as `.await`) to each arm
macro_rules! dispatch {
    ($kind:expr, $run:ident ( $($arg:expr),* ) $($tail:tt)*) => {
        match $kind {
            EntityKind::User => $run::<User>($($arg),*) $($tail)*,
            EntityKind::AccessControl => $run::<AccessControl>($($arg),*) $($tail)*,
            EntityKind::Permission => $run::<Permission>($($arg),*) $($tail)*,
            EntityKind::UserPermission => $run::<UserPermission>($($arg),*) $($tail)*,
            EntityKind::AccessControlPermission => {
                $run::<AccessControlPermission>($($arg),*) $($tail)*
            }
            EntityKind::Library => $run::<Library>($($arg),*) $($tail)*,
            EntityKind::LibraryTemplate => $run::<LibraryTemplate>($($arg),*) $($tail)*,
            EntityKind::AccessControlTree => $run::<AccessControlTreeView>($($arg),*) $($tail)*,
            EntityKind::UserAccessControl => $run::<UserAccessControlView>($($arg),*) $($tail)*,
        }
    };
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    init_tracing(config.log_format);

    let options = match CliOptions::from_args() {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{}\n\n{}", e, cli::usage());
            return Ok(ExitCode::from(2));
        }
    };

    let builder = SpecificationBuilder::new();
    let outcome = match options.command {
        Command::Help => {
            println!("{}", cli::usage());
            return Ok(ExitCode::SUCCESS);
        }
        Command::Compile { entity, params } => dispatch!(entity, compile(&builder, &params)),
        Command::Query {
            entity,
            params,
            count_only,
        } => {
            let db = Database::connect(&config).await?;
            db.migrate().await?;
            tracing::info!(entity = entity.as_arg(), "Database ready");

            if count_only {
                dispatch!(entity, count(&db, &builder, &params).await)
            } else {
                dispatch!(entity, query(&db, &builder, params).await)
            }
        }
    };

    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(RepositoryError::Filter(e)) => {
            tracing::warn!(error = %e, field = ?e.field(), "Rejected filter");
            println!("{}", serde_json::to_string_pretty(&e.to_dto())?);
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "warden=info".into());
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .init(),
    }
}

fn compile<E: FilterableEntity>(
    builder: &SpecificationBuilder,
    params: &HashMap<String, String>,
) -> Result<(), RepositoryError> {
    let predicate = builder.compile::<E>(params)?;
    let (sql, values) = predicate.to_sql();
    println!("{}", sql);
    for (index, value) in values.iter().enumerate() {
        println!("  ?{} = {:?}", index + 1, value);
    }
    Ok(())
}

async fn count<E: DatabaseEntity + FilterableEntity>(
    db: &Database,
    builder: &SpecificationBuilder,
    params: &HashMap<String, String>,
) -> Result<(), RepositoryError> {
    let total = count_matching::<E>(db.pool(), builder, params).await?;
    println!("{}", total);
    Ok(())
}

async fn query<E>(
    db: &Database,
    builder: &SpecificationBuilder,
    params: HashMap<String, String>,
) -> Result<(), RepositoryError>
where
    E: DatabaseEntity + FilterableEntity + FromSqlRow + Serialize,
{
    let page = find_page::<E>(db.pool(), builder, params).await?;
    println!("{}", serde_json::to_string_pretty(&page)?);
    Ok(())
}
