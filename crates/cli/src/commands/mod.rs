pub mod catalog;
pub mod config;
pub mod explain;
pub mod recommend;

use std::path::{Path, PathBuf};

use serde::Serialize;

use ridewise_catalog::{
    demo_catalog, demo_profiles, read_profile_file, CatalogProvider, InMemoryCatalog,
    InMemoryProfileStore, JsonFileCatalog, ProfileProvider, ProviderError,
};
use ridewise_core::config::AppConfig;
use ridewise_core::domain::profile::UserProfile;
use ridewise_core::errors::ApplicationError;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
}

impl CommandResult {
    /// Successful command whose output is a JSON document rather than an envelope.
    pub fn json<T: Serialize>(command: &str, value: &T) -> Self {
        match serde_json::to_string_pretty(value) {
            Ok(output) => Self { exit_code: 0, output },
            Err(error) => Self::failure(command, "serialization", error.to_string(), 1),
        }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    fn from_failure(command: &str, failure: CommandFailure) -> Self {
        Self::failure(command, failure.error_class, failure.message, failure.exit_code)
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

/// Classified command failure; exit codes are stable for scripting.
#[derive(Debug)]
struct CommandFailure {
    error_class: &'static str,
    message: String,
    exit_code: u8,
}

impl CommandFailure {
    fn invalid_input(message: impl Into<String>) -> Self {
        Self { error_class: "invalid_input", message: message.into(), exit_code: 7 }
    }
}

impl From<ApplicationError> for CommandFailure {
    fn from(error: ApplicationError) -> Self {
        let (error_class, exit_code) = match &error {
            ApplicationError::Domain(domain) if domain.is_invalid_category() => {
                ("invalid_category", 5)
            }
            ApplicationError::Domain(_) | ApplicationError::InvalidRequest(_) => {
                ("invalid_input", 7)
            }
            ApplicationError::ProfileNotFound(_) | ApplicationError::VehicleNotFound(_) => {
                ("not_found", 6)
            }
            ApplicationError::Catalog(_) => ("catalog", 4),
            ApplicationError::Configuration(_) => ("config_validation", 2),
        };
        Self { error_class, message: error.to_string(), exit_code }
    }
}

impl From<ProviderError> for CommandFailure {
    fn from(error: ProviderError) -> Self {
        ApplicationError::from(error).into()
    }
}

/// Rider profile given either as a JSON file or as a stored profile id.
#[derive(Debug, Clone, Copy)]
enum ProfileSource<'a> {
    File(&'a Path),
    Stored(&'a str),
}

impl<'a> ProfileSource<'a> {
    fn from_args(
        profile: Option<&'a PathBuf>,
        user: Option<&'a str>,
    ) -> Result<Self, CommandFailure> {
        match (profile, user) {
            (Some(path), _) => Ok(Self::File(path.as_path())),
            (None, Some(user_id)) => Ok(Self::Stored(user_id)),
            (None, None) => {
                Err(CommandFailure::invalid_input("either --profile or --user is required"))
            }
        }
    }

    async fn resolve(self) -> Result<UserProfile, CommandFailure> {
        match self {
            Self::File(path) => read_profile_file(path).map_err(|error| {
                CommandFailure::invalid_input(format!("rider profile unusable: {error}"))
            }),
            Self::Stored(user_id) => {
                let store = InMemoryProfileStore::with_profiles(demo_profiles());
                store
                    .profile_for(user_id)
                    .await?
                    .ok_or_else(|| ApplicationError::ProfileNotFound(user_id.to_owned()).into())
            }
        }
    }
}

/// Explicit `--catalog` wins over `catalog.path`; neither means the demo catalog.
fn catalog_provider(config: &AppConfig, explicit: Option<&Path>) -> Box<dyn CatalogProvider> {
    match explicit.or(config.catalog.path.as_deref()) {
        Some(path) => Box::new(JsonFileCatalog::new(path)),
        None => Box::new(InMemoryCatalog::with_vehicles(demo_catalog())),
    }
}

fn block_on<F, T>(command: &str, future: F) -> CommandResult
where
    F: std::future::Future<Output = Result<T, CommandFailure>>,
    T: Serialize,
{
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                command,
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    match runtime.block_on(future) {
        Ok(value) => CommandResult::json(command, &value),
        Err(failure) => CommandResult::from_failure(command, failure),
    }
}
